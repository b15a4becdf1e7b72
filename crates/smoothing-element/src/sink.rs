use std::sync::Mutex;

use crate::{caps::Caps, error::ElementError};

/// Stream events travelling alongside the buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The stream format was negotiated.
    Caps(Caps),
    /// No more buffers will follow.
    Eos,
}

/// Downstream consumer of the smoothed frames.
pub trait FrameSink: Send + Sync {
    /// Receive a processed buffer.
    fn push_buffer(&self, buffer: Vec<u8>) -> Result<(), ElementError>;

    /// Receive a forwarded event.
    fn push_event(&self, event: Event) -> Result<(), ElementError>;
}

/// A sink keeping every buffer and event it receives.
#[derive(Debug, Default)]
pub struct CollectSink {
    buffers: Mutex<Vec<Vec<u8>>>,
    events: Mutex<Vec<Event>>,
}

impl CollectSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the buffers received so far.
    pub fn take_buffers(&self) -> Result<Vec<Vec<u8>>, ElementError> {
        let mut buffers = self
            .buffers
            .lock()
            .map_err(|_| ElementError::MutexPoisoned)?;
        Ok(std::mem::take(&mut *buffers))
    }

    /// The events received so far.
    pub fn events(&self) -> Result<Vec<Event>, ElementError> {
        let events = self.events.lock().map_err(|_| ElementError::MutexPoisoned)?;
        Ok(events.clone())
    }

    /// Whether the end of stream was received.
    pub fn is_eos(&self) -> Result<bool, ElementError> {
        Ok(self.events()?.contains(&Event::Eos))
    }
}

impl FrameSink for CollectSink {
    fn push_buffer(&self, buffer: Vec<u8>) -> Result<(), ElementError> {
        self.buffers
            .lock()
            .map_err(|_| ElementError::MutexPoisoned)?
            .push(buffer);
        Ok(())
    }

    fn push_event(&self, event: Event) -> Result<(), ElementError> {
        self.events
            .lock()
            .map_err(|_| ElementError::MutexPoisoned)?
            .push(event);
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for std::sync::Arc<S> {
    fn push_buffer(&self, buffer: Vec<u8>) -> Result<(), ElementError> {
        (**self).push_buffer(buffer)
    }

    fn push_event(&self, event: Event) -> Result<(), ElementError> {
        (**self).push_event(event)
    }
}
