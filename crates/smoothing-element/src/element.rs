use std::sync::{Arc, Mutex, MutexGuard};

use smoothing_core::{SmoothingConfig, SmoothingError, SmoothingFilter};

use crate::{
    error::ElementError,
    property::{Property, PropertyId},
    sink::{Event, FrameSink},
};

/// A smoothing filter shared between the control and the streaming threads.
pub type SharedFilter = Arc<Mutex<SmoothingFilter>>;

/// Stream element applying the smoothing filter to every buffer.
///
/// Property updates and buffer processing may come from different threads; both
/// go through the same filter lock.
pub struct SmoothingElement<S: FrameSink> {
    filter: SharedFilter,
    sink: S,
}

impl<S: FrameSink> SmoothingElement<S> {
    /// The element name.
    pub const NAME: &'static str = "smoothingfilter";

    /// The element description.
    pub const DESCRIPTION: &'static str = "Smoothes the image by applying some kind of low-pass spatial filter such as a Gaussian convolution kernel.";

    /// Create an element with the default properties, forwarding to `sink`.
    pub fn new(sink: S) -> Result<Self, ElementError> {
        Self::with_config(&SmoothingConfig::default(), sink)
    }

    /// Create an element with the given parameters, forwarding to `sink`.
    pub fn with_config(config: &SmoothingConfig, sink: S) -> Result<Self, ElementError> {
        Ok(Self::with_filter(SmoothingFilter::with_config(config)?, sink))
    }

    /// Wrap an existing filter, forwarding to `sink`.
    pub fn with_filter(filter: SmoothingFilter, sink: S) -> Self {
        Self {
            filter: Arc::new(Mutex::new(filter)),
            sink,
        }
    }

    /// A handle to the filter, e.g. for a control thread.
    pub fn filter(&self) -> SharedFilter {
        self.filter.clone()
    }

    /// The downstream sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn lock(&self) -> Result<MutexGuard<'_, SmoothingFilter>, ElementError> {
        self.filter.lock().map_err(|_| ElementError::MutexPoisoned)
    }

    /// Set a property after checking its range.
    pub fn set_property(&self, property: Property) -> Result<(), ElementError> {
        property.validate()?;

        let mut filter = self.lock()?;
        let (kernel_size, sigma) = match property {
            // validated, non-negative
            Property::KernelSize(v) => (v as usize, filter.sigma()),
            Property::Sigma(v) => (filter.kernel_size(), v),
        };
        filter.configure(kernel_size, sigma)?;

        log::debug!("{}: {} set to {property}", Self::NAME, property.id().name());
        Ok(())
    }

    /// Read a property.
    pub fn property(&self, id: PropertyId) -> Result<Property, ElementError> {
        let filter = self.lock()?;
        Ok(match id {
            PropertyId::KernelSize => Property::KernelSize(filter.kernel_size() as i64),
            PropertyId::Sigma => Property::Sigma(filter.sigma()),
        })
    }

    /// Handle an event from upstream and forward it downstream.
    ///
    /// Caps events set the frame geometry. Unusable caps are logged and the
    /// previous geometry, if any, is kept.
    pub fn handle_event(&self, event: Event) -> Result<(), ElementError> {
        if let Event::Caps(caps) = &event {
            match caps.geometry() {
                Ok(geometry) => {
                    log::debug!(
                        "{}: the video size of this set of capabilities is {}x{}, {}",
                        Self::NAME,
                        geometry.width(),
                        geometry.height(),
                        geometry.stride()
                    );
                    self.lock()?.set_frame_geometry(geometry);
                }
                Err(err) => log::error!("{}: {err}", Self::NAME),
            }
        }

        self.sink.push_event(event)
    }

    /// Smooth a buffer and push it downstream.
    ///
    /// Allocation failures and a missing geometry are logged and the buffer is
    /// forwarded unmodified.
    pub fn chain(&self, mut buffer: Vec<u8>) -> Result<(), ElementError> {
        {
            let mut filter = self.lock()?;
            match filter.process_frame(&mut buffer) {
                Ok(()) => {}
                Err(SmoothingError::MissingGeometry) => {
                    log::error!(
                        "{}: no frame geometry negotiated, forwarding buffer unmodified",
                        Self::NAME
                    );
                }
                Err(err) if !err.is_fatal() => {
                    log::warn!("{}: {err}, forwarding buffer unmodified", Self::NAME);
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.sink.push_buffer(buffer)
    }
}
