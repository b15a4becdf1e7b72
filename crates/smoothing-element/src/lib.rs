#![deny(missing_docs)]
//! # Smoothing element
//!
//! Host-side glue around [`smoothing_core::SmoothingFilter`]: caps negotiation,
//! validated properties and forwarding of the smoothed buffers downstream.

/// stream capabilities and frame geometry negotiation.
pub mod caps;

/// the element.
pub mod element;

/// error types of the element.
pub mod error;

/// tunable properties.
pub mod property;

/// downstream consumers and stream events.
pub mod sink;

pub use crate::caps::{Caps, PixelFormat};
pub use crate::element::{SharedFilter, SmoothingElement};
pub use crate::error::ElementError;
pub use crate::property::{Property, PropertyId};
pub use crate::sink::{CollectSink, Event, FrameSink};
