#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// filter parameters and their ranges.
pub mod config;

/// linear-light convolution of interleaved frames.
pub mod convolution;

/// error types of the smoothing engine.
pub mod error;

/// the smoothing filter and its state.
pub mod filter;

/// gamma lookup tables.
pub mod gamma;

/// frame layout.
pub mod geometry;

/// gaussian kernel computation and caching.
pub mod kernel;

pub use crate::config::SmoothingConfig;
pub use crate::error::SmoothingError;
pub use crate::filter::{FilterState, SmoothingFilter};
pub use crate::gamma::GammaLut;
pub use crate::geometry::FrameGeometry;
pub use crate::kernel::{Kernel, KernelBuilder, KernelCache};
