/// An error type for the smoothing engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SmoothingError {
    /// A kernel or scratch buffer could not be allocated.
    #[error("Failed to allocate {0}")]
    AllocationFailure(String),

    /// The frame geometry has not been negotiated or has a zero dimension.
    #[error("Frame geometry is missing or has a zero dimension")]
    MissingGeometry,

    /// The row stride cannot hold a full row of 3-channel pixels.
    #[error("Stride ({stride}) is smaller than 3 * width ({width})")]
    InvalidStride {
        /// The stride in bytes.
        stride: usize,
        /// The width in pixels.
        width: usize,
    },

    /// The frame size in bytes does not fit in `usize`.
    #[error("Frame of {width}x{height} pixels is too large")]
    FrameTooLarge {
        /// The width in pixels.
        width: usize,
        /// The height in pixels.
        height: usize,
    },

    /// The frame buffer is shorter than `stride * height`.
    #[error("Buffer length ({len}) is smaller than the frame size ({expected})")]
    BufferTooSmall {
        /// The length of the buffer in bytes.
        len: usize,
        /// The expected number of bytes.
        expected: usize,
    },

    /// A filter parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl SmoothingError {
    /// Whether the error must stop the stream.
    ///
    /// Allocation failures only cost the current frame, which is forwarded unmodified.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SmoothingError::AllocationFailure(_))
    }
}
