use crate::error::SmoothingError;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

/// Size and layout of an interleaved 3-channel 8-bit frame.
///
/// # Examples
///
/// ```
/// use smoothing_core::FrameGeometry;
///
/// let geometry = FrameGeometry::packed(640, 480).unwrap();
/// assert_eq!(geometry.stride(), 640 * 3);
/// assert_eq!(geometry.frame_len(), 640 * 480 * 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    width: usize,
    height: usize,
    stride: usize,
    frame_len: usize,
}

impl FrameGeometry {
    /// Create a geometry with an explicit row stride in bytes.
    ///
    /// # Errors
    ///
    /// * [`SmoothingError::MissingGeometry`] for a zero width or height.
    /// * [`SmoothingError::InvalidStride`] if a row does not fit in `stride` bytes.
    /// * [`SmoothingError::FrameTooLarge`] if the row or frame size overflows `usize`.
    pub fn new(width: usize, height: usize, stride: usize) -> Result<Self, SmoothingError> {
        if width == 0 || height == 0 {
            return Err(SmoothingError::MissingGeometry);
        }

        let too_large = || SmoothingError::FrameTooLarge { width, height };

        let row_len = width.checked_mul(CHANNELS).ok_or_else(too_large)?;
        if stride < row_len {
            return Err(SmoothingError::InvalidStride { stride, width });
        }

        let frame_len = stride.checked_mul(height).ok_or_else(too_large)?;

        Ok(Self {
            width,
            height,
            stride,
            frame_len,
        })
    }

    /// Create a geometry without row padding, `stride = 3 * width`.
    pub fn packed(width: usize, height: usize) -> Result<Self, SmoothingError> {
        let stride = width
            .checked_mul(CHANNELS)
            .ok_or(SmoothingError::FrameTooLarge { width, height })?;
        Self::new(width, height, stride)
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes from one row to the next.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Minimum buffer length for one frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Byte offset of channel 0 of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * CHANNELS
    }
}
