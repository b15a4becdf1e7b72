use smoothing_core::FrameGeometry;

use crate::error::ElementError;

/// Channel order of the interleaved frames.
///
/// The filter treats every channel the same way, so the order only matters to
/// the peers of the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PixelFormat::Rgb => write!(f, "RGB"),
            PixelFormat::Bgr => write!(f, "BGR"),
        }
    }
}

/// Stream capabilities announced by the upstream peer.
///
/// # Examples
///
/// ```
/// use smoothing_element::{Caps, PixelFormat};
///
/// let caps = Caps::new(PixelFormat::Bgr, 640, 480);
///
/// let geometry = caps.geometry().unwrap();
/// assert_eq!(geometry.stride(), 640 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caps {
    /// The pixel format, `None` until negotiated.
    pub format: Option<PixelFormat>,
    /// Width in pixels.
    pub width: Option<usize>,
    /// Height in pixels.
    pub height: Option<usize>,
    /// False if any field is still a range or a list.
    pub fixed: bool,
}

impl Caps {
    /// Create fixed caps for a frame size and format.
    pub fn new(format: PixelFormat, width: usize, height: usize) -> Self {
        Self {
            format: Some(format),
            width: Some(width),
            height: Some(height),
            fixed: true,
        }
    }

    /// The frame geometry described by the caps.
    ///
    /// The frames are packed, `stride = 3 * width`.
    pub fn geometry(&self) -> Result<FrameGeometry, ElementError> {
        if !self.fixed {
            return Err(ElementError::CapsNotFixed);
        }

        if self.format.is_none() {
            return Err(ElementError::MissingFormat);
        }

        let (Some(width), Some(height)) = (self.width, self.height) else {
            return Err(ElementError::MissingDimensions);
        };

        Ok(FrameGeometry::packed(width, height)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothing_core::SmoothingError;

    #[test]
    fn test_fixed_caps() -> Result<(), ElementError> {
        let caps = Caps::new(PixelFormat::Rgb, 320, 240);

        assert!(caps.fixed);
        assert_eq!(caps.format, Some(PixelFormat::Rgb));
        assert_eq!(caps.geometry()?, FrameGeometry::packed(320, 240)?);
        Ok(())
    }

    #[test]
    fn test_caps_not_fixed() {
        let caps = Caps {
            fixed: false,
            width: None,
            ..Caps::new(PixelFormat::Bgr, 8, 240)
        };
        assert!(matches!(caps.geometry(), Err(ElementError::CapsNotFixed)));
    }

    #[test]
    fn test_caps_missing_dimensions() {
        let caps = Caps {
            height: None,
            ..Caps::new(PixelFormat::Rgb, 64, 64)
        };
        assert!(matches!(
            caps.geometry(),
            Err(ElementError::MissingDimensions)
        ));
    }

    #[test]
    fn test_caps_missing_format() {
        let caps = Caps {
            format: None,
            ..Caps::new(PixelFormat::Rgb, 64, 64)
        };
        assert!(matches!(caps.geometry(), Err(ElementError::MissingFormat)));
    }

    #[test]
    fn test_caps_zero_dimensions() {
        let caps = Caps::new(PixelFormat::Rgb, 0, 10);
        assert!(matches!(
            caps.geometry(),
            Err(ElementError::SmoothingError(SmoothingError::MissingGeometry))
        ));
    }

    #[test]
    fn test_caps_oversized_frame() {
        let caps = Caps::new(PixelFormat::Rgb, usize::MAX / 2, 2);
        assert!(matches!(
            caps.geometry(),
            Err(ElementError::SmoothingError(SmoothingError::FrameTooLarge { .. }))
        ));
    }
}
