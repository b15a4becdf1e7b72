use crate::{
    config::SmoothingConfig,
    convolution,
    error::SmoothingError,
    gamma::GammaLut,
    geometry::FrameGeometry,
    kernel::{Kernel, KernelBuilder, KernelCache},
};

/// Whether the cached kernel matches the configured parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// The kernel was built from the current parameters.
    Clean,
    /// The parameters changed since the kernel was last built.
    Dirty,
}

/// Gamma-corrected Gaussian smoothing of interleaved 3-channel 8-bit frames.
///
/// The filter owns the gamma tables, the kernel cache and a scratch copy of the
/// frame. Parameter updates and frame processing both need `&mut self`; callers
/// sharing a filter between threads must put it behind a lock.
///
/// # Examples
///
/// ```
/// use smoothing_core::{FrameGeometry, SmoothingFilter};
///
/// let mut filter = SmoothingFilter::new().unwrap();
/// filter.configure(1, 1.5).unwrap();
/// filter.set_frame_geometry(FrameGeometry::packed(16, 16).unwrap());
///
/// let mut frame = vec![128u8; 16 * 16 * 3];
/// filter.process_frame(&mut frame).unwrap();
/// ```
pub struct SmoothingFilter {
    lut: GammaLut,
    kernel: KernelCache,
    geometry: Option<FrameGeometry>,
    scratch: Vec<u8>,
}

impl SmoothingFilter {
    /// Create a filter with the default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothingError::AllocationFailure`] if the gamma tables cannot be built.
    pub fn new() -> Result<Self, SmoothingError> {
        Self::with_config(&SmoothingConfig::default())
    }

    /// Create a filter with the given parameters.
    pub fn with_config(config: &SmoothingConfig) -> Result<Self, SmoothingError> {
        Self::with_kernel_builder(config, Kernel::gaussian)
    }

    /// Create a filter whose kernels are computed by `builder`.
    ///
    /// A builder returning [`SmoothingError::AllocationFailure`] makes the frame
    /// pass through unmodified, the same as a failed allocation.
    pub fn with_kernel_builder(
        config: &SmoothingConfig,
        builder: KernelBuilder,
    ) -> Result<Self, SmoothingError> {
        config.validate()?;
        Ok(Self {
            lut: GammaLut::new()?,
            kernel: KernelCache::with_builder(config.kernel_size, config.sigma, builder),
            geometry: None,
            scratch: Vec::new(),
        })
    }

    /// Update the kernel parameters.
    ///
    /// The kernel is only rebuilt on the next processed frame, and only if a value
    /// actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothingError::InvalidParameter`] if a value is out of range; the
    /// current parameters are kept.
    pub fn configure(&mut self, kernel_size: usize, sigma: f32) -> Result<(), SmoothingError> {
        SmoothingConfig::new(kernel_size, sigma)?;
        self.kernel.configure(kernel_size, sigma);
        Ok(())
    }

    /// Set the layout of the incoming frames.
    pub fn set_frame_geometry(&mut self, geometry: FrameGeometry) {
        log::debug!(
            "frame geometry: {}x{}, stride {}",
            geometry.width(),
            geometry.height(),
            geometry.stride()
        );
        self.geometry = Some(geometry);
    }

    /// Smooth a frame in place.
    ///
    /// With a kernel size of 0 the frame is left untouched. Otherwise every pixel of
    /// the interior is replaced by the kernel-weighted sum of its footprint, computed
    /// in linear light from the original frame contents.
    ///
    /// # Errors
    ///
    /// * [`SmoothingError::MissingGeometry`] if no geometry was set.
    /// * [`SmoothingError::BufferTooSmall`] if the buffer cannot hold a frame.
    /// * [`SmoothingError::AllocationFailure`] if the kernel or the scratch copy cannot
    ///   be allocated. The buffer is left unmodified and the next frame can be
    ///   processed normally.
    pub fn process_frame(&mut self, buffer: &mut [u8]) -> Result<(), SmoothingError> {
        if self.kernel.kernel_size() == 0 {
            return Ok(());
        }

        let geometry = self.geometry.ok_or(SmoothingError::MissingGeometry)?;

        let frame_len = geometry.frame_len();
        if buffer.len() < frame_len {
            return Err(SmoothingError::BufferTooSmall {
                len: buffer.len(),
                expected: frame_len,
            });
        }

        let kernel = match self.kernel.refresh() {
            Ok(kernel) => kernel,
            Err(err) => {
                log::error!("smoothing kernel allocation failed: {err}");
                return Err(err);
            }
        };

        // keep a copy of the original frame so no output reads an already smoothed pixel
        self.scratch.clear();
        if let Err(e) = self.scratch.try_reserve(frame_len) {
            log::error!("scratch frame allocation failed: {e}");
            return Err(SmoothingError::AllocationFailure(format!("scratch frame: {e}")));
        }
        self.scratch.extend_from_slice(&buffer[..frame_len]);

        convolution::convolve(&self.scratch, buffer, &geometry, kernel, &self.lut)
    }

    /// Whether the kernel matches the configured parameters.
    pub fn state(&self) -> FilterState {
        if self.kernel.is_dirty() {
            FilterState::Dirty
        } else {
            FilterState::Clean
        }
    }

    /// The configured kernel size index.
    pub fn kernel_size(&self) -> usize {
        self.kernel.kernel_size()
    }

    /// The configured Gaussian sigma.
    pub fn sigma(&self) -> f32 {
        self.kernel.sigma()
    }

    /// The current parameters.
    pub fn config(&self) -> SmoothingConfig {
        SmoothingConfig {
            kernel_size: self.kernel.kernel_size(),
            sigma: self.kernel.sigma(),
        }
    }

    /// The frame layout, if negotiated.
    pub fn geometry(&self) -> Option<FrameGeometry> {
        self.geometry
    }

    /// The gamma lookup tables.
    pub fn lut(&self) -> &GammaLut {
        &self.lut
    }

    /// The kernel cache.
    pub fn kernel_cache(&self) -> &KernelCache {
        &self.kernel
    }
}

impl std::fmt::Debug for SmoothingFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothingFilter")
            .field("kernel_size", &self.kernel.kernel_size())
            .field("sigma", &self.kernel.sigma())
            .field("state", &self.state())
            .field("geometry", &self.geometry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    static FAIL_BUILD: AtomicBool = AtomicBool::new(false);

    fn flaky_gaussian(radius: usize, sigma: f32) -> Result<Kernel, SmoothingError> {
        if FAIL_BUILD.load(Ordering::SeqCst) {
            return Err(SmoothingError::AllocationFailure("kernel buffer".to_string()));
        }
        Kernel::gaussian(radius, sigma)
    }

    #[test]
    fn test_initial_state() -> Result<(), SmoothingError> {
        let filter = SmoothingFilter::new()?;
        assert_eq!(filter.state(), FilterState::Dirty);
        assert_eq!(filter.kernel_size(), 1);
        assert_eq!(filter.sigma(), 1.5);
        assert!(filter.geometry().is_none());
        assert_eq!(filter.kernel_cache().rebuild_count(), 0);
        Ok(())
    }

    #[test]
    fn test_state_transitions() -> Result<(), SmoothingError> {
        let mut filter = SmoothingFilter::new()?;
        filter.set_frame_geometry(FrameGeometry::packed(8, 8)?);
        let mut frame = vec![10u8; 8 * 8 * 3];

        filter.process_frame(&mut frame)?;
        assert_eq!(filter.state(), FilterState::Clean);

        filter.configure(1, 1.5)?;
        assert_eq!(filter.state(), FilterState::Clean);

        filter.configure(2, 1.5)?;
        assert_eq!(filter.state(), FilterState::Dirty);

        filter.process_frame(&mut frame)?;
        assert_eq!(filter.state(), FilterState::Clean);
        assert_eq!(filter.kernel_cache().rebuild_count(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_configure_keeps_parameters() -> Result<(), SmoothingError> {
        let mut filter = SmoothingFilter::new()?;
        assert!(matches!(
            filter.configure(3, 1.5),
            Err(SmoothingError::InvalidParameter(_))
        ));
        assert!(filter.configure(1, 500.0).is_err());
        assert_eq!(filter.config(), SmoothingConfig::default());
        Ok(())
    }

    #[test]
    fn test_invalid_initial_config() {
        let config = SmoothingConfig::default().with_kernel_size(4);
        assert!(SmoothingFilter::with_config(&config).is_err());
    }

    #[test]
    fn test_missing_geometry() -> Result<(), SmoothingError> {
        let mut filter = SmoothingFilter::new()?;
        let mut frame = vec![7u8; 300];

        assert_eq!(
            filter.process_frame(&mut frame),
            Err(SmoothingError::MissingGeometry)
        );
        assert!(frame.iter().all(|&v| v == 7));

        // no kernel is built for a frame that cannot be processed
        assert_eq!(filter.kernel_cache().rebuild_count(), 0);
        Ok(())
    }

    #[test]
    fn test_pass_through_without_geometry() -> Result<(), SmoothingError> {
        let mut filter = SmoothingFilter::with_config(&SmoothingConfig::new(0, 1.5)?)?;
        let mut frame = vec![7u8; 300];
        filter.process_frame(&mut frame)?;
        assert!(frame.iter().all(|&v| v == 7));
        Ok(())
    }

    #[test]
    fn test_buffer_too_small() -> Result<(), SmoothingError> {
        let mut filter = SmoothingFilter::new()?;
        filter.set_frame_geometry(FrameGeometry::packed(10, 10)?);
        let mut frame = vec![0u8; 299];

        assert_eq!(
            filter.process_frame(&mut frame),
            Err(SmoothingError::BufferTooSmall {
                len: 299,
                expected: 300
            })
        );
        Ok(())
    }

    #[test]
    fn test_longer_buffer_tail_untouched() -> Result<(), SmoothingError> {
        let mut filter = SmoothingFilter::new()?;
        filter.set_frame_geometry(FrameGeometry::packed(10, 10)?);
        let mut frame = vec![90u8; 310];

        filter.process_frame(&mut frame)?;
        assert!(frame[300..].iter().all(|&v| v == 90));
        Ok(())
    }

    #[test]
    fn test_failed_kernel_build_leaves_frame_unmodified() -> Result<(), SmoothingError> {
        let mut filter =
            SmoothingFilter::with_kernel_builder(&SmoothingConfig::default(), flaky_gaussian)?;
        filter.set_frame_geometry(FrameGeometry::packed(8, 8)?);

        let src = (0..8 * 8 * 3).map(|i| (i * 7 % 256) as u8).collect::<Vec<_>>();
        let mut frame = src.clone();
        filter.process_frame(&mut frame)?;
        assert_eq!(filter.state(), FilterState::Clean);

        filter.configure(2, 3.0)?;
        FAIL_BUILD.store(true, Ordering::SeqCst);
        let mut frame = src.clone();
        let res = filter.process_frame(&mut frame);
        FAIL_BUILD.store(false, Ordering::SeqCst);

        assert!(matches!(res, Err(SmoothingError::AllocationFailure(_))));
        assert_eq!(res.map_err(|e| e.is_fatal()), Err(false));
        assert_eq!(frame, src);
        assert_eq!(filter.state(), FilterState::Dirty);
        assert_eq!(filter.kernel_cache().cached().map(Kernel::size), Some(3));

        // the next frame rebuilds the kernel and is smoothed
        filter.process_frame(&mut frame)?;
        assert_ne!(frame, src);
        assert_eq!(filter.state(), FilterState::Clean);
        assert_eq!(filter.kernel_cache().rebuild_count(), 2);
        Ok(())
    }
}
