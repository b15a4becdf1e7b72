use crate::{config::SmoothingConfig, error::SmoothingError};

/// A square, normalized Gaussian kernel stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Compute the kernel for `radius` (the kernel size index `n`) and `sigma`.
    ///
    /// The kernel is `2n+1` wide, with weights `exp(-(ii^2 + jj^2) / sigma^2)`
    /// where `ii` and `jj` are the offsets from the center, normalized to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothingError::AllocationFailure`] if the weights cannot be allocated.
    pub fn gaussian(radius: usize, sigma: f32) -> Result<Self, SmoothingError> {
        let size = 2 * radius + 1;

        let mut raw = Vec::new();
        raw.try_reserve_exact(size * size)
            .map_err(|e| SmoothingError::AllocationFailure(format!("kernel buffer: {e}")))?;

        let sigma_sq = sigma as f64 * sigma as f64;
        let mut sum = 0.0f64;
        for i in 0..size {
            for j in 0..size {
                let ii = i as f64 - radius as f64;
                let jj = j as f64 - radius as f64;
                let w = (-(ii * ii + jj * jj) / sigma_sq).exp();
                raw.push(w);
                sum += w;
            }
        }

        // normalize so the brightness is preserved
        let mut weights = Vec::new();
        weights
            .try_reserve_exact(size * size)
            .map_err(|e| SmoothingError::AllocationFailure(format!("kernel buffer: {e}")))?;
        weights.extend(raw.iter().map(|w| (w / sum) as f32));

        Ok(Self { radius, weights })
    }

    /// The kernel size index `n`.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// The side length `2n+1`.
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }

    /// The weights, row-major, `size * size` long.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The weight at row `i`, column `j`.
    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f32 {
        self.weights[i * self.size() + j]
    }
}

/// Computes a kernel from the size index and sigma.
pub type KernelBuilder = fn(usize, f32) -> Result<Kernel, SmoothingError>;

/// Lazily rebuilt Gaussian kernel.
///
/// [`KernelCache::configure`] only records the parameters; the kernel is
/// recomputed on the next [`KernelCache::refresh`] after a change.
#[derive(Debug, Clone)]
pub struct KernelCache {
    kernel_size: usize,
    sigma: f32,
    dirty: bool,
    kernel: Option<Kernel>,
    rebuilds: usize,
    builder: KernelBuilder,
}

impl KernelCache {
    /// Create a dirty cache for the given parameters.
    pub fn new(kernel_size: usize, sigma: f32) -> Self {
        Self::with_builder(kernel_size, sigma, Kernel::gaussian)
    }

    /// Create a dirty cache computing its kernels with `builder`.
    ///
    /// # Arguments
    ///
    /// * `kernel_size` - The kernel size index `n`.
    /// * `sigma` - The Gaussian sigma.
    /// * `builder` - Called on every rebuild, [`Kernel::gaussian`] by default.
    pub fn with_builder(kernel_size: usize, sigma: f32, builder: KernelBuilder) -> Self {
        Self {
            kernel_size,
            sigma,
            dirty: true,
            kernel: None,
            rebuilds: 0,
            builder,
        }
    }

    /// Store new parameters, marking the cache dirty if either one changed.
    ///
    /// Returns whether the cache became dirty.
    pub fn configure(&mut self, kernel_size: usize, sigma: f32) -> bool {
        let changed = self.kernel_size != kernel_size || self.sigma != sigma;
        if changed {
            self.kernel_size = kernel_size;
            self.sigma = sigma;
            self.dirty = true;
            log::debug!("kernel parameters changed: kernel_size={kernel_size} sigma={sigma}");
        }
        changed
    }

    /// Rebuild the kernel if the parameters changed since the last build.
    ///
    /// # Errors
    ///
    /// On allocation failure the previous kernel and the dirty flag are kept and
    /// [`SmoothingError::AllocationFailure`] is returned.
    pub fn refresh(&mut self) -> Result<&Kernel, SmoothingError> {
        if self.dirty || self.kernel.is_none() {
            log::debug!(
                "computing smoothing kernel: kernel_size={} sigma={}",
                self.kernel_size,
                self.sigma
            );

            let kernel = (self.builder)(self.kernel_size, self.sigma)?;
            for (idx, w) in kernel.weights().iter().enumerate() {
                log::trace!(
                    "smoothing kernel {} {}: {w}",
                    idx / kernel.size(),
                    idx % kernel.size()
                );
            }

            self.kernel = Some(kernel);
            self.dirty = false;
            self.rebuilds += 1;
        }

        self.kernel
            .as_ref()
            .ok_or_else(|| SmoothingError::AllocationFailure("kernel buffer".to_string()))
    }

    /// The kernel as of the last successful build, which may be stale.
    pub fn cached(&self) -> Option<&Kernel> {
        self.kernel.as_ref()
    }

    /// Whether the parameters changed since the last build.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The configured kernel size index.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    /// The configured sigma.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Number of times the kernel has been computed.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}

impl Default for KernelCache {
    fn default() -> Self {
        let config = SmoothingConfig::default();
        Self::new(config.kernel_size, config.sigma)
    }
}
