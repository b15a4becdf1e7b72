use crate::error::SmoothingError;

/// Smallest accepted kernel size index.
pub const MIN_KERNEL_SIZE: usize = 0;

/// Largest accepted kernel size index, a 5x5 kernel.
pub const MAX_KERNEL_SIZE: usize = 2;

/// Smallest accepted Gaussian sigma.
pub const MIN_SIGMA: f32 = 0.1;

/// Largest accepted Gaussian sigma.
pub const MAX_SIGMA: f32 = 100.0;

/// Default kernel size index, a 3x3 kernel.
pub const DEFAULT_KERNEL_SIZE: usize = 1;

/// Default Gaussian sigma.
pub const DEFAULT_SIGMA: f32 = 1.5;

/// Tunable parameters of the smoothing filter.
///
/// # Examples
///
/// ```
/// use smoothing_core::SmoothingConfig;
///
/// let config = SmoothingConfig::default().with_kernel_size(2).with_sigma(3.0);
/// assert!(config.validate().is_ok());
///
/// let config = SmoothingConfig::default().with_sigma(0.0);
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingConfig {
    /// The size index `n` of the kernel; the kernel is `2n+1` pixels square.
    pub kernel_size: usize,
    /// The sigma of the Gaussian `exp(-r^2 / sigma^2)`, `r` being the distance to the center.
    pub sigma: f32,
}

impl SmoothingConfig {
    /// Create a validated configuration.
    pub fn new(kernel_size: usize, sigma: f32) -> Result<Self, SmoothingError> {
        let config = Self { kernel_size, sigma };
        config.validate()?;
        Ok(config)
    }

    /// Set the kernel size index.
    pub fn with_kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Set the Gaussian sigma.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Check both parameters against their ranges.
    pub fn validate(&self) -> Result<(), SmoothingError> {
        if !(MIN_KERNEL_SIZE..=MAX_KERNEL_SIZE).contains(&self.kernel_size) {
            return Err(SmoothingError::InvalidParameter(format!(
                "kernel_size {} is outside [{MIN_KERNEL_SIZE}, {MAX_KERNEL_SIZE}]",
                self.kernel_size
            )));
        }

        // also rejects NaN
        if !(MIN_SIGMA..=MAX_SIGMA).contains(&self.sigma) {
            return Err(SmoothingError::InvalidParameter(format!(
                "sigma {} is outside [{MIN_SIGMA}, {MAX_SIGMA}]",
                self.sigma
            )));
        }

        Ok(())
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
        }
    }
}
