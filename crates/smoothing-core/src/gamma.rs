use crate::error::SmoothingError;

/// Gamma used to linearize the camera output, the inverse of the ~0.45 sensor encode.
pub const GAMMA: f64 = 2.22;

/// Offset added before linearizing (Rec. 709).
pub const OFFSET: f64 = 0.099;

/// Divisor keeping `i / FACTOR + OFFSET` at or below 1 for every 8-bit input.
pub const FACTOR: f64 = 283.02;

/// Number of 8-bit input levels.
pub const IN_RANGE: usize = 256;

/// Number of levels in the linear accumulator lookup (12 bit).
pub const OUT_RANGE: usize = 4096;

/// Pair of lookup tables moving 8-bit intensities in and out of linear light.
///
/// The forward table maps a gamma-encoded channel value to a linear value in
/// `[0, OUT_RANGE]`, the inverse table maps a quantized linear accumulator back
/// to a gamma-encoded 8-bit value.
///
/// NOTE: the inverse table does not subtract [`OFFSET`], so the round trip lifts
/// dark values (black encodes back to 25).
#[derive(Debug, Clone)]
pub struct GammaLut {
    forward: Vec<f64>,
    inverse: Vec<u8>,
}

impl GammaLut {
    /// Build both lookup tables.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothingError::AllocationFailure`] if the tables cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use smoothing_core::gamma::GammaLut;
    ///
    /// let lut = GammaLut::new().unwrap();
    /// assert_eq!(lut.inverse_table().len(), 4096);
    /// assert_eq!(lut.inverse(lut.forward(255)), 255);
    /// ```
    pub fn new() -> Result<Self, SmoothingError> {
        let mut forward = Vec::new();
        forward
            .try_reserve_exact(IN_RANGE)
            .map_err(|e| SmoothingError::AllocationFailure(format!("forward gamma lut: {e}")))?;

        let mut inverse = Vec::new();
        inverse
            .try_reserve_exact(OUT_RANGE)
            .map_err(|e| SmoothingError::AllocationFailure(format!("inverse gamma lut: {e}")))?;

        forward.extend(
            (0..IN_RANGE)
                .map(|i| OUT_RANGE as f64 * ((i as f64 / FACTOR) + OFFSET).powf(GAMMA)),
        );

        let inv_gamma = 1.0 / GAMMA;
        inverse.extend((0..OUT_RANGE).map(|i| {
            let v = IN_RANGE as f64 * (i as f64 / OUT_RANGE as f64).powf(inv_gamma);
            // truncation, never above 255 since i < OUT_RANGE
            v.min(u8::MAX as f64) as u8
        }));

        log::debug!(
            "gamma lut built: forward[0]={:.3} forward[{}]={:.3}",
            forward[0],
            IN_RANGE - 1,
            forward[IN_RANGE - 1]
        );

        Ok(Self { forward, inverse })
    }

    /// Linear value of a gamma-encoded channel value.
    #[inline]
    pub fn forward(&self, value: u8) -> f64 {
        // u8 indexes are always inside [0, IN_RANGE)
        self.forward[value as usize]
    }

    /// Gamma-encoded 8-bit value of a linear accumulator.
    ///
    /// The accumulator is rounded and clamped to `[0, OUT_RANGE - 1]` before the lookup.
    #[inline]
    pub fn inverse(&self, acc: f64) -> u8 {
        let idx = acc.round().clamp(0.0, (OUT_RANGE - 1) as f64) as usize;
        self.inverse[idx]
    }

    /// Encode then decode a single value, as an identity kernel would.
    pub fn round_trip(&self, value: u8) -> u8 {
        self.inverse(self.forward(value))
    }

    /// The forward table, indexed by 8-bit input.
    pub fn forward_table(&self) -> &[f64] {
        &self.forward
    }

    /// The inverse table, indexed by quantized linear accumulator.
    pub fn inverse_table(&self) -> &[u8] {
        &self.inverse
    }
}
