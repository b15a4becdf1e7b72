use crate::{
    error::SmoothingError,
    gamma::GammaLut,
    geometry::{FrameGeometry, CHANNELS},
    kernel::Kernel,
};

/// Rows and columns that receive a full kernel footprint.
///
/// The footprint of pixel `(x, y)` spans `[x, x + s)` and `[y, y + s)`, so the last
/// `s` rows and columns of the frame are never written.
///
/// # Returns
///
/// The exclusive end of the interior as `(columns, rows)`.
pub fn interior(geometry: &FrameGeometry, kernel: &Kernel) -> (usize, usize) {
    let size = kernel.size();
    (
        geometry.width().saturating_sub(size),
        geometry.height().saturating_sub(size),
    )
}

fn check_buffers(
    src: &[u8],
    dst: &[u8],
    geometry: &FrameGeometry,
) -> Result<(), SmoothingError> {
    let expected = geometry.frame_len();
    for len in [src.len(), dst.len()] {
        if len < expected {
            return Err(SmoothingError::BufferTooSmall { len, expected });
        }
    }
    Ok(())
}

/// Convolve a frame with any square kernel in linear light.
///
/// # Arguments
///
/// * `src` - The source frame, read only.
/// * `dst` - The destination frame. Only the interior is written.
/// * `geometry` - The layout shared by both frames.
/// * `kernel` - The normalized kernel.
/// * `lut` - The gamma lookup tables.
///
/// PRECONDITION: `src` and `dst` hold the same frame; pixels outside the
/// interior are left as they are in `dst`.
pub fn convolve_generic(
    src: &[u8],
    dst: &mut [u8],
    geometry: &FrameGeometry,
    kernel: &Kernel,
    lut: &GammaLut,
) -> Result<(), SmoothingError> {
    check_buffers(src, dst, geometry)?;

    let size = kernel.size();
    let weights = kernel.weights();
    let (stop_x, stop_y) = interior(geometry, kernel);

    for y in 0..stop_y {
        for x in 0..stop_x {
            let mut acc = [0.0f64; CHANNELS];

            for i in 0..size {
                let row = geometry.offset(x, y + i);
                for j in 0..size {
                    let w = weights[i * size + j] as f64;
                    let px = row + j * CHANNELS;
                    for (acc_val, &v) in acc.iter_mut().zip(&src[px..px + CHANNELS]) {
                        *acc_val += lut.forward(v) * w;
                    }
                }
            }

            let out = geometry.offset(x, y);
            for (dst_val, acc_val) in dst[out..out + CHANNELS].iter_mut().zip(acc) {
                *dst_val = lut.inverse(acc_val);
            }
        }
    }

    Ok(())
}

/// Convolve a frame with a 3x3 kernel, taps unrolled.
///
/// The taps are summed in the same row-major order as [`convolve_generic`], so
/// both functions produce identical output for the same kernel.
///
/// # Arguments
///
/// * `src` - The source frame, read only.
/// * `dst` - The destination frame. Only the interior is written.
/// * `geometry` - The layout shared by both frames.
/// * `kernel` - The normalized 3x3 kernel.
/// * `lut` - The gamma lookup tables.
pub fn convolve_3x3(
    src: &[u8],
    dst: &mut [u8],
    geometry: &FrameGeometry,
    kernel: &Kernel,
    lut: &GammaLut,
) -> Result<(), SmoothingError> {
    if kernel.size() != 3 {
        return Err(SmoothingError::InvalidParameter(format!(
            "expected a 3x3 kernel, got {0}x{0}",
            kernel.size()
        )));
    }
    check_buffers(src, dst, geometry)?;

    let k: [f64; 9] = std::array::from_fn(|idx| kernel.weights()[idx] as f64);
    let stride = geometry.stride();
    let (stop_x, stop_y) = interior(geometry, kernel);

    for y in 0..stop_y {
        for x in 0..stop_x {
            let r0 = geometry.offset(x, y);
            let r1 = r0 + stride;
            let r2 = r1 + stride;

            for c in 0..CHANNELS {
                let f = |offset: usize| lut.forward(src[offset + c]);

                let mut acc = 0.0f64;
                acc += f(r0) * k[0];
                acc += f(r0 + CHANNELS) * k[1];
                acc += f(r0 + 2 * CHANNELS) * k[2];
                acc += f(r1) * k[3];
                acc += f(r1 + CHANNELS) * k[4];
                acc += f(r1 + 2 * CHANNELS) * k[5];
                acc += f(r2) * k[6];
                acc += f(r2 + CHANNELS) * k[7];
                acc += f(r2 + 2 * CHANNELS) * k[8];

                dst[r0 + c] = lut.inverse(acc);
            }
        }
    }

    Ok(())
}

/// Convolve a frame, taking the unrolled path for 3x3 kernels.
pub fn convolve(
    src: &[u8],
    dst: &mut [u8],
    geometry: &FrameGeometry,
    kernel: &Kernel,
    lut: &GammaLut,
) -> Result<(), SmoothingError> {
    match kernel.size() {
        3 => convolve_3x3(src, dst, geometry, kernel, lut),
        _ => convolve_generic(src, dst, geometry, kernel, lut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn random_frame(geometry: &FrameGeometry, seed: u64) -> Vec<u8> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..geometry.frame_len()).map(|_| rng.random::<u8>()).collect()
    }

    #[test]
    fn test_interior() -> Result<(), SmoothingError> {
        let geometry = FrameGeometry::packed(10, 8)?;
        assert_eq!(interior(&geometry, &Kernel::gaussian(1, 1.5)?), (7, 5));
        assert_eq!(interior(&geometry, &Kernel::gaussian(2, 1.5)?), (5, 3));

        let tiny = FrameGeometry::packed(2, 2)?;
        assert_eq!(interior(&tiny, &Kernel::gaussian(1, 1.5)?), (0, 0));
        Ok(())
    }

    #[test]
    fn test_fast_path_matches_generic() -> Result<(), SmoothingError> {
        let lut = GammaLut::new()?;

        for (width, height, seed) in [(10, 10, 0), (17, 9, 1), (64, 48, 2), (3, 3, 3)] {
            let geometry = FrameGeometry::packed(width, height)?;
            let src = random_frame(&geometry, seed);

            for sigma in [0.1, 0.7, 1.5, 4.0, 100.0] {
                let kernel = Kernel::gaussian(1, sigma)?;

                let mut generic = src.clone();
                convolve_generic(&src, &mut generic, &geometry, &kernel, &lut)?;

                let mut fast = src.clone();
                convolve_3x3(&src, &mut fast, &geometry, &kernel, &lut)?;

                assert_eq!(generic, fast, "{width}x{height} sigma {sigma}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_fast_path_with_padded_rows() -> Result<(), SmoothingError> {
        let lut = GammaLut::new()?;
        let geometry = FrameGeometry::new(12, 7, 40)?;
        let src = random_frame(&geometry, 7);
        let kernel = Kernel::gaussian(1, 1.5)?;

        let mut generic = src.clone();
        convolve_generic(&src, &mut generic, &geometry, &kernel, &lut)?;
        let mut fast = src.clone();
        convolve_3x3(&src, &mut fast, &geometry, &kernel, &lut)?;
        assert_eq!(generic, fast);

        // row padding is never written
        for y in 0..geometry.height() {
            let pad = y * geometry.stride() + geometry.width() * CHANNELS;
            let end = (y + 1) * geometry.stride();
            assert_eq!(&fast[pad..end], &src[pad..end]);
        }
        Ok(())
    }

    #[test]
    fn test_fast_path_rejects_other_sizes() -> Result<(), SmoothingError> {
        let lut = GammaLut::new()?;
        let geometry = FrameGeometry::packed(8, 8)?;
        let src = vec![0u8; geometry.frame_len()];
        let mut dst = src.clone();

        let res = convolve_3x3(&src, &mut dst, &geometry, &Kernel::gaussian(2, 1.5)?, &lut);
        assert!(matches!(res, Err(SmoothingError::InvalidParameter(_))));
        Ok(())
    }

    #[test]
    fn test_short_buffer() -> Result<(), SmoothingError> {
        let lut = GammaLut::new()?;
        let geometry = FrameGeometry::packed(8, 8)?;
        let src = vec![0u8; geometry.frame_len() - 1];
        let mut dst = vec![0u8; geometry.frame_len()];

        let res = convolve(&src, &mut dst, &geometry, &Kernel::gaussian(1, 1.5)?, &lut);
        assert_eq!(
            res,
            Err(SmoothingError::BufferTooSmall {
                len: 191,
                expected: 192
            })
        );
        Ok(())
    }

    #[test]
    fn test_reads_only_source() -> Result<(), SmoothingError> {
        let lut = GammaLut::new()?;
        let geometry = FrameGeometry::packed(6, 6)?;
        let kernel = Kernel::gaussian(1, 1.5)?;

        let src = random_frame(&geometry, 11);
        let mut from_copy = src.clone();
        convolve(&src, &mut from_copy, &geometry, &kernel, &lut)?;

        // a garbage destination interior must not change the result
        let mut from_garbage = src.clone();
        let (stop_x, stop_y) = interior(&geometry, &kernel);
        for y in 0..stop_y {
            for x in 0..stop_x {
                let o = geometry.offset(x, y);
                from_garbage[o..o + CHANNELS].fill(255);
            }
        }
        convolve(&src, &mut from_garbage, &geometry, &kernel, &lut)?;

        assert_eq!(from_copy, from_garbage);
        Ok(())
    }
}
