//! Flag-aware Gaussian smoothing
//!
//! Invalid samples under the kernel are not propagated: each one is replaced
//! by the mean of the valid samples in a smaller window centred on it.

use sied_core::raster::{Neighborhood, Raster};
use sied_core::{FlagRaster, Result, ValidPixels};

use super::kernels::GaussianKernel;
use super::build_output;

/// Radius of the gap-fill window used for a kernel of radius `r`
pub(crate) fn gap_fill_radius(r: usize) -> usize {
    r.div_ceil(2).max(1)
}

/// Apply the Gaussian kernel of radius `radius` (size `2·radius + 1`).
///
/// Sizes 3, 5, 7 and 9 have tables; any other size uses the 5×5 kernel.
/// With `r` the radius of the kernel actually used:
/// - the outer `2·r` rows and columns are `NaN`,
/// - an invalid center (flag or `NaN`) gives `NaN`,
/// - an invalid sample under the footprint is replaced by the mean of valid
///   samples within `max(1, ceil(r/2))` of it; if there are none the output
///   cell is `NaN`.
///
/// # Errors
/// [`sied_core::Error::SizeMismatch`] when `flags` and `raster` differ in shape.
pub fn gaussian_filter(
    raster: &Raster<f64>,
    flags: &FlagRaster,
    radius: usize,
    rule: ValidPixels,
) -> Result<Raster<f64>> {
    flags.check_matches(raster)?;

    let (rows, cols) = raster.shape();
    let kernel = GaussianKernel::for_radius(radius);
    let r = kernel.radius();
    let border = 2 * r;
    let gap_offsets = Neighborhood::Square(gap_fill_radius(r)).offsets_no_center();

    let valid = |row: usize, col: usize| -> Option<f64> {
        let v = unsafe { raster.get_unchecked(row, col) };
        if v.is_nan() || !flags.is_valid(row, col, rule) {
            None
        } else {
            Some(v)
        }
    };

    let local_mean = |row: usize, col: usize| -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for &(dr, dc) in &gap_offsets {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
                continue;
            }
            if let Some(v) = valid(nr as usize, nc as usize) {
                sum += v;
                n += 1;
            }
        }
        (n > 0).then(|| sum / n as f64)
    };

    let interior = rows > 2 * border && cols > 2 * border;

    let output_data: Vec<f64> = (0..rows)
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            if !interior || row < border || row + border >= rows {
                return row_data;
            }

            for (col, out) in row_data.iter_mut().enumerate().take(cols - border).skip(border) {
                if valid(row, col).is_none() {
                    continue;
                }

                let mut sum = 0.0;
                let mut filled = true;

                for (dr, dc, w) in kernel.taps() {
                    let nr = (row as isize + dr) as usize;
                    let nc = (col as isize + dc) as usize;
                    match valid(nr, nc).or_else(|| local_mean(nr, nc)) {
                        Some(v) => sum += w * v,
                        None => {
                            filled = false;
                            break;
                        }
                    }
                }

                if filled {
                    *out = sum;
                }
            }

            row_data
        })
        .collect();

    build_output(raster, rows, cols, output_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sied_core::PixelFlag;

    fn ocean(rows: usize, cols: usize) -> FlagRaster {
        FlagRaster::all(rows, cols, PixelFlag::ocean())
    }

    #[test]
    fn test_gap_fill_radius() {
        assert_eq!(gap_fill_radius(1), 1);
        assert_eq!(gap_fill_radius(2), 1);
        assert_eq!(gap_fill_radius(3), 2);
        assert_eq!(gap_fill_radius(4), 2);
    }

    #[test]
    fn test_uniform_is_preserved() {
        let r = Raster::filled(12, 12, 7.5);
        let out = gaussian_filter(&r, &ocean(12, 12), 2, ValidPixels::OceanClear).unwrap();
        assert_relative_eq!(out.get(6, 6).unwrap(), 7.5, epsilon = 1e-12);
        assert_relative_eq!(out.get(4, 7).unwrap(), 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_border_is_twice_radius() {
        let r = Raster::filled(12, 12, 1.0);
        let out = gaussian_filter(&r, &ocean(12, 12), 1, ValidPixels::OceanClear).unwrap();
        for i in 0..12 {
            assert!(out.get(1, i).unwrap().is_nan());
            assert!(out.get(i, 10).unwrap().is_nan());
        }
        assert!(!out.get(2, 2).unwrap().is_nan());
        assert!(!out.get(9, 9).unwrap().is_nan());
    }

    #[test]
    fn test_unsupported_radius_uses_5x5() {
        let r = Raster::filled(12, 12, 1.0);
        let out = gaussian_filter(&r, &ocean(12, 12), 6, ValidPixels::OceanClear).unwrap();
        assert!(out.get(3, 6).unwrap().is_nan());
        assert_relative_eq!(out.get(4, 6).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_neighbor_filled_with_local_mean() {
        let mut r = Raster::filled(9, 9, 2.0);
        // A flagged pixel with a wild value next to the center must not leak
        r.set(4, 5, 1000.0).unwrap();
        let mut flags = ocean(9, 9);
        flags.set(4, 5, PixelFlag::land()).unwrap();

        let out = gaussian_filter(&r, &flags, 1, ValidPixels::OceanClear).unwrap();
        assert_relative_eq!(out.get(4, 4).unwrap(), 2.0, epsilon = 1e-12);
        // Center itself invalid stays invalid
        assert!(out.get(4, 5).unwrap().is_nan());
    }

    #[test]
    fn test_nan_neighbor_filled() {
        let mut r = Raster::filled(9, 9, 3.0);
        r.set(3, 3, f64::NAN).unwrap();
        let out = gaussian_filter(&r, &ocean(9, 9), 1, ValidPixels::OceanClear).unwrap();
        assert_relative_eq!(out.get(4, 4).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_valid_neighbor_gives_nan() {
        // 7x7 kernel, gap window radius 2. The corner tap (5,5) of center
        // (8,8) sits in a 5x5 block of NaN, so nothing can fill it.
        let mut r = Raster::filled(17, 17, 3.0);
        for row in 3..=7 {
            for col in 3..=7 {
                r.set(row, col, f64::NAN).unwrap();
            }
        }
        let out = gaussian_filter(&r, &ocean(17, 17), 3, ValidPixels::OceanClear).unwrap();
        assert!(out.get(8, 8).unwrap().is_nan());
        // Further away the same block is bridged by the gap fill
        assert_relative_eq!(out.get(10, 10).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let mut r = Raster::filled(9, 9, 1.0);
        r.set(4, 4, 9.0).unwrap();
        let before = r.clone();
        let _ = gaussian_filter(&r, &ocean(9, 9), 1, ValidPixels::OceanClear).unwrap();
        assert_eq!(r.data(), before.data());
    }

    #[test]
    fn test_shape_mismatch() {
        let r = Raster::filled(9, 9, 1.0);
        assert!(gaussian_filter(&r, &ocean(8, 9), 1, ValidPixels::OceanClear).is_err());
    }
}
