//! Median smoothing

use sied_core::raster::{Neighborhood, Raster};
use sied_core::{FlagRaster, Result, ValidPixels};

use super::build_output;

/// Apply a square median filter of radius `radius`.
///
/// For each interior cell whose own sample is valid, the `(2r+1)²` values
/// around it are sorted and the middle one is taken. Neighbor flags are not
/// consulted, but a `NaN` value anywhere in the neighborhood makes the output
/// `NaN`. The outer `radius` rows and columns are `NaN`.
///
/// # Errors
/// [`sied_core::Error::SizeMismatch`] when `flags` and `raster` differ in shape.
pub fn median_filter(
    raster: &Raster<f64>,
    flags: &FlagRaster,
    radius: usize,
    rule: ValidPixels,
) -> Result<Raster<f64>> {
    flags.check_matches(raster)?;

    let (rows, cols) = raster.shape();
    let interior = radius
        .checked_mul(2)
        .is_some_and(|span| rows > span && cols > span);
    if !interior {
        return build_output(raster, rows, cols, vec![f64::NAN; rows * cols]);
    }
    let offsets = Neighborhood::Square(radius).offsets();

    let output_data: Vec<f64> = (0..rows)
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            if row < radius || row + radius >= rows {
                return row_data;
            }

            let mut values: Vec<f64> = Vec::with_capacity(offsets.len());

            for (col, out) in row_data.iter_mut().enumerate().take(cols - radius).skip(radius) {
                let center = unsafe { raster.get_unchecked(row, col) };
                if center.is_nan() || !flags.is_valid(row, col, rule) {
                    continue;
                }

                values.clear();
                for &(dr, dc) in &offsets {
                    let nr = (row as isize + dr) as usize;
                    let nc = (col as isize + dc) as usize;
                    values.push(unsafe { raster.get_unchecked(nr, nc) });
                }

                if values.iter().any(|v| v.is_nan()) {
                    continue;
                }

                values.sort_by(|a, b| a.total_cmp(b));
                *out = values[values.len() / 2];
            }

            row_data
        })
        .collect();

    build_output(raster, rows, cols, output_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sied_core::PixelFlag;

    fn ocean(rows: usize, cols: usize) -> FlagRaster {
        FlagRaster::all(rows, cols, PixelFlag::ocean())
    }

    fn gradient_raster(size: usize) -> Raster<f64> {
        let mut r = Raster::new(size, size);
        for row in 0..size {
            for col in 0..size {
                r.set(row, col, (row * size + col) as f64).unwrap();
            }
        }
        r
    }

    #[test]
    fn test_median_of_gradient() {
        let r = gradient_raster(10);
        let out = median_filter(&r, &ocean(10, 10), 1, ValidPixels::OceanClear).unwrap();
        assert_eq!(out.get(5, 5).unwrap(), 55.0);
    }

    #[test]
    fn test_median_removes_spike() {
        let mut r = Raster::filled(7, 7, 1.0);
        r.set(3, 3, 500.0).unwrap();
        let out = median_filter(&r, &ocean(7, 7), 1, ValidPixels::OceanClear).unwrap();
        assert_eq!(out.get(3, 3).unwrap(), 1.0);
    }

    #[test]
    fn test_border_is_radius() {
        let r = Raster::filled(7, 7, 1.0);
        let out = median_filter(&r, &ocean(7, 7), 2, ValidPixels::OceanClear).unwrap();
        assert!(out.get(1, 3).unwrap().is_nan());
        assert!(out.get(3, 5).unwrap().is_nan());
        assert_eq!(out.get(2, 2).unwrap(), 1.0);
        assert_eq!(out.get(4, 4).unwrap(), 1.0);
    }

    #[test]
    fn test_radius_wider_than_raster_is_all_nan() {
        let r = Raster::filled(6, 6, 1.0);
        for radius in [3, usize::MAX / 2 + 1] {
            let out = median_filter(&r, &ocean(6, 6), radius, ValidPixels::OceanClear).unwrap();
            assert!(out.data().iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn test_invalid_center_passes_nan() {
        let r = Raster::filled(7, 7, 1.0);
        let mut flags = ocean(7, 7);
        flags.set(3, 3, PixelFlag::new(sied_core::PixelClass::Ocean, true)).unwrap();
        let out = median_filter(&r, &flags, 1, ValidPixels::OceanClear).unwrap();
        assert!(out.get(3, 3).unwrap().is_nan());
        // Neighbor flags are ignored
        assert_eq!(out.get(3, 4).unwrap(), 1.0);
    }

    #[test]
    fn test_nan_neighbor_is_contagious() {
        let mut r = Raster::filled(7, 7, 1.0);
        r.set(2, 2, f64::NAN).unwrap();
        let out = median_filter(&r, &ocean(7, 7), 1, ValidPixels::OceanClear).unwrap();
        assert!(out.get(3, 3).unwrap().is_nan());
        assert_eq!(out.get(4, 4).unwrap(), 1.0);
    }

    #[test]
    fn test_radius_zero_copies_valid_samples() {
        let r = gradient_raster(4);
        let out = median_filter(&r, &ocean(4, 4), 0, ValidPixels::OceanClear).unwrap();
        assert_eq!(out.data(), r.data());
    }
}
