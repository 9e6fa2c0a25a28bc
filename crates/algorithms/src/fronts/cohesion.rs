//! Spatial cohesion of a thresholded window
//!
//! A genuine front separates two compact populations: most neighbors of a
//! class-1 pixel are class 1, and likewise for class 0. Scattered noise that
//! happens to be bimodal fails this test.

use ndarray::{Array2, ArrayView2};

/// Minimum cohesion of class 1, class 0 and both, each strictly exceeded
pub const COHESION_THRESHOLDS: [f64; 3] = [0.90, 0.90, 0.92];

/// Binary window: 0.0, 1.0, or `NaN` where the sample was missing
pub type Mask = Array2<f64>;

/// Threshold a window: `NaN` stays `NaN`, `<= theta` becomes 0, above becomes 1
pub fn binary_mask(window: ArrayView2<'_, f64>, theta: f64) -> Mask {
    window.mapv(|v| {
        if v.is_nan() {
            f64::NAN
        } else if v <= theta {
            0.0
        } else {
            1.0
        }
    })
}

/// Cohesion ratios `[C1, C2, C]` of a mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cohesion {
    pub values: [f64; 3],
}

impl Cohesion {
    /// Whether every ratio exceeds its gate in [`COHESION_THRESHOLDS`]
    pub fn passes(&self) -> bool {
        self.values
            .iter()
            .zip(COHESION_THRESHOLDS.iter())
            .all(|(v, t)| v > t)
    }
}

/// Count same-class neighbor pairs over the right and lower neighbors.
///
/// The last row and column are not visited as pair origins. Pairs with a
/// `NaN` member are skipped. `T1`/`T2` count pairs touching class 1/0,
/// `R1`/`R2` pairs that are both 1/both 0. A zero denominator gives 0.
pub fn cohesion(mask: &Mask) -> Cohesion {
    let (rows, cols) = mask.dim();
    let (mut t1, mut t2, mut r1, mut r2) = (0u64, 0u64, 0u64, 0u64);

    let mut count = |a: f64, b: f64| {
        if a.is_nan() || b.is_nan() {
            return;
        }
        let (a1, b1) = (a == 1.0, b == 1.0);
        if a1 || b1 {
            t1 += 1;
        }
        if !a1 || !b1 {
            t2 += 1;
        }
        match (a1, b1) {
            (true, true) => r1 += 1,
            (false, false) => r2 += 1,
            _ => {}
        }
    };

    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let here = mask[(row, col)];
            count(here, mask[(row, col + 1)]);
            count(here, mask[(row + 1, col)]);
        }
    }

    let ratio = |num: u64, den: u64| if den == 0 { 0.0 } else { num as f64 / den as f64 };

    Cohesion {
        values: [ratio(r1, t1), ratio(r2, t2), ratio(r1 + r2, t1 + t2)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn split_mask(size: usize) -> Mask {
        Array2::from_shape_fn((size, size), |(_, c)| if c < size / 2 { 0.0 } else { 1.0 })
    }

    #[test]
    fn test_binary_mask() {
        let w = ndarray::arr2(&[[0.2, 0.5, f64::NAN], [0.7, 0.5, 1.0]]);
        let m = binary_mask(w.view(), 0.5);
        assert_eq!(m[(0, 0)], 0.0);
        assert_eq!(m[(0, 1)], 0.0);
        assert!(m[(0, 2)].is_nan());
        assert_eq!(m[(1, 0)], 1.0);
        assert_eq!(m[(1, 2)], 1.0);
    }

    #[test]
    fn test_clean_split_is_cohesive() {
        let c = cohesion(&split_mask(48));
        assert!(c.passes());
        // Per origin row: R1 = 46, T1 = 47, R2 = 47, T2 = 48
        assert_relative_eq!(c.values[0], 46.0 / 47.0, epsilon = 1e-12);
        assert_relative_eq!(c.values[1], 47.0 / 48.0, epsilon = 1e-12);
        assert_relative_eq!(c.values[2], 93.0 / 95.0, epsilon = 1e-12);
    }

    #[test]
    fn test_checkerboard_fails() {
        let m = Array2::from_shape_fn((16, 16), |(r, c)| ((r + c) % 2) as f64);
        let c = cohesion(&m);
        assert_eq!(c.values, [0.0, 0.0, 0.0]);
        assert!(!c.passes());
    }

    #[test]
    fn test_all_nan_gives_zero() {
        let m = Array2::from_elem((8, 8), f64::NAN);
        assert_eq!(cohesion(&m).values, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_class_fails_other_gate() {
        let m = Array2::from_elem((8, 8), 1.0);
        let c = cohesion(&m);
        assert_eq!(c.values[0], 1.0);
        assert_eq!(c.values[1], 0.0);
        assert!(!c.passes());
    }

    #[test]
    fn test_values_bounded_for_generated_masks() {
        // Linear congruential pattern with holes
        let mut state: u64 = 12345;
        for density in [0.1, 0.5, 0.9] {
            let m = Array2::from_shape_fn((24, 24), |_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let u = (state >> 11) as f64 / (1u64 << 53) as f64;
                if u < 0.05 {
                    f64::NAN
                } else if u < density {
                    1.0
                } else {
                    0.0
                }
            });
            let c = cohesion(&m);
            assert!(c.values.iter().all(|v| (0.0..=1.0).contains(v)), "{:?}", c.values);
        }
    }
}
