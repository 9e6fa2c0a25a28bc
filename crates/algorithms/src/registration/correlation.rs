//! Pearson correlation of paired samples

use sied_core::{Error, Result};

/// Denominator floor of [`pearson_two_pass`]
pub const TWO_PASS_EPSILON: f64 = 1e-12;

/// Streaming Pearson accumulator (Welford co-moment update).
///
/// Pairs with a non-finite member are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correlation {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    m2_x: f64,
    m2_y: f64,
    c_xy: f64,
}

impl Correlation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one pair
    pub fn push(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.n += 1;
        let n = self.n as f64;
        let dx = x - self.mean_x;
        let dy = y - self.mean_y;
        self.mean_x += dx / n;
        self.mean_y += dy / n;
        // Deviations are from the previous means
        let w = (n - 1.0) / n;
        self.m2_x += dx * dx * w;
        self.m2_y += dy * dy * w;
        self.c_xy += dx * dy * w;
    }

    /// Number of pairs accepted so far
    pub fn count(&self) -> usize {
        self.n
    }

    /// Correlation coefficient, `NaN` with fewer than 2 pairs or a constant side
    pub fn value(&self) -> f64 {
        if self.n < 2 || self.m2_x <= 0.0 || self.m2_y <= 0.0 {
            return f64::NAN;
        }
        (self.c_xy / (self.m2_x * self.m2_y).sqrt()).clamp(-1.0, 1.0)
    }
}

fn check_lengths(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::SizeMismatch {
            er: 1,
            ec: x.len(),
            ar: 1,
            ac: y.len(),
        });
    }
    Ok(())
}

/// One-pass Pearson correlation of `x` and `y`.
///
/// # Errors
/// [`Error::SizeMismatch`] when the slices differ in length.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;
    let mut acc = Correlation::new();
    for (&a, &b) in x.iter().zip(y) {
        acc.push(a, b);
    }
    Ok(acc.value())
}

/// Two-pass Pearson correlation with an epsilon-stabilised denominator.
///
/// Cross-check for [`pearson`]; agrees with it to rounding on
/// well-conditioned data.
pub fn pearson_two_pass(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;

    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(a, b) in &pairs {
        let (da, db) = (a - mean_x, b - mean_y);
        sxy += da * db;
        sxx += da * da;
        syy += db * db;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return Ok(f64::NAN);
    }
    Ok(sxy / ((sxx * syy).sqrt() + TWO_PASS_EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 11) as f64 / (1u64 << 53) as f64 * 20.0 - 5.0
            })
            .collect()
    }

    #[test]
    fn test_symmetric() {
        let x = sample(200, 1);
        let y = sample(200, 2);
        assert_eq!(pearson(&x, &y).unwrap(), pearson(&y, &x).unwrap());
    }

    #[test]
    fn test_self_correlation_is_one() {
        let x = sample(100, 7);
        assert_relative_eq!(pearson(&x, &x).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_relationships() {
        let x: Vec<f64> = (0..50).map(f64::from).collect();
        let up: Vec<f64> = x.iter().map(|v| 3.0 * v + 2.0).collect();
        let down: Vec<f64> = x.iter().map(|v| -0.5 * v + 9.0).collect();
        assert_relative_eq!(pearson(&x, &up).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &down).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_agrees_with_two_pass() {
        let x = sample(500, 11);
        let y: Vec<f64> = sample(500, 12)
            .iter()
            .zip(&x)
            .map(|(noise, v)| v + 0.5 * noise)
            .collect();
        let one = pearson(&x, &y).unwrap();
        let two = pearson_two_pass(&x, &y).unwrap();
        assert_relative_eq!(one, two, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_pairs_skipped() {
        let x = [1.0, 2.0, f64::NAN, 4.0, 5.0];
        let y = [2.0, 4.0, 100.0, 8.0, f64::INFINITY];
        // Remaining pairs (1,2), (2,4), (4,8) lie on a line
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(pearson(&[1.0], &[2.0]).unwrap().is_nan());
        assert!(pearson(&[], &[]).unwrap().is_nan());
        assert!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).unwrap().is_nan());
        assert!(pearson_two_pass(&[3.0, 3.0], &[1.0, 2.0]).unwrap().is_nan());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(Error::SizeMismatch { ec: 2, ac: 1, .. })
        ));
        assert!(pearson_two_pass(&[1.0], &[1.0, 2.0]).is_err());
    }
}
