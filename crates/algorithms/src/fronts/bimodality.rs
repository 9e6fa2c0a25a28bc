//! Histogram bimodality test (Cayula & Cornillon, 1992)
//!
//! Every bin center is tried as a threshold. The one maximising the
//! between-class variance `V` wins, and the window is bimodal when
//! `V / (V + W)` exceeds [`ACCEPTANCE_THRESHOLD`], `W` being the
//! within-class variance at that threshold.

use ndarray::ArrayView2;

use super::histogram::{Histogram, HistogramParams};

/// Goodness of segmentation a window must exceed to be bimodal
pub const ACCEPTANCE_THRESHOLD: f64 = 0.7;

/// Relative tolerance under which two between-class variances are equal
const TIE_TOLERANCE: f64 = 1e-12;

/// Outcome of the bimodality test for one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitDecision {
    /// Threshold separating the two populations, `NaN` when none exists
    pub theta_optimum: f64,
    pub accepted: bool,
    /// `V / (V + W)` at the optimum, 0 when no split exists
    pub goodness: f64,
    pub valid_count: usize,
    pub nan_count: usize,
}

impl SplitDecision {
    fn rejected(valid_count: usize, nan_count: usize) -> Self {
        Self {
            theta_optimum: f64::NAN,
            accepted: false,
            goodness: 0.0,
            valid_count,
            nan_count,
        }
    }
}

/// Class statistics for one candidate threshold
#[derive(Debug, Clone, Copy)]
struct Split {
    between: f64,
    within: f64,
}

/// Test the samples of a window, `NaN` entries excluded
pub fn analyze_window(window: ArrayView2<'_, f64>, params: &HistogramParams) -> SplitDecision {
    let mut values = Vec::with_capacity(window.len());
    let mut nan_count = 0;
    for &v in window.iter() {
        if v.is_nan() {
            nan_count += 1;
        } else {
            values.push(v);
        }
    }
    analyze_samples(&values, nan_count, params)
}

/// Test a list of valid samples; `nan_count` is only reported back
pub fn analyze_samples(values: &[f64], nan_count: usize, params: &HistogramParams) -> SplitDecision {
    let Some(histogram) = Histogram::build(values, params) else {
        return SplitDecision::rejected(0, nan_count);
    };

    // (split at the first maximum, first and last bin of its contiguous tie run)
    let mut best: Option<(Split, usize, usize)> = None;

    for (i, center) in histogram.centers().enumerate() {
        // A bin with an empty side has no defined mean and cannot be a split
        let Some(split) = split_at(values, center) else {
            continue;
        };

        match &mut best {
            None => best = Some((split, i, i)),
            Some((top, _, last)) => {
                let tolerance = TIE_TOLERANCE * top.between.abs().max(f64::MIN_POSITIVE);
                if split.between - top.between > tolerance {
                    best = Some((split, i, i));
                } else if (split.between - top.between).abs() <= tolerance && i == *last + 1 {
                    *last = i;
                }
            }
        }
    }

    let Some((split, first, last)) = best else {
        return SplitDecision::rejected(values.len(), nan_count);
    };

    let centers = histogram.bins();
    // A plateau of equal splits is resolved to its middle. Ties separated
    // from it by a lower bin are ignored.
    let theta = 0.5 * (centers[first].0 + centers[last].0);

    let total = split.between + split.within;
    let goodness = if total > 0.0 { split.between / total } else { 0.0 };

    SplitDecision {
        theta_optimum: theta,
        accepted: goodness > ACCEPTANCE_THRESHOLD,
        goodness,
        valid_count: values.len(),
        nan_count,
    }
}

/// Between- and within-class variance for `left < theta <= right`
fn split_at(values: &[f64], theta: f64) -> Option<Split> {
    let (mut n_l, mut sum_l, mut n_r, mut sum_r) = (0usize, 0.0, 0usize, 0.0);
    for &v in values {
        if v < theta {
            n_l += 1;
            sum_l += v;
        } else {
            n_r += 1;
            sum_r += v;
        }
    }
    if n_l == 0 || n_r == 0 {
        return None;
    }

    let mean_l = sum_l / n_l as f64;
    let mean_r = sum_r / n_r as f64;

    let (mut ss_l, mut ss_r) = (0.0, 0.0);
    for &v in values {
        if v < theta {
            ss_l += (v - mean_l) * (v - mean_l);
        } else {
            ss_r += (v - mean_r) * (v - mean_r);
        }
    }
    let var_l = ss_l / n_l as f64;
    let var_r = ss_r / n_r as f64;

    let n = values.len() as f64;
    let (p_l, p_r) = (n_l as f64 / n, n_r as f64 / n);
    let within = p_l * var_l + p_r * var_r;
    let between = p_l * p_r * (mean_l - mean_r) * (mean_l - mean_r);

    Some(Split { between, within })
}
