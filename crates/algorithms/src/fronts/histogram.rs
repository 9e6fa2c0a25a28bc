//! Adaptive histogram of a window's valid samples

use serde::{Deserialize, Serialize};

/// Largest accepted value of `max_bins` and `fallback_bins`
pub const MAX_HISTOGRAM_BINS: usize = 1 << 16;

/// Parameters controlling histogram binning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramParams {
    /// Nominal bin width in sample units (default 0.125)
    pub bin_width: f64,
    /// Bin count used when the range collapses or would give no bins (default 10)
    pub fallback_bins: usize,
    /// Upper bound on the bin count (default 256)
    pub max_bins: usize,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            bin_width: 0.125,
            fallback_bins: 10,
            max_bins: 256,
        }
    }
}

/// Ordered `(bin_center, count)` pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<(f64, usize)>,
}

impl Histogram {
    /// Bin `values`, which must all be finite.
    ///
    /// The bin count is `ceil(range / bin_width)`, capped at `max_bins`; it
    /// becomes `fallback_bins` when the range is zero or the count would be 0.
    /// Returns `None` for an empty sample.
    pub fn build(values: &[f64], params: &HistogramParams) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = max - min;

        let mut n_bins = if range > 0.0 && params.bin_width > 0.0 {
            (range / params.bin_width).ceil() as usize
        } else {
            0
        };
        if n_bins == 0 {
            n_bins = params.fallback_bins.max(1);
        }
        n_bins = n_bins.min(params.max_bins.max(1));

        let width = range / n_bins as f64;
        let mut bins: Vec<(f64, usize)> = (0..n_bins)
            .map(|i| (min + (i as f64 + 0.5) * width, 0))
            .collect();

        for &v in values {
            let idx = if width > 0.0 {
                (((v - min) / width) as usize).min(n_bins - 1)
            } else {
                0
            };
            bins[idx].1 += 1;
        }

        Some(Self { bins })
    }

    pub fn bins(&self) -> &[(f64, usize)] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        self.bins.iter().map(|&(c, _)| c)
    }

    /// Total number of binned samples
    pub fn total(&self) -> usize {
        self.bins.iter().map(|&(_, n)| n).sum()
    }
}
