//! Precomputed Gaussian kernels
//!
//! Rows of Pascal's triangle scaled to unit sum. Their outer product is the
//! usual integer approximation of a Gaussian, and because every divisor is a
//! power of two the weights sum to exactly 1.

const BINOMIAL_3: [f64; 3] = [0.25, 0.5, 0.25];
const BINOMIAL_5: [f64; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];
const BINOMIAL_7: [f64; 7] = [
    0.015625, 0.09375, 0.234375, 0.3125, 0.234375, 0.09375, 0.015625,
];
const BINOMIAL_9: [f64; 9] = [
    0.00390625, 0.03125, 0.109375, 0.21875, 0.2734375, 0.21875, 0.109375, 0.03125, 0.00390625,
];

/// Kernel size used when the requested one has no table
pub const FALLBACK_SIZE: usize = 5;

/// A square, normalized Gaussian kernel
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    size: usize,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Kernel of `size`×`size` for size 3, 5, 7 or 9; anything else gets the 5×5 kernel
    pub fn new(size: usize) -> Self {
        let row: &[f64] = match size {
            3 => &BINOMIAL_3,
            5 => &BINOMIAL_5,
            7 => &BINOMIAL_7,
            9 => &BINOMIAL_9,
            _ => &BINOMIAL_5,
        };
        let size = row.len();
        let mut weights = Vec::with_capacity(size * size);
        for &wr in row {
            for &wc in row {
                weights.push(wr * wc);
            }
        }
        Self { size, weights }
    }

    /// Kernel for a radius, i.e. size `2·radius + 1`
    pub fn for_radius(radius: usize) -> Self {
        Self::new(radius.saturating_mul(2).saturating_add(1))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weights in row-major order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `(dr, dc, weight)` for every tap
    pub fn taps(&self) -> impl Iterator<Item = (isize, isize, f64)> + '_ {
        let r = self.radius() as isize;
        let size = self.size;
        self.weights.iter().enumerate().map(move |(i, &w)| {
            ((i / size) as isize - r, (i % size) as isize - r, w)
        })
    }
}
