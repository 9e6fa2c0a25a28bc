//! Tiling a raster into overlapping square windows

use ndarray::ArrayView2;
use sied_core::raster::Raster;
use sied_core::{Error, RasterElement, Result};

/// A square window with its top-left corner at (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub row: usize,
    pub col: usize,
    pub size: usize,
}

impl Window {
    /// Borrow the window's samples
    pub fn view<'a, T: RasterElement>(&self, raster: &'a Raster<T>) -> Result<ArrayView2<'a, T>> {
        raster.window(self.row, self.col, self.size, self.size)
    }
}

/// Enumerates evenly spaced window origins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSegmenter {
    size: usize,
    stride: usize,
}

impl WindowSegmenter {
    /// Windows of `size`×`size` overlapping by `overlap_percent`.
    ///
    /// The stride is `round(size · (1 − overlap/100))`, at least 1.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] for a zero size or an overlap outside `[0, 100)`.
    pub fn new(size: usize, overlap_percent: f64) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_parameter("window_size", size, "must be > 0"));
        }
        if !(0.0..100.0).contains(&overlap_percent) {
            return Err(Error::invalid_parameter(
                "overlap_percent",
                overlap_percent,
                "must be in [0, 100)",
            ));
        }
        let stride = (size as f64 * (1.0 - overlap_percent / 100.0)).round().max(1.0) as usize;
        Ok(Self { size, stride })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Window origins along one axis of length `dim`.
    ///
    /// `floor((dim − size)/stride) + 1` origins at multiples of the stride;
    /// pixels past the last window are left uncovered. Empty when the axis is
    /// shorter than the window.
    pub fn origins(&self, dim: usize) -> Vec<usize> {
        if dim < self.size {
            return Vec::new();
        }
        let count = (dim - self.size) / self.stride;
        (0..=count).map(|k| k * self.stride).collect()
    }

    /// All windows of a `rows`×`cols` raster, row-major by origin
    pub fn windows(&self, rows: usize, cols: usize) -> Vec<Window> {
        let col_origins = self.origins(cols);
        self.origins(rows)
            .into_iter()
            .flat_map(|row| {
                col_origins.iter().map(move |&col| Window {
                    row,
                    col,
                    size: self.size,
                })
            })
            .collect()
    }
}
