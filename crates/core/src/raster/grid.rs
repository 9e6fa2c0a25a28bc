//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};

/// A dense 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in row-major order `(row, col)`.
/// Float rasters mark missing samples with `NaN`; an explicit no-data value
/// can be attached as well.
///
/// # Example
///
/// ```
/// use sied_core::Raster;
///
/// let mut raster: Raster<f64> = Raster::new(100, 100);
/// raster.set(10, 20, 42.0).unwrap();
/// assert_eq!(raster.get(10, 20).unwrap(), 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            nodata: None,
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            nodata: None,
        }
    }

    /// Create a raster from existing row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data, nodata: None }
    }

    /// Create a zero-filled companion raster of another element type
    pub fn with_same_meta<U: RasterElement>(&self, rows: usize, cols: usize) -> Raster<U> {
        Raster {
            data: Array2::zeros((rows, cols)),
            nodata: None,
        }
    }

    /// Create a raster with the same dimensions and no-data value, filled with a value
    pub fn like(&self, fill_value: T) -> Self {
        Self {
            data: Array2::from_elem(self.data.dim(), fill_value),
            nodata: self.nodata,
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with [`Error::SizeMismatch`] unless `other` has exactly this shape
    pub fn check_same_shape<U: RasterElement>(&self, other: &Raster<U>) -> Result<()> {
        check_shape(self.shape(), other.shape())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Set value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn set_unchecked(&mut self, row: usize, col: usize, value: T) {
        unsafe { *self.data.uget_mut((row, col)) = value; }
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the underlying data
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Consume the raster and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Get a row slice
    pub fn row(&self, row: usize) -> Result<ndarray::ArrayView1<'_, T>> {
        if row >= self.rows() {
            return Err(Error::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.data.row(row))
    }

    /// Borrow a rectangular window that lies fully inside the raster
    pub fn window(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<ArrayView2<'_, T>> {
        if row + rows > self.rows() || col + cols > self.cols() {
            return Err(Error::InvalidWindow {
                row,
                col,
                height: rows,
                width: cols,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.data.slice(s![row..row + rows, col..col + cols]))
    }

    /// Copy a rectangular window into a new raster
    pub fn sub_raster(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Raster<T>> {
        let view = self.window(row, col, rows, cols)?;
        Ok(Raster {
            data: view.to_owned(),
            nodata: self.nodata,
        })
    }

    // Metadata

    /// Get the no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    // Value checks

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Check if cell at (row, col) contains no-data
    pub fn is_nodata_at(&self, row: usize, col: usize) -> Result<bool> {
        let value = self.get(row, col)?;
        Ok(self.is_nodata(value))
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, count of valid cells)
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

pub(crate) fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(Error::SizeMismatch {
            er: expected.0,
            ec: expected.1,
            ar: actual.0,
            ac: actual.1,
        });
    }
    Ok(())
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}
