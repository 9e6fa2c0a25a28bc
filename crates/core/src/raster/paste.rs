//! Writing a sub-raster into a larger destination

use crate::error::{Error, Result};
use ndarray::{s, ArrayView2, ArrayViewMut2};

/// Copy `src` into `dest` with its top-left corner at `(row, col)`.
///
/// One function for every element type and every offset; the source must fit
/// entirely inside the destination.
///
/// ```
/// use sied_core::{paste, Raster};
///
/// let mut dest: Raster<u8> = Raster::new(4, 4);
/// let src: Raster<u8> = Raster::filled(2, 2, 1);
/// paste(dest.view_mut(), src.view(), 1, 2).unwrap();
/// assert_eq!(dest.get(2, 3).unwrap(), 1);
/// assert_eq!(dest.get(0, 0).unwrap(), 0);
/// ```
pub fn paste<T: Copy>(
    mut dest: ArrayViewMut2<'_, T>,
    src: ArrayView2<'_, T>,
    row: usize,
    col: usize,
) -> Result<()> {
    let (rows, cols) = dest.dim();
    let (h, w) = src.dim();
    if row + h > rows || col + w > cols {
        return Err(Error::InvalidWindow {
            row,
            col,
            height: h,
            width: w,
            rows,
            cols,
        });
    }
    dest.slice_mut(s![row..row + h, col..col + w]).assign(&src);
    Ok(())
}
