//! Front pixels of a cohesive mask

use sied_core::raster::{Neighborhood, Raster};

use super::cohesion::Mask;

/// Mark class transitions in a binary mask.
///
/// A pixel is a front pixel when it is valid and its right or lower
/// neighbor is valid and of the other class. The last row and column are
/// never marked.
pub fn extract_fronts(mask: &Mask) -> Raster<u8> {
    let (rows, cols) = mask.dim();
    let mut fronts: Raster<u8> = Raster::new(rows, cols);
    let offsets = Neighborhood::Forward.offsets();

    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let here = mask[(row, col)];
            if here.is_nan() {
                continue;
            }
            let edge = offsets.iter().any(|&(dr, dc)| {
                let there = mask[(row + dr as usize, col + dc as usize)];
                !there.is_nan() && there != here
            });
            if edge {
                // SAFETY: row < rows - 1, col < cols - 1
                unsafe { fronts.set_unchecked(row, col, 1) };
            }
        }
    }

    fronts
}
