//! Raster data structures and operations

mod element;
mod grid;
mod neighborhood;
mod paste;

pub use element::RasterElement;
pub use grid::{Raster, RasterStatistics};
pub(crate) use grid::check_shape;
pub use neighborhood::Neighborhood;
pub use paste::paste;
