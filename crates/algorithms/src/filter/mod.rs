//! Flag-aware smoothing filters
//!
//! - **gaussian**: fixed binomial kernels (3, 5, 7, 9) with local-mean gap filling
//! - **median**: square median filter
//!
//! Both read the source raster and write a new one of identical shape.

mod gaussian;
mod kernels;
mod median;

pub use gaussian::gaussian_filter;
pub use kernels::{GaussianKernel, FALLBACK_SIZE};
pub use median::median_filter;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sied_core::raster::Raster;
use sied_core::{Algorithm, Error, FlagRaster, Result, ValidPixels};

/// Smoothing kernel family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Gaussian,
    Median,
}

/// Parameters for [`smooth`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    /// Kernel radius in cells (default 2, i.e. 5×5)
    pub radius: usize,
    pub kind: FilterKind,
    /// Which flags mark a sample as usable
    pub valid_pixels: ValidPixels,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            radius: 2,
            kind: FilterKind::Gaussian,
            valid_pixels: ValidPixels::default(),
        }
    }
}

/// Largest accepted smoothing radius
pub const MAX_FILTER_RADIUS: usize = 64;

impl SmoothingParams {
    /// Check the kernel radius
    pub fn validate(&self) -> Result<()> {
        if self.radius > MAX_FILTER_RADIUS {
            return Err(Error::invalid_parameter(
                "radius",
                self.radius,
                format!("must be at most {MAX_FILTER_RADIUS}"),
            ));
        }
        Ok(())
    }
}

/// A sample raster with its flags
#[derive(Debug, Clone)]
pub struct FilterInput {
    pub raster: Raster<f64>,
    pub flags: FlagRaster,
}

/// Convolution filter algorithm
#[derive(Debug, Clone, Default)]
pub struct ConvolutionFilter;

impl Algorithm for ConvolutionFilter {
    type Input = FilterInput;
    type Output = Raster<f64>;
    type Params = SmoothingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ConvolutionFilter"
    }

    fn description(&self) -> &'static str {
        "Gaussian or median smoothing that skips flagged samples"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        smooth(&input.raster, &input.flags, params.radius, params.kind, params.valid_pixels)
    }
}

/// Smooth `raster` with the chosen kernel family
///
/// # Arguments
/// * `raster` - Input samples, `NaN` where missing
/// * `flags` - Per-pixel flags, same shape as `raster`
/// * `radius` - Kernel radius in cells
/// * `kind` - Gaussian or median
/// * `rule` - Which flags mark a sample as usable
pub fn smooth(
    raster: &Raster<f64>,
    flags: &FlagRaster,
    radius: usize,
    kind: FilterKind,
    rule: ValidPixels,
) -> Result<Raster<f64>> {
    match kind {
        FilterKind::Gaussian => gaussian_filter(raster, flags, radius, rule),
        FilterKind::Median => median_filter(raster, flags, radius, rule),
    }
}

fn build_output(
    template: &Raster<f64>,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
) -> Result<Raster<f64>> {
    let mut output = template.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}
