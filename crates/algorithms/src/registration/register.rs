//! Brute-force registration by maximum correlation

use ndarray::Zip;
use serde::{Deserialize, Serialize};
use sied_core::raster::Raster;
use sied_core::{Algorithm, Error, Result};
use tracing::debug;

use super::correlation::Correlation;

/// Offset of the reference inside the search raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    /// Column offset
    pub dx: usize,
    /// Row offset
    pub dy: usize,
    /// Correlation at this offset, `NaN` when none was finite
    pub correlation: f64,
}

impl Shift {
    /// Signed `(dx, dy)` displacement relative to the centred position
    pub fn offset_from_center(&self, margin: usize) -> (isize, isize) {
        (
            self.dx as isize - margin as isize,
            self.dy as isize - margin as isize,
        )
    }
}

/// Best shift and the search raster cut at that shift
#[derive(Debug, Clone)]
pub struct Registration {
    pub shift: Shift,
    /// Reference-sized sub-raster of the search raster
    pub aligned: Raster<f64>,
}

/// Parameters for [`Registrator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationParams {
    /// Search margin in pixels on every side (default 8)
    pub max_margin: usize,
}

impl Default for RegistrationParams {
    fn default() -> Self {
        Self { max_margin: 8 }
    }
}

/// Largest accepted search margin
pub const MAX_SEARCH_MARGIN: usize = 1024;

impl RegistrationParams {
    /// Check the search margin
    pub fn validate(&self) -> Result<()> {
        if self.max_margin > MAX_SEARCH_MARGIN {
            return Err(Error::invalid_parameter(
                "max_margin",
                self.max_margin,
                format!("must be at most {MAX_SEARCH_MARGIN}"),
            ));
        }
        Ok(())
    }
}

/// Find the offset of `reference` within `search` maximising correlation.
///
/// `search` must be `reference` grown by `max_margin` on every side. Every
/// offset `dx, dy ∈ [0, 2·max_margin]` is tried with `dx` in the outer loop.
/// Offsets whose correlation is `NaN` are skipped, and only a strictly
/// greater value replaces the current best, so ties keep the lowest `dx`
/// and then the lowest `dy`. With no finite correlation the centred shift
/// is returned with a `NaN` correlation.
///
/// # Errors
/// [`Error::SizeMismatch`] when `search` does not have the required shape,
/// [`Error::InvalidParameter`] when that shape is not representable.
pub fn register_images(
    reference: &Raster<f64>,
    search: &Raster<f64>,
    max_margin: usize,
) -> Result<Registration> {
    let (rows, cols) = reference.shape();
    let span = max_margin
        .checked_mul(2)
        .ok_or_else(|| Error::invalid_parameter("max_margin", max_margin, "search span overflows"))?;
    let grown = |dim: usize| {
        dim.checked_add(span).ok_or_else(|| {
            Error::invalid_parameter("max_margin", max_margin, "search shape overflows")
        })
    };
    let expected = (grown(rows)?, grown(cols)?);
    if search.shape() != expected {
        return Err(Error::SizeMismatch {
            er: expected.0,
            ec: expected.1,
            ar: search.rows(),
            ac: search.cols(),
        });
    }

    let mut best = Shift {
        dx: max_margin,
        dy: max_margin,
        correlation: f64::NAN,
    };

    for dx in 0..=span {
        for dy in 0..=span {
            let candidate = search.window(dy, dx, rows, cols)?;
            let mut acc = Correlation::new();
            Zip::from(reference.view())
                .and(candidate)
                .for_each(|&a, &b| acc.push(a, b));
            let r = acc.value();

            if r.is_nan() {
                continue;
            }
            if best.correlation.is_nan() || r > best.correlation {
                best = Shift { dx, dy, correlation: r };
            }
        }
    }

    let (off_x, off_y) = best.offset_from_center(max_margin);
    debug!(
        dx = best.dx,
        dy = best.dy,
        off_x,
        off_y,
        correlation = best.correlation,
        "registration best shift"
    );

    let aligned = search.sub_raster(best.dy, best.dx, rows, cols)?;
    Ok(Registration { shift: best, aligned })
}

/// Reference raster and the larger raster to search
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub reference: Raster<f64>,
    pub search: Raster<f64>,
}

/// Correlation-maximising image registration
#[derive(Debug, Clone, Default)]
pub struct Registrator;

impl Algorithm for Registrator {
    type Input = RegistrationInput;
    type Output = Registration;
    type Params = RegistrationParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Registrator"
    }

    fn description(&self) -> &'static str {
        "Brute-force translation search maximising Pearson correlation"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        register_images(&input.reference, &input.search, params.max_margin)
    }
}
