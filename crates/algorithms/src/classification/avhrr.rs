//! AVHRR land / ocean / cloud pixel classification
//!
//! Land and ocean are separated by the land/water fraction band. Clouds are
//! detected independently with a reflectance ratio test (albedo 1 over
//! albedo 2) and a channel 4 brightness temperature test whose thresholds
//! depend on the surface.

use ndarray::Zip;
use serde::{Deserialize, Serialize};
use sied_core::raster::Raster;
use sied_core::{Algorithm, Error, FlagRaster, PixelClass, PixelFlag, Result};
use tracing::debug;

/// Water percentage above which a pixel is ocean
pub const LAND_WATER_THRESHOLD: f64 = 50.0;

/// Second radiation constant, c2 = hc/k in cm·K
pub const PLANCK_C2: f64 = 1.438833;
/// First radiation constant, c1 = 2hc² in mW/(m²·sr·cm⁻⁴)
pub const PLANCK_C1: f64 = 1.1910659e-5;

/// Land pixels with `R <= 1.1` are cloudy
pub const LAND_RATIO_MAX: f64 = 1.1;
/// Land pixels with `T <= 244 K` are cloudy
pub const LAND_TEMPERATURE_MIN: f64 = 244.0;
/// Ocean pixels with `R <= 0.9` are cloudy
pub const OCEAN_RATIO_MAX: f64 = 0.9;
/// Ocean pixels with `T <= 270 K` are cloudy
pub const OCEAN_TEMPERATURE_MIN: f64 = 270.0;

/// Parameters for pixel classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Central wavenumber of AVHRR channel 4 in cm⁻¹ (default 927.0)
    pub wavenumber: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self { wavenumber: 927.0 }
    }
}

/// Bands consumed by the classifier, all of the same shape
#[derive(Debug, Clone)]
pub struct ClassifierInput {
    pub albedo1: Raster<f64>,
    pub albedo2: Raster<f64>,
    /// Channel 4 radiance
    pub bt4: Raster<f64>,
    /// Water percentage of each pixel, 0 = land, 100 = water
    pub land_water_fraction: Raster<f64>,
}

/// Pixel classifier algorithm
#[derive(Debug, Clone, Default)]
pub struct PixelClassifier;

impl Algorithm for PixelClassifier {
    type Input = ClassifierInput;
    type Output = FlagRaster;
    type Params = ClassifierParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "PixelClassifier"
    }

    fn description(&self) -> &'static str {
        "Classify AVHRR pixels as land, ocean or invalid and flag clouds"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        classify_pixels_with(
            &input.albedo1,
            &input.albedo2,
            &input.bt4,
            &input.land_water_fraction,
            &params,
        )
    }
}

// ---------------------------------------------------------------------------
// Per-pixel tests
// ---------------------------------------------------------------------------

/// Brightness temperature from a channel radiance (inverse Planck function)
///
/// `T = c2·ν / ln(1 + c1·ν³ / L)`
///
/// Only meaningful for positive radiance; callers reject the rest.
pub fn brightness_temperature(radiance: f64, wavenumber: f64) -> f64 {
    PLANCK_C2 * wavenumber / (1.0 + PLANCK_C1 * wavenumber.powi(3) / radiance).ln()
}

/// Classify one pixel.
///
/// Any non-finite input, a non-positive radiance, or a non-finite ratio or
/// temperature derived from the inputs makes the pixel [`PixelClass::Invalid`] without a cloud bit.
pub fn classify_pixel(
    albedo1: f64,
    albedo2: f64,
    bt4: f64,
    land_water_fraction: f64,
    params: &ClassifierParams,
) -> PixelFlag {
    if !(albedo1.is_finite() && albedo2.is_finite() && bt4.is_finite() && land_water_fraction.is_finite()) {
        return PixelFlag::INVALID;
    }

    if bt4 <= 0.0 {
        return PixelFlag::INVALID;
    }

    let t = brightness_temperature(bt4, params.wavenumber);
    let r = albedo1 / albedo2;
    if !t.is_finite() || !r.is_finite() {
        return PixelFlag::INVALID;
    }

    let class = if land_water_fraction > LAND_WATER_THRESHOLD {
        PixelClass::Ocean
    } else {
        PixelClass::Land
    };
    PixelFlag::new(class, is_cloudy(class, r, t))
}

/// Cloud test for a surface class, inclusive at both thresholds.
/// [`PixelClass::Invalid`] is never cloudy.
pub fn is_cloudy(class: PixelClass, ratio: f64, temperature: f64) -> bool {
    match class {
        PixelClass::Ocean => ratio <= OCEAN_RATIO_MAX || temperature <= OCEAN_TEMPERATURE_MIN,
        PixelClass::Land => ratio <= LAND_RATIO_MAX || temperature <= LAND_TEMPERATURE_MIN,
        PixelClass::Invalid => false,
    }
}

// ---------------------------------------------------------------------------
// Raster entry points
// ---------------------------------------------------------------------------

/// Classify every pixel with the default channel 4 wavenumber
///
/// # Arguments
/// * `albedo1` - Channel 1 albedo
/// * `albedo2` - Channel 2 albedo
/// * `bt4` - Channel 4 radiance
/// * `land_water_fraction` - Water percentage (0 = land, 100 = water)
///
/// # Errors
/// [`Error::SizeMismatch`] when the bands differ in shape.
pub fn classify_pixels(
    albedo1: &Raster<f64>,
    albedo2: &Raster<f64>,
    bt4: &Raster<f64>,
    land_water_fraction: &Raster<f64>,
) -> Result<FlagRaster> {
    classify_pixels_with(albedo1, albedo2, bt4, land_water_fraction, &ClassifierParams::default())
}

/// Classify every pixel with explicit parameters
pub fn classify_pixels_with(
    albedo1: &Raster<f64>,
    albedo2: &Raster<f64>,
    bt4: &Raster<f64>,
    land_water_fraction: &Raster<f64>,
    params: &ClassifierParams,
) -> Result<FlagRaster> {
    albedo1.check_same_shape(albedo2)?;
    albedo1.check_same_shape(bt4)?;
    albedo1.check_same_shape(land_water_fraction)?;

    let flags = Zip::from(albedo1.data())
        .and(albedo2.data())
        .and(bt4.data())
        .and(land_water_fraction.data())
        .map_collect(|&a1, &a2, &t4, &lwf| classify_pixel(a1, a2, t4, lwf, params));

    let flags = FlagRaster::from_array(flags);
    let s = flags.summary();
    debug!(
        land = s.land,
        ocean = s.ocean,
        invalid = s.invalid,
        cloudy = s.cloudy,
        "classified pixels"
    );
    Ok(flags)
}
