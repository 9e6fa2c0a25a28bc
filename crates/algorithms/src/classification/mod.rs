//! Pixel classification for AVHRR scenes
//!
//! - **avhrr**: land / ocean / invalid base class plus an independent cloud bit

mod avhrr;

pub use avhrr::{
    brightness_temperature, classify_pixel, classify_pixels, classify_pixels_with, is_cloudy,
    ClassifierInput, ClassifierParams, PixelClassifier, LAND_RATIO_MAX, LAND_TEMPERATURE_MIN,
    LAND_WATER_THRESHOLD, OCEAN_RATIO_MAX, OCEAN_TEMPERATURE_MIN, PLANCK_C1, PLANCK_C2,
};
