//! # SIED Algorithms
//!
//! Front detection and registration for AVHRR imagery.
//!
//! ## Available Algorithm Categories
//!
//! - **classification**: Land / ocean / cloud flags from AVHRR bands
//! - **filter**: Flag-aware Gaussian and median smoothing
//! - **fronts**: Cayula-Cornillon single image edge detection
//! - **registration**: Correlation-based translation search
//! - **config**: Serializable parameters of every stage

pub mod classification;
pub mod config;
pub mod filter;
pub mod fronts;
pub mod registration;

pub use classification::classify_pixels;
pub use config::EngineConfig;
pub use filter::smooth;
pub use fronts::detect_fronts;
pub use registration::register_images;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classification::{
        classify_pixels, classify_pixels_with, ClassifierParams, PixelClassifier,
    };
    pub use crate::config::EngineConfig;
    pub use crate::filter::{smooth, ConvolutionFilter, FilterKind, SmoothingParams};
    pub use crate::fronts::{
        detect_fronts, detect_fronts_with_report, FrontDetection, FrontParams, FrontReport,
    };
    pub use crate::registration::{
        pearson, register_images, Registration, RegistrationParams, Registrator, Shift,
    };
    pub use sied_core::prelude::*;
}
