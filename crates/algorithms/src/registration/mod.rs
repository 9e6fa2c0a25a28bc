//! Image-to-image registration
//!
//! - **correlation**: Pearson correlation (streaming and two-pass)
//! - **register**: exhaustive translation search

mod correlation;
mod register;

pub use correlation::{pearson, pearson_two_pass, Correlation, TWO_PASS_EPSILON};
pub use register::{
    register_images, Registration, RegistrationInput, RegistrationParams, Registrator, Shift,
    MAX_SEARCH_MARGIN,
};
