//! Cayula-Cornillon single image edge detection (SIED)
//!
//! - **window**: tiling into overlapping square windows
//! - **histogram**: adaptive histogram of a window
//! - **bimodality**: optimal split and goodness of segmentation
//! - **cohesion**: spatial coherence of the split
//! - **extract**: front pixels of a cohesive window
//! - **multiscale**: accumulation over window sizes

mod bimodality;
mod cohesion;
mod extract;
mod histogram;
mod multiscale;
mod window;

pub use bimodality::{analyze_samples, analyze_window, SplitDecision, ACCEPTANCE_THRESHOLD};
pub use cohesion::{binary_mask, cohesion, Cohesion, Mask, COHESION_THRESHOLDS};
pub use extract::extract_fronts;
pub use histogram::{Histogram, HistogramParams, MAX_HISTOGRAM_BINS};
pub use multiscale::{
    detect_fronts, detect_fronts_with_report, process_window, FrontDetection, FrontInput,
    FrontParams, FrontReport, ScaleReport, WindowOutcome,
};
pub use window::{Window, WindowSegmenter};
