//! Multi-scale front accumulation
//!
//! The raster is smoothed once, then tiled at each window size in turn.
//! Fronts found at one size are OR-ed together, and each size's result is
//! merged into the global raster, which is clamped to 1.

use ndarray::{s, Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use sied_core::raster::Raster;
use sied_core::{Algorithm, Error, FlagRaster, Result, ValidPixels};
use tracing::{debug, trace};

use super::bimodality::{analyze_window, SplitDecision};
use super::cohesion::{binary_mask, cohesion, Cohesion};
use super::extract::extract_fronts;
use super::histogram::{HistogramParams, MAX_HISTOGRAM_BINS};
use super::window::WindowSegmenter;
use crate::filter::gaussian_filter;

/// Parameters for [`detect_fronts`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontParams {
    /// Smallest window size (default 16)
    pub min_window: usize,
    /// Window sizes stop before this value (default 60)
    pub max_window: usize,
    /// Increment between window sizes (default 8)
    pub window_step: usize,
    /// Overlap of neighboring windows in percent (default 50)
    pub overlap_percent: f64,
    /// Radius of the Gaussian applied before segmentation (default 2)
    pub smoothing_radius: usize,
    pub histogram: HistogramParams,
    /// Which flags mark a sample as usable
    pub valid_pixels: ValidPixels,
}

impl Default for FrontParams {
    fn default() -> Self {
        Self {
            min_window: 16,
            max_window: 60,
            window_step: 8,
            overlap_percent: 50.0,
            smoothing_radius: 2,
            histogram: HistogramParams::default(),
            valid_pixels: ValidPixels::default(),
        }
    }
}

impl FrontParams {
    /// Window sizes in ascending order: `min_window, min_window + step, ...`
    /// strictly below `max_window`
    pub fn window_sizes(&self) -> impl Iterator<Item = usize> {
        (self.min_window..self.max_window).step_by(self.window_step.max(1))
    }

    /// Check the window schedule and histogram settings
    pub fn validate(&self) -> Result<()> {
        if self.min_window < 2 {
            return Err(Error::invalid_parameter(
                "min_window",
                self.min_window,
                "must be at least 2",
            ));
        }
        if self.max_window <= self.min_window {
            return Err(Error::invalid_parameter(
                "max_window",
                self.max_window,
                format!("must exceed min_window ({})", self.min_window),
            ));
        }
        if self.window_step == 0 {
            return Err(Error::invalid_parameter("window_step", 0, "must be > 0"));
        }
        if !(0.0..100.0).contains(&self.overlap_percent) {
            return Err(Error::invalid_parameter(
                "overlap_percent",
                self.overlap_percent,
                "must be in [0, 100)",
            ));
        }
        let h = &self.histogram;
        if !(h.bin_width.is_finite() && h.bin_width > 0.0) {
            return Err(Error::invalid_parameter(
                "histogram.bin_width",
                h.bin_width,
                "must be finite and > 0",
            ));
        }
        for (name, bins) in [
            ("histogram.fallback_bins", h.fallback_bins),
            ("histogram.max_bins", h.max_bins),
        ] {
            if bins == 0 || bins > MAX_HISTOGRAM_BINS {
                return Err(Error::invalid_parameter(
                    name,
                    bins,
                    format!("must be in [1, {MAX_HISTOGRAM_BINS}]"),
                ));
            }
        }
        Ok(())
    }
}

/// What happened to one window
#[derive(Debug, Clone)]
pub struct WindowOutcome {
    pub decision: SplitDecision,
    /// Present when the window was bimodal
    pub cohesion: Option<Cohesion>,
    /// Present when the window was bimodal and cohesive
    pub fronts: Option<Raster<u8>>,
}

/// Run bimodality, cohesion and extraction on one window
pub fn process_window(window: ArrayView2<'_, f64>, params: &HistogramParams) -> WindowOutcome {
    let decision = analyze_window(window, params);
    if !decision.accepted {
        return WindowOutcome {
            decision,
            cohesion: None,
            fronts: None,
        };
    }

    let mask = binary_mask(window, decision.theta_optimum);
    let c = cohesion(&mask);
    let fronts = c.passes().then(|| extract_fronts(&mask));

    WindowOutcome {
        decision,
        cohesion: Some(c),
        fronts,
    }
}

/// Statistics of one window size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleReport {
    pub window_size: usize,
    pub stride: usize,
    /// Windows examined
    pub windows: usize,
    /// Windows whose histogram was bimodal
    pub bimodal: usize,
    /// Bimodal windows that also passed the cohesion gates
    pub cohesive: usize,
    /// Front pixels found at this size
    pub front_pixels: usize,
}

/// Per-scale statistics of a detection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontReport {
    pub scales: Vec<ScaleReport>,
    /// Front pixels in the merged raster
    pub front_pixels: usize,
}

/// Detect fronts over all window sizes.
///
/// # Arguments
/// * `raster` - Input samples, `NaN` where missing
/// * `flags` - Per-pixel flags, same shape as `raster`
/// * `params` - Window schedule and histogram settings
///
/// # Returns
/// A 0/1 raster of the same shape
pub fn detect_fronts(
    raster: &Raster<f64>,
    flags: &FlagRaster,
    params: &FrontParams,
) -> Result<Raster<u8>> {
    detect_fronts_with_report(raster, flags, params).map(|(fronts, _)| fronts)
}

/// [`detect_fronts`], also returning per-scale statistics
pub fn detect_fronts_with_report(
    raster: &Raster<f64>,
    flags: &FlagRaster,
    params: &FrontParams,
) -> Result<(Raster<u8>, FrontReport)> {
    params.validate()?;
    flags.check_matches(raster)?;

    let (rows, cols) = raster.shape();
    let smoothed = gaussian_filter(raster, flags, params.smoothing_radius, params.valid_pixels)?;

    let mut global: Array2<u8> = Array2::zeros((rows, cols));
    let mut report = FrontReport::default();

    // Larger windows fit nowhere in the raster
    let fits = rows.min(cols);
    for size in params.window_sizes().take_while(|&size| size <= fits) {
        let segmenter = WindowSegmenter::new(size, params.overlap_percent)?;
        let mut per_size: Array2<u8> = Array2::zeros((rows, cols));
        let mut scale = ScaleReport {
            window_size: size,
            stride: segmenter.stride(),
            ..Default::default()
        };

        for window in segmenter.windows(rows, cols) {
            scale.windows += 1;
            let outcome = process_window(window.view(&smoothed)?, &params.histogram);

            if !outcome.decision.accepted {
                continue;
            }
            scale.bimodal += 1;

            let Some(fronts) = outcome.fronts else {
                trace!(
                    row = window.row,
                    col = window.col,
                    size,
                    "bimodal window failed cohesion"
                );
                continue;
            };
            scale.cohesive += 1;

            let mut target = per_size.slice_mut(s![
                window.row..window.row + size,
                window.col..window.col + size
            ]);
            target.zip_mut_with(fronts.data(), |acc, &f| *acc |= f);
        }

        scale.front_pixels = per_size.iter().filter(|&&v| v > 0).count();

        Zip::from(&mut global)
            .and(&per_size)
            .for_each(|g, &p| *g = (*g + p).min(1));

        debug!(
            window_size = size,
            windows = scale.windows,
            bimodal = scale.bimodal,
            cohesive = scale.cohesive,
            front_pixels = scale.front_pixels,
            "front scale done"
        );
        report.scales.push(scale);
    }

    report.front_pixels = global.iter().filter(|&&v| v > 0).count();

    let mut output = raster.with_same_meta::<u8>(rows, cols);
    *output.data_mut() = global;
    Ok((output, report))
}

/// A sample raster with its flags
#[derive(Debug, Clone)]
pub struct FrontInput {
    pub raster: Raster<f64>,
    pub flags: FlagRaster,
}

/// Cayula-Cornillon single image edge detection
#[derive(Debug, Clone, Default)]
pub struct FrontDetection;

impl Algorithm for FrontDetection {
    type Input = FrontInput;
    type Output = Raster<u8>;
    type Params = FrontParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "FrontDetection"
    }

    fn description(&self) -> &'static str {
        "Multi-scale histogram front detection (Cayula-Cornillon SIED)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        detect_fronts(&input.raster, &input.flags, &params)
    }
}
