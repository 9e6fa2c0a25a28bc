//! Engine configuration
//!
//! Every section falls back to its defaults when omitted, so `{}` is a
//! complete configuration.

use serde::{Deserialize, Serialize};
use sied_core::{Error, Result};

use crate::classification::ClassifierParams;
use crate::filter::SmoothingParams;
use crate::fronts::FrontParams;
use crate::registration::RegistrationParams;

/// Parameters of every pipeline stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classification: ClassifierParams,
    /// Standalone [`crate::filter::smooth`] and `ConvolutionFilter` runs.
    /// Front detection smooths with `fronts.smoothing_radius` and
    /// `fronts.valid_pixels` instead.
    pub smoothing: SmoothingParams,
    pub fronts: FrontParams,
    pub registration: RegistrationParams,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("parsing engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("serializing engine config: {e}")))
    }

    /// Check values that would make a stage fail or loop forever
    pub fn validate(&self) -> Result<()> {
        let nu = self.classification.wavenumber;
        if !(nu.is_finite() && nu > 0.0) {
            return Err(Error::invalid_parameter(
                "classification.wavenumber",
                nu,
                "must be finite and > 0",
            ));
        }
        self.smoothing.validate()?;
        self.fronts.validate()?;
        self.registration.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterKind;
    use sied_core::ValidPixels;

    #[test]
    fn test_empty_object_gives_defaults() {
        let c = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(c.fronts.window_sizes().collect::<Vec<_>>(), vec![16, 24, 32, 40, 48, 56]);
        assert_eq!(c.fronts.overlap_percent, 50.0);
        assert_eq!(c.smoothing.radius, 2);
        assert_eq!(c.registration.max_margin, 8);
        assert_eq!(c.classification.wavenumber, 927.0);
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "smoothing": { "kind": "median", "radius": 1 },
            "fronts": { "min_window": 24, "valid_pixels": "clear",
                        "histogram": { "bin_width": 0.25 } }
        }"#;
        let c = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(c.smoothing.kind, FilterKind::Median);
        assert_eq!(c.smoothing.radius, 1);
        assert_eq!(c.fronts.min_window, 24);
        assert_eq!(c.fronts.max_window, 60);
        assert_eq!(c.fronts.valid_pixels, ValidPixels::Clear);
        assert_eq!(c.fronts.histogram.bin_width, 0.25);
        assert_eq!(c.fronts.histogram.max_bins, 256);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_step = r#"{ "fronts": { "window_step": 0 } }"#;
        assert!(matches!(
            EngineConfig::from_json_str(bad_step),
            Err(Error::InvalidParameter { name: "window_step", .. })
        ));
        let bad_overlap = r#"{ "fronts": { "overlap_percent": 120.0 } }"#;
        assert!(EngineConfig::from_json_str(bad_overlap).is_err());
        let bad_nu = r#"{ "classification": { "wavenumber": -1.0 } }"#;
        assert!(EngineConfig::from_json_str(bad_nu).is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let huge_bins = r#"{ "fronts": { "histogram": { "max_bins": 18446744073709551615 } } }"#;
        assert!(matches!(
            EngineConfig::from_json_str(huge_bins),
            Err(Error::InvalidParameter { name: "histogram.max_bins", .. })
        ));
        let huge_margin = r#"{ "registration": { "max_margin": 9223372036854775808 } }"#;
        assert!(matches!(
            EngineConfig::from_json_str(huge_margin),
            Err(Error::InvalidParameter { name: "max_margin", .. })
        ));
        let huge_radius = r#"{ "smoothing": { "radius": 100000 } }"#;
        assert!(matches!(
            EngineConfig::from_json_str(huge_radius),
            Err(Error::InvalidParameter { name: "radius", .. })
        ));
    }

    #[test]
    fn test_huge_max_window_is_usable() {
        let json = r#"{ "fronts": { "max_window": 18446744073709551615 } }"#;
        let c = EngineConfig::from_json_str(json).unwrap();
        let sizes: Vec<usize> = c.fronts.window_sizes().take(3).collect();
        assert_eq!(sizes, vec![16, 24, 32]);
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let mut c = EngineConfig::default();
        c.fronts.overlap_percent = 25.0;
        c.registration.max_margin = 3;
        let back = EngineConfig::from_json_str(&c.to_json_string().unwrap()).unwrap();
        assert_eq!(back.fronts.overlap_percent, 25.0);
        assert_eq!(back.registration.max_margin, 3);
    }
}
