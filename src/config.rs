//! Evaluator settings. Every field defaults to the published WMM value, so a
//! TOML file only needs to name what it changes:
//!
//! ```toml
//! low_horizontal_field = 2000.0
//!
//! [uncertainty]
//! d_b = 5000.0
//! ```

use serde::{Deserialize, Serialize};

use crate::{constants::*, error::WmmError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Horizontal intensity [nT] below which a `LowHorizontalField` advisory
    /// is raised.
    pub low_horizontal_field: f64,

    /// Valid height range [metres] relative to the ellipsoid.
    pub min_height: f64,
    pub max_height: f64,

    pub uncertainty: UncertaintyModel,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            low_horizontal_field: LOW_HORIZONTAL_FIELD,
            min_height: MIN_HEIGHT,
            max_height: MAX_HEIGHT,
            uncertainty: UncertaintyModel::default(),
        }
    }
}

impl EvaluatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, WmmError> {
        Ok(toml::from_str(s)?)
    }
}

/// One-sigma model uncertainties, averaged over the globe. Field strengths are
/// in nT and angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UncertaintyModel {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub h: f64,
    pub f: f64,
    pub i: f64,
    /// Declination uncertainty away from the poles [degrees]
    pub d_a: f64,
    /// Horizontal-field scale of the declination uncertainty [nT]
    pub d_b: f64,
}

impl Default for UncertaintyModel {
    fn default() -> Self {
        Self {
            x: ERR_X,
            y: ERR_Y,
            z: ERR_Z,
            h: ERR_H,
            f: ERR_F,
            i: ERR_I,
            d_a: ERR_D_A,
            d_b: ERR_D_B,
        }
    }
}

impl UncertaintyModel {
    /// Declination uncertainty [degrees] where the horizontal intensity is `h`
    /// [nT]. It grows without bound as `h` shrinks, so `h` is floored to keep
    /// the result finite.
    pub fn declination(&self, h: f64) -> f64 {
        let h = h.abs().max(MIN_HORIZONTAL_FIELD);
        (self.d_a * self.d_a + self.d_b * self.d_b / (h * h)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = EvaluatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EvaluatorConfig::default());
        assert_eq!(config.uncertainty.x, 131.0);
        assert_eq!(config.uncertainty.d_b, 5430.0);
        assert_eq!(config.low_horizontal_field, 1000.0);
    }

    #[test]
    fn test_partial_toml() {
        let config = EvaluatorConfig::from_toml_str(
            "low_horizontal_field = 2000.0\nmax_height = 1e6\n\n[uncertainty]\nd_b = 5000.0\n",
        )
        .unwrap();
        assert_eq!(config.low_horizontal_field, 2000.0);
        assert_eq!(config.max_height, 1e6);
        assert_eq!(config.min_height, MIN_HEIGHT);
        assert_eq!(config.uncertainty.d_b, 5000.0);
        assert_eq!(config.uncertainty.d_a, ERR_D_A);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            EvaluatorConfig::from_toml_str("low_field = 3.0"),
            Err(WmmError::Config(_))
        ));
    }

    #[test]
    fn test_declination_uncertainty() {
        let u = UncertaintyModel::default();
        let at_zero = u.declination(0.0);
        assert!(at_zero.is_finite());
        assert!(at_zero > 1e6);

        let mut previous = at_zero;
        for h in [1e-9, 1e-3, 1.0, 100.0, 1000.0, 5430.0, 20000.0, 60000.0] {
            let d = u.declination(h);
            assert!(d <= previous, "ErrD increased at H = {h}");
            previous = d;
        }
        // Far from the poles it tends to d_a.
        assert!((u.declination(1e9) - ERR_D_A).abs() < 1e-9);
    }
}
