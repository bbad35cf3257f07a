use std::fmt;

use thiserror::Error;

use crate::constants::MAX_DEGREE;

#[derive(Debug, Error)]
pub enum WmmError {
    #[error("Degree/order (n, m) = ({n}, {m}) is invalid; need 0 <= m <= n <= {MAX_DEGREE}")]
    DegreeOutOfRange { n: usize, m: usize },

    #[error("Malformed coefficient file on line {line}: {reason}")]
    MalformedCoefficientFile { line: usize, reason: String },

    #[error("Coefficient file header field '{field}' has an invalid value '{value}'")]
    HeaderFieldInvalid { field: &'static str, value: String },

    #[error("Decimal year {0} cannot be represented as a calendar time")]
    InvalidDecimalYear(f64),

    #[error(transparent)]
    TimeOutOfRange(#[from] time::error::ComponentRange),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// Non-fatal conditions raised alongside a computed field. The numbers are
/// still produced; these should be shown to the end user.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// The requested time lies outside the coefficient set's validity window.
    StaleModel {
        year: f64,
        valid_from: f64,
        valid_until: f64,
    },

    /// The horizontal intensity [nT] is so small that declination is
    /// ill-conditioned.
    LowHorizontalField { h: f64, threshold: f64 },

    /// The height [metres] is outside the range the model is valid over.
    HeightOutOfRange { height: f64, min: f64, max: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::StaleModel {
                year,
                valid_from,
                valid_until,
            } => write!(
                f,
                "Requested date {year:.3} is outside of the model validity period {valid_from:.3} to {valid_until:.3}"
            ),
            Advisory::LowHorizontalField { h, threshold } => write!(
                f,
                "The horizontal field strength at this location is only {h:.1} nT; compass readings have very large uncertainties where H is below {threshold:.0} nT"
            ),
            Advisory::HeightOutOfRange { height, min, max } => write!(
                f,
                "Height {height:.1} m is outside of the model's valid range {min:.0} m to {max:.0} m"
            ),
        }
    }
}
