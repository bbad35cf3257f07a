//! Physical and model constants.

/// Highest spherical-harmonic degree (and order) carried by the model.
pub const MAX_DEGREE: usize = 12;

/// WGS-84 semi-major axis [metres]
pub const WGS84_A: f64 = 6378137.0;

/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257223563;

/// WGS-84 first eccentricity squared, `f(2-f)`
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Geomagnetic reference radius [metres]. Not the same as [`WGS84_A`].
pub const GEOMAGNETIC_RADIUS: f64 = 6371200.0;

/// Length of the model's validity window after its epoch [years]
pub const VALIDITY_YEARS: f64 = 5.0;

/// Mean Gregorian year [days]
pub const DAYS_PER_YEAR: f64 = 365.2425;

pub const SECONDS_PER_DAY: f64 = 86400.0;

pub const SECONDS_PER_YEAR: f64 = SECONDS_PER_DAY * DAYS_PER_YEAR;

// Published WMM global-average one-sigma uncertainties.
pub const ERR_X: f64 = 131.0; // nT
pub const ERR_Y: f64 = 94.0; // nT
pub const ERR_Z: f64 = 157.0; // nT
pub const ERR_H: f64 = 128.0; // nT
pub const ERR_F: f64 = 145.0; // nT
pub const ERR_I: f64 = 0.22; // degrees
/// Declination uncertainty away from the magnetic poles [degrees]
pub const ERR_D_A: f64 = 0.27;
/// Horizontal-field scale of the declination uncertainty near the poles [nT]
pub const ERR_D_B: f64 = 5430.0;

/// Below this horizontal intensity [nT] compass readings are unreliable.
pub const LOW_HORIZONTAL_FIELD: f64 = 1000.0;

/// Floor applied to H before dividing by it [nT].
pub const MIN_HORIZONTAL_FIELD: f64 = 1e-6;

/// Heights [metres] relative to the ellipsoid over which the model is valid.
pub const MIN_HEIGHT: f64 = -1000.0;
pub const MAX_HEIGHT: f64 = 850_000.0;

/// Geodetic latitude [degrees] beyond which grid variation differs from
/// declination.
pub const GRID_VARIATION_LATITUDE: f64 = 55.0;

/// The WMM-2020 coefficient file, valid 2020.0 to 2025.0.
pub const WMM2020_COF: &str = include_str!("../data/WMM2020.COF");
