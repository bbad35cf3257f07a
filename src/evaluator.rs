//! Spherical-harmonic synthesis of the field.

use std::sync::{Mutex, PoisonError};

use log::{trace, warn};

use crate::{
    coefficients::CoefficientSet,
    config::EvaluatorConfig,
    constants::*,
    coord::{Geodetic, Spherical},
    error::{Advisory, WmmError},
    field::{FieldComponents, MagneticField},
    polynomial::{schmidt_factor, LegendreCache},
    utils::DecimalYear,
};

/// Latitudes are clamped to this magnitude [degrees]; at the poles themselves
/// the east component has a 1/cos(latitude) singularity.
const LATITUDE_LIMIT: f64 = 89.99999;

/// Evaluates the model for one coefficient set.
///
/// The evaluator keeps two memos: the Legendre polynomial derivatives, and the
/// field sum for the last location evaluated. Asking for the same location at
/// a different time only re-applies the secular variation.
#[derive(Debug)]
pub struct Evaluator {
    coefficients: CoefficientSet,
    config: EvaluatorConfig,
    legendre: Mutex<LegendreCache>,
    last: Mutex<Option<([u64; 3], FieldComponents)>>,
}

impl Evaluator {
    pub fn new(coefficients: CoefficientSet) -> Evaluator {
        Self::with_config(coefficients, EvaluatorConfig::default())
    }

    pub fn with_config(coefficients: CoefficientSet, config: EvaluatorConfig) -> Evaluator {
        Evaluator {
            coefficients,
            config,
            legendre: Mutex::new(LegendreCache::new()),
            last: Mutex::new(None),
        }
    }

    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// The field at `location` and time `t`, with any advisories about the
    /// result.
    pub fn compute_field<T: Into<DecimalYear>>(
        &self,
        location: Geodetic,
        t: T,
    ) -> Result<(MagneticField, Vec<Advisory>), WmmError> {
        let key = location.bits();
        let memo = *self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let at_epoch = match memo {
            Some((k, field)) if k == key => {
                trace!("Reusing field sum for {location:?}");
                field
            }
            _ => {
                let spherical = clamp_latitude(location).to_spherical();
                let mut legendre = self.legendre.lock().unwrap_or_else(PoisonError::into_inner);
                let field = sum_at_epoch(&self.coefficients, &mut legendre, &spherical)?;
                *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some((key, field));
                field
            }
        };
        Ok(finish(
            &self.coefficients,
            &self.config,
            location,
            t.into(),
            at_epoch,
        ))
    }
}

/// Evaluate the model once, without memoisation and with the default
/// configuration.
pub fn compute_field<T: Into<DecimalYear>>(
    location: Geodetic,
    t: T,
    coefficients: &CoefficientSet,
) -> Result<(MagneticField, Vec<Advisory>), WmmError> {
    let spherical = clamp_latitude(location).to_spherical();
    let at_epoch = sum_at_epoch(coefficients, &mut LegendreCache::new(), &spherical)?;
    Ok(finish(
        coefficients,
        &EvaluatorConfig::default(),
        location,
        t.into(),
        at_epoch,
    ))
}

fn clamp_latitude(location: Geodetic) -> Geodetic {
    Geodetic {
        latitude: location.latitude.clamp(-LATITUDE_LIMIT, LATITUDE_LIMIT),
        ..location
    }
}

/// Sum the geocentric field and its secular variation at the coefficient
/// set's epoch.
fn sum_at_epoch(
    coefficients: &CoefficientSet,
    legendre: &mut LegendreCache,
    location: &Spherical,
) -> Result<FieldComponents, WmmError> {
    let epoch = coefficients.epoch();
    let phi = location.latitude.to_radians();
    let lambda = location.longitude.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = sin_phi / cos_phi;
    let relative_radius = GEOMAGNETIC_RADIUS / location.radius;

    let mut sum = FieldComponents::default();
    for n in 1..=MAX_DEGREE {
        let nn = (n + 1) as f64;
        let f = relative_radius.powi(n as i32 + 2);
        for m in 0..=n {
            let mf = m as f64;
            let (c, _) = coefficients.coefficients_at(n, m, epoch)?;

            let norm = schmidt_factor(n, m);
            let p = norm * legendre.legendre_function(n, m, sin_phi);
            let q = norm * legendre.legendre_function(n + 1, m, sin_phi);
            // d/dphi of the normalised P(n, m, sin(phi)).
            let dp = nn * tan_phi * p - (nn - mf) / cos_phi * q;

            let (sin_m_lambda, cos_m_lambda) = (mf * lambda).sin_cos();
            let gh_cos = c.g * cos_m_lambda + c.h * sin_m_lambda;
            let gh_sin = c.g * sin_m_lambda - c.h * cos_m_lambda;
            let dgh_cos = c.dg * cos_m_lambda + c.dh * sin_m_lambda;
            let dgh_sin = c.dg * sin_m_lambda - c.dh * cos_m_lambda;

            sum.x += -f * gh_cos * dp;
            sum.y += f / cos_phi * mf * gh_sin * p;
            sum.z += -nn * f * gh_cos * p;
            sum.dx += -f * dgh_cos * dp;
            sum.dy += f / cos_phi * mf * dgh_sin * p;
            sum.dz += -nn * f * dgh_cos * p;
        }
    }
    Ok(sum)
}

fn finish(
    coefficients: &CoefficientSet,
    config: &EvaluatorConfig,
    location: Geodetic,
    t: DecimalYear,
    at_epoch: FieldComponents,
) -> (MagneticField, Vec<Advisory>) {
    let year = t.value();
    let geocentric = at_epoch.extrapolate(year - coefficients.epoch());
    let field = MagneticField::new(
        clamp_latitude(location),
        year,
        geocentric,
        config.uncertainty,
    );

    let mut advisories = vec![];
    if let Some(stale) = coefficients.check_validity(t) {
        advisories.push(stale);
    }
    if location.height < config.min_height || location.height > config.max_height {
        advisories.push(Advisory::HeightOutOfRange {
            height: location.height,
            min: config.min_height,
            max: config.max_height,
        });
    }
    let h = field.h();
    if h < config.low_horizontal_field {
        advisories.push(Advisory::LowHorizontalField {
            h,
            threshold: config.low_horizontal_field,
        });
    }
    for advisory in &advisories {
        warn!("{advisory}");
    }

    (field, advisories)
}
