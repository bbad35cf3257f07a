//! A computed magnetic field and everything derived from it.
//!
//! Field strengths are in nT and their rates in nT/yr; angles are in degrees
//! and their rates in degrees/yr.

use crate::{
    config::UncertaintyModel,
    constants::*,
    coord::{normalize_longitude, Geodetic, Spherical},
};

/// Field vector and its secular variation in one set of axes. `x` points
/// north, `y` east and `z` down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldComponents {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl FieldComponents {
    /// Apply `years` of secular variation.
    pub fn extrapolate(&self, years: f64) -> FieldComponents {
        FieldComponents {
            x: self.x + years * self.dx,
            y: self.y + years * self.dy,
            z: self.z + years * self.dz,
            ..*self
        }
    }

    /// Rotate about the east axis by `dphi` [radians], the geocentric minus the
    /// geodetic latitude.
    pub fn rotate(&self, dphi: f64) -> FieldComponents {
        let (sin_dphi, cos_dphi) = dphi.sin_cos();
        FieldComponents {
            x: self.x * cos_dphi - self.z * sin_dphi,
            y: self.y,
            z: self.x * sin_dphi + self.z * cos_dphi,
            dx: self.dx * cos_dphi - self.dz * sin_dphi,
            dy: self.dy,
            dz: self.dx * sin_dphi + self.dz * cos_dphi,
        }
    }
}

/// The magnetic field at a location and time.
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticField {
    location: Geodetic,
    spherical_location: Spherical,
    year: f64,
    geocentric: FieldComponents,
    ellipsoidal: FieldComponents,
    uncertainty: UncertaintyModel,
}

impl MagneticField {
    /// Build a field from its geocentric-spherical components at `location`.
    pub fn new(
        location: Geodetic,
        year: f64,
        geocentric: FieldComponents,
        uncertainty: UncertaintyModel,
    ) -> MagneticField {
        let spherical_location = location.to_spherical();
        let dphi = (spherical_location.latitude - location.latitude).to_radians();
        MagneticField {
            location,
            spherical_location,
            year,
            geocentric,
            ellipsoidal: geocentric.rotate(dphi),
            uncertainty,
        }
    }

    pub fn location(&self) -> Geodetic {
        self.location
    }

    pub fn spherical_location(&self) -> Spherical {
        self.spherical_location
    }

    /// The decimal year the field was evaluated at.
    pub fn year(&self) -> f64 {
        self.year
    }

    /// Components in geocentric-spherical axes. Useful in space; near the
    /// surface, [`MagneticField::ellipsoidal`] is normally wanted.
    pub fn spherical(&self) -> FieldComponents {
        self.geocentric
    }

    /// Components in axes parallel to the WGS-84 ellipsoid.
    pub fn ellipsoidal(&self) -> FieldComponents {
        self.ellipsoidal
    }

    pub fn x(&self) -> f64 {
        self.ellipsoidal.x
    }

    pub fn y(&self) -> f64 {
        self.ellipsoidal.y
    }

    pub fn z(&self) -> f64 {
        self.ellipsoidal.z
    }

    pub fn dx(&self) -> f64 {
        self.ellipsoidal.dx
    }

    pub fn dy(&self) -> f64 {
        self.ellipsoidal.dy
    }

    pub fn dz(&self) -> f64 {
        self.ellipsoidal.dz
    }

    /// Horizontal intensity.
    pub fn h(&self) -> f64 {
        self.ellipsoidal.x.hypot(self.ellipsoidal.y)
    }

    /// Total intensity.
    pub fn f(&self) -> f64 {
        let FieldComponents { x, y, z, .. } = self.ellipsoidal;
        (x * x + y * y + z * z).sqrt()
    }

    /// Declination: the angle of the horizontal field east of true north. To
    /// get a true heading, add it to the magnetic heading.
    pub fn d(&self) -> f64 {
        self.ellipsoidal.y.atan2(self.ellipsoidal.x).to_degrees()
    }

    /// Inclination: the angle of the field below the horizontal.
    pub fn i(&self) -> f64 {
        self.ellipsoidal.z.atan2(self.h()).to_degrees()
    }

    /// Grid variation, i.e. declination relative to grid north, which departs
    /// from true north in the polar regions.
    pub fn gv(&self) -> f64 {
        let d = self.d();
        let lat = self.location.latitude;
        let lon = self.location.longitude;
        if lat > GRID_VARIATION_LATITUDE {
            normalize_longitude(d - lon)
        } else if lat < -GRID_VARIATION_LATITUDE {
            normalize_longitude(d + lon)
        } else {
            d
        }
    }

    /// Rate of change of H. Where H vanishes this is the rate at which it
    /// grows away from zero.
    pub fn dh(&self) -> f64 {
        let FieldComponents { x, y, dx, dy, .. } = self.ellipsoidal;
        let h = self.h();
        if h < MIN_HORIZONTAL_FIELD {
            return dx.hypot(dy);
        }
        (x * dx + y * dy) / h
    }

    pub fn df(&self) -> f64 {
        let FieldComponents {
            x,
            y,
            z,
            dx,
            dy,
            dz,
        } = self.ellipsoidal;
        let f = self.f();
        if f == 0.0 {
            return 0.0;
        }
        (x * dx + y * dy + z * dz) / f
    }

    /// Rate of change of declination. Zero where H vanishes and declination is
    /// undefined.
    pub fn dd(&self) -> f64 {
        let FieldComponents { x, y, dx, dy, .. } = self.ellipsoidal;
        let h = self.h();
        if h < MIN_HORIZONTAL_FIELD {
            return 0.0;
        }
        ((x * dy - dx * y) / (h * h)).to_degrees()
    }

    pub fn di(&self) -> f64 {
        let f = self.f();
        if f == 0.0 {
            return 0.0;
        }
        ((self.h() * self.ellipsoidal.dz - self.dh() * self.ellipsoidal.z) / (f * f)).to_degrees()
    }

    pub fn dgv(&self) -> f64 {
        self.dd()
    }

    pub fn err_x(&self) -> f64 {
        self.uncertainty.x
    }

    pub fn err_y(&self) -> f64 {
        self.uncertainty.y
    }

    pub fn err_z(&self) -> f64 {
        self.uncertainty.z
    }

    pub fn err_h(&self) -> f64 {
        self.uncertainty.h
    }

    pub fn err_f(&self) -> f64 {
        self.uncertainty.f
    }

    pub fn err_i(&self) -> f64 {
        self.uncertainty.i
    }

    /// Declination uncertainty at this location. The other uncertainties are
    /// global averages, but this one diverges as H goes to zero near the
    /// magnetic poles.
    pub fn err_d(&self) -> f64 {
        self.uncertainty.declination(self.h())
    }
}
