//! Geodetic and geocentric-spherical locations on the WGS-84 ellipsoid.

use crate::constants::*;

/// A location relative to the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    /// Geodetic latitude [degrees]
    pub latitude: f64,
    /// Longitude [degrees], in (-180, 180]
    pub longitude: f64,
    /// Height above the ellipsoid [metres]
    pub height: f64,
}

/// A location in Earth-centred spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Geocentric latitude [degrees]
    pub latitude: f64,
    /// Longitude [degrees]
    pub longitude: f64,
    /// Distance from the centre of the Earth [metres]
    pub radius: f64,
}

/// Wrap a longitude [degrees] into (-180, 180].
pub fn normalize_longitude(lon: f64) -> f64 {
    let l = lon.rem_euclid(360.0);
    if l > 180.0 {
        l - 360.0
    } else {
        l
    }
}

impl Geodetic {
    /// Longitude may be given in any range; it is stored in (-180, 180].
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Self {
        Self {
            latitude,
            longitude: normalize_longitude(longitude),
            height,
        }
    }

    /// Exact, closed-form conversion to geocentric-spherical coordinates.
    pub fn to_spherical(&self) -> Spherical {
        let (sin_phi, cos_phi) = self.latitude.to_radians().sin_cos();
        let rc = WGS84_A / (1.0 - WGS84_E2 * sin_phi * sin_phi).sqrt();
        let p = (rc + self.height) * cos_phi;
        let z = (rc * (1.0 - WGS84_E2) + self.height) * sin_phi;
        let r = p.hypot(z);
        Spherical {
            latitude: (z / r).asin().to_degrees(),
            longitude: self.longitude,
            radius: r,
        }
    }

    /// A key that is equal only for bit-identical locations.
    pub(crate) fn bits(&self) -> [u64; 3] {
        [
            self.latitude.to_bits(),
            self.longitude.to_bits(),
            self.height.to_bits(),
        ]
    }
}

impl Spherical {
    /// Conversion back to geodetic coordinates. Latitude is found by iterating
    /// Bowring's formula until it stops changing.
    pub fn to_geodetic(&self) -> Geodetic {
        let (sin_psi, cos_psi) = self.latitude.to_radians().sin_cos();
        let p = self.radius * cos_psi;
        let z = self.radius * sin_psi;

        let mut phi = z.atan2(p * (1.0 - WGS84_E2));
        let mut height = 0.0;
        for _ in 0..16 {
            let (sin_phi, cos_phi) = phi.sin_cos();
            let w = (1.0 - WGS84_E2 * sin_phi * sin_phi).sqrt();
            let n = WGS84_A / w;
            height = p * cos_phi + z * sin_phi - WGS84_A * w;
            let next = z.atan2(p * (1.0 - WGS84_E2 * n / (n + height)));
            let converged = (next - phi).abs() < 1e-15;
            phi = next;
            if converged {
                break;
            }
        }
        let (sin_phi, cos_phi) = phi.sin_cos();
        height = p * cos_phi + z * sin_phi - WGS84_A * (1.0 - WGS84_E2 * sin_phi * sin_phi).sqrt();

        Geodetic {
            latitude: phi.to_degrees(),
            longitude: self.longitude,
            height,
        }
    }
}
