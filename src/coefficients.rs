//! Spherical-harmonic (Gauss) coefficients of the model and their secular
//! variation.
//!
//! Coefficient files look like
//!
//! ```text
//!     2020.0            WMM-2020        12/10/2019
//!   1  0  -29404.5       0.0        6.7        0.0
//!   1  1   -1450.7    4652.9        7.7      -25.1
//!   ...
//! 999999999999999999999999999999999999999999999999
//! ```
//!
//! The header holds the epoch (decimal year), the model name and the release
//! date (`MM/DD/YYYY`). Each subsequent row is `n m g h dg dh`; rows with fewer
//! than six fields (blank lines, sentinels) are skipped.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;
use time::{Date, Month};

use crate::{
    constants::*,
    error::{Advisory, WmmError},
    utils::DecimalYear,
};

type Table = [[f64; MAX_DEGREE + 1]; MAX_DEGREE + 1];

/// g, h [nT] and their secular rates dg, dh [nT/yr] for one (n, m).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GaussCoefficients {
    pub g: f64,
    pub h: f64,
    pub dg: f64,
    pub dh: f64,
}

#[derive(Debug, Clone)]
pub struct CoefficientSet {
    name: String,
    epoch: f64,
    release_date: Date,
    valid_from: f64,
    valid_until: f64,
    g_coeff: Table,
    h_coeff: Table,
    delta_g: Table,
    delta_h: Table,
}

impl CoefficientSet {
    /// Parse a coefficient file.
    pub fn load<R: BufRead>(source: R) -> Result<CoefficientSet, WmmError> {
        let mut lines = source.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(WmmError::MalformedCoefficientFile {
                    line: 1,
                    reason: "missing header".to_string(),
                })
            }
        };
        let (epoch, name, release_date) = parse_header(&header)?;

        let mut set = CoefficientSet {
            name,
            epoch,
            release_date,
            valid_from: DecimalYear::from(release_date).value(),
            valid_until: epoch + VALIDITY_YEARS,
            g_coeff: [[0.0; MAX_DEGREE + 1]; MAX_DEGREE + 1],
            h_coeff: [[0.0; MAX_DEGREE + 1]; MAX_DEGREE + 1],
            delta_g: [[0.0; MAX_DEGREE + 1]; MAX_DEGREE + 1],
            delta_h: [[0.0; MAX_DEGREE + 1]; MAX_DEGREE + 1],
        };

        let mut num_rows = 0;
        for (i, line) in lines.enumerate() {
            let line = line?;
            // The header was line 1.
            let line_num = i + 2;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 6 {
                continue;
            }

            let malformed = |reason: String| WmmError::MalformedCoefficientFile {
                line: line_num,
                reason,
            };
            let n: usize = fields[0]
                .parse()
                .map_err(|_| malformed(format!("bad n value '{}'", fields[0])))?;
            let m: usize = fields[1]
                .parse()
                .map_err(|_| malformed(format!("bad m value '{}'", fields[1])))?;
            if n == 0 || n > MAX_DEGREE || m > n {
                return Err(malformed(format!(
                    "(n, m) = ({n}, {m}) is outside of the model's degree range"
                )));
            }
            let mut values = [0.0; 4];
            for (value, (field, label)) in values
                .iter_mut()
                .zip(fields[2..6].iter().zip(["g", "h", "dg", "dh"]))
            {
                *value = field
                    .parse()
                    .map_err(|_| malformed(format!("bad {label} value '{field}'")))?;
            }
            let [g, h, dg, dh] = values;
            set.g_coeff[n][m] = g;
            set.h_coeff[n][m] = h;
            set.delta_g[n][m] = dg;
            set.delta_h[n][m] = dh;
            num_rows += 1;
        }

        debug!(
            "Loaded coefficient set '{}' with epoch {} ({num_rows} rows)",
            set.name, set.epoch
        );
        Ok(set)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CoefficientSet, WmmError> {
        let path = path.as_ref();
        debug!("Reading coefficients from {}", path.display());
        Self::load(BufReader::new(File::open(path)?))
    }

    /// The built-in WMM-2020 coefficients.
    pub fn wmm2020() -> Result<CoefficientSet, WmmError> {
        Self::load(WMM2020_COF.as_bytes())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decimal year at which g and h hold exactly.
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn release_date(&self) -> Date {
        self.release_date
    }

    pub fn valid_from(&self) -> f64 {
        self.valid_from
    }

    pub fn valid_until(&self) -> f64 {
        self.valid_until
    }

    /// `Some(StaleModel)` if `t` is outside this set's validity window.
    pub fn check_validity<T: Into<DecimalYear>>(&self, t: T) -> Option<Advisory> {
        let year = t.into().value();
        if year < self.valid_from || year > self.valid_until {
            Some(Advisory::StaleModel {
                year,
                valid_from: self.valid_from,
                valid_until: self.valid_until,
            })
        } else {
            None
        }
    }

    /// The coefficients for degree `n` and order `m` extrapolated linearly to
    /// time `t`. Rates are returned unchanged.
    pub fn coefficients_at<T: Into<DecimalYear>>(
        &self,
        n: usize,
        m: usize,
        t: T,
    ) -> Result<(GaussCoefficients, Option<Advisory>), WmmError> {
        if n > MAX_DEGREE || m > n {
            return Err(WmmError::DegreeOutOfRange { n, m });
        }
        let t = t.into();
        let dt = t.value() - self.epoch;
        let coefficients = GaussCoefficients {
            g: self.g_coeff[n][m] + dt * self.delta_g[n][m],
            h: self.h_coeff[n][m] + dt * self.delta_h[n][m],
            dg: self.delta_g[n][m],
            dh: self.delta_h[n][m],
        };
        Ok((coefficients, self.check_validity(t)))
    }
}

fn parse_header(header: &str) -> Result<(f64, String, Date), WmmError> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(WmmError::MalformedCoefficientFile {
            line: 1,
            reason: format!("expected 'epoch name MM/DD/YYYY', got '{}'", header.trim()),
        });
    }

    let epoch: f64 = fields[0]
        .parse()
        .ok()
        .filter(|e: &f64| e.is_finite())
        .ok_or_else(|| WmmError::HeaderFieldInvalid {
            field: "epoch",
            value: fields[0].to_string(),
        })?;
    let release_date = parse_date(fields[2]).ok_or_else(|| WmmError::HeaderFieldInvalid {
        field: "valid date",
        value: fields[2].to_string(),
    })?;
    Ok((epoch, fields[1].to_string(), release_date))
}

/// Parse `MM/DD/YYYY`.
fn parse_date(s: &str) -> Option<Date> {
    let mut parts = s.split('/');
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use time::macros::date;

    const SMALL: &str = "    2020.0            TEST        12/10/2019
  1  0  -29404.5       0.0        6.7        0.0
  1  1   -1450.7    4652.9        7.7      -25.1

  2  2    1676.8    -734.8       -2.2      -23.9
999999999999999999999999999999999999999999999999
";

    #[test]
    fn test_load_small() {
        let set = CoefficientSet::load(SMALL.as_bytes()).unwrap();
        assert_eq!(set.name(), "TEST");
        assert_eq!(set.epoch(), 2020.0);
        assert_eq!(set.release_date(), date!(2019 - 12 - 10));
        assert_float_eq!(set.valid_from(), 2019.0 + 343.0 / 365.0, abs <= 1e-12);
        assert_eq!(set.valid_until(), 2025.0);

        let (c, advisory) = set.coefficients_at(1, 1, 2020.0).unwrap();
        assert_eq!(
            c,
            GaussCoefficients {
                g: -1450.7,
                h: 4652.9,
                dg: 7.7,
                dh: -25.1
            }
        );
        assert!(advisory.is_none());

        // Rows not in the file are zero.
        let (c, _) = set.coefficients_at(2, 0, 2020.0).unwrap();
        assert_eq!(c, GaussCoefficients::default());
    }

    #[test]
    fn test_secular_extrapolation() {
        let set = CoefficientSet::load(SMALL.as_bytes()).unwrap();
        let (c, advisory) = set.coefficients_at(2, 2, 2022.5).unwrap();
        assert_float_eq!(c.g, 1676.8 - 2.5 * 2.2, abs <= 1e-9);
        assert_float_eq!(c.h, -734.8 - 2.5 * 23.9, abs <= 1e-9);
        assert_eq!(c.dg, -2.2);
        assert_eq!(c.dh, -23.9);
        assert!(advisory.is_none());
    }

    #[test]
    fn test_stale_model_advisory() {
        let set = CoefficientSet::load(SMALL.as_bytes()).unwrap();
        // Before the release date.
        let (c, advisory) = set.coefficients_at(1, 0, 2019.5).unwrap();
        assert_float_eq!(c.g, -29404.5 - 0.5 * 6.7, abs <= 1e-9);
        assert!(matches!(advisory, Some(Advisory::StaleModel { .. })));
        // After the five-year window.
        let (_, advisory) = set.coefficients_at(1, 0, 2025.01).unwrap();
        assert!(matches!(advisory, Some(Advisory::StaleModel { .. })));
        assert!(set.check_validity(2024.99).is_none());
        assert!(set.check_validity(date!(2019 - 12 - 10)).is_none());
    }

    #[test]
    fn test_degree_out_of_range() {
        let set = CoefficientSet::load(SMALL.as_bytes()).unwrap();
        for (n, m) in [(13, 0), (2, 3), (12, 13)] {
            assert!(matches!(
                set.coefficients_at(n, m, 2020.0),
                Err(WmmError::DegreeOutOfRange { .. })
            ));
        }
        assert!(set.coefficients_at(0, 0, 2020.0).is_ok());
        assert!(set.coefficients_at(12, 12, 2020.0).is_ok());
    }

    #[test]
    fn test_bad_headers() {
        let result = CoefficientSet::load("".as_bytes());
        assert!(matches!(
            result,
            Err(WmmError::MalformedCoefficientFile { line: 1, .. })
        ));

        let result = CoefficientSet::load("2020.0 WMM-2020\n".as_bytes());
        assert!(matches!(
            result,
            Err(WmmError::MalformedCoefficientFile { line: 1, .. })
        ));

        let result = CoefficientSet::load("twenty WMM-2020 12/10/2019\n".as_bytes());
        assert!(matches!(
            result,
            Err(WmmError::HeaderFieldInvalid { field: "epoch", .. })
        ));

        for bad_date in ["13/10/2019", "12-10-2019", "12/32/2019", "12/10/2019/1"] {
            let result = CoefficientSet::load(format!("2020.0 WMM-2020 {bad_date}\n").as_bytes());
            assert!(
                matches!(
                    result,
                    Err(WmmError::HeaderFieldInvalid {
                        field: "valid date",
                        ..
                    })
                ),
                "{bad_date}"
            );
        }
    }

    #[test]
    fn test_bad_rows() {
        let cases = [
            "  1  x  -29404.5       0.0        6.7        0.0",
            "  1  0  -29404.5       abc        6.7        0.0",
            " 13  0       1.0       0.0        0.0        0.0",
            "  2  3       1.0       0.0        0.0        0.0",
            "  0  0       1.0       0.0        0.0        0.0",
        ];
        for row in cases {
            let contents = format!("2020.0 WMM-2020 12/10/2019\n\n{row}\n");
            let result = CoefficientSet::load(contents.as_bytes());
            assert!(
                matches!(result, Err(WmmError::MalformedCoefficientFile { line: 3, .. })),
                "{row}"
            );
        }
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let contents = "2020.0 WMM-2020 12/10/2019\n1 0 2.0\n  \n1 0 5.0 0.0 1.0 0.0\n9999\n";
        let set = CoefficientSet::load(contents.as_bytes()).unwrap();
        let (c, _) = set.coefficients_at(1, 0, 2020.0).unwrap();
        assert_eq!(c.g, 5.0);
    }
}
