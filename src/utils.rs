//! Decimal years.
//!
//! Time is referenced in decimal years, e.g. 15 May 2019 is 2019.367. The
//! day-of-year of January 1st is zero, and December 31st is 364 (365 in a leap
//! year). The fraction of the year is the (fractional) day-of-year divided by
//! the number of days in that calendar year.

use std::fmt;

use time::{util::days_in_year, Date, Duration, OffsetDateTime, UtcOffset};

use crate::{constants::*, error::WmmError};

/// A time instant as a continuous year value, e.g. 2019.5.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DecimalYear(pub f64);

impl DecimalYear {
    pub fn value(self) -> f64 {
        self.0
    }

    /// The UTC calendar time corresponding to this decimal year.
    pub fn to_time(self) -> Result<OffsetDateTime, WmmError> {
        decimal_year_to_time(self.0)
    }
}

impl From<f64> for DecimalYear {
    fn from(y: f64) -> Self {
        DecimalYear(y)
    }
}

impl From<OffsetDateTime> for DecimalYear {
    fn from(t: OffsetDateTime) -> Self {
        DecimalYear(time_to_decimal_year(t))
    }
}

/// Midnight (UTC) at the start of the day.
impl From<Date> for DecimalYear {
    fn from(d: Date) -> Self {
        DecimalYear::from(d.midnight().assume_utc())
    }
}

impl fmt::Display for DecimalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Convert a decimal year like 2015.0 to a UTC time.
pub fn decimal_year_to_time(y: f64) -> Result<OffsetDateTime, WmmError> {
    if !y.is_finite() {
        return Err(WmmError::InvalidDecimalYear(y));
    }
    let year = y.floor();
    if year < i32::MIN as f64 || year > i32::MAX as f64 {
        return Err(WmmError::InvalidDecimalYear(y));
    }
    let year = year as i32;
    let start = Date::from_ordinal_date(year, 1)?.midnight().assume_utc();
    let seconds = (y - year as f64) * days_in_year(year) as f64 * SECONDS_PER_DAY;
    Ok(start + Duration::seconds_f64(seconds))
}

/// Convert a time to a decimal year like 2015.0.
pub fn time_to_decimal_year(t: OffsetDateTime) -> f64 {
    let t = t.to_offset(UtcOffset::UTC);
    let (h, m, s, ns) = t.to_hms_nano();
    let seconds_into_day =
        h as f64 * 3600.0 + m as f64 * 60.0 + s as f64 + ns as f64 / 1_000_000_000.0;
    let day_of_year = (t.ordinal() - 1) as f64 + seconds_into_day / SECONDS_PER_DAY;
    t.year() as f64 + day_of_year / days_in_year(t.year()) as f64
}

/// Elapsed years from `epoch` to `t`, using the mean Gregorian year.
pub fn years_between(t: OffsetDateTime, epoch: OffsetDateTime) -> f64 {
    (t - epoch).as_seconds_f64() / SECONDS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use time::macros::datetime;

    fn day_fixtures() -> [(f64, OffsetDateTime); 5] {
        [
            (1995.0, datetime!(1995-01-01 0:00 UTC)),
            (1996.0 - 1.0 / 365.0, datetime!(1995-12-31 0:00 UTC)),
            (1997.0 - 1.0 / 366.0, datetime!(1996-12-31 0:00 UTC)),
            (2004.0, datetime!(2004-01-01 0:00 UTC)),
            (2019.367, datetime!(2019-05-15 0:00 UTC)),
        ]
    }

    #[test]
    fn test_decimal_year_to_time() {
        for (y, t) in day_fixtures() {
            let d = decimal_year_to_time(y).unwrap();
            assert_float_eq!(
                d.unix_timestamp() as f64,
                t.unix_timestamp() as f64,
                abs <= 0.5 * SECONDS_PER_DAY
            );
        }
    }

    #[test]
    fn test_time_to_decimal_year() {
        for (y, t) in day_fixtures() {
            assert_float_eq!(time_to_decimal_year(t), y, abs <= 0.001);
        }
        assert_eq!(time_to_decimal_year(datetime!(2020-01-01 0:00 UTC)), 2020.0);
        // Half way through a leap year.
        assert_float_eq!(
            time_to_decimal_year(datetime!(2020-07-02 0:00 UTC)),
            2020.5,
            abs <= 1e-12
        );
    }

    #[test]
    fn test_time_zone_is_respected() {
        let local = datetime!(2021-03-01 02:00 +02:00);
        let utc = datetime!(2021-03-01 00:00 UTC);
        assert_eq!(time_to_decimal_year(local), time_to_decimal_year(utc));
    }

    #[test]
    fn test_round_trips() {
        for y in [1995.0, 1996.0 - 1.0 / 365.0, 2004.0, 2017.5, 2019.367, 2024.999] {
            let back = time_to_decimal_year(decimal_year_to_time(y).unwrap());
            assert_float_eq!(back, y, abs <= 0.001);
        }
        for (_, t) in day_fixtures() {
            let back = decimal_year_to_time(time_to_decimal_year(t)).unwrap();
            assert_float_eq!(
                back.unix_timestamp() as f64,
                t.unix_timestamp() as f64,
                abs <= 0.5 * SECONDS_PER_DAY
            );
        }
    }

    #[test]
    fn test_invalid_decimal_years() {
        assert!(matches!(
            decimal_year_to_time(f64::NAN),
            Err(WmmError::InvalidDecimalYear(_))
        ));
        assert!(decimal_year_to_time(1e12).is_err());
        assert!(DecimalYear(f64::INFINITY).to_time().is_err());
    }

    #[test]
    fn test_years_between() {
        let epoch = DecimalYear(1995.0).to_time().unwrap();
        let cases = [
            (datetime!(1995-01-01 0:00 UTC), 0.0),
            (datetime!(2004-01-01 0:00 UTC), 9.0),
            (datetime!(2005-07-01 0:00 UTC), 10.5),
            (datetime!(2007-10-01 0:00 UTC), 12.75),
        ];
        for (t, expected) in cases {
            assert_float_eq!(years_between(t, epoch), expected, abs <= 0.01);
        }
    }
}
