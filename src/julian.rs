//! Julian dates with the day starting at noon.
//!
//! Reference values:
//!     1990-01-01 00:00 UTC - 2447892.5
//!     1990-01-01 12:00 UTC - 2447893.0
//!     2000-01-01 00:00 UTC - 2451544.5
//!     2000-01-01 12:00 UTC - 2451545.0
//!
//! References:
//!     "Astronomical Formulae for Calculators", Jean Meeus, 4th edition
//!     The 1992 Astronomical Almanac, page B6

use crate::error::{Error, Result};
use crate::model;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};

/// A Julian date with its originating year and fractional day of year
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Julian {
    date: f64,
    year: i32,
    day: f64,
}

impl Julian {
    /// Dec 31.5 1899 = Dec 31 1899 12h UTC
    pub const EPOCH_JAN0_12H_1900: f64 = 2415020.0;

    /// Jan 1.5 2000 = Jan 1 2000 12h UTC
    pub const EPOCH_JAN1_12H_2000: f64 = 2451545.0;

    /// Creates a Julian date from a UTC time
    pub fn from_utc(utc: DateTime<Utc>) -> Result<Julian> {
        let day = utc.ordinal() as f64
            + (utc.hour() as f64
                + (utc.minute() as f64
                    + (utc.second() as f64 + utc.nanosecond() as f64 / 1.0e9) / 60.0)
                    / 60.0)
                / 24.0;
        Julian::from_year_and_day(utc.year(), day)
    }

    /// Creates a Julian date from a year and a fractional day of year
    ///
    /// Jan 1 00h is day 1.0, Jan 1 12h is day 1.5, Jan 2 00h is day 2.0, and
    /// so on; the last day of a leap year is day 366.
    pub fn from_year_and_day(year: i32, day: f64) -> Result<Julian> {
        if !(1900..=2100).contains(&year) {
            return Err(Error::OutOfRangeYear { year });
        }
        if !(1.0..367.0).contains(&day) {
            return Err(Error::OutOfRangeDayOfYear { day });
        }

        // "Astronomical Formulae for Calculators", Jean Meeus, pages 23-25;
        // centuries are not leap years unless they divide by 400
        let previous_year = year - 1;
        let a = previous_year / 100;
        let b = 2 - a + a / 4;
        let new_years = (365.25 * previous_year as f64).floor()
            + (30.6001_f64 * 14.0).floor()
            + 1720994.5
            + b as f64;
        Ok(Julian {
            date: new_years + day,
            year,
            day,
        })
    }

    /// The Julian day number
    pub fn date(&self) -> f64 {
        self.date
    }

    /// Days since Dec 31 1899 12h UTC
    pub fn from_jan0_12h_1900(&self) -> f64 {
        self.date - Julian::EPOCH_JAN0_12H_1900
    }

    /// Days since Jan 1 2000 12h UTC (J2000)
    pub fn from_jan1_12h_2000(&self) -> f64 {
        self.date - Julian::EPOCH_JAN1_12H_2000
    }

    /// Time difference to another Julian date, in days
    pub fn diff(&self, other: &Julian) -> f64 {
        self.date - other.date
    }

    /// The Julian date shifted by the given number of minutes
    pub fn add_minutes(&self, minutes: f64) -> Result<Julian> {
        Julian::from_utc(
            self.to_datetime() + Duration::nanoseconds((minutes * 60.0e9).round() as i64),
        )
    }

    /// Greenwich Mean Sidereal Time for this Julian date
    ///
    /// Returns the angle, in radians, measured eastward from the vernal
    /// equinox to the prime meridian (ThetaG).
    pub fn to_gmst(&self) -> f64 {
        // The 1992 Astronomical Almanac, page B6
        let ut = (self.date + 0.5) % 1.0;
        let tu = (self.from_jan1_12h_2000() - ut) / 36525.0;
        let mut gmst = 24110.54841 + tu * (8640184.812866 + tu * (0.093104 - tu * 6.2e-6));
        gmst = (gmst + model::SEC_PER_DAY * model::OMEGA_E * ut) % model::SEC_PER_DAY;
        if gmst < 0.0 {
            // "wrap" negative modulo value
            gmst += model::SEC_PER_DAY;
        }
        model::TWO_PI * gmst / model::SEC_PER_DAY
    }

    /// Local Mean Sidereal Time at the given longitude (radians, west negative)
    pub fn to_lmst(&self, longitude: f64) -> f64 {
        model::fmod2p(self.to_gmst() + longitude)
    }

    /// The UTC time corresponding to this Julian date
    pub fn to_datetime(&self) -> DateTime<Utc> {
        let jan1 = NaiveDate::from_yo_opt(self.year, 1)
            .expect("the year range is validated at construction")
            .and_time(NaiveTime::MIN);
        (jan1 + Duration::nanoseconds(
            ((self.day - 1.0) * model::SEC_PER_DAY * 1.0e9).round() as i64,
        ))
        .and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn documented_julian_day_anchors() {
        assert_eq!(Julian::from_year_and_day(1990, 1.0).unwrap().date(), 2447892.5);
        assert_eq!(Julian::from_year_and_day(1990, 1.5).unwrap().date(), 2447893.0);
        assert_eq!(Julian::from_year_and_day(2000, 1.0).unwrap().date(), 2451544.5);
        assert_eq!(Julian::from_year_and_day(2000, 1.5).unwrap().date(), 2451545.0);
    }

    #[test]
    fn gmst_at_j2000() {
        let julian = Julian::from_year_and_day(2000, 1.5).unwrap();
        assert!((julian.to_gmst() - 4.89496121).abs() < 1.0e-6);
    }

    #[test]
    fn gmst_is_periodic_over_a_sidereal_day() {
        let julian = Julian::from_year_and_day(2018, 196.75093423).unwrap();
        let one_sidereal_day_later = Julian::from_year_and_day(
            2018,
            196.75093423 + 1.0 / model::OMEGA_E,
        )
        .unwrap();
        let difference = (julian.to_gmst() - one_sidereal_day_later.to_gmst()).abs();
        assert!(difference.min((model::TWO_PI - difference).abs()) < 1.0e-6);
    }

    #[test]
    fn lmst_wraps_into_two_pi() {
        let julian = Julian::from_year_and_day(2018, 233.5).unwrap();
        let lmst = julian.to_lmst(-2.0944);
        assert!((0.0..model::TWO_PI).contains(&lmst));
    }

    #[test]
    fn utc_round_trip() {
        let utc = Utc.with_ymd_and_hms(2018, 7, 18, 12, 34, 56).unwrap();
        let julian = Julian::from_utc(utc).unwrap();
        // the day fraction is not exactly representable, so the round trip
        // is good to nanoseconds, not bit-exact
        let error = (julian.to_datetime() - utc).num_nanoseconds().unwrap();
        assert!(error.abs() < 1_000);
    }

    #[test]
    fn add_minutes_crosses_year_boundaries() {
        let julian = Julian::from_year_and_day(2019, 365.75).unwrap();
        let shifted = julian.add_minutes(720.0).unwrap();
        assert_eq!(shifted.to_datetime().year(), 2020);
        assert!((shifted.diff(&julian) - 0.5).abs() < 1.0e-9);
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        assert!(matches!(
            Julian::from_year_and_day(1899, 1.0),
            Err(Error::OutOfRangeYear { year: 1899 }),
        ));
        assert!(matches!(
            Julian::from_year_and_day(2101, 1.0),
            Err(Error::OutOfRangeYear { year: 2101 }),
        ));
        assert!(matches!(
            Julian::from_year_and_day(2000, 0.5),
            Err(Error::OutOfRangeDayOfYear { .. }),
        ));
        assert!(matches!(
            Julian::from_year_and_day(2000, 367.0),
            Err(Error::OutOfRangeDayOfYear { .. }),
        ));
    }
}
