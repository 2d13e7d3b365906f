//! NORAD two-line element set parsing.
//!
//! Two-line element data consists of three lines in the following format
//! (reference: Dr. T.S. Kelso / www.celestrak.com):
//!
//! ```text
//! AAAAAAAAAAAAAAAAAAAAAAAA
//! 1 NNNNNU NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//! 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//! ```
//!
//! Line 0 is a twenty-four-character name. Lines 1 and 2 are the standard
//! two-line orbital element set format used by NORAD and NASA. The parser
//! trusts the fixed column layout and tolerates trailing whitespace;
//! checksums are not verified.

use crate::error::{Error, Result};
use crate::julian::Julian;

const NAME_LENGTH: usize = 24;

/// A parsed NORAD two-line element set
///
/// Angles are kept in the native TLE units (degrees); the mean motion is in
/// revolutions per day. Conversion to the radian quantities used by the
/// propagators happens once, when an [Orbit](crate::Orbit) is built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tle {
    /// Satellite name (24 characters at most)
    pub name: String,

    /// NORAD catalog number
    pub norad_number: String,

    /// International designator (launch year, number and piece)
    pub international_designator: String,

    /// Element set number
    pub element_set_number: String,

    /// Two-digit epoch year; values below 57 map to 2000 + year
    pub epoch_year: u8,

    /// Fractional day of year of the epoch, Jan 1 00h = 1.0
    pub epoch_day: f64,

    /// First time derivative of the mean motion in rev.day⁻²
    pub mean_motion_dt: f64,

    /// Second time derivative of the mean motion in rev.day⁻³
    pub mean_motion_dt2: f64,

    /// B* drag term in earth radii⁻¹
    pub bstar: f64,

    /// Inclination in degrees
    pub inclination: f64,

    /// Right ascension of the ascending node in degrees
    pub right_ascension: f64,

    /// Eccentricity, in [0, 1)
    pub eccentricity: f64,

    /// Argument of perigee in degrees
    pub argument_of_perigee: f64,

    /// Mean anomaly in degrees
    pub mean_anomaly: f64,

    /// Mean motion in revolutions per day
    pub mean_motion: f64,

    /// Revolution number at epoch
    pub revolution_number: u32,
}

fn field<'a>(line: &'a str, line_number: u8, name: &'static str, start: usize, end: usize) -> Result<&'a str> {
    line.as_bytes()
        .get(start..end)
        .and_then(|slice| std::str::from_utf8(slice).ok())
        .ok_or(Error::MalformedTle {
            line: line_number,
            field: name,
        })
}

// " 12345-3" -> 0.00012345, "-23429-5" -> -0.0000023429, " 40436+1" -> 4.0436;
// the decimal point is assumed to the left of the mantissa and a missing sign
// is positive; an all-blank field decodes to zero
fn decimal_point_assumed_exponential(field: &str, line_number: u8, name: &'static str) -> Result<f64> {
    if field.trim().is_empty() {
        return Ok(0.0);
    }
    let malformed = Error::MalformedTle {
        line: line_number,
        field: name,
    };
    let (sign, rest) = match field.as_bytes()[0] {
        b'-' => (-1.0, &field[1..]),
        _ => (1.0, &field[1..]),
    };
    let mantissa = format!("0.{}", &rest[..5])
        .parse::<f64>()
        .map_err(|_| malformed.clone())?;
    let exponent = rest[5..]
        .trim_start()
        .parse::<i32>()
        .map_err(|_| malformed)?;
    Ok(sign * mantissa * 10.0_f64.powi(exponent))
}

fn parse_f64(field: &str, line_number: u8, name: &'static str) -> Result<f64> {
    field.trim().parse().map_err(|_| Error::MalformedTle {
        line: line_number,
        field: name,
    })
}

impl Tle {
    /// Parses a name line and the two fixed-column element lines
    pub fn from_lines(name: &str, line1: &str, line2: &str) -> Result<Tle> {
        if !line1.starts_with('1') {
            return Err(Error::MalformedTle {
                line: 1,
                field: "line number",
            });
        }
        if !line2.starts_with('2') {
            return Err(Error::MalformedTle {
                line: 2,
                field: "line number",
            });
        }
        Ok(Tle {
            name: name.trim().chars().take(NAME_LENGTH).collect(),
            norad_number: field(line1, 1, "satellite number", 2, 7)?.trim().to_owned(),
            international_designator: field(line1, 1, "international designator", 9, 17)?
                .trim()
                .to_owned(),
            element_set_number: field(line1, 1, "element set number", 64, 68)?
                .trim()
                .to_owned(),
            epoch_year: parse_f64(field(line1, 1, "epoch year", 18, 20)?, 1, "epoch year")? as u8,
            epoch_day: parse_f64(field(line1, 1, "epoch day", 20, 32)?, 1, "epoch day")?,
            mean_motion_dt: parse_f64(
                field(line1, 1, "mean motion first derivative", 33, 43)?,
                1,
                "mean motion first derivative",
            )?,
            mean_motion_dt2: decimal_point_assumed_exponential(
                field(line1, 1, "mean motion second derivative", 44, 52)?,
                1,
                "mean motion second derivative",
            )?,
            bstar: decimal_point_assumed_exponential(
                field(line1, 1, "BSTAR drag", 53, 61)?,
                1,
                "BSTAR drag",
            )?,
            inclination: parse_f64(field(line2, 2, "inclination", 8, 16)?, 2, "inclination")?,
            right_ascension: parse_f64(
                field(line2, 2, "right ascension of ascending node", 17, 25)?,
                2,
                "right ascension of ascending node",
            )?,
            eccentricity: parse_f64(
                // the decimal point is assumed
                &format!("0.{}", field(line2, 2, "eccentricity", 26, 33)?),
                2,
                "eccentricity",
            )?,
            argument_of_perigee: parse_f64(
                field(line2, 2, "argument of perigee", 34, 42)?,
                2,
                "argument of perigee",
            )?,
            mean_anomaly: parse_f64(field(line2, 2, "mean anomaly", 43, 51)?, 2, "mean anomaly")?,
            mean_motion: parse_f64(field(line2, 2, "mean motion", 52, 63)?, 2, "mean motion")?,
            revolution_number: {
                let raw = field(line2, 2, "revolution number", 63, 68)?.trim();
                if raw.is_empty() {
                    0
                } else {
                    raw.parse().map_err(|_| Error::MalformedTle {
                        line: 2,
                        field: "revolution number",
                    })?
                }
            },
        })
    }

    /// The epoch as a Julian date; two-digit years below 57 map to 2000 + y
    pub fn epoch_julian(&self) -> Result<Julian> {
        let year = if self.epoch_year < 57 {
            2000 + self.epoch_year as i32
        } else {
            1900 + self.epoch_year as i32
        };
        Julian::from_year_and_day(year, self.epoch_day)
    }

    /// Line format validation is not provided by this crate
    pub fn is_valid_format(_line: &str) -> Result<bool> {
        Err(Error::NotImplemented {
            operation: "TLE line format validation",
        })
    }

    /// Checksum computation is not provided by this crate (reading is permissive)
    pub fn checksum(_line: &str) -> Result<u8> {
        Err(Error::NotImplemented {
            operation: "TLE checksum",
        })
    }
}

/// Parses consecutive name + line 1 + line 2 triplets
pub fn parse_3les(tles: &str) -> Result<Vec<Tle>> {
    let mut elements_group = Vec::new();
    let mut lines = tles.lines().filter(|line| !line.trim().is_empty());
    while let Some(name) = lines.next() {
        let line1 = lines.next().ok_or(Error::MalformedTle {
            line: 1,
            field: "missing line",
        })?;
        let line2 = lines.next().ok_or(Error::MalformedTle {
            line: 2,
            field: "missing line",
        })?;
        elements_group.push(Tle::from_lines(name, line1, line2)?);
    }
    Ok(elements_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERRA_LINE1: &str =
        "1 25994U 99068A   18196.75093423 -.00000025  00000-0  45345-5 0  9993";
    const TERRA_LINE2: &str =
        "2 25994  98.2051 271.2050 0001021  68.8940 291.2371 14.57112414987988";

    fn assert_eq_f64(first: f64, second: f64) {
        if second == 0.0 {
            assert_eq!(first, 0.0);
        } else {
            assert!((first - second).abs() / second.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn parse_terra() -> Result<()> {
        let tle = Tle::from_lines("TERRA", TERRA_LINE1, TERRA_LINE2)?;
        assert_eq!(tle.name, "TERRA");
        assert_eq!(tle.norad_number, "25994");
        assert_eq!(tle.international_designator, "99068A");
        assert_eq!(tle.element_set_number, "999");
        assert_eq!(tle.epoch_year, 18);
        assert_eq_f64(tle.epoch_day, 196.75093423);
        assert_eq_f64(tle.mean_motion_dt, -0.00000025);
        assert_eq_f64(tle.mean_motion_dt2, 0.0);
        assert_eq_f64(tle.bstar, 0.45345e-5);
        assert_eq_f64(tle.inclination, 98.2051);
        assert_eq_f64(tle.right_ascension, 271.2050);
        assert_eq_f64(tle.eccentricity, 0.0001021);
        assert_eq_f64(tle.argument_of_perigee, 68.8940);
        assert_eq_f64(tle.mean_anomaly, 291.2371);
        assert_eq_f64(tle.mean_motion, 14.57112414);
        assert_eq!(tle.revolution_number, 98798);
        assert!((tle.epoch_julian()?.date() - 2458315.25093423).abs() < 1.0e-6);
        Ok(())
    }

    #[test]
    fn parse_negative_drag_terms() -> Result<()> {
        let tle = Tle::from_lines(
            "ISS (ZARYA)",
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
            "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
        )?;
        assert_eq_f64(tle.mean_motion_dt, -0.00002182);
        assert_eq_f64(tle.bstar, -0.11606e-4);
        assert_eq!(tle.revolution_number, 56353);
        Ok(())
    }

    #[test]
    fn parse_blank_designator_and_large_drag() -> Result<()> {
        let tle = Tle::from_lines(
            "",
            "1 11801U          80230.29629788  .01431103  00000-0  14311-1 0    13",
            "2 11801  46.7916 230.4354 7318036  47.4722  10.4117  2.28537848    13",
        )?;
        assert_eq!(tle.name, "");
        assert_eq!(tle.international_designator, "");
        assert_eq_f64(tle.mean_motion_dt, 0.01431103);
        assert_eq_f64(tle.bstar, 0.014311);
        assert_eq_f64(tle.eccentricity, 0.7318036);
        assert_eq!(tle.epoch_year, 80);
        assert_eq!(tle.epoch_julian()?.to_datetime().format("%Y").to_string(), "1980");
        Ok(())
    }

    #[test]
    fn parse_3les_splits_triplets() -> Result<()> {
        let text = format!("TERRA\n{}\n{}\n", TERRA_LINE1, TERRA_LINE2);
        let group = parse_3les(&text.repeat(2))?;
        assert_eq!(group.len(), 2);
        assert!(group.iter().all(|tle| tle.name == "TERRA"));
        Ok(())
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(matches!(
            Tle::from_lines("X", "garbage", TERRA_LINE2),
            Err(Error::MalformedTle { line: 1, .. }),
        ));
        assert!(matches!(
            Tle::from_lines("X", TERRA_LINE1, "2 25994  98.2051"),
            Err(Error::MalformedTle { line: 2, .. }),
        ));
    }

    #[test]
    fn format_validation_is_not_implemented() {
        assert!(matches!(
            Tle::is_valid_format(TERRA_LINE1),
            Err(Error::NotImplemented { .. }),
        ));
        assert!(matches!(
            Tle::checksum(TERRA_LINE1),
            Err(Error::NotImplemented { .. }),
        ));
    }
}
