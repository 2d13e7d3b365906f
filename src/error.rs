use chrono::{DateTime, Utc};

/// Represents a parsing, range or propagation error
#[derive(Debug, Clone)]
pub enum Error {
    /// The year is outside the supported [1900, 2100] range
    OutOfRangeYear {
        year: i32,
    },

    /// The day of year is outside the [1, 367) range
    OutOfRangeDayOfYear {
        day: f64,
    },

    /// A TLE field could not be decoded
    MalformedTle {
        /// TLE line number (1 or 2)
        line: u8,

        /// Field name
        field: &'static str,
    },

    /// The orbit became hyperbolic during propagation
    Hyperbolic {
        /// Eccentricity value (unitless)
        eccentricity: f64,

        /// Minutes since epoch
        t: f64,
    },

    /// The computed position fell below the surface of the earth
    Decayed {
        /// Satellite name and catalog number
        satellite: String,

        /// UTC time of the failed evaluation
        time: DateTime<Utc>,
    },

    /// The requested operation is not provided by this crate
    NotImplemented {
        operation: &'static str,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfRangeYear { year } => {
                write!(formatter, "the year {} is outside the range [1900, 2100]", year)
            }
            Error::OutOfRangeDayOfYear { day } => {
                write!(formatter, "the day of year {} is outside the range [1, 367)", day)
            }
            Error::MalformedTle { line, field } => {
                write!(formatter, "the {} field of TLE line {} is malformed", field, line)
            }
            Error::Hyperbolic { eccentricity, t } => write!(
                formatter,
                "satellite data invalid: the eccentricity ({}) is hyperbolic {} minutes after epoch",
                eccentricity, t,
            ),
            Error::Decayed { satellite, time } => {
                write!(formatter, "{} is below the surface of the earth at {}", satellite, time)
            }
            Error::NotImplemented { operation } => {
                write!(formatter, "{} is not implemented", operation)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
