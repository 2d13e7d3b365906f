//! A thin facade tying a named satellite to its orbit.

use crate::coords::Eci;
use crate::error::Result;
use crate::orbit::Orbit;
use crate::tle::Tle;
use chrono::{DateTime, Utc};

/// A satellite and its orbit
#[derive(Debug, Clone)]
pub struct Satellite {
    name: String,
    orbit: Orbit,
}

impl Satellite {
    /// Builds the satellite from a TLE, using the TLE name
    pub fn new(tle: Tle) -> Result<Satellite> {
        Satellite::with_name(tle, "")
    }

    /// Builds the satellite from a TLE under the given name; an empty name
    /// falls back to the TLE name
    pub fn with_name(tle: Tle, name: &str) -> Result<Satellite> {
        let orbit = Orbit::new(tle)?;
        let name = if name.is_empty() {
            orbit.tle().name.clone()
        } else {
            name.to_owned()
        };
        Ok(Satellite { name, orbit })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    /// The ECI state of the satellite at a UTC time
    pub fn position_eci_at(&self, utc: DateTime<Utc>) -> Result<Eci> {
        self.orbit.position_at_datetime(utc)
    }

    /// The ECI state of the satellite at `mpe` minutes past the TLE epoch
    pub fn position_eci_at_mpe(&self, mpe: f64) -> Result<Eci> {
        self.orbit.position_at(mpe)
    }
}
