//! Orbit recovery from TLE mean elements and propagator dispatch.

use crate::coords::Eci;
use crate::deep_space::{DeepSpace, ResonanceState};
use crate::error::Result;
use crate::julian::Julian;
use crate::model;
use crate::near_earth::NearEarth;
use crate::propagator::MeanElements;
use crate::tle::Tle;
use chrono::{DateTime, Utc};

/// Deep-space orbits have periods of 225 minutes or more
const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

#[derive(Debug, Clone)]
enum Model {
    NearEarth(NearEarth),
    DeepSpace(DeepSpace),
}

/// A satellite orbit derived from a two-line element set
///
/// Construction recovers the Brouwer mean motion and semi-major axis from
/// the Kozai elements of the TLE and selects the SGP4 (near-earth) or SDP4
/// (deep-space) model once; the selection is a constant of the orbit.
/// Propagation is time-addressed and leaves the orbit unchanged.
#[derive(Debug, Clone)]
pub struct Orbit {
    tle: Tle,
    epoch: Julian,

    // TLE elements converted to radians
    inclination: f64,
    right_ascension: f64,
    eccentricity: f64,
    argument_of_perigee: f64,
    mean_anomaly: f64,
    bstar: f64,

    // quantities recovered from the input elements
    mean_motion: f64,
    semi_major: f64,
    semi_minor: f64,
    perigee: f64,
    apogee: f64,

    model: Model,
}

impl Orbit {
    pub fn new(tle: Tle) -> Result<Orbit> {
        let epoch = tle.epoch_julian()?;

        let inclination = tle.inclination.to_radians();
        let right_ascension = tle.right_ascension.to_radians();
        let eccentricity = tle.eccentricity;
        let argument_of_perigee = tle.argument_of_perigee.to_radians();
        let mean_anomaly = tle.mean_anomaly.to_radians();
        let bstar = tle.bstar;

        // recover the original (Brouwer) mean motion and semi-major axis
        // from the input elements
        let rpmin = tle.mean_motion * model::TWO_PI / model::MIN_PER_DAY;

        let a1 = (model::XKE / rpmin).powf(2.0 / 3.0);
        let e = eccentricity;
        let temp = 1.5 * model::CK2 * (3.0 * inclination.cos() * inclination.cos() - 1.0)
            / (1.0 - e * e).powf(1.5);
        let delta1 = temp / (a1 * a1);
        let a0 = a1 * (1.0 - delta1 * (1.0 / 3.0 + delta1 * (1.0 + 134.0 / 81.0 * delta1)));
        let delta0 = temp / (a0 * a0);

        // n₀" in rad.min⁻¹ and a₀" in earth radii
        let mean_motion = rpmin / (1.0 + delta0);
        let semi_major = a0 / (1.0 - delta0);
        let semi_minor = semi_major * (1.0 - e * e).sqrt();
        let perigee = model::XKMPER * (semi_major * (1.0 - e) - model::AE);
        let apogee = model::XKMPER * (semi_major * (1.0 + e) - model::AE);

        let els = MeanElements {
            inclination,
            right_ascension,
            eccentricity,
            argument_of_perigee,
            mean_anomaly,
            bstar,
            mean_motion,
            semi_major,
        };

        let period = model::TWO_PI / mean_motion;
        let model = if period >= DEEP_SPACE_PERIOD_MIN {
            Model::DeepSpace(DeepSpace::new(els, &epoch))
        } else {
            Model::NearEarth(NearEarth::new(els))
        };

        Ok(Orbit {
            tle,
            epoch,
            inclination,
            right_ascension,
            eccentricity,
            argument_of_perigee,
            mean_anomaly,
            bstar,
            mean_motion,
            semi_major,
            semi_minor,
            perigee,
            apogee,
            model,
        })
    }

    pub fn tle(&self) -> &Tle {
        &self.tle
    }

    pub fn epoch(&self) -> &Julian {
        &self.epoch
    }

    /// Inclination in radians
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Right ascension of the ascending node in radians
    pub fn right_ascension(&self) -> f64 {
        self.right_ascension
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Argument of perigee in radians
    pub fn argument_of_perigee(&self) -> f64 {
        self.argument_of_perigee
    }

    /// Mean anomaly at epoch in radians
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// B* drag term in earth radii⁻¹
    pub fn bstar(&self) -> f64 {
        self.bstar
    }

    /// Recovered (Brouwer) mean motion in rad.min⁻¹
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Recovered semi-major axis in earth radii
    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    /// Recovered semi-minor axis in earth radii
    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    /// Perigee altitude above the equatorial radius, in km
    pub fn perigee(&self) -> f64 {
        self.perigee
    }

    /// Apogee altitude above the equatorial radius, in km
    pub fn apogee(&self) -> f64 {
        self.apogee
    }

    /// Orbital period in minutes, from the recovered mean motion
    pub fn period_minutes(&self) -> f64 {
        model::TWO_PI / self.mean_motion
    }

    /// Whether the deep-space (SDP4) model was selected at construction
    pub fn is_deep_space(&self) -> bool {
        matches!(self.model, Model::DeepSpace(_))
    }

    /// Satellite name and catalog number, e.g. "TERRA #25994"
    pub fn satellite_name(&self) -> String {
        format!("{} #{}", self.tle.name, self.tle.norad_number)
    }

    /// The initial deep-space resonance integrator state
    ///
    /// `None` unless the orbit is deep-space and resonant. For resonant
    /// orbits, passing the same state to successive
    /// [position_at_with_state](Orbit::position_at_with_state) calls reuses
    /// the integrator anchor instead of re-integrating from epoch.
    pub fn resonance_state(&self) -> Option<ResonanceState> {
        match &self.model {
            Model::NearEarth(_) => None,
            Model::DeepSpace(deep_space) => deep_space.initial_state(),
        }
    }

    /// ECI position and velocity at `tsince` minutes past the TLE epoch
    pub fn position_at(&self, tsince: f64) -> Result<Eci> {
        self.position_at_with_state(tsince, self.resonance_state().as_mut())
    }

    /// ECI position and velocity at `tsince` minutes past the TLE epoch,
    /// reusing a caller-held resonance integrator state
    pub fn position_at_with_state(
        &self,
        tsince: f64,
        state: Option<&mut ResonanceState>,
    ) -> Result<Eci> {
        let satellite = self.satellite_name();
        match &self.model {
            Model::NearEarth(near_earth) => near_earth.position_at(tsince, &self.epoch, &satellite),
            Model::DeepSpace(deep_space) => {
                deep_space.position_at(tsince, state, &self.epoch, &satellite)
            }
        }
    }

    /// ECI position and velocity at a UTC time
    ///
    /// "Predicted" TLEs can have epochs in the future, so the offset may be
    /// negative.
    pub fn position_at_datetime(&self, utc: DateTime<Utc>) -> Result<Eci> {
        let target = Julian::from_utc(utc)?;
        self.position_at(target.diff(&self.epoch) * model::MIN_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terra() -> Tle {
        Tle::from_lines(
            "TERRA",
            "1 25994U 99068A   18196.75093423 -.00000025  00000-0  45345-5 0  9993",
            "2 25994  98.2051 271.2050 0001021  68.8940 291.2371 14.57112414987988",
        )
        .unwrap()
    }

    #[test]
    fn terra_element_recovery() -> Result<()> {
        let orbit = Orbit::new(terra())?;
        // a sun-synchronous orbit at roughly 700 km altitude
        assert!((orbit.period_minutes() - 98.8).abs() < 0.1);
        assert!(orbit.perigee() > 650.0 && orbit.perigee() < 750.0);
        assert!(orbit.apogee() > 650.0 && orbit.apogee() < 750.0);
        assert!(orbit.perigee() <= orbit.apogee());
        assert!((orbit.semi_minor() - orbit.semi_major()).abs() < 1.0e-4);
        assert!(!orbit.is_deep_space());
        assert_eq!(orbit.satellite_name(), "TERRA #25994");
        Ok(())
    }

    #[test]
    fn period_threshold_selects_the_model() -> Result<()> {
        // 14.57 rev/day, period far below 225 min
        assert!(!Orbit::new(terra())?.is_deep_space());

        // a geosynchronous TLE, period around 1436 min
        let geo = Tle::from_lines(
            "GEO TEST",
            "1 44444U 19099A   20001.00000000  .00000000  00000-0  00000-0 0  9990",
            "2 44444   0.0500  75.0000 0001000 120.0000 200.0000  1.00273790123456",
        )
        .unwrap();
        let orbit = Orbit::new(geo)?;
        assert!(orbit.is_deep_space());
        assert!((orbit.period_minutes() - 1436.0).abs() < 5.0);
        assert!(orbit.resonance_state().is_some());
        Ok(())
    }

    #[test]
    fn near_earth_orbits_have_no_resonance_state() -> Result<()> {
        assert!(Orbit::new(terra())?.resonance_state().is_none());
        Ok(())
    }
}
