//! This crate predicts the position and velocity of earth-orbiting
//! satellites from NORAD two-line element sets, and computes look angles
//! (azimuth, elevation, range, range rate) from ground sites.
//!
//! TLE mean elements are converted into time-tagged earth-centered inertial
//! state vectors with the SGP4 analytical model for near-earth orbits and
//! the SDP4 model, with lunisolar perturbations and geopotential resonance
//! handling, for orbits with periods of 225 minutes or more. The model is
//! selected once per orbit, from the recovered period.
//!
//! All constants are WGS-72.
//!
//! # Example
//!
//! The following program predicts when TERRA rises more than 3° above the
//! horizon of a site over one hour past the TLE epoch.
//!
//! ```
//! fn main() -> sattrack::Result<()> {
//!     let tle = sattrack::Tle::from_lines(
//!         "TERRA",
//!         "1 25994U 99068A   18196.75093423 -.00000025  00000-0  45345-5 0  9993",
//!         "2 25994  98.2051 271.2050 0001021  68.8940 291.2371 14.57112414987988",
//!     )?;
//!     let satellite = sattrack::Satellite::new(tle)?;
//!     let site = sattrack::Site::from_degrees(25.03, 121.56, 0.01, "taipei");
//!     for minute in 0..60 {
//!         let eci = satellite.position_eci_at_mpe(minute as f64)?;
//!         let topo = site.look_angle(&eci);
//!         if topo.elevation_degrees() >= 3.0 {
//!             println!(
//!                 "t = {:2} min: elevation {:7.3}°, azimuth {:7.3}°, range {:8.1} km",
//!                 minute,
//!                 topo.elevation_degrees(),
//!                 topo.azimuth_degrees(),
//!                 topo.range,
//!             );
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod coords;
mod deep_space;
mod error;
mod julian;
pub mod model;
mod near_earth;
mod orbit;
mod propagator;
mod satellite;
mod site;
mod tle;
mod vector;

pub use coords::Eci;
pub use coords::Geodetic;
pub use coords::Topocentric;
pub use deep_space::ResonanceState;
pub use error::Error;
pub use error::Result;
pub use julian::Julian;
pub use orbit::Orbit;
pub use satellite::Satellite;
pub use site::Site;
pub use tle::parse_3les;
pub use tle::Tle;
pub use vector::Vec3;
