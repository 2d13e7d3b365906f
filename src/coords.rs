//! Earth-centered inertial, geodetic and topocentric coordinate records and
//! the transforms between them.

use crate::julian::Julian;
use crate::model;
use crate::vector::Vec3;

/// An Earth-Centered Inertial position/velocity pair and its Julian date
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eci {
    /// Position in km
    pub position: Vec3,

    /// Velocity in km.s⁻¹
    pub velocity: Vec3,

    /// The time at which position and velocity were evaluated
    pub date: Julian,
}

impl Eci {
    /// The ECI state of an earth-fixed geodetic location at the given time
    ///
    /// The earth is taken as an oblate spheroid and the location co-rotates
    /// with it, so the velocity is purely rotational.
    ///
    /// Reference: The 1992 Astronomical Almanac, page K11.
    pub fn from_geodetic(geo: &Geodetic, date: Julian) -> Eci {
        let lat = geo.latitude;
        let alt = geo.altitude;

        // local mean sidereal time (θ)
        let theta = date.to_lmst(geo.longitude);
        let c = 1.0 / (1.0 + model::F * (model::F - 2.0) * lat.sin() * lat.sin()).sqrt();
        let s = (1.0 - model::F) * (1.0 - model::F) * c;
        let achcp = (model::XKMPER * c + alt) * lat.cos();

        let position = Vec3::new(
            achcp * theta.cos(),
            achcp * theta.sin(),
            (model::XKMPER * s + alt) * lat.sin(),
        );

        // ω = 2π ωₑ / 86400 rad.s⁻¹
        let mfactor = model::TWO_PI * (model::OMEGA_E / model::SEC_PER_DAY);
        let velocity = Vec3::new(-mfactor * position.y, mfactor * position.x, 0.0);

        Eci {
            position,
            velocity,
            date,
        }
    }

    /// The sub-point of this state on the WGS-72 ellipsoid
    pub fn to_geodetic(&self) -> Geodetic {
        Geodetic::from_eci(self)
    }
}

impl std::fmt::Display for Eci {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "km: ({}, {}, {}) km/s: ({}, {}, {})",
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        )
    }
}

/// A geodetic coordinate on the WGS-72 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geodetic {
    /// Latitude in radians; negative values indicate latitude south
    pub latitude: f64,

    /// Longitude in radians, reduced to [0, 2π)
    pub longitude: f64,

    /// Altitude above the ellipsoid in km
    pub altitude: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Geodetic {
        Geodetic {
            latitude,
            longitude: model::fmod2p(longitude),
            altitude,
        }
    }

    /// Creates a geodetic coordinate from degrees (south and west negative)
    /// and km
    pub fn from_degrees(latitude: f64, longitude: f64, altitude: f64) -> Geodetic {
        Geodetic::new(latitude.to_radians(), longitude.to_radians(), altitude)
    }

    /// The geodetic sub-point of an ECI state
    ///
    /// The latitude is recovered iteratively on the oblate spheroid; the
    /// loop exits when successive latitudes agree to 10⁻⁷ rad.
    pub fn from_eci(eci: &Eci) -> Geodetic {
        let pos = &eci.position;
        let theta = model::fmod2p(model::actan(pos.y, pos.x) - eci.date.to_gmst());

        let r = (pos.x * pos.x + pos.y * pos.y).sqrt();
        let e2 = model::F * (2.0 - model::F);
        let mut lat = model::actan(pos.z, r);
        let mut c;
        loop {
            let phi = lat;
            c = 1.0 / (1.0 - e2 * phi.sin() * phi.sin()).sqrt();
            lat = model::actan(pos.z + model::XKMPER * c * e2 * phi.sin(), r);
            if (lat - phi).abs() <= 1.0e-7 {
                break;
            }
        }

        Geodetic {
            latitude: lat,
            longitude: theta,
            altitude: r / lat.cos() - model::XKMPER * c,
        }
    }
}

impl std::fmt::Display for Geodetic {
    /// "38.00N 45.00W 500m"
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // east longitudes up to π, west beyond
        let longitude = if self.longitude > std::f64::consts::PI {
            self.longitude - model::TWO_PI
        } else {
            self.longitude
        };
        write!(
            formatter,
            "{:.2}{} {:.2}{} {:.0}m",
            self.latitude.to_degrees().abs(),
            if self.latitude >= 0.0 { 'N' } else { 'S' },
            longitude.to_degrees().abs(),
            if longitude >= 0.0 { 'E' } else { 'W' },
            self.altitude * 1000.0,
        )
    }
}

/// Topocentric look angles from a ground site to a target, with the time
/// they were evaluated at
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topocentric {
    /// Azimuth in radians, measured clockwise from north, in [0, 2π)
    pub azimuth: f64,

    /// Elevation above the horizon in radians
    pub elevation: f64,

    /// Range in km
    pub range: f64,

    /// Range rate in km.s⁻¹; a negative value means "towards the observer"
    pub range_rate: f64,

    /// The time associated with the coordinates
    pub date: Julian,
}

impl Topocentric {
    pub fn azimuth_degrees(&self) -> f64 {
        self.azimuth.to_degrees()
    }

    pub fn elevation_degrees(&self) -> f64 {
        self.elevation.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date() -> Julian {
        Julian::from_year_and_day(2018, 233.5).unwrap()
    }

    #[test]
    fn geodetic_to_eci_round_trip() {
        let geo = Geodetic::from_degrees(40.0, -75.0, 0.12);
        let eci = Eci::from_geodetic(&geo, date());
        let back = eci.to_geodetic();
        assert_relative_eq!(back.latitude, geo.latitude, epsilon = 1.0e-9);
        assert_relative_eq!(back.longitude, geo.longitude, epsilon = 1.0e-9);
        assert!((back.altitude - geo.altitude).abs() < 1.0e-6);
    }

    #[test]
    fn eci_to_geodetic_round_trip() {
        let eci = Eci {
            position: Vec3::new(4000.0, -3000.0, 4000.0),
            velocity: Vec3::new(0.0, 0.0, 0.0),
            date: date(),
        };
        let geo = eci.to_geodetic();
        let back = Eci::from_geodetic(&geo, date());
        assert!((back.position - eci.position).magnitude() < 1.0e-3);
    }

    #[test]
    fn equatorial_site_has_rotational_velocity_only() {
        let geo = Geodetic::from_degrees(0.0, 0.0, 0.0);
        let eci = Eci::from_geodetic(&geo, date());
        assert_relative_eq!(eci.position.magnitude(), model::XKMPER, epsilon = 1.0e-6);
        assert_eq!(eci.velocity.z, 0.0);
        // ω R ≈ 0.4651 km/s at the equator
        assert_relative_eq!(eci.velocity.magnitude(), 0.4651, epsilon = 1.0e-3);
    }

    #[test]
    fn longitude_is_reduced_to_two_pi() {
        let geo = Geodetic::from_degrees(10.0, -120.0, 0.0);
        assert!((0.0..model::TWO_PI).contains(&geo.longitude));
        assert_relative_eq!(geo.longitude, (360.0_f64 - 120.0).to_radians(), epsilon = 1.0e-12);
    }

    #[test]
    fn display_formats_hemispheres() {
        let geo = Geodetic::from_degrees(-38.5, -45.25, 0.5);
        assert_eq!(format!("{}", geo), "38.50S 45.25W 500m");
    }
}
