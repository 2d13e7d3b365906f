//! A ground observation site and its look angles to an orbiting target.

use crate::coords::{Eci, Geodetic, Topocentric};
use crate::julian::Julian;
use crate::model;

/// A named location on earth
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    name: String,
    geo: Geodetic,
}

impl Site {
    /// Creates a site from latitude and longitude in degrees (south and west
    /// negative) and an altitude in km above the ellipsoid
    pub fn from_degrees(latitude: f64, longitude: f64, altitude: f64, name: &str) -> Site {
        Site {
            name: name.to_owned(),
            geo: Geodetic::from_degrees(latitude, longitude, altitude),
        }
    }

    pub fn from_geodetic(geo: Geodetic, name: &str) -> Site {
        Site {
            name: name.to_owned(),
            geo,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geodetic(&self) -> &Geodetic {
        &self.geo
    }

    /// The ECI state of the site at the given time; the site co-rotates with
    /// the earth
    pub fn position_eci(&self, date: Julian) -> Eci {
        Eci::from_geodetic(&self.geo, date)
    }

    /// Topocentric look angles from this site to the given target state
    ///
    /// The range vector is rotated into the south/east/zenith frame through
    /// the site latitude and its local mean sidereal time at the target's
    /// date.
    pub fn look_angle(&self, eci: &Eci) -> Topocentric {
        // the site's state at the time of interest
        let date = eci.date;
        let site = self.position_eci(date);

        let range_rate_vector = eci.velocity - site.velocity;
        let range_vector = eci.position - site.position;
        let range = range_vector.magnitude();

        let theta = date.to_lmst(self.geo.longitude);

        let sin_lat = self.geo.latitude.sin();
        let cos_lat = self.geo.latitude.cos();
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        let top_s = sin_lat * cos_theta * range_vector.x + sin_lat * sin_theta * range_vector.y
            - cos_lat * range_vector.z;
        let top_e = -sin_theta * range_vector.x + cos_theta * range_vector.y;
        let top_z = cos_lat * cos_theta * range_vector.x
            + cos_lat * sin_theta * range_vector.y
            + sin_lat * range_vector.z;

        // the south-convention origin puts azimuth 0 at north after the
        // conditional half-turn
        let mut azimuth = (-top_e / top_s).atan();
        if top_s > 0.0 {
            azimuth += std::f64::consts::PI;
        }
        if azimuth < 0.0 {
            azimuth += model::TWO_PI;
        }

        Topocentric {
            azimuth,
            elevation: (top_z / range).asin(),
            range,
            range_rate: range_vector.dot(&range_rate_vector) / range,
            date,
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.geo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;
    use approx::assert_relative_eq;

    fn date() -> Julian {
        Julian::from_year_and_day(2018, 196.75093423).unwrap()
    }

    /// A motionless target 500 km above the site, offset 1 km sideways so
    /// the zenith angle stays representable
    fn overhead_target(site: &Site) -> Eci {
        let site_eci = site.position_eci(date());
        let up = site_eci.position * (1.0 / site_eci.position.magnitude());
        Eci {
            position: site_eci.position + up * 500.0 + Vec3::new(0.0, 0.0, 1.0),
            velocity: Vec3::new(0.0, 0.0, 0.0),
            date: date(),
        }
    }

    #[test]
    fn overhead_target_is_near_zenith() {
        let site = Site::from_degrees(0.0, 0.0, 0.0, "equator");
        let topo = site.look_angle(&overhead_target(&site));
        assert!(topo.elevation_degrees() > 89.8);
        assert_relative_eq!(topo.range, 500.0, epsilon = 0.01);
        // the range vector is nearly radial and the relative velocity tangential
        assert!(topo.range_rate.abs() < 1.0e-2);
    }

    #[test]
    fn look_angle_carries_the_target_date() {
        let site = Site::from_degrees(25.0, 121.0, 0.1, "taipei");
        let topo = site.look_angle(&overhead_target(&site));
        assert_eq!(topo.date, date());
    }

    #[test]
    fn azimuth_is_wrapped_into_two_pi() {
        let site = Site::from_degrees(25.0, 121.0, 0.1, "taipei");
        let site_eci = site.position_eci(date());
        // a target north-east of the site, well above the horizon
        let eci = Eci {
            position: site_eci.position * 1.1 + Vec3::new(0.0, 0.0, 900.0),
            velocity: Vec3::new(0.0, 0.0, 0.0),
            date: date(),
        };
        let topo = site.look_angle(&eci);
        assert!((0.0..model::TWO_PI).contains(&topo.azimuth));
    }

    #[test]
    fn display_shows_the_geodetic_coordinates() {
        let site = Site::from_degrees(25.03, 121.56, 0.01, "taipei");
        assert_eq!(format!("{}", site), "25.03N 121.56E 10m");
    }
}
