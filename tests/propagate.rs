use sattrack::model;

const TERRA: (&str, &str, &str) = (
    "TERRA",
    "1 25994U 99068A   18196.75093423 -.00000025  00000-0  45345-5 0  9993",
    "2 25994  98.2051 271.2050 0001021  68.8940 291.2371 14.57112414987988",
);

const GEO: (&str, &str, &str) = (
    "GEO TEST",
    "1 44444U 19099A   20001.00000000  .00000000  00000-0  00000-0 0  9990",
    "2 44444   0.0500  75.0000 0001000 120.0000 200.0000  1.00273790123456",
);

const MOLNIYA: (&str, &str, &str) = (
    "MOLNIYA 1-36",
    "1 08195U 75081A   06176.33215444  .00000099  00000-0  11873-3 0   813",
    "2 08195  64.1586 279.0717 6877146 264.7651  20.2257  2.00491383225656",
);

const SUBORBITAL: (&str, &str, &str) = (
    "SUBORBITAL TEST",
    "1 99999U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9990",
    "2 99999  28.5000  10.0000 1000000  30.0000   0.0000 16.40000000    18",
);

fn orbit(tle: (&str, &str, &str)) -> anyhow::Result<sattrack::Orbit> {
    Ok(sattrack::Orbit::new(sattrack::Tle::from_lines(
        tle.0, tle.1, tle.2,
    )?)?)
}

#[test]
fn near_earth_radius_brackets_at_epoch() -> anyhow::Result<()> {
    let orbit = orbit(TERRA)?;
    assert!(!orbit.is_deep_space());

    let eci = orbit.position_at(0.0)?;
    let radius = eci.position.magnitude();
    // the osculating radius stays within the perigee/apogee bracket, with
    // slack for the short-period J₂ terms
    assert!(radius >= model::XKMPER + orbit.perigee() - 10.0);
    assert!(radius <= model::XKMPER + orbit.apogee() + 10.0);
    Ok(())
}

#[test]
fn near_earth_state_after_an_orbit_is_sane() -> anyhow::Result<()> {
    let orbit = orbit(TERRA)?;
    let eci = orbit.position_at(90.0)?;
    let radius = eci.position.magnitude();
    let speed = eci.velocity.magnitude();
    assert!(radius.is_finite() && speed.is_finite());
    assert!(radius >= model::XKMPER);
    // low-earth orbital speed
    assert!(speed > 6.0 && speed < 9.0);
    // the epoch of the returned state is the evaluation time
    assert!((eci.date.diff(orbit.epoch()) - 90.0 / model::MIN_PER_DAY).abs() < 1.0e-6);
    Ok(())
}

#[test]
fn geosynchronous_orbit_selects_deep_space() -> anyhow::Result<()> {
    let orbit = orbit(GEO)?;
    assert!(orbit.is_deep_space());
    assert!((orbit.period_minutes() - 1436.0).abs() < 5.0);
    Ok(())
}

#[test]
fn geosynchronous_longitude_holds_over_a_sidereal_day() -> anyhow::Result<()> {
    let orbit = orbit(GEO)?;
    let sidereal_day_minutes = model::MIN_PER_DAY / model::OMEGA_E;

    let start = orbit.position_at(0.0)?.to_geodetic();
    let end = orbit.position_at(sidereal_day_minutes)?.to_geodetic();

    let mut drift = (end.longitude - start.longitude).abs();
    if drift > std::f64::consts::PI {
        drift = model::TWO_PI - drift;
    }
    assert!(drift < 1.0_f64.to_radians());
    Ok(())
}

#[test]
fn resonance_state_reuse_matches_stateless_propagation() -> anyhow::Result<()> {
    let orbit = orbit(GEO)?;
    let mut state = orbit.resonance_state();
    assert!(state.is_some());

    for step in 1..=4 {
        orbit.position_at_with_state(720.0 * step as f64, state.as_mut())?;
    }
    let reused = orbit.position_at_with_state(2880.0, state.as_mut())?;
    let fresh = orbit.position_at(2880.0)?;

    assert!((reused.position - fresh.position).magnitude() < 1.0e-6);
    assert!((reused.velocity - fresh.velocity).magnitude() < 1.0e-9);
    Ok(())
}

#[test]
fn molniya_resonance_sweep_stays_above_the_surface() -> anyhow::Result<()> {
    let orbit = orbit(MOLNIYA)?;
    assert!(orbit.is_deep_space());
    assert!(orbit.eccentricity() >= 0.5);

    let mut state = orbit.resonance_state();
    assert!(state.is_some());
    for day in 0..=7 {
        let eci = orbit.position_at_with_state(day as f64 * model::MIN_PER_DAY, state.as_mut())?;
        let radius = eci.position.magnitude();
        assert!(radius.is_finite());
        assert!(radius >= model::XKMPER);
        assert!(radius <= model::XKMPER + orbit.apogee() + 500.0);
    }
    // the integrator anchor followed the sweep in 720 min steps
    let final_anchor = state.expect("the orbit is resonant").t();
    assert!(final_anchor > 7.0 * model::MIN_PER_DAY - 720.0);
    Ok(())
}

#[test]
fn sub_orbital_elements_decay_immediately() -> anyhow::Result<()> {
    let orbit = orbit(SUBORBITAL)?;
    assert!(orbit.perigee() < 0.0);

    match orbit.position_at(0.0) {
        Err(sattrack::Error::Decayed { satellite, time }) => {
            assert!(satellite.contains("99999"));
            // the error carries the evaluation time (the epoch, for Δt = 0)
            let epoch = orbit.epoch().to_datetime();
            assert!((time - epoch).num_seconds().abs() < 1);
        }
        other => panic!("expected a decay error, got {:?}", other.map(|eci| eci.position)),
    }
    Ok(())
}

#[test]
fn look_angles_from_a_site_over_a_pass() -> anyhow::Result<()> {
    let orbit = orbit(TERRA)?;
    let site = sattrack::Site::from_degrees(25.03, 121.56, 0.01, "taipei");

    // sweep half a day in one-minute steps; TERRA passes over every site
    // eventually, but here it is enough that every sample is consistent
    let mut visible = 0;
    for minute in 0..720 {
        let eci = orbit.position_at(minute as f64)?;
        let topo = site.look_angle(&eci);
        assert!((0.0..model::TWO_PI).contains(&topo.azimuth));
        assert!(topo.elevation.abs() <= std::f64::consts::FRAC_PI_2);
        assert!(topo.range > 0.0);
        if topo.elevation_degrees() >= 3.0 {
            visible += 1;
        }
    }
    // a 700 km sun-synchronous satellite is below the horizon most of the time
    assert!(visible < 360);
    Ok(())
}
