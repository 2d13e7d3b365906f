//! Pass ephemeris driver: reads `tle.txt` next to the executable, sweeps a
//! time window one second at a time and writes `output.eph` with one line
//! per second the satellite is at least 3° above the site's horizon.

use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use clap::Parser;
use std::io::Write;

const TIME_FORMAT: &str = "%Y-%m-%d/%H:%M:%S";

/// Minimum elevation written to the ephemeris, in degrees
const ELEVATION_CUTOFF: f64 = 3.0;

#[derive(Parser)]
#[command(about = "Writes a ground-site pass ephemeris for the satellite in tle.txt")]
struct Args {
    /// Site latitude in degrees, south negative
    #[arg(long)]
    lat: f64,

    /// Site longitude in degrees, west negative
    #[arg(long)]
    lon: f64,

    /// Site altitude above the ellipsoid model, in kilometers
    #[arg(long)]
    alt: f64,

    /// Window start in local civil time, e.g. 2018-08-21/17:23:34
    #[arg(long = "startTime")]
    start_time: String,

    /// Window end in local civil time, e.g. 2018-08-21/18:04:05
    #[arg(long = "endTime")]
    end_time: String,

    /// Local civil zone offset from UTC, in hours
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    zone: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let start = NaiveDateTime::parse_from_str(&args.start_time, TIME_FORMAT)
        .context("--startTime must be YYYY-mm-dd/HH:MM:SS")?;
    let end = NaiveDateTime::parse_from_str(&args.end_time, TIME_FORMAT)
        .context("--endTime must be YYYY-mm-dd/HH:MM:SS")?;

    // convert the window to UTC
    let zone = Duration::nanoseconds((args.zone * 3600.0e9).round() as i64);
    let start_utc = (start - zone).and_utc();
    let end_utc = (end - zone).and_utc();

    let directory = std::env::current_exe()
        .context("locating the executable")?
        .parent()
        .context("locating the executable's directory")?
        .to_path_buf();

    let tle_path = directory.join("tle.txt");
    let content = std::fs::read_to_string(&tle_path)
        .with_context(|| format!("reading {}", tle_path.display()))?;
    let mut lines = content.lines();
    let name = lines.next().unwrap_or("").trim();
    let line1 = lines.next().context("tle.txt must contain three lines")?;
    let line2 = lines.next().context("tle.txt must contain three lines")?;

    let satellite = sattrack::Satellite::new(sattrack::Tle::from_lines(name, line1, line2)?)?;
    let site = sattrack::Site::from_degrees(args.lat, args.lon, args.alt, "");

    let epoch = *satellite.orbit().epoch();

    // the sweep is monotonic, so the resonance integrator anchor (resonant
    // deep-space orbits only) is carried across iterations
    let mut state = satellite.orbit().resonance_state();

    let output_path = directory.join("output.eph");
    let mut output = std::io::BufWriter::new(
        std::fs::File::create(&output_path)
            .with_context(|| format!("creating {}", output_path.display()))?,
    );

    let mut time = start_utc;
    while time <= end_utc {
        let target = sattrack::Julian::from_utc(time)?;
        let mpe = target.diff(&epoch) * sattrack::model::MIN_PER_DAY;
        let eci = satellite.orbit().position_at_with_state(mpe, state.as_mut())?;
        let topo = site.look_angle(&eci);
        if topo.elevation_degrees() >= ELEVATION_CUTOFF {
            let local = time + zone;
            writeln!(
                output,
                "{} {:.3} {:.3}",
                local.format("%Y/%m/%d %H:%M:%S"),
                topo.elevation_degrees(),
                topo.azimuth_degrees(),
            )?;
        }
        time += Duration::seconds(1);
    }
    output.flush()?;

    println!("Done!");
    Ok(())
}
