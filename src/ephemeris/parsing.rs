use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use nalgebra::Vector3;

use crate::ephemeris::error::EphemerisError;
use crate::ephemeris::pass::{ImagingPass, OrbitPath};
use crate::ephemeris::sample::RawSample;

const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M:%S%.f";
const TRACKING_KIND: &str = "Target";
const COORDINATE_COLUMNS: usize = 13;

/// A tracking window from the first report block.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingPeriod {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub kind: String,
}

/// Load a satellite-analysis report and window its samples into passes.
pub fn load_orbit_path(path: &Path) -> Result<OrbitPath<RawSample>, EphemerisError> {
    let content = fs::read_to_string(path)?;
    let path = parse_report(&content)?;
    log::info!(
        "Loaded {} imaging passes ({} samples)",
        path.len(),
        path.samples().count()
    );
    Ok(path)
}

/// Parse report text: tracking periods in block one, coordinates in block two.
pub fn parse_report(content: &str) -> Result<OrbitPath<RawSample>, EphemerisError> {
    let mut periods = Vec::new();
    let mut samples = Vec::new();
    let mut block = 0;
    let mut reading = false;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.starts_with('-') {
            reading = true;
            block += 1;
            continue;
        }
        if line.trim().is_empty() {
            reading = false;
            continue;
        }
        if !reading {
            continue;
        }
        match block {
            1 => periods.push(parse_period(line, line_no)?),
            2 => samples.push(parse_sample(line, line_no)?),
            _ => {}
        }
    }

    Ok(window_passes(&periods, samples))
}

/// Split ordered samples into one pass per `Target` tracking period.
pub fn window_passes(periods: &[TrackingPeriod], samples: Vec<RawSample>) -> OrbitPath<RawSample> {
    let mut passes = Vec::new();
    let mut samples = samples.into_iter().peekable();

    for period in periods.iter().filter(|p| p.kind == TRACKING_KIND) {
        let mut window = Vec::new();
        while let Some(sample) = samples.next_if(|s| s.timestamp <= period.stop) {
            if sample.timestamp >= period.start {
                window.push(sample);
            }
        }
        match ImagingPass::new(window) {
            Ok(pass) => passes.push(pass),
            Err(_) => log::debug!(
                "Tracking period {} - {} has no samples, skipping",
                period.start,
                period.stop
            ),
        }
    }

    OrbitPath::new(passes)
}

fn columns(line: &str) -> Vec<&str> {
    line.trim()
        .split("  ")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

fn parse_period(line: &str, line_no: usize) -> Result<TrackingPeriod, EphemerisError> {
    let cols = columns(line);
    if cols.len() < 4 {
        return Err(EphemerisError::Columns {
            line: line_no,
            expected: 4,
            found: cols.len(),
        });
    }
    Ok(TrackingPeriod {
        start: parse_timestamp(cols[0], line_no)?,
        stop: parse_timestamp(cols[1], line_no)?,
        kind: cols[3].to_string(),
    })
}

fn parse_sample(line: &str, line_no: usize) -> Result<RawSample, EphemerisError> {
    let cols = columns(line);
    if cols.len() != COORDINATE_COLUMNS {
        return Err(EphemerisError::Columns {
            line: line_no,
            expected: COORDINATE_COLUMNS,
            found: cols.len(),
        });
    }
    let timestamp = parse_timestamp(cols[0], line_no)?;
    let values = cols[1..]
        .iter()
        .map(|v| {
            v.parse::<f64>().map_err(|_| EphemerisError::Number {
                line: line_no,
                value: v.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let vec_at = |i: usize| Vector3::new(values[i], values[i + 1], values[i + 2]);

    Ok(RawSample {
        timestamp,
        sun: vec_at(0),
        sunlight: vec_at(3),
        moon: vec_at(6),
        earth: vec_at(9),
    })
}

fn parse_timestamp(value: &str, line_no: usize) -> Result<DateTime<Utc>, EphemerisError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|source| EphemerisError::Timestamp {
            line: line_no,
            value: value.to_string(),
            source,
        })
}
