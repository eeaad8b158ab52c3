//! Fixtures shared by unit tests.

use chrono::{Duration, TimeZone, Utc};
use nalgebra::Vector3;

use crate::constraints::ConstraintEvaluator;
use crate::ephemeris::{EvaluatedSample, ImagingPass, OrbitPath, RawSample};

pub fn boresight() -> Vector3<f64> {
    Vector3::new(1.0, 0.0, 0.0)
}

/// A sample one second apart from its neighbours; the Earth sits behind the
/// boresight when `valid`, dead ahead otherwise.
pub fn raw_sample(second: i64, valid: bool) -> RawSample {
    let earth_x = if valid { -6871.0 } else { 6871.0 };
    RawSample {
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(second),
        sun: Vector3::new(0.0, 0.0, 1.5e8),
        sunlight: Vector3::new(0.0, 0.0, 1.0),
        moon: Vector3::new(0.0, 3.8e5, 0.0),
        earth: Vector3::new(earth_x, 0.0, 0.0),
    }
}

pub fn evaluated_pass(flags: &[bool]) -> ImagingPass<EvaluatedSample> {
    let raw = flags
        .iter()
        .enumerate()
        .map(|(i, &valid)| raw_sample(i as i64, valid))
        .collect();
    ImagingPass::new(raw)
        .unwrap()
        .annotate(&boresight(), 0.0)
        .evaluate(&ConstraintEvaluator::default())
}

pub fn evaluated_path(passes: &[&[bool]]) -> OrbitPath<EvaluatedSample> {
    OrbitPath::new(passes.iter().map(|flags| evaluated_pass(flags)).collect())
}

/// Flags made of `runs` valid stretches separated by single invalid samples.
pub fn flags_with_runs(runs: &[usize]) -> Vec<bool> {
    let mut flags = Vec::new();
    for (i, &len) in runs.iter().enumerate() {
        if i > 0 {
            flags.push(false);
        }
        flags.extend(std::iter::repeat(true).take(len));
    }
    flags
}
