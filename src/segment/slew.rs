use crate::ephemeris::{EvaluatedSample, ImagingPass, RawSample};
use crate::geometry::angle_deg;

/// Angular rate of the Earth vector between each sample and the next, deg/s.
///
/// The last sample has no successor and gets `terminal_rate`. Pairs with a
/// non-positive time step get 0.
pub fn slew_rates(samples: &[RawSample], terminal_rate: f64) -> Vec<f64> {
    let mut rates = samples
        .windows(2)
        .map(|pair| slew_rate(&pair[0], &pair[1]))
        .collect::<Vec<_>>();
    if !samples.is_empty() {
        rates.push(terminal_rate);
    }
    rates
}

fn slew_rate(current: &RawSample, next: &RawSample) -> f64 {
    let dt = (next.timestamp - current.timestamp)
        .num_microseconds()
        .map(|us| us as f64 / 1.0e6)
        .unwrap_or(f64::INFINITY);
    if dt <= 0.0 {
        log::warn!(
            "Non-increasing timestamps {} -> {}, slew rate set to 0",
            current.timestamp,
            next.timestamp
        );
        return 0.0;
    }
    angle_deg(&current.earth, &next.earth) / dt
}

/// Highest slew rate over the valid samples of a pass.
pub fn max_valid_slew_rate(pass: &ImagingPass<EvaluatedSample>) -> Option<f64> {
    pass.samples()
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| s.annotated().slew_rate_deg_s())
        .reduce(f64::max)
}
