use std::time::Duration;

use chrono::{DateTime, Utc};
use nalgebra::{UnitQuaternion, Vector3};

use crate::geometry::{lerp, slerp_at};

/// Sub-steps per input interval so the output spacing approaches `target`.
///
/// Uses the average spacing of `timestamps`; never less than 1.
pub fn steps_per_interval(timestamps: &[DateTime<Utc>], target: Duration) -> usize {
    let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) else {
        return 1;
    };
    if timestamps.len() < 2 || target.is_zero() {
        return 1;
    }
    let span_s = (*last - *first)
        .num_microseconds()
        .map(|us| us as f64 / 1.0e6)
        .unwrap_or(0.0);
    let average_s = span_s / (timestamps.len() - 1) as f64;
    let steps = (average_s / target.as_secs_f64()).floor();
    if steps.is_finite() && steps >= 1.0 {
        steps as usize
    } else {
        1
    }
}

// Each interval contributes `steps` points at k/steps, k in 0..steps; the
// final input closes the sequence. Output length is (n - 1)·steps + 1.
fn densify<T: Clone>(items: &[T], steps: usize, at: impl Fn(&T, &T, f64) -> T) -> Vec<T> {
    let steps = steps.max(1);
    let Some(last) = items.last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity((items.len() - 1) * steps + 1);
    for pair in items.windows(2) {
        for k in 0..steps {
            out.push(at(&pair[0], &pair[1], k as f64 / steps as f64));
        }
    }
    out.push(last.clone());
    out
}

/// Linear interpolation between consecutive positions.
pub fn interpolate_positions(positions: &[Vector3<f64>], steps: usize) -> Vec<Vector3<f64>> {
    densify(positions, steps, lerp)
}

/// Shortest-arc slerp between consecutive attitudes.
pub fn interpolate_attitudes(attitudes: &[UnitQuaternion<f64>], steps: usize) -> Vec<UnitQuaternion<f64>> {
    densify(attitudes, steps, slerp_at)
}

/// Evenly spaced timestamps between consecutive inputs.
pub fn interpolate_timestamps(timestamps: &[DateTime<Utc>], steps: usize) -> Vec<DateTime<Utc>> {
    densify(timestamps, steps, |a, b, t| {
        let span_us = (*b - *a).num_microseconds().unwrap_or(0);
        *a + chrono::Duration::microseconds((span_us as f64 * t).round() as i64)
    })
}
