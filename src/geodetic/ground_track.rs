use std::time::Duration;

use chrono::{DateTime, Utc};
use nalgebra::{UnitQuaternion, Vector3};
use rayon::prelude::*;
use serde::Serialize;

use crate::geodetic::ellipsoid::{ecef_to_geodetic, POLAR_RADIUS_M};
use crate::geodetic::error::GeodeticError;
use crate::geodetic::interpolate::{
    interpolate_attitudes, interpolate_positions, interpolate_timestamps, steps_per_interval,
};
use crate::geodetic::intersect::{ray_earth_intersection, IntersectionStrategy};
use crate::geometry::{heading_deg, rotate, unit};

/// Body-frame pointing direction of the instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boresight {
    /// Rotate the local nadir vector `-p/|p|` by the attitude.
    Nadir,
    /// Rotate a fixed body vector by the attitude.
    Fixed(Vector3<f64>),
}

impl Boresight {
    fn direction(&self, position: &Vector3<f64>, attitude: &UnitQuaternion<f64>) -> Option<Vector3<f64>> {
        let body = match self {
            Boresight::Nadir => unit(&-position)?,
            Boresight::Fixed(v) => *v,
        };
        Some(rotate(attitude, &body))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    pub heading_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundTrackEntry {
    pub timestamp: DateTime<Utc>,
    /// `None` when the boresight misses the Earth.
    pub point: Option<GroundPoint>,
    /// Satellite ECEF velocity, m/s, by forward difference.
    pub velocity_m_s: [f64; 3],
    pub speed_m_s: f64,
}

/// Time-aligned satellite positions (ECEF, meters) and attitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeTrack {
    timestamps: Vec<DateTime<Utc>>,
    positions: Vec<Vector3<f64>>,
    attitudes: Vec<UnitQuaternion<f64>>,
}

impl AttitudeTrack {
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        positions: Vec<Vector3<f64>>,
        attitudes: Vec<UnitQuaternion<f64>>,
    ) -> Result<Self, GeodeticError> {
        if timestamps.len() != positions.len() || positions.len() != attitudes.len() {
            return Err(GeodeticError::LengthMismatch {
                timestamps: timestamps.len(),
                positions: positions.len(),
                attitudes: attitudes.len(),
            });
        }
        Ok(Self {
            timestamps,
            positions,
            attitudes,
        })
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    pub fn attitudes(&self) -> &[UnitQuaternion<f64>] {
        &self.attitudes
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Velocity of each sample toward the next one. The last sample repeats
    /// the previous interval; a single sample is at rest.
    pub fn velocities(&self) -> Vec<Vector3<f64>> {
        let mut velocities: Vec<Vector3<f64>> = self
            .positions
            .windows(2)
            .zip(self.timestamps.windows(2))
            .map(|(p, t)| {
                let dt = (t[1] - t[0]).num_microseconds().unwrap_or(0) as f64 / 1.0e6;
                if dt > 0.0 {
                    (p[1] - p[0]) / dt
                } else {
                    Vector3::zeros()
                }
            })
            .collect();
        if let Some(&last) = velocities.last() {
            velocities.push(last);
        } else if !self.is_empty() {
            velocities.push(Vector3::zeros());
        }
        velocities
    }

    /// Densify the track so samples are roughly `target_period` apart.
    pub fn interpolate(&self, target_period: Duration) -> AttitudeTrack {
        let steps = steps_per_interval(&self.timestamps, target_period);
        log::debug!(
            "Interpolating {} samples with {} steps per interval",
            self.len(),
            steps
        );
        AttitudeTrack {
            timestamps: interpolate_timestamps(&self.timestamps, steps),
            positions: interpolate_positions(&self.positions, steps),
            attitudes: interpolate_attitudes(&self.attitudes, steps),
        }
    }
}

/// Project each sample's boresight onto the Earth. Output order matches the
/// track.
pub fn project_ground_track(
    track: &AttitudeTrack,
    boresight: Boresight,
    strategy: IntersectionStrategy,
) -> Vec<GroundTrackEntry> {
    let velocities = track.velocities();
    let entries = (0..track.len())
        .into_par_iter()
        .map(|i| {
            let v = &velocities[i];
            GroundTrackEntry {
                timestamp: track.timestamps[i],
                point: project_sample(&track.positions[i], &track.attitudes[i], boresight, strategy),
                velocity_m_s: [v.x, v.y, v.z],
                speed_m_s: v.norm(),
            }
        })
        .collect::<Vec<_>>();

    let misses = entries.iter().filter(|e| e.point.is_none()).count();
    if misses > 0 {
        log::warn!(
            "{} of {} boresight rays did not intersect the Earth",
            misses,
            entries.len()
        );
    }
    entries
}

fn project_sample(
    position: &Vector3<f64>,
    attitude: &UnitQuaternion<f64>,
    boresight: Boresight,
    strategy: IntersectionStrategy,
) -> Option<GroundPoint> {
    if position.norm() < POLAR_RADIUS_M {
        log::warn!(
            "Satellite position [{:.3}, {:.3}, {:.3}] is inside the Earth; expected meters, got kilometers?",
            position.x,
            position.y,
            position.z
        );
        return None;
    }
    let direction = boresight.direction(position, attitude)?;
    let hit = ray_earth_intersection(position, &direction, strategy)?;
    let geodetic = match ecef_to_geodetic(&hit) {
        Ok(g) => g,
        Err(GeodeticError::NotConverged { best, iterations }) => {
            log::warn!(
                "Ground point at {:.4}°, {:.4}° did not converge in {} iterations",
                best.latitude_deg,
                best.longitude_deg,
                iterations
            );
            best
        }
        Err(_) => return None,
    };
    Some(GroundPoint {
        latitude_deg: geodetic.latitude_deg,
        longitude_deg: geodetic.longitude_deg,
        altitude_m: geodetic.altitude_m,
        heading_deg: heading_deg(attitude),
    })
}
