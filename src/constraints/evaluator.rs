use nalgebra::Vector3;
use serde::Deserialize;

use crate::constraints::types::{Constraint, EarthLimb, Validity};
use crate::ephemeris::{AnnotatedSample, ExclusionAngles, RawSample};
use crate::geometry::angle_deg;

pub const DEFAULT_MIN_ANGLE_DEG: f64 = 40.0;
pub const DEFAULT_EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_ATMOSPHERE_KM: f64 = 100.0;
pub const DEFAULT_ALTITUDE_KM: f64 = 500.0;

/// Tunable constraint thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConstraintParams {
    pub sun_min_angle_deg: f64,
    pub moon_min_angle_deg: f64,
    pub earth_min_angle_deg: f64,
    /// Orbital altitude used for the Earth limb; fixed, not per-sample.
    pub altitude_km: f64,
    pub atmosphere_km: f64,
    pub earth_radius_km: f64,
}

impl Default for ConstraintParams {
    fn default() -> Self {
        Self {
            sun_min_angle_deg: DEFAULT_MIN_ANGLE_DEG,
            moon_min_angle_deg: DEFAULT_MIN_ANGLE_DEG,
            earth_min_angle_deg: DEFAULT_MIN_ANGLE_DEG,
            altitude_km: DEFAULT_ALTITUDE_KM,
            atmosphere_km: DEFAULT_ATMOSPHERE_KM,
            earth_radius_km: DEFAULT_EARTH_RADIUS_KM,
        }
    }
}

impl ConstraintParams {
    pub fn earth_limb(&self) -> EarthLimb {
        EarthLimb {
            earth_radius_km: self.earth_radius_km,
            atmosphere_km: self.atmosphere_km,
            altitude_km: self.altitude_km,
        }
    }
}

/// Checks samples against an ordered list of constraints.
///
/// Evaluation stops at the first failing constraint, which is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintEvaluator {
    constraints: Vec<Constraint>,
}

impl Default for ConstraintEvaluator {
    fn default() -> Self {
        Self::new(&ConstraintParams::default())
    }
}

impl ConstraintEvaluator {
    /// Sun, Moon, Earth, then eclipse.
    pub fn new(params: &ConstraintParams) -> Self {
        Self::with_constraints(vec![
            Constraint::Sun {
                min_angle_deg: params.sun_min_angle_deg,
            },
            Constraint::Moon {
                min_angle_deg: params.moon_min_angle_deg,
            },
            Constraint::Earth {
                min_angle_deg: params.earth_min_angle_deg,
                limb: params.earth_limb(),
            },
            Constraint::Eclipse,
        ])
    }

    pub fn with_constraints(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    pub fn evaluate(&self, angles: &ExclusionAngles, eclipsed: bool) -> Validity {
        self.constraints
            .iter()
            .find(|c| !c.is_satisfied(angles, eclipsed))
            .map_or(Validity::Valid, |c| Validity::Invalid(c.kind()))
    }

    pub fn evaluate_sample(&self, sample: &AnnotatedSample) -> Validity {
        self.evaluate(sample.angles(), sample.eclipsed())
    }
}

/// Angles from the boresight to the Sun, Moon and Earth center.
pub fn exclusion_angles(sample: &RawSample, boresight: &Vector3<f64>) -> ExclusionAngles {
    ExclusionAngles {
        sun_deg: angle_deg(&sample.sun, boresight),
        moon_deg: angle_deg(&sample.moon, boresight),
        earth_deg: angle_deg(&sample.earth, boresight),
    }
}
