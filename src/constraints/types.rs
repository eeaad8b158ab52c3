use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

use crate::ephemeris::ExclusionAngles;

/// Identifies which pointing constraint a sample violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintKind {
    SunExclusion,
    MoonExclusion,
    EarthExclusion,
    Eclipse,
}

/// Geometry of the sunlit atmosphere seen from orbit. Kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthLimb {
    pub earth_radius_km: f64,
    pub atmosphere_km: f64,
    pub altitude_km: f64,
}

impl EarthLimb {
    /// Half-angle subtended by the Earth plus its atmosphere layer, degrees.
    pub fn cone_angle_deg(&self) -> f64 {
        let ratio = (self.earth_radius_km + self.atmosphere_km) / (self.earth_radius_km + self.altitude_km);
        ratio.clamp(-1.0, 1.0).asin().to_degrees()
    }
}

/// A single pointing constraint with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Sun { min_angle_deg: f64 },
    Moon { min_angle_deg: f64 },
    Earth { min_angle_deg: f64, limb: EarthLimb },
    Eclipse,
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Sun { .. } => ConstraintKind::SunExclusion,
            Constraint::Moon { .. } => ConstraintKind::MoonExclusion,
            Constraint::Earth { .. } => ConstraintKind::EarthExclusion,
            Constraint::Eclipse => ConstraintKind::Eclipse,
        }
    }

    pub fn is_satisfied(&self, angles: &ExclusionAngles, eclipsed: bool) -> bool {
        match self {
            Constraint::Sun { min_angle_deg } => angles.sun_deg >= *min_angle_deg,
            Constraint::Moon { min_angle_deg } => angles.moon_deg >= *min_angle_deg,
            Constraint::Earth {
                min_angle_deg,
                limb,
            } => angles.earth_deg >= limb.cone_angle_deg() + min_angle_deg,
            Constraint::Eclipse => !eclipsed,
        }
    }
}

/// Outcome of checking a sample against every constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    Valid,
    /// Carries the first constraint that failed.
    Invalid(ConstraintKind),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn failed(&self) -> Option<ConstraintKind> {
        match self {
            Validity::Valid => None,
            Validity::Invalid(kind) => Some(*kind),
        }
    }
}
