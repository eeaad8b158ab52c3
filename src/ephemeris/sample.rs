use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::constraints::Validity;

/// Anything positioned on the mission timeline.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// One ephemeris record as ingested. All vectors in kilometers.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub sun: Vector3<f64>,
    /// Zero when the satellite is not sunlit.
    pub sunlight: Vector3<f64>,
    pub moon: Vector3<f64>,
    pub earth: Vector3<f64>,
}

impl RawSample {
    /// An all-zero sunlight vector is the eclipse sentinel.
    pub fn is_eclipsed(&self) -> bool {
        self.sunlight == Vector3::zeros()
    }
}

impl Timestamped for RawSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Angles between the tracker boresight and each bright body, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionAngles {
    pub sun_deg: f64,
    pub moon_deg: f64,
    pub earth_deg: f64,
}

/// A sample with its boresight angles and slew rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSample {
    raw: RawSample,
    angles: ExclusionAngles,
    eclipsed: bool,
    slew_rate_deg_s: f64,
}

impl AnnotatedSample {
    pub(crate) fn new(raw: RawSample, angles: ExclusionAngles, slew_rate_deg_s: f64) -> Self {
        let eclipsed = raw.is_eclipsed();
        Self {
            raw,
            angles,
            eclipsed,
            slew_rate_deg_s,
        }
    }

    pub fn raw(&self) -> &RawSample {
        &self.raw
    }

    pub fn angles(&self) -> &ExclusionAngles {
        &self.angles
    }

    pub fn eclipsed(&self) -> bool {
        self.eclipsed
    }

    /// Angular rate of the Earth vector towards the next sample, deg/s.
    pub fn slew_rate_deg_s(&self) -> f64 {
        self.slew_rate_deg_s
    }
}

impl Timestamped for AnnotatedSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.raw.timestamp
    }
}

/// A sample judged against every pointing constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedSample {
    annotated: AnnotatedSample,
    validity: Validity,
}

impl EvaluatedSample {
    pub(crate) fn new(annotated: AnnotatedSample, validity: Validity) -> Self {
        Self {
            annotated,
            validity,
        }
    }

    pub fn annotated(&self) -> &AnnotatedSample {
        &self.annotated
    }

    pub fn raw(&self) -> &RawSample {
        self.annotated.raw()
    }

    pub fn angles(&self) -> &ExclusionAngles {
        self.annotated.angles()
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }
}

impl Timestamped for EvaluatedSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.annotated.timestamp()
    }
}
