use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geodetic::AttitudeTrack;
use crate::simulator::config::SimulationConfig;
use crate::simulator::error::SimulatorError;
use crate::simulator::result::SimulationResult;

/// A finished simulation with its orbit, stored for offline processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub config: SimulationConfig,
    pub result: SimulationResult,
    pub timestamps: Vec<DateTime<Utc>>,
    /// ECEF, meters.
    pub positions: Vec<[f64; 3]>,
}

impl SimulationRecord {
    pub fn new(
        config: SimulationConfig,
        result: SimulationResult,
        timestamps: Vec<DateTime<Utc>>,
        positions: Vec<Vector3<f64>>,
    ) -> Result<Self, SimulatorError> {
        let record = Self {
            config,
            result,
            timestamps,
            positions: positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
        };
        // Fail early rather than when the track is projected.
        record.attitude_track()?;
        Ok(record)
    }

    pub fn load(path: &Path) -> Result<Self, SimulatorError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SimulatorError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Saved simulation record to {}", path.display());
        Ok(())
    }

    pub fn attitude_track(&self) -> Result<AttitudeTrack, SimulatorError> {
        let positions = self.positions.iter().map(|p| Vector3::from(*p)).collect();
        Ok(AttitudeTrack::new(
            self.timestamps.clone(),
            positions,
            self.result.attitudes()?,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodetic::GeodeticError;
    use crate::simulator::config::{AlignmentAxis, Maneuver};
    use chrono::TimeZone;
    use serde_json::json;

    fn result(samples: usize) -> SimulationResult {
        let mrp = (0..samples * 3).map(|_| json!({"val": 0.0})).collect();
        SimulationResult {
            omega_data: Vec::new(),
            mrp_data: mrp,
            dipole_data: Vec::new(),
            gimbal_ang_data: Vec::new(),
            gimbal_vec_data: Vec::new(),
            wheel_acc_data: Vec::new(),
            wheel_vec_data: Vec::new(),
            attitude_error_data: Vec::new(),
            desired_torque_data: Vec::new(),
        }
    }

    fn record(samples: usize) -> Result<SimulationRecord, SimulatorError> {
        let start = Utc.with_ymd_and_hms(2022, 5, 27, 0, 0, 0).unwrap();
        SimulationRecord::new(
            SimulationConfig::new("Record", Maneuver::Nadir, 1, AlignmentAxis::PosX),
            result(samples),
            (0..2).map(|i| start + chrono::Duration::seconds(i)).collect(),
            vec![Vector3::new(7.0e6, 0.0, 0.0); 2],
        )
    }

    #[test]
    fn builds_track() {
        let track = record(2).unwrap().attitude_track().unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.positions()[1], Vector3::new(7.0e6, 0.0, 0.0));
    }

    #[test]
    fn mismatched_series_are_rejected() {
        assert!(matches!(
            record(3),
            Err(SimulatorError::Track(GeodeticError::LengthMismatch { attitudes: 3, .. }))
        ));
    }

    #[test]
    fn survives_a_file_round_trip() {
        let original = record(2).unwrap();
        let path = std::env::temp_dir().join(format!("startrack-record-{}.json", std::process::id()));
        original.save(&path).unwrap();
        let loaded = SimulationRecord::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, original);
    }
}
