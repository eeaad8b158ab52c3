use chrono::{DateTime, NaiveDateTime, Utc};
use nalgebra::{UnitQuaternion, Vector3};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::mrp_to_quaternion;
use crate::simulator::error::SimulatorError;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time series returned by the simulation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub omega_data: Vec<Value>,
    /// Flattened MRP components, `{"val": x}` each, three per sample.
    pub mrp_data: Vec<Value>,
    pub dipole_data: Vec<Value>,
    /// One entry per sample, carrying its `date`.
    pub gimbal_ang_data: Vec<Value>,
    pub gimbal_vec_data: Vec<Value>,
    pub wheel_acc_data: Vec<Value>,
    pub wheel_vec_data: Vec<Value>,
    pub attitude_error_data: Vec<Value>,
    pub desired_torque_data: Vec<Value>,
}

/// Locate `name` in `text` and parse the next single-quoted segment after it
/// as JSON.
pub fn extract_field<T: DeserializeOwned>(text: &str, name: &str) -> Result<T, SimulatorError> {
    let missing = || SimulatorError::MissingField(name.to_string());
    let after = &text[text.find(name).ok_or_else(missing)? + name.len()..];
    let open = after.find('\'').ok_or_else(missing)?;
    let rest = &after[open + 1..];
    let close = rest.find('\'').ok_or_else(missing)?;
    serde_json::from_str(&rest[..close]).map_err(|source| SimulatorError::FieldJson {
        name: name.to_string(),
        source,
    })
}

impl SimulationResult {
    /// Pull every series out of the service's result page.
    pub fn from_page(text: &str) -> Result<Self, SimulatorError> {
        Ok(Self {
            omega_data: extract_field(text, "omegaData")?,
            mrp_data: extract_field(text, "mrpData")?,
            dipole_data: extract_field(text, "dipoleData")?,
            gimbal_ang_data: extract_field(text, "gimbalAngData")?,
            gimbal_vec_data: extract_field(text, "gimbalVecData")?,
            wheel_acc_data: extract_field(text, "wheelAccData")?,
            wheel_vec_data: extract_field(text, "wheelVecData")?,
            attitude_error_data: extract_field(text, "attitudeErrorData")?,
            desired_torque_data: extract_field(text, "desiredTorqueData")?,
        })
    }

    /// Attitude per sample, decoded from the MRP series.
    pub fn attitudes(&self) -> Result<Vec<UnitQuaternion<f64>>, SimulatorError> {
        let values = self
            .mrp_data
            .iter()
            .map(|entry| {
                entry
                    .get("val")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| SimulatorError::Malformed(format!("mrpData entry {}", entry)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let chunks = values.chunks_exact(3);
        if !chunks.remainder().is_empty() {
            log::warn!(
                "mrpData has {} values, dropping {} trailing",
                values.len(),
                chunks.remainder().len()
            );
        }
        Ok(chunks
            .map(|m| mrp_to_quaternion(&Vector3::new(m[0], m[1], m[2])))
            .collect())
    }

    /// Sample times, UTC.
    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, SimulatorError> {
        self.gimbal_ang_data
            .iter()
            .map(|entry| {
                let date = entry
                    .get("date")
                    .and_then(Value::as_str)
                    .ok_or_else(|| SimulatorError::Malformed(format!("gimbalAngData entry {}", entry)))?;
                NaiveDateTime::parse_from_str(date, DATE_FORMAT)
                    .map(|t| t.and_utc())
                    .map_err(|source| SimulatorError::Timestamp {
                        value: date.to_string(),
                        source,
                    })
            })
            .collect()
    }
}
