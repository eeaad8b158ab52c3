use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};
use sgp4::{Constants, Elements};

use crate::simulator::error::SimulatorError;

/// Rotate a TEME position into the Earth-fixed frame at sidereal angle `gmst`.
pub fn teme_to_ecef_position(pos_teme: &Vector3<f64>, gmst: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst) * pos_teme
}

/// ECEF satellite positions in meters at each timestamp, from a TLE.
pub fn orbit_positions(tle: &[String; 2], timestamps: &[DateTime<Utc>]) -> Result<Vec<Vector3<f64>>, SimulatorError> {
    let elements = Elements::from_tle(None, tle[0].as_bytes(), tle[1].as_bytes())
        .map_err(|e| SimulatorError::Tle(e.to_string()))?;
    let constants = Constants::from_elements(&elements).map_err(|e| SimulatorError::Tle(e.to_string()))?;

    timestamps
        .iter()
        .map(|timestamp| {
            let naive = timestamp.naive_utc();
            let minutes = elements
                .datetime_to_minutes_since_epoch(&naive)
                .map_err(|e| SimulatorError::Propagation(e.to_string()))?;
            let prediction = constants
                .propagate(minutes)
                .map_err(|e| SimulatorError::Propagation(e.to_string()))?;
            let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&naive));
            let teme_km = Vector3::from(prediction.position);
            Ok(teme_to_ecef_position(&teme_km, sidereal) * 1000.0)
        })
        .collect()
}
