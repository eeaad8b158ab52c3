mod client;
mod config;
mod error;
mod orbit;
mod record;
mod result;

pub use client::{SessionHandle, SimulatorClient};
pub use config::{AlignmentAxis, Bus, Maneuver, Orbit, SimulationConfig, SimulationOptions, DEFAULT_TLE};
pub use error::SimulatorError;
pub use orbit::{orbit_positions, teme_to_ecef_position};
pub use record::SimulationRecord;
pub use result::{extract_field, SimulationResult};
