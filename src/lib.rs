//! Star tracker exclusion analysis and boresight ground tracks.
//!
//! Ephemeris samples flow through three stages (raw, annotated, evaluated)
//! before being split into continuous valid runs. Simulated attitude
//! histories are projected onto the WGS-84 ellipsoid.

pub mod config;
pub mod constraints;
pub mod ephemeris;
pub mod geodetic;
pub mod geometry;
pub mod report;
pub mod segment;
pub mod simulator;
