use thiserror::Error;

use crate::geodetic::ellipsoid::Geodetic;

#[derive(Debug, Error, PartialEq)]
pub enum GeodeticError {
    #[error("latitude did not converge after {iterations} iterations")]
    NotConverged { best: Geodetic, iterations: usize },
    #[error("position is at the Earth's center")]
    AtEarthCenter,
    #[error("track length mismatch: {timestamps} timestamps, {positions} positions, {attitudes} attitudes")]
    LengthMismatch {
        timestamps: usize,
        positions: usize,
        attitudes: usize,
    },
}
