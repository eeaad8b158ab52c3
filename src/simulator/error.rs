use std::time::Duration;

use thiserror::Error;

use crate::geodetic::GeodeticError;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server error (status {status}): {message}")]
    Status { status: u16, message: String },
    #[error("No session cookie in response")]
    MissingSession,
    #[error("Field '{0}' not found in result page")]
    MissingField(String),
    #[error("Field '{name}' is not valid JSON: {source}")]
    FieldJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed result data: {0}")]
    Malformed(String),
    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Invalid TLE: {0}")]
    Tle(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Simulation did not finish within {0:?}")]
    Timeout(Duration),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Track(#[from] GeodeticError),
}
