use thiserror::Error;

#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("ephemeris file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("line {line}: invalid timestamp {value:?}: {source}")]
    Timestamp {
        line: usize,
        value: String,
        source: chrono::ParseError,
    },
    #[error("line {line}: invalid number {value:?}")]
    Number { line: usize, value: String },
    #[error("line {line}: expected {expected} columns, found {found}")]
    Columns {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassError {
    #[error("imaging pass has no samples")]
    Empty,
}
