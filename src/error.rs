//! Error type shared by the loader, the distance model and the engine.

use std::fmt;
use std::io;

/// Errors raised while loading an instance or evaluating tours.
#[derive(Debug)]
pub enum TspError {
    /// The instance or config file could not be read.
    Io(io::Error),
    /// A line of the instance file holds a malformed field.
    Parse { line: usize, message: String },
    /// A tour references a city id the distance model does not know.
    UnknownCity(usize),
    /// The same city id appears twice in the coordinate section.
    DuplicateCity(usize),
    /// The configuration could not be decoded.
    Config(String),
    /// The engine has no tour to work with (population size of 0).
    EmptyPopulation,
}

/// A type alias for result type with `TspError`.
pub type TspResult<T> = Result<T, TspError>;

impl fmt::Display for TspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TspError::Io(err) => write!(f, "io error: {}", err),
            TspError::Parse { line, message } => write!(f, "line {}: {}", line, message),
            TspError::UnknownCity(id) => write!(f, "unknown city id: {}", id),
            TspError::DuplicateCity(id) => write!(f, "duplicate city id: {}", id),
            TspError::Config(msg) => write!(f, "invalid config: {}", msg),
            TspError::EmptyPopulation => write!(f, "population is empty"),
        }
    }
}

impl std::error::Error for TspError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TspError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TspError {
    fn from(value: io::Error) -> Self {
        TspError::Io(value)
    }
}

impl From<serde_json::Error> for TspError {
    fn from(value: serde_json::Error) -> Self {
        TspError::Config(value.to_string())
    }
}

impl PartialEq for TspError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TspError::Io(a), TspError::Io(b)) => a.kind() == b.kind(),
            (
                TspError::Parse { line: l1, message: m1 },
                TspError::Parse { line: l2, message: m2 },
            ) => l1 == l2 && m1 == m2,
            (TspError::UnknownCity(a), TspError::UnknownCity(b)) => a == b,
            (TspError::DuplicateCity(a), TspError::DuplicateCity(b)) => a == b,
            (TspError::Config(a), TspError::Config(b)) => a == b,
            (TspError::EmptyPopulation, TspError::EmptyPopulation) => true,
            _ => false,
        }
    }
}
