use std::fmt;

/// Errors raised by an object session or its factory.
#[derive(Debug)]
pub enum OcflError {
    /// A write, commit, or read against the storage root failed.
    StorageFailed(String),
    /// Another task already holds an open session for this object.
    ObjectLocked(String),
    /// Generic filesystem error.
    Io(std::io::Error),
}

impl fmt::Display for OcflError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcflError::StorageFailed(message) => {
                write!(f, "storage operation failed: {}", message)
            }
            OcflError::ObjectLocked(id) => {
                write!(f, "object '{}' already has an open session", id)
            }
            OcflError::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for OcflError {}

impl From<std::io::Error> for OcflError {
    fn from(error: std::io::Error) -> Self {
        OcflError::Io(error)
    }
}

impl From<serde_json::Error> for OcflError {
    fn from(error: serde_json::Error) -> Self {
        OcflError::StorageFailed(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OcflError>;
