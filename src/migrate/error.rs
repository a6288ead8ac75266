use std::fmt;
use std::path::PathBuf;

/// Errors a migration task can raise. Every variant except `UnsupportedResource`
/// triggers rollback of the object currently being written (§4.8).
#[derive(Debug)]
pub enum Error {
    /// An RDF document, or a sidecar JSON file, could not be parsed.
    SourceCorrupt(String),
    /// A required predicate was absent from a binary resource's RDF.
    MissingField(String, String),
    /// The resource's kind could not be determined; logged and skipped, no rollback.
    UnsupportedResource(PathBuf),
    /// The OCFL session factory rejected a write or commit.
    StorageFailed(String),
    /// A filesystem operation on the export tree failed.
    Io(std::io::Error),
    /// The task manager is shutting down and no longer accepts submissions.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SourceCorrupt(message) => {
                write!(f, "source document is corrupt: {}", message)
            }
            Error::MissingField(field, resource_id) => write!(
                f,
                "missing required field '{}' on resource '{}'",
                field, resource_id
            ),
            Error::UnsupportedResource(path) => {
                write!(f, "unsupported resource at '{}'", path.display())
            }
            Error::StorageFailed(message) => write!(f, "storage failed: {}", message),
            Error::Io(error) => write!(f, "I/O error: {}", error),
            Error::Cancelled => write!(f, "migration cancelled"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<rdf::RdfError> for Error {
    fn from(error: rdf::RdfError) -> Self {
        match error {
            rdf::RdfError::Io(io) => Error::Io(io),
            other => Error::SourceCorrupt(other.to_string()),
        }
    }
}

impl From<ocfl::OcflError> for Error {
    fn from(error: ocfl::OcflError) -> Self {
        match error {
            ocfl::OcflError::Io(io) => Error::Io(io),
            other => Error::StorageFailed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SourceCorrupt(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
