use std::fmt;

/// Errors that can occur while reading or serializing an RDF document.
#[derive(Debug)]
pub enum RdfError {
    /// The document could not be parsed as the configured syntax.
    SourceCorrupt(String),
    /// Could not read the file from disk.
    Io(std::io::Error),
}

impl fmt::Display for RdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfError::SourceCorrupt(message) => {
                write!(f, "source document is corrupt: {}", message)
            }
            RdfError::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for RdfError {}

impl From<std::io::Error> for RdfError {
    fn from(error: std::io::Error) -> Self {
        RdfError::Io(error)
    }
}

impl From<oxttl::TurtleParseError> for RdfError {
    fn from(error: oxttl::TurtleParseError) -> Self {
        RdfError::SourceCorrupt(error.to_string())
    }
}

impl From<oxttl::NTriplesParseError> for RdfError {
    fn from(error: oxttl::NTriplesParseError) -> Self {
        RdfError::SourceCorrupt(error.to_string())
    }
}
