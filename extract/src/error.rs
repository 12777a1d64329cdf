//! Error types for the hwinv-extract crate.

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or summarizing inventory data.
#[derive(Error, Debug)]
pub enum Error {
    /// The structured hardware document is not well-formed.
    #[error("Malformed XML document: {0}")]
    MalformedXml(String),

    /// An extractor could not process one member.
    #[error("Failed to extract {member}: {reason}")]
    Extraction { member: String, reason: String },

    /// A hardware fact needed for the summary was never extracted.
    #[error("{archive}: missing hardware field '{field}'")]
    MissingHardwareField { archive: String, field: String },

    /// A hardware fact has a value the summary cannot use.
    #[error("{archive}: invalid value for hardware field '{field}': {value}")]
    InvalidHardwareField {
        archive: String,
        field: String,
        value: String,
    },

    /// Failed to read an archive or one of its members.
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// Failed to serialize a report.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error invalidates the whole archive rather than one member.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::MalformedXml(_))
    }

    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedXml(err.to_string())
    }
}
