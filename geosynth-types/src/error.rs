//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A geometry or envelope was constructed with the wrong number of parts or with invalid bounds.
    #[error("malformed {what}: {reason}")]
    Malformed {
        /// Name of the type being constructed.
        what: &'static str,
        /// What exactly is wrong.
        reason: String,
    },
    /// A CRS identifier could not be parsed.
    #[error("invalid CRS identifier: {0:?}")]
    InvalidCrs(String),
}

impl GeometryError {
    pub(crate) fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            what,
            reason: reason.into(),
        }
    }
}
