//! Model registry errors

use std::io;
use std::path::Path;

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building or loading an entity registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Entity definition is structurally invalid
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// Entity name registered twice
    #[error("Entity '{0}' is already registered")]
    DuplicateEntity(String),

    /// Relation points to an entity that is not registered
    #[error("Relation '{entity}.{field}' targets unknown entity '{target}'")]
    UnknownRelationTarget {
        entity: String,
        field: String,
        target: String,
    },

    /// Model file could not be parsed
    #[error("Malformed model file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Model JSON could not be parsed
    #[error("Invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl RegistryError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        RegistryError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
