//! Error types for catalog lookups and graph generation.

use std::io;
use std::path::PathBuf;

use collectd_catalog_types::EntityKind;
use thiserror::Error;

/// Errors raised by the catalog.
///
/// Listing operations never produce [`CatalogError::NotFound`]; a missing
/// directory is an empty contribution. Only exact lookups, file resolution
/// and graph generation fail.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A host, plugin, graph or backing file does not exist.
    #[error("{kind} {name} does not exist")]
    NotFound { kind: EntityKind, name: String },

    /// The graph type has no registered definition.
    #[error("No graph definition for type {0}")]
    MissingDefinition(String),

    /// A render option has a malformed value.
    #[error("Invalid value for {option}: {value}")]
    InvalidOption { option: String, value: String },

    /// A configuration or definition file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A graph definition file is not valid.
    #[error("Invalid graph definitions in {path}: {source}")]
    Definitions {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Application settings could not be loaded.
    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    /// The graph backend failed to compute or render.
    #[error("Graph backend error: {0}")]
    Backend(String),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// The entity kind of a not-found error.
    pub fn missing_kind(&self) -> Option<EntityKind> {
        match self {
            CatalogError::NotFound { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_entity() {
        let err = CatalogError::not_found(EntityKind::Plugin, "cpu-0");
        assert_eq!(err.to_string(), "Plugin cpu-0 does not exist");
        assert_eq!(err.missing_kind(), Some(EntityKind::Plugin));
    }

    #[test]
    fn other_errors_have_no_missing_kind() {
        let err = CatalogError::MissingDefinition("load".to_string());
        assert_eq!(err.missing_kind(), None);
        assert_eq!(err.to_string(), "No graph definition for type load");
    }
}
