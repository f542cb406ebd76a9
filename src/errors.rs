// Copyright 2025 Cowboy AI, LLC.

//! Error types for discovery and conversion

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while discovering or converting a domain model
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// Decomposition input file does not exist
    #[error("The file '{}' does not exist", path.display())]
    InputNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Decomposition input could not be parsed
    #[error("The file '{}' could not be parsed: {reason}", path.display())]
    InputMalformed {
        /// Path of the offending file (empty when parsing from memory)
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Any other I/O failure while reading input
    #[error("I/O error on '{}': {reason}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error message
        reason: String,
    },

    /// A model invariant would be broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A second object of the same kind and name under one parent
    #[error("{kind} '{name}' already exists")]
    AlreadyExists {
        /// Kind of model element
        kind: &'static str,
        /// Conflicting name
        name: String,
    },

    /// A required element could not be found by name
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Kind of model element
        kind: &'static str,
        /// Name that was searched for
        name: String,
    },

    /// Invalid discovery configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal inconsistency between the model and a lookup table
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for discovery operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::InputMalformed {
            path: PathBuf::new(),
            reason: err.to_string(),
        }
    }
}

impl DiscoveryError {
    /// Map an I/O error on `path` to the matching input error
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => DiscoveryError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => DiscoveryError::Io {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    /// Attach a file path to an input error raised without one
    pub fn at_path(self, path: &Path) -> Self {
        match self {
            DiscoveryError::InputMalformed { reason, .. } => DiscoveryError::InputMalformed {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        }
    }

    /// Check if this error concerns a single input file
    ///
    /// Input errors are fatal only to that file's discovery.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DiscoveryError::InputNotFound { .. }
                | DiscoveryError::InputMalformed { .. }
                | DiscoveryError::Io { .. }
        )
    }

    /// Check if this is an invariant violation
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            DiscoveryError::InvariantViolation(_) | DiscoveryError::AlreadyExists { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = DiscoveryError::InputNotFound {
            path: PathBuf::from("a/m2m_decomposition.json"),
        };
        assert_eq!(
            err.to_string(),
            "The file 'a/m2m_decomposition.json' does not exist"
        );

        let err = DiscoveryError::InputMalformed {
            path: PathBuf::from("x.json"),
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The file 'x.json' could not be parsed: expected value"
        );

        let err = DiscoveryError::AlreadyExists {
            kind: "Aggregate",
            name: "Orders".to_string(),
        };
        assert_eq!(err.to_string(), "Aggregate 'Orders' already exists");

        let err = DiscoveryError::InvariantViolation("empty name".to_string());
        assert_eq!(err.to_string(), "Invariant violation: empty name");
    }

    #[test]
    fn test_io_not_found_maps_to_input_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DiscoveryError::from_io(Path::new("missing.json"), io);
        assert!(matches!(err, DiscoveryError::InputNotFound { .. }));
        assert!(err.is_input_error());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = DiscoveryError::from_io(Path::new("locked.json"), io);
        assert!(matches!(err, DiscoveryError::Io { .. }));
    }

    #[test]
    fn test_serde_error_is_malformed_input() {
        let err: DiscoveryError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        let err = err.at_path(Path::new("broken.json"));

        match err {
            DiscoveryError::InputMalformed { path, .. } => {
                assert_eq!(path, PathBuf::from("broken.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classification_helpers() {
        assert!(DiscoveryError::InvariantViolation("x".into()).is_invariant_violation());
        assert!(DiscoveryError::AlreadyExists {
            kind: "Service",
            name: "S".into()
        }
        .is_invariant_violation());
        assert!(!DiscoveryError::Internal("x".into()).is_invariant_violation());
        assert!(!DiscoveryError::Configuration("x".into()).is_input_error());
    }
}
