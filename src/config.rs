// Copyright 2025 Cowboy AI, LLC.

//! Naming conventions used by the Mono2Micro discovery

use crate::errors::{DiscoveryError, DiscoveryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for decomposition discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Exact file name of clustering/functionality files
    pub decomposition_file_name: String,

    /// File name suffix of entity structure files
    pub structure_file_suffix: String,

    /// Suffix appended to the name of a cross-aggregate proxy entity
    pub reference_suffix: String,

    /// Entity name suffix that marks an aggregate root
    pub root_entity_suffix: String,

    /// Suffix of the application created per bounded context
    pub application_suffix: String,

    /// Suffix of a reconstructed functionality name
    pub functionality_suffix: String,

    /// Suffix of the per-functionality service name
    pub service_suffix: String,

    /// Prefix of the per-step operation name
    pub step_operation_prefix: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            decomposition_file_name: "m2m_decomposition.json".to_string(),
            structure_file_suffix: "m2m_structure.json".to_string(),
            reference_suffix: "_Reference".to_string(),
            root_entity_suffix: "_RootEntity".to_string(),
            application_suffix: "Application".to_string(),
            functionality_suffix: "Functionality".to_string(),
            service_suffix: "Service".to_string(),
            step_operation_prefix: "step".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Parse a configuration document; absent keys keep their defaults
    pub fn from_json_str(json: &str) -> DiscoveryResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DiscoveryError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration document from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> DiscoveryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DiscoveryError::from_io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Reject empty naming conventions
    pub fn validate(&self) -> DiscoveryResult<()> {
        let fields = [
            ("decomposition_file_name", &self.decomposition_file_name),
            ("structure_file_suffix", &self.structure_file_suffix),
            ("reference_suffix", &self.reference_suffix),
            ("root_entity_suffix", &self.root_entity_suffix),
            ("functionality_suffix", &self.functionality_suffix),
            ("service_suffix", &self.service_suffix),
            ("step_operation_prefix", &self.step_operation_prefix),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DiscoveryError::Configuration(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Check whether `file_name` names a decomposition file
    pub fn is_decomposition_file(&self, file_name: &str) -> bool {
        file_name == self.decomposition_file_name
    }

    /// Check whether `file_name` names a structure file
    pub fn is_structure_file(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.structure_file_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = DiscoveryConfig::from_json_str(r#"{ "root_entity_suffix": "_Root" }"#)
            .unwrap();

        assert_eq!(config.root_entity_suffix, "_Root");
        assert_eq!(config.decomposition_file_name, "m2m_decomposition.json");
        assert_eq!(config.reference_suffix, "_Reference");
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let err = DiscoveryConfig::from_json_str(r#"{ "service_suffix": "" }"#).unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));
    }

    #[test]
    fn test_file_roles() {
        let config = DiscoveryConfig::default();
        assert!(config.is_decomposition_file("m2m_decomposition.json"));
        assert!(!config.is_decomposition_file("old_m2m_decomposition.json"));
        assert!(config.is_structure_file("m2m_structure.json"));
        assert!(config.is_structure_file("orders_m2m_structure.json"));
        assert!(!config.is_structure_file("m2m_structure.json.bak"));
    }
}
