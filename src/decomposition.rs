// Copyright 2025 Cowboy AI, LLC.

//! Mono2Micro decomposition documents
//!
//! A decomposition document describes clusters of entities, the entities'
//! fields and the functionalities (cross-cluster call chains) of the analysed
//! monolith. The JSON is read into raw serde structures and then converted
//! once into the typed structures below, where a field's data type is already
//! classified as simple, parameterized or collection.
//!
//! ```json
//! {
//!   "name": "shop",
//!   "clusters": [ { "name": "Orders", "elements": [ { "name": "Order" } ] } ],
//!   "entities": [
//!     { "name": "Order",
//!       "fields": [ { "name": "lines", "type": { "name": "List", "parameters": [ { "name": "OrderLine" } ] } } ] }
//!   ],
//!   "functionalities": [
//!     { "name": "checkout.process", "orchestrator": "Orders",
//!       "steps": [ { "cluster": "Orders", "accesses": [ { "type": "W", "entity": "Order" } ] } ] }
//!   ]
//! }
//! ```

use crate::discovery::CollectionType;
use crate::errors::{DiscoveryError, DiscoveryResult};
use indexmap::IndexMap;
use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---- raw input ------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawDecomposition {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    clusters: Vec<RawCluster>,
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    functionalities: Vec<RawFunctionality>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawCluster {
    name: String,
    #[serde(default)]
    elements: Vec<RawEntity>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawEntity {
    name: String,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    superclass: Option<RawDataType>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    data_type: RawDataType,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawDataType {
    name: String,
    #[serde(default)]
    parameters: Vec<RawDataType>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawFunctionality {
    name: String,
    orchestrator: String,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawStep {
    cluster: String,
    #[serde(default)]
    accesses: Vec<RawAccess>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct RawAccess {
    #[serde(rename = "type")]
    access_type: String,
    entity: String,
}

/// JSON Schema of the accepted decomposition document
pub fn input_schema() -> RootSchema {
    schema_for!(RawDecomposition)
}

// ---- typed structures -----------------------------------------------------

/// A parsed decomposition document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    /// Name of the decomposition, if given
    pub name: Option<String>,
    /// Clusters, unique by name, in document order
    pub clusters: Vec<Cluster>,
    /// Entity structure, unique by name, in document order
    pub entities: Vec<EntityDescriptor>,
    /// Functionalities, unique by name, in document order
    pub functionalities: Vec<FunctionalityDescriptor>,
}

/// A cluster of entities; becomes a bounded context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// Cluster name
    pub name: String,
    /// Member entities, unique by name
    pub elements: Vec<EntityDescriptor>,
}

/// An entity with its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    /// Entity name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// Superclass type, if any
    pub superclass: Option<DataType>,
}

/// A field of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Declared type
    pub data_type: DataType,
}

/// A field type, classified at parse time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// A type without type parameters
    Simple {
        /// Raw type name
        name: String,
    },
    /// A generic type with at least one parameter
    Parameterized {
        /// Raw type name
        name: String,
        /// Set when `name` is one of the collection wrappers
        collection: Option<CollectionType>,
        /// Type parameters in declaration order, never empty
        parameters: Vec<DataType>,
    },
}

impl DataType {
    /// A type without parameters
    pub fn simple(name: impl Into<String>) -> Self {
        DataType::Simple { name: name.into() }
    }

    /// A generic type; classified the same way as parsed input
    pub fn generic(name: impl Into<String>, parameters: Vec<DataType>) -> Self {
        let name = name.into();
        if parameters.is_empty() {
            return DataType::Simple { name };
        }
        DataType::Parameterized {
            collection: CollectionType::from_type_name(&name),
            name,
            parameters,
        }
    }

    /// Raw type name
    pub fn name(&self) -> &str {
        match self {
            DataType::Simple { name } | DataType::Parameterized { name, .. } => name,
        }
    }

    /// Check if the type has at least one parameter
    pub fn is_parameterized(&self) -> bool {
        matches!(self, DataType::Parameterized { .. })
    }

    /// Collection wrapper, when this is a parameterized List, Set or Collection
    pub fn collection(&self) -> Option<CollectionType> {
        match self {
            DataType::Parameterized { collection, .. } => *collection,
            DataType::Simple { .. } => None,
        }
    }

    /// First type parameter, if parameterized
    pub fn first_parameter(&self) -> Option<&DataType> {
        match self {
            DataType::Parameterized { parameters, .. } => parameters.first(),
            DataType::Simple { .. } => None,
        }
    }
}

impl From<RawDataType> for DataType {
    fn from(raw: RawDataType) -> Self {
        DataType::generic(
            raw.name,
            raw.parameters.into_iter().map(DataType::from).collect(),
        )
    }
}

/// A functionality orchestrated by one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionalityDescriptor {
    /// Dotted name, e.g. `checkout.process`
    pub name: String,
    /// Name of the orchestrating cluster
    pub orchestrator: String,
    /// Steps in execution order
    pub steps: Vec<StepDescriptor>,
}

impl FunctionalityDescriptor {
    /// Display name: the second dotted segment with its first letter
    /// capitalized (`checkout.process` -> `Process`)
    ///
    /// A name without a dot uses the whole name.
    pub fn display_name(&self) -> String {
        let segment = self.name.split('.').nth(1).unwrap_or(&self.name);
        capitalize(segment)
    }
}

/// One step of a functionality
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    /// Cluster executing the step
    pub cluster: String,
    /// Entities accessed by the step
    pub accesses: Vec<EntityAccess>,
}

/// Read/write access to an entity within a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityAccess {
    /// Access mode as given in the input
    pub access_type: String,
    /// Accessed entity
    pub entity: String,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep the first item per name, preserving order
fn unique_by_name<T>(items: impl IntoIterator<Item = T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut unique: IndexMap<String, T> = IndexMap::new();
    for item in items {
        let key = name(&item).to_string();
        unique.entry(key).or_insert(item);
    }
    unique.into_values().collect()
}

impl From<RawEntity> for EntityDescriptor {
    fn from(raw: RawEntity) -> Self {
        Self {
            name: raw.name,
            fields: raw
                .fields
                .into_iter()
                .map(|f| Field {
                    name: f.name,
                    data_type: f.data_type.into(),
                })
                .collect(),
            superclass: raw.superclass.map(DataType::from),
        }
    }
}

impl From<RawDecomposition> for Decomposition {
    fn from(raw: RawDecomposition) -> Self {
        let clusters = unique_by_name(raw.clusters, |c| c.name.as_str())
            .into_iter()
            .map(|c| Cluster {
                name: c.name,
                elements: unique_by_name(c.elements, |e| e.name.as_str())
                    .into_iter()
                    .map(EntityDescriptor::from)
                    .collect(),
            })
            .collect();
        let entities = unique_by_name(raw.entities, |e| e.name.as_str())
            .into_iter()
            .map(EntityDescriptor::from)
            .collect();
        let functionalities = unique_by_name(raw.functionalities, |f| f.name.as_str())
            .into_iter()
            .map(|f| FunctionalityDescriptor {
                name: f.name,
                orchestrator: f.orchestrator,
                steps: f
                    .steps
                    .into_iter()
                    .map(|s| StepDescriptor {
                        cluster: s.cluster,
                        accesses: s
                            .accesses
                            .into_iter()
                            .map(|a| EntityAccess {
                                access_type: a.access_type,
                                entity: a.entity,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: raw.name,
            clusters,
            entities,
            functionalities,
        }
    }
}

impl Decomposition {
    /// Parse a decomposition document from memory
    pub fn from_json_str(json: &str) -> DiscoveryResult<Self> {
        let raw: RawDecomposition = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    /// Read and parse a decomposition file
    ///
    /// Fails with `InputNotFound` when the file is absent and with
    /// `InputMalformed` when it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> DiscoveryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DiscoveryError::from_io(path, e))?;
        Self::from_json_str(&json).map_err(|e| e.at_path(path))
    }

    /// Look up a cluster by name
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Functionalities orchestrated by the named cluster
    pub fn functionalities_orchestrated_by<'a>(
        &'a self,
        cluster: &'a str,
    ) -> impl Iterator<Item = &'a FunctionalityDescriptor> + 'a {
        self.functionalities
            .iter()
            .filter(move |f| f.orchestrator == cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const SHOP: &str = r#"{
        "name": "shop",
        "clusters": [
            { "name": "Orders", "elements": [ { "name": "Order" }, { "name": "OrderLine" } ] },
            { "name": "Payments", "elements": [ { "name": "Payment" } ] },
            { "name": "Orders", "elements": [ { "name": "Duplicate" } ] }
        ],
        "functionalities": [
            { "name": "checkout.process", "orchestrator": "Orders",
              "steps": [
                { "cluster": "Orders", "accesses": [ { "type": "W", "entity": "Order" } ] },
                { "cluster": "Payments", "accesses": [] }
              ] }
        ]
    }"#;

    #[test]
    fn test_parse_clusters_and_functionalities() {
        let decomposition = Decomposition::from_json_str(SHOP).unwrap();

        assert_eq!(decomposition.name.as_deref(), Some("shop"));
        let names: Vec<_> = decomposition.clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Orders", "Payments"]);

        let orders = decomposition.cluster("Orders").unwrap();
        let members: Vec<_> = orders.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(members, vec!["Order", "OrderLine"]);

        let functionality = &decomposition.functionalities[0];
        assert_eq!(functionality.orchestrator, "Orders");
        assert_eq!(functionality.steps.len(), 2);
        assert_eq!(
            functionality.steps[0].accesses,
            vec![EntityAccess {
                access_type: "W".to_string(),
                entity: "Order".to_string()
            }]
        );
        assert_eq!(
            decomposition.functionalities_orchestrated_by("Orders").count(),
            1
        );
        assert_eq!(
            decomposition.functionalities_orchestrated_by("Payments").count(),
            0
        );
    }

    #[test]
    fn test_parse_field_types() {
        let json = r#"{ "entities": [ { "name": "Order", "fields": [
            { "name": "id", "type": { "name": "Long" } },
            { "name": "lines", "type": { "name": "List", "parameters": [ { "name": "OrderLine" } ] } },
            { "name": "lookup", "type": { "name": "Map", "parameters": [ { "name": "String" }, { "name": "Long" } ] } }
        ] } ] }"#;
        let decomposition = Decomposition::from_json_str(json).unwrap();
        let fields = &decomposition.entities[0].fields;

        assert_eq!(fields[0].data_type, DataType::simple("Long"));
        assert_eq!(fields[1].data_type.collection(), Some(CollectionType::List));
        assert_eq!(
            fields[1].data_type.first_parameter(),
            Some(&DataType::simple("OrderLine"))
        );
        assert!(fields[2].data_type.is_parameterized());
        assert_eq!(fields[2].data_type.collection(), None);
    }

    #[test_case("List", vec![], false, None ; "bare list is not a collection")]
    #[test_case("List", vec!["Foo"], true, Some(CollectionType::List) ; "list of foo")]
    #[test_case("Set", vec!["Foo"], true, Some(CollectionType::Set) ; "set of foo")]
    #[test_case("Collection", vec!["Foo"], true, Some(CollectionType::Collection) ; "collection of foo")]
    #[test_case("Optional", vec!["Foo"], true, None ; "optional is parameterized only")]
    fn test_data_type_classification(
        name: &str,
        parameters: Vec<&str>,
        parameterized: bool,
        collection: Option<CollectionType>,
    ) {
        let ty = DataType::generic(name, parameters.into_iter().map(DataType::simple).collect());
        assert_eq!(ty.is_parameterized(), parameterized);
        assert_eq!(ty.collection(), collection);
        assert_eq!(ty.name(), name);
    }

    #[test_case("checkout.process", "Process")]
    #[test_case("a.bC.d", "BC")]
    #[test_case("standalone", "Standalone")]
    #[test_case("x.ödeme", "Ödeme")]
    fn test_display_name(name: &str, expected: &str) {
        let functionality = FunctionalityDescriptor {
            name: name.to_string(),
            orchestrator: "Orders".to_string(),
            steps: Vec::new(),
        };
        assert_eq!(functionality.display_name(), expected);
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = Decomposition::from_file("/definitely/not/here/m2m_decomposition.json")
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::InputNotFound { .. }));
    }

    #[test]
    fn test_malformed_content_is_input_malformed() {
        let err = Decomposition::from_json_str(r#"{ "clusters": [ { "elements": [] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::InputMalformed { .. }));

        let err = Decomposition::from_json_str("not json").unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_input_schema_names_top_level_arrays() {
        let schema = serde_json::to_value(input_schema()).unwrap();
        let properties = &schema["properties"];

        assert!(properties.get("clusters").is_some());
        assert!(properties.get("entities").is_some());
        assert!(properties.get("functionalities").is_some());
    }
}
