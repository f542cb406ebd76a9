// Copyright 2025 Cowboy AI, LLC.

//! Nodes of the context mapping model

use crate::discovery::CollectionType;
use crate::identifiers::Id;
use serde::Serialize;

/// A bounded context of the context map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundedContext {
    /// Context name
    pub name: String,
    /// Implementation technology
    pub implementation_technology: Option<String>,
    /// Aggregates
    pub aggregates: Vec<Id<Aggregate>>,
    /// Application layer
    pub application: Option<Id<Application>>,
}

/// An aggregate of a bounded context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Aggregate name
    pub name: String,
    /// Block comment, delimiters included
    pub comment: Option<String>,
    /// Entities and value objects
    pub domain_objects: Vec<Id<DomainObject>>,
    /// Domain services
    pub services: Vec<Id<Service>>,
}

/// Entity or value object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DomainObjectKind {
    /// Entity; may be the aggregate root
    Entity {
        /// Whether the entity is the aggregate root
        aggregate_root: bool,
    },
    /// Value object
    ValueObject,
}

/// An entity or value object of an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainObject {
    /// Object name
    pub name: String,
    /// Entity or value object
    pub kind: DomainObjectKind,
    /// Block comment, delimiters included
    pub comment: Option<String>,
    /// Primitive-typed attributes
    pub attributes: Vec<Attribute>,
    /// Domain-object-typed attributes
    pub references: Vec<Reference>,
    /// Domain object operations
    pub operations: Vec<Id<Operation>>,
}

impl DomainObject {
    /// Check if this is an entity
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, DomainObjectKind::Entity { .. })
    }

    /// Check if this is the root entity of its aggregate
    pub fn is_aggregate_root(&self) -> bool {
        matches!(
            self.kind,
            DomainObjectKind::Entity {
                aggregate_root: true
            }
        )
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Look up a reference by name
    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.references.iter().find(|r| r.name == name)
    }
}

/// A primitive-typed attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Primitive type name
    pub ty: String,
    /// Collection wrapper
    pub collection: Option<CollectionType>,
}

/// An attribute pointing at another domain object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Reference name
    pub name: String,
    /// Referenced domain object
    pub domain_object: Id<DomainObject>,
    /// Collection wrapper
    pub collection: Option<CollectionType>,
}

/// Base of a [`ComplexType`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ComplexTypeKind {
    /// Primitive type by name
    Primitive(String),
    /// Domain object of this model
    DomainObject(Id<DomainObject>),
}

/// Return or parameter type of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ComplexType {
    /// Base type
    pub kind: ComplexTypeKind,
    /// Collection wrapper
    pub collection: Option<CollectionType>,
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub parameter_type: ComplexType,
}

/// A service or domain object operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Operation name
    pub name: String,
    /// Return type; `None` is void
    pub return_type: Option<ComplexType>,
    /// Parameters
    pub parameters: Vec<Parameter>,
}

/// A service with operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Service name
    pub name: String,
    /// Block comment, delimiters included
    pub comment: Option<String>,
    /// Operations
    pub operations: Vec<Id<Operation>>,
}

/// Application layer of a bounded context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Application {
    /// Optional name
    pub name: Option<String>,
    /// Application services
    pub services: Vec<Id<Service>>,
    /// Functionalities
    pub functionalities: Vec<Id<Functionality>>,
}

/// A business process of an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Functionality {
    /// Functionality name
    pub name: Option<String>,
    /// Whether this functionality orchestrates a saga
    pub saga_orchestrator: bool,
    /// Steps in execution order
    pub steps: Vec<FunctionalityStep>,
}

/// One invocation of a functionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionalityStep {
    /// Executing context
    pub bounded_context: Id<BoundedContext>,
    /// Invoked application service
    pub service: Id<Service>,
    /// Invoked operation
    pub operation: Id<Operation>,
}

/// Upstream/downstream relationship of the context map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamDownstreamRelationship {
    /// Upstream context
    pub upstream: Id<BoundedContext>,
    /// Downstream context
    pub downstream: Id<BoundedContext>,
    /// Upstream aggregates exposed to the downstream
    pub upstream_exposed_aggregates: Vec<Id<Aggregate>>,
    /// Line comment, delimiter included
    pub exposed_aggregates_comment: Option<String>,
}
