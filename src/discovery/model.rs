// Copyright 2025 Cowboy AI, LLC.

//! Nodes of the discovery model
//!
//! Nodes are plain data. They are created and linked only through
//! [`DiscoveryModel`](super::DiscoveryModel), which owns the arenas and
//! enforces the naming and ownership invariants.

use crate::discovery::types::Type;
use crate::identifiers::Id;
use serde::Serialize;

/// A bounded context discovered in the analysed system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundedContext {
    /// Name, unique across the model
    pub name: String,
    /// Implementation technology, if known
    pub technology: Option<String>,
    /// Owned aggregates in creation order
    pub aggregates: Vec<Id<Aggregate>>,
    /// The context's application layer, if any
    pub application: Option<Id<Application>>,
}

/// A consistency boundary inside a bounded context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Name, unique within the owning bounded context
    pub name: String,
    /// Comment generated during discovery
    pub discovery_comment: Option<String>,
    /// Owning bounded context
    pub parent: Id<BoundedContext>,
    /// Owned domain objects in creation order
    pub domain_objects: Vec<Id<DomainObject>>,
    /// Aggregate-level services
    pub services: Vec<Id<Service>>,
}

/// Entity or value object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DomainObjectKind {
    /// Has identity
    Entity,
    /// Defined by its attributes
    ValueObject,
}

/// A domain object owned by exactly one aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainObject {
    /// Name, unique within the owning aggregate
    pub name: String,
    /// Entity or value object
    pub kind: DomainObjectKind,
    /// Comment generated during discovery
    pub discovery_comment: Option<String>,
    /// Whether this entity is the root of its aggregate
    pub aggregate_root: bool,
    /// Owning aggregate
    pub parent: Id<Aggregate>,
    /// Attributes in discovery order
    pub attributes: Vec<Attribute>,
    /// Domain object operations
    pub methods: Vec<Id<Method>>,
}

impl DomainObject {
    /// Check if this is an entity
    pub fn is_entity(&self) -> bool {
        self.kind == DomainObjectKind::Entity
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A typed attribute of a domain object
///
/// When the type is a domain object the attribute becomes a reference in the
/// mapping model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Resolved type
    pub ty: Type,
}

impl Attribute {
    /// Create an attribute
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Check if the attribute points at a domain object
    pub fn is_reference(&self) -> bool {
        self.ty.is_domain_object_type()
    }
}

/// Owner of a [`Service`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceOwner {
    /// Aggregate-level domain service
    Aggregate(Id<Aggregate>),
    /// Application service
    Application(Id<Application>),
}

/// A service with an ordered list of operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Name, unique within the owner
    pub name: String,
    /// Comment generated during discovery
    pub discovery_comment: Option<String>,
    /// Owning aggregate or application
    pub owner: ServiceOwner,
    /// Operations in creation order
    pub operations: Vec<Id<Method>>,
}

/// Owner of a [`Method`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MethodOwner {
    /// Service operation
    Service(Id<Service>),
    /// Domain object operation
    DomainObject(Id<DomainObject>),
}

/// An operation on a service or domain object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    /// Operation name
    pub name: String,
    /// Return type, `None` for void
    pub return_type: Option<Type>,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Owning service or domain object
    pub owner: MethodOwner,
}

/// A named, typed operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: Type,
}

impl Parameter {
    /// Create a parameter
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Signature of a method before it is added to the model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSignature {
    /// Operation name
    pub name: String,
    /// Return type, `None` for void
    pub return_type: Option<Type>,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
}

impl MethodSignature {
    /// A void operation without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the return type
    pub fn returning(mut self, ty: Type) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Append a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }
}

/// Application layer of a bounded context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    /// Optional name
    pub name: Option<String>,
    /// Owning bounded context
    pub bounded_context: Id<BoundedContext>,
    /// Application services
    pub services: Vec<Id<Service>>,
    /// Functionalities (business processes)
    pub functionalities: Vec<Id<Functionality>>,
}

/// A business process spanning services
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Functionality {
    /// Non-empty name
    pub name: String,
    /// Whether the functionality is a saga orchestrator
    pub saga: bool,
    /// Owning application
    pub application: Id<Application>,
    /// Steps in execution order
    pub steps: Vec<FunctionalityStep>,
}

/// One invocation within a functionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionalityStep {
    /// Context executing the step
    pub bounded_context: Id<BoundedContext>,
    /// Invoked service
    pub service: Id<Service>,
    /// Invoked operation of that service
    pub operation: Id<Method>,
}

/// Upstream/downstream relationship between two bounded contexts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    /// Upstream context
    pub upstream: Id<BoundedContext>,
    /// Downstream context
    pub downstream: Id<BoundedContext>,
    /// Aggregates of the upstream context exposed to the downstream
    pub exposed_aggregates: Vec<Id<Aggregate>>,
    /// Comment on the exposed aggregates
    pub exposed_aggregates_comment: Option<String>,
}
