// Copyright 2025 Cowboy AI, LLC.

//! The context mapping model
//!
//! The target of the conversion: the graph a context-mapping serializer
//! consumes. It is built only through the [`MappingFactory`] operations,
//! one `create_*` per element kind plus `set_*`/`add_*` mutations. Elements
//! are addressed by [`Id`] handles, so two handles to the same element always
//! compare equal and two distinct elements never do.
//!
//! [`ContextMappingModel`] is the in-memory implementation.

pub mod converter;
pub mod model;

pub use converter::{convert_context_map, ContextMapConverter, TransformReport};
pub use model::{
    Aggregate, Application, Attribute, BoundedContext, ComplexType, ComplexTypeKind, DomainObject,
    DomainObjectKind, Functionality, FunctionalityStep, Operation, Parameter, Reference, Service,
    UpstreamDownstreamRelationship,
};

use crate::identifiers::Id;
use serde::Serialize;

/// Element that carries a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    /// An aggregate
    Aggregate(Id<Aggregate>),
    /// An entity or value object
    DomainObject(Id<DomainObject>),
    /// A service
    Service(Id<Service>),
}

/// Creation and mutation operations of the target modeling framework
///
/// Nodes with identity (contexts, aggregates, domain objects, services,
/// operations, applications, functionalities, relationships) are created by a
/// `create_*` call that returns a handle. [`Attribute`], [`Reference`],
/// [`Parameter`] and [`FunctionalityStep`] have no identity of their own:
/// they are built as plain values and handed over by the `add_*` call that
/// attaches them, or inside the [`Operation`] passed to
/// [`create_operation`](Self::create_operation).
pub trait MappingFactory {
    /// Create a bounded context
    fn create_bounded_context(&mut self, name: &str) -> Id<BoundedContext>;
    /// Set a context's implementation technology
    fn set_implementation_technology(&mut self, bc: Id<BoundedContext>, technology: &str);
    /// Add a context to the model and its context map
    fn add_bounded_context(&mut self, bc: Id<BoundedContext>);

    /// Create an aggregate
    fn create_aggregate(&mut self, name: &str) -> Id<Aggregate>;
    /// Attach an aggregate to a context
    fn add_aggregate(&mut self, bc: Id<BoundedContext>, aggregate: Id<Aggregate>);

    /// Create an entity
    fn create_entity(&mut self, name: &str) -> Id<DomainObject>;
    /// Create a value object
    fn create_value_object(&mut self, name: &str) -> Id<DomainObject>;
    /// Flag an entity as aggregate root; ignored for value objects
    fn set_aggregate_root(&mut self, entity: Id<DomainObject>);
    /// Attach a domain object to an aggregate
    fn add_domain_object(&mut self, aggregate: Id<Aggregate>, object: Id<DomainObject>);
    /// Add a primitive attribute
    fn add_attribute(&mut self, object: Id<DomainObject>, attribute: Attribute);
    /// Add a reference to another domain object
    fn add_reference(&mut self, object: Id<DomainObject>, reference: Reference);
    /// Attach an operation to a domain object
    fn add_domain_object_operation(&mut self, object: Id<DomainObject>, operation: Id<Operation>);

    /// Set the comment of an element
    fn set_comment(&mut self, target: CommentTarget, comment: String);

    /// Create a service
    fn create_service(&mut self, name: &str) -> Id<Service>;
    /// Create an operation
    fn create_operation(&mut self, operation: Operation) -> Id<Operation>;
    /// Attach an operation to a service
    fn add_service_operation(&mut self, service: Id<Service>, operation: Id<Operation>);
    /// Attach a domain service to an aggregate
    fn add_aggregate_service(&mut self, aggregate: Id<Aggregate>, service: Id<Service>);

    /// Create an application
    fn create_application(&mut self) -> Id<Application>;
    /// Name an application
    fn set_application_name(&mut self, application: Id<Application>, name: &str);
    /// Make an application the application of a context
    fn set_application(&mut self, bc: Id<BoundedContext>, application: Id<Application>);
    /// Attach an application service
    fn add_application_service(&mut self, application: Id<Application>, service: Id<Service>);

    /// Create a functionality
    fn create_functionality(&mut self) -> Id<Functionality>;
    /// Name a functionality
    fn set_functionality_name(&mut self, functionality: Id<Functionality>, name: &str);
    /// Flag a functionality as saga orchestrator
    fn set_saga_orchestrator(&mut self, functionality: Id<Functionality>, saga: bool);
    /// Attach a functionality to an application
    fn add_functionality(&mut self, application: Id<Application>, functionality: Id<Functionality>);
    /// Append a step to a functionality
    fn add_functionality_step(&mut self, functionality: Id<Functionality>, step: FunctionalityStep);

    /// Create an upstream/downstream relationship
    fn create_relationship(
        &mut self,
        upstream: Id<BoundedContext>,
        downstream: Id<BoundedContext>,
    ) -> Id<UpstreamDownstreamRelationship>;
    /// Expose an upstream aggregate
    fn add_exposed_aggregate(
        &mut self,
        relationship: Id<UpstreamDownstreamRelationship>,
        aggregate: Id<Aggregate>,
    );
    /// Comment the exposed aggregates
    fn set_exposed_aggregates_comment(
        &mut self,
        relationship: Id<UpstreamDownstreamRelationship>,
        comment: String,
    );
    /// Add a relationship to the context map
    fn add_relationship(&mut self, relationship: Id<UpstreamDownstreamRelationship>);
}

/// In-memory context mapping model
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextMappingModel {
    bounded_context_arena: Vec<BoundedContext>,
    aggregates: Vec<Aggregate>,
    domain_objects: Vec<DomainObject>,
    services: Vec<Service>,
    operations: Vec<Operation>,
    applications: Vec<Application>,
    functionalities: Vec<Functionality>,
    relationship_arena: Vec<UpstreamDownstreamRelationship>,
    /// Contexts on the map, in insertion order
    bounded_contexts: Vec<Id<BoundedContext>>,
    /// Relationships on the map, in insertion order
    relationships: Vec<Id<UpstreamDownstreamRelationship>>,
}

impl ContextMappingModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Contexts on the map
    pub fn bounded_contexts(&self) -> &[Id<BoundedContext>] {
        &self.bounded_contexts
    }

    /// Relationships on the map
    pub fn relationships(&self) -> &[Id<UpstreamDownstreamRelationship>] {
        &self.relationships
    }

    /// Get a bounded context
    pub fn bounded_context(&self, id: Id<BoundedContext>) -> &BoundedContext {
        &self.bounded_context_arena[id.index()]
    }

    /// Get an aggregate
    pub fn aggregate(&self, id: Id<Aggregate>) -> &Aggregate {
        &self.aggregates[id.index()]
    }

    /// Get a domain object
    pub fn domain_object(&self, id: Id<DomainObject>) -> &DomainObject {
        &self.domain_objects[id.index()]
    }

    /// Get a service
    pub fn service(&self, id: Id<Service>) -> &Service {
        &self.services[id.index()]
    }

    /// Get an operation
    pub fn operation(&self, id: Id<Operation>) -> &Operation {
        &self.operations[id.index()]
    }

    /// Get an application
    pub fn application(&self, id: Id<Application>) -> &Application {
        &self.applications[id.index()]
    }

    /// Get a functionality
    pub fn functionality(&self, id: Id<Functionality>) -> &Functionality {
        &self.functionalities[id.index()]
    }

    /// Get a relationship
    pub fn relationship(
        &self,
        id: Id<UpstreamDownstreamRelationship>,
    ) -> &UpstreamDownstreamRelationship {
        &self.relationship_arena[id.index()]
    }

    /// Number of domain objects created
    pub fn domain_object_count(&self) -> usize {
        self.domain_objects.len()
    }

    /// Find a context on the map by name
    pub fn find_bounded_context(&self, name: &str) -> Option<Id<BoundedContext>> {
        self.bounded_contexts
            .iter()
            .copied()
            .find(|bc| self.bounded_context(*bc).name == name)
    }

    /// Find an aggregate of a context by name
    pub fn find_aggregate(&self, bc: Id<BoundedContext>, name: &str) -> Option<Id<Aggregate>> {
        self.bounded_context(bc)
            .aggregates
            .iter()
            .copied()
            .find(|a| self.aggregate(*a).name == name)
    }

    /// Find a domain object of an aggregate by name
    pub fn find_domain_object(
        &self,
        aggregate: Id<Aggregate>,
        name: &str,
    ) -> Option<Id<DomainObject>> {
        self.aggregate(aggregate)
            .domain_objects
            .iter()
            .copied()
            .find(|o| self.domain_object(*o).name == name)
    }

    /// Find an application service by name
    pub fn find_application_service(
        &self,
        application: Id<Application>,
        name: &str,
    ) -> Option<Id<Service>> {
        self.application(application)
            .services
            .iter()
            .copied()
            .find(|s| self.service(*s).name == name)
    }
}

impl MappingFactory for ContextMappingModel {
    fn create_bounded_context(&mut self, name: &str) -> Id<BoundedContext> {
        self.bounded_context_arena.push(BoundedContext {
            name: name.to_string(),
            ..BoundedContext::default()
        });
        Id::from_index(self.bounded_context_arena.len() - 1)
    }

    fn set_implementation_technology(&mut self, bc: Id<BoundedContext>, technology: &str) {
        self.bounded_context_arena[bc.index()].implementation_technology =
            Some(technology.to_string());
    }

    fn add_bounded_context(&mut self, bc: Id<BoundedContext>) {
        if !self.bounded_contexts.contains(&bc) {
            self.bounded_contexts.push(bc);
        }
    }

    fn create_aggregate(&mut self, name: &str) -> Id<Aggregate> {
        self.aggregates.push(Aggregate {
            name: name.to_string(),
            ..Aggregate::default()
        });
        Id::from_index(self.aggregates.len() - 1)
    }

    fn add_aggregate(&mut self, bc: Id<BoundedContext>, aggregate: Id<Aggregate>) {
        self.bounded_context_arena[bc.index()]
            .aggregates
            .push(aggregate);
    }

    fn create_entity(&mut self, name: &str) -> Id<DomainObject> {
        self.push_domain_object(
            name,
            DomainObjectKind::Entity {
                aggregate_root: false,
            },
        )
    }

    fn create_value_object(&mut self, name: &str) -> Id<DomainObject> {
        self.push_domain_object(name, DomainObjectKind::ValueObject)
    }

    fn set_aggregate_root(&mut self, entity: Id<DomainObject>) {
        if let DomainObjectKind::Entity { aggregate_root } =
            &mut self.domain_objects[entity.index()].kind
        {
            *aggregate_root = true;
        }
    }

    fn add_domain_object(&mut self, aggregate: Id<Aggregate>, object: Id<DomainObject>) {
        self.aggregates[aggregate.index()].domain_objects.push(object);
    }

    fn add_attribute(&mut self, object: Id<DomainObject>, attribute: Attribute) {
        self.domain_objects[object.index()].attributes.push(attribute);
    }

    fn add_reference(&mut self, object: Id<DomainObject>, reference: Reference) {
        self.domain_objects[object.index()].references.push(reference);
    }

    fn add_domain_object_operation(&mut self, object: Id<DomainObject>, operation: Id<Operation>) {
        self.domain_objects[object.index()].operations.push(operation);
    }

    fn set_comment(&mut self, target: CommentTarget, comment: String) {
        match target {
            CommentTarget::Aggregate(id) => self.aggregates[id.index()].comment = Some(comment),
            CommentTarget::DomainObject(id) => {
                self.domain_objects[id.index()].comment = Some(comment)
            }
            CommentTarget::Service(id) => self.services[id.index()].comment = Some(comment),
        }
    }

    fn create_service(&mut self, name: &str) -> Id<Service> {
        self.services.push(Service {
            name: name.to_string(),
            ..Service::default()
        });
        Id::from_index(self.services.len() - 1)
    }

    fn create_operation(&mut self, operation: Operation) -> Id<Operation> {
        self.operations.push(operation);
        Id::from_index(self.operations.len() - 1)
    }

    fn add_service_operation(&mut self, service: Id<Service>, operation: Id<Operation>) {
        self.services[service.index()].operations.push(operation);
    }

    fn add_aggregate_service(&mut self, aggregate: Id<Aggregate>, service: Id<Service>) {
        self.aggregates[aggregate.index()].services.push(service);
    }

    fn create_application(&mut self) -> Id<Application> {
        self.applications.push(Application::default());
        Id::from_index(self.applications.len() - 1)
    }

    fn set_application_name(&mut self, application: Id<Application>, name: &str) {
        self.applications[application.index()].name = Some(name.to_string());
    }

    fn set_application(&mut self, bc: Id<BoundedContext>, application: Id<Application>) {
        self.bounded_context_arena[bc.index()].application = Some(application);
    }

    fn add_application_service(&mut self, application: Id<Application>, service: Id<Service>) {
        self.applications[application.index()].services.push(service);
    }

    fn create_functionality(&mut self) -> Id<Functionality> {
        self.functionalities.push(Functionality::default());
        Id::from_index(self.functionalities.len() - 1)
    }

    fn set_functionality_name(&mut self, functionality: Id<Functionality>, name: &str) {
        self.functionalities[functionality.index()].name = Some(name.to_string());
    }

    fn set_saga_orchestrator(&mut self, functionality: Id<Functionality>, saga: bool) {
        self.functionalities[functionality.index()].saga_orchestrator = saga;
    }

    fn add_functionality(&mut self, application: Id<Application>, functionality: Id<Functionality>) {
        self.applications[application.index()]
            .functionalities
            .push(functionality);
    }

    fn add_functionality_step(&mut self, functionality: Id<Functionality>, step: FunctionalityStep) {
        self.functionalities[functionality.index()].steps.push(step);
    }

    fn create_relationship(
        &mut self,
        upstream: Id<BoundedContext>,
        downstream: Id<BoundedContext>,
    ) -> Id<UpstreamDownstreamRelationship> {
        self.relationship_arena.push(UpstreamDownstreamRelationship {
            upstream,
            downstream,
            upstream_exposed_aggregates: Vec::new(),
            exposed_aggregates_comment: None,
        });
        Id::from_index(self.relationship_arena.len() - 1)
    }

    fn add_exposed_aggregate(
        &mut self,
        relationship: Id<UpstreamDownstreamRelationship>,
        aggregate: Id<Aggregate>,
    ) {
        self.relationship_arena[relationship.index()]
            .upstream_exposed_aggregates
            .push(aggregate);
    }

    fn set_exposed_aggregates_comment(
        &mut self,
        relationship: Id<UpstreamDownstreamRelationship>,
        comment: String,
    ) {
        self.relationship_arena[relationship.index()].exposed_aggregates_comment = Some(comment);
    }

    fn add_relationship(&mut self, relationship: Id<UpstreamDownstreamRelationship>) {
        self.relationships.push(relationship);
    }
}

impl ContextMappingModel {
    fn push_domain_object(&mut self, name: &str, kind: DomainObjectKind) -> Id<DomainObject> {
        self.domain_objects.push(DomainObject {
            name: name.to_string(),
            kind,
            comment: None,
            attributes: Vec::new(),
            references: Vec::new(),
            operations: Vec::new(),
        });
        Id::from_index(self.domain_objects.len() - 1)
    }
}
