// Copyright 2025 Cowboy AI, LLC.

//! The discovery model
//!
//! An arena-backed graph of bounded contexts, aggregates, domain objects,
//! services, applications and functionalities. Every node lives in a per-kind
//! arena and is addressed by an [`Id`]. All creation and linking goes through
//! [`DiscoveryModel`], which enforces:
//!
//! - bounded context names are unique across the model
//! - aggregate, domain object, service and functionality names are unique
//!   within their parent
//! - at most one application per bounded context
//! - at most one aggregate root per aggregate, and only entities can be roots
//! - functionality names are never empty
//! - functionality steps and relationships only reference nodes that belong
//!   together
//!
//! Handles are only meaningful for the model that issued them; accessors
//! panic on a handle from another model.

pub mod model;
pub mod types;

pub use model::{
    Aggregate, Application, Attribute, BoundedContext, DomainObject, DomainObjectKind,
    Functionality, FunctionalityStep, Method, MethodOwner, MethodSignature, Parameter,
    Relationship, Service, ServiceOwner,
};
pub use types::{CollectionType, Type, TypeKind};

use crate::errors::{DiscoveryError, DiscoveryResult};
use crate::identifiers::Id;
use serde::Serialize;

/// Arena-backed discovery graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryModel {
    bounded_contexts: Vec<BoundedContext>,
    aggregates: Vec<Aggregate>,
    domain_objects: Vec<DomainObject>,
    services: Vec<Service>,
    methods: Vec<Method>,
    applications: Vec<Application>,
    functionalities: Vec<Functionality>,
    relationships: Vec<Relationship>,
}

impl DiscoveryModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ---- bounded contexts -------------------------------------------------

    /// Create a bounded context with a model-unique name
    pub fn add_bounded_context(
        &mut self,
        name: impl Into<String>,
    ) -> DiscoveryResult<Id<BoundedContext>> {
        let name = name.into();
        if self.find_bounded_context(&name).is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "BoundedContext",
                name,
            });
        }
        self.bounded_contexts.push(BoundedContext {
            name,
            technology: None,
            aggregates: Vec::new(),
            application: None,
        });
        Ok(Id::from_index(self.bounded_contexts.len() - 1))
    }

    /// Find a bounded context by name
    pub fn find_bounded_context(&self, name: &str) -> Option<Id<BoundedContext>> {
        self.bounded_contexts
            .iter()
            .position(|bc| bc.name == name)
            .map(Id::from_index)
    }

    /// Set the implementation technology of a bounded context
    pub fn set_technology(&mut self, bc: Id<BoundedContext>, technology: impl Into<String>) {
        self.bounded_contexts[bc.index()].technology = Some(technology.into());
    }

    /// Get a bounded context
    pub fn bounded_context(&self, id: Id<BoundedContext>) -> &BoundedContext {
        &self.bounded_contexts[id.index()]
    }

    /// Iterate all bounded contexts in creation order
    pub fn bounded_contexts(&self) -> impl Iterator<Item = (Id<BoundedContext>, &BoundedContext)> {
        self.bounded_contexts
            .iter()
            .enumerate()
            .map(|(i, bc)| (Id::from_index(i), bc))
    }

    /// Number of bounded contexts
    pub fn bounded_context_count(&self) -> usize {
        self.bounded_contexts.len()
    }

    // ---- aggregates -------------------------------------------------------

    /// Create an aggregate inside a bounded context
    pub fn add_aggregate(
        &mut self,
        bc: Id<BoundedContext>,
        name: impl Into<String>,
    ) -> DiscoveryResult<Id<Aggregate>> {
        let name = name.into();
        if self.find_aggregate(bc, &name).is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "Aggregate",
                name,
            });
        }
        self.aggregates.push(Aggregate {
            name,
            discovery_comment: None,
            parent: bc,
            domain_objects: Vec::new(),
            services: Vec::new(),
        });
        let id = Id::from_index(self.aggregates.len() - 1);
        self.bounded_contexts[bc.index()].aggregates.push(id);
        Ok(id)
    }

    /// Find an aggregate of a bounded context by name
    pub fn find_aggregate(&self, bc: Id<BoundedContext>, name: &str) -> Option<Id<Aggregate>> {
        self.bounded_contexts[bc.index()]
            .aggregates
            .iter()
            .copied()
            .find(|a| self.aggregates[a.index()].name == name)
    }

    /// Set the discovery comment of an aggregate
    pub fn set_aggregate_comment(&mut self, aggregate: Id<Aggregate>, comment: impl Into<String>) {
        self.aggregates[aggregate.index()].discovery_comment = Some(comment.into());
    }

    /// Get an aggregate
    pub fn aggregate(&self, id: Id<Aggregate>) -> &Aggregate {
        &self.aggregates[id.index()]
    }

    /// Aggregate root of an aggregate, if one is marked
    pub fn aggregate_root(&self, aggregate: Id<Aggregate>) -> Option<Id<DomainObject>> {
        self.aggregates[aggregate.index()]
            .domain_objects
            .iter()
            .copied()
            .find(|o| self.domain_objects[o.index()].aggregate_root)
    }

    // ---- domain objects ---------------------------------------------------

    /// Create a domain object inside an aggregate
    pub fn add_domain_object(
        &mut self,
        aggregate: Id<Aggregate>,
        kind: DomainObjectKind,
        name: impl Into<String>,
    ) -> DiscoveryResult<Id<DomainObject>> {
        let name = name.into();
        if self.find_domain_object(aggregate, &name).is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "DomainObject",
                name,
            });
        }
        self.domain_objects.push(DomainObject {
            name,
            kind,
            discovery_comment: None,
            aggregate_root: false,
            parent: aggregate,
            attributes: Vec::new(),
            methods: Vec::new(),
        });
        let id = Id::from_index(self.domain_objects.len() - 1);
        self.aggregates[aggregate.index()].domain_objects.push(id);
        Ok(id)
    }

    /// Find a domain object of an aggregate by name
    pub fn find_domain_object(
        &self,
        aggregate: Id<Aggregate>,
        name: &str,
    ) -> Option<Id<DomainObject>> {
        self.aggregates[aggregate.index()]
            .domain_objects
            .iter()
            .copied()
            .find(|o| self.domain_objects[o.index()].name == name)
    }

    /// Set the discovery comment of a domain object
    pub fn set_domain_object_comment(
        &mut self,
        object: Id<DomainObject>,
        comment: impl Into<String>,
    ) {
        self.domain_objects[object.index()].discovery_comment = Some(comment.into());
    }

    /// Get a domain object
    pub fn domain_object(&self, id: Id<DomainObject>) -> &DomainObject {
        &self.domain_objects[id.index()]
    }

    /// Number of domain objects across all aggregates
    pub fn domain_object_count(&self) -> usize {
        self.domain_objects.len()
    }

    /// Attach an attribute; names are unique per domain object
    pub fn add_attribute(
        &mut self,
        object: Id<DomainObject>,
        attribute: Attribute,
    ) -> DiscoveryResult<()> {
        self.check_type(&attribute.ty)?;
        let target = &mut self.domain_objects[object.index()];
        if target.attribute(&attribute.name).is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "Attribute",
                name: attribute.name,
            });
        }
        target.attributes.push(attribute);
        Ok(())
    }

    /// Mark an entity as the root of its aggregate
    pub fn set_aggregate_root(&mut self, object: Id<DomainObject>) -> DiscoveryResult<()> {
        let candidate = &self.domain_objects[object.index()];
        if !candidate.is_entity() {
            return Err(DiscoveryError::InvariantViolation(format!(
                "value object '{}' cannot be an aggregate root",
                candidate.name
            )));
        }
        match self.aggregate_root(candidate.parent) {
            Some(existing) if existing == object => Ok(()),
            Some(existing) => Err(DiscoveryError::InvariantViolation(format!(
                "aggregate '{}' already has root '{}'",
                self.aggregates[candidate.parent.index()].name,
                self.domain_objects[existing.index()].name
            ))),
            None => {
                self.domain_objects[object.index()].aggregate_root = true;
                Ok(())
            }
        }
    }

    /// Mark, in every aggregate without a root, the first entity whose name
    /// ends with `suffix`
    ///
    /// Returns the number of roots marked.
    pub fn mark_aggregate_roots(&mut self, suffix: &str) -> usize {
        let mut marked = 0;
        for index in 0..self.aggregates.len() {
            let aggregate = Id::from_index(index);
            if self.aggregate_root(aggregate).is_some() {
                continue;
            }
            let root = self.aggregates[index].domain_objects.iter().copied().find(|o| {
                let object = &self.domain_objects[o.index()];
                object.is_entity() && object.name.ends_with(suffix)
            });
            if let Some(root) = root {
                self.domain_objects[root.index()].aggregate_root = true;
                marked += 1;
            }
        }
        marked
    }

    /// Add an operation to a domain object
    pub fn add_domain_object_method(
        &mut self,
        object: Id<DomainObject>,
        signature: MethodSignature,
    ) -> DiscoveryResult<Id<Method>> {
        let id = self.push_method(MethodOwner::DomainObject(object), signature)?;
        self.domain_objects[object.index()].methods.push(id);
        Ok(id)
    }

    // ---- services and methods ---------------------------------------------

    /// Create a domain service owned by an aggregate
    pub fn add_aggregate_service(
        &mut self,
        aggregate: Id<Aggregate>,
        name: impl Into<String>,
    ) -> DiscoveryResult<Id<Service>> {
        let name = name.into();
        let taken = self.aggregates[aggregate.index()]
            .services
            .iter()
            .any(|s| self.services[s.index()].name == name);
        if taken {
            return Err(DiscoveryError::AlreadyExists {
                kind: "Service",
                name,
            });
        }
        let id = self.push_service(ServiceOwner::Aggregate(aggregate), name);
        self.aggregates[aggregate.index()].services.push(id);
        Ok(id)
    }

    /// Create an application service
    pub fn add_application_service(
        &mut self,
        application: Id<Application>,
        name: impl Into<String>,
    ) -> DiscoveryResult<Id<Service>> {
        let name = name.into();
        if self.find_application_service(application, &name).is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "Service",
                name,
            });
        }
        let id = self.push_service(ServiceOwner::Application(application), name);
        self.applications[application.index()].services.push(id);
        Ok(id)
    }

    /// Find an application service by name
    pub fn find_application_service(
        &self,
        application: Id<Application>,
        name: &str,
    ) -> Option<Id<Service>> {
        self.applications[application.index()]
            .services
            .iter()
            .copied()
            .find(|s| self.services[s.index()].name == name)
    }

    /// Set the discovery comment of a service
    pub fn set_service_comment(&mut self, service: Id<Service>, comment: impl Into<String>) {
        self.services[service.index()].discovery_comment = Some(comment.into());
    }

    /// Get a service
    pub fn service(&self, id: Id<Service>) -> &Service {
        &self.services[id.index()]
    }

    /// Append an operation to a service
    ///
    /// Operations are never deduplicated: every call creates a new one.
    pub fn add_operation(
        &mut self,
        service: Id<Service>,
        signature: MethodSignature,
    ) -> DiscoveryResult<Id<Method>> {
        let id = self.push_method(MethodOwner::Service(service), signature)?;
        self.services[service.index()].operations.push(id);
        Ok(id)
    }

    /// Get a method
    pub fn method(&self, id: Id<Method>) -> &Method {
        &self.methods[id.index()]
    }

    // ---- applications and functionalities ---------------------------------

    /// Create the application of a bounded context
    pub fn set_application(
        &mut self,
        bc: Id<BoundedContext>,
        name: Option<String>,
    ) -> DiscoveryResult<Id<Application>> {
        if self.bounded_contexts[bc.index()].application.is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "Application",
                name: self.bounded_contexts[bc.index()].name.clone(),
            });
        }
        self.applications.push(Application {
            name,
            bounded_context: bc,
            services: Vec::new(),
            functionalities: Vec::new(),
        });
        let id = Id::from_index(self.applications.len() - 1);
        self.bounded_contexts[bc.index()].application = Some(id);
        Ok(id)
    }

    /// Application of a bounded context, if one exists
    pub fn application_of(&self, bc: Id<BoundedContext>) -> Option<Id<Application>> {
        self.bounded_contexts[bc.index()].application
    }

    /// Get an application
    pub fn application(&self, id: Id<Application>) -> &Application {
        &self.applications[id.index()]
    }

    /// Create a functionality; the name must be non-empty and unique within
    /// the application
    pub fn add_functionality(
        &mut self,
        application: Id<Application>,
        name: impl Into<String>,
        saga: bool,
    ) -> DiscoveryResult<Id<Functionality>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DiscoveryError::InvariantViolation(
                "the name of a functionality must not be empty".to_string(),
            ));
        }
        if self.find_functionality(application, &name).is_some() {
            return Err(DiscoveryError::AlreadyExists {
                kind: "Functionality",
                name,
            });
        }
        self.functionalities.push(Functionality {
            name,
            saga,
            application,
            steps: Vec::new(),
        });
        let id = Id::from_index(self.functionalities.len() - 1);
        self.applications[application.index()].functionalities.push(id);
        Ok(id)
    }

    /// Find a functionality of an application by name
    pub fn find_functionality(
        &self,
        application: Id<Application>,
        name: &str,
    ) -> Option<Id<Functionality>> {
        self.applications[application.index()]
            .functionalities
            .iter()
            .copied()
            .find(|f| self.functionalities[f.index()].name == name)
    }

    /// Get a functionality
    pub fn functionality(&self, id: Id<Functionality>) -> &Functionality {
        &self.functionalities[id.index()]
    }

    /// Append a step to a functionality
    ///
    /// The operation must belong to the service, and the service must belong
    /// to the step's bounded context (its application or one of its
    /// aggregates).
    pub fn add_functionality_step(
        &mut self,
        functionality: Id<Functionality>,
        step: FunctionalityStep,
    ) -> DiscoveryResult<()> {
        let service = &self.services[step.service.index()];
        if !service.operations.contains(&step.operation) {
            return Err(DiscoveryError::InvariantViolation(format!(
                "operation '{}' does not belong to service '{}'",
                self.methods[step.operation.index()].name,
                service.name
            )));
        }
        let owner_context = match service.owner {
            ServiceOwner::Application(app) => self.applications[app.index()].bounded_context,
            ServiceOwner::Aggregate(agg) => self.aggregates[agg.index()].parent,
        };
        if owner_context != step.bounded_context {
            return Err(DiscoveryError::InvariantViolation(format!(
                "service '{}' does not belong to bounded context '{}'",
                service.name,
                self.bounded_contexts[step.bounded_context.index()].name
            )));
        }
        self.functionalities[functionality.index()].steps.push(step);
        Ok(())
    }

    // ---- relationships ----------------------------------------------------

    /// Add an upstream/downstream relationship
    ///
    /// Every exposed aggregate must belong to the upstream context.
    pub fn add_relationship(
        &mut self,
        upstream: Id<BoundedContext>,
        downstream: Id<BoundedContext>,
        exposed_aggregates: Vec<Id<Aggregate>>,
        exposed_aggregates_comment: Option<String>,
    ) -> DiscoveryResult<()> {
        if let Some(foreign) = exposed_aggregates
            .iter()
            .find(|a| self.aggregates[a.index()].parent != upstream)
        {
            return Err(DiscoveryError::InvariantViolation(format!(
                "exposed aggregate '{}' does not belong to upstream context '{}'",
                self.aggregates[foreign.index()].name,
                self.bounded_contexts[upstream.index()].name
            )));
        }
        self.relationships.push(Relationship {
            upstream,
            downstream,
            exposed_aggregates,
            exposed_aggregates_comment,
        });
        Ok(())
    }

    /// All relationships in creation order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    // ---- internals --------------------------------------------------------

    fn push_service(&mut self, owner: ServiceOwner, name: String) -> Id<Service> {
        self.services.push(Service {
            name,
            discovery_comment: None,
            owner,
            operations: Vec::new(),
        });
        Id::from_index(self.services.len() - 1)
    }

    fn push_method(
        &mut self,
        owner: MethodOwner,
        signature: MethodSignature,
    ) -> DiscoveryResult<Id<Method>> {
        if let Some(ty) = &signature.return_type {
            self.check_type(ty)?;
        }
        for parameter in &signature.parameters {
            self.check_type(&parameter.ty)?;
        }
        self.methods.push(Method {
            name: signature.name,
            return_type: signature.return_type,
            parameters: signature.parameters,
            owner,
        });
        Ok(Id::from_index(self.methods.len() - 1))
    }

    /// A domain-object type must point at an existing node
    fn check_type(&self, ty: &Type) -> DiscoveryResult<()> {
        match ty.domain_object_target() {
            Some(target) if target.index() >= self.domain_objects.len() => {
                Err(DiscoveryError::InvariantViolation(format!(
                    "type references unknown domain object {target}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn orders_model() -> (DiscoveryModel, Id<BoundedContext>, Id<Aggregate>) {
        let mut model = DiscoveryModel::new();
        let bc = model.add_bounded_context("Orders").unwrap();
        let agg = model.add_aggregate(bc, "Orders").unwrap();
        (model, bc, agg)
    }

    #[test]
    fn test_bounded_context_names_are_unique() {
        let (mut model, bc, _) = orders_model();

        let err = model.add_bounded_context("Orders").unwrap_err();
        assert!(matches!(err, DiscoveryError::AlreadyExists { kind: "BoundedContext", .. }));
        assert_eq!(model.find_bounded_context("Orders"), Some(bc));
        assert_eq!(model.bounded_context_count(), 1);
    }

    #[test]
    fn test_aggregate_names_are_scoped_to_their_context() {
        let (mut model, bc, agg) = orders_model();
        let other = model.add_bounded_context("Shipping").unwrap();

        assert!(model.add_aggregate(bc, "Orders").is_err());
        let shipped = model.add_aggregate(other, "Orders").unwrap();

        assert_ne!(agg, shipped);
        assert_eq!(model.bounded_context(other).aggregates, vec![shipped]);
        assert_eq!(model.aggregate(shipped).parent, other);
    }

    #[test]
    fn test_only_one_aggregate_root() {
        let (mut model, _, agg) = orders_model();
        let root = model
            .add_domain_object(agg, DomainObjectKind::Entity, "Order_RootEntity")
            .unwrap();
        let line = model
            .add_domain_object(agg, DomainObjectKind::Entity, "OrderLine")
            .unwrap();

        model.set_aggregate_root(root).unwrap();
        model.set_aggregate_root(root).unwrap();
        let err = model.set_aggregate_root(line).unwrap_err();

        assert!(err.is_invariant_violation());
        assert_eq!(model.aggregate_root(agg), Some(root));
    }

    #[test]
    fn test_value_object_cannot_be_root() {
        let (mut model, _, agg) = orders_model();
        let money = model
            .add_domain_object(agg, DomainObjectKind::ValueObject, "Money_RootEntity")
            .unwrap();

        assert!(model.set_aggregate_root(money).is_err());
        assert_eq!(model.mark_aggregate_roots("_RootEntity"), 0);
    }

    #[test]
    fn test_mark_aggregate_roots_by_suffix() {
        let (mut model, _, agg) = orders_model();
        model
            .add_domain_object(agg, DomainObjectKind::Entity, "OrderLine")
            .unwrap();
        let root = model
            .add_domain_object(agg, DomainObjectKind::Entity, "Order_RootEntity")
            .unwrap();

        assert_eq!(model.mark_aggregate_roots("_RootEntity"), 1);
        assert_eq!(model.aggregate_root(agg), Some(root));
        assert_eq!(model.mark_aggregate_roots("_RootEntity"), 0);
    }

    #[test]
    fn test_functionality_name_must_not_be_empty() {
        let (mut model, bc, _) = orders_model();
        let app = model.set_application(bc, Some("OrdersApplication".into())).unwrap();

        let err = model.add_functionality(app, "", true).unwrap_err();
        assert!(matches!(err, DiscoveryError::InvariantViolation(_)));
    }

    #[test]
    fn test_one_application_per_context() {
        let (mut model, bc, _) = orders_model();
        model.set_application(bc, None).unwrap();

        assert!(model.set_application(bc, None).is_err());
    }

    #[test]
    fn test_step_operation_must_belong_to_service() {
        let (mut model, bc, _) = orders_model();
        let app = model.set_application(bc, None).unwrap();
        let first = model.add_application_service(app, "FirstService").unwrap();
        let second = model.add_application_service(app, "SecondService").unwrap();
        let op = model.add_operation(first, MethodSignature::new("step0")).unwrap();
        let func = model.add_functionality(app, "CheckoutFunctionality", true).unwrap();

        let err = model
            .add_functionality_step(
                func,
                FunctionalityStep {
                    bounded_context: bc,
                    service: second,
                    operation: op,
                },
            )
            .unwrap_err();
        assert!(err.is_invariant_violation());

        model
            .add_functionality_step(
                func,
                FunctionalityStep {
                    bounded_context: bc,
                    service: first,
                    operation: op,
                },
            )
            .unwrap();
        assert_eq!(model.functionality(func).steps.len(), 1);
    }

    #[test]
    fn test_operations_are_never_deduplicated() {
        let (mut model, bc, _) = orders_model();
        let app = model.set_application(bc, None).unwrap();
        let svc = model.add_application_service(app, "ProcessService").unwrap();

        let a = model.add_operation(svc, MethodSignature::new("step0")).unwrap();
        let b = model.add_operation(svc, MethodSignature::new("step0")).unwrap();

        assert_ne!(a, b);
        assert_eq!(model.service(svc).operations, vec![a, b]);
    }

    #[test]
    fn test_relationship_exposes_only_upstream_aggregates() {
        let (mut model, orders, orders_agg) = orders_model();
        let shipping = model.add_bounded_context("Shipping").unwrap();
        let shipment = model.add_aggregate(shipping, "Shipment").unwrap();

        let err = model
            .add_relationship(orders, shipping, vec![shipment], None)
            .unwrap_err();
        assert!(err.is_invariant_violation());

        model
            .add_relationship(orders, shipping, vec![orders_agg], Some("exposed".into()))
            .unwrap();
        assert_eq!(model.relationships().len(), 1);
    }

    #[test]
    fn test_attribute_names_are_unique_per_object() {
        let (mut model, _, agg) = orders_model();
        let order = model
            .add_domain_object(agg, DomainObjectKind::Entity, "Order")
            .unwrap();

        model
            .add_attribute(order, Attribute::new("id", Type::primitive("Long")))
            .unwrap();
        assert!(model
            .add_attribute(order, Attribute::new("id", Type::primitive("String")))
            .is_err());
        assert!(model
            .add_attribute(
                order,
                Attribute::new("ghost", Type::domain_object(Id::from_index(99)))
            )
            .is_err());
        assert_eq!(model.domain_object(order).attributes.len(), 1);
    }
}
