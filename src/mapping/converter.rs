// Copyright 2025 Cowboy AI, LLC.

//! Discovery model to context mapping model conversion
//!
//! Conversion runs in two passes. The first pass creates every bounded
//! context, aggregate and domain object, then fills in the elements that only
//! point at already-created nodes: operations, services, applications and
//! functionalities. The second pass resolves everything that needs a complete
//! skeleton: references between domain objects, functionality steps and
//! relationships.
//!
//! Source nodes are looked up by handle, never by name, except where the
//! target model has no other key: steps resolve context, service and
//! operation by name, and exposed aggregates resolve by name within the
//! upstream context. Unresolved steps and exposed aggregates are dropped and
//! counted in the [`TransformReport`].

use super::model::{
    Aggregate, Attribute, BoundedContext, ComplexType, ComplexTypeKind, DomainObject,
    Functionality, FunctionalityStep, Operation, Parameter, Reference, Service,
};
use super::{CommentTarget, ContextMappingModel, MappingFactory};
use crate::config::DiscoveryConfig;
use crate::discovery::{self as source, DiscoveryModel, DomainObjectKind, Type, TypeKind};
use crate::errors::{DiscoveryError, DiscoveryResult};
use crate::identifiers::Id;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Counters of one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Bounded contexts converted
    pub bounded_contexts: usize,
    /// Domain objects converted
    pub domain_objects: usize,
    /// Functionality steps converted
    pub functionality_steps: usize,
    /// Steps whose context, service or operation could not be resolved
    pub dropped_steps: usize,
    /// Exposed aggregates with no same-named aggregate in the upstream context
    ///
    /// Always zero for a [`DiscoveryModel`] source: it only accepts exposed
    /// aggregates owned by the upstream context, and aggregate names are
    /// unique per context.
    pub dropped_exposed_aggregates: usize,
}

impl TransformReport {
    /// Check if nothing was dropped
    pub fn is_lossless(&self) -> bool {
        self.dropped_steps == 0 && self.dropped_exposed_aggregates == 0
    }
}

/// Convert a discovery model into a fresh [`ContextMappingModel`]
pub fn convert_context_map(
    discovered: &DiscoveryModel,
    config: &DiscoveryConfig,
) -> DiscoveryResult<(ContextMappingModel, TransformReport)> {
    let mut mapping = ContextMappingModel::new();
    let report = ContextMapConverter::new(&mut mapping)
        .with_config(config)
        .convert(discovered)?;
    Ok((mapping, report))
}

/// Builds a context mapping model from a discovery model
///
/// A converter is consumed by [`convert`](Self::convert); its lookup tables
/// never outlive one conversion.
pub struct ContextMapConverter<'f, F: MappingFactory> {
    factory: &'f mut F,
    root_entity_suffix: String,
    bounded_contexts_by_name: HashMap<String, Id<BoundedContext>>,
    domain_objects: IndexMap<Id<source::DomainObject>, Id<DomainObject>>,
    functionalities: IndexMap<Id<source::Functionality>, Id<Functionality>>,
    aggregates_by_context: HashMap<Id<BoundedContext>, Vec<(String, Id<Aggregate>)>>,
    application_services: HashMap<Id<BoundedContext>, Vec<(String, Id<Service>)>>,
    service_operations: HashMap<Id<Service>, Vec<(String, Id<Operation>)>>,
    report: TransformReport,
}

impl<'f, F: MappingFactory> ContextMapConverter<'f, F> {
    /// Create a converter writing through `factory`
    pub fn new(factory: &'f mut F) -> Self {
        Self {
            factory,
            root_entity_suffix: DiscoveryConfig::default().root_entity_suffix,
            bounded_contexts_by_name: HashMap::new(),
            domain_objects: IndexMap::new(),
            functionalities: IndexMap::new(),
            aggregates_by_context: HashMap::new(),
            application_services: HashMap::new(),
            service_operations: HashMap::new(),
            report: TransformReport::default(),
        }
    }

    /// Take naming rules from `config`
    pub fn with_config(mut self, config: &DiscoveryConfig) -> Self {
        self.root_entity_suffix = config.root_entity_suffix.clone();
        self
    }

    /// Convert `discovered`
    pub fn convert(mut self, discovered: &DiscoveryModel) -> DiscoveryResult<TransformReport> {
        let contexts: Vec<_> = discovered
            .bounded_contexts()
            .map(|(id, _)| id)
            .collect();

        let mut converted = Vec::with_capacity(contexts.len());
        for bc in &contexts {
            converted.push((*bc, self.convert_skeleton(discovered, *bc)));
        }
        for (bc, target) in &converted {
            self.convert_behavior(discovered, *bc, *target)?;
        }

        self.convert_attributes(discovered)?;
        self.convert_steps(discovered)?;
        self.convert_relationships(discovered)?;

        info!(
            bounded_contexts = self.report.bounded_contexts,
            domain_objects = self.report.domain_objects,
            functionality_steps = self.report.functionality_steps,
            dropped_steps = self.report.dropped_steps,
            dropped_exposed_aggregates = self.report.dropped_exposed_aggregates,
            "Converted discovery model"
        );
        Ok(self.report)
    }

    // ---- first pass -------------------------------------------------------

    fn convert_skeleton(
        &mut self,
        discovered: &DiscoveryModel,
        bc: Id<source::BoundedContext>,
    ) -> Id<BoundedContext> {
        let context = discovered.bounded_context(bc);
        let target = self.factory.create_bounded_context(&context.name);
        if let Some(technology) = &context.technology {
            self.factory.set_implementation_technology(target, technology);
        }
        self.factory.add_bounded_context(target);
        self.bounded_contexts_by_name
            .insert(context.name.clone(), target);
        self.report.bounded_contexts += 1;

        for aggregate in &context.aggregates {
            let aggregate_node = discovered.aggregate(*aggregate);
            let target_aggregate = self.factory.create_aggregate(&aggregate_node.name);
            if let Some(comment) = &aggregate_node.discovery_comment {
                self.factory.set_comment(
                    CommentTarget::Aggregate(target_aggregate),
                    block_comment(comment),
                );
            }
            self.factory.add_aggregate(target, target_aggregate);
            self.aggregates_by_context
                .entry(target)
                .or_default()
                .push((aggregate_node.name.clone(), target_aggregate));

            let mut root = None;
            for object in &aggregate_node.domain_objects {
                let object_node = discovered.domain_object(*object);
                let target_object = match object_node.kind {
                    DomainObjectKind::Entity => self.factory.create_entity(&object_node.name),
                    DomainObjectKind::ValueObject => {
                        self.factory.create_value_object(&object_node.name)
                    }
                };
                if let Some(comment) = &object_node.discovery_comment {
                    self.factory.set_comment(
                        CommentTarget::DomainObject(target_object),
                        block_comment(comment),
                    );
                }
                self.factory.add_domain_object(target_aggregate, target_object);
                self.domain_objects.insert(*object, target_object);
                self.report.domain_objects += 1;

                if object_node.aggregate_root {
                    root = Some(target_object);
                }
            }

            let root = root.or_else(|| {
                aggregate_node
                    .domain_objects
                    .iter()
                    .map(|object| discovered.domain_object(*object))
                    .position(|object| {
                        object.is_entity() && object.name.ends_with(&self.root_entity_suffix)
                    })
                    .and_then(|index| self.domain_objects.get(&aggregate_node.domain_objects[index]))
                    .copied()
            });
            if let Some(root) = root {
                self.factory.set_aggregate_root(root);
            }
        }
        target
    }

    fn convert_behavior(
        &mut self,
        discovered: &DiscoveryModel,
        bc: Id<source::BoundedContext>,
        target: Id<BoundedContext>,
    ) -> DiscoveryResult<()> {
        let context = discovered.bounded_context(bc);

        for aggregate in &context.aggregates {
            let aggregate_node = discovered.aggregate(*aggregate);
            for object in &aggregate_node.domain_objects {
                let target_object = self.mapped_domain_object(*object)?;
                for method in &discovered.domain_object(*object).methods {
                    let operation = self.convert_method(discovered, *method)?;
                    let operation = self.factory.create_operation(operation);
                    self.factory
                        .add_domain_object_operation(target_object, operation);
                }
            }

            let target_aggregate = self.aggregate_in(target, &aggregate_node.name)?;
            for service in &aggregate_node.services {
                let target_service = self.convert_service(discovered, *service)?;
                self.factory
                    .add_aggregate_service(target_aggregate, target_service);
            }
        }

        let Some(application) = context.application else {
            return Ok(());
        };
        let application_node = discovered.application(application);
        let target_application = self.factory.create_application();
        if let Some(name) = application_node.name.as_deref().filter(|n| !n.is_empty()) {
            self.factory.set_application_name(target_application, name);
        }
        self.factory.set_application(target, target_application);

        for service in &application_node.services {
            let target_service = self.convert_service(discovered, *service)?;
            self.factory
                .add_application_service(target_application, target_service);
            self.application_services
                .entry(target)
                .or_default()
                .push((discovered.service(*service).name.clone(), target_service));
        }

        for functionality in &application_node.functionalities {
            let functionality_node = discovered.functionality(*functionality);
            let target_functionality = self.factory.create_functionality();
            if !functionality_node.name.is_empty() {
                self.factory
                    .set_functionality_name(target_functionality, &functionality_node.name);
            }
            self.factory
                .set_saga_orchestrator(target_functionality, functionality_node.saga);
            self.factory
                .add_functionality(target_application, target_functionality);
            self.functionalities
                .insert(*functionality, target_functionality);
        }
        Ok(())
    }

    fn convert_service(
        &mut self,
        discovered: &DiscoveryModel,
        service: Id<source::Service>,
    ) -> DiscoveryResult<Id<Service>> {
        let service_node = discovered.service(service);
        let target = self.factory.create_service(&service_node.name);
        if let Some(comment) = &service_node.discovery_comment {
            self.factory
                .set_comment(CommentTarget::Service(target), block_comment(comment));
        }
        for method in &service_node.operations {
            let operation = self.convert_method(discovered, *method)?;
            let name = operation.name.clone();
            let operation = self.factory.create_operation(operation);
            self.factory.add_service_operation(target, operation);
            self.service_operations
                .entry(target)
                .or_default()
                .push((name, operation));
        }
        Ok(target)
    }

    fn convert_method(
        &self,
        discovered: &DiscoveryModel,
        method: Id<source::Method>,
    ) -> DiscoveryResult<Operation> {
        let method = discovered.method(method);
        let return_type = method
            .return_type
            .as_ref()
            .map(|ty| self.complex_type(ty))
            .transpose()?;
        let parameters = method
            .parameters
            .iter()
            .map(|parameter| {
                Ok(Parameter {
                    name: parameter.name.clone(),
                    parameter_type: self.complex_type(&parameter.ty)?,
                })
            })
            .collect::<DiscoveryResult<Vec<_>>>()?;
        Ok(Operation {
            name: method.name.clone(),
            return_type,
            parameters,
        })
    }

    fn complex_type(&self, ty: &Type) -> DiscoveryResult<ComplexType> {
        let kind = match &ty.kind {
            TypeKind::Primitive(name) => ComplexTypeKind::Primitive(name.clone()),
            TypeKind::DomainObject(target) => {
                ComplexTypeKind::DomainObject(self.mapped_domain_object(*target)?)
            }
        };
        Ok(ComplexType {
            kind,
            collection: ty.collection,
        })
    }

    // ---- second pass ------------------------------------------------------

    fn convert_attributes(&mut self, discovered: &DiscoveryModel) -> DiscoveryResult<()> {
        let pairs: Vec<_> = self
            .domain_objects
            .iter()
            .map(|(source, target)| (*source, *target))
            .collect();

        for (object, target_object) in pairs {
            for attribute in &discovered.domain_object(object).attributes {
                match &attribute.ty.kind {
                    TypeKind::Primitive(name) => self.factory.add_attribute(
                        target_object,
                        Attribute {
                            name: attribute.name.clone(),
                            ty: name.clone(),
                            collection: attribute.ty.collection,
                        },
                    ),
                    TypeKind::DomainObject(referenced) => {
                        let referenced = self.mapped_domain_object(*referenced)?;
                        self.factory.add_reference(
                            target_object,
                            Reference {
                                name: attribute.name.clone(),
                                domain_object: referenced,
                                collection: attribute.ty.collection,
                            },
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn convert_steps(&mut self, discovered: &DiscoveryModel) -> DiscoveryResult<()> {
        let pairs: Vec<_> = self
            .functionalities
            .iter()
            .map(|(source, target)| (*source, *target))
            .collect();

        for (functionality, target_functionality) in pairs {
            for step in &discovered.functionality(functionality).steps {
                match self.resolve_step(discovered, step) {
                    Some(resolved) => {
                        self.factory
                            .add_functionality_step(target_functionality, resolved);
                        self.report.functionality_steps += 1;
                    }
                    None => {
                        warn!(
                            functionality = %discovered.functionality(functionality).name,
                            bounded_context = %discovered.bounded_context(step.bounded_context).name,
                            service = %discovered.service(step.service).name,
                            operation = %discovered.method(step.operation).name,
                            "Dropping unresolved functionality step"
                        );
                        self.report.dropped_steps += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_step(
        &self,
        discovered: &DiscoveryModel,
        step: &source::FunctionalityStep,
    ) -> Option<FunctionalityStep> {
        let bounded_context = *self
            .bounded_contexts_by_name
            .get(&discovered.bounded_context(step.bounded_context).name)?;
        let service_name = &discovered.service(step.service).name;
        let service = self
            .application_services
            .get(&bounded_context)?
            .iter()
            .find(|(name, _)| name == service_name)
            .map(|(_, service)| *service)?;
        let operation_name = &discovered.method(step.operation).name;
        let operation = self
            .service_operations
            .get(&service)?
            .iter()
            .find(|(name, _)| name == operation_name)
            .map(|(_, operation)| *operation)?;
        Some(FunctionalityStep {
            bounded_context,
            service,
            operation,
        })
    }

    fn convert_relationships(&mut self, discovered: &DiscoveryModel) -> DiscoveryResult<()> {
        for relationship in discovered.relationships() {
            let upstream = self.mapped_bounded_context(discovered, relationship.upstream)?;
            let downstream = self.mapped_bounded_context(discovered, relationship.downstream)?;
            let target = self.factory.create_relationship(upstream, downstream);

            for aggregate in &relationship.exposed_aggregates {
                let name = &discovered.aggregate(*aggregate).name;
                match self.aggregate_in(upstream, name) {
                    Ok(exposed) => self.factory.add_exposed_aggregate(target, exposed),
                    Err(_) => {
                        warn!(aggregate = %name, "Dropping unmatched exposed aggregate");
                        self.report.dropped_exposed_aggregates += 1;
                    }
                }
            }
            if let Some(comment) = &relationship.exposed_aggregates_comment {
                self.factory
                    .set_exposed_aggregates_comment(target, format!("// {comment}"));
            }
            self.factory.add_relationship(target);
            debug!(
                upstream = %discovered.bounded_context(relationship.upstream).name,
                downstream = %discovered.bounded_context(relationship.downstream).name,
                "Converted relationship"
            );
        }
        Ok(())
    }

    // ---- lookups ----------------------------------------------------------

    fn mapped_domain_object(
        &self,
        object: Id<source::DomainObject>,
    ) -> DiscoveryResult<Id<DomainObject>> {
        self.domain_objects.get(&object).copied().ok_or_else(|| {
            DiscoveryError::Internal(format!("domain object {object} was not converted"))
        })
    }

    fn mapped_bounded_context(
        &self,
        discovered: &DiscoveryModel,
        bc: Id<source::BoundedContext>,
    ) -> DiscoveryResult<Id<BoundedContext>> {
        let name = &discovered.bounded_context(bc).name;
        self.bounded_contexts_by_name
            .get(name)
            .copied()
            .ok_or_else(|| {
                DiscoveryError::Internal(format!("bounded context '{name}' was not converted"))
            })
    }

    fn aggregate_in(
        &self,
        bc: Id<BoundedContext>,
        name: &str,
    ) -> DiscoveryResult<Id<Aggregate>> {
        self.aggregates_by_context
            .get(&bc)
            .and_then(|aggregates| aggregates.iter().find(|(n, _)| n == name))
            .map(|(_, aggregate)| *aggregate)
            .ok_or_else(|| DiscoveryError::NotFound {
                kind: "Aggregate",
                name: name.to_string(),
            })
    }
}

fn block_comment(comment: &str) -> String {
    format!("/* {comment} */")
}
