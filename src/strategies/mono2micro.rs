// Copyright 2025 Cowboy AI, LLC.

//! Bounded context discovery from Mono2Micro decompositions
//!
//! Two kinds of files may live anywhere below the source root:
//!
//! - decomposition files (exact name, `m2m_decomposition.json` by default)
//!   carry clusters and functionalities
//! - structure files (name suffix, `m2m_structure.json` by default) carry the
//!   fields of the entities
//!
//! All decomposition files are applied before any structure file, so every
//! domain object a field can refer to already exists when fields are
//! resolved. A file that cannot be read or parsed is recorded in the outcome
//! and the remaining files are still processed.

use crate::config::DiscoveryConfig;
use crate::decomposition::{DataType, Decomposition, FunctionalityDescriptor};
use crate::discovery::{
    Aggregate, Application, Attribute, BoundedContext, DiscoveryModel, DomainObject,
    DomainObjectKind, FunctionalityStep, MethodSignature, Type,
};
use crate::errors::{DiscoveryError, DiscoveryResult};
use crate::identifiers::Id;
use crate::strategies::{BoundedContextDiscoveryStrategy, DiscoveryOutcome, FailedFile};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Discovers bounded contexts from the Mono2Micro files below a root
#[derive(Debug, Clone)]
pub struct Mono2MicroDiscoveryStrategy {
    source_path: PathBuf,
    config: DiscoveryConfig,
}

impl Mono2MicroDiscoveryStrategy {
    /// Create a strategy with the default naming conventions
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self::with_config(source_path, DiscoveryConfig::default())
    }

    /// Create a strategy with custom naming conventions
    pub fn with_config(source_path: impl Into<PathBuf>, config: DiscoveryConfig) -> Self {
        Self {
            source_path: source_path.into(),
            config,
        }
    }

    /// Decomposition files below the root, sorted by path
    pub fn decomposition_files(&self) -> Vec<PathBuf> {
        find_files(&self.source_path, |name| {
            self.config.is_decomposition_file(name)
        })
    }

    /// Structure files below the root, sorted by path
    pub fn structure_files(&self) -> Vec<PathBuf> {
        find_files(&self.source_path, |name| self.config.is_structure_file(name))
    }
}

impl BoundedContextDiscoveryStrategy for Mono2MicroDiscoveryStrategy {
    fn name(&self) -> &str {
        "mono2micro"
    }

    fn discover_bounded_contexts(
        &mut self,
        model: &mut DiscoveryModel,
    ) -> DiscoveryResult<DiscoveryOutcome> {
        self.config.validate()?;
        if !self.source_path.exists() {
            return Err(DiscoveryError::InputNotFound {
                path: self.source_path.clone(),
            });
        }

        let decomposition_files = self.decomposition_files();
        let structure_files = self.structure_files();
        info!(
            root = %self.source_path.display(),
            decompositions = decomposition_files.len(),
            structures = structure_files.len(),
            "Starting Mono2Micro discovery"
        );

        let mut assembler = DecompositionAssembler::new(model, &self.config);
        let mut failed_files = Vec::new();

        for path in decomposition_files {
            let applied = Decomposition::from_file(&path)
                .and_then(|decomposition| assembler.apply_clustering(&decomposition));
            match applied {
                Ok(contexts) => {
                    info!(file = %path.display(), contexts = contexts.len(), "Applied decomposition")
                }
                Err(error) => {
                    warn!(file = %path.display(), error = %error, "Skipping decomposition file");
                    failed_files.push(FailedFile { path, error });
                }
            }
        }

        for path in structure_files {
            let applied = Decomposition::from_file(&path)
                .and_then(|structure| assembler.apply_structure(&structure));
            match applied {
                Ok(attached) => info!(file = %path.display(), attached, "Applied structure"),
                Err(error) => {
                    warn!(file = %path.display(), error = %error, "Skipping structure file");
                    failed_files.push(FailedFile { path, error });
                }
            }
        }

        let mut outcome = assembler.finish();
        outcome.failed_files = failed_files;
        Ok(outcome)
    }
}

fn find_files(root: &Path, matches: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(error = %error, "Cannot read directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(|name| matches(name)))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Builds the discovery model from parsed decompositions
///
/// Holds the run-scoped name tables. Apply every clustering decomposition
/// first, then every structure decomposition, then call [`finish`].
///
/// [`finish`]: DecompositionAssembler::finish
pub struct DecompositionAssembler<'m> {
    model: &'m mut DiscoveryModel,
    config: &'m DiscoveryConfig,
    domain_objects_by_name: HashMap<String, Id<DomainObject>>,
    bounded_contexts_by_name: HashMap<String, Id<BoundedContext>>,
    discovered: Vec<Id<BoundedContext>>,
    skipped_structure_entities: Vec<String>,
    orphaned_functionalities: Vec<String>,
}

impl<'m> DecompositionAssembler<'m> {
    /// Start a run against `model`
    pub fn new(model: &'m mut DiscoveryModel, config: &'m DiscoveryConfig) -> Self {
        Self {
            model,
            config,
            domain_objects_by_name: HashMap::new(),
            bounded_contexts_by_name: HashMap::new(),
            discovered: Vec::new(),
            skipped_structure_entities: Vec::new(),
            orphaned_functionalities: Vec::new(),
        }
    }

    /// Create bounded contexts, aggregates, entities and applications for
    /// every cluster, then rebuild the decomposition's functionalities
    ///
    /// All clusters are created before any functionality step is rebuilt,
    /// since a step may run in any cluster of the decomposition. An
    /// orchestrator or step cluster may also be a context created by an
    /// earlier decomposition of this run. Functionalities whose orchestrator
    /// is unknown are skipped and listed in the outcome.
    pub fn apply_clustering(
        &mut self,
        decomposition: &Decomposition,
    ) -> DiscoveryResult<Vec<Id<BoundedContext>>> {
        self.check_step_clusters(decomposition)?;

        let mut contexts = Vec::with_capacity(decomposition.clusters.len());
        for cluster in &decomposition.clusters {
            let bc = self.ensure_bounded_context(&cluster.name)?;
            let aggregate = match self.model.find_aggregate(bc, &cluster.name) {
                Some(existing) => existing,
                None => self.model.add_aggregate(bc, cluster.name.as_str())?,
            };
            for element in &cluster.elements {
                let object = match self.model.find_domain_object(aggregate, &element.name) {
                    Some(existing) => existing,
                    None => self.model.add_domain_object(
                        aggregate,
                        DomainObjectKind::Entity,
                        element.name.as_str(),
                    )?,
                };
                self.domain_objects_by_name
                    .insert(element.name.clone(), object);
            }
            self.ensure_application(bc)?;
            contexts.push(bc);
        }

        for functionality in &decomposition.functionalities {
            match self.bounded_contexts_by_name.get(&functionality.orchestrator) {
                Some(&orchestrator) => self.rebuild_functionality(orchestrator, functionality)?,
                None => {
                    warn!(
                        functionality = %functionality.name,
                        orchestrator = %functionality.orchestrator,
                        "Orchestrator is not a known cluster; functionality skipped"
                    );
                    self.orphaned_functionalities
                        .push(functionality.name.clone());
                }
            }
        }

        Ok(contexts)
    }

    /// Attach the fields of every known entity as attributes
    ///
    /// Entities that no decomposition clustered are skipped; their fields are
    /// never attached. Returns the number of attributes attached.
    ///
    /// Fields are attached entity by entity. On error, the attributes and
    /// proxies attached before the failing field stay in the model; applying
    /// the same structure again attaches only what is missing.
    pub fn apply_structure(&mut self, structure: &Decomposition) -> DiscoveryResult<usize> {
        let mut attached = 0;
        for entity in &structure.entities {
            let Some(&object) = self.domain_objects_by_name.get(&entity.name) else {
                debug!(entity = %entity.name, "Structure entity is not part of any cluster");
                self.skipped_structure_entities.push(entity.name.clone());
                continue;
            };
            let owner = self.model.domain_object(object).parent;
            for field in &entity.fields {
                let ty = self.resolve_type(&field.data_type, owner)?;
                match self.model.add_attribute(object, Attribute::new(field.name.as_str(), ty)) {
                    Ok(()) => attached += 1,
                    Err(DiscoveryError::AlreadyExists { name, .. }) => {
                        debug!(entity = %entity.name, attribute = %name, "Attribute already discovered")
                    }
                    Err(other) => return Err(other),
                }
            }
        }
        Ok(attached)
    }

    /// Mark aggregate roots and report what was discovered
    pub fn finish(self) -> DiscoveryOutcome {
        let roots = self.model.mark_aggregate_roots(&self.config.root_entity_suffix);
        info!(
            bounded_contexts = self.discovered.len(),
            domain_objects = self.model.domain_object_count(),
            aggregate_roots = roots,
            "Mono2Micro discovery finished"
        );
        DiscoveryOutcome {
            bounded_contexts: self.discovered,
            failed_files: Vec::new(),
            skipped_structure_entities: self.skipped_structure_entities,
            orphaned_functionalities: self.orphaned_functionalities,
        }
    }

    /// Resolve a field type relative to the aggregate owning the field
    ///
    /// A known domain object becomes a domain-object type (through a proxy
    /// when it lives in another aggregate), a parameterized type resolves to
    /// its first parameter, anything else is primitive. A collection wrapper
    /// on the outer type always wins over one found inside.
    pub fn resolve_type(
        &mut self,
        data_type: &DataType,
        owner: Id<Aggregate>,
    ) -> DiscoveryResult<Type> {
        let base = if let Some(&target) = self.domain_objects_by_name.get(data_type.name()) {
            self.domain_object_type(target, owner)?
        } else if let Some(parameter) = data_type.first_parameter() {
            self.resolve_type(parameter, owner)?
        } else {
            Type::primitive(data_type.name())
        };

        Ok(match data_type.collection() {
            Some(collection) => base.with_collection(collection),
            None => base,
        })
    }

    fn domain_object_type(
        &mut self,
        target: Id<DomainObject>,
        owner: Id<Aggregate>,
    ) -> DiscoveryResult<Type> {
        let referenced = self.model.domain_object(target);
        if referenced.parent == owner {
            return Ok(Type::domain_object(target));
        }
        let name = referenced.name.clone();
        let foreign = referenced.parent;
        let proxy = self.reference_proxy(&name, owner, foreign)?;
        Ok(Type::domain_object(proxy))
    }

    /// Find or create the stand-in for a foreign entity
    ///
    /// Proxies are keyed by name only: the first aggregate to need
    /// `<name>_Reference` owns it and later references reuse it.
    fn reference_proxy(
        &mut self,
        name: &str,
        owner: Id<Aggregate>,
        foreign: Id<Aggregate>,
    ) -> DiscoveryResult<Id<DomainObject>> {
        let reference_name = format!("{name}{}", self.config.reference_suffix);
        if let Some(&proxy) = self.domain_objects_by_name.get(&reference_name) {
            return Ok(proxy);
        }

        let proxy = self.model.add_domain_object(
            owner,
            DomainObjectKind::Entity,
            reference_name.as_str(),
        )?;
        let comment = format!(
            "This entity was created to reference the '{name}' entity of the '{}' aggregate.",
            self.model.aggregate(foreign).name
        );
        self.model.set_domain_object_comment(proxy, comment);
        debug!(
            proxy = %reference_name,
            aggregate = %self.model.aggregate(owner).name,
            "Created reference entity"
        );
        self.domain_objects_by_name.insert(reference_name, proxy);
        Ok(proxy)
    }

    fn ensure_bounded_context(&mut self, name: &str) -> DiscoveryResult<Id<BoundedContext>> {
        if let Some(&bc) = self.bounded_contexts_by_name.get(name) {
            return Ok(bc);
        }
        let bc = match self.model.find_bounded_context(name) {
            Some(existing) => existing,
            None => {
                debug!(bounded_context = %name, "Created bounded context");
                self.model.add_bounded_context(name)?
            }
        };
        self.bounded_contexts_by_name.insert(name.to_string(), bc);
        self.discovered.push(bc);
        Ok(bc)
    }

    fn ensure_application(&mut self, bc: Id<BoundedContext>) -> DiscoveryResult<Id<Application>> {
        match self.model.application_of(bc) {
            Some(app) => Ok(app),
            None => {
                let name = format!(
                    "{}{}",
                    self.model.bounded_context(bc).name,
                    self.config.application_suffix
                );
                self.model.set_application(bc, Some(name))
            }
        }
    }

    /// Every step must run in a cluster known to this run
    fn check_step_clusters(&self, decomposition: &Decomposition) -> DiscoveryResult<()> {
        let orchestrated = decomposition.functionalities.iter().filter(|f| {
            decomposition.cluster(&f.orchestrator).is_some()
                || self.bounded_contexts_by_name.contains_key(&f.orchestrator)
        });
        for functionality in orchestrated {
            for step in &functionality.steps {
                let known = decomposition.cluster(&step.cluster).is_some()
                    || self.bounded_contexts_by_name.contains_key(&step.cluster);
                if !known {
                    return Err(DiscoveryError::InvariantViolation(format!(
                        "functionality '{}' has a step in unknown cluster '{}'",
                        functionality.name, step.cluster
                    )));
                }
            }
        }
        Ok(())
    }

    fn rebuild_functionality(
        &mut self,
        orchestrator: Id<BoundedContext>,
        descriptor: &FunctionalityDescriptor,
    ) -> DiscoveryResult<()> {
        let display_name = descriptor.display_name();
        let name = format!("{display_name}{}", self.config.functionality_suffix);
        let application = self.ensure_application(orchestrator)?;

        let functionality = match self.model.find_functionality(application, &name) {
            Some(existing) => {
                warn!(
                    functionality = %name,
                    source = %descriptor.name,
                    "Functionality name already taken; appending steps to it"
                );
                existing
            }
            None => self.model.add_functionality(application, name.as_str(), true)?,
        };

        let service_name = format!("{display_name}{}", self.config.service_suffix);
        for (counter, step) in descriptor.steps.iter().enumerate() {
            let bc = self
                .bounded_contexts_by_name
                .get(&step.cluster)
                .copied()
                .ok_or_else(|| DiscoveryError::NotFound {
                    kind: "BoundedContext",
                    name: step.cluster.clone(),
                })?;
            let step_application = self.ensure_application(bc)?;
            let service = match self
                .model
                .find_application_service(step_application, &service_name)
            {
                Some(existing) => existing,
                None => self
                    .model
                    .add_application_service(step_application, service_name.as_str())?,
            };
            let operation_name = format!("{}{counter}", self.config.step_operation_prefix);
            let operation = self
                .model
                .add_operation(service, MethodSignature::new(operation_name))?;
            self.model.add_functionality_step(
                functionality,
                FunctionalityStep {
                    bounded_context: bc,
                    service,
                    operation,
                },
            )?;
        }
        debug!(
            functionality = %name,
            steps = descriptor.steps.len(),
            "Rebuilt functionality"
        );
        Ok(())
    }
}
