// Copyright 2025 Cowboy AI, LLC.

//! Discovery strategies
//!
//! A bounded context strategy populates a [`DiscoveryModel`] with contexts,
//! aggregates, domain objects and applications. A relationship strategy runs
//! afterwards and links the contexts that are now in the model. The
//! [`ContextMapDiscoverer`] runs every registered strategy against one model.

pub mod mono2micro;

pub use mono2micro::{DecompositionAssembler, Mono2MicroDiscoveryStrategy};

use crate::discovery::{BoundedContext, DiscoveryModel};
use crate::errors::{DiscoveryError, DiscoveryResult};
use crate::identifiers::Id;
use std::path::PathBuf;
use tracing::info;

/// Populates a model with bounded contexts
pub trait BoundedContextDiscoveryStrategy {
    /// Strategy name used in diagnostics
    fn name(&self) -> &str;

    /// Add the discovered contexts to `model`
    fn discover_bounded_contexts(
        &mut self,
        model: &mut DiscoveryModel,
    ) -> DiscoveryResult<DiscoveryOutcome>;
}

/// Links bounded contexts that are already in a model
pub trait RelationshipDiscoveryStrategy {
    /// Strategy name used in diagnostics
    fn name(&self) -> &str;

    /// Add relationships to `model`, returning how many were added
    fn discover_relationships(&mut self, model: &mut DiscoveryModel) -> DiscoveryResult<usize>;
}

/// A file that could not be used
#[derive(Debug, Clone)]
pub struct FailedFile {
    /// Path of the file
    pub path: PathBuf,
    /// Why it was skipped
    pub error: DiscoveryError,
}

/// What a bounded context strategy found
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutcome {
    /// Contexts created or extended by the strategy
    pub bounded_contexts: Vec<Id<BoundedContext>>,
    /// Input files skipped because of an error
    pub failed_files: Vec<FailedFile>,
    /// Structure entities that matched no discovered domain object
    pub skipped_structure_entities: Vec<String>,
    /// Functionalities whose orchestrator matched no cluster of the run
    pub orphaned_functionalities: Vec<String>,
}

impl DiscoveryOutcome {
    /// Fold another outcome into this one
    pub fn merge(&mut self, other: DiscoveryOutcome) {
        for bc in other.bounded_contexts {
            if !self.bounded_contexts.contains(&bc) {
                self.bounded_contexts.push(bc);
            }
        }
        self.failed_files.extend(other.failed_files);
        self.skipped_structure_entities
            .extend(other.skipped_structure_entities);
        self.orphaned_functionalities
            .extend(other.orphaned_functionalities);
    }

    /// Check if every input file was usable
    pub fn is_complete(&self) -> bool {
        self.failed_files.is_empty()
    }
}

/// Result of a full discovery run
#[derive(Debug, Clone)]
pub struct DiscoveredContextMap {
    /// The populated model
    pub model: DiscoveryModel,
    /// Merged outcome of all bounded context strategies
    pub outcome: DiscoveryOutcome,
    /// Number of relationships added
    pub relationships: usize,
}

/// Runs discovery strategies against a fresh model
///
/// # Examples
///
/// ```rust,no_run
/// use cim_domain_discovery::{ContextMapDiscoverer, Mono2MicroDiscoveryStrategy};
///
/// let discovered = ContextMapDiscoverer::new()
///     .with_bounded_context_strategy(Mono2MicroDiscoveryStrategy::new("./decompositions"))
///     .discover()
///     .expect("discovery");
/// println!("{} contexts", discovered.model.bounded_context_count());
/// ```
#[derive(Default)]
pub struct ContextMapDiscoverer {
    bounded_context_strategies: Vec<Box<dyn BoundedContextDiscoveryStrategy>>,
    relationship_strategies: Vec<Box<dyn RelationshipDiscoveryStrategy>>,
}

impl ContextMapDiscoverer {
    /// Create a discoverer without strategies
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bounded context strategy
    pub fn with_bounded_context_strategy(
        mut self,
        strategy: impl BoundedContextDiscoveryStrategy + 'static,
    ) -> Self {
        self.bounded_context_strategies.push(Box::new(strategy));
        self
    }

    /// Register a relationship strategy
    pub fn with_relationship_strategy(
        mut self,
        strategy: impl RelationshipDiscoveryStrategy + 'static,
    ) -> Self {
        self.relationship_strategies.push(Box::new(strategy));
        self
    }

    /// Run all bounded context strategies, then all relationship strategies
    pub fn discover(&mut self) -> DiscoveryResult<DiscoveredContextMap> {
        let mut model = DiscoveryModel::new();
        let mut outcome = DiscoveryOutcome::default();

        for strategy in &mut self.bounded_context_strategies {
            let found = strategy.discover_bounded_contexts(&mut model)?;
            info!(
                strategy = strategy.name(),
                contexts = found.bounded_contexts.len(),
                failed_files = found.failed_files.len(),
                orphaned_functionalities = found.orphaned_functionalities.len(),
                "Bounded context strategy finished"
            );
            outcome.merge(found);
        }

        let mut relationships = 0;
        for strategy in &mut self.relationship_strategies {
            let added = strategy.discover_relationships(&mut model)?;
            info!(strategy = strategy.name(), relationships = added, "Relationship strategy finished");
            relationships += added;
        }

        Ok(DiscoveredContextMap {
            model,
            outcome,
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedContexts(Vec<&'static str>);

    impl BoundedContextDiscoveryStrategy for FixedContexts {
        fn name(&self) -> &str {
            "fixed"
        }

        fn discover_bounded_contexts(
            &mut self,
            model: &mut DiscoveryModel,
        ) -> DiscoveryResult<DiscoveryOutcome> {
            let mut outcome = DiscoveryOutcome::default();
            for name in &self.0 {
                let bc = model.add_bounded_context(*name)?;
                model.add_aggregate(bc, *name)?;
                outcome.bounded_contexts.push(bc);
            }
            Ok(outcome)
        }
    }

    struct ChainRelationships;

    impl RelationshipDiscoveryStrategy for ChainRelationships {
        fn name(&self) -> &str {
            "chain"
        }

        fn discover_relationships(&mut self, model: &mut DiscoveryModel) -> DiscoveryResult<usize> {
            let contexts: Vec<_> = model.bounded_contexts().map(|(id, _)| id).collect();
            for pair in contexts.windows(2) {
                let exposed = model.bounded_context(pair[0]).aggregates.clone();
                model.add_relationship(pair[0], pair[1], exposed, None)?;
            }
            Ok(contexts.len().saturating_sub(1))
        }
    }

    #[test]
    fn test_strategies_run_in_order() {
        let discovered = ContextMapDiscoverer::new()
            .with_bounded_context_strategy(FixedContexts(vec!["A", "B"]))
            .with_bounded_context_strategy(FixedContexts(vec!["C"]))
            .with_relationship_strategy(ChainRelationships)
            .discover()
            .unwrap();

        assert_eq!(discovered.model.bounded_context_count(), 3);
        assert_eq!(discovered.outcome.bounded_contexts.len(), 3);
        assert_eq!(discovered.relationships, 2);
        assert_eq!(discovered.model.relationships().len(), 2);
        assert!(discovered.outcome.is_complete());
    }

    #[test]
    fn test_strategy_error_aborts_discovery() {
        let result = ContextMapDiscoverer::new()
            .with_bounded_context_strategy(FixedContexts(vec!["A"]))
            .with_bounded_context_strategy(FixedContexts(vec!["A"]))
            .discover();

        assert!(matches!(result, Err(DiscoveryError::AlreadyExists { .. })));
    }
}
