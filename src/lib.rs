//! # CIM Domain Discovery
//!
//! Discovers a domain model from a microservice decomposition and converts it
//! into a context mapping model.
//!
//! The pipeline has two stages:
//! - **Discovery**: a [`Mono2MicroDiscoveryStrategy`] reads decomposition
//!   files (clusters, entities, functionalities) and structure files (entity
//!   fields) and builds a [`DiscoveryModel`]: bounded contexts, aggregates,
//!   domain objects, application services and saga functionalities.
//!   Cross-cluster references are redirected to per-aggregate proxy entities.
//! - **Conversion**: a [`ContextMapConverter`] turns the completed discovery
//!   model into a [`ContextMappingModel`] through the [`MappingFactory`]
//!   operations, keeping the identity of every converted element.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cim_domain_discovery::{
//!     convert_context_map, ContextMapDiscoverer, DiscoveryConfig, Mono2MicroDiscoveryStrategy,
//! };
//!
//! # fn main() -> Result<(), cim_domain_discovery::DiscoveryError> {
//! let discovered = ContextMapDiscoverer::new()
//!     .with_bounded_context_strategy(Mono2MicroDiscoveryStrategy::new("./decompositions"))
//!     .discover()?;
//!
//! let (mapping, report) = convert_context_map(&discovered.model, &DiscoveryConfig::default())?;
//! println!(
//!     "{} contexts, {} dropped steps",
//!     mapping.bounded_contexts().len(),
//!     report.dropped_steps
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! 1. **Handles, not pointers**: every node is addressed by a typed [`Id`];
//!    identity is handle equality
//! 2. **Validated construction**: the models reject structurally invalid links
//! 3. **Best effort input**: a malformed file or an unresolvable step is
//!    reported, never fatal for the rest of the run

#![warn(missing_docs)]

mod config;
mod errors;
mod identifiers;
pub mod decomposition;
pub mod discovery;
pub mod mapping;
pub mod strategies;

pub use config::DiscoveryConfig;
pub use decomposition::{input_schema, DataType, Decomposition};
pub use discovery::{CollectionType, DiscoveryModel, Type, TypeKind};
pub use errors::{DiscoveryError, DiscoveryResult};
pub use identifiers::Id;
pub use mapping::{
    convert_context_map, CommentTarget, ContextMapConverter, ContextMappingModel, MappingFactory,
    TransformReport,
};
pub use strategies::{
    BoundedContextDiscoveryStrategy, ContextMapDiscoverer, DecompositionAssembler,
    DiscoveredContextMap, DiscoveryOutcome, FailedFile, Mono2MicroDiscoveryStrategy,
    RelationshipDiscoveryStrategy,
};
