// Copyright 2025 Cowboy AI, LLC.

use cim_domain_discovery::{
    convert_context_map, Decomposition, DecompositionAssembler, DiscoveryConfig, DiscoveryModel,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashMap;

/// Cluster sizes, field references as (from, to) entity indices, and the
/// clusters visited by one saga's steps
#[derive(Debug, Clone)]
struct Scenario {
    cluster_sizes: Vec<usize>,
    references: Vec<(usize, usize)>,
    step_clusters: Vec<usize>,
}

impl Scenario {
    fn entity_names(&self) -> Vec<(usize, String)> {
        self.cluster_sizes
            .iter()
            .enumerate()
            .flat_map(|(c, size)| (0..*size).map(move |e| (c, format!("C{c}E{e}"))))
            .collect()
    }

    fn assemble(&self) -> DiscoveryModel {
        let entities = self.entity_names();
        let clusters: Vec<_> = self
            .cluster_sizes
            .iter()
            .enumerate()
            .map(|(c, _)| {
                let elements: Vec<_> = entities
                    .iter()
                    .filter(|(owner, _)| *owner == c)
                    .map(|(_, name)| json!({ "name": name }))
                    .collect();
                json!({ "name": format!("C{c}"), "elements": elements })
            })
            .collect();
        let steps: Vec<_> = self
            .step_clusters
            .iter()
            .map(|c| json!({ "cluster": format!("C{c}") }))
            .collect();
        let clustering = json!({
            "clusters": clusters,
            "functionalities": [ { "name": "flow.run", "orchestrator": "C0", "steps": steps } ]
        });

        let structure_entities: Vec<_> = entities
            .iter()
            .enumerate()
            .map(|(index, (_, name))| {
                let fields: Vec<_> = self
                    .references
                    .iter()
                    .enumerate()
                    .filter(|(_, (from, _))| *from == index)
                    .map(|(n, (_, to))| json!({ "name": format!("f{n}"), "type": { "name": entities[*to].1 } }))
                    .collect();
                json!({ "name": name, "fields": fields })
            })
            .collect();
        let structure = json!({ "entities": structure_entities });

        let config = DiscoveryConfig::default();
        let mut model = DiscoveryModel::new();
        let mut assembler = DecompositionAssembler::new(&mut model, &config);
        assembler
            .apply_clustering(&Decomposition::from_json_str(&clustering.to_string()).unwrap())
            .unwrap();
        assembler
            .apply_structure(&Decomposition::from_json_str(&structure.to_string()).unwrap())
            .unwrap();
        assembler.finish();
        model
    }
}

fn scenario() -> impl Strategy<Value = Scenario> {
    proptest::collection::vec(1usize..4, 1..5).prop_flat_map(|cluster_sizes| {
        let entities: usize = cluster_sizes.iter().sum();
        let clusters = cluster_sizes.len();
        (
            Just(cluster_sizes),
            proptest::collection::vec((0..entities, 0..entities), 0..8),
            proptest::collection::vec(0..clusters, 0..6),
        )
            .prop_map(|(cluster_sizes, references, step_clusters)| Scenario {
                cluster_sizes,
                references,
                step_clusters,
            })
    })
}

proptest! {
    #[test]
    fn each_foreign_entity_gets_one_proxy(scenario in scenario()) {
        let discovered = scenario.assemble();
        let (mapping, report) = convert_context_map(&discovered, &DiscoveryConfig::default()).unwrap();

        prop_assert_eq!(report.domain_objects, discovered.domain_object_count());
        prop_assert_eq!(mapping.domain_object_count(), discovered.domain_object_count());

        let mut names = Vec::new();
        for bc in mapping.bounded_contexts() {
            for aggregate in &mapping.bounded_context(*bc).aggregates {
                for object in &mapping.aggregate(*aggregate).domain_objects {
                    names.push(mapping.domain_object(*object).name.clone());
                }
            }
        }
        let total = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), total);
    }

    #[test]
    fn references_to_one_source_object_share_one_target(scenario in scenario()) {
        let discovered = scenario.assemble();
        let (mapping, _) = convert_context_map(&discovered, &DiscoveryConfig::default()).unwrap();
        let entities = scenario.entity_names();
        let mut targets = HashMap::new();

        for (n, (from, to)) in scenario.references.iter().enumerate() {
            let (from_cluster, from_name) = &entities[*from];
            let (to_cluster, to_name) = &entities[*to];
            let field = format!("f{n}");
            let cluster = format!("C{from_cluster}");

            let source_bc = discovered.find_bounded_context(&cluster).unwrap();
            let source_aggregate = discovered.find_aggregate(source_bc, &cluster).unwrap();
            let source_object = discovered.find_domain_object(source_aggregate, from_name).unwrap();
            let source_target = discovered
                .domain_object(source_object)
                .attribute(&field)
                .and_then(|a| a.ty.domain_object_target())
                .unwrap();

            let bc = mapping.find_bounded_context(&cluster).unwrap();
            let aggregate = mapping.find_aggregate(bc, &cluster).unwrap();
            let object = mapping.find_domain_object(aggregate, from_name).unwrap();
            let reference = mapping.domain_object(object).reference(&field).unwrap();

            let expected = if from_cluster == to_cluster {
                to_name.clone()
            } else {
                format!("{to_name}_Reference")
            };
            prop_assert_eq!(&mapping.domain_object(reference.domain_object).name, &expected);

            let shared = *targets.entry(source_target).or_insert(reference.domain_object);
            prop_assert_eq!(shared, reference.domain_object);
        }
    }

    #[test]
    fn step_order_survives_conversion(scenario in scenario()) {
        let discovered = scenario.assemble();
        let (mapping, report) = convert_context_map(&discovered, &DiscoveryConfig::default()).unwrap();
        prop_assert!(report.is_lossless());

        let c0 = mapping.find_bounded_context("C0").unwrap();
        let app = mapping.bounded_context(c0).application.unwrap();
        let functionality = mapping.functionality(mapping.application(app).functionalities[0]);

        let contexts: Vec<_> = functionality
            .steps
            .iter()
            .map(|s| mapping.bounded_context(s.bounded_context).name.clone())
            .collect();
        let expected: Vec<_> = scenario.step_clusters.iter().map(|c| format!("C{c}")).collect();
        prop_assert_eq!(contexts, expected);

        let operations: Vec<_> = functionality
            .steps
            .iter()
            .map(|s| mapping.operation(s.operation).name.clone())
            .collect();
        let expected: Vec<_> = (0..scenario.step_clusters.len()).map(|i| format!("step{i}")).collect();
        prop_assert_eq!(operations, expected);
    }
}
