use archview::edges::geometry::{best_handles, node_center, Handle, HandlePair};
use archview::model::{
    Capability, CapabilityRealization, Node, OriginRelationship, OriginRelationshipType,
    RealizationOrigin, Relation, RelationType,
};
use archview::{
    derive_all_edges, derive_parent_edges, derive_relation_edges, DiagramInputs, RenderContext,
};
use proptest::prelude::*;

const PAIRS: [HandlePair; 4] = [
    HandlePair::new(Handle::Right, Handle::Left),
    HandlePair::new(Handle::Bottom, Handle::Top),
    HandlePair::new(Handle::Left, Handle::Right),
    HandlePair::new(Handle::Top, Handle::Bottom),
];

fn node_strategy(id: &'static str) -> impl Strategy<Value = Node> {
    (
        -2000.0f64..2000.0,
        -2000.0f64..2000.0,
        prop::option::of((20.0f64..400.0, 20.0f64..300.0)),
    )
        .prop_map(move |(x, y, size)| {
            let node = Node::new(id, x, y);
            match size {
                Some((w, h)) => node.with_size(w, h),
                None => node,
            }
        })
}

fn short_id() -> impl Strategy<Value = String> {
    (0u8..6).prop_map(|n| format!("x{n}"))
}

fn relation_strategy() -> impl Strategy<Value = Relation> {
    (
        "[a-z]{1,8}",
        short_id(),
        short_id(),
        prop_oneof![
            Just(RelationType::Triggers),
            Just(RelationType::Serves),
            Just(RelationType::Other("Flows".to_string())),
        ],
        prop::option::of("[a-z ]{0,10}"),
    )
        .prop_map(|(id, source, target, relation_type, name)| Relation {
            id,
            source_component_id: source,
            target_component_id: target,
            relation_type,
            name,
        })
}

fn capability_strategy() -> impl Strategy<Value = Capability> {
    (short_id(), prop::option::of(short_id())).prop_map(|(id, parent_id)| Capability {
        id,
        parent_id,
        name: None,
    })
}

fn realization_strategy() -> impl Strategy<Value = CapabilityRealization> {
    (
        short_id(),
        short_id(),
        short_id(),
        any::<bool>(),
        prop::option::of(short_id()),
    )
        .prop_map(|(id, capability_id, component_id, inherited, source)| {
            CapabilityRealization {
                id,
                capability_id,
                component_id,
                origin: if inherited {
                    RealizationOrigin::Inherited
                } else {
                    RealizationOrigin::Direct
                },
                source_realization_id: source,
            }
        })
}

fn origin_strategy() -> impl Strategy<Value = OriginRelationship> {
    (
        short_id(),
        short_id(),
        prop_oneof![
            Just(OriginRelationshipType::AcquiredVia),
            Just(OriginRelationshipType::PurchasedFrom),
            Just(OriginRelationshipType::BuiltBy),
            Just(OriginRelationshipType::Unknown),
        ],
        short_id(),
    )
        .prop_map(|(id, component_id, relationship_type, origin_entity_id)| {
            OriginRelationship {
                id,
                component_id,
                relationship_type,
                origin_entity_id,
            }
        })
}

#[derive(Debug, Clone)]
struct Diagram {
    nodes: Vec<Node>,
    relations: Vec<Relation>,
    capabilities: Vec<Capability>,
    realizations: Vec<CapabilityRealization>,
    origins: Vec<OriginRelationship>,
    view_capabilities: Vec<String>,
    view_components: Vec<String>,
    entity_nodes: Vec<String>,
}

impl Diagram {
    fn inputs(&self) -> DiagramInputs<'_> {
        DiagramInputs {
            relations: &self.relations,
            capabilities: &self.capabilities,
            realizations: &self.realizations,
            origin_relationships: &self.origins,
            view_capability_ids: &self.view_capabilities,
            view_component_ids: &self.view_components,
            origin_entity_node_ids: &self.entity_nodes,
        }
    }
}

fn diagram_strategy() -> impl Strategy<Value = Diagram> {
    (
        prop::collection::vec(relation_strategy(), 0..8),
        prop::collection::vec(capability_strategy(), 0..8),
        prop::collection::vec(realization_strategy(), 0..8),
        prop::collection::vec(origin_strategy(), 0..8),
        prop::collection::vec(short_id(), 0..6),
        prop::collection::vec(short_id(), 0..6),
        prop::collection::vec(
            (short_id(), prop_oneof![Just("acq-"), Just("vendor-"), Just("team-")])
                .prop_map(|(id, prefix)| format!("{prefix}{id}")),
            0..6,
        ),
        prop::collection::vec((short_id(), -500.0f64..500.0, -500.0f64..500.0), 0..8),
    )
        .prop_map(
            |(
                relations,
                capabilities,
                realizations,
                origins,
                view_capabilities,
                view_components,
                entity_nodes,
                positions,
            )| Diagram {
                nodes: positions
                    .into_iter()
                    .map(|(id, x, y)| Node::new(id, x, y))
                    .collect(),
                relations,
                capabilities,
                realizations,
                origins,
                view_capabilities,
                view_components,
                entity_nodes,
            },
        )
}

/// Degrees away from the nearest quadrant boundary
fn boundary_distance(source: &Node, target: &Node) -> f64 {
    let (sx, sy) = node_center(source);
    let (tx, ty) = node_center(target);
    let angle = (ty - sy).atan2(tx - sx).to_degrees().rem_euclid(360.0);
    let offset = (angle - 45.0).rem_euclid(90.0);
    offset.min(90.0 - offset)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn handles_are_one_of_four_pairs(a in node_strategy("a"), b in node_strategy("b")) {
        let pair = best_handles(Some(&a), Some(&b));
        prop_assert!(PAIRS.contains(&pair));
    }

    #[test]
    fn swapping_endpoints_reverses_handles(a in node_strategy("a"), b in node_strategy("b")) {
        prop_assume!(boundary_distance(&a, &b) > 1e-3);
        prop_assume!(node_center(&a) != node_center(&b));

        let forward = best_handles(Some(&a), Some(&b));
        let backward = best_handles(Some(&b), Some(&a));
        prop_assert_eq!(backward, forward.reversed());
    }

    #[test]
    fn one_relation_edge_per_relation(relations in prop::collection::vec(relation_strategy(), 0..12)) {
        let edges = derive_relation_edges(&relations, &RenderContext::new(&[]));
        prop_assert_eq!(edges.len(), relations.len());
        for (edge, relation) in edges.iter().zip(&relations) {
            prop_assert_eq!(&edge.id, &relation.id);
        }
    }

    #[test]
    fn parent_edges_match_visible_pairs(
        capabilities in prop::collection::vec(capability_strategy(), 0..10),
        view in prop::collection::vec(short_id(), 0..6),
    ) {
        let edges = derive_parent_edges(&view, &capabilities, &RenderContext::new(&[]));
        let expected: Vec<String> = capabilities
            .iter()
            .filter(|c| view.contains(&c.id))
            .filter_map(|c| {
                let parent = c.parent_id.as_ref()?;
                view.contains(parent).then(|| format!("parent-{}-{}", parent, c.id))
            })
            .collect();
        let got: Vec<String> = edges.into_iter().map(|e| e.id).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn classic_scheme_is_black_everywhere(diagram in diagram_strategy()) {
        let ctx = RenderContext::new(&diagram.nodes).with_classic_scheme(true);
        for edge in derive_all_edges(&diagram.inputs(), &ctx) {
            prop_assert_eq!(edge.style.stroke.as_str(), "#000000");
            prop_assert_eq!(edge.marker_end.color.as_str(), "#000000");
            prop_assert_eq!(edge.label_bg_style.fill.as_str(), "#ffffff");
        }
    }

    #[test]
    fn derivation_is_idempotent(diagram in diagram_strategy(), pick in 0usize..16) {
        let first_pass = derive_all_edges(&diagram.inputs(), &RenderContext::new(&diagram.nodes));
        let selected = first_pass.get(pick).map(|e| e.id.clone());

        let ctx = RenderContext::new(&diagram.nodes).with_selected_edge(selected.as_deref());
        let once = derive_all_edges(&diagram.inputs(), &ctx);
        let twice = derive_all_edges(&diagram.inputs(), &ctx);
        prop_assert_eq!(&once, &twice);

        for edge in &once {
            let is_selected = selected.as_deref() == Some(edge.id.as_str());
            prop_assert_eq!(edge.animated, is_selected);
            if is_selected {
                prop_assert_eq!(edge.style.stroke_width, 3.0);
            }
        }
    }
}
