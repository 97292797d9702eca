//! Edge derivation for the architecture canvas.
//!
//! Every call recomputes the full edge description list from the current
//! nodes, selection and domain collections. Nothing here mutates its inputs
//! or keeps state between calls.

mod builders;
pub mod geometry;
pub mod origin;
pub mod visibility;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Capability, CapabilityRealization, Node, OriginRelationship, Relation};

pub use builders::{
    derive_origin_relationship_edges, derive_parent_edges, derive_realization_edges,
    derive_relation_edges,
};
pub use geometry::{best_handles, Handle, HandlePair};
pub use origin::node_id_for_origin;

/// Stroke and marker color used by the classic (monochrome) scheme
pub const CLASSIC_STROKE: &str = "#000000";
pub const LABEL_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_EDGE_TYPE: &str = "default";

/// Which relationship an edge was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Relation,
    Parent,
    Realization,
    Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerType {
    #[serde(rename = "arrowclosed")]
    ArrowClosed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEnd {
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub font_size: f32,
    pub font_weight: u16,
    pub fill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBgStyle {
    pub fill: String,
}

/// A drawable edge description handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
    pub label: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub animated: bool,
    pub kind: EdgeKind,
    pub style: EdgeStyle,
    pub marker_end: MarkerEnd,
    pub label_style: LabelStyle,
    pub label_bg_style: LabelBgStyle,
}

/// Canvas state shared by all builders for one derivation pass
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    nodes: HashMap<&'a str, &'a Node>,
    selected_edge_id: Option<&'a str>,
    edge_type: &'a str,
    is_classic_scheme: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            nodes: nodes.iter().map(|node| (node.id.as_str(), node)).collect(),
            selected_edge_id: None,
            edge_type: DEFAULT_EDGE_TYPE,
            is_classic_scheme: false,
        }
    }

    pub fn with_selected_edge(mut self, selected_edge_id: Option<&'a str>) -> Self {
        self.selected_edge_id = selected_edge_id;
        self
    }

    pub fn with_edge_type(mut self, edge_type: &'a str) -> Self {
        self.edge_type = edge_type;
        self
    }

    pub fn with_classic_scheme(mut self, is_classic_scheme: bool) -> Self {
        self.is_classic_scheme = is_classic_scheme;
        self
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    pub fn selected_edge_id(&self) -> Option<&'a str> {
        self.selected_edge_id
    }

    pub fn edge_type(&self) -> &'a str {
        self.edge_type
    }

    pub fn is_classic_scheme(&self) -> bool {
        self.is_classic_scheme
    }

    pub fn is_selected(&self, edge_id: &str) -> bool {
        self.selected_edge_id == Some(edge_id)
    }
}

/// Everything the aggregator needs for one diagram
#[derive(Debug, Clone, Copy)]
pub struct DiagramInputs<'a> {
    pub relations: &'a [Relation],
    pub capabilities: &'a [Capability],
    pub realizations: &'a [CapabilityRealization],
    pub origin_relationships: &'a [OriginRelationship],
    pub view_capability_ids: &'a [String],
    pub view_component_ids: &'a [String],
    pub origin_entity_node_ids: &'a [String],
}

/// Merge the output of all four builders into the diagram's edge set.
///
/// Order is relations, parents, realizations, origins. When two edges share
/// an id only the first one is kept.
pub fn derive_all_edges(inputs: &DiagramInputs<'_>, ctx: &RenderContext<'_>) -> Vec<Edge> {
    let mut edges = derive_relation_edges(inputs.relations, ctx);
    edges.extend(derive_parent_edges(
        inputs.view_capability_ids,
        inputs.capabilities,
        ctx,
    ));
    edges.extend(derive_realization_edges(
        inputs.realizations,
        inputs.view_capability_ids,
        inputs.view_component_ids,
        ctx,
    ));
    edges.extend(derive_origin_relationship_edges(
        inputs.origin_relationships,
        inputs.origin_entity_node_ids,
        inputs.view_component_ids,
        ctx,
    ));

    let mut seen = HashSet::new();
    edges.retain(|edge| {
        let fresh = seen.insert(edge.id.clone());
        if !fresh {
            debug!(edge = %edge.id, "dropping edge with duplicate id");
        }
        fresh
    });
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OriginRelationshipType, RealizationOrigin, RelationType};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn aggregates_all_kinds_in_order() {
        let nodes = vec![
            Node::new("billing", 0.0, 0.0),
            Node::new("ledger", 300.0, 0.0),
            Node::new("cap-root", 0.0, 300.0),
            Node::new("cap-leaf", 300.0, 300.0),
            Node::new("team-core", 600.0, 0.0),
        ];
        let relations = vec![Relation {
            id: "rel-1".to_string(),
            source_component_id: "billing".to_string(),
            target_component_id: "ledger".to_string(),
            relation_type: RelationType::Serves,
            name: None,
        }];
        let capabilities = vec![
            Capability {
                id: "root".to_string(),
                parent_id: None,
                name: None,
            },
            Capability {
                id: "leaf".to_string(),
                parent_id: Some("root".to_string()),
                name: None,
            },
        ];
        let realizations = vec![CapabilityRealization {
            id: "r1".to_string(),
            capability_id: "leaf".to_string(),
            component_id: "ledger".to_string(),
            origin: RealizationOrigin::Direct,
            source_realization_id: None,
        }];
        let origins = vec![OriginRelationship {
            id: "o1".to_string(),
            component_id: "ledger".to_string(),
            relationship_type: OriginRelationshipType::BuiltBy,
            origin_entity_id: "core".to_string(),
        }];
        let view_capabilities = ids(&["root", "leaf"]);
        let view_components = ids(&["billing", "ledger"]);
        let entity_nodes = ids(&["team-core"]);

        let inputs = DiagramInputs {
            relations: &relations,
            capabilities: &capabilities,
            realizations: &realizations,
            origin_relationships: &origins,
            view_capability_ids: &view_capabilities,
            view_component_ids: &view_components,
            origin_entity_node_ids: &entity_nodes,
        };
        let ctx = RenderContext::new(&nodes);
        let edges = derive_all_edges(&inputs, &ctx);

        let got: Vec<(&str, EdgeKind)> = edges.iter().map(|e| (e.id.as_str(), e.kind)).collect();
        assert_eq!(
            got,
            vec![
                ("rel-1", EdgeKind::Relation),
                ("parent-root-leaf", EdgeKind::Parent),
                ("realization-r1", EdgeKind::Realization),
                ("origin-BuiltBy-ledger", EdgeKind::Origin),
            ]
        );
    }

    #[test]
    fn aggregator_drops_duplicate_ids() {
        let nodes = vec![
            Node::new("svc", 0.0, 0.0),
            Node::new("acq-a", 0.0, 300.0),
            Node::new("acq-b", 300.0, 300.0),
        ];
        let origins = vec![
            OriginRelationship {
                id: "o1".to_string(),
                component_id: "svc".to_string(),
                relationship_type: OriginRelationshipType::AcquiredVia,
                origin_entity_id: "a".to_string(),
            },
            OriginRelationship {
                id: "o2".to_string(),
                component_id: "svc".to_string(),
                relationship_type: OriginRelationshipType::AcquiredVia,
                origin_entity_id: "b".to_string(),
            },
        ];
        let components = ids(&["svc"]);
        let entity_nodes = ids(&["acq-a", "acq-b"]);
        let inputs = DiagramInputs {
            relations: &[],
            capabilities: &[],
            realizations: &[],
            origin_relationships: &origins,
            view_capability_ids: &[],
            view_component_ids: &components,
            origin_entity_node_ids: &entity_nodes,
        };

        let edges = derive_all_edges(&inputs, &RenderContext::new(&nodes));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, "acq-a");
    }

    #[test]
    fn edge_serializes_with_canvas_field_names() {
        let nodes = vec![Node::new("a", 0.0, 0.0), Node::new("b", 400.0, 0.0)];
        let relations = vec![Relation {
            id: "r".to_string(),
            source_component_id: "a".to_string(),
            target_component_id: "b".to_string(),
            relation_type: RelationType::Triggers,
            name: Some("publishes".to_string()),
        }];
        let edges = derive_relation_edges(&relations, &RenderContext::new(&nodes));
        let value = serde_json::to_value(&edges[0]).expect("serialize");

        assert_eq!(value["sourceHandle"], "right");
        assert_eq!(value["targetHandle"], "left");
        assert_eq!(value["type"], "default");
        assert_eq!(value["markerEnd"]["type"], "arrowclosed");
        assert_eq!(value["style"]["strokeWidth"], 2.0);
        assert!(value["style"].get("strokeDasharray").is_none());
        assert_eq!(value["labelBgStyle"]["fill"], "#ffffff");
        assert_eq!(value["kind"], "relation");
    }
}
