//! Scene documents: one diagram snapshot as read by the command-line tools.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RenderSettings;
use crate::edges::origin::is_origin_entity_node;
use crate::edges::{derive_all_edges, DiagramInputs, Edge, RenderContext};
use crate::error::Result;
use crate::model::{
    Capability, CapabilityRealization, Node, OriginRelationship, Relation,
    CAPABILITY_NODE_PREFIX,
};

/// Ids of what is currently placed on the canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasView {
    #[serde(default)]
    pub capability_ids: Vec<String>,
    #[serde(default)]
    pub component_ids: Vec<String>,
    #[serde(default)]
    pub origin_entity_node_ids: Vec<String>,
}

impl CanvasView {
    /// Classify canvas nodes by id: `cap-` prefixed nodes are capabilities,
    /// `acq-`/`vendor-`/`team-` nodes are origin entities, the rest components.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut view = Self::default();
        for node in nodes {
            if let Some(capability_id) = node.id.strip_prefix(CAPABILITY_NODE_PREFIX) {
                view.capability_ids.push(capability_id.to_string());
            } else if is_origin_entity_node(&node.id) {
                view.origin_entity_node_ids.push(node.id.clone());
            } else {
                view.component_ids.push(node.id.clone());
            }
        }
        view
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub realizations: Vec<CapabilityRealization>,
    #[serde(default)]
    pub origin_relationships: Vec<OriginRelationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_edge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<CanvasView>,
}

impl Scene {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse by file extension; unknown extensions try JSON, then YAML.
    pub fn from_str_with_hint(content: &str, extension: Option<&str>) -> Result<Self> {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::from_json_str(content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(content),
            _ => Self::from_json_str(content).or_else(|json_err| {
                debug!(error = %json_err, "scene is not JSON, trying YAML");
                Self::from_yaml_str(content)
            }),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str_with_hint(&content, path.extension().and_then(|e| e.to_str()))
    }

    /// Like [`Scene::load`], but `-` reads the scene from stdin
    pub fn load_or_stdin(path: &Path) -> Result<Self> {
        if path.to_str() == Some("-") {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            return Self::from_str_with_hint(&buffer, None);
        }
        Self::load(path)
    }

    /// The explicit view, or one inferred from the node ids
    pub fn canvas_view(&self) -> CanvasView {
        self.view
            .clone()
            .unwrap_or_else(|| CanvasView::from_nodes(&self.nodes))
    }

    /// Derive every edge of the scene. A selection given in `settings` wins
    /// over the one stored in the scene.
    pub fn derive_edges(&self, settings: &RenderSettings) -> Vec<Edge> {
        let view = self.canvas_view();
        let selected = settings
            .selected_edge_id
            .as_deref()
            .or(self.selected_edge_id.as_deref());

        let ctx = RenderContext::new(&self.nodes)
            .with_selected_edge(selected)
            .with_edge_type(&settings.edge_type)
            .with_classic_scheme(settings.classic_scheme);

        let inputs = DiagramInputs {
            relations: &self.relations,
            capabilities: &self.capabilities,
            realizations: &self.realizations,
            origin_relationships: &self.origin_relationships,
            view_capability_ids: &view.capability_ids,
            view_component_ids: &view.component_ids,
            origin_entity_node_ids: &view.origin_entity_node_ids,
        };

        let edges = derive_all_edges(&inputs, &ctx);
        debug!(nodes = self.nodes.len(), edges = edges.len(), "derived scene edges");
        edges
    }
}
