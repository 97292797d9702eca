use tracing::debug;

use super::geometry::best_handles;
use super::origin::{node_id_for_origin, origin_label_and_color};
use super::visibility::{
    id_set, origin_edge_visible, parent_edge_visible, realization_visible, RealizationIndex,
};
use super::{
    Edge, EdgeKind, EdgeStyle, LabelBgStyle, LabelStyle, MarkerEnd, MarkerType, RenderContext,
    CLASSIC_STROKE, LABEL_BACKGROUND,
};
use crate::model::{
    capability_node_id, Capability, CapabilityRealization, OriginRelationship, RealizationOrigin,
    Relation, RelationType,
};

const STROKE_WIDTH: f32 = 2.0;
const SELECTED_STROKE_WIDTH: f32 = 3.0;
const PARENT_STROKE_WIDTH: f32 = 3.0;
const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_WEIGHT: u16 = 500;
const PARENT_LABEL_WEIGHT: u16 = 600;
const SELECTED_LABEL_WEIGHT: u16 = 700;

const TRIGGERS_COLOR: &str = "#f97316";
const RELATION_COLOR: &str = "#3b82f6";
const PARENT_COLOR: &str = "#374151";
const REALIZATION_COLOR: &str = "#10B981";
const REALIZATION_DASHARRAY: &str = "5,5";
const INHERITED_OPACITY: f32 = 0.6;
const INHERITED_LABEL_OPACITY: f32 = 0.8;

/// Per-kind inputs to the shared edge construction
struct EdgeSpec<'s> {
    id: String,
    source: String,
    target: String,
    label: &'s str,
    kind: EdgeKind,
    color: &'s str,
    stroke_width: f32,
    label_weight: u16,
    dasharray: Option<&'s str>,
    opacity: Option<f32>,
    label_opacity: Option<f32>,
}

impl<'s> EdgeSpec<'s> {
    fn new(
        kind: EdgeKind,
        id: String,
        source: String,
        target: String,
        label: &'s str,
        color: &'s str,
    ) -> Self {
        Self {
            id,
            source,
            target,
            label,
            kind,
            color,
            stroke_width: STROKE_WIDTH,
            label_weight: LABEL_WEIGHT,
            dasharray: None,
            opacity: None,
            label_opacity: None,
        }
    }

    /// Apply selection, color scheme and connector geometry
    fn build(self, ctx: &RenderContext<'_>) -> Edge {
        let selected = ctx.is_selected(&self.id);
        let color = if ctx.is_classic_scheme() {
            CLASSIC_STROKE
        } else {
            self.color
        };
        let handles = best_handles(ctx.node(&self.source), ctx.node(&self.target));

        Edge {
            source_handle: handles.source,
            target_handle: handles.target,
            label: self.label.to_string(),
            edge_type: ctx.edge_type().to_string(),
            animated: selected,
            kind: self.kind,
            style: EdgeStyle {
                stroke: color.to_string(),
                stroke_width: if selected {
                    SELECTED_STROKE_WIDTH
                } else {
                    self.stroke_width
                },
                stroke_dasharray: self.dasharray.map(str::to_string),
                opacity: self.opacity,
            },
            marker_end: MarkerEnd {
                marker_type: MarkerType::ArrowClosed,
                color: color.to_string(),
            },
            label_style: LabelStyle {
                font_size: LABEL_FONT_SIZE,
                font_weight: if selected {
                    SELECTED_LABEL_WEIGHT
                } else {
                    self.label_weight
                },
                fill: color.to_string(),
                opacity: self.label_opacity,
            },
            label_bg_style: LabelBgStyle {
                fill: LABEL_BACKGROUND.to_string(),
            },
            id: self.id,
            source: self.source,
            target: self.target,
        }
    }
}

// ============================================
// Component Relations
// ============================================

fn relation_color(relation_type: &RelationType) -> &'static str {
    match relation_type {
        RelationType::Triggers => TRIGGERS_COLOR,
        RelationType::Serves | RelationType::Other(_) => RELATION_COLOR,
    }
}

/// One edge per relation. The caller only passes relations whose endpoints
/// are on the canvas.
pub fn derive_relation_edges(relations: &[Relation], ctx: &RenderContext<'_>) -> Vec<Edge> {
    relations
        .iter()
        .map(|relation| {
            let label = relation
                .name
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| relation.relation_type.as_str());

            EdgeSpec::new(
                EdgeKind::Relation,
                relation.id.clone(),
                relation.source_component_id.clone(),
                relation.target_component_id.clone(),
                label,
                relation_color(&relation.relation_type),
            )
            .build(ctx)
        })
        .collect()
}

// ============================================
// Capability Hierarchy
// ============================================

pub fn derive_parent_edges<S: AsRef<str>>(
    view_capability_ids: &[S],
    capabilities: &[Capability],
    ctx: &RenderContext<'_>,
) -> Vec<Edge> {
    let in_view = id_set(view_capability_ids);

    capabilities
        .iter()
        .filter(|capability| parent_edge_visible(capability, &in_view))
        .filter_map(|capability| {
            let parent_id = capability.parent_id.as_deref()?;
            let mut spec = EdgeSpec::new(
                EdgeKind::Parent,
                format!("parent-{}-{}", parent_id, capability.id),
                capability_node_id(parent_id),
                capability_node_id(&capability.id),
                "Parent",
                PARENT_COLOR,
            );
            spec.stroke_width = PARENT_STROKE_WIDTH;
            spec.label_weight = PARENT_LABEL_WEIGHT;
            Some(spec.build(ctx))
        })
        .collect()
}

// ============================================
// Capability Realizations
// ============================================

pub fn derive_realization_edges<C: AsRef<str>, P: AsRef<str>>(
    realizations: &[CapabilityRealization],
    view_capability_ids: &[C],
    view_component_ids: &[P],
    ctx: &RenderContext<'_>,
) -> Vec<Edge> {
    let index = RealizationIndex::new(realizations);
    let capabilities = id_set(view_capability_ids);
    let components = id_set(view_component_ids);

    realizations
        .iter()
        .filter(|r| realization_visible(r, &index, &capabilities, &components))
        .map(|realization| {
            let inherited = realization.origin == RealizationOrigin::Inherited;
            let mut spec = EdgeSpec::new(
                EdgeKind::Realization,
                format!("realization-{}", realization.id),
                realization.component_id.clone(),
                capability_node_id(&realization.capability_id),
                if inherited {
                    "Realizes (inherited)"
                } else {
                    "Realizes"
                },
                REALIZATION_COLOR,
            );
            spec.dasharray = Some(REALIZATION_DASHARRAY);
            if inherited {
                spec.opacity = Some(INHERITED_OPACITY);
                spec.label_opacity = Some(INHERITED_LABEL_OPACITY);
            }
            spec.build(ctx)
        })
        .collect()
}

// ============================================
// Component Origins
// ============================================

pub fn derive_origin_relationship_edges<E: AsRef<str>, P: AsRef<str>>(
    origin_relationships: &[OriginRelationship],
    origin_entity_node_ids: &[E],
    component_ids_on_canvas: &[P],
    ctx: &RenderContext<'_>,
) -> Vec<Edge> {
    let entity_nodes = id_set(origin_entity_node_ids);
    let components = id_set(component_ids_on_canvas);

    origin_relationships
        .iter()
        .filter(|rel| origin_edge_visible(rel, &entity_nodes, &components))
        .filter_map(|rel| {
            let Some((label, color)) = origin_label_and_color(rel.relationship_type) else {
                debug!(relationship = %rel.id, "skipping origin relationship of unknown type");
                return None;
            };

            let spec = EdgeSpec::new(
                EdgeKind::Origin,
                format!("origin-{}-{}", rel.relationship_type, rel.component_id),
                rel.component_id.clone(),
                node_id_for_origin(rel.relationship_type, &rel.origin_entity_id),
                label,
                color,
            );
            Some(spec.build(ctx))
        })
        .collect()
}
