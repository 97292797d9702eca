use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::origin::node_id_for_origin;
use crate::model::{Capability, CapabilityRealization, OriginRelationship, RealizationOrigin};

/// Set of ids currently placed on the canvas, borrowed from the caller
pub type IdSet<'a> = HashSet<&'a str>;

pub fn id_set<'a, I, S>(ids: I) -> IdSet<'a>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    ids.into_iter().map(|id| id.as_ref()).collect()
}

/// A parent edge needs both the capability and its parent in the view.
pub fn parent_edge_visible(capability: &Capability, view_capabilities: &IdSet<'_>) -> bool {
    match capability.parent_id.as_deref() {
        Some(parent_id) => {
            view_capabilities.contains(capability.id.as_str())
                && view_capabilities.contains(parent_id)
        }
        None => false,
    }
}

/// Realizations keyed by id, built once per derivation
pub struct RealizationIndex<'a> {
    by_id: HashMap<&'a str, &'a CapabilityRealization>,
}

impl<'a> RealizationIndex<'a> {
    pub fn new(realizations: &'a [CapabilityRealization]) -> Self {
        Self {
            by_id: realizations.iter().map(|r| (r.id.as_str(), r)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a CapabilityRealization> {
        self.by_id.get(id).copied()
    }
}

/// Decide whether a realization edge belongs on the canvas.
///
/// An inherited realization stands in for a direct one on a more specific
/// capability. It is drawn only while that source capability is hidden, and
/// not at all when the source cannot be resolved.
pub fn realization_visible(
    realization: &CapabilityRealization,
    index: &RealizationIndex<'_>,
    view_capabilities: &IdSet<'_>,
    view_components: &IdSet<'_>,
) -> bool {
    if !view_components.contains(realization.component_id.as_str())
        || !view_capabilities.contains(realization.capability_id.as_str())
    {
        return false;
    }

    match realization.origin {
        RealizationOrigin::Direct => true,
        RealizationOrigin::Inherited => {
            let source = realization
                .source_realization_id
                .as_deref()
                .and_then(|id| index.get(id));

            match source {
                Some(source) => !view_capabilities.contains(source.capability_id.as_str()),
                None => {
                    trace!(
                        realization = %realization.id,
                        "inherited realization has no resolvable source, hiding it"
                    );
                    false
                }
            }
        }
    }
}

pub fn origin_edge_visible(
    relationship: &OriginRelationship,
    origin_entity_nodes: &IdSet<'_>,
    components_on_canvas: &IdSet<'_>,
) -> bool {
    let entity_node = node_id_for_origin(
        relationship.relationship_type,
        &relationship.origin_entity_id,
    );
    origin_entity_nodes.contains(entity_node.as_str())
        && components_on_canvas.contains(relationship.component_id.as_str())
}
