use crate::model::OriginRelationshipType;

/// Canvas node id of the entity an origin relationship points at.
/// Unknown relationship types pass the raw id through.
pub fn node_id_for_origin(relationship_type: OriginRelationshipType, origin_entity_id: &str) -> String {
    match relationship_type.node_id_prefix() {
        Some(prefix) => format!("{prefix}{origin_entity_id}"),
        None => origin_entity_id.to_string(),
    }
}

/// Label and base stroke color for each known origin category
pub(crate) fn origin_label_and_color(
    relationship_type: OriginRelationshipType,
) -> Option<(&'static str, &'static str)> {
    match relationship_type {
        OriginRelationshipType::AcquiredVia => Some(("Acquired via", "#8b5cf6")),
        OriginRelationshipType::PurchasedFrom => Some(("Purchased from", "#ec4899")),
        OriginRelationshipType::BuiltBy => Some(("Built by", "#14b8a6")),
        OriginRelationshipType::Unknown => None,
    }
}

/// Whether a canvas node id names an origin entity box
pub fn is_origin_entity_node(node_id: &str) -> bool {
    OriginRelationshipType::KNOWN
        .iter()
        .filter_map(|kind| kind.node_id_prefix())
        .any(|prefix| node_id.starts_with(prefix))
}
