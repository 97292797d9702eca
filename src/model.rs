use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================
// Canvas Types
// ============================================

/// Top-left corner of a node on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured size of a node, when the canvas knows it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A box on the canvas. Components, capabilities and origin entities all
/// share this shape; the id prefix tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Position::new(x, y),
            size: None,
            label: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ============================================
// Component Relations
// ============================================

/// Kind of a component-to-component relation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    Triggers,
    Serves,
    #[serde(untagged)]
    Other(String),
}

impl RelationType {
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::Triggers => "Triggers",
            RelationType::Serves => "Serves",
            RelationType::Other(name) => name,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: String,
    pub source_component_id: String,
    pub target_component_id: String,
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ============================================
// Capabilities
// ============================================

/// Node id prefix used for capability boxes on the canvas
pub const CAPABILITY_NODE_PREFIX: &str = "cap-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Canvas node id of a capability
pub fn capability_node_id(capability_id: &str) -> String {
    format!("{CAPABILITY_NODE_PREFIX}{capability_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealizationOrigin {
    Direct,
    Inherited,
}

/// A component fulfilling a capability. Inherited realizations point back at
/// the direct realization on a more specific capability that seeded them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRealization {
    pub id: String,
    pub capability_id: String,
    pub component_id: String,
    pub origin: RealizationOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_realization_id: Option<String>,
}

// ============================================
// Component Origins
// ============================================

/// How a component came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginRelationshipType {
    AcquiredVia,
    PurchasedFrom,
    BuiltBy,
    #[serde(other)]
    Unknown,
}

impl OriginRelationshipType {
    pub const KNOWN: [Self; 3] = [Self::AcquiredVia, Self::PurchasedFrom, Self::BuiltBy];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcquiredVia => "AcquiredVia",
            Self::PurchasedFrom => "PurchasedFrom",
            Self::BuiltBy => "BuiltBy",
            Self::Unknown => "Unknown",
        }
    }

    /// Prefix of the canvas node id for the origin entity, if the type is known
    pub fn node_id_prefix(self) -> Option<&'static str> {
        match self {
            Self::AcquiredVia => Some("acq-"),
            Self::PurchasedFrom => Some("vendor-"),
            Self::BuiltBy => Some("team-"),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for OriginRelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginRelationship {
    pub id: String,
    pub component_id: String,
    pub relationship_type: OriginRelationshipType,
    pub origin_entity_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_type_keeps_unknown_names() {
        let parsed: RelationType = serde_json::from_str("\"Flows\"").expect("parse");
        assert_eq!(parsed, RelationType::Other("Flows".to_string()));
        assert_eq!(parsed.as_str(), "Flows");

        let triggers: RelationType = serde_json::from_str("\"Triggers\"").expect("parse");
        assert_eq!(triggers, RelationType::Triggers);
        assert_eq!(serde_json::to_string(&triggers).expect("write"), "\"Triggers\"");
    }

    #[test]
    fn origin_type_falls_back_to_unknown() {
        let parsed: OriginRelationshipType =
            serde_json::from_str("\"LicensedFrom\"").expect("parse");
        assert_eq!(parsed, OriginRelationshipType::Unknown);
        assert_eq!(parsed.node_id_prefix(), None);
    }

    #[test]
    fn realization_reads_camel_case_fields() {
        let json = r#"{
            "id": "r2",
            "capabilityId": "c1",
            "componentId": "svc",
            "origin": "Inherited",
            "sourceRealizationId": "r1"
        }"#;
        let realization: CapabilityRealization = serde_json::from_str(json).expect("parse");
        assert_eq!(realization.origin, RealizationOrigin::Inherited);
        assert_eq!(realization.source_realization_id.as_deref(), Some("r1"));
    }
}
