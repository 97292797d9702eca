use serde::{Deserialize, Serialize};

use crate::model::Node;

/// Box size assumed for nodes the canvas has not measured yet
pub const DEFAULT_NODE_WIDTH: f64 = 150.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

/// Named connection point on a node's boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Right,
    Bottom,
    Left,
}

impl Handle {
    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Top => "top",
            Handle::Right => "right",
            Handle::Bottom => "bottom",
            Handle::Left => "left",
        }
    }

    /// Unit vector pointing out of the node through this handle (y grows downward)
    pub fn normal(self) -> (f64, f64) {
        match self {
            Handle::Top => (0.0, -1.0),
            Handle::Right => (1.0, 0.0),
            Handle::Bottom => (0.0, 1.0),
            Handle::Left => (-1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlePair {
    pub source: Handle,
    pub target: Handle,
}

impl HandlePair {
    pub const fn new(source: Handle, target: Handle) -> Self {
        Self { source, target }
    }

    pub fn reversed(self) -> Self {
        Self::new(self.target, self.source)
    }
}

/// Pair used when an endpoint is not on the canvas
pub const DEFAULT_HANDLES: HandlePair = HandlePair::new(Handle::Top, Handle::Top);

const EAST: HandlePair = HandlePair::new(Handle::Right, Handle::Left);
const SOUTH: HandlePair = HandlePair::new(Handle::Bottom, Handle::Top);
const WEST: HandlePair = HandlePair::new(Handle::Left, Handle::Right);
const NORTH: HandlePair = HandlePair::new(Handle::Top, Handle::Bottom);

/// Center of a node, using the default box size when unmeasured
pub fn node_center(node: &Node) -> (f64, f64) {
    let (width, height) = node_size(node);
    (node.position.x + width / 2.0, node.position.y + height / 2.0)
}

pub fn node_size(node: &Node) -> (f64, f64) {
    node.size
        .map(|s| (s.width, s.height))
        .unwrap_or((DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT))
}

/// Pick the connector sides facing each other along the line between centers.
///
/// The angle from source to target is bucketed into four 90° quadrants
/// centered on the axes; lower bounds are inclusive, so exactly 45° points
/// south and exactly 315° points east.
pub fn best_handles(source: Option<&Node>, target: Option<&Node>) -> HandlePair {
    let (Some(source), Some(target)) = (source, target) else {
        return DEFAULT_HANDLES;
    };

    let (sx, sy) = node_center(source);
    let (tx, ty) = node_center(target);
    let angle = (ty - sy).atan2(tx - sx).to_degrees().rem_euclid(360.0);

    handles_for_angle(angle)
}

/// Map a normalized angle in [0, 360) onto its handle pair
pub fn handles_for_angle(angle: f64) -> HandlePair {
    if !(45.0..315.0).contains(&angle) {
        EAST
    } else if angle < 135.0 {
        SOUTH
    } else if angle < 225.0 {
        WEST
    } else {
        NORTH
    }
}
