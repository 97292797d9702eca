//! Edge derivation for architecture diagrams.
//!
//! Given the nodes currently on the canvas and the domain collections
//! (component relations, the capability tree, capability realizations and
//! component origins), [`edges`] decides which edges to draw, which sides of
//! the boxes they attach to and how they look.

pub mod config;
pub mod edges;
pub mod error;
pub mod export;
pub mod fonts;
pub mod logging;
pub mod model;
pub mod preview;
pub mod scene;

pub use edges::{
    derive_all_edges, derive_origin_relationship_edges, derive_parent_edges,
    derive_realization_edges, derive_relation_edges, DiagramInputs, Edge, EdgeKind,
    RenderContext,
};
pub use error::{Error, Result};
pub use scene::Scene;
