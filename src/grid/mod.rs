//! Walkable grid construction and connectivity analysis.
//!
//! [`WalkableGrid`] rasterizes a floor's corridor polygons into walkable
//! cells with wall clearance; [`ComponentMap`] flood-fills those cells into
//! corridor components and derives a guide centerline per component. Both
//! are rebuilt from the floor snapshot on every routing call.

mod builder;
mod components;

pub use builder::WalkableGrid;
pub use components::{ComponentMap, CorridorComponent, Orientation};
