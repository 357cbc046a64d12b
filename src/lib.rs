//! # MargaNav
//!
//! Indoor navigation kernel for multi-floor facility floor plans.
//!
//! ## Overview
//!
//! A building is a set of floors; each floor is a set of polygonal
//! corridors connected by doors and stair/elevator transitions. MargaNav
//! computes the shortest walkable route between two free-form points,
//! confined to corridor space and passing through explicit doors, and can
//! find the fastest multi-floor escape route to the nearest
//! emergency+external exit using stairs only.
//!
//! - **Walkable grid**: corridor polygons are rasterized into cells with
//!   per-cell wall clearance
//! - **Corridor components**: 4-connected cell regions with a preferred
//!   centerline ("guide") paths hug
//! - **Single-floor routing**: door-pair selection, a center-biased
//!   centerline walk, and a direction-aware weighted A* fallback
//! - **Multi-floor stitching**: connection chains with a fixed per-hop
//!   transition time
//! - **Escape routes**: emergency exit enumeration under a wall-clock
//!   budget
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga_nav::{FloorRouter, Point, RouterConfig};
//!
//! let config = RouterConfig::default();
//! let router = FloorRouter::new(&floor, &config);
//! let route = router.route(Point::new(120.0, 40.0), Point::new(900.0, 310.0))?;
//!
//! println!("route is {:.0} px over {} corridor points",
//!          route.distance_px, route.corridor.len());
//! ```
//!
//! ## Coordinate System
//!
//! Each floor has its own pixel coordinate space shared by corridor
//! polygons, door anchors, and query points. The only external
//! configuration value is the optional per-floor `meters_per_pixel` scale,
//! which enables meter distances and walking-time ETAs.
//!
//! ## Concurrency
//!
//! Synchronous, single-threaded, stateless across calls: every invocation
//! rebuilds the grid, components, and guides from the snapshot it is
//! given. Concurrent calls on different snapshots are safe because no
//! shared mutable state exists.

#![warn(missing_docs)]

pub mod core;
pub mod error;
pub mod grid;
pub mod model;
pub mod routing;

pub use self::core::{GridCoord, Point};
pub use error::{NavError, Result};
pub use grid::{ComponentMap, CorridorComponent, Orientation, WalkableGrid};
pub use model::{
    Anchor, Connection, ConnectionTarget, Corridor, Door, FloorPlan, FloorScale, TransitionType,
};
pub use routing::{
    find_escape_route, route_across_floors, EscapeRoute, FloorRouter, MultiFloorRouteResult,
    RoutePlanSegment, RouteResult, RouterConfig, SearchWeights,
};
