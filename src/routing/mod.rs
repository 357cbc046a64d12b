//! Route computation.
//!
//! [`FloorRouter`] handles a single floor; [`route_across_floors`] stitches
//! floors via stair/elevator connections; [`find_escape_route`] picks the
//! fastest emergency exit. The [`locator`] resolves door and connection
//! anchors onto the walkable grid.

mod astar;
mod escape;
mod floor_router;
pub mod locator;
mod multi_floor;

pub use astar::SearchWeights;
pub use escape::{find_escape_route, EscapeRoute};
pub use floor_router::{FloorRouter, RouteResult, RouterConfig};
pub use multi_floor::{route_across_floors, MultiFloorRouteResult, RoutePlanSegment};
