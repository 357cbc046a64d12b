//! Single-floor routing.
//!
//! Given start and end points on one floor, selects a usable door pair,
//! computes a centered path through the walkable grid between the doors,
//! and assembles the approach/corridor/exit segments of the final route.
//!
//! The kernel is stateless across calls: the grid, components, and guides
//! are rebuilt from the floor snapshot on every invocation, and the
//! door-to-cell memo below lives only for the duration of one call.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::geometry::{polyline_length, simplify_collinear};
use crate::core::{GridCoord, Point};
use crate::error::{NavError, Result};
use crate::grid::{ComponentMap, WalkableGrid};
use crate::model::{Corridor, Door, FloorPlan};

use super::astar::{center_biased_walk, weighted_astar, SearchWeights};
use super::locator::{nearest_walkable_cell_in, preferred_door_axis, resolve_anchor, DoorAxis};

/// Average walking speed used for ETA estimates, in meters per second.
const WALKING_SPEED_MPS: f32 = 1.4;

/// Tunables for single-floor, multi-floor, and escape routing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Ring-search radius (cells) when mapping a door anchor to a cell
    #[serde(default = "defaults::door_search_radius")]
    pub door_search_radius: i32,

    /// Ring-search radius (cells) when mapping a connection anchor to a
    /// cell; connections sit deeper in stairwell geometry than doors
    #[serde(default = "defaults::connection_search_radius")]
    pub connection_search_radius: i32,

    /// How many nearest doors per endpoint the pair fallback considers
    #[serde(default = "defaults::max_pair_candidates")]
    pub max_pair_candidates: usize,

    /// Start/end distance (in cells) under which an identical door pair
    /// skips path construction entirely
    #[serde(default = "defaults::short_hop_cells")]
    pub short_hop_cells: f32,

    /// Fixed time added per stair/elevator hop, in seconds
    #[serde(default = "defaults::transition_seconds")]
    pub transition_seconds: f32,

    /// Wall-clock budget for escape-route candidate evaluation, in
    /// seconds; checked between candidates, not inside a search
    #[serde(default = "defaults::escape_budget_seconds")]
    pub escape_budget_seconds: f32,

    /// How many cross-floor escape candidates are ranked and evaluated
    #[serde(default = "defaults::max_escape_candidates")]
    pub max_escape_candidates: usize,

    /// Weight of one floor of ordering distance when ranking cross-floor
    /// escape candidates, in pixels
    #[serde(default = "defaults::floor_rank_weight")]
    pub floor_rank_weight: f32,

    /// How many connection chains the multi-floor stitcher tries before
    /// giving up
    #[serde(default = "defaults::max_chain_candidates")]
    pub max_chain_candidates: usize,

    /// Cost-model weights for the fallback A* search
    #[serde(default)]
    pub weights: SearchWeights,
}

mod defaults {
    pub fn door_search_radius() -> i32 {
        18
    }
    pub fn connection_search_radius() -> i32 {
        80
    }
    pub fn max_pair_candidates() -> usize {
        24
    }
    pub fn short_hop_cells() -> f32 {
        1.5
    }
    pub fn transition_seconds() -> f32 {
        15.0
    }
    pub fn escape_budget_seconds() -> f32 {
        15.0
    }
    pub fn max_escape_candidates() -> usize {
        24
    }
    pub fn floor_rank_weight() -> f32 {
        5000.0
    }
    pub fn max_chain_candidates() -> usize {
        16
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            door_search_radius: defaults::door_search_radius(),
            connection_search_radius: defaults::connection_search_radius(),
            max_pair_candidates: defaults::max_pair_candidates(),
            short_hop_cells: defaults::short_hop_cells(),
            transition_seconds: defaults::transition_seconds(),
            escape_budget_seconds: defaults::escape_budget_seconds(),
            max_escape_candidates: defaults::max_escape_candidates(),
            floor_rank_weight: defaults::floor_rank_weight(),
            max_chain_candidates: defaults::max_chain_candidates(),
            weights: SearchWeights::default(),
        }
    }
}

/// A complete single-floor route.
///
/// `approach` and `exit` are straight connector segments rendered dashed;
/// only the `corridor` polyline is obstacle-aware.
#[derive(Clone, Debug, Serialize)]
pub struct RouteResult {
    /// Id of the door the route enters the corridor through
    pub start_door: String,
    /// Id of the door the route leaves the corridor through
    pub end_door: String,
    /// Straight segment from the start point to the start door
    pub approach: Vec<Point>,
    /// Obstacle-aware polyline from the start door to the end door
    pub corridor: Vec<Point>,
    /// Straight segment from the end door to the end point
    pub exit: Vec<Point>,
    /// Total route length in pixels
    pub distance_px: f32,
    /// Total route length in meters, when the floor has a scale
    pub distance_meters: Option<f32>,
    /// Walking-time estimate in seconds, when the floor has a scale
    pub eta_seconds: Option<f32>,
}

/// A door candidate flattened out of the floor's corridors.
struct DoorRef<'a> {
    corridor: &'a Corridor,
    door: &'a Door,
    anchor: Point,
}

/// Single-floor router over one immutable floor snapshot.
pub struct FloorRouter<'a> {
    floor: &'a FloorPlan,
    config: &'a RouterConfig,
}

impl<'a> FloorRouter<'a> {
    /// Create a router for one floor.
    pub fn new(floor: &'a FloorPlan, config: &'a RouterConfig) -> Self {
        Self { floor, config }
    }

    /// Compute the shortest walkable route between two points on this
    /// floor, confined to corridor space and passing through doors.
    pub fn route(&self, start: Point, end: Point) -> Result<RouteResult> {
        self.route_with_endpoint_radius(start, end, self.config.door_search_radius)
    }

    /// Route with a caller-chosen ring-search radius for snapping the
    /// endpoints onto walkable cells. The multi-floor stitcher routes legs
    /// between connection anchors, which sit deeper in stairwell geometry
    /// than doors and need the wider radius.
    pub(crate) fn route_with_endpoint_radius(
        &self,
        start: Point,
        end: Point,
        endpoint_radius: i32,
    ) -> Result<RouteResult> {
        if self.floor.corridors.is_empty() {
            return Err(NavError::NoCorridors);
        }

        let doors: Vec<DoorRef<'a>> = self
            .floor
            .corridors
            .iter()
            .flat_map(|c| {
                c.doors.iter().map(move |d| DoorRef {
                    corridor: c,
                    door: d,
                    anchor: resolve_anchor(c, &d.anchor),
                })
            })
            .collect();

        if doors.is_empty() {
            return Err(NavError::NoDoors);
        }

        let grid = WalkableGrid::build(&self.floor.corridors)?;
        let components = ComponentMap::analyze(&grid);

        // Door-to-cell resolution is memoized for this call only.
        let mut cell_memo: HashMap<usize, Option<GridCoord>> = HashMap::new();
        let mut door_cell = |idx: usize| -> Option<GridCoord> {
            *cell_memo.entry(idx).or_insert_with(|| {
                nearest_walkable_cell_in(
                    &grid,
                    doors[idx].corridor,
                    doors[idx].anchor,
                    self.config.door_search_radius,
                )
            })
        };

        let mut by_start: Vec<usize> = (0..doors.len()).collect();
        by_start.sort_by(|&a, &b| {
            doors[a]
                .anchor
                .distance(&start)
                .total_cmp(&doors[b].anchor.distance(&start))
        });
        let mut by_end: Vec<usize> = (0..doors.len()).collect();
        by_end.sort_by(|&a, &b| {
            doors[a]
                .anchor
                .distance(&end)
                .total_cmp(&doors[b].anchor.distance(&end))
        });

        // Preferred pair: nearest to start with nearest to end.
        let primary = (by_start[0], by_end[0]);
        if let Some(corridor_pts) = self.try_pair(
            &grid,
            &components,
            &doors,
            &mut door_cell,
            primary.0,
            primary.1,
            start,
            end,
            endpoint_radius,
        ) {
            return Ok(self.assemble(&doors, primary, corridor_pts, start, end));
        }

        // Bounded fallback over the nearest candidate doors, nearest-first;
        // the FIRST feasible pair wins, trading optimality for latency.
        debug!("preferred door pair infeasible, scanning fallback pairs");
        let n = self.config.max_pair_candidates;
        let mut pairs: Vec<(f32, usize, usize)> = Vec::new();
        for &si in by_start.iter().take(n) {
            for &ei in by_end.iter().take(n) {
                let cost = doors[si].anchor.distance(&start) + doors[ei].anchor.distance(&end);
                pairs.push((cost, si, ei));
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &(_, si, ei) in &pairs {
            if (si, ei) == primary {
                continue;
            }
            if let Some(corridor_pts) = self.try_pair(
                &grid,
                &components,
                &doors,
                &mut door_cell,
                si,
                ei,
                start,
                end,
                endpoint_radius,
            ) {
                return Ok(self.assemble(&doors, (si, ei), corridor_pts, start, end));
            }
        }

        Err(NavError::PathNotFound)
    }

    /// Attempt one door pair; returns the corridor polyline on success.
    #[allow(clippy::too_many_arguments)]
    fn try_pair(
        &self,
        grid: &WalkableGrid,
        components: &ComponentMap,
        doors: &[DoorRef<'a>],
        door_cell: &mut impl FnMut(usize) -> Option<GridCoord>,
        start_idx: usize,
        end_idx: usize,
        start: Point,
        end: Point,
        endpoint_radius: i32,
    ) -> Option<Vec<Point>> {
        if start_idx == end_idx {
            return self.try_identical_pair(
                grid,
                components,
                doors,
                door_cell,
                start_idx,
                start,
                end,
                endpoint_radius,
            );
        }

        let c1 = door_cell(start_idx)?;
        let c2 = door_cell(end_idx)?;

        let comp_id = components.component_of(c1)?;
        if components.component_of(c2) != Some(comp_id) {
            return None;
        }
        // Endpoints that resolve into corridor space must land in the
        // doors' component; points outside corridor space connect by the
        // straight approach segment alone.
        if let Some(sc) = grid.nearest_walkable(start, endpoint_radius) {
            if components.component_of(sc) != Some(comp_id) {
                return None;
            }
        }
        if let Some(ec) = grid.nearest_walkable(end, endpoint_radius) {
            if components.component_of(ec) != Some(comp_id) {
                return None;
            }
        }
        let component = components.component(comp_id)?;

        // Strict center-biased attempt first, weighted A* as fallback.
        let cells = center_biased_walk(grid, components, component, c1, c2)
            .or_else(|| weighted_astar(grid, components, c1, c2, &self.config.weights))?;

        let mut pts: Vec<Point> = cells.iter().map(|&c| grid.cell_center(c)).collect();
        pts = simplify_collinear(&pts);

        Some(self.with_connectors(doors, start_idx, end_idx, pts))
    }

    /// The identical-door case. A pure short hop (start and end within 1.5
    /// cells) skips path construction; otherwise both points must resolve
    /// into the door's own component, and the corridor leg degenerates to
    /// the door anchor.
    #[allow(clippy::too_many_arguments)]
    fn try_identical_pair(
        &self,
        grid: &WalkableGrid,
        components: &ComponentMap,
        doors: &[DoorRef<'a>],
        door_cell: &mut impl FnMut(usize) -> Option<GridCoord>,
        idx: usize,
        start: Point,
        end: Point,
        endpoint_radius: i32,
    ) -> Option<Vec<Point>> {
        let dc = door_cell(idx)?;

        let short_hop = start.distance(&end) <= self.config.short_hop_cells * grid.cell_size();
        if !short_hop {
            let door_comp = components.component_of(dc);
            let sc = grid.nearest_walkable(start, endpoint_radius)?;
            let ec = grid.nearest_walkable(end, endpoint_radius)?;
            if components.component_of(sc) != door_comp || components.component_of(ec) != door_comp
            {
                return None;
            }
        }

        Some(vec![doors[idx].anchor])
    }

    /// Prepend/append orthogonal connectors so the route enters and exits
    /// the corridor perpendicular to the dominant door edge.
    fn with_connectors(
        &self,
        doors: &[DoorRef<'a>],
        start_idx: usize,
        end_idx: usize,
        path: Vec<Point>,
    ) -> Vec<Point> {
        let start_anchor = doors[start_idx].anchor;
        let end_anchor = doors[end_idx].anchor;

        let mut pts = Vec::with_capacity(path.len() + 4);
        pts.push(start_anchor);
        if let Some(&first) = path.first() {
            pts.push(connector_bend(
                preferred_door_axis(doors[start_idx].corridor, start_anchor),
                start_anchor,
                first,
            ));
        }
        pts.extend(path.iter().copied());
        if let Some(&last) = path.last() {
            pts.push(connector_bend(
                preferred_door_axis(doors[end_idx].corridor, end_anchor),
                end_anchor,
                last,
            ));
        }
        pts.push(end_anchor);

        simplify_collinear(&pts)
    }

    /// Build the final result from the chosen pair and corridor polyline.
    fn assemble(
        &self,
        doors: &[DoorRef<'a>],
        (start_idx, end_idx): (usize, usize),
        corridor: Vec<Point>,
        start: Point,
        end: Point,
    ) -> RouteResult {
        let approach = vec![start, doors[start_idx].anchor];
        let exit = vec![doors[end_idx].anchor, end];

        let distance_px =
            polyline_length(&approach) + polyline_length(&corridor) + polyline_length(&exit);

        let (distance_meters, eta_seconds) = match self.floor.scale {
            Some(scale) => {
                let meters = distance_px * scale.meters_per_pixel;
                (Some(meters), Some(meters / WALKING_SPEED_MPS))
            }
            None => (None, None),
        };

        RouteResult {
            start_door: doors[start_idx].door.id.clone(),
            end_door: doors[end_idx].door.id.clone(),
            approach,
            corridor,
            exit,
            distance_px,
            distance_meters,
            eta_seconds,
        }
    }
}

/// Bend point between a door anchor and the first/last corridor cell.
///
/// A door on a horizontal edge is entered vertically and vice versa, so
/// the connector's first leg is perpendicular to the edge.
fn connector_bend(axis: DoorAxis, anchor: Point, toward: Point) -> Point {
    match axis {
        DoorAxis::Horizontal => Point::new(anchor.x, toward.y),
        DoorAxis::Vertical => Point::new(toward.x, anchor.y),
    }
}
