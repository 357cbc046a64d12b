//! Multi-floor route stitching.
//!
//! Chains single-floor routes across floors via stair/elevator
//! connections. Connections are filtered by transition type, chains are
//! enumerated shortest-hop first, and the first chain whose every leg is
//! routable wins.

use std::collections::VecDeque;

use log::debug;
use serde::Serialize;

use crate::core::Point;
use crate::error::{NavError, Result};
use crate::model::{FloorPlan, TransitionType};

use super::floor_router::{FloorRouter, RouteResult, RouterConfig};
use super::locator::resolve_anchor;

/// One floor's portion of a multi-floor route.
#[derive(Clone, Debug, Serialize)]
pub struct RoutePlanSegment {
    /// Floor this segment is walked on
    pub floor_id: String,
    /// The single-floor route for this segment
    pub route: RouteResult,
    /// Connection taken at the end of this segment; `None` on the final
    /// segment
    pub exit_connection: Option<String>,
}

/// An ordered multi-floor route with aggregate totals.
#[derive(Clone, Debug, Serialize)]
pub struct MultiFloorRouteResult {
    /// Per-floor segments in walking order
    pub segments: Vec<RoutePlanSegment>,
    /// Summed pixel distance over all segments
    pub distance_px: f32,
    /// Summed meter distance, when every crossed floor has a scale
    pub distance_meters: Option<f32>,
    /// Summed walking ETA including transition time, when every crossed
    /// floor has a scale
    pub eta_seconds: Option<f32>,
    /// Fixed transition time over all stair/elevator hops
    pub transition_seconds: f32,
}

/// A usable transition between two floors, in one direction.
struct ChainEdge {
    connection_id: String,
    from_floor: usize,
    to_floor: usize,
    /// Where the transition is boarded on the origin floor
    exit_point: Point,
    /// Where it lands on the destination floor
    entry_point: Point,
}

/// Compute a route between two points on possibly different floors.
///
/// With `start_floor == end_floor` this is exactly one [`FloorRouter`]
/// segment. Otherwise connection chains filtered by `allowed` transition
/// types are tried shortest-hop first until one routes end to end; each
/// hop adds a fixed transition time.
pub fn route_across_floors(
    floors: &[FloorPlan],
    start_floor: &str,
    end_floor: &str,
    start: Point,
    end: Point,
    allowed: &[TransitionType],
    config: &RouterConfig,
) -> Result<MultiFloorRouteResult> {
    let start_idx = floor_index(floors, start_floor)?;
    let end_idx = floor_index(floors, end_floor)?;

    if start_idx == end_idx {
        let route = FloorRouter::new(&floors[start_idx], config).route(start, end)?;
        return Ok(aggregate(vec![RoutePlanSegment {
            floor_id: floors[start_idx].id.clone(),
            route,
            exit_connection: None,
        }]));
    }

    let edges = collect_edges(floors, allowed);
    let chains = enumerate_chains(floors.len(), &edges, start_idx, end_idx, config.max_chain_candidates);
    if chains.is_empty() {
        return Err(NavError::RouteNotFound);
    }

    for chain in &chains {
        match route_chain(floors, &edges, chain, start, end, config) {
            Some(result) => return Ok(result),
            None => {
                debug!("connection chain with {} hops not routable, trying next", chain.len());
            }
        }
    }

    Err(NavError::RouteNotFound)
}

fn floor_index(floors: &[FloorPlan], id: &str) -> Result<usize> {
    floors
        .iter()
        .position(|f| f.id == id)
        .ok_or_else(|| NavError::UnknownFloor(id.to_string()))
}

/// Build the directed edge list from type-filtered connections. Every
/// connection yields edges in both directions.
fn collect_edges(floors: &[FloorPlan], allowed: &[TransitionType]) -> Vec<ChainEdge> {
    let mut edges = Vec::new();

    for (fi, floor) in floors.iter().enumerate() {
        for (corridor, conn) in floor.connections() {
            if !allowed.contains(&conn.transition) {
                continue;
            }

            let Some(ti) = floors.iter().position(|f| f.id == conn.target.floor_id) else {
                debug!("connection {} targets unknown floor {}", conn.id, conn.target.floor_id);
                continue;
            };
            let Some(target_corridor) = floors[ti].corridor(&conn.target.corridor_id) else {
                debug!(
                    "connection {} targets unknown corridor {}",
                    conn.id, conn.target.corridor_id
                );
                continue;
            };

            let here = resolve_anchor(corridor, &conn.anchor);
            let there = resolve_anchor(target_corridor, &conn.target.anchor);

            edges.push(ChainEdge {
                connection_id: conn.id.clone(),
                from_floor: fi,
                to_floor: ti,
                exit_point: here,
                entry_point: there,
            });
            edges.push(ChainEdge {
                connection_id: conn.id.clone(),
                from_floor: ti,
                to_floor: fi,
                exit_point: there,
                entry_point: here,
            });
        }
    }

    edges
}

/// Breadth-first enumeration of simple connection chains from start to
/// end, shortest-hop first, bounded by `limit`.
fn enumerate_chains(
    floor_count: usize,
    edges: &[ChainEdge],
    start: usize,
    end: usize,
    limit: usize,
) -> Vec<Vec<usize>> {
    let mut chains = Vec::new();
    let mut queue: VecDeque<(usize, Vec<usize>, Vec<bool>)> = VecDeque::new();

    let mut visited = vec![false; floor_count];
    visited[start] = true;
    queue.push_back((start, Vec::new(), visited));

    while let Some((floor, chain, visited)) = queue.pop_front() {
        if chains.len() >= limit {
            break;
        }

        for (ei, edge) in edges.iter().enumerate() {
            if edge.from_floor != floor || visited[edge.to_floor] {
                continue;
            }

            let mut next_chain = chain.clone();
            next_chain.push(ei);

            if edge.to_floor == end {
                chains.push(next_chain);
                if chains.len() >= limit {
                    break;
                }
                continue;
            }

            let mut next_visited = visited.clone();
            next_visited[edge.to_floor] = true;
            queue.push_back((edge.to_floor, next_chain, next_visited));
        }
    }

    chains
}

/// Route every leg of one chain; `None` if any leg fails.
fn route_chain(
    floors: &[FloorPlan],
    edges: &[ChainEdge],
    chain: &[usize],
    start: Point,
    end: Point,
    config: &RouterConfig,
) -> Option<MultiFloorRouteResult> {
    let mut segments = Vec::with_capacity(chain.len() + 1);
    let mut cursor = start;

    for &ei in chain {
        let edge = &edges[ei];
        let floor = &floors[edge.from_floor];
        // Legs ending at a connection anchor snap endpoints with the wider
        // connection radius.
        let route = FloorRouter::new(floor, config)
            .route_with_endpoint_radius(cursor, edge.exit_point, config.connection_search_radius)
            .ok()?;
        segments.push(RoutePlanSegment {
            floor_id: floor.id.clone(),
            route,
            exit_connection: Some(edge.connection_id.clone()),
        });
        cursor = edge.entry_point;
    }

    let last_floor_idx = edges[*chain.last()?].to_floor;
    let floor = &floors[last_floor_idx];
    let route = FloorRouter::new(floor, config)
        .route_with_endpoint_radius(cursor, end, config.connection_search_radius)
        .ok()?;
    segments.push(RoutePlanSegment {
        floor_id: floor.id.clone(),
        route,
        exit_connection: None,
    });

    let mut result = aggregate(segments);
    let hops = chain.len() as f32;
    result.transition_seconds = hops * config.transition_seconds;
    if let Some(eta) = result.eta_seconds.as_mut() {
        *eta += result.transition_seconds;
    }
    Some(result)
}

/// Sum per-segment totals; meters/ETA only when every segment has them.
fn aggregate(segments: Vec<RoutePlanSegment>) -> MultiFloorRouteResult {
    let distance_px = segments.iter().map(|s| s.route.distance_px).sum();

    let distance_meters = segments
        .iter()
        .map(|s| s.route.distance_meters)
        .sum::<Option<f32>>();
    let eta_seconds = segments
        .iter()
        .map(|s| s.route.eta_seconds)
        .sum::<Option<f32>>();

    MultiFloorRouteResult {
        segments,
        distance_px,
        distance_meters,
        eta_seconds,
        transition_seconds: 0.0,
    }
}
