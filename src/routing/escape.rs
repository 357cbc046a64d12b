//! Escape-route selection.
//!
//! Finds the fastest route to the nearest door flagged both emergency and
//! external. Same-floor exits are evaluated first and win outright; only
//! when the start floor has none are other floors ranked and evaluated
//! with stairs-only multi-floor routes under a wall-clock budget. The
//! budget is checked between whole candidate evaluations, never inside a
//! single search.

use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::core::Point;
use crate::error::{NavError, Result};
use crate::model::{Door, FloorPlan, TransitionType};

use super::floor_router::{FloorRouter, RouterConfig};
use super::locator::resolve_anchor;
use super::multi_floor::{route_across_floors, MultiFloorRouteResult, RoutePlanSegment};

/// An escape route together with the exit door it reaches.
#[derive(Clone, Debug, Serialize)]
pub struct EscapeRoute {
    /// The multi-floor (possibly single-segment) route to the exit
    pub route: MultiFloorRouteResult,
    /// Id of the emergency+external door the route ends at
    pub door_id: String,
    /// Floor the exit door is on
    pub floor_id: String,
}

/// An emergency+external door candidate.
struct ExitCandidate<'a> {
    floor: &'a FloorPlan,
    door: &'a Door,
    anchor: Point,
}

/// Find the fastest escape route from a point to any emergency+external
/// door in the building, using stair transitions only.
pub fn find_escape_route(
    floors: &[FloorPlan],
    start_floor: &str,
    start: Point,
    config: &RouterConfig,
) -> Result<EscapeRoute> {
    let start_idx = floors
        .iter()
        .position(|f| f.id == start_floor)
        .ok_or_else(|| NavError::UnknownFloor(start_floor.to_string()))?;

    let candidates: Vec<ExitCandidate> = floors
        .iter()
        .flat_map(|floor| {
            floor.doors().filter_map(move |(corridor, door)| {
                (door.is_emergency && door.is_external).then(|| ExitCandidate {
                    floor,
                    door,
                    anchor: resolve_anchor(corridor, &door.anchor),
                })
            })
        })
        .collect();

    if candidates.is_empty() {
        return Err(NavError::NoEmergencyExit);
    }

    // Fast path: routable exits on the start floor win without looking
    // further. When the start floor has qualifying exits but none is
    // routable, the search widens to the other floors instead of failing.
    let same_floor: Vec<&ExitCandidate> = candidates
        .iter()
        .filter(|c| c.floor.id == floors[start_idx].id)
        .collect();
    if !same_floor.is_empty() {
        let router = FloorRouter::new(&floors[start_idx], config);
        let mut best: Option<EscapeRoute> = None;

        for candidate in same_floor {
            match router.route(start, candidate.anchor) {
                Ok(route) => {
                    let result = single_segment(&floors[start_idx], route);
                    let escape = EscapeRoute {
                        route: result,
                        door_id: candidate.door.id.clone(),
                        floor_id: candidate.floor.id.clone(),
                    };
                    if is_better(&escape, best.as_ref()) {
                        best = Some(escape);
                    }
                }
                Err(err) => debug!("same-floor exit {} not routable: {}", candidate.door.id, err),
            }
        }

        if let Some(best) = best {
            return Ok(best);
        }
        debug!("no same-floor exit routable, widening to other floors");
    }

    // Rank cross-floor candidates by floor-order distance plus straight-line
    // distance, then evaluate the top candidates stairs-only under the
    // wall-clock budget. Same-floor candidates already failed above.
    let start_order = floors[start_idx].order;
    let mut ranked: Vec<(f32, &ExitCandidate)> = candidates
        .iter()
        .filter(|c| c.floor.id != floors[start_idx].id)
        .map(|c| {
            let floor_delta = (c.floor.order - start_order).abs() as f32;
            let rank = floor_delta * config.floor_rank_weight + c.anchor.distance(&start);
            (rank, c)
        })
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.truncate(config.max_escape_candidates);

    let started = Instant::now();
    let mut best: Option<EscapeRoute> = None;

    for (rank, candidate) in &ranked {
        if started.elapsed().as_secs_f32() > config.escape_budget_seconds {
            debug!("escape budget exhausted, keeping best so far");
            break;
        }

        match route_across_floors(
            floors,
            start_floor,
            &candidate.floor.id,
            start,
            candidate.anchor,
            &[TransitionType::Stairs],
            config,
        ) {
            Ok(route) => {
                let escape = EscapeRoute {
                    route,
                    door_id: candidate.door.id.clone(),
                    floor_id: candidate.floor.id.clone(),
                };
                if is_better(&escape, best.as_ref()) {
                    best = Some(escape);
                }
            }
            Err(err) => debug!(
                "escape candidate {} (rank {:.0}) not routable: {}",
                candidate.door.id, rank, err
            ),
        }
    }

    best.ok_or(NavError::EscapeRouteNotFound)
}

/// Lower ETA wins; without ETAs, lower pixel distance wins.
fn is_better(candidate: &EscapeRoute, best: Option<&EscapeRoute>) -> bool {
    let Some(best) = best else {
        return true;
    };
    match (candidate.route.eta_seconds, best.route.eta_seconds) {
        (Some(a), Some(b)) => a < b,
        _ => candidate.route.distance_px < best.route.distance_px,
    }
}

fn single_segment(
    floor: &FloorPlan,
    route: super::floor_router::RouteResult,
) -> MultiFloorRouteResult {
    let distance_px = route.distance_px;
    let distance_meters = route.distance_meters;
    let eta_seconds = route.eta_seconds;
    MultiFloorRouteResult {
        segments: vec![RoutePlanSegment {
            floor_id: floor.id.clone(),
            route,
            exit_connection: None,
        }],
        distance_px,
        distance_meters,
        eta_seconds,
        transition_seconds: 0.0,
    }
}
