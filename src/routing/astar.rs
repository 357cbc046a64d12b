//! Grid search between door cells.
//!
//! Two strategies, tried in order:
//!
//! 1. A strict center-biased walk that steps onto the component's guide
//!    centerline, traverses it along the major axis while re-locating the
//!    nearest in-component cell to the guide at each step, and drops back
//!    to the target cell. Any infeasible sub-step fails the whole attempt.
//! 2. A weighted A* over `(cell, incoming direction)` states whose cost
//!    model pulls paths toward the guide and away from walls while
//!    suppressing oscillation in favor of long straight runs.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::GridCoord;
use crate::grid::{ComponentMap, CorridorComponent, Orientation, WalkableGrid};

/// Cost-model weights for the fallback A* search.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SearchWeights {
    /// Penalty per cell of offset from the component guide
    #[serde(default = "defaults::center_penalty")]
    pub center_penalty: f32,
    /// Numerator of the wall-proximity penalty
    #[serde(default = "defaults::edge_penalty")]
    pub edge_penalty: f32,
    /// Clearance floor (in cells) for the wall-proximity penalty
    #[serde(default = "defaults::min_clearance_cells")]
    pub min_clearance_cells: f32,
    /// Added when the step direction differs from the incoming direction
    #[serde(default = "defaults::turn_penalty")]
    pub turn_penalty: f32,
    /// Added on top of the turn penalty when the step reverses direction
    #[serde(default = "defaults::reverse_penalty")]
    pub reverse_penalty: f32,
    /// Multiplier on the Manhattan-distance heuristic
    #[serde(default = "defaults::heuristic_weight")]
    pub heuristic_weight: f32,
    /// Maximum node expansions before the search gives up
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: usize,
}

mod defaults {
    pub fn center_penalty() -> f32 {
        2.2
    }
    pub fn edge_penalty() -> f32 {
        0.7
    }
    pub fn min_clearance_cells() -> f32 {
        0.2
    }
    pub fn turn_penalty() -> f32 {
        1.2
    }
    pub fn reverse_penalty() -> f32 {
        0.8
    }
    pub fn heuristic_weight() -> f32 {
        0.55
    }
    pub fn max_iterations() -> usize {
        100_000
    }
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            center_penalty: defaults::center_penalty(),
            edge_penalty: defaults::edge_penalty(),
            min_clearance_cells: defaults::min_clearance_cells(),
            turn_penalty: defaults::turn_penalty(),
            reverse_penalty: defaults::reverse_penalty(),
            heuristic_weight: defaults::heuristic_weight(),
            max_iterations: defaults::max_iterations(),
        }
    }
}

/// 4-connected step directions. Index 4 means "no incoming direction".
const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const NO_DIR: u8 = 4;

#[inline]
fn opposite(dir: u8) -> u8 {
    match dir {
        0 => 1,
        1 => 0,
        2 => 3,
        3 => 2,
        other => other,
    }
}

/// Strict center-biased walk between two cells of one component.
///
/// Returns `None` as soon as any sub-step (entering the centerline,
/// traversing it, or leaving it) hits a non-walkable cell or an empty
/// column/row.
pub(crate) fn center_biased_walk(
    grid: &WalkableGrid,
    components: &ComponentMap,
    component: &CorridorComponent,
    from: GridCoord,
    to: GridCoord,
) -> Option<Vec<GridCoord>> {
    if from == to {
        return Some(vec![from]);
    }

    match component.orientation {
        Orientation::Horizontal => walk_major_axis(
            grid,
            components,
            component,
            from,
            to,
            |major, minor| GridCoord::new(major, minor),
            |coord| (coord.x, coord.y),
        ),
        Orientation::Vertical => walk_major_axis(
            grid,
            components,
            component,
            from,
            to,
            |major, minor| GridCoord::new(minor, major),
            |coord| (coord.y, coord.x),
        ),
    }
}

/// Axis-generic centerline walk. `make` builds a coordinate from
/// (major, minor); `split` is its inverse.
fn walk_major_axis(
    grid: &WalkableGrid,
    components: &ComponentMap,
    component: &CorridorComponent,
    from: GridCoord,
    to: GridCoord,
    make: impl Fn(i32, i32) -> GridCoord,
    split: impl Fn(GridCoord) -> (i32, i32),
) -> Option<Vec<GridCoord>> {
    let (from_major, from_minor) = split(from);
    let (to_major, to_minor) = split(to);

    let guide_cell = |major: i32| -> Option<i32> {
        nearest_to_guide(grid, components, component, major, &make)
    };

    let mut path = Vec::new();
    path.push(from);

    // Step onto the centerline in the starting column/row.
    let mut minor = from_minor;
    let entry_minor = guide_cell(from_major)?;
    push_minor_run(grid, &make, from_major, &mut minor, entry_minor, &mut path)?;

    // Traverse the guide along the major axis, re-locating the nearest
    // in-component cell to the guide at each step.
    let step = if to_major >= from_major { 1 } else { -1 };
    let mut major = from_major;
    while major != to_major {
        major += step;
        let next = make(major, minor);
        if !grid.is_walkable(next) {
            return None;
        }
        path.push(next);

        let target_minor = guide_cell(major)?;
        push_minor_run(grid, &make, major, &mut minor, target_minor, &mut path)?;
    }

    // Leave the centerline for the target cell.
    push_minor_run(grid, &make, to_major, &mut minor, to_minor, &mut path)?;

    Some(path)
}

/// Walk the minor axis from `*minor` to `target`, appending every cell;
/// fails on the first non-walkable cell.
fn push_minor_run(
    grid: &WalkableGrid,
    make: &impl Fn(i32, i32) -> GridCoord,
    major: i32,
    minor: &mut i32,
    target: i32,
    path: &mut Vec<GridCoord>,
) -> Option<()> {
    let step = if target >= *minor { 1 } else { -1 };
    while *minor != target {
        *minor += step;
        let coord = make(major, *minor);
        if !grid.is_walkable(coord) {
            return None;
        }
        path.push(coord);
    }
    Some(())
}

/// The in-component walkable cell of a column/row nearest the guide.
fn nearest_to_guide(
    grid: &WalkableGrid,
    components: &ComponentMap,
    component: &CorridorComponent,
    major: i32,
    make: &impl Fn(i32, i32) -> GridCoord,
) -> Option<i32> {
    let (lo, hi) = match component.orientation {
        Orientation::Horizontal => (component.min.y, component.max.y),
        Orientation::Vertical => (component.min.x, component.max.x),
    };

    let mut best: Option<(f32, i32)> = None;
    for minor in lo..=hi {
        let coord = make(major, minor);
        if !grid.is_walkable(coord) || components.component_of(coord) != Some(component.id) {
            continue;
        }
        let offset = (minor as f32 - component.guide).abs();
        if best.map(|(b, _)| offset < b).unwrap_or(true) {
            best = Some((offset, minor));
        }
    }
    best.map(|(_, minor)| minor)
}

/// Node in the A* open set.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    coord: GridCoord,
    dir: u8,
    f_score: f32,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord && self.dir == other.dir
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Weighted A* over `(cell, incoming direction)` states.
///
/// Step cost is `1 + center + edge + turn + reverse` where `center` pulls
/// toward the component guide, `edge` pushes away from walls, and the
/// direction-aware `turn`/`reverse` terms favor long straight runs. The
/// Manhattan heuristic is deliberately deflated so tie-breaking happens on
/// the penalty terms.
pub(crate) fn weighted_astar(
    grid: &WalkableGrid,
    components: &ComponentMap,
    from: GridCoord,
    to: GridCoord,
    weights: &SearchWeights,
) -> Option<Vec<GridCoord>> {
    if from == to {
        return Some(vec![from]);
    }

    type StateKey = (GridCoord, u8);

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<StateKey, f32> = HashMap::new();
    let mut parent: HashMap<StateKey, StateKey> = HashMap::new();
    let mut closed: HashSet<StateKey> = HashSet::new();

    let heuristic =
        |coord: GridCoord| -> f32 { coord.manhattan_distance(&to) as f32 * weights.heuristic_weight };

    g_score.insert((from, NO_DIR), 0.0);
    open.push(SearchNode {
        coord: from,
        dir: NO_DIR,
        f_score: heuristic(from),
    });

    let mut iterations = 0usize;

    while let Some(node) = open.pop() {
        iterations += 1;
        if iterations > weights.max_iterations {
            debug!("weighted A* exceeded {} iterations", weights.max_iterations);
            return None;
        }

        let key = (node.coord, node.dir);
        if node.coord == to {
            return Some(reconstruct(&parent, key));
        }
        if !closed.insert(key) {
            continue;
        }

        let current_g = *g_score.get(&key).unwrap_or(&f32::MAX);

        for (dir_idx, &(dx, dy)) in DIRS.iter().enumerate() {
            let dir = dir_idx as u8;
            let next = GridCoord::new(node.coord.x + dx, node.coord.y + dy);
            if !grid.is_walkable(next) {
                continue;
            }
            let next_key = (next, dir);
            if closed.contains(&next_key) {
                continue;
            }

            let mut cost = 1.0 + cell_penalty(grid, components, next, weights);
            if node.dir != NO_DIR && dir != node.dir {
                cost += weights.turn_penalty;
                if dir == opposite(node.dir) {
                    cost += weights.reverse_penalty;
                }
            }

            let tentative = current_g + cost;
            if tentative < *g_score.get(&next_key).unwrap_or(&f32::MAX) {
                g_score.insert(next_key, tentative);
                parent.insert(next_key, key);
                open.push(SearchNode {
                    coord: next,
                    dir,
                    f_score: tentative + heuristic(next),
                });
            }
        }
    }

    None
}

/// Static penalty of standing on a cell: guide offset plus wall proximity.
#[inline]
fn cell_penalty(
    grid: &WalkableGrid,
    components: &ComponentMap,
    coord: GridCoord,
    weights: &SearchWeights,
) -> f32 {
    let center = match components
        .component_of(coord)
        .and_then(|id| components.component(id))
    {
        Some(comp) => {
            let minor = match comp.orientation {
                Orientation::Horizontal => coord.y,
                Orientation::Vertical => coord.x,
            };
            (minor as f32 - comp.guide).abs() * weights.center_penalty
        }
        None => 0.0,
    };

    let clearance = grid.clearance_cells(coord).max(weights.min_clearance_cells);
    center + weights.edge_penalty / clearance
}

fn reconstruct(parent: &HashMap<(GridCoord, u8), (GridCoord, u8)>, goal: (GridCoord, u8)) -> Vec<GridCoord> {
    let mut path = Vec::new();
    let mut current = goal;

    loop {
        path.push(current.0);
        match parent.get(&current) {
            Some(&p) => current = p,
            None => break,
        }
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;
    use crate::model::Corridor;

    fn rect_corridor(id: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Corridor {
        Corridor {
            id: id.into(),
            polygon: vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            doors: Vec::new(),
            connections: Vec::new(),
        }
    }

    fn build(corridors: &[Corridor]) -> (WalkableGrid, ComponentMap) {
        let grid = WalkableGrid::build(corridors).unwrap();
        let cmap = ComponentMap::analyze(&grid);
        (grid, cmap)
    }

    #[test]
    fn test_center_biased_walk_straight_corridor() {
        let corridors = vec![rect_corridor("c", 0.0, 0.0, 600.0, 100.0)];
        let (grid, cmap) = build(&corridors);
        let comp = &cmap.components()[0];

        let from = grid.world_to_grid(Point::new(20.0, 20.0));
        let to = grid.world_to_grid(Point::new(580.0, 80.0));

        let path = center_biased_walk(&grid, &cmap, comp, from, to).unwrap();
        assert_eq!(path[0], from);
        assert_eq!(*path.last().unwrap(), to);
        assert!(path.iter().all(|&c| grid.is_walkable(c)));
    }

    #[test]
    fn test_center_biased_walk_hugs_guide() {
        let corridors = vec![rect_corridor("c", 0.0, 0.0, 600.0, 100.0)];
        let (grid, cmap) = build(&corridors);
        let comp = &cmap.components()[0];

        let from = grid.world_to_grid(Point::new(20.0, 20.0));
        let to = grid.world_to_grid(Point::new(580.0, 20.0));
        let path = center_biased_walk(&grid, &cmap, comp, from, to).unwrap();

        // Middle of the traversal should sit on the guide row.
        let guide_row = comp.guide.round() as i32;
        let mid = path[path.len() / 2];
        assert!((mid.y - guide_row).abs() <= 1);
    }

    #[test]
    fn test_astar_finds_path_in_l_shape() {
        // Two rectangles meeting in an L; the centerline walk of a single
        // component can't traverse the bend in one major-axis sweep, A*
        // can.
        let corridors = vec![
            rect_corridor("h", 0.0, 0.0, 400.0, 60.0),
            rect_corridor("v", 340.0, 0.0, 400.0, 400.0),
        ];
        let (grid, cmap) = build(&corridors);

        let from = grid.world_to_grid(Point::new(20.0, 30.0));
        let to = grid.world_to_grid(Point::new(370.0, 380.0));
        assert_eq!(cmap.component_of(from), cmap.component_of(to));

        let weights = SearchWeights::default();
        let path = weighted_astar(&grid, &cmap, from, to, &weights).unwrap();
        assert_eq!(path[0], from);
        assert_eq!(*path.last().unwrap(), to);

        // 4-connected steps only
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_astar_no_path_between_components() {
        let corridors = vec![
            rect_corridor("a", 0.0, 0.0, 100.0, 60.0),
            rect_corridor("b", 300.0, 0.0, 400.0, 60.0),
        ];
        let (grid, cmap) = build(&corridors);

        let from = grid.world_to_grid(Point::new(50.0, 30.0));
        let to = grid.world_to_grid(Point::new(350.0, 30.0));

        let weights = SearchWeights::default();
        assert!(weighted_astar(&grid, &cmap, from, to, &weights).is_none());
    }

    #[test]
    fn test_astar_trivial_same_cell() {
        let corridors = vec![rect_corridor("c", 0.0, 0.0, 100.0, 100.0)];
        let (grid, cmap) = build(&corridors);
        let cell = grid.world_to_grid(Point::new(50.0, 50.0));

        let weights = SearchWeights::default();
        let path = weighted_astar(&grid, &cmap, cell, cell, &weights).unwrap();
        assert_eq!(path, vec![cell]);
    }
}
