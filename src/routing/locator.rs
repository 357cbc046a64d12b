//! Door and connection anchor resolution.
//!
//! Doors and connections are anchored either at an explicit point or
//! parametrically along one of the owning corridor polygon's edges. The
//! locator resolves anchors to world points, maps them to the nearest
//! walkable cell inside the owning polygon, and classifies the nearest
//! boundary edge as horizontal or vertical so the router can bend
//! connectors perpendicular to it.

use crate::core::geometry::{point_in_polygon, point_to_segment_distance};
use crate::core::{GridCoord, Point};
use crate::grid::WalkableGrid;
use crate::model::{Anchor, Corridor};

/// Orientation of the corridor edge nearest to a door anchor.
///
/// Connector bends enter and exit corridors perpendicular to this edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorAxis {
    /// Nearest edge runs mostly along X; connectors bend vertically first
    Horizontal,
    /// Nearest edge runs mostly along Y; connectors bend horizontally first
    Vertical,
}

/// Resolve an anchor to a world point on its owning corridor.
///
/// Edge anchors interpolate linearly between the edge's two vertices at
/// `t` clamped to `[0, 1]`; the edge index wraps modulo the edge count so
/// the implicit closing edge is addressable.
pub fn resolve_anchor(corridor: &Corridor, anchor: &Anchor) -> Point {
    match *anchor {
        Anchor::At(p) => p,
        Anchor::OnEdge { edge_index, t } => {
            let polygon = &corridor.polygon;
            if polygon.is_empty() {
                return Point::ZERO;
            }
            if polygon.len() == 1 {
                return polygon[0];
            }
            let i = edge_index % polygon.len();
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            let t = t.clamp(0.0, 1.0);
            Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
        }
    }
}

/// Classify the corridor edge nearest to `anchor` as horizontal or
/// vertical.
pub fn preferred_door_axis(corridor: &Corridor, anchor: Point) -> DoorAxis {
    let polygon = &corridor.polygon;
    if polygon.len() < 2 {
        return DoorAxis::Horizontal;
    }

    let mut best_dist = f32::MAX;
    let mut best_axis = DoorAxis::Horizontal;

    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let d = point_to_segment_distance(anchor, a, b);
        if d < best_dist {
            best_dist = d;
            best_axis = if (b.x - a.x).abs() >= (b.y - a.y).abs() {
                DoorAxis::Horizontal
            } else {
                DoorAxis::Vertical
            };
        }
    }

    best_axis
}

/// Find the walkable cell nearest to `anchor` whose center lies inside the
/// owning corridor polygon, expanding the search ring up to `max_radius`
/// cells. Returns `None` when exhausted; such a door is unreachable.
pub fn nearest_walkable_cell_in(
    grid: &WalkableGrid,
    corridor: &Corridor,
    anchor: Point,
    max_radius: i32,
) -> Option<GridCoord> {
    let center = grid.world_to_grid(anchor);

    let accepts = |coord: GridCoord| -> bool {
        grid.is_walkable(coord) && point_in_polygon(grid.cell_center(coord), &corridor.polygon)
    };

    if accepts(center) {
        return Some(center);
    }

    for r in 1..=max_radius {
        let mut best: Option<(f32, GridCoord)> = None;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx.abs() != r && dy.abs() != r {
                    continue;
                }
                let coord = GridCoord::new(center.x + dx, center.y + dy);
                if !accepts(coord) {
                    continue;
                }
                let d = grid.cell_center(coord).distance(&anchor);
                if best.map(|(bd, _)| d < bd).unwrap_or(true) {
                    best = Some((d, coord));
                }
            }
        }
        if let Some((_, coord)) = best {
            return Some(coord);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corridor() -> Corridor {
        Corridor {
            id: "c".into(),
            polygon: vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 20.0),
                Point::new(0.0, 20.0),
            ],
            doors: Vec::new(),
            connections: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_explicit_anchor() {
        let c = corridor();
        let p = resolve_anchor(&c, &Anchor::At(Point::new(7.0, 8.0)));
        assert_eq!(p, Point::new(7.0, 8.0));
    }

    #[test]
    fn test_resolve_edge_anchor_interpolates() {
        let c = corridor();
        let p = resolve_anchor(
            &c,
            &Anchor::OnEdge {
                edge_index: 0,
                t: 0.5,
            },
        );
        assert_relative_eq!(p.x, 50.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn test_resolve_edge_anchor_clamps_t() {
        let c = corridor();
        let p = resolve_anchor(
            &c,
            &Anchor::OnEdge {
                edge_index: 0,
                t: 1.7,
            },
        );
        assert_relative_eq!(p.x, 100.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn test_resolve_edge_anchor_wraps_index() {
        let c = corridor();
        // Edge 3 is the closing edge (0,20)->(0,0); index 7 wraps to it.
        let p = resolve_anchor(
            &c,
            &Anchor::OnEdge {
                edge_index: 7,
                t: 0.5,
            },
        );
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 10.0);
    }

    #[test]
    fn test_preferred_door_axis() {
        let c = corridor();
        // Anchor on the long bottom edge
        assert_eq!(
            preferred_door_axis(&c, Point::new(50.0, 0.0)),
            DoorAxis::Horizontal
        );
        // Anchor on the short left edge
        assert_eq!(
            preferred_door_axis(&c, Point::new(0.0, 10.0)),
            DoorAxis::Vertical
        );
    }

    #[test]
    fn test_nearest_walkable_cell_stays_in_polygon() {
        let c = corridor();
        let grid = WalkableGrid::build(std::slice::from_ref(&c)).unwrap();

        let cell = nearest_walkable_cell_in(&grid, &c, Point::new(50.0, 0.0), 18);
        assert!(cell.is_some());
        let cell = cell.unwrap();
        assert!(grid.is_walkable(cell));
        assert!(point_in_polygon(grid.cell_center(cell), &c.polygon));
    }

    #[test]
    fn test_nearest_walkable_cell_exhausts() {
        let c = corridor();
        let grid = WalkableGrid::build(std::slice::from_ref(&c)).unwrap();

        // An anchor far outside the polygon never resolves.
        let cell = nearest_walkable_cell_in(&grid, &c, Point::new(50.0, -2000.0), 5);
        assert!(cell.is_none());
    }
}
