//! Building snapshot types.
//!
//! The kernel's only input is an in-memory building model: floors own
//! corridors, corridors own doors and stair/elevator connections. All of it
//! is plain immutable data; the kernel rebuilds everything it derives (grid,
//! components, guides) from a snapshot on every call and keeps no state
//! across calls.
//!
//! Coordinates are floor-local pixels; each floor has its own space. The
//! optional per-floor [`FloorScale`] is the only external configuration
//! value the kernel reads.

use serde::{Deserialize, Serialize};

use crate::core::Point;

/// How a door or connection is anchored to its owning corridor.
///
/// Either an explicit point, or a parametric position along one of the
/// corridor polygon's edges (`t` is clamped to `[0, 1]` at resolution time;
/// `edge_index` wraps modulo the edge count, covering the implicit closing
/// edge).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Anchor {
    /// Explicit anchor point in floor-local pixels
    At(Point),
    /// Parametric position along a polygon edge
    OnEdge {
        /// Index of the edge (vertex `i` to vertex `i + 1`, wrapping)
        edge_index: usize,
        /// Position along the edge, clamped to `[0, 1]`
        t: f32,
    },
}

/// Kind of vertical transition between floors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    /// Staircase; usable by escape routes
    Stairs,
    /// Elevator; excluded from escape routes
    Elevator,
}

/// A door on a corridor boundary through which routes enter and exit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Door {
    /// Stable identifier, unique within the building
    pub id: String,
    /// Where the door sits on its owning corridor
    pub anchor: Anchor,
    /// Marked as an emergency door
    #[serde(default)]
    pub is_emergency: bool,
    /// Leads outside the building
    #[serde(default)]
    pub is_external: bool,
}

/// The far side of a [`Connection`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionTarget {
    /// Floor the transition lands on
    pub floor_id: String,
    /// Corridor the transition lands in
    pub corridor_id: String,
    /// Anchor on the target corridor
    pub anchor: Anchor,
}

/// A stairs/elevator transition between two corridors, possibly on
/// different floors. Traversable in both directions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Connection {
    /// Stable identifier, unique within the building
    pub id: String,
    /// Stairs or elevator
    pub transition: TransitionType,
    /// Anchor on the owning corridor
    pub anchor: Anchor,
    /// Where the transition leads
    pub target: ConnectionTarget,
}

/// A polygonal walkable area on one floor, owning its doors and
/// connections.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Corridor {
    /// Stable identifier, unique within the building
    pub id: String,
    /// Ordered vertices (at least 3) with an implicit closing edge
    pub polygon: Vec<Point>,
    /// Doors on this corridor's boundary
    #[serde(default)]
    pub doors: Vec<Door>,
    /// Vertical transitions starting in this corridor
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Optional pixel-to-meter scale for a floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorScale {
    /// Meters per floor-local pixel
    pub meters_per_pixel: f32,
}

/// One floor of the building.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Stable identifier, unique within the building
    pub id: String,
    /// Ordered index used for up/down labeling and floor-distance ranking
    pub order: i32,
    /// Walkable corridors on this floor
    #[serde(default)]
    pub corridors: Vec<Corridor>,
    /// Optional pixel-to-meter scale
    #[serde(default)]
    pub scale: Option<FloorScale>,
}

impl FloorPlan {
    /// Iterate over every door on this floor with its owning corridor.
    pub fn doors(&self) -> impl Iterator<Item = (&Corridor, &Door)> {
        self.corridors
            .iter()
            .flat_map(|c| c.doors.iter().map(move |d| (c, d)))
    }

    /// Iterate over every connection on this floor with its owning
    /// corridor.
    pub fn connections(&self) -> impl Iterator<Item = (&Corridor, &Connection)> {
        self.corridors
            .iter()
            .flat_map(|c| c.connections.iter().map(move |conn| (c, conn)))
    }

    /// Find a corridor by id.
    pub fn corridor(&self, id: &str) -> Option<&Corridor> {
        self.corridors.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_serde_roundtrip() {
        let at: Anchor = serde_json::from_str(r#"{"x": 3.0, "y": 4.0}"#).unwrap();
        assert_eq!(at, Anchor::At(Point::new(3.0, 4.0)));

        let on_edge: Anchor = serde_json::from_str(r#"{"edge_index": 2, "t": 0.5}"#).unwrap();
        assert_eq!(
            on_edge,
            Anchor::OnEdge {
                edge_index: 2,
                t: 0.5
            }
        );
    }

    #[test]
    fn test_transition_type_serde() {
        let t: TransitionType = serde_json::from_str(r#""stairs""#).unwrap();
        assert_eq!(t, TransitionType::Stairs);
        assert_eq!(
            serde_json::to_string(&TransitionType::Elevator).unwrap(),
            r#""elevator""#
        );
    }

    #[test]
    fn test_floor_iterators() {
        let floor = FloorPlan {
            id: "f1".into(),
            order: 0,
            corridors: vec![Corridor {
                id: "c1".into(),
                polygon: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                ],
                doors: vec![Door {
                    id: "d1".into(),
                    anchor: Anchor::At(Point::new(5.0, 0.0)),
                    is_emergency: false,
                    is_external: false,
                }],
                connections: Vec::new(),
            }],
            scale: None,
        };

        assert_eq!(floor.doors().count(), 1);
        assert_eq!(floor.connections().count(), 0);
        assert!(floor.corridor("c1").is_some());
        assert!(floor.corridor("missing").is_none());
    }
}
