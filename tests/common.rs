//! Test utilities for building floor-plan snapshots.

#![allow(dead_code)]

use marga_nav::{
    Anchor, Connection, ConnectionTarget, Corridor, Door, FloorPlan, FloorScale, Point,
    TransitionType,
};

/// Axis-aligned rectangle polygon.
pub fn rect_polygon(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// Plain door at an anchor.
pub fn door(id: &str, anchor: Anchor) -> Door {
    Door {
        id: id.into(),
        anchor,
        is_emergency: false,
        is_external: false,
    }
}

/// Emergency + external exit door.
pub fn exit_door(id: &str, anchor: Anchor) -> Door {
    Door {
        id: id.into(),
        anchor,
        is_emergency: true,
        is_external: true,
    }
}

/// Corridor with the given doors and no connections.
pub fn corridor(id: &str, polygon: Vec<Point>, doors: Vec<Door>) -> Corridor {
    Corridor {
        id: id.into(),
        polygon,
        doors,
        connections: Vec::new(),
    }
}

/// Stairs connection from one corridor to a corridor on another floor.
pub fn stairs(
    id: &str,
    anchor: Point,
    target_floor: &str,
    target_corridor: &str,
    target_anchor: Point,
) -> Connection {
    Connection {
        id: id.into(),
        transition: TransitionType::Stairs,
        anchor: Anchor::At(anchor),
        target: ConnectionTarget {
            floor_id: target_floor.into(),
            corridor_id: target_corridor.into(),
            anchor: Anchor::At(target_anchor),
        },
    }
}

/// Unscaled floor.
pub fn floor(id: &str, order: i32, corridors: Vec<Corridor>) -> FloorPlan {
    FloorPlan {
        id: id.into(),
        order,
        corridors,
        scale: None,
    }
}

/// Floor with a meters-per-pixel scale.
pub fn scaled_floor(
    id: &str,
    order: i32,
    corridors: Vec<Corridor>,
    meters_per_pixel: f32,
) -> FloorPlan {
    FloorPlan {
        id: id.into(),
        order,
        corridors,
        scale: Some(FloorScale { meters_per_pixel }),
    }
}
