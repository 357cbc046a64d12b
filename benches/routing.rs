//! Routing benchmarks over a synthetic office floor.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use marga_nav::{
    Anchor, ComponentMap, Corridor, Door, FloorPlan, FloorRouter, Point, RouterConfig,
    WalkableGrid,
};

fn rect_polygon(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// An H-shaped floor: two long corridors joined by a crossover.
fn office_floor() -> FloorPlan {
    let north = Corridor {
        id: "north".into(),
        polygon: rect_polygon(0.0, 0.0, 4000.0, 200.0),
        doors: vec![
            Door {
                id: "nw".into(),
                anchor: Anchor::At(Point::new(100.0, 0.0)),
                is_emergency: false,
                is_external: false,
            },
            Door {
                id: "ne".into(),
                anchor: Anchor::At(Point::new(3900.0, 0.0)),
                is_emergency: false,
                is_external: false,
            },
        ],
        connections: Vec::new(),
    };
    let south = Corridor {
        id: "south".into(),
        polygon: rect_polygon(0.0, 1800.0, 4000.0, 2000.0),
        doors: vec![Door {
            id: "se".into(),
            anchor: Anchor::At(Point::new(3900.0, 2000.0)),
            is_emergency: false,
            is_external: false,
        }],
        connections: Vec::new(),
    };
    let crossover = Corridor {
        id: "crossover".into(),
        polygon: rect_polygon(1900.0, 0.0, 2100.0, 2000.0),
        doors: Vec::new(),
        connections: Vec::new(),
    };

    FloorPlan {
        id: "office".into(),
        order: 0,
        corridors: vec![north, south, crossover],
        scale: None,
    }
}

fn bench_grid_build(c: &mut Criterion) {
    let floor = office_floor();

    c.bench_function("grid_build", |b| {
        b.iter(|| {
            let grid = WalkableGrid::build(black_box(&floor.corridors)).unwrap();
            let components = ComponentMap::analyze(&grid);
            black_box(components.components().len())
        })
    });
}

fn bench_single_floor_route(c: &mut Criterion) {
    let floor = office_floor();
    let config = RouterConfig::default();

    c.bench_function("single_floor_route", |b| {
        b.iter(|| {
            let router = FloorRouter::new(&floor, &config);
            let route = router
                .route(
                    black_box(Point::new(150.0, 100.0)),
                    black_box(Point::new(3850.0, 1900.0)),
                )
                .unwrap();
            black_box(route.distance_px)
        })
    });
}

criterion_group!(benches, bench_grid_build, bench_single_floor_route);
criterion_main!(benches);
