//! Walkable grid builder.
//!
//! Rasterizes a floor's corridor polygons into a dense grid of walkable
//! cells with a per-cell wall-clearance field. A cell is walkable iff its
//! center lies inside at least one corridor polygon; its clearance is the
//! distance from the center to the nearest corridor boundary, taking the
//! most generous covering polygon.

use log::debug;

use crate::core::geometry::{point_in_polygon, point_to_polygon_edge_distance};
use crate::core::{GridCoord, Point};
use crate::error::{NavError, Result};
use crate::model::Corridor;

/// Cell size tiers by floor extent (`max(width, height)` in pixels).
/// Larger floors get coarser grids to bound search cost.
const CELL_SIZE_TIERS: [(f32, f32); 3] = [(7000.0, 28.0), (5000.0, 24.0), (3000.0, 20.0)];
const CELL_SIZE_DEFAULT: f32 = 16.0;

/// Dense walkable grid over one floor's bounding box.
#[derive(Clone, Debug)]
pub struct WalkableGrid {
    /// Grid dimensions in cells
    width: usize,
    height: usize,
    /// Cell size in pixels
    cell_size: f32,
    /// World position of the grid's (0, 0) cell corner
    origin: Point,
    /// Walkable flag per cell, row-major
    walkable: Vec<bool>,
    /// Distance from cell center to the nearest corridor boundary, in
    /// pixels; 0.0 for non-walkable cells
    clearance: Vec<f32>,
    /// Number of walkable cells
    walkable_count: usize,
}

impl WalkableGrid {
    /// Pick the cell size for a floor extent.
    pub fn cell_size_for_extent(extent: f32) -> f32 {
        for &(threshold, size) in &CELL_SIZE_TIERS {
            if extent > threshold {
                return size;
            }
        }
        CELL_SIZE_DEFAULT
    }

    /// Rasterize corridor polygons into a walkable grid.
    ///
    /// Fails with [`NavError::NoWalkableCorridors`] when no cell center
    /// falls inside any polygon.
    pub fn build(corridors: &[Corridor]) -> Result<Self> {
        let (min, max) = Self::bounds(corridors);
        let extent = (max.x - min.x).max(max.y - min.y);
        let cell_size = Self::cell_size_for_extent(extent);

        let width = (((max.x - min.x) / cell_size).ceil() as usize).max(1);
        let height = (((max.y - min.y) / cell_size).ceil() as usize).max(1);
        let total = width * height;

        let mut walkable = vec![false; total];
        let mut clearance = vec![0.0f32; total];
        let mut walkable_count = 0;

        for corridor in corridors {
            let polygon = &corridor.polygon;
            if polygon.len() < 3 {
                continue;
            }

            // Only cells under this polygon's bounding box are candidates.
            let (pmin, pmax) = Self::polygon_bounds(polygon);
            let gx0 = (((pmin.x - min.x) / cell_size).floor() as i32).max(0);
            let gy0 = (((pmin.y - min.y) / cell_size).floor() as i32).max(0);
            let gx1 = (((pmax.x - min.x) / cell_size).ceil() as i32).min(width as i32 - 1);
            let gy1 = (((pmax.y - min.y) / cell_size).ceil() as i32).min(height as i32 - 1);

            for gy in gy0..=gy1 {
                for gx in gx0..=gx1 {
                    let center = Point::new(
                        min.x + (gx as f32 + 0.5) * cell_size,
                        min.y + (gy as f32 + 0.5) * cell_size,
                    );
                    if !point_in_polygon(center, polygon) {
                        continue;
                    }

                    let idx = gy as usize * width + gx as usize;
                    let dist = point_to_polygon_edge_distance(center, polygon);
                    if !walkable[idx] {
                        walkable[idx] = true;
                        walkable_count += 1;
                        clearance[idx] = dist;
                    } else if dist > clearance[idx] {
                        // Overlapping polygons: keep the most generous
                        // clearance.
                        clearance[idx] = dist;
                    }
                }
            }
        }

        if walkable_count == 0 {
            return Err(NavError::NoWalkableCorridors);
        }

        debug!(
            "walkable grid: {}x{} cells at {}px, {} walkable",
            width, height, cell_size, walkable_count
        );

        Ok(Self {
            width,
            height,
            cell_size,
            origin: min,
            walkable,
            clearance,
            walkable_count,
        })
    }

    fn bounds(corridors: &[Corridor]) -> (Point, Point) {
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);

        for corridor in corridors {
            for p in &corridor.polygon {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
        }

        if min.x > max.x {
            (Point::ZERO, Point::ZERO)
        } else {
            (min, max)
        }
    }

    fn polygon_bounds(polygon: &[Point]) -> (Point, Point) {
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);
        for p in polygon {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell size in pixels.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of walkable cells.
    #[inline]
    pub fn walkable_count(&self) -> usize {
        self.walkable_count
    }

    /// Is the coordinate inside the grid?
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Is the cell walkable? Out-of-bounds cells are not.
    #[inline]
    pub fn is_walkable(&self, coord: GridCoord) -> bool {
        if !self.contains(coord) {
            return false;
        }
        self.walkable[coord.y as usize * self.width + coord.x as usize]
    }

    /// Clearance at a cell in pixels; 0.0 for non-walkable or
    /// out-of-bounds cells.
    #[inline]
    pub fn clearance(&self, coord: GridCoord) -> f32 {
        if !self.contains(coord) {
            return 0.0;
        }
        self.clearance[coord.y as usize * self.width + coord.x as usize]
    }

    /// Clearance expressed in cells rather than pixels.
    #[inline]
    pub fn clearance_cells(&self, coord: GridCoord) -> f32 {
        self.clearance(coord) / self.cell_size
    }

    /// Convert a world point to the grid cell containing it.
    #[inline]
    pub fn world_to_grid(&self, point: Point) -> GridCoord {
        GridCoord::new(
            ((point.x - self.origin.x) / self.cell_size).floor() as i32,
            ((point.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    /// World position of a cell's center.
    #[inline]
    pub fn cell_center(&self, coord: GridCoord) -> Point {
        Point::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (coord.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Find the walkable cell nearest to a world point by expanding ring
    /// search, up to `max_radius` cells. Returns `None` when exhausted.
    pub fn nearest_walkable(&self, point: Point, max_radius: i32) -> Option<GridCoord> {
        let center = self.world_to_grid(point);
        if self.is_walkable(center) {
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
                    if !self.is_walkable(coord) {
                        continue;
                    }
                    let d = self.cell_center(coord).distance(&point);
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
}
