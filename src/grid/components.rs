//! Corridor connectivity and guide analysis.
//!
//! Flood-fills walkable cells into 4-connected components ("corridor
//! segments") and derives a preferred centerline per component: an
//! orientation plus a clearance-weighted guide coordinate on the minor
//! axis. Paths hug the guide, which biases search away from walls and
//! corners.

use std::collections::VecDeque;

use crate::core::GridCoord;

use super::builder::WalkableGrid;

/// Dominant axis of a corridor component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Wider than tall; the guide is a row index
    Horizontal,
    /// Taller than wide; the guide is a column index
    Vertical,
}

/// A maximal 4-connected set of walkable cells.
#[derive(Clone, Debug)]
pub struct CorridorComponent {
    /// Component id, equal to its index in [`ComponentMap::components`]
    pub id: usize,
    /// Minimum cell coordinate of the component's extent
    pub min: GridCoord,
    /// Maximum cell coordinate of the component's extent
    pub max: GridCoord,
    /// Number of cells in the component
    pub cell_count: usize,
    /// Dominant axis
    pub orientation: Orientation,
    /// Clearance-weighted mean of the minor-axis index (row if horizontal,
    /// column if vertical)
    pub guide: f32,
}

impl CorridorComponent {
    /// Extent along the major axis, in cells.
    pub fn major_extent(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.max.x - self.min.x + 1,
            Orientation::Vertical => self.max.y - self.min.y + 1,
        }
    }
}

/// Component labels for every walkable cell plus per-component summaries.
#[derive(Clone, Debug)]
pub struct ComponentMap {
    width: usize,
    /// Component id per cell, row-major; `NO_COMPONENT` for non-walkable
    labels: Vec<u32>,
    components: Vec<CorridorComponent>,
}

const NO_COMPONENT: u32 = u32::MAX;

impl ComponentMap {
    /// Flood-fill the grid's walkable cells into components and compute
    /// each component's orientation and guide.
    pub fn analyze(grid: &WalkableGrid) -> Self {
        let width = grid.width();
        let height = grid.height();
        let mut labels = vec![NO_COMPONENT; width * height];
        let mut components = Vec::new();

        let neighbors = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let mut queue = VecDeque::new();

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let seed = GridCoord::new(x, y);
                let seed_idx = y as usize * width + x as usize;
                if !grid.is_walkable(seed) || labels[seed_idx] != NO_COMPONENT {
                    continue;
                }

                let id = components.len() as u32;
                let mut min = seed;
                let mut max = seed;
                let mut cell_count = 0usize;
                // Accumulators for the clearance-weighted guide on both
                // axes; orientation is only known after the fill.
                let mut weight_sum = 0.0f32;
                let mut weighted_row = 0.0f32;
                let mut weighted_col = 0.0f32;

                labels[seed_idx] = id;
                queue.push_back(seed);

                while let Some(cur) = queue.pop_front() {
                    cell_count += 1;
                    min.x = min.x.min(cur.x);
                    min.y = min.y.min(cur.y);
                    max.x = max.x.max(cur.x);
                    max.y = max.y.max(cur.y);

                    // A cell center can sit arbitrarily close to an edge;
                    // keep the weight positive so thin cells still count.
                    let w = grid.clearance(cur).max(1e-3);
                    weight_sum += w;
                    weighted_row += w * cur.y as f32;
                    weighted_col += w * cur.x as f32;

                    for &(dx, dy) in &neighbors {
                        let next = GridCoord::new(cur.x + dx, cur.y + dy);
                        if !grid.is_walkable(next) {
                            continue;
                        }
                        let next_idx = next.y as usize * width + next.x as usize;
                        if labels[next_idx] == NO_COMPONENT {
                            labels[next_idx] = id;
                            queue.push_back(next);
                        }
                    }
                }

                let w = max.x - min.x + 1;
                let h = max.y - min.y + 1;
                let orientation = if w >= h {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                let guide = match orientation {
                    Orientation::Horizontal => weighted_row / weight_sum,
                    Orientation::Vertical => weighted_col / weight_sum,
                };

                components.push(CorridorComponent {
                    id: id as usize,
                    min,
                    max,
                    cell_count,
                    orientation,
                    guide,
                });
            }
        }

        Self {
            width,
            labels,
            components,
        }
    }

    /// Component id of a cell, or `None` for non-walkable/out-of-bounds.
    #[inline]
    pub fn component_of(&self, coord: GridCoord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 || coord.x as usize >= self.width {
            return None;
        }
        let idx = coord.y as usize * self.width + coord.x as usize;
        match self.labels.get(idx) {
            Some(&label) if label != NO_COMPONENT => Some(label as usize),
            _ => None,
        }
    }

    /// All components found on the floor.
    #[inline]
    pub fn components(&self) -> &[CorridorComponent] {
        &self.components
    }

    /// Look up a component by id.
    #[inline]
    pub fn component(&self, id: usize) -> Option<&CorridorComponent> {
        self.components.get(id)
    }
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

    #[test]
    fn test_single_component() {
        let corridors = vec![rect_corridor("c", 0.0, 0.0, 200.0, 40.0)];
        let grid = WalkableGrid::build(&corridors).unwrap();
        let cmap = ComponentMap::analyze(&grid);

        assert_eq!(cmap.components().len(), 1);
        let comp = &cmap.components()[0];
        assert_eq!(comp.orientation, Orientation::Horizontal);
        assert_eq!(comp.cell_count, grid.walkable_count());
    }

    #[test]
    fn test_disconnected_corridors_get_distinct_components() {
        let corridors = vec![
            rect_corridor("a", 0.0, 0.0, 100.0, 40.0),
            rect_corridor("b", 300.0, 0.0, 400.0, 40.0),
        ];
        let grid = WalkableGrid::build(&corridors).unwrap();
        let cmap = ComponentMap::analyze(&grid);

        assert_eq!(cmap.components().len(), 2);

        let a = cmap.component_of(grid.world_to_grid(Point::new(50.0, 20.0)));
        let b = cmap.component_of(grid.world_to_grid(Point::new(350.0, 20.0)));
        assert!(a.is_some());
        assert!(b.is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn test_vertical_orientation_and_guide() {
        let corridors = vec![rect_corridor("v", 0.0, 0.0, 40.0, 300.0)];
        let grid = WalkableGrid::build(&corridors).unwrap();
        let cmap = ComponentMap::analyze(&grid);

        let comp = &cmap.components()[0];
        assert_eq!(comp.orientation, Orientation::Vertical);

        // The guide column should sit near the middle of the corridor.
        let mid_col = (comp.min.x + comp.max.x) as f32 / 2.0;
        assert!((comp.guide - mid_col).abs() <= 1.0);
    }

    #[test]
    fn test_component_of_non_walkable_is_none() {
        let corridors = vec![rect_corridor("c", 0.0, 0.0, 100.0, 40.0)];
        let grid = WalkableGrid::build(&corridors).unwrap();
        let cmap = ComponentMap::analyze(&grid);

        assert_eq!(cmap.component_of(GridCoord::new(-1, 0)), None);
        assert_eq!(cmap.component_of(GridCoord::new(1000, 1000)), None);
    }
}
