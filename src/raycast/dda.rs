//! Grid-line traversal (DDA).
//!
//! Visits every cell the ray passes through by jumping from one grid line to
//! the next, so walls are found at their exact boundary and thin walls can
//! never be skipped.

use super::{RayCaster, RayHit};
use crate::map::{Cell, GridMap, world_to_grid};
use crate::pose::Pose;

/// Exact cell-by-cell caster
#[derive(Debug, Clone)]
pub struct GridDda {
    /// World units per grid cell
    pub tile_size: f32,
    /// Distance at which the traversal gives up
    pub max_distance: f32,
}

impl Default for GridDda {
    fn default() -> Self {
        GridDda { tile_size: 64.0, max_distance: 2000.0 }
    }
}

impl GridDda {
    pub fn new(tile_size: f32, max_distance: f32) -> Self {
        GridDda { tile_size, max_distance }
    }
}

/// Per-axis traversal state, in tile units along the ray
struct Axis {
    step: i64,
    delta: f32,
    next: f32,
}

impl Axis {
    fn new(origin: f32, cell: i64, dir: f32) -> Self {
        if dir == 0.0 {
            return Axis { step: 0, delta: f32::INFINITY, next: f32::INFINITY };
        }
        let delta = (1.0 / dir).abs();
        if dir < 0.0 {
            Axis { step: -1, delta, next: (origin - cell as f32) * delta }
        } else {
            Axis { step: 1, delta, next: (cell as f32 + 1.0 - origin) * delta }
        }
    }
}

impl RayCaster for GridDda {
    fn cast(&self, pose: &Pose, angle_offset: f32, map: &GridMap) -> RayHit {
        let (mut cx, mut cy) = world_to_grid(pose.x, pose.y, self.tile_size);
        match map.cell(cx, cy) {
            None => return RayHit::miss(self.max_distance),
            Some(Cell::Wall) => return RayHit::wall(0.0, (cx as usize, cy as usize)),
            Some(Cell::Empty) => {}
        }

        let angle = pose.facing + angle_offset;
        let (dx, dy) = (angle.cos(), angle.sin());
        let (ux, uy) = (pose.x / self.tile_size, pose.y / self.tile_size);
        let mut ax = Axis::new(ux, cx, dx);
        let mut ay = Axis::new(uy, cy, dy);

        // Every iteration moves one cell, so the ray leaves the map within
        // width + height steps at most.
        let limit = map.width() + map.height() + 2;
        for _ in 0..limit {
            let t = if ax.next <= ay.next {
                cx += ax.step;
                let t = ax.next;
                ax.next += ax.delta;
                t
            } else {
                cy += ay.step;
                let t = ay.next;
                ay.next += ay.delta;
                t
            };

            let distance = t * self.tile_size;
            if distance >= self.max_distance {
                break;
            }
            match map.cell(cx, cy) {
                None => break,
                Some(Cell::Wall) => return RayHit::wall(distance, (cx as usize, cy as usize)),
                Some(Cell::Empty) => {}
            }
        }

        RayHit::miss(self.max_distance)
    }
}
