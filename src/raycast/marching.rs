//! Fixed-step ray marching.
//!
//! Walks along the ray in increments of `step_size` world units and samples
//! the grid cell under each point. There is no refinement step, so a reported
//! distance overshoots the true wall boundary by less than one step.

use super::{RayCaster, RayHit};
use crate::map::{Cell, GridMap, world_to_grid};
use crate::pose::Pose;

/// Fixed-step marcher
#[derive(Debug, Clone)]
pub struct StepMarcher {
    /// World units per grid cell
    pub tile_size: f32,
    /// March increment in world units
    pub step_size: f32,
    /// Distance at which the march gives up
    pub max_distance: f32,
}

impl Default for StepMarcher {
    fn default() -> Self {
        StepMarcher {
            tile_size: 64.0,
            step_size: 0.5,
            max_distance: 2000.0,
        }
    }
}

impl StepMarcher {
    pub fn new(tile_size: f32, step_size: f32, max_distance: f32) -> Self {
        StepMarcher { tile_size, step_size, max_distance }
    }

    /// Number of samples before the march is exhausted
    #[inline]
    fn max_steps(&self) -> u32 {
        (self.max_distance / self.step_size).ceil() as u32
    }
}

impl RayCaster for StepMarcher {
    fn cast(&self, pose: &Pose, angle_offset: f32, map: &GridMap) -> RayHit {
        // A zero, negative or NaN step never advances
        if !(self.step_size > 0.0) {
            return RayHit::miss(self.max_distance);
        }

        // Origin first, so "standing in a wall" is distance 0 with a hit
        // rather than a wall found one step away.
        let (ox, oy) = world_to_grid(pose.x, pose.y, self.tile_size);
        match map.cell(ox, oy) {
            None => return RayHit::miss(self.max_distance),
            Some(Cell::Wall) => return RayHit::wall(0.0, (ox as usize, oy as usize)),
            Some(Cell::Empty) => {}
        }

        let angle = pose.facing + angle_offset;
        let (dx, dy) = (angle.cos(), angle.sin());

        // Distance is recomputed from the step count each time; summing
        // `step_size` drifts over thousands of steps.
        for n in 1..=self.max_steps() {
            let distance = n as f32 * self.step_size;
            if distance >= self.max_distance {
                break;
            }

            let (gx, gy) = world_to_grid(
                pose.x + dx * distance,
                pose.y + dy * distance,
                self.tile_size,
            );
            match map.cell(gx, gy) {
                None => return RayHit::miss(self.max_distance),
                Some(Cell::Wall) => return RayHit::wall(distance, (gx as usize, gy as usize)),
                Some(Cell::Empty) => {}
            }
        }

        RayHit::miss(self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wall_one_tile_ahead() {
        // Corridor: viewer on the cell (1,1)/(2,1) seam, wall boundary at x=192
        let map = GridMap::new(vec![
            vec![1, 1, 1, 1],
            vec![1, 0, 0, 1],
            vec![1, 1, 1, 1],
        ])
        .unwrap();
        let pose = Pose::new(128.0, 96.0, 0.0);
        let marcher = StepMarcher::new(64.0, 0.1, 2000.0);
        let hit = marcher.cast(&pose, 0.0, &map);

        assert!(hit.hit);
        assert_eq!(hit.cell, Some((3, 1)));
        assert!(hit.distance >= 63.0 && hit.distance <= 64.1, "distance {}", hit.distance);
    }

    #[test]
    fn test_inside_wall_is_zero_hit() {
        let map = GridMap::demo();
        let pose = Pose::new(10.0, 10.0, 0.0);
        let hit = StepMarcher::default().cast(&pose, 0.0, &map);
        assert_eq!(hit, RayHit::wall(0.0, (0, 0)));
    }

    #[test]
    fn test_origin_outside_map_misses() {
        let map = GridMap::demo();
        let pose = Pose::new(-50.0, 100.0, 0.0);
        let hit = StepMarcher::default().cast(&pose, 0.0, &map);
        assert_eq!(hit, RayHit::miss(2000.0));
    }

    #[test]
    fn test_exits_open_edge() {
        // Open row: the ray leaves the grid without striking a wall
        let map = GridMap::new(vec![vec![0, 0, 0], vec![0, 0, 0]]).unwrap();
        let pose = Pose::new(160.0, 32.0, 0.0);
        let hit = StepMarcher::new(64.0, 1.0, 500.0).cast(&pose, 0.0, &map);
        assert!(!hit.hit);
        assert_eq!(hit.distance, 500.0);
    }

    #[test]
    fn test_non_advancing_step_misses() {
        let map = GridMap::bordered(5, 5).unwrap();
        let pose = Pose::new(160.0, 160.0, 0.0);
        for step in [0.0, -1.0, f32::NAN] {
            let hit = crate::raycast::cast_ray(&pose, 0.0, &map, 64.0, step, 500.0);
            assert_eq!(hit, RayHit::miss(500.0), "step {}", step);
        }
    }

    #[test]
    fn test_range_exhausted() {
        let map = GridMap::bordered(40, 3).unwrap();
        let pose = Pose::new(96.0, 96.0, 0.0);
        let hit = StepMarcher::new(64.0, 1.0, 100.0).cast(&pose, 0.0, &map);
        assert_eq!(hit, RayHit::miss(100.0));
    }

    #[test]
    fn test_axis_aligned_angles() {
        // ±π/2 and π need no special handling
        let map = GridMap::bordered(5, 5).unwrap();
        let pose = Pose::new(160.0, 160.0, 0.0);
        let marcher = StepMarcher::new(64.0, 0.5, 2000.0);
        for offset in [PI / 2.0, -PI / 2.0, PI, 0.0] {
            let hit = marcher.cast(&pose, offset, &map);
            assert!(hit.hit);
            assert!((hit.distance - 96.0).abs() <= 0.5 + 1e-3, "offset {} -> {}", offset, hit.distance);
        }
    }
}
