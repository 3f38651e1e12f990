//! Layer 1: Ray casting (pure geometry)
//!
//! This module provides different algorithms for finding the first wall along
//! a ray through the grid. All algorithms implement the `RayCaster` trait.

pub mod dda;
pub mod marching;

use serde::{Deserialize, Serialize};

pub use dda::GridDda;
pub use marching::StepMarcher;

use crate::map::GridMap;
use crate::pose::Pose;

/// Result of casting one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Radial distance to the wall, or the max distance on a miss
    pub distance: f32,
    /// False when the ray ran out of range or left the map
    pub hit: bool,
    /// Grid cell of the wall that stopped the ray
    pub cell: Option<(usize, usize)>,
}

impl RayHit {
    /// A ray that found nothing within `max_distance`
    pub fn miss(max_distance: f32) -> Self {
        RayHit { distance: max_distance, hit: false, cell: None }
    }

    /// A ray stopped by the wall at `cell`
    pub fn wall(distance: f32, cell: (usize, usize)) -> Self {
        RayHit { distance, hit: true, cell: Some(cell) }
    }
}

/// Trait for grid ray casting algorithms.
///
/// Implementations only read the pose and map.
pub trait RayCaster: Send + Sync {
    /// Cast a ray along `pose.facing + angle_offset`.
    ///
    /// # Arguments
    /// * `pose` - Ray origin and base facing
    /// * `angle_offset` - Offset from the facing, in radians
    /// * `map` - Occupancy grid
    ///
    /// # Returns
    /// Distance to the first wall, or a miss at the caster's max distance.
    /// Leaving the grid counts as a miss, never as a wall.
    fn cast(&self, pose: &Pose, angle_offset: f32, map: &GridMap) -> RayHit;
}

/// Which caster the frame renderer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarchAlgorithm {
    /// Fixed-step marching
    #[default]
    Step,
    /// Exact grid-line traversal
    Dda,
}

impl MarchAlgorithm {
    pub fn toggled(self) -> Self {
        match self {
            MarchAlgorithm::Step => MarchAlgorithm::Dda,
            MarchAlgorithm::Dda => MarchAlgorithm::Step,
        }
    }
}

/// Cast a single ray with the fixed-step marcher.
pub fn cast_ray(
    pose: &Pose,
    angle_offset: f32,
    map: &GridMap,
    tile_size: f32,
    step_size: f32,
    max_distance: f32,
) -> RayHit {
    StepMarcher::new(tile_size, step_size, max_distance).cast(pose, angle_offset, map)
}
