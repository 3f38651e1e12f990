//! Viewer state and the held-keys motion translator

use std::f32::consts::{PI, TAU};

use crate::map::{Cell, GridMap};

/// Viewer position in world units and facing angle in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub facing: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, facing: f32) -> Self {
        Pose { x, y, facing: wrap_angle(facing) }
    }

    /// Unit vector along `facing`
    #[inline]
    pub fn direction(&self) -> (f32, f32) {
        (self.facing.cos(), self.facing.sin())
    }

    /// Rotate by `delta` radians, keeping facing in [-π, π)
    pub fn rotate(&mut self, delta: f32) {
        self.facing = wrap_angle(self.facing + delta);
    }

    /// Apply one frame of held-key motion.
    ///
    /// Turning happens first so that forward motion follows the new facing.
    /// A move is dropped entirely when its destination lies in a wall or
    /// outside the map. Returns true if the position changed.
    pub fn apply_motion(
        &mut self,
        input: &MotionInput,
        motion: &MotionConfig,
        map: &GridMap,
        tile_size: f32,
    ) -> bool {
        if input.turn_left {
            self.rotate(-motion.turn_speed);
        }
        if input.turn_right {
            self.rotate(motion.turn_speed);
        }

        let (dx, dy) = self.direction();
        let mut step = 0.0;
        if input.forward {
            step += motion.move_speed;
        }
        if input.backward {
            step -= motion.move_speed;
        }
        if step == 0.0 {
            return false;
        }

        let nx = self.x + dx * step;
        let ny = self.y + dy * step;
        if map.cell_at_world(nx, ny, tile_size) != Some(Cell::Empty) {
            return false;
        }

        self.x = nx;
        self.y = ny;
        true
    }
}

/// Wrap an angle into [-π, π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Held-key state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Per-frame motion increments (one unit timestep per frame)
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// World units moved per frame
    pub move_speed: f32,
    /// Radians turned per frame
    pub turn_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            move_speed: 3.0,
            turn_speed: 3.0f32.to_radians(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 64.0;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.0)).abs() < 1e-6);
        assert!((wrap_angle(PI) + PI).abs() < 1e-5);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-5.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        for i in -100..100 {
            let a = wrap_angle(i as f32 * 0.37);
            assert!((-PI..PI).contains(&a), "{} out of range", a);
        }
    }

    #[test]
    fn test_forward_and_back() {
        let map = GridMap::demo();
        let mut pose = Pose::new(160.0, 96.0, 0.0);
        let motion = MotionConfig::default();

        let fwd = MotionInput { forward: true, ..Default::default() };
        assert!(pose.apply_motion(&fwd, &motion, &map, TILE));
        assert!((pose.x - 163.0).abs() < 1e-4);
        assert!((pose.y - 96.0).abs() < 1e-4);

        let back = MotionInput { backward: true, ..Default::default() };
        assert!(pose.apply_motion(&back, &motion, &map, TILE));
        assert!((pose.x - 160.0).abs() < 1e-4);

        // Both keys cancel out
        let both = MotionInput { forward: true, backward: true, ..Default::default() };
        assert!(!pose.apply_motion(&both, &motion, &map, TILE));
    }

    #[test]
    fn test_turning_wraps() {
        let map = GridMap::demo();
        let mut pose = Pose::new(160.0, 96.0, -PI + 0.01);
        let motion = MotionConfig::default();
        let left = MotionInput { turn_left: true, ..Default::default() };

        assert!(!pose.apply_motion(&left, &motion, &map, TILE));
        assert!(pose.facing > 0.0, "facing should wrap to positive side: {}", pose.facing);
        assert!((-PI..PI).contains(&pose.facing));
    }

    #[test]
    fn test_wall_blocks_motion() {
        // Cell (1,1) is open, (0,1) is the left border wall
        let map = GridMap::demo();
        let mut pose = Pose::new(66.0, 96.0, PI);
        let motion = MotionConfig::default();
        let fwd = MotionInput { forward: true, ..Default::default() };

        assert!(!pose.apply_motion(&fwd, &motion, &map, TILE));
        assert_eq!((pose.x, pose.y), (66.0, 96.0));
    }

    #[test]
    fn test_leaving_map_blocked() {
        let map = GridMap::new(vec![vec![0, 0], vec![0, 0]]).unwrap();
        let mut pose = Pose::new(1.0, 64.0, PI);
        let motion = MotionConfig::default();
        let fwd = MotionInput { forward: true, ..Default::default() };

        assert!(!pose.apply_motion(&fwd, &motion, &map, TILE));
        assert_eq!(pose.x, 1.0);
    }
}
