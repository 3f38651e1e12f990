//! Layer 2: Column projection
//!
//! Turns a ray distance into the vertical wall slice drawn for one screen
//! column, with fisheye correction and distance shading.

use crate::config::RenderConfig;
use crate::raycast::RayHit;

/// Smallest distance used for projection; keeps heights finite at walls
pub const MIN_PROJECTED_DISTANCE: f32 = 0.1;

/// One vertical wall strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSlice {
    pub screen_x: usize,
    pub height: f32,
    /// Top edge in pixels; negative when the wall overflows the screen
    pub top_offset: f32,
    /// Gray level, 255 = nearest
    pub shade: u8,
    pub hit: bool,
}

impl ColumnSlice {
    /// Gray pixel in 0x00RRGGBB form
    #[inline]
    pub fn color(&self) -> u32 {
        let s = self.shade as u32;
        (s << 16) | (s << 8) | s
    }
}

/// Perpendicular distance used for wall height
#[inline]
pub fn corrected_distance(distance: f32, angle_offset: f32, fisheye_correction: bool) -> f32 {
    let d = if fisheye_correction { distance * angle_offset.cos() } else { distance };
    // NaN fails max() the wrong way, so map it to the floor explicitly
    if d.is_nan() { MIN_PROJECTED_DISTANCE } else { d.max(MIN_PROJECTED_DISTANCE) }
}

/// Linear distance falloff clamped to [0, 255]
#[inline]
pub fn shade_for_distance(distance: f32, falloff_rate: f32) -> u8 {
    let shade = 255.0 - distance * falloff_rate;
    if shade.is_nan() { 0 } else { shade.clamp(0.0, 255.0) as u8 }
}

/// Project a ray result onto screen column `screen_x`.
///
/// # Arguments
/// * `hit` - Ray result for this column
/// * `screen_x` - Column index
/// * `angle_offset` - The column's angle relative to the viewer facing
/// * `config` - Screen height, tile size, falloff and correction settings
pub fn project(hit: &RayHit, screen_x: usize, angle_offset: f32, config: &RenderConfig) -> ColumnSlice {
    let screen_height = config.screen_height as f32;
    let distance = corrected_distance(hit.distance, angle_offset, config.fisheye_correction);
    let height = config.tile_size * screen_height / distance;

    ColumnSlice {
        screen_x,
        height,
        top_offset: (screen_height - height) / 2.0,
        shade: shade_for_distance(hit.distance, config.falloff_rate),
        hit: hit.hit,
    }
}
