//! Layer 3: Frame rendering and rasterization
//!
//! `render_frame` produces one `ColumnSlice` per screen column, left to right.
//! `Framebuffer` is the drawing side: it turns slices into filled rectangles
//! in a 0x00RRGGBB pixel buffer that minifb can present or we can save as PPM.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::map::GridMap;
use crate::pose::Pose;
use crate::project::{ColumnSlice, project};
use crate::raycast::RayCaster;

/// Angle of column `i` relative to the viewer facing
#[inline]
pub fn column_angle_offset(i: usize, config: &RenderConfig) -> f32 {
    -config.fov / 2.0 + (i as f32 / config.screen_width as f32) * config.fov
}

#[inline]
fn render_column(
    caster: &dyn RayCaster,
    pose: &Pose,
    map: &GridMap,
    config: &RenderConfig,
    i: usize,
) -> ColumnSlice {
    let offset = column_angle_offset(i, config);
    let hit = caster.cast(pose, offset, map);
    project(&hit, i, offset, config)
}

/// Render all columns sequentially.
///
/// Output depends only on the arguments; calling twice with the same pose
/// and map gives identical slices.
pub fn render_frame(pose: &Pose, map: &GridMap, config: &RenderConfig) -> Vec<ColumnSlice> {
    let caster = config.caster();
    (0..config.screen_width)
        .map(|i| render_column(caster.as_ref(), pose, map, config, i))
        .collect()
}

/// Render all columns on the rayon pool. Same output as `render_frame`.
pub fn render_frame_parallel(pose: &Pose, map: &GridMap, config: &RenderConfig) -> Vec<ColumnSlice> {
    let caster = config.caster();
    let caster = caster.as_ref();
    // Indexed collect keeps column order
    (0..config.screen_width)
        .into_par_iter()
        .map(|i| render_column(caster, pose, map, config, i))
        .collect()
}

/// Pixel buffer in 0x00RRGGBB format (minifb layout), row-major
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer { width, height, pixels: vec![0u32; width * height] }
    }

    /// Framebuffer sized for `config`
    pub fn for_config(config: &RenderConfig) -> Self {
        Self::new(config.pixel_width(), config.screen_height)
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: usize, y: f32, w: usize, h: f32, color: u32) {
        if x >= self.width || !(h > 0.0) {
            return;
        }
        let x1 = (x + w).min(self.width);
        let y0 = y.round().clamp(0.0, self.height as f32) as usize;
        let y1 = (y + h).round().clamp(0.0, self.height as f32) as usize;

        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x..start + x1].fill(color);
        }
    }

    /// Draw one frame: black background, one rectangle per slice.
    /// Misses are left black when `config.draw_misses` is off.
    pub fn draw_columns(&mut self, slices: &[ColumnSlice], config: &RenderConfig) {
        self.clear(0);
        for slice in slices {
            if !slice.hit && !config.draw_misses {
                continue;
            }
            self.fill_rect(
                slice.screen_x * config.column_width,
                slice.top_offset,
                config.column_width,
                slice.height,
                slice.color(),
            );
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// Save a framebuffer to a plain-text PPM file
pub fn save_ppm(fb: &Framebuffer, path: &Path) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "P3")?;
    writeln!(file, "{} {}", fb.width, fb.height)?;
    writeln!(file, "255")?;

    for y in 0..fb.height {
        for x in 0..fb.width {
            let p = fb.pixel(x, y);
            write!(file, "{} {} {} ", (p >> 16) & 0xFF, (p >> 8) & 0xFF, p & 0xFF)?;
        }
        writeln!(file)?;
    }

    file.flush()
}
