//! Interactive raycaster viewer - WASD walks the viewer through the map

use std::path::PathBuf;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::config::RenderConfig;
use crate::map::{Cell, GridMap};
use crate::pose::{MotionConfig, MotionInput, Pose};
use crate::raycast::cast_ray;
use crate::render::{Framebuffer, render_frame_parallel, save_ppm};

/// Configuration for the interactive viewer
#[derive(Clone)]
pub struct ViewerConfig {
    pub render: RenderConfig,
    pub motion: MotionConfig,
    /// Starting pose in world units
    pub start: Pose,
    /// Where the P key writes snapshots
    pub snapshot_path: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            motion: MotionConfig::default(),
            start: Pose::new(96.0, 96.0, 0.0),
            snapshot_path: PathBuf::from("snapshot.ppm"),
        }
    }
}

/// Interactive viewer owning the window, the map and the viewer pose
pub struct InteractiveViewer {
    config: ViewerConfig,
    map: GridMap,
    pose: Pose,
    window: Window,
    framebuffer: Framebuffer,
}

impl InteractiveViewer {
    /// Create a new interactive viewer for `map`
    pub fn new(config: ViewerConfig, map: GridMap) -> Result<Self, String> {
        let render = &config.render;
        let window = Window::new(
            "Grid Raycaster (ESC to exit)",
            render.pixel_width(),
            render.screen_height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        let pose = config.start;
        if map.cell_at_world(pose.x, pose.y, render.tile_size) != Some(Cell::Empty) {
            log::warn!(
                "Start pose ({:.1}, {:.1}) is not in an open cell; rays will report zero distance",
                pose.x,
                pose.y
            );
        }

        let framebuffer = Framebuffer::for_config(render);
        log::info!(
            "Viewer {}x{} px, {} columns, map {}x{}",
            render.pixel_width(),
            render.screen_height,
            render.screen_width,
            map.width(),
            map.height()
        );

        Ok(Self { config, map, pose, window, framebuffer })
    }

    /// Run the frame loop until the window closes or ESC is pressed
    pub fn run(&mut self) -> Result<(), String> {
        self.window.set_target_fps(60);

        println!("=== Grid Raycaster ===");
        println!("Controls:");
        println!("  W/S  - Move forward/back");
        println!("  A/D  - Turn left/right");
        println!("  F    - Toggle fisheye correction");
        println!("  M    - Toggle step marching / DDA");
        println!("  H    - Hide/show columns where no wall was hit");
        println!("  I    - Report the wall straight ahead");
        println!("  P    - Save snapshot");
        println!("  ESC  - Exit");
        println!();

        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            self.handle_toggles();

            let input = MotionInput {
                forward: self.window.is_key_down(Key::W),
                backward: self.window.is_key_down(Key::S),
                turn_left: self.window.is_key_down(Key::A),
                turn_right: self.window.is_key_down(Key::D),
            };
            self.pose.apply_motion(&input, &self.config.motion, &self.map, self.config.render.tile_size);

            let slices = render_frame_parallel(&self.pose, &self.map, &self.config.render);
            self.framebuffer.draw_columns(&slices, &self.config.render);

            if self.window.is_key_pressed(Key::P, KeyRepeat::No) {
                self.save_snapshot();
            }

            self.window
                .update_with_buffer(&self.framebuffer.pixels, self.framebuffer.width, self.framebuffer.height)
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    fn handle_toggles(&mut self) {
        let render = &mut self.config.render;
        if self.window.is_key_pressed(Key::F, KeyRepeat::No) {
            render.fisheye_correction = !render.fisheye_correction;
            log::debug!("Fisheye correction: {}", render.fisheye_correction);
        }
        if self.window.is_key_pressed(Key::M, KeyRepeat::No) {
            render.algorithm = render.algorithm.toggled();
            log::debug!("Algorithm: {:?}", render.algorithm);
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            render.draw_misses = !render.draw_misses;
            log::debug!("Draw misses: {}", render.draw_misses);
        }
        if self.window.is_key_pressed(Key::I, KeyRepeat::No) {
            self.report_ahead();
        }
    }

    fn report_ahead(&self) {
        let render = &self.config.render;
        let hit = cast_ray(&self.pose, 0.0, &self.map, render.tile_size, render.step_size, render.max_distance);
        match hit.cell {
            Some((x, y)) => println!(
                "Pose ({:.1}, {:.1}) facing {:.2}: wall at cell ({}, {}), {:.1} units",
                self.pose.x, self.pose.y, self.pose.facing, x, y, hit.distance
            ),
            None => println!(
                "Pose ({:.1}, {:.1}) facing {:.2}: no wall within {:.0} units",
                self.pose.x, self.pose.y, self.pose.facing, hit.distance
            ),
        }
    }

    fn save_snapshot(&self) {
        let path = &self.config.snapshot_path;
        match save_ppm(&self.framebuffer, path) {
            Ok(()) => log::info!("Saved snapshot to {}", path.display()),
            Err(e) => log::error!("Failed to save snapshot {}: {}", path.display(), e),
        }
    }
}
