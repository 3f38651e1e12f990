//! Tests for the raycasting pipeline

use std::f32::consts::{FRAC_PI_2, PI};

use crate::{
    Cell, GridMap, MarchAlgorithm, MotionConfig, MotionInput, Pose, RayCaster, RenderConfig,
    StepMarcher, ViewerConfig, cast_ray, project, render_frame, render_frame_parallel,
};

const TILE: f32 = 64.0;

/// 8 columns x 6 rows, border walls, empty interior
fn walled_room() -> GridMap {
    GridMap::bordered(8, 6).unwrap()
}

#[test]
fn test_run_usage() {
    assert!(crate::run(&[]).is_ok());
    assert!(crate::run(&["--bogus".to_string()]).is_err());
    assert!(crate::run(&["--snapshot".to_string()]).is_err());
}

#[test]
fn test_default_start_is_open_and_renders_depth() {
    let map = GridMap::demo();
    let viewer = ViewerConfig::default();
    let start = viewer.start;
    assert_eq!(map.cell_at_world(start.x, start.y, viewer.render.tile_size), Some(Cell::Empty));

    // The frame --snapshot and --benchmark draw
    let slices = render_frame(&start, &map, &viewer.render);
    let shaded = slices.iter().filter(|s| s.shade < 255).count();
    println!("{} of {} columns shaded", shaded, slices.len());
    assert!(shaded > 0);
    assert!(slices.iter().all(|s| s.height < viewer.render.screen_height as f32 * 4.0));

    // And the viewer can walk away from it
    let mut pose = start;
    let fwd = MotionInput { forward: true, ..Default::default() };
    let moved = (0..20).any(|_| pose.apply_motion(&fwd, &MotionConfig::default(), &map, viewer.render.tile_size));
    assert!(moved);
}

#[test]
fn test_distance_within_step_of_true_distance() {
    let map = walled_room();
    // Interior spans x in [64, 448), y in [64, 320)
    let step = 0.25;
    let positions = [(100.0, 100.0), (200.0, 150.0), (400.0, 300.0), (70.0, 250.0)];

    for &(x, y) in &positions {
        // East, south, west, north
        let expected = [448.0 - x, 320.0 - y, x - 64.0, y - 64.0];
        for (k, facing) in [0.0, FRAC_PI_2, PI, -FRAC_PI_2].into_iter().enumerate() {
            let pose = Pose::new(x, y, facing);
            let hit = cast_ray(&pose, 0.0, &map, TILE, step, 2000.0);
            assert!(hit.hit, "({}, {}) facing {}", x, y, facing);
            let err = hit.distance - expected[k];
            assert!(
                err > -1e-3 && err <= step + 1e-3,
                "({}, {}) facing {}: got {}, expected {}",
                x,
                y,
                facing,
                hit.distance,
                expected[k]
            );
        }
    }
}

#[test]
fn test_edge_facing_outward_misses() {
    // No border: a viewer at the edge looking out leaves the grid at once
    let map = GridMap::new(vec![vec![0; 4]; 4]).unwrap();
    let pose = Pose::new(255.5, 128.0, 0.0);
    for offset in [-0.3, 0.0, 0.3] {
        let hit = cast_ray(&pose, offset, &map, TILE, 1.0, 900.0);
        assert!(!hit.hit);
        assert_eq!(hit.distance, 900.0);
    }
}

#[test]
fn test_backing_away_increases_distance_and_darkens() {
    let map = walled_room();
    let config = RenderConfig { falloff_rate: 0.5, ..RenderConfig::default() };
    let marcher = StepMarcher::new(TILE, 0.5, 2000.0);

    let mut last_distance = 0.0;
    let mut last_shade = u8::MAX;
    // Facing east, stepping west away from the east wall
    for i in 0..8 {
        let pose = Pose::new(440.0 - i as f32 * 40.0, 200.0, 0.0);
        let hit = marcher.cast(&pose, 0.0, &map);
        let slice = project(&hit, 0, 0.0, &config);

        assert!(hit.distance > last_distance);
        if last_shade > 0 {
            assert!(slice.shade < last_shade || slice.shade == 0);
        }
        last_distance = hit.distance;
        last_shade = slice.shade;
    }
}

#[test]
fn test_render_is_idempotent() {
    let map = GridMap::demo();
    let pose = Pose::new(200.0, 100.0, 1.2);
    let config = RenderConfig::default();

    let first = render_frame(&pose, &map, &config);
    let second = render_frame(&pose, &map, &config);
    assert_eq!(first, second);
    assert_eq!(first, render_frame_parallel(&pose, &map, &config));
    assert_eq!(first.len(), config.screen_width);
}

#[test]
fn test_symmetric_room_scenario() {
    // Viewer in cell (2,2) facing east across the room
    let map = walled_room();
    let pose = Pose::new(160.0, 160.0, 0.0);
    let config = RenderConfig {
        screen_width: 8,
        screen_height: 400,
        fov: PI / 3.0,
        step_size: 0.1,
        falloff_rate: 0.4,
        ..RenderConfig::default()
    };

    let slices = render_frame(&pose, &map, &config);
    assert_eq!(slices.len(), 8);

    let heights: Vec<f32> = slices.iter().map(|s| s.height).collect();
    let min = heights.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = heights.iter().cloned().fold(0.0, f32::max);
    println!("Heights: {:?}", heights);

    for (i, s) in slices.iter().enumerate() {
        assert_eq!(s.screen_x, i);
        assert!(s.hit);
        assert!(s.height.is_finite() && s.height > 0.0);
        assert!(s.shade >= 120, "column {} shade {}", i, s.shade);
    }
    // Every wall in view is within a few tiles, heights stay comparable
    assert!(max / min < 2.0, "heights vary too much: {:?}", heights);
}

#[test]
fn test_wall_one_tile_ahead_scenario() {
    let map = walled_room();
    // 64 units west of the interior face of the east wall
    let pose = Pose::new(384.0, 200.0, 0.0);
    let hit = cast_ray(&pose, 0.0, &map, TILE, 0.1, 2000.0);
    assert!(hit.hit);
    assert!(
        hit.distance >= TILE - 1.0 && hit.distance <= TILE + 0.1,
        "distance {}",
        hit.distance
    );
}

#[test]
fn test_viewer_inside_wall_renders_finite_frame() {
    let map = GridMap::demo();
    let pose = Pose::new(150.0, 150.0, 0.0); // cell (2,2) is a pillar
    for algorithm in [MarchAlgorithm::Step, MarchAlgorithm::Dda] {
        let config = RenderConfig { algorithm, ..RenderConfig::default() };
        for slice in render_frame(&pose, &map, &config) {
            assert!(slice.hit);
            assert!(slice.height.is_finite());
            assert_eq!(slice.shade, 255);
        }
    }
}

#[test]
fn test_fisheye_flattens_facing_wall() {
    // Square-on to a flat wall, corrected heights are nearly constant
    let map = GridMap::bordered(30, 30).unwrap();
    let pose = Pose::new(960.0, 960.0, 0.0);
    let config = RenderConfig {
        screen_width: 32,
        fov: PI / 4.0,
        algorithm: MarchAlgorithm::Dda,
        ..RenderConfig::default()
    };

    let corrected = render_frame(&pose, &map, &config);
    let spread = |slices: &[crate::ColumnSlice]| {
        let hs: Vec<f32> = slices.iter().map(|s| s.height).collect();
        hs.iter().cloned().fold(0.0, f32::max) - hs.iter().cloned().fold(f32::INFINITY, f32::min)
    };
    assert!(spread(&corrected) < 0.5, "spread {}", spread(&corrected));

    let bowed = render_frame(&pose, &map, &RenderConfig { fisheye_correction: false, ..config });
    assert!(spread(&bowed) > spread(&corrected));
}
