mod config;
mod interactive;
mod map;
mod pose;
mod project;
mod raycast;
mod render;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

// Re-export public API
pub use config::{ConfigError, RenderConfig};
pub use interactive::{InteractiveViewer, ViewerConfig};
pub use map::{Cell, GridMap, MapError, map_to_string};
pub use pose::{MotionConfig, MotionInput, Pose};
pub use project::{ColumnSlice, project, shade_for_distance};
pub use raycast::{GridDda, MarchAlgorithm, RayCaster, RayHit, StepMarcher, cast_ray};
pub use render::{Framebuffer, column_angle_offset, render_frame, render_frame_parallel, save_ppm};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Options shared by every mode
struct Options {
    mode: Mode,
    config: Option<PathBuf>,
    map: Option<PathBuf>,
}

enum Mode {
    Usage,
    Interactive,
    Benchmark,
    Snapshot(PathBuf),
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut opts = Options { mode: Mode::Usage, config: None, map: None };
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--interactive" => opts.mode = Mode::Interactive,
            "--benchmark" => opts.mode = Mode::Benchmark,
            "--snapshot" => {
                let path = iter.next().context("--snapshot needs an output path")?;
                opts.mode = Mode::Snapshot(PathBuf::from(path));
            }
            "--config" => {
                let path = iter.next().context("--config needs a JSON file")?;
                opts.config = Some(PathBuf::from(path));
            }
            "--map" => {
                let path = iter.next().context("--map needs a map file")?;
                opts.map = Some(PathBuf::from(path));
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(opts)
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let opts = parse_args(args)?;

    let render = match &opts.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let map = match &opts.map {
        Some(path) => load_map(path)?,
        None => GridMap::demo(),
    };

    match opts.mode {
        Mode::Usage => {
            println!("Grid Raycaster");
            println!("Run with --interactive for minifb viewer");
            println!("Run with --benchmark to test performance");
            println!("Run with --snapshot <file.ppm> to render one frame");
            println!("Options: --config <render.json> --map <map.txt>");
            Ok(())
        }
        Mode::Interactive => run_interactive(render, map),
        Mode::Benchmark => {
            run_benchmark(&render, &map);
            Ok(())
        }
        Mode::Snapshot(path) => run_snapshot(&render, &map, &path),
    }
}

fn load_map(path: &Path) -> anyhow::Result<GridMap> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading map {}", path.display()))?;
    let map = GridMap::from_char_rows(&text).with_context(|| format!("parsing map {}", path.display()))?;
    log::info!("Loaded {}x{} map from {}", map.width(), map.height(), path.display());
    log::debug!("Map layout:\n{}", map_to_string(&map));
    Ok(map)
}

fn run_snapshot(render: &RenderConfig, map: &GridMap, path: &Path) -> anyhow::Result<()> {
    let pose = ViewerConfig::default().start;
    let slices = render_frame(&pose, map, render);
    let mut fb = Framebuffer::for_config(render);
    fb.draw_columns(&slices, render);
    save_ppm(&fb, path).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}x{} frame to {}", fb.width, fb.height, path.display());
    Ok(())
}

fn run_benchmark(render: &RenderConfig, map: &GridMap) {
    use std::time::Instant;

    println!("=== Frame Render Benchmark ===\n");

    let iterations = 50;
    let pose = ViewerConfig::default().start;

    for algorithm in [MarchAlgorithm::Step, MarchAlgorithm::Dda] {
        let config = RenderConfig { algorithm, ..render.clone() };
        println!("Algorithm: {:?}, {} columns", algorithm, config.screen_width);
        println!("-----------------------");

        let start = Instant::now();
        for _ in 0..iterations {
            let _ = render_frame(&pose, map, &config);
        }
        let avg_sequential_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        let start = Instant::now();
        for _ in 0..iterations {
            let _ = render_frame_parallel(&pose, map, &config);
        }
        let avg_parallel_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        println!("  Sequential:      {:.3} ms/frame", avg_sequential_ms);
        println!("  Parallel (rayon): {:.3} ms/frame", avg_parallel_ms);
        println!("  Speedup: {:.2}x", avg_sequential_ms / avg_parallel_ms);
        println!(
            "  Estimated max FPS: {:.1} sequential, {:.1} parallel",
            1000.0 / avg_sequential_ms,
            1000.0 / avg_parallel_ms
        );
        println!();
    }
}

fn run_interactive(render: RenderConfig, map: GridMap) -> anyhow::Result<()> {
    let config = ViewerConfig { render, ..ViewerConfig::default() };
    let mut viewer = InteractiveViewer::new(config, map)
        .map_err(anyhow::Error::msg)
        .context("failed to create viewer")?;
    viewer.run().map_err(anyhow::Error::msg)
}
