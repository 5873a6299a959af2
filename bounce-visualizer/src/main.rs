use anyhow::{bail, Context, Result};
use bounce_common::{Color, Renderer, SimulationConfig, Snapshot, Vec2};
use clap::Parser;
use env_logger::Builder;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about = "Render recorded snapshots to PNG frames", long_about = None)]
struct Args {
    /// Input snapshot file path (.json, .bin or .msgpack)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory that receives frame_00000.png, frame_00001.png, ...
    #[arg(short, long, default_value = "frames")]
    output_dir: PathBuf,

    /// Width of the output frames in pixels (defaults to the region width)
    #[arg(long)]
    width: Option<u32>,

    /// Optional path to the config.toml file to get exact region dimensions
    #[arg(long)]
    config: Option<PathBuf>,

    /// Region width (used if config is not provided)
    #[arg(long, default_value_t = 800.0)]
    world_width: f64,

    /// Region height (used if config is not provided)
    #[arg(long, default_value_t = 600.0)]
    world_height: f64,

    /// Background colour: CSS name or #rrggbb
    #[arg(long, default_value = "black")]
    bg_color: String,

    /// Render every n-th snapshot only
    #[arg(long, default_value_t = 1)]
    every: usize,
}

/// Image-backed renderer. Region coordinates are scaled by `scale`; both use
/// y growing downward so no flip is needed.
struct Canvas {
    image: RgbaImage,
    scale: f64,
}

impl Canvas {
    fn new(width: u32, height: u32, scale: f64, background: Color) -> Self {
        Canvas {
            image: RgbaImage::from_pixel(width, height, Rgba(background.to_rgba())),
            scale,
        }
    }
}

impl Renderer for Canvas {
    fn render(&mut self, position: Vec2, radius: f64, color: Color) {
        // position is the top-left corner of the bounding square
        let cx = ((position.x + radius) * self.scale).round() as i32;
        let cy = ((position.y + radius) * self.scale).round() as i32;
        let r = (radius * self.scale).round().max(1.0) as i32;
        draw_filled_circle_mut(&mut self.image, (cx, cy), r, Rgba(color.to_rgba()));
    }
}

/// Draw one snapshot into a fresh frame
fn draw_frame(snapshot: &Snapshot, width: u32, height: u32, scale: f64, background: Color) -> RgbaImage {
    let mut canvas = Canvas::new(width, height, scale, background);
    snapshot.draw(&mut canvas);
    canvas.image
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{:05}.png", index))
}

/// Reads snapshots written by the engine, picking the decoder from the extension.
fn load_snapshots(path: &Path) -> Result<Vec<Snapshot>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let snapshots: Vec<Snapshot> = match extension.as_str() {
        "json" => serde_json::from_reader(reader).context("Failed to decode JSON snapshots")?,
        "bin" => bincode::deserialize_from(reader).context("Failed to decode bincode snapshots")?,
        "msgpack" => rmp_serde::from_read(reader).context("Failed to decode MessagePack snapshots")?,
        other => bail!("Unsupported snapshot extension '{}' (expected json, bin or msgpack)", other),
    };
    Ok(snapshots)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger
    Builder::from_default_env()
        .filter(None, LevelFilter::Info)
        .init();

    info!("Starting Snapshot Visualizer...");
    info!("Input file: {}", args.input.display());
    info!("Output directory: {}", args.output_dir.display());

    // --- Determine Region Dimensions ---
    let (world_width, world_height) = match &args.config {
        Some(config_path) => match SimulationConfig::load(config_path) {
            Ok(config) => {
                info!("Loaded region dimensions from {}", config_path.display());
                let params = config.get_sim_params();
                (params.world_width, params.world_height)
            }
            Err(e) => {
                warn!(
                    "Failed to load config file '{}': {:#}. Using provided dimensions.",
                    config_path.display(),
                    e
                );
                (args.world_width, args.world_height)
            }
        },
        None => (args.world_width, args.world_height),
    };
    if !(world_width > 0.0 && world_height > 0.0) {
        bail!("Region dimensions must be positive, got {}x{}", world_width, world_height);
    }

    let width_px = args.width.unwrap_or(world_width.round() as u32).max(1);
    let scale = width_px as f64 / world_width;
    let height_px = ((world_height * scale).round() as u32).max(1);
    let background = Color::parse(&args.bg_color)?;
    info!("Frame dimensions: {}x{} (scale {:.3})", width_px, height_px, scale);

    // --- Load Snapshots ---
    let snapshots = load_snapshots(&args.input)?;
    if snapshots.is_empty() {
        bail!("No snapshots found in {}", args.input.display());
    }
    let every = args.every.max(1);
    let selected: Vec<&Snapshot> = snapshots.iter().step_by(every).collect();
    info!("Loaded {} snapshots, rendering {}", snapshots.len(), selected.len());

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    // --- Render Frames (Parallel) ---
    let start_time = Instant::now();
    let progress_bar = ProgressBar::new(selected.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) [{eta}]")?
            .progress_chars("#>-"),
    );

    selected
        .par_iter()
        .enumerate()
        .progress_with(progress_bar.clone())
        .try_for_each(|(index, snapshot)| -> Result<()> {
            let frame = draw_frame(snapshot, width_px, height_px, scale, background);
            let path = frame_path(&args.output_dir, index);
            frame
                .save(&path)
                .with_context(|| format!("Failed to write frame {}", path.display()))
        })?;
    progress_bar.finish_with_message("done");

    let duration = start_time.elapsed();
    info!(
        "Rendered {} frames in {:.2?} ({:.1} frames per second)",
        selected.len(),
        duration,
        selected.len() as f64 / duration.as_secs_f64().max(1e-9)
    );
    Ok(())
}

// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use bounce_common::ParticleSnapshot;

    fn snapshot_with(position: Vec2, radius: f64, color: Color) -> Snapshot {
        Snapshot {
            step: 0,
            time: 0.0,
            total_energy: 0.0,
            particles: vec![ParticleSnapshot {
                name: "ball".to_string(),
                position,
                velocity: Vec2::zero(),
                radius,
                color,
                kinetic_energy: 0.0,
                potential_energy: 0.0,
            }],
        }
    }

    #[test]
    fn circle_is_drawn_around_particle_center() {
        let red = Color::rgb(255, 0, 0);
        let snapshot = snapshot_with(Vec2::new(40.0, 20.0), 10.0, red);
        let frame = draw_frame(&snapshot, 100, 80, 1.0, Color::BLACK);

        assert_eq!(frame.get_pixel(50, 30).0, red.to_rgba());
        assert_eq!(frame.get_pixel(5, 5).0, Color::BLACK.to_rgba());
        assert_eq!(frame.get_pixel(50, 45).0, Color::BLACK.to_rgba());
    }

    #[test]
    fn scale_maps_region_to_pixels() {
        let blue = Color::rgb(0, 0, 255);
        let snapshot = snapshot_with(Vec2::new(380.0, 280.0), 20.0, blue);
        let frame = draw_frame(&snapshot, 400, 300, 0.5, Color::WHITE);

        // center (400, 300) in region units lands on (200, 150)
        assert_eq!(frame.get_pixel(200, 150).0, blue.to_rgba());
        assert_eq!(frame.get_pixel(200, 135).0, Color::WHITE.to_rgba());
    }

    #[test]
    fn frame_paths_are_zero_padded() {
        let path = frame_path(Path::new("out"), 42);
        assert_eq!(path, Path::new("out").join("frame_00042.png"));
    }

    #[test]
    fn loads_json_snapshots() {
        let dir = std::env::temp_dir().join(format!("bounce-visualizer-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshots.json");
        let snapshots = vec![snapshot_with(Vec2::new(1.0, 2.0), 3.0, Color::WHITE)];
        fs::write(&path, serde_json::to_string(&snapshots).unwrap()).unwrap();

        let loaded = load_snapshots(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].particles, snapshots[0].particles);

        assert!(load_snapshots(&dir.join("snapshots.txt")).is_err());
        fs::remove_dir_all(&dir).ok();
    }
}
