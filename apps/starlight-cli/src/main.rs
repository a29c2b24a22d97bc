use anyhow::Context;
use clap::{Parser, Subcommand};
use starlight_assets::{load_obj, shapes};
use starlight_input::{InputEvent, MoveKey};
use starlight_kernel::{DriverConfig, DriverState, FrameDriver, Player, default_scene};
use starlight_render::{DebugTextRenderer, Renderer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starlight-cli", about = "Headless tooling for the starlight renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load an OBJ model and report its geometry
    Inspect {
        /// Path to the OBJ file
        path: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the frame driver against the text renderer
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "3")]
        frames: u32,
        /// Simulated time between frames, in milliseconds
        #[arg(long, default_value = "16")]
        step_ms: u64,
        /// OBJ model to place in the scene; the pyramid mesh stands in if absent
        #[arg(long)]
        model: Option<PathBuf>,
        /// Hold the forward key for the whole run
        #[arg(long)]
        walk: bool,
        /// Horizontal mouse counts fed in before every frame
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        turn: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("starlight-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", starlight_common::crate_info());
            println!("input: {}", starlight_input::crate_info());
            println!("assets: {}", starlight_assets::crate_info());
            println!("render: {}", starlight_render::crate_info());
            println!("kernel: {}", starlight_kernel::crate_info());
        }
        Commands::Inspect { path, json } => {
            let mesh = load_obj(&path)
                .with_context(|| format!("failed to load model {}", path.display()))?;
            let summary = mesh.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Model: {}", path.display());
                println!("  vertices:  {}", summary.vertex_count);
                println!("  indices:   {}", summary.index_count);
                println!("  triangles: {}", summary.triangle_count);
                if let Some((lo, hi)) = mesh.bounds() {
                    println!("  bounds:    {lo} .. {hi}");
                }
            }
        }
        Commands::Simulate {
            frames,
            step_ms,
            model,
            walk,
            turn,
        } => {
            let model = match &model {
                Some(path) => load_obj(path)
                    .with_context(|| format!("failed to load model {}", path.display()))?,
                None => shapes::pyramid(),
            };

            let mut renderer = DebugTextRenderer::new();
            renderer.resize(1000, 800);
            let (scene, _) = default_scene(&mut renderer, &model)?;

            let start = Instant::now();
            let mut driver =
                FrameDriver::new(DriverConfig::default(), Player::default(), scene, start);
            if walk {
                driver.input_mut().handle(InputEvent::KeyDown(MoveKey::Forward));
            }

            let step = Duration::from_millis(step_ms);
            let mut now = start;
            for _ in 0..frames {
                now += step;
                if turn != 0.0 {
                    driver
                        .input_mut()
                        .handle(InputEvent::MouseDelta { dx: turn, dy: 0.0 });
                }
                if driver.tick(now, &mut renderer)? == DriverState::Terminating {
                    break;
                }
                print!("{}", renderer.last_output());
            }

            let player = driver.player();
            println!(
                "Simulated {} frames: position={} yaw={:.3} pitch={:.3}",
                driver.ticks(),
                player.position(),
                player.yaw(),
                player.pitch()
            );
        }
    }

    Ok(())
}
