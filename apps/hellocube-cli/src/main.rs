use clap::{Parser, Subcommand};
use hellocube_assets::load_texture;
use hellocube_camera::{CameraRig, FreeLookCamera};
use hellocube_input::{InputEvent, load_trace};
use hellocube_scene::{DebugTextRenderer, Renderer, Scene, SceneKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hellocube-cli", about = "Headless tools for the cube demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and available scenes
    Info,
    /// Print the frame plan of a scene at a point in time
    Plan {
        /// Scene to describe
        #[arg(short, long, default_value = "gallery")]
        scene: SceneKind,
        /// Seconds since the scene started
        #[arg(short, long, default_value = "0")]
        time: f64,
    },
    /// Replay a JSON input trace through the camera and print its trajectory
    Replay {
        /// Path to a JSON array of input events
        #[arg(short, long)]
        trace: PathBuf,
        /// Also print this scene's frame plan as seen from the final camera
        #[arg(short, long)]
        scene: Option<SceneKind>,
        /// Clamp camera pitch to +/- this many degrees
        #[arg(long)]
        pitch_limit: Option<f32>,
    },
    /// Decode texture files and report their sizes
    Texture {
        /// Image files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Feed `events` through `rig`, returning one trajectory line per frame tick.
fn replay(rig: &mut CameraRig, events: &[InputEvent]) -> Vec<String> {
    let mut lines = Vec::new();
    for event in events {
        rig.handle(*event);
        if let InputEvent::Tick { now } = event {
            let cam = &rig.camera;
            lines.push(format!(
                "t={now:.3} pos=({:.3}, {:.3}, {:.3}) yaw={:.2} pitch={:.2}",
                cam.position.x, cam.position.y, cam.position.z, cam.yaw, cam.pitch
            ));
        }
    }
    lines
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("hellocube-cli v{}", env!("CARGO_PKG_VERSION"));
            for kind in SceneKind::ALL {
                let textures: Vec<&str> = kind.textures().iter().map(|t| t.file_name()).collect();
                println!(
                    "scene {kind}: free camera={}, textures={}",
                    kind.uses_free_camera(),
                    textures.join(", ")
                );
            }
        }
        Commands::Plan { scene, time } => {
            let mut scene = Scene::new(scene);
            // A single step from zero reaches `time` for scenes that accumulate.
            let plan = scene.plan(&FreeLookCamera::default(), time, time as f32);
            print!("{}", DebugTextRenderer::new().render(&plan));
        }
        Commands::Replay {
            trace,
            scene,
            pitch_limit,
        } => {
            let events = load_trace(&trace)?;
            tracing::info!("replaying {} events from {}", events.len(), trace.display());

            let camera = FreeLookCamera::default().with_pitch_limit(pitch_limit);
            let mut rig = CameraRig::new(camera, 0.0);
            for line in replay(&mut rig, &events) {
                println!("{line}");
            }
            let f = rig.camera.front;
            println!("final front=({:.4}, {:.4}, {:.4})", f.x, f.y, f.z);

            if let Some(kind) = scene {
                let now = rig.clock.last();
                let plan = Scene::new(kind).plan(&rig.camera, now, now as f32);
                print!("{}", DebugTextRenderer::new().render(&plan));
            }
        }
        Commands::Texture { files } => {
            let mut failed = 0usize;
            for path in &files {
                match load_texture(path) {
                    Ok(tex) => println!("{}: {}x{} OK", path.display(), tex.width, tex.height),
                    Err(e) => {
                        tracing::error!("{e}");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} textures failed to load", files.len());
            }
        }
    }

    Ok(())
}
