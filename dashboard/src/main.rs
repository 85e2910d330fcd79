//! gesture-dashboard - pinch-driven smart-home dashboard.
//!
//! Replays hand landmarks through the interaction core at a fixed frame
//! rate, recording user actions to the activity log.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use gesture_dashboard::{
    activity::CsvActivityLog,
    backend::{self, LoopConfig},
    config::{parse_resolution, DashboardConfig},
    render::{RendererSet, SnapshotWriter, TraceRenderer},
    source::ReplaySource,
    state::DashboardState,
    ui::RoomLayout,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gesture-dashboard", about = "Gesture-controlled smart-home dashboard")]
struct Cli {
    /// Landmark replay file (JSON lines, normalized coordinates)
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Room geometry JSON (default: built-in floor plan)
    #[arg(long)]
    rooms: Option<PathBuf>,

    /// Activity log file
    #[arg(long, default_value = "activity_log.csv")]
    activity_log: PathBuf,

    /// Write per-frame snapshots as JSON lines ("-" for stdout)
    #[arg(long)]
    snapshots: Option<String>,

    /// Capture resolution as WxH
    #[arg(long, default_value = "1280x720")]
    resolution: String,

    /// Frame rate cap in Hz (0 = uncapped)
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Cursor smoothing factor in (0, 1]
    #[arg(long)]
    smoothing: Option<f32>,

    /// Exit after N frames (testing)
    #[arg(long)]
    exit_after_frames: Option<u64>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("gesture-dashboard {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_dashboard=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("gesture-dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let (width, height) = parse_resolution(&cli.resolution)
        .ok_or_else(|| anyhow!("invalid --resolution '{}', expected WxH", cli.resolution))?;
    let mut config = DashboardConfig::for_resolution(width, height);
    config.frame_rate = cli.fps;
    if let Some(smoothing) = cli.smoothing {
        config.tracker.smoothing = smoothing;
    }
    config.validate().context("invalid configuration")?;

    // Camera/landmark acquisition failure is fatal before the loop starts
    let landmarks = cli
        .landmarks
        .ok_or_else(|| anyhow!("no landmark source: pass --landmarks <FILE>"))?;
    let mut source = ReplaySource::open(&landmarks, width as f32, height as f32)?;

    let layout = RoomLayout::load(cli.rooms.as_deref(), config.floorplan());
    let activity = CsvActivityLog::new(cli.activity_log);

    let mut renderers = RendererSet::new();
    renderers.push(Box::new(TraceRenderer));
    match cli.snapshots.as_deref() {
        Some("-") => renderers.push(Box::new(SnapshotWriter::stdout())),
        Some(path) => renderers.push(Box::new(SnapshotWriter::create(path.as_ref())?)),
        None => {}
    }

    let loop_config = LoopConfig {
        frame_rate: config.frame_rate,
        exit_after_frames: cli.exit_after_frames,
        ..Default::default()
    };
    let mut state = DashboardState::new(config, layout, Box::new(activity));

    // Signal handling via libc
    backend::install_signal_handlers();

    let summary = backend::run(&mut state, &mut source, &mut renderers, &loop_config);
    info!(
        "gesture-dashboard exiting ({}) after {} frames",
        summary.reason.as_str(),
        summary.frames,
    );
    Ok(())
}
