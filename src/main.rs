//! padpoll - frame-based gamepad polling
//!
//! Polls connected controllers once per frame and prints the edges each frame
//! produced. A scripted session can be replayed through the virtual device
//! layer without any hardware.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use padpoll::config::AppConfig;
use padpoll::input::gamepad::{
    DeviceLayer, FrameReport, GamepadHub, ReplayScript, VirtualLayer,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// padpoll - per-frame gamepad state with edge detection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "padpoll.yaml")]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Replay a scripted session through the virtual device layer
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Stop live polling after this many frames (0 = run until interrupted)
    #[arg(long, default_value = "0")]
    frames: u64,

    /// Print one JSON object per frame instead of coloured text
    #[arg(long)]
    json: bool,

    /// Print a summary of the connected devices and exit
    #[arg(long)]
    diagnostics: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting padpoll...");
    let config = AppConfig::load_or_default(&args.config)?;
    info!("Configuration file: {}", args.config.display());

    if let Some(script) = &args.replay {
        return run_replay(script, &config, args.json);
    }

    if args.diagnostics {
        return run_diagnostics(&config, args.json);
    }

    run_live(&config, args.frames, args.json)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Frame output owns stdout
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

fn emit(report: &FrameReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else if !report.is_quiet() {
        println!("{}", report.render());
    }
    Ok(())
}

fn run_replay(path: &Path, config: &AppConfig, json: bool) -> Result<()> {
    let script = ReplayScript::load(path)?;
    info!("Replaying {} frame(s) from {}", script.frames.len(), path.display());

    let mut hub = GamepadHub::new(VirtualLayer::new(), config.gamepad.response_defaults());

    for (frame, step) in script.frames.iter().enumerate() {
        step.apply(hub.layer_mut())?;
        for edge in &step.synthetic {
            if edge.down {
                hub.queue_press(edge.device, edge.slot)?;
            } else {
                hub.queue_release(edge.device, edge.slot)?;
            }
        }

        let changed = hub.poll_once()?;
        emit(&FrameReport::capture(frame as u64, changed, &hub), json)?;
    }

    if !json {
        println!("{}", format!("{} frame(s) replayed", script.frames.len()).cyan());
    }
    Ok(())
}

/// Drive `hub` at the configured frame rate
#[cfg_attr(not(feature = "gilrs"), allow(dead_code))]
fn poll_loop<L: DeviceLayer>(
    hub: &mut GamepadHub<L>,
    config: &AppConfig,
    frames: u64,
    json: bool,
) -> Result<()> {
    let period = std::time::Duration::from_millis(config.gamepad.poll_interval_ms);
    let mut frame = 0;

    while frames == 0 || frame < frames {
        let changed = hub.poll_once()?;
        emit(&FrameReport::capture(frame, changed, hub), json)?;
        frame += 1;
        std::thread::sleep(period);
    }
    Ok(())
}

#[cfg(feature = "gilrs")]
fn open_live_hub(config: &AppConfig) -> Result<GamepadHub<padpoll::input::gamepad::GilrsLayer>> {
    let layer = padpoll::input::gamepad::GilrsLayer::new(config.gamepad.mapping_db.as_deref())?;
    Ok(GamepadHub::new(layer, config.gamepad.response_defaults()))
}

#[cfg(feature = "gilrs")]
fn run_live(config: &AppConfig, frames: u64, json: bool) -> Result<()> {
    let mut hub = open_live_hub(config)?;
    info!("Polling every {} ms", config.gamepad.poll_interval_ms);
    poll_loop(&mut hub, config, frames, json)
}

#[cfg(feature = "gilrs")]
fn run_diagnostics(config: &AppConfig, json: bool) -> Result<()> {
    use padpoll::input::gamepad::describe_devices;

    let mut hub = open_live_hub(config)?;

    info!("⏳ Waiting for gamepads to connect (5 seconds)...");
    info!("   (Bluetooth controllers may take a moment to wake up)");
    let start = std::time::Instant::now();
    while start.elapsed() < std::time::Duration::from_secs(5) {
        hub.poll_once()?;
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    let summaries = describe_devices(&hub);
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }
    Ok(())
}

#[cfg(not(feature = "gilrs"))]
fn run_live(_config: &AppConfig, _frames: u64, _json: bool) -> Result<()> {
    anyhow::bail!("live polling needs the `gilrs` feature; rebuild with `--features gilrs` or use --replay")
}

#[cfg(not(feature = "gilrs"))]
fn run_diagnostics(_config: &AppConfig, _json: bool) -> Result<()> {
    anyhow::bail!("device diagnostics need the `gilrs` feature; rebuild with `--features gilrs`")
}
