mod config;
mod core;
mod error;
mod input;
mod player;
mod playback;
mod session;

use anyhow::{Context, Result};
use config::ShuttleConfig;
use input::{parse_line, KeyCommandMapper};
use player::{Player, SimulatedPlayer};
use playback::ShuttleController;
use session::{Session, ShuttleEvent};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_MEDIA_DURATION: f64 = 120.0;

/// Forward stdin lines to the session until EOF
async fn read_terminal(events: mpsc::Sender<ShuttleEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if let Some(event) = parse_line(&line) {
            let shutdown = event == ShuttleEvent::Shutdown;
            if events.send(event).await.is_err() || shutdown {
                break;
            }
            if events.send(ShuttleEvent::Status).await.is_err() {
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let duration = match args.next() {
        Some(arg) => arg
            .parse::<f64>()
            .with_context(|| format!("Invalid media duration: {}", arg))?,
        None => DEFAULT_MEDIA_DURATION,
    };

    let config = ShuttleConfig::load_or_default(config_path.as_deref());

    // Create tokio runtime for the clock and the terminal reader
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    let result = rt.block_on(async move {
        let (controller, ticks) = ShuttleController::new(SimulatedPlayer::new(duration), &config);
        let session = Session::new(controller, ticks, KeyCommandMapper::from_config(&config));

        let (tx, rx) = mpsc::channel(64);
        tx.send(ShuttleEvent::Help).await.ok();
        let reader = tokio::spawn(read_terminal(tx));

        info!("Simulating {:.1}s of media at {} fps, type keys and press enter ('help', 'quit')", duration, config.fps);
        let controller = session.run(rx).await?;
        reader.abort();

        let player = controller.player();
        info!(
            "Final position {:.3}s, readout {}, markers {:?}, native playback {}",
            player.current_time(),
            player.rate_label(),
            player.markers(),
            if player.is_playing() { "running" } else { "paused" }
        );
        Ok::<_, anyhow::Error>(())
    });

    // stdin is read on a blocking thread that would otherwise hold up exit
    rt.shutdown_background();
    result
}
