//! Reverie player entry point.

use std::error::Error;

use reverie_audio::backend::AudioBackend;
use reverie_narrative::manifest::{NarrativeManifest, REFERENCE_MANIFEST_YAML};
use reverie_player::config::{LogFormat, PlayerConfig};
use reverie_player::driver::Player;
use reverie_player::error::AppError;
use reverie_player::renderer::TerminalRenderer;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "playback")]
fn audio_backend(config: &PlayerConfig) -> Result<Box<dyn AudioBackend>, AppError> {
    let backend = reverie_player::playback::RodioBackend::open(&config.asset_root)?;
    Ok(Box::new(backend))
}

#[cfg(not(feature = "playback"))]
#[allow(clippy::unnecessary_wraps)]
fn audio_backend(config: &PlayerConfig) -> Result<Box<dyn AudioBackend>, AppError> {
    Ok(Box::new(reverie_player::backend::LoggingBackend::new(
        &config.asset_root,
    )))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = PlayerConfig::from_env()?;

    // Initialize tracing subscriber. Stdout is the stage, so logs go to stderr.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Pretty => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::info!(?config, "Starting Reverie player");

    let manifest = match &config.manifest {
        Some(path) => NarrativeManifest::load(path)?,
        None => NarrativeManifest::from_yaml_str(REFERENCE_MANIFEST_YAML)?,
    };
    let sequencer = manifest.build(audio_backend(&config)?)?;

    let mut player = Player::new(
        sequencer,
        TerminalRenderer::new(std::io::stdout()),
        config.control_period(),
    );
    player.start()?;
    if config.start_muted {
        player.toggle_mute()?;
    }

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    player
        .run(BufReader::new(tokio::io::stdin()), shutdown)
        .await?;

    tracing::info!("Reverie player stopped");
    Ok(())
}
