//! Autofill overlay engine.
//!
//! Main entry point: configuration checks and scenario replay against the
//! in-memory hosts.

mod cli;
mod simulate;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use autofill_overlay_config::{ConfigLoader, ConfigValidator, LoggingConfig, OverlayConfig};

use cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files are written to the configured directory with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = PathBuf::from(ConfigLoader::expand_path(&logging.directory));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("autofill-overlay")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The worker guard flushes on drop, so it has to outlive main.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Explicit path, else `~/.autofill-overlay/config.toml` when present, else defaults.
fn load_config(path: Option<&Path>) -> Result<OverlayConfig, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(ConfigLoader::load(path)?);
    }
    match ConfigLoader::default_path() {
        Some(path) if path.exists() => Ok(ConfigLoader::load(&path)?),
        _ => Ok(OverlayConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Check => check_config(&config),
        Commands::Simulate { scenario, pretty } => {
            run_simulation(&scenario, config, pretty).await
        }
    }
}

fn check_config(config: &OverlayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(config).into_result()?;
    for warning in &warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    info!(
        max_depth = config.sub_frame.max_depth,
        warnings = warnings.len(),
        "Configuration is valid"
    );
    println!("Configuration OK ({} warning(s))", warnings.len());
    Ok(())
}

async fn run_simulation(
    path: &Path,
    config: OverlayConfig,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(scenario = %path.display(), "Replaying scenario");
    let scenario = simulate::load_scenario(path)?;
    let report = simulate::run(&scenario, config).await?;

    let output = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");
    Ok(())
}
