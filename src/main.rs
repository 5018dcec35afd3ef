//! PoE Trade Notifier - trade-whisper monitoring for the Path of Exile client log.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use poe_trade_notifier::config::ConfigLoader;
use poe_trade_notifier::display::{self, ConsoleSink};
use poe_trade_notifier::monitor::{MonitorConfig, MonitorSupervisor, SessionState};

/// How often the watch loop checks that the monitor is still running.
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(
    name = "poe-trade-notifier",
    about = "Trade-whisper monitor for the Path of Exile client log",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use a specific config file instead of the default search paths.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the client log and print incoming trade whispers.
    Watch {
        /// Log file to tail, overriding the configured one.
        #[arg(long)]
        log_file: Option<PathBuf>,
        /// Disable the terminal bell on each trade.
        #[arg(long)]
        no_bell: bool,
    },
    /// Store the client log path in the config file.
    SetLogFile {
        /// Path of the client log, e.g. ".../Path of Exile/logs/Client.txt".
        path: PathBuf,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = match cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };

    let result = match cli.command {
        Commands::Watch { log_file, no_bell } => run_watch(&loader, log_file, no_bell).await,
        Commands::SetLogFile { path } => run_set_log_file(&loader, path),
    };

    if let Err(e) = result {
        display::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Tail the configured log and print trade whispers until Ctrl-C.
async fn run_watch(
    loader: &ConfigLoader,
    log_file: Option<PathBuf>,
    no_bell: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match log_file {
        // A flag-supplied path becomes the configured one for later runs.
        Some(path) => {
            let (config, written) = loader.set_log_file(path)?;
            tracing::debug!(path = %written.display(), "Persisted log file from flag");
            config
        }
        None => loader.load()?,
    };
    if !config.has_log_file() {
        return Err(
            "No log file configured. Run `poe-trade-notifier set-log-file <path>` \
             or pass --log-file."
                .into(),
        );
    }

    let sink = Arc::new(ConsoleSink::new(config.currency_color_map.clone()).with_bell(!no_bell));
    let mut supervisor = MonitorSupervisor::new(sink);
    supervisor
        .reconfigure(MonitorConfig::new(config.log_file.clone()))
        .await?;
    display::print_watch_start(&config.log_file);

    let mut health = tokio::time::interval(HEALTH_CHECK_INTERVAL);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            _ = health.tick() => {
                let running = matches!(
                    supervisor.status(),
                    Some(status) if status.state != SessionState::Stopped
                );
                if !running {
                    return Err(
                        "Monitor stopped unexpectedly; the log file may no longer be readable."
                            .into(),
                    );
                }
            }
        }
    }

    let clean = supervisor.stop().await;
    display::print_watch_stopped(clean);
    Ok(())
}

/// Persist the log file path for later `watch` runs.
fn run_set_log_file(
    loader: &ConfigLoader,
    path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Log file does not exist yet");
    }

    let (config, written) = loader.set_log_file(path)?;

    println!("Set log_file = {}", config.log_file.display());
    println!("Config written to {}", written.display());
    Ok(())
}
