//! `radgate` — terminal operator console for a radio-gateway appliance.
//!
//! Loads each section's settings over the device's control-plane API
//! (`GET <base>/<section>/info`), renders them as editable forms, and
//! re-submits them per section (`POST <base>/<section>/apply`) once the
//! diff and validation gates agree a save is necessary and safe.
//!
//! Logs are written to a file (default `/tmp/radgate.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use radgate_api::{ClientOptions, DeviceClient};

use crate::app::App;

/// Terminal console for configuring a radio-gateway appliance.
#[derive(Parser, Debug)]
#[command(name = "radgate", version, about)]
struct Cli {
    /// Device control-plane root (e.g., http://192.168.4.1/cgi-bin)
    #[arg(short = 'u', long, env = "RADGATE_DEVICE_URL")]
    url: Option<String>,

    /// Start in offline mode: render forms, never touch the network
    #[arg(long)]
    offline: bool,

    /// Log file path (defaults to /tmp/radgate.log)
    #[arg(long, default_value = "/tmp/radgate.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("radgate={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("radgate.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = radgate_config::load_config_or_default();

    let url_str = cli.url.clone().unwrap_or_else(|| config.device_url.clone());
    let base_url: url::Url = url_str
        .parse()
        .map_err(|e| eyre!("invalid device URL '{url_str}': {e}"))?;

    let mut options = ClientOptions::new(base_url);
    options.timeout = std::time::Duration::from_secs(config.timeout_secs);
    options.offline = cli.offline || config.offline;

    info!(
        url = %url_str,
        offline = options.offline,
        "starting radgate console"
    );

    let client = DeviceClient::new(options).map_err(|e| eyre!("client setup failed: {e}"))?;
    let mut app = App::new(client, config.autofill);
    app.run().await?;

    Ok(())
}
