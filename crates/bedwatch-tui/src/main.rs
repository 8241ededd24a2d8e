//! `bedwatch-tui` — live terminal dashboard for simulated GenAI traffic.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `bedwatch-core`'s [`Monitor`](bedwatch_core::Monitor). Screens are
//! navigable via number keys (1-4): Dashboard, Statistics, Chat, Security.
//!
//! Logs are written to a file (default `/tmp/bedwatch-tui.log`) so they
//! never corrupt the terminal. A background data bridge task forwards
//! every feed change from the producer into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
#[cfg(test)]
mod test_support;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bedwatch_core::{Monitor, MonitorConfig};

use crate::app::App;

/// Terminal dashboard for simulated GenAI security monitoring.
#[derive(Parser, Debug)]
#[command(name = "bedwatch-tui", version, about)]
struct Cli {
    /// Seed the generator for a reproducible session
    #[arg(long, env = "BEDWATCH_SEED")]
    seed: Option<u64>,

    /// Config file path (defaults to the platform config dir)
    #[arg(long, env = "BEDWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long, default_value = "/tmp/bedwatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may reach stdout/stderr while the TUI owns
/// the terminal. The returned guard must outlive the app so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bedwatch_tui={log_level},bedwatch_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("bedwatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the producer config: file + environment, then `--seed`.
fn monitor_config(cli: &Cli) -> Result<MonitorConfig> {
    let cfg = match &cli.config {
        Some(path) => bedwatch_config::load_config_from(path)?,
        None => bedwatch_config::load_config()?,
    };
    let mut monitor = cfg.monitor.to_monitor_config()?;
    if cli.seed.is_some() {
        monitor.seed = cli.seed;
    }
    Ok(monitor)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a panic during terminal setup still restores it
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = monitor_config(&cli)?;
    info!(
        seed = ?config.seed,
        log_capacity = config.log_capacity,
        "starting bedwatch-tui"
    );

    let mut app = App::new(Monitor::new(config));
    app.run().await?;

    Ok(())
}
