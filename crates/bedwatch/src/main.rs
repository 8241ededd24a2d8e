mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::commands::Ctx;
use crate::error::CliError;
use crate::output::Painter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "bedwatch", &mut std::io::stdout());
            Ok(())
        }

        // Config commands manage the file itself
        Command::Config(ref args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let ctx = build_ctx(&cli.global)?;
            tracing::debug!(command = ?cmd, seed = ?ctx.monitor.seed, "dispatching command");
            commands::dispatch(cmd, &ctx).await
        }
    }
}

/// Resolve the config file, then apply CLI flag overrides.
fn build_ctx(global: &GlobalOpts) -> Result<Ctx, CliError> {
    let path = commands::config_cmd::resolve_path(global);
    let cfg = commands::config_cmd::load(&path)?;

    let mut monitor = cfg
        .monitor
        .to_monitor_config()
        .map_err(|e| CliError::config(path.display(), e))?;
    if global.seed.is_some() {
        monitor.seed = global.seed;
    }

    // Both values were validated on load
    let format = global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Table)
    });
    let color = global.color.unwrap_or_else(|| {
        ColorMode::from_str(&cfg.defaults.color, true).unwrap_or(ColorMode::Auto)
    });

    Ok(Ctx {
        monitor,
        format,
        painter: Painter::new(output::should_color(color)),
        quiet: global.quiet,
    })
}
