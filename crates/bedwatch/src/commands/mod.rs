//! Command dispatch: bridges CLI args -> core generation -> output formatting.

pub mod config_cmd;
pub mod generate;
pub mod metrics;
pub mod models;
pub mod simulate;
pub mod util;

use bedwatch_core::MonitorConfig;

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;
use crate::output::Painter;

/// Resolved settings every data command runs with.
#[derive(Debug, Clone)]
pub struct Ctx {
    pub monitor: MonitorConfig,
    pub format: OutputFormat,
    pub painter: Painter,
    pub quiet: bool,
}

/// Dispatch a data command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::Generate(args) => generate::handle(args, ctx),
        Command::Metrics(args) => metrics::handle(&args, ctx),
        Command::Models(args) => models::handle(&args, ctx),
        Command::Simulate(args) => simulate::handle(&args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
