//! `models` handler: per-model statistics over a batch of generated logs.

use tabled::Tabled;

use bedwatch_core::{ModelStats, model_stats};

use crate::cli::CountArgs;
use crate::commands::Ctx;
use crate::commands::util::{check_batch, generate_logs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Requests")]
    requests: u64,
    #[tabled(rename = "Avg Latency (ms)")]
    avg_latency: u64,
    #[tabled(rename = "Avg Tokens")]
    avg_tokens: u64,
    #[tabled(rename = "Input")]
    input: u64,
    #[tabled(rename = "Output")]
    output: u64,
}

fn model_row(s: &ModelStats) -> ModelRow {
    ModelRow {
        model: s.model.clone(),
        requests: s.requests,
        avg_latency: s.avg_latency(),
        avg_tokens: s.avg_tokens_per_request(),
        input: s.input_tokens,
        output: s.output_tokens,
    }
}

pub fn handle(args: &CountArgs, ctx: &Ctx) -> Result<(), CliError> {
    check_batch("count", args.count)?;
    let logs = generate_logs(ctx.monitor.seed, args.count);
    let stats = model_stats(&logs);

    let out = output::render_list(ctx.format, &stats, model_row, |s| s.model.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
