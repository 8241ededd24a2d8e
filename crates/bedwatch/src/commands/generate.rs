//! `generate` subcommand handlers.

use tabled::Tabled;

use bedwatch_core::{BedrockLog, ChatMessage, Generator, SecurityEvent, normalize_model_name};

use crate::cli::{GenerateArgs, GenerateCommand};
use crate::commands::Ctx;
use crate::commands::util::{check_batch, generate_logs};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Request ID")]
    request_id: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "In")]
    input: u32,
    #[tabled(rename = "Out")]
    output: u32,
    #[tabled(rename = "Latency (ms)")]
    latency: u64,
}

fn log_row(log: &BedrockLog) -> LogRow {
    LogRow {
        time: log.timestamp.format("%H:%M:%S").to_string(),
        request_id: log.request_id.clone(),
        model: normalize_model_name(&log.model_id).to_owned(),
        user: log.username().to_owned(),
        region: log.region.clone(),
        operation: log.operation.clone(),
        input: log.input_token_count(),
        output: log.output_token_count(),
        latency: log.latency_ms(),
    }
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Threat Type")]
    threat: String,
    #[tabled(rename = "Detail")]
    detail: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

fn event_row(event: &SecurityEvent) -> EventRow {
    EventRow {
        time: event.timestamp.format("%H:%M:%S").to_string(),
        threat: event.threat_type.to_string(),
        detail: event.detail.clone(),
        risk: event.risk.to_string(),
        user: event.username.clone(),
        ip: event.ip.clone(),
        status: if event.resolved { "resolved" } else { "open" },
    }
}

#[derive(Tabled)]
struct ChatRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Role")]
    role: &'static str,
    #[tabled(rename = "Message")]
    content: String,
}

fn chat_row(msg: &ChatMessage) -> ChatRow {
    ChatRow {
        time: msg.time.clone(),
        role: msg.role.label(),
        content: msg.content.clone(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: GenerateArgs, ctx: &Ctx) -> Result<(), CliError> {
    let seed = ctx.monitor.seed;
    let out = match args.command {
        GenerateCommand::Logs(n) => {
            check_batch("count", n.count)?;
            let logs = generate_logs(seed, n.count);
            output::render_list(ctx.format, &logs, log_row, |l| l.request_id.clone())?
        }
        GenerateCommand::Events(n) => {
            check_batch("count", n.count)?;
            let mut generator = Generator::from_seed(seed);
            let events: Vec<SecurityEvent> = (0..n.count)
                .map(|_| generator.generate_security_event())
                .collect();
            output::render_list(ctx.format, &events, event_row, |e| e.id.to_string())?
        }
        GenerateCommand::Chat(n) => {
            check_batch("count", n.count)?;
            let mut generator = Generator::from_seed(seed);
            let chat: Vec<ChatMessage> = (0..n.count)
                .map(|_| generator.generate_chat_message())
                .collect();
            output::render_list(ctx.format, &chat, chat_row, |m| m.id.clone())?
        }
    };

    output::print_output(&out, ctx.quiet);
    Ok(())
}
