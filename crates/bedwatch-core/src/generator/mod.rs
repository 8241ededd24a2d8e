// ── Synthetic record generator ──
//
// Produces model-invocation logs, security events and chat turns from
// fixed vocabularies. All randomness comes from a `RandomSource`, and
// draws happen in a fixed order so scripted sources give exact output.

pub mod source;
pub mod vocab;

use std::ops::Range;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Map;
use uuid::Uuid;

use crate::model::{
    BedrockLog, ChatMessage, ChatRole, Identity, InferenceConfig, InputBody, InvocationInput,
    InvocationMetrics, InvocationOutput, Message, MessageRole, OutputBody, OutputEnvelope,
    RiskLevel, SecurityEvent, THREAT_TYPES, Usage,
};

pub use source::{EntropySource, RandomSource, ScriptedSource};

use vocab::{
    ACCOUNT_ID, CONTENT_TYPE_JSON, IDENTITY_ARN_PREFIX, INFERENCE_REGIONS, MAX_TOKEN_BUDGETS,
    MODEL_IDS, OPERATIONS, PROMPTS, REGIONS, RESPONSES, SCHEMA_TYPE, SCHEMA_VERSION,
    STOP_REASON_END_TURN, USERNAMES,
};

/// Wall-clock used to stamp generated records.
pub type Clock = fn() -> DateTime<Utc>;

/// Record generator over a [`RandomSource`].
pub struct Generator<S = Box<dyn RandomSource>> {
    source: S,
    clock: Clock,
}

impl Generator<EntropySource> {
    /// Seeded when `seed` is set, OS entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let source = seed.map_or_else(EntropySource::from_os, EntropySource::seeded);
        Self::new(source)
    }
}

impl<S: RandomSource> Generator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: Utc::now,
        }
    }

    /// Replace the clock (tests pin timestamps with this).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// `true` with probability `p`, drawn from this generator's source.
    pub fn chance(&mut self, p: f64) -> bool {
        self.source.chance(p)
    }

    /// Producer period drawn uniformly from `range_ms`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        clippy::as_conversions
    )]
    pub fn draw_period(&mut self, range_ms: Range<u64>) -> Duration {
        let span = range_ms.end.saturating_sub(range_ms.start);
        let offset = (self.source.unit() * span as f64) as u64;
        Duration::from_millis(range_ms.start + offset.min(span.saturating_sub(1)))
    }

    fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.source.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Build one model-invocation log. Never fails.
    pub fn generate_log(&mut self) -> BedrockLog {
        let src = &mut self.source;
        let input_tokens = src.int_below(50) + 3;
        let output_tokens = src.int_below(300) + 50;
        let latency_ms = u64::from(src.int_below(1500)) + 300;
        let prompt = *src.pick(&PROMPTS);
        let response = *src.pick(&RESPONSES);
        let temperature = round_tenth(src.unit() * 0.5 + 0.5);
        let top_p = round_tenth(src.unit() * 0.3 + 0.7);
        let max_tokens = *src.pick(&MAX_TOKEN_BUDGETS);
        let username = *src.pick(&USERNAMES);
        let region = *src.pick(&REGIONS);
        let request_id = self.uuid();
        let src = &mut self.source;
        let operation = *src.pick(&OPERATIONS);
        let model_id = *src.pick(&MODEL_IDS);
        let inference_region = *src.pick(&INFERENCE_REGIONS);

        BedrockLog {
            timestamp: (self.clock)(),
            account_id: ACCOUNT_ID.to_owned(),
            identity: Identity {
                arn: format!("{IDENTITY_ARN_PREFIX}{username}"),
            },
            region: region.to_owned(),
            request_id: request_id.to_string(),
            operation: operation.to_owned(),
            model_id: model_id.to_owned(),
            input: Some(InvocationInput {
                input_content_type: CONTENT_TYPE_JSON.to_owned(),
                input_body_json: Some(InputBody {
                    messages: vec![Message::text(MessageRole::User, prompt)],
                    inference_config: Some(InferenceConfig {
                        max_tokens,
                        temperature,
                        top_p,
                        stop_sequences: Vec::new(),
                    }),
                    additional_model_request_fields: Map::new(),
                }),
                input_token_count: input_tokens,
                cache_read_input_token_count: 0,
                cache_write_input_token_count: 0,
            }),
            output: Some(InvocationOutput {
                output_content_type: CONTENT_TYPE_JSON.to_owned(),
                output_body_json: Some(OutputBody {
                    output: Some(OutputEnvelope {
                        message: Some(Message::text(MessageRole::Assistant, response)),
                    }),
                    stop_reason: Some(STOP_REASON_END_TURN.to_owned()),
                    metrics: Some(InvocationMetrics { latency_ms }),
                    usage: Some(Usage::new(input_tokens, output_tokens)),
                }),
                output_token_count: output_tokens,
            }),
            inference_region: inference_region.to_owned(),
            schema_type: SCHEMA_TYPE.to_owned(),
            schema_version: SCHEMA_VERSION.to_owned(),
        }
    }

    /// Build one security event.
    pub fn generate_security_event(&mut self) -> SecurityEvent {
        let src = &mut self.source;
        let threat_type = *src.pick(&THREAT_TYPES);
        let username = *src.pick(&USERNAMES);
        let risk = RiskLevel::from_sample(src.unit());
        let ip = format!(
            "{}.{}.{}.{}",
            src.int_below(255),
            src.int_below(255),
            src.int_below(255),
            src.int_below(255)
        );
        let resolved = src.unit() > 0.7;

        SecurityEvent {
            id: self.uuid(),
            timestamp: (self.clock)(),
            threat_type,
            detail: threat_type.detail().to_owned(),
            priority: risk,
            risk,
            username: username.to_owned(),
            ip,
            resolved,
        }
    }

    /// Build one standalone chat turn.
    pub fn generate_chat_message(&mut self) -> ChatMessage {
        let src = &mut self.source;
        let role = if src.unit() > 0.5 {
            ChatRole::User
        } else {
            ChatRole::Assistant
        };
        let prompt = *src.pick(&PROMPTS);
        let content = match role {
            ChatRole::User => prompt,
            ChatRole::Assistant => *src.pick(&RESPONSES),
        };
        let id = self.uuid();
        ChatMessage::new(id.to_string(), role, content, (self.clock)())
    }
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Derive chat turns from a log: user turn first, then assistant turn.
///
/// Either turn is omitted when its path in the payload is missing or
/// carries no text.
pub fn extract_chat_from_log(log: &BedrockLog) -> Vec<ChatMessage> {
    let mut turns = Vec::with_capacity(2);

    let user_text = log
        .request_messages()
        .iter()
        .find(|m| m.role == MessageRole::User)
        .and_then(Message::first_text);
    if let Some(text) = user_text {
        turns.push(turn(log, ChatRole::User, text));
    }

    let assistant_text = log
        .response_message()
        .filter(|m| m.role == MessageRole::Assistant)
        .and_then(Message::first_text);
    if let Some(text) = assistant_text {
        turns.push(turn(log, ChatRole::Assistant, text));
    }

    turns
}

fn turn(log: &BedrockLog, role: ChatRole, text: &str) -> ChatMessage {
    ChatMessage::new(
        format!("{}-{}", log.request_id, role.id_suffix()),
        role,
        text,
        log.timestamp,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ThreatType;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
    }

    fn scripted(values: impl Into<Vec<f64>>) -> Generator<ScriptedSource> {
        Generator::new(ScriptedSource::new(values)).with_clock(fixed_clock)
    }

    #[test]
    fn low_samples_give_lower_bounds() {
        let mut generator = scripted([0.0]);
        let log = generator.generate_log();

        assert_eq!(log.input_token_count(), 3);
        assert_eq!(log.output_token_count(), 50);
        assert_eq!(log.latency_ms(), 300);
        assert_eq!(log.region, "us-east-1");
        assert_eq!(log.operation, "Converse");
        assert_eq!(log.model_id, MODEL_IDS[0]);
        assert_eq!(log.inference_region, "eu-north-1");
        assert_eq!(log.username(), "Brian");
        assert_eq!(log.timestamp, fixed_clock());

        let cfg = log.inference_config().unwrap();
        assert_eq!(cfg.max_tokens, 256);
        assert!((cfg.temperature - 0.5).abs() < 1e-9);
        assert!((cfg.top_p - 0.7).abs() < 1e-9);
    }

    #[test]
    fn high_samples_give_upper_bounds() {
        let mut generator = scripted([1.0]);
        let log = generator.generate_log();

        assert_eq!(log.input_token_count(), 52);
        assert_eq!(log.output_token_count(), 349);
        assert_eq!(log.latency_ms(), 1799);
        assert_eq!(log.username(), "Grace");
        let cfg = log.inference_config().unwrap();
        assert_eq!(cfg.max_tokens, 2048);
        assert!((cfg.temperature - 1.0).abs() < 1e-9);
        assert!((cfg.top_p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn log_uses_fixed_draw_budget() {
        let mut generator = scripted([0.3]);
        let _ = generator.generate_log();
        // 13 scalar draws plus 16 bytes of request id.
        assert_eq!(generator.source().draws(), 29);
    }

    #[test]
    fn temperature_rounds_to_tenths() {
        // input, output, latency, prompt, response, temperature
        let mut generator = scripted([0.0, 0.0, 0.0, 0.0, 0.0, 0.42]);
        let log = generator.generate_log();
        let t = log.inference_config().unwrap().temperature;
        // 0.42 * 0.5 + 0.5 = 0.71 -> 0.7
        assert!((t - 0.7).abs() < 1e-9);
    }

    #[test]
    fn generated_logs_hold_usage_invariants() {
        let mut generator = Generator::from_seed(Some(11));
        for _ in 0..500 {
            let log = generator.generate_log();
            let usage = log.usage().unwrap();
            assert_eq!(usage.total_tokens, usage.input_tokens + usage.output_tokens);
            assert_eq!(log.input_token_count(), usage.input_tokens);
            assert_eq!(log.output_token_count(), usage.output_tokens);
            assert!(REGIONS.contains(&log.region.as_str()));
            assert!(INFERENCE_REGIONS.contains(&log.inference_region.as_str()));
            assert!(OPERATIONS.contains(&log.operation.as_str()));
            assert!(MODEL_IDS.contains(&log.model_id.as_str()));
            assert!((3..=52).contains(&usage.input_tokens));
            assert!((50..=349).contains(&usage.output_tokens));
            assert!((300..=1799).contains(&log.latency_ms()));
        }
    }

    #[test]
    fn request_ids_are_v4_uuids() {
        let mut generator = Generator::from_seed(Some(3));
        let id: Uuid = generator.generate_log().request_id.parse().unwrap();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn equal_seeds_reproduce() {
        let mut a = Generator::from_seed(Some(99)).with_clock(fixed_clock);
        let mut b = Generator::from_seed(Some(99)).with_clock(fixed_clock);
        for _ in 0..20 {
            assert_eq!(a.generate_log(), b.generate_log());
            assert_eq!(a.generate_security_event(), b.generate_security_event());
        }
    }

    #[test]
    fn period_stays_in_half_open_range() {
        let mut low = scripted([0.0]);
        assert_eq!(low.draw_period(3_000..8_000), Duration::from_millis(3_000));
        let mut high = scripted([1.0]);
        assert_eq!(high.draw_period(3_000..8_000), Duration::from_millis(7_999));
        let mut mid = scripted([0.5]);
        assert_eq!(mid.draw_period(3_000..8_000), Duration::from_millis(5_500));
    }

    #[test]
    fn security_event_follows_draw_order() {
        // threat, username, risk, 4 octets, resolved
        let mut generator = scripted([0.0, 0.99, 0.85, 0.0, 0.5, 0.999, 0.2, 0.75]);
        let event = generator.generate_security_event();

        assert_eq!(event.threat_type, ThreatType::PromptInjection);
        assert_eq!(event.detail, "Ignore previous instructions");
        assert_eq!(event.username, "Grace");
        assert_eq!(event.risk, RiskLevel::High);
        assert_eq!(event.priority, RiskLevel::High);
        assert_eq!(event.ip, "0.127.254.51");
        assert!(event.resolved);
    }

    #[test]
    fn security_event_medium_and_unresolved() {
        let mut generator = scripted([0.9, 0.0, 0.6, 0.0, 0.0, 0.0, 0.0, 0.7]);
        let event = generator.generate_security_event();
        assert_eq!(event.threat_type, ThreatType::ContentPolicyViolation);
        assert_eq!(event.detail, "Security concern detected");
        assert_eq!(event.risk, RiskLevel::Medium);
        assert!(!event.resolved);
    }

    #[test]
    fn chat_message_roles() {
        let mut generator = scripted([0.9, 0.0]);
        let user = generator.generate_chat_message();
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.content, PROMPTS[0]);

        let mut generator = scripted([0.1, 0.0, 0.0]);
        let assistant = generator.generate_chat_message();
        assert_eq!(assistant.role, ChatRole::Assistant);
        assert_eq!(assistant.content, RESPONSES[0]);
    }

    #[test]
    fn extraction_yields_user_then_assistant() {
        let log = scripted([0.0]).generate_log();
        let turns = extract_chat_from_log(&log);

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].id, format!("{}-user", log.request_id));
        assert_eq!(turns[0].content, PROMPTS[0]);
        assert_eq!(turns[1].role, ChatRole::Assistant);
        assert_eq!(turns[1].id, format!("{}-assistant", log.request_id));
        assert_eq!(turns[1].content, RESPONSES[0]);
    }

    #[test]
    fn extraction_without_response_message_keeps_user() {
        let mut log = scripted([0.0]).generate_log();
        if let Some(body) = log
            .output
            .as_mut()
            .and_then(|o| o.output_body_json.as_mut())
        {
            body.output = None;
        }
        let turns = extract_chat_from_log(&log);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, ChatRole::User);
    }

    #[test]
    fn extraction_without_payloads_is_empty() {
        let mut log = scripted([0.0]).generate_log();
        log.input = None;
        log.output = None;
        assert!(extract_chat_from_log(&log).is_empty());
        assert!(extract_chat_from_log(&BedrockLog::default()).is_empty());
    }

    #[test]
    fn extraction_skips_foreign_roles() {
        let mut log = scripted([0.0]).generate_log();
        if let Some(body) = log.input.as_mut().and_then(|i| i.input_body_json.as_mut()) {
            body.messages = vec![
                Message::text(MessageRole::Other, "system prompt"),
                Message::text(MessageRole::User, "first"),
                Message::text(MessageRole::User, "second"),
            ];
        }
        let turns = extract_chat_from_log(&log);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "first");
    }

    #[test]
    fn extraction_uses_only_the_first_user_message() {
        let raw = r#"{
            "requestId": "r",
            "input": {"inputBodyJson": {"messages": [
                {"role": "user", "content": [{}]},
                {"role": "user", "content": [{"text": "second"}]}
            ]}}
        }"#;
        let log: BedrockLog = serde_json::from_str(raw).unwrap();
        assert!(extract_chat_from_log(&log).is_empty());
    }
}
