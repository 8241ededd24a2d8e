// ── Model-invocation log record ──
//
// Mirrors the Bedrock model-invocation-log JSON shape. Every nested
// payload level is optional so that partial records parsed from JSON
// stay representable; accessors below are total over that shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One simulated model invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedrockLog {
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InvocationInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<InvocationOutput>,
    #[serde(default)]
    pub inference_region: String,
    #[serde(default)]
    pub schema_type: String,
    #[serde(default)]
    pub schema_version: String,
}

/// Caller identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub arn: String,
}

// ── Request side ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationInput {
    #[serde(default)]
    pub input_content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_body_json: Option<InputBody>,
    #[serde(default)]
    pub input_token_count: u32,
    #[serde(default)]
    pub cache_read_input_token_count: u32,
    #[serde(default)]
    pub cache_write_input_token_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBody {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_config: Option<InferenceConfig>,
    #[serde(default)]
    pub additional_model_request_fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    #[serde(default)]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub top_p: f64,
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

// ── Response side ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationOutput {
    #[serde(default)]
    pub output_content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_body_json: Option<OutputBody>,
    #[serde(default)]
    pub output_token_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputEnvelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<InvocationMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationMetrics {
    #[serde(default)]
    pub latency_ms: u64,
}

/// Token usage reported by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

// ── Conversation payload ─────────────────────────────────────────

/// Role attached to a message inside a request or response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    /// Any role this dashboard does not render (e.g. `system`), and
    /// messages that carry no role at all.
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn text(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentBlock {
                text: Some(text.into()),
            }],
        }
    }

    /// Text of the first content block, if that block carries text.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first()?.text.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ── Total accessors ──────────────────────────────────────────────

impl BedrockLog {
    /// Echoed input token count, 0 when the input block is absent.
    pub fn input_token_count(&self) -> u32 {
        self.input.as_ref().map_or(0, |i| i.input_token_count)
    }

    /// Echoed output token count, 0 when the output block is absent.
    pub fn output_token_count(&self) -> u32 {
        self.output.as_ref().map_or(0, |o| o.output_token_count)
    }

    fn output_body(&self) -> Option<&OutputBody> {
        self.output.as_ref()?.output_body_json.as_ref()
    }

    /// Reported latency, 0 when metrics are absent.
    pub fn latency_ms(&self) -> u64 {
        self.output_body()
            .and_then(|b| b.metrics)
            .map_or(0, |m| m.latency_ms)
    }

    pub fn usage(&self) -> Option<Usage> {
        self.output_body()?.usage
    }

    /// `usage.totalTokens`, 0 when usage is absent.
    pub fn usage_total_tokens(&self) -> u32 {
        self.usage().map_or(0, |u| u.total_tokens)
    }

    /// Messages sent in the request body (empty when absent).
    pub fn request_messages(&self) -> &[Message] {
        self.input
            .as_ref()
            .and_then(|i| i.input_body_json.as_ref())
            .map_or(&[], |b| b.messages.as_slice())
    }

    /// Message returned in the response body.
    pub fn response_message(&self) -> Option<&Message> {
        self.output_body()?.output.as_ref()?.message.as_ref()
    }

    pub fn inference_config(&self) -> Option<&InferenceConfig> {
        self.input
            .as_ref()?
            .input_body_json
            .as_ref()?
            .inference_config
            .as_ref()
    }

    /// Session name at the end of the caller's role ARN.
    pub fn username(&self) -> &str {
        self.identity
            .arn
            .rsplit('/')
            .next()
            .unwrap_or(&self.identity.arn)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accessors_are_total_on_empty_record() {
        let log = BedrockLog::default();
        assert_eq!(log.input_token_count(), 0);
        assert_eq!(log.output_token_count(), 0);
        assert_eq!(log.latency_ms(), 0);
        assert_eq!(log.usage_total_tokens(), 0);
        assert!(log.request_messages().is_empty());
        assert!(log.response_message().is_none());
        assert!(log.inference_config().is_none());
    }

    #[test]
    fn partial_json_parses() {
        let raw = r#"{
            "timestamp": "2025-01-15T10:30:00Z",
            "requestId": "abc",
            "modelId": "m",
            "input": { "inputBodyJson": { "messages": [
                { "role": "system", "content": [{ "text": "be nice" }] },
                { "role": "user", "content": [{}] }
            ] } },
            "output": { "outputTokenCount": 7 }
        }"#;
        let log: BedrockLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.request_messages().len(), 2);
        assert_eq!(log.request_messages()[0].role, MessageRole::Other);
        assert_eq!(log.request_messages()[1].first_text(), None);
        assert_eq!(log.output_token_count(), 7);
        assert_eq!(log.latency_ms(), 0);
    }

    #[test]
    fn partial_nested_blocks_omit_missing_fields() {
        let raw = r#"{
            "input": { "inputBodyJson": {
                "messages": [{ "content": [{ "text": "hi" }] }],
                "inferenceConfig": { "maxTokens": 512 }
            } },
            "output": { "outputBodyJson": {
                "metrics": {},
                "usage": { "inputTokens": 4 }
            } }
        }"#;
        let log: BedrockLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.request_messages()[0].role, MessageRole::Other);
        assert_eq!(log.latency_ms(), 0);
        let usage = log.usage().unwrap();
        assert_eq!(usage.input_tokens, 4);
        assert_eq!(usage.output_tokens, 0);
        assert_eq!(log.usage_total_tokens(), 0);
        let cfg = log.inference_config().unwrap();
        assert_eq!(cfg.max_tokens, 512);
        assert!(cfg.top_p.abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_invocation_log_keys() {
        let log = BedrockLog {
            request_id: "r-1".into(),
            output: Some(InvocationOutput {
                output_token_count: 3,
                ..InvocationOutput::default()
            }),
            ..BedrockLog::default()
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["requestId"], "r-1");
        assert_eq!(json["output"]["outputTokenCount"], 3);
        assert!(json.get("input").is_none());
    }

    #[test]
    fn username_is_last_arn_segment() {
        let log = BedrockLog {
            identity: Identity {
                arn: "arn:aws:sts::1:assumed-role/Role/Carol".into(),
            },
            ..BedrockLog::default()
        };
        assert_eq!(log.username(), "Carol");
    }
}
