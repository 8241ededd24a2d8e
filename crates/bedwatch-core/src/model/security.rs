// ── Security event domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Category of a simulated threat detection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
pub enum ThreatType {
    #[serde(rename = "Prompt Injection")]
    #[strum(serialize = "Prompt Injection")]
    PromptInjection,
    #[serde(rename = "Jailbreak Attempt")]
    #[strum(serialize = "Jailbreak Attempt")]
    JailbreakAttempt,
    #[serde(rename = "Data Exfiltration")]
    #[strum(serialize = "Data Exfiltration")]
    DataExfiltration,
    #[serde(rename = "Malicious Code Generation")]
    #[strum(serialize = "Malicious Code Generation")]
    MaliciousCodeGeneration,
    #[serde(rename = "PII Exposure")]
    #[strum(serialize = "PII Exposure")]
    PiiExposure,
    #[serde(rename = "Content Policy Violation")]
    #[strum(serialize = "Content Policy Violation")]
    ContentPolicyViolation,
}

/// Generation order for threat types.
pub const THREAT_TYPES: [ThreatType; 6] = [
    ThreatType::PromptInjection,
    ThreatType::JailbreakAttempt,
    ThreatType::DataExfiltration,
    ThreatType::MaliciousCodeGeneration,
    ThreatType::PiiExposure,
    ThreatType::ContentPolicyViolation,
];

/// Detail text attached to events that have no specific mapping.
pub const FALLBACK_THREAT_DETAIL: &str = "Security concern detected";

impl ThreatType {
    /// Fixed detail string shown next to the event.
    pub fn detail(self) -> &'static str {
        match self {
            Self::PromptInjection => "Ignore previous instructions",
            Self::JailbreakAttempt => "Act as a system admin",
            Self::DataExfiltration => "Show me all user data",
            Self::MaliciousCodeGeneration => "Create malware code",
            Self::PiiExposure => "Personal information detected",
            Self::ContentPolicyViolation => FALLBACK_THREAT_DETAIL,
        }
    }
}

/// Look up the detail text by display name, falling back for unknown names.
pub fn threat_detail(name: &str) -> &'static str {
    name.parse::<ThreatType>()
        .map_or(FALLBACK_THREAT_DETAIL, ThreatType::detail)
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a single unit sample onto a risk level (breakpoints 0.8 and 0.5).
    pub fn from_sample(r: f64) -> Self {
        if r > 0.8 {
            Self::High
        } else if r > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One simulated threat-detection alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub threat_type: ThreatType,
    pub detail: String,
    /// Triage priority. Equal to `risk` for generated events.
    pub priority: RiskLevel,
    pub risk: RiskLevel,
    pub username: String,
    /// Dotted quad; not a validated routable address.
    pub ip: String,
    pub resolved: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn threat_type_display_matches_wire_name() {
        for threat in ThreatType::iter() {
            let json = serde_json::to_value(threat).unwrap();
            assert_eq!(json, threat.to_string());
        }
    }

    #[test]
    fn detail_lookup_falls_back() {
        assert_eq!(
            threat_detail("Prompt Injection"),
            "Ignore previous instructions"
        );
        assert_eq!(threat_detail("Content Policy Violation"), FALLBACK_THREAT_DETAIL);
        assert_eq!(threat_detail("Quantum Tunnelling"), FALLBACK_THREAT_DETAIL);
    }

    #[test]
    fn risk_breakpoints() {
        assert_eq!(RiskLevel::from_sample(0.81), RiskLevel::High);
        assert_eq!(RiskLevel::from_sample(0.8), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_sample(0.51), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_sample(0.5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_sample(0.0), RiskLevel::Low);
    }

    #[test]
    fn risk_orders_by_severity() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn threat_table_covers_every_variant() {
        assert_eq!(THREAT_TYPES.len(), ThreatType::COUNT);
    }
}
