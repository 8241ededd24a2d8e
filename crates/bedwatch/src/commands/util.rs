//! Shared helpers for command handlers.

use std::io::IsTerminal;

use bedwatch_core::{BedrockLog, Generator};

use crate::error::CliError;

/// `count` fresh logs from a generator seeded per `seed`.
pub fn generate_logs(seed: Option<u64>, count: usize) -> Vec<BedrockLog> {
    let mut generator = Generator::from_seed(seed);
    (0..count).map(|_| generator.generate_log()).collect()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, an unapproved prompt is an error.
pub fn confirm(message: &str, yes_flag: bool, subject: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            path: subject.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Logs generated per command are held in memory at once.
pub const MAX_BATCH: usize = 1_000_000;

pub fn check_batch(field: &str, count: usize) -> Result<(), CliError> {
    if count > MAX_BATCH {
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!("at most {MAX_BATCH} allowed, got {count}"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seeded_batches_repeat() {
        let a = generate_logs(Some(5), 3);
        let b = generate_logs(Some(5), 3);
        let ids = |logs: &[BedrockLog]| {
            logs.iter()
                .map(|l| l.request_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(a.len(), 3);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn batch_limit_is_usage_error() {
        assert!(check_batch("count", MAX_BATCH).is_ok());
        let err = check_batch("count", MAX_BATCH + 1).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
