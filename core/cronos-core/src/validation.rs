//! New-cycle input validation.
//!
//! Front ends run [`validate_new_cycle`] before dispatching a start action so
//! users get field-level messages. The reducer enforces the same rules with
//! [`check_new_cycle`], but treats a failure there as a caller bug rather than
//! user input to correct.

use crate::error::{CronosError, Result};

/// Shortest cycle a user may start, in minutes.
pub const MIN_MINUTES_AMOUNT: u32 = 5;

/// Longest cycle a user may start, in minutes.
pub const MAX_MINUTES_AMOUNT: u32 = 60;

/// A single problem with new-cycle input, tied to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    TaskRequired,
    MinutesTooShort { minutes: u32 },
    MinutesTooLong { minutes: u32 },
}

impl ValidationIssue {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationIssue::TaskRequired => "task",
            ValidationIssue::MinutesTooShort { .. } | ValidationIssue::MinutesTooLong { .. } => {
                "minutesAmount"
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::TaskRequired => "Enter a task name.".to_string(),
            ValidationIssue::MinutesTooShort { .. } => format!(
                "The interval must be at least {} minutes.",
                MIN_MINUTES_AMOUNT
            ),
            ValidationIssue::MinutesTooLong { .. } => format!(
                "The interval cannot be longer than {} minutes.",
                MAX_MINUTES_AMOUNT
            ),
        }
    }
}

/// Collects every issue with the given input; empty means the input is valid.
pub fn validate_new_cycle(task: &str, minutes_amount: u32) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if task.trim().is_empty() {
        issues.push(ValidationIssue::TaskRequired);
    }
    if minutes_amount < MIN_MINUTES_AMOUNT {
        issues.push(ValidationIssue::MinutesTooShort {
            minutes: minutes_amount,
        });
    } else if minutes_amount > MAX_MINUTES_AMOUNT {
        issues.push(ValidationIssue::MinutesTooLong {
            minutes: minutes_amount,
        });
    }
    issues
}

/// Contract check used by the reducer. Fails on the first violation.
pub fn check_new_cycle(task: &str, minutes_amount: u32) -> Result<()> {
    if task.trim().is_empty() {
        return Err(CronosError::EmptyTask);
    }
    if !(MIN_MINUTES_AMOUNT..=MAX_MINUTES_AMOUNT).contains(&minutes_amount) {
        return Err(CronosError::MinutesOutOfRange {
            minutes: minutes_amount,
        });
    }
    Ok(())
}
