//! Error types for cronos-core operations.

use std::path::PathBuf;

use crate::validation::{MAX_MINUTES_AMOUNT, MIN_MINUTES_AMOUNT};

/// All errors that can occur in cronos-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CronosError {
    // ─────────────────────────────────────────────────────────────────────
    // Contract Violations
    // ─────────────────────────────────────────────────────────────────────
    #[error("Cycle task must not be empty")]
    EmptyTask,

    #[error(
        "Cycle duration out of range: {minutes} minutes (expected {}..={})",
        MIN_MINUTES_AMOUNT,
        MAX_MINUTES_AMOUNT
    )]
    MinutesOutOfRange { minutes: u32 },

    #[error("Another cycle is already active: {active_cycle_id}")]
    CycleAlreadyActive { active_cycle_id: String },

    #[error("Cycle id already used: {cycle_id}")]
    DuplicateCycleId { cycle_id: String },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CronosError {
    /// True for errors caused by a caller breaking the store's input contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            CronosError::EmptyTask
                | CronosError::MinutesOutOfRange { .. }
                | CronosError::CycleAlreadyActive { .. }
                | CronosError::DuplicateCycleId { .. }
        )
    }
}

/// Convenience type alias for Results using CronosError.
pub type Result<T> = std::result::Result<T, CronosError>;
