//! Errors surfaced by the cronos binary.

use cronos_core::CronosError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CronosError),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}
