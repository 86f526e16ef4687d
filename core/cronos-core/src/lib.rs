//! # cronos-core
//!
//! Core library for Cronos, a single-task focus timer: name a task, pick a
//! duration, and track whether the cycle finished or was interrupted.
//!
//! ## Design Principles
//!
//! - **Pure transitions**: [`reducer::reduce_cycles`] maps `(state, action, now)`
//!   to an update; all effects live in [`store`] and [`countdown`].
//! - **Wall-clock truth**: elapsed time is recomputed from timestamps on every
//!   tick, never counted up.
//! - **Graceful degradation**: unreadable persisted state loads as empty.
//! - **Synchronous**: no async runtime; the countdown runs on one plain thread.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cronos_core::{CronosEngine, MemorySink, StorageConfig};
//!
//! let engine = CronosEngine::open(StorageConfig::from_env()?, Arc::new(MemorySink::new()))?;
//! engine.start_cycle("Write report", 25)?;
//! ```

pub mod config;
pub mod countdown;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

pub use config::{load_config, load_config_or_default, CronosConfig};
pub use countdown::{
    format_remaining, reconcile, Clock, CountdownSynchronizer, DisplaySink, ManualClock,
    MemorySink, Reconciliation, SystemClock, TickOutcome,
};
pub use engine::CronosEngine;
pub use error::{CronosError, Result};
pub use persistence::{FileSlot, MemorySlot, PersistenceAdapter, StateSlot};
pub use reducer::{reduce_cycles, CycleAction, CycleUpdate};
pub use storage::StorageConfig;
pub use store::CycleStore;
pub use types::{Cycle, CycleId, CycleStatus, CyclesState, HistoryOrder, InvariantViolation};
pub use validation::{validate_new_cycle, ValidationIssue, MAX_MINUTES_AMOUNT, MIN_MINUTES_AMOUNT};
