//! Cycle state persistence.
//!
//! The store writes its full state through after every transition and reads
//! it back once at startup.
//!
//! # Slot Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "state": {
//!     "cycles": [
//!       { "id": "01J...", "task": "Write report", "minutesAmount": 25,
//!         "startDate": "2026-01-31T09:00:00Z", "finishedDate": "2026-01-31T09:25:00Z" }
//!     ],
//!     "activeCycleId": null
//!   }
//! }
//! ```
//!
//! The key carries the schema version too (`cronos.cycles-state.v1`), so a
//! future layout lands in a fresh slot instead of clobbering this one.
//!
//! # Fallbacks
//!
//! An absent, empty, unparsable, wrong-version, or invariant-breaking slot
//! (including a cycle with a blank task or out-of-range duration)
//! loads as `None` and the caller starts from an empty state. Startup never
//! fails on persisted data.

mod slot;

pub use slot::{FileSlot, MemorySlot, StateSlot};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CronosError, Result};
use crate::types::CyclesState;

pub const SCHEMA_VERSION: u32 = 1;
pub const STATE_KEY: &str = "cronos.cycles-state.v1";

#[derive(Debug, Serialize)]
struct SlotFileRef<'a> {
    version: u32,
    state: &'a CyclesState,
}

#[derive(Debug, Deserialize)]
struct SlotFile {
    version: u32,
    state: CyclesState,
}

/// Serializes [`CyclesState`] to and from a durable slot.
#[derive(Clone)]
pub struct PersistenceAdapter {
    slot: Arc<dyn StateSlot>,
}

impl PersistenceAdapter {
    pub fn new(slot: Arc<dyn StateSlot>) -> Self {
        Self { slot }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlot::new()))
    }

    pub fn save(&self, state: &CyclesState) -> Result<()> {
        let file = SlotFileRef {
            version: SCHEMA_VERSION,
            state,
        };
        let content = serde_json::to_string_pretty(&file).map_err(|source| CronosError::Json {
            context: "serializing cycles state".to_string(),
            source,
        })?;
        self.slot.write(STATE_KEY, &content)?;
        debug!(cycles = state.cycles.len(), "Cycles state saved");
        Ok(())
    }

    pub fn load(&self) -> Option<CyclesState> {
        let content = match self.slot.read(STATE_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "Failed to read cycles state, starting empty");
                return None;
            }
        };

        if content.trim().is_empty() {
            warn!("Empty cycles state slot, starting empty");
            return None;
        }

        let file = match serde_json::from_str::<SlotFile>(&content) {
            Ok(file) => file,
            Err(err) => {
                warn!(error = %err, "Failed to parse cycles state, starting empty");
                return None;
            }
        };

        if file.version != SCHEMA_VERSION {
            warn!(
                version = file.version,
                expected = SCHEMA_VERSION,
                "Unsupported cycles state version, starting empty"
            );
            return None;
        }

        if let Err(violation) = file.state.check_invariants() {
            warn!(error = %violation, "Persisted cycles state is inconsistent, starting empty");
            return None;
        }

        debug!(cycles = file.state.cycles.len(), "Cycles state loaded");
        Some(file.state)
    }
}
