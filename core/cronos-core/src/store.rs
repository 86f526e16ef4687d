//! The cycle store: owned state plus a single serialized dispatch path.
//!
//! Every transition goes through [`CycleStore::dispatch_at`], which runs the
//! reducer and then writes the new state through to persistence while still
//! holding the state lock. A write can therefore never race ahead of, or lag
//! behind, the transition that produced it.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::persistence::PersistenceAdapter;
use crate::reducer::{reduce_cycles, CycleAction, CycleUpdate};
use crate::types::{Cycle, CycleId, CyclesState, HistoryOrder};

pub struct CycleStore {
    state: Mutex<CyclesState>,
    persistence: PersistenceAdapter,
}

impl CycleStore {
    /// Opens the store from persisted state, or empty when nothing usable was saved.
    pub fn open(persistence: PersistenceAdapter) -> Self {
        let state = persistence.load().unwrap_or_default();
        if let Some(active) = state.active_cycle() {
            info!(
                cycle_id = %active.id,
                task = %active.task,
                started_at = %active.start_date.to_rfc3339(),
                "Restored active cycle"
            );
        }
        Self {
            state: Mutex::new(state),
            persistence,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(PersistenceAdapter::in_memory())
    }

    pub fn dispatch(&self, action: CycleAction) -> Result<CycleUpdate> {
        self.dispatch_at(action, Utc::now())
    }

    pub fn dispatch_at(&self, action: CycleAction, now: DateTime<Utc>) -> Result<CycleUpdate> {
        let mut state = self.lock();
        self.apply_locked(&mut state, &action, now)
    }

    /// Finishes `cycle_id` only if it is still the active cycle.
    ///
    /// The check and the transition happen under one lock, so a finish
    /// computed for a cycle that was meanwhile interrupted or replaced is
    /// dropped instead of landing on the wrong cycle.
    pub fn finish_if_active(&self, cycle_id: &CycleId, now: DateTime<Utc>) -> Result<CycleUpdate> {
        let mut state = self.lock();
        if state.active_cycle_id.as_ref() != Some(cycle_id) {
            return Ok(CycleUpdate::Skip);
        }
        self.apply_locked(&mut state, &CycleAction::Finish, now)
    }

    pub fn snapshot(&self) -> CyclesState {
        self.lock().clone()
    }

    pub fn active_cycle(&self) -> Option<Cycle> {
        self.lock().active_cycle().cloned()
    }

    pub fn history(&self, order: HistoryOrder) -> Vec<Cycle> {
        self.lock().history(order)
    }

    fn apply_locked(
        &self,
        state: &mut CyclesState,
        action: &CycleAction,
        now: DateTime<Utc>,
    ) -> Result<CycleUpdate> {
        let update = reduce_cycles(state, action, now).inspect_err(|err| {
            warn!(action = action.kind(), error = %err, "Rejected cycle action");
        })?;

        if let CycleUpdate::Apply(next) = &update {
            *state = next.clone();
            info!(
                action = action.kind(),
                active_cycle_id = ?state.active_cycle_id.as_ref().map(CycleId::as_str),
                cycles = state.cycles.len(),
                "Cycle transition applied"
            );
            if let Err(err) = self.persistence.save(state) {
                warn!(error = %err, "Failed to persist cycles state");
            }
        }

        Ok(update)
    }

    fn lock(&self) -> MutexGuard<'_, CyclesState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
