//! CronosEngine - the entry point front ends talk to.
//!
//! Owns the cycle store and the countdown synchronizer and keeps them in step:
//! every front-end action is dispatched to the store and immediately followed
//! by a synchronizer re-bind, so the countdown timer always belongs to the
//! current active cycle.
//!
//! ```rust,ignore
//! use cronos_core::{CronosEngine, StorageConfig};
//!
//! let engine = CronosEngine::open(StorageConfig::from_env()?, sink)?;
//! engine.start_cycle("Write report", 25)?;
//! ```

use std::sync::Arc;

use crate::config::{load_config_or_default, CronosConfig};
use crate::countdown::{
    Clock, CountdownSynchronizer, DisplaySink, Reconciliation, SystemClock, TickOutcome,
};
use crate::error::Result;
use crate::persistence::{FileSlot, PersistenceAdapter};
use crate::reducer::{CycleAction, CycleUpdate};
use crate::storage::StorageConfig;
use crate::store::CycleStore;
use crate::types::{Cycle, CycleId, CyclesState, HistoryOrder};

pub struct CronosEngine {
    store: Arc<CycleStore>,
    synchronizer: CountdownSynchronizer,
    clock: Arc<dyn Clock>,
}

impl CronosEngine {
    /// Opens the engine on disk-backed storage with wall-clock time.
    ///
    /// A persisted active cycle resumes immediately: the first tick reports
    /// the time elapsed since it started, and finishes it if it ran out while
    /// nothing was watching.
    pub fn open(storage: StorageConfig, sink: Arc<dyn DisplaySink>) -> Result<Self> {
        let config = load_config_or_default(&storage.config_file());
        let persistence = PersistenceAdapter::new(Arc::new(FileSlot::new(storage.state_dir())));
        Ok(Self::with_parts(
            persistence,
            Arc::new(SystemClock),
            sink,
            config,
        ))
    }

    /// Assembles an engine from explicit parts. Used by tests and embedders.
    pub fn with_parts(
        persistence: PersistenceAdapter,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DisplaySink>,
        config: CronosConfig,
    ) -> Self {
        let store = Arc::new(CycleStore::open(persistence));
        let synchronizer =
            CountdownSynchronizer::new(Arc::clone(&store), Arc::clone(&clock), sink, &config);
        synchronizer.sync();
        Self {
            store,
            synchronizer,
            clock,
        }
    }

    /// Starts a new cycle and returns its id.
    pub fn start_cycle(&self, task: &str, minutes_amount: u32) -> Result<CycleId> {
        let id = CycleId::generate();
        self.dispatch(CycleAction::Start {
            id: id.clone(),
            task: task.trim().to_string(),
            minutes_amount,
        })?;
        Ok(id)
    }

    /// Interrupts the active cycle. Returns the interrupted cycle, or `None` if nothing was running.
    pub fn interrupt_cycle(&self) -> Result<Option<Cycle>> {
        let active = self.store.active_cycle();
        let update = self.dispatch(CycleAction::Interrupt)?;
        Ok(match (update, active) {
            (CycleUpdate::Apply(state), Some(active)) => state.find(&active.id).cloned(),
            _ => None,
        })
    }

    pub fn dispatch(&self, action: CycleAction) -> Result<CycleUpdate> {
        let update = self.store.dispatch_at(action, self.clock.now())?;
        self.synchronizer.sync();
        Ok(update)
    }

    /// Reconciles now and returns the outcome; also re-arms the timer if needed.
    pub fn refresh(&self) -> TickOutcome {
        self.synchronizer.sync()
    }

    pub fn active_cycle(&self) -> Option<Cycle> {
        self.store.active_cycle()
    }

    pub fn last_reconciliation(&self) -> Option<Reconciliation> {
        self.synchronizer.last_reconciliation()
    }

    pub fn history(&self, order: HistoryOrder) -> Vec<Cycle> {
        self.store.history(order)
    }

    pub fn snapshot(&self) -> CyclesState {
        self.store.snapshot()
    }

    pub fn shutdown(&self) {
        self.synchronizer.shutdown();
    }
}
