//! Timer-driven reconciliation of the active cycle.
//!
//! The synchronizer owns at most one [`ReconcileTimer`], a background thread
//! bound to a single cycle id. [`CountdownSynchronizer::sync`] must run after
//! every store transition: it cancels a timer whose cycle is no longer active
//! before arming one for the new active cycle.
//!
//! A timer tick only acts while its own cycle is still the store's active
//! cycle, and completion goes through [`CycleStore::finish_if_active`], so a
//! timer that outlives its cycle can at worst observe, never mutate.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::reconcile::{reconcile, Reconciliation};
use super::sink::DisplaySink;
use crate::config::{CronosConfig, DisplayConfig};
use crate::reducer::CycleUpdate;
use crate::store::CycleStore;
use crate::types::CycleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No cycle is active; the idle label was shown.
    Idle,
    Running(Reconciliation),
    /// This tick reached the target and finished the cycle.
    Finished(Reconciliation),
    /// The cycle this tick was armed for is no longer active. Nothing changed.
    Stale,
}

struct SyncShared {
    store: Arc<CycleStore>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DisplaySink>,
    display: DisplayConfig,
    last: Mutex<Option<Reconciliation>>,
}

impl SyncShared {
    fn tick(&self, armed: Option<&CycleId>, now: DateTime<Utc>) -> TickOutcome {
        let Some(cycle) = self.store.active_cycle() else {
            if armed.is_some() {
                return TickOutcome::Stale;
            }
            self.set_last(None);
            self.sink.show(&self.display.idle_label);
            return TickOutcome::Idle;
        };

        if armed.is_some_and(|armed| armed != &cycle.id) {
            return TickOutcome::Stale;
        }

        let reconciliation = reconcile(&cycle, now);
        if !reconciliation.completed {
            self.sink
                .show(&self.display.active_label(&reconciliation.label()));
            self.set_last(Some(reconciliation.clone()));
            return TickOutcome::Running(reconciliation);
        }

        match self.store.finish_if_active(&cycle.id, now) {
            Ok(CycleUpdate::Apply(_)) => {
                info!(
                    cycle_id = %cycle.id,
                    elapsed_secs = reconciliation.elapsed_seconds,
                    "Cycle finished"
                );
                self.set_last(Some(reconciliation.clone()));
                self.sink.show(&self.display.idle_label);
                TickOutcome::Finished(reconciliation)
            }
            Ok(CycleUpdate::Skip) => TickOutcome::Stale,
            Err(err) => {
                warn!(cycle_id = %cycle.id, error = %err, "Failed to finish cycle");
                TickOutcome::Stale
            }
        }
    }

    fn set_last(&self, value: Option<Reconciliation>) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = value;
    }
}

/// A reconciliation thread bound to one cycle. Dropping it cancels and joins.
struct ReconcileTimer {
    cycle_id: CycleId,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ReconcileTimer {
    fn arm(
        shared: Arc<SyncShared>,
        cycle_id: CycleId,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let armed_id = cycle_id.clone();

        let handle = thread::Builder::new()
            .name("cronos-countdown".to_string())
            .spawn(move || loop {
                // Any message or a dropped sender means cancellation.
                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                let now = shared.clock.now();
                match shared.tick(Some(&armed_id), now) {
                    TickOutcome::Running(_) => {}
                    outcome => {
                        debug!(cycle_id = %armed_id, outcome = ?outcome, "Countdown timer stopping");
                        break;
                    }
                }
            })?;

        debug!(cycle_id = %cycle_id, interval_ms = interval.as_millis() as u64, "Countdown timer armed");
        Ok(Self {
            cycle_id,
            cancel: Some(cancel),
            handle: Some(handle),
        })
    }

    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ReconcileTimer {
    fn drop(&mut self) {
        drop(self.cancel.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(cycle_id = %self.cycle_id, "Countdown timer thread panicked");
            }
        }
    }
}

/// Keeps the display and the store's completion state in step with wall time.
pub struct CountdownSynchronizer {
    shared: Arc<SyncShared>,
    interval: Duration,
    timer: Mutex<Option<ReconcileTimer>>,
}

impl CountdownSynchronizer {
    pub fn new(
        store: Arc<CycleStore>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DisplaySink>,
        config: &CronosConfig,
    ) -> Self {
        Self {
            shared: Arc::new(SyncShared {
                store,
                clock,
                sink,
                display: config.display.clone(),
                last: Mutex::new(None),
            }),
            interval: config.countdown.tick_interval(),
            timer: Mutex::new(None),
        }
    }

    /// Re-binds the timer to the store's current active cycle.
    ///
    /// Cancels a timer whose cycle ended or was replaced, then reconciles
    /// once immediately. A resumed cycle therefore reports its true elapsed
    /// time on this first tick. If the cycle is still running afterwards and
    /// no timer is bound to it, a new one is armed.
    pub fn sync(&self) -> TickOutcome {
        let mut timer = self.lock_timer();
        let active_id = self.shared.store.active_cycle().map(|cycle| cycle.id);

        let keep = timer
            .as_ref()
            .is_some_and(|t| t.is_running() && Some(&t.cycle_id) == active_id.as_ref());
        if !keep {
            if let Some(previous) = timer.take() {
                debug!(cycle_id = %previous.cycle_id, "Cancelling countdown timer");
                drop(previous);
            }
        }

        let outcome = self.shared.tick(None, self.shared.clock.now());

        if let TickOutcome::Running(reconciliation) = &outcome {
            if timer.is_none() {
                match ReconcileTimer::arm(
                    Arc::clone(&self.shared),
                    reconciliation.cycle_id.clone(),
                    self.interval,
                ) {
                    Ok(armed) => *timer = Some(armed),
                    Err(err) => {
                        warn!(error = %err, "Failed to spawn countdown timer");
                    }
                }
            }
        }

        outcome
    }

    /// Runs one reconciliation at `now` on the calling thread without touching the timer.
    pub fn tick_at(&self, now: DateTime<Utc>) -> TickOutcome {
        self.shared.tick(None, now)
    }

    /// The most recent reconciliation of an active cycle, if any.
    pub fn last_reconciliation(&self) -> Option<Reconciliation> {
        self.shared
            .last
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn has_timer(&self) -> bool {
        self.lock_timer().as_ref().is_some_and(ReconcileTimer::is_running)
    }

    /// Cancels and joins the timer, if one is armed.
    pub fn shutdown(&self) {
        if let Some(previous) = self.lock_timer().take() {
            debug!(cycle_id = %previous.cycle_id, "Countdown synchronizer shutting down");
            drop(previous);
        }
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<ReconcileTimer>> {
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for CountdownSynchronizer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::clock::ManualClock;
    use crate::countdown::sink::MemorySink;
    use crate::reducer::CycleAction;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap()
    }

    struct Fixture {
        store: Arc<CycleStore>,
        clock: Arc<ManualClock>,
        sink: Arc<MemorySink>,
        sync: CountdownSynchronizer,
    }

    fn fixture(tick_interval_ms: u64) -> Fixture {
        let store = Arc::new(CycleStore::in_memory());
        let clock = Arc::new(ManualClock::new(t0()));
        let sink = Arc::new(MemorySink::new());
        let mut config = CronosConfig::default();
        config.countdown.tick_interval_ms = tick_interval_ms;
        let sync = CountdownSynchronizer::new(store.clone(), clock.clone(), sink.clone(), &config);
        Fixture {
            store,
            clock,
            sink,
            sync,
        }
    }

    #[test]
    fn test_idle_tick_shows_idle_label() {
        let f = fixture(60_000);
        assert_eq!(f.sync.sync(), TickOutcome::Idle);
        assert_eq!(f.sink.last().as_deref(), Some("Cronos"));
        assert!(!f.sync.has_timer());
    }

    #[test]
    fn test_sync_arms_timer_for_running_cycle() {
        let f = fixture(60_000);
        f.store
            .dispatch_at(CycleAction::start("Write report", 5), t0())
            .unwrap();
        f.clock.advance(ChronoDuration::seconds(125));

        match f.sync.sync() {
            TickOutcome::Running(r) => assert_eq!(r.elapsed_seconds, 125),
            other => panic!("expected running, got {:?}", other),
        }
        assert_eq!(f.sink.last().as_deref(), Some("Focus ends in 02:55"));
        assert!(f.sync.has_timer());
        assert_eq!(
            f.sync.last_reconciliation().map(|r| r.elapsed_seconds),
            Some(125)
        );
    }

    #[test]
    fn test_stale_armed_tick_does_not_mutate() {
        let f = fixture(60_000);
        f.store
            .dispatch_at(CycleAction::start("Write report", 5), t0())
            .unwrap();
        let cycle_id = f.store.active_cycle().unwrap().id;
        f.store
            .dispatch_at(CycleAction::Interrupt, t0() + ChronoDuration::seconds(1))
            .unwrap();
        let before = f.store.snapshot();

        let outcome = f
            .sync
            .shared
            .tick(Some(&cycle_id), t0() + ChronoDuration::seconds(400));
        assert_eq!(outcome, TickOutcome::Stale);
        assert_eq!(f.store.snapshot(), before);
    }

    #[test]
    fn test_sync_cancels_timer_after_interrupt() {
        let f = fixture(60_000);
        f.store
            .dispatch_at(CycleAction::start("Write report", 5), t0())
            .unwrap();
        f.sync.sync();
        assert!(f.sync.has_timer());

        f.store.dispatch_at(CycleAction::Interrupt, t0()).unwrap();
        assert_eq!(f.sync.sync(), TickOutcome::Idle);
        assert!(!f.sync.has_timer());
    }

    #[test]
    fn test_shutdown_joins_timer() {
        let f = fixture(60_000);
        f.store
            .dispatch_at(CycleAction::start("Write report", 5), t0())
            .unwrap();
        f.sync.sync();
        f.sync.shutdown();
        assert!(!f.sync.has_timer());
    }
}
