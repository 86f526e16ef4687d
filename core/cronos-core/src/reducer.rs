//! Pure cycle transitions.
//!
//! `reduce_cycles` maps `(state, action, now)` to an update without touching
//! its inputs. Terminal actions with nothing to act on, and actions we do not
//! recognize, reduce to [`CycleUpdate::Skip`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CronosError, Result};
use crate::types::{Cycle, CycleId, CyclesState};
use crate::validation::check_new_cycle;

/// Actions accepted by the cycle store.
///
/// `Finish` is only issued by the countdown synchronizer; front ends send
/// `Start` and `Interrupt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleAction {
    Start {
        id: CycleId,
        task: String,
        #[serde(rename = "minutesAmount")]
        minutes_amount: u32,
    },
    Interrupt,
    Finish,
    #[serde(other)]
    Unknown,
}

impl CycleAction {
    /// Builds a start action carrying a freshly generated cycle id.
    pub fn start(task: impl Into<String>, minutes_amount: u32) -> Self {
        CycleAction::Start {
            id: CycleId::generate(),
            task: task.into(),
            minutes_amount,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CycleAction::Start { .. } => "start",
            CycleAction::Interrupt => "interrupt",
            CycleAction::Finish => "finish",
            CycleAction::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleUpdate {
    Apply(CyclesState),
    Skip,
}

pub fn reduce_cycles(
    state: &CyclesState,
    action: &CycleAction,
    now: DateTime<Utc>,
) -> Result<CycleUpdate> {
    match action {
        CycleAction::Start {
            id,
            task,
            minutes_amount,
        } => start_cycle(state, id, task, *minutes_amount, now),
        CycleAction::Interrupt => Ok(close_active_cycle(state, |cycle| {
            cycle.interrupted_date = Some(now);
        })),
        CycleAction::Finish => Ok(close_active_cycle(state, |cycle| {
            cycle.finished_date = Some(now);
        })),
        CycleAction::Unknown => Ok(CycleUpdate::Skip),
    }
}

fn start_cycle(
    state: &CyclesState,
    id: &CycleId,
    task: &str,
    minutes_amount: u32,
    now: DateTime<Utc>,
) -> Result<CycleUpdate> {
    check_new_cycle(task, minutes_amount)?;

    if state.find(id).is_some() {
        return Err(CronosError::DuplicateCycleId {
            cycle_id: id.to_string(),
        });
    }

    if let Some(active) = state.active_cycle() {
        return Err(CronosError::CycleAlreadyActive {
            active_cycle_id: active.id.to_string(),
        });
    }

    let mut next = state.clone();
    next.cycles.push(Cycle {
        id: id.clone(),
        task: task.to_string(),
        minutes_amount,
        start_date: now,
        interrupted_date: None,
        finished_date: None,
    });
    next.active_cycle_id = Some(id.clone());
    Ok(CycleUpdate::Apply(next))
}

fn close_active_cycle(state: &CyclesState, close: impl FnOnce(&mut Cycle)) -> CycleUpdate {
    let Some(active_id) = state.active_cycle_id.as_ref() else {
        return CycleUpdate::Skip;
    };

    let mut next = state.clone();
    match next
        .cycles
        .iter_mut()
        .find(|cycle| &cycle.id == active_id && cycle.is_active())
    {
        Some(cycle) => close(cycle),
        None => return CycleUpdate::Skip,
    }
    next.active_cycle_id = None;
    CycleUpdate::Apply(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap()
    }

    fn start(id: &str, minutes: u32) -> CycleAction {
        CycleAction::Start {
            id: CycleId::from(id),
            task: "Write report".to_string(),
            minutes_amount: minutes,
        }
    }

    fn applied(update: CycleUpdate) -> CyclesState {
        match update {
            CycleUpdate::Apply(state) => state,
            CycleUpdate::Skip => panic!("expected apply"),
        }
    }

    fn running(id: &str) -> CyclesState {
        applied(reduce_cycles(&CyclesState::default(), &start(id, 25), t0()).unwrap())
    }

    #[test]
    fn start_appends_active_cycle() {
        let state = running("c1");
        assert_eq!(state.cycles.len(), 1);
        assert_eq!(state.active_cycle_id, Some(CycleId::from("c1")));
        let cycle = &state.cycles[0];
        assert_eq!(cycle.start_date, t0());
        assert_eq!(cycle.minutes_amount, 25);
        assert!(cycle.is_active());
    }

    #[test]
    fn start_leaves_previous_cycles_untouched() {
        let first = running("c1");
        let stopped = applied(
            reduce_cycles(&first, &CycleAction::Interrupt, t0() + Duration::seconds(30)).unwrap(),
        );
        let second = applied(
            reduce_cycles(&stopped, &start("c2", 10), t0() + Duration::seconds(60)).unwrap(),
        );

        assert_eq!(second.cycles[0], stopped.cycles[0]);
        assert_eq!(second.cycles[1].id, CycleId::from("c2"));
        assert_eq!(second.active_cycle_id, Some(CycleId::from("c2")));
    }

    #[test]
    fn start_rejects_invalid_input_without_clamping() {
        let state = CyclesState::default();
        let err = reduce_cycles(&state, &start("c1", 61), t0()).unwrap_err();
        assert!(matches!(err, CronosError::MinutesOutOfRange { minutes: 61 }));
        assert!(err.is_contract_violation());

        let blank = CycleAction::Start {
            id: CycleId::from("c1"),
            task: "  ".to_string(),
            minutes_amount: 25,
        };
        assert!(matches!(
            reduce_cycles(&state, &blank, t0()),
            Err(CronosError::EmptyTask)
        ));
    }

    #[test]
    fn start_while_active_is_rejected() {
        let state = running("c1");
        let err = reduce_cycles(&state, &start("c2", 25), t0()).unwrap_err();
        assert!(matches!(err, CronosError::CycleAlreadyActive { .. }));
    }

    #[test]
    fn start_with_reused_id_is_rejected() {
        let state = running("c1");
        let stopped = applied(reduce_cycles(&state, &CycleAction::Interrupt, t0()).unwrap());

        let err = reduce_cycles(&stopped, &start("c1", 10), t0()).unwrap_err();
        assert!(matches!(
            err,
            CronosError::DuplicateCycleId { ref cycle_id } if cycle_id == "c1"
        ));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn interrupt_sets_date_and_clears_pointer() {
        let state = running("c1");
        let later = t0() + Duration::seconds(90);
        let next = applied(reduce_cycles(&state, &CycleAction::Interrupt, later).unwrap());

        assert_eq!(next.active_cycle_id, None);
        assert_eq!(next.cycles[0].interrupted_date, Some(later));
        assert_eq!(next.cycles[0].finished_date, None);
        // Input is not mutated.
        assert!(state.cycles[0].is_active());
    }

    #[test]
    fn interrupt_without_active_cycle_skips() {
        let update =
            reduce_cycles(&CyclesState::default(), &CycleAction::Interrupt, t0()).unwrap();
        assert_eq!(update, CycleUpdate::Skip);
    }

    #[test]
    fn finish_is_idempotent() {
        let state = running("c1");
        let done = t0() + Duration::seconds(1500);
        let finished = applied(reduce_cycles(&state, &CycleAction::Finish, done).unwrap());
        assert_eq!(finished.cycles[0].finished_date, Some(done));
        assert_eq!(finished.active_cycle_id, None);

        let again =
            reduce_cycles(&finished, &CycleAction::Finish, done + Duration::seconds(1)).unwrap();
        assert_eq!(again, CycleUpdate::Skip);
    }

    #[test]
    fn finish_after_interrupt_never_sets_both_dates() {
        let state = running("c1");
        let stopped = applied(reduce_cycles(&state, &CycleAction::Interrupt, t0()).unwrap());
        let update = reduce_cycles(&stopped, &CycleAction::Finish, t0()).unwrap();
        assert_eq!(update, CycleUpdate::Skip);
        assert_eq!(stopped.cycles[0].finished_date, None);
    }

    #[test]
    fn unknown_action_leaves_state_unchanged() {
        let state = running("c1");
        let action: CycleAction = serde_json::from_str(r#"{"type":"PAUSE"}"#).unwrap();
        assert_eq!(action, CycleAction::Unknown);
        assert_eq!(
            reduce_cycles(&state, &action, t0()).unwrap(),
            CycleUpdate::Skip
        );
    }

    #[test]
    fn start_action_wire_format() {
        let action: CycleAction = serde_json::from_str(
            r#"{"type":"START","id":"c9","task":"Read","minutesAmount":15}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            CycleAction::Start {
                id: CycleId::from("c9"),
                task: "Read".to_string(),
                minutes_amount: 15,
            }
        );
        assert_eq!(action.kind(), "start");
    }

    #[test]
    fn generated_start_actions_have_distinct_ids() {
        let a = CycleAction::start("Task", 25);
        let b = CycleAction::start("Task", 25);
        match (a, b) {
            (CycleAction::Start { id: a, .. }, CycleAction::Start { id: b, .. }) => {
                assert_ne!(a, b)
            }
            _ => panic!("expected start actions"),
        }
    }
}
