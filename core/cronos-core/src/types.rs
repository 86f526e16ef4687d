//! Cycle data model.
//!
//! Field names serialize in camelCase so the persisted layout reads
//! `{ id, task, minutesAmount, startDate, interruptedDate?, finishedDate? }`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::validation::validate_new_cycle;

/// Opaque, unique cycle identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(String);

impl CycleId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        CycleId(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CycleId {
    fn from(value: &str) -> Self {
        CycleId(value.to_string())
    }
}

impl From<String> for CycleId {
    fn from(value: String) -> Self {
        CycleId(value)
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a cycle is in its lifecycle. Derived from its terminal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Active,
    Interrupted,
    Finished,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStatus::Active => "active",
            CycleStatus::Interrupted => "interrupted",
            CycleStatus::Finished => "finished",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CycleStatus::Active)
    }
}

/// One focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: CycleId,
    pub task: String,
    pub minutes_amount: u32,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn status(&self) -> CycleStatus {
        match (self.interrupted_date, self.finished_date) {
            (Some(_), _) => CycleStatus::Interrupted,
            (None, Some(_)) => CycleStatus::Finished,
            (None, None) => CycleStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == CycleStatus::Active
    }

    /// Planned duration in whole seconds.
    pub fn target_seconds(&self) -> i64 {
        i64::from(self.minutes_amount) * 60
    }
}

/// Order in which the history view returns cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    #[default]
    AsInserted,
    NewestFirst,
}

/// Ways a [`CyclesState`] can break its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("cycle {0} has both interruptedDate and finishedDate")]
    DoubleTerminal(CycleId),

    #[error("cycle {id} has an invalid {field}")]
    InvalidCycle { id: CycleId, field: &'static str },

    #[error("duplicate cycle id {0}")]
    DuplicateId(CycleId),

    #[error("more than one active cycle ({0} and {1})")]
    MultipleActive(CycleId, CycleId),

    #[error("activeCycleId {0} does not name an active cycle")]
    DanglingActiveId(CycleId),

    #[error("cycle {0} is active but activeCycleId does not point at it")]
    UntrackedActive(CycleId),
}

/// Aggregate root: every cycle ever started plus the active-cycle pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclesState {
    pub cycles: Vec<Cycle>,
    pub active_cycle_id: Option<CycleId>,
}

impl CyclesState {
    pub fn find(&self, id: &CycleId) -> Option<&Cycle> {
        self.cycles.iter().find(|cycle| &cycle.id == id)
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.active_cycle_id.as_ref().and_then(|id| self.find(id))
    }

    /// Read-only copy of the cycle sequence in the requested order.
    pub fn history(&self, order: HistoryOrder) -> Vec<Cycle> {
        let mut cycles = self.cycles.clone();
        if order == HistoryOrder::NewestFirst {
            cycles.reverse();
        }
        cycles
    }

    /// Verifies the aggregate invariants, reporting the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen: Vec<&CycleId> = Vec::with_capacity(self.cycles.len());
        let mut active: Option<&CycleId> = None;

        for cycle in &self.cycles {
            if seen.contains(&&cycle.id) {
                return Err(InvariantViolation::DuplicateId(cycle.id.clone()));
            }
            seen.push(&cycle.id);

            if let Some(issue) = validate_new_cycle(&cycle.task, cycle.minutes_amount).first() {
                return Err(InvariantViolation::InvalidCycle {
                    id: cycle.id.clone(),
                    field: issue.field(),
                });
            }

            if cycle.interrupted_date.is_some() && cycle.finished_date.is_some() {
                return Err(InvariantViolation::DoubleTerminal(cycle.id.clone()));
            }

            if cycle.is_active() {
                if let Some(previous) = active {
                    return Err(InvariantViolation::MultipleActive(
                        previous.clone(),
                        cycle.id.clone(),
                    ));
                }
                active = Some(&cycle.id);
            }
        }

        match (&self.active_cycle_id, active) {
            (Some(pointer), Some(found)) if pointer == found => Ok(()),
            (Some(pointer), _) => Err(InvariantViolation::DanglingActiveId(pointer.clone())),
            (None, Some(found)) => Err(InvariantViolation::UntrackedActive(found.clone())),
            (None, None) => Ok(()),
        }
    }
}
