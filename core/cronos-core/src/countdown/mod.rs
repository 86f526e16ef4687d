//! Countdown synchronization.
//!
//! Split in two:
//!
//! - [`reconcile`]: pure elapsed/remaining math from `(cycle, now)`.
//! - [`synchronizer`]: the effectful side that arms a timer per active
//!   cycle, writes labels to a [`DisplaySink`], and dispatches completion.
//!
//! Time always comes from a [`Clock`] so tests can pin it.

pub mod clock;
pub mod reconcile;
pub mod sink;
pub mod synchronizer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reconcile::{elapsed_seconds, format_remaining, reconcile, Reconciliation};
pub use sink::{DisplaySink, MemorySink};
pub use synchronizer::{CountdownSynchronizer, TickOutcome};
