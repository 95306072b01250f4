//! Rotation/assignment engine.
//!
//! Assigns a roster of people to recurring coverage shifts across
//! successive week-long periods, rotating assignments over time so shift
//! types spread fairly. The engine is a library: the storage layer owns the
//! authoritative state and calls in with reference data and history; every
//! operation here is a pure function (or a deterministic state
//! transformation) over the arguments it is given.
//!
//! # Invariants
//!
//! - No I/O and no wall-clock reads; results are re-derived from the inputs
//!   on every call, so streaks and cancellation scans can never go stale
//! - A missing key in an assignment map is the only representation of
//!   "off" for that period
//! - Constraint violations are advisory data returned next to successful
//!   results, never failures
//! - Unknown person or shift identifiers are failures, never silently
//!   carried into an assignment map

mod cancel;
mod error;
mod generate;
mod model;
mod policy;
mod slots;
mod streak;
mod swap;
mod validate;

#[cfg(test)]
mod test_support;

pub use cancel::{find_cancellation_opportunity, CancellationOpportunity};
pub use error::EngineError;
pub use generate::{generate_initial, generate_next, generate_weekend_month};
pub use model::{
    Assignments, PeriodGeneration, Person, ShiftDefinition, StreakEntry, SwapRecord,
    WeekendAssignment,
};
pub use policy::RotationPolicy;
pub use slots::{derive_slots, resolve_slot_shifts, SlotCategory};
pub use streak::compute_streaks;
pub use swap::{
    edit_assignment, edit_full_period, swap_period, swap_period_checked, swap_weekend, SwapOutcome,
};
pub use validate::{validate, Violation};
