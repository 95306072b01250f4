//! Engine-level failures.
//!
//! Only precondition and data-integrity problems surface here. Capacity and
//! adjacency findings are not errors; they travel as [`crate::Violation`]
//! values next to successful results.

use chrono::NaiveDate;
use rota_id::{PersonId, ShiftId};
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A person identifier is absent from the supplied roster.
    #[error("unknown person: {0}")]
    UnknownPerson(PersonId),

    /// A shift identifier is absent from the supplied shift table.
    #[error("unknown shift: {0}")]
    UnknownShift(ShiftId),

    /// Pairwise swap attempted on a person pinned to a fixed shift.
    #[error("person {0} has a fixed shift and is not swap-eligible")]
    FixedShiftSwap(PersonId),

    /// Generation needs at least one shift definition to resolve slots.
    #[error("no shift definitions supplied")]
    NoShiftsDefined,

    /// Subsequent generation needs at least one prior period.
    #[error("history is empty; use initial generation")]
    EmptyHistory,

    /// A period start date does not fall on the configured week start.
    #[error("period start {date} does not fall on {expected:?}")]
    MisalignedStartDate {
        date: NaiveDate,
        expected: chrono::Weekday,
    },
}
