//! Domain model shared by the engine and its collaborators.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use rota_id::{GenerationId, PersonId, ShiftId};
use serde::{Deserialize, Serialize};

/// One period's assignment map. A person absent from the map is off for
/// that period; no sentinel shift id exists. `BTreeMap` keeps iteration in
/// stable identifier order, which the rotation baseline relies on.
pub type Assignments = BTreeMap<PersonId, ShiftId>;

/// A roster member.
///
/// `fixed_shift` pins the person to one shift and removes them from the
/// rotation pool entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_shift: Option<ShiftId>,
}

impl Person {
    /// True when the person participates in automatic rotation.
    pub fn rotates(&self) -> bool {
        self.fixed_shift.is_none()
    }
}

/// A shift definition from the reference table.
///
/// Editing a definition changes how future periods render and validate;
/// historical assignment maps keep referencing the same id untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub id: ShiftId,
    pub name: String,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    /// Rotation order. Slot categories resolve onto shifts sorted by this.
    pub sequence: u32,
    pub min_team: u32,
    pub max_team: u32,
    /// Two consecutive periods on extreme shifts for the same person is
    /// disallowed by policy (advisory).
    pub extreme: bool,
    pub color: String,
}

/// A manual pairwise swap applied to a generation after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub person_a: PersonId,
    pub person_b: PersonId,
}

/// One generated rota period.
///
/// `roster` snapshots the team at generation time so later roster edits do
/// not corrupt historical display or validation. The assignment map only
/// references ids present in that snapshot and in the shift table as of
/// generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodGeneration {
    pub id: GenerationId,
    pub start_date: NaiveDate,
    pub assignments: Assignments,
    pub roster: Vec<Person>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub swaps: Vec<SwapRecord>,
}

impl PeriodGeneration {
    /// Looks up a roster-snapshot member.
    pub fn member(&self, person: PersonId) -> Option<&Person> {
        self.roster.iter().find(|p| p.id == person)
    }
}

/// A single weekend duty day, tied to the generation whose month it
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendAssignment {
    pub date: NaiveDate,
    pub person: PersonId,
    pub generation: GenerationId,
}

/// Derived per-person streak: the shift held for the most recent unbroken
/// run of periods, and the run length. Never persisted; recomputed from
/// history on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakEntry {
    pub shift: Option<ShiftId>,
    pub count: u32,
}

impl StreakEntry {
    /// The empty streak, for people with no assignment history.
    pub const NONE: Self = Self {
        shift: None,
        count: 0,
    };
}
