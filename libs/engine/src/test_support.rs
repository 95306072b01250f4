//! Shared fixtures for unit tests.

use chrono::{NaiveDate, NaiveTime};

use rota_id::{GenerationId, PersonId};

use crate::{Assignments, PeriodGeneration, Person, ShiftDefinition};

pub fn person(name: &str) -> Person {
    Person {
        id: PersonId::new(),
        name: name.to_string(),
        fixed_shift: None,
    }
}

pub fn fixed_person(name: &str, shift: &ShiftDefinition) -> Person {
    Person {
        id: PersonId::new(),
        name: name.to_string(),
        fixed_shift: Some(shift.id),
    }
}

pub fn shift(name: &str, sequence: u32) -> ShiftDefinition {
    shift_with(name, sequence, 0, 4, false)
}

pub fn shift_with(
    name: &str,
    sequence: u32,
    min_team: u32,
    max_team: u32,
    extreme: bool,
) -> ShiftDefinition {
    ShiftDefinition {
        id: rota_id::ShiftId::new(),
        name: name.to_string(),
        starts_at: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        ends_at: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        sequence,
        min_team,
        max_team,
        extreme,
        color: "#7d8ca3".to_string(),
    }
}

/// Monday of the given week, counted from an arbitrary fixed epoch.
pub fn monday(week: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap() + chrono::Days::new(7 * u64::from(week))
}

/// A period whose roster is exactly the assigned people.
pub fn period(week: u32, entries: &[(&Person, &ShiftDefinition)]) -> PeriodGeneration {
    let roster: Vec<Person> = entries.iter().map(|(p, _)| (*p).clone()).collect();
    period_with_roster(week, &roster, entries)
}

/// A period with an explicit roster snapshot (e.g. to include off people).
pub fn period_with_roster(
    week: u32,
    roster: &[Person],
    entries: &[(&Person, &ShiftDefinition)],
) -> PeriodGeneration {
    let assignments: Assignments = entries.iter().map(|(p, s)| (p.id, s.id)).collect();
    PeriodGeneration {
        id: GenerationId::new(),
        start_date: monday(week),
        assignments,
        roster: roster.to_vec(),
        swaps: Vec::new(),
    }
}
