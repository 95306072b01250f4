//! Per-person streak tracking over assignment history.

use std::collections::BTreeMap;

use rota_id::PersonId;

use crate::{PeriodGeneration, Person, StreakEntry};

/// Computes every person's current same-shift streak.
///
/// History is walked newest-to-oldest per person: an unbroken run of equal
/// assignments increments the streak; the first change of shift or gap (a
/// period with no assignment) ends the walk. A person with no assignment in
/// the newest period therefore has the empty streak, whatever came before.
///
/// Pure read-side view. Recomputed wherever fairness input is needed; the
/// result must not be cached across a history mutation.
pub fn compute_streaks(
    people: &[Person],
    history: &[PeriodGeneration],
) -> BTreeMap<PersonId, StreakEntry> {
    let mut newest_first: Vec<&PeriodGeneration> = history.iter().collect();
    newest_first.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    people
        .iter()
        .map(|person| {
            let mut entry = StreakEntry::NONE;
            for period in &newest_first {
                match period.assignments.get(&person.id) {
                    Some(shift) if entry.shift.is_none() => {
                        entry = StreakEntry {
                            shift: Some(*shift),
                            count: 1,
                        };
                    }
                    Some(shift) if entry.shift == Some(*shift) => {
                        entry.count += 1;
                    }
                    _ => break,
                }
            }
            (person.id, entry)
        })
        .collect()
}
