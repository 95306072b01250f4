//! Assignment generation: initial, subsequent, and the weekend track.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use rota_id::{GenerationId, PersonId, ShiftId};

use crate::slots::{derive_slots, resolve_slot_shifts};
use crate::streak::compute_streaks;
use crate::{
    Assignments, EngineError, PeriodGeneration, Person, RotationPolicy, ShiftDefinition,
    WeekendAssignment,
};

/// Generates the first-ever period's assignments.
///
/// Eligible (non-fixed) people are shuffled with the caller's `rng` purely
/// to break first-ever ordering bias; no fairness property rides on it.
/// Fixed-shift people are merged in with their pinned shift and each pin
/// consumes one matching slot from the derived list. An empty roster
/// produces an empty map.
pub fn generate_initial<R: Rng + ?Sized>(
    people: &[Person],
    shifts: &[ShiftDefinition],
    rng: &mut R,
) -> Result<Assignments, EngineError> {
    if people.is_empty() {
        return Ok(Assignments::new());
    }

    let mut eligible: Vec<&Person> = people.iter().filter(|p| p.rotates()).collect();
    eligible.shuffle(rng);

    let (assignments, _) = assemble(people, &eligible, shifts)?;
    debug!(team = people.len(), "generated initial period");
    Ok(assignments)
}

/// Generates the next period from history.
///
/// Eligible people are ordered by stable identifier, then the order is
/// rotated one position per recorded period (first person to the back each
/// time), simulating a round-robin queue that advances once per period.
/// That rotation is the only guaranteed behavior; on top of it, a
/// best-effort pass relieves anyone about to extend a streak on an extreme
/// shift (see [`RotationPolicy`] for the calendar knobs). Returns the new
/// assignments with the next period's start date.
pub fn generate_next(
    people: &[Person],
    shifts: &[ShiftDefinition],
    history: &[PeriodGeneration],
    policy: &RotationPolicy,
) -> Result<(Assignments, NaiveDate), EngineError> {
    let previous = history
        .iter()
        .max_by_key(|g| g.start_date)
        .ok_or(EngineError::EmptyHistory)?;

    let next_start = previous.start_date + chrono::Days::new(u64::from(policy.period_days));
    if next_start.weekday() != policy.week_start {
        return Err(EngineError::MisalignedStartDate {
            date: next_start,
            expected: policy.week_start,
        });
    }

    if people.is_empty() {
        return Ok((Assignments::new(), next_start));
    }

    let mut eligible: Vec<&Person> = people.iter().filter(|p| p.rotates()).collect();
    eligible.sort_by_key(|p| p.id);
    if !eligible.is_empty() {
        let rotate_by = history.len() % eligible.len();
        eligible.rotate_left(rotate_by);
    }

    let (mut assignments, rotation) = assemble(people, &eligible, shifts)?;
    relieve_extreme_runs(&mut assignments, &rotation, people, shifts, history, previous);

    debug!(
        team = people.len(),
        start = %next_start,
        "generated next period"
    );
    Ok((assignments, next_start))
}

/// Builds the assignment map for an already-ordered eligible list.
///
/// Slots are derived for the full team size; each fixed pin removes one
/// matching slot; eligible people then take the remaining slots
/// cyclically (wrapping when people outnumber slots). Also returns the
/// `(person, shift)` pairs in rotation order for downstream refinement.
fn assemble(
    people: &[Person],
    ordered_eligible: &[&Person],
    shifts: &[ShiftDefinition],
) -> Result<(Assignments, Vec<(PersonId, ShiftId)>), EngineError> {
    let slots = derive_slots(people.len());
    let mut slot_shifts = resolve_slot_shifts(&slots, shifts)?;

    let mut assignments = Assignments::new();
    for person in people.iter().filter(|p| !p.rotates()) {
        let Some(pinned) = person.fixed_shift else {
            continue;
        };
        if !shifts.iter().any(|s| s.id == pinned) {
            return Err(EngineError::UnknownShift(pinned));
        }
        assignments.insert(person.id, pinned);
        if let Some(taken) = slot_shifts.iter().position(|s| *s == pinned) {
            slot_shifts.remove(taken);
        }
    }

    let mut rotation = Vec::with_capacity(ordered_eligible.len());
    for (index, person) in ordered_eligible.iter().enumerate() {
        let shift = slot_shifts[index % slot_shifts.len()];
        assignments.insert(person.id, shift);
        rotation.push((person.id, shift));
    }

    Ok((assignments, rotation))
}

/// Best-effort streak relief.
///
/// Anyone whose new shift is extreme and matches their current streak
/// shift trades places with the nearest rotation neighbour holding a
/// non-extreme shift, provided the trade hands the neighbour no extreme
/// adjacency and extends no run of theirs. Failing to find a partner
/// leaves the baseline rotation untouched.
fn relieve_extreme_runs(
    assignments: &mut Assignments,
    rotation: &[(PersonId, ShiftId)],
    people: &[Person],
    shifts: &[ShiftDefinition],
    history: &[PeriodGeneration],
    previous: &PeriodGeneration,
) {
    let extreme: BTreeSet<ShiftId> = shifts.iter().filter(|s| s.extreme).map(|s| s.id).collect();
    if extreme.is_empty() {
        return;
    }

    let streaks = compute_streaks(people, history);
    let mut pairs: Vec<(PersonId, ShiftId)> = rotation.to_vec();
    let len = pairs.len();

    for i in 0..len {
        let (person, shift) = pairs[i];
        if !extreme.contains(&shift) {
            continue;
        }
        let Some(streak) = streaks.get(&person) else {
            continue;
        };
        if streak.shift != Some(shift) {
            continue;
        }

        let partner = (1..len).find_map(|distance| {
            [(i + distance) % len, (i + len - distance) % len]
                .into_iter()
                .find(|&j| {
                    let (candidate, candidate_shift) = pairs[j];
                    if extreme.contains(&candidate_shift) {
                        return false;
                    }
                    // Trading hands the candidate the extreme shift; skip
                    // anyone that would pick up an adjacency or a longer run.
                    if let Some(prev) = previous.assignments.get(&candidate) {
                        if extreme.contains(prev) {
                            return false;
                        }
                    }
                    streaks.get(&candidate).map(|s| s.shift) != Some(Some(shift))
                })
        });

        if let Some(j) = partner {
            let traded = pairs[j].1;
            pairs[j].1 = shift;
            pairs[i].1 = traded;
            assignments.insert(pairs[j].0, shift);
            assignments.insert(person, traded);
            debug!(%person, relieved_from = %shift, "relieved extreme streak");
        }
    }
}

/// Generates the weekend duty track for one calendar month.
///
/// Every weekend day in `(year, month)` is assigned round-robin over
/// eligible people sorted by stable identifier. The starting offset is
/// derived from the month index so successive months do not always open
/// with the same person. Month granularity matches how the store deletes
/// the track.
pub fn generate_weekend_month(
    people: &[Person],
    generation: GenerationId,
    year: i32,
    month: u32,
    policy: &RotationPolicy,
) -> Vec<WeekendAssignment> {
    let mut eligible: Vec<&Person> = people.iter().filter(|p| p.rotates()).collect();
    eligible.sort_by_key(|p| p.id);
    if eligible.is_empty() {
        return Vec::new();
    }

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut days = Vec::new();
    let mut date = first;
    while date.month() == month {
        if policy.is_weekend_day(date.weekday()) {
            days.push(date);
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    let offset = (i64::from(year) * 12 + i64::from(month) - 1)
        .rem_euclid(eligible.len() as i64) as usize;

    days.into_iter()
        .enumerate()
        .map(|(i, date)| WeekendAssignment {
            date,
            person: eligible[(offset + i) % eligible.len()].id,
            generation,
        })
        .collect()
}
