//! Manual corrective actions: pairwise swaps and direct edits.

use tracing::debug;

use rota_id::{GenerationId, PersonId, ShiftId};

use crate::validate::validate;
use crate::{
    Assignments, EngineError, PeriodGeneration, ShiftDefinition, Violation, WeekendAssignment,
};

/// Result of a checked mutation: the updated map plus whatever the
/// validator found. Violations are advisory; the caller decides whether to
/// warn the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub assignments: Assignments,
    pub violations: Vec<Violation>,
}

/// Exchanges two people's entries for a single period.
///
/// A missing entry swaps too: the counterpart ends up off, which makes the
/// operation its own inverse for any pair of distinct people.
pub fn swap_period(assignments: &Assignments, a: PersonId, b: PersonId) -> Assignments {
    let mut next = assignments.clone();
    let from_a = next.remove(&a);
    let from_b = next.remove(&b);
    if let Some(shift) = from_b {
        next.insert(a, shift);
    }
    if let Some(shift) = from_a {
        next.insert(b, shift);
    }
    next
}

/// [`swap_period`] with precondition checks and re-validation.
///
/// Both people must exist in the generation's roster snapshot and neither
/// may hold a fixed shift — fixed people are not swap-eligible and callers
/// are expected to pre-check, so a violation here is a descriptive
/// rejection rather than a recoverable state.
pub fn swap_period_checked(
    generation: &PeriodGeneration,
    a: PersonId,
    b: PersonId,
    shifts: &[ShiftDefinition],
    previous: Option<&Assignments>,
) -> Result<SwapOutcome, EngineError> {
    for person in [a, b] {
        let member = generation
            .member(person)
            .ok_or(EngineError::UnknownPerson(person))?;
        if !member.rotates() {
            return Err(EngineError::FixedShiftSwap(person));
        }
    }

    let assignments = swap_period(&generation.assignments, a, b);
    let violations = validate(&assignments, shifts, previous);
    debug!(%a, %b, generation = %generation.id, violations = violations.len(), "swapped pair");
    Ok(SwapOutcome {
        assignments,
        violations,
    })
}

/// Exchanges two people's entire weekend duty patterns within one
/// generation. Every date held by `a` goes to `b` and vice versa; other
/// generations' assignments pass through untouched.
pub fn swap_weekend(
    weekend: &[WeekendAssignment],
    generation: GenerationId,
    a: PersonId,
    b: PersonId,
) -> Vec<WeekendAssignment> {
    weekend
        .iter()
        .map(|wa| {
            if wa.generation != generation {
                return *wa;
            }
            let person = if wa.person == a {
                b
            } else if wa.person == b {
                a
            } else {
                wa.person
            };
            WeekendAssignment { person, ..*wa }
        })
        .collect()
}

/// Replaces one person's assignment directly, no exchange semantics.
pub fn edit_assignment(
    generation: &PeriodGeneration,
    person: PersonId,
    new_shift: ShiftId,
    shifts: &[ShiftDefinition],
    previous: Option<&Assignments>,
) -> Result<SwapOutcome, EngineError> {
    generation
        .member(person)
        .ok_or(EngineError::UnknownPerson(person))?;
    if !shifts.iter().any(|s| s.id == new_shift) {
        return Err(EngineError::UnknownShift(new_shift));
    }

    let mut assignments = generation.assignments.clone();
    assignments.insert(person, new_shift);
    let violations = validate(&assignments, shifts, previous);
    Ok(SwapOutcome {
        assignments,
        violations,
    })
}

/// Replaces a generation's whole assignment map.
///
/// Every id in the new map must resolve against the roster snapshot and
/// the shift table; an unresolved id rejects the edit outright rather than
/// letting a corrupt map into history.
pub fn edit_full_period(
    generation: &PeriodGeneration,
    new_assignments: Assignments,
    shifts: &[ShiftDefinition],
    previous: Option<&Assignments>,
) -> Result<SwapOutcome, EngineError> {
    for (person, shift) in &new_assignments {
        if generation.member(*person).is_none() {
            return Err(EngineError::UnknownPerson(*person));
        }
        if !shifts.iter().any(|s| s.id == *shift) {
            return Err(EngineError::UnknownShift(*shift));
        }
    }

    let violations = validate(&new_assignments, shifts, previous);
    Ok(SwapOutcome {
        assignments: new_assignments,
        violations,
    })
}
