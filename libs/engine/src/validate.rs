//! Constraint validation for proposed assignment maps.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use rota_id::{PersonId, ShiftId};

use crate::{Assignments, ShiftDefinition};

/// One advisory finding about a proposed assignment map.
///
/// Violations never block an operation; the caller decides whether to warn,
/// block, or ignore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Violation {
    /// More people on a shift than its `max_team` allows.
    OverCapacity {
        shift: ShiftId,
        count: u32,
        max: u32,
    },

    /// Fewer people on a shift than its `min_team` requires.
    UnderCapacity {
        shift: ShiftId,
        count: u32,
        min: u32,
    },

    /// The same person holds an extreme shift in two consecutive periods.
    ExtremeAdjacency {
        person: PersonId,
        previous_shift: ShiftId,
        proposed_shift: ShiftId,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OverCapacity { shift, count, max } => {
                write!(f, "shift {shift} has {count} assigned, max is {max}")
            }
            Violation::UnderCapacity { shift, count, min } => {
                write!(f, "shift {shift} has {count} assigned, min is {min}")
            }
            Violation::ExtremeAdjacency {
                person,
                previous_shift,
                proposed_shift,
            } => write!(
                f,
                "person {person} holds extreme shift {proposed_shift} right after extreme shift {previous_shift}"
            ),
        }
    }
}

/// Checks a proposed assignment map against capacity limits and the
/// extreme-adjacency rule.
///
/// Each check runs independently; nothing short-circuits. Pass the
/// previous period's assignments to get adjacency findings, `None` for a
/// first-ever period.
pub fn validate(
    proposed: &Assignments,
    shifts: &[ShiftDefinition],
    previous: Option<&Assignments>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut headcount: BTreeMap<ShiftId, u32> = BTreeMap::new();
    for shift in proposed.values() {
        *headcount.entry(*shift).or_default() += 1;
    }

    for shift in shifts {
        let count = headcount.get(&shift.id).copied().unwrap_or(0);
        if count > shift.max_team {
            violations.push(Violation::OverCapacity {
                shift: shift.id,
                count,
                max: shift.max_team,
            });
        }
        if count < shift.min_team {
            violations.push(Violation::UnderCapacity {
                shift: shift.id,
                count,
                min: shift.min_team,
            });
        }
    }

    if let Some(previous) = previous {
        let extreme: Vec<ShiftId> = shifts.iter().filter(|s| s.extreme).map(|s| s.id).collect();
        for (person, proposed_shift) in proposed {
            let Some(previous_shift) = previous.get(person) else {
                continue;
            };
            if extreme.contains(previous_shift) && extreme.contains(proposed_shift) {
                violations.push(Violation::ExtremeAdjacency {
                    person: *person,
                    previous_shift: *previous_shift,
                    proposed_shift: *proposed_shift,
                });
            }
        }
    }

    violations
}
