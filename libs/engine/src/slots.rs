//! Shift slot derivation from team size.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ShiftDefinition};
use rota_id::ShiftId;

/// Category tag for one slot in a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCategory {
    PrimaryA,
    PrimaryB,
    Secondary,
    Overflow,
}

/// Derives the slot sequence for a team of `team_size` people.
///
/// One `PrimaryA` and one `PrimaryB`; one `Secondary` up to a team of 5,
/// two beyond that; everything left over is `Overflow`. The output always
/// has exactly `team_size` entries — the fixed prefix truncates for tiny
/// teams, and a team of zero gets an empty sequence.
pub fn derive_slots(team_size: usize) -> Vec<SlotCategory> {
    let mut slots = vec![
        SlotCategory::PrimaryA,
        SlotCategory::PrimaryB,
        SlotCategory::Secondary,
    ];
    if team_size > 5 {
        slots.push(SlotCategory::Secondary);
    }

    slots.truncate(team_size);
    while slots.len() < team_size {
        slots.push(SlotCategory::Overflow);
    }
    slots
}

/// Resolves a slot sequence onto concrete shifts.
///
/// Shifts are taken in `sequence` order: `PrimaryA` resolves to the first,
/// `PrimaryB` to the second, `Secondary` to the third, and `Overflow` slots
/// cycle through whatever comes after (the last shift when nothing does).
/// A table with fewer than three shifts clamps onto its last entry rather
/// than failing; only an empty table is an error.
pub fn resolve_slot_shifts(
    slots: &[SlotCategory],
    shifts: &[ShiftDefinition],
) -> Result<Vec<ShiftId>, EngineError> {
    if slots.is_empty() {
        return Ok(Vec::new());
    }
    if shifts.is_empty() {
        return Err(EngineError::NoShiftsDefined);
    }

    let mut ordered: Vec<&ShiftDefinition> = shifts.iter().collect();
    ordered.sort_by_key(|s| s.sequence);
    let last = ordered.len() - 1;

    let mut overflow_seen = 0usize;
    let resolved = slots
        .iter()
        .map(|slot| {
            let index = match slot {
                SlotCategory::PrimaryA => 0,
                SlotCategory::PrimaryB => 1.min(last),
                SlotCategory::Secondary => 2.min(last),
                SlotCategory::Overflow => {
                    let extra = ordered.len().saturating_sub(3);
                    let index = if extra == 0 {
                        last
                    } else {
                        3 + overflow_seen % extra
                    };
                    overflow_seen += 1;
                    index
                }
            };
            ordered[index].id
        })
        .collect();

    Ok(resolved)
}
