//! Detection of manual swaps that later rotation coincidentally undoes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rota_id::{GenerationId, PersonId};

use crate::{PeriodGeneration, ShiftDefinition};

/// An actionable "swap back" finding.
///
/// The engine only reports; applying [`crate::swap_period`] on the active
/// generation is the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationOpportunity {
    pub person_a: PersonId,
    pub person_b: PersonId,
    /// The generation whose manual swap this opportunity reconciles.
    pub origin: GenerationId,
    pub origin_date: NaiveDate,
}

/// Scans history for a manual swap whose effect the active period's
/// natural rotation has coincidentally reversed.
///
/// A two-way swap is its own inverse, so each swapped person's "natural"
/// shift in the origin period is exactly the other person's recorded
/// post-swap shift. An opportunity exists when the active assignments pair
/// the two people with those recorded shifts again — in either arrangement:
/// crossed (the rotation already swapped them back) or straight (one more
/// swap now restores the long-run distribution).
///
/// Only the first recorded swap of each generation is considered; later
/// swaps in the same generation are never reconciled. See DESIGN.md for
/// the open question on multi-swap periods.
pub fn find_cancellation_opportunity(
    active: &PeriodGeneration,
    history: &[PeriodGeneration],
    shifts: &[ShiftDefinition],
) -> Option<CancellationOpportunity> {
    for origin in history {
        if origin.id == active.id {
            continue;
        }
        let Some(swap) = origin.swaps.first() else {
            continue;
        };
        let (a, b) = (swap.person_a, swap.person_b);

        let (Some(recorded_a), Some(recorded_b)) =
            (origin.assignments.get(&a), origin.assignments.get(&b))
        else {
            continue;
        };
        if recorded_a == recorded_b {
            continue;
        }
        // A shift deleted since the origin period can no longer be offered.
        if !shifts.iter().any(|s| s.id == *recorded_a)
            || !shifts.iter().any(|s| s.id == *recorded_b)
        {
            continue;
        }

        let current_a = active.assignments.get(&a);
        let current_b = active.assignments.get(&b);

        let crossed = current_a == Some(recorded_b) && current_b == Some(recorded_a);
        let straight = current_a == Some(recorded_a) && current_b == Some(recorded_b);

        if crossed || straight {
            debug!(
                %a, %b,
                origin = %origin.id,
                crossed,
                "found cancellation opportunity"
            );
            return Some(CancellationOpportunity {
                person_a: a,
                person_b: b,
                origin: origin.id,
                origin_date: origin.start_date,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{period_with_roster, person, shift};
    use crate::SwapRecord;

    #[test]
    fn test_detects_natural_swap_back() {
        let apac = shift("apac", 0);
        let us = shift("us", 1);
        let emea = shift("emea", 2);
        let shifts = vec![apac.clone(), us.clone(), emea.clone()];

        let bob = person("Bob");
        let carol = person("Carol");
        let roster = vec![bob.clone(), carol.clone()];

        // G1: post-swap Bob holds "apac", Carol holds "emea".
        let mut g1 = period_with_roster(0, &roster, &[(&bob, &apac), (&carol, &emea)]);
        g1.swaps.push(SwapRecord {
            person_a: bob.id,
            person_b: carol.id,
        });

        let g2 = period_with_roster(1, &roster, &[(&bob, &us), (&carol, &apac)]);

        // G3: rotation lands Bob on "emea" and Carol on "apac" — each on
        // the other's recorded shift.
        let g3 = period_with_roster(2, &roster, &[(&bob, &emea), (&carol, &apac)]);

        let history = vec![g1.clone(), g2, g3.clone()];
        let opportunity = find_cancellation_opportunity(&g3, &history, &shifts).unwrap();
        assert_eq!(opportunity.person_a, bob.id);
        assert_eq!(opportunity.person_b, carol.id);
        assert_eq!(opportunity.origin, g1.id);
        assert_eq!(opportunity.origin_date, g1.start_date);
    }

    #[test]
    fn test_detects_straight_repeat() {
        let apac = shift("apac", 0);
        let emea = shift("emea", 2);
        let shifts = vec![apac.clone(), emea.clone()];

        let bob = person("Bob");
        let carol = person("Carol");
        let roster = vec![bob.clone(), carol.clone()];

        let mut g1 = period_with_roster(0, &roster, &[(&bob, &apac), (&carol, &emea)]);
        g1.swaps.push(SwapRecord {
            person_a: bob.id,
            person_b: carol.id,
        });

        // Active period repeats the recorded arrangement exactly; one more
        // swap restores the natural distribution.
        let active = period_with_roster(3, &roster, &[(&bob, &apac), (&carol, &emea)]);

        let history = vec![g1.clone(), active.clone()];
        let opportunity = find_cancellation_opportunity(&active, &history, &shifts).unwrap();
        assert_eq!(opportunity.origin, g1.id);
    }

    #[test]
    fn test_no_swaps_no_opportunity() {
        let apac = shift("apac", 0);
        let bob = person("Bob");
        let g1 = period_with_roster(0, &[bob.clone()], &[(&bob, &apac)]);
        let active = period_with_roster(1, &[bob.clone()], &[(&bob, &apac)]);

        let history = vec![g1, active.clone()];
        assert!(
            find_cancellation_opportunity(&active, &history, std::slice::from_ref(&apac)).is_none()
        );
    }

    #[test]
    fn test_active_generation_is_excluded() {
        let apac = shift("apac", 0);
        let emea = shift("emea", 2);
        let shifts = vec![apac.clone(), emea.clone()];
        let bob = person("Bob");
        let carol = person("Carol");
        let roster = vec![bob.clone(), carol.clone()];

        let mut active = period_with_roster(0, &roster, &[(&bob, &apac), (&carol, &emea)]);
        active.swaps.push(SwapRecord {
            person_a: bob.id,
            person_b: carol.id,
        });

        let history = vec![active.clone()];
        assert!(find_cancellation_opportunity(&active, &history, &shifts).is_none());
    }

    #[test]
    fn test_unrelated_current_assignments_no_opportunity() {
        let apac = shift("apac", 0);
        let us = shift("us", 1);
        let emea = shift("emea", 2);
        let shifts = vec![apac.clone(), us.clone(), emea.clone()];
        let bob = person("Bob");
        let carol = person("Carol");
        let roster = vec![bob.clone(), carol.clone()];

        let mut g1 = period_with_roster(0, &roster, &[(&bob, &apac), (&carol, &emea)]);
        g1.swaps.push(SwapRecord {
            person_a: bob.id,
            person_b: carol.id,
        });

        // Bob moved to "us": neither arrangement matches.
        let active = period_with_roster(1, &roster, &[(&bob, &us), (&carol, &apac)]);

        let history = vec![g1, active.clone()];
        assert!(find_cancellation_opportunity(&active, &history, &shifts).is_none());
    }

    #[test]
    fn test_only_first_swap_of_a_generation_is_reconciled() {
        let apac = shift("apac", 0);
        let us = shift("us", 1);
        let emea = shift("emea", 2);
        let night = shift("night", 3);
        let shifts = vec![apac.clone(), us.clone(), emea.clone(), night.clone()];

        let bob = person("Bob");
        let carol = person("Carol");
        let dave = person("Dave");
        let erin = person("Erin");
        let roster = vec![bob.clone(), carol.clone(), dave.clone(), erin.clone()];

        let mut g1 = period_with_roster(
            0,
            &roster,
            &[
                (&bob, &apac),
                (&carol, &emea),
                (&dave, &us),
                (&erin, &night),
            ],
        );
        g1.swaps.push(SwapRecord {
            person_a: bob.id,
            person_b: carol.id,
        });
        g1.swaps.push(SwapRecord {
            person_a: dave.id,
            person_b: erin.id,
        });

        // Active period reverses only the SECOND swap's pair; the first
        // pair's arrangement matches nothing.
        let active = period_with_roster(
            1,
            &roster,
            &[
                (&bob, &us),
                (&carol, &apac),
                (&dave, &night),
                (&erin, &us),
            ],
        );

        let history = vec![g1, active.clone()];
        assert!(find_cancellation_opportunity(&active, &history, &shifts).is_none());
    }
}
