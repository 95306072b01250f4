//! End-to-end rota lifecycle against a real (in-memory) store:
//! seed reference tables → initial generation → rotate period by period →
//! manual swap → cancellation detection → swap back → weekend track.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rota_engine::{
    find_cancellation_opportunity, generate_initial, generate_next, generate_weekend_month,
    swap_period_checked, swap_weekend, validate, PeriodGeneration, Person, RotationPolicy,
    ShiftDefinition,
};
use rota_id::{GenerationId, PersonId, ShiftId};
use rota_store::RotaStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn coverage_shift(name: &str, sequence: u32) -> ShiftDefinition {
    ShiftDefinition {
        id: ShiftId::new(),
        name: name.to_string(),
        starts_at: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        ends_at: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        sequence,
        min_team: 0,
        max_team: 2,
        extreme: false,
        color: "#4c51bf".to_string(),
    }
}

fn seed_store(store: &RotaStore) -> (Vec<Person>, Vec<ShiftDefinition>) {
    let shifts = vec![
        coverage_shift("apac", 0),
        coverage_shift("us", 1),
        coverage_shift("emea", 2),
        coverage_shift("night", 3),
    ];
    for shift in &shifts {
        store.upsert_shift(shift).unwrap();
    }

    let us = shifts[1].id;
    let mut people = vec![
        Person {
            id: PersonId::new(),
            name: "Alice".to_string(),
            fixed_shift: Some(us),
        },
        Person {
            id: PersonId::new(),
            name: "Bob".to_string(),
            fixed_shift: None,
        },
        Person {
            id: PersonId::new(),
            name: "Carol".to_string(),
            fixed_shift: None,
        },
        Person {
            id: PersonId::new(),
            name: "Dave".to_string(),
            fixed_shift: None,
        },
    ];
    people.sort_by_key(|p| p.id);
    for person in &people {
        store.upsert_person(person).unwrap();
    }

    (people, store.list_shifts().unwrap())
}

fn monday(week: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap() + chrono::Days::new(7 * u64::from(week))
}

/// Generates the next period from the store's state and appends it.
fn advance(store: &mut RotaStore) -> PeriodGeneration {
    let people = store.list_people().unwrap();
    let shifts = store.list_shifts().unwrap();
    let history = store.list_generations().unwrap();
    let policy = store.policy().clone();

    let (assignments, start_date) =
        generate_next(&people, &shifts, &history, &policy).expect("generation");
    let previous = history.last().map(|g| &g.assignments);
    assert!(
        validate(&assignments, &shifts, previous).is_empty(),
        "generated period should be violation-free"
    );

    let generation = PeriodGeneration {
        id: GenerationId::new(),
        start_date,
        assignments,
        roster: people,
        swaps: Vec::new(),
    };
    store.append_generation(&generation).unwrap();
    generation
}

#[test]
fn full_rotation_lifecycle() {
    init_tracing();
    let mut store = RotaStore::open_in_memory(RotationPolicy::default()).unwrap();
    let (people, shifts) = seed_store(&store);
    let alice = people.iter().find(|p| p.name == "Alice").unwrap().clone();
    let us = shifts[1].id;

    // --- Initial period ---------------------------------------------------
    let mut rng = StdRng::seed_from_u64(2026);
    let assignments = generate_initial(&people, &shifts, &mut rng).expect("initial generation");
    assert_eq!(assignments.len(), people.len());
    assert_eq!(assignments[&alice.id], us);

    let g0 = PeriodGeneration {
        id: GenerationId::new(),
        start_date: monday(0),
        assignments,
        roster: people.clone(),
        swaps: Vec::new(),
    };
    store.append_generation(&g0).unwrap();

    // --- Rotate two more periods -----------------------------------------
    let g1 = advance(&mut store);
    let g2 = advance(&mut store);
    assert_eq!(g1.start_date, monday(1));
    assert_eq!(g2.start_date, monday(2));
    assert_eq!(g2.assignments[&alice.id], us, "fixed pin survives rotation");
    assert_ne!(
        g1.assignments, g2.assignments,
        "rotation must advance between periods"
    );

    // --- Manual swap on the current period --------------------------------
    // Swap whoever holds apac with whoever holds emea this period.
    let apac = shifts[0].id;
    let emea = shifts[2].id;
    let on_apac = *g2
        .assignments
        .iter()
        .find(|(_, s)| **s == apac)
        .map(|(p, _)| p)
        .unwrap();
    let on_emea = *g2
        .assignments
        .iter()
        .find(|(_, s)| **s == emea)
        .map(|(p, _)| p)
        .unwrap();

    let previous = store.get_generation(g1.id).unwrap().unwrap().assignments;
    let outcome =
        swap_period_checked(&g2, on_apac, on_emea, &shifts, Some(&previous)).expect("swap");
    assert!(outcome.violations.is_empty());
    store
        .replace_assignments(g2.id, &outcome.assignments)
        .unwrap();
    store.record_swap(g2.id, on_apac, on_emea).unwrap();

    let g2 = store.get_generation(g2.id).unwrap().unwrap();
    assert_eq!(g2.assignments[&on_apac], emea);
    assert_eq!(g2.assignments[&on_emea], apac);
    assert_eq!(g2.swaps.len(), 1);

    // --- Rotation runs on; the swap is not reversed yet -------------------
    let g3 = advance(&mut store);
    let history = store.list_generations().unwrap();
    assert!(find_cancellation_opportunity(&g3, &history, &shifts).is_none());

    let g4 = advance(&mut store);
    let history = store.list_generations().unwrap();
    assert!(find_cancellation_opportunity(&g4, &history, &shifts).is_none());

    // --- Three periods after the swap the rotation repeats itself ---------
    // and lands the pair exactly crosswise to the recorded state.
    let g5 = advance(&mut store);
    let history = store.list_generations().unwrap();
    let opportunity = find_cancellation_opportunity(&g5, &history, &shifts)
        .expect("rotation should have coincidentally reversed the manual swap");
    assert_eq!(opportunity.origin, g2.id);
    assert_eq!(opportunity.origin_date, g2.start_date);
    let pair = [opportunity.person_a, opportunity.person_b];
    assert!(pair.contains(&on_apac) && pair.contains(&on_emea));

    // --- Operator applies the suggested swap back -------------------------
    let previous = store.get_generation(g4.id).unwrap().unwrap().assignments;
    let outcome = swap_period_checked(
        &g5,
        opportunity.person_a,
        opportunity.person_b,
        &shifts,
        Some(&previous),
    )
    .expect("swap back");
    store
        .replace_assignments(g5.id, &outcome.assignments)
        .unwrap();
    store
        .record_swap(g5.id, opportunity.person_a, opportunity.person_b)
        .unwrap();

    let g5 = store.get_generation(g5.id).unwrap().unwrap();
    assert_eq!(g5.assignments[&on_apac], g2.assignments[&on_apac]);
    assert_eq!(g5.assignments[&on_emea], g2.assignments[&on_emea]);
}

#[test]
fn weekend_track_lifecycle() {
    init_tracing();
    let mut store = RotaStore::open_in_memory(RotationPolicy::default()).unwrap();
    let (people, _) = seed_store(&store);
    let policy = store.policy().clone();
    let generation = GenerationId::new();

    // January 2026 has 9 weekend days (Sat Jan 3 through Sat Jan 31).
    let duty = generate_weekend_month(&people, generation, 2026, 1, &policy);
    assert_eq!(duty.len(), 9);
    for wa in &duty {
        assert!(policy.is_weekend_day(wa.date.weekday()));
        // Fixed-shift people stay off the weekend track.
        let person = people.iter().find(|p| p.id == wa.person).unwrap();
        assert!(person.rotates());
    }
    store.append_weekend(&duty).unwrap();

    // Exchange two people's full patterns.
    let eligible: Vec<_> = people.iter().filter(|p| p.rotates()).collect();
    let (a, b) = (eligible[0].id, eligible[1].id);
    let stored = store.list_weekend_for(generation).unwrap();
    let swapped = swap_weekend(&stored, generation, a, b);
    store.replace_weekend_for(generation, &swapped).unwrap();

    let reloaded = store.list_weekend_for(generation).unwrap();
    for (before, after) in stored.iter().zip(&reloaded) {
        assert_eq!(before.date, after.date);
        if before.person == a {
            assert_eq!(after.person, b);
        } else if before.person == b {
            assert_eq!(after.person, a);
        } else {
            assert_eq!(after.person, before.person);
        }
    }

    // Month granularity deletion clears the track.
    assert_eq!(store.delete_weekend_month(2026, 1).unwrap(), 9);
    assert!(store.list_weekend_for(generation).unwrap().is_empty());
}
