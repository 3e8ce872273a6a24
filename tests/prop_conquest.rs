//! Property-based tests for the ledger and the conquest rules.
//!
//! Run with: cargo test --release prop_conquest

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_wrap)]

use proptest::prelude::*;

use invaders::game::{
    attempt_capture, check_invariants, reachable_fields, Accessibility, AnswerRecord, CaptureError, Coord, Field,
    GameState, GradingStatus, Grid, Ledger, ProblemNumber, Shortfall, Team,
};

const TS: &str = "01/11/2020 10:00:00";

fn c(x: i64, y: i64) -> Coord {
    Coord::new(x, y).unwrap()
}

fn coord_strategy() -> impl Strategy<Value = Coord> {
    (1i64..=9, 1i64..=9).prop_map(|(x, y)| c(x, y))
}

fn access_strategy() -> impl Strategy<Value = Accessibility> {
    prop_oneof![
        3 => Just(Accessibility::Open),
        1 => Just(Accessibility::Closed),
        1 => (0u8..2).prop_map(Accessibility::Restricted),
    ]
}

/// A two-team board with random weights, access rules and initial owners.
fn state_strategy() -> impl Strategy<Value = GameState> {
    (
        prop::collection::vec((0u32..=15, access_strategy(), prop::option::of(0u8..2)), 81),
        coord_strategy(),
        coord_strategy(),
    )
        .prop_map(|(cells, home_a, home_b)| {
            let mut grid = Grid::new();
            for (i, (weight, access, owner)) in cells.into_iter().enumerate() {
                let coord = c(i as i64 / 9 + 1, i as i64 % 9 + 1);
                let mut field = Field::new(coord, weight, access);
                field.owner = owner;
                grid.set(field);
            }
            grid.field_mut(home_a).owner = Some(0);
            grid.field_mut(home_b).owner = Some(1);
            GameState::new(grid, vec![Team::new(0, "alpha", "Lions", 'A'), Team::new(1, "beta", "Tigers", 'B')])
        })
}

/// Grade every problem in `problems` correct for both teams.
fn grade_all(state: &mut GameState, problems: impl Iterator<Item = ProblemNumber> + Clone) {
    for team in 0..2 {
        let ledger = &mut state.team_mut(team).unwrap().ledger;
        for p in problems.clone() {
            ledger.apply_manual_grade(p, true, "", TS);
        }
    }
}

fn records(ledger: &Ledger) -> Vec<AnswerRecord> {
    ledger.records().cloned().collect()
}

fn fields(state: &GameState) -> Vec<Field> {
    state.grid().iter().copied().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every reachable field borders the team's territory, is not its own,
    /// carries weight, and admits the team.
    #[test]
    fn prop_reachability_sound(state in state_strategy()) {
        for team in 0..2u8 {
            let owned = state.team(team).unwrap().owned_fields();
            for coord in reachable_fields(&state, team) {
                prop_assert!(!owned.contains(&coord));
                prop_assert!(coord.neighbors().any(|n| owned.contains(&n)));
                prop_assert!(state.grid().field(coord).weight > 0);
                prop_assert!(state.grid().field(coord).accessibility.admits(team));
            }
        }
    }

    /// Random attack sequences keep field owners and owned sets in step, and
    /// a rejected attack leaves the state untouched.
    #[test]
    fn prop_ownership_consistent(
        mut state in state_strategy(),
        attacks in prop::collection::vec(
            (0u8..2, coord_strategy(), prop::collection::vec(1u16..=40, 0..4)),
            1..40,
        ),
    ) {
        grade_all(&mut state, (1..=34).step_by(2));
        prop_assert!(check_invariants(&state).is_empty());

        for (team, target, problems) in attacks {
            let before_fields = fields(&state);
            let before_ledgers: Vec<_> = state.teams().iter().map(|t| records(&t.ledger)).collect();

            match attempt_capture(&mut state, team, target, &problems) {
                Ok(capture) => {
                    prop_assert_eq!(state.grid().field(target).owner, Some(team));
                    prop_assert!(state.team(team).unwrap().owns(target));
                    if let Some(previous) = capture.previous_owner {
                        prop_assert!(!state.team(previous).unwrap().owns(target));
                    }
                }
                Err(_) => {
                    prop_assert_eq!(fields(&state), before_fields);
                    let after: Vec<_> = state.teams().iter().map(|t| records(&t.ledger)).collect();
                    prop_assert_eq!(after, before_ledgers);
                }
            }
            prop_assert!(check_invariants(&state).is_empty());
        }
    }

    /// The k-th capture of a field costs k problems.
    #[test]
    fn prop_escalating_cost(rounds in 1usize..=6) {
        let mut grid = Grid::new();
        for x in 1..=9 {
            for y in 1..=9 {
                grid.set(Field::new(c(x, y), 5, Accessibility::Open));
            }
        }
        grid.field_mut(c(1, 1)).owner = Some(0);
        grid.field_mut(c(1, 3)).owner = Some(1);
        let mut state = GameState::new(
            grid,
            vec![Team::new(0, "alpha", "Lions", 'A'), Team::new(1, "beta", "Tigers", 'B')],
        );
        grade_all(&mut state, (8..=30).chain(32..=34));

        let target = c(1, 2);
        let mut unspent: [Vec<ProblemNumber>; 2] = [(8..=30).chain(32..=34).collect(), (8..=30).chain(32..=34).collect()];

        for round in 0..rounds {
            let team = u8::try_from(round % 2).unwrap();
            let pool = &mut unspent[round % 2];
            let price = round + 1;

            let short: Vec<_> = pool[..price - 1].to_vec();
            prop_assert_eq!(
                attempt_capture(&mut state, team, target, &short),
                Err(CaptureError::InsufficientProblems(Shortfall::TooFew { required: price, offered: price - 1 }))
            );

            let payment: Vec<_> = pool.drain(..price).collect();
            let capture = attempt_capture(&mut state, team, target, &payment).unwrap();
            prop_assert_eq!(capture.capture_count as usize, price);
        }
    }

    /// Applying every grade twice in a row gives the same ledger as applying
    /// it once.
    #[test]
    fn prop_regrade_idempotent(
        grades in prop::collection::vec((1u16..=34, any::<bool>()), 0..30),
        spend in prop::collection::vec(1u16..=34, 0..5),
    ) {
        let mut once = Ledger::new();
        let mut twice = Ledger::new();
        for &(problem, verdict) in &grades {
            once.apply_manual_grade(problem, verdict, "x", TS);
            twice.apply_manual_grade(problem, verdict, "x", TS);
            twice.apply_manual_grade(problem, verdict, "x", TS);
        }
        for &problem in &spend {
            prop_assert_eq!(once.mark_spent(problem).is_ok(), twice.mark_spent(problem).is_ok());
        }
        prop_assert_eq!(records(&once), records(&twice));

        // Spent records never change again.
        let spent: Vec<_> = records(&once).into_iter().filter(|r| r.status == GradingStatus::Spent).collect();
        for &(problem, verdict) in &grades {
            once.apply_manual_grade(problem, !verdict, "y", TS);
        }
        for record in spent {
            prop_assert_eq!(once.record(record.problem), Some(&record));
        }
    }
}
