//! Capture resolution.
//!
//! A team may attack any field next to one it already owns, paying with
//! graded, correct problems whose weight is at least the field's weight.
//! Every capture of a field raises the number of problems the next capture
//! of that same field costs by one.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::game::{Coord, GameState, LedgerError, ProblemNumber, TeamId};

/// Why a problem list could not pay for a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortfall {
    /// Fewer distinct problems than the field's current price.
    TooFew {
        /// Problems the field costs right now.
        required: usize,
        /// Distinct problems offered.
        offered: usize,
    },
    /// A listed problem is ungraded, incorrect, spent, missing or too light.
    Ineligible {
        /// First offending problem.
        problem: ProblemNumber,
        /// Weight the field demands.
        min_weight: u32,
    },
}

/// Rejections from [`attempt_capture`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The attacking team id is not on the roster.
    #[error("team {0} is not registered")]
    UnknownTeam(TeamId),
    /// The target is not adjacent to the team's territory, already owned by
    /// it, or closed to it.
    #[error("field {0} is not reachable")]
    UnreachableField(Coord),
    /// The offered problems cannot pay for the target.
    #[error("insufficient problems: {0:?}")]
    InsufficientProblems(Shortfall),
    /// Spending failed after validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// A successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Attacking team.
    pub team: TeamId,
    /// Captured field.
    pub target: Coord,
    /// Team the field was taken from, if any.
    pub previous_owner: Option<TeamId>,
    /// Capture count after this capture.
    pub capture_count: u32,
    /// Problems consumed, in the order offered.
    pub spent: Vec<ProblemNumber>,
}

/// Fields a team could attack right now.
///
/// A field qualifies if it neighbours a field the team owns, is not owned
/// by the team itself, has a non-zero weight, and its accessibility admits
/// the team.
#[must_use]
pub fn reachable_fields(state: &GameState, team: TeamId) -> BTreeSet<Coord> {
    let Some(attacker) = state.team(team) else {
        return BTreeSet::new();
    };
    let grid = state.grid();

    attacker
        .owned_fields()
        .iter()
        .flat_map(|coord| coord.neighbors())
        .filter(|&n| !attacker.owns(n) && grid.field(n).is_capturable_by(team))
        .collect()
}

/// Problems needed to capture a field that has been captured `capture_count` times.
#[must_use]
pub const fn capture_price(capture_count: u32) -> usize {
    capture_count as usize + 1
}

/// Validate an attack and, only if every check passes, apply it.
///
/// A failed attack leaves the state exactly as it was. Repeated problem
/// numbers in `problems` are counted once.
///
/// # Errors
///
/// - [`CaptureError::UnreachableField`] if the target is out of reach.
/// - [`CaptureError::InsufficientProblems`] if the problem list is too short
///   or any listed problem cannot be spent on this field.
pub fn attempt_capture(
    state: &mut GameState,
    team: TeamId,
    target: Coord,
    problems: &[ProblemNumber],
) -> Result<Capture, CaptureError> {
    let attacker = state.team(team).ok_or(CaptureError::UnknownTeam(team))?;
    let field = *state.grid().field(target);

    if !reachable_fields(state, team).contains(&target) {
        return Err(CaptureError::UnreachableField(target));
    }

    let mut seen = BTreeSet::new();
    let offered: Vec<ProblemNumber> = problems.iter().copied().filter(|p| seen.insert(*p)).collect();

    let required = capture_price(field.capture_count);
    if offered.len() < required {
        return Err(CaptureError::InsufficientProblems(Shortfall::TooFew {
            required,
            offered: offered.len(),
        }));
    }

    if let Some(&problem) = offered
        .iter()
        .find(|&&p| !attacker.ledger.eligible_to_spend(p, field.weight))
    {
        return Err(CaptureError::InsufficientProblems(Shortfall::Ineligible {
            problem,
            min_weight: field.weight,
        }));
    }

    let (grid, teams) = state.parts_mut();
    let attacker = &mut teams[usize::from(team)];
    for &problem in &offered {
        attacker.ledger.mark_spent(problem)?;
    }
    attacker.gain(target);

    let previous_owner = field.owner;
    if let Some(previous) = previous_owner {
        if let Some(loser) = teams.get_mut(usize::from(previous)) {
            loser.lose(target);
        }
    }

    let captured = grid.field_mut(target);
    captured.capture_count += 1;
    captured.owner = Some(team);

    debug!(team, %target, ?previous_owner, count = captured.capture_count, "field captured");

    Ok(Capture {
        team,
        target,
        previous_owner,
        capture_count: captured.capture_count,
        spent: offered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Accessibility, Field, GradingStatus, Grid, Team};

    const TS: &str = "01/11/2020 10:00:00";

    fn c(x: i64, y: i64) -> Coord {
        Coord::new(x, y).unwrap()
    }

    /// Team A owns (1,1), team B owns (1,3). Every other field is open with
    /// weight 5, except (2,1) which only B may take and (2,2) which is closed.
    fn create_test_state() -> GameState {
        let mut grid = Grid::new();
        for x in 1..=9 {
            for y in 1..=9 {
                grid.set(Field::new(c(x, y), 5, Accessibility::Open));
            }
        }
        grid.set(Field::new(c(2, 1), 5, Accessibility::Restricted(1)));
        grid.set(Field::new(c(2, 2), 5, Accessibility::Closed));

        let mut home_a = Field::new(c(1, 1), 0, Accessibility::Closed);
        home_a.owner = Some(0);
        grid.set(home_a);
        let mut home_b = Field::new(c(1, 3), 0, Accessibility::Closed);
        home_b.owner = Some(1);
        grid.set(home_b);

        let teams = vec![Team::new(0, "alpha", "Alpha", 'A'), Team::new(1, "beta", "Beta", 'B')];
        GameState::new(grid, teams)
    }

    fn grade(state: &mut GameState, team: TeamId, problem: ProblemNumber, verdict: bool) {
        state
            .team_mut(team)
            .unwrap()
            .ledger
            .apply_manual_grade(problem, verdict, "", TS);
    }

    #[test]
    fn test_reachable_from_home() {
        let state = create_test_state();
        // (2,1) is B-only and (1,1) is home.
        assert_eq!(reachable_fields(&state, 0), BTreeSet::from([c(1, 2)]));
        assert_eq!(
            reachable_fields(&state, 1),
            BTreeSet::from([c(1, 2), c(1, 4), c(2, 3)])
        );
    }

    #[test]
    fn test_weightless_field_out_of_reach() {
        let mut state = create_test_state();
        state.parts_mut().0.set(Field::new(c(1, 2), 0, Accessibility::Open));
        grade(&mut state, 0, 12, true);

        assert!(reachable_fields(&state, 0).is_empty());
        assert!(!reachable_fields(&state, 1).contains(&c(1, 2)));
        assert_eq!(
            attempt_capture(&mut state, 0, c(1, 2), &[12]),
            Err(CaptureError::UnreachableField(c(1, 2)))
        );
    }

    #[test]
    fn test_reachable_unknown_team_is_empty() {
        let state = create_test_state();
        assert!(reachable_fields(&state, 9).is_empty());
    }

    #[test]
    fn test_capture_success() {
        let mut state = create_test_state();
        grade(&mut state, 0, 12, true);

        let capture = attempt_capture(&mut state, 0, c(1, 2), &[12]).unwrap();
        assert_eq!(capture.previous_owner, None);
        assert_eq!(capture.capture_count, 1);
        assert_eq!(capture.spent, vec![12]);

        let field = state.grid().field(c(1, 2));
        assert_eq!(field.owner, Some(0));
        assert_eq!(field.capture_count, 1);
        assert!(state.team(0).unwrap().owns(c(1, 2)));
        assert_eq!(
            state.team(0).unwrap().ledger.record(12).unwrap().status,
            GradingStatus::Spent
        );
    }

    #[test]
    fn test_two_hops_unreachable() {
        let mut state = create_test_state();
        grade(&mut state, 0, 12, true);
        assert_eq!(
            attempt_capture(&mut state, 0, c(1, 5), &[12]),
            Err(CaptureError::UnreachableField(c(1, 5)))
        );
    }

    #[test]
    fn test_restricted_and_closed_unreachable() {
        let mut state = create_test_state();
        grade(&mut state, 0, 12, true);
        assert!(matches!(
            attempt_capture(&mut state, 0, c(2, 1), &[12]),
            Err(CaptureError::UnreachableField(_))
        ));

        // Own the field next to the closed one and try again.
        attempt_capture(&mut state, 0, c(1, 2), &[12]).unwrap();
        grade(&mut state, 0, 13, true);
        assert!(matches!(
            attempt_capture(&mut state, 0, c(2, 2), &[13]),
            Err(CaptureError::UnreachableField(_))
        ));
    }

    #[test]
    fn test_atomic_on_light_problem() {
        let mut state = create_test_state();
        grade(&mut state, 0, 7, true); // weight 3
        grade(&mut state, 0, 12, true); // weight 5

        let err = attempt_capture(&mut state, 0, c(1, 2), &[7, 12]).unwrap_err();
        assert_eq!(
            err,
            CaptureError::InsufficientProblems(Shortfall::Ineligible { problem: 7, min_weight: 5 })
        );

        let ledger = &state.team(0).unwrap().ledger;
        assert_eq!(ledger.record(12).unwrap().status, GradingStatus::Graded);
        assert_eq!(ledger.record(7).unwrap().status, GradingStatus::Graded);
        assert_eq!(state.grid().field(c(1, 2)).owner, None);
        assert_eq!(state.grid().field(c(1, 2)).capture_count, 0);
    }

    #[test]
    fn test_escalating_cost_and_ownership_transfer() {
        let mut state = create_test_state();
        grade(&mut state, 0, 12, true);
        attempt_capture(&mut state, 0, c(1, 2), &[12]).unwrap();

        // B now needs two problems for (1,2).
        grade(&mut state, 1, 13, true);
        grade(&mut state, 1, 14, true);
        assert_eq!(
            attempt_capture(&mut state, 1, c(1, 2), &[13]),
            Err(CaptureError::InsufficientProblems(Shortfall::TooFew {
                required: 2,
                offered: 1
            }))
        );
        // Repeating a number does not make it count twice.
        assert!(matches!(
            attempt_capture(&mut state, 1, c(1, 2), &[13, 13]),
            Err(CaptureError::InsufficientProblems(Shortfall::TooFew { .. }))
        ));

        let capture = attempt_capture(&mut state, 1, c(1, 2), &[13, 14]).unwrap();
        assert_eq!(capture.previous_owner, Some(0));
        assert_eq!(capture.capture_count, 2);
        assert!(!state.team(0).unwrap().owns(c(1, 2)));
        assert!(state.team(1).unwrap().owns(c(1, 2)));
        assert_eq!(state.grid().field(c(1, 2)).owner, Some(1));
    }

    #[test]
    fn test_spent_problem_cannot_pay_twice() {
        let mut state = create_test_state();
        grade(&mut state, 0, 12, true);
        attempt_capture(&mut state, 0, c(1, 2), &[12]).unwrap();
        assert!(matches!(
            attempt_capture(&mut state, 0, c(2, 3), &[12]),
            Err(CaptureError::InsufficientProblems(Shortfall::Ineligible { problem: 12, .. }))
        ));
    }

    #[test]
    fn test_incorrect_or_ungraded_rejected() {
        let mut state = create_test_state();
        grade(&mut state, 0, 12, false);
        state.team_mut(0).unwrap().ledger.record_submission(13, "x", TS).unwrap();
        assert!(attempt_capture(&mut state, 0, c(1, 2), &[12]).is_err());
        assert!(attempt_capture(&mut state, 0, c(1, 2), &[13]).is_err());
        assert!(attempt_capture(&mut state, 0, c(1, 2), &[]).is_err());
    }

    #[test]
    fn test_unknown_team() {
        let mut state = create_test_state();
        assert_eq!(
            attempt_capture(&mut state, 5, c(1, 2), &[1]),
            Err(CaptureError::UnknownTeam(5))
        );
    }
}
