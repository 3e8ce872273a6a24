//! Game invariants - sanity checks that detect bugs.
//!
//! Ownership is stored twice: on each field and in each team's owned set.
//! Captures update both, so these checks should NEVER report anything in a
//! correctly implemented engine.

use thiserror::Error;

use crate::game::GameState;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for field in state.grid().iter() {
        let Some(owner) = field.owner else {
            continue;
        };
        match state.team(owner) {
            Some(team) if team.owns(field.coord) => {}
            Some(team) => violations.push(InvariantViolation::new(format!(
                "field {} is owned by {} but missing from its owned set",
                field.coord, team.letter
            ))),
            None => violations.push(InvariantViolation::new(format!(
                "field {} is owned by unregistered team {owner}",
                field.coord
            ))),
        }
    }

    for team in state.teams() {
        for &coord in team.owned_fields() {
            let owner = state.grid().field(coord).owner;
            if owner != Some(team.id) {
                violations.push(InvariantViolation::new(format!(
                    "team {} lists {coord} as owned but the field's owner is {owner:?}",
                    team.letter
                )));
            }
        }
    }

    violations
}
