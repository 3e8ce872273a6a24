//! Game layer.
//!
//! Implements the rules of the conquest game:
//! - 9x9 grid of fields with weights, capture counts and access rules
//! - Teams with an answer ledger and a set of owned fields
//! - Capture resolution with escalating cost
//! - Invariant checks tying field ownership to team state

mod conquest;
mod grid;
mod invariants;
mod ledger;
mod state;
mod team;

pub use conquest::{attempt_capture, capture_price, reachable_fields, Capture, CaptureError, Shortfall};
pub use grid::{Accessibility, Coord, Field, Grid, GridError, FIELD_COUNT, GRID_SIZE};
pub use invariants::{check_invariants, InvariantViolation};
pub use ledger::{
    problem_weight, AnswerRecord, GradeOutcome, GradingStatus, Ledger, LedgerError, ProblemNumber,
};
pub use state::GameState;
pub use team::{Team, TeamId};
