//! View publisher.
//!
//! Turns the game state into the cell blocks written to the store, plus a
//! plain-text board and a JSON snapshot for the command line.

// Allow format! with push_str for readability
#![allow(clippy::format_push_string)]

mod ownership;
mod problems;

pub use ownership::{render_field, BLOCK};
pub use problems::{render_problems, status_cell};

use serde::Serialize;

use crate::game::{reachable_fields, GameState, ProblemNumber, GRID_SIZE};

/// JSON-serializable view of one team.
#[derive(Debug, Serialize)]
pub struct TeamSnapshot {
    /// Display name.
    pub name: String,
    /// Map letter.
    pub letter: char,
    /// Owned fields, `(x,y)` text.
    pub fields: Vec<String>,
    /// Fields the team could attack now.
    pub reachable: Vec<String>,
    /// Ledger cells for problems `1..=problem_count`.
    pub problems: Vec<&'static str>,
}

/// JSON-serializable view of one field.
#[derive(Debug, Serialize)]
pub struct FieldSnapshot {
    /// Row, `1..=9`.
    pub x: u8,
    /// Column, `1..=9`.
    pub y: u8,
    /// Capture threshold.
    pub weight: u32,
    /// Captures so far.
    pub capture_count: u32,
    /// Owner letter, if owned.
    pub owner: Option<char>,
}

/// JSON-serializable snapshot of the whole game.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    /// Teams in roster order.
    pub teams: Vec<TeamSnapshot>,
    /// Fields in row-major order.
    pub fields: Vec<FieldSnapshot>,
}

impl Snapshot {
    /// Capture the current state.
    #[must_use]
    pub fn new(state: &GameState, problem_count: ProblemNumber) -> Self {
        let teams = state
            .teams()
            .iter()
            .map(|team| TeamSnapshot {
                name: team.name.clone(),
                letter: team.letter,
                fields: team.owned_fields().iter().map(ToString::to_string).collect(),
                reachable: reachable_fields(state, team.id)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                problems: (1..=problem_count)
                    .map(|p| status_cell(team.ledger.record(p)))
                    .collect(),
            })
            .collect();

        let fields = state
            .grid()
            .iter()
            .map(|f| FieldSnapshot {
                x: f.coord.x(),
                y: f.coord.y(),
                weight: f.weight,
                capture_count: f.capture_count,
                owner: f.owner.and_then(|id| state.team(id)).map(|t| t.letter),
            })
            .collect();

        Self { teams, fields }
    }
}

/// Render the board and the ledger as plain text.
///
/// Each board cell shows the owner letter (or `.`), the weight and, after a
/// slash, the capture count when non-zero.
#[must_use]
pub fn render_text(state: &GameState, problem_count: ProblemNumber) -> String {
    let mut output = String::new();

    output.push_str("    ");
    for y in 1..=GRID_SIZE {
        output.push_str(&format!("{y:^7}"));
    }
    output.push('\n');

    let size = usize::from(GRID_SIZE);
    for (i, row) in state.grid().iter().collect::<Vec<_>>().chunks(size).enumerate() {
        output.push_str(&format!("{:>3} ", i + 1));
        for field in row {
            let owner = field
                .owner
                .and_then(|id| state.team(id))
                .map_or('.', |t| t.letter);
            let cell = if field.capture_count > 0 {
                format!("{owner}{}/{}", field.weight, field.capture_count)
            } else {
                format!("{owner}{}", field.weight)
            };
            output.push_str(&format!("{cell:^7}"));
        }
        output.push('\n');
    }

    output.push('\n');
    for row in render_problems(state, problem_count) {
        let mut cells = row.into_iter();
        let label = cells.next().unwrap_or_default();
        let marks: Vec<String> = cells
            .map(|c| if c.is_empty() { ".".to_string() } else { c })
            .collect();
        output.push_str(&format!("{label}: {}\n", marks.join(" ")));
    }

    output
}
