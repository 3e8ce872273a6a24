//! Problem ledger view: one row per team, one cell per problem.

use crate::game::{AnswerRecord, GameState, GradingStatus, ProblemNumber};

/// Cell text for one ledger entry.
#[must_use]
pub fn status_cell(record: Option<&AnswerRecord>) -> &'static str {
    match record {
        None => "",
        Some(r) => match r.status {
            GradingStatus::Spent => "0",
            GradingStatus::Ungraded => "н/п",
            GradingStatus::Graded if r.verdict => "1",
            GradingStatus::Graded => "-1",
        },
    }
}

/// Render the ledger for problems `1..=problem_count`, teams in roster order.
#[must_use]
pub fn render_problems(state: &GameState, problem_count: ProblemNumber) -> Vec<Vec<String>> {
    state
        .teams()
        .iter()
        .map(|team| {
            std::iter::once(format!("Команда {}", team.letter))
                .chain((1..=problem_count).map(|p| status_cell(team.ledger.record(p)).to_string()))
                .collect()
        })
        .collect()
}
