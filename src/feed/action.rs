//! Typed actions and the sheet layouts they are decoded from.

use std::str::FromStr;

use super::{parse_timestamp, FeedError, ManualColumns, SubmissionColumns, Timestamp};
use crate::game::{Coord, ProblemNumber};
use crate::store::Sheet;

/// What a submission row asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Hand in an answer.
    Submit,
    /// Spend answers on a field.
    Attack,
}

impl FromStr for ActionKind {
    type Err = FeedError;

    /// Accepts the English keywords and the labels used on the event form,
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submit" | "сдаю" => Ok(ActionKind::Submit),
            "attack" | "атакую" => Ok(ActionKind::Attack),
            _ => Err(FeedError::UnknownAction(s.to_string())),
        }
    }
}

/// A decoded feed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Answer submission.
    Submit {
        /// Team secret code.
        code: String,
        /// Problem answered.
        problem: ProblemNumber,
        /// Answer text.
        answer: String,
        /// When it was submitted.
        timestamp: Timestamp,
    },
    /// Capture attempt.
    Attack {
        /// Team secret code.
        code: String,
        /// Field to capture.
        target: Coord,
        /// Problems offered as payment, in the order written.
        problems: Vec<ProblemNumber>,
        /// When it was submitted.
        timestamp: Timestamp,
    },
    /// Human verdict from the manual-grade sheet.
    Grade {
        /// Team secret code.
        code: String,
        /// Problem graded.
        problem: ProblemNumber,
        /// `true` if correct.
        verdict: bool,
        /// Answer text as it appears on the grading sheet.
        answer: String,
        /// Timestamp text as it appears on the grading sheet.
        timestamp: String,
    },
}

impl Action {
    /// Secret code of the acting team.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Action::Submit { code, .. } | Action::Attack { code, .. } | Action::Grade { code, .. } => code,
        }
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", |s| s.trim())
}

fn parse_problem(text: &str) -> Result<ProblemNumber, FeedError> {
    text.trim()
        .parse()
        .map_err(|_| FeedError::BadProblem(text.to_string()))
}

fn parse_problem_list(text: &str) -> Result<Vec<ProblemNumber>, FeedError> {
    text.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse().map_err(|_| FeedError::BadProblemList(text.to_string())))
        .collect()
}

fn require(sheet_name: &str, sheet: &Sheet, column: &str) -> Result<usize, FeedError> {
    sheet.column(column).ok_or_else(|| FeedError::MissingColumn {
        sheet: sheet_name.to_string(),
        column: column.to_string(),
    })
}

/// Column positions of the submission sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionLayout {
    timestamp: usize,
    code: usize,
    action: usize,
    problem: usize,
    answer: usize,
    target: usize,
    problems: usize,
}

impl SubmissionLayout {
    /// Locate every required column in the sheet header.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MissingColumn`] naming the first absent column.
    pub fn resolve(sheet_name: &str, sheet: &Sheet, columns: &SubmissionColumns) -> Result<Self, FeedError> {
        Ok(Self {
            timestamp: require(sheet_name, sheet, &columns.timestamp)?,
            code: require(sheet_name, sheet, &columns.code)?,
            action: require(sheet_name, sheet, &columns.action)?,
            problem: require(sheet_name, sheet, &columns.problem)?,
            answer: require(sheet_name, sheet, &columns.answer)?,
            target: require(sheet_name, sheet, &columns.target)?,
            problems: require(sheet_name, sheet, &columns.problems)?,
        })
    }

    /// Raw timestamp text of a row.
    #[must_use]
    pub fn timestamp_text<'a>(&self, row: &'a [String]) -> &'a str {
        cell(row, self.timestamp)
    }

    /// Parsed timestamp of a row; `None` for a blank cell.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::BadTimestamp`] if the cell is not blank and unreadable.
    pub fn timestamp(&self, row: &[String]) -> Result<Option<Timestamp>, FeedError> {
        parse_timestamp(self.timestamp_text(row))
    }

    /// Team secret code of a row.
    #[must_use]
    pub fn code<'a>(&self, row: &'a [String]) -> &'a str {
        cell(row, self.code)
    }

    /// Value a warning about this row should quote: the problem for
    /// submissions, the target for attacks.
    #[must_use]
    pub fn subject<'a>(&self, row: &'a [String]) -> &'a str {
        match cell(row, self.action).parse::<ActionKind>() {
            Ok(ActionKind::Attack) => cell(row, self.target),
            _ => cell(row, self.problem),
        }
    }

    /// Decode a row whose timestamp has already been read.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] describing the first unreadable cell.
    pub fn decode(&self, row: &[String], timestamp: Timestamp) -> Result<Action, FeedError> {
        let code = self.code(row).to_string();
        match cell(row, self.action).parse::<ActionKind>()? {
            ActionKind::Submit => Ok(Action::Submit {
                code,
                problem: parse_problem(cell(row, self.problem))?,
                answer: cell(row, self.answer).to_string(),
                timestamp,
            }),
            ActionKind::Attack => Ok(Action::Attack {
                code,
                target: cell(row, self.target).parse()?,
                problems: parse_problem_list(cell(row, self.problems))?,
                timestamp,
            }),
        }
    }
}

/// Column positions of the manual-grade sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualLayout {
    timestamp: usize,
    code: usize,
    team: Option<usize>,
    problem: usize,
    answer: usize,
    verdict: usize,
    width: usize,
}

impl ManualLayout {
    /// Locate the columns in the sheet header. The team-name column is optional.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MissingColumn`] naming the first absent column.
    pub fn resolve(sheet_name: &str, sheet: &Sheet, columns: &ManualColumns) -> Result<Self, FeedError> {
        Ok(Self {
            timestamp: require(sheet_name, sheet, &columns.timestamp)?,
            code: require(sheet_name, sheet, &columns.code)?,
            team: sheet.column(&columns.team),
            problem: require(sheet_name, sheet, &columns.problem)?,
            answer: require(sheet_name, sheet, &columns.answer)?,
            verdict: require(sheet_name, sheet, &columns.verdict)?,
            width: sheet.header().len(),
        })
    }

    /// Rows with a blank timestamp are still being filled in and are not graded.
    #[must_use]
    pub fn is_live(&self, row: &[String]) -> bool {
        !cell(row, self.timestamp).is_empty()
    }

    /// Decode a graded row. Returns `Ok(None)` for rows still being filled in
    /// and rows no one has graded yet.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::BadProblem`] if the problem cell is not a number.
    pub fn decode(&self, row: &[String]) -> Result<Option<Action>, FeedError> {
        let verdict = cell(row, self.verdict);
        if !self.is_live(row) || verdict.is_empty() {
            return Ok(None);
        }
        Ok(Some(Action::Grade {
            code: cell(row, self.code).to_string(),
            problem: parse_problem(cell(row, self.problem))?,
            verdict: verdict == "1",
            answer: cell(row, self.answer).to_string(),
            timestamp: cell(row, self.timestamp).to_string(),
        }))
    }

    /// Build a new, ungraded row for the graders.
    #[must_use]
    pub fn queue_row(
        &self,
        timestamp: &str,
        code: &str,
        team_name: &str,
        problem: ProblemNumber,
        answer: &str,
    ) -> Vec<String> {
        let mut row = vec![String::new(); self.width];
        row[self.timestamp] = timestamp.to_string();
        row[self.code] = code.to_string();
        if let Some(team) = self.team {
            row[team] = team_name.to_string();
        }
        row[self.problem] = problem.to_string();
        row[self.answer] = answer.to_string();
        row
    }
}
