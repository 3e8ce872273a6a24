//! Participant-facing warnings log.

use std::fmt;

use crate::feed::FeedError;
use crate::game::{CaptureError, LedgerError};

/// Header row of the warnings sheet.
pub const WARNINGS_HEADER: [&str; 3] = ["Команда", "С чем беда", "Ошибка"];

/// Category of a rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// The secret code matches no team.
    UnknownTeam,
    /// The team already submitted this problem.
    RepeatedSubmission,
    /// The attacked field is out of the team's reach.
    UnreachableField,
    /// The problems offered cannot pay for the attacked field.
    InvalidProblemSet,
    /// The row could not be read at all.
    MalformedRow,
}

impl WarningKind {
    /// Label shown to participants.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            WarningKind::UnknownTeam => "нет такого секретного",
            WarningKind::RepeatedSubmission => "повторная отправка",
            WarningKind::UnreachableField => "атака недоступного поля",
            WarningKind::InvalidProblemSet => "неправильный набор задач",
            WarningKind::MalformedRow => "некорректная строка",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&FeedError> for WarningKind {
    fn from(err: &FeedError) -> Self {
        match err {
            FeedError::BadProblemList(_) => WarningKind::InvalidProblemSet,
            _ => WarningKind::MalformedRow,
        }
    }
}

impl From<&LedgerError> for WarningKind {
    fn from(err: &LedgerError) -> Self {
        match err {
            LedgerError::DuplicateSubmission { .. } => WarningKind::RepeatedSubmission,
            LedgerError::NotEligible { .. } => WarningKind::InvalidProblemSet,
        }
    }
}

impl From<&CaptureError> for WarningKind {
    fn from(err: &CaptureError) -> Self {
        match err {
            CaptureError::UnknownTeam(_) => WarningKind::UnknownTeam,
            CaptureError::UnreachableField(_) => WarningKind::UnreachableField,
            CaptureError::InsufficientProblems(_) | CaptureError::Ledger(_) => WarningKind::InvalidProblemSet,
        }
    }
}

/// One line of the warnings log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Team name, or the raw code when the code is unknown.
    pub team: String,
    /// The offending value: a problem number or a target.
    pub value: String,
    /// What went wrong.
    pub kind: WarningKind,
}

impl Warning {
    /// Create a warning.
    #[must_use]
    pub fn new(team: impl Into<String>, value: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            team: team.into(),
            value: value.into(),
            kind,
        }
    }

    /// Row as written to the warnings sheet.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![self.team.clone(), self.value.clone(), self.kind.label().to_string()]
    }
}

/// Header plus one row per warning, oldest first.
#[must_use]
pub fn warnings_table(warnings: &[Warning]) -> Vec<Vec<String>> {
    std::iter::once(WARNINGS_HEADER.iter().map(|h| (*h).to_string()).collect::<Vec<String>>())
        .chain(warnings.iter().map(Warning::to_row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, Shortfall};

    #[test]
    fn test_error_categories() {
        let target = Coord::new(1, 2).unwrap();
        assert_eq!(
            WarningKind::from(&CaptureError::UnreachableField(target)),
            WarningKind::UnreachableField
        );
        assert_eq!(
            WarningKind::from(&CaptureError::InsufficientProblems(Shortfall::TooFew {
                required: 2,
                offered: 1
            })),
            WarningKind::InvalidProblemSet
        );
        assert_eq!(
            WarningKind::from(&LedgerError::DuplicateSubmission { problem: 3 }),
            WarningKind::RepeatedSubmission
        );
        assert_eq!(
            WarningKind::from(&FeedError::BadProblemList("x".to_string())),
            WarningKind::InvalidProblemSet
        );
        assert_eq!(
            WarningKind::from(&FeedError::BadTimestamp("x".to_string())),
            WarningKind::MalformedRow
        );
    }

    #[test]
    fn test_table_has_header() {
        let table = warnings_table(&[Warning::new("Lions", "12", WarningKind::RepeatedSubmission)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0], vec!["Команда", "С чем беда", "Ошибка"]);
        assert_eq!(table[1], vec!["Lions", "12", "повторная отправка"]);
    }

    #[test]
    fn test_empty_table_is_header_only() {
        assert_eq!(warnings_table(&[]).len(), 1);
    }
}
