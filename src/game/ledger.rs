//! Per-team answer bookkeeping.
//!
//! Every problem a team submits or gets graded on owns exactly one
//! [`AnswerRecord`]. Records move `Ungraded -> Graded -> Spent`; a spent
//! record has already paid for a capture and never changes again.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Problem identifier as printed on the problem sheet.
pub type ProblemNumber = u16;

/// Point weight of a problem, from the fixed tier table.
///
/// Numbers outside every tier weigh nothing and can never fund a capture.
#[must_use]
pub const fn problem_weight(problem: ProblemNumber) -> u32 {
    match problem {
        1..=7 | 31 => 3,
        8..=17 | 32 => 5,
        18..=22 | 33 => 8,
        23..=27 | 34 => 11,
        28..=30 => 15,
        _ => 0,
    }
}

/// Where a record is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingStatus {
    /// Submitted, waiting for a human grader.
    Ungraded,
    /// Graded; `verdict` is meaningful.
    Graded,
    /// Consumed by a capture.
    Spent,
}

/// A team's answer to one problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Problem this record answers.
    pub problem: ProblemNumber,
    /// Answer text as submitted.
    pub answer: String,
    /// Submission timestamp as it appeared in the feed.
    pub timestamp: String,
    /// Point weight, fixed at creation.
    pub weight: u32,
    /// Lifecycle state.
    pub status: GradingStatus,
    /// Correctness; only meaningful once graded.
    pub verdict: bool,
}

impl AnswerRecord {
    fn new(problem: ProblemNumber, answer: String, timestamp: String, status: GradingStatus, verdict: bool) -> Self {
        Self {
            problem,
            answer,
            timestamp,
            weight: problem_weight(problem),
            status,
            verdict,
        }
    }

    /// Graded correct and not yet spent.
    #[must_use]
    pub fn is_spendable(&self) -> bool {
        self.status == GradingStatus::Graded && self.verdict
    }
}

/// Rejections from ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The team already has a record for this problem.
    #[error("problem {problem} was already submitted")]
    DuplicateSubmission {
        /// Offending problem.
        problem: ProblemNumber,
    },
    /// The record is missing, ungraded, incorrect or already spent.
    #[error("problem {problem} cannot be spent")]
    NotEligible {
        /// Offending problem.
        problem: ProblemNumber,
    },
}

/// What a manual grade did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeOutcome {
    /// No record existed; one was created already graded.
    Created,
    /// An ungraded record was graded.
    Graded,
    /// A graded record had its verdict flipped.
    Regraded,
    /// The record already carried this verdict.
    Unchanged,
    /// The record was spent and left alone.
    IgnoredSpent,
}

impl GradeOutcome {
    /// Whether the ledger changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Created | Self::Graded | Self::Regraded)
    }
}

/// All answer records of one team.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: BTreeMap<ProblemNumber, AnswerRecord>,
    /// Problems that have ever received a manual grade.
    manually_graded: BTreeSet<ProblemNumber>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for a problem.
    #[must_use]
    pub fn record(&self, problem: ProblemNumber) -> Option<&AnswerRecord> {
        self.records.get(&problem)
    }

    /// Iterate over records in problem order.
    pub fn records(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.records.values()
    }

    /// Whether a human has ever graded this problem for the team.
    #[must_use]
    pub fn is_manually_graded(&self, problem: ProblemNumber) -> bool {
        self.manually_graded.contains(&problem)
    }

    /// Record an automated submission.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateSubmission`] if a record already exists.
    pub fn record_submission(
        &mut self,
        problem: ProblemNumber,
        answer: &str,
        timestamp: &str,
    ) -> Result<&AnswerRecord, LedgerError> {
        if self.records.contains_key(&problem) {
            return Err(LedgerError::DuplicateSubmission { problem });
        }
        let record = AnswerRecord::new(
            problem,
            answer.to_string(),
            timestamp.to_string(),
            GradingStatus::Ungraded,
            false,
        );
        Ok(self.records.entry(problem).or_insert(record))
    }

    /// Apply a human verdict. Replaying the same verdict changes nothing.
    ///
    /// `answer` and `timestamp` are only used when the grade originates the
    /// record, e.g. for answers collected outside the submission feed.
    pub fn apply_manual_grade(
        &mut self,
        problem: ProblemNumber,
        verdict: bool,
        answer: &str,
        timestamp: &str,
    ) -> GradeOutcome {
        self.manually_graded.insert(problem);

        let Some(record) = self.records.get_mut(&problem) else {
            let record = AnswerRecord::new(
                problem,
                answer.to_string(),
                timestamp.to_string(),
                GradingStatus::Graded,
                verdict,
            );
            self.records.insert(problem, record);
            return GradeOutcome::Created;
        };

        match record.status {
            GradingStatus::Spent => GradeOutcome::IgnoredSpent,
            GradingStatus::Ungraded => {
                record.status = GradingStatus::Graded;
                record.verdict = verdict;
                GradeOutcome::Graded
            }
            GradingStatus::Graded if record.verdict == verdict => GradeOutcome::Unchanged,
            GradingStatus::Graded => {
                record.verdict = verdict;
                GradeOutcome::Regraded
            }
        }
    }

    /// Check whether a problem can pay for a field of `min_weight`.
    #[must_use]
    pub fn eligible_to_spend(&self, problem: ProblemNumber, min_weight: u32) -> bool {
        self.records
            .get(&problem)
            .is_some_and(|r| r.is_spendable() && r.weight >= min_weight)
    }

    /// Consume a graded, correct record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotEligible`] if the record is missing, not
    /// graded, incorrect, or already spent.
    pub fn mark_spent(&mut self, problem: ProblemNumber) -> Result<(), LedgerError> {
        match self.records.get_mut(&problem) {
            Some(record) if record.is_spendable() => {
                record.status = GradingStatus::Spent;
                Ok(())
            }
            _ => Err(LedgerError::NotEligible { problem }),
        }
    }
}
