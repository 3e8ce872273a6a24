//! Submission reconciler.
//!
//! One [`Reconciler::run_cycle`] call pulls manual grades and new
//! submissions from the store, applies them to the game state, and writes
//! the manual-grade queue, the warnings log and both views back. A store
//! failure aborts the cycle; anything already applied to the state stays
//! applied and the next cycle picks up where this one stopped.

mod warnings;

pub use warnings::{warnings_table, Warning, WarningKind, WARNINGS_HEADER};

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::feed::{format_timestamp, Action, ManualColumns, ManualLayout, SubmissionColumns, SubmissionLayout, Timestamp};
use crate::game::{attempt_capture, Capture, GameState, ProblemNumber, TeamId};
use crate::store::{CellRef, Sheet, Store};
use crate::view;

/// Names of the sheets the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SheetNames {
    /// Submission feed.
    pub answers: String,
    /// Manual-grade feed.
    pub manual: String,
    /// Warnings log.
    pub warnings: String,
    /// Ownership view.
    pub field: String,
    /// Problem ledger view.
    pub problems: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            answers: "answers".to_string(),
            manual: "manual-solutions".to_string(),
            warnings: "warnings".to_string(),
            field: "field".to_string(),
            problems: "problems".to_string(),
        }
    }
}

impl SheetNames {
    /// Every sheet name, inputs first.
    #[must_use]
    pub fn all(&self) -> [&str; 5] {
        [&self.answers, &self.manual, &self.warnings, &self.field, &self.problems]
    }
}

/// Everything about the store layout the reconciler needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// Sheet names.
    pub sheets: SheetNames,
    /// Submission sheet headers.
    pub submission_columns: SubmissionColumns,
    /// Manual-grade sheet headers.
    pub manual_columns: ManualColumns,
    /// Top-left cell of the ownership view.
    pub field_anchor: CellRef,
    /// Top-left cell of the problem ledger view.
    pub problems_anchor: CellRef,
    /// Problems shown in the ledger view, numbered from 1.
    pub problem_count: ProblemNumber,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            sheets: SheetNames::default(),
            submission_columns: SubmissionColumns::default(),
            manual_columns: ManualColumns::default(),
            field_anchor: CellRef::new(2, 2),
            problems_anchor: CellRef::new(1, 0),
            problem_count: 34,
        }
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Manual grades that changed the ledger.
    pub grades_applied: usize,
    /// Submission rows newer than the previous watermark.
    pub new_rows: usize,
    /// Answers accepted and queued for grading.
    pub queued: usize,
    /// Captures that went through, in feed order.
    pub captures: Vec<Capture>,
    /// Warnings raised this cycle.
    pub new_warnings: usize,
    /// Watermark after the cycle.
    pub watermark: Option<Timestamp>,
}

/// Outcome of a bounded [`Reconciler::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles attempted.
    pub cycles: u64,
    /// Cycles aborted by an error.
    pub failures: u64,
}

/// Drives the game from the store's feeds.
#[derive(Debug)]
pub struct Reconciler<S: Store> {
    store: S,
    state: GameState,
    settings: ReconcileSettings,
    watermark: Option<Timestamp>,
    warnings: Vec<Warning>,
    /// Accepted answers not yet written to the manual-grade sheet.
    pending_manual: Vec<Vec<String>>,
    /// Code and raw timestamp of submissions already reported as unreadable.
    rejected_rows: BTreeSet<(String, String)>,
}

impl<S: Store> Reconciler<S> {
    /// Create a reconciler with an empty watermark and warnings log.
    #[must_use]
    pub fn new(store: S, state: GameState, settings: ReconcileSettings) -> Self {
        Self {
            store,
            state,
            settings,
            watermark: None,
            warnings: Vec::new(),
            pending_manual: Vec::new(),
            rejected_rows: BTreeSet::new(),
        }
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Every warning raised since start, oldest first.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Timestamp of the newest submission processed.
    #[must_use]
    pub fn watermark(&self) -> Option<Timestamp> {
        self.watermark
    }

    /// Layout settings.
    #[must_use]
    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Run one full cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if a sheet cannot be read or written, or lacks a
    /// required column. Grades and submissions applied before the failure
    /// stay applied.
    pub fn run_cycle(&mut self) -> crate::Result<CycleReport> {
        debug!(watermark = ?self.watermark, "cycle start");
        let mut report = CycleReport::default();
        let warnings_before = self.warnings.len();

        let manual = self.store.read_sheet(&self.settings.sheets.manual)?;
        let manual_layout = ManualLayout::resolve(&self.settings.sheets.manual, &manual, &self.settings.manual_columns)?;
        report.grades_applied = self.apply_grades(&manual, &manual_layout);

        let answers = self.store.read_sheet(&self.settings.sheets.answers)?;
        let layout = SubmissionLayout::resolve(&self.settings.sheets.answers, &answers, &self.settings.submission_columns)?;
        let fresh = self.fresh_rows(&answers, &layout);
        report.new_rows = fresh.len();
        for (timestamp, row) in fresh {
            self.dispatch(&layout, &manual_layout, row, timestamp, &mut report);
        }
        report.watermark = self.watermark;
        report.new_warnings = self.warnings.len() - warnings_before;

        self.write_manual(&manual)?;
        self.write_warnings()?;
        self.publish_views()?;

        if cfg!(debug_assertions) {
            for violation in crate::game::check_invariants(&self.state) {
                error!(%violation, "state inconsistent after cycle");
            }
        }

        info!(
            grades = report.grades_applied,
            rows = report.new_rows,
            queued = report.queued,
            captures = report.captures.len(),
            warnings = report.new_warnings,
            "cycle complete"
        );
        Ok(report)
    }

    /// Poll forever, or for `cycles` cycles, sleeping `interval` between them.
    /// Failed cycles are logged and retried on the next tick.
    pub fn run(&mut self, interval: Duration, cycles: Option<u64>) -> RunSummary {
        let mut summary = RunSummary::default();
        loop {
            summary.cycles += 1;
            if let Err(e) = self.run_cycle() {
                summary.failures += 1;
                error!(error = %e, cycle = summary.cycles, "cycle failed");
            }
            if cycles.is_some_and(|limit| summary.cycles >= limit) {
                return summary;
            }
            thread::sleep(interval);
        }
    }

    /// Replay every graded row of the manual sheet. Returns the number of
    /// grades that changed a ledger.
    fn apply_grades(&mut self, manual: &Sheet, layout: &ManualLayout) -> usize {
        let mut applied = 0;
        for row in manual.data_rows() {
            let action = match layout.decode(row) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "unreadable manual grade skipped");
                    continue;
                }
            };
            let Action::Grade {
                code,
                problem,
                verdict,
                answer,
                timestamp,
            } = action
            else {
                continue;
            };
            let Some(team) = self.state.team_by_code(&code).and_then(|id| self.state.team_mut(id)) else {
                warn!(%code, problem, "manual grade for unknown team skipped");
                continue;
            };
            let outcome = team.ledger.apply_manual_grade(problem, verdict, &answer, &timestamp);
            if outcome.changed() {
                debug!(team = %team.name, problem, verdict, ?outcome, "grade applied");
                applied += 1;
            }
        }
        applied
    }

    /// Submission rows strictly newer than the watermark, oldest first.
    /// Advances the watermark to the newest timestamp returned.
    fn fresh_rows<'a>(&mut self, answers: &'a Sheet, layout: &SubmissionLayout) -> Vec<(Timestamp, &'a [String])> {
        let mut fresh = Vec::new();
        for row in answers.data_rows() {
            match layout.timestamp(row) {
                Ok(Some(ts)) if self.watermark.is_none_or(|w| ts > w) => fresh.push((ts, row.as_slice())),
                Ok(_) => {}
                Err(e) => {
                    let key = (layout.code(row).to_string(), layout.timestamp_text(row).to_string());
                    if self.rejected_rows.insert(key) {
                        warn!(code = layout.code(row), error = %e, "submission with unreadable timestamp");
                        let team = self.team_label(layout.code(row));
                        self.warnings.push(Warning::new(
                            team,
                            layout.timestamp_text(row),
                            WarningKind::MalformedRow,
                        ));
                    }
                }
            }
        }
        fresh.sort_by_key(|(ts, _)| *ts);

        if let Some(&(newest, _)) = fresh.last() {
            debug!(from = ?self.watermark, to = %newest, "watermark advanced");
            self.watermark = Some(newest);
        }
        fresh
    }

    fn dispatch(
        &mut self,
        layout: &SubmissionLayout,
        manual_layout: &ManualLayout,
        row: &[String],
        timestamp: Timestamp,
        report: &mut CycleReport,
    ) {
        let code = layout.code(row);
        let Some(team) = self.state.team_by_code(code) else {
            warn!(code, "submission with unknown secret code");
            self.warnings
                .push(Warning::new(code, layout.subject(row), WarningKind::UnknownTeam));
            return;
        };

        let action = match layout.decode(row, timestamp) {
            Ok(action) => action,
            Err(e) => {
                warn!(team, error = %e, "malformed submission");
                let kind = WarningKind::from(&e);
                self.warn(team, layout.subject(row), kind);
                return;
            }
        };

        match action {
            Action::Submit {
                code,
                problem,
                answer,
                timestamp,
            } => self.submit(team, manual_layout, &code, problem, &answer, timestamp, report),
            Action::Attack {
                target, problems, ..
            } => match attempt_capture(&mut self.state, team, target, &problems) {
                Ok(capture) => {
                    info!(team, %target, spent = ?capture.spent, count = capture.capture_count, "field captured");
                    report.captures.push(capture);
                }
                Err(e) => {
                    warn!(team, %target, error = %e, "attack rejected");
                    self.warn(team, target.to_string(), WarningKind::from(&e));
                }
            },
            Action::Grade { .. } => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn submit(
        &mut self,
        team: TeamId,
        manual_layout: &ManualLayout,
        code: &str,
        problem: ProblemNumber,
        answer: &str,
        timestamp: Timestamp,
        report: &mut CycleReport,
    ) {
        let Some(entry) = self.state.team_mut(team) else {
            return;
        };
        if entry.ledger.is_manually_graded(problem) {
            debug!(team, problem, "submission already graded by hand, skipped");
            return;
        }

        let stamp = format_timestamp(timestamp);
        match entry.ledger.record_submission(problem, answer, &stamp) {
            Ok(_) => {
                let row = manual_layout.queue_row(&stamp, code, &entry.name, problem, answer);
                self.pending_manual.push(row);
                report.queued += 1;
            }
            Err(e) => {
                warn!(team, problem, error = %e, "submission rejected");
                self.warn(team, problem.to_string(), WarningKind::from(&e));
            }
        }
    }

    fn warn(&mut self, team: TeamId, value: impl Into<String>, kind: WarningKind) {
        let name = self.state.team(team).map(|t| t.name.clone()).unwrap_or_default();
        self.warnings.push(Warning::new(name, value, kind));
    }

    fn team_label(&self, code: &str) -> String {
        self.state
            .team_by_code(code)
            .and_then(|id| self.state.team(id))
            .map_or_else(|| code.to_string(), |t| t.name.clone())
    }

    /// Append newly accepted answers below the last non-blank row of the
    /// manual-grade sheet. Rows already on the sheet are never rewritten.
    fn write_manual(&mut self, manual: &Sheet) -> crate::Result<()> {
        if self.pending_manual.is_empty() {
            return Ok(());
        }
        let next = manual
            .data_rows()
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map_or(1, |last| last + 2);

        self.store
            .write_range(&self.settings.sheets.manual, CellRef::new(next, 0), &self.pending_manual)?;
        debug!(rows = self.pending_manual.len(), at = next + 1, "answers queued for grading");
        self.pending_manual.clear();
        Ok(())
    }

    fn write_warnings(&mut self) -> crate::Result<()> {
        let table = warnings_table(&self.warnings);
        self.store
            .write_range(&self.settings.sheets.warnings, CellRef::ORIGIN, &table)?;
        Ok(())
    }

    fn publish_views(&mut self) -> crate::Result<()> {
        let field = view::render_field(&self.state);
        self.store
            .write_range(&self.settings.sheets.field, self.settings.field_anchor, &field)?;
        let problems = view::render_problems(&self.state, self.settings.problem_count);
        self.store
            .write_range(&self.settings.sheets.problems, self.settings.problems_anchor, &problems)?;
        Ok(())
    }
}
