//! Input feeds.
//!
//! Rows read from the submission and manual-grade sheets are decoded once,
//! here, into typed [`Action`]s. Nothing past this module sees a raw row.

mod action;
mod columns;
mod timestamp;

pub use action::{Action, ActionKind, ManualLayout, SubmissionLayout};
pub use columns::{ManualColumns, SubmissionColumns};
pub use timestamp::{format_timestamp, parse_timestamp, Timestamp, TIMESTAMP_FORMAT};

use thiserror::Error;

use crate::game::GridError;

/// Errors raised while decoding feed rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A sheet lacks a column the engine needs.
    #[error("sheet {sheet:?} has no column {column:?}")]
    MissingColumn {
        /// Sheet name.
        sheet: String,
        /// Expected header text.
        column: String,
    },
    /// A timestamp is not in the feed format.
    #[error("unreadable timestamp {0:?}")]
    BadTimestamp(String),
    /// The action column holds neither submit nor attack.
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    /// A problem number is not a number.
    #[error("bad problem number {0:?}")]
    BadProblem(String),
    /// An attack's problem list contains something that is not a number.
    #[error("bad problem list {0:?}")]
    BadProblemList(String),
    /// An attack's target is not a coordinate on the board.
    #[error("bad target: {0}")]
    BadTarget(#[from] GridError),
}
