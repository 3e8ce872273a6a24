//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::feed::FeedError;
use crate::game::{CaptureError, GridError, LedgerError};
use crate::store::StoreError;

/// Any error the engine can surface to its caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Board geometry.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Answer bookkeeping.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Capture resolution.
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// Feed decoding, including sheets missing required columns.
    #[error(transparent)]
    Feed(#[from] FeedError),
    /// External store access.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Configuration loading and validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
