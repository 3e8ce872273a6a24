// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Invaders: adjudication engine for a team conquest game on a 9x9 grid.
//!
//! Teams earn credit by submitting answers to numbered problems, and spend
//! correctly graded problems to capture fields next to the ones they hold.
//! The engine polls an external tabular store for submissions and manual
//! grades, enforces the rules against in-memory state, and publishes an
//! ownership map, a problem ledger and a warnings log back to the store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Reconciler (poll, dispatch)       │
//! ├──────────────────┬──────────────────┤
//! │  Feed decoding   │  View publisher  │
//! ├──────────────────┴──────────────────┤
//! │  Game: grid, ledger, conquest       │
//! ├─────────────────────────────────────┤
//! │  Store (file or in-memory sheets)   │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod game;
pub mod reconcile;
pub mod store;
pub mod view;

pub use config::{ConfigError, GameConfig};
pub use error::{Error, Result};
pub use game::{Coord, GameState, Team, TeamId};
pub use reconcile::{CycleReport, Reconciler};
