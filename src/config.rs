//! Static game configuration.
//!
//! Loaded once at startup from a JSON file. The three 9x9 grids are indexed
//! `[x - 1][y - 1]`: the first row of `weights` holds fields `(1,1)..=(1,9)`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::{ManualColumns, SubmissionColumns};
use crate::game::{Accessibility, Coord, Field, GameState, Grid, ProblemNumber, Team, TeamId, GRID_SIZE};
use crate::reconcile::{ReconcileSettings, SheetNames};
use crate::store::CellRef;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Configuration file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The roster is empty.
    #[error("no teams configured")]
    NoTeams,
    /// More teams than team ids.
    #[error("{0} teams configured, at most 256 are supported")]
    TooManyTeams(usize),
    /// Two teams share a secret code.
    #[error("duplicate team code {0:?}")]
    DuplicateCode(String),
    /// Two teams share a map letter.
    #[error("duplicate team letter {0:?}")]
    DuplicateLetter(char),
    /// A grid is not 9x9.
    #[error("{grid} must be a 9x9 grid")]
    GridShape {
        /// Grid name.
        grid: &'static str,
    },
    /// A grid cell names a team letter nobody uses.
    #[error("{grid} at {coord}: unknown team {value:?}")]
    UnknownLetter {
        /// Grid name.
        grid: &'static str,
        /// Offending field.
        coord: Coord,
        /// Cell text.
        value: String,
    },
    /// A team starts without a field.
    #[error("team {0:?} owns no field")]
    Homeless(String),
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Display name.
    pub name: String,
    /// Secret code.
    pub code: String,
    /// Map letter.
    pub letter: char,
}

/// Where the file store keeps its sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory, relative to the configuration file.
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("sheets"),
        }
    }
}

/// Header names of both feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Submission sheet.
    pub submissions: SubmissionColumns,
    /// Manual-grade sheet.
    pub manual: ManualColumns,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_problem_count() -> ProblemNumber {
    34
}

fn default_field_anchor() -> CellRef {
    CellRef::new(2, 2)
}

fn default_problems_anchor() -> CellRef {
    CellRef::new(1, 0)
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Roster; a team's id is its position here.
    pub teams: Vec<TeamConfig>,
    /// Field weights.
    pub weights: Vec<Vec<u32>>,
    /// `"1"` open, a team letter restricted to that team, anything else closed.
    pub accessibility: Vec<Vec<String>>,
    /// Initial owners: a team letter, or `"0"`/blank for none.
    pub owners: Vec<Vec<String>>,
    /// File store location.
    #[serde(default)]
    pub store: StoreConfig,
    /// Sheet names.
    #[serde(default)]
    pub sheets: SheetNames,
    /// Feed headers.
    #[serde(default)]
    pub columns: ColumnsConfig,
    /// Seconds between cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Problems shown in the ledger view.
    #[serde(default = "default_problem_count")]
    pub problem_count: ProblemNumber,
    /// Top-left cell of the ownership view.
    #[serde(default = "default_field_anchor")]
    pub field_anchor: CellRef,
    /// Top-left cell of the problem ledger view.
    #[serde(default = "default_problems_anchor")]
    pub problems_anchor: CellRef,
}

impl GameConfig {
    /// Load a configuration file. A relative store directory is resolved
    /// against the file's own directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&text)?;
        if config.store.dir.is_relative() {
            if let Some(base) = path.parent() {
                config.store.dir = base.join(&config.store.dir);
            }
        }
        Ok(config)
    }

    /// Parse configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or missing fields.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pause between polling cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Store layout for the reconciler.
    #[must_use]
    pub fn reconcile_settings(&self) -> ReconcileSettings {
        ReconcileSettings {
            sheets: self.sheets.clone(),
            submission_columns: self.columns.submissions.clone(),
            manual_columns: self.columns.manual.clone(),
            field_anchor: self.field_anchor,
            problems_anchor: self.problems_anchor,
            problem_count: self.problem_count,
        }
    }

    /// Check the roster and the grids.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_state().map(|_| ())
    }

    /// Build the initial game state.
    ///
    /// # Errors
    ///
    /// Returns the first roster or grid problem found.
    pub fn build_state(&self) -> Result<GameState, ConfigError> {
        let teams = self.roster()?;
        let letter_of = |text: &str| teams.iter().find(|t| text.chars().eq([t.letter])).map(|t| t.id);

        check_shape("weights", &self.weights)?;
        check_shape("accessibility", &self.accessibility)?;
        check_shape("owners", &self.owners)?;

        let mut grid = Grid::new();
        for coord in grid.iter().map(|f| f.coord).collect::<Vec<_>>() {
            let (i, j) = (usize::from(coord.x()) - 1, usize::from(coord.y()) - 1);

            let access = self.accessibility[i][j].trim();
            let accessibility = match (access, letter_of(access)) {
                ("1", _) => Accessibility::Open,
                (_, Some(team)) => Accessibility::Restricted(team),
                (text, None) if is_letter(text) => return Err(unknown("accessibility", coord, text)),
                _ => Accessibility::Closed,
            };

            let mut field = Field::new(coord, self.weights[i][j], accessibility);
            let owner = self.owners[i][j].trim();
            field.owner = match owner {
                "" | "0" => None,
                text => Some(letter_of(text).ok_or_else(|| unknown("owners", coord, text))?),
            };
            grid.set(field);
        }

        if let Some(homeless) = teams.iter().find(|t| grid.fields_owned_by(t.id).next().is_none()) {
            return Err(ConfigError::Homeless(homeless.name.clone()));
        }

        Ok(GameState::new(grid, teams))
    }

    fn roster(&self) -> Result<Vec<Team>, ConfigError> {
        if self.teams.is_empty() {
            return Err(ConfigError::NoTeams);
        }
        let mut codes = HashSet::new();
        let mut letters = HashSet::new();
        self.teams
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let id = TeamId::try_from(i).map_err(|_| ConfigError::TooManyTeams(self.teams.len()))?;
                if !codes.insert(t.code.trim()) {
                    return Err(ConfigError::DuplicateCode(t.code.clone()));
                }
                if !letters.insert(t.letter) {
                    return Err(ConfigError::DuplicateLetter(t.letter));
                }
                Ok(Team::new(id, t.code.trim(), t.name.clone(), t.letter))
            })
            .collect()
    }
}

fn check_shape<T>(grid: &'static str, rows: &[Vec<T>]) -> Result<(), ConfigError> {
    let size = usize::from(GRID_SIZE);
    if rows.len() != size || rows.iter().any(|r| r.len() != size) {
        return Err(ConfigError::GridShape { grid });
    }
    Ok(())
}

fn is_letter(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(char::is_alphabetic) && chars.next().is_none()
}

fn unknown(grid: &'static str, coord: Coord, value: &str) -> ConfigError {
    ConfigError::UnknownLetter {
        grid,
        coord,
        value: value.to_string(),
    }
}
