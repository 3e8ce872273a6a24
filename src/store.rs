//! External tabular store.
//!
//! The engine's system of record is a set of named sheets, each a matrix of
//! text cells whose first row is a header. Reads return a whole sheet;
//! writes overlay a block of rows starting at an A1-style anchor, leaving
//! cells outside the block untouched.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named sheet does not exist.
    #[error("sheet {0:?} does not exist")]
    MissingSheet(String),
    /// The backing service refused the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// An anchor string is not a valid A1 reference.
    #[error("invalid cell reference {0:?}")]
    BadAnchor(String),
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A sheet file is not a JSON matrix of strings.
    #[error("sheet {sheet:?} is malformed: {source}")]
    Json {
        /// Sheet name.
        sheet: String,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Zero-based cell position, written `C3` style in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl CellRef {
    /// Cell `A1`.
    pub const ORIGIN: CellRef = CellRef { row: 0, col: 0 };

    /// Create a cell reference from zero-based indices.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl FromStr for CellRef {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StoreError::BadAnchor(s.to_string());
        let s = s.trim();
        let split = s.find(|ch: char| ch.is_ascii_digit()).ok_or_else(bad)?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(bad());
        }

        let col = letters
            .bytes()
            .try_fold(0usize, |acc, ch| {
                acc.checked_mul(26)?
                    .checked_add(usize::from(ch.to_ascii_uppercase() - b'A' + 1))
            })
            .ok_or_else(bad)?;
        let row = digits.parse::<usize>().map_err(|_| bad())?;
        if row == 0 {
            return Err(bad());
        }

        Ok(Self {
            row: row - 1,
            col: col - 1,
        })
    }
}

impl TryFrom<String> for CellRef {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(cell: CellRef) -> Self {
        cell.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col + 1;
        while n > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let rem = ((n - 1) % 26) as u8;
            letters.push(char::from(b'A' + rem));
            n = (n - 1) / 26;
        }
        letters.reverse();
        let letters: String = letters.into_iter().collect();
        write!(f, "{letters}{}", self.row + 1)
    }
}

/// One sheet: a matrix of text cells, header first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a sheet from raw rows.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a sheet from string literals.
    #[must_use]
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// All rows, header included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The header row, or an empty slice for an empty sheet.
    #[must_use]
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Rows below the header.
    #[must_use]
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Index of the column whose header matches `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header().iter().position(|h| h.trim() == name.trim())
    }

    /// Overlay `values` with their top-left cell at `anchor`, growing the
    /// sheet as needed.
    pub fn write(&mut self, anchor: CellRef, values: &[Vec<String>]) {
        for (dr, row) in values.iter().enumerate() {
            let r = anchor.row + dr;
            if self.rows.len() <= r {
                self.rows.resize_with(r + 1, Vec::new);
            }
            let target = &mut self.rows[r];
            for (dc, value) in row.iter().enumerate() {
                let col = anchor.col + dc;
                if target.len() <= col {
                    target.resize(col + 1, String::new());
                }
                target[col].clone_from(value);
            }
        }
    }
}

/// Access to the external store.
pub trait Store {
    /// Read a whole sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet is missing or the store cannot be read.
    fn read_sheet(&self, name: &str) -> Result<Sheet, StoreError>;

    /// Overlay a block of rows at `anchor`, creating the sheet if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn write_range(&mut self, name: &str, anchor: CellRef, rows: &[Vec<String>]) -> Result<(), StoreError>;
}
