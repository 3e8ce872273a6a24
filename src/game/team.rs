//! Team state.

use std::collections::BTreeSet;

use crate::game::{Coord, Ledger};

/// Index of a team in the roster.
pub type TeamId = u8;

/// State for a single team.
#[derive(Debug, Clone)]
pub struct Team {
    /// Roster index.
    pub id: TeamId,
    /// Secret code teams put on every submission.
    pub code: String,
    /// Display name used in warnings and the manual-grade feed.
    pub name: String,
    /// Single-letter marker shown on the ownership map.
    pub letter: char,
    /// Answers submitted or graded so far.
    pub ledger: Ledger,
    /// Fields currently owned. Kept in sync with `Field::owner`.
    owned: BTreeSet<Coord>,
}

impl Team {
    /// Create a team that owns nothing and has answered nothing.
    #[must_use]
    pub fn new(id: TeamId, code: impl Into<String>, name: impl Into<String>, letter: char) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            letter,
            ledger: Ledger::new(),
            owned: BTreeSet::new(),
        }
    }

    /// Fields currently owned, in coordinate order.
    #[must_use]
    pub fn owned_fields(&self) -> &BTreeSet<Coord> {
        &self.owned
    }

    /// Check if the team owns a field.
    #[must_use]
    pub fn owns(&self, coord: Coord) -> bool {
        self.owned.contains(&coord)
    }

    pub(crate) fn gain(&mut self, coord: Coord) {
        self.owned.insert(coord);
    }

    pub(crate) fn lose(&mut self, coord: Coord) {
        self.owned.remove(&coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_creation() {
        let team = Team::new(0, "secret", "Lions", 'A');
        assert_eq!(team.id, 0);
        assert_eq!(team.letter, 'A');
        assert!(team.owned_fields().is_empty());
    }

    #[test]
    fn test_gain_and_lose() {
        let mut team = Team::new(0, "secret", "Lions", 'A');
        let coord = Coord::new(2, 2).unwrap();
        team.gain(coord);
        assert!(team.owns(coord));
        team.lose(coord);
        assert!(!team.owns(coord));
    }
}
