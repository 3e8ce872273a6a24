//! Game state: the context object every component is handed.

use std::collections::HashMap;

use crate::game::{Grid, Team, TeamId};

/// Complete in-memory game state.
///
/// Field ownership lives in two places, `Field::owner` and each team's owned
/// set. Only [`crate::game::attempt_capture`] mutates either after
/// construction, and it always updates both.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    teams: Vec<Team>,
    by_code: HashMap<String, TeamId>,
}

impl GameState {
    /// Build the state from a configured grid and roster.
    ///
    /// Team ids must match their roster index. Owned sets are derived from
    /// the grid's owners; owners that name no team are dropped from the grid.
    #[must_use]
    pub fn new(mut grid: Grid, mut teams: Vec<Team>) -> Self {
        let coords: Vec<_> = grid.iter().map(|f| f.coord).collect();
        for coord in coords {
            let field = grid.field_mut(coord);
            let Some(owner) = field.owner else {
                continue;
            };
            match teams.get_mut(usize::from(owner)) {
                Some(team) => team.gain(coord),
                None => field.owner = None,
            }
        }

        let by_code = teams.iter().map(|t| (t.code.clone(), t.id)).collect();

        Self {
            grid,
            teams,
            by_code,
        }
    }

    /// The board.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All teams in roster order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Get a team by id.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(usize::from(id))
    }

    /// Get a mutable reference to a team by id.
    #[must_use]
    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(usize::from(id))
    }

    /// Resolve a secret code to a team.
    #[must_use]
    pub fn team_by_code(&self, code: &str) -> Option<TeamId> {
        self.by_code.get(code.trim()).copied()
    }

    /// Resolve a display letter to a team.
    #[must_use]
    pub fn team_by_letter(&self, letter: char) -> Option<TeamId> {
        self.teams.iter().find(|t| t.letter == letter).map(|t| t.id)
    }

    /// Split borrow used by the conquest engine.
    pub(crate) fn parts_mut(&mut self) -> (&mut Grid, &mut [Team]) {
        (&mut self.grid, &mut self.teams)
    }
}
