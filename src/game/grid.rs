//! Grid of capturable fields.
//!
//! The board is a fixed 9x9 square. Coordinates are 1-based: `x` selects the
//! row and `y` the column, which is how the configuration grids and the
//! published ownership view are laid out.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::game::TeamId;

/// Number of rows and columns on the board.
pub const GRID_SIZE: u8 = 9;

/// Total number of fields on the board.
pub const FIELD_COUNT: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// Errors raised by grid lookups and coordinate parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinates fall outside `1..=GRID_SIZE`.
    #[error("coordinate ({x},{y}) is outside the 9x9 grid")]
    OutOfBounds {
        /// Requested row.
        x: i64,
        /// Requested column.
        y: i64,
    },
    /// Text could not be read as an `(x,y)` pair.
    #[error("malformed coordinate {0:?}")]
    Malformed(String),
}

/// A position on the board, guaranteed to be in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Create a coordinate, checking both components against the grid size.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if either component is outside `1..=9`.
    pub fn new(x: i64, y: i64) -> Result<Self, GridError> {
        let in_range = |v: i64| (1..=i64::from(GRID_SIZE)).contains(&v);
        if !in_range(x) || !in_range(y) {
            return Err(GridError::OutOfBounds { x, y });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let coord = Self {
            x: x as u8,
            y: y as u8,
        };
        Ok(coord)
    }

    /// Row, `1..=9`.
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Column, `1..=9`.
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Row-major index into the field table.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.x as usize - 1) * GRID_SIZE as usize + (self.y as usize - 1)
    }

    /// Inverse of [`Coord::index`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    fn from_index(idx: usize) -> Self {
        Self {
            x: (idx / GRID_SIZE as usize) as u8 + 1,
            y: (idx % GRID_SIZE as usize) as u8 + 1,
        }
    }

    /// Grid-adjacent coordinates in the order `x-1`, `y-1`, `x+1`, `y+1`.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(self) -> ([Coord; 4], u8) {
        let mut result = [self; 4];
        let mut count = 0u8;

        if self.x > 1 {
            result[count as usize] = Coord { x: self.x - 1, y: self.y };
            count += 1;
        }
        if self.y > 1 {
            result[count as usize] = Coord { x: self.x, y: self.y - 1 };
            count += 1;
        }
        if self.x < GRID_SIZE {
            result[count as usize] = Coord { x: self.x + 1, y: self.y };
            count += 1;
        }
        if self.y < GRID_SIZE {
            result[count as usize] = Coord { x: self.x, y: self.y + 1 };
            count += 1;
        }

        (result, count)
    }

    /// Iterate over the grid neighbours of this coordinate.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        let (adj, count) = self.adjacent();
        adj.into_iter().take(count as usize)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = GridError;

    /// Parse `"(x,y)"`, `"x,y"` or `"x, y"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GridError::Malformed(s.to_string());
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (x, y) = inner.split_once(',').ok_or_else(malformed)?;
        let x = x.trim().parse::<i64>().map_err(|_| malformed())?;
        let y = y.trim().parse::<i64>().map_err(|_| malformed())?;
        Coord::new(x, y)
    }
}

/// Which teams may ever capture a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// Any team may capture it.
    Open,
    /// Only the named team may capture it.
    Restricted(TeamId),
    /// Nobody may capture it.
    Closed,
}

impl Accessibility {
    /// Check whether `team` is allowed to capture a field with this rule.
    #[must_use]
    pub const fn admits(self, team: TeamId) -> bool {
        match self {
            Accessibility::Open => true,
            Accessibility::Restricted(only) => only == team,
            Accessibility::Closed => false,
        }
    }
}

/// A single field on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Position of the field.
    pub coord: Coord,
    /// Minimum problem weight needed to capture. Zero marks a field that
    /// cannot be captured at all.
    pub weight: u32,
    /// Number of successful captures so far.
    pub capture_count: u32,
    /// Capture rule.
    pub accessibility: Accessibility,
    /// Current owner (None = unowned).
    pub owner: Option<TeamId>,
}

impl Field {
    /// Create an unowned, never-captured field.
    #[must_use]
    pub const fn new(coord: Coord, weight: u32, accessibility: Accessibility) -> Self {
        Self {
            coord,
            weight,
            capture_count: 0,
            accessibility,
            owner: None,
        }
    }

    /// Check whether `team` may capture this field at all.
    #[must_use]
    pub const fn is_capturable_by(&self, team: TeamId) -> bool {
        self.weight > 0 && self.accessibility.admits(team)
    }
}

/// The board: 81 fields in row-major order.
#[derive(Debug, Clone)]
pub struct Grid {
    fields: Vec<Field>,
}

impl Grid {
    /// Create a grid of closed, weightless fields.
    #[must_use]
    pub fn new() -> Self {
        let fields = (0..FIELD_COUNT)
            .map(|idx| Field::new(Coord::from_index(idx), 0, Accessibility::Closed))
            .collect();
        Self { fields }
    }

    /// Get the field at a coordinate.
    #[must_use]
    pub fn field(&self, coord: Coord) -> &Field {
        &self.fields[coord.index()]
    }

    /// Get a mutable reference to the field at a coordinate.
    #[must_use]
    pub fn field_mut(&mut self, coord: Coord) -> &mut Field {
        &mut self.fields[coord.index()]
    }

    /// Look up a field from raw, unchecked coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinates are off the board.
    pub fn field_at(&self, x: i64, y: i64) -> Result<&Field, GridError> {
        Coord::new(x, y).map(|coord| self.field(coord))
    }

    /// Replace the field stored at `field.coord`.
    pub fn set(&mut self, field: Field) {
        let idx = field.coord.index();
        self.fields[idx] = field;
    }

    /// Iterate over all fields in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate over the fields owned by a team.
    pub fn fields_owned_by(&self, team: TeamId) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.owner == Some(team))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i64, y: i64) -> Coord {
        Coord::new(x, y).unwrap()
    }

    #[test]
    fn test_coord_bounds() {
        assert!(Coord::new(1, 1).is_ok());
        assert!(Coord::new(9, 9).is_ok());
        assert_eq!(Coord::new(0, 5), Err(GridError::OutOfBounds { x: 0, y: 5 }));
        assert_eq!(Coord::new(5, 10), Err(GridError::OutOfBounds { x: 5, y: 10 }));
    }

    #[test]
    fn test_neighbors_center_order() {
        let n: Vec<Coord> = c(5, 5).neighbors().collect();
        assert_eq!(n, vec![c(4, 5), c(5, 4), c(6, 5), c(5, 6)]);
    }

    #[test]
    fn test_neighbors_corner() {
        let n: Vec<Coord> = c(1, 1).neighbors().collect();
        assert_eq!(n, vec![c(2, 1), c(1, 2)]);

        let n: Vec<Coord> = c(9, 9).neighbors().collect();
        assert_eq!(n, vec![c(8, 9), c(9, 8)]);
    }

    #[test]
    fn test_neighbors_edge() {
        assert_eq!(c(1, 5).neighbors().count(), 3);
        assert_eq!(c(5, 9).neighbors().count(), 3);
    }

    #[test]
    fn test_index_roundtrip() {
        for idx in 0..FIELD_COUNT {
            assert_eq!(Coord::from_index(idx).index(), idx);
        }
        assert_eq!(c(1, 1).index(), 0);
        assert_eq!(c(2, 1).index(), 9);
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!("(3,4)".parse::<Coord>(), Ok(c(3, 4)));
        assert_eq!(" ( 3 , 4 ) ".parse::<Coord>(), Ok(c(3, 4)));
        assert_eq!("7,1".parse::<Coord>(), Ok(c(7, 1)));
        assert!(matches!("(3;4)".parse::<Coord>(), Err(GridError::Malformed(_))));
        assert!(matches!("(a,4)".parse::<Coord>(), Err(GridError::Malformed(_))));
        assert_eq!(
            "(10,4)".parse::<Coord>(),
            Err(GridError::OutOfBounds { x: 10, y: 4 })
        );
    }

    #[test]
    fn test_display_matches_parse_format() {
        assert_eq!(c(2, 8).to_string(), "(2,8)");
    }

    #[test]
    fn test_field_at_bounds() {
        let grid = Grid::new();
        assert!(grid.field_at(3, 3).is_ok());
        assert!(grid.field_at(0, 3).is_err());
        assert!(grid.field_at(3, -1).is_err());
    }

    #[test]
    fn test_accessibility() {
        assert!(Accessibility::Open.admits(0));
        assert!(Accessibility::Restricted(2).admits(2));
        assert!(!Accessibility::Restricted(2).admits(1));
        assert!(!Accessibility::Closed.admits(0));
    }

    #[test]
    fn test_weightless_field_not_capturable() {
        let field = Field::new(c(1, 1), 0, Accessibility::Open);
        assert!(!field.is_capturable_by(0));
        let field = Field::new(c(1, 1), 3, Accessibility::Open);
        assert!(field.is_capturable_by(0));
    }

    #[test]
    fn test_grid_set_and_owned() {
        let mut grid = Grid::new();
        let mut field = Field::new(c(2, 3), 5, Accessibility::Open);
        field.owner = Some(1);
        grid.set(field);
        assert_eq!(grid.field(c(2, 3)).weight, 5);
        let owned: Vec<Coord> = grid.fields_owned_by(1).map(|f| f.coord).collect();
        assert_eq!(owned, vec![c(2, 3)]);
    }
}
