//! Ownership map.
//!
//! Each field becomes a 3x3 block of cells; block rows follow `x` and block
//! columns follow `y`, both ascending:
//!
//! ```text
//! owner  .      weight
//! .      count  .
//! .      .      .
//! ```
//!
//! Zero weights, zero counts and missing owners are left blank.

use crate::game::{Field, GameState, GRID_SIZE};

/// Cells per field along each axis.
pub const BLOCK: usize = 3;

fn blank_if_zero(n: u32) -> String {
    if n == 0 { String::new() } else { n.to_string() }
}

fn owner_letter(state: &GameState, field: &Field) -> String {
    field
        .owner
        .and_then(|id| state.team(id))
        .map(|t| t.letter.to_string())
        .unwrap_or_default()
}

/// Render the ownership map as a `27x27` block of cells.
#[must_use]
pub fn render_field(state: &GameState) -> Vec<Vec<String>> {
    let size = usize::from(GRID_SIZE);
    let mut rows = vec![Vec::with_capacity(size * BLOCK); size * BLOCK];

    for field in state.grid().iter() {
        let top = (usize::from(field.coord.x()) - 1) * BLOCK;
        rows[top].extend([owner_letter(state, field), String::new(), blank_if_zero(field.weight)]);
        rows[top + 1].extend([String::new(), blank_if_zero(field.capture_count), String::new()]);
        rows[top + 2].extend([String::new(), String::new(), String::new()]);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{attempt_capture, Accessibility, Coord, Grid, Team};

    fn c(x: i64, y: i64) -> Coord {
        Coord::new(x, y).unwrap()
    }

    fn create_test_state() -> GameState {
        let mut grid = Grid::new();
        let mut home = Field::new(c(1, 1), 0, Accessibility::Closed);
        home.owner = Some(0);
        grid.set(home);
        grid.set(Field::new(c(1, 2), 8, Accessibility::Open));
        grid.set(Field::new(c(9, 9), 15, Accessibility::Open));
        GameState::new(grid, vec![Team::new(0, "alpha", "Lions", 'A')])
    }

    #[test]
    fn test_dimensions() {
        let view = render_field(&create_test_state());
        assert_eq!(view.len(), 27);
        assert!(view.iter().all(|row| row.len() == 27));
    }

    #[test]
    fn test_block_layout() {
        let view = render_field(&create_test_state());
        // (1,1): owned, weight 0.
        assert_eq!(&view[0][0..3], ["A", "", ""]);
        // (1,2): unowned, weight 8, next block to the right.
        assert_eq!(&view[0][3..6], ["", "", "8"]);
        assert_eq!(&view[1][3..6], ["", "", ""]);
        // (9,9): bottom-right block.
        assert_eq!(&view[24][24..27], ["", "", "15"]);
    }

    #[test]
    fn test_capture_count_shown() {
        let mut state = create_test_state();
        state
            .team_mut(0)
            .unwrap()
            .ledger
            .apply_manual_grade(20, true, "", "");
        attempt_capture(&mut state, 0, c(1, 2), &[20]).unwrap();

        let view = render_field(&state);
        assert_eq!(&view[0][3..6], ["A", "", "8"]);
        assert_eq!(&view[1][3..6], ["", "1", ""]);
    }
}
