//! Cursor movement over a compiled grid.
//!
//! Everything here is a pure function of the cells, the clues and the current [Focus];
//! nothing is modified in place.

use crate::Direction;
use crate::grid::{Cell, Clue};
use std::collections::BTreeSet;
use tracing::trace;

/// The focused cell, by [index](Cell::index), and the direction the player is typing in.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Focus {
  pub cell_index: usize,
  pub direction: Direction,
}

impl Focus {
  pub fn new(cell_index: usize, direction: Direction) -> Self {
    Self {
      cell_index,
      direction,
    }
  }

  /// Focuses the cell at `index`. If that cell isn't part of a clue in the current
  /// direction, the direction switches.
  ///
  /// `was_already_focused` should be set when the player selects the cell that already
  /// has focus (e.g. clicks it twice). That toggles the direction instead.
  pub fn focus_cell(self, cells: &[Cell], index: usize, was_already_focused: bool) -> Self {
    if was_already_focused && index == self.cell_index {
      return self.flip_direction(cells);
    }
    let Some(cell) = cells.get(index) else {
      return self;
    };

    let direction = if cell.clue_numbers.get(self.direction).is_some() {
      self.direction
    } else {
      !self.direction
    };
    Self::new(index, direction)
  }

  /// Switches direction, if the focused cell belongs to a clue in the other direction.
  pub fn flip_direction(self, cells: &[Cell]) -> Self {
    let supported = cells
      .get(self.cell_index)
      .is_some_and(|cell| cell.clue_numbers.get(!self.direction).is_some());
    if supported {
      Self::new(self.cell_index, !self.direction)
    } else {
      self
    }
  }

  /// Arrow-key movement. Pressing an arrow across the current direction only turns the
  /// cursor. Otherwise the cursor jumps `|diff|` cells along its row or column in the sign
  /// of `diff`, skipping over squares that aren't in the grid. If there aren't enough cells
  /// that way, nothing happens.
  pub fn move_focus(self, cells: &[Cell], direction: Direction, diff: isize) -> Self {
    if direction != self.direction {
      return Self::new(self.cell_index, direction);
    }
    let Some(focused) = cells.get(self.cell_index) else {
      return self;
    };

    let start = focused.coord(direction);
    let mut ahead: Vec<&Cell> = cells
      .iter()
      .filter(|c| c.cross_coord(direction) == focused.cross_coord(direction))
      .filter(|c| {
        if diff < 0 {
          c.coord(direction) < start
        } else {
          c.coord(direction) > start
        }
      })
      .collect();
    ahead.sort_by_key(|c| c.coord(direction).abs_diff(start));

    match diff.unsigned_abs().checked_sub(1).and_then(|n| ahead.get(n)) {
      Some(next) => {
        trace!(from = self.cell_index, to = next.index, "move focus");
        self.focus_cell(cells, next.index, false)
      }
      None => self,
    }
  }

  /// Moves `diff` places through the grid in typing order: row by row when across,
  /// column by column when down. When `replace_filled` is false, cells that already
  /// hold a letter are skipped over. Moving past either end does nothing.
  pub fn focus_cell_diff(self, cells: &[Cell], diff: isize, replace_filled: bool) -> Self {
    let sorted: Vec<&Cell> = sorted_in_direction(cells, self.direction)
      .into_iter()
      .filter(|c| replace_filled || !c.is_filled())
      .collect();

    // If the focused cell was skipped, count from just before the first cell.
    let current = sorted
      .iter()
      .position(|c| c.index == self.cell_index)
      .map_or(-1, |p| p as isize);

    let Some(target) = current.checked_add(diff).filter(|&t| t >= 0) else {
      return self;
    };
    match sorted.get(target as usize) {
      Some(next) => self.focus_cell(cells, next.index, false),
      None => self,
    }
  }

  /// Tab-style movement to the `|diff|`-th next (or previous, for negative `diff`) clue
  /// in the current direction that still has empty cells. When there is no such clue, the
  /// cursor wraps to the first clue of the other direction.
  ///
  /// The cursor lands on the first empty cell of the chosen clue, or on cell 0 if the
  /// clue is already full. The wrap always picks the first clue of the other direction,
  /// full or not, so wrapping onto a finished clue puts the cursor on cell 0.
  pub fn focus_clue_diff(self, cells: &[Cell], clues: &[Clue], diff: isize) -> Self {
    let current = cells
      .get(self.cell_index)
      .and_then(|c| c.clue_numbers.get(self.direction));

    let mut candidates: Vec<&Clue> = clues
      .iter()
      .filter(|clue| clue.direction == self.direction && !clue.is_filled)
      .filter(|clue| match current {
        Some(n) if diff > 0 => clue.number > n,
        Some(n) => clue.number < n,
        None => false,
      })
      .collect();
    if diff < 0 {
      candidates.reverse();
    }

    let nth = diff.unsigned_abs().checked_sub(1);
    let (direction, next) = match nth.and_then(|n| candidates.get(n)) {
      Some(&clue) => (self.direction, Some(clue)),
      None => {
        let wrapped = clues.iter().find(|clue| clue.direction == !self.direction);
        match wrapped {
          Some(clue) => (!self.direction, Some(clue)),
          None => (
            self.direction,
            clues.iter().find(|clue| clue.direction == self.direction),
          ),
        }
      }
    };

    let cell_index = next
      .and_then(|clue| {
        sorted_in_direction(cells, direction)
          .into_iter()
          .find(|c| !c.is_filled() && c.clue_numbers.get(direction) == Some(clue.number))
      })
      .map_or(0, |c| c.index);

    trace!(from = self.cell_index, to = cell_index, %direction, "focus clue");
    Self::new(cell_index, direction)
  }

  /// Puts the cursor on the first square of `clue`, facing the clue's direction.
  pub fn focus_clue(self, cells: &[Cell], clue: &Clue) -> Self {
    let cell_index = cells
      .iter()
      .position(|c| c.id == clue.id)
      .unwrap_or_default();
    Self::new(cell_index, clue.direction)
  }

  /// Focuses the clue at list position `index`, wrapping past either end of the list.
  pub fn focus_clue_index(self, cells: &[Cell], clues: &[Clue], index: isize) -> Self {
    if clues.is_empty() {
      return self;
    }
    let index = if index < 0 {
      clues.len() - 1
    } else if index as usize >= clues.len() {
      0
    } else {
      index as usize
    };
    self.focus_clue(cells, &clues[index])
  }
}

/// All cells, in the order the cursor visits them when typing in `direction`:
/// row by row for across, column by column for down.
pub fn sorted_in_direction(cells: &[Cell], direction: Direction) -> Vec<&Cell> {
  let mut sorted: Vec<&Cell> = cells.iter().collect();
  sorted.sort_by_key(|c| (c.cross_coord(direction), c.coord(direction)));
  sorted
}

/// The clue the player is currently working on, if the focused cell has one in the
/// focused direction.
pub fn current_clue<'a>(cells: &[Cell], clues: &'a [Clue], focus: Focus) -> Option<&'a Clue> {
  let number = cells.get(focus.cell_index)?.clue_numbers.get(focus.direction)?;
  clues
    .iter()
    .find(|clue| clue.direction == focus.direction && clue.number == number)
}

/// The unbroken run of cells through `focused` along `direction`: the word to highlight.
/// Includes `focused` itself.
pub fn secondarily_focused_cells(
  cells: &[Cell],
  direction: Direction,
  focused: &Cell,
) -> BTreeSet<usize> {
  let start = focused.coord(direction) as isize;
  let offsets: Vec<(isize, usize)> = cells
    .iter()
    .filter(|c| c.cross_coord(direction) == focused.cross_coord(direction))
    .map(|c| (start - c.coord(direction) as isize, c.index))
    .collect();

  let (Some(min), Some(max)) = (
    offsets.iter().map(|&(o, _)| o).min(),
    offsets.iter().map(|&(o, _)| o).max(),
  ) else {
    return BTreeSet::new();
  };

  // Lay out every offset in the row, with `None` where the grid has no square, and
  // keep the stretch between gaps that contains the focus.
  let present: BTreeSet<isize> = offsets.iter().map(|&(o, _)| o).collect();
  let slots: Vec<Option<isize>> = (min..=max)
    .map(|o| present.contains(&o).then_some(o))
    .collect();
  let Some(word) = slots
    .split(Option::is_none)
    .find(|chunk| chunk.contains(&Some(0)))
  else {
    return BTreeSet::new();
  };

  offsets
    .iter()
    .filter(|(o, _)| word.contains(&Some(*o)))
    .map(|&(_, index)| index)
    .collect()
}
