use crate::grid::{Cell, Clue};
use std::collections::HashMap;

/// How far along a single clue is.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ClueCheck {
  /// Every square of the clue holds its answer letter.
  pub is_correct: bool,
  /// Every square of the clue holds something, right or wrong.
  pub is_filled: bool,
}

/// Checks `clue` against the current values in `cells`. The clue's squares are looked up
/// by id, so `cells` should be the merged grid.
pub fn check_clue(clue: &Clue, cells: &[Cell]) -> ClueCheck {
  let by_id = index_by_id(cells);
  check_with(clue, &by_id)
}

/// Updates `is_correct` and `is_filled` on every clue.
pub fn check_clues(clues: &mut [Clue], cells: &[Cell]) {
  let by_id = index_by_id(cells);
  for clue in clues {
    let check = check_with(clue, &by_id);
    clue.is_correct = check.is_correct;
    clue.is_filled = check.is_filled;
  }
}

fn index_by_id(cells: &[Cell]) -> HashMap<&str, &Cell> {
  cells.iter().map(|c| (c.id.as_str(), c)).collect()
}

fn check_with(clue: &Clue, by_id: &HashMap<&str, &Cell>) -> ClueCheck {
  let current = || {
    clue
      .cells
      .iter()
      .map(|c| by_id.get(c.id.as_str()).copied())
  };
  ClueCheck {
    is_correct: current().all(|c| c.is_some_and(Cell::is_correct)),
    is_filled: current().all(|c| c.is_some_and(Cell::is_filled)),
  }
}

/// The fraction of squares holding the right letter. An empty grid scores 0.
pub fn percent_correct(cells: &[Cell]) -> f64 {
  if cells.is_empty() {
    return 0.0;
  }
  let correct = cells.iter().filter(|c| c.is_correct()).count();
  correct as f64 / cells.len() as f64
}

/// Whether every square holds the right letter. An empty grid is never complete.
pub fn is_complete(cells: &[Cell]) -> bool {
  percent_correct(cells) == 1.0
}

/// Whether every clue is answered correctly, i.e. there is nothing left to reveal.
pub fn is_revealed(clues: &[Clue]) -> bool {
  clues.iter().all(|c| c.is_correct)
}

/// Turns the level "is the grid solved" into a one-shot event.
#[derive(Debug, Default, Clone)]
pub struct CompletionLatch {
  complete: bool,
}

impl CompletionLatch {
  /// Re-evaluates the grid. Returns true only when the grid has just become complete;
  /// further calls return false until the grid stops being complete and is solved again.
  pub fn update(&mut self, cells: &[Cell]) -> bool {
    let now = is_complete(cells);
    let fired = now && !self.complete;
    self.complete = now;
    fired
  }

  pub fn is_complete(&self) -> bool {
    self.complete
  }

  pub fn reset(&mut self) {
    self.complete = false;
  }
}
