//! This crate is meant to be used as the foundation for a crossword puzzle app.
//! It provides no UI itself, but see `crosstui` for an example of how you can use it
//! to produce a crossword app.
//!
//! Puzzles are described as a flat list of clue definitions: the clue text, its answer,
//! the direction it runs in and the grid coordinates of its first letter. From that list
//! the crate builds a numbered grid of [Cell]s and [Clue]s, and a [Puzzle] tracks what the
//! player has typed, where the cursor is, and whether the grid has been solved.
//!
//! ```
//! use crossword::{ClueDefinition, Config, Direction::{Across, Down}, Puzzle};
//!
//! let mut puzzle = Puzzle::new(Config::default());
//! puzzle.load_definitions(
//!   &[
//!     ClueDefinition::new("Cat", "CAT", Across, 0, 0),
//!     ClueDefinition::new("Cab", "CAB", Down, 0, 0),
//!   ],
//!   None,
//! );
//! assert!(puzzle.validation().is_ok());
//! assert_eq!(puzzle.cells().len(), 5);
//! ```

use Direction::{Across, Down};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::Not;

mod compile;
mod completion;
mod definition;
mod grid;
mod history;
mod merge;
mod navigate;
mod puzzle;
mod validate;

pub use compile::{compile, out_of_range};
pub use completion::{
  ClueCheck, CompletionLatch, check_clue, check_clues, is_complete, is_revealed, percent_correct,
};
pub use definition::{ClueDefinition, parse_records, read_records, read_records_file};
pub use grid::{Cell, Clue, ClueNumbers, cell_id};
pub use history::{HISTORY_DEPTH, History, HistoryEntry};
pub use merge::merge;
pub use navigate::{Focus, current_clue, secondarily_focused_cells, sorted_in_direction};
pub use puzzle::{Config, Puzzle, PuzzleObserver, RevealTicket, SavedCell, Snapshot};
pub use validate::{Validation, ValidationError, find_conflicts, validate};

/// The two crossword directions: `Across` and `Down`
///
/// `Across` sorts before `Down`, which is the order clues are listed in.
#[derive(
  Debug, Eq, PartialEq, Hash, Copy, Clone, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  #[default]
  Across,
  Down,
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Across => write!(f, "across"),
      Down => write!(f, "down"),
    }
  }
}

impl Direction {
  /// Parses `"across"` or `"down"`. Anything else is `None`.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "across" => Some(Across),
      "down" => Some(Down),
      _ => None,
    }
  }
}

/// The errors that may be produced by functions in this crate.
///
/// Building and playing a puzzle never fails; these only come from reading puzzle
/// or save-state documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The document was not valid JSON, or did not have the expected layout.
  #[error("invalid JSON: {0}")]
  Json(#[from] serde_json::Error),
  /// A puzzle document must be a JSON array of clue records.
  #[error("expected a JSON array of clue records")]
  NotAnArray,
  /// An [I/O error](std::io::Error) occurred.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}
