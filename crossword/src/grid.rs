use crate::Direction;
use crate::Direction::{Across, Down};
use serde::{Serialize, Serializer};

/// The identifier of the cell at `(x, y)`, e.g. `"3-0"`. Cells and clues are both keyed
/// by this string; a clue's id is the id of its first cell.
pub fn cell_id(x: usize, y: usize) -> String {
  format!("{x}-{y}")
}

/// The clue numbers a cell belongs to, at most one per direction.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct ClueNumbers {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub across: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub down: Option<u32>,
}

impl ClueNumbers {
  /// A map with a single entry.
  pub fn single(direction: Direction, number: u32) -> Self {
    let mut numbers = Self::default();
    numbers.set(direction, number);
    numbers
  }

  pub fn get(&self, direction: Direction) -> Option<u32> {
    match direction {
      Across => self.across,
      Down => self.down,
    }
  }

  pub fn set(&mut self, direction: Direction, number: u32) {
    match direction {
      Across => self.across = Some(number),
      Down => self.down = Some(number),
    }
  }

  /// Fills in any direction missing from `self` with the entry from `other`.
  /// Entries already present in `self` are kept.
  pub fn absorb(&mut self, other: ClueNumbers) {
    self.across = self.across.or(other.across);
    self.down = self.down.or(other.down);
  }
}

/// One square of the grid that at least one clue passes through.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
  /// See [cell_id].
  pub id: String,
  pub x: usize,
  pub y: usize,
  /// What the player has entered. Empty if nothing.
  pub value: String,
  /// The correct letter, uppercased.
  pub answer: char,
  /// The clue number printed in this square, if a clue starts here.
  #[serde(serialize_with = "number_or_blank")]
  pub number: Option<u32>,
  pub clue_numbers: ClueNumbers,
  /// Free-form tag carried over from the clue definitions, space separated when
  /// the across and down clues disagree.
  pub custom: String,
  /// Position in the `(y, x)` ordering of the grid. This is the cell's identity for focus
  /// and history.
  pub index: usize,
}

impl Cell {
  /// Whether the player has entered anything here.
  pub fn is_filled(&self) -> bool {
    !self.value.is_empty()
  }

  /// Whether the entered value is exactly the answer.
  pub fn is_correct(&self) -> bool {
    let mut chars = self.value.chars();
    chars.next() == Some(self.answer) && chars.next().is_none()
  }

  /// The coordinate that changes when moving in `direction`: `x` for across, `y` for down.
  pub fn coord(&self, direction: Direction) -> usize {
    match direction {
      Across => self.x,
      Down => self.y,
    }
  }

  /// The coordinate that stays fixed when moving in `direction`.
  pub fn cross_coord(&self, direction: Direction) -> usize {
    self.coord(!direction)
  }
}

fn number_or_blank<S: Serializer>(number: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
  match number {
    Some(n) => s.serialize_u32(*n),
    None => s.serialize_str(""),
  }
}

/// A numbered clue with the cells its answer occupies.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
  /// The id of the first cell.
  pub id: String,
  pub number: u32,
  pub direction: Direction,
  pub x: usize,
  pub y: usize,
  pub answer: String,
  pub clue: String,
  pub custom: String,
  /// The cells of this clue as compiled, before merging with crossing clues.
  /// Their `value`s are never updated; look cells up by id in the merged grid.
  pub cells: Vec<Cell>,
  /// Position in the across-then-down ordering of the clue list.
  pub index: usize,
  pub is_correct: bool,
  pub is_filled: bool,
}

impl Clue {
  /// A label like `"4 Down"`.
  pub fn label(&self) -> String {
    let direction = match self.direction {
      Across => "Across",
      Down => "Down",
    };
    format!("{} {}", self.number, direction)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cell(value: &str, answer: char) -> Cell {
    Cell {
      id: cell_id(1, 2),
      x: 1,
      y: 2,
      value: value.to_string(),
      answer,
      number: None,
      clue_numbers: ClueNumbers::single(Down, 3),
      custom: String::new(),
      index: 0,
    }
  }

  #[test]
  fn correctness() {
    assert!(cell("A", 'A').is_correct());
    assert!(!cell("", 'A').is_correct());
    assert!(!cell("B", 'A').is_correct());
    assert!(!cell("AA", 'A').is_correct());
    assert!(cell("B", 'A').is_filled());
  }

  #[test]
  fn coords() {
    let c = cell("", 'A');
    assert_eq!(c.coord(Across), 1);
    assert_eq!(c.coord(Down), 2);
    assert_eq!(c.cross_coord(Across), 2);
  }

  #[test]
  fn absorb_keeps_existing_entries() {
    let mut numbers = ClueNumbers::single(Across, 1);
    numbers.absorb(ClueNumbers {
      across: Some(7),
      down: Some(2),
    });
    assert_eq!(numbers.get(Across), Some(1));
    assert_eq!(numbers.get(Down), Some(2));
  }

  #[test]
  fn serializes_like_the_widget_state() {
    let json = serde_json::to_value(cell("", 'A')).unwrap();
    assert_eq!(json["id"], "1-2");
    assert_eq!(json["number"], "");
    assert_eq!(json["clueNumbers"], serde_json::json!({ "down": 3 }));
    assert_eq!(json["answer"], "A");
  }
}
