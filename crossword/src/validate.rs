use crate::grid::Clue;
use std::collections::HashMap;
use tracing::error;

/// A problem found in a puzzle definition. None of these stop a grid from being built,
/// but a puzzle with any of them should not be offered to a player.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
  /// A clue record is missing a field, or the field has the wrong type.
  #[error("\"{field}\" is not a {expected} in clue record {record}")]
  Shape {
    record: usize,
    field: &'static str,
    expected: &'static str,
  },
  /// Two clues put different letters in the same square.
  #[error("cell \"{id}\" has two different values: {first} and {second}")]
  Conflict { id: String, first: char, second: char },
  /// A clue lies so far from the rest of the grid that its squares can't be numbered.
  /// It is left out of the grid.
  #[error("clue \"{clue}\" at ({x}, {y}) is too far from the rest of the grid")]
  OutOfRange { clue: String, x: i64, y: i64 },
}

/// The outcome of checking a puzzle definition.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Validation {
  errors: Vec<ValidationError>,
}

impl Validation {
  /// Whether the puzzle is fit to be played.
  pub fn is_ok(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn errors(&self) -> &[ValidationError] {
    &self.errors
  }
}

/// Combines the shape errors found while reading the records with any answer conflicts
/// between the compiled clues.
pub fn validate(shape_errors: Vec<ValidationError>, clues: &[Clue]) -> Validation {
  let mut errors = shape_errors;
  errors.extend(find_conflicts(clues));
  Validation { errors }
}

/// Finds squares where two clues disagree on the answer letter. Each disagreement is
/// reported against the first letter seen for that square.
pub fn find_conflicts(clues: &[Clue]) -> Vec<ValidationError> {
  let mut letters: HashMap<&str, char> = HashMap::new();
  let mut conflicts = vec![];

  for cell in clues.iter().flat_map(|c| &c.cells) {
    match letters.get(cell.id.as_str()) {
      None => {
        letters.insert(&cell.id, cell.answer);
      }
      Some(&first) if first != cell.answer => {
        let e = ValidationError::Conflict {
          id: cell.id.clone(),
          first,
          second: cell.answer,
        };
        error!("{e}");
        conflicts.push(e);
      }
      Some(_) => {}
    }
  }

  conflicts
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ClueDefinition;
  use crate::Direction::{Across, Down};
  use crate::compile;

  #[test]
  fn consistent_crossings_pass() {
    let clues = compile(&[
      ClueDefinition::new("Cat", "CAT", Across, 0, 0),
      ClueDefinition::new("Cab", "cab", Down, 0, 0),
    ]);
    let validation = validate(vec![], &clues);
    assert!(validation.is_ok());
    assert!(validation.errors().is_empty());
  }

  #[test]
  fn conflicting_letters_are_reported() {
    let clues = compile(&[
      ClueDefinition::new("Cat", "CAT", Across, 0, 0),
      ClueDefinition::new("Dab", "DAB", Down, 0, 0),
    ]);
    let validation = validate(vec![], &clues);
    assert!(!validation.is_ok());
    assert_eq!(
      validation.errors(),
      &[ValidationError::Conflict {
        id: "0-0".to_string(),
        first: 'C',
        second: 'D'
      }]
    );
    assert_eq!(
      validation.errors()[0].to_string(),
      "cell \"0-0\" has two different values: C and D"
    );
  }

  #[test]
  fn shape_errors_fail_validation() {
    let shape = ValidationError::Shape {
      record: 2,
      field: "answer",
      expected: "string",
    };
    let validation = validate(vec![shape.clone()], &[]);
    assert!(!validation.is_ok());
    assert_eq!(validation.errors(), &[shape]);
    assert_eq!(
      validation.errors()[0].to_string(),
      "\"answer\" is not a string in clue record 2"
    );
  }
}
