//! Turns clue definitions into numbered [Clue]s.

use crate::Direction::{Across, Down};
use crate::definition::ClueDefinition;
use crate::grid::{Cell, Clue, ClueNumbers, cell_id};
use crate::validate::ValidationError;
use std::collections::HashMap;
use tracing::{debug, error};

/// Builds the clue list for a puzzle.
///
/// Coordinates are shifted so the smallest `x` or `y` in the puzzle becomes 0, which
/// lets 0- and 1-based definitions produce the same grid. Numbers are handed out in
/// reading order of the clues' start squares, and an across and a down clue that start
/// on the same square share a number.
///
/// The result is ordered with all across clues first, then all down clues, each by
/// number. Every clue carries its own freshly expanded cells; see [merge](crate::merge)
/// for the shared grid.
///
/// Definitions that can't be placed on the grid are skipped; [out_of_range] reports them.
pub fn compile(definitions: &[ClueDefinition]) -> Vec<Clue> {
  let Some(adjust) = adjustment(definitions) else {
    return vec![];
  };

  let mut placed: Vec<(usize, usize, &ClueDefinition)> = definitions
    .iter()
    .filter_map(|d| place(d, adjust).map(|(x, y)| (x, y, d)))
    .collect();
  placed.sort_by_key(|&(x, y, _)| (y, x));

  let mut numbers: HashMap<(usize, usize), u32> = HashMap::new();
  let mut next_number = 1;
  let mut clues = Vec::with_capacity(placed.len());

  for (x, y, definition) in placed {
    let number = *numbers.entry((x, y)).or_insert_with(|| {
      next_number += 1;
      next_number - 1
    });
    let custom = definition.custom.clone().unwrap_or_default();

    clues.push(Clue {
      id: cell_id(x, y),
      number,
      direction: definition.direction,
      x,
      y,
      answer: definition.answer.clone(),
      clue: definition.clue.clone(),
      cells: expand(definition, x, y, number, &custom),
      custom,
      index: 0,
      is_correct: false,
      is_filled: false,
    });
  }

  clues.sort_by_key(|clue| (clue.direction, clue.number));
  for (index, clue) in clues.iter_mut().enumerate() {
    clue.index = index;
  }

  debug!(
    clues = clues.len(),
    numbers = next_number - 1,
    adjust,
    "compiled clues"
  );
  clues
}

/// The definitions [compile] leaves out because their squares would not fit in a `usize`
/// once the grid is shifted.
pub fn out_of_range(definitions: &[ClueDefinition]) -> Vec<ValidationError> {
  let Some(adjust) = adjustment(definitions) else {
    return vec![];
  };
  definitions
    .iter()
    .filter(|d| place(d, adjust).is_none())
    .map(|d| {
      let e = ValidationError::OutOfRange {
        clue: d.clue.clone(),
        x: d.x,
        y: d.y,
      };
      error!("{e}");
      e
    })
    .collect()
}

fn adjustment(definitions: &[ClueDefinition]) -> Option<i64> {
  definitions.iter().flat_map(|d| [d.x, d.y]).min()
}

/// The shifted start of `definition`, if every letter of its answer is addressable.
fn place(definition: &ClueDefinition, adjust: i64) -> Option<(usize, usize)> {
  let shift = |v: i64| usize::try_from(i128::from(v) - i128::from(adjust)).ok();
  let (x, y) = (shift(definition.x)?, shift(definition.y)?);
  let start = match definition.direction {
    Across => x,
    Down => y,
  };
  start.checked_add(definition.answer.chars().count())?;
  Some((x, y))
}

/// One cell per letter of the answer, starting at `(x, y)`.
fn expand(definition: &ClueDefinition, x: usize, y: usize, number: u32, custom: &str) -> Vec<Cell> {
  definition
    .answer
    .chars()
    .enumerate()
    .map(|(i, letter)| {
      let (x, y) = match definition.direction {
        Across => (x + i, y),
        Down => (x, y + i),
      };
      Cell {
        id: cell_id(x, y),
        x,
        y,
        value: String::new(),
        answer: letter.to_uppercase().next().unwrap_or(letter),
        number: (i == 0).then_some(number),
        clue_numbers: ClueNumbers::single(definition.direction, number),
        custom: custom.to_string(),
        index: 0,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Direction;

  fn mini() -> Vec<ClueDefinition> {
    vec![
      ClueDefinition::new("The 1% of 1% milk", "FAT", Across, 2, 0),
      ClueDefinition::new("Flicker of light", "GLINT", Across, 0, 1),
      ClueDefinition::new("Really neat", "NIFTY", Across, 0, 2),
      ClueDefinition::new("\"__ we meet again\"", "UNTIL", Across, 0, 3),
      ClueDefinition::new("It's way over your head", "SKY", Across, 0, 4),
      ClueDefinition::new("Point bonus", "FIFTY", Down, 2, 0),
      ClueDefinition::new("Opposite of pro-", "ANTI", Down, 3, 0),
      ClueDefinition::new("Texter's \"gotta run\"", "TTYL", Down, 4, 0),
      ClueDefinition::new("Migratory antelopes", "GNUS", Down, 0, 1),
      ClueDefinition::new("Clickable part of a webpage", "LINK", Down, 1, 1),
    ]
  }

  fn labels(clues: &[Clue]) -> Vec<(u32, Direction, &str)> {
    clues
      .iter()
      .map(|c| (c.number, c.direction, c.answer.as_str()))
      .collect()
  }

  #[test]
  fn numbers_follow_reading_order() {
    let clues = compile(&mini());
    assert_eq!(
      labels(&clues),
      vec![
        (1, Across, "FAT"),
        (4, Across, "GLINT"),
        (6, Across, "NIFTY"),
        (7, Across, "UNTIL"),
        (8, Across, "SKY"),
        (1, Down, "FIFTY"),
        (2, Down, "ANTI"),
        (3, Down, "TTYL"),
        (4, Down, "GNUS"),
        (5, Down, "LINK"),
      ]
    );
    let indices: Vec<usize> = clues.iter().map(|c| c.index).collect();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
  }

  #[test]
  fn one_based_coordinates_are_shifted() {
    let clues = compile(&[
      ClueDefinition::new("Cat", "CAT", Across, 1, 1),
      ClueDefinition::new("Cab", "CAB", Down, 1, 1),
    ]);
    assert_eq!(clues[0].id, "0-0");
    assert_eq!((clues[1].x, clues[1].y), (0, 0));
    let ids: Vec<&str> = clues[1].cells.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["0-0", "0-1", "0-2"]);
  }

  #[test]
  fn expands_letters_along_the_direction() {
    let clues = compile(&[ClueDefinition::new("Dog", "dog", Down, 3, 0).with_custom("red")]);
    let cells = &clues[0].cells;
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[0].number, Some(1));
    assert_eq!(cells[1].number, None);
    assert_eq!(cells[2].answer, 'G');
    assert_eq!((cells[2].x, cells[2].y), (3, 2));
    assert!(cells.iter().all(|c| c.clue_numbers == ClueNumbers::single(Down, 1)));
    assert!(cells.iter().all(|c| c.custom == "red" && c.value.is_empty()));
  }

  #[test]
  fn empty_input() {
    assert!(compile(&[]).is_empty());
    assert!(out_of_range(&[]).is_empty());
  }

  #[test]
  fn far_apart_coordinates_are_left_out() {
    let definitions = [
      ClueDefinition::new("Cat", "CAT", Across, i64::MIN, 0),
      ClueDefinition::new("Far", "FAR", Across, i64::MAX, 0),
    ];
    let clues = compile(&definitions);
    assert_eq!(labels(&clues), vec![(1, Across, "CAT")]);
    assert_eq!(
      out_of_range(&definitions),
      vec![ValidationError::OutOfRange {
        clue: "Far".to_string(),
        x: i64::MAX,
        y: 0
      }]
    );
  }

  #[test]
  fn extreme_but_placeable_coordinates() {
    let definitions = [ClueDefinition::new("Cat", "CAT", Across, i64::MAX, -1)];
    let clues = compile(&definitions);
    assert_eq!(clues.len(), 1);
    assert_eq!(clues[0].y, 0);
    assert_eq!(clues[0].cells[2].x, clues[0].x + 2);
    assert!(out_of_range(&definitions).is_empty());
  }
}
