use crate::grid::{Cell, Clue};
use std::collections::HashMap;

/// Flattens the cells of every clue into the puzzle grid, one [Cell] per position.
///
/// Where an across and a down clue cross, the occurrence that carries a clue number is
/// kept and the other one's clue numbers are folded into it. Differing `custom` tags are
/// joined with a space.
///
/// Cells come out in reading order, and each cell's `index` is its position in the result.
pub fn merge(clues: &[Clue]) -> Vec<Cell> {
  let mut cells: Vec<Cell> = clues.iter().flat_map(|c| c.cells.iter().cloned()).collect();
  cells.sort_by_key(|c| (c.y, c.x, c.number.is_none()));

  let mut merged: Vec<Cell> = Vec::with_capacity(cells.len());
  let mut positions: HashMap<String, usize> = HashMap::new();

  for cell in cells {
    if let Some(&i) = positions.get(&cell.id) {
      let canonical = &mut merged[i];
      canonical.clue_numbers.absorb(cell.clue_numbers);
      if canonical.custom != cell.custom {
        canonical.custom = format!("{} {}", canonical.custom, cell.custom);
      }
    } else {
      positions.insert(cell.id.clone(), merged.len());
      merged.push(cell);
    }
  }

  // Ids are unique per position, so `merged` is already in (y, x) order.
  for (index, cell) in merged.iter_mut().enumerate() {
    cell.index = index;
  }
  merged
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ClueDefinition;
  use crate::Direction::{Across, Down};
  use crate::compile;
  use crate::grid::ClueNumbers;

  #[test]
  fn cat_and_cab_share_a_corner() {
    let clues = compile(&[
      ClueDefinition::new("Cat", "CAT", Across, 0, 0),
      ClueDefinition::new("Cab", "CAB", Down, 0, 0),
    ]);
    assert!(clues.iter().all(|c| c.number == 1));

    let cells = merge(&clues);
    let summary: Vec<(&str, char, ClueNumbers)> = cells
      .iter()
      .map(|c| (c.id.as_str(), c.answer, c.clue_numbers))
      .collect();
    assert_eq!(
      summary,
      vec![
        (
          "0-0",
          'C',
          ClueNumbers {
            across: Some(1),
            down: Some(1)
          }
        ),
        ("1-0", 'A', ClueNumbers::single(Across, 1)),
        ("2-0", 'T', ClueNumbers::single(Across, 1)),
        ("0-1", 'A', ClueNumbers::single(Down, 1)),
        ("0-2", 'B', ClueNumbers::single(Down, 1)),
      ]
    );
    assert_eq!(cells[0].number, Some(1));
    assert!(cells.iter().all(|c| c.value.is_empty()));
    assert_eq!(
      cells.iter().map(|c| c.index).collect::<Vec<_>>(),
      vec![0, 1, 2, 3, 4]
    );
  }

  #[test]
  fn numbered_occurrence_is_kept() {
    // 2 Down starts in the middle of 1 Across.
    let clues = compile(&[
      ClueDefinition::new("Ace", "ACE", Across, 0, 0),
      ClueDefinition::new("Cow", "COW", Down, 1, 0),
    ]);
    let cells = merge(&clues);
    let shared = cells.iter().find(|c| c.id == "1-0").unwrap();
    assert_eq!(shared.number, Some(2));
    assert_eq!(
      shared.clue_numbers,
      ClueNumbers {
        across: Some(1),
        down: Some(2)
      }
    );
  }

  #[test]
  fn custom_tags_are_joined() {
    let clues = compile(&[
      ClueDefinition::new("Cat", "CAT", Across, 0, 0).with_custom("a"),
      ClueDefinition::new("Cab", "CAB", Down, 0, 0).with_custom("b"),
    ]);
    let cells = merge(&clues);
    assert_eq!(cells[0].custom, "a b");
    assert_eq!(cells[1].custom, "a");
    assert_eq!(cells[3].custom, "b");
  }

  #[test]
  fn equal_custom_tags_are_not_repeated() {
    let clues = compile(&[
      ClueDefinition::new("Cat", "CAT", Across, 0, 0).with_custom("a"),
      ClueDefinition::new("Cab", "CAB", Down, 0, 0).with_custom("a"),
    ]);
    assert_eq!(merge(&clues)[0].custom, "a");
  }
}
