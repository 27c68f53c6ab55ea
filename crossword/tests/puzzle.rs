use crossword::Direction::{Across, Down};
use crossword::{
  ClueDefinition, Config, Focus, Puzzle, SavedCell, Snapshot, compile, is_complete, merge,
  parse_records, percent_correct, read_records,
};
use proptest::prelude::*;
use std::collections::HashSet;

const MINI: &str = include_str!("../../demos/mini.json");

fn mini_definitions() -> Vec<ClueDefinition> {
  let (definitions, errors) = read_records(&parse_records(MINI).unwrap());
  assert!(errors.is_empty());
  definitions
}

fn mini() -> Puzzle {
  let mut puzzle = Puzzle::new(Config::default());
  let records = parse_records(MINI).unwrap();
  assert!(puzzle.load(&records, None).is_ok());
  puzzle
}

fn index_of(puzzle: &Puzzle, id: &str) -> usize {
  puzzle.cell_index_by_id(id).unwrap()
}

#[test]
fn mini_grid_shape() {
  let puzzle = mini();
  assert_eq!(puzzle.cells().len(), 21);
  assert_eq!(puzzle.clues().len(), 10);

  let numbered: Vec<(&str, u32)> = puzzle
    .cells()
    .iter()
    .filter_map(|c| c.number.map(|n| (c.id.as_str(), n)))
    .collect();
  assert_eq!(
    numbered,
    vec![
      ("2-0", 1),
      ("3-0", 2),
      ("4-0", 3),
      ("0-1", 4),
      ("1-1", 5),
      ("0-2", 6),
      ("0-3", 7),
      ("0-4", 8),
    ]
  );
}

#[test]
fn every_cell_agrees_with_every_clue() {
  let clues = compile(&mini_definitions());
  let cells = merge(&clues);

  let positions: HashSet<&str> = clues
    .iter()
    .flat_map(|c| c.cells.iter().map(|cell| cell.id.as_str()))
    .collect();
  assert_eq!(cells.len(), positions.len());

  for clue in &clues {
    for clue_cell in &clue.cells {
      let cell = cells.iter().find(|c| c.id == clue_cell.id).unwrap();
      assert_eq!(cell.answer, clue_cell.answer);
      assert_eq!(cell.clue_numbers.get(clue.direction), Some(clue.number));
    }
  }
}

#[test]
fn finishing_a_word_jumps_to_the_next_clue() {
  let saved = Snapshot {
    cells: vec![
      SavedCell {
        id: "1-0".to_string(),
        value: "A".to_string(),
      },
      SavedCell {
        id: "2-0".to_string(),
        value: "T".to_string(),
      },
    ],
  };
  let mut puzzle = Puzzle::default();
  puzzle.load_definitions(
    &[
      ClueDefinition::new("Cat", "CAT", Across, 0, 0),
      ClueDefinition::new("Cab", "CAB", Down, 0, 0),
    ],
    Some(&saved),
  );
  assert_eq!(puzzle.focus(), Focus::new(0, Across));

  // (1, 0) is right next door, but (0, 0) was the last open square of 1 Across.
  puzzle.edit(0, "C", 1, false);
  assert_eq!(puzzle.focus(), Focus::new(index_of(&puzzle, "0-1"), Down));
}

#[test]
fn tab_from_the_last_across_clue_goes_to_the_down_clues() {
  let mut puzzle = mini();
  puzzle.focus_cell(index_of(&puzzle, "0-4"), false);
  assert_eq!(puzzle.current_clue().unwrap().label(), "8 Across");

  puzzle.focus_clue_diff(1);
  assert_eq!(puzzle.focus(), Focus::new(index_of(&puzzle, "2-0"), Down));
  assert_eq!(puzzle.current_clue().unwrap().label(), "1 Down");
}

#[test]
fn tab_skips_filled_clues() {
  let mut puzzle = mini();
  for (i, letter) in "GLINT".chars().enumerate() {
    puzzle.focus_cell(index_of(&puzzle, &format!("{i}-1")), false);
    puzzle.edit(puzzle.focus().cell_index, &letter.to_string(), 0, false);
  }
  puzzle.focus_cell(index_of(&puzzle, "2-0"), false);
  assert_eq!(puzzle.focus().direction, Across);
  puzzle.focus_clue_diff(1);
  assert_eq!(puzzle.current_clue().unwrap().label(), "6 Across");
}

#[test]
fn history_keeps_ten_edits() {
  let mut puzzle = mini();
  for index in 0..11 {
    puzzle.edit(index, "X", 1, false);
  }
  puzzle.undo(10);

  let filled: Vec<usize> = puzzle
    .cells()
    .iter()
    .filter(|c| c.is_filled())
    .map(|c| c.index)
    .collect();
  assert_eq!(filled, vec![0, 1]);
}

#[test]
fn clearing_never_touches_answers() {
  let mut puzzle = mini();
  let answers: Vec<char> = puzzle.cells().iter().map(|c| c.answer).collect();
  puzzle.reveal();
  for _ in 0..3 {
    puzzle.clear();
    assert!(puzzle.cells().iter().all(|c| c.value.is_empty()));
    let after: Vec<char> = puzzle.cells().iter().map(|c| c.answer).collect();
    assert_eq!(after, answers);
  }
}

#[test]
fn arrows_walk_the_row() {
  let mut puzzle = mini();
  puzzle.focus_cell(index_of(&puzzle, "0-1"), false);
  puzzle.move_focus(Across, 4);
  assert_eq!(puzzle.focus().cell_index, index_of(&puzzle, "4-1"));
  puzzle.move_focus(Across, 1);
  assert_eq!(puzzle.focus().cell_index, index_of(&puzzle, "4-1"));
  puzzle.move_focus(Down, -1);
  assert_eq!(puzzle.focus(), Focus::new(index_of(&puzzle, "4-1"), Down));
  puzzle.move_focus(Down, -1);
  assert_eq!(puzzle.focus(), Focus::new(index_of(&puzzle, "4-0"), Down));
}

#[test]
fn word_highlight_follows_the_cursor() {
  let mut puzzle = mini();
  puzzle.focus_cell(index_of(&puzzle, "1-4"), false);
  let expected: Vec<usize> = ["0-4", "1-4", "2-4"]
    .iter()
    .map(|id| index_of(&puzzle, id))
    .collect();
  assert_eq!(
    puzzle.secondarily_focused_cells().into_iter().collect::<Vec<_>>(),
    expected
  );
}

proptest! {
  #[test]
  fn numbering_ignores_input_order(shuffled in Just(mini_definitions()).prop_shuffle()) {
    let expected = compile(&mini_definitions());
    let actual = compile(&shuffled);
    let summary = |clues: &[crossword::Clue]| -> Vec<(u32, crossword::Direction, String)> {
      clues.iter().map(|c| (c.number, c.direction, c.answer.clone())).collect()
    };
    prop_assert_eq!(summary(&actual), summary(&expected));
    prop_assert_eq!(merge(&actual), merge(&expected));
  }

  #[test]
  fn complete_exactly_when_all_correct(pattern in proptest::collection::vec(0u8..3, 21)) {
    let mut cells = merge(&compile(&mini_definitions()));
    for (cell, p) in cells.iter_mut().zip(&pattern) {
      cell.value = match *p {
        0 => String::new(),
        1 => "?".to_string(),
        _ => cell.answer.to_string(),
      };
    }
    let all_correct = pattern.iter().all(|&p| p == 2);
    prop_assert_eq!(is_complete(&cells), all_correct);
    prop_assert_eq!(is_complete(&cells), percent_correct(&cells) == 1.0);
  }

  #[test]
  fn shifted_coordinates_give_the_same_grid(shift in 0i64..3) {
    let shifted: Vec<ClueDefinition> = mini_definitions()
      .into_iter()
      .map(|mut d| {
        d.x += shift;
        d.y += shift;
        d
      })
      .collect();
    prop_assert_eq!(merge(&compile(&shifted)), merge(&compile(&mini_definitions())));
  }
}
