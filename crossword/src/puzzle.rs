use crate::Direction;
use crate::completion::{self, CompletionLatch};
use crate::definition::{ClueDefinition, read_records};
use crate::grid::{Cell, Clue};
use crate::history::History;
use crate::navigate::{self, Focus};
use crate::validate::{Validation, ValidationError, validate};
use crate::{compile, merge, out_of_range};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, info};

/// Extra time a reveal is held for on top of [Config::reveal_duration], so the last
/// square has finished drawing before the reveal ends.
const REVEAL_GRACE: Duration = Duration::from_millis(250);

/// Settings for a [Puzzle].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// How long the host takes to animate a reveal.
  pub reveal_duration: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      reveal_duration: Duration::from_millis(1000),
    }
  }
}

/// Receives notifications from a [Puzzle]. All methods do nothing by default.
pub trait PuzzleObserver {
  /// The values in the grid changed.
  fn on_cell_change(&mut self, _cells: &[Cell]) {}
  /// The grid has just been solved. The map is from cell id to cell index.
  fn on_complete(&mut self, _cell_index_map: &HashMap<String, usize>) {}
  /// Every answer has been filled in by [Puzzle::reveal].
  fn on_reveal(&mut self, _cells: &[Cell]) {}
}

/// A saved cell value, as found in a [Snapshot].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SavedCell {
  pub id: String,
  #[serde(default)]
  pub value: String,
}

/// The player's progress: the value of every cell, by id.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub cells: Vec<SavedCell>,
}

impl Snapshot {
  /// The current value of each of `cells`.
  pub fn from_cells(cells: &[Cell]) -> Self {
    Self {
      cells: cells
        .iter()
        .map(|c| SavedCell {
          id: c.id.clone(),
          value: c.value.clone(),
        })
        .collect(),
    }
  }

  pub fn from_json(json: &str) -> Result<Self, crate::Error> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn to_json(&self) -> Result<String, crate::Error> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// Returned by [Puzzle::reveal]. Once `hold` has elapsed, hand it back to
/// [Puzzle::end_reveal].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RevealTicket {
  generation: u64,
  pub hold: Duration,
}

/// A playable crossword: the grid, the cursor, undo history, and the check/reveal
/// display state.
///
/// Call [load](Self::load) to start a puzzle, then forward the player's input to the
/// other methods and read back [cells](Self::cells), [clues](Self::clues) and
/// [focus](Self::focus) after each one.
pub struct Puzzle {
  config: Config,
  clues: Vec<Clue>,
  cells: Vec<Cell>,
  validation: Validation,
  focus: Focus,
  history: History,
  completion: CompletionLatch,
  is_revealing: bool,
  is_checking: bool,
  reveal_generation: u64,
  observer: Option<Box<dyn PuzzleObserver>>,
}

impl Puzzle {
  /// An empty puzzle. Nothing can be played until something is loaded.
  pub fn new(config: Config) -> Self {
    Self {
      config,
      clues: vec![],
      cells: vec![],
      validation: Validation::default(),
      focus: Focus::default(),
      history: History::new(),
      completion: CompletionLatch::default(),
      is_revealing: false,
      is_checking: false,
      reveal_generation: 0,
      observer: None,
    }
  }

  pub fn with_observer(mut self, observer: impl PuzzleObserver + 'static) -> Self {
    self.observer = Some(Box::new(observer));
    self
  }

  /// Replaces the current puzzle with one built from untyped clue records, e.g. the
  /// output of [parse_records](crate::parse_records).
  ///
  /// The grid is built even if the records fail validation; check the returned
  /// [Validation] before offering the puzzle to a player. Values from `snapshot` are
  /// copied onto cells with a matching id; saved ids that aren't in the grid are ignored.
  pub fn load(&mut self, records: &[Value], snapshot: Option<&Snapshot>) -> &Validation {
    let (definitions, shape_errors) = read_records(records);
    self.install(&definitions, shape_errors, snapshot)
  }

  /// Like [load](Self::load), for definitions that are already typed.
  pub fn load_definitions(
    &mut self,
    definitions: &[ClueDefinition],
    snapshot: Option<&Snapshot>,
  ) -> &Validation {
    self.install(definitions, vec![], snapshot)
  }

  fn install(
    &mut self,
    definitions: &[ClueDefinition],
    mut shape_errors: Vec<ValidationError>,
    snapshot: Option<&Snapshot>,
  ) -> &Validation {
    shape_errors.extend(out_of_range(definitions));
    let clues = compile(definitions);
    self.validation = validate(shape_errors, &clues);
    self.cells = merge(&clues);
    self.clues = clues;
    self.history.clear();
    self.completion.reset();
    self.reset();
    debug!(
      cells = self.cells.len(),
      clues = self.clues.len(),
      valid = self.validation.is_ok(),
      "loaded puzzle"
    );

    if let Some(snapshot) = snapshot.filter(|s| !s.cells.is_empty()) {
      self.restore(snapshot);
    }
    self.refresh();
    &self.validation
  }

  fn restore(&mut self, snapshot: &Snapshot) {
    let saved: HashMap<&str, &str> = snapshot
      .cells
      .iter()
      .map(|c| (c.id.as_str(), c.value.as_str()))
      .collect();
    let mut matched = 0;
    for cell in &mut self.cells {
      if let Some(value) = saved.get(cell.id.as_str()) {
        cell.value = value.to_string();
        matched += 1;
      }
    }
    if matched < saved.len() {
      debug!(dropped = saved.len() - matched, "saved cells not in the grid");
    }
  }

  /// Cursor back to the first cell, check and reveal display off. Any reveal in progress
  /// is abandoned.
  fn reset(&mut self) {
    self.is_revealing = false;
    self.is_checking = false;
    self.focus = Focus::default();
    self.reveal_generation += 1;
  }

  /// Recomputes clue checks and fires the completion event if the grid was just solved.
  fn refresh(&mut self) {
    completion::check_clues(&mut self.clues, &self.cells);
    if self.completion.update(&self.cells) {
      info!(cells = self.cells.len(), "puzzle complete");
      let map = self.cell_index_map();
      if let Some(observer) = self.observer.as_mut() {
        observer.on_complete(&map);
      }
    }
  }

  fn cells_changed(&mut self) {
    self.refresh();
    if let Some(observer) = self.observer.as_mut() {
      observer.on_cell_change(&self.cells);
    }
  }

  /// Writes `value` into the cell at `index` and moves the cursor on by `diff`.
  ///
  /// Typing over a square that already has a letter keeps the cursor stepping through
  /// filled squares; otherwise it skips ahead to the next empty one. `force_overwrite`
  /// always steps through filled squares, which is what erasing wants. Filling in the last
  /// open square of a clue with a positive `diff` jumps to the next clue instead.
  pub fn edit(&mut self, index: usize, value: &str, diff: isize, force_overwrite: bool) {
    let Some(cell) = self.cells.get(index) else {
      return;
    };
    let direction = self.focus.direction;
    let replace_filled = force_overwrite || cell.is_filled();
    let at_end_of_clue = cell.clue_numbers.get(direction).is_some_and(|number| {
      self
        .cells
        .iter()
        .filter(|c| c.clue_numbers.get(direction) == Some(number))
        .filter(|c| replace_filled || !c.is_filled())
        .map(|c| c.coord(direction))
        .max()
        == Some(cell.coord(direction))
    });

    self.cells[index].value = value.to_uppercase();
    self.history.record(&self.cells, self.focus.cell_index);
    self.cells_changed();

    self.focus = if at_end_of_clue && diff > 0 {
      self.focus.focus_clue_diff(&self.cells, &self.clues, diff)
    } else {
      self.focus.focus_cell_diff(&self.cells, diff, replace_filled)
    };
  }

  /// Empties every cell.
  pub fn clear(&mut self) {
    self.reset();
    for cell in &mut self.cells {
      cell.value.clear();
    }
    self.cells_changed();
  }

  /// Fills every cell with its answer and starts the reveal display. Does nothing, and
  /// returns `None`, if every clue is already correct.
  ///
  /// The host should keep showing the reveal for [RevealTicket::hold] and then call
  /// [end_reveal](Self::end_reveal).
  pub fn reveal(&mut self) -> Option<RevealTicket> {
    if self.is_revealed() {
      return None;
    }
    self.reset();
    for cell in &mut self.cells {
      cell.value = cell.answer.to_string();
    }
    self.cells_changed();

    self.is_revealing = true;
    if let Some(observer) = self.observer.as_mut() {
      observer.on_reveal(&self.cells);
    }
    Some(RevealTicket {
      generation: self.reveal_generation,
      hold: self.config.reveal_duration + REVEAL_GRACE,
    })
  }

  /// Ends the reveal started by `ticket`. Returns false, changing nothing, if the puzzle
  /// has been loaded, cleared or revealed again since.
  pub fn end_reveal(&mut self, ticket: RevealTicket) -> bool {
    if ticket.generation != self.reveal_generation || !self.is_revealing {
      return false;
    }
    self.is_revealing = false;
    true
  }

  /// Starts showing which letters are wrong.
  pub fn check(&mut self) {
    self.is_checking = true;
  }

  pub fn uncheck(&mut self) {
    self.is_checking = false;
  }

  /// Undoes up to `steps` edits.
  pub fn undo(&mut self, steps: usize) {
    self.step_history(-1, steps);
  }

  /// Redoes up to `steps` undone edits.
  pub fn redo(&mut self, steps: usize) {
    self.step_history(1, steps);
  }

  fn step_history(&mut self, diff: isize, steps: usize) {
    let mut restored = None;
    for _ in 0..steps {
      match self.history.step(diff) {
        Some(entry) => restored = Some(entry.clone()),
        None => break,
      }
    }
    if let Some(entry) = restored {
      self.cells = entry.cells;
      self.focus = self
        .focus
        .focus_cell(&self.cells, entry.focused_cell_index, false);
      self.cells_changed();
    }
  }

  /// See [Focus::focus_cell].
  pub fn focus_cell(&mut self, index: usize, was_already_focused: bool) {
    self.focus = self.focus.focus_cell(&self.cells, index, was_already_focused);
  }

  /// See [Focus::move_focus].
  pub fn move_focus(&mut self, direction: Direction, diff: isize) {
    self.focus = self.focus.move_focus(&self.cells, direction, diff);
  }

  /// See [Focus::flip_direction].
  pub fn flip_direction(&mut self) {
    self.focus = self.focus.flip_direction(&self.cells);
  }

  /// See [Focus::focus_clue_diff].
  pub fn focus_clue_diff(&mut self, diff: isize) {
    self.focus = self.focus.focus_clue_diff(&self.cells, &self.clues, diff);
  }

  /// Focuses the clue at position `index` of [clues](Self::clues).
  pub fn focus_clue(&mut self, index: usize) {
    if let Some(clue) = self.clues.get(index) {
      self.focus = self.focus.focus_clue(&self.cells, clue);
    }
  }

  /// Moves `diff` places through the clue list from the current clue, wrapping at the ends.
  pub fn focus_clue_step(&mut self, diff: isize) {
    let current = self.current_clue().map_or(-1, |c| c.index as isize);
    let Some(index) = current.checked_add(diff) else {
      return;
    };
    self.focus = self
      .focus
      .focus_clue_index(&self.cells, &self.clues, index);
  }

  pub fn cells(&self) -> &[Cell] {
    &self.cells
  }

  /// Clues in list order, with up to date `is_correct` and `is_filled`.
  pub fn clues(&self) -> &[Clue] {
    &self.clues
  }

  pub fn validation(&self) -> &Validation {
    &self.validation
  }

  pub fn focus(&self) -> Focus {
    self.focus
  }

  pub fn focused_cell(&self) -> Option<&Cell> {
    self.cells.get(self.focus.cell_index)
  }

  /// Indices of the cells in the word under the cursor.
  pub fn secondarily_focused_cells(&self) -> BTreeSet<usize> {
    match self.focused_cell() {
      Some(cell) => navigate::secondarily_focused_cells(&self.cells, self.focus.direction, cell),
      None => BTreeSet::new(),
    }
  }

  pub fn current_clue(&self) -> Option<&Clue> {
    navigate::current_clue(&self.cells, &self.clues, self.focus)
  }

  pub fn cell_index_by_id(&self, id: &str) -> Option<usize> {
    self.cells.iter().position(|c| c.id == id)
  }

  pub fn cell_index_map(&self) -> HashMap<String, usize> {
    self
      .cells
      .iter()
      .map(|c| (c.id.clone(), c.index))
      .collect()
  }

  pub fn percent_correct(&self) -> f64 {
    completion::percent_correct(&self.cells)
  }

  pub fn is_complete(&self) -> bool {
    completion::is_complete(&self.cells)
  }

  /// Whether every clue is answered correctly.
  pub fn is_revealed(&self) -> bool {
    completion::is_revealed(&self.clues)
  }

  pub fn is_revealing(&self) -> bool {
    self.is_revealing
  }

  pub fn is_checking(&self) -> bool {
    self.is_checking
  }

  /// The current value of every cell, for saving.
  pub fn snapshot(&self) -> Snapshot {
    Snapshot::from_cells(&self.cells)
  }
}

impl Default for Puzzle {
  fn default() -> Self {
    Self::new(Config::default())
  }
}
