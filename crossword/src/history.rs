use crate::grid::Cell;
use std::collections::VecDeque;

/// How many edits can be undone.
pub const HISTORY_DEPTH: usize = 10;

/// The grid as it was right after an edit, and where the cursor was.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HistoryEntry {
  pub cells: Vec<Cell>,
  pub focused_cell_index: usize,
}

/// Undo/redo over the last [HISTORY_DEPTH] edits.
///
/// Entries are kept newest first. `position` points at the entry matching the grid on
/// screen; undo moves it towards older entries and redo back towards newer ones. The
/// grid as it was before the oldest retained edit is not kept, so the oldest entry is as
/// far back as undo can go.
#[derive(Debug, Default, Clone)]
pub struct History {
  entries: VecDeque<HistoryEntry>,
  position: usize,
}

impl History {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records the grid after an edit. Anything that had been undone can no longer be redone.
  pub fn record(&mut self, cells: &[Cell], focused_cell_index: usize) {
    let undone = self.position.min(self.entries.len());
    self.entries.drain(..undone);
    self.entries.push_front(HistoryEntry {
      cells: cells.to_vec(),
      focused_cell_index,
    });
    self.entries.truncate(HISTORY_DEPTH);
    self.position = 0;
  }

  /// Steps one entry back (`diff = -1`) or forward (`diff = 1`) and returns the entry
  /// to restore. At either end this returns `None` and the position does not move.
  pub fn step(&mut self, diff: isize) -> Option<&HistoryEntry> {
    let target = self.position as isize - diff;
    if target < 0 || target as usize >= self.entries.len() {
      return None;
    }
    self.position = target as usize;
    self.entries.get(self.position)
  }

  pub fn undo(&mut self) -> Option<&HistoryEntry> {
    self.step(-1)
  }

  pub fn redo(&mut self) -> Option<&HistoryEntry> {
    self.step(1)
  }

  pub fn clear(&mut self) {
    self.entries.clear();
    self.position = 0;
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// How many steps back from the newest entry the current state is.
  pub fn position(&self) -> usize {
    self.position
  }
}
