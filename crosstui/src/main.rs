use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{
  self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
  KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossword::Direction::{Across, Down};
use crossword::{Cell, Config, Puzzle, PuzzleObserver, RevealTicket, Snapshot};
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Position, Rect},
  style::{Modifier, Style, Stylize},
  text::Line,
  widgets::{Block, Padding, Paragraph, Widget, Wrap},
};
use ratatui_macros::{line, span};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod theme;

use theme::{Theme, ThemeName};

const SQUARE_WIDTH: u16 = 7;
const SQUARE_HEIGHT: u16 = 3;
const SQUARE_STEP_X: u16 = SQUARE_WIDTH + 2;
const SQUARE_STEP_Y: u16 = SQUARE_HEIGHT + 1;

/// Solve crossword puzzles in your terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
  /// A JSON array of clue records
  puzzle: PathBuf,
  /// Load progress saved by --save. A missing file starts a fresh puzzle.
  #[arg(long)]
  state: Option<PathBuf>,
  /// Save progress to this file whenever the grid changes
  #[arg(long)]
  save: Option<PathBuf>,
  #[arg(long, value_enum, default_value_t = ThemeName::Classic)]
  theme: ThemeName,
  /// How long a reveal is shown for, in milliseconds
  #[arg(long, default_value_t = 1000)]
  reveal_duration: u64,
  /// Stop highlighting the current word once the puzzle is solved
  #[arg(long)]
  disable_highlight: bool,
  /// Write logs to this file. Nothing is logged otherwise.
  #[arg(long)]
  log_file: Option<PathBuf>,
  /// Log more detail. May be repeated.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(&cli)?;

  let records = crossword::read_records_file(&cli.puzzle)
    .with_context(|| format!("failed to read puzzle {}", cli.puzzle.display()))?;
  let snapshot = match &cli.state {
    Some(path) => load_snapshot(path)?,
    None => None,
  };

  let config = Config {
    reveal_duration: Duration::from_millis(cli.reveal_duration),
  };
  let mut puzzle = Puzzle::new(config).with_observer(Session {
    save: cli.save.clone(),
  });
  let validation = puzzle.load(&records, snapshot.as_ref());
  if !validation.is_ok() {
    eprintln!("{} is not a valid puzzle:", cli.puzzle.display());
    for error in validation.errors() {
      eprintln!("  {error}");
    }
    std::process::exit(2);
  }
  if puzzle.cells().is_empty() {
    bail!("{} has no clues", cli.puzzle.display());
  }

  let title = cli
    .puzzle
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  let app = App::new(puzzle, cli.theme.into(), cli.disable_highlight, title);

  let terminal = ratatui::init();
  execute!(stdout(), EnableMouseCapture)?;
  let result = app.run(terminal);
  let released = execute!(stdout(), DisableMouseCapture);
  ratatui::restore();
  released?;
  Ok(result?)
}

/// Sends logs to `--log-file`. The terminal belongs to the UI, so without one nothing is
/// installed.
fn init_logging(cli: &Cli) -> Result<()> {
  let Some(path) = &cli.log_file else {
    return Ok(());
  };
  let file =
    File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
  let default_level = match cli.verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

fn load_snapshot(path: &Path) -> Result<Option<Snapshot>> {
  if !path.exists() {
    debug!(path = %path.display(), "no saved state yet");
    return Ok(None);
  }
  let json = fs::read_to_string(path)
    .with_context(|| format!("failed to read saved state {}", path.display()))?;
  let snapshot = Snapshot::from_json(&json)
    .with_context(|| format!("{} is not a saved crossword", path.display()))?;
  Ok(Some(snapshot))
}

fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
  let json = snapshot.to_json()?;
  fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Writes progress to disk as the player goes, and logs the big moments.
struct Session {
  save: Option<PathBuf>,
}

impl PuzzleObserver for Session {
  fn on_cell_change(&mut self, cells: &[Cell]) {
    let Some(path) = &self.save else {
      return;
    };
    if let Err(err) = save_snapshot(path, &Snapshot::from_cells(cells)) {
      warn!("could not save progress: {err:#}");
    }
  }

  fn on_complete(&mut self, cell_index_map: &HashMap<String, usize>) {
    info!(cells = cell_index_map.len(), "solved");
  }

  fn on_reveal(&mut self, cells: &[Cell]) {
    info!(cells = cells.len(), "revealed");
  }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SquareStyle {
  // Default styling
  Standard,
  // The cursor is positioned on this square.
  Cursor,
  // This cursor is not on this square, but the word indicated by the cursor includes this square.
  Word,
}

impl SquareStyle {
  fn style(self, theme: &Theme) -> Style {
    let base_style = match self {
      SquareStyle::Standard => Style::new().bg(theme.bg),
      SquareStyle::Cursor => Style::new().bg(theme.primary_highlight),
      SquareStyle::Word => Style::new().bg(theme.secondary_highlight),
    };
    base_style.fg(theme.main)
  }
}

struct Areas {
  title: Rect,
  grid: Rect,
  clues: Rect,
  footer: Rect,
}

pub struct App {
  puzzle: Puzzle,
  theme: Theme,
  disable_highlight: bool,
  title: String,
  // (x, y) -> cell index
  positions: HashMap<(usize, usize), usize>,
  width: usize,
  height: usize,
  // Size of the last frame drawn, for mapping mouse clicks back to squares.
  area: Rect,
  reveal: Option<(RevealTicket, Instant)>,
  running: bool,
}

impl App {
  fn new(puzzle: Puzzle, theme: Theme, disable_highlight: bool, title: String) -> Self {
    let positions: HashMap<(usize, usize), usize> = puzzle
      .cells()
      .iter()
      .map(|c| ((c.x, c.y), c.index))
      .collect();
    let width = positions.keys().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let height = positions.keys().map(|&(_, y)| y + 1).max().unwrap_or(0);
    Self {
      puzzle,
      theme,
      disable_highlight,
      title,
      positions,
      width,
      height,
      area: Rect::default(),
      reveal: None,
      running: true,
    }
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    self.running = true;
    while self.running {
      terminal.draw(|frame| self.draw(frame))?;
      self.handle_crossterm_events()?;
    }
    Ok(())
  }

  fn draw(&mut self, frame: &mut Frame) {
    self.area = frame.area();
    frame.render_widget(&*self, frame.area());
  }

  /// Reads the crossterm events and updates the state of [`App`].
  ///
  /// While a reveal is showing, waits no longer than its deadline, then ends it.
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    if let Some((ticket, deadline)) = self.reveal {
      let now = Instant::now();
      if now >= deadline {
        self.puzzle.end_reveal(ticket);
        self.reveal = None;
        return Ok(());
      }
      if !event::poll(deadline - now)? {
        return Ok(());
      }
    }

    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      Event::Mouse(mouse) => self.on_mouse_event(mouse),
      _ => {}
    }
    Ok(())
  }

  /// Handles the key events and updates the state of [`App`].
  fn on_key_event(&mut self, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
      KeyCode::Esc => return self.quit(),
      KeyCode::Char('c' | 'C') if ctrl => return self.quit(),
      KeyCode::Char('l' | 'L') if ctrl => return self.clear(),
      KeyCode::Char('r' | 'R') if ctrl => return self.reveal(),
      KeyCode::Char('k' | 'K') if ctrl => return self.toggle_check(),
      _ => {}
    }

    // A solved grid is frozen.
    if self.puzzle.is_complete() {
      return;
    }

    let index = self.puzzle.focus().cell_index;
    match key.code {
      KeyCode::Char('z' | 'Z') if ctrl && shift => self.puzzle.redo(1),
      KeyCode::Char('z' | 'Z') if ctrl => self.puzzle.undo(1),
      KeyCode::Char('y' | 'Y') if ctrl => self.puzzle.redo(1),
      KeyCode::Char(_) if ctrl => {}
      KeyCode::Tab => self.puzzle.focus_clue_diff(1),
      KeyCode::BackTab => self.puzzle.focus_clue_diff(-1),
      KeyCode::Char(' ') => self.puzzle.flip_direction(),
      KeyCode::Char('[') => self.puzzle.focus_clue_step(-1),
      KeyCode::Char(']') => self.puzzle.focus_clue_step(1),
      KeyCode::Char(c) if c.is_alphanumeric() => {
        self
          .puzzle
          .edit(index, &c.to_uppercase().to_string(), 1, false)
      }
      KeyCode::Backspace | KeyCode::Delete => self.puzzle.edit(index, "", -1, true),
      KeyCode::Left => self.puzzle.move_focus(Across, -1),
      KeyCode::Right => self.puzzle.move_focus(Across, 1),
      KeyCode::Up => self.puzzle.move_focus(Down, -1),
      KeyCode::Down => self.puzzle.move_focus(Down, 1),
      _ => {}
    }
  }

  fn on_mouse_event(&mut self, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.puzzle.is_complete() {
      return;
    }
    if let Some(index) = self.cell_at(mouse.column, mouse.row) {
      let was_already_focused = index == self.puzzle.focus().cell_index;
      self.puzzle.focus_cell(index, was_already_focused);
    }
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }

  fn clear(&mut self) {
    self.puzzle.clear();
    self.reveal = None;
  }

  fn reveal(&mut self) {
    if let Some(ticket) = self.puzzle.reveal() {
      self.reveal = Some((ticket, Instant::now() + ticket.hold));
    }
  }

  fn toggle_check(&mut self) {
    if self.puzzle.is_checking() {
      self.puzzle.uncheck();
    } else {
      self.puzzle.check();
    }
  }

  fn areas(&self, area: Rect) -> Areas {
    let [title, main, footer] = Layout::vertical([
      Constraint::Length(2),
      Constraint::Fill(1),
      Constraint::Length(1),
    ])
    .areas(area);
    let [puzzle_area, clues] =
      Layout::horizontal([Constraint::Fill(1), Constraint::Length(45)]).areas(main);
    let grid = center(
      puzzle_area,
      Constraint::Length(grid_extent(self.width, SQUARE_STEP_X, SQUARE_WIDTH)),
      Constraint::Length(grid_extent(self.height, SQUARE_STEP_Y, SQUARE_HEIGHT)),
    );
    Areas {
      title,
      grid,
      clues,
      footer,
    }
  }

  /// The cell drawn at a terminal position, if any.
  fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
    let grid = self.areas(self.area).grid;
    if !grid.contains(Position::new(column, row)) {
      return None;
    }
    let (dx, dy) = (column - grid.x, row - grid.y);
    // Clicks in the gaps between squares don't count.
    if dx % SQUARE_STEP_X >= SQUARE_WIDTH || dy % SQUARE_STEP_Y >= SQUARE_HEIGHT {
      return None;
    }
    let pos = ((dx / SQUARE_STEP_X) as usize, (dy / SQUARE_STEP_Y) as usize);
    self.positions.get(&pos).copied()
  }

  // Determines how a particular square should be styled.
  fn square_style(&self, cell: &Cell, word: &BTreeSet<usize>) -> SquareStyle {
    if self.disable_highlight && self.puzzle.is_complete() {
      return SquareStyle::Standard;
    }
    if cell.index == self.puzzle.focus().cell_index {
      SquareStyle::Cursor
    } else if word.contains(&cell.index) {
      SquareStyle::Word
    } else {
      SquareStyle::Standard
    }
  }

  fn render_square(&self, cell: &Cell, style: SquareStyle, square_area: Rect, buf: &mut Buffer) {
    let number = cell.number.map(|n| n.to_string()).unwrap_or_default();
    let mut letter = Style::new().add_modifier(Modifier::BOLD);
    if self.puzzle.is_checking() && cell.is_filled() && !cell.is_correct() {
      letter = letter
        .fg(self.theme.error)
        .add_modifier(Modifier::CROSSED_OUT);
    }
    if self.puzzle.is_revealing() {
      letter = letter.add_modifier(Modifier::ITALIC);
    }
    Paragraph::new(vec![
      Line::from(number).left_aligned(),
      Line::styled(cell.value.clone(), letter).centered(),
    ])
    .style(style.style(&self.theme))
    .render(square_area, buf);
  }

  fn render_grid(&self, grid_area: Rect, buf: &mut Buffer) {
    Block::new()
      .style(Style::new().bg(self.theme.accent))
      .render(grid_area, buf);

    let word = self.puzzle.secondarily_focused_cells();
    // Only the squares that can appear on screen.
    let columns = self.width.min(usize::from(grid_area.width / SQUARE_STEP_X) + 1);
    let rows = self.height.min(usize::from(grid_area.height / SQUARE_STEP_Y) + 1);
    for y in 0..rows {
      for x in 0..columns {
        let (Ok(column), Ok(row)) = (u16::try_from(x), u16::try_from(y)) else {
          continue;
        };
        let square_area = Rect {
          x: grid_area.x.saturating_add(column.saturating_mul(SQUARE_STEP_X)),
          y: grid_area.y.saturating_add(row.saturating_mul(SQUARE_STEP_Y)),
          width: SQUARE_WIDTH,
          height: SQUARE_HEIGHT,
        }
        .intersection(grid_area);
        if square_area.is_empty() {
          continue;
        }
        match self.positions.get(&(x, y)) {
          Some(&index) => {
            let cell = &self.puzzle.cells()[index];
            self.render_square(cell, self.square_style(cell, &word), square_area, buf);
          }
          None => Block::new()
            .style(Style::new().bg(self.theme.main))
            .render(square_area, buf),
        }
      }
    }
  }

  fn render_clues(&self, area: Rect, buf: &mut Buffer) {
    let [current_area, list_area] =
      Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).areas(area);

    let current = self.puzzle.current_clue();
    let current_lines = match current {
      Some(clue) => vec![
        line![span!(Style::new().bold(); "{}", clue.label())],
        Line::from(clue.clue.clone()),
      ],
      None => vec![],
    };
    Paragraph::new(current_lines)
      .wrap(Wrap { trim: true })
      .block(
        Block::bordered()
          .title(Line::from("Current clue").centered())
          .padding(Padding::horizontal(1)),
      )
      .render(current_area, buf);

    let mut lines = vec![];
    for (direction, heading) in [(Across, "Across"), (Down, "Down")] {
      lines.push(line![heading.bold()]);
      for clue in self.puzzle.clues().iter().filter(|c| c.direction == direction) {
        let style = if current.is_some_and(|c| c.index == clue.index) {
          Style::new()
            .bg(self.theme.secondary_highlight)
            .fg(self.theme.main)
        } else if clue.is_filled {
          Style::new().add_modifier(Modifier::DIM)
        } else {
          Style::new()
        };
        lines.push(Line::styled(format!("{:>3} {}", clue.number, clue.clue), style));
      }
      lines.push(Line::default());
    }
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .block(Block::bordered().title(Line::from("Clues").centered()))
      .render(list_area, buf);
  }

  fn footer(&self) -> Line<'static> {
    if self.puzzle.is_complete() && !self.puzzle.is_revealing() {
      return line!["Solved! ".bold().green(), "Esc to quit"];
    }
    let percent = (self.puzzle.percent_correct() * 100.0).round();
    let status = if self.puzzle.is_revealing() {
      "revealing "
    } else if self.puzzle.is_checking() {
      "checking "
    } else {
      ""
    };
    line![
      span!(Style::new().bold(); "{}{}% correct", status, percent),
      "  ^L clear  ^R reveal  ^K check  ^Z undo  ^Y redo  Tab next clue  Esc quit".dim()
    ]
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let areas = self.areas(area);

    line![
      "Ratatui Crossword".bold().blue(),
      ": ".bold(),
      self.title.clone().bold()
    ]
    .centered()
    .render(areas.title, buf);

    self.render_grid(areas.grid, buf);
    self.render_clues(areas.clues, buf);
    self.footer().centered().render(areas.footer, buf);
  }
}

/// Terminal columns (or rows) needed for `squares` squares laid out `step` apart.
fn grid_extent(squares: usize, step: u16, size: u16) -> u16 {
  match squares {
    0 => 0,
    n => u16::try_from(n - 1)
      .ok()
      .and_then(|n| n.checked_mul(step))
      .and_then(|n| n.checked_add(size))
      .unwrap_or(u16::MAX),
  }
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
