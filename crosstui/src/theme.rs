use clap::ValueEnum;
use ratatui::style::Color;

/// The built-in color schemes, selectable with `--theme`.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum ThemeName {
  #[default]
  Classic,
  Dark,
  Citrus,
  Amelia,
}

/// Colors used to draw the puzzle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Theme {
  /// Background of the square under the cursor.
  pub primary_highlight: Color,
  /// Background of the other squares in the current word.
  pub secondary_highlight: Color,
  /// Letters, numbers, and the squares outside the grid.
  pub main: Color,
  /// Background of ordinary squares.
  pub bg: Color,
  /// Borders and finished clues.
  pub accent: Color,
  /// Letters shown as wrong while checking.
  pub error: Color,
}

impl Default for Theme {
  fn default() -> Self {
    Self::classic()
  }
}

impl From<ThemeName> for Theme {
  fn from(name: ThemeName) -> Self {
    match name {
      ThemeName::Classic => Self::classic(),
      ThemeName::Dark => Self::dark(),
      ThemeName::Citrus => Self::citrus(),
      ThemeName::Amelia => Self::amelia(),
    }
  }
}

impl Theme {
  pub fn classic() -> Self {
    Self {
      primary_highlight: Color::Rgb(0xff, 0xda, 0x00),
      secondary_highlight: Color::Rgb(0xa7, 0xd8, 0xff),
      main: Color::Rgb(0x1a, 0x1a, 0x1a),
      bg: Color::Rgb(0xff, 0xff, 0xff),
      accent: Color::Rgb(0xef, 0xef, 0xef),
      error: Color::Rgb(0xd0, 0x30, 0x30),
    }
  }

  pub fn dark() -> Self {
    Self {
      primary_highlight: Color::Rgb(0x00, 0x66, 0x66),
      secondary_highlight: Color::Rgb(0x00, 0x3d, 0x3d),
      main: Color::Rgb(0xef, 0xef, 0xef),
      bg: Color::Rgb(0x1a, 0x1a, 0x1a),
      accent: Color::Rgb(0x3a, 0x3a, 0x3a),
      error: Color::Rgb(0xff, 0x5a, 0x5a),
    }
  }

  /// Unset colors fall back to [classic](Self::classic).
  pub fn citrus() -> Self {
    Self {
      primary_highlight: Color::Rgb(0xff, 0x95, 0x7d),
      secondary_highlight: Color::Rgb(0xff, 0xdf, 0xd5),
      main: Color::Rgb(0x18, 0x44, 0x44),
      accent: Color::Rgb(0xeb, 0xf3, 0xf3),
      ..Self::classic()
    }
  }

  pub fn amelia() -> Self {
    Self {
      primary_highlight: Color::Rgb(0xd7, 0xce, 0xfd),
      secondary_highlight: Color::Rgb(0x99, 0x80, 0xfa),
      main: Color::Rgb(0x35, 0x3b, 0x48),
      ..Self::classic()
    }
  }
}
