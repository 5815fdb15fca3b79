use crate::config::ScreenConfig;

/// The glyph every cell is reset to at the start of a frame.
pub const BLANK: char = ' ';

/// The glyph forced into the last cell of every finished frame.
pub const TERMINATOR: char = '\0';

/// A fixed-size, row-major grid of glyphs.
///
/// Allocated once; every frame overwrites it in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl ScreenBuffer {
    pub fn new(config: &ScreenConfig) -> Self {
        Self { width: config.width(), height: config.height(), cells: vec![BLANK; config.cells()] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell to `glyph`.
    pub fn fill(&mut self, glyph: char) {
        self.cells.fill(glyph);
    }

    pub fn get(&self, row: usize, column: usize) -> Option<char> {
        self.index(row, column).map(|index| self.cells[index])
    }

    /// Write `glyph` at `(row, column)`. Returns `false` and writes nothing when the cell is
    /// outside the grid.
    pub fn set(&mut self, row: usize, column: usize, glyph: char) -> bool {
        match self.index(row, column) {
            Some(index) => {
                self.cells[index] = glyph;
                true
            }
            None => false,
        }
    }

    /// Overlay `text` on `row` starting at the first column, truncated to the grid width.
    pub fn write_line(&mut self, row: usize, text: &str) {
        for (column, glyph) in text.chars().take(self.width).enumerate() {
            self.set(row, column, glyph);
        }
    }

    /// Force the last cell to [`TERMINATOR`].
    pub fn terminate(&mut self) {
        if let Some(last) = self.cells.last_mut() {
            *last = TERMINATOR;
        }
    }

    /// Iterate over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width)
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.height && column < self.width).then(|| row * self.width + column)
    }
}
