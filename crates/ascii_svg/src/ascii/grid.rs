/// Per-cell statistics gathered while scanning; never stored past the scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub column: u32,
    pub row: u32,
    /// Pixel-space origin (top-left corner).
    pub x: u32,
    pub y: u32,
    /// Average luminance over every pixel of the cell, 0-255.
    pub luminance: f32,
    /// Covered pixels divided by the cell's pixel count.
    pub coverage: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    /// Left edge of the source cell.
    pub x: u32,
    /// Bottom edge of the source cell, used as the text baseline.
    pub y: u32,
    pub column: u32,
    pub row: u32,
    pub luminance: f32,
}

/// Canonical conversion result: placed glyphs in row-major scan order.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphGrid {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub glyphs: Vec<Glyph>,
}

impl GlyphGrid {
    pub fn new(columns: u32, rows: u32, cell_width: u32, cell_height: u32, glyphs: Vec<Glyph>) -> Self {
        debug_assert!(glyphs.len() <= columns as usize * rows as usize);
        Self { columns, rows, cell_width, cell_height, glyphs }
    }

    pub fn canvas_width(&self) -> u32 {
        self.columns * self.cell_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.rows * self.cell_height
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Same grid with the glyph characters replaced and positions untouched.
    pub fn with_chars<I>(&self, chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let glyphs =
            self.glyphs.iter().zip(chars).map(|(glyph, ch)| Glyph { ch, ..*glyph }).collect();
        Self {
            columns: self.columns,
            rows: self.rows,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            glyphs,
        }
    }

    /// Text lines of the grid, a space wherever no glyph was placed.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        let width = self.columns as usize;
        let mut cells = vec![' '; self.cell_count()];
        for glyph in &self.glyphs {
            if glyph.column < self.columns && glyph.row < self.rows {
                cells[glyph.row as usize * width + glyph.column as usize] = glyph.ch;
            }
        }

        let lines: Vec<String> = if width == 0 {
            Vec::new()
        } else {
            cells.chunks(width).map(|row| row.iter().collect()).collect()
        };
        lines.into_iter()
    }

    pub fn to_text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }
}
