use super::gradient::Ramp;
use super::grid::{Cell, Glyph};

/// Luminance orientation of the ramp lookup.
///
/// `true` sends dark cells to the dense head of the ramp and bright cells to the blank tail:
/// `index = floor(L / 255 * (len - 1))`. Flipping it inverts the lookup to
/// `floor((255 - L) / 255 * (len - 1))`.
pub const DARK_IS_DENSE: bool = true;

#[derive(Clone, Debug)]
pub struct GlyphMapper {
    ramp: Ramp,
}

impl GlyphMapper {
    pub fn new(ramp: Ramp) -> Self {
        Self { ramp }
    }

    pub fn ramp(&self) -> &Ramp {
        &self.ramp
    }

    /// Ramp index for a luminance value, always within `[0, len - 1]`.
    pub fn index_for(&self, luminance: f32) -> usize {
        // NaN sorts to black rather than poisoning the index.
        let luminance = if luminance.is_nan() { 0.0 } else { luminance.clamp(0.0, 255.0) };
        let level = if DARK_IS_DENSE { luminance / 255.0 } else { (255.0 - luminance) / 255.0 };
        let max_index = self.ramp.max_index();
        ((level * max_index as f32).floor() as usize).min(max_index)
    }

    pub fn map(&self, luminance: f32) -> char {
        self.ramp.char_at(self.index_for(luminance))
    }

    /// Glyph for a covered cell, `None` when the cell maps to the blank character.
    pub fn map_cell(&self, cell: &Cell, cell_height: u32) -> Option<Glyph> {
        let ch = self.map(cell.luminance);
        if self.ramp.is_blank(ch) {
            return None;
        }

        Some(Glyph {
            ch,
            x: cell.x,
            y: cell.y + cell_height,
            column: cell.column,
            row: cell.row,
            luminance: cell.luminance,
        })
    }
}
