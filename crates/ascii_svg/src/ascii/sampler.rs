use log::debug;

use super::grid::{Cell, GlyphGrid};
use super::mapping::GlyphMapper;
use crate::config::GridConfig;
use crate::image_pipeline::adjust::{luminance, suppress_background};
use crate::image_pipeline::background::BackgroundEstimate;
use crate::image_pipeline::loader::{PixelBuffer, PixelSource};
use crate::image_pipeline::resize::TargetGeometry;
use crate::AsciiSvgError;

const COVERED_ALPHA: u8 = 128;

/// Everything one grid scan produced.
#[derive(Clone, Debug)]
pub struct Sampling {
    pub grid: GlyphGrid,
    pub geometry: TargetGeometry,
    pub background: BackgroundEstimate,
}

/// Walks an image cell by cell and turns covered cells into glyphs.
pub struct GridSampler<'a> {
    config: &'a GridConfig,
    mapper: &'a GlyphMapper,
}

impl<'a> GridSampler<'a> {
    pub fn new(config: &'a GridConfig, mapper: &'a GlyphMapper) -> Result<Self, AsciiSvgError> {
        config.validate()?;
        Ok(Self { config, mapper })
    }

    /// Copy, downscale, estimate the background, suppress it if requested, then scan.
    pub fn sample<S>(&self, source: &S) -> Sampling
    where
        S: PixelSource + ?Sized,
    {
        let (width, height) = source.dimensions();
        let geometry = TargetGeometry::derive(width, height, self.config);
        if geometry.is_downscaled() {
            debug!(
                "downscaling {}x{} to {}x{} to fit {} columns",
                width, height, geometry.width, geometry.height, self.config.max_columns
            );
        }

        let mut buffer = source.to_buffer().resized(geometry.width, geometry.height);
        let background = BackgroundEstimate::from_buffer(&buffer, self.config);

        if let Some(color) = background.color {
            let suppressed = suppress_background(
                &mut buffer,
                color,
                self.config.background_distance_threshold,
            );
            debug!("suppressed {suppressed} background pixels");
        }

        let grid = self.scan(&buffer, &background);
        debug!(
            "sampled {}x{} grid into {} glyphs",
            grid.columns,
            grid.rows,
            grid.glyphs.len()
        );

        Sampling { grid, geometry, background }
    }

    /// Scan a prepared buffer in row-major order.
    pub fn scan(&self, buffer: &PixelBuffer, background: &BackgroundEstimate) -> GlyphGrid {
        let GridConfig { cell_width, cell_height, .. } = *self.config;
        let columns = buffer.width() / cell_width;
        let rows = buffer.height() / cell_height;

        let mut glyphs = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let cell = self.scan_cell(buffer, column, row, background.brightness);
                // A cell with nothing covered never emits, even at a zero threshold.
                if cell.coverage == 0.0 || cell.coverage < self.config.coverage_threshold {
                    continue;
                }
                if let Some(glyph) = self.mapper.map_cell(&cell, cell_height) {
                    glyphs.push(glyph);
                }
            }
        }

        GlyphGrid::new(columns, rows, cell_width, cell_height, glyphs)
    }

    /// Luminance and coverage for one cell. Pixels past the raster edge are skipped.
    pub fn scan_cell(&self, buffer: &PixelBuffer, column: u32, row: u32, brightness: f32) -> Cell {
        let x0 = column.saturating_mul(self.config.cell_width);
        let y0 = row.saturating_mul(self.config.cell_height);
        let x1 = x0.saturating_add(self.config.cell_width).min(buffer.width());
        let y1 = y0.saturating_add(self.config.cell_height).min(buffer.height());

        let mut total = 0.0f64;
        let mut pixels = 0u32;
        let mut covered = 0u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let Some([r, g, b, a]) = buffer.get(x, y) else {
                    continue;
                };

                let lum = luminance(r, g, b);
                total += f64::from(lum);
                pixels += 1;

                if a > COVERED_ALPHA
                    && (lum - brightness).abs() > self.config.brightness_delta_threshold
                {
                    covered += 1;
                }
            }
        }

        let (average, coverage) = if pixels == 0 {
            (0.0, 0.0)
        } else {
            ((total / f64::from(pixels)) as f32, covered as f32 / pixels as f32)
        };

        Cell { column, row, x: x0, y: y0, luminance: average, coverage }
    }
}
