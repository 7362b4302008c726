use crate::config::GridConfig;

/// Raster size the grid is laid over and the grid derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetGeometry {
    /// Source raster size before any downscale.
    pub source_width: u32,
    pub source_height: u32,
    /// Raster size after the column cap has been applied.
    pub width: u32,
    pub height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl TargetGeometry {
    /// Derive the effective raster size and grid for a `source_width`x`source_height` image.
    ///
    /// When the raw column count exceeds `max_columns` both axes shrink by
    /// `max_columns / raw_columns`. Integer floor division keeps the resulting column count at
    /// exactly `max_columns`.
    pub fn derive(source_width: u32, source_height: u32, config: &GridConfig) -> Self {
        let raw_columns = source_width / config.cell_width;

        let (width, height) = if raw_columns > config.max_columns {
            let scale = |value: u32| {
                let scaled = u64::from(value) * u64::from(config.max_columns) / u64::from(raw_columns);
                (scaled as u32).max(1)
            };
            (scale(source_width), scale(source_height))
        } else {
            (source_width, source_height)
        };

        Self {
            source_width,
            source_height,
            width,
            height,
            columns: width / config.cell_width,
            rows: height / config.cell_height,
        }
    }

    pub fn is_downscaled(&self) -> bool {
        self.width != self.source_width || self.height != self.source_height
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}
