use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ascii::animation::CHANGE_PROBABILITY;
use crate::AsciiSvgError;

pub const DEFAULT_CELL_WIDTH: u32 = 6;
pub const DEFAULT_CELL_HEIGHT: u32 = 9;
pub const DEFAULT_MAX_COLUMNS: u32 = 120;
pub const DEFAULT_FONT_SIZE: f32 = 8.0;
pub const DEFAULT_COLOR: &str = "#d4d4d4";
pub const DEFAULT_FRAME_COUNT: usize = 8;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 120;

/// Cell height matching a cell width, `round(cell_width * 1.5)`.
pub fn derived_cell_height(cell_width: u32) -> u32 {
    (f64::from(cell_width) * 1.5).round() as u32
}

/// Grid sampling parameters, fixed for one conversion.
///
/// When deserialized without a `cell_height`, the height is derived from `cell_width`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartialGridConfig")]
pub struct GridConfig {
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
    /// Upper bound on grid columns; wider images are downscaled first.
    pub max_columns: u32,
    /// Minimum fraction of covered pixels for a cell to emit a glyph.
    pub coverage_threshold: f32,
    /// Make pixels close to the border color transparent before scanning.
    pub remove_background: bool,
    /// Euclidean RGB distance under which a pixel counts as background.
    pub background_distance_threshold: f32,
    /// Luminance difference from the background needed to count a pixel as covered.
    pub brightness_delta_threshold: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            max_columns: DEFAULT_MAX_COLUMNS,
            coverage_threshold: 0.3,
            remove_background: false,
            background_distance_threshold: 50.0,
            brightness_delta_threshold: 30.0,
        }
    }
}

/// Serialized form of [`GridConfig`]; every field is optional.
#[derive(Deserialize)]
#[serde(default)]
struct PartialGridConfig {
    cell_width: u32,
    cell_height: Option<u32>,
    max_columns: u32,
    coverage_threshold: f32,
    remove_background: bool,
    background_distance_threshold: f32,
    brightness_delta_threshold: f32,
}

impl Default for PartialGridConfig {
    fn default() -> Self {
        let GridConfig {
            cell_width,
            max_columns,
            coverage_threshold,
            remove_background,
            background_distance_threshold,
            brightness_delta_threshold,
            ..
        } = GridConfig::default();

        Self {
            cell_width,
            cell_height: None,
            max_columns,
            coverage_threshold,
            remove_background,
            background_distance_threshold,
            brightness_delta_threshold,
        }
    }
}

impl From<PartialGridConfig> for GridConfig {
    fn from(partial: PartialGridConfig) -> Self {
        Self {
            cell_width: partial.cell_width,
            cell_height: partial
                .cell_height
                .unwrap_or_else(|| derived_cell_height(partial.cell_width)),
            max_columns: partial.max_columns,
            coverage_threshold: partial.coverage_threshold,
            remove_background: partial.remove_background,
            background_distance_threshold: partial.background_distance_threshold,
            brightness_delta_threshold: partial.brightness_delta_threshold,
        }
    }
}

impl GridConfig {
    /// Default config with the cell height derived from `cell_width`.
    pub fn with_cell_width(cell_width: u32) -> Self {
        Self { cell_width, cell_height: derived_cell_height(cell_width), ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), AsciiSvgError> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(AsciiSvgError::InvalidConfig(format!(
                "cell dimensions must be positive, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }

        if self.max_columns == 0 {
            return Err(AsciiSvgError::InvalidConfig("max_columns must be positive".into()));
        }

        if !(0.0..=1.0).contains(&self.coverage_threshold) {
            return Err(AsciiSvgError::InvalidConfig(format!(
                "coverage_threshold must lie in [0, 1], got {}",
                self.coverage_threshold
            )));
        }

        non_negative("background_distance_threshold", self.background_distance_threshold)?;
        non_negative("brightness_delta_threshold", self.brightness_delta_threshold)
    }
}

/// Presentation of the emitted glyphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupStyle {
    pub font_size: f32,
    /// Fill applied to every glyph, any CSS color.
    pub color: String,
}

impl Default for MarkupStyle {
    fn default() -> Self {
        Self { font_size: DEFAULT_FONT_SIZE, color: DEFAULT_COLOR.to_owned() }
    }
}

impl MarkupStyle {
    pub fn validate(&self) -> Result<(), AsciiSvgError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(AsciiSvgError::InvalidConfig(format!(
                "font_size must be a positive number, got {}",
                self.font_size
            )));
        }

        if self.color.trim().is_empty() {
            return Err(AsciiSvgError::InvalidConfig("color must not be empty".into()));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Total frames including the unmodified base frame.
    pub frame_count: usize,
    pub font_size: Option<f32>,
    pub color: Option<String>,
    pub frame_interval_ms: u64,
    /// Chance that a single glyph is nudged along the ramp in a derived frame.
    pub change_probability: f64,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            font_size: None,
            color: None,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            change_probability: CHANGE_PROBABILITY,
        }
    }
}

impl AnimationOptions {
    pub fn validate(&self) -> Result<(), AsciiSvgError> {
        if self.frame_count == 0 {
            return Err(AsciiSvgError::InvalidConfig("frame_count must be at least 1".into()));
        }

        if !(0.0..=1.0).contains(&self.change_probability) {
            return Err(AsciiSvgError::InvalidConfig(format!(
                "change_probability must lie in [0, 1], got {}",
                self.change_probability
            )));
        }

        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Apply the font size and color overrides on top of `base`.
    pub fn resolve_style(&self, base: &MarkupStyle) -> MarkupStyle {
        MarkupStyle {
            font_size: self.font_size.unwrap_or(base.font_size),
            color: self.color.clone().unwrap_or_else(|| base.color.clone()),
        }
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), AsciiSvgError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AsciiSvgError::InvalidConfig(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GridConfig::default();
        assert_eq!((config.cell_width, config.cell_height), (6, 9));
        assert_eq!(config.max_columns, 120);
        assert_eq!(config.coverage_threshold, 0.3);
        assert!(!config.remove_background);

        let style = MarkupStyle::default();
        assert_eq!(style.font_size, 8.0);
        assert_eq!(style.color, "#d4d4d4");

        assert_eq!(AnimationOptions::default().frame_count, 8);
    }

    #[test]
    fn cell_height_follows_width() {
        assert_eq!(GridConfig::with_cell_width(6).cell_height, 9);
        assert_eq!(GridConfig::with_cell_width(5).cell_height, 8);
        assert_eq!(GridConfig::with_cell_width(10).cell_height, 15);
    }

    #[test]
    fn rejects_zero_cells() {
        let config = GridConfig { cell_width: 0, ..GridConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cell dimensions"));

        let config = GridConfig { cell_height: 0, ..GridConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_thresholds() {
        let config = GridConfig { coverage_threshold: f32::NAN, ..GridConfig::default() };
        assert!(config.validate().is_err());

        let config = GridConfig { brightness_delta_threshold: f32::NAN, ..GridConfig::default() };
        assert!(config.validate().is_err());

        let config = GridConfig { background_distance_threshold: -1.0, ..GridConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn style_overrides_apply() {
        let options = AnimationOptions { color: Some("red".into()), ..AnimationOptions::default() };
        let style = options.resolve_style(&MarkupStyle::default());
        assert_eq!(style.color, "red");
        assert_eq!(style.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn partial_config_deserializes_over_defaults() {
        let config: GridConfig = toml::from_str("cell_width = 4\nremove_background = true").unwrap();
        assert_eq!(config.cell_width, 4);
        assert_eq!(config.cell_height, 6);
        assert!(config.remove_background);
        assert_eq!(config.max_columns, DEFAULT_MAX_COLUMNS);

        let config: GridConfig = toml::from_str("").unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn explicit_cell_height_is_kept() {
        let config: GridConfig = toml::from_str("cell_width = 4\ncell_height = 20").unwrap();
        assert_eq!((config.cell_width, config.cell_height), (4, 20));

        let config: GridConfig = toml::from_str("cell_height = 12").unwrap();
        assert_eq!((config.cell_width, config.cell_height), (DEFAULT_CELL_WIDTH, 12));
    }

    #[test]
    fn serialized_config_reads_back_unchanged() {
        let config = GridConfig { cell_width: 3, cell_height: 11, ..GridConfig::default() };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<GridConfig>(&text).unwrap(), config);
    }
}
