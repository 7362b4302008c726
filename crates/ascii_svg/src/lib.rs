//! Raster image to positioned-glyph SVG conversion.
//!
//! An image is partitioned into fixed-size cells, each cell's coverage against an estimated
//! background decides whether it produces a glyph, and the cell's average luminance picks the
//! glyph from a density ramp. The resulting glyph list serializes to SVG and can be scrambled
//! into a short looping animation.

mod ascii;
mod config;
mod image_pipeline;

use std::path::Path;

use log::{debug, warn};
use rand::Rng;

pub use ascii::{
    animation::{AnimationSynthesizer, CHANGE_PROBABILITY},
    gradient::{Ramp, DETAILED_RAMP},
    grid::{Cell, Glyph, GlyphGrid},
    mapping::{GlyphMapper, DARK_IS_DENSE},
    markup::{escape_xml, render_animated_svg, render_svg, FONT_FAMILY},
    sampler::{GridSampler, Sampling},
    series::{FrameSeries, GlyphFrame},
};
pub use config::{derived_cell_height, AnimationOptions, GridConfig, MarkupStyle};
pub use image_pipeline::{
    adjust::{luminance, suppress_background},
    background::{BackgroundEstimate, Rgb, FALLBACK_BRIGHTNESS},
    loader::{PixelBuffer, PixelSource},
    resize::TargetGeometry,
};

#[derive(Debug, thiserror::Error)]
pub enum AsciiSvgError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("pixel buffer of {actual} bytes does not match {width}x{height} RGBA ({expected} bytes)")]
    BufferSize { width: u32, height: u32, expected: usize, actual: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("ramp must contain at least two characters, got {0}")]
    RampTooShort(usize),
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub grid: GlyphGrid,
    pub geometry: TargetGeometry,
    pub background: BackgroundEstimate,
}

impl RenderOutput {
    pub fn to_svg(&self, style: &MarkupStyle) -> String {
        render_svg(&self.grid, style)
    }
}

/// Frames derived from one conversion together with the style they render with.
#[derive(Clone, Debug)]
pub struct Animation {
    pub series: FrameSeries,
    pub style: MarkupStyle,
}

impl Animation {
    /// One standalone SVG document per frame, in playback order.
    pub fn frame_documents(&self) -> Vec<String> {
        self.series.frames().iter().map(|frame| render_svg(&frame.grid, &self.style)).collect()
    }

    pub fn to_animated_svg(&self) -> String {
        render_animated_svg(&self.series, &self.style)
    }
}

/// Conversion facade holding one validated configuration.
#[derive(Clone, Debug)]
pub struct AsciiSvgRenderer {
    config: GridConfig,
    style: MarkupStyle,
    mapper: GlyphMapper,
}

impl Default for AsciiSvgRenderer {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            style: MarkupStyle::default(),
            mapper: GlyphMapper::new(Ramp::detailed()),
        }
    }
}

impl AsciiSvgRenderer {
    pub fn new(config: GridConfig, style: MarkupStyle, ramp: Ramp) -> Result<Self, AsciiSvgError> {
        config.validate()?;
        style.validate()?;
        Ok(Self { config, style, mapper: GlyphMapper::new(ramp) })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn style(&self) -> &MarkupStyle {
        &self.style
    }

    pub fn ramp(&self) -> &Ramp {
        self.mapper.ramp()
    }

    pub fn render_path<P: AsRef<Path>>(&self, path: P) -> Result<RenderOutput, AsciiSvgError> {
        let image = image::open(path)?;
        self.render(&image)
    }

    pub fn render<S>(&self, source: &S) -> Result<RenderOutput, AsciiSvgError>
    where
        S: PixelSource + ?Sized,
    {
        let sampler = GridSampler::new(&self.config, &self.mapper)?;
        let Sampling { grid, geometry, background } = sampler.sample(source);

        if grid.glyphs.is_empty() && grid.cell_count() > 0 {
            warn!(
                "conversion produced no glyphs across {} cells; image may be flat or fully \
                 suppressed",
                grid.cell_count()
            );
        }

        Ok(RenderOutput { grid, geometry, background })
    }

    /// Render straight to an SVG document using the renderer's style.
    pub fn render_svg<S>(&self, source: &S) -> Result<String, AsciiSvgError>
    where
        S: PixelSource + ?Sized,
    {
        Ok(self.render(source)?.to_svg(&self.style))
    }

    pub fn animate<R>(
        &self,
        output: &RenderOutput,
        options: &AnimationOptions,
        rng: &mut R,
    ) -> Result<Animation, AsciiSvgError>
    where
        R: Rng + ?Sized,
    {
        let synthesizer = AnimationSynthesizer::new(self.mapper.ramp(), options)?;
        let series = synthesizer.synthesize(&output.grid, rng);
        let style = options.resolve_style(&self.style);
        style.validate()?;
        debug!("synthesized {} frames of {} glyphs", series.len(), output.grid.glyphs.len());
        Ok(Animation { series, style })
    }

    /// Same as [`AsciiSvgRenderer::animate`] using the thread-local generator.
    pub fn animate_with_thread_rng(
        &self,
        output: &RenderOutput,
        options: &AnimationOptions,
    ) -> Result<Animation, AsciiSvgError> {
        self.animate(output, options, &mut rand::thread_rng())
    }
}
