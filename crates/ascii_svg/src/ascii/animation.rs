use rand::Rng;

use super::gradient::Ramp;
use super::grid::GlyphGrid;
use super::series::{FrameSeries, GlyphFrame};
use crate::config::AnimationOptions;
use crate::AsciiSvgError;

/// Default chance that a glyph is nudged in a derived frame.
pub const CHANGE_PROBABILITY: f64 = 0.15;

/// Derives scrambled frames from a base grid without moving any glyph.
pub struct AnimationSynthesizer<'a> {
    ramp: &'a Ramp,
    options: &'a AnimationOptions,
}

impl<'a> AnimationSynthesizer<'a> {
    pub fn new(ramp: &'a Ramp, options: &'a AnimationOptions) -> Result<Self, AsciiSvgError> {
        options.validate()?;
        Ok(Self { ramp, options })
    }

    /// Frame 0 is `base` unchanged; every later frame is perturbed from `base` independently.
    pub fn synthesize<R>(&self, base: &GlyphGrid, rng: &mut R) -> FrameSeries
    where
        R: Rng + ?Sized,
    {
        let duration = self.options.frame_interval();
        let mut series = FrameSeries::new();
        series.push_frame(GlyphFrame { grid: base.clone(), duration });

        for _ in 1..self.options.frame_count {
            series.push_frame(GlyphFrame { grid: self.perturb(base, rng), duration });
        }

        series
    }

    pub fn perturb<R>(&self, base: &GlyphGrid, rng: &mut R) -> GlyphGrid
    where
        R: Rng + ?Sized,
    {
        let chars: Vec<char> = base
            .glyphs
            .iter()
            .map(|glyph| {
                if rng.gen_bool(self.options.change_probability) {
                    self.nudge(glyph.ch, rng)
                } else {
                    glyph.ch
                }
            })
            .collect();
        base.with_chars(chars)
    }

    /// Move `ch` at most one ramp step. Characters outside the ramp and steps onto the blank
    /// leave the glyph as it was.
    fn nudge<R>(&self, ch: char, rng: &mut R) -> char
    where
        R: Rng + ?Sized,
    {
        let Some(index) = self.ramp.position(ch) else {
            return ch;
        };

        let offset: i64 = rng.gen_range(-1..=1);
        let next = (index as i64 + offset).clamp(0, self.ramp.max_index() as i64) as usize;
        let candidate = self.ramp.char_at(next);

        if self.ramp.is_blank(candidate) {
            ch
        } else {
            candidate
        }
    }
}
