use std::time::Duration;

use super::grid::GlyphGrid;

#[derive(Clone, Debug)]
pub struct GlyphFrame {
    pub grid: GlyphGrid,
    pub duration: Duration,
}

/// Looping sequence of frames sharing one canvas.
#[derive(Clone, Debug, Default)]
pub struct FrameSeries {
    frames: Vec<GlyphFrame>,
    total_duration: Duration,
}

impl FrameSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[GlyphFrame] {
        &self.frames
    }

    /// Canvas size shared by every frame.
    pub fn canvas(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|frame| (frame.grid.canvas_width(), frame.grid.canvas_height()))
    }

    pub fn push_frame(&mut self, frame: GlyphFrame) {
        if let Some((width, height)) = self.canvas() {
            debug_assert_eq!(width, frame.grid.canvas_width());
            debug_assert_eq!(height, frame.grid.canvas_height());
        }

        self.total_duration += frame.duration;
        self.frames.push(frame);
    }

    /// Length of one loop.
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Every frame paired with its start offset into the loop.
    pub fn schedule(&self) -> impl Iterator<Item = (Duration, &GlyphFrame)> + '_ {
        self.frames.iter().scan(Duration::ZERO, |elapsed, frame| {
            let start = *elapsed;
            *elapsed += frame.duration;
            Some((start, frame))
        })
    }

    pub fn frame(&self, index: usize) -> Option<&GlyphGrid> {
        self.frames.get(index).map(|frame| &frame.grid)
    }
}
