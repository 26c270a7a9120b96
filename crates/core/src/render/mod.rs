use std::io::Write;

use crate::{Element, Palette, Result, RunStatistics, SortAlgorithm, SortState};

/// Read-only view of the collection handed to a presenter once per frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub elements: &'a [Element],
    pub stats: RunStatistics,
    pub algorithm: Option<SortAlgorithm>,
    pub state: SortState,
    pub delay_ms: u64,
    pub complexity: &'static str,
    pub palette: &'a Palette,
}

/// Rendering backend abstraction. Presenters only ever see immutable frames.
pub trait Presenter {
    fn present(&mut self, frame: &FrameView<'_>) -> Result<()>;
}

const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Presenter that writes one line of bar glyphs per frame. Sticks in the
/// processing color are drawn as `!` and candidates as `?`. Every other stick
/// is a block glyph scaled to its value.
#[derive(Debug)]
pub struct TextPresenter<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn glyph(element: &Element, count: usize, palette: &Palette) -> char {
        if element.visual_state == palette.processing {
            return '!';
        }
        if element.visual_state == palette.candidate {
            return '?';
        }
        let level = (element.value() as usize * BAR_GLYPHS.len()).div_ceil(count.max(1));
        BAR_GLYPHS[level.clamp(1, BAR_GLYPHS.len()) - 1]
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, frame: &FrameView<'_>) -> Result<()> {
        let count = frame.elements.len();
        let bars: String = frame
            .elements
            .iter()
            .map(|element| Self::glyph(element, count, frame.palette))
            .collect();
        let algorithm = frame
            .algorithm
            .map(|algorithm| algorithm.name())
            .unwrap_or("-");

        writeln!(
            self.out,
            "{bars} | {algorithm} {complexity} | comparisons {comparisons} | accesses {accesses} | delay {delay}ms | {state:?}",
            complexity = frame.complexity,
            comparisons = frame.stats.comparisons,
            accesses = frame.stats.array_accesses,
            delay = frame.delay_ms,
            state = frame.state,
        )?;
        self.frames += 1;
        Ok(())
    }
}
