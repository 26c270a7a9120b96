use std::ops::RangeInclusive;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{CollectionConfig, Color, Element, Geometry, Palette};

/// Counters shown next to the animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub comparisons: u64,
    pub array_accesses: u64,
    /// Slot exchanges performed by the running algorithm.
    pub swaps: u64,
}

/// Geometry parameters for laying sticks out on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport_width: f32,
    pub baseline_y: f32,
    pub spacing_pct: f32,
    pub max_height: f32,
}

impl Layout {
    /// Returns `(stick_width, gap)` for a sequence of `count` sticks. Gaps sit
    /// on both outer edges as well as between neighbours.
    pub fn stick_metrics(&self, count: usize) -> (f32, f32) {
        let count = count.max(1) as f32;
        let total_stick_width = self.viewport_width * (1.0 - self.spacing_pct);
        let width = total_stick_width / count;
        let gap = (self.viewport_width - total_stick_width) / (count + 1.0);
        (width, gap)
    }

    /// Bar height for a value in `1..=count`.
    pub fn stick_height(&self, value: u32, count: usize) -> f32 {
        value as f32 / count.max(1) as f32 * self.max_height
    }
}

impl From<&CollectionConfig> for Layout {
    fn from(config: &CollectionConfig) -> Self {
        Self {
            viewport_width: config.viewport_width,
            baseline_y: config.baseline_y,
            spacing_pct: config.spacing_pct,
            max_height: config.max_height,
        }
    }
}

/// The ordered sequence of sticks plus the statistics of the current run.
#[derive(Debug, Clone)]
pub struct Collection {
    elements: Vec<Element>,
    stats: RunStatistics,
    layout: Layout,
    palette: Palette,
}

impl Collection {
    /// Allocates `count` sticks with ascending values `1..=count`, so a
    /// freshly initialized collection is sorted.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero. Callers validate the configuration first.
    pub fn initialize(count: usize, layout: Layout, palette: Palette) -> Self {
        assert!(count > 0, "a stick collection needs at least one element");
        let values: Vec<u32> = (1..=count as u32).collect();
        Self::from_values(&values, layout, palette)
    }

    /// Builds a collection in exactly the given order. Values should be a
    /// permutation of `1..=values.len()` for bar heights to make sense.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn from_values(values: &[u32], layout: Layout, palette: Palette) -> Self {
        assert!(!values.is_empty(), "a stick collection needs at least one element");
        let count = values.len();
        let elements = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let mut element = Element::new(index, value, palette.neutral);
                element.geometry.height = layout.stick_height(value, count);
                element
            })
            .collect();

        let mut collection = Self {
            elements,
            stats: RunStatistics::default(),
            layout,
            palette,
        };
        collection.recompute_positions();
        collection
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn values(&self) -> Vec<u32> {
        self.elements.iter().map(Element::value).collect()
    }

    pub fn value(&self, index: usize) -> u32 {
        self.elements[index].value()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn stats(&self) -> RunStatistics {
        self.stats
    }

    /// Applies a uniformly random permutation and lays the sticks out again.
    /// Must only be called while no sort session is writing to the sequence.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.elements.shuffle(rng);
        self.recompute_positions();
        tracing::debug!(order = ?self.values(), "shuffled sticks");
    }

    /// Assigns screen coordinates from the current order. Pure function of
    /// slot index, sequence length, stick size and spacing.
    pub fn recompute_positions(&mut self) {
        let (width, gap) = self.layout.stick_metrics(self.elements.len());
        let baseline = self.layout.baseline_y;
        for (index, element) in self.elements.iter_mut().enumerate() {
            let height = element.geometry.height;
            element.geometry = Geometry {
                x: gap + index as f32 * (width + gap),
                y: baseline - height,
                width,
                height,
            };
        }
    }

    /// True when values are non-decreasing across the whole sequence.
    pub fn is_sorted(&self) -> bool {
        self.elements
            .windows(2)
            .all(|pair| pair[0].value() <= pair[1].value())
    }

    pub fn reset_statistics(&mut self) {
        self.stats = RunStatistics::default();
    }

    pub fn reset_colors(&mut self) {
        let neutral = self.palette.neutral;
        self.set_all_colors(neutral);
    }

    pub fn set_all_colors(&mut self, color: Color) {
        for element in &mut self.elements {
            element.visual_state = color;
        }
    }

    pub fn set_color(&mut self, index: usize, color: Color) {
        self.elements[index].visual_state = color;
    }

    /// Exchanges two slots, counting one swap and two slot writes. A
    /// self-swap is still counted.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
        self.stats.swaps += 1;
        self.stats.array_accesses += 2;
    }

    pub(crate) fn record(&mut self, comparisons: u64, array_accesses: u64) {
        self.stats.comparisons += comparisons;
        self.stats.array_accesses += array_accesses;
    }

    /// Current slot of the stick created at `index_hint`, searching `range`.
    pub(crate) fn position_of(
        &self,
        index_hint: usize,
        range: RangeInclusive<usize>,
    ) -> Option<usize> {
        let start = *range.start();
        self.elements[range]
            .iter()
            .position(|element| element.index_hint() == index_hint)
            .map(|offset| start + offset)
    }
}
