use super::{SortEngine, Step};

impl SortEngine {
    pub(super) fn quick_sort_all(&self) -> Step {
        let len = self.len()?;
        self.quick_sort(0, len - 1)
    }

    fn quick_sort(&self, low: usize, high: usize) -> Step {
        if low >= high {
            if low == high {
                self.with(|c| c.set_color(low, self.palette.placed))?;
            }
            return Ok(());
        }

        let pivot = self.partition(low, high)?;
        if pivot > low {
            self.quick_sort(low, pivot - 1)?;
        }
        self.quick_sort(pivot + 1, high)
    }

    /// Lomuto partition around the last stick of the range. Returns the
    /// pivot's final slot.
    pub(super) fn partition(&self, low: usize, high: usize) -> Step<usize> {
        let palette = self.palette;
        self.checkpoint()?;
        let pivot = self.with(|c| {
            c.record(0, 1);
            c.set_color(high, palette.candidate);
            c.value(high)
        })?;

        let mut boundary = low;
        for j in low..high {
            self.checkpoint()?;
            self.with(|c| {
                c.record(1, 1);
                c.set_color(j, palette.processing);
            })?;
            self.cue();

            let moved = self.with(|c| {
                let low_side = c.value(j) <= pivot;
                if low_side {
                    c.swap(boundary, j);
                    c.recompute_positions();
                }
                low_side
            })?;
            self.pause();

            self.with(|c| {
                c.set_color(j, palette.neutral);
                if moved {
                    c.set_color(boundary, palette.selected);
                }
            })?;
            if moved {
                boundary += 1;
            }
        }

        self.with(|c| {
            c.swap(boundary, high);
            c.recompute_positions();
            for slot in low..=high {
                c.set_color(slot, palette.neutral);
            }
            c.set_color(boundary, palette.placed);
        })?;
        self.pause();
        Ok(boundary)
    }
}
