use super::{SortEngine, Step};

impl SortEngine {
    /// Adjacent-pair passes over a shrinking window. The last stick of each
    /// pass is final; a pass without swaps ends the sort.
    pub(super) fn bubble_sort(&self) -> Step {
        let palette = self.palette;
        let mut length = self.len()?;

        while length > 0 {
            let mut swapped = false;
            for i in 1..length {
                self.checkpoint()?;
                self.with(|c| {
                    c.record(1, 2);
                    c.set_color(i - 1, palette.processing);
                    c.set_color(i, palette.processing);
                })?;
                self.cue();

                swapped |= self.with(|c| {
                    let out_of_order = c.value(i - 1) > c.value(i);
                    if out_of_order {
                        c.swap(i - 1, i);
                        c.recompute_positions();
                    }
                    out_of_order
                })?;

                self.pause();
                self.with(|c| {
                    c.set_color(i - 1, palette.neutral);
                    c.set_color(i, palette.neutral);
                })?;
            }

            self.with(|c| c.set_color(length - 1, palette.placed))?;
            length -= 1;
            if !swapped {
                break;
            }
        }
        Ok(())
    }

    /// Holds each stick as the key and walks it left past every larger
    /// predecessor, one slot per step.
    pub(super) fn insertion_sort(&self) -> Step {
        let palette = self.palette;
        let len = self.len()?;

        for i in 1..len {
            self.checkpoint()?;
            self.with(|c| {
                c.record(0, 1);
                c.set_color(i, palette.processing);
            })?;
            self.pause();

            // `key` is the slot currently holding the key stick.
            let mut key = i;
            while key > 0 {
                self.checkpoint()?;
                let larger = self.with(|c| {
                    c.record(1, 1);
                    c.value(key - 1) > c.value(key)
                })?;
                self.cue();
                if !larger {
                    break;
                }

                self.with(|c| {
                    c.swap(key - 1, key);
                    c.set_color(key, palette.processing);
                    c.recompute_positions();
                })?;
                self.pause();
                self.with(|c| c.set_color(key, palette.selected))?;
                key -= 1;
            }

            self.pause();
            self.with(|c| c.set_color(key, palette.selected))?;
        }
        Ok(())
    }

    /// Scans the unsorted suffix for its minimum and swaps it into place. The
    /// swap happens even when the minimum is already in position.
    pub(super) fn selection_sort(&self) -> Step {
        let palette = self.palette;
        let len = self.len()?;

        for i in 0..len.saturating_sub(1) {
            self.checkpoint()?;
            self.with(|c| c.set_color(i, palette.candidate))?;
            let mut min = i;

            for j in i + 1..len {
                self.checkpoint()?;
                self.with(|c| {
                    c.record(1, 2);
                    c.set_color(j, palette.processing);
                })?;
                self.cue();

                let smaller = self.with(|c| c.value(j) < c.value(min))?;
                self.pause();
                self.with(|c| {
                    if smaller {
                        c.set_color(min, palette.neutral);
                        c.set_color(j, palette.candidate);
                    } else {
                        c.set_color(j, palette.neutral);
                    }
                })?;
                if smaller {
                    min = j;
                }
            }

            self.with(|c| {
                c.swap(i, min);
                c.recompute_positions();
                if min != i {
                    c.set_color(min, palette.neutral);
                }
                c.set_color(i, palette.placed);
            })?;
            self.pause();
        }

        if len > 0 {
            self.with(|c| c.set_color(len - 1, palette.placed))?;
        }
        Ok(())
    }
}
