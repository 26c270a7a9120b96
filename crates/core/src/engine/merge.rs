use super::{SortEngine, Step};

impl SortEngine {
    pub(super) fn merge_sort_all(&self) -> Step {
        let len = self.len()?;
        if len > 1 {
            self.merge_sort(0, len - 1, len)?;
        }
        Ok(())
    }

    pub(super) fn in_place_merge_sort_all(&self) -> Step {
        let len = self.len()?;
        if len > 1 {
            self.in_place_merge_sort(0, len - 1)?;
        }
        Ok(())
    }

    fn merge_sort(&self, left: usize, right: usize, len: usize) -> Step {
        if left >= right {
            return Ok(());
        }
        let mid = left + (right - left) / 2;
        self.merge_sort(left, mid, len)?;
        self.merge_sort(mid + 1, right, len)?;
        self.merge(left, mid, right, len)
    }

    /// Merges `left..=mid` and `mid + 1..=right` through a buffer copy of the
    /// span.
    ///
    /// Writing back never duplicates a stick: the stick chosen for slot `k` is
    /// swapped in from wherever it currently sits in `k..=right`, so the
    /// sequence stays a permutation even if the run stops mid-merge.
    fn merge(&self, left: usize, mid: usize, right: usize, len: usize) -> Step {
        self.checkpoint()?;
        let palette = self.palette;
        let span = (right - left + 1) as u64;
        let buffer: Vec<(usize, u32)> = self.with(|c| {
            c.record(0, span);
            c.elements()[left..=right]
                .iter()
                .map(|e| (e.index_hint(), e.value()))
                .collect()
        })?;
        let (lower, upper) = buffer.split_at(mid - left + 1);
        let done = if left == 0 && right + 1 == len {
            palette.placed
        } else {
            palette.selected
        };

        let (mut a, mut b) = (0, 0);
        for k in left..=right {
            self.checkpoint()?;
            let take_lower = match (lower.get(a), upper.get(b)) {
                (Some(low), Some(high)) => {
                    self.with(|c| c.record(1, 0))?;
                    self.cue();
                    low.1 <= high.1
                }
                (Some(_), None) => true,
                _ => false,
            };
            let (hint, _) = if take_lower {
                a += 1;
                lower[a - 1]
            } else {
                b += 1;
                upper[b - 1]
            };

            self.with(|c| {
                c.record(0, 1);
                if let Some(current) = c.position_of(hint, k..=right) {
                    if current != k {
                        c.swap(k, current);
                        c.recompute_positions();
                    }
                }
                c.set_color(k, palette.processing);
            })?;
            self.pause();
            self.with(|c| c.set_color(k, done))?;
        }
        Ok(())
    }

    fn in_place_merge_sort(&self, left: usize, right: usize) -> Step {
        if left >= right {
            return Ok(());
        }
        let mid = left + (right - left) / 2;
        self.in_place_merge_sort(left, mid)?;
        self.in_place_merge_sort(mid + 1, right)?;
        self.in_place_merge(left, mid, right)
    }

    /// Merges two adjacent sorted runs without a buffer: whenever the right
    /// run's head is smaller it is rotated down to the front one slot at a
    /// time.
    fn in_place_merge(&self, left: usize, mid: usize, right: usize) -> Step {
        let palette = self.palette;
        self.checkpoint()?;
        let already_ordered = self.with(|c| {
            c.record(1, 2);
            c.value(mid) <= c.value(mid + 1)
        })?;
        self.cue();
        if already_ordered {
            return Ok(());
        }

        let (mut i, mut mid, mut j) = (left, mid, mid + 1);
        while i <= mid && j <= right {
            self.checkpoint()?;
            self.with(|c| {
                c.record(1, 2);
                c.set_color(i, palette.processing);
                c.set_color(j, palette.processing);
            })?;
            self.cue();

            let in_order = self.with(|c| c.value(i) <= c.value(j))?;
            if in_order {
                self.pause();
                self.with(|c| {
                    c.set_color(i, palette.selected);
                    c.set_color(j, palette.neutral);
                })?;
            } else {
                for slot in (i + 1..=j).rev() {
                    self.checkpoint()?;
                    self.with(|c| {
                        c.swap(slot - 1, slot);
                        c.recompute_positions();
                    })?;
                    self.pause();
                }
                self.with(|c| {
                    c.set_color(i, palette.selected);
                    c.set_color(i + 1, palette.neutral);
                })?;
                mid += 1;
                j += 1;
            }
            i += 1;
        }
        Ok(())
    }
}
