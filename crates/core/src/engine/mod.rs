//! Step-paced sorting algorithms.
//!
//! Every algorithm runs against a [`SharedCollection`] and follows the same
//! step shape: check the cancellation token, count the comparison and the
//! slots it reads, paint the touched sticks, play a cue, mutate, lay the
//! sticks out again if the order changed, sleep for the pacing delay, then
//! restore colors. The collection lock is only held while touching the
//! sequence, never across a sleep, so the renderer can take consistent
//! snapshots between steps.

mod merge;
mod quadratic;
mod quick;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread,
    time::Duration,
};

use crate::{Collection, CueSink, Palette, Result, SortAlgorithm, SortVizError};

/// Collection handle shared between the coordinator, the sort worker and the
/// renderer.
pub type SharedCollection = Arc<Mutex<Collection>>;

/// Cooperative cancellation flag polled at every step of a run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Live pacing delays. Shared so that a reset can drop them to zero while a
/// worker is mid-step.
#[derive(Debug, Clone, Default)]
pub struct Pacing {
    operation_delay_ms: Arc<AtomicU64>,
    color_delay_ms: Arc<AtomicU64>,
}

impl Pacing {
    pub fn new(operation_delay_ms: u64, color_delay_ms: u64) -> Self {
        Self {
            operation_delay_ms: Arc::new(AtomicU64::new(operation_delay_ms)),
            color_delay_ms: Arc::new(AtomicU64::new(color_delay_ms)),
        }
    }

    pub fn operation_delay_ms(&self) -> u64 {
        self.operation_delay_ms.load(Ordering::Relaxed)
    }

    pub fn color_delay_ms(&self) -> u64 {
        self.color_delay_ms.load(Ordering::Relaxed)
    }

    /// Drops both delays to zero so an unwinding worker stops sleeping.
    pub fn hurry(&self) {
        self.operation_delay_ms.store(0, Ordering::Relaxed);
        self.color_delay_ms.store(0, Ordering::Relaxed);
    }
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Reason a run stopped before its natural end.
#[derive(Debug)]
enum Interrupt {
    Cancelled,
    Failed(SortVizError),
}

impl From<SortVizError> for Interrupt {
    fn from(value: SortVizError) -> Self {
        Interrupt::Failed(value)
    }
}

type Step<T = ()> = std::result::Result<T, Interrupt>;

/// Executes one algorithm at a time against a shared collection.
pub struct SortEngine {
    collection: SharedCollection,
    cues: Arc<dyn CueSink>,
    cancel: CancellationToken,
    pacing: Pacing,
    palette: Palette,
}

impl SortEngine {
    pub fn new(
        collection: SharedCollection,
        cues: Arc<dyn CueSink>,
        cancel: CancellationToken,
        pacing: Pacing,
    ) -> Result<Self> {
        let palette = *lock(&collection)?.palette();
        Ok(Self {
            collection,
            cues,
            cancel,
            pacing,
            palette,
        })
    }

    /// Runs `algorithm` to completion, followed by the completion sweep, or
    /// until the cancellation token is observed. A cancelled run leaves the
    /// collection a valid permutation of its values.
    pub fn run(&self, algorithm: SortAlgorithm) -> Result<RunOutcome> {
        let sorted = match algorithm {
            SortAlgorithm::Bubble => self.bubble_sort(),
            SortAlgorithm::Insertion => self.insertion_sort(),
            SortAlgorithm::Selection => self.selection_sort(),
            SortAlgorithm::Merge => self.merge_sort_all(),
            SortAlgorithm::InPlaceMerge => self.in_place_merge_sort_all(),
            SortAlgorithm::Quick => self.quick_sort_all(),
        };

        match sorted.and_then(|()| self.completion_sweep()) {
            Ok(()) => Ok(RunOutcome::Completed),
            Err(Interrupt::Cancelled) => {
                tracing::debug!(%algorithm, "sort worker observed cancellation");
                Ok(RunOutcome::Cancelled)
            }
            Err(Interrupt::Failed(err)) => Err(err),
        }
    }

    /// Paints every stick as processing with one cue, then walks the sequence
    /// again turning each stick to the placed color.
    fn completion_sweep(&self) -> Step {
        let len = self.len()?;
        let processing = self.palette.processing;
        for index in 0..len {
            self.checkpoint()?;
            self.with(|c| c.set_color(index, processing))?;
        }
        self.cue();

        let placed = self.palette.placed;
        for index in 0..len {
            self.checkpoint()?;
            self.cue();
            self.pause_color();
            self.with(|c| c.set_color(index, placed))?;
        }
        Ok(())
    }

    fn checkpoint(&self) -> Step {
        if self.cancel.is_cancelled() {
            Err(Interrupt::Cancelled)
        } else {
            Ok(())
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Collection) -> R) -> Step<R> {
        let mut collection = lock(&self.collection)?;
        Ok(f(&mut collection))
    }

    fn len(&self) -> Step<usize> {
        self.with(|c| c.len())
    }

    fn cue(&self) {
        self.cues.play_comparison_cue();
    }

    fn pause(&self) {
        sleep_ms(self.pacing.operation_delay_ms());
    }

    fn pause_color(&self) {
        sleep_ms(self.pacing.color_delay_ms());
    }
}

impl std::fmt::Debug for SortEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortEngine")
            .field("cancel", &self.cancel)
            .field("pacing", &self.pacing)
            .finish()
    }
}

pub(crate) fn lock(collection: &SharedCollection) -> Result<MutexGuard<'_, Collection>> {
    collection
        .lock()
        .map_err(|_| SortVizError::Poisoned("stick collection"))
}

fn sleep_ms(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::AtomicI64;

    use super::*;
    use crate::{Layout, RunStatistics, SilentCues};

    pub(crate) fn layout() -> Layout {
        Layout {
            viewport_width: 800.0,
            baseline_y: 600.0,
            spacing_pct: 0.25,
            max_height: 500.0,
        }
    }

    pub(crate) fn shared(values: &[u32]) -> SharedCollection {
        Arc::new(Mutex::new(Collection::from_values(
            values,
            layout(),
            Palette::default(),
        )))
    }

    pub(crate) fn engine_with(collection: &SharedCollection, cues: Arc<dyn CueSink>) -> SortEngine {
        SortEngine::new(
            collection.clone(),
            cues,
            CancellationToken::new(),
            Pacing::new(0, 0),
        )
        .unwrap()
    }

    pub(crate) fn engine(collection: &SharedCollection) -> SortEngine {
        engine_with(collection, Arc::new(SilentCues))
    }

    pub(crate) fn values(collection: &SharedCollection) -> Vec<u32> {
        collection.lock().unwrap().values()
    }

    pub(crate) fn stats(collection: &SharedCollection) -> RunStatistics {
        collection.lock().unwrap().stats()
    }

    const SCRAMBLED: [u32; 12] = [7, 12, 1, 9, 3, 11, 5, 2, 10, 4, 8, 6];

    /// Cancels the run once a given number of cues has been played.
    struct CancelAfter {
        remaining: AtomicI64,
        token: CancellationToken,
    }

    impl CueSink for CancelAfter {
        fn play_comparison_cue(&self) {
            if self.remaining.fetch_sub(1, Ordering::Relaxed) <= 1 {
                self.token.cancel();
            }
        }
    }

    /// Records the statistics visible at every cue.
    struct StatsRecorder {
        collection: SharedCollection,
        seen: Mutex<Vec<RunStatistics>>,
    }

    impl CueSink for StatsRecorder {
        fn play_comparison_cue(&self) {
            let stats = self.collection.lock().unwrap().stats();
            self.seen.lock().unwrap().push(stats);
        }
    }

    #[test]
    fn every_algorithm_sorts_and_paints_placed() {
        for algorithm in SortAlgorithm::ALL {
            let collection = shared(&SCRAMBLED);
            let outcome = engine(&collection).run(algorithm).unwrap();

            assert_eq!(outcome, RunOutcome::Completed, "{algorithm}");
            assert_eq!(values(&collection), (1..=12).collect::<Vec<u32>>(), "{algorithm}");
            let placed = Palette::default().placed;
            assert!(
                collection
                    .lock()
                    .unwrap()
                    .elements()
                    .iter()
                    .all(|e| e.visual_state == placed),
                "{algorithm}"
            );
        }
    }

    #[test]
    fn single_element_collections_complete() {
        for algorithm in SortAlgorithm::ALL {
            let collection = shared(&[1]);
            assert_eq!(engine(&collection).run(algorithm).unwrap(), RunOutcome::Completed);
            assert_eq!(values(&collection), vec![1]);
        }
    }

    #[test]
    fn cancellation_at_any_step_keeps_a_permutation() {
        for algorithm in SortAlgorithm::ALL {
            for cancel_at in [1, 2, 3, 5, 8, 13, 21] {
                let collection = shared(&SCRAMBLED);
                let token = CancellationToken::new();
                let cues = Arc::new(CancelAfter {
                    remaining: AtomicI64::new(cancel_at),
                    token: token.clone(),
                });
                let engine =
                    SortEngine::new(collection.clone(), cues, token, Pacing::new(0, 0)).unwrap();

                assert_eq!(engine.run(algorithm).unwrap(), RunOutcome::Cancelled);

                let mut after = values(&collection);
                after.sort_unstable();
                assert_eq!(after, (1..=12).collect::<Vec<u32>>(), "{algorithm} @ {cancel_at}");
            }
        }
    }

    #[test]
    fn pre_cancelled_runs_do_not_touch_the_sequence() {
        for algorithm in SortAlgorithm::ALL {
            let collection = shared(&SCRAMBLED);
            let token = CancellationToken::new();
            token.cancel();
            let engine = SortEngine::new(
                collection.clone(),
                Arc::new(SilentCues),
                token,
                Pacing::new(0, 0),
            )
            .unwrap();

            assert_eq!(engine.run(algorithm).unwrap(), RunOutcome::Cancelled);
            assert_eq!(values(&collection), SCRAMBLED.to_vec(), "{algorithm}");
        }
    }

    #[test]
    fn statistics_only_grow_during_a_run() {
        for algorithm in SortAlgorithm::ALL {
            let collection = shared(&SCRAMBLED);
            let recorder = Arc::new(StatsRecorder {
                collection: collection.clone(),
                seen: Mutex::new(Vec::new()),
            });
            engine_with(&collection, recorder.clone()).run(algorithm).unwrap();

            let seen = recorder.seen.lock().unwrap();
            assert!(!seen.is_empty());
            for pair in seen.windows(2) {
                assert!(pair[0].comparisons <= pair[1].comparisons, "{algorithm}");
                assert!(pair[0].array_accesses <= pair[1].array_accesses, "{algorithm}");
                assert!(pair[0].swaps <= pair[1].swaps, "{algorithm}");
            }
            assert!(stats(&collection).comparisons > 0, "{algorithm}");
        }
    }

    #[test]
    fn hurry_zeroes_both_delays() {
        let pacing = Pacing::new(40, 15);
        let shared_view = pacing.clone();
        pacing.hurry();
        assert_eq!(shared_view.operation_delay_ms(), 0);
        assert_eq!(shared_view.color_delay_ms(), 0);
    }
}
