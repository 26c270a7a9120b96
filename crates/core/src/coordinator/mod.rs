use std::{
    sync::{Arc, Mutex},
    thread::{self, JoinHandle},
};

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    engine::lock, AppConfig, CancellationToken, Collection, CueSink, Element, FrameView, Layout,
    Pacing, Presenter, Result, RunOutcome, RunStatistics, SharedCollection, SortAlgorithm,
    SortEngine, SortVizError, TimingConfig,
};

/// Whether a sort session currently owns the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortState {
    NotRunning,
    Running,
}

/// Background unit of one sort invocation.
struct SortSession {
    algorithm: SortAlgorithm,
    cancel: CancellationToken,
    pacing: Pacing,
    worker: JoinHandle<Result<RunOutcome>>,
}

impl SortSession {
    fn join(self) -> Result<RunOutcome> {
        self.worker
            .join()
            .map_err(|_| SortVizError::WorkerPanicked)?
    }
}

/// Owns the stick collection and at most one background sort worker, and
/// exposes the start/reset/update surface used by the UI layer.
pub struct Coordinator {
    config: AppConfig,
    collection: SharedCollection,
    cues: Arc<dyn CueSink>,
    rng: StdRng,
    state: SortState,
    algorithm: Option<SortAlgorithm>,
    delay_ms: u64,
    complexity: &'static str,
    session: Option<SortSession>,
}

impl Coordinator {
    /// Validates the configuration, allocates the collection and shuffles it.
    pub fn new(config: AppConfig, cues: Arc<dyn CueSink>) -> Result<Self> {
        config.validate()?;
        let collection = Collection::initialize(
            config.collection.element_count,
            Layout::from(&config.collection),
            config.palette,
        );
        let rng = match config.collection.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut coordinator = Self {
            config,
            collection: Arc::new(Mutex::new(collection)),
            cues,
            rng,
            state: SortState::NotRunning,
            algorithm: None,
            delay_ms: 0,
            complexity: "",
            session: None,
        };
        coordinator.reset()?;
        Ok(coordinator)
    }

    /// Starts `algorithm` on a background worker.
    ///
    /// Fails with [`SortVizError::InvalidState`] while another session is
    /// running; the in-flight session is left untouched.
    pub fn start_sort(&mut self, algorithm: SortAlgorithm) -> Result<()> {
        if self.state == SortState::Running || self.session.is_some() {
            return Err(SortVizError::InvalidState("a sort is already running"));
        }

        {
            let mut collection = lock(&self.collection)?;
            collection.reset_statistics();
            collection.reset_colors();
        }

        let delay_ms = self.config.timing.delay_for(algorithm);
        let cancel = CancellationToken::new();
        let pacing = Pacing::new(delay_ms, self.config.timing.color_delay_ms);
        let engine = SortEngine::new(
            self.collection.clone(),
            self.cues.clone(),
            cancel.clone(),
            pacing.clone(),
        )?;
        let worker = thread::Builder::new()
            .name(format!("sort-{algorithm}"))
            .spawn(move || engine.run(algorithm))?;

        self.session = Some(SortSession {
            algorithm,
            cancel,
            pacing,
            worker,
        });
        self.algorithm = Some(algorithm);
        self.delay_ms = delay_ms;
        self.complexity = algorithm.complexity();
        self.state = SortState::Running;
        tracing::info!(%algorithm, delay_ms, "sort started");
        Ok(())
    }

    /// Cancels and joins any in-flight session, then reshuffles the sticks
    /// and clears colors and statistics. Does not return before the worker
    /// has stopped.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            let algorithm = session.algorithm;
            session.cancel.cancel();
            session.pacing.hurry();
            match session.join() {
                Ok(outcome) => tracing::debug!(%algorithm, ?outcome, "sort worker joined"),
                Err(err) => tracing::warn!(%algorithm, %err, "sort worker ended abnormally"),
            }
        }
        self.state = SortState::NotRunning;
        self.delay_ms = 0;

        let mut collection = lock(&self.collection)?;
        collection.shuffle(&mut self.rng);
        collection.reset_colors();
        collection.reset_statistics();
        tracing::info!(sticks = collection.len(), "collection reset");
        Ok(())
    }

    /// Joins a worker that has finished on its own. Returns `true` on the
    /// frame the session ends.
    ///
    /// The worker is only joined once the collection is sorted by value and
    /// the worker has returned, so the foreground never blocks on the
    /// completion sweep.
    pub fn poll_completion(&mut self) -> Result<bool> {
        let finished = match &self.session {
            Some(session) => session.worker.is_finished(),
            None => return Ok(false),
        };
        if !finished {
            return Ok(false);
        }
        let sorted = lock(&self.collection)?.is_sorted();

        let Some(session) = self.session.take() else {
            return Ok(false);
        };
        let algorithm = session.algorithm;
        self.state = SortState::NotRunning;

        match session.join() {
            Ok(RunOutcome::Completed) if sorted => {
                let stats = self.statistics()?;
                tracing::info!(
                    %algorithm,
                    comparisons = stats.comparisons,
                    array_accesses = stats.array_accesses,
                    "sort completed"
                );
                Ok(true)
            }
            Ok(outcome) => {
                tracing::warn!(%algorithm, ?outcome, sorted, "sort worker stopped without sorting");
                lock(&self.collection)?.reset_colors();
                Ok(true)
            }
            Err(err) => {
                tracing::error!(%algorithm, %err, "sort worker failed");
                lock(&self.collection)?.reset_colors();
                Err(err)
            }
        }
    }

    /// Per-frame foreground hook.
    pub fn update(&mut self) -> Result<()> {
        self.poll_completion()?;
        Ok(())
    }

    /// Hands a consistent snapshot of the current frame to `presenter`. The
    /// collection lock is released before the presenter runs.
    pub fn render(&self, presenter: &mut dyn Presenter) -> Result<()> {
        let (elements, stats) = {
            let collection = lock(&self.collection)?;
            (collection.elements().to_vec(), collection.stats())
        };
        let frame = FrameView {
            elements: &elements,
            stats,
            algorithm: self.algorithm,
            state: self.state,
            delay_ms: self.delay_ms,
            complexity: self.complexity,
            palette: &self.config.palette,
        };
        presenter.present(&frame)
    }

    /// Replaces the pacing used by the next session. A running session keeps
    /// its own delays.
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.config.timing = timing;
    }

    pub fn state(&self) -> SortState {
        self.state
    }

    pub fn algorithm(&self) -> Option<SortAlgorithm> {
        self.algorithm
    }

    pub fn statistics(&self) -> Result<RunStatistics> {
        Ok(lock(&self.collection)?.stats())
    }

    pub fn comparisons(&self) -> Result<u64> {
        Ok(self.statistics()?.comparisons)
    }

    pub fn array_accesses(&self) -> Result<u64> {
        Ok(self.statistics()?.array_accesses)
    }

    pub fn element_count(&self) -> usize {
        self.config.collection.element_count
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn complexity(&self) -> &'static str {
        self.complexity
    }

    /// Copy of the sticks in their current order.
    pub fn snapshot(&self) -> Result<Vec<Element>> {
        Ok(lock(&self.collection)?.elements().to_vec())
    }

    pub fn values(&self) -> Result<Vec<u32>> {
        Ok(lock(&self.collection)?.values())
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let algorithm = session.algorithm;
            session.cancel.cancel();
            session.pacing.hurry();
            if let Err(err) = session.join() {
                tracing::warn!(%algorithm, %err, "sort worker ended abnormally on drop");
            }
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("algorithm", &self.algorithm)
            .field("delay_ms", &self.delay_ms)
            .field("complexity", &self.complexity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{SilentCues, TextPresenter};

    /// Cue sink whose audio device disappears on the first cue.
    struct FailingCues;

    impl CueSink for FailingCues {
        fn play_comparison_cue(&self) {
            panic!("audio device lost");
        }
    }

    /// Presenter that checks the collection is free while it draws.
    struct LockCheckingPresenter {
        collection: SharedCollection,
        frames: usize,
    }

    impl Presenter for LockCheckingPresenter {
        fn present(&mut self, frame: &FrameView<'_>) -> Result<()> {
            assert!(self.collection.try_lock().is_ok(), "collection locked while presenting");
            assert_eq!(frame.elements.len(), 5);
            self.frames += 1;
            Ok(())
        }
    }

    fn wait_for_worker(coordinator: &Coordinator) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !coordinator
            .session
            .as_ref()
            .is_some_and(|session| session.worker.is_finished())
        {
            assert!(Instant::now() < deadline, "worker did not stop in time");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn config(count: usize, delay_ms: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.collection.element_count = count;
        config.collection.shuffle_seed = Some(42);
        config.timing.operation_delay_ms = delay_ms;
        config.timing.color_delay_ms = 0;
        config.timing.algorithm_delays_ms.clear();
        config
    }

    fn coordinator(count: usize, delay_ms: u64) -> Coordinator {
        Coordinator::new(config(count, delay_ms), Arc::new(SilentCues)).unwrap()
    }

    fn assert_permutation(coordinator: &Coordinator, count: u32) {
        let mut values = coordinator.values().unwrap();
        values.sort_unstable();
        assert_eq!(values, (1..=count).collect::<Vec<u32>>());
    }

    fn run_to_completion(coordinator: &mut Coordinator) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while coordinator.state() == SortState::Running {
            assert!(Instant::now() < deadline, "sort did not finish in time");
            coordinator.update().unwrap();
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn starts_shuffled_and_idle() {
        let coordinator = coordinator(30, 0);
        assert_eq!(coordinator.state(), SortState::NotRunning);
        assert_eq!(coordinator.element_count(), 30);
        assert_eq!(coordinator.statistics().unwrap(), RunStatistics::default());
        assert_permutation(&coordinator, 30);
    }

    #[test]
    fn every_algorithm_completes_through_polling() {
        for algorithm in SortAlgorithm::ALL {
            let mut coordinator = coordinator(16, 0);
            coordinator.start_sort(algorithm).unwrap();
            assert_eq!(coordinator.state(), SortState::Running);
            assert_eq!(coordinator.complexity(), algorithm.complexity());

            run_to_completion(&mut coordinator);

            assert_eq!(coordinator.values().unwrap(), (1..=16).collect::<Vec<u32>>());
            assert!(coordinator.comparisons().unwrap() > 0);
            assert_eq!(coordinator.algorithm(), Some(algorithm));
        }
    }

    #[test]
    fn rejects_a_second_start_without_disturbing_the_first() {
        let mut coordinator = coordinator(12, 20);
        coordinator.start_sort(SortAlgorithm::Bubble).unwrap();

        let err = coordinator.start_sort(SortAlgorithm::Quick).unwrap_err();

        assert!(matches!(err, SortVizError::InvalidState(_)));
        assert_eq!(coordinator.state(), SortState::Running);
        assert_eq!(coordinator.algorithm(), Some(SortAlgorithm::Bubble));
        assert_eq!(coordinator.delay_ms(), 20);
        coordinator.reset().unwrap();
    }

    #[test]
    fn reset_mid_run_leaves_a_clean_permutation() {
        let mut coordinator = coordinator(8, 10);
        coordinator.start_sort(SortAlgorithm::Selection).unwrap();
        thread::sleep(Duration::from_millis(15));

        coordinator.reset().unwrap();

        assert_eq!(coordinator.state(), SortState::NotRunning);
        assert_eq!(coordinator.statistics().unwrap(), RunStatistics::default());
        assert_eq!(coordinator.delay_ms(), 0);
        assert_permutation(&coordinator, 8);
        let neutral = AppConfig::default().palette.neutral;
        assert!(coordinator
            .snapshot()
            .unwrap()
            .iter()
            .all(|e| e.visual_state == neutral));
    }

    #[test]
    fn reset_stops_a_slow_worker_promptly() {
        let mut coordinator = coordinator(30, 300);
        coordinator.start_sort(SortAlgorithm::Bubble).unwrap();
        thread::sleep(Duration::from_millis(10));

        let started = Instant::now();
        coordinator.reset().unwrap();

        // At most the sleep already in progress.
        assert!(started.elapsed() < Duration::from_millis(1_000));
        assert_eq!(coordinator.state(), SortState::NotRunning);
        assert_permutation(&coordinator, 30);
    }

    #[test]
    fn statistics_restart_from_zero_for_each_run() {
        let mut coordinator = coordinator(10, 0);
        coordinator.start_sort(SortAlgorithm::Insertion).unwrap();
        run_to_completion(&mut coordinator);
        assert!(coordinator.comparisons().unwrap() > 0);

        let mut slow = config(10, 500).timing;
        slow.color_delay_ms = 500;
        coordinator.set_timing(slow);
        coordinator.start_sort(SortAlgorithm::Bubble).unwrap();

        // The worker cannot get past its first pause this quickly.
        assert!(coordinator.comparisons().unwrap() <= 1);
        assert_eq!(coordinator.delay_ms(), 500);
        coordinator.reset().unwrap();
    }

    #[test]
    fn sorts_again_after_completion_without_reset() {
        let mut coordinator = coordinator(6, 0);
        coordinator.start_sort(SortAlgorithm::Quick).unwrap();
        run_to_completion(&mut coordinator);

        coordinator.start_sort(SortAlgorithm::Merge).unwrap();
        run_to_completion(&mut coordinator);

        assert_eq!(coordinator.values().unwrap(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(coordinator.statistics().unwrap().swaps, 0);
    }

    #[test]
    fn renders_frames_from_the_shared_collection() {
        let coordinator = coordinator(5, 0);
        let mut presenter = TextPresenter::new(Vec::new());

        coordinator.render(&mut presenter).unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("NotRunning"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn a_panicking_cue_sink_ends_the_session_cleanly() {
        let mut coordinator = Coordinator::new(config(8, 0), Arc::new(FailingCues)).unwrap();
        coordinator.start_sort(SortAlgorithm::Bubble).unwrap();
        wait_for_worker(&coordinator);

        let err = coordinator.poll_completion().unwrap_err();

        assert!(matches!(err, SortVizError::WorkerPanicked));
        assert_eq!(coordinator.state(), SortState::NotRunning);
        assert!(coordinator.session.is_none());
        assert_permutation(&coordinator, 8);
        let neutral = AppConfig::default().palette.neutral;
        assert!(coordinator
            .snapshot()
            .unwrap()
            .iter()
            .all(|e| e.visual_state == neutral));

        coordinator.reset().unwrap();
        assert_permutation(&coordinator, 8);
        coordinator.start_sort(SortAlgorithm::Insertion).unwrap();
        assert_eq!(coordinator.state(), SortState::Running);
        coordinator.reset().unwrap();
        assert_permutation(&coordinator, 8);
    }

    #[test]
    fn dropping_after_a_worker_panic_does_not_propagate_it() {
        let mut coordinator = Coordinator::new(config(8, 0), Arc::new(FailingCues)).unwrap();
        coordinator.start_sort(SortAlgorithm::Quick).unwrap();
        wait_for_worker(&coordinator);

        drop(coordinator);
    }

    #[test]
    fn presents_without_holding_the_collection_lock() {
        let coordinator = coordinator(5, 0);
        let mut presenter = LockCheckingPresenter {
            collection: coordinator.collection.clone(),
            frames: 0,
        };

        coordinator.render(&mut presenter).unwrap();
        coordinator.render(&mut presenter).unwrap();

        assert_eq!(presenter.frames, 2);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let mut config = config(5, 0);
        config.collection.element_count = 0;
        let err = Coordinator::new(config, Arc::new(SilentCues)).unwrap_err();
        assert!(matches!(err, SortVizError::InvalidConfig(_)));
    }
}
