use std::sync::atomic::{AtomicU64, Ordering};

/// Sink for the short sound played whenever two sticks are compared.
///
/// Cues are fire-and-forget. Implementations must not block for long, since
/// they are called from the sort worker between pacing delays.
pub trait CueSink: Send + Sync {
    fn play_comparison_cue(&self);
}

/// Cue sink that discards every cue. Used for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play_comparison_cue(&self) {}
}

/// Cue sink that only counts how many cues were requested.
#[derive(Debug, Default)]
pub struct CueCounter {
    played: AtomicU64,
}

impl CueCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> u64 {
        self.played.load(Ordering::Relaxed)
    }
}

impl CueSink for CueCounter {
    fn play_comparison_cue(&self) {
        self.played.fetch_add(1, Ordering::Relaxed);
    }
}
