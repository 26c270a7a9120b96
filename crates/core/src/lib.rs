//! Core library for the Sorting Sticks visualiser.
//!
//! A fixed-size collection of sticks is shuffled and then sorted by one of a
//! handful of classical algorithms, one paced step at a time, so that every
//! comparison and swap is visible. The [`Coordinator`] owns the collection and
//! the single background worker running a [`SortEngine`]; renderers only ever
//! receive read-only [`FrameView`]s.

pub mod algorithm;
pub mod audio;
pub mod collection;
pub mod config;
pub mod coordinator;
pub mod element;
pub mod engine;
pub mod error;
pub mod render;

pub use algorithm::SortAlgorithm;
pub use audio::{CueCounter, CueSink, SilentCues};
pub use collection::{Collection, Layout, RunStatistics};
pub use config::{AppConfig, CollectionConfig, Palette, TimingConfig};
pub use coordinator::{Coordinator, SortState};
pub use element::{Color, Element, Geometry};
pub use engine::{CancellationToken, Pacing, RunOutcome, SharedCollection, SortEngine};
pub use error::{Result, SortVizError};
pub use render::{FrameView, Presenter, TextPresenter};
