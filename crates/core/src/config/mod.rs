use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Color, Result, SortAlgorithm, SortVizError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub collection: CollectionConfig,
    pub palette: Palette,
    pub timing: TimingConfig,
}

impl AppConfig {
    /// Parses a configuration from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let collection = &self.collection;
        if collection.element_count == 0 {
            return Err(SortVizError::InvalidConfig(
                "element_count must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&collection.spacing_pct) {
            return Err(SortVizError::InvalidConfig(format!(
                "spacing_pct must lie in [0, 1), got {}",
                collection.spacing_pct
            )));
        }
        if !(collection.max_height > 0.0) {
            return Err(SortVizError::InvalidConfig(
                "max_height must be positive".to_string(),
            ));
        }
        if !(collection.viewport_width > 0.0) {
            return Err(SortVizError::InvalidConfig(
                "viewport_width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Size and layout of the stick collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub element_count: usize,
    /// Share of the viewport width reserved for gaps between sticks.
    pub spacing_pct: f32,
    pub max_height: f32,
    pub viewport_width: f32,
    /// Y coordinate the bottom edge of every stick rests on.
    pub baseline_y: f32,
    /// Fixed seed for reproducible shuffles. `None` seeds from the OS.
    pub shuffle_seed: Option<u64>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            element_count: 30,
            spacing_pct: 0.25,
            max_height: 820.0,
            viewport_width: 1920.0,
            baseline_y: 1000.0,
            shuffle_seed: None,
        }
    }
}

/// Colors for each visual state an element can be in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub neutral: Color,
    pub processing: Color,
    /// Running minimum during selection sort, and other temporary markers.
    pub candidate: Color,
    pub selected: Color,
    pub placed: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            neutral: Color::WHITE,
            processing: Color::RED,
            candidate: Color::BLUE,
            selected: Color::YELLOW,
            placed: Color::GREEN,
        }
    }
}

/// Pacing of the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub operation_delay_ms: u64,
    /// Delay between sticks during the completion sweep.
    pub color_delay_ms: u64,
    /// Per-algorithm replacements for `operation_delay_ms`.
    pub algorithm_delays_ms: BTreeMap<SortAlgorithm, u64>,
}

impl TimingConfig {
    pub fn delay_for(&self, algorithm: SortAlgorithm) -> u64 {
        self.algorithm_delays_ms
            .get(&algorithm)
            .copied()
            .unwrap_or(self.operation_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        let algorithm_delays_ms = BTreeMap::from([
            (SortAlgorithm::Merge, 80),
            (SortAlgorithm::InPlaceMerge, 40),
            (SortAlgorithm::Quick, 80),
        ]);
        Self {
            operation_delay_ms: 50,
            color_delay_ms: 20,
            algorithm_delays_ms,
        }
    }
}
