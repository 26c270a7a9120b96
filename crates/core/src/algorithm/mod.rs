use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::SortVizError;

/// The sorting algorithms the engine knows how to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortAlgorithm {
    Bubble,
    Insertion,
    Selection,
    /// Top-down merge sort with a temporary buffer per merge span.
    Merge,
    /// Merge sort that shifts elements instead of allocating a buffer.
    InPlaceMerge,
    /// Quick sort with the Lomuto partition scheme.
    Quick,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 6] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Insertion,
        SortAlgorithm::Selection,
        SortAlgorithm::Merge,
        SortAlgorithm::InPlaceMerge,
        SortAlgorithm::Quick,
    ];

    /// Stable kebab-case name used on the command line and in configuration.
    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::InPlaceMerge => "in-place-merge",
            SortAlgorithm::Quick => "quick",
        }
    }

    /// Time complexity label shown next to the statistics.
    pub fn complexity(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble
            | SortAlgorithm::Insertion
            | SortAlgorithm::Selection
            | SortAlgorithm::InPlaceMerge => "O(n^2)",
            SortAlgorithm::Merge | SortAlgorithm::Quick => "O(n log n)",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        SortAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| SortVizError::UnknownAlgorithm(s.to_string()))
    }
}
