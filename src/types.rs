//! Core data types for the ShakeIt engine.
//!
//! This module defines the values that flow between the sample source, the
//! shake detector, the score tracker, and the session. State carried between
//! samples is plain data so the detector and tracker can be expressed as
//! state-transition functions over it.
//!
//! Design principle: if a concept exists, it gets a type. Never pass raw
//! tuples across module boundaries.

use serde::{Deserialize, Serialize};

/// Index of the accelerometer axis consumed by the detector (X).
pub const SHAKE_AXIS: usize = 0;

/// A single accelerometer reading.
///
/// The session assigns `index`, a monotonically increasing sequence number
/// that stands in for time. Only the X axis is interpreted; Y and Z are kept
/// so hosts can pass the raw platform event through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    /// Sequence number within the session, starting at 1.
    pub index: u64,

    /// Accelerometer reading [x, y, z] in m/s².
    pub values: [f32; 3],
}

impl AccelSample {
    pub fn new(index: u64, values: [f32; 3]) -> Self {
        Self { index, values }
    }

    /// The scalar the detector consumes.
    pub fn shake_value(&self) -> f32 {
        self.values[SHAKE_AXIS]
    }
}

// ============================================================================
// DETECTOR TYPES
// ============================================================================

/// State carried by the shake detector from one sample to the next.
///
/// Invariant: `is_shaking` reflects the thresholding of the most recently
/// computed `delta` (onset above the shake intensity, continuation above the
/// lower continuation threshold while already shaking).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorState {
    /// Previous sample value.
    pub last_value: f32,
    /// Most recent local extremum (peak-to-peak strategy only).
    pub peak_value: f32,
    /// Direction of travel since the last extremum (peak-to-peak strategy only).
    pub moving_up: bool,
    /// Magnitude of change used for thresholding.
    pub delta: f32,
    /// Current classification.
    pub is_shaking: bool,
}

impl DetectorState {
    /// Initial trough marker used before the first reversal is observed.
    pub const INITIAL_PEAK: f32 = -1.0;
}

impl Default for DetectorState {
    fn default() -> Self {
        Self {
            last_value: 0.0,
            peak_value: Self::INITIAL_PEAK,
            moving_up: false,
            delta: 0.0,
            is_shaking: false,
        }
    }
}

/// A change of shaking state produced by a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakeEdge {
    /// Shaking state did not change.
    #[default]
    None,
    /// Not shaking → shaking.
    Started,
    /// Shaking → not shaking. This is the commit trigger.
    Ended,
}

impl ShakeEdge {
    /// Derive the edge from the classification before and after a sample.
    pub fn between(was_shaking: bool, is_shaking: bool) -> Self {
        match (was_shaking, is_shaking) {
            (false, true) => ShakeEdge::Started,
            (true, false) => ShakeEdge::Ended,
            _ => ShakeEdge::None,
        }
    }
}

/// What the detector reports for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorOutput {
    pub delta: f32,
    pub is_shaking: bool,
    pub edge: ShakeEdge,
}

// ============================================================================
// SCORING TYPES
// ============================================================================

/// A high score promotion produced by `commit_if_higher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The new high score.
    pub highscore: u64,
    /// The high score it replaced.
    pub previous: u64,
}

// ============================================================================
// SESSION TYPES
// ============================================================================

/// Everything a host needs to refresh its display after one sensor event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    /// Sequence number assigned to the sample.
    pub index: u64,
    pub delta: f32,
    pub is_shaking: bool,
    pub edge: ShakeEdge,
    /// Current score, rounded down.
    pub score: u64,
    pub highscore: u64,
    /// True when this sample committed a new high score.
    pub new_highscore: bool,
}

/// Per-session counters. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Samples processed while listening.
    pub samples: u64,
    /// Number of shakes started.
    pub shakes: u64,
    /// Best score reached during this session, committed or not.
    pub best_score: u64,
    /// High score commits during this session.
    pub commits: u64,
}
