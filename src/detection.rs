//! Shake detection.
//!
//! Classifies a stream of scalar accelerometer values into shaking / not
//! shaking and produces a motion delta usable as a score increment.
//!
//! Design: pure state transitions behind one capability
//! - `ShakeClassifier::step` maps `(DetectorState, value)` to the next state
//! - Two strategies: first difference, and peak-to-peak between reversals
//! - Both share the same onset/continuation thresholding (hysteresis)
//! - `ShakeDetector` owns the state and exactly one strategy
//!
//! Thresholding on a first difference is a cheap high-pass filter. The
//! continuation threshold sits well below the onset threshold so a shake does
//! not flicker on and off while the hand changes direction.
//!
//! The detector never fails and does not validate its input. A NaN delta
//! compares false against every threshold and leaves the state unchanged.

use tracing::{debug, trace};

use crate::config::{ClassifierKind, ShakeConfig};
use crate::types::{DetectorOutput, DetectorState, ShakeEdge};

/// Onset and continuation thresholds shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Delta above which motion counts as shaking.
    pub shake_intensity: f32,
    /// Lower delta that keeps an ongoing shake alive.
    pub continuation_threshold: f32,
}

impl Thresholds {
    pub fn from_config(config: &ShakeConfig) -> Self {
        Self {
            shake_intensity: config.shake_intensity,
            continuation_threshold: config.continuation_threshold,
        }
    }

    /// Next shaking classification for `delta`, in strict branch order:
    /// onset or continuation, then release, otherwise unchanged.
    pub fn classify(&self, was_shaking: bool, delta: f32) -> bool {
        if delta > self.shake_intensity || (was_shaking && delta > self.continuation_threshold) {
            true
        } else if was_shaking && delta < self.shake_intensity {
            false
        } else {
            was_shaking
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from_config(&ShakeConfig::default())
    }
}

/// A shake classification strategy.
pub trait ShakeClassifier {
    /// Compute the detector state after observing `value`.
    fn step(&self, state: &DetectorState, value: f32) -> DetectorState;

    /// Which strategy this is.
    fn kind(&self) -> ClassifierKind;
}

/// Absolute difference between consecutive samples.
#[derive(Debug, Clone, Copy)]
pub struct DifferenceClassifier {
    thresholds: Thresholds,
}

impl DifferenceClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl ShakeClassifier for DifferenceClassifier {
    fn step(&self, state: &DetectorState, value: f32) -> DetectorState {
        let delta = (state.last_value - value).abs();
        DetectorState {
            delta,
            is_shaking: self.thresholds.classify(state.is_shaking, delta),
            last_value: value,
            ..*state
        }
    }

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Difference
    }
}

/// Difference between consecutive local extrema.
///
/// The delta is only recomputed when the signal reverses direction; between
/// reversals the previous delta is held. Values inside the dead zone around
/// zero do not take part in direction tracking.
#[derive(Debug, Clone, Copy)]
pub struct PeakToPeakClassifier {
    thresholds: Thresholds,
    dead_zone: f32,
}

impl PeakToPeakClassifier {
    pub fn new(thresholds: Thresholds, dead_zone: f32) -> Self {
        Self {
            thresholds,
            dead_zone,
        }
    }
}

impl ShakeClassifier for PeakToPeakClassifier {
    fn step(&self, state: &DetectorState, value: f32) -> DetectorState {
        let mut next = *state;

        if value.abs() >= self.dead_zone {
            let trough_passed = !state.moving_up && value > state.last_value;
            let crest_passed = state.moving_up && value < state.last_value;

            if trough_passed || crest_passed {
                next.delta = (state.peak_value - state.last_value).abs();
                next.peak_value = state.last_value;
                next.moving_up = trough_passed;
            }
        }

        next.is_shaking = self.thresholds.classify(state.is_shaking, next.delta);
        next.last_value = value;
        next
    }

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::PeakToPeak
    }
}

/// Build the strategy a config selects.
pub fn classifier_for(config: &ShakeConfig) -> Box<dyn ShakeClassifier> {
    let thresholds = Thresholds::from_config(config);
    match config.classifier {
        ClassifierKind::Difference => Box::new(DifferenceClassifier::new(thresholds)),
        ClassifierKind::PeakToPeak => {
            Box::new(PeakToPeakClassifier::new(thresholds, config.dead_zone))
        }
    }
}

/// Stateful shake detector driving one classifier.
pub struct ShakeDetector {
    classifier: Box<dyn ShakeClassifier>,
    state: DetectorState,
}

impl ShakeDetector {
    /// Create a detector around an explicit strategy.
    pub fn new(classifier: Box<dyn ShakeClassifier>) -> Self {
        Self {
            classifier,
            state: DetectorState::default(),
        }
    }

    /// Create a detector with the strategy and thresholds from `config`.
    pub fn from_config(config: &ShakeConfig) -> Self {
        Self::new(classifier_for(config))
    }

    /// Feed one sample value. Must be called in arrival order.
    pub fn update(&mut self, value: f32) -> DetectorOutput {
        if !value.is_finite() {
            trace!(value, "non-finite sample");
        }

        let was_shaking = self.state.is_shaking;
        self.state = self.classifier.step(&self.state, value);
        let edge = ShakeEdge::between(was_shaking, self.state.is_shaking);

        match edge {
            ShakeEdge::Started => debug!(delta = self.state.delta, "shake started"),
            ShakeEdge::Ended => debug!(delta = self.state.delta, "shake ended"),
            ShakeEdge::None => {}
        }

        DetectorOutput {
            delta: self.state.delta,
            is_shaking: self.state.is_shaking,
            edge,
        }
    }

    /// Current detector state.
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn is_shaking(&self) -> bool {
        self.state.is_shaking
    }

    pub fn kind(&self) -> ClassifierKind {
        self.classifier.kind()
    }

    /// Forget all history (new session).
    pub fn reset(&mut self) {
        self.state = DetectorState::default();
    }
}
