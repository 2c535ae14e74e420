//! Engine configuration.
//!
//! Detector sensitivity was hand-tuned on-device more than once, so every
//! threshold lives here rather than in code. A config is built from defaults,
//! an optional JSON file, and `SHAKEIT_*` environment overrides, then
//! validated once before a session is created.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ShakeError, ShakeResult};

/// Largest chart window accepted (one hour of signal at 10 Hz).
pub const MAX_CHART_ENTRIES: usize = 36_000;

/// Which shake classification strategy a detector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Absolute difference between consecutive samples.
    #[default]
    Difference,
    /// Difference between consecutive local extrema.
    PeakToPeak,
}

impl std::str::FromStr for ClassifierKind {
    type Err = ShakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "difference" | "diff" => Ok(ClassifierKind::Difference),
            "peak_to_peak" | "peak-to-peak" | "peak" => Ok(ClassifierKind::PeakToPeak),
            other => Err(ShakeError::InvalidConfig(format!("unknown classifier '{other}'"))),
        }
    }
}

/// When the running score is compared against the high score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Once per shaking → not-shaking transition.
    #[default]
    OnShakeEnd,
    /// After every sample, so the high score tracks an in-progress shake.
    EverySample,
}

impl std::str::FromStr for CommitPolicy {
    type Err = ShakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on_shake_end" | "on-shake-end" | "end" => Ok(CommitPolicy::OnShakeEnd),
            "every_sample" | "every-sample" | "always" => Ok(CommitPolicy::EverySample),
            other => Err(ShakeError::InvalidConfig(format!("unknown commit policy '{other}'"))),
        }
    }
}

/// Configuration for a shake session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Classification strategy.
    pub classifier: ClassifierKind,

    /// Delta above which motion counts as shaking. Tuned between 20 and 50.
    pub shake_intensity: f32,

    /// Lower delta that keeps an ongoing shake alive (hysteresis).
    pub continuation_threshold: f32,

    /// Values within ±dead_zone are ignored for direction tracking
    /// (peak-to-peak strategy only).
    pub dead_zone: f32,

    /// High score commit policy.
    pub commit_policy: CommitPolicy,

    /// Sampling interval requested from the sample source, in microseconds.
    pub sampling_interval_us: u64,

    /// Seconds of signal kept in the chart window.
    pub display_period_s: u64,

    /// Persistence key of the high score record.
    pub highscore_key: String,

    /// Lower bound of the chart's value axis.
    pub chart_axis_floor: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::Difference,
            shake_intensity: 50.0,
            continuation_threshold: 5.0,
            dead_zone: 0.1,
            commit_policy: CommitPolicy::OnShakeEnd,
            sampling_interval_us: 100_000, // 10 Hz
            display_period_s: 30,
            highscore_key: "highscore".to_string(),
            chart_axis_floor: -10.0,
        }
    }
}

impl ShakeConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ShakeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> ShakeResult<Self> {
        let config: ShakeConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SHAKEIT_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> ShakeResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// rejected rather than ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> ShakeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SHAKEIT_SHAKE_INTENSITY") {
            self.shake_intensity = parse_f32("SHAKEIT_SHAKE_INTENSITY", &value)?;
        }
        if let Some(value) = lookup("SHAKEIT_CONTINUATION_THRESHOLD") {
            self.continuation_threshold = parse_f32("SHAKEIT_CONTINUATION_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("SHAKEIT_CLASSIFIER") {
            self.classifier = value.parse()?;
        }
        if let Some(value) = lookup("SHAKEIT_COMMIT_POLICY") {
            self.commit_policy = value.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the thresholds and timings describe a usable detector.
    pub fn validate(&self) -> ShakeResult<()> {
        if !self.shake_intensity.is_finite() || self.shake_intensity <= 0.0 {
            return Err(ShakeError::InvalidConfig(
                "shake_intensity must be a positive number".into(),
            ));
        }
        if !self.continuation_threshold.is_finite() || self.continuation_threshold < 0.0 {
            return Err(ShakeError::InvalidConfig(
                "continuation_threshold must be a non-negative number".into(),
            ));
        }
        if self.continuation_threshold >= self.shake_intensity {
            return Err(ShakeError::InvalidConfig(format!(
                "continuation_threshold ({}) must be below shake_intensity ({})",
                self.continuation_threshold, self.shake_intensity
            )));
        }
        if !self.dead_zone.is_finite() || self.dead_zone < 0.0 {
            return Err(ShakeError::InvalidConfig("dead_zone must be non-negative".into()));
        }
        if self.sampling_interval_us == 0 {
            return Err(ShakeError::InvalidConfig(
                "sampling_interval_us must be greater than zero".into(),
            ));
        }
        if self.display_period_s == 0 {
            return Err(ShakeError::InvalidConfig(
                "display_period_s must be greater than zero".into(),
            ));
        }
        match self.chart_window() {
            Some(entries) if entries <= MAX_CHART_ENTRIES => {}
            _ => {
                return Err(ShakeError::InvalidConfig(format!(
                    "display_period_s ({}) at {} samples/s exceeds the {MAX_CHART_ENTRIES} entry chart window",
                    self.display_period_s,
                    self.samples_per_second()
                )))
            }
        }
        if self.highscore_key.is_empty() {
            return Err(ShakeError::InvalidConfig("highscore_key must not be empty".into()));
        }
        Ok(())
    }

    /// Requested interval between samples.
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_micros(self.sampling_interval_us)
    }

    /// Nominal samples per second, at least one.
    pub fn samples_per_second(&self) -> u64 {
        (1_000_000 / self.sampling_interval_us).max(1)
    }

    /// Number of entries kept in the chart window (300 with the defaults),
    /// capped at `MAX_CHART_ENTRIES`.
    pub fn chart_entries_limit(&self) -> usize {
        self.chart_window().map_or(MAX_CHART_ENTRIES, |n| n.min(MAX_CHART_ENTRIES))
    }

    fn chart_window(&self) -> Option<usize> {
        let entries = self.samples_per_second().checked_mul(self.display_period_s)?;
        usize::try_from(entries).ok()
    }
}

fn parse_f32(key: &str, value: &str) -> ShakeResult<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|e| ShakeError::InvalidConfig(format!("{key}: {e}")))
}
