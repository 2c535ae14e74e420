//! Shake session: the complete per-sample flow.
//!
//! This module wires the engine together for one application session:
//! 1. **Chart**: every raw sample is appended to the bounded series
//! 2. **Detection**: the X axis runs through the configured classifier
//! 3. **Scoring**: the detector output feeds the score tracker
//! 4. **Commit**: a new high score is persisted and announced
//!
//! The high score is read from the store once, when the session is created,
//! so it is available before any sample arrives. Everything else is
//! discarded when the session is dropped.
//!
//! Single-threaded: all calls happen on whichever thread delivers sensor
//! events. Nothing blocks; store writes are a single integer.

use tracing::{debug, info, trace, warn};

use crate::chart::ChartSeries;
use crate::config::ShakeConfig;
use crate::detection::ShakeDetector;
use crate::error::ShakeResult;
use crate::notify::{Notification, Notifier};
use crate::persistence::HighscoreStore;
use crate::scoring::ScoreTracker;
use crate::source::SampleSource;
use crate::types::{AccelSample, SessionStats, SessionUpdate, ShakeEdge};

/// One live session over a store and a notifier.
pub struct ShakeSession<S: HighscoreStore, N: Notifier> {
    config: ShakeConfig,
    detector: ShakeDetector,
    tracker: ScoreTracker,
    chart: ChartSeries,
    store: S,
    notifier: N,
    next_index: u64,
    listening: bool,
    stats: SessionStats,
}

impl<S: HighscoreStore, N: Notifier> ShakeSession<S, N> {
    /// Create a session, loading the persisted high score (0 when absent).
    pub fn new(config: ShakeConfig, store: S, notifier: N) -> ShakeResult<Self> {
        config.validate()?;

        let stored = store.read_int(&config.highscore_key, 0);
        let highscore = u64::try_from(stored).unwrap_or(0);
        info!(
            highscore,
            classifier = ?config.classifier,
            policy = ?config.commit_policy,
            "session created"
        );

        Ok(Self {
            detector: ShakeDetector::from_config(&config),
            tracker: ScoreTracker::new(config.commit_policy, highscore),
            chart: ChartSeries::from_config(&config),
            config,
            store,
            notifier,
            next_index: 0,
            listening: false,
            stats: SessionStats::default(),
        })
    }

    /// Start listening to `source` at the configured sampling interval.
    pub fn resume<Src: SampleSource + ?Sized>(&mut self, source: &mut Src) -> ShakeResult<()> {
        source.start_listening(self.config.sampling_interval())?;
        self.activate();
        Ok(())
    }

    /// Stop listening to `source`.
    pub fn pause<Src: SampleSource + ?Sized>(&mut self, source: &mut Src) {
        source.stop_listening();
        self.deactivate();
    }

    /// Accept sensor events pushed by a host that owns the sensor itself.
    pub fn activate(&mut self) {
        if !self.listening {
            debug!("session listening");
        }
        self.listening = true;
    }

    /// Ignore sensor events until the next `activate`/`resume`.
    pub fn deactivate(&mut self) {
        if self.listening {
            debug!("session paused");
        }
        self.listening = false;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Process one raw sensor event. Returns `None` while paused.
    pub fn on_sensor_event(&mut self, values: [f32; 3]) -> Option<SessionUpdate> {
        if !self.listening {
            trace!("sample ignored while paused");
            return None;
        }

        self.next_index += 1;
        let sample = AccelSample::new(self.next_index, values);
        let value = sample.shake_value();
        trace!(index = sample.index, value, "sample");

        self.chart.append(sample.index, value);

        let output = self.detector.update(value);
        let commit = self.tracker.on_sample(&output);

        self.stats.samples += 1;
        if output.edge == ShakeEdge::Started {
            self.stats.shakes += 1;
        }
        if output.is_shaking {
            self.stats.best_score = self.stats.best_score.max(self.tracker.score());
        }

        if let Some(commit) = commit {
            self.stats.commits += 1;
            self.persist_highscore(commit.highscore);
            self.notifier
                .notify(&Notification::new_highscore(commit.highscore));
        }

        Some(SessionUpdate {
            index: sample.index,
            delta: output.delta,
            is_shaking: output.is_shaking,
            edge: output.edge,
            score: self.tracker.score(),
            highscore: self.tracker.highscore(),
            new_highscore: commit.is_some(),
        })
    }

    /// Poll `source` until it has nothing more to deliver.
    pub fn drain<Src: SampleSource + ?Sized>(&mut self, source: &mut Src) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while self.listening {
            match source.poll() {
                Some(values) => updates.extend(self.on_sensor_event(values)),
                None => break,
            }
        }
        updates
    }

    /// User-requested reset: clears and persists the high score. A failed
    /// write is logged, not returned.
    pub fn reset_highscore(&mut self) {
        if let Err(e) = self.try_reset_highscore() {
            warn!(error = %e, "failed to persist highscore reset");
        }
    }

    /// Like `reset_highscore`, for callers that must know the write landed.
    /// The in-memory high score is cleared either way.
    pub fn try_reset_highscore(&mut self) -> ShakeResult<()> {
        self.tracker.reset();
        self.store.write_int(&self.config.highscore_key, 0)
    }

    fn persist_highscore(&mut self, value: u64) {
        let value = i64::try_from(value).unwrap_or(i64::MAX);
        if let Err(e) = self.store.write_int(&self.config.highscore_key, value) {
            warn!(error = %e, value, "failed to persist highscore");
        }
    }

    pub fn score(&self) -> u64 {
        self.tracker.score()
    }

    pub fn highscore(&self) -> u64 {
        self.tracker.highscore()
    }

    pub fn is_shaking(&self) -> bool {
        self.detector.is_shaking()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
