//! Score tracking.
//!
//! Accumulates the detector's delta while the device is shaking and promotes
//! the result to the high score according to a `CommitPolicy`.
//!
//! The accumulator is kept as `f64` and only rounded down when read, so long
//! shakes do not compound per-sample truncation.
//!
//! Persistence and notification are not done here: a commit is returned to
//! the caller, which owns the store and the notifier.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CommitPolicy;
use crate::types::{Commit, DetectorOutput, ShakeEdge};

/// Running score and high score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    /// Sum of deltas over the current shake.
    pub accumulated: f64,
    /// Highest committed score.
    pub highscore: u64,
}

impl ScoreState {
    pub fn with_highscore(highscore: u64) -> Self {
        Self {
            accumulated: 0.0,
            highscore,
        }
    }

    /// Current score, rounded down.
    pub fn score(&self) -> u64 {
        if self.accumulated.is_finite() && self.accumulated > 0.0 {
            self.accumulated.floor() as u64
        } else {
            0
        }
    }
}

/// Accumulates scores and decides when a high score is committed.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    state: ScoreState,
    policy: CommitPolicy,
}

impl ScoreTracker {
    /// Create a tracker seeded with a previously persisted high score.
    pub fn new(policy: CommitPolicy, highscore: u64) -> Self {
        Self {
            state: ScoreState::with_highscore(highscore),
            policy,
        }
    }

    /// Apply one detector output.
    ///
    /// Order: accumulate while shaking, commit per policy (on the score
    /// reached before any reset), then reset the accumulator when not
    /// shaking. Returns the commit if this sample raised the high score.
    pub fn on_sample(&mut self, output: &DetectorOutput) -> Option<Commit> {
        if output.is_shaking && output.delta.is_finite() {
            self.state.accumulated += f64::from(output.delta);
        }

        let commit = match self.policy {
            CommitPolicy::OnShakeEnd if output.edge == ShakeEdge::Ended => self.commit_if_higher(),
            CommitPolicy::OnShakeEnd => None,
            CommitPolicy::EverySample => self.commit_if_higher(),
        };

        if !output.is_shaking {
            self.state.accumulated = 0.0;
        }

        commit
    }

    /// Promote the current score if it beats the high score.
    pub fn commit_if_higher(&mut self) -> Option<Commit> {
        let score = self.state.score();
        if score > self.state.highscore {
            let commit = Commit {
                highscore: score,
                previous: self.state.highscore,
            };
            self.state.highscore = score;
            info!(highscore = score, previous = commit.previous, "new highscore");
            Some(commit)
        } else {
            None
        }
    }

    /// Clear the high score. The running score is untouched.
    pub fn reset(&mut self) {
        info!(previous = self.state.highscore, "highscore reset");
        self.state.highscore = 0;
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn highscore(&self) -> u64 {
        self.state.highscore
    }
}
