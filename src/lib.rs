//! ShakeIt Engine Library
//!
//! The shake detection and scoring core of the ShakeIt accelerometer game.
//! Raw accelerometer events go in; a shaking classification, a running
//! score, and a persisted high score come out.
//!
//! # Data Flow
//!
//! - **Sample source** delivers `[x, y, z]` events at a nominal 10 Hz.
//! - **Chart series** keeps a bounded window of the raw X signal.
//! - **Shake detector** thresholds a motion delta with hysteresis.
//! - **Score tracker** accumulates deltas while shaking and commits the
//!   high score, which is then persisted and announced.
//!
//! The detector and tracker are infallible state transitions. Only the
//! edges (configuration, persistence, recordings) return errors.
//!
//! # Example
//!
//! ```
//! use shakeit::{MemoryStore, NotificationTray, ShakeConfig, ShakeSession};
//!
//! let mut session =
//!     ShakeSession::new(ShakeConfig::default(), MemoryStore::new(), NotificationTray::new())?;
//! session.activate();
//!
//! for x in [0.0, 60.0, 0.0, 0.0] {
//!     session.on_sensor_event([x, 0.0, 9.81]);
//! }
//!
//! assert_eq!(session.highscore(), 120);
//! # Ok::<(), shakeit::ShakeError>(())
//! ```

pub mod chart;
pub mod config;
pub mod detection;
pub mod error;
pub mod ffi;
pub mod notify;
pub mod persistence;
pub mod scoring;
pub mod session;
pub mod source;
pub mod types;

#[cfg(test)]
mod integration_tests;

// Re-export commonly used types
pub use chart::{ChartEntry, ChartSeries, ChartSnapshot};
pub use config::{ClassifierKind, CommitPolicy, ShakeConfig};
pub use detection::{
    DifferenceClassifier, PeakToPeakClassifier, ShakeClassifier, ShakeDetector, Thresholds,
};
pub use error::{ShakeError, ShakeResult};
pub use notify::{LogNotifier, Notification, NotificationTray, Notifier};
pub use persistence::{HighscoreStore, JsonFileStore, MemoryStore};
pub use scoring::{ScoreState, ScoreTracker};
pub use session::ShakeSession;
pub use source::{ReplaySource, SampleSource};
pub use types::{
    AccelSample, Commit, DetectorOutput, DetectorState, SessionStats, SessionUpdate, ShakeEdge,
};
