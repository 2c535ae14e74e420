//! End-to-end tests for the shake session.
//! Feeds realistic and adversarial sample streams through the full flow
//! (chart, detector, tracker, store, notifier) and checks the guarantees a
//! host relies on.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::config::{ClassifierKind, CommitPolicy, ShakeConfig};
use crate::notify::NotificationTray;
use crate::persistence::{HighscoreStore, JsonFileStore, MemoryStore};
use crate::session::ShakeSession;
use crate::source::ReplaySource;
use crate::types::{SessionStats, SessionUpdate, ShakeEdge};

/// Helper: active session over an in-memory store.
fn memory_session(config: ShakeConfig) -> ShakeSession<MemoryStore, NotificationTray> {
    let mut session = ShakeSession::new(config, MemoryStore::new(), NotificationTray::new())
        .expect("valid config");
    session.activate();
    session
}

/// Helper: push X values with gravity on Z.
fn feed<S: HighscoreStore>(
    session: &mut ShakeSession<S, NotificationTray>,
    xs: &[f32],
) -> Vec<SessionUpdate> {
    xs.iter()
        .filter_map(|&x| session.on_sensor_event([x, 0.3, 9.7]))
        .collect()
}

/// Helper: a vigorous shake of `swings` alternating samples at ±amplitude,
/// followed by `rest` still samples.
fn shake_profile(amplitude: f32, swings: usize, rest: usize) -> Vec<f32> {
    let mut xs = Vec::with_capacity(swings + rest);
    for i in 0..swings {
        xs.push(if i % 2 == 0 { amplitude } else { -amplitude });
    }
    let last = xs.last().copied().unwrap_or(0.0);
    xs.extend(std::iter::repeat(last).take(rest));
    xs
}

#[test]
fn test_spike_scenario_follows_branch_order() {
    let mut session = memory_session(ShakeConfig::default());
    let updates = feed(&mut session, &[0.0, 0.0, 60.0, 60.0, 5.0]);

    let deltas: Vec<f32> = updates.iter().map(|u| u.delta).collect();
    assert_eq!(deltas, vec![0.0, 0.0, 60.0, 0.0, 55.0]);

    // The flat sample after the spike drops below the continuation
    // threshold, which ends the shake before the second spike restarts it.
    let shaking: Vec<bool> = updates.iter().map(|u| u.is_shaking).collect();
    assert_eq!(shaking, vec![false, false, true, false, true]);

    let scores: Vec<u64> = updates.iter().map(|u| u.score).collect();
    assert_eq!(scores, vec![0, 0, 60, 0, 55]);
    assert_eq!(session.highscore(), 60);
}

#[test]
fn test_sustained_shake_accumulates_until_it_ends() {
    let mut session = memory_session(ShakeConfig::default());
    // 0 → 60 → 0 → 60 → 0: every delta is 60
    let updates = feed(&mut session, &[60.0, 0.0, 60.0, 0.0, 0.0]);

    let scores: Vec<u64> = updates.iter().map(|u| u.score).collect();
    assert_eq!(scores, vec![60, 120, 180, 240, 0]);
    assert_eq!(updates[4].edge, ShakeEdge::Ended);
    assert!(updates[4].new_highscore);
    assert_eq!(session.highscore(), 240);
}

#[test]
fn test_highscore_survives_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared_prefs.json");

    // First session: no stored value, reaches 42 then stops shaking
    {
        let config = ShakeConfig {
            shake_intensity: 20.0,
            ..Default::default()
        };
        let store = JsonFileStore::open(&path).unwrap();
        let mut session = ShakeSession::new(config, store, NotificationTray::new()).unwrap();
        assert_eq!(session.highscore(), 0);
        session.activate();

        feed(&mut session, &[21.0, 0.0, 0.0]);
        assert_eq!(session.highscore(), 42);
        assert_eq!(session.notifier().len(), 1);
    }

    // Second session reads 42 before any sample arrives
    let store = JsonFileStore::open(&path).unwrap();
    let session = ShakeSession::new(ShakeConfig::default(), store, NotificationTray::new()).unwrap();
    assert_eq!(session.highscore(), 42);
    assert_eq!(session.stats(), SessionStats::default());
}

#[test]
fn test_reset_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared_prefs.json");

    {
        let mut session =
            ShakeSession::new(ShakeConfig::default(), JsonFileStore::open(&path).unwrap(), NotificationTray::new())
                .unwrap();
        session.activate();
        feed(&mut session, &[60.0, 0.0, 0.0]);
        assert_eq!(session.highscore(), 120);
        session.reset_highscore();
    }

    let session =
        ShakeSession::new(ShakeConfig::default(), JsonFileStore::open(&path).unwrap(), NotificationTray::new())
            .unwrap();
    assert_eq!(session.highscore(), 0);
}

#[test]
fn test_sign_of_signal_does_not_matter() {
    let positive = shake_profile(40.0, 20, 5);
    let negative: Vec<f32> = positive.iter().map(|x| -x).collect();

    let mut a = memory_session(ShakeConfig::default());
    let mut b = memory_session(ShakeConfig::default());
    let ua = feed(&mut a, &positive);
    let ub = feed(&mut b, &negative);

    let sa: Vec<bool> = ua.iter().map(|u| u.is_shaking).collect();
    let sb: Vec<bool> = ub.iter().map(|u| u.is_shaking).collect();
    assert_eq!(sa, sb);
    assert_eq!(a.highscore(), b.highscore());
    assert!(a.highscore() > 0);
}

#[test]
fn test_gentle_motion_never_scores() {
    let mut session = memory_session(ShakeConfig::default());
    let xs: Vec<f32> = (0..200).map(|i| (i as f32 * 0.3).sin() * 8.0).collect();
    let updates = feed(&mut session, &xs);

    assert!(updates.iter().all(|u| !u.is_shaking));
    assert_eq!(session.highscore(), 0);
    assert!(session.notifier().is_empty());
}

#[test]
fn test_peak_to_peak_session() {
    let config = ShakeConfig {
        classifier: ClassifierKind::PeakToPeak,
        shake_intensity: 20.0,
        ..Default::default()
    };
    let mut session = memory_session(config);

    // Shake around ±15, then settle with tiny wobbles. The last reversal
    // measures 14.5 → 14.2, well under the continuation threshold.
    let mut xs = shake_profile(15.0, 12, 0);
    xs.extend([14.0, 14.5, 14.2, 14.4]);
    let updates = feed(&mut session, &xs);

    assert!(updates.iter().any(|u| u.edge == ShakeEdge::Started));
    assert!(updates.iter().any(|u| u.edge == ShakeEdge::Ended));
    assert!(session.highscore() > 0);
    assert!(!session.is_shaking());
}

#[test]
fn test_commit_policies_agree_on_final_highscore() {
    let xs = shake_profile(35.0, 30, 4);

    let mut on_end = memory_session(ShakeConfig::default());
    let mut every = memory_session(ShakeConfig {
        commit_policy: CommitPolicy::EverySample,
        ..Default::default()
    });
    feed(&mut on_end, &xs);
    feed(&mut every, &xs);

    assert_eq!(on_end.highscore(), every.highscore());
    assert_eq!(on_end.notifier().delivered(), 1);
    assert!(every.notifier().delivered() > 1);
}

#[test]
fn test_replay_recording_end_to_end() {
    let recording = "# x,y,z\n0,0,9.8\n60,0,9.8\n0,0,9.8\n0,0,9.8\n";
    let mut source = ReplaySource::parse(recording).unwrap();
    let mut session =
        ShakeSession::new(ShakeConfig::default(), MemoryStore::new(), NotificationTray::new()).unwrap();

    session.resume(&mut source).unwrap();
    let updates = session.drain(&mut source);
    session.pause(&mut source);

    assert_eq!(updates.len(), 4);
    assert_eq!(session.highscore(), 120);
    assert_eq!(session.store().read_int("highscore", 0), 120);
    assert_eq!(session.chart().len(), 4);
}

#[test]
fn test_pause_in_the_middle_of_a_recording() {
    let mut source = ReplaySource::from_x_values(&[0.0, 60.0, 0.0, 0.0]);
    let mut session =
        ShakeSession::new(ShakeConfig::default(), MemoryStore::new(), NotificationTray::new()).unwrap();

    session.resume(&mut source).unwrap();
    let first = session.on_sensor_event([0.0, 0.0, 0.0]);
    assert!(first.is_some());
    session.pause(&mut source);
    assert!(session.drain(&mut source).is_empty());
    assert_eq!(source.remaining(), 4);

    session.resume(&mut source).unwrap();
    assert_eq!(session.drain(&mut source).len(), 4);
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn arb_config() -> impl Strategy<Value = ShakeConfig> {
    (
        prop_oneof![Just(ClassifierKind::Difference), Just(ClassifierKind::PeakToPeak)],
        prop_oneof![Just(CommitPolicy::OnShakeEnd), Just(CommitPolicy::EverySample)],
        10.0f32..60.0,
    )
        .prop_map(|(classifier, commit_policy, shake_intensity)| ShakeConfig {
            classifier,
            commit_policy,
            shake_intensity,
            sampling_interval_us: 100_000,
            display_period_s: 3,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn prop_onset_above_intensity(config in arb_config(), xs in prop::collection::vec(-80.0f32..80.0, 1..200)) {
        let intensity = config.shake_intensity;
        let mut session = memory_session(config);
        for update in feed(&mut session, &xs) {
            if update.delta > intensity {
                prop_assert!(update.is_shaking);
            }
        }
    }

    #[test]
    fn prop_score_zero_when_not_shaking(config in arb_config(), xs in prop::collection::vec(-80.0f32..80.0, 1..200)) {
        let mut session = memory_session(config);
        for update in feed(&mut session, &xs) {
            if !update.is_shaking {
                prop_assert_eq!(update.score, 0);
            }
        }
    }

    #[test]
    fn prop_highscore_never_decreases(config in arb_config(), start in 0u64..500, xs in prop::collection::vec(-80.0f32..80.0, 1..200)) {
        let mut store = MemoryStore::new();
        store.write_int("highscore", start as i64).unwrap();
        let mut session = ShakeSession::new(config, store, NotificationTray::new()).unwrap();
        session.activate();

        let mut previous = start;
        for update in feed(&mut session, &xs) {
            prop_assert!(update.highscore >= previous);
            if update.new_highscore {
                prop_assert!(update.highscore > previous);
            }
            previous = update.highscore;
        }
        prop_assert_eq!(session.store().read_int("highscore", 0), if session.stats().commits > 0 { previous as i64 } else { start as i64 });
    }

    #[test]
    fn prop_chart_bounded_and_newest_present(config in arb_config(), xs in prop::collection::vec(-80.0f32..80.0, 1..200)) {
        let limit = config.chart_entries_limit();
        let mut session = memory_session(config);
        let updates = feed(&mut session, &xs);

        prop_assert!(session.chart().len() <= limit);
        prop_assert_eq!(session.chart().len(), xs.len().min(limit));
        prop_assert_eq!(session.chart().newest().map(|e| e.index), updates.last().map(|u| u.index));
        prop_assert_eq!(session.chart().newest().map(|e| e.value), xs.last().copied());
    }
}
