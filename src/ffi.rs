//! C FFI Bindings for Mobile Hosts
//!
//! This module exposes the shake session to Android/iOS apps via C ABI.
//! The host owns the sensor, the chart view and the notification manager;
//! it pushes accelerometer events in and pulls display state out.
//!
//! Memory Safety:
//! - All returned owned strings must be freed with `shakeit_free_string()`
//! - The session instance must be freed with `shakeit_session_destroy()`
//! - NULL checks are performed on all inputs
//!
//! Thread Safety:
//! - The session is NOT thread-safe. Call it from the sensor callback thread.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use tracing::warn;

use crate::config::{ClassifierKind, CommitPolicy, ShakeConfig};
use crate::notify::NotificationTray;
use crate::persistence::{HighscoreStore, JsonFileStore, MemoryStore};
use crate::session::ShakeSession;
use crate::types::ShakeEdge;

// ============================================================================
// OPAQUE HANDLE TYPES
// ============================================================================

/// Opaque handle to a shake session.
pub struct ShakeItSession {
    session: ShakeSession<Box<dyn HighscoreStore>, NotificationTray>,
}

/// Result status codes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShakeItStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer provided.
    NullPointer = 1,
    /// Session is paused; the sample was ignored.
    NotListening = 2,
}

/// Output from a single sample.
#[repr(C)]
#[derive(Debug, Clone, Default)]
pub struct ShakeItSampleOutput {
    /// Sequence number of the sample within the session.
    pub index: u64,
    /// Motion delta used for thresholding.
    pub delta: f32,
    /// 1 while shaking, 0 otherwise.
    pub is_shaking: i32,
    /// 0 = no change, 1 = shake started, 2 = shake ended.
    pub edge: i32,
    /// Current score.
    pub score: u64,
    /// Current high score.
    pub highscore: u64,
    /// 1 if this sample committed a new high score.
    pub new_highscore: i32,
}

/// Configuration for a session.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ShakeItConfig {
    /// Onset threshold (0 = default).
    pub shake_intensity: f32,
    /// Continuation threshold (negative = default).
    pub continuation_threshold: f32,
    /// 0 = difference, 1 = peak-to-peak.
    pub classifier: i32,
    /// 0 = commit on shake end, 1 = commit every sample.
    pub commit_policy: i32,
    /// Sampling interval in microseconds (0 = default).
    pub sampling_interval_us: u64,
    /// High score file path (null-terminated). NULL keeps it in memory.
    pub store_path: *const c_char,
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

/// Create a new session. The persisted high score is loaded immediately.
///
/// # Safety
/// - `config` must be NULL or a valid pointer to ShakeItConfig.
/// - `config.store_path` must be NULL or a valid null-terminated C string.
/// - The returned pointer must be freed with `shakeit_session_destroy()`.
///
/// # Returns
/// - Pointer to ShakeItSession on success.
/// - NULL on invalid configuration or unreadable store.
#[no_mangle]
pub unsafe extern "C" fn shakeit_session_create(config: *const ShakeItConfig) -> *mut ShakeItSession {
    let (shake_config, store_path) = if config.is_null() {
        (ShakeConfig::default(), None)
    } else {
        let config = &*config;
        let store_path = if config.store_path.is_null() {
            None
        } else {
            match CStr::from_ptr(config.store_path).to_str() {
                Ok(s) => Some(s.to_string()),
                Err(_) => return ptr::null_mut(),
            }
        };
        match session_config(config) {
            Some(c) => (c, store_path),
            None => return ptr::null_mut(),
        }
    };

    let store: Box<dyn HighscoreStore> = match store_path {
        Some(path) => match JsonFileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!(error = %e, path = %path, "cannot open highscore store");
                return ptr::null_mut();
            }
        },
        None => Box::new(MemoryStore::new()),
    };

    match ShakeSession::new(shake_config, store, NotificationTray::new()) {
        Ok(session) => Box::into_raw(Box::new(ShakeItSession { session })),
        Err(e) => {
            warn!(error = %e, "cannot create session");
            ptr::null_mut()
        }
    }
}

fn session_config(config: &ShakeItConfig) -> Option<ShakeConfig> {
    let mut out = ShakeConfig::default();
    if config.shake_intensity != 0.0 {
        out.shake_intensity = config.shake_intensity;
    }
    if config.continuation_threshold >= 0.0 {
        out.continuation_threshold = config.continuation_threshold;
    }
    out.classifier = match config.classifier {
        0 => ClassifierKind::Difference,
        1 => ClassifierKind::PeakToPeak,
        _ => return None,
    };
    out.commit_policy = match config.commit_policy {
        0 => CommitPolicy::OnShakeEnd,
        1 => CommitPolicy::EverySample,
        _ => return None,
    };
    if config.sampling_interval_us > 0 {
        out.sampling_interval_us = config.sampling_interval_us;
    }
    out.validate().ok()?;
    Some(out)
}

/// Destroy a session.
///
/// # Safety
/// - `session` must be a valid pointer from `shakeit_session_create()`.
/// - Must not be called more than once for the same pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_session_destroy(session: *mut ShakeItSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Start accepting samples (host registered its sensor listener).
///
/// # Safety
/// - `session` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_session_resume(session: *mut ShakeItSession) -> ShakeItStatus {
    if session.is_null() {
        return ShakeItStatus::NullPointer;
    }
    (*session).session.activate();
    ShakeItStatus::Ok
}

/// Stop accepting samples (host unregistered its sensor listener).
///
/// # Safety
/// - `session` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_session_pause(session: *mut ShakeItSession) -> ShakeItStatus {
    if session.is_null() {
        return ShakeItStatus::NullPointer;
    }
    (*session).session.deactivate();
    ShakeItStatus::Ok
}

// ============================================================================
// SAMPLE PROCESSING
// ============================================================================

/// Process one accelerometer event.
///
/// # Safety
/// - `session` must be a valid pointer.
/// - `output` must be a valid pointer to receive results.
///
/// # Parameters
/// - `x/y/z`: Accelerometer readings in m/s². Only `x` is classified.
#[no_mangle]
pub unsafe extern "C" fn shakeit_process_sample(
    session: *mut ShakeItSession,
    x: f32,
    y: f32,
    z: f32,
    output: *mut ShakeItSampleOutput,
) -> ShakeItStatus {
    if session.is_null() || output.is_null() {
        return ShakeItStatus::NullPointer;
    }

    let session = &mut *session;
    let output = &mut *output;

    let Some(update) = session.session.on_sensor_event([x, y, z]) else {
        return ShakeItStatus::NotListening;
    };

    output.index = update.index;
    output.delta = update.delta;
    output.is_shaking = i32::from(update.is_shaking);
    output.edge = match update.edge {
        ShakeEdge::None => 0,
        ShakeEdge::Started => 1,
        ShakeEdge::Ended => 2,
    };
    output.score = update.score;
    output.highscore = update.highscore;
    output.new_highscore = i32::from(update.new_highscore);

    ShakeItStatus::Ok
}

/// Reset the high score to 0 and persist it.
///
/// # Safety
/// - `session` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_reset_highscore(session: *mut ShakeItSession) -> ShakeItStatus {
    if session.is_null() {
        return ShakeItStatus::NullPointer;
    }
    (*session).session.reset_highscore();
    ShakeItStatus::Ok
}

// ============================================================================
// STATUS QUERIES
// ============================================================================

/// Get the current high score. Returns -1 on NULL.
///
/// # Safety
/// - `session` must be NULL or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_get_highscore(session: *const ShakeItSession) -> i64 {
    if session.is_null() {
        return -1;
    }
    i64::try_from((*session).session.highscore()).unwrap_or(i64::MAX)
}

/// Get the current score. Returns -1 on NULL.
///
/// # Safety
/// - `session` must be NULL or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_get_score(session: *const ShakeItSession) -> i64 {
    if session.is_null() {
        return -1;
    }
    i64::try_from((*session).session.score()).unwrap_or(i64::MAX)
}

// ============================================================================
// JSON OUTPUT
// ============================================================================

/// Take the pending high score notification as JSON.
///
/// # Safety
/// - `session` must be a valid pointer.
///
/// # Returns
/// - JSON string (MUST be freed with `shakeit_free_string()`).
/// - NULL if nothing is pending.
#[no_mangle]
pub unsafe extern "C" fn shakeit_take_notification_json(session: *mut ShakeItSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    let session = &mut *session;
    match session.session.notifier_mut().pop() {
        Some(notification) => to_c_json(&notification),
        None => ptr::null_mut(),
    }
}

/// Get the chart window as JSON.
///
/// # Safety
/// - `session` must be a valid pointer.
///
/// # Returns
/// - JSON string (MUST be freed with `shakeit_free_string()`).
#[no_mangle]
pub unsafe extern "C" fn shakeit_chart_json(session: *const ShakeItSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    to_c_json(&(*session).session.chart().snapshot())
}

/// Get session statistics as JSON.
///
/// # Safety
/// - `session` must be a valid pointer.
///
/// # Returns
/// - JSON string (MUST be freed with `shakeit_free_string()`).
#[no_mangle]
pub unsafe extern "C" fn shakeit_stats_json(session: *const ShakeItSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    to_c_json(&(*session).session.stats())
}

fn to_c_json<T: serde::Serialize>(value: &T) -> *mut c_char {
    serde_json::to_string(value)
        .ok()
        .and_then(|json| CString::new(json).ok())
        .map_or(ptr::null_mut(), CString::into_raw)
}

/// Free a string returned by this library.
///
/// # Safety
/// - `ptr` must be a string returned by a `shakeit_*_json` function.
/// - Must not be called more than once for the same pointer.
#[no_mangle]
pub unsafe extern "C" fn shakeit_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Get the library version string.
///
/// # Returns
/// - Static string, do NOT free.
#[no_mangle]
pub extern "C" fn shakeit_version() -> *const c_char {
    static VERSION: &[u8] = concat!("shakeit-engine/", env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

// ============================================================================
// TESTS
// ============================================================================
