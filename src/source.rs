//! Sample sources.
//!
//! A source delivers raw accelerometer events `[x, y, z]` at a best-effort
//! cadence once listening has started. On a device this is the platform
//! sensor service; `ReplaySource` serves a recording instead.
//!
//! Recording format: one sample per line, either a bare `x` or `x,y,z`
//! (commas or whitespace). Blank lines and `#` comments are skipped.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::{ShakeError, ShakeResult};

/// Delivers accelerometer events.
pub trait SampleSource {
    /// Begin delivering samples, requesting roughly one per `interval`.
    fn start_listening(&mut self, interval: Duration) -> ShakeResult<()>;

    /// Stop delivering samples.
    fn stop_listening(&mut self);

    /// Next pending event, if listening and one is available.
    fn poll(&mut self) -> Option<[f32; 3]>;

    fn is_listening(&self) -> bool;
}

/// Replays a fixed list of samples.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    pending: VecDeque<[f32; 3]>,
    listening: bool,
    requested_interval: Option<Duration>,
}

impl ReplaySource {
    pub fn new(samples: Vec<[f32; 3]>) -> Self {
        Self {
            pending: samples.into(),
            listening: false,
            requested_interval: None,
        }
    }

    /// Replay X-axis values only; Y and Z are zero.
    pub fn from_x_values(values: &[f32]) -> Self {
        Self::new(values.iter().map(|&x| [x, 0.0, 0.0]).collect())
    }

    /// Parse a recording.
    pub fn parse(raw: &str) -> ShakeResult<Self> {
        let mut samples = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            if let Some(sample) = parse_line(line, i + 1)? {
                samples.push(sample);
            }
        }
        Ok(Self::new(samples))
    }

    /// Load a recording from disk. A recording without samples means there
    /// is no accelerometer to listen to.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ShakeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let source = Self::parse(&raw)?;
        if source.remaining() == 0 {
            return Err(ShakeError::SourceUnavailable(format!(
                "{} contains no accelerometer samples",
                path.as_ref().display()
            )));
        }
        debug!(path = %path.as_ref().display(), samples = source.remaining(), "loaded recording");
        Ok(source)
    }

    /// Samples not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Interval requested by the last `start_listening`.
    pub fn requested_interval(&self) -> Option<Duration> {
        self.requested_interval
    }
}

impl SampleSource for ReplaySource {
    fn start_listening(&mut self, interval: Duration) -> ShakeResult<()> {
        self.listening = true;
        self.requested_interval = Some(interval);
        Ok(())
    }

    fn stop_listening(&mut self) {
        self.listening = false;
    }

    fn poll(&mut self) -> Option<[f32; 3]> {
        if !self.listening {
            return None;
        }
        self.pending.pop_front()
    }

    fn is_listening(&self) -> bool {
        self.listening
    }
}

fn parse_line(line: &str, line_no: usize) -> ShakeResult<Option<[f32; 3]>> {
    let content = line.split('#').next().unwrap_or("").trim();
    if content.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = content
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    let mut values = [0.0f32; 3];
    match fields.len() {
        1 | 3 => {
            for (slot, field) in values.iter_mut().zip(&fields) {
                *slot = field.parse::<f32>().map_err(|e| ShakeError::Parse {
                    line: line_no,
                    message: format!("'{field}': {e}"),
                })?;
            }
        }
        n => {
            return Err(ShakeError::Parse {
                line: line_no,
                message: format!("expected 1 or 3 values, found {n}"),
            })
        }
    }
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let raw = "# recorded at 10 Hz\n0.5\n\n1.0, 2.0, 3.0\n-4 5 6  # trailing comment\n";
        let mut source = ReplaySource::parse(raw).unwrap();
        assert_eq!(source.remaining(), 3);

        source.start_listening(Duration::from_millis(100)).unwrap();
        assert_eq!(source.poll(), Some([0.5, 0.0, 0.0]));
        assert_eq!(source.poll(), Some([1.0, 2.0, 3.0]));
        assert_eq!(source.poll(), Some([-4.0, 5.0, 6.0]));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = ReplaySource::parse("1.0\nabc\n").unwrap_err();
        assert!(matches!(err, ShakeError::Parse { line: 2, .. }));

        let err = ReplaySource::parse("1.0 2.0\n").unwrap_err();
        assert!(matches!(err, ShakeError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_poll_requires_listening() {
        let mut source = ReplaySource::from_x_values(&[1.0, 2.0]);
        assert_eq!(source.poll(), None);

        source.start_listening(Duration::from_micros(100_000)).unwrap();
        assert!(source.is_listening());
        assert_eq!(source.requested_interval(), Some(Duration::from_micros(100_000)));
        assert_eq!(source.poll(), Some([1.0, 0.0, 0.0]));

        source.stop_listening();
        assert_eq!(source.poll(), None);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_empty_recording_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "# nothing recorded\n").unwrap();
        assert!(matches!(
            ReplaySource::from_path(&path),
            Err(ShakeError::SourceUnavailable(_))
        ));
    }
}
