//! Bounded chart series of the raw signal.
//!
//! Keeps the most recent samples for a live line chart. The window holds at
//! most `limit` entries (sampling rate × display period); when it overflows
//! the oldest entries are evicted first and the newest entry is always kept.
//!
//! The renderer itself lives on the host. This module owns the data it
//! draws and serializes a snapshot of it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::ShakeConfig;

/// One plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub index: u64,
    pub value: f32,
}

/// Serializable view of the series for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub label: String,
    pub limit: usize,
    pub axis_min: f32,
    pub axis_max: f32,
    pub entries: Vec<ChartEntry>,
}

/// FIFO window of chart entries.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    label: String,
    entries: VecDeque<ChartEntry>,
    limit: usize,
    axis_floor: f32,
}

impl ChartSeries {
    /// Create an empty series holding at most `limit` entries (minimum 1).
    pub fn new(label: &str, limit: usize, axis_floor: f32) -> Self {
        let limit = limit.max(1);
        Self {
            label: label.to_string(),
            entries: VecDeque::new(),
            limit,
            axis_floor,
        }
    }

    /// Series for the X axis sized from `config`.
    pub fn from_config(config: &ShakeConfig) -> Self {
        Self::new("x", config.chart_entries_limit(), config.chart_axis_floor)
    }

    /// Append a point and evict anything beyond the window.
    pub fn append(&mut self, index: u64, value: f32) {
        self.entries.push_back(ChartEntry { index, value });
        self.trim_to_window(self.limit);
    }

    /// Drop the oldest entries until at most `max_entries` remain.
    pub fn trim_to_window(&mut self, max_entries: usize) {
        while self.entries.len() > max_entries {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn oldest(&self) -> Option<&ChartEntry> {
        self.entries.front()
    }

    pub fn newest(&self) -> Option<&ChartEntry> {
        self.entries.back()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChartEntry> {
        self.entries.iter()
    }

    /// Value axis range. The lower bound never rises above the configured
    /// floor so a quiet signal does not fill the whole chart.
    pub fn axis_range(&self) -> (f32, f32) {
        let (min, max) = self
            .entries
            .iter()
            .filter(|e| e.value.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), e| {
                (lo.min(e.value), hi.max(e.value))
            });

        if min > max {
            return (self.axis_floor, self.axis_floor.max(0.0));
        }
        (min.min(self.axis_floor), max)
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        let (axis_min, axis_max) = self.axis_range();
        ChartSnapshot {
            label: self.label.clone(),
            limit: self.limit,
            axis_min,
            axis_max,
            entries: self.entries.iter().copied().collect(),
        }
    }
}
