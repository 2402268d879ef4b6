//! Rolling window of whole-sheet force statistics
//!
//! Each animation step reduces the reading sequence to a [`ForceSample`]. The
//! window backs the time-series graph underneath the views.

use crate::core_types::Force;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Samples kept when no capacity is configured (one minute at 10 fps)
pub const DEFAULT_HISTORY_CAPACITY: usize = 600;

/// Summary of one step's readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSample {
    pub timestamp: f64,
    /// Sum of all finite, non-negative readings
    pub total: Force,
    /// Largest finite reading, floored at zero
    pub peak: Force,
    /// Readings strictly above the active threshold
    pub active: usize,
}

impl ForceSample {
    pub fn from_readings(timestamp: f64, readings: &[f64], active_threshold: f64) -> Self {
        let finite = readings.iter().copied().filter(|v| v.is_finite());
        let (total, peak, active) = finite.fold((0.0, 0.0_f64, 0), |(sum, peak, active), v| {
            (
                sum + v.max(0.0),
                peak.max(v),
                active + usize::from(v > active_threshold),
            )
        });
        Self {
            timestamp,
            total: Force::new(total),
            peak: Force::new(peak),
            active,
        }
    }

    /// Sample for a step with no data
    pub fn empty(timestamp: f64) -> Self {
        Self {
            timestamp,
            total: Force::ZERO,
            peak: Force::ZERO,
            active: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceHistory {
    capacity: usize,
    samples: VecDeque<ForceSample>,
    /// Timestamp highlighted on the graph
    indicator: Option<f64>,
}

impl ForceHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
            indicator: None,
        }
    }

    /// Append a sample for this step, evicting the oldest when full
    ///
    /// A timestamp earlier than the newest sample means the timeline looped;
    /// the window restarts so the graph only ever covers one pass. The time
    /// indicator follows the newest sample.
    pub fn record(
        &mut self,
        timestamp: f64,
        readings: Option<&[f64]>,
        active_threshold: f64,
    ) -> ForceSample {
        let sample = match readings {
            Some(values) => ForceSample::from_readings(timestamp, values, active_threshold),
            None => ForceSample::empty(timestamp),
        };
        if self.latest().is_some_and(|last| timestamp < last.timestamp) {
            debug!("Timeline looped at t={:.1}s, restarting force history", timestamp);
            self.samples.clear();
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.indicator = Some(timestamp);
        sample
    }

    pub fn latest(&self) -> Option<&ForceSample> {
        self.samples.back()
    }

    pub fn samples(&self) -> impl Iterator<Item = &ForceSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn indicator(&self) -> Option<f64> {
        self.indicator
    }

    pub fn set_indicator(&mut self, timestamp: f64) {
        self.indicator = Some(timestamp);
    }

    /// `(timestamp, total)` pairs for plotting
    pub fn total_series(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.timestamp, *s.total)).collect()
    }

    /// `(timestamp, peak)` pairs for plotting
    pub fn peak_series(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.timestamp, *s.peak)).collect()
    }

    /// Earliest and latest timestamp in the window, `None` while empty
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        let first = self.samples.front()?.timestamp;
        Some(self.samples.iter().fold((first, first), |(lo, hi), s| {
            (lo.min(s.timestamp), hi.max(s.timestamp))
        }))
    }

    /// Largest total in the window
    pub fn max_total(&self) -> Force {
        self.samples.iter().map(|s| s.total).max().unwrap_or(Force::ZERO)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.indicator = None;
    }
}

impl Default for ForceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_statistics() {
        let s = ForceSample::from_readings(0.5, &[0.0, 10.0, 3.0, f64::NAN, -2.0, 800.0], 5.0);
        assert_eq!(*s.total, 813.0);
        assert_eq!(*s.peak, 800.0);
        assert_eq!(s.active, 2);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut history = ForceHistory::new(3);
        for i in 0..5 {
            history.record(f64::from(i) * 0.1, Some(&[f64::from(i)]), 5.0);
        }
        assert_eq!(history.len(), 3);
        let (start, end) = history.time_bounds().unwrap();
        assert!((start - 0.2).abs() < 1e-9);
        assert!((end - 0.4).abs() < 1e-9);
        assert_eq!(*history.max_total(), 4.0);
    }

    #[test]
    fn test_missing_readings_record_empty_sample() {
        let mut history = ForceHistory::default();
        let sample = history.record(1.0, None, 5.0);
        assert_eq!(sample, ForceSample::empty(1.0));
        assert_eq!(history.indicator(), Some(1.0));
    }

    #[test]
    fn test_series_follow_samples() {
        let mut history = ForceHistory::new(10);
        history.record(0.0, Some(&[1.0, 2.0]), 5.0);
        history.record(0.1, Some(&[6.0]), 5.0);
        assert_eq!(history.total_series(), vec![(0.0, 3.0), (0.1, 6.0)]);
        assert_eq!(history.peak_series(), vec![(0.0, 2.0), (0.1, 6.0)]);
        history.clear();
        assert!(history.is_empty());
        assert!(history.indicator().is_none());
    }

    #[test]
    fn test_looped_timeline_restarts_window() {
        let mut history = ForceHistory::new(100);
        for i in 0..30 {
            history.record(f64::from(i) * 0.1, Some(&[100.0]), 5.0);
        }
        assert_eq!(history.len(), 30);

        history.record(0.0, Some(&[50.0]), 5.0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.time_bounds(), Some((0.0, 0.0)));
        assert_eq!(*history.max_total(), 50.0);

        history.record(0.1, Some(&[60.0]), 5.0);
        assert_eq!(history.time_bounds(), Some((0.0, 0.1)));
    }

    #[test]
    fn test_repeated_timestamp_keeps_window() {
        let mut history = ForceHistory::new(10);
        history.record(0.5, None, 5.0);
        history.record(0.5, None, 5.0);
        assert_eq!(history.len(), 2);
    }
}
