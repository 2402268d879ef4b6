//! Fixed-rate playback over a preloaded timeline.

use crate::error::{Result, VizError};
use std::time::Duration;
use tracing::{info, warn};

/// Steps per second when none is configured
pub const DEFAULT_FPS: u32 = 10;
/// Longest timeline [`Playback::from_duration`] builds (a day at 10 fps)
pub const MAX_TIMELINE_STEPS: usize = 864_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Paused,
    Playing,
}

/// Cursor over a list of timestamps, advanced once per tick
///
/// The index wraps to the start after the last timestamp so playback loops.
#[derive(Debug, Clone)]
pub struct Playback {
    timestamps: Vec<f64>,
    index: usize,
    fps: u32,
    state: PlaybackState,
}

impl Playback {
    pub fn new(timestamps: Vec<f64>, fps: u32) -> Self {
        Self {
            timestamps,
            index: 0,
            fps: fps.max(1),
            state: PlaybackState::Paused,
        }
    }

    /// Evenly spaced timeline covering `seconds` at `fps`
    ///
    /// Truncated to [`MAX_TIMELINE_STEPS`] timestamps.
    pub fn from_duration(seconds: f64, fps: u32) -> Self {
        let fps = fps.max(1);
        let requested = if seconds.is_finite() && seconds > 0.0 {
            (seconds * f64::from(fps)).ceil()
        } else {
            0.0
        };
        let steps = if requested > MAX_TIMELINE_STEPS as f64 {
            warn!(
                "{:.0}s at {} fps exceeds {} steps; timeline truncated",
                seconds, fps, MAX_TIMELINE_STEPS
            );
            MAX_TIMELINE_STEPS
        } else {
            requested as usize
        };
        let timestamps = (0..steps).map(|i| i as f64 / f64::from(fps)).collect();
        Self::new(timestamps, fps)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Timer period between steps (`1000 / fps` milliseconds)
    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(1000 / self.fps))
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Timestamp under the cursor
    pub fn current(&self) -> Option<f64> {
        self.timestamps.get(self.index).copied()
    }

    /// Flip between playing and paused, returning the new state
    ///
    /// # Errors
    ///
    /// Returns [`VizError::NoTimestamps`] when asked to play an empty timeline;
    /// the playback stays paused.
    pub fn toggle(&mut self) -> Result<PlaybackState> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                info!("Playback paused at step {}", self.index);
            }
            PlaybackState::Paused => {
                if self.timestamps.is_empty() {
                    return Err(VizError::NoTimestamps);
                }
                self.state = PlaybackState::Playing;
                info!("Playback started at {} FPS", self.fps);
            }
        }
        Ok(self.state)
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Timestamp for this tick, then move the cursor (wrapping)
    pub fn advance(&mut self) -> Option<f64> {
        let timestamp = self.current()?;
        self.index = (self.index + 1) % self.timestamps.len();
        Some(timestamp)
    }

    /// Move the cursor to `index`, wrapped into range
    pub fn seek(&mut self, index: usize) {
        if !self.timestamps.is_empty() {
            self.index = index % self.timestamps.len();
        }
    }
}
