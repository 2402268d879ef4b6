//! Playback session: timer-driven steps from a source into the dashboard
//!
//! Each tick polls the reading source, advances every view and, while a
//! recorder is open, writes the composited frame. Starting playback opens the
//! recorder; if that fails the session keeps playing without recording.

use crate::core_types::Sensitivity;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::export::FrameRecorder;
use crate::history::ForceSample;
use crate::playback::{Playback, PlaybackState};
use crate::profiler::{FrameTimer, ProfilerScope};
use crate::source::ReadingSource;
use std::time::Duration;
use tracing::{error, info, warn};

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub timestamp: f64,
    pub sample: ForceSample,
    /// A frame went to the recorder
    pub recorded: bool,
}

pub struct Session<S: ReadingSource> {
    dashboard: Dashboard,
    playback: Playback,
    source: S,
    recorder: Option<Box<dyn FrameRecorder>>,
    sensitivity: Sensitivity,
    timer: FrameTimer,
}

impl<S: ReadingSource> Session<S> {
    pub fn new(dashboard: Dashboard, playback: Playback, source: S) -> Self {
        let sensitivity = dashboard.config().sensitivity();
        Self {
            dashboard,
            playback,
            source,
            recorder: None,
            sensitivity,
            timer: FrameTimer::new(),
        }
    }

    /// Record composited frames while playing
    pub fn with_recorder(mut self, recorder: Box<dyn FrameRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn interval(&self) -> Duration {
        self.playback.interval()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.as_ref().is_some_and(|r| r.is_open())
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        if !sensitivity.is_usable() {
            warn!(
                "Sensitivity {} is not positive; cells will render grey",
                sensitivity
            );
        }
        self.sensitivity = sensitivity;
    }

    /// Play or pause
    ///
    /// Starting playback opens the recorder if one is attached and closed. A
    /// recorder that fails to open is logged and playback goes on unrecorded.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::NoTimestamps`](crate::VizError::NoTimestamps) when
    /// there is nothing to play.
    pub fn toggle(&mut self) -> Result<PlaybackState> {
        let state = self.playback.toggle()?;
        if state == PlaybackState::Playing {
            self.open_recorder();
        }
        Ok(state)
    }

    fn open_recorder(&mut self) {
        let (width, height) = self.dashboard.config().canvas();
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        if recorder.is_open() {
            return;
        }
        if let Err(e) = recorder.open(width, height) {
            error!("Could not open frame recorder: {}", e);
        }
    }

    /// One timer tick; `None` when paused or the timeline is empty
    pub fn tick(&mut self) -> Option<StepReport> {
        if !self.playback.is_playing() {
            return None;
        }
        self.step()
    }

    /// Advance one step regardless of the play state
    pub fn step(&mut self) -> Option<StepReport> {
        let scope = ProfilerScope::new("animation_step");
        let timestamp = self.playback.advance()?;

        let readings = if self.source.is_running() {
            self.source.latest_readings()
        } else {
            None
        };
        let sample = self
            .dashboard
            .update_views(timestamp, readings.as_deref(), self.sensitivity);

        let recorded = self.record_frame();
        self.timer.record(scope.elapsed_ms());
        Some(StepReport {
            timestamp,
            sample,
            recorded,
        })
    }

    fn record_frame(&mut self) -> bool {
        let Some(recorder) = self.recorder.as_mut().filter(|r| r.is_open()) else {
            return false;
        };
        let frame = self.dashboard.compose_frame();
        match recorder.write_frame(&frame) {
            Ok(()) => true,
            Err(e) => {
                error!("Dropping frame: {}", e);
                false
            }
        }
    }

    /// Stop playback, release the recorder and disconnect the source
    pub fn close(&mut self) {
        self.playback.pause();
        if let Some(recorder) = self.recorder.as_mut() {
            if recorder.is_open() {
                info!(
                    "Releasing frame recorder ({} frames)",
                    recorder.frames_written()
                );
                recorder.release();
            }
        }
        if self.source.is_running() {
            self.source.disconnect();
        }
    }
}

impl<S: ReadingSource> Drop for Session<S> {
    fn drop(&mut self) {
        self.close();
    }
}
