//! Frame sinks used while playback is running.

use super::raster::Frame;
use crate::error::{Result, VizError};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Destination for composited frames
///
/// A recorder is opened once with the canvas size, receives frames of exactly
/// that size, and is released when playback ends or the session closes.
pub trait FrameRecorder {
    /// Prepare the sink for frames of `width` x `height`; no-op if already open
    ///
    /// # Errors
    ///
    /// Returns an error when the sink cannot be created.
    fn open(&mut self, width: u32, height: u32) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Append one frame
    ///
    /// # Errors
    ///
    /// Returns [`VizError::RecorderClosed`] if not open,
    /// [`VizError::FrameSizeMismatch`] for a wrongly sized frame, or an I/O error.
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Close the sink; safe to call repeatedly
    fn release(&mut self);

    /// Frames written since the last open
    fn frames_written(&self) -> usize;
}

impl<R: FrameRecorder + ?Sized> FrameRecorder for Box<R> {
    fn open(&mut self, width: u32, height: u32) -> Result<()> {
        (**self).open(width, height)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        (**self).write_frame(frame)
    }

    fn release(&mut self) {
        (**self).release();
    }

    fn frames_written(&self) -> usize {
        (**self).frames_written()
    }
}

fn check_size(expected: Option<(u32, u32)>, frame: &Frame) -> Result<()> {
    let expected = expected.ok_or(VizError::RecorderClosed)?;
    if frame.dimensions() != expected {
        return Err(VizError::FrameSizeMismatch {
            expected,
            actual: frame.dimensions(),
        });
    }
    Ok(())
}

/// Numbered binary PPM files in one directory
///
/// Opening removes frames left over from a previous recording.
#[derive(Debug)]
pub struct ImageSequenceRecorder {
    dir: PathBuf,
    size: Option<(u32, u32)>,
    written: usize,
}

impl ImageSequenceRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            size: None,
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the `index`-th frame
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.ppm"))
    }

    fn is_frame_file(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.starts_with("frame_")
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"))
    }

    fn clear_stale_frames(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|e| VizError::io(&self.dir, e))?;
        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| VizError::io(&self.dir, e))?.path();
            if !Self::is_frame_file(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        Ok(removed)
    }
}

impl FrameRecorder for ImageSequenceRecorder {
    fn open(&mut self, width: u32, height: u32) -> Result<()> {
        if self.size.is_some() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|e| VizError::io(&self.dir, e))?;
        let removed = self.clear_stale_frames()?;
        if removed > 0 {
            info!("Removed {} stale frames from {}", removed, self.dir.display());
        }
        self.size = Some((width, height));
        self.written = 0;
        info!(
            "Frame recorder opened at {} ({}x{})",
            self.dir.display(),
            width,
            height
        );
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.size.is_some()
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        check_size(self.size, frame)?;
        let path = self.frame_path(self.written);
        let file = File::create(&path).map_err(|e| VizError::io(&path, e))?;
        frame
            .write_ppm(BufWriter::new(file))
            .map_err(|e| VizError::io(&path, e))?;
        self.written += 1;
        Ok(())
    }

    fn release(&mut self) {
        if self.size.take().is_some() {
            info!(
                "Frame recorder released after {} frames ({})",
                self.written,
                self.dir.display()
            );
        }
    }

    fn frames_written(&self) -> usize {
        self.written
    }
}

impl Drop for ImageSequenceRecorder {
    fn drop(&mut self) {
        self.release();
    }
}

/// Keeps frames in memory; for tests and for handing frames to another surface
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    size: Option<(u32, u32)>,
    frames: Vec<Frame>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl FrameRecorder for MemoryRecorder {
    fn open(&mut self, width: u32, height: u32) -> Result<()> {
        if self.size.is_none() {
            self.size = Some((width, height));
            self.frames.clear();
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.size.is_some()
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        check_size(self.size, frame)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn release(&mut self) {
        self.size = None;
    }

    fn frames_written(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Rgb;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "force-grid-recorder-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_memory_recorder_lifecycle() {
        let mut recorder = MemoryRecorder::new();
        let frame = Frame::new(4, 2, Rgb::WHITE);
        assert!(matches!(
            recorder.write_frame(&frame),
            Err(VizError::RecorderClosed)
        ));

        recorder.open(4, 2).unwrap();
        recorder.write_frame(&frame).unwrap();
        assert!(matches!(
            recorder.write_frame(&Frame::new(2, 2, Rgb::WHITE)),
            Err(VizError::FrameSizeMismatch { .. })
        ));
        assert_eq!(recorder.frames_written(), 1);

        recorder.release();
        recorder.release();
        assert!(!recorder.is_open());
        assert_eq!(recorder.take_frames().len(), 1);
    }

    #[test]
    fn test_sequence_writes_numbered_frames() {
        let dir = scratch_dir("numbered");
        let mut recorder = ImageSequenceRecorder::new(&dir);
        recorder.open(3, 3).unwrap();
        for _ in 0..3 {
            recorder.write_frame(&Frame::new(3, 3, Rgb::BLACK)).unwrap();
        }
        recorder.release();

        let bytes = fs::read(dir.join("frame_000002.ppm")).unwrap();
        assert!(bytes.starts_with(b"P6\n3 3\n255\n"));
        assert_eq!(recorder.frames_written(), 3);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_clears_stale_frames() {
        let dir = scratch_dir("stale");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("frame_000009.ppm"), b"old").unwrap();
        fs::write(dir.join("notes.txt"), b"keep").unwrap();

        let mut recorder = ImageSequenceRecorder::new(&dir);
        recorder.open(1, 1).unwrap();
        assert!(!dir.join("frame_000009.ppm").exists());
        assert!(dir.join("notes.txt").exists());
        recorder.release();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_fails_when_dir_is_a_file() {
        let path = scratch_dir("blocked");
        fs::write(&path, b"not a directory").unwrap();
        let mut recorder = ImageSequenceRecorder::new(&path);
        assert!(matches!(recorder.open(1, 1), Err(VizError::Io { .. })));
        assert!(!recorder.is_open());
        fs::remove_file(&path).unwrap();
    }
}
