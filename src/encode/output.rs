use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::raster::FrameRGBA;

/// Destination of rendered frames.
///
/// Frames may arrive from several threads and in any order; each index is written at most once.
pub trait FrameOutput: Sync {
    /// Store frame `idx`.
    fn write_frame(&self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()>;
}

/// File name of frame `idx` in a PNG sequence.
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("frame_{:05}.png", idx.0)
}

/// `printf`-style pattern matching [`frame_file_name`], for ffmpeg image sequence input.
pub const FRAME_FILE_PATTERN: &str = "frame_%05d.png";

/// Encode `frame` as a straight-alpha PNG at `path`.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> ReelResult<()> {
    let rgba = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ReelError::output(format!("write '{}': {e}", path.display())))
}

/// Writes `frame_%05d.png` files into one directory.
#[derive(Clone, Debug)]
pub struct PngSequenceOutput {
    dir: PathBuf,
}

impl PngSequenceOutput {
    /// Output into `dir`, creating it when missing.
    pub fn create(dir: impl Into<PathBuf>) -> ReelResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frames directory '{}'", dir.display()))
            .map_err(|e| ReelError::output(format!("{e:#}")))?;
        Ok(Self { dir })
    }

    /// Directory holding the sequence.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(frame_file_name(idx))
    }
}

impl FrameOutput for PngSequenceOutput {
    fn write_frame(&self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        write_png(&self.frame_path(idx), frame)
    }
}

/// Keeps frames in memory, keyed by index.
#[derive(Debug, Default)]
pub struct InMemoryOutput {
    frames: Mutex<BTreeMap<u64, FrameRGBA>>,
}

impl InMemoryOutput {
    /// Empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured frames in index order.
    pub fn frames(&self) -> Vec<(FrameIndex, FrameRGBA)> {
        let frames = self.frames.lock().unwrap_or_else(|e| e.into_inner());
        frames
            .iter()
            .map(|(&i, f)| (FrameIndex(i), f.clone()))
            .collect()
    }

    /// Frame `idx`, if it was written.
    pub fn get(&self, idx: FrameIndex) -> Option<FrameRGBA> {
        let frames = self.frames.lock().unwrap_or_else(|e| e.into_inner());
        frames.get(&idx.0).cloned()
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// `true` when nothing was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameOutput for InMemoryOutput {
    fn write_frame(&self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| ReelError::output("in-memory frame store is poisoned"))?;
        frames.insert(idx.0, frame.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
