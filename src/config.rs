//! Render job configuration.
//!
//! A [`RenderConfig`] is an explicit, immutable value passed to every stage. It can be loaded from
//! JSON (every field optional, unknown fields rejected) and overridden from the command line.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::fonts::FontSpec;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::driver::RenderThreading;

/// Visual constants: canvas size, colors, font sizes and stack spacing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Style {
    /// Output frame size.
    pub canvas: Canvas,
    /// Background color (straight RGBA8).
    pub background_rgba: [u8; 4],
    /// Prompt text color.
    pub text_rgba: [u8; 4],
    /// Loading indicator color.
    pub loading_rgba: [u8; 4],
    /// Title banner color.
    pub title_rgba: [u8; 4],
    /// Backdrop painted behind a drawing while its strokes are revealed.
    pub paper_rgba: [u8; 4],
    /// Prompt text size in pixels.
    pub text_size_px: f32,
    /// Loading indicator text size in pixels.
    pub loading_size_px: f32,
    /// Title text size in pixels.
    pub title_size_px: f32,
    /// Maximum width of a wrapped text line.
    pub text_max_width_px: u32,
    /// Padding around text blocks.
    pub text_padding_px: u32,
    /// Width every drawing is resized to.
    pub image_width_px: u32,
    /// Distance from the canvas top to the first stacked element.
    pub top_margin_px: u32,
    /// Space kept below the last stacked element.
    pub bottom_margin_px: u32,
    /// Gap between stacked elements.
    pub element_gap_px: u32,
    /// Additional gap above a loading indicator that follows another element.
    pub loading_extra_gap_px: u32,
    /// Distance from the canvas bottom to the title banner.
    pub title_bottom_margin_px: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1080,
                height: 1920,
            },
            background_rgba: [0, 0, 0, 255],
            text_rgba: [255, 255, 255, 255],
            loading_rgba: [255, 255, 0, 255],
            title_rgba: [255, 255, 255, 255],
            paper_rgba: [255, 255, 255, 255],
            text_size_px: 64.0,
            loading_size_px: 48.0,
            title_size_px: 80.0,
            text_max_width_px: 920,
            text_padding_px: 20,
            image_width_px: 800,
            top_margin_px: 160,
            bottom_margin_px: 120,
            element_gap_px: 40,
            loading_extra_gap_px: 30,
            title_bottom_margin_px: 220,
        }
    }
}

/// Parameters of one render job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Seconds of video per round.
    pub duration_per_round_secs: f64,
    /// Output frame rate.
    pub fps: u32,
    /// Output video path.
    pub output_path: PathBuf,
    /// Font selection.
    pub font: FontSpec,
    /// Render at most this many rounds.
    pub max_rounds: Option<usize>,
    /// Part number appended to the title banner.
    pub part_number: Option<u32>,
    /// Seconds the title banner stays on screen.
    pub title_secs: f64,
    /// Grayscale level below which a drawing pixel counts as ink.
    pub ink_threshold: u8,
    /// Frame rendering parallelism.
    pub threading: RenderThreading,
    /// Directory for the PNG frame sequence. A temporary directory is used when unset.
    pub frames_dir: Option<PathBuf>,
    /// Keep the frame sequence after encoding.
    pub keep_frames: bool,
    /// Directory with per-phase audio segments.
    pub audio_dir: Option<PathBuf>,
    /// Background music mixed under the whole video.
    pub music_path: Option<PathBuf>,
    /// Write the last title frame as a thumbnail next to the output.
    pub write_thumbnail: bool,
    /// Visual constants.
    pub style: Style,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            duration_per_round_secs: 3.0,
            fps: 30,
            output_path: PathBuf::from("pictionary.mp4"),
            font: FontSpec::Auto,
            max_rounds: None,
            part_number: None,
            title_secs: 3.0,
            ink_threshold: 80,
            threading: RenderThreading::default(),
            frames_dir: None,
            keep_frames: false,
            audio_dir: None,
            music_path: None,
            write_thumbnail: false,
            style: Style::default(),
        }
    }
}

impl RenderConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            ReelError::serde(format!("invalid config '{}': {e}", path.display()))
        })?;
        Ok(cfg)
    }

    /// Reject values no render job can run with.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration_per_round_secs.is_finite() || self.duration_per_round_secs <= 0.0 {
            return Err(ReelError::config(
                "duration_per_round_secs must be finite and > 0",
            ));
        }
        if self.fps == 0 {
            return Err(ReelError::config("fps must be > 0"));
        }
        if !self.title_secs.is_finite() || self.title_secs < 0.0 {
            return Err(ReelError::config("title_secs must be finite and >= 0"));
        }
        if self.max_rounds == Some(0) {
            return Err(ReelError::config("max_rounds must be >= 1 when set"));
        }
        if let Some(n) = self.threading.threads
            && n == 0
        {
            return Err(ReelError::config(
                "render threading 'threads' must be >= 1 when set",
            ));
        }

        let s = &self.style;
        if s.canvas.width == 0 || s.canvas.height == 0 {
            return Err(ReelError::config("canvas width/height must be non-zero"));
        }
        if s.canvas.width > u32::from(u16::MAX) || s.canvas.height > u32::from(u16::MAX) {
            return Err(ReelError::config("canvas width/height must fit in u16"));
        }
        for (name, size) in [
            ("text_size_px", s.text_size_px),
            ("loading_size_px", s.loading_size_px),
            ("title_size_px", s.title_size_px),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ReelError::config(format!("{name} must be finite and > 0")));
            }
        }
        if s.image_width_px == 0 || s.text_max_width_px == 0 {
            return Err(ReelError::config(
                "image_width_px and text_max_width_px must be non-zero",
            ));
        }
        Ok(())
    }

    /// Output frame rate.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::integer(self.fps)
    }

    /// Frame budget of one round, `round(duration * fps)`, at least one frame.
    pub fn frames_per_round(&self) -> ReelResult<u64> {
        Ok(self
            .fps()?
            .secs_to_frames_round(self.duration_per_round_secs)
            .max(1))
    }

    /// Number of initial frames that show the title banner.
    pub fn title_frames(&self) -> ReelResult<u64> {
        Ok(self.fps()?.secs_to_frames_round(self.title_secs))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
