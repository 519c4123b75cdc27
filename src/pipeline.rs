//! End-to-end render jobs.
//!
//! [`render_to_video`] runs the three stages of a job in order. Preprocessing builds the
//! immutable [`PreparedReel`], frame generation writes a PNG sequence, and encoding assembles the
//! optional audio track and invokes `ffmpeg`. Every failure is tagged with the stage it came from.

use std::path::{Path, PathBuf};

use crate::audio::cues::{assemble_track, build_cue_sheet, load_segments, mix_music};
use crate::audio::{MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo, write_f32le};
use crate::config::RenderConfig;
use crate::encode::ffmpeg::{
    AudioInputConfig, EncodeJob, EncodeProfile, encode_frames, ensure_parent_dir, is_ffmpeg_on_path,
};
use crate::encode::output::{PngSequenceOutput, write_png};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult, RenderStage};
use crate::prepare::PreparedReel;
use crate::render::compositor::FrameCompositor;
use crate::render::driver::{RenderStats, render_frames};
use crate::schedule::Timeline;
use crate::schedule::phase::{PhaseSpan, phase_spans};
use crate::session::Session;

/// Outcome of a finished render job.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderReport {
    /// Encoded video.
    pub output_path: PathBuf,
    /// Rounds in the video.
    pub rounds: usize,
    /// Frame generation statistics; failed frames are listed here.
    pub stats: RenderStats,
    /// Encoder input profile that succeeded.
    pub profile: EncodeProfile,
    /// Thumbnail written next to the video.
    pub thumbnail: Option<PathBuf>,
    /// Frame sequence directory, when it was kept.
    pub frames_dir: Option<PathBuf>,
    /// `true` when an audio track was muxed.
    pub audio: bool,
}

/// Render the session in `session_dir` to the MP4 at `cfg.output_path`.
pub fn render_to_video(cfg: &RenderConfig, session_dir: &Path) -> ReelResult<RenderReport> {
    staged(RenderStage::Preprocess, || cfg.validate())?;

    let reel = staged(RenderStage::Preprocess, || {
        let session = Session::load(session_dir, cfg.max_rounds)?;
        PreparedReel::prepare(&session, cfg)
    })?;
    if !is_ffmpeg_on_path() {
        return Err(ReelError::encode(
            "ffmpeg is required for MP4 rendering, but was not found on PATH",
        )
        .in_stage(RenderStage::Encoding));
    }
    let scroll = reel.scroll_plan();
    let timeline = *reel.timeline();

    let (frames_dir, temp_frames) = match &cfg.frames_dir {
        Some(dir) => (dir.clone(), false),
        None => (unique_temp_path("sketchreel_frames", ""), true),
    };
    let mut frames_guard = TempDirGuard(None);
    if temp_frames && !cfg.keep_frames {
        frames_guard.0 = Some(frames_dir.clone());
    }

    let (stats, thumbnail) = staged(RenderStage::FrameGeneration, || {
        let output = PngSequenceOutput::create(&frames_dir)?;
        let stats = render_frames(&reel, &scroll, &cfg.threading, &output)?;
        if stats.frames_rendered == 0 {
            return Err(ReelError::PartialFrames {
                succeeded: 0,
                total: stats.frames_total,
            });
        }

        let thumbnail = match timeline.thumbnail_frame() {
            Some(frame) if cfg.write_thumbnail => {
                let path = thumbnail_path(&cfg.output_path);
                ensure_parent_dir(&path)?;
                let rendered = FrameCompositor::new(&reel, &scroll).render_frame(frame)?;
                write_png(&path, &rendered)?;
                Some(path)
            }
            _ => None,
        };
        Ok((stats, thumbnail))
    })?;
    if stats.frames_failed > 0 {
        tracing::warn!(
            failed = stats.frames_failed,
            total = stats.frames_total,
            "some frames failed and are held from their neighbours"
        );
    }

    let mut audio_guard = TempFileGuard(None);
    let profile = staged(RenderStage::Encoding, || {
        let audio = match build_audio_track(cfg, &timeline)? {
            Some(track) => {
                let path = unique_temp_path("sketchreel_audio", ".f32le");
                write_f32le(&track, &path)?;
                audio_guard.0 = Some(path.clone());
                Some(AudioInputConfig {
                    path,
                    sample_rate: MIX_SAMPLE_RATE,
                    channels: MIX_CHANNELS,
                })
            }
            None => None,
        };
        let job = EncodeJob {
            frames_dir: frames_dir.clone(),
            total_frames: stats.frames_total,
            failed_frames: stats.failed_frames.clone(),
            fps: cfg.fps,
            out_path: cfg.output_path.clone(),
            audio,
        };
        let audio = job.audio.is_some();
        encode_frames(&job).map(|p| (p, audio))
    })?;
    drop(audio_guard);

    let kept = frames_guard.0.is_none();
    drop(frames_guard);

    Ok(RenderReport {
        output_path: cfg.output_path.clone(),
        rounds: timeline.total_rounds(),
        stats,
        profile: profile.0,
        thumbnail,
        frames_dir: kept.then_some(frames_dir),
        audio: profile.1,
    })
}

/// Render one frame of the session in `session_dir` to a PNG at `out_path`.
#[tracing::instrument(skip(cfg), fields(frame = frame.0))]
pub fn render_single_frame(
    cfg: &RenderConfig,
    session_dir: &Path,
    frame: FrameIndex,
    out_path: &Path,
) -> ReelResult<()> {
    let reel = staged(RenderStage::Preprocess, || {
        let session = Session::load(session_dir, cfg.max_rounds)?;
        PreparedReel::prepare(&session, cfg)
    })?;

    staged(RenderStage::FrameGeneration, || {
        let total = reel.timeline().total_frames();
        if frame.0 >= total {
            return Err(ReelError::config(format!(
                "frame {} is out of range; the video has {total} frames",
                frame.0
            )));
        }
        let scroll = reel.scroll_plan();
        let rendered = FrameCompositor::new(&reel, &scroll).render_frame(frame)?;
        ensure_parent_dir(out_path)?;
        write_png(out_path, &rendered)
    })
}

/// Phase layout of one round on the video timeline.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RoundTimeline {
    /// Round number, 1-based.
    pub index: u32,
    /// Prompt text.
    pub prompt: String,
    /// First global frame of the round.
    pub start_frame: u64,
    /// Phase spans in round-local frames.
    pub phases: Vec<PhaseSpan>,
}

/// Frame budget and per-round phase layout of a job.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TimelineReport {
    /// Output frame rate.
    pub fps: u32,
    /// Frames per round.
    pub frames_per_round: u64,
    /// Frames showing the title banner.
    pub title_frames: u64,
    /// Frames in the video.
    pub total_frames: u64,
    /// Rounds in order.
    pub rounds: Vec<RoundTimeline>,
}

/// Describe the timeline of `session` without rendering anything.
pub fn describe_timeline(cfg: &RenderConfig, session: &Session) -> ReelResult<TimelineReport> {
    cfg.validate()?;
    let rounds = match cfg.max_rounds {
        Some(n) => &session.rounds()[..n.min(session.total_rounds())],
        None => session.rounds(),
    };
    let timeline = Timeline::new(cfg.frames_per_round()?, rounds.len(), cfg.title_frames()?)?;
    let f = timeline.frames_per_round();

    Ok(TimelineReport {
        fps: cfg.fps,
        frames_per_round: f,
        title_frames: timeline.title_frames(),
        total_frames: timeline.total_frames(),
        rounds: rounds
            .iter()
            .enumerate()
            .map(|(i, r)| RoundTimeline {
                index: r.index,
                prompt: r.prompt.clone(),
                start_frame: i as u64 * f,
                phases: phase_spans(i, f).into_vec(),
            })
            .collect(),
    })
}

/// `<stem>_thumbnail.png` next to `output_path`.
pub fn thumbnail_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    output_path.with_file_name(format!("{stem}_thumbnail.png"))
}

fn build_audio_track(cfg: &RenderConfig, timeline: &Timeline) -> ReelResult<Option<Vec<f32>>> {
    if cfg.audio_dir.is_none() && cfg.music_path.is_none() {
        return Ok(None);
    }
    let fps = cfg.fps()?;
    let total_frames = timeline.total_frames();
    let mut track = None;

    if let Some(dir) = &cfg.audio_dir {
        let segments = load_segments(dir, MIX_SAMPLE_RATE)?;
        if !segments.is_empty() {
            let cues = build_cue_sheet(timeline);
            track = Some(assemble_track(
                &cues,
                &segments,
                fps,
                total_frames,
                MIX_SAMPLE_RATE,
            ));
        }
    }

    if let Some(path) = &cfg.music_path {
        match decode_audio_f32_stereo(path, MIX_SAMPLE_RATE) {
            Ok(music) => {
                let track = track.get_or_insert_with(|| {
                    assemble_track(&[], &Default::default(), fps, total_frames, MIX_SAMPLE_RATE)
                });
                mix_music(track, &music);
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "music unusable, skipping"),
        }
    }
    Ok(track)
}

fn staged<T>(stage: RenderStage, f: impl FnOnce() -> ReelResult<T>) -> ReelResult<T> {
    f().map_err(|e| e.in_stage(stage))
}

fn unique_temp_path(prefix: &str, suffix: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}{suffix}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

struct TempDirGuard(Option<PathBuf>);

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_dir_all(path);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
