use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::encode::output::{FRAME_FILE_PATTERN, frame_file_name};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};

/// Name of the concat demuxer list written next to the frames.
pub const CONCAT_LIST_NAME: &str = "frames.txt";

const STDERR_TAIL_LINES: usize = 20;

/// How ffmpeg reads the PNG sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeProfile {
    /// Concat demuxer over an explicit file list with per-file durations. Tolerates gaps left by
    /// failed frames.
    Concat,
    /// `-framerate N -i frame_%05d.png`. Needs a gapless sequence.
    ImageSequence,
}

impl EncodeProfile {
    /// Stable name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::ImageSequence => "image_sequence",
        }
    }
}

/// Raw PCM audio muxed into the video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` samples.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// One encoder invocation.
#[derive(Clone, Debug)]
pub struct EncodeJob {
    /// Directory holding `frame_%05d.png`.
    pub frames_dir: PathBuf,
    /// Frames in the video.
    pub total_frames: u64,
    /// Frames whose PNG was not written.
    pub failed_frames: Vec<u64>,
    /// Output frame rate.
    pub fps: u32,
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Optional audio track.
    pub audio: Option<AudioInputConfig>,
}

impl EncodeJob {
    fn validate(&self) -> ReelResult<()> {
        if self.fps == 0 {
            return Err(ReelError::encode("encode fps must be non-zero"));
        }
        if self.total_frames == 0 {
            return Err(ReelError::encode("nothing to encode: zero frames"));
        }
        if let Some(audio) = &self.audio
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(ReelError::encode(
                "audio sample_rate and channels must be non-zero when audio is enabled",
            ));
        }
        Ok(())
    }

    /// Full ffmpeg argument list for `profile`.
    pub fn args(&self, profile: EncodeProfile) -> Vec<OsString> {
        let fps = self.fps.to_string();
        let mut args: Vec<OsString> = vec!["-y".into(), "-loglevel".into(), "error".into()];

        match profile {
            EncodeProfile::Concat => {
                args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
                args.push(self.frames_dir.join(CONCAT_LIST_NAME).into_os_string());
            }
            EncodeProfile::ImageSequence => {
                args.extend(["-framerate", fps.as_str(), "-i"].map(OsString::from));
                args.push(self.frames_dir.join(FRAME_FILE_PATTERN).into_os_string());
            }
        }

        if let Some(audio) = &self.audio {
            args.extend(
                [
                    "-f",
                    "f32le",
                    "-ar",
                    &audio.sample_rate.to_string(),
                    "-ac",
                    &audio.channels.to_string(),
                    "-i",
                ]
                .map(OsString::from),
            );
            args.push(audio.path.clone().into_os_string());
        }

        args.extend(
            [
                "-c:v", "libx264", "-pix_fmt", "yuv420p", "-crf", "23", "-preset", "medium", "-r",
            ]
            .map(OsString::from),
        );
        args.push(fps.into());
        if profile == EncodeProfile::Concat {
            args.extend(["-avoid_negative_ts", "make_zero"].map(OsString::from));
        }
        if self.audio.is_some() {
            args.extend(["-c:a", "aac", "-shortest"].map(OsString::from));
        } else {
            args.push("-an".into());
        }
        args.extend(["-movflags", "+faststart"].map(OsString::from));
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

/// Concat demuxer list for `total_frames` frames at `fps`.
///
/// Every entry lasts one frame; a failed frame extends the duration of the entry before it (or
/// the first entry, for leading failures) so the timing of the video is kept.
pub fn concat_list_text(total_frames: u64, failed_frames: &[u64], fps: u32) -> String {
    let mut failed = failed_frames.to_vec();
    failed.sort_unstable();

    let mut entries = Vec::<(u64, u64)>::new();
    let mut leading = 0u64;
    for f in 0..total_frames {
        if failed.binary_search(&f).is_ok() {
            match entries.last_mut() {
                Some((_, frames)) => *frames += 1,
                None => leading += 1,
            }
            continue;
        }
        entries.push((f, 1 + std::mem::take(&mut leading)));
    }

    let mut out = String::new();
    for (f, frames) in &entries {
        let _ = writeln!(out, "file '{}'", frame_file_name(FrameIndex(*f)));
        let _ = writeln!(out, "duration {:.6}", *frames as f64 / f64::from(fps));
    }
    // The demuxer ignores the last duration unless the final file is listed again.
    if let Some((f, _)) = entries.last() {
        let _ = writeln!(out, "file '{}'", frame_file_name(FrameIndex(*f)));
    }
    out
}

/// Write the concat list for `job` into its frames directory.
pub fn write_concat_list(job: &EncodeJob) -> ReelResult<PathBuf> {
    let path = job.frames_dir.join(CONCAT_LIST_NAME);
    let text = concat_list_text(job.total_frames, &job.failed_frames, job.fps);
    std::fs::write(&path, text)
        .with_context(|| format!("write concat list '{}'", path.display()))?;
    Ok(path)
}

/// Encode the PNG sequence of `job` to MP4.
///
/// Tries [`EncodeProfile::Concat`] first and retries once with
/// [`EncodeProfile::ImageSequence`]. Returns the profile that succeeded.
pub fn encode_frames(job: &EncodeJob) -> ReelResult<EncodeProfile> {
    job.validate()?;
    ensure_parent_dir(&job.out_path)?;
    write_concat_list(job)?;

    let first = match run_ffmpeg(&job.args(EncodeProfile::Concat)) {
        Ok(()) => {
            tracing::info!(profile = EncodeProfile::Concat.name(), out = %job.out_path.display(), "encoded video");
            return Ok(EncodeProfile::Concat);
        }
        Err(e) => e,
    };
    tracing::warn!(error = %first, "concat encode failed, retrying with image sequence input");

    match run_ffmpeg(&job.args(EncodeProfile::ImageSequence)) {
        Ok(()) => {
            tracing::info!(profile = EncodeProfile::ImageSequence.name(), out = %job.out_path.display(), "encoded video");
            Ok(EncodeProfile::ImageSequence)
        }
        Err(second) => Err(ReelError::encode(format!(
            "ffmpeg failed with both input profiles; concat: {first}; image sequence: {second}"
        ))),
    }
}

fn run_ffmpeg(args: &[OsString]) -> ReelResult<()> {
    let output = Command::new("ffmpeg")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReelError::encode(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr_tail(&stderr)
        )));
    }
    Ok(())
}

fn stderr_tail(stderr: &str) -> String {
    let lines = stderr.trim().lines().collect::<Vec<_>>();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
