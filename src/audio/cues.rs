use std::collections::HashMap;
use std::path::Path;

use crate::audio::{AUDIO_EXTENSIONS, AudioPcm, MIX_CHANNELS, decode_audio_f32_stereo, frame_to_sample};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::schedule::Timeline;
use crate::schedule::phase::{Phase, phase_spans};

/// Decoded audio segment per phase.
#[derive(Clone, Debug, Default)]
pub struct PhaseSegments {
    by_phase: HashMap<Phase, AudioPcm>,
}

impl PhaseSegments {
    /// Segment of `phase`, if one was provided.
    pub fn get(&self, phase: Phase) -> Option<&AudioPcm> {
        self.by_phase.get(&phase)
    }

    /// Register the segment of `phase`, replacing an earlier one.
    pub fn insert(&mut self, phase: Phase, pcm: AudioPcm) {
        self.by_phase.insert(phase, pcm);
    }

    /// Number of phases with a segment.
    pub fn len(&self) -> usize {
        self.by_phase.len()
    }

    /// `true` when no segment was found.
    pub fn is_empty(&self) -> bool {
        self.by_phase.is_empty()
    }
}

/// Phase a segment file belongs to, from its stem (`drawing.wav` is the `drawing` segment).
pub fn segment_phase(path: &Path) -> Option<Phase> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
    Phase::ALL.into_iter().find(|p| p.name() == stem)
}

/// Decode every phase segment found in `dir` at `sample_rate`.
///
/// Files that are not named after a phase are ignored; segments that fail to decode are logged
/// and skipped.
pub fn load_segments(dir: &Path, sample_rate: u32) -> ReelResult<PhaseSegments> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ReelError::config(format!("audio directory '{}' is unreadable: {e}", dir.display()))
    })?;

    let mut paths = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect::<Vec<_>>();
    paths.sort();

    let mut segments = PhaseSegments::default();
    for path in paths {
        let Some(phase) = segment_phase(&path) else {
            continue;
        };
        match decode_audio_f32_stereo(&path, sample_rate) {
            Ok(pcm) => {
                tracing::debug!(phase = phase.name(), frames = pcm.frames(), "decoded audio segment");
                segments.insert(phase, pcm);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping audio segment");
            }
        }
    }
    tracing::info!(segments = segments.len(), dir = %dir.display(), "loaded audio segments");
    Ok(segments)
}

/// A phase start on the video timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Cue {
    /// Round the phase belongs to.
    pub round_index: usize,
    /// Phase that starts.
    pub phase: Phase,
    /// First global frame of the phase.
    pub start: FrameIndex,
    /// Frames the phase lasts.
    pub len_frames: u64,
}

/// Every phase start of the video in timeline order.
pub fn build_cue_sheet(timeline: &Timeline) -> Vec<Cue> {
    let f = timeline.frames_per_round();
    let mut cues = Vec::new();
    for round_index in 0..timeline.total_rounds() {
        let round_start = round_index as u64 * f;
        cues.extend(phase_spans(round_index, f).into_iter().map(|span| Cue {
            round_index,
            phase: span.phase,
            start: FrameIndex(round_start + span.start),
            len_frames: span.len(),
        }));
    }
    cues
}

/// Lay segments out on a silent track `total_frames` long.
///
/// Each cue's segment starts at the cue's first sample and is cut at the end of its phase; the
/// rest of the phase stays silent. Segments must already be at `sample_rate` and stereo.
pub fn assemble_track(
    cues: &[Cue],
    segments: &PhaseSegments,
    fps: Fps,
    total_frames: u64,
    sample_rate: u32,
) -> Vec<f32> {
    let ch = usize::from(MIX_CHANNELS);
    let total = frame_to_sample(total_frames, fps, sample_rate) as usize;
    let mut out = vec![0.0f32; total * ch];

    for cue in cues {
        let Some(seg) = segments.get(cue.phase) else {
            continue;
        };
        let start = frame_to_sample(cue.start.0, fps, sample_rate) as usize;
        let end = (frame_to_sample(cue.start.0 + cue.len_frames, fps, sample_rate) as usize)
            .min(total);
        let n = end.saturating_sub(start).min(seg.frames());
        let src = &seg.interleaved_f32[..n * ch];
        out[start * ch..(start + n) * ch].copy_from_slice(src);
    }
    out
}

/// Add `music` under `track` from the first sample, cut at the end of the track.
pub fn mix_music(track: &mut [f32], music: &AudioPcm) {
    for (dst, src) in track.iter_mut().zip(&music.interleaved_f32) {
        *dst = (*dst + src).clamp(-1.0, 1.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/cues.rs"]
mod tests;
