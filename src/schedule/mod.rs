//! Timing: which round and phase every frame belongs to, what is visible, and where the stack
//! is scrolled.

/// Element stacking.
pub mod layout;
/// Per-round phase state machine.
pub mod phase;
/// Scroll offset precomputation.
pub mod scroll;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::schedule::phase::{COMPLETED_ROUND_ELEMENTS, ElementKind, PhasePoint, phase_for};

/// Round-local coordinates of a global frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundFrame {
    /// Zero-based round position in the session.
    pub round_index: usize,
    /// Frame offset inside the round.
    pub frame_in_round: u64,
}

/// Frame budget of a whole video.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeline {
    frames_per_round: u64,
    total_rounds: usize,
    title_frames: u64,
}

impl Timeline {
    /// Build a timeline; both the per-round budget and round count must be non-zero.
    pub fn new(frames_per_round: u64, total_rounds: usize, title_frames: u64) -> ReelResult<Self> {
        if frames_per_round == 0 {
            return Err(ReelError::config("frames_per_round must be > 0"));
        }
        if total_rounds == 0 {
            return Err(ReelError::config("timeline needs at least one round"));
        }
        Ok(Self {
            frames_per_round,
            total_rounds,
            title_frames,
        })
    }

    /// Frames per round.
    pub fn frames_per_round(&self) -> u64 {
        self.frames_per_round
    }

    /// Number of rounds.
    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// Number of initial frames that show the title.
    pub fn title_frames(&self) -> u64 {
        self.title_frames
    }

    /// Length of the video in frames.
    pub fn total_frames(&self) -> u64 {
        self.frames_per_round * self.total_rounds as u64
    }

    /// Round and round-local offset of `frame`. Frames past the end stay in the last round.
    pub fn locate(&self, frame: FrameIndex) -> RoundFrame {
        let round = frame.0 / self.frames_per_round;
        let last = (self.total_rounds - 1) as u64;
        if round > last {
            return RoundFrame {
                round_index: self.total_rounds - 1,
                frame_in_round: frame.0 - last * self.frames_per_round,
            };
        }
        RoundFrame {
            round_index: round as usize,
            frame_in_round: frame.0 % self.frames_per_round,
        }
    }

    /// Round coordinates and phase state of `frame`.
    pub fn point(&self, frame: FrameIndex) -> (RoundFrame, PhasePoint) {
        let rf = self.locate(frame);
        let pp = phase_for(rf.round_index, rf.frame_in_round, self.frames_per_round);
        (rf, pp)
    }

    /// `true` while the title banner is shown.
    pub fn title_visible(&self, frame: FrameIndex) -> bool {
        frame.0 < self.title_frames
    }

    /// Last frame of the title window, used as the thumbnail.
    pub fn thumbnail_frame(&self) -> Option<FrameIndex> {
        self.title_frames
            .min(self.total_frames())
            .checked_sub(1)
            .map(FrameIndex)
    }

    /// Every element visible at `frame`, top to bottom: finished rounds show text and image,
    /// the current round shows its phase's elements.
    pub fn visible_stack(&self, frame: FrameIndex) -> Vec<(usize, ElementKind)> {
        let (rf, pp) = self.point(frame);
        let mut out = Vec::with_capacity(rf.round_index * 2 + 2);
        for round in 0..rf.round_index {
            out.extend(COMPLETED_ROUND_ELEMENTS.iter().map(|&k| (round, k)));
        }
        out.extend(
            pp.phase
                .visible_elements()
                .iter()
                .map(|&k| (rf.round_index, k)),
        );
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/timeline.rs"]
mod tests;
