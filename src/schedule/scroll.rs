use crate::foundation::core::FrameIndex;
use crate::foundation::math::{ease_out_cubic, lerp};
use crate::schedule::Timeline;
use crate::schedule::layout::{ElementHeights, StackMetrics, layout_stack};

/// Frames over which the scroll eases toward a new round's target.
pub const SCROLL_EASE_FRAMES: u64 = 15;

/// Scroll needed to keep content of `content_height` bottom-framed in the viewport.
pub fn target_scroll(content_height: u32, viewport_height: u32) -> f64 {
    f64::from(content_height.saturating_sub(viewport_height))
}

/// Vertical scroll offset of every frame, computed once before rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollPlan {
    offsets: Vec<f64>,
}

impl ScrollPlan {
    /// Walk all frames in order.
    ///
    /// When the round changes the offset eases from its current value toward the frame's
    /// target over [`SCROLL_EASE_FRAMES`] frames; afterwards it equals the target exactly.
    ///
    /// Past the easing window the offset only grows within a round provided
    /// `heights.text >= heights.loading + metrics.loading_extra_gap`: the analyzing stack
    /// (loading after the extra gap) is then never taller than the prompt that replaces it.
    pub fn compute(
        timeline: &Timeline,
        heights: &ElementHeights,
        metrics: &StackMetrics,
        viewport_height: u32,
    ) -> Self {
        let total = timeline.total_frames();
        let mut offsets = Vec::with_capacity(total as usize);

        let mut prev_round = None;
        let mut current = 0.0f64;
        let mut scroll_start = 0.0f64;
        let mut scroll_frames = 0u64;

        for f in 0..total {
            let frame = FrameIndex(f);
            let round = timeline.locate(frame).round_index;
            if prev_round != Some(round) {
                prev_round = Some(round);
                scroll_start = current;
                scroll_frames = 0;
            }

            let layout = layout_stack(&timeline.visible_stack(frame), heights, metrics);
            let target = target_scroll(layout.content_height, viewport_height);

            if scroll_frames < SCROLL_EASE_FRAMES {
                let p = scroll_frames as f64 / SCROLL_EASE_FRAMES as f64;
                current = lerp(scroll_start, target, ease_out_cubic(p));
                scroll_frames += 1;
            } else {
                current = target;
            }
            offsets.push(current.max(0.0));
        }

        Self { offsets }
    }

    /// Offset of `frame`; frames past the end keep the last offset.
    pub fn offset(&self, frame: FrameIndex) -> f64 {
        let idx = usize::try_from(frame.0).unwrap_or(usize::MAX);
        self.offsets
            .get(idx)
            .or(self.offsets.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of planned frames.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// `true` when no frames were planned.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// All offsets in frame order.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scroll.rs"]
mod tests;
