use smallvec::SmallVec;

/// Named sub-interval of a round's frame budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The previous drawing is being analyzed: loading indicator only.
    Analyzing,
    /// The prompt text appears.
    WordReveal,
    /// Text plus a "generating" loading indicator.
    Generating,
    /// Text plus the stroke-by-stroke drawing animation.
    Drawing,
    /// Text plus the finished image, held until the round ends.
    Revealed,
}

/// Which loading indicator label to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingKind {
    /// `Analyzing: [....]`
    Analyzing,
    /// `Generating: [....]`
    Generating,
}

/// One stacked element of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Loading indicator.
    Loading(LoadingKind),
    /// Wrapped prompt text.
    Text,
    /// Drawing animation in progress.
    Drawing,
    /// Final image.
    Image,
}

impl Phase {
    /// Every phase in timeline order.
    pub const ALL: [Phase; 5] = [
        Phase::Analyzing,
        Phase::WordReveal,
        Phase::Generating,
        Phase::Drawing,
        Phase::Revealed,
    ];

    /// Stable snake_case name, also used for audio segment lookup.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Analyzing => "analyzing",
            Phase::WordReveal => "word_reveal",
            Phase::Generating => "generating",
            Phase::Drawing => "drawing",
            Phase::Revealed => "revealed",
        }
    }

    /// Elements of the current round shown during this phase, top to bottom.
    pub fn visible_elements(self) -> &'static [ElementKind] {
        match self {
            Phase::Analyzing => &[ElementKind::Loading(LoadingKind::Analyzing)],
            Phase::WordReveal => &[ElementKind::Text],
            Phase::Generating => &[
                ElementKind::Text,
                ElementKind::Loading(LoadingKind::Generating),
            ],
            Phase::Drawing => &[ElementKind::Text, ElementKind::Drawing],
            Phase::Revealed => &[ElementKind::Text, ElementKind::Image],
        }
    }
}

/// Elements shown for a round that has already finished.
pub const COMPLETED_ROUND_ELEMENTS: &[ElementKind] = &[ElementKind::Text, ElementKind::Image];

#[derive(Clone, Copy, Debug)]
enum Boundary {
    /// `floor(F * per_mille / 1000)`.
    PerMille(u64),
    /// Start of the short hold after drawing: `F - min(3, drawing_width / 4)`.
    DrawingTail,
    End,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    phase: Phase,
    until: Boundary,
}

const fn step(phase: Phase, until: Boundary) -> Transition {
    Transition { phase, until }
}

const LATER_ROUND: [Transition; 5] = [
    step(Phase::Analyzing, Boundary::PerMille(180)),
    step(Phase::WordReveal, Boundary::PerMille(440)),
    step(Phase::Generating, Boundary::PerMille(620)),
    step(Phase::Drawing, Boundary::DrawingTail),
    step(Phase::Revealed, Boundary::End),
];

// The first prompt is known up front, so there is nothing to analyze.
const FIRST_ROUND: [Transition; 4] = [
    step(Phase::WordReveal, Boundary::PerMille(440)),
    step(Phase::Generating, Boundary::PerMille(620)),
    step(Phase::Drawing, Boundary::DrawingTail),
    step(Phase::Revealed, Boundary::End),
];

const DRAWING_START_PER_MILLE: u64 = 620;
const MAX_TAIL_FRAMES: u64 = 3;

fn table(round_index: usize) -> &'static [Transition] {
    if round_index == 0 {
        &FIRST_ROUND
    } else {
        &LATER_ROUND
    }
}

fn resolve(boundary: Boundary, frames_per_round: u64) -> u64 {
    match boundary {
        Boundary::PerMille(pm) => frames_per_round * pm / 1000,
        Boundary::DrawingTail => {
            let drawing_start = frames_per_round * DRAWING_START_PER_MILLE / 1000;
            let drawing_width = frames_per_round - drawing_start;
            frames_per_round - MAX_TAIL_FRAMES.min(drawing_width / 4)
        }
        Boundary::End => frames_per_round,
    }
}

/// Frame interval `[start, end)` of one phase inside a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhaseSpan {
    /// Phase occupying the interval.
    pub phase: Phase,
    /// First round-local frame.
    pub start: u64,
    /// One past the last round-local frame.
    pub end: u64,
}

impl PhaseSpan {
    /// Number of frames in the span.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// `true` when the span holds no frames.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Phase state of one round-local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhasePoint {
    /// Active phase.
    pub phase: Phase,
    /// Position within the phase in `[0, 1]`.
    pub progress: f64,
    /// Frames since the phase started.
    pub frames_into_phase: u64,
    /// The active phase's interval.
    pub span: PhaseSpan,
}

/// Non-empty phase intervals of a round, contiguous and covering `[0, frames_per_round)`.
pub fn phase_spans(round_index: usize, frames_per_round: u64) -> SmallVec<[PhaseSpan; 5]> {
    let mut out = SmallVec::new();
    let mut start = 0u64;
    for t in table(round_index) {
        let end = resolve(t.until, frames_per_round).clamp(start, frames_per_round);
        if end > start {
            out.push(PhaseSpan {
                phase: t.phase,
                start,
                end,
            });
        }
        start = end;
    }
    out
}

/// Phase and progress of `frame_in_round`. Pure; frames past the budget report the final phase
/// fully progressed.
pub fn phase_for(round_index: usize, frame_in_round: u64, frames_per_round: u64) -> PhasePoint {
    let spans = phase_spans(round_index, frames_per_round.max(1));
    let span = spans
        .iter()
        .copied()
        .find(|s| frame_in_round < s.end)
        .or_else(|| spans.last().copied())
        .unwrap_or(PhaseSpan {
            phase: Phase::Revealed,
            start: 0,
            end: 1,
        });

    let frames_into_phase = frame_in_round.saturating_sub(span.start);
    let progress = if span.is_empty() {
        1.0
    } else {
        (frames_into_phase as f64 / span.len() as f64).clamp(0.0, 1.0)
    };
    PhasePoint {
        phase: span.phase,
        progress,
        frames_into_phase,
        span,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/phase.rs"]
mod tests;
