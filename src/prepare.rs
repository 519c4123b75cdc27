//! One-shot preprocessing.
//!
//! Everything that does not change between frames is computed here exactly once: the font, text
//! and title rasters, decoded drawings with their strokes, element heights and the timeline. The
//! resulting [`PreparedReel`] is immutable and shared by every frame job.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::{load_drawing, premultiplied};
use crate::assets::fonts::{FontResolver, ResolvedFont};
use crate::config::{RenderConfig, Style};
use crate::elements::image::placeholder_element;
use crate::elements::loading::LoadingSprites;
use crate::elements::text::{TextPainter, TextStyle};
use crate::elements::title::render_title;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::raster::FrameRGBA;
use crate::schedule::Timeline;
use crate::schedule::layout::{ElementHeights, StackMetrics};
use crate::schedule::scroll::ScrollPlan;
use crate::session::{Round, Session};
use crate::strokes::{StrokeSet, extract_strokes};

/// Image layer source of one round.
#[derive(Clone, Debug)]
pub enum RoundImage {
    /// Decoded drawing and the strokes replayed while it is drawn.
    Drawing {
        /// Resized, premultiplied final image.
        final_image: FrameRGBA,
        /// Strokes extracted from the resized image.
        strokes: StrokeSet,
    },
    /// The drawing was missing or unreadable.
    Placeholder(FrameRGBA),
}

impl RoundImage {
    /// Raster shown once the round's drawing is complete.
    pub fn final_raster(&self) -> &FrameRGBA {
        match self {
            Self::Drawing { final_image, .. } => final_image,
            Self::Placeholder(p) => p,
        }
    }

    /// `true` when the drawing could not be loaded.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Cached elements of one round.
#[derive(Clone, Debug)]
pub struct PreparedRound {
    /// Source round.
    pub round: Round,
    /// Wrapped prompt text, shared between rounds with the same prompt.
    pub text: Arc<FrameRGBA>,
    /// Drawing or placeholder.
    pub image: RoundImage,
}

/// Immutable inputs of every frame job.
#[derive(Clone, Debug)]
pub struct PreparedReel {
    rounds: Vec<PreparedRound>,
    title: FrameRGBA,
    loading: LoadingSprites,
    heights: ElementHeights,
    metrics: StackMetrics,
    timeline: Timeline,
    style: Style,
}

impl PreparedReel {
    /// Resolve the configured font and preprocess `session`.
    #[tracing::instrument(skip(session, cfg), fields(rounds = session.total_rounds()))]
    pub fn prepare(session: &Session, cfg: &RenderConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let font = FontResolver::system().resolve(&cfg.font)?;
        Self::prepare_with_font(session, cfg, &font)
    }

    /// Preprocess `session` with an already resolved font.
    pub fn prepare_with_font(
        session: &Session,
        cfg: &RenderConfig,
        font: &ResolvedFont,
    ) -> ReelResult<Self> {
        cfg.validate()?;
        let style = cfg.style.clone();
        let rounds = match cfg.max_rounds {
            Some(n) => &session.rounds()[..n.min(session.total_rounds())],
            None => session.rounds(),
        };
        if rounds.is_empty() {
            return Err(ReelError::config("session has no rounds"));
        }
        tracing::info!(rounds = rounds.len(), "preprocessing session");

        let mut painter = TextPainter::new(font)?;

        let text_style = TextStyle {
            size_px: style.text_size_px,
            color: style.text_rgba,
            max_width_px: style.text_max_width_px,
            padding_px: style.text_padding_px,
            bold: false,
        };
        let mut text_cache = HashMap::<String, Arc<FrameRGBA>>::new();
        let mut texts = Vec::with_capacity(rounds.len());
        for round in rounds {
            if let Some(hit) = text_cache.get(&round.prompt) {
                texts.push(Arc::clone(hit));
                continue;
            }
            let block = painter.render_block(&round.prompt, &text_style)?;
            tracing::debug!(
                round = round.index,
                lines = block.lines.len(),
                "rendered prompt text"
            );
            let raster = Arc::new(block.raster);
            text_cache.insert(round.prompt.clone(), Arc::clone(&raster));
            texts.push(raster);
        }

        let placeholder = placeholder_element(
            &mut painter,
            style.image_width_px,
            style.image_width_px,
            style.loading_size_px,
        )?;

        // Decoding and stroke extraction dominate preprocessing and are independent per round.
        let images = rounds
            .par_iter()
            .map(|round| load_round_image(round, &style, cfg.ink_threshold, &placeholder))
            .collect::<Vec<_>>();

        let title = render_title(
            &mut painter,
            cfg.part_number,
            style.title_size_px,
            style.title_rgba,
            style.text_max_width_px,
            style.text_padding_px,
        )?
        .raster;
        let loading =
            LoadingSprites::prepare(&mut painter, style.loading_size_px, style.loading_rgba)?;

        let prepared = rounds
            .iter()
            .cloned()
            .zip(texts)
            .zip(images)
            .map(|((round, text), image)| PreparedRound { round, text, image })
            .collect::<Vec<_>>();

        let heights = ElementHeights {
            text: prepared.iter().map(|r| r.text.height).collect(),
            image: prepared
                .iter()
                .map(|r| r.image.final_raster().height)
                .collect(),
            loading: loading.height(),
        };
        let timeline = Timeline::new(cfg.frames_per_round()?, prepared.len(), cfg.title_frames()?)?;

        let placeholders = prepared.iter().filter(|r| r.image.is_placeholder()).count();
        tracing::info!(
            rounds = prepared.len(),
            distinct_prompts = text_cache.len(),
            placeholders,
            total_frames = timeline.total_frames(),
            "preprocessing done"
        );

        Ok(Self {
            rounds: prepared,
            title,
            loading,
            heights,
            metrics: StackMetrics::from_style(&style),
            timeline,
            style,
        })
    }

    /// Scroll offsets of every frame.
    pub fn scroll_plan(&self) -> ScrollPlan {
        ScrollPlan::compute(
            &self.timeline,
            &self.heights,
            &self.metrics,
            self.style.canvas.height,
        )
    }

    /// Prepared rounds in order.
    pub fn rounds(&self) -> &[PreparedRound] {
        &self.rounds
    }

    /// Prepared round at `round_index`.
    pub fn round(&self, round_index: usize) -> Option<&PreparedRound> {
        self.rounds.get(round_index)
    }

    /// Title banner raster.
    pub fn title(&self) -> &FrameRGBA {
        &self.title
    }

    /// Loading indicator sprites.
    pub fn loading(&self) -> &LoadingSprites {
        &self.loading
    }

    /// Element heights per round.
    pub fn heights(&self) -> &ElementHeights {
        &self.heights
    }

    /// Stack spacing.
    pub fn metrics(&self) -> &StackMetrics {
        &self.metrics
    }

    /// Frame budget of the video.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Visual constants.
    pub fn style(&self) -> &Style {
        &self.style
    }
}

fn load_round_image(
    round: &Round,
    style: &Style,
    ink_threshold: u8,
    placeholder: &FrameRGBA,
) -> RoundImage {
    let Some(path) = round.image_path.as_deref() else {
        tracing::warn!(round = round.index, "round has no image, using placeholder");
        return RoundImage::Placeholder(placeholder.clone());
    };
    match load_drawing(path, style.image_width_px) {
        Ok(img) => {
            let strokes = extract_strokes(&img, ink_threshold);
            tracing::debug!(
                round = round.index,
                width = img.width(),
                height = img.height(),
                strokes = strokes.strokes.len(),
                ink_pixels = strokes.total_pixels(),
                "prepared drawing"
            );
            RoundImage::Drawing {
                final_image: premultiplied(&img),
                strokes,
            }
        }
        Err(e) => {
            tracing::warn!(
                round = round.index,
                path = %path.display(),
                error = %e,
                "image unreadable, using placeholder"
            );
            RoundImage::Placeholder(placeholder.clone())
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/prepare/prepare.rs"]
mod tests;
