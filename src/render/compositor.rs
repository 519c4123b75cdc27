use std::borrow::Cow;

use kurbo::Rect;

use crate::elements::image::drawing_element;
use crate::foundation::core::{FrameIndex, Rgba8Premul};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::raster::FrameRGBA;
use crate::prepare::{PreparedReel, RoundImage};
use crate::schedule::layout::layout_stack;
use crate::schedule::phase::{ElementKind, Phase};
use crate::schedule::scroll::ScrollPlan;

/// Frames over which a newly revealed prompt fades in.
pub const TEXT_FADE_FRAMES: u64 = 15;

/// What a composited layer shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Title banner.
    Title,
    /// Backdrop behind a drawing in progress.
    Paper,
    /// A stacked round element.
    Element(ElementKind),
}

/// One positioned layer of a frame, in canvas coordinates.
#[derive(Clone, Debug)]
pub struct RenderedElement<'a> {
    /// Round the layer belongs to; `None` for the title.
    pub round_index: Option<usize>,
    /// Layer kind.
    pub kind: LayerKind,
    /// Premultiplied raster; cached elements are borrowed from the prepared reel.
    pub raster: Cow<'a, FrameRGBA>,
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Extra opacity, `255` = opaque.
    pub opacity: u8,
}

/// Composites frames from a prepared reel and its scroll plan.
///
/// Holds only shared references, so one compositor can serve every worker thread.
#[derive(Clone, Copy, Debug)]
pub struct FrameCompositor<'a> {
    reel: &'a PreparedReel,
    scroll: &'a ScrollPlan,
    background: Rgba8Premul,
}

impl<'a> FrameCompositor<'a> {
    /// Compositor over `reel` scrolled by `scroll`.
    pub fn new(reel: &'a PreparedReel, scroll: &'a ScrollPlan) -> Self {
        Self {
            reel,
            scroll,
            background: Rgba8Premul::from_straight(reel.style().background_rgba),
        }
    }

    /// Layers of `frame` in paint order, culled to the viewport.
    pub fn layers(&self, frame: FrameIndex) -> ReelResult<Vec<RenderedElement<'a>>> {
        let reel = self.reel;
        let style = reel.style();
        let timeline = reel.timeline();
        let (w, h) = (style.canvas.width, style.canvas.height);
        let viewport = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
        let centered_x = |raster_w: u32| (i64::from(w) - i64::from(raster_w)) / 2;

        let mut out = Vec::new();

        if timeline.title_visible(frame) {
            let title = reel.title();
            out.push(RenderedElement {
                round_index: None,
                kind: LayerKind::Title,
                raster: Cow::Borrowed(title),
                x: centered_x(title.width),
                y: i64::from(h) - i64::from(style.title_bottom_margin_px) - i64::from(title.height),
                opacity: 255,
            });
        }

        let (rf, pp) = timeline.point(frame);
        let layout = layout_stack(&timeline.visible_stack(frame), reel.heights(), reel.metrics());
        let scroll = self.scroll.offset(frame).round() as i64;

        for slot in layout.slots {
            let y = i64::from(slot.y) - scroll;
            let extent = Rect::new(0.0, y as f64, f64::from(w), (y + i64::from(slot.height)) as f64);
            if extent.intersect(viewport).area() <= 0.0 {
                continue;
            }

            let round = reel.round(slot.round_index).ok_or_else(|| {
                ReelError::render(format!("stack references unknown round {}", slot.round_index))
            })?;
            let current = slot.round_index == rf.round_index;

            let mut opacity = 255u8;
            let raster = match slot.kind {
                ElementKind::Loading(kind) => Cow::Owned(reel.loading().render(kind, frame)),
                ElementKind::Text => {
                    if current && pp.phase == Phase::WordReveal {
                        opacity = fade_in_opacity(pp.frames_into_phase);
                    }
                    Cow::Borrowed(round.text.as_ref())
                }
                ElementKind::Drawing => match &round.image {
                    RoundImage::Drawing {
                        final_image,
                        strokes,
                    } => {
                        out.push(RenderedElement {
                            round_index: Some(slot.round_index),
                            kind: LayerKind::Paper,
                            raster: Cow::Owned(FrameRGBA::filled(
                                final_image.width,
                                final_image.height,
                                Rgba8Premul::from_straight(style.paper_rgba),
                            )),
                            x: centered_x(final_image.width),
                            y,
                            opacity: 255,
                        });
                        Cow::Owned(drawing_element(strokes, final_image, pp.progress))
                    }
                    RoundImage::Placeholder(p) => Cow::Borrowed(p),
                },
                ElementKind::Image => Cow::Borrowed(round.image.final_raster()),
            };

            out.push(RenderedElement {
                round_index: Some(slot.round_index),
                kind: LayerKind::Element(slot.kind),
                x: centered_x(raster.width),
                y,
                raster,
                opacity,
            });
        }
        Ok(out)
    }

    /// Composite `frame` over the background. Pure: the same frame always yields the same bytes.
    pub fn render_frame(&self, frame: FrameIndex) -> ReelResult<FrameRGBA> {
        let canvas = self.reel.style().canvas;
        let mut out = FrameRGBA::filled(canvas.width, canvas.height, self.background);
        for layer in self.layers(frame)? {
            out.draw_over(
                &layer.raster,
                layer.x,
                layer.y,
                f32::from(layer.opacity) / 255.0,
            );
        }
        Ok(out)
    }
}

/// Opacity of a prompt `frames_into_phase` frames after its reveal started.
pub fn fade_in_opacity(frames_into_phase: u64) -> u8 {
    ((frames_into_phase + 1).min(TEXT_FADE_FRAMES) * 255 / TEXT_FADE_FRAMES) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
