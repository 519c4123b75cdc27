use std::borrow::Cow;

use crate::assets::bitmap_font;
use crate::assets::fonts::{OutlineFont, ResolvedFont};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::raster::FrameRGBA;

/// Offsets redrawn to simulate a bold face.
const BOLD_RADIUS: i64 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    fn from_straight(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        }
    }
}

/// Styling of a wrapped text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Straight-alpha RGBA8 color.
    pub color: [u8; 4],
    /// Maximum width of one line, padding excluded.
    pub max_width_px: u32,
    /// Transparent border around the text.
    pub padding_px: u32,
    /// Redraw with a 5x5 offset grid.
    pub bold: bool,
}

/// A wrapped, centered text raster.
#[derive(Clone, Debug)]
pub struct TextBlock {
    /// Premultiplied raster sized to the text plus padding.
    pub raster: FrameRGBA,
    /// Wrapped lines, top to bottom.
    pub lines: Vec<String>,
    /// Measured width of each line in pixels.
    pub line_widths: Vec<u32>,
}

struct LineMetrics {
    width: u32,
    height: u32,
}

struct OutlineEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl OutlineEngine {
    fn new(font: &OutlineFont) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::config(format!("no font families registered from '{}'", font.origin))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::config("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font.bytes.to_vec()),
                font.index,
            ),
        })
    }

    fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    fn metrics(&mut self, text: &str, size_px: f32) -> LineMetrics {
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default());
        let mut w = 0.0f32;
        let mut h = 0.0f32;
        for line in layout.lines() {
            let m = line.metrics();
            w = w.max(m.advance);
            h += m.ascent + m.descent + m.leading;
        }
        if h <= 0.0 {
            h = size_px * 1.2;
        }
        LineMetrics {
            width: w.ceil() as u32,
            height: h.ceil() as u32,
        }
    }

    fn draw_lines(
        &mut self,
        dst_w: u32,
        dst_h: u32,
        placed: &[(String, f64, f64)],
        size_px: f32,
        color: [u8; 4],
        bold: bool,
    ) -> ReelResult<FrameRGBA> {
        let (w16, h16) = raster_dims_u16(dst_w, dst_h)?;
        let brush = TextBrushRgba8::from_straight(color);
        let layouts = placed
            .iter()
            .map(|(text, x, y)| (self.layout_line(text, size_px, brush), *x, *y))
            .collect::<Vec<_>>();

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for (dx, dy) in stamp_offsets(bold) {
            for (layout, x, y) in &layouts {
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                    x + dx as f64,
                    y + dy as f64,
                )));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };

                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&self.font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA::from_premul(dst_w, dst_h, pixmap.data_as_u8_slice().to_vec())
    }
}

enum Engine {
    Outline(Box<OutlineEngine>),
    Bitmap,
}

/// Measures, wraps and rasterizes text with the resolved font.
///
/// Only used during preprocessing; frames reuse the rasters it produces.
pub struct TextPainter {
    engine: Engine,
}

impl TextPainter {
    /// Painter for a resolved font.
    pub fn new(font: &ResolvedFont) -> ReelResult<Self> {
        let engine = match font {
            ResolvedFont::Outline(f) => Engine::Outline(Box::new(OutlineEngine::new(f)?)),
            ResolvedFont::Builtin => Engine::Bitmap,
        };
        Ok(Self { engine })
    }

    /// Painter using the embedded bitmap font.
    pub fn builtin() -> Self {
        Self {
            engine: Engine::Bitmap,
        }
    }

    fn line_metrics(&mut self, text: &str, size_px: f32) -> LineMetrics {
        match &mut self.engine {
            Engine::Outline(e) => e.metrics(text, size_px),
            Engine::Bitmap => {
                let scale = bitmap_font::scale_for(size_px);
                LineMetrics {
                    width: bitmap_font::measure(text, scale),
                    height: bitmap_font::line_height(scale),
                }
            }
        }
    }

    /// Pixel width of `text` on one line.
    pub fn measure(&mut self, text: &str, size_px: f32) -> u32 {
        self.line_metrics(text, size_px).width
    }

    /// Height of one line of text.
    pub fn line_height(&mut self, size_px: f32) -> u32 {
        self.line_metrics("Ag", size_px).height
    }

    /// Greedy word wrap: each line takes as many words as fit in `max_width_px`. Words wider
    /// than a whole line are split between characters.
    pub fn wrap(&mut self, text: &str, size_px: f32, max_width_px: u32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if self.measure(&candidate, size_px) <= max_width_px {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if self.measure(word, size_px) <= max_width_px {
                current = word.to_string();
                continue;
            }

            let mut pieces = self.split_word(word, size_px, max_width_px);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn split_word(&mut self, word: &str, size_px: f32, max_width_px: u32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if piece.chars().count() > 1 && self.measure(&piece, size_px) > max_width_px {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }

    /// Wrap `text` and rasterize it with every line centered horizontally.
    pub fn render_block(&mut self, text: &str, style: &TextStyle) -> ReelResult<TextBlock> {
        let lines = self.wrap(text, style.size_px, style.max_width_px);
        let line_h = self.line_height(style.size_px);
        let line_widths = lines
            .iter()
            .map(|l| self.measure(l, style.size_px))
            .collect::<Vec<_>>();

        let extra = if style.bold { BOLD_RADIUS as u32 } else { 0 };
        let pad = style.padding_px + extra;
        let content_w = line_widths.iter().copied().max().unwrap_or(0);
        let width = (content_w + 2 * pad).max(1);
        let height = (line_h * lines.len() as u32 + 2 * pad).max(1);

        let placed = lines
            .iter()
            .zip(&line_widths)
            .enumerate()
            .map(|(i, (line, &w))| {
                let x = f64::from(pad) + f64::from(content_w - w) / 2.0;
                let y = f64::from(pad) + f64::from(line_h) * i as f64;
                (line.clone(), x.floor(), y)
            })
            .collect::<Vec<_>>();

        let raster = self.draw(
            width,
            height,
            &placed,
            style.size_px,
            style.color,
            style.bold,
        )?;
        Ok(TextBlock {
            raster,
            lines,
            line_widths,
        })
    }

    /// Rasterize a single unwrapped line with no padding.
    pub fn render_line(&mut self, text: &str, size_px: f32, color: [u8; 4]) -> ReelResult<FrameRGBA> {
        let m = self.line_metrics(text, size_px);
        let placed = [(text.to_string(), 0.0, 0.0)];
        self.draw(m.width.max(1), m.height.max(1), &placed, size_px, color, false)
    }

    fn draw(
        &mut self,
        width: u32,
        height: u32,
        placed: &[(String, f64, f64)],
        size_px: f32,
        color: [u8; 4],
        bold: bool,
    ) -> ReelResult<FrameRGBA> {
        match &mut self.engine {
            Engine::Outline(e) => e.draw_lines(width, height, placed, size_px, color, bold),
            Engine::Bitmap => {
                let scale = bitmap_font::scale_for(size_px);
                // Glyph bodies sit one row below the line top, leaving room for descenders.
                let top = i64::from(scale);
                let premul = Rgba8Premul::from_straight(color);
                let mut out = FrameRGBA::new_transparent(width, height);
                for (dx, dy) in stamp_offsets(bold) {
                    for (text, x, y) in placed {
                        bitmap_font::draw(
                            &mut out,
                            text,
                            *x as i64 + dx,
                            *y as i64 + top + dy,
                            scale,
                            premul,
                        );
                    }
                }
                Ok(out)
            }
        }
    }
}

fn stamp_offsets(bold: bool) -> Vec<(i64, i64)> {
    if !bold {
        return vec![(0, 0)];
    }
    let mut out = Vec::with_capacity(25);
    for dy in -BOLD_RADIUS..=BOLD_RADIUS {
        for dx in -BOLD_RADIUS..=BOLD_RADIUS {
            out.push((dx, dy));
        }
    }
    out
}

fn raster_dims_u16(width: u32, height: u32) -> ReelResult<(u16, u16)> {
    let w = u16::try_from(width)
        .map_err(|_| ReelError::render(format!("text raster width {width} exceeds u16")))?;
    let h = u16::try_from(height)
        .map_err(|_| ReelError::render(format!("text raster height {height} exceeds u16")))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/elements/text.rs"]
mod tests;
