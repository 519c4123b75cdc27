use crate::elements::text::TextPainter;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::ReelResult;
use crate::foundation::raster::FrameRGBA;
use crate::strokes::StrokeSet;

const PLACEHOLDER_LABEL: &str = "IMAGE UNAVAILABLE";
const PLACEHOLDER_PANEL: [u8; 4] = [40, 40, 40, 255];
const PLACEHOLDER_BORDER: [u8; 4] = [220, 40, 40, 255];
const PLACEHOLDER_BORDER_PX: u32 = 6;

/// Drawing animation at `progress`: the revealed stroke pixels copied from `final_image` onto a
/// transparent canvas of the same size.
///
/// With no strokes, or before any stroke starts, the result is fully transparent.
pub fn drawing_element(strokes: &StrokeSet, final_image: &FrameRGBA, progress: f64) -> FrameRGBA {
    let mut out = FrameRGBA::new_transparent(final_image.width, final_image.height);
    for (x, y) in strokes.revealed_pixels(progress) {
        if let Some(px) = final_image.pixel(x, y) {
            out.set_pixel(x, y, px);
        }
    }
    out
}

/// Panel shown instead of a drawing that could not be loaded.
pub fn placeholder_element(
    painter: &mut TextPainter,
    width: u32,
    height: u32,
    label_size_px: f32,
) -> ReelResult<FrameRGBA> {
    let width = width.max(1);
    let height = height.max(1);
    let mut out = FrameRGBA::filled(width, height, Rgba8Premul::from_straight(PLACEHOLDER_BORDER));

    let b = PLACEHOLDER_BORDER_PX.min(width / 2).min(height / 2);
    out.fill_rect(
        i64::from(b),
        i64::from(b),
        width - 2 * b,
        height - 2 * b,
        Rgba8Premul::from_straight(PLACEHOLDER_PANEL),
    );

    let label = painter.render_line(PLACEHOLDER_LABEL, label_size_px, PLACEHOLDER_BORDER)?;
    let x = (i64::from(width) - i64::from(label.width)) / 2;
    let y = (i64::from(height) - i64::from(label.height)) / 2;
    out.draw_over(&label, x, y, 1.0);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/elements/image.rs"]
mod tests;
