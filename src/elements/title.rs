use crate::elements::text::{TextBlock, TextPainter, TextStyle};
use crate::foundation::error::ReelResult;

/// Banner text shown at the start of every video.
pub const TITLE_TEMPLATE: &str = "The World's Longest Game of Pictionary";

/// Title text, with `" Part N"` appended when a part number is given.
pub fn title_text(part_number: Option<u32>) -> String {
    match part_number {
        Some(n) => format!("{TITLE_TEMPLATE} Part {n}"),
        None => TITLE_TEMPLATE.to_string(),
    }
}

/// Wrapped, bold title banner.
pub fn render_title(
    painter: &mut TextPainter,
    part_number: Option<u32>,
    size_px: f32,
    color: [u8; 4],
    max_width_px: u32,
    padding_px: u32,
) -> ReelResult<TextBlock> {
    painter.render_block(
        &title_text(part_number),
        &TextStyle {
            size_px,
            color,
            max_width_px,
            padding_px,
            bold: true,
        },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/elements/title.rs"]
mod tests;
