use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::elements::text::TextPainter;
use crate::foundation::core::{FrameIndex, Rgba8Premul};
use crate::foundation::error::ReelResult;
use crate::foundation::raster::FrameRGBA;
use crate::schedule::phase::LoadingKind;

/// Cells between the brackets.
pub const PATTERN_LEN: usize = 8;

/// The pattern is reseeded every this many frames.
pub const PATTERN_PERIOD_FRAMES: u64 = 6;

// 2x2 ordered dither thresholds.
const BAYER_2X2: [u8; 4] = [0, 2, 3, 1];

/// Density level of every cell at `frame`: `0..4`, drawn as 25/50/75/100 % dithered coverage.
pub fn loading_pattern(frame: FrameIndex) -> [u8; PATTERN_LEN] {
    let seed = frame.0 / PATTERN_PERIOD_FRAMES;
    let mut out = [0u8; PATTERN_LEN];
    for (i, cell) in out.iter_mut().enumerate() {
        *cell = (xxh3_64_with_seed(&(i as u64).to_le_bytes(), seed) % 4) as u8;
    }
    out
}

fn prefix(kind: LoadingKind) -> &'static str {
    match kind {
        LoadingKind::Analyzing => "Analyzing: [",
        LoadingKind::Generating => "Generating: [",
    }
}

/// Pre-rendered pieces of both loading indicators.
///
/// Only the cells change between frames; prefix and suffix are pasted at fixed positions.
#[derive(Clone, Debug)]
pub struct LoadingSprites {
    analyzing: FrameRGBA,
    generating: FrameRGBA,
    suffix: FrameRGBA,
    cell_w: u32,
    cell_h: u32,
    height: u32,
    color: Rgba8Premul,
}

impl LoadingSprites {
    /// Render the static text once.
    pub fn prepare(painter: &mut TextPainter, size_px: f32, color: [u8; 4]) -> ReelResult<Self> {
        let analyzing = painter.render_line(prefix(LoadingKind::Analyzing), size_px, color)?;
        let generating = painter.render_line(prefix(LoadingKind::Generating), size_px, color)?;
        let suffix = painter.render_line("]", size_px, color)?;
        let cell_w = ((size_px * 0.6).round() as u32).max(2);
        let cell_h = ((size_px * 0.8).round() as u32).max(2);
        let height = analyzing
            .height
            .max(generating.height)
            .max(suffix.height)
            .max(cell_h);
        Ok(Self {
            analyzing,
            generating,
            suffix,
            cell_w,
            cell_h,
            height,
            color: Rgba8Premul::from_straight(color),
        })
    }

    /// Height of the indicator element.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width of the indicator element for `kind`; constant across frames.
    pub fn width(&self, kind: LoadingKind) -> u32 {
        self.prefix_sprite(kind).width + self.cell_w * PATTERN_LEN as u32 + self.suffix.width
    }

    fn prefix_sprite(&self, kind: LoadingKind) -> &FrameRGBA {
        match kind {
            LoadingKind::Analyzing => &self.analyzing,
            LoadingKind::Generating => &self.generating,
        }
    }

    /// Indicator raster for `frame`.
    pub fn render(&self, kind: LoadingKind, frame: FrameIndex) -> FrameRGBA {
        let prefix = self.prefix_sprite(kind);
        let mut out = FrameRGBA::new_transparent(self.width(kind), self.height);
        let center = |h: u32| i64::from((self.height - h) / 2);

        out.draw_over(prefix, 0, center(prefix.height), 1.0);

        let cells_x = prefix.width;
        let cell_y = (self.height - self.cell_h) / 2;
        for (i, level) in loading_pattern(frame).into_iter().enumerate() {
            let x0 = cells_x + self.cell_w * i as u32;
            // One column of spacing keeps neighbouring cells distinct.
            for y in 0..self.cell_h {
                for x in 0..self.cell_w.saturating_sub(1) {
                    if BAYER_2X2[((y % 2) * 2 + x % 2) as usize] <= level {
                        out.set_pixel(x0 + x, cell_y + y, self.color.to_array());
                    }
                }
            }
        }

        let suffix_x = cells_x + self.cell_w * PATTERN_LEN as u32;
        out.draw_over(&self.suffix, i64::from(suffix_x), center(self.suffix.height), 1.0);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/elements/loading.rs"]
mod tests;
