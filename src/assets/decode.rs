use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::raster::FrameRGBA;

/// Read and decode a round drawing, resized to `target_width` with its aspect ratio kept.
///
/// Returns straight-alpha RGBA so stroke extraction sees the original ink values.
pub fn load_drawing(path: &Path, target_width: u32) -> ReelResult<image::RgbaImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_drawing(&bytes, target_width)
}

/// Decode encoded image bytes and resize to `target_width`.
pub fn decode_drawing(bytes: &[u8], target_width: u32) -> ReelResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(ReelError::data("decoded image has zero size"));
    }
    if target_width == 0 || w == target_width {
        return Ok(rgba);
    }

    let target_height = ((f64::from(h) * f64::from(target_width) / f64::from(w)).round() as u32).max(1);
    Ok(image::imageops::resize(
        &rgba,
        target_width,
        target_height,
        image::imageops::FilterType::Lanczos3,
    ))
}

/// Convert a straight-alpha image into a premultiplied raster.
pub fn premultiplied(img: &image::RgbaImage) -> FrameRGBA {
    let (width, height) = img.dimensions();
    let mut data = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut data);
    FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
