//! Stroke extraction from a rasterized drawing.
//!
//! Dark pixels are grouped into 8-connected components with a breadth-first flood fill. Each
//! component becomes one [`Stroke`] whose pixels are replayed in visitation order to animate the
//! drawing.

use std::collections::{HashSet, VecDeque};

use crate::foundation::math::luma_u8;

/// Above this many pixels the visited set switches from a dense bitmap to a coordinate set.
pub const DENSE_VISITED_LIMIT: u64 = 16 * 1024 * 1024;

/// Default grayscale level below which a pixel counts as ink.
pub const DEFAULT_INK_THRESHOLD: u8 = 80;

/// One connected group of ink pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Pixels in reveal order.
    pub pixels: Vec<(u32, u32)>,
    /// Progress at which the stroke starts appearing.
    pub reveal_start: f64,
    /// Progress at which the stroke is fully drawn.
    pub reveal_end: f64,
}

impl Stroke {
    /// Number of this stroke's pixels visible at drawing `progress`.
    pub fn revealed_count(&self, progress: f64) -> usize {
        let len = self.pixels.len();
        if progress >= self.reveal_end {
            return len;
        }
        if progress > self.reveal_start {
            let span = self.reveal_end - self.reveal_start;
            let local = (progress - self.reveal_start) / span;
            return ((len as f64) * local).floor().clamp(0.0, len as f64) as usize;
        }
        0
    }

    /// Pixels visible at drawing `progress`, in reveal order.
    pub fn revealed(&self, progress: f64) -> &[(u32, u32)] {
        &self.pixels[..self.revealed_count(progress)]
    }
}

/// All strokes of one drawing, longest first.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeSet {
    /// Source image width.
    pub width: u32,
    /// Source image height.
    pub height: u32,
    /// Strokes sorted by pixel count, descending.
    pub strokes: Vec<Stroke>,
}

impl StrokeSet {
    /// `true` when the drawing had no ink.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of ink pixels.
    pub fn total_pixels(&self) -> usize {
        self.strokes.iter().map(|s| s.pixels.len()).sum()
    }

    /// Every pixel visible at drawing `progress`.
    pub fn revealed_pixels(&self, progress: f64) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.strokes
            .iter()
            .flat_map(move |s| s.revealed(progress).iter().copied())
    }
}

enum Visited {
    Dense { width: u32, bits: Vec<bool> },
    Sparse(HashSet<(u32, u32)>),
}

impl Visited {
    fn new(width: u32, height: u32, sparse: bool) -> Self {
        if sparse {
            Self::Sparse(HashSet::new())
        } else {
            Self::Dense {
                width,
                bits: vec![false; (width as usize) * (height as usize)],
            }
        }
    }

    /// Mark `(x, y)`; returns `false` if it was already marked.
    fn insert(&mut self, x: u32, y: u32) -> bool {
        match self {
            Self::Dense { width, bits } => {
                let i = (y as usize) * (*width as usize) + (x as usize);
                !std::mem::replace(&mut bits[i], true)
            }
            Self::Sparse(set) => set.insert((x, y)),
        }
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        match self {
            Self::Dense { width, bits } => bits[(y as usize) * (*width as usize) + (x as usize)],
            Self::Sparse(set) => set.contains(&(x, y)),
        }
    }
}

/// Group ink pixels of `img` into strokes and assign reveal windows.
///
/// A pixel is ink when its luma is below `threshold` and it is not fully transparent. Stroke `i`
/// of `n` gets the window `[i/n, 1.0]`; odd strokes replay their pixels in reverse.
pub fn extract_strokes(img: &image::RgbaImage, threshold: u8) -> StrokeSet {
    let (w, h) = img.dimensions();
    let sparse = u64::from(w) * u64::from(h) > DENSE_VISITED_LIMIT;
    extract_strokes_with(img, threshold, sparse)
}

pub(crate) fn extract_strokes_with(img: &image::RgbaImage, threshold: u8, sparse: bool) -> StrokeSet {
    let (width, height) = img.dimensions();
    let is_ink = |x: u32, y: u32| {
        let p = img.get_pixel(x, y).0;
        p[3] > 0 && luma_u8(p[0], p[1], p[2]) < threshold
    };

    let mut visited = Visited::new(width, height, sparse);
    let mut components = Vec::<Vec<(u32, u32)>>::new();
    let mut queue = VecDeque::<(u32, u32)>::new();

    for y in 0..height {
        for x in 0..width {
            if visited.contains(x, y) || !is_ink(x, y) {
                continue;
            }
            visited.insert(x, y);
            queue.push_back((x, y));
            let mut pixels = Vec::new();

            while let Some((cx, cy)) = queue.pop_front() {
                pixels.push((cx, cy));
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = i64::from(cx) + dx;
                        let ny = i64::from(cy) + dy;
                        if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                            continue;
                        }
                        let (nx, ny) = (nx as u32, ny as u32);
                        if !visited.contains(nx, ny) && is_ink(nx, ny) {
                            visited.insert(nx, ny);
                            queue.push_back((nx, ny));
                        }
                    }
                }
            }
            components.push(pixels);
        }
    }

    // Stable: equal-length strokes keep raster discovery order.
    components.sort_by(|a, b| b.len().cmp(&a.len()));

    let n = components.len();
    let strokes = components
        .into_iter()
        .enumerate()
        .map(|(i, mut pixels)| {
            if i % 2 == 1 {
                pixels.reverse();
            }
            Stroke {
                pixels,
                reveal_start: i as f64 / n as f64,
                reveal_end: 1.0,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        width,
        height,
        strokes = strokes.len(),
        sparse,
        "extracted strokes"
    );
    StrokeSet {
        width,
        height,
        strokes,
    }
}

#[cfg(test)]
#[path = "../tests/unit/strokes/strokes.rs"]
mod tests;
