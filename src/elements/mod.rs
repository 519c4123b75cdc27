//! Element renderer: self-contained transparent rasters stacked into frames.

/// Drawing animation, final image and placeholder.
pub mod image;
/// Loading indicator.
pub mod loading;
/// Text measurement, wrapping and rasterization.
pub mod text;
/// Title banner.
pub mod title;
