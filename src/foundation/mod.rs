//! Shared building blocks: frame/time types, the error taxonomy, pixel math and the
//! premultiplied raster type every element renders into.

/// Frame indices, ranges, rates and colors.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
/// Premultiplied RGBA8 frames.
pub mod raster;
