//! Disk-facing inputs read once during preprocessing: drawings and fonts.

/// Embedded bitmap font.
pub mod bitmap_font;
/// Drawing decode and resize.
pub mod decode;
/// Font specification and resolution.
pub mod fonts;
