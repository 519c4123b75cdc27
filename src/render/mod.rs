//! Frame compositing and the render driver.

/// Per-frame layer assembly and compositing.
pub mod compositor;
/// Chunked, optionally parallel frame generation.
pub mod driver;
