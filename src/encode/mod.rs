//! Frame outputs and the external encoder.
//!
//! Frames are written as a PNG sequence and handed to the system `ffmpeg` binary once frame
//! generation finishes.

/// `ffmpeg` invocation (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Frame output trait and built-in outputs.
pub mod output;
