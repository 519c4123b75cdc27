//! Sketchreel turns recorded drawing-game sessions into vertical short-form videos.
//!
//! Every round of a session (a prompt plus a drawing) is animated through a fixed sequence of
//! phases: the previous drawing is analyzed, the prompt fades in, a new drawing is generated and
//! then drawn stroke by stroke. Finished rounds stack up in a scrolling column.
//!
//! The public API follows the stages of a job:
//!
//! - Load a [`Session`] and a [`RenderConfig`]
//! - Preprocess once into an immutable [`PreparedReel`]
//! - Composite frames with a [`FrameCompositor`], or render them all into a [`FrameOutput`]
//! - Encode the PNG sequence with [`render_to_video`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod elements;
pub mod encode;
pub mod foundation;
pub mod pipeline;
pub mod prepare;
pub mod render;
pub mod schedule;
pub mod session;
pub mod strokes;

pub use crate::assets::fonts::{FontResolver, FontSpec, ResolvedFont};
pub use crate::config::{RenderConfig, Style};
pub use crate::encode::output::{FrameOutput, InMemoryOutput, PngSequenceOutput};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8Premul};
pub use crate::foundation::error::{ReelError, ReelResult, RenderStage};
pub use crate::foundation::raster::FrameRGBA;
pub use crate::pipeline::{
    RenderReport, TimelineReport, describe_timeline, render_single_frame, render_to_video,
};
pub use crate::prepare::{PreparedReel, PreparedRound, RoundImage};
pub use crate::render::compositor::{FrameCompositor, LayerKind, RenderedElement};
pub use crate::render::driver::{RenderStats, RenderThreading, render_frame_range, render_frames};
pub use crate::schedule::Timeline;
pub use crate::schedule::phase::{ElementKind, LoadingKind, Phase, PhasePoint, PhaseSpan};
pub use crate::schedule::scroll::ScrollPlan;
pub use crate::session::{Round, Session};
pub use crate::strokes::{Stroke, StrokeSet, extract_strokes};
