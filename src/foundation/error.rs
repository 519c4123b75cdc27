/// Convenience result type used across sketchreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Stage of a render job, reported when a job fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStage {
    /// Session loading, font resolution, stroke extraction, element caches and scroll plan.
    Preprocess,
    /// Per-frame compositing and frame output.
    FrameGeneration,
    /// External encoder invocation and audio track assembly.
    Encoding,
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Preprocess => "preprocessing",
            Self::FrameGeneration => "frame-generation",
            Self::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Top-level error taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or unusable job inputs (missing session, no font, zero rounds).
    #[error("configuration error: {0}")]
    Config(String),

    /// A single round's data is missing or malformed.
    #[error("round data error: {0}")]
    Data(String),

    /// A single frame could not be composited.
    #[error("render error: {0}")]
    Render(String),

    /// Frame output could not be written.
    #[error("output error: {0}")]
    Output(String),

    /// External encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Failure attributed to one stage of a render job.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Stage that failed.
        stage: RenderStage,
        /// Underlying failure.
        #[source]
        source: Box<ReelError>,
    },

    /// Frame generation produced fewer frames than requested.
    #[error("only {succeeded} of {total} frames rendered successfully")]
    PartialFrames {
        /// Frames written successfully.
        succeeded: u64,
        /// Frames requested.
        total: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::Data`] value.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Output`] value.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attribute this error to `stage`. Already tagged errors keep their original stage.
    pub fn in_stage(self, stage: RenderStage) -> Self {
        match self {
            tagged @ Self::Stage { .. } => tagged,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage this error was attributed to, if any.
    pub fn stage(&self) -> Option<RenderStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// `true` for errors that must cancel every remaining frame job.
    ///
    /// Per-round data and per-frame render errors are isolated to their frame.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Output(_) | Self::Encode(_) => true,
            Self::Stage { source, .. } => source.is_fatal(),
            Self::Data(_) | Self::Render(_) | Self::Serde(_) | Self::PartialFrames { .. } => false,
            Self::Other(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
