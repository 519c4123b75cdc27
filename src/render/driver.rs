use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::encode::output::FrameOutput;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::prepare::PreparedReel;
use crate::render::compositor::FrameCompositor;
use crate::schedule::scroll::ScrollPlan;

/// How frames are scheduled onto threads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Render each chunk's frames on a rayon pool.
    pub parallel: bool,
    /// Frames scheduled per chunk. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Explicit worker count; rayon's default when unset.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Frame generation outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames requested.
    pub frames_total: u64,
    /// Frames composited and written.
    pub frames_rendered: u64,
    /// Frames that failed with a recoverable error or panic.
    pub frames_failed: u64,
    /// Indices of the failed frames, ascending.
    pub failed_frames: Vec<u64>,
}

/// Render every frame of `reel` into `output`.
pub fn render_frames(
    reel: &PreparedReel,
    scroll: &ScrollPlan,
    threading: &RenderThreading,
    output: &dyn FrameOutput,
) -> ReelResult<RenderStats> {
    let range = FrameRange::first(reel.timeline().total_frames());
    render_frame_range(reel, scroll, range, threading, output)
}

/// Render `range` into `output`.
///
/// Frames are independent: a recoverable failure in one frame is logged and counted while the
/// others continue. A fatal error (see [`ReelError::is_fatal`]) stops scheduling, skips the
/// frames of its chunk that have not started yet and is returned.
pub fn render_frame_range(
    reel: &PreparedReel,
    scroll: &ScrollPlan,
    range: FrameRange,
    threading: &RenderThreading,
    output: &dyn FrameOutput,
) -> ReelResult<RenderStats> {
    if range.is_empty() {
        return Err(ReelError::config("render range must be non-empty"));
    }
    let total = reel.timeline().total_frames();
    if range.end.0 > total {
        return Err(ReelError::config(format!(
            "render range ends at frame {} but the reel has {total} frames",
            range.end.0
        )));
    }

    let compositor = FrameCompositor::new(reel, scroll);
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let abort = AtomicBool::new(false);

    let job = |f: u64| -> Option<ReelResult<()>> {
        if abort.load(Ordering::Relaxed) {
            return None;
        }
        let res = render_one(&compositor, output, FrameIndex(f));
        if let Err(e) = &res
            && e.is_fatal()
        {
            abort.store(true, Ordering::Relaxed);
        }
        Some(res)
    };

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let indices = (chunk_start..chunk_end).collect::<Vec<u64>>();

        let results = match &pool {
            Some(pool) => pool.install(|| indices.par_iter().map(|&f| job(f)).collect::<Vec<_>>()),
            None => indices.iter().map(|&f| job(f)).collect::<Vec<_>>(),
        };

        let mut fatal = None;
        for (&f, res) in indices.iter().zip(results) {
            stats.frames_total += 1;
            match res {
                Some(Ok(())) => stats.frames_rendered += 1,
                Some(Err(e)) if e.is_fatal() => {
                    if fatal.is_none() {
                        fatal = Some(e);
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(frame = f, error = %e, "frame failed");
                    stats.frames_failed += 1;
                    stats.failed_frames.push(f);
                }
                None => {}
            }
        }
        if let Some(e) = fatal {
            return Err(e);
        }
        chunk_start = chunk_end;
    }

    tracing::info!(
        frames_total = stats.frames_total,
        frames_rendered = stats.frames_rendered,
        frames_failed = stats.frames_failed,
        parallel = threading.parallel,
        "frame generation finished"
    );
    Ok(stats)
}

fn render_one(
    compositor: &FrameCompositor<'_>,
    output: &dyn FrameOutput,
    frame: FrameIndex,
) -> ReelResult<()> {
    let res = catch_unwind(AssertUnwindSafe(|| {
        let rendered = compositor.render_frame(frame)?;
        output.write_frame(frame, &rendered)
    }));
    match res {
        Ok(r) => r,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ReelError::render(format!("frame {} panicked: {msg}", frame.0)))
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
