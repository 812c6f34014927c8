use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    comparison::ComparisonSpec,
    encode::sink::{FrameSink, SinkConfig},
    foundation::cancel::CancelToken,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{VersusError, VersusResult},
    render::frame::{FrameRGBA, FrameState},
    render::renderer::{FrameRenderer, RenderResources},
    timeline::schedule::AnimationSchedule,
};

/// Upper bound on frames held for reordering at once.
const MAX_REORDER_BUFFER_BYTES: usize = 128 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Threading and chunking controls for base-clip rendering.
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Render frames with identical state once and reuse the pixels.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were actually rendered.
    pub frames_rendered: u64,
    /// Frames reused via static-frame elision.
    pub frames_elided: u64,
}

impl RenderStats {
    fn add(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render every frame of the schedule and push them, in index order, into `sink`.
///
/// Frames may be rendered on a worker pool; delivery to the sink is always strictly ordered.
/// Cancellation is checked at every frame boundary. The sink is begun and ended here.
#[tracing::instrument(skip_all, fields(frames = schedule.total_frames(), parallel = threading.parallel))]
pub fn render_base_clip(
    resources: Arc<RenderResources>,
    schedule: &AnimationSchedule,
    spec: &ComparisonSpec,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
    cancel: &CancelToken,
) -> VersusResult<RenderStats> {
    let range = schedule.frame_range();
    if range.is_empty() {
        return Err(VersusError::validation("render range must be non-empty"));
    }
    cancel.check()?;

    let canvas = resources.canvas();
    let chunk_size = normalized_chunk_size(threading.chunk_size, canvas.rgba_len());
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let mut sequential = if pool.is_none() {
        Some(FrameRenderer::new(Arc::clone(&resources))?)
    } else {
        None
    };

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: schedule.fps(),
        audio: None,
    })?;

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        let states = (chunk.start.0..chunk.end.0)
            .map(|f| schedule.state_at(spec, FrameIndex(f)))
            .collect::<Vec<_>>();
        let plan = plan_unique(&states, threading.static_frame_elision);

        let unique_frames = match (&pool, sequential.as_mut()) {
            (Some(pool), _) => render_unique_parallel(&resources, &states, &plan, pool, cancel)?,
            (None, Some(renderer)) => render_unique_sequential(renderer, &states, &plan, cancel)?,
            (None, None) => {
                return Err(VersusError::render(
                    "internal error: no renderer available for base clip",
                ));
            }
        };

        for (offset, &u) in plan.frame_to_unique.iter().enumerate() {
            cancel.check()?;
            let frame = unique_frames.get(u).ok_or_else(|| {
                VersusError::render("internal error: unique frame index out of range")
            })?;
            sink.push_frame(FrameIndex(chunk.start.0 + offset as u64), frame)?;
        }

        stats.add(plan.stats());
        chunk_start = chunk_end;
    }

    cancel.check()?;
    sink.end()?;
    tracing::info!(
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "base clip rendered"
    );
    Ok(stats)
}

struct UniquePlan {
    unique_indices: Vec<usize>,
    frame_to_unique: Vec<usize>,
}

impl UniquePlan {
    fn stats(&self) -> RenderStats {
        let total = self.frame_to_unique.len() as u64;
        let rendered = self.unique_indices.len() as u64;
        RenderStats {
            frames_total: total,
            frames_rendered: rendered,
            frames_elided: total.saturating_sub(rendered),
        }
    }
}

fn plan_unique(states: &[FrameState], elide: bool) -> UniquePlan {
    let mut unique_indices = Vec::<usize>::with_capacity(states.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(states.len());
    if elide {
        let mut first = HashMap::<u64, usize>::new();
        for (idx, state) in states.iter().enumerate() {
            let fingerprint = state.fingerprint();
            if let Some(existing) = first.get(&fingerprint).copied() {
                frame_to_unique.push(existing);
            } else {
                let slot = unique_indices.len();
                unique_indices.push(idx);
                first.insert(fingerprint, slot);
                frame_to_unique.push(slot);
            }
        }
    } else {
        for idx in 0..states.len() {
            frame_to_unique.push(idx);
            unique_indices.push(idx);
        }
    }
    UniquePlan {
        unique_indices,
        frame_to_unique,
    }
}

fn render_unique_sequential(
    renderer: &mut FrameRenderer,
    states: &[FrameState],
    plan: &UniquePlan,
    cancel: &CancelToken,
) -> VersusResult<Vec<FrameRGBA>> {
    let mut out = Vec::with_capacity(plan.unique_indices.len());
    for &i in &plan.unique_indices {
        cancel.check()?;
        out.push(renderer.render_frame(&states[i])?);
    }
    Ok(out)
}

fn render_unique_parallel(
    resources: &Arc<RenderResources>,
    states: &[FrameState],
    plan: &UniquePlan,
    pool: &rayon::ThreadPool,
    cancel: &CancelToken,
) -> VersusResult<Vec<FrameRGBA>> {
    let rendered = pool.install(|| {
        plan.unique_indices
            .par_iter()
            .map_init(
                || FrameRenderer::new(Arc::clone(resources)),
                |worker, state_idx| -> VersusResult<FrameRGBA> {
                    cancel.check()?;
                    match worker {
                        Ok(renderer) => renderer.render_frame(&states[*state_idx]),
                        Err(e) => Err(VersusError::render(format!(
                            "failed to create worker renderer: {e}"
                        ))),
                    }
                },
            )
            .collect::<Vec<_>>()
    });

    let mut unique_frames = Vec::<FrameRGBA>::with_capacity(rendered.len());
    for item in rendered {
        unique_frames.push(item?);
    }
    Ok(unique_frames)
}

fn build_thread_pool(threads: Option<usize>) -> VersusResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(VersusError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| VersusError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize, frame_bytes: usize) -> u64 {
    let cap = (MAX_REORDER_BUFFER_BYTES / frame_bytes.max(1)).max(1);
    chunk_size.clamp(1, cap) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
