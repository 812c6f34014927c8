//! Versus renders short vertical videos comparing one statistic between two subjects.
//!
//! The crate has two halves:
//!
//! - a deterministic frame renderer ([`FrameRenderer`]) turning a [`FrameState`] into an opaque
//!   RGBA raster: pitch background, glowing title and "VS" marker, portraits, animated counters
//!   in colored stat boxes and an optional row of secondary callouts;
//! - a timeline compositor ([`Compositor`]) that drives the renderer once per output frame,
//!   layers chroma-keyed overlay clips on top, mixes narration with the overlays' audio and
//!   muxes everything to an H.264/AAC MP4 through the system `ffmpeg`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Portrait, font and media inputs.
pub mod assets;
/// Narration and audio mixing.
pub mod audio;
/// Comparison input and winner determination.
pub mod comparison;
/// Overlay compositing and the compositor run.
pub mod composite;
/// Run configuration.
pub mod config;
/// Uniqueness bookkeeping for produced comparisons.
pub mod dedup;
/// Encoding sinks.
pub mod encode;
/// Frame rendering.
pub mod render;
/// Fixed visual constants.
pub mod theme;
/// Animation timing and overlay timeline.
pub mod timeline;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{VersusError, VersusResult};

pub use crate::comparison::{
    ComparisonSpec, SecondaryStat, SeriesPosition, Side, StatValue, Subject,
};
pub use crate::composite::compositor::{Compositor, RunReport};
pub use crate::composite::state::RunState;
pub use crate::config::{RunConfig, VideoConfig};
pub use crate::dedup::{InMemoryRegistry, JsonFileRegistry, UniquenessCheck};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::frame::{FrameRGBA, FrameState};
pub use crate::render::pipeline::{RenderStats, RenderThreading, render_base_clip};
pub use crate::render::renderer::{FrameRenderer, RenderResources};
pub use crate::timeline::layers::{OverlayAsset, OverlayRole};
pub use crate::timeline::schedule::AnimationSchedule;
