//! The Timeline Compositor: base clip rendering, overlay layering, narration and final mux.

use crate::assets::font::{load_font_bytes, resolve_font_path};
use crate::assets::media::{VideoFrameReader, VideoReadOpts, probe_video};
use crate::assets::portrait::PortraitStore;
use crate::audio::manifest::{build_audio_manifest, plan_audio_tracks};
use crate::audio::mix::{mix_manifest, write_mix_to_f32le_file};
use crate::audio::narration::{CommandSynthesizer, SpeechSynthesizer};
use crate::comparison::{ComparisonSpec, Side};
use crate::composite::blend::composite_over_at;
use crate::composite::chroma::chroma_key_in_place;
use crate::composite::state::{RunState, RunTracker};
use crate::config::RunConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{VersusError, VersusResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::foundation::temp::{TempArtifacts, unique_temp_path};
use crate::render::frame::FrameRGBA;
use crate::render::pipeline::{RenderStats, render_base_clip};
use crate::render::renderer::{FrameRenderer, RenderResources};
use crate::theme;
use crate::timeline::layers::{
    OverlayAsset, OverlayRole, ProbedOverlay, Timeline, TimelineLayer, plan_timeline,
};
use crate::timeline::schedule::AnimationSchedule;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Summary of a finished run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Final output file.
    pub output: PathBuf,
    /// Output frame count.
    pub frames: u64,
    /// Base clip rendering counters.
    pub render: RenderStats,
    /// Winning column, if any.
    pub winner: Option<Side>,
    /// Roles of the overlay layers that made it onto the timeline, in draw order.
    pub layers: Vec<OverlayRole>,
    /// Number of mixed audio tracks.
    pub audio_tracks: usize,
    /// Run states entered, in order.
    pub states: Vec<RunState>,
}

/// Turns a [`ComparisonSpec`] into a finished video file.
///
/// One compositor may run any number of comparisons; every run owns its intermediates and
/// removes them on success, failure and cancellation alike. No output file is left behind
/// unless the run completes.
pub struct Compositor {
    config: RunConfig,
    narrator: Option<Arc<dyn SpeechSynthesizer>>,
    cancel: CancelToken,
    temp_dir: Option<PathBuf>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.config)
            .field("narrator", &self.narrator.is_some())
            .field("cancelled", &self.cancel.is_cancelled())
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

impl Compositor {
    /// Create a compositor for a validated configuration.
    ///
    /// With narration enabled the configured command synthesizer is used until
    /// [`Compositor::with_narrator`] replaces it.
    pub fn new(config: RunConfig) -> VersusResult<Self> {
        config.validate()?;
        let narrator: Option<Arc<dyn SpeechSynthesizer>> = if config.narration.enabled {
            Some(Arc::new(CommandSynthesizer::from_config(&config.narration)))
        } else {
            None
        };
        Ok(Self {
            config,
            narrator,
            cancel: CancelToken::new(),
            temp_dir: None,
        })
    }

    /// Use `narrator` for the title narration.
    pub fn with_narrator(mut self, narrator: impl SpeechSynthesizer + 'static) -> Self {
        self.narrator = Some(Arc::new(narrator));
        self
    }

    /// Skip narration entirely.
    pub fn without_narration(mut self) -> Self {
        self.narrator = None;
        self
    }

    /// Observe `token` for cooperative cancellation.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Place intermediates in `dir` instead of next to the output file.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Token observed by this compositor.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Render, layer, mix and mux `spec` into `out_path`.
    ///
    /// Failures are reported as [`VersusError::Composition`] tagged with the stage they
    /// happened in; [`VersusError::root`] yields the underlying asset, spec, encoding or
    /// cancellation error.
    #[tracing::instrument(skip_all, fields(title = spec.title(), out = %out_path.display()))]
    pub fn composite(
        &self,
        spec: &ComparisonSpec,
        overlays: &[OverlayAsset],
        out_path: &Path,
    ) -> VersusResult<RunReport> {
        let mut tracker = RunTracker::new();
        let mut temps = TempArtifacts::new();
        let result = self.run(spec, overlays, out_path, &mut tracker, &mut temps);
        drop(temps);
        result.map_err(|e| tracker.fail(e))
    }

    /// Render the single frame shown at `t` seconds.
    pub fn render_still(&self, spec: &ComparisonSpec, t: f64) -> VersusResult<FrameRGBA> {
        let schedule = AnimationSchedule::new(&self.config.video)?;
        let frame = schedule.fps().secs_to_frames_floor(t.max(0.0));
        let frame = frame.min(schedule.total_frames().saturating_sub(1));
        let resources = self.load_resources(spec)?;
        let mut renderer = FrameRenderer::new(resources)?;
        renderer.render_frame(&schedule.state_at(spec, FrameIndex(frame)))
    }

    fn run(
        &self,
        spec: &ComparisonSpec,
        overlays: &[OverlayAsset],
        out_path: &Path,
        tracker: &mut RunTracker,
        temps: &mut TempArtifacts,
    ) -> VersusResult<RunReport> {
        let video = &self.config.video;
        let schedule = AnimationSchedule::new(video)?;
        let winner = spec.winner();

        // Every input is resolved before the first frame so missing assets abort cleanly.
        let resources = self.load_resources(spec)?;
        let probed = probe_overlays(overlays, winner)?;
        ensure_parent_dir(out_path)?;
        let work_dir = self.work_dir(out_path);
        self.cancel.check()?;

        tracker.advance(RunState::RenderingFrames)?;
        let base_path = temps.track(unique_temp_path(&work_dir, "versus_base", "mp4"));
        let mut base_sink = FfmpegSink::new(FfmpegSinkOpts::intermediate(&base_path));
        let render = render_base_clip(
            resources,
            &schedule,
            spec,
            &mut base_sink,
            &self.config.render,
            &self.cancel,
        )?;
        drop(base_sink);
        tracker.advance(RunState::BaseClipReady)?;

        tracker.advance(RunState::Compositing)?;
        let timeline = plan_timeline(winner, &probed, video)?;
        let narration_path = match &self.narrator {
            Some(narrator) => {
                let path = temps.track(unique_temp_path(&work_dir, "versus_narration", "wav"));
                let text = self.config.narration.text_for(spec.title());
                narrator.synthesize(&text, &path)?;
                Some(path)
            }
            None => None,
        };
        self.cancel.check()?;
        let tracks = plan_audio_tracks(
            &timeline,
            narration_path.as_deref(),
            &self.config.narration,
            video.total_secs(),
        );
        let audio = if tracks.is_empty() {
            None
        } else {
            let manifest = build_audio_manifest(&tracks, schedule.fps(), schedule.total_frames())?;
            let mix = mix_manifest(&manifest);
            let path = temps.track(unique_temp_path(&work_dir, "versus_mix", "f32le"));
            write_mix_to_f32le_file(&mix, &path)?;
            Some(AudioInputConfig {
                path,
                sample_rate: manifest.sample_rate,
                channels: manifest.channels,
            })
        };

        // Last cancellation point; the final encode runs to completion once started.
        self.cancel.check()?;
        tracker.advance(RunState::Encoding)?;
        let partial = temps.track(unique_temp_path(
            &parent_dir(out_path),
            ".versus_partial",
            "mp4",
        ));
        encode_final(&base_path, &timeline, &schedule, video.canvas(), audio, &partial)?;
        {
            use anyhow::Context as _;
            std::fs::rename(&partial, out_path).with_context(|| {
                format!("failed to move output into place at '{}'", out_path.display())
            })?;
        }
        tracker.advance(RunState::Done)?;

        tracing::info!(
            frames = schedule.total_frames(),
            layers = timeline.layers().len(),
            audio_tracks = tracks.len(),
            "composition finished"
        );
        Ok(RunReport {
            output: out_path.to_path_buf(),
            frames: schedule.total_frames(),
            render,
            winner,
            layers: timeline.layers().iter().map(|l| l.role.clone()).collect(),
            audio_tracks: tracks.len(),
            states: tracker.visited().to_vec(),
        })
    }

    fn load_resources(&self, spec: &ComparisonSpec) -> VersusResult<Arc<RenderResources>> {
        let assets = &self.config.assets;
        let font_path = resolve_font_path(assets.font_path.as_deref())?;
        let font = load_font_bytes(&font_path)?;
        let names = Side::BOTH.map(|s| spec.subject(s).name.as_str());
        let portraits = PortraitStore::load(&assets.portraits_dir, &names)?;
        let resources = RenderResources::new(self.config.video.canvas(), font, &portraits, &names)?;
        Ok(Arc::new(resources))
    }

    fn work_dir(&self, out_path: &Path) -> PathBuf {
        match &self.temp_dir {
            Some(dir) => dir.clone(),
            None => parent_dir(out_path),
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Probe every overlay the run can use; on a tie, winner-only overlays are skipped unread.
fn probe_overlays(
    overlays: &[OverlayAsset],
    winner: Option<Side>,
) -> VersusResult<Vec<ProbedOverlay>> {
    let mut probed = Vec::with_capacity(overlays.len());
    for asset in overlays {
        asset.validate()?;
        if winner.is_none() && asset.needs_winner() {
            tracing::debug!(role = %asset.role, "no winner, overlay not probed");
            continue;
        }
        if !asset.path.is_file() {
            return Err(VersusError::asset_not_found(
                format!("{} overlay", asset.role),
                &asset.path,
            ));
        }
        let info = probe_video(&asset.path)?;
        tracing::debug!(role = %asset.role, width = info.width, height = info.height, duration = ?info.duration_secs, "overlay probed");
        probed.push(ProbedOverlay {
            asset: asset.clone(),
            info,
        });
    }
    Ok(probed)
}

/// Decoder state of one overlay layer during the final pass.
struct LayerStream {
    reader: Option<VideoFrameReader>,
    buf: Vec<u8>,
    done: bool,
}

impl LayerStream {
    fn idle() -> Self {
        Self {
            reader: None,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Next overlay frame as premultiplied RGBA, opening the decoder on first use.
    fn next_frame(&mut self, layer: &TimelineLayer, fps: u32) -> VersusResult<Option<&[u8]>> {
        if self.done {
            return Ok(None);
        }
        if self.reader.is_none() {
            let reader = VideoFrameReader::open(
                &layer.path,
                &VideoReadOpts {
                    start_secs: layer.source_start_secs,
                    duration_secs: Some(layer.duration_secs()),
                    fps,
                    width: layer.width,
                    height: layer.height,
                },
            )?;
            self.buf = vec![0u8; reader.frame_len()];
            self.reader = Some(reader);
            tracing::debug!(role = %layer.role, "overlay decoder opened");
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        if !reader.read_frame(&mut self.buf)? {
            self.close()?;
            return Ok(None);
        }
        match &layer.chroma_key {
            Some(key) => chroma_key_in_place(&mut self.buf, key),
            None => premultiply_rgba8_in_place(&mut self.buf),
        }
        Ok(Some(self.buf.as_slice()))
    }

    fn close(&mut self) -> VersusResult<()> {
        self.done = true;
        match self.reader.take() {
            Some(reader) => reader.finish(),
            None => Ok(()),
        }
    }
}

/// Decode the base clip, draw active overlays on every frame and encode with the mixed audio.
fn encode_final(
    base_path: &Path,
    timeline: &Timeline,
    schedule: &AnimationSchedule,
    canvas: Canvas,
    audio: Option<AudioInputConfig>,
    out_path: &Path,
) -> VersusResult<()> {
    let fps = schedule.fps();
    let mut base = VideoFrameReader::open(
        base_path,
        &VideoReadOpts {
            start_secs: 0.0,
            duration_secs: None,
            fps: fps.num,
            width: canvas.width,
            height: canvas.height,
        },
    )?;
    let [r, g, b, _] = theme::BG_BOTTOM;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        bg_rgb: [r, g, b],
        ..FfmpegSinkOpts::new(out_path)
    });
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        audio,
    })?;

    let mut streams = timeline
        .layers()
        .iter()
        .map(|_| LayerStream::idle())
        .collect::<Vec<_>>();
    let mut frame = FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: vec![0u8; canvas.rgba_len()],
    };

    for f in 0..schedule.total_frames() {
        let idx = FrameIndex(f);
        if !base.read_frame(&mut frame.data)? {
            return Err(VersusError::encoding(format!(
                "base clip ended after {f} of {} frames",
                schedule.total_frames()
            )));
        }
        let t = schedule.time_of(idx);
        for (layer, stream) in timeline.layers().iter().zip(streams.iter_mut()) {
            if layer.is_active_at(t) {
                if let Some(px) = stream.next_frame(layer, fps.num)? {
                    composite_over_at(&mut frame, px, layer.width, layer.height, layer.x, layer.y)?;
                }
            } else if t >= layer.end_secs && stream.reader.is_some() {
                stream.close()?;
            }
        }
        sink.push_frame(idx, &frame)?;
    }

    for stream in &mut streams {
        stream.close()?;
    }
    base.finish()?;
    sink.end()
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
