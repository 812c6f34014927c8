use crate::assets::media::{self, AudioPcm, decode_audio_f32_stereo};
use crate::audio::mix::{frame_to_sample, secs_to_sample};
use crate::config::NarrationConfig;
use crate::foundation::core::Fps;
use crate::foundation::error::{VersusError, VersusResult};
use crate::timeline::layers::{OverlayRole, Timeline};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Origin of an audio track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioSource {
    /// Synthesized title narration.
    Narration,
    /// Embedded audio of an overlay clip.
    Overlay(OverlayRole),
}

/// One audio contribution on the output timeline, in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    /// Where the track comes from.
    pub source: AudioSource,
    /// Media file carrying the audio.
    pub path: PathBuf,
    /// Timeline start.
    pub start_secs: f64,
    /// Timeline end (exclusive).
    pub end_secs: f64,
    /// Offset into the source that plays at `start_secs`.
    pub source_start_secs: f64,
}

/// Narration at its lead-in offset plus the audio of every overlay layer that has any.
///
/// Overlay audio plays over the same window as the overlay picture. Tracks are only ever
/// summed, never cross-faded.
pub fn plan_audio_tracks(
    timeline: &Timeline,
    narration: Option<&Path>,
    cfg: &NarrationConfig,
    total_secs: f64,
) -> Vec<AudioTrack> {
    let mut tracks = Vec::new();
    if let Some(path) = narration
        && cfg.offset_secs < total_secs
    {
        tracks.push(AudioTrack {
            source: AudioSource::Narration,
            path: path.to_path_buf(),
            start_secs: cfg.offset_secs,
            end_secs: total_secs,
            source_start_secs: 0.0,
        });
    }
    for layer in timeline.layers().iter().filter(|l| l.has_audio) {
        tracks.push(AudioTrack {
            source: AudioSource::Overlay(layer.role.clone()),
            path: layer.path.clone(),
            start_secs: layer.start_secs,
            end_secs: layer.end_secs.min(total_secs),
            source_start_secs: layer.source_start_secs,
        });
    }
    for t in &tracks {
        tracing::debug!(source = ?t.source, start = t.start_secs, end = t.end_secs, "audio track planned");
    }
    tracks
}

/// One scheduled audio contribution in timeline sample space.
#[derive(Clone, Debug)]
pub struct AudioSegment {
    /// First output sample.
    pub timeline_start_sample: u64,
    /// One past the last output sample.
    pub timeline_end_sample: u64,
    /// Source offset in seconds at `timeline_start_sample`.
    pub source_start_sec: f64,
    /// Source sample rate.
    pub source_sample_rate: u32,
    /// Source channel count (1 or 2).
    pub source_channels: u16,
    /// Decoded source PCM.
    pub source_interleaved_f32: Arc<Vec<f32>>,
}

/// Audio mixing plan covering the whole output.
#[derive(Clone, Debug)]
pub struct AudioManifest {
    /// Output sample rate.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output length in sample frames.
    pub total_samples: u64,
    /// Contributions to sum.
    pub segments: Vec<AudioSegment>,
}

/// Decode every track through `ffmpeg` and lay it out over `total_frames` at `fps`.
pub fn build_audio_manifest(
    tracks: &[AudioTrack],
    fps: Fps,
    total_frames: u64,
) -> VersusResult<AudioManifest> {
    build_audio_manifest_with(tracks, fps, total_frames, |path| {
        decode_audio_f32_stereo(path, media::MIX_SAMPLE_RATE)
    })
}

/// [`build_audio_manifest`] with a caller supplied decoder.
///
/// Each distinct path is decoded once; tracks whose source has no audio are skipped.
pub fn build_audio_manifest_with(
    tracks: &[AudioTrack],
    fps: Fps,
    total_frames: u64,
    mut decode: impl FnMut(&Path) -> VersusResult<AudioPcm>,
) -> VersusResult<AudioManifest> {
    if total_frames == 0 {
        return Err(VersusError::validation(
            "audio manifest range must be non-empty",
        ));
    }
    let sample_rate = media::MIX_SAMPLE_RATE;
    let total_samples = frame_to_sample(total_frames, fps, sample_rate);

    let mut cache = HashMap::<PathBuf, (u32, u16, Arc<Vec<f32>>)>::new();
    let mut segments = Vec::with_capacity(tracks.len());
    for track in tracks {
        let (src_rate, src_channels, data) = match cache.get(&track.path) {
            Some(hit) => hit.clone(),
            None => {
                let pcm = decode(&track.path)?;
                if pcm.channels == 0 || pcm.sample_rate == 0 {
                    return Err(VersusError::encoding(format!(
                        "decoded audio of '{}' has no channels or rate",
                        track.path.display()
                    )));
                }
                let entry = (pcm.sample_rate, pcm.channels, Arc::new(pcm.interleaved_f32));
                cache.insert(track.path.clone(), entry.clone());
                entry
            }
        };
        if data.is_empty() {
            tracing::debug!(path = %track.path.display(), "no audio decoded, track skipped");
            continue;
        }

        let start = secs_to_sample(track.start_secs, sample_rate).min(total_samples);
        let end = secs_to_sample(track.end_secs, sample_rate).min(total_samples);
        if start >= end {
            continue;
        }
        segments.push(AudioSegment {
            timeline_start_sample: start,
            timeline_end_sample: end,
            source_start_sec: track.source_start_secs.max(0.0),
            source_sample_rate: src_rate,
            source_channels: src_channels,
            source_interleaved_f32: data,
        });
    }

    Ok(AudioManifest {
        sample_rate,
        channels: 2,
        total_samples,
        segments,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/manifest.rs"]
mod tests;
