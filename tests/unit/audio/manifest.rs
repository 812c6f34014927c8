use super::*;
use crate::assets::media::VideoSourceInfo;
use crate::comparison::Side;
use crate::config::VideoConfig;
use crate::timeline::layers::{OverlayAsset, ProbedOverlay, plan_timeline};

fn timeline(winner: Option<Side>, with_audio: bool) -> Timeline {
    let overlays = OverlayAsset::default_set(Path::new("clips"))
        .into_iter()
        .map(|asset| ProbedOverlay {
            info: VideoSourceInfo {
                source_path: asset.path.clone(),
                width: 200,
                height: 200,
                duration_secs: Some(3.0),
                has_audio: with_audio,
            },
            asset,
        })
        .collect::<Vec<_>>();
    plan_timeline(winner, &overlays, &VideoConfig::default()).unwrap()
}

fn silence(frames: usize) -> AudioPcm {
    AudioPcm {
        sample_rate: media::MIX_SAMPLE_RATE,
        channels: 2,
        interleaved_f32: vec![0.1; frames * 2],
    }
}

#[test]
fn narration_and_overlay_audio_are_planned() {
    let cfg = NarrationConfig::default();
    let tracks = plan_audio_tracks(
        &timeline(Some(Side::A), true),
        Some(Path::new("/tmp/n.wav")),
        &cfg,
        10.0,
    );
    assert_eq!(tracks.len(), 4);
    assert_eq!(tracks[0].source, AudioSource::Narration);
    assert_eq!(tracks[0].start_secs, 0.0);

    let marker = tracks
        .iter()
        .find(|t| t.source == AudioSource::Overlay(OverlayRole::WinMarker))
        .unwrap();
    assert_eq!(marker.start_secs, 8.0);
    assert_eq!(marker.end_secs, 10.0);

    let intro = tracks
        .iter()
        .find(|t| t.source == AudioSource::Overlay(OverlayRole::Intro))
        .unwrap();
    assert_eq!((intro.start_secs, intro.end_secs), (2.0, 5.0));
}

#[test]
fn tie_has_no_marker_audio_and_silent_clips_are_skipped() {
    let cfg = NarrationConfig::default();
    let tracks = plan_audio_tracks(&timeline(None, true), None, &cfg, 10.0);
    assert!(
        tracks
            .iter()
            .all(|t| t.source != AudioSource::Overlay(OverlayRole::WinMarker))
    );
    assert_eq!(tracks.len(), 2);

    let tracks = plan_audio_tracks(&timeline(Some(Side::B), false), None, &cfg, 10.0);
    assert!(tracks.is_empty());
}

#[test]
fn manifest_places_tracks_in_sample_space_and_decodes_once() {
    let cfg = NarrationConfig {
        offset_secs: 0.5,
        ..NarrationConfig::default()
    };
    let mut tracks = plan_audio_tracks(
        &timeline(Some(Side::A), true),
        Some(Path::new("n.wav")),
        &cfg,
        10.0,
    );
    // Same source twice.
    tracks.push(tracks[1].clone());

    let mut decoded = 0;
    let fps = Fps::new(30, 1).unwrap();
    let manifest = build_audio_manifest_with(&tracks, fps, 300, |_| {
        decoded += 1;
        Ok(silence(48_000))
    })
    .unwrap();

    assert_eq!(decoded, 4);
    assert_eq!(manifest.total_samples, 480_000);
    assert_eq!(manifest.segments.len(), 5);
    assert_eq!(manifest.segments[0].timeline_start_sample, 24_000);
    assert_eq!(manifest.segments[0].timeline_end_sample, 480_000);
}

#[test]
fn empty_sources_are_skipped() {
    let tracks = plan_audio_tracks(
        &timeline(None, false),
        Some(Path::new("n.wav")),
        &NarrationConfig::default(),
        10.0,
    );
    let manifest = build_audio_manifest_with(&tracks, Fps::new(30, 1).unwrap(), 300, |_| {
        Ok(AudioPcm {
            sample_rate: media::MIX_SAMPLE_RATE,
            channels: 2,
            interleaved_f32: Vec::new(),
        })
    })
    .unwrap();
    assert!(manifest.segments.is_empty());
}
