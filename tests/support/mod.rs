#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use versus::audio::narration::SpeechSynthesizer;
use versus::config::{AssetConfig, NarrationConfig};
use versus::{RunConfig, VersusError, VersusResult, VideoConfig};

pub fn font_available() -> bool {
    versus::assets::font::resolve_font_path(None).is_ok()
}

pub fn ffmpeg_available() -> bool {
    versus::assets::media::is_ffmpeg_on_path()
}

pub fn write_portraits(dir: &Path, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        let shade = 60 + 80 * i as u8;
        let img = image::RgbaImage::from_pixel(64, 64, image::Rgba([shade, 100, 160, 255]));
        img.save(dir.join(format!("{}.png", name.to_lowercase())))
            .unwrap();
    }
}

/// Black clip with a white box in the middle, optionally with a sine tone.
pub fn make_clip(path: &Path, width: u32, height: u32, secs: f64, with_audio: bool) {
    let video = format!(
        "color=c=black:s={width}x{height}:d={secs},drawbox=x={}:y={}:w={}:h={}:color=white:t=fill",
        width / 4,
        height / 4,
        width / 2,
        height / 2
    );
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-v", "error", "-f", "lavfi", "-i", &video]);
    if with_audio {
        cmd.args([
            "-f",
            "lavfi",
            "-i",
            &format!("sine=frequency=440:duration={secs}"),
            "-c:a",
            "aac",
            "-shortest",
        ]);
    }
    let status = cmd
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success(), "failed to generate {}", path.display());
}

/// Default overlay clips (`intro.mp4`, `win_marker.mp4`, `celebration.mp4`) in `dir`.
pub fn make_default_clips(dir: &Path) {
    make_clip(&dir.join("intro.mp4"), 120, 80, 5.0, true);
    make_clip(&dir.join("win_marker.mp4"), 40, 40, 2.0, true);
    make_clip(&dir.join("celebration.mp4"), 100, 100, 3.0, false);
}

pub fn small_config(portraits: &Path, overlays: &Path) -> RunConfig {
    RunConfig {
        video: VideoConfig {
            width: 216,
            height: 384,
            fps: 5,
            total_duration: 10,
            mark_start: 8.0,
        },
        assets: AssetConfig {
            portraits_dir: portraits.to_path_buf(),
            overlays_dir: overlays.to_path_buf(),
            font_path: None,
        },
        narration: NarrationConfig {
            enabled: false,
            ..NarrationConfig::default()
        },
        ..RunConfig::default()
    }
}

/// Narrator producing a one second tone instead of speech.
#[derive(Debug)]
pub struct ToneNarrator;

impl SpeechSynthesizer for ToneNarrator {
    fn synthesize(&self, _text: &str, out_wav: &Path) -> VersusResult<()> {
        let status = Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-f", "lavfi", "-i", "sine=frequency=330:duration=1"])
            .arg(out_wav)
            .status()
            .map_err(|e| VersusError::encoding(e.to_string()))?;
        if !status.success() {
            return Err(VersusError::encoding("tone synthesis failed"));
        }
        Ok(())
    }
}

/// Narrator that always fails.
#[derive(Debug)]
pub struct BrokenNarrator;

impl SpeechSynthesizer for BrokenNarrator {
    fn synthesize(&self, _text: &str, _out_wav: &Path) -> VersusResult<()> {
        Err(VersusError::encoding("synthesizer unavailable"))
    }
}

pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut v = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect::<Vec<_>>();
    v.sort();
    v
}
