//! Run configuration loaded from JSON.
//!
//! Every key is optional; missing keys take the defaults of a 10 second 1080x1920 30 fps short.

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{VersusError, VersusResult};
use crate::render::pipeline::RenderThreading;
use crate::timeline::layers::OverlayAsset;
use crate::timeline::schedule::COUNT_END_SECS;
use std::path::{Path, PathBuf};

/// Output geometry and timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// Total duration `T` in whole seconds.
    pub total_duration: u32,
    /// Highlight activation time; also the win-marker overlay start.
    pub mark_start: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            total_duration: 10,
            mark_start: 8.0,
        }
    }
}

impl VideoConfig {
    /// Check the invariants the renderer and encoder rely on.
    pub fn validate(&self) -> VersusResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VersusError::validation("width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(VersusError::validation(
                "width/height must be even (required for yuv420p output)",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(VersusError::validation("width/height must fit in u16"));
        }
        if self.fps == 0 {
            return Err(VersusError::validation("fps must be > 0"));
        }
        if self.total_duration == 0 {
            return Err(VersusError::validation("totalDuration must be > 0"));
        }
        if !self.mark_start.is_finite()
            || self.mark_start < 0.0
            || self.mark_start > f64::from(self.total_duration)
        {
            return Err(VersusError::validation(format!(
                "markStart must be within [0, {}], got {}",
                self.total_duration, self.mark_start
            )));
        }
        if f64::from(self.total_duration) < COUNT_END_SECS {
            tracing::warn!(
                total_duration = self.total_duration,
                "totalDuration ends before the counters reach their final values"
            );
        }
        Ok(())
    }

    /// Frame rate as a rational.
    pub fn fps(&self) -> VersusResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// `fps * T` output frames.
    pub fn total_frames(&self) -> u64 {
        u64::from(self.fps) * u64::from(self.total_duration)
    }

    /// `T` in seconds.
    pub fn total_secs(&self) -> f64 {
        f64::from(self.total_duration)
    }
}

/// Conventional resource locations.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetConfig {
    /// Directory holding `<lower-cased name>.<ext>` portraits.
    pub portraits_dir: PathBuf,
    /// Directory holding the role-named overlay clips.
    pub overlays_dir: PathBuf,
    /// Explicit TrueType/OpenType font; `None` searches the system DejaVu locations.
    pub font_path: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            portraits_dir: PathBuf::from("images"),
            overlays_dir: PathBuf::from("assets"),
            font_path: None,
        }
    }
}

/// Title narration settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NarrationConfig {
    /// Synthesize and mix narration.
    pub enabled: bool,
    /// Speech synthesizer executable.
    pub program: String,
    /// Voice passed to the synthesizer.
    pub voice: String,
    /// Spoken text; `{title}` is replaced by the comparison title.
    pub template: String,
    /// Lead-in offset of the narration track in seconds.
    pub offset_secs: f64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "espeak-ng".to_owned(),
            voice: "en".to_owned(),
            template: "Who has most {title}".to_owned(),
            offset_secs: 0.0,
        }
    }
}

impl NarrationConfig {
    /// Spoken text for `title`.
    pub fn text_for(&self, title: &str) -> String {
        self.template.replace("{title}", title)
    }
}

/// Complete configuration of one compositor run.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// Geometry and timing; its keys sit at the top level of the JSON document.
    #[serde(flatten)]
    pub video: VideoConfig,
    /// Resource locations.
    pub assets: AssetConfig,
    /// Narration settings.
    pub narration: NarrationConfig,
    /// Explicit overlay list; `None` uses the default role set from `assets.overlaysDir`.
    pub overlays: Option<Vec<OverlayAsset>>,
    /// Base-clip rendering controls.
    pub render: RenderThreading,
}

impl RunConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(s: &str) -> VersusResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| VersusError::validation(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: &Path) -> VersusResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate every section.
    pub fn validate(&self) -> VersusResult<()> {
        self.video.validate()?;
        if !self.narration.offset_secs.is_finite() || self.narration.offset_secs < 0.0 {
            return Err(VersusError::validation(
                "narration offsetSecs must be finite and >= 0",
            ));
        }
        if let Some(threads) = self.render.threads
            && threads == 0
        {
            return Err(VersusError::validation(
                "render threads must be >= 1 when set",
            ));
        }
        if let Some(overlays) = &self.overlays {
            for o in overlays {
                o.validate()?;
            }
        }
        Ok(())
    }

    /// Overlay list in effect: the explicit one or the default role set.
    pub fn overlay_assets(&self) -> Vec<OverlayAsset> {
        match &self.overlays {
            Some(list) => list.clone(),
            None => OverlayAsset::default_set(&self.assets.overlays_dir),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
