//! Overlay assets and their placement on the output timeline.
//!
//! An [`OverlayAsset`] is configuration: which clip, when it starts, where it sits. Once the
//! clip has been probed it becomes a [`ProbedOverlay`], and [`plan_timeline`] resolves the final
//! pixel geometry and time window of every layer for one run.

use crate::assets::media::VideoSourceInfo;
use crate::comparison::Side;
use crate::config::VideoConfig;
use crate::foundation::error::{VersusError, VersusResult};
use crate::render::renderer::column_anchor_x;
use std::path::{Path, PathBuf};

/// Logical role of an overlay clip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayRole {
    /// Intro bumper shown while the counters are still at zero.
    Intro,
    /// Marker animation over the winning column.
    WinMarker,
    /// Closing celebration clip.
    Celebration,
    /// Any additional clip.
    Custom(String),
}

impl std::fmt::Display for OverlayRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intro => f.write_str("intro"),
            Self::WinMarker => f.write_str("win_marker"),
            Self::Celebration => f.write_str("celebration"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// Where on the timeline an overlay starts.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayStart {
    /// Fixed offset in seconds.
    Secs(f64),
    /// The highlight activation time (`markStart`).
    MarkStart,
}

impl OverlayStart {
    /// Resolve against the run's video configuration.
    pub fn resolve(self, video: &VideoConfig) -> f64 {
        match self {
            Self::Secs(s) => s,
            Self::MarkStart => video.mark_start,
        }
    }
}

/// Screen placement of an overlay's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayPosition {
    /// Absolute pixel coordinates.
    Fixed {
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
    },
    /// Horizontally centered; `y = floor((H - h) / verticalDivisor)`.
    #[serde(rename_all = "camelCase")]
    Centered {
        /// Divisor of the free vertical space; 2 centers exactly.
        #[serde(default = "default_vertical_divisor")]
        vertical_divisor: f64,
    },
    /// Centered on the winning column's anchor at a fixed `y`.
    WinnerColumn {
        /// Top edge.
        y: i32,
    },
}

fn default_vertical_divisor() -> f64 {
    2.0
}

/// Matte removal parameters: pixels near `color` become transparent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChromaKey {
    /// Key color.
    pub color: [u8; 3],
    /// Distance at which alpha reaches one half.
    pub threshold: f64,
    /// Steepness of the transition around `threshold`.
    pub stiffness: f64,
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self {
            color: [0, 0, 0],
            threshold: 50.0,
            stiffness: 10.0,
        }
    }
}

impl ChromaKey {
    fn validate(&self) -> VersusResult<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(VersusError::validation("chroma key threshold must be > 0"));
        }
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(VersusError::validation("chroma key stiffness must be > 0"));
        }
        Ok(())
    }
}

/// Configured overlay clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayAsset {
    /// Logical role.
    pub role: OverlayRole,
    /// Clip location.
    pub path: PathBuf,
    /// Timeline start.
    pub start: OverlayStart,
    /// Optional absolute timeline end in seconds.
    #[serde(default)]
    pub end_secs: Option<f64>,
    /// Offset into the source clip where playback begins.
    #[serde(default)]
    pub source_start_secs: f64,
    /// Offset into the source clip where playback stops.
    #[serde(default)]
    pub source_end_secs: Option<f64>,
    /// Screen placement.
    pub position: OverlayPosition,
    /// Uniform scale applied to the clip's native size.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Matte removal; `None` composites the clip as opaque.
    #[serde(default)]
    pub chroma_key: Option<ChromaKey>,
    /// Drop the layer entirely when the comparison is a tie. Always implied for
    /// [`OverlayRole::WinMarker`] and [`OverlayPosition::WinnerColumn`].
    #[serde(default)]
    pub require_winner: bool,
}

fn default_scale() -> f64 {
    1.0
}

impl OverlayAsset {
    /// Check the invariants [`plan_timeline`] relies on.
    pub fn validate(&self) -> VersusResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(VersusError::validation(format!(
                "overlay '{}' has an empty path",
                self.role
            )));
        }
        if let OverlayStart::Secs(s) = self.start
            && !(s.is_finite() && s >= 0.0)
        {
            return Err(VersusError::validation(format!(
                "overlay '{}' start must be finite and >= 0",
                self.role
            )));
        }
        if !(self.source_start_secs.is_finite() && self.source_start_secs >= 0.0) {
            return Err(VersusError::validation(format!(
                "overlay '{}' sourceStartSecs must be finite and >= 0",
                self.role
            )));
        }
        if let Some(end) = self.source_end_secs
            && !(end.is_finite() && end > self.source_start_secs)
        {
            return Err(VersusError::validation(format!(
                "overlay '{}' sourceEndSecs must be greater than sourceStartSecs",
                self.role
            )));
        }
        if let Some(end) = self.end_secs
            && !end.is_finite()
        {
            return Err(VersusError::validation(format!(
                "overlay '{}' endSecs must be finite",
                self.role
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(VersusError::validation(format!(
                "overlay '{}' scale must be > 0",
                self.role
            )));
        }
        if let Some(key) = &self.chroma_key {
            key.validate()?;
        }
        Ok(())
    }

    /// Whether the layer only exists when the comparison has a winner.
    pub fn needs_winner(&self) -> bool {
        self.require_winner
            || self.role == OverlayRole::WinMarker
            || matches!(self.position, OverlayPosition::WinnerColumn { .. })
    }

    /// Timeline start in seconds. The win marker is pinned to `markStart` so it appears
    /// together with the stat highlight.
    pub fn start_secs(&self, video: &VideoConfig) -> f64 {
        if self.role == OverlayRole::WinMarker {
            if self.start != OverlayStart::MarkStart {
                tracing::warn!(
                    configured = ?self.start,
                    mark_start = video.mark_start,
                    "win marker start pinned to markStart"
                );
            }
            return video.mark_start;
        }
        self.start.resolve(video)
    }

    /// The intro bumper, win marker and celebration clips resolved from `dir`.
    pub fn default_set(dir: &Path) -> Vec<OverlayAsset> {
        vec![
            OverlayAsset {
                role: OverlayRole::Intro,
                path: dir.join("intro.mp4"),
                start: OverlayStart::Secs(2.0),
                end_secs: None,
                source_start_secs: 0.0,
                source_end_secs: Some(4.5),
                position: OverlayPosition::Centered {
                    vertical_divisor: 1.75,
                },
                scale: 1.0,
                chroma_key: Some(ChromaKey::default()),
                require_winner: false,
            },
            OverlayAsset {
                role: OverlayRole::WinMarker,
                path: dir.join("win_marker.mp4"),
                start: OverlayStart::MarkStart,
                end_secs: None,
                source_start_secs: 0.0,
                source_end_secs: None,
                position: OverlayPosition::WinnerColumn { y: 850 },
                scale: 1.0,
                chroma_key: Some(ChromaKey::default()),
                require_winner: true,
            },
            OverlayAsset {
                role: OverlayRole::Celebration,
                path: dir.join("celebration.mp4"),
                start: OverlayStart::Secs(9.0),
                end_secs: None,
                source_start_secs: 0.0,
                source_end_secs: None,
                position: OverlayPosition::Centered {
                    vertical_divisor: 2.0,
                },
                scale: 0.8,
                chroma_key: Some(ChromaKey::default()),
                require_winner: false,
            },
        ]
    }
}

/// An overlay together with the probed metadata of its clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbedOverlay {
    /// Configuration.
    pub asset: OverlayAsset,
    /// Probed clip metadata.
    pub info: VideoSourceInfo,
}

/// One resolved layer over the base clip.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineLayer {
    /// Logical role.
    pub role: OverlayRole,
    /// Clip location.
    pub path: PathBuf,
    /// Timeline window start (inclusive).
    pub start_secs: f64,
    /// Timeline window end (exclusive).
    pub end_secs: f64,
    /// Offset into the source clip that plays at `start_secs`.
    pub source_start_secs: f64,
    /// Left edge on the canvas; may be negative.
    pub x: i32,
    /// Top edge on the canvas; may be negative.
    pub y: i32,
    /// Scaled clip width.
    pub width: u32,
    /// Scaled clip height.
    pub height: u32,
    /// Matte removal.
    pub chroma_key: Option<ChromaKey>,
    /// Whether the clip carries an audio stream.
    pub has_audio: bool,
}

impl TimelineLayer {
    /// `start <= t < end`.
    pub fn is_active_at(&self, t: f64) -> bool {
        t >= self.start_secs && t < self.end_secs
    }

    /// Visible duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Ordered overlay layers of one run; later layers draw on top.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    total_secs: f64,
    layers: Vec<TimelineLayer>,
}

impl Timeline {
    /// Layers in draw order.
    pub fn layers(&self) -> &[TimelineLayer] {
        &self.layers
    }

    /// First layer with `role`, if planned.
    pub fn layer_for(&self, role: &OverlayRole) -> Option<&TimelineLayer> {
        self.layers.iter().find(|l| &l.role == role)
    }

    /// Output duration `T`.
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    /// Layers visible at time `t`.
    pub fn active_at(&self, t: f64) -> impl Iterator<Item = &TimelineLayer> {
        self.layers.iter().filter(move |l| l.is_active_at(t))
    }
}

/// Resolve geometry and time windows of `overlays` for one run.
///
/// Layers that need a winner are dropped on a tie, and the win marker always starts at
/// `markStart`. A layer plays from its start until the
/// earliest of its configured end, the end of its source window and `T`; layers left with an
/// empty window are dropped.
#[tracing::instrument(skip_all, fields(winner = ?winner, overlays = overlays.len()))]
pub fn plan_timeline(
    winner: Option<Side>,
    overlays: &[ProbedOverlay],
    video: &VideoConfig,
) -> VersusResult<Timeline> {
    let total = video.total_secs();
    let mut layers = Vec::with_capacity(overlays.len());

    for probed in overlays {
        let asset = &probed.asset;
        asset.validate()?;

        if asset.needs_winner() && winner.is_none() {
            tracing::debug!(role = %asset.role, "no winner, overlay dropped");
            continue;
        }

        let start = asset.start_secs(video);
        let mut visible = total - start;
        let source_start = asset.source_start_secs;
        if let Some(source_end) = asset.source_end_secs {
            visible = visible.min(source_end - source_start);
        }
        if let Some(d) = probed.info.duration_secs {
            visible = visible.min(d - source_start);
        }
        let mut end = start + visible;
        if let Some(configured) = asset.end_secs {
            end = end.min(configured);
        }
        if end <= start {
            tracing::debug!(role = %asset.role, start, "overlay window is empty, dropped");
            continue;
        }

        let width = scaled_dim(probed.info.width, asset.scale)?;
        let height = scaled_dim(probed.info.height, asset.scale)?;
        let (x, y) = place(asset.position, width, height, winner, video)?;

        tracing::debug!(role = %asset.role, start, end, x, y, width, height, "overlay planned");
        layers.push(TimelineLayer {
            role: asset.role.clone(),
            path: asset.path.clone(),
            start_secs: start,
            end_secs: end,
            source_start_secs: source_start,
            x,
            y,
            width,
            height,
            chroma_key: asset.chroma_key,
            has_audio: probed.info.has_audio,
        });
    }

    Ok(Timeline {
        total_secs: total,
        layers,
    })
}

fn scaled_dim(native: u32, scale: f64) -> VersusResult<u32> {
    let v = (f64::from(native) * scale).round();
    if !(v >= 1.0 && v <= f64::from(u16::MAX)) {
        return Err(VersusError::validation(format!(
            "overlay size {native} scaled by {scale} is out of range"
        )));
    }
    Ok(v as u32)
}

fn place(
    position: OverlayPosition,
    width: u32,
    height: u32,
    winner: Option<Side>,
    video: &VideoConfig,
) -> VersusResult<(i32, i32)> {
    let (cw, ch) = (video.width as i32, video.height as i32);
    let (w, h) = (width as i32, height as i32);
    match position {
        OverlayPosition::Fixed { x, y } => Ok((x, y)),
        OverlayPosition::Centered { vertical_divisor } => {
            if !(vertical_divisor.is_finite() && vertical_divisor > 0.0) {
                return Err(VersusError::validation(
                    "overlay verticalDivisor must be > 0",
                ));
            }
            let y = (f64::from(ch - h) / vertical_divisor).floor() as i32;
            Ok(((cw - w).div_euclid(2), y))
        }
        OverlayPosition::WinnerColumn { y } => {
            let side = winner.ok_or_else(|| {
                VersusError::validation("winner-column overlay planned without a winner")
            })?;
            Ok((column_anchor_x(side, video.width) as i32 - w / 2, y))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/layers.rs"]
mod tests;
