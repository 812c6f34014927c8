use crate::comparison::{ComparisonSpec, Side};
use crate::config::VideoConfig;
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::VersusResult;
use crate::render::frame::FrameState;

/// Counters hold at zero before this time.
pub const COUNT_START_SECS: f64 = 5.0;
/// Counters reach their final values at this time.
pub const COUNT_END_SECS: f64 = 8.0;

const COUNT_START_TICKS: u128 = 5;
const COUNT_END_TICKS: u128 = 8;

/// Timing model of one run: counter interpolation and highlight activation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSchedule {
    fps: Fps,
    total_frames: u64,
    mark_start: f64,
}

impl AnimationSchedule {
    /// Build the schedule for a validated video configuration.
    pub fn new(video: &VideoConfig) -> VersusResult<Self> {
        video.validate()?;
        Ok(Self {
            fps: video.fps()?,
            total_frames: video.total_frames(),
            mark_start: video.mark_start,
        })
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// `fps * T`.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Every output frame, `[0, fps * T)`.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    /// Highlight activation time in seconds.
    pub fn mark_start(&self) -> f64 {
        self.mark_start
    }

    /// `t = frameIndex / fps`.
    pub fn time_of(&self, idx: FrameIndex) -> f64 {
        self.fps.frame_to_secs(idx)
    }

    /// Counter value shown at time `t`.
    ///
    /// Zero before 5s, `floor(final * (t - 5) / 3)` until 8s, `final` afterwards. Monotonically
    /// non-decreasing in `t`.
    pub fn displayed_value(final_value: u64, t: f64) -> u64 {
        if t < COUNT_START_SECS {
            return 0;
        }
        if t >= COUNT_END_SECS {
            return final_value;
        }
        let progress = (t - COUNT_START_SECS) / (COUNT_END_SECS - COUNT_START_SECS);
        let v = (final_value as f64 * progress).floor();
        (v.max(0.0) as u64).min(final_value)
    }

    /// Counter value shown at frame `idx`, computed in exact integer arithmetic.
    ///
    /// Agrees with [`AnimationSchedule::displayed_value`] at `t = idx / fps` except where the
    /// float form would round a whole-number step down by one.
    pub fn displayed_at_frame(&self, final_value: u64, idx: FrameIndex) -> u64 {
        // t = idx * den / num; compare and interpolate in units of 1 / num seconds.
        let ticks = u128::from(idx.0) * u128::from(self.fps.den);
        let num = u128::from(self.fps.num);
        let start = COUNT_START_TICKS * num;
        let end = COUNT_END_TICKS * num;
        if ticks < start {
            return 0;
        }
        if ticks >= end {
            return final_value;
        }
        let v = u128::from(final_value) * (ticks - start) / (end - start);
        u64::try_from(v).map_or(final_value, |v| v.min(final_value))
    }

    /// `t >= markStart`.
    pub fn highlight_active(&self, t: f64) -> bool {
        t >= self.mark_start
    }

    /// Derive the renderer input for frame `idx`.
    pub fn state_at(&self, spec: &ComparisonSpec, idx: FrameIndex) -> FrameState {
        let t = self.time_of(idx);
        FrameState {
            title: spec.title().to_owned(),
            names: Side::BOTH.map(|s| spec.subject(s).name.clone()),
            displayed: Side::BOTH.map(|s| self.displayed_at_frame(spec.subject(s).final_value, idx)),
            secondary_stats: spec.secondary_stats().to_vec(),
            winner: spec.winner(),
            highlight_active: self.highlight_active(t),
            series: spec.series(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/schedule.rs"]
mod tests;
