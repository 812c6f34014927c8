//! Fixed visual constants of the pitch theme.
//!
//! Vertical positions are in pixels from the top of a 1920 px tall canvas.

use crate::comparison::Side;

/// Straight-alpha RGBA8 color.
pub type Rgba = [u8; 4];

pub(crate) const BG_TOP: Rgba = [34, 139, 34, 255];
pub(crate) const BG_BOTTOM: Rgba = [0, 71, 0, 255];

pub(crate) const FIELD_LINE: Rgba = [255, 255, 255, 255];
pub(crate) const FIELD_INSET: f64 = 50.0;
pub(crate) const FIELD_LINE_WIDTH: f64 = 10.0;
pub(crate) const FIELD_CIRCLE_RADIUS: f64 = 100.0;
pub(crate) const PENALTY_BOX_W: f64 = 200.0;
pub(crate) const PENALTY_BOX_H: f64 = 400.0;

pub(crate) const WHITE: Rgba = [255, 255, 255, 255];

pub(crate) const TITLE_SIZE: f32 = 80.0;
pub(crate) const TITLE_Y: f64 = 60.0;
pub(crate) const TITLE_GLOW_PASSES: u32 = 20;
pub(crate) const TITLE_GLOW: Rgba = [255, 255, 255, 24];
pub(crate) const TITLE_GLOW_SPREAD: f64 = 6.0;

pub(crate) const VS_SIZE: f32 = 120.0;
pub(crate) const VS_Y_OFFSET: f64 = 100.0;
pub(crate) const VS_COLOR: Rgba = [255, 52, 52, 255];
pub(crate) const VS_GLOW_PASSES: u32 = 30;
pub(crate) const VS_GLOW_SPREAD: f64 = 12.0;

pub(crate) const NAME_SIZE: f32 = 60.0;
pub(crate) const NAME_Y: f64 = 500.0;

pub(crate) const PORTRAIT_SIZE: u32 = 150;
pub(crate) const PORTRAIT_Y: f64 = 300.0;

/// Top edge (px) of the first stat box.
pub const STAT_BOX_Y: f64 = 600.0;
/// Height (px) of each stat box.
pub const STAT_BOX_H: f64 = 150.0;
pub(crate) const STAT_BOX_PADDING: f64 = 30.0;
pub(crate) const STAT_SHADOW_PASSES: u32 = 30;
pub(crate) const STAT_SIZE: f32 = 100.0;

/// Stat text color when the column is not highlighted.
pub const NEUTRAL: Rgba = [255, 255, 255, 255];
/// Stat text color of the winning column once the highlight is active.
pub const ACCENT: Rgba = [0, 128, 0, 255];

pub(crate) const SERIES_SIZE: f32 = 120.0;
pub(crate) const SERIES_COLOR: Rgba = [255, 255, 255, 255];

pub(crate) const SECONDARY_ROW_FROM_BOTTOM: f64 = 200.0;
pub(crate) const SECONDARY_PADDING: f64 = 20.0;
pub(crate) const SECONDARY_BOX_H: f64 = 80.0 + 2.0 * SECONDARY_PADDING;
pub(crate) const SECONDARY_FILL: Rgba = [255, 255, 255, 26];
pub(crate) const SECONDARY_RADIUS: f64 = 12.0;
pub(crate) const SECONDARY_LABEL_SIZE: f32 = 24.0;
pub(crate) const SECONDARY_LABEL: Rgba = [170, 170, 170, 255];
pub(crate) const SECONDARY_VALUE_SIZE: f32 = 36.0;
pub(crate) const SECONDARY_VALUE_DY: f64 = 40.0;

/// Two-tone stat box palette of one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ColumnPalette {
    pub(crate) base: [u8; 3],
    pub(crate) ramp: [u8; 3],
    pub(crate) shadow: Rgba,
}

impl ColumnPalette {
    pub(crate) fn for_side(side: Side) -> Self {
        match side {
            Side::A => Self {
                base: [0, 82, 212],
                ramp: [67, 100, 43],
                shadow: [0, 82, 212, 77],
            },
            Side::B => Self {
                base: [212, 0, 0],
                ramp: [43, 67, 67],
                shadow: [212, 0, 0, 77],
            },
        }
    }

    /// Color at vertical progress `p` in `[0, 1]` down the box.
    pub(crate) fn at(self, p: f64) -> Rgba {
        let p = p.clamp(0.0, 1.0);
        let ch = |i: usize| (f64::from(self.base[i]) + f64::from(self.ramp[i]) * p).min(255.0) as u8;
        [ch(0), ch(1), ch(2), 255]
    }
}

/// Alpha of the `k`-th VS glow pass (k counts from 0).
pub(crate) fn vs_glow_alpha(k: u32) -> u8 {
    let f = 1.0 - f64::from(k) / f64::from(VS_GLOW_PASSES);
    (128.0 * f).clamp(0.0, 255.0) as u8
}
