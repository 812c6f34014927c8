use crate::comparison::{SecondaryStat, SeriesPosition, Side};
use crate::foundation::math::Fnv1a64;

/// A rendered frame as RGBA8 pixels.
///
/// Frames leaving the renderer are opaque, so straight and premultiplied readings coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// RGBA8 value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Return `true` when every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }
}

/// Fully resolved data needed to render exactly one frame.
///
/// Built by [`AnimationSchedule::state_at`](crate::AnimationSchedule::state_at); carries no
/// timing information beyond the already interpolated counters and the highlight flag.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    /// Comparison title as given (the renderer upper-cases it).
    pub title: String,
    /// Subject names indexed by [`Side::index`].
    pub names: [String; 2],
    /// Interpolated counter values indexed by [`Side::index`].
    pub displayed: [u64; 2],
    /// Optional bottom-row callouts.
    pub secondary_stats: Vec<SecondaryStat>,
    /// Winning column, constant over the whole run.
    pub winner: Option<Side>,
    /// Whether the highlight activation time has been reached.
    pub highlight_active: bool,
    /// Series badge drawn in the top third, if any.
    pub series: Option<SeriesPosition>,
}

impl FrameState {
    /// Name on `side`.
    pub fn name(&self, side: Side) -> &str {
        &self.names[side.index()]
    }

    /// Counter value on `side`.
    pub fn displayed(&self, side: Side) -> u64 {
        self.displayed[side.index()]
    }

    /// `winner == side && highlight_active`.
    pub fn is_highlighted(&self, side: Side) -> bool {
        self.highlight_active && self.winner == Some(side)
    }

    /// Content hash; equal states render identical pixels.
    pub(crate) fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_str(&self.title);
        for name in &self.names {
            h.write_str(name);
        }
        for v in self.displayed {
            h.write_u64(v);
        }
        h.write_u64(self.secondary_stats.len() as u64);
        for s in &self.secondary_stats {
            h.write_str(&s.label);
            h.write_str(&s.value.to_string());
        }
        h.write_u8(match self.winner {
            None => 0,
            Some(Side::A) => 1,
            Some(Side::B) => 2,
        });
        h.write_u8(u8::from(self.highlight_active));
        match self.series {
            Some(p) => {
                h.write_u8(1);
                h.write_u64(u64::from(p.index));
                h.write_u64(u64::from(p.count));
            }
            None => h.write_u8(0),
        }
        h.finish()
    }
}
