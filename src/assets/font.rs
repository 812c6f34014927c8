use crate::foundation::error::{VersusError, VersusResult};
use anyhow::Context as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Conventional DejaVu Sans Bold locations searched when no font is configured.
pub const SYSTEM_FONT_CANDIDATES: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
];

/// Return the configured font path, or the first existing system candidate.
pub fn resolve_font_path(configured: Option<&Path>) -> VersusResult<PathBuf> {
    if let Some(p) = configured {
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
        return Err(VersusError::asset_not_found("configured font", p));
    }
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            VersusError::asset_not_found(
                "DejaVu Sans Bold (install the dejavu fonts package or set assets.fontPath)",
                SYSTEM_FONT_CANDIDATES[0],
            )
        })
}

/// Read font bytes from `path`.
pub fn load_font_bytes(path: &Path) -> VersusResult<Arc<Vec<u8>>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read font '{}'", path.display()))?;
    Ok(Arc::new(bytes))
}

/// One glyph positioned relative to the top-left corner of its layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Glyph id in the registered font.
    pub id: u32,
    /// Pen x offset.
    pub x: f32,
    /// Baseline y offset.
    pub y: f32,
}

/// Single-line shaped text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedText {
    /// Glyphs in visual order.
    pub glyphs: Vec<PlacedGlyph>,
    /// Font size the glyphs were shaped at.
    pub font_size: f32,
    /// Advance width in pixels.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
}

/// Stateful helper for shaping text with Parley from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and remember its family for subsequent layouts.
    pub(crate) fn new(font_bytes: &[u8]) -> VersusResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| VersusError::render("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| VersusError::render("registered font family has no name"))?
            .to_string();
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Shape `text` on a single line at `size_px`.
    pub(crate) fn shape(&mut self, text: &str, size_px: f32) -> VersusResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VersusError::render("text size must be finite and > 0"));
        }
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::with_capacity(text.len());
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        Ok(ShapedText {
            glyphs,
            font_size: size_px,
            width: layout.width(),
            height: layout.height(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
