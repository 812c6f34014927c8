//! Small adapters between crate types and `vello_cpu` paints, paths and pixmaps.

use crate::assets::font::ShapedText;
use crate::foundation::error::{VersusError, VersusResult};
use crate::theme::Rgba;
use std::sync::Arc;

pub(crate) fn color(c: Rgba) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c[0], c[1], c[2], c[3])
}

pub(crate) fn translate(x: f64, y: f64) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::translate((x, y))
}

pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(x0, y0, x1, y1)
}

/// Flatten any `kurbo` shape into a `vello_cpu` path.
pub(crate) fn shape_to_cpu(shape: &impl kurbo::Shape) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let p = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p0) => out.move_to(p(p0)),
            PathEl::LineTo(p0) => out.line_to(p(p0)),
            PathEl::QuadTo(p1, p2) => out.quad_to(p(p1), p(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(p(p1), p(p2), p(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VersusResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VersusError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VersusError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(VersusError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        bytes.chunks_exact(4).any(|px| px[3] != 255),
    ))
}

pub(crate) fn image_from_premul(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VersusResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Opaque colors interpolated linearly per row; `p = y / height`.
pub(crate) fn vertical_gradient_bytes(
    width: u32,
    height: u32,
    at: impl Fn(f64) -> Rgba,
) -> Vec<u8> {
    let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
    let row_len = (width as usize) * 4;
    if row_len == 0 {
        return bytes;
    }
    for (y, row) in bytes.chunks_exact_mut(row_len).enumerate() {
        let c = at(y as f64 / f64::from(height.max(1)));
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}

/// Linear RGB interpolation between two opaque endpoints, truncated.
pub(crate) fn lerp_rgb(a: Rgba, b: Rgba, p: f64) -> Rgba {
    let ch = |i: usize| (f64::from(a[i]) * (1.0 - p) + f64::from(b[i]) * p).clamp(0.0, 255.0) as u8;
    [ch(0), ch(1), ch(2), 255]
}

/// Fill `text` with its layout's top-left corner at `(x, y)`.
pub(crate) fn fill_text(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    text: &ShapedText,
    x: f64,
    y: f64,
    paint: Rgba,
) {
    ctx.set_transform(translate(x, y));
    ctx.set_paint(color(paint));
    ctx.glyph_run(font)
        .font_size(text.font_size)
        .fill_glyphs(text.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        }));
}
