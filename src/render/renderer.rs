//! The frame renderer: a pure `FrameState -> FrameRGBA` function over shared, read-only resources.

use crate::assets::font::{ShapedText, TextLayoutEngine};
use crate::assets::portrait::{PortraitStore, portrait_key};
use crate::comparison::Side;
use crate::foundation::core::Canvas;
use crate::foundation::error::{VersusError, VersusResult};
use crate::foundation::math::flatten_premul_over_rgb;
use crate::render::frame::{FrameRGBA, FrameState};
use crate::render::paint::{
    color, fill_text, image_from_premul, lerp_rgb, rect, shape_to_cpu, translate,
    vertical_gradient_bytes,
};
use crate::theme::{self, ColumnPalette, Rgba};
use std::collections::HashMap;
use std::sync::Arc;

const SHAPE_CACHE_CAPACITY: usize = 512;

/// Horizontal anchor of a column: a quarter of the width for A, three quarters for B.
pub fn column_anchor_x(side: Side, width: u32) -> u32 {
    match side {
        Side::A => width / 4,
        Side::B => 3 * width / 4,
    }
}

/// Stat text color of `side` in `state`: accent iff that column is the highlighted winner.
pub fn stat_color(side: Side, state: &FrameState) -> Rgba {
    if state.is_highlighted(side) {
        theme::ACCENT
    } else {
        theme::NEUTRAL
    }
}

/// Read-only inputs shared by every renderer of a run.
pub struct RenderResources {
    canvas: Canvas,
    font_bytes: Arc<Vec<u8>>,
    font: vello_cpu::peniko::FontData,
    background: vello_cpu::Image,
    portraits: HashMap<String, vello_cpu::Image>,
    stat_boxes: [vello_cpu::Image; 2],
}

impl std::fmt::Debug for RenderResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderResources")
            .field("canvas", &self.canvas)
            .field("font_bytes", &self.font_bytes.len())
            .field("portraits", &self.portraits.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RenderResources {
    /// Prepare paints for `canvas` from font bytes and loaded portraits.
    pub fn new(
        canvas: Canvas,
        font_bytes: Arc<Vec<u8>>,
        portraits: &PortraitStore,
        names: &[&str],
    ) -> VersusResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(VersusError::validation("canvas must be non-empty"));
        }
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );

        let mut portrait_paints = HashMap::new();
        for name in names {
            let p = portraits.get(name)?;
            portrait_paints.insert(
                portrait_key(name),
                image_from_premul(&p.rgba8_premul, p.width, p.height)?,
            );
        }

        let box_h = theme::STAT_BOX_H as u32;
        let stat_boxes = Side::BOTH.map(|side| {
            let palette = ColumnPalette::for_side(side);
            image_from_premul(&vertical_gradient_bytes(1, box_h, |p| palette.at(p)), 1, box_h)
        });
        let [a, b] = stat_boxes;

        Ok(Self {
            canvas,
            background: render_background(canvas)?,
            font_bytes,
            font,
            portraits: portrait_paints,
            stat_boxes: [a?, b?],
        })
    }

    /// Output canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

/// Gradient plus field-line motif; identical for every frame.
fn render_background(canvas: Canvas) -> VersusResult<vello_cpu::Image> {
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let gradient = vertical_gradient_bytes(canvas.width, canvas.height, |p| {
        lerp_rgb(theme::BG_TOP, theme::BG_BOTTOM, p)
    });
    let gradient = image_from_premul(&gradient, canvas.width, canvas.height)?;

    let mut ctx = new_context(canvas)?;
    ctx.set_paint(gradient);
    ctx.fill_rect(&rect(0.0, 0.0, w, h));

    ctx.set_paint(color(theme::FIELD_LINE));
    let lw = theme::FIELD_LINE_WIDTH;
    let inset = theme::FIELD_INSET;
    let (cx, cy) = ((canvas.width / 2) as f64, (canvas.height / 2) as f64);

    outline_rect(&mut ctx, inset, inset, w - inset, h - inset, lw);
    ctx.fill_rect(&rect(cx - lw / 2.0, inset, cx + lw / 2.0, h - inset));
    let ring = kurbo::CircleSegment::new(
        (cx, cy),
        theme::FIELD_CIRCLE_RADIUS,
        theme::FIELD_CIRCLE_RADIUS - lw,
        0.0,
        std::f64::consts::TAU,
    );
    ctx.fill_path(&shape_to_cpu(&ring));
    let half_box = theme::PENALTY_BOX_H / 2.0;
    outline_rect(&mut ctx, inset, cy - half_box, inset + theme::PENALTY_BOX_W, cy + half_box, lw);
    outline_rect(
        &mut ctx,
        w - inset - theme::PENALTY_BOX_W,
        cy - half_box,
        w - inset,
        cy + half_box,
        lw,
    );

    let mut pixmap = new_pixmap(canvas)?;
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Outline drawn inward from the given bounds.
fn outline_rect(ctx: &mut vello_cpu::RenderContext, x0: f64, y0: f64, x1: f64, y1: f64, lw: f64) {
    ctx.fill_rect(&rect(x0, y0, x1, y0 + lw));
    ctx.fill_rect(&rect(x0, y1 - lw, x1, y1));
    ctx.fill_rect(&rect(x0, y0, x0 + lw, y1));
    ctx.fill_rect(&rect(x1 - lw, y0, x1, y1));
}

fn new_context(canvas: Canvas) -> VersusResult<vello_cpu::RenderContext> {
    let (w, h) = canvas_u16(canvas)?;
    Ok(vello_cpu::RenderContext::new(w, h))
}

fn new_pixmap(canvas: Canvas) -> VersusResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(canvas)?;
    Ok(vello_cpu::Pixmap::new(w, h))
}

fn canvas_u16(canvas: Canvas) -> VersusResult<(u16, u16)> {
    let w = u16::try_from(canvas.width).map_err(|_| VersusError::render("width exceeds u16"))?;
    let h = u16::try_from(canvas.height).map_err(|_| VersusError::render("height exceeds u16"))?;
    Ok((w, h))
}

/// Renders one [`FrameState`] at a time.
///
/// Holds only scratch state (raster context, shaping cache); output depends solely on the input
/// state and the shared [`RenderResources`], so one renderer per worker thread yields identical
/// frames.
pub struct FrameRenderer {
    res: Arc<RenderResources>,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: TextLayoutEngine,
    shaped: HashMap<(String, u32), Arc<ShapedText>>,
}

impl FrameRenderer {
    /// Create a renderer over shared resources.
    pub fn new(res: Arc<RenderResources>) -> VersusResult<Self> {
        let canvas = res.canvas;
        let text = TextLayoutEngine::new(&res.font_bytes)?;
        Ok(Self {
            ctx: new_context(canvas)?,
            pixmap: new_pixmap(canvas)?,
            text,
            shaped: HashMap::new(),
            res,
        })
    }

    /// Shared resources this renderer draws from.
    pub fn resources(&self) -> &Arc<RenderResources> {
        &self.res
    }

    /// Render `state` into a flattened, opaque canvas-sized frame.
    pub fn render_frame(&mut self, state: &FrameState) -> VersusResult<FrameRGBA> {
        let canvas = self.res.canvas;
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));

        // Shape and look up everything first so failures leave the context untouched.
        let title = self.shape(&state.title.to_uppercase(), theme::TITLE_SIZE)?;
        let vs = self.shape("VS", theme::VS_SIZE)?;
        let mut columns = Vec::with_capacity(2);
        for side in Side::BOTH {
            let name = self.shape(&state.name(side).to_uppercase(), theme::NAME_SIZE)?;
            let stat = self.shape(&state.displayed(side).to_string(), theme::STAT_SIZE)?;
            let portrait = self
                .res
                .portraits
                .get(&portrait_key(state.name(side)))
                .cloned()
                .ok_or_else(|| {
                    VersusError::asset_not_found(
                        format!("portrait for '{}'", state.name(side)),
                        portrait_key(state.name(side)),
                    )
                })?;
            columns.push((side, name, stat, portrait));
        }
        let mut secondary = Vec::with_capacity(state.secondary_stats.len());
        for s in &state.secondary_stats {
            secondary.push((
                self.shape(&s.label, theme::SECONDARY_LABEL_SIZE)?,
                self.shape(&s.value.to_string(), theme::SECONDARY_VALUE_SIZE)?,
            ));
        }

        let series = match state.series {
            Some(p) => Some(self.shape(&p.to_string(), theme::SERIES_SIZE)?),
            None => None,
        };

        let res = Arc::clone(&self.res);
        let ctx = &mut self.ctx;
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(res.background.clone());
        ctx.fill_rect(&rect(0.0, 0.0, w, h));

        let title_x = (w - f64::from(title.width)) / 2.0;
        let title_glow = Glow {
            passes: theme::TITLE_GLOW_PASSES,
            spread: theme::TITLE_GLOW_SPREAD,
        };
        title_glow.draw(ctx, &res.font, &title, title_x, theme::TITLE_Y, |_| {
            theme::TITLE_GLOW
        });
        fill_text(ctx, &res.font, &title, title_x, theme::TITLE_Y, theme::WHITE);

        let vs_x = (w - f64::from(vs.width)) / 2.0;
        let vs_y = (canvas.height / 2) as f64 - theme::VS_Y_OFFSET;
        let vs_glow = Glow {
            passes: theme::VS_GLOW_PASSES,
            spread: theme::VS_GLOW_SPREAD,
        };
        vs_glow.draw(ctx, &res.font, &vs, vs_x, vs_y, |k| {
            let [r, g, b, _] = theme::VS_COLOR;
            [r, g, b, theme::vs_glow_alpha(k)]
        });
        fill_text(ctx, &res.font, &vs, vs_x, vs_y, theme::VS_COLOR);

        for (side, name, stat, portrait) in &columns {
            let x_base = f64::from(column_anchor_x(*side, canvas.width));

            let name_x = x_base - f64::from(name.width) / 2.0;
            fill_text(ctx, &res.font, name, name_x, theme::NAME_Y, theme::WHITE);

            let (px, py) = portrait_origin(*side, canvas.width);
            ctx.set_transform(translate(px, py));
            ctx.set_paint(portrait.clone());
            let size = f64::from(theme::PORTRAIT_SIZE);
            ctx.fill_rect(&rect(0.0, 0.0, size, size));

            let box_w = f64::from(stat.width) + 2.0 * theme::STAT_BOX_PADDING;
            let box_x = x_base - (box_w / 2.0).floor();
            let box_y = theme::STAT_BOX_Y;
            let palette = ColumnPalette::for_side(*side);

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color(palette.shadow));
            for offset in 1..=theme::STAT_SHADOW_PASSES {
                let sy = box_y + f64::from(offset);
                ctx.fill_rect(&rect(box_x, sy, box_x + box_w, sy + theme::STAT_BOX_H));
            }

            ctx.set_transform(translate(box_x, box_y));
            ctx.set_paint(res.stat_boxes[side.index()].clone());
            ctx.fill_rect(&rect(0.0, 0.0, box_w, theme::STAT_BOX_H));

            let text_y = box_y + (theme::STAT_BOX_H - f64::from(stat.height)) / 2.0;
            let text_x = box_x + theme::STAT_BOX_PADDING;
            let paint = stat_color(*side, state);
            fill_text(ctx, &res.font, stat, text_x, text_y, paint);
        }

        if !secondary.is_empty() {
            let row_y = h - theme::SECONDARY_ROW_FROM_BOTTOM;
            let spacing = (canvas.width / (secondary.len() as u32 + 1)) as f64;
            for (i, (label, value)) in secondary.iter().enumerate() {
                let x = spacing * (i as f64 + 1.0);
                let box_w =
                    f64::from(label.width.max(value.width)) + 2.0 * theme::SECONDARY_PADDING;
                let y0 = row_y - theme::SECONDARY_PADDING;
                let rounded = kurbo::RoundedRect::new(
                    x - box_w / 2.0,
                    y0,
                    x + box_w / 2.0,
                    y0 + theme::SECONDARY_BOX_H,
                    theme::SECONDARY_RADIUS,
                );
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color(theme::SECONDARY_FILL));
                ctx.fill_path(&shape_to_cpu(&rounded));

                let label_x = x - f64::from(label.width) / 2.0;
                fill_text(ctx, &res.font, label, label_x, row_y, theme::SECONDARY_LABEL);
                fill_text(
                    ctx,
                    &res.font,
                    value,
                    x - f64::from(value.width) / 2.0,
                    row_y + theme::SECONDARY_VALUE_DY,
                    theme::WHITE,
                );
            }
        }

        if let Some(badge) = &series {
            let (x, y) = series_origin(badge, canvas);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            fill_text(ctx, &res.font, badge, x, y, theme::SERIES_COLOR);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        let mut data = self.pixmap.data_as_u8_slice().to_vec();
        let [r, g, b, _] = theme::BG_BOTTOM;
        flatten_premul_over_rgb(&mut data, [r, g, b]);
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    fn shape(&mut self, text: &str, size: f32) -> VersusResult<Arc<ShapedText>> {
        let key = (text.to_owned(), size.to_bits());
        if let Some(hit) = self.shaped.get(&key) {
            return Ok(Arc::clone(hit));
        }
        if self.shaped.len() >= SHAPE_CACHE_CAPACITY {
            self.shaped.clear();
        }
        let shaped = Arc::new(self.text.shape(text, size)?);
        self.shaped.insert(key, Arc::clone(&shaped));
        Ok(shaped)
    }
}

/// Repeated low-alpha passes spiralling out to `spread` px beneath a glyph run.
struct Glow {
    passes: u32,
    spread: f64,
}

impl Glow {
    fn draw(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        font: &vello_cpu::peniko::FontData,
        text: &ShapedText,
        x: f64,
        y: f64,
        paint_at: impl Fn(u32) -> Rgba,
    ) {
        const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
        for k in 0..self.passes {
            let r = self.spread * f64::from(k + 1) / f64::from(self.passes.max(1));
            let a = f64::from(k) * GOLDEN_ANGLE;
            fill_text(ctx, font, text, x + r * a.cos(), y + r * a.sin(), paint_at(k));
        }
    }
}

/// Series badge placement: centered horizontally, centered in the top third vertically.
fn series_origin(badge: &ShapedText, canvas: Canvas) -> (f64, f64) {
    let x = (f64::from(canvas.width) - f64::from(badge.width)) / 2.0;
    let y = (f64::from(canvas.height / 3) - f64::from(badge.height)) / 2.0;
    (x.floor(), y.floor())
}

/// Portrait placement (top-left) of `side` for a canvas of `width`.
pub fn portrait_origin(side: Side, width: u32) -> (f64, f64) {
    (
        f64::from(column_anchor_x(side, width)) - f64::from(theme::PORTRAIT_SIZE / 2),
        theme::PORTRAIT_Y,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
