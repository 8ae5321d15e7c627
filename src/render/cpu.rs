use std::sync::Arc;

use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Color, Point, Rect, Vec2};
use crate::foundation::error::{CycleError, CycleResult};
use crate::render::FrameRGBA;
use crate::render::svg::SvgCache;
use crate::render::text::{FontBook, TextShaper};
use crate::scene::entity::{EntityDesc, Shape, TextAlign};
use crate::timeline::eval::{EvaluatedFrame, EvaluatedNode};

const CURVE_TOLERANCE: f64 = 0.1;
const HIGHLIGHT_PAD: f64 = 8.0;

/// Rasterizes evaluated frames on the CPU with `vello_cpu`.
///
/// Each renderer owns its text and SVG caches; parallel rendering gives every worker its own.
pub struct CpuRenderer {
    text: TextShaper,
    svg: SvgCache,
}

/// Inputs shared by every primitive of one node.
#[derive(Clone, Copy)]
struct NodeCtx<'n, 'a> {
    node: &'n EvaluatedNode<'a>,
    transform: Affine,
}

impl CpuRenderer {
    /// Renderer drawing labels with faces from `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            text: TextShaper::new(fonts),
            svg: SvgCache::default(),
        }
    }

    /// Draw one frame into premultiplied RGBA8.
    pub fn render(&mut self, frame: &EvaluatedFrame<'_>) -> CycleResult<FrameRGBA> {
        let width: u16 = frame
            .canvas
            .width
            .try_into()
            .map_err(|_| CycleError::evaluation("canvas width exceeds u16"))?;
        let height: u16 = frame
            .canvas
            .height
            .try_into()
            .map_err(|_| CycleError::evaluation("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint_color(frame.background, 1.0));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        for node in &frame.nodes {
            self.draw_node(&mut ctx, node)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: frame.canvas.width,
            height: frame.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_node(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        node: &EvaluatedNode<'_>,
    ) -> CycleResult<()> {
        let n = NodeCtx {
            node,
            transform: node.transform,
        };
        ctx.set_transform(affine_to_cpu(n.transform));
        if node.opacity < 1.0 {
            ctx.push_opacity_layer(node.opacity as f32);
        }

        let bounds = node.desc.bounds();
        let arrow = matches!(node.desc.shape, Shape::Arrow { .. });
        let clip = node.reveal < 1.0 && !arrow;
        if clip {
            let pad = bounds.height().max(8.0) * 0.5;
            let visible = Rect::new(
                bounds.x0 - pad,
                bounds.y0 - pad,
                bounds.x0 - pad + (bounds.width() + 2.0 * pad) * node.reveal,
                bounds.y1 + pad,
            );
            ctx.push_clip_layer(&bezpath_to_cpu(&visible.to_path(CURVE_TOLERANCE)));
        }

        self.draw_desc(ctx, n, node.desc, Vec2::ZERO)?;

        if clip {
            ctx.pop_layer();
        }

        let hl = node.highlight;
        if hl.width > 0.0 {
            let outline = bounds
                .inflate(HIGHLIGHT_PAD, HIGHLIGHT_PAD)
                .to_rounded_rect(HIGHLIGHT_PAD);
            ctx.set_transform(affine_to_cpu(n.transform));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(hl.width));
            ctx.set_paint(paint_color(hl.color, 1.0));
            ctx.stroke_path(&bezpath_to_cpu(&outline.to_path(CURVE_TOLERANCE)));
        }

        if node.opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn draw_desc(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        n: NodeCtx<'_, '_>,
        desc: &EntityDesc,
        origin: Vec2,
    ) -> CycleResult<()> {
        let anchor = desc.pos + origin;
        let style = &desc.style;
        ctx.set_transform(affine_to_cpu(n.transform));

        match &desc.shape {
            Shape::Box {
                width,
                height,
                corner_radius,
            } => {
                let rect = Rect::from_center_size(anchor, (*width, *height))
                    .to_rounded_rect(*corner_radius)
                    .to_path(CURVE_TOLERANCE);
                let path = bezpath_to_cpu(&rect);
                if let Some(fill) = style.fill {
                    ctx.set_paint(paint_color(fill, 1.0));
                    ctx.fill_path(&path);
                }
                if style.stroke_width > 0.0 {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.stroke_width));
                    ctx.set_paint(paint_color(style.color, 1.0));
                    ctx.stroke_path(&path);
                }
            }
            Shape::Dot { radius } => {
                let circle = kurbo::Circle::new(anchor, *radius).to_path(CURVE_TOLERANCE);
                ctx.set_paint(paint_color(style.color, 1.0));
                ctx.fill_path(&bezpath_to_cpu(&circle));
            }
            Shape::Arrow { delta, tip_px } => {
                let drawn = *delta * n.node.reveal;
                if drawn.hypot() > 0.0 {
                    let (shaft, head) = arrow_paths(anchor, drawn, *tip_px);
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.stroke_width));
                    ctx.set_paint(paint_color(style.color, 1.0));
                    ctx.stroke_path(&bezpath_to_cpu(&shaft));
                    ctx.fill_path(&bezpath_to_cpu(&head));
                }
            }
            Shape::Label {
                text,
                size_px,
                bold,
                align,
                line_spacing,
            } => {
                let label = LabelStyle {
                    anchor,
                    size_px: *size_px,
                    bold: *bold,
                    align: *align,
                    line_spacing: *line_spacing,
                };
                match n.node.text_for(desc.part.as_deref()) {
                    Some(t) if t.progress < 1.0 && t.from != t.to => {
                        let fading = 1.0 - t.progress;
                        self.draw_text(ctx, n, &label, &t.from.text, t.from.color, fading)?;
                        self.draw_text(ctx, n, &label, &t.to.text, t.to.color, t.progress)?;
                    }
                    Some(t) => self.draw_text(ctx, n, &label, &t.to.text, t.to.color, 1.0)?,
                    None => self.draw_text(ctx, n, &label, text, style.color, 1.0)?,
                }
            }
            Shape::Svg {
                markup,
                width,
                height,
            } => {
                let top_left =
                    Affine::translate(anchor.to_vec2() - Vec2::new(width / 2.0, height / 2.0));
                let paint = self
                    .svg
                    .paint(markup, *width, *height, n.transform * top_left)?;
                ctx.set_transform(affine_to_cpu(paint.transform));
                ctx.set_paint(paint.image);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, paint.width, paint.height));
            }
            Shape::Group { children } => {
                let child_origin = anchor.to_vec2();
                for child in children {
                    self.draw_desc(ctx, n, child, child_origin)?;
                }
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        n: NodeCtx<'_, '_>,
        label: &LabelStyle,
        text: &str,
        color: Color,
        alpha: f64,
    ) -> CycleResult<()> {
        if alpha <= 0.0 {
            return Ok(());
        }
        let Some(font) = self.text.font(label.bold)? else {
            return Ok(());
        };
        let size = label.size_px as f32;
        let pitch = label.size_px * label.line_spacing;
        let lines: Vec<&str> = text.lines().collect();
        let top = label.anchor.y - pitch * lines.len() as f64 / 2.0;

        ctx.set_paint(paint_color(color, alpha));
        for (i, line) in lines.iter().enumerate() {
            let Some(shaped) = self.text.shape_line(line, size, label.bold)? else {
                continue;
            };
            let x = match label.align {
                TextAlign::Center => label.anchor.x - f64::from(shaped.width) / 2.0,
                TextAlign::Start => label.anchor.x,
            };
            let y = top + pitch * i as f64 + (pitch - f64::from(shaped.height)) / 2.0;
            ctx.set_transform(affine_to_cpu(n.transform * Affine::translate((x, y))));
            ctx.glyph_run(&font)
                .font_size(size)
                .fill_glyphs(shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
        }
        Ok(())
    }
}

struct LabelStyle {
    anchor: Point,
    size_px: f64,
    bold: bool,
    align: TextAlign,
    line_spacing: f64,
}

/// Shaft and filled head of an arrow from `start` along `delta`.
fn arrow_paths(start: Point, delta: Vec2, tip_px: f64) -> (BezPath, BezPath) {
    let len = delta.hypot();
    let dir = delta / len;
    let normal = Vec2::new(-dir.y, dir.x);
    let tip = start + delta;
    let head_len = tip_px.min(len);
    let base = tip - dir * head_len;

    let mut shaft = BezPath::new();
    shaft.move_to(start);
    shaft.line_to(base);

    let mut head = BezPath::new();
    head.move_to(tip);
    head.line_to(base + normal * (head_len * 0.5));
    head.line_to(base - normal * (head_len * 0.5));
    head.close_path();
    (shaft, head)
}

fn paint_color(c: Color, alpha: f64) -> vello_cpu::peniko::Color {
    let a = (f64::from(c.a) * alpha.clamp(0.0, 1.0)).round() as u8;
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Wrap premultiplied RGBA8 bytes as an image paint.
pub(crate) fn premul_bytes_to_image(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CycleResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CycleError::evaluation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CycleError::evaluation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CycleError::evaluation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
