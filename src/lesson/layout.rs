use crate::foundation::core::{Canvas, Color, Point, Rect};
use crate::foundation::math::Lerp as _;
use crate::lesson::config::{Detail, LessonConfig, Palette};
use crate::lesson::values::MulExample;
use crate::scene::entity::EntityDesc;

/// Maps lesson units onto the canvas.
///
/// The visible area is 8 units tall with the origin at the canvas center and `y` pointing up, so
/// layouts read the same at any resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    origin: Point,
    unit: f64,
    text_scale: f64,
}

impl Layout {
    /// Layout for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        let h = f64::from(canvas.height);
        Self {
            origin: canvas.center(),
            unit: h / 8.0,
            text_scale: h / 1080.0,
        }
    }

    /// Canvas point of lesson coordinates `(x, y)`.
    pub fn pt(&self, x: f64, y: f64) -> Point {
        Point::new(self.origin.x + x * self.unit, self.origin.y - y * self.unit)
    }

    /// Pixels of `units`.
    pub fn len(&self, units: f64) -> f64 {
        units * self.unit
    }

    /// Font size in pixels for a size given at 1080p.
    pub fn font(&self, size: f64) -> f64 {
        (size * self.text_scale).max(1.0)
    }
}

/// Shared context of the lesson stages: configuration, derived values and descriptor helpers.
#[derive(Clone, Debug)]
pub(crate) struct Kit {
    pub(crate) cfg: LessonConfig,
    pub(crate) mul: MulExample,
    pub(crate) layout: Layout,
}

impl Kit {
    pub(crate) fn new(cfg: LessonConfig) -> Self {
        Self {
            mul: MulExample::from_config(&cfg),
            layout: Layout::new(cfg.canvas),
            cfg,
        }
    }

    pub(crate) fn palette(&self) -> &Palette {
        &self.cfg.palette
    }

    pub(crate) fn detailed(&self) -> bool {
        self.cfg.detail == Detail::Detailed
    }

    /// Hold length, halved in brief mode.
    pub(crate) fn hold(&self, s: f64) -> f64 {
        match self.cfg.detail {
            Detail::Brief => s * 0.5,
            Detail::Detailed => s,
        }
    }

    pub(crate) fn pt(&self, x: f64, y: f64) -> Point {
        self.layout.pt(x, y)
    }

    /// Stage heading near the top edge.
    pub(crate) fn title(&self, text: &str, color: Color) -> EntityDesc {
        self.text(text, 40.0, color, 0.0, 3.45).bold()
    }

    pub(crate) fn text(&self, text: &str, size: f64, color: Color, x: f64, y: f64) -> EntityDesc {
        EntityDesc::label(text, self.layout.font(size))
            .color(color)
            .at(self.pt(x, y))
    }

    /// Translucent filled box in lesson units.
    pub(crate) fn panel(&self, w: f64, h: f64, color: Color, x: f64, y: f64) -> EntityDesc {
        EntityDesc::rect(self.layout.len(w), self.layout.len(h))
            .color(color)
            .fill(color.with_opacity(0.12))
            .at(self.pt(x, y))
    }

    pub(crate) fn arrow(&self, from: Point, to: Point, color: Color) -> EntityDesc {
        EntityDesc::arrow(from, to)
            .color(color)
            .stroke_width(4.0 * self.layout.text_scale)
    }

    pub(crate) fn dot(&self, at: Point, color: Color) -> EntityDesc {
        EntityDesc::dot(self.layout.len(0.1)).color(color).at(at)
    }

    /// Register box with its name on top, value in the middle and role below.
    ///
    /// The value label is tagged `value` so later stages can replace it.
    pub(crate) fn register(
        &self,
        name: &str,
        value: &str,
        role: &str,
        x: f64,
        y: f64,
    ) -> EntityDesc {
        let p = self.palette();
        EntityDesc::group(vec![
            self.panel(2.5, 1.2, p.blue, x, y),
            self.text(name, 28.0, p.blue, x, y + 0.36).bold().part("name"),
            self.text(value, 26.0, p.text, x, y).part("value"),
            self.text(role, 16.0, soft(p.blue), x, y - 0.4).part("role"),
        ])
    }

    /// Flag box with its name above and its bit inside.
    pub(crate) fn flag(&self, name: &str, set: bool, x: f64, y: f64) -> EntityDesc {
        let p = self.palette();
        EntityDesc::group(vec![
            self.panel(1.8, 0.8, p.yellow, x, y),
            self.text(name, 18.0, p.yellow, x, y + 0.62),
            self.text(crate::lesson::values::bit(set), 24.0, p.text, x, y)
                .bold()
                .part("value"),
        ])
    }

    /// Gear art drawn in `color` with a hole showing the background.
    pub(crate) fn gear(&self, color: Color, x: f64, y: f64) -> EntityDesc {
        let size = self.layout.len(0.95);
        EntityDesc::svg(gear_svg(color, self.cfg.background), size, size).at(self.pt(x, y))
    }
}

/// Lighter tint of `c` used for captions.
pub(crate) fn soft(c: Color) -> Color {
    c.lerp_to(&Color::WHITE, 0.5)
}

/// Point `gap` pixels right of `r`, `dy_px` pixels below its center.
pub(crate) fn right_of(r: Rect, dy_px: f64, gap: f64) -> Point {
    Point::new(r.x1 + gap, r.center().y + dy_px)
}

/// Point `gap` pixels left of `r`, `dy_px` pixels below its center.
pub(crate) fn left_of(r: Rect, dy_px: f64, gap: f64) -> Point {
    Point::new(r.x0 - gap, r.center().y + dy_px)
}

fn gear_svg(color: Color, hole: Color) -> String {
    let fill = color.to_hex();
    let hole = hole.to_hex();
    let mut teeth = String::new();
    for k in 0..8 {
        teeth.push_str(&format!(
            r#"<rect x="43" y="2" width="14" height="22" rx="2" transform="rotate({} 50 50)"/>"#,
            k * 45
        ));
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><g fill="{fill}">{teeth}<circle cx="50" cy="50" r="33"/></g><circle cx="50" cy="50" r="12" fill="{hole}"/></svg>"#
    )
}

#[cfg(test)]
#[path = "../../tests/unit/lesson/layout.rs"]
mod tests;
