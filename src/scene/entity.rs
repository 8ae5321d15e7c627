use crate::foundation::core::{Color, Point, Rect, Vec2};
use crate::foundation::error::{CycleError, CycleResult};

/// Engine-assigned identity of a created entity.
///
/// Two [`Entity`] handles refer to the same on-screen object iff their ids are equal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EntityId(pub u64);

/// Horizontal anchoring of a label around its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Left edge at the position.
    Start,
    /// Centered on the position.
    #[default]
    Center,
}

/// Drawable geometry of an entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Rounded rectangle centered on the entity position.
    Box {
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
        /// Corner radius in pixels.
        corner_radius: f64,
    },
    /// Text, possibly multi-line (`\n`).
    Label {
        /// Displayed text.
        text: String,
        /// Font size in pixels.
        size_px: f64,
        /// Bold weight.
        bold: bool,
        /// Anchoring around the position.
        align: TextAlign,
        /// Line height as a multiple of the font size.
        line_spacing: f64,
    },
    /// Arrow starting at the entity position.
    Arrow {
        /// Vector from the start to the tip.
        delta: Vec2,
        /// Length of the arrow head in pixels.
        tip_px: f64,
    },
    /// Filled circle centered on the entity position.
    Dot {
        /// Radius in pixels.
        radius: f64,
    },
    /// Inline SVG document drawn centered on the entity position.
    Svg {
        /// SVG markup.
        markup: String,
        /// Drawn width in pixels.
        width: f64,
        /// Drawn height in pixels.
        height: f64,
    },
    /// Composite whose children are positioned relative to the group position.
    Group {
        /// Child descriptors, in painter order.
        children: Vec<EntityDesc>,
    },
}

/// Visual style shared by all shapes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    /// Primary color: box/arrow stroke, dot fill, label text.
    pub color: Color,
    /// Optional box fill.
    pub fill: Option<Color>,
    /// Stroke width in pixels for boxes and arrows.
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            fill: None,
            stroke_width: 3.0,
        }
    }
}

/// Description of an entity to create: geometry, position and style.
///
/// Positions are canvas pixels for top-level descriptors and offsets from the parent position for
/// group children.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityDesc {
    /// Geometry.
    pub shape: Shape,
    /// Anchor position (center for most shapes, start for arrows).
    pub pos: Point,
    /// Style.
    pub style: Style,
    /// Optional tag addressing this child inside a group (for value replacement).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

impl EntityDesc {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            pos: Point::ZERO,
            style: Style::default(),
            part: None,
        }
    }

    /// Rounded box of `width × height` pixels.
    pub fn rect(width: f64, height: f64) -> Self {
        Self::with_shape(Shape::Box {
            width,
            height,
            corner_radius: 6.0,
        })
    }

    /// Centered text label.
    pub fn label(text: impl Into<String>, size_px: f64) -> Self {
        Self::with_shape(Shape::Label {
            text: text.into(),
            size_px,
            bold: false,
            align: TextAlign::Center,
            line_spacing: 1.3,
        })
    }

    /// Arrow from `from` to `to`.
    pub fn arrow(from: Point, to: Point) -> Self {
        Self {
            pos: from,
            ..Self::with_shape(Shape::Arrow {
                delta: to - from,
                tip_px: 18.0,
            })
        }
    }

    /// Filled dot.
    pub fn dot(radius: f64) -> Self {
        Self::with_shape(Shape::Dot { radius })
    }

    /// Inline SVG art drawn at `width × height`.
    pub fn svg(markup: impl Into<String>, width: f64, height: f64) -> Self {
        Self::with_shape(Shape::Svg {
            markup: markup.into(),
            width,
            height,
        })
    }

    /// Group children given in absolute coordinates around their common bounds center.
    pub fn group(children: Vec<EntityDesc>) -> Self {
        let center = children
            .iter()
            .map(EntityDesc::bounds)
            .reduce(|a, b| a.union(b))
            .map(|r| r.center())
            .unwrap_or(Point::ZERO);
        let children = children
            .into_iter()
            .map(|mut c| {
                c.pos = Point::new(c.pos.x - center.x, c.pos.y - center.y);
                c
            })
            .collect();
        Self {
            pos: center,
            ..Self::with_shape(Shape::Group { children })
        }
    }

    /// Set the anchor position.
    pub fn at(mut self, pos: Point) -> Self {
        self.pos = pos;
        self
    }

    /// Set the primary color.
    pub fn color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    /// Set the box fill.
    pub fn fill(mut self, fill: Color) -> Self {
        self.style.fill = Some(fill);
        self
    }

    /// Set the stroke width.
    pub fn stroke_width(mut self, width: f64) -> Self {
        self.style.stroke_width = width;
        self
    }

    /// Tag this descriptor so it can be addressed inside a group.
    pub fn part(mut self, part: impl Into<String>) -> Self {
        self.part = Some(part.into());
        self
    }

    /// Use bold weight (labels only).
    pub fn bold(mut self) -> Self {
        if let Shape::Label { bold, .. } = &mut self.shape {
            *bold = true;
        }
        self
    }

    /// Anchor the label's left edge at its position (labels only).
    pub fn align_start(mut self) -> Self {
        if let Shape::Label { align, .. } = &mut self.shape {
            *align = TextAlign::Start;
        }
        self
    }

    /// Set the line height multiple (labels only).
    pub fn line_spacing(mut self, spacing: f64) -> Self {
        if let Shape::Label { line_spacing, .. } = &mut self.shape {
            *line_spacing = spacing;
        }
        self
    }

    /// Approximate bounds in the coordinate space of `pos`.
    ///
    /// Label extents are estimated from character counts; they are meant for layout, not hit
    /// testing.
    pub fn bounds(&self) -> Rect {
        let p = self.pos;
        match &self.shape {
            Shape::Box { width, height, .. } | Shape::Svg { width, height, .. } => {
                Rect::from_center_size(p, (*width, *height))
            }
            Shape::Label {
                text,
                size_px,
                align,
                line_spacing,
                ..
            } => {
                let (w, h) = approx_text_size(text, *size_px, *line_spacing);
                match align {
                    TextAlign::Center => Rect::from_center_size(p, (w, h)),
                    TextAlign::Start => Rect::new(p.x, p.y - h / 2.0, p.x + w, p.y + h / 2.0),
                }
            }
            Shape::Arrow { delta, .. } => Rect::from_points(p, p + *delta),
            Shape::Dot { radius } => Rect::from_center_size(p, (radius * 2.0, radius * 2.0)),
            Shape::Group { children } => children
                .iter()
                .map(EntityDesc::bounds)
                .reduce(|a, b| a.union(b))
                .map(|r| r + p.to_vec2())
                .unwrap_or_else(|| Rect::from_center_size(p, (0.0, 0.0))),
        }
    }

    /// Find a descriptor by part tag (this descriptor or any group descendant).
    pub fn find_part(&self, part: &str) -> Option<&EntityDesc> {
        if self.part.as_deref() == Some(part) {
            return Some(self);
        }
        match &self.shape {
            Shape::Group { children } => children.iter().find_map(|c| c.find_part(part)),
            _ => None,
        }
    }

    /// Return `true` when a value replacement addressed at `part` can land on a label.
    pub fn has_text_target(&self, part: Option<&str>) -> bool {
        let target = match part {
            Some(part) => self.find_part(part),
            None => Some(self),
        };
        matches!(
            target.map(|d| &d.shape),
            Some(Shape::Label { .. })
        )
    }

    /// Check numeric fields and nested children.
    pub fn validate(&self) -> CycleResult<()> {
        fn positive(what: &str, v: f64) -> CycleResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(CycleError::validation(format!(
                    "{what} must be finite and > 0 (got {v})"
                )));
            }
            Ok(())
        }

        if !self.pos.x.is_finite() || !self.pos.y.is_finite() {
            return Err(CycleError::validation("entity position must be finite"));
        }
        if !self.style.stroke_width.is_finite() || self.style.stroke_width < 0.0 {
            return Err(CycleError::validation("stroke width must be finite and >= 0"));
        }
        match &self.shape {
            Shape::Box {
                width,
                height,
                corner_radius,
            } => {
                positive("box width", *width)?;
                positive("box height", *height)?;
                if !corner_radius.is_finite() || *corner_radius < 0.0 {
                    return Err(CycleError::validation("corner radius must be >= 0"));
                }
            }
            Shape::Label {
                size_px,
                line_spacing,
                ..
            } => {
                positive("label size_px", *size_px)?;
                positive("label line_spacing", *line_spacing)?;
            }
            Shape::Arrow { delta, tip_px } => {
                if !delta.x.is_finite() || !delta.y.is_finite() || delta.hypot() == 0.0 {
                    return Err(CycleError::validation("arrow must have a non-zero length"));
                }
                positive("arrow tip_px", *tip_px)?;
            }
            Shape::Dot { radius } => positive("dot radius", *radius)?,
            Shape::Svg {
                markup,
                width,
                height,
            } => {
                if markup.trim().is_empty() {
                    return Err(CycleError::validation("svg markup must be non-empty"));
                }
                positive("svg width", *width)?;
                positive("svg height", *height)?;
            }
            Shape::Group { children } => {
                for c in children {
                    c.validate()?;
                }
            }
        }
        Ok(())
    }
}

fn approx_text_size(text: &str, size_px: f64, line_spacing: f64) -> (f64, f64) {
    let lines = text.lines().count().max(1) as f64;
    let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
    (widest * size_px * 0.55, lines * size_px * line_spacing)
}

/// Handle to an entity created by an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Entity {
    id: EntityId,
    name: String,
    desc: EntityDesc,
}

impl Entity {
    /// Construct a handle; engines call this from `create`.
    pub fn new(id: EntityId, name: impl Into<String>, desc: EntityDesc) -> Self {
        Self {
            id,
            name: name.into(),
            desc,
        }
    }

    /// Identity.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Stable name under which the entity was created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor the entity was created from.
    pub fn desc(&self) -> &EntityDesc {
        &self.desc
    }

    /// Anchor position in canvas pixels.
    pub fn pos(&self) -> Point {
        self.desc.pos
    }

    /// Approximate bounds in canvas pixels.
    pub fn bounds(&self) -> Rect {
        self.desc.bounds()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entity.rs"]
mod tests;
