use crate::foundation::core::{Color, Point};

/// Visual change applied to one entity over a beat.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Opacity 0 → 1.
    FadeIn,
    /// Scale 0 → 1 around the entity center, fully opaque from the start.
    GrowFromCenter,
    /// Left-to-right wipe reveal (text being written).
    Write,
    /// Arrow drawn from its start to its tip.
    GrowArrow,
    /// Opacity → 0.
    FadeOut,
    /// Outline the entity with `color` at `width` pixels.
    Highlight {
        /// Outline color.
        color: Color,
        /// Outline width in pixels.
        width: f64,
    },
    /// Remove the outline.
    ClearHighlight,
    /// Replace the text of a label (or of the label tagged `part` inside a group).
    SetText {
        /// Part tag, `None` for a label entity itself.
        part: Option<String>,
        /// New text.
        text: String,
        /// New text color, `None` keeps the current one.
        color: Option<Color>,
    },
    /// Move the entity anchor to an absolute canvas position.
    MoveTo {
        /// Destination anchor position.
        to: Point,
    },
    /// Rotate around the entity center by `radians` (relative).
    Rotate {
        /// Rotation delta.
        radians: f64,
    },
    /// Brief scale pulse drawing attention to the entity.
    Indicate,
}

impl Transition {
    /// Transitions that make a hidden entity visible.
    pub fn is_reveal(&self) -> bool {
        matches!(
            self,
            Self::FadeIn | Self::GrowFromCenter | Self::Write | Self::GrowArrow
        )
    }

    /// Transitions that hide a visible entity.
    pub fn is_hide(&self) -> bool {
        matches!(self, Self::FadeOut)
    }

    /// Short lowercase name used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FadeIn => "fade_in",
            Self::GrowFromCenter => "grow_from_center",
            Self::Write => "write",
            Self::GrowArrow => "grow_arrow",
            Self::FadeOut => "fade_out",
            Self::Highlight { .. } => "highlight",
            Self::ClearHighlight => "clear_highlight",
            Self::SetText { .. } => "set_text",
            Self::MoveTo { .. } => "move_to",
            Self::Rotate { .. } => "rotate",
            Self::Indicate => "indicate",
        }
    }
}
