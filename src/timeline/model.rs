use std::collections::BTreeMap;

use crate::foundation::core::{Canvas, Color, Fps, Vec2};
use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::{EntityDesc, EntityId, Shape};
use crate::timeline::track::{Highlight, TextValue, Track};

/// Time-stamped record of a whole presentation run, ready for frame evaluation.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Timeline {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Background color.
    pub background: Color,
    /// Total length in seconds.
    pub duration_s: f64,
    /// Every entity ever created, in creation (painter) order.
    pub entities: Vec<TimelineEntity>,
    /// Time span of each stage, in run order.
    pub stages: Vec<StageSpan>,
}

/// Where a stage sits on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StageSpan {
    /// Stage name.
    pub name: String,
    /// Start time in seconds.
    pub start_s: f64,
    /// End time in seconds.
    pub end_s: f64,
}

impl StageSpan {
    /// Length in seconds.
    pub fn duration_s(&self) -> f64 {
        self.end_s - self.start_s
    }
}

/// One entity's lifetime and animated properties.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TimelineEntity {
    /// Engine identity.
    pub id: EntityId,
    /// Entity name.
    pub name: String,
    /// Geometry and style at creation.
    pub desc: EntityDesc,
    /// Creation time in seconds.
    pub born_s: f64,
    /// Removal time in seconds, if removed.
    pub removed_s: Option<f64>,
    /// Opacity in `[0, 1]`; starts at 0 (created but not yet revealed).
    pub opacity: Track<f64>,
    /// Uniform scale around the entity center.
    pub scale: Track<f64>,
    /// Left-to-right reveal fraction (arrows draw from the tail).
    pub reveal: Track<f64>,
    /// Translation from the created position.
    pub offset: Track<Vec2>,
    /// Rotation around the entity center, radians.
    pub rotation: Track<f64>,
    /// Outline.
    pub highlight: Track<Highlight>,
    /// Replaceable label text keyed by part tag (`""` for a label entity itself).
    pub texts: BTreeMap<String, Track<TextValue>>,
}

impl TimelineEntity {
    /// Fresh entity born at `born_s`, invisible until revealed.
    pub fn new(id: EntityId, name: impl Into<String>, desc: EntityDesc, born_s: f64) -> Self {
        let highlight = Highlight {
            color: desc.style.color,
            width: 0.0,
        };
        Self {
            id,
            name: name.into(),
            desc,
            born_s,
            removed_s: None,
            opacity: Track::new(0.0),
            scale: Track::new(1.0),
            reveal: Track::new(1.0),
            offset: Track::new(Vec2::ZERO),
            rotation: Track::new(0.0),
            highlight: Track::new(highlight),
            texts: BTreeMap::new(),
        }
    }

    /// Return `true` when the entity exists at `t` (born, not yet removed).
    pub fn alive_at(&self, t: f64) -> bool {
        t >= self.born_s && self.removed_s.is_none_or(|r| t < r)
    }

    /// Text track for `part`, created on first use from the label's initial text.
    pub fn text_track_mut(&mut self, part: Option<&str>) -> CycleResult<&mut Track<TextValue>> {
        let key = part.unwrap_or_default().to_string();
        if !self.texts.contains_key(&key) {
            let initial = initial_text(&self.desc, part).ok_or_else(|| {
                CycleError::evaluation(format!(
                    "entity '{}' has no label addressed by part {:?}",
                    self.name, part
                ))
            })?;
            self.texts.insert(key.clone(), Track::new(initial));
        }
        self.texts
            .get_mut(&key)
            .ok_or_else(|| CycleError::evaluation("text track vanished"))
    }
}

fn initial_text(desc: &EntityDesc, part: Option<&str>) -> Option<TextValue> {
    let target = match part {
        Some(p) => desc.find_part(p)?,
        None => desc,
    };
    match &target.shape {
        Shape::Label { text, .. } => Some(TextValue {
            text: text.clone(),
            color: target.style.color,
        }),
        _ => None,
    }
}

impl Timeline {
    /// Empty timeline.
    pub fn new(canvas: Canvas, fps: Fps, background: Color) -> Self {
        Self {
            canvas,
            fps,
            background,
            duration_s: 0.0,
            entities: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// Total length in whole frames (partial frames round up).
    pub fn duration_frames(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.duration_s)
    }

    /// Time in seconds at which frame `frame` is sampled.
    pub fn frame_time_s(&self, frame: u64) -> f64 {
        self.fps.frames_to_secs(frame)
    }

    /// Look up an entity by identity.
    pub fn entity(&self, id: EntityId) -> Option<&TimelineEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Check canvas, frame rate and duration.
    pub fn validate(&self) -> CycleResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CycleError::validation("canvas width/height must be > 0"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.duration_s.is_finite() || self.duration_s < 0.0 {
            return Err(CycleError::validation("timeline duration must be finite and >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
