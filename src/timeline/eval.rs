use crate::foundation::core::{Affine, Canvas, Color, FrameIndex, Vec2};
use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::{EntityDesc, EntityId};
use crate::timeline::model::{Timeline, TimelineEntity};
use crate::timeline::track::{Highlight, TextValue};

const MIN_VISIBLE_OPACITY: f64 = 1.0 / 512.0;

/// Everything needed to draw one frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedFrame<'a> {
    /// Frame index.
    pub frame: FrameIndex,
    /// Sample time in seconds.
    pub time_s: f64,
    /// Output canvas.
    pub canvas: Canvas,
    /// Background color.
    pub background: Color,
    /// Visible entities in painter order.
    pub nodes: Vec<EvaluatedNode<'a>>,
}

/// One visible entity with its sampled properties.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedNode<'a> {
    /// Engine identity.
    pub id: EntityId,
    /// Entity name.
    pub name: &'a str,
    /// Geometry and base style.
    pub desc: &'a EntityDesc,
    /// Opacity in `(0, 1]`.
    pub opacity: f64,
    /// Reveal fraction in `[0, 1]`.
    pub reveal: f64,
    /// Canvas transform (translation, then rotation and scale about the entity center).
    pub transform: Affine,
    /// Outline.
    pub highlight: Highlight,
    /// Replaced label texts.
    pub texts: Vec<EvaluatedText<'a>>,
}

/// A label whose text has been replaced at least once.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedText<'a> {
    /// Part tag (`""` for the entity itself).
    pub part: &'a str,
    /// Text fading out.
    pub from: &'a TextValue,
    /// Text fading in.
    pub to: &'a TextValue,
    /// Crossfade progress in `[0, 1]`.
    pub progress: f64,
}

impl<'a> EvaluatedNode<'a> {
    /// Replaced text addressed by `part` (`None` for the entity itself).
    pub fn text_for(&self, part: Option<&str>) -> Option<&EvaluatedText<'a>> {
        let key = part.unwrap_or_default();
        self.texts.iter().find(|t| t.part == key)
    }
}

/// Samples a [`Timeline`] at frame instants.
pub struct Evaluator;

impl Evaluator {
    /// Visible nodes of `timeline` at `frame`, in painter order.
    ///
    /// Callers sampling many frames validate the timeline once up front.
    #[tracing::instrument(skip(timeline), fields(entities = timeline.entities.len()))]
    pub fn eval_frame(timeline: &Timeline, frame: FrameIndex) -> CycleResult<EvaluatedFrame<'_>> {
        if frame.0 >= timeline.duration_frames() {
            return Err(CycleError::evaluation(format!(
                "frame {} is out of bounds (timeline has {} frames)",
                frame.0,
                timeline.duration_frames()
            )));
        }

        let t = timeline.frame_time_s(frame.0);
        let nodes = timeline
            .entities
            .iter()
            .filter(|e| e.alive_at(t))
            .filter_map(|e| eval_entity(e, t))
            .collect();

        Ok(EvaluatedFrame {
            frame,
            time_s: t,
            canvas: timeline.canvas,
            background: timeline.background,
            nodes,
        })
    }
}

fn eval_entity(e: &TimelineEntity, t: f64) -> Option<EvaluatedNode<'_>> {
    let opacity = e.opacity.sample(t).clamp(0.0, 1.0);
    if opacity < MIN_VISIBLE_OPACITY {
        return None;
    }
    let scale = e.scale.sample(t).max(0.0);
    if scale <= 0.0 {
        return None;
    }

    let center = e.desc.bounds().center().to_vec2();
    let offset: Vec2 = e.offset.sample(t);
    let transform = Affine::translate(offset + center)
        * Affine::rotate(e.rotation.sample(t))
        * Affine::scale(scale)
        * Affine::translate(-center);

    let texts = e
        .texts
        .iter()
        .map(|(part, track)| {
            let s = track.sample_raw(t);
            EvaluatedText {
                part: part.as_str(),
                from: s.from,
                to: s.to,
                progress: s.progress,
            }
        })
        .collect();

    Some(EvaluatedNode {
        id: e.id,
        name: &e.name,
        desc: &e.desc,
        opacity,
        reveal: e.reveal.sample(t).clamp(0.0, 1.0),
        transform,
        highlight: e.highlight.sample(t),
        texts,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/eval.rs"]
mod tests;
