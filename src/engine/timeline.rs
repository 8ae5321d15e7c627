use std::collections::HashMap;

use crate::animation::ease::Ease;
use crate::engine::{Engine, IdAllocator, PlayBeat, PlayCue};
use crate::foundation::core::{Canvas, Color, Fps};
use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::{Entity, EntityDesc, EntityId};
use crate::scene::transition::Transition;
use crate::timeline::model::{StageSpan, Timeline, TimelineEntity};
use crate::timeline::track::{Highlight, TextValue};

const INDICATE_SCALE: f64 = 1.15;

/// Output settings for a [`TimelineEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineOpts {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Background color.
    pub background: Color,
    /// Multiplier applied to every beat duration.
    pub pace: f64,
}

/// Engine that records a [`Timeline`] of keyed property changes.
///
/// The clock starts at zero and advances by each played beat's duration (times `pace`). `add` and
/// `remove` happen at the current clock.
#[derive(Debug)]
pub struct TimelineEngine {
    opts: TimelineOpts,
    ids: IdAllocator,
    clock_s: f64,
    entities: Vec<TimelineEntity>,
    index: HashMap<EntityId, usize>,
    stages: Vec<StageSpan>,
}

impl TimelineEngine {
    /// Engine with an empty timeline.
    pub fn new(opts: TimelineOpts) -> CycleResult<Self> {
        if !opts.pace.is_finite() || opts.pace <= 0.0 {
            return Err(CycleError::validation("pace must be finite and > 0"));
        }
        Ok(Self {
            opts,
            ids: IdAllocator::default(),
            clock_s: 0.0,
            entities: Vec::new(),
            index: HashMap::new(),
            stages: Vec::new(),
        })
    }

    /// Current clock in seconds.
    pub fn clock_s(&self) -> f64 {
        self.clock_s
    }

    /// Finished timeline.
    pub fn into_timeline(mut self) -> Timeline {
        self.close_stage();
        let mut tl = Timeline::new(self.opts.canvas, self.opts.fps, self.opts.background);
        tl.duration_s = self.clock_s;
        tl.entities = self.entities;
        tl.stages = self.stages;
        tl
    }

    fn close_stage(&mut self) {
        if let Some(last) = self.stages.last_mut() {
            last.end_s = self.clock_s;
        }
    }

    fn live_mut(&mut self, id: EntityId, what: &str) -> CycleResult<&mut TimelineEntity> {
        let idx = *self.index.get(&id).ok_or_else(|| {
            CycleError::evaluation(format!("{what} on unknown entity {}", id.0))
        })?;
        let e = &mut self.entities[idx];
        if e.removed_s.is_some() {
            return Err(CycleError::evaluation(format!(
                "{what} on removed entity '{}'",
                e.name
            )));
        }
        Ok(e)
    }

    fn apply(&mut self, cue: &PlayCue, start: f64, end: f64, ease: Ease) -> CycleResult<()> {
        let e = self.live_mut(cue.entity, cue.transition.label())?;
        match &cue.transition {
            Transition::FadeIn => e.opacity.push(start, end, 1.0, ease),
            Transition::GrowFromCenter => {
                e.opacity.set(start, 1.0)?;
                e.scale.set(start, 0.0)?;
                e.scale.push(start, end, 1.0, ease)
            }
            Transition::Write | Transition::GrowArrow => {
                e.opacity.set(start, 1.0)?;
                e.reveal.set(start, 0.0)?;
                e.reveal.push(start, end, 1.0, ease)
            }
            Transition::FadeOut => e.opacity.push(start, end, 0.0, ease),
            Transition::Highlight { color, width } => e.highlight.push(
                start,
                end,
                Highlight {
                    color: *color,
                    width: *width,
                },
                ease,
            ),
            Transition::ClearHighlight => {
                let current = e.highlight.sample(start);
                e.highlight.push(
                    start,
                    end,
                    Highlight {
                        color: current.color,
                        width: 0.0,
                    },
                    ease,
                )
            }
            Transition::SetText { part, text, color } => {
                let track = e.text_track_mut(part.as_deref())?;
                let from = track.target_at(start).clone();
                let to = TextValue {
                    text: text.clone(),
                    color: color.unwrap_or(from.color),
                };
                track.push_from(start, end, from, to, ease)
            }
            Transition::MoveTo { to } => {
                let delta = *to - e.desc.pos;
                e.offset.push(start, end, delta, ease)
            }
            Transition::Rotate { radians } => {
                let current = e.rotation.sample(start);
                e.rotation.push(start, end, current + radians, ease)
            }
            Transition::Indicate => {
                let mid = start + (end - start) / 2.0;
                let base = e.scale.sample(start);
                e.scale.push(start, mid, base * INDICATE_SCALE, ease)?;
                e.scale.push(mid, end, base, ease)
            }
        }
    }
}

impl Engine for TimelineEngine {
    fn create(&mut self, name: &str, desc: &EntityDesc) -> CycleResult<Entity> {
        desc.validate()?;
        let id = self.ids.next_id();
        self.index.insert(id, self.entities.len());
        self.entities
            .push(TimelineEntity::new(id, name, desc.clone(), self.clock_s));
        Ok(Entity::new(id, name, desc.clone()))
    }

    fn add(&mut self, entity: &Entity) -> CycleResult<()> {
        let now = self.clock_s;
        self.live_mut(entity.id(), "add")?.opacity.set(now, 1.0)
    }

    fn remove(&mut self, entity: &Entity) -> CycleResult<()> {
        let now = self.clock_s;
        self.live_mut(entity.id(), "remove")?.removed_s = Some(now);
        Ok(())
    }

    fn play(&mut self, beat: &PlayBeat) -> CycleResult<()> {
        if !beat.duration_s.is_finite() || beat.duration_s < 0.0 {
            return Err(CycleError::evaluation(format!(
                "beat duration must be finite and >= 0 (got {})",
                beat.duration_s
            )));
        }
        let start = self.clock_s;
        let end = start + beat.duration_s * self.opts.pace;
        for cue in &beat.cues {
            self.apply(cue, start, end, beat.ease)?;
        }
        self.clock_s = end;
        Ok(())
    }

    fn begin_stage(&mut self, name: &str) -> CycleResult<()> {
        self.close_stage();
        self.stages.push(StageSpan {
            name: name.to_string(),
            start_s: self.clock_s,
            end_s: self.clock_s,
        });
        Ok(())
    }

    fn finish(&mut self) -> CycleResult<()> {
        self.close_stage();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/timeline.rs"]
mod tests;
