use crate::engine::{Engine, IdAllocator, PlayBeat};
use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::{Entity, EntityDesc, EntityId};

/// One recorded engine call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum EngineCall {
    /// A stage started.
    BeginStage {
        /// Stage name.
        stage: String,
    },
    /// An entity was created.
    Create {
        /// Assigned identity.
        id: EntityId,
        /// Entity name.
        name: String,
    },
    /// An entity was made visible instantly.
    Add {
        /// Target.
        id: EntityId,
    },
    /// An entity was removed.
    Remove {
        /// Target.
        id: EntityId,
    },
    /// A beat was played.
    Play {
        /// The beat.
        beat: PlayBeat,
    },
    /// The run finished.
    Finish,
}

/// Engine that records every call and draws nothing.
#[derive(Debug, Default)]
pub struct CallLog {
    ids: IdAllocator,
    calls: Vec<EngineCall>,
    live: Vec<EntityId>,
}

impl CallLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in order.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Consume the log, returning the calls.
    pub fn into_calls(self) -> Vec<EngineCall> {
        self.calls
    }

    /// Entities created and not yet removed, in creation order.
    pub fn live(&self) -> &[EntityId] {
        &self.live
    }

    /// Total seconds covered by all played beats.
    pub fn total_duration_s(&self) -> f64 {
        self.calls
            .iter()
            .map(|c| match c {
                EngineCall::Play { beat } => beat.duration_s,
                _ => 0.0,
            })
            .sum()
    }

    /// Calls issued after `BeginStage { stage }` and before the next stage began.
    pub fn calls_for_stage(&self, stage: &str) -> Vec<&EngineCall> {
        let mut out = Vec::new();
        let mut inside = false;
        for c in &self.calls {
            if let EngineCall::BeginStage { stage: s } = c {
                inside = s == stage;
                continue;
            }
            if inside {
                out.push(c);
            }
        }
        out
    }

    /// Names of the stages that began, in order.
    pub fn stages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::BeginStage { stage } => Some(stage.as_str()),
                _ => None,
            })
            .collect()
    }

    fn ensure_live(&self, id: EntityId, what: &str) -> CycleResult<()> {
        if !self.live.contains(&id) {
            return Err(CycleError::evaluation(format!(
                "{what} on entity {} which is not live",
                id.0
            )));
        }
        Ok(())
    }
}

impl Engine for CallLog {
    fn create(&mut self, name: &str, desc: &EntityDesc) -> CycleResult<Entity> {
        let id = self.ids.next_id();
        self.calls.push(EngineCall::Create {
            id,
            name: name.to_string(),
        });
        self.live.push(id);
        Ok(Entity::new(id, name, desc.clone()))
    }

    fn add(&mut self, entity: &Entity) -> CycleResult<()> {
        self.ensure_live(entity.id(), "add")?;
        self.calls.push(EngineCall::Add { id: entity.id() });
        Ok(())
    }

    fn remove(&mut self, entity: &Entity) -> CycleResult<()> {
        self.ensure_live(entity.id(), "remove")?;
        self.live.retain(|id| *id != entity.id());
        self.calls.push(EngineCall::Remove { id: entity.id() });
        Ok(())
    }

    fn play(&mut self, beat: &PlayBeat) -> CycleResult<()> {
        for cue in &beat.cues {
            self.ensure_live(cue.entity, "play")?;
        }
        self.calls.push(EngineCall::Play { beat: beat.clone() });
        Ok(())
    }

    fn begin_stage(&mut self, name: &str) -> CycleResult<()> {
        self.calls.push(EngineCall::BeginStage {
            stage: name.to_string(),
        });
        Ok(())
    }

    fn finish(&mut self) -> CycleResult<()> {
        self.calls.push(EngineCall::Finish);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/log.rs"]
mod tests;
