use std::collections::{BTreeMap, BTreeSet};

use crate::animation::ease::Ease;
use crate::engine::{Engine, PlayBeat, PlayCue};
use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::{Entity, EntityId};
use crate::scene::state::SceneState;
use crate::scene::transition::Transition;
use crate::stage::plan::Beat;
use crate::stage::{Carried, Stage};

/// What one stage did to the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StageReport {
    /// Stage name.
    pub name: String,
    /// Carried names the stage required.
    pub required: Vec<String>,
    /// Names of the entities it created.
    pub created: Vec<String>,
    /// Names removed at its exit.
    pub removed: Vec<String>,
    /// Scene contents after its exit (the carried set), in painter order.
    pub carried: Vec<String>,
    /// Seconds of beats played, exit fade included.
    pub duration_s: f64,
}

/// Outcome of a complete run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Per-stage reports in run order.
    pub stages: Vec<StageReport>,
}

impl RunReport {
    /// Names still in the scene when the run ended.
    pub fn final_carried(&self) -> &[String] {
        self.stages.last().map_or(&[], |s| s.carried.as_slice())
    }

    /// Sum of all stage durations.
    pub fn duration_s(&self) -> f64 {
        self.stages.iter().map(|s| s.duration_s).sum()
    }
}

/// Runs stages in order against an [`Engine`], owning the scene bookkeeping.
///
/// After every stage the scene holds exactly the carried set: the stage's explicit carry list plus
/// inherited entities it did not require. A required entity that is not carried again is faded out
/// and removed at the stage's exit.
#[derive(Debug)]
pub struct StagePlayer<E> {
    engine: E,
    scene: SceneState,
}

impl<E: Engine> StagePlayer<E> {
    /// Player with an empty scene.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            scene: SceneState::new(),
        }
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Current scene contents.
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Consume the player, returning the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run every stage in order; the first failure aborts the run.
    pub fn run(&mut self, stages: &[Box<dyn Stage>]) -> CycleResult<RunReport> {
        tracing::info!(stages = stages.len(), "presentation run started");
        let mut report = RunReport::default();
        for stage in stages {
            let stage_report = self.run_stage(stage.as_ref()).inspect_err(|e| {
                tracing::error!(stage = stage.name(), error = %e, "stage failed");
            })?;
            report.stages.push(stage_report);
        }
        self.engine.finish()?;
        tracing::info!(
            duration_s = report.duration_s(),
            carried = self.scene.len(),
            "presentation run finished"
        );
        Ok(report)
    }

    /// Run one stage against the current scene.
    #[tracing::instrument(skip_all, fields(stage = stage.name()))]
    pub fn run_stage(&mut self, stage: &dyn Stage) -> CycleResult<StageReport> {
        let name = stage.name();
        self.engine.begin_stage(name)?;

        let mut required: Vec<&str> = Vec::new();
        for r in stage.requires() {
            if self.scene.get(r).is_none() {
                return Err(CycleError::carry_mismatch(name, r));
            }
            if !required.contains(&r.as_str()) {
                required.push(r);
            }
        }

        let carried = Carried::new(
            self.scene
                .iter()
                .filter(|e| required.contains(&e.name()))
                .collect(),
        );
        let plan = stage
            .build(&carried)
            .map_err(|e| e.into_build_failure(name))?;
        let live = self.scene.names();
        let visible_at_exit = plan.validate(name, &carried, &live)?;
        tracing::debug!(
            entities = plan.entities().len(),
            enter = plan.enter_beats().len(),
            explain = plan.explain_beats().len(),
            "plan validated"
        );

        // Handles the stage may address by name: its required entities, then what it creates.
        let mut owned: BTreeMap<String, Entity> = carried
            .iter()
            .map(|e| (e.name().to_string(), e.clone()))
            .collect();
        let mut created = Vec::with_capacity(plan.entities().len());
        for (entity_name, desc) in plan.entities() {
            let entity = self.engine.create(entity_name, desc)?;
            self.scene.insert(entity.clone())?;
            owned.insert(entity_name.clone(), entity);
            created.push(entity_name.clone());
        }

        let mut duration_s = 0.0;
        for beat in plan.enter_beats().iter().chain(plan.explain_beats()) {
            for target in &beat.shows {
                let entity = lookup(&owned, target, name)?;
                self.engine.add(entity)?;
            }
            if beat.cues.is_empty() && !beat.shows.is_empty() && beat.duration_s == 0.0 {
                continue;
            }
            self.engine.play(&resolve(beat, &owned, name)?)?;
            duration_s += beat.duration_s;
        }

        let keep: BTreeSet<&str> = plan.carried().iter().map(String::as_str).collect();
        let disposed: Vec<Entity> = self
            .scene
            .iter()
            .filter(|e| owned.contains_key(e.name()) && !keep.contains(e.name()))
            .cloned()
            .collect();

        let fade: Vec<PlayCue> = disposed
            .iter()
            .filter(|e| visible_at_exit.contains(e.name()))
            .map(|e| PlayCue {
                entity: e.id(),
                transition: Transition::FadeOut,
            })
            .collect();
        if !fade.is_empty() {
            self.engine.play(&PlayBeat {
                cues: fade,
                duration_s: plan.exit_s(),
                ease: Ease::default(),
            })?;
            duration_s += plan.exit_s();
        }

        let mut removed = Vec::with_capacity(disposed.len());
        for entity in &disposed {
            self.engine.remove(entity)?;
            self.scene.take(entity.name());
            removed.push(entity.name().to_string());
        }

        let carried_after: Vec<String> = self.scene.names().into_iter().map(String::from).collect();
        tracing::debug!(
            created = created.len(),
            removed = removed.len(),
            carried = ?carried_after,
            "stage exited"
        );

        Ok(StageReport {
            name: name.to_string(),
            required: required.into_iter().map(String::from).collect(),
            created,
            removed,
            carried: carried_after,
            duration_s,
        })
    }
}

fn lookup<'a>(
    owned: &'a BTreeMap<String, Entity>,
    target: &str,
    stage: &str,
) -> CycleResult<&'a Entity> {
    owned
        .get(target)
        .ok_or_else(|| CycleError::build_failure(stage, format!("unknown entity '{target}'")))
}

fn resolve(beat: &Beat, owned: &BTreeMap<String, Entity>, stage: &str) -> CycleResult<PlayBeat> {
    let cues = beat
        .cues
        .iter()
        .map(|cue| {
            let entity: EntityId = lookup(owned, &cue.target, stage)?.id();
            Ok(PlayCue {
                entity,
                transition: cue.transition.clone(),
            })
        })
        .collect::<CycleResult<Vec<_>>>()?;
    Ok(PlayBeat {
        cues,
        duration_s: beat.duration_s,
        ease: beat.ease,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/stage/player.rs"]
mod tests;
