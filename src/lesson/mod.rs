//! The 8086 `MUL` lesson: configuration, derived values and the stage set.
//!
//! One parameterized set of stages covers both detail levels. [`mul_lesson`] assembles them in
//! presentation order; [`record_calls`] and [`record_timeline`] run them through the two built-in
//! engines.

use std::sync::Arc;

use crate::engine::log::CallLog;
use crate::engine::timeline::{TimelineEngine, TimelineOpts};
use crate::foundation::error::CycleResult;
use crate::stage::player::{RunReport, StagePlayer};
use crate::stage::{Carried, Stage, StagePlan};
use crate::timeline::model::Timeline;

/// Lesson configuration.
pub mod config;
/// Lesson-unit layout.
pub mod layout;
/// Values derived from the configured operands.
pub mod values;

mod execute;
mod fetch;
mod overview;
mod setup;
mod smoke;
mod wrapup;

use config::{Detail, LessonConfig};
use layout::Kit;

/// Names of the entities handed between stages.
pub mod names {
    /// Multiplicand register box; later shows the low word.
    pub const AX_REGISTER: &str = "ax_register";
    /// Multiplier register box.
    pub const SRC_REGISTER: &str = "src_register";
    /// High-word register box.
    pub const DX_REGISTER: &str = "dx_register";
    /// Memory cell holding the instruction bytes.
    pub const MEMORY_CELL: &str = "memory_cell";
    /// Program counter arrow and address.
    pub const PC_POINTER: &str = "pc_pointer";
    /// Instruction register box.
    pub const IR_REGISTER: &str = "ir_register";
    /// ALU box.
    pub const ALU: &str = "alu";
    /// Gear drawn over the ALU.
    pub const ALU_GEAR: &str = "alu_gear";
}

use names::*;

type BuildFn = fn(&Kit, &Carried<'_>) -> CycleResult<StagePlan>;

struct LessonStage {
    name: &'static str,
    requires: Vec<String>,
    kit: Arc<Kit>,
    build: BuildFn,
}

impl LessonStage {
    fn boxed(
        kit: &Arc<Kit>,
        name: &'static str,
        requires: &[&str],
        build: BuildFn,
    ) -> Box<dyn Stage> {
        Box::new(Self {
            name,
            requires: requires.iter().map(|r| (*r).to_string()).collect(),
            kit: Arc::clone(kit),
            build,
        })
    }
}

impl Stage for LessonStage {
    fn name(&self) -> &str {
        self.name
    }

    fn requires(&self) -> &[String] {
        &self.requires
    }

    fn build(&self, carried: &Carried<'_>) -> CycleResult<StagePlan> {
        (self.build)(&self.kit, carried)
    }
}

/// Which presentation to build.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// The full `MUL` execution cycle.
    #[default]
    Mul,
    /// A single short stage.
    Smoke,
}

/// Stages of `scene` for `cfg`, after validating `cfg`.
pub fn lesson(scene: Scene, cfg: &LessonConfig) -> CycleResult<Vec<Box<dyn Stage>>> {
    cfg.validate()?;
    Ok(match scene {
        Scene::Mul => mul_lesson(cfg),
        Scene::Smoke => smoke_lesson(cfg),
    })
}

/// The `MUL` lesson in presentation order.
///
/// `Brief` leaves out the architecture overview and the performance analysis.
pub fn mul_lesson(cfg: &LessonConfig) -> Vec<Box<dyn Stage>> {
    let kit = Arc::new(Kit::new(cfg.clone()));
    let brief = cfg.detail == Detail::Brief;

    let mut stages = vec![LessonStage::boxed(&kit, "Intro", &[], overview::intro)];
    if !brief {
        stages.push(LessonStage::boxed(
            &kit,
            "Architecture",
            &[],
            overview::architecture,
        ));
    }
    stages.extend([
        LessonStage::boxed(&kit, "Registers", &[], setup::registers),
        LessonStage::boxed(&kit, "Memory", &[], setup::memory),
        LessonStage::boxed(
            &kit,
            "Fetch",
            &[MEMORY_CELL, PC_POINTER, IR_REGISTER],
            fetch::fetch,
        ),
        LessonStage::boxed(&kit, "Decode", &[IR_REGISTER, MEMORY_CELL], fetch::decode),
        LessonStage::boxed(&kit, "ALU", &[], execute::alu),
        LessonStage::boxed(
            &kit,
            "Operand Fetch",
            &[AX_REGISTER, SRC_REGISTER, ALU],
            execute::operand_fetch,
        ),
        LessonStage::boxed(&kit, "Execute", &[ALU, ALU_GEAR], execute::execute),
        LessonStage::boxed(
            &kit,
            "Write-back",
            &[ALU, ALU_GEAR, AX_REGISTER, SRC_REGISTER, DX_REGISTER],
            wrapup::write_back,
        ),
        LessonStage::boxed(&kit, "Flags", &[], wrapup::flags),
    ]);
    if !brief {
        stages.push(LessonStage::boxed(
            &kit,
            "Performance",
            &[],
            wrapup::performance,
        ));
    }
    stages.push(LessonStage::boxed(
        &kit,
        "Summary",
        &[AX_REGISTER, DX_REGISTER],
        wrapup::summary,
    ));
    stages
}

/// A single title stage.
pub fn smoke_lesson(cfg: &LessonConfig) -> Vec<Box<dyn Stage>> {
    let kit = Arc::new(Kit::new(cfg.clone()));
    vec![LessonStage::boxed(&kit, "Smoke", &[], smoke::smoke)]
}

/// Run `stages` against a [`CallLog`].
pub fn record_calls(stages: &[Box<dyn Stage>]) -> CycleResult<(CallLog, RunReport)> {
    let mut player = StagePlayer::new(CallLog::new());
    let report = player.run(stages)?;
    Ok((player.into_engine(), report))
}

/// Run `stages` against a [`TimelineEngine`] configured from `cfg`.
#[tracing::instrument(skip_all, fields(stages = stages.len()))]
pub fn record_timeline(
    cfg: &LessonConfig,
    stages: &[Box<dyn Stage>],
) -> CycleResult<(Timeline, RunReport)> {
    let engine = TimelineEngine::new(TimelineOpts {
        canvas: cfg.canvas,
        fps: cfg.fps,
        background: cfg.background,
        pace: cfg.pace,
    })?;
    let mut player = StagePlayer::new(engine);
    let report = player.run(stages)?;
    let timeline = player.into_engine().into_timeline();
    timeline.validate()?;
    tracing::debug!(
        duration_s = timeline.duration_s,
        entities = timeline.entities.len(),
        "timeline recorded"
    );
    Ok((timeline, report))
}

#[cfg(test)]
#[path = "../../tests/unit/lesson/mod.rs"]
mod tests;
