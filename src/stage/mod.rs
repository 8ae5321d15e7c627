//! Named presentation stages and the player that runs them.
//!
//! A [`Stage`] declares which carried entities it needs, then builds a [`StagePlan`]: new entity
//! descriptors, an enter script, an explain script, an exit fade and the names it hands off. The
//! [`StagePlayer`](player::StagePlayer) validates each plan before issuing any engine call for the
//! stage.

use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::Entity;

/// Stage plans and beat builders.
pub mod plan;
/// Stage sequencing.
pub mod player;

pub use plan::{Beat, Cue, StagePlan};

/// One named step of a presentation.
pub trait Stage {
    /// Stage name, used in reports and errors.
    fn name(&self) -> &str;

    /// Carried entity names this stage reads or disposes of.
    fn requires(&self) -> &[String] {
        &[]
    }

    /// Declare this stage's entities and scripts.
    ///
    /// `carried` exposes only the entities listed in [`Stage::requires`].
    fn build(&self, carried: &Carried<'_>) -> CycleResult<StagePlan>;
}

/// Read-only view of the carried entities a stage required.
#[derive(Clone, Debug)]
pub struct Carried<'a> {
    entities: Vec<&'a Entity>,
}

impl<'a> Carried<'a> {
    pub(crate) fn new(entities: Vec<&'a Entity>) -> Self {
        Self { entities }
    }

    /// View with nothing carried.
    pub fn empty() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// The carried entity named `name`.
    ///
    /// Asking for a name that was not required is a carry mismatch.
    pub fn get(&self, name: &str) -> CycleResult<&'a Entity> {
        self.entities
            .iter()
            .copied()
            .find(|e| e.name() == name)
            .ok_or_else(|| CycleError::carry_mismatch("", name))
    }

    /// Return `true` when `name` is visible to the stage.
    pub fn contains(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e.name() == name)
    }

    /// Carried entities in painter order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Number of carried entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Return `true` when nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// A stage defined by a closure.
pub struct FnStage<F> {
    name: String,
    requires: Vec<String>,
    build: F,
}

impl<F> FnStage<F>
where
    F: Fn(&Carried<'_>) -> CycleResult<StagePlan>,
{
    /// Stage named `name` requiring nothing.
    pub fn new(name: impl Into<String>, build: F) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            build,
        }
    }

    /// Declare required carried names.
    pub fn with_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = names.into_iter().map(Into::into).collect();
        self
    }

    /// Box as a trait object.
    pub fn boxed(self) -> Box<dyn Stage>
    where
        F: 'static,
    {
        Box::new(self)
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(&Carried<'_>) -> CycleResult<StagePlan>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> &[String] {
        &self.requires
    }

    fn build(&self, carried: &Carried<'_>) -> CycleResult<StagePlan> {
        (self.build)(carried)
    }
}

impl<F> std::fmt::Debug for FnStage<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/mod.rs"]
mod tests;
