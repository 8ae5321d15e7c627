use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::{Entity, EntityId};

/// The set of live entities, in creation (painter) order, keyed by name.
///
/// Owned by the [`StagePlayer`](crate::StagePlayer) and mutated only while a stage runs. Between
/// stages it holds exactly the carried entities.
#[derive(Clone, Debug, Default)]
pub struct SceneState {
    entities: Vec<Entity>,
}

impl SceneState {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Return `true` when nothing is live.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up a live entity by name.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Return `true` when an entity with this identity is live.
    pub fn contains_id(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id() == id)
    }

    /// Live entities in painter order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Live entity ids in painter order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }

    /// Live entity names in painter order.
    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(Entity::name).collect()
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> CycleResult<()> {
        if self.get(entity.name()).is_some() {
            return Err(CycleError::validation(format!(
                "entity name '{}' is already live",
                entity.name()
            )));
        }
        if self.contains_id(entity.id()) {
            return Err(CycleError::validation(format!(
                "entity id {} is already live",
                entity.id().0
            )));
        }
        self.entities.push(entity);
        Ok(())
    }

    pub(crate) fn take(&mut self, name: &str) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.name() == name)?;
        Some(self.entities.remove(idx))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
