//! Rendering/animation engine seam.
//!
//! The [`StagePlayer`](crate::StagePlayer) drives presentation content exclusively through the
//! [`Engine`] trait. Two implementations ship with the crate:
//!
//! - [`CallLog`]: records every call, used for determinism checks and plan dumps.
//! - [`TimelineEngine`]: records a time-stamped [`Timeline`](crate::Timeline) that the CPU
//!   renderer turns into frames.

use crate::animation::ease::Ease;
use crate::foundation::error::CycleResult;
use crate::scene::entity::{Entity, EntityDesc, EntityId};
use crate::scene::transition::Transition;

/// Call recorder.
pub mod log;
/// Timeline recorder.
pub mod timeline;

/// One transition applied to one created entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayCue {
    /// Target entity.
    pub entity: EntityId,
    /// What happens to it.
    pub transition: Transition,
}

/// A set of cues played together over one duration.
///
/// A beat with no cues is a hold (the clock advances, nothing changes).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayBeat {
    /// Cues running concurrently.
    pub cues: Vec<PlayCue>,
    /// Duration in seconds.
    pub duration_s: f64,
    /// Easing applied to every cue in the beat.
    pub ease: Ease,
}

/// Contract between presentation stages and whatever draws them.
///
/// `play` returns once the beat has been fully scheduled; engines that render in real time would
/// block until playback completes.
pub trait Engine {
    /// Materialize a descriptor as a new, not yet visible entity.
    fn create(&mut self, name: &str, desc: &EntityDesc) -> CycleResult<Entity>;
    /// Make an entity visible instantly.
    fn add(&mut self, entity: &Entity) -> CycleResult<()>;
    /// Remove an entity from the scene.
    fn remove(&mut self, entity: &Entity) -> CycleResult<()>;
    /// Play a beat.
    fn play(&mut self, beat: &PlayBeat) -> CycleResult<()>;

    /// Called before a stage issues any other call.
    fn begin_stage(&mut self, _name: &str) -> CycleResult<()> {
        Ok(())
    }

    /// Called once after the last stage completed.
    fn finish(&mut self) -> CycleResult<()> {
        Ok(())
    }
}

/// Sequential id source shared by the built-in engines.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn next_id(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}
