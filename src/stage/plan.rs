use std::collections::{BTreeMap, BTreeSet};

use crate::animation::ease::Ease;
use crate::foundation::error::{CycleError, CycleResult};
use crate::scene::entity::EntityDesc;
use crate::scene::transition::Transition;
use crate::stage::Carried;

/// Default fade-out length when a stage disposes of its entities.
pub const DEFAULT_EXIT_S: f64 = 0.8;

/// A transition addressed to an entity by name.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Cue {
    /// Target entity name (new in this stage, or required from an earlier one).
    pub target: String,
    /// What happens to it.
    pub transition: Transition,
}

/// Cues played together over one duration.
///
/// Entities listed in `shows` appear instantly when the beat starts, before its cues run, so a
/// beat may show a marker and move it in one step.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Beat {
    /// Entities made visible without a transition at the start of the beat.
    pub shows: Vec<String>,
    /// Concurrent cues.
    pub cues: Vec<Cue>,
    /// Duration in seconds.
    pub duration_s: f64,
    /// Easing for every cue.
    pub ease: Ease,
}

impl Beat {
    /// Empty beat lasting `duration_s`.
    pub fn new(duration_s: f64) -> Self {
        Self {
            shows: Vec::new(),
            cues: Vec::new(),
            duration_s,
            ease: Ease::default(),
        }
    }

    /// A pause: nothing changes while the clock advances.
    pub fn hold(duration_s: f64) -> Self {
        Self::new(duration_s)
    }

    /// Show an entity instantly when the beat starts.
    pub fn show(mut self, target: impl Into<String>) -> Self {
        self.shows.push(target.into());
        self
    }

    /// Add one cue.
    pub fn cue(mut self, target: impl Into<String>, transition: Transition) -> Self {
        self.cues.push(Cue {
            target: target.into(),
            transition,
        });
        self
    }

    /// Apply the same transition to several targets.
    pub fn cue_all<I, S>(mut self, targets: I, transition: Transition) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for t in targets {
            self.cues.push(Cue {
                target: t.into(),
                transition: transition.clone(),
            });
        }
        self
    }

    /// Override the easing.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Return `true` for a beat without cues or shows.
    pub fn is_hold(&self) -> bool {
        self.cues.is_empty() && self.shows.is_empty()
    }
}

/// Everything a stage declares: entities, scripts and hand-offs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StagePlan {
    entities: Vec<(String, EntityDesc)>,
    enter: Vec<Beat>,
    explain: Vec<Beat>,
    exit_s: f64,
    carry: Vec<String>,
}

impl Default for StagePlan {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            enter: Vec::new(),
            explain: Vec::new(),
            exit_s: DEFAULT_EXIT_S,
            carry: Vec::new(),
        }
    }
}

impl StagePlan {
    /// Empty plan with the default exit fade.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new entity; creation follows declaration order.
    pub fn entity(&mut self, name: impl Into<String>, desc: EntityDesc) -> &mut Self {
        self.entities.push((name.into(), desc));
        self
    }

    /// Append an enter beat (reveals of new entities only).
    pub fn enter(&mut self, beat: Beat) -> &mut Self {
        self.enter.push(beat);
        self
    }

    /// Append an explain beat.
    pub fn explain(&mut self, beat: Beat) -> &mut Self {
        self.explain.push(beat);
        self
    }

    /// Show entities instantly, without advancing the clock.
    pub fn show<I, S>(&mut self, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let beat = targets.into_iter().fold(Beat::new(0.0), |beat, t| beat.show(t));
        self.explain(beat)
    }

    /// Append a pause to the explain script.
    pub fn hold(&mut self, duration_s: f64) -> &mut Self {
        self.explain(Beat::hold(duration_s))
    }

    /// Set the length of the exit fade.
    pub fn exit_duration(&mut self, duration_s: f64) -> &mut Self {
        self.exit_s = duration_s;
        self
    }

    /// Hand an entity off to later stages.
    pub fn carry(&mut self, name: impl Into<String>) -> &mut Self {
        self.carry.push(name.into());
        self
    }

    /// New entities in declaration order.
    pub fn entities(&self) -> &[(String, EntityDesc)] {
        &self.entities
    }

    /// Enter script.
    pub fn enter_beats(&self) -> &[Beat] {
        &self.enter
    }

    /// Explain script.
    pub fn explain_beats(&self) -> &[Beat] {
        &self.explain
    }

    /// Exit fade length in seconds.
    pub fn exit_s(&self) -> f64 {
        self.exit_s
    }

    /// Names handed off to later stages.
    pub fn carried(&self) -> &[String] {
        &self.carry
    }

    /// Seconds covered by enter and explain beats plus the exit fade.
    pub fn scripted_duration_s(&self) -> f64 {
        self.enter
            .iter()
            .chain(&self.explain)
            .map(|b| b.duration_s)
            .sum::<f64>()
            + self.exit_s
    }

    /// Check the plan against the entities it can see.
    ///
    /// `live` holds every name currently in the scene (required or not); new names must not collide
    /// with them. Returns the names visible once the explain script has finished.
    pub fn validate(
        &self,
        stage: &str,
        carried: &Carried<'_>,
        live: &[&str],
    ) -> CycleResult<BTreeSet<String>> {
        let fail = |msg: String| CycleError::build_failure(stage, msg);

        let mut descs: BTreeMap<&str, &EntityDesc> = BTreeMap::new();
        for e in carried.iter() {
            descs.insert(e.name(), e.desc());
        }
        let mut new_names: BTreeSet<&str> = BTreeSet::new();
        for (name, desc) in &self.entities {
            let name = name.as_str();
            if name.trim().is_empty() {
                return Err(fail("entity names must be non-empty".to_string()));
            }
            if live.contains(&name) || !new_names.insert(name) {
                return Err(fail(format!("entity name '{name}' is already in use")));
            }
            desc.validate()
                .map_err(|e| fail(format!("entity '{name}': {e}")))?;
            descs.insert(name, desc);
        }

        for b in self.enter.iter().chain(&self.explain) {
            if !b.duration_s.is_finite() || b.duration_s < 0.0 {
                return Err(fail(format!(
                    "beat duration must be finite and >= 0 (got {})",
                    b.duration_s
                )));
            }
        }
        if !self.exit_s.is_finite() || self.exit_s < 0.0 {
            return Err(fail("exit duration must be finite and >= 0".to_string()));
        }

        let mut visible: BTreeSet<&str> = carried.iter().map(|e| e.name()).collect();
        let mut revealed: BTreeSet<&str> = BTreeSet::new();

        for beat in &self.enter {
            for name in &beat.shows {
                let name = name.as_str();
                if !new_names.contains(name) {
                    return Err(fail(format!(
                        "enter beat shows '{name}', which is not a new entity of this stage"
                    )));
                }
                reveal(name, &mut visible, &mut revealed).map_err(fail)?;
            }
            for cue in &beat.cues {
                let name = cue.target.as_str();
                if !new_names.contains(name) {
                    return Err(fail(format!(
                        "enter beat targets '{name}', which is not a new entity of this stage"
                    )));
                }
                if !cue.transition.is_reveal() {
                    return Err(fail(format!(
                        "enter beat applies '{}' to '{name}'; only reveals may enter",
                        cue.transition.label()
                    )));
                }
                reveal(name, &mut visible, &mut revealed).map_err(fail)?;
            }
        }

        for beat in &self.explain {
            for name in &beat.shows {
                let name = name.as_str();
                if !descs.contains_key(name) {
                    return Err(fail(format!("show targets unknown entity '{name}'")));
                }
                if new_names.contains(name) {
                    reveal(name, &mut visible, &mut revealed).map_err(fail)?;
                } else if !visible.insert(name) {
                    return Err(fail(format!("'{name}' is already visible")));
                }
            }
            for cue in &beat.cues {
                let name = cue.target.as_str();
                let Some(desc) = descs.get(name) else {
                    return Err(fail(format!("cue targets unknown entity '{name}'")));
                };
                let t = &cue.transition;
                if t.is_reveal() {
                    if new_names.contains(name) {
                        reveal(name, &mut visible, &mut revealed).map_err(fail)?;
                    } else if !visible.insert(name) {
                        return Err(fail(format!("'{name}' is already visible")));
                    }
                    continue;
                }
                if !visible.contains(name) {
                    return Err(fail(format!(
                        "'{}' targets '{name}' while it is not visible",
                        t.label()
                    )));
                }
                if let Transition::SetText { part, .. } = t
                    && !desc.has_text_target(part.as_deref())
                {
                    return Err(fail(format!(
                        "'{name}' has no label addressed by part {part:?}"
                    )));
                }
                if t.is_hide() {
                    visible.remove(name);
                }
            }
        }

        if let Some(never) = new_names.iter().find(|n| !revealed.contains(*n)) {
            return Err(fail(format!("entity '{never}' is never revealed")));
        }

        let mut carry_seen = BTreeSet::new();
        for name in &self.carry {
            if !descs.contains_key(name.as_str()) {
                return Err(CycleError::carry_mismatch(stage, name));
            }
            if !carry_seen.insert(name.as_str()) {
                return Err(fail(format!("'{name}' is carried twice")));
            }
            if !visible.contains(name.as_str()) {
                return Err(fail(format!("carried entity '{name}' is not visible at exit")));
            }
        }

        Ok(visible.into_iter().map(str::to_string).collect())
    }
}

fn reveal<'a>(
    name: &'a str,
    visible: &mut BTreeSet<&'a str>,
    revealed: &mut BTreeSet<&'a str>,
) -> Result<(), String> {
    if !revealed.insert(name) {
        return Err(format!("entity '{name}' is revealed more than once"));
    }
    visible.insert(name);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/stage/plan.rs"]
mod tests;
