use crate::animation::ease::Ease;
use crate::foundation::core::Color;
use crate::foundation::error::{CycleError, CycleResult};
use crate::foundation::math::Lerp;

/// One keyed change of a property between two instants.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Segment<T> {
    /// Start time in seconds.
    pub start_s: f64,
    /// End time in seconds (`== start_s` for instantaneous changes).
    pub end_s: f64,
    /// Value at `start_s`.
    pub from: T,
    /// Value at and after `end_s`.
    pub to: T,
    /// Easing between `from` and `to`.
    pub ease: Ease,
}

/// Raw sample of a track: the active segment's endpoints and eased progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample<'a, T> {
    /// Value the active change started from.
    pub from: &'a T,
    /// Value the active change moves to.
    pub to: &'a T,
    /// Eased progress in `[0, 1]`.
    pub progress: f64,
}

/// Piecewise property animation over time.
///
/// Segments are appended in non-decreasing start order. Sampling uses the most recently appended
/// segment that has started; before any segment the initial value applies.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Track<T> {
    initial: T,
    segments: Vec<Segment<T>>,
}

impl<T: Clone> Track<T> {
    /// Track holding `initial` until the first change.
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            segments: Vec::new(),
        }
    }

    /// Value before the first change.
    pub fn initial(&self) -> &T {
        &self.initial
    }

    /// Keyed changes in insertion order.
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// Endpoints and eased progress at `t` seconds.
    pub fn sample_raw(&self, t: f64) -> Sample<'_, T> {
        let Some(seg) = self.segments.iter().rev().find(|s| s.start_s <= t) else {
            return Sample {
                from: &self.initial,
                to: &self.initial,
                progress: 1.0,
            };
        };
        let span = seg.end_s - seg.start_s;
        let progress = if t >= seg.end_s || span <= 0.0 {
            1.0
        } else {
            seg.ease.apply((t - seg.start_s) / span)
        };
        Sample {
            from: &seg.from,
            to: &seg.to,
            progress,
        }
    }

    /// Value the track settles on at `t` once any active change completes.
    pub fn target_at(&self, t: f64) -> &T {
        self.sample_raw(t).to
    }

    fn check_order(&self, start_s: f64, end_s: f64) -> CycleResult<()> {
        if !start_s.is_finite() || !end_s.is_finite() || end_s < start_s {
            return Err(CycleError::evaluation(format!(
                "invalid track segment [{start_s}, {end_s}]"
            )));
        }
        if let Some(last) = self.segments.last()
            && start_s < last.start_s
        {
            return Err(CycleError::evaluation(
                "track segments must be appended in time order",
            ));
        }
        Ok(())
    }

    /// Append a change with an explicit starting value.
    pub fn push_from(
        &mut self,
        start_s: f64,
        end_s: f64,
        from: T,
        to: T,
        ease: Ease,
    ) -> CycleResult<()> {
        self.check_order(start_s, end_s)?;
        self.segments.push(Segment {
            start_s,
            end_s,
            from,
            to,
            ease,
        });
        Ok(())
    }
}

impl<T: Lerp> Track<T> {
    /// Interpolated value at `t` seconds.
    pub fn sample(&self, t: f64) -> T {
        let s = self.sample_raw(t);
        s.from.lerp_to(s.to, s.progress)
    }

    /// Animate from the current value at `start_s` to `to`.
    pub fn push(&mut self, start_s: f64, end_s: f64, to: T, ease: Ease) -> CycleResult<()> {
        let from = self.sample(start_s);
        self.push_from(start_s, end_s, from, to, ease)
    }

    /// Jump to `value` at `at_s`.
    pub fn set(&mut self, at_s: f64, value: T) -> CycleResult<()> {
        self.push_from(at_s, at_s, value.clone(), value, Ease::Linear)
    }
}

/// Outline drawn around an entity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Highlight {
    /// Outline color.
    pub color: Color,
    /// Outline width in pixels (0 = none).
    pub width: f64,
}

impl Lerp for Highlight {
    fn lerp_to(&self, to: &Self, t: f64) -> Self {
        Self {
            color: self.color.lerp_to(&to.color, t),
            width: self.width.lerp_to(&to.width, t),
        }
    }
}

/// Displayed text of a label and its color.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextValue {
    /// Text.
    pub text: String,
    /// Text color.
    pub color: Color,
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/track.rs"]
mod tests;
