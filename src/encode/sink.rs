use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CycleError, CycleResult};
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
}

/// Consumer of rendered frames.
///
/// `push_frame` is called in strictly increasing [`FrameIndex`] order between one `begin` and one
/// `end`.
pub trait FrameSink: Send {
    /// Called once before any frame is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CycleResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CycleResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> CycleResult<()>;
}

/// Tracks the last pushed index and rejects anything not strictly after it.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FrameOrder {
    last: Option<FrameIndex>,
}

impl FrameOrder {
    pub(crate) fn reset(&mut self) {
        self.last = None;
    }

    pub(crate) fn advance(&mut self, idx: FrameIndex) -> CycleResult<()> {
        if let Some(last) = self.last
            && idx.0 <= last.0
        {
            return Err(CycleError::evaluation(format!(
                "sink received out-of-order frame {} after {}",
                idx.0, last.0
            )));
        }
        self.last = Some(idx);
        Ok(())
    }
}

/// Sink collecting frames in memory, for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration received in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Return `true` once `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CycleResult<()> {
        self.cfg = Some(cfg);
        self.order.reset();
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CycleResult<()> {
        if self.cfg.is_none() {
            return Err(CycleError::evaluation("in-memory sink not started"));
        }
        self.order.advance(idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CycleResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
