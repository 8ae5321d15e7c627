//! cyclecast renders staged explainer videos; the bundled presentation walks through the 8086
//! `MUL` execution cycle.
//!
//! A presentation is a list of [`Stage`]s. The [`StagePlayer`] runs them in order against an
//! [`Engine`], owning the scene and enforcing the explicit hand-off of carried entities between
//! stages:
//!
//! - Build the stages ([`lesson::mul_lesson`] or your own [`Stage`] implementations)
//! - Record them into a [`Timeline`] with a [`TimelineEngine`]
//! - Render frames with [`render_range`] into a [`FrameSink`] (MP4 via `ffmpeg`, PNG stills, or
//!   memory)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
/// Frame sinks.
pub mod encode;
/// Engine trait and the built-in engines.
pub mod engine;
/// The 8086 `MUL` lesson.
pub mod lesson;
/// CPU rendering.
pub mod render;
pub(crate) mod scene;
/// Stages and the stage player.
pub mod stage;
/// Recorded timelines.
pub mod timeline;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Color, Fps, FrameIndex, FrameRange, Point, Rect, Vec2,
};
pub use crate::foundation::error::{CycleError, CycleResult, FailureKind};

pub use crate::animation::ease::Ease;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::{PngSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::log::{CallLog, EngineCall};
pub use crate::engine::timeline::{TimelineEngine, TimelineOpts};
pub use crate::engine::{Engine, PlayBeat, PlayCue};
pub use crate::lesson::Scene;
pub use crate::lesson::config::{Detail, LessonConfig, SourceRegister};
pub use crate::render::FrameRGBA;
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::pipeline::{RenderStats, RenderThreading, render_frame, render_range};
pub use crate::render::text::FontBook;
pub use crate::scene::entity::{Entity, EntityDesc, EntityId, Shape, Style, TextAlign};
pub use crate::scene::state::SceneState;
pub use crate::scene::transition::Transition;
pub use crate::stage::player::{RunReport, StagePlayer, StageReport};
pub use crate::stage::{Beat, Carried, Cue, FnStage, Stage, StagePlan};
pub use crate::timeline::eval::{EvaluatedFrame, Evaluator};
pub use crate::timeline::model::Timeline;
