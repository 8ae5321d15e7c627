//! Frame sinks.
//!
//! Sinks consume rendered frames in timeline order; see [`render_range`](crate::render_range).

/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// Numbered PNG stills.
pub mod png;
/// Sink trait and the in-memory sink.
pub mod sink;
