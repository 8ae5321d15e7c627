//! Recorded timelines and per-frame evaluation.

/// Frame sampling.
pub mod eval;
/// Timeline and entity records.
pub mod model;
/// Piecewise property tracks.
pub mod track;
