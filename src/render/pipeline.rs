use std::collections::HashMap;

use rayon::prelude::*;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Color, FrameIndex, FrameRange};
use crate::foundation::error::{CycleError, CycleResult};
use crate::foundation::math::Fnv1a64;
use crate::render::FrameRGBA;
use crate::render::cpu::CpuRenderer;
use crate::render::text::FontBook;
use crate::timeline::eval::{EvaluatedFrame, Evaluator};
use crate::timeline::model::Timeline;

/// Evaluate and render a single frame.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
pub fn render_frame(
    timeline: &Timeline,
    frame: FrameIndex,
    renderer: &mut CpuRenderer,
) -> CycleResult<FrameRGBA> {
    timeline.validate()?;
    let eval = Evaluator::eval_frame(timeline, frame)?;
    renderer.render(&eval)
}

/// How [`render_range`] spreads work across threads.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render chunks on a `rayon` pool.
    pub parallel: bool,
    /// Frames evaluated and rendered per chunk.
    pub chunk_size: usize,
    /// Worker count (`None` = rayon default).
    pub threads: Option<usize>,
    /// Render visually identical frames once and push the same pixels again.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: true,
        }
    }
}

/// Frame counts of one [`render_range`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused from an identical earlier frame.
    pub frames_elided: u64,
}

impl RenderStats {
    fn add(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render `range` of `timeline` and push every frame to `sink` in order.
///
/// The sink sees exactly one `begin`, the frames in increasing index order, and one `end`.
#[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0, parallel = threading.parallel))]
pub fn render_range(
    timeline: &Timeline,
    range: FrameRange,
    threading: &RenderThreading,
    fonts: &FontBook,
    sink: &mut dyn FrameSink,
) -> CycleResult<RenderStats> {
    timeline.validate()?;
    if range.is_empty() {
        return Err(CycleError::validation("render range must be non-empty"));
    }
    let total = timeline.duration_frames();
    if range.end.0 > total {
        return Err(CycleError::validation(format!(
            "render range end {} exceeds timeline length {total} frames",
            range.end.0
        )));
    }

    sink.begin(SinkConfig {
        width: timeline.canvas.width,
        height: timeline.canvas.height,
        fps: timeline.fps,
    })?;

    let stats = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        let chunk_size = normalized_chunk_size(threading.chunk_size);
        let mut stats = RenderStats::default();
        let mut chunk_start = range.start.0;
        while chunk_start < range.end.0 {
            let chunk_end = (chunk_start + chunk_size).min(range.end.0);
            let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
            stats.add(render_chunk_parallel(
                timeline, chunk, threading, fonts, &pool, sink,
            )?);
            tracing::debug!(chunk_start, chunk_end, "chunk rendered");
            chunk_start = chunk_end;
        }
        stats
    } else {
        render_sequential(timeline, range, threading, fonts, sink)?
    };

    sink.end()?;
    tracing::info!(
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "render finished"
    );
    Ok(stats)
}

fn render_sequential(
    timeline: &Timeline,
    range: FrameRange,
    threading: &RenderThreading,
    fonts: &FontBook,
    sink: &mut dyn FrameSink,
) -> CycleResult<RenderStats> {
    let mut renderer = CpuRenderer::new(fonts.clone());
    let mut stats = RenderStats::default();
    let mut previous: Option<(u64, FrameRGBA)> = None;

    for f in range.start.0..range.end.0 {
        let idx = FrameIndex(f);
        let eval = Evaluator::eval_frame(timeline, idx)?;
        let fp = fingerprint_frame(&eval);
        stats.frames_total += 1;

        if threading.static_frame_elision
            && let Some((prev_fp, prev_frame)) = &previous
            && *prev_fp == fp
        {
            sink.push_frame(idx, prev_frame)?;
            stats.frames_elided += 1;
            continue;
        }

        let frame = renderer.render(&eval)?;
        stats.frames_rendered += 1;
        sink.push_frame(idx, &frame)?;
        previous = Some((fp, frame));
    }
    Ok(stats)
}

fn render_chunk_parallel(
    timeline: &Timeline,
    range: FrameRange,
    threading: &RenderThreading,
    fonts: &FontBook,
    pool: &rayon::ThreadPool,
    sink: &mut dyn FrameSink,
) -> CycleResult<RenderStats> {
    let mut evals = Vec::with_capacity(range.len_frames() as usize);
    for f in range.start.0..range.end.0 {
        evals.push(Evaluator::eval_frame(timeline, FrameIndex(f))?);
    }

    let mut unique_indices = Vec::<usize>::with_capacity(evals.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(evals.len());
    if threading.static_frame_elision {
        let mut first = HashMap::<u64, usize>::new();
        for (idx, eval) in evals.iter().enumerate() {
            let fp = fingerprint_frame(eval);
            let slot = *first.entry(fp).or_insert_with(|| {
                unique_indices.push(idx);
                unique_indices.len() - 1
            });
            frame_to_unique.push(slot);
        }
    } else {
        unique_indices.extend(0..evals.len());
        frame_to_unique.extend(0..evals.len());
    }

    let rendered = pool.install(|| {
        unique_indices
            .par_iter()
            .map_init(
                || CpuRenderer::new(fonts.clone()),
                |renderer, eval_idx| renderer.render(&evals[*eval_idx]),
            )
            .collect::<Vec<_>>()
    });
    let frames = rendered.into_iter().collect::<CycleResult<Vec<FrameRGBA>>>()?;

    for (offset, slot) in frame_to_unique.iter().enumerate() {
        sink.push_frame(FrameIndex(range.start.0 + offset as u64), &frames[*slot])?;
    }

    let total = evals.len() as u64;
    let rendered_count = frames.len() as u64;
    Ok(RenderStats {
        frames_total: total,
        frames_rendered: rendered_count,
        frames_elided: total.saturating_sub(rendered_count),
    })
}

/// Hash of everything that affects the pixels of `frame` (its time excluded).
pub(crate) fn fingerprint_frame(frame: &EvaluatedFrame<'_>) -> u64 {
    fn write_color(h: &mut Fnv1a64, c: Color) {
        h.write_bytes(&[c.r, c.g, c.b, c.a]);
    }
    fn write_str(h: &mut Fnv1a64, s: &str) {
        h.write_u64(s.len() as u64);
        h.write_bytes(s.as_bytes());
    }

    let mut h = Fnv1a64::new_default();
    h.write_u64(u64::from(frame.canvas.width));
    h.write_u64(u64::from(frame.canvas.height));
    write_color(&mut h, frame.background);
    h.write_u64(frame.nodes.len() as u64);
    for node in &frame.nodes {
        h.write_u64(node.id.0);
        h.write_f64(node.opacity);
        h.write_f64(node.reveal);
        for c in node.transform.as_coeffs() {
            h.write_f64(c);
        }
        write_color(&mut h, node.highlight.color);
        h.write_f64(node.highlight.width);
        h.write_u64(node.texts.len() as u64);
        for text in &node.texts {
            write_str(&mut h, text.part);
            write_str(&mut h, &text.from.text);
            write_color(&mut h, text.from.color);
            write_str(&mut h, &text.to.text);
            write_color(&mut h, text.to.color);
            h.write_f64(text.progress);
        }
    }
    h.finish()
}

/// Thread pool for parallel rendering.
pub fn build_thread_pool(threads: Option<usize>) -> CycleResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CycleError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CycleError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
