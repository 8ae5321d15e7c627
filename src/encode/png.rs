use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::{ensure_parent_dir, flatten_premul_over_bg};
use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::{Color, FrameIndex};
use crate::foundation::error::{CycleError, CycleResult};
use crate::render::FrameRGBA;

/// Writes each frame as `<dir>/<prefix><frame:06>.png`, flattened over an opaque background.
#[derive(Debug)]
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    background: Color,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    written: Vec<PathBuf>,
}

impl PngSink {
    /// Sink writing into `dir` with the `frame_` prefix.
    pub fn new(dir: impl Into<PathBuf>, background: Color) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_string(),
            background,
            cfg: None,
            order: FrameOrder::default(),
            written: Vec::new(),
        }
    }

    /// Replace the file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Files written so far, in push order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{:06}.png", self.prefix, idx.0))
    }
}

impl FrameSink for PngSink {
    fn begin(&mut self, cfg: SinkConfig) -> CycleResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CycleError::evaluation(format!(
                "failed to create png directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.cfg = Some(cfg);
        self.order.reset();
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CycleResult<()> {
        if self.cfg.is_none() {
            return Err(CycleError::evaluation("png sink not started"));
        }
        self.order.advance(idx)?;
        let path = self.path_for(idx);
        write_png(&path, frame, self.background)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> CycleResult<()> {
        tracing::info!(
            dir = %self.dir.display(),
            frames = self.written.len(),
            "png frames written"
        );
        self.cfg = None;
        Ok(())
    }
}

/// Write one frame to `path` as an opaque PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA, background: Color) -> CycleResult<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(CycleError::validation(format!(
            "frame has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }
    let opaque = if frame.premultiplied {
        let mut out = vec![0u8; expected];
        flatten_premul_over_bg(&mut out, &frame.data, background)?;
        out
    } else {
        frame.data.clone()
    };
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| CycleError::evaluation(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
