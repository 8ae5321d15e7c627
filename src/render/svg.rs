use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::Affine;
use crate::foundation::error::{CycleError, CycleResult};
use crate::foundation::math::Fnv1a64;

const MAX_DIM: u32 = 8_192;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct RasterKey {
    markup: u64,
    width: u32,
    height: u32,
}

/// A rasterized SVG ready to paint, with the transform that maps its pixels onto the canvas.
#[derive(Clone)]
pub(crate) struct SvgPaint {
    pub(crate) image: vello_cpu::Image,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) transform: Affine,
}

/// Parsed SVG trees and rasters, keyed by markup and pixel size.
#[derive(Default)]
pub(crate) struct SvgCache {
    trees: HashMap<u64, Arc<usvg::Tree>>,
    rasters: HashMap<RasterKey, vello_cpu::Image>,
}

impl SvgCache {
    /// Paint `markup` into a `draw_w × draw_h` box whose top-left corner `transform` maps to the
    /// canvas.
    ///
    /// The raster resolution follows the scale in `transform` so enlarged art stays sharp.
    pub(crate) fn paint(
        &mut self,
        markup: &str,
        draw_w: f64,
        draw_h: f64,
        transform: Affine,
    ) -> CycleResult<SvgPaint> {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(markup.as_bytes());
        let markup_key = h.finish();

        let tree = match self.trees.get(&markup_key) {
            Some(t) => t.clone(),
            None => {
                let tree = usvg::Tree::from_str(markup, &usvg::Options::default())
                    .map_err(|e| CycleError::evaluation(format!("parse svg: {e}")))?;
                let tree = Arc::new(tree);
                self.trees.insert(markup_key, tree.clone());
                tree
            }
        };

        let [a, b, c, d, _e, _f] = transform.as_coeffs();
        let sx = (a * a + b * b).sqrt().max(1e-6);
        let sy = (c * c + d * d).sqrt().max(1e-6);
        // Tolerate float noise so an unscaled draw box rasterizes at its exact size.
        let width = (draw_w * sx - 1e-6).ceil().max(1.0) as u32;
        let height = (draw_h * sy - 1e-6).ceil().max(1.0) as u32;
        if width > MAX_DIM || height > MAX_DIM {
            return Err(CycleError::evaluation(format!(
                "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }

        let key = RasterKey {
            markup: markup_key,
            width,
            height,
        };
        let image = match self.rasters.get(&key) {
            Some(img) => img.clone(),
            None => {
                let img = rasterize(&tree, width, height)?;
                self.rasters.insert(key, img.clone());
                img
            }
        };

        let to_draw_box = Affine::scale_non_uniform(
            draw_w / f64::from(width),
            draw_h / f64::from(height),
        );
        Ok(SvgPaint {
            image,
            width: f64::from(width),
            height: f64::from(height),
            transform: transform * to_draw_box,
        })
    }
}

fn rasterize(tree: &usvg::Tree, width: u32, height: u32) -> CycleResult<vello_cpu::Image> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CycleError::evaluation("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    crate::render::cpu::premul_bytes_to_image(pixmap.data(), width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
