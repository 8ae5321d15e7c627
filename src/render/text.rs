use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{CycleError, CycleResult};

/// Font faces used to draw labels.
///
/// Faces are discovered once through the system font database and shared by every renderer.
/// A book without faces is valid: labels then draw nothing.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    regular: Option<FaceBytes>,
    bold: Option<FaceBytes>,
}

#[derive(Clone, Debug)]
struct FaceBytes {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl FontBook {
    /// Book with no faces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sans-serif faces from the system font database.
    pub fn system() -> Self {
        Self::with_dirs(&[])
    }

    /// System faces plus any `.ttf`/`.otf`/`.ttc` files found directly in `dirs`.
    pub fn with_dirs(dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }

        let regular = query_face(&db, usvg::fontdb::Weight::NORMAL);
        let bold = query_face(&db, usvg::fontdb::Weight::BOLD).or_else(|| regular.clone());
        tracing::debug!(
            faces = db.len(),
            regular = regular.is_some(),
            "font database loaded"
        );
        Self { regular, bold }
    }

    /// Return `true` when labels can be drawn.
    pub fn has_faces(&self) -> bool {
        self.regular.is_some()
    }

    fn face(&self, bold: bool) -> Option<&FaceBytes> {
        if bold {
            self.bold.as_ref().or(self.regular.as_ref())
        } else {
            self.regular.as_ref()
        }
    }
}

fn query_face(db: &usvg::fontdb::Database, weight: usvg::fontdb::Weight) -> Option<FaceBytes> {
    use usvg::fontdb::{Family, Query, Stretch, Style};

    let families = [
        Family::Name("DejaVu Sans"),
        Family::Name("Liberation Sans"),
        Family::SansSerif,
        Family::Serif,
        Family::Monospace,
    ];
    let id = db.query(&Query {
        families: &families,
        weight,
        stretch: Stretch::Normal,
        style: Style::Normal,
    })?;
    db.with_face_data(id, |data, index| FaceBytes {
        data: Arc::new(data.to_vec()),
        index,
    })
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            let _ = db.load_font_file(&path);
        }
    }
}

/// One shaped line of text, glyphs positioned from the line's top-left corner.
#[derive(Clone, Debug)]
pub(crate) struct ShapedLine {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LineKey {
    text: String,
    size_bits: u32,
    bold: bool,
}

struct LoadedFace {
    family: String,
    font: vello_cpu::peniko::FontData,
}

/// Per-renderer text shaping state (Parley contexts plus a line cache).
pub(crate) struct TextShaper {
    book: FontBook,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: [Option<LoadedFace>; 2],
    lines: HashMap<LineKey, Arc<ShapedLine>>,
}

impl TextShaper {
    pub(crate) fn new(book: FontBook) -> Self {
        Self {
            book,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: [None, None],
            lines: HashMap::new(),
        }
    }

    /// Font to paint glyphs of a label with, `None` when no face is available.
    pub(crate) fn font(&mut self, bold: bool) -> CycleResult<Option<vello_cpu::peniko::FontData>> {
        Ok(self.load_face(bold)?.map(|f| f.font.clone()))
    }

    fn load_face(&mut self, bold: bool) -> CycleResult<Option<&LoadedFace>> {
        let slot = usize::from(bold);
        if self.faces[slot].is_none() {
            let Some(face) = self.book.face(bold).cloned() else {
                return Ok(None);
            };
            let families = self.font_ctx.collection.register_fonts(
                parley::fontique::Blob::from(face.data.as_ref().clone()),
                None,
            );
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                CycleError::evaluation("no font families registered from font bytes")
            })?;
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| CycleError::evaluation("registered font family has no name"))?
                .to_string();
            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
                face.index,
            );
            self.faces[slot] = Some(LoadedFace { family, font });
        }
        Ok(self.faces[slot].as_ref())
    }

    /// Shape a single line, cached by text, size and weight.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        size_px: f32,
        bold: bool,
    ) -> CycleResult<Option<Arc<ShapedLine>>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CycleError::validation("text size_px must be finite and > 0"));
        }
        let key = LineKey {
            text: text.to_string(),
            size_bits: size_px.to_bits(),
            bold,
        };
        if let Some(line) = self.lines.get(&key) {
            return Ok(Some(line.clone()));
        }
        let Some(family) = self.load_face(bold)?.map(|f| f.family.clone()) else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        let shaped = Arc::new(ShapedLine {
            width: layout.width(),
            height: layout.height(),
            glyphs,
        });
        self.lines.insert(key, shaped.clone());
        Ok(Some(shaped))
    }
}
