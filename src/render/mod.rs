//! Drawing backends and the glyph rasterizer.
//!
//! A [`DrawingBackend`] plays the role of a 2D canvas context: it hands out
//! blank surfaces and draws text onto them. [`ResvgBackend`] is the default
//! implementation, shaping text with the fonts loaded into a `fontdb`
//! database and rasterizing it with resvg.
//!
//! The [`GlyphRasterizer`] sits on top of a backend and implements the
//! favicon drawing sequence: allocate, fill background, draw centered text.

pub mod rasterizer;
pub mod svg;

pub use rasterizer::GlyphRasterizer;

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::Pixmap;
use resvg::usvg::fontdb;

use crate::color::to_hex;
use crate::config::GeneratorConfig;
use crate::error::TextRenderError;
use crate::surface::SizePx;
use crate::vector::build_glyph_svg;

// ============================================================================
// DrawingBackend
// ============================================================================

/// A provider of 2D drawing surfaces.
///
/// Implementations must be shareable across threads so a single generator
/// can serve concurrent requests.
pub trait DrawingBackend: Send + Sync {
    /// Allocates a fully transparent surface of the given size.
    ///
    /// Returns `None` when no drawing context is available.
    fn create_surface(&self, size: SizePx) -> Option<RgbaImage>;

    /// Draws `text` in bold sans-serif at the favicon font size, centered on
    /// the surface, composited over the existing pixels.
    fn fill_text(
        &self,
        surface: &mut RgbaImage,
        text: &str,
        color: Rgba<u8>,
    ) -> Result<(), TextRenderError>;
}

// ============================================================================
// ResvgBackend
// ============================================================================

/// Drawing backend built on tiny-skia surfaces and resvg text rendering.
#[derive(Clone)]
pub struct ResvgBackend {
    fontdb: Arc<fontdb::Database>,
}

impl ResvgBackend {
    /// Creates a backend that shapes text with the given font database.
    pub fn new(fontdb: Arc<fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Creates a backend with fonts loaded according to `config`.
    ///
    /// Font files that fail to load are skipped with a warning.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut db = fontdb::Database::new();

        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for path in &config.font_files {
            if let Err(e) = db.load_font_file(path) {
                log::warn!("failed to load font {}: {}", path.display(), e);
            }
        }

        ensure_sans_serif(&mut db);
        log::debug!("font database ready with {} faces", db.len());
        Self::new(Arc::new(db))
    }

    /// Returns the font database used for text shaping.
    pub fn fontdb(&self) -> &Arc<fontdb::Database> {
        &self.fontdb
    }
}

/// Points the generic `sans-serif` family at an installed face when the
/// default mapping names a font that is not loaded.
fn ensure_sans_serif(db: &mut fontdb::Database) {
    let current = db.family_name(&fontdb::Family::SansSerif).to_string();
    let mut names: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    if names.contains(&current) {
        return;
    }
    names.sort();
    names.dedup();

    if let Some(fallback) = pick_sans_serif(&names) {
        log::debug!("sans-serif family {current:?} not installed, using {fallback:?}");
        db.set_sans_serif_family(fallback.clone());
    }
}

/// Family name fragments that mark faces unfit for a text glyph.
const SPECIAL_PURPOSE_FAMILIES: [&str; 4] = ["Mono", "Symbol", "Emoji", "Math"];

/// Picks a plain sans family from `names`, or the first text family.
fn pick_sans_serif(names: &[String]) -> Option<&String> {
    let is_plain = |name: &&String| !SPECIAL_PURPOSE_FAMILIES.iter().any(|s| name.contains(s));

    names
        .iter()
        .filter(is_plain)
        .find(|name| name.contains("Sans"))
        .or_else(|| names.iter().find(is_plain))
        .or_else(|| names.first())
}

impl Default for ResvgBackend {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl DrawingBackend for ResvgBackend {
    fn create_surface(&self, size: SizePx) -> Option<RgbaImage> {
        let pixmap = Pixmap::new(size.width, size.height)?;
        Some(svg::pixmap_to_rgba_image(&pixmap))
    }

    fn fill_text(
        &self,
        surface: &mut RgbaImage,
        text: &str,
        color: Rgba<u8>,
    ) -> Result<(), TextRenderError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let opacity = color[3] as f32 / 255.0;
        let document = build_glyph_svg(text, &to_hex(color), opacity);
        let tree = svg::parse_svg(&document, &self.fontdb)?;
        if !svg::has_content(&tree) {
            return Err(TextRenderError(format!(
                "no font face available for {text:?} among {} loaded faces",
                self.fontdb.len()
            )));
        }

        let glyph = svg::render_tree(&tree, surface.width(), surface.height())?;

        svg::composite_over(surface, &glyph, 0, 0);
        Ok(())
    }
}
