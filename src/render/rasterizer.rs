//! Glyph rasterization onto the fixed favicon canvas.

use std::sync::Arc;

use super::{DrawingBackend, ResvgBackend};
use crate::color::resolve_or_fallback;
use crate::config::GeneratorConfig;
use crate::error::RasterizationError;
use crate::input::clamp_text;
use crate::surface::{PixelBuffer, SizePx};

/// Draws up to two characters centered on a solid 32x32 square.
///
/// The rasterizer is stateless apart from its backend and can be shared
/// between threads.
///
/// # Example
///
/// ```
/// use favicon_renderer::{GeneratorConfig, GlyphRasterizer};
///
/// let rasterizer = GlyphRasterizer::from_config(&GeneratorConfig::new().with_system_fonts(false));
/// let buffer = rasterizer.rasterize("F", "#4F46E5", "#FFFFFF").unwrap();
///
/// assert_eq!(buffer.pixel(0, 0).0, [0x4f, 0x46, 0xe5, 255]);
/// ```
#[derive(Clone)]
pub struct GlyphRasterizer {
    backend: Arc<dyn DrawingBackend>,
}

impl GlyphRasterizer {
    /// Creates a rasterizer drawing through `backend`.
    pub fn new(backend: impl DrawingBackend + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    /// Creates a rasterizer from a shared backend.
    pub fn with_backend(backend: Arc<dyn DrawingBackend>) -> Self {
        Self { backend }
    }

    /// Creates a rasterizer using the resvg backend configured by `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(ResvgBackend::from_config(config))
    }

    /// Rasterizes `text` in `foreground_color` over `background_color`.
    ///
    /// Text beyond two characters is ignored. Colors that cannot be resolved
    /// are drawn in opaque black. Text drawing failures are logged and leave
    /// a plain background square.
    ///
    /// # Errors
    ///
    /// Returns [`RasterizationError::SurfaceUnavailable`] if the backend
    /// cannot allocate a surface.
    pub fn rasterize(
        &self,
        text: &str,
        background_color: &str,
        foreground_color: &str,
    ) -> Result<PixelBuffer, RasterizationError> {
        let text = clamp_text(text);

        let mut surface = self
            .backend
            .create_surface(SizePx::canvas())
            .ok_or(RasterizationError::SurfaceUnavailable)?;

        let background = resolve_or_fallback(background_color);
        for pixel in surface.pixels_mut() {
            *pixel = background;
        }

        let foreground = resolve_or_fallback(foreground_color);
        if let Err(e) = self.backend.fill_text(&mut surface, text, foreground) {
            log::warn!("could not draw {text:?}: {e}");
        }

        log::debug!("rasterized {text:?} on {background_color} in {foreground_color}");
        Ok(PixelBuffer::new(surface))
    }
}
