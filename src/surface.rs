//! Pixel surface types shared by the rasterizer and the exporter.

use image::{Rgba, RgbaImage};

/// Edge length of the square favicon canvas, in pixels.
pub const CANVAS_SIZE: u32 = 32;

/// Font size used for the glyph, in canvas units.
pub const FONT_SIZE: u32 = 20;

/// Font family list used for the glyph, bold weight.
pub const FONT_FAMILY: &str = "Arial, sans-serif";

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The fixed favicon canvas size.
    pub fn canvas() -> Self {
        Self::new(CANVAS_SIZE, CANVAS_SIZE)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns the geometric center of the area.
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// An immutable RGBA grid holding one rasterized glyph.
///
/// A buffer is produced once per request by the
/// [`GlyphRasterizer`](crate::GlyphRasterizer) and consumed by the
/// [`Exporter`](crate::Exporter). There is no way to mutate the pixels after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: RgbaImage,
}

impl PixelBuffer {
    /// Wraps a finished surface.
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Returns the pixel dimensions of the buffer.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.data.get_pixel(x, y)
    }

    /// Returns the four corner pixels in the order top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn corners(&self) -> [Rgba<u8>; 4] {
        let right = self.data.width().saturating_sub(1);
        let bottom = self.data.height().saturating_sub(1);
        [
            self.pixel(0, 0),
            self.pixel(right, 0),
            self.pixel(0, bottom),
            self.pixel(right, bottom),
        ]
    }

    /// Returns the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.data
    }

    /// Consumes the buffer and returns the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }
}
