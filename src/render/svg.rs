//! SVG rasterization utilities using resvg/usvg.
//!
//! The resvg backend draws glyphs by rendering a one-element SVG document
//! and compositing it onto the surface. This module holds the parsing,
//! pixmap conversion and compositing helpers for that.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};

use crate::error::TextRenderError;

// ============================================================================
// SVG Rendering
// ============================================================================

/// Parses an SVG document, shaping any text with `fontdb`.
///
/// Text that no loaded face can shape is dropped from the returned tree.
pub fn parse_svg(svg_data: &str, fontdb: &Arc<fontdb::Database>) -> Result<Tree, TextRenderError> {
    let opts = Options {
        fontdb: Arc::clone(fontdb),
        ..Options::default()
    };
    Tree::from_str(svg_data, &opts).map_err(|e| TextRenderError(e.to_string()))
}

/// Returns true if the tree holds anything to draw.
pub fn has_content(tree: &Tree) -> bool {
    !tree.root().children().is_empty()
}

/// Renders a parsed tree to an RGBA image of exactly `width x height`.
///
/// The document is drawn at its own coordinate scale, so a document whose
/// viewbox matches the target size maps one unit to one pixel.
pub fn render_tree(tree: &Tree, width: u32, height: u32) -> Result<RgbaImage, TextRenderError> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| TextRenderError(format!("cannot allocate {width}x{height} pixmap")))?;

    let svg_size = tree.size();
    let scale_x = width as f32 / svg_size.width();
    let scale_y = height as f32 / svg_size.height();
    resvg::render(tree, Transform::from_scale(scale_x, scale_y), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();

    // tiny_skia stores premultiplied RGBA in row-major order
    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let (r, g, b, a) = unpremultiply(p.red(), p.green(), p.blue(), p.alpha());
            [r, g, b, a]
        })
        .collect();

    RgbaImage::from_raw(width, height, raw).unwrap_or_else(|| RgbaImage::new(width, height))
}

/// Converts a premultiplied sample back to straight alpha.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    let alpha = u32::from(a);
    let channel = |c: u8| match alpha {
        0 => 0,
        255 => c,
        _ => ((u32::from(c) * 255 + alpha / 2) / alpha).min(255) as u8,
    };
    (channel(r), channel(g), channel(b), a)
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination).
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;

        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        // Fully transparent source pixels leave the destination untouched
        if src_pixel[3] == 0 {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Source-over blend of one straight-alpha sample onto another.
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }

    // The favicon surface is filled with an opaque background, so this is the
    // common case and the result stays opaque.
    if dst[3] == 255 {
        let mix = |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * (255 - sa) + 127) / 255) as u8;
        return Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255]);
    }

    let sa = sa as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |s: u8, d: u8| {
        let out = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        out.round().min(255.0) as u8
    };
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" viewBox="0 0 32 32"><rect x="8" y="8" width="16" height="16" fill="#ff0000"/></svg>"##;

    fn empty_fontdb() -> Arc<fontdb::Database> {
        Arc::new(fontdb::Database::new())
    }

    fn render(svg: &str) -> Result<RgbaImage, TextRenderError> {
        let tree = parse_svg(svg, &empty_fontdb())?;
        render_tree(&tree, 32, 32)
    }

    #[test]
    fn render_simple_svg() {
        let img = render(SQUARE_SVG).unwrap();

        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(16, 16).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn render_rejects_malformed_markup() {
        assert!(render("<svg").is_err());
    }

    #[test]
    fn text_without_fonts_leaves_tree_empty() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32"><text x="16" y="16">F</text></svg>"#;
        let tree = parse_svg(svg, &empty_fontdb()).unwrap();
        assert!(!has_content(&tree));

        let square = parse_svg(SQUARE_SVG, &empty_fontdb()).unwrap();
        assert!(has_content(&square));
    }

    #[test]
    fn half_transparent_pixel_unpremultiplies() {
        assert_eq!(unpremultiply(64, 0, 128, 128), (128, 0, 255, 128));
        assert_eq!(unpremultiply(9, 9, 9, 0), (0, 0, 0, 0));
    }

    #[test]
    fn blend_onto_opaque_stays_opaque() {
        let out = alpha_blend(Rgba([255, 255, 255, 128]), Rgba([0, 0, 0, 255]));
        assert_eq!(out.0, [128, 128, 128, 255]);

        let opaque = Rgba([1, 2, 3, 255]);
        assert_eq!(alpha_blend(opaque, Rgba([9, 9, 9, 255])), opaque);
    }

    #[test]
    fn blend_onto_transparent_keeps_source() {
        let out = alpha_blend(Rgba([200, 100, 50, 128]), Rgba([0, 0, 0, 0]));
        assert_eq!(out.0, [200, 100, 50, 128]);
    }

    #[test]
    fn composite_simple() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn composite_with_transparency() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        let pixel = dest.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should have some red");
        assert!(pixel[2] > 0, "Should have some blue");
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn composite_clips_to_destination() {
        let mut dest = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

        composite_over(&mut dest, &src, 2, -2);

        assert_eq!(dest.get_pixel(3, 1).0, [0, 0, 0, 255]);
        assert_eq!(dest.get_pixel(3, 2).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }
}
