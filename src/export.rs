//! Multi-format export of a rasterized favicon.
//!
//! The [`Exporter`] turns one [`PixelBuffer`] into three artifacts:
//!
//! 1. **Raster**: PNG, encoded from the surface after an optional reload
//!    through a `data:` URL.
//! 2. **Vector**: SVG markup rebuilt from the original text and colors.
//! 3. **Icon**: either the PNG bytes again or a single-frame ICO container,
//!    depending on [`IconMode`].
//!
//! Any failure aborts the whole export. Resources are only registered once
//! every encoder has succeeded, so a failed export leaves nothing behind.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbaImage};

use crate::artifact::{ArtifactKind, EncodedArtifact};
use crate::config::{GeneratorConfig, IconMode};
use crate::error::{ExportError, GenerationError};
use crate::input::{GenerationInput, clamp_text};
use crate::resource::ResourceRegistry;
use crate::result::{ArtifactHandles, GenerationResult};
use crate::surface::{PixelBuffer, SizePx};
use crate::vector::build_svg;

// ============================================================================
// Exporter
// ============================================================================

/// The encoded artifacts of one export, not yet registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifacts {
    pub png: EncodedArtifact,
    pub svg: EncodedArtifact,
    pub ico: EncodedArtifact,
}

/// Encodes rasterized favicons into PNG, SVG and icon artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exporter {
    icon_mode: IconMode,
    reload_through_data_url: bool,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl Exporter {
    /// Creates an exporter with explicit settings.
    pub fn new(icon_mode: IconMode, reload_through_data_url: bool) -> Self {
        Self {
            icon_mode,
            reload_through_data_url,
        }
    }

    /// Creates an exporter from the relevant parts of `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.icon_mode, config.reload_through_data_url)
    }

    /// Returns the icon encoding mode.
    pub fn icon_mode(&self) -> IconMode {
        self.icon_mode
    }

    /// Encodes all three artifacts without registering them.
    ///
    /// The buffer is consumed; the vector artifact is built from `input`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExportError`] raised by any path.
    pub fn encode(
        &self,
        buffer: PixelBuffer,
        input: &GenerationInput,
    ) -> Result<ExportedArtifacts, ExportError> {
        let surface = if self.reload_through_data_url {
            let url = to_data_url(ArtifactKind::Raster, &encode_png(buffer.as_image())?);
            decode_data_url(&url)?
        } else {
            buffer.into_image()
        };

        let png = encode_png(&surface)?;
        let ico = match self.icon_mode {
            IconMode::PngApproximation => png.clone(),
            IconMode::IcoContainer => encode_ico(&surface)?,
        };
        let svg = build_svg(
            clamp_text(&input.text),
            &input.background_color,
            &input.foreground_color,
        );

        log::debug!(
            "encoded png={}B svg={}B ico={}B ({:?})",
            png.len(),
            svg.len(),
            ico.len(),
            self.icon_mode
        );

        Ok(ExportedArtifacts {
            png: EncodedArtifact::new(ArtifactKind::Raster, png),
            svg: EncodedArtifact::new(ArtifactKind::Vector, svg.into_bytes()),
            ico: EncodedArtifact::new(ArtifactKind::Icon, ico),
        })
    }

    /// Encodes all three artifacts and registers them in `registry`.
    ///
    /// Failures are reported through [`GenerationResult::error`]; in that
    /// case nothing is registered.
    pub fn export(
        &self,
        buffer: PixelBuffer,
        input: &GenerationInput,
        registry: &ResourceRegistry,
    ) -> GenerationResult {
        match self.encode(buffer, input) {
            Ok(artifacts) => GenerationResult::succeeded(ArtifactHandles {
                ico: registry.create(artifacts.ico),
                png: registry.create(artifacts.png),
                svg: registry.create(artifacts.svg),
            }),
            Err(e) => {
                log::warn!("export failed: {e}");
                GenerationResult::failed(GenerationError::from(e))
            }
        }
    }
}

// ============================================================================
// Encoders
// ============================================================================

/// Encodes an RGBA surface as PNG.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    encode_with(surface, ImageFormat::Png, ArtifactKind::Raster)
}

/// Encodes an RGBA surface as a single-frame ICO container.
pub fn encode_ico(surface: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    encode_with(surface, ImageFormat::Ico, ArtifactKind::Icon)
}

fn encode_with(
    surface: &RgbaImage,
    format: ImageFormat,
    kind: ArtifactKind,
) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    surface
        .write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|source| ExportError::EncodingFailure { kind, source })?;
    Ok(buffer)
}

// ============================================================================
// Data URLs
// ============================================================================

/// Wraps bytes in a base64 `data:` URL tagged with the artifact's MIME type.
pub fn to_data_url(kind: ArtifactKind, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        kind.mime_type(),
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Decodes a PNG `data:` URL back into a canvas-sized RGBA surface.
///
/// # Errors
///
/// Returns [`ExportError::DecodeFailure`] if the URL is malformed, is not a
/// base64 PNG, or does not decode to a surface of the canvas size.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, ExportError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::DecodeFailure("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::DecodeFailure("data URL has no payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ExportError::DecodeFailure("data URL is not base64".into()))?;
    if mime != ArtifactKind::Raster.mime_type() {
        return Err(ExportError::DecodeFailure(format!("unexpected type {mime}")));
    }

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ExportError::DecodeFailure(format!("invalid base64: {e}")))?;
    let surface = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| ExportError::DecodeFailure(e.to_string()))?
        .to_rgba8();

    let size = SizePx::new(surface.width(), surface.height());
    if size != SizePx::canvas() {
        return Err(ExportError::DecodeFailure(format!(
            "decoded surface is {}x{}",
            size.width, size.height
        )));
    }

    Ok(surface)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const INDIGO: Rgba<u8> = Rgba([0x4f, 0x46, 0xe5, 255]);

    fn indigo_buffer() -> PixelBuffer {
        let mut img = RgbaImage::from_pixel(32, 32, INDIGO);
        img.put_pixel(16, 16, Rgba([255, 255, 255, 255]));
        PixelBuffer::new(img)
    }

    fn input() -> GenerationInput {
        GenerationInput::new("F", "#4F46E5", "#FFFFFF")
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let artifacts = Exporter::default().encode(indigo_buffer(), &input()).unwrap();

        let decoded = image::load_from_memory_with_format(&artifacts.png.bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();

        assert_eq!(decoded, indigo_buffer().into_image());
        assert_eq!(artifacts.png.mime_type(), "image/png");
    }

    #[test]
    fn icon_approximation_reuses_png_bytes() {
        let artifacts = Exporter::default().encode(indigo_buffer(), &input()).unwrap();

        assert_eq!(artifacts.ico.bytes, artifacts.png.bytes);
        assert_eq!(artifacts.ico.mime_type(), "image/x-icon");
    }

    #[test]
    fn ico_container_has_icon_header() {
        let exporter = Exporter::new(IconMode::IcoContainer, true);
        let artifacts = exporter.encode(indigo_buffer(), &input()).unwrap();
        let ico = &artifacts.ico.bytes;

        // ICONDIR: reserved 0, type 1 (icon), one image
        assert_eq!(&ico[..6], &[0, 0, 1, 0, 1, 0]);
        // Directory entry width and height
        assert_eq!((ico[6], ico[7]), (32, 32));

        let decoded = image::load_from_memory_with_format(ico, ImageFormat::Ico)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0), &INDIGO);
    }

    #[test]
    fn export_is_deterministic() {
        let exporter = Exporter::default();
        let first = exporter.encode(indigo_buffer(), &input()).unwrap();
        let second = exporter.encode(indigo_buffer(), &input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reload_does_not_change_output() {
        let with_reload = Exporter::new(IconMode::PngApproximation, true)
            .encode(indigo_buffer(), &input())
            .unwrap();
        let without = Exporter::new(IconMode::PngApproximation, false)
            .encode(indigo_buffer(), &input())
            .unwrap();
        assert_eq!(with_reload.png, without.png);
    }

    #[test]
    fn vector_uses_text_inputs() {
        let long = GenerationInput {
            text: "XYZ".into(),
            background_color: "#4F46E5".into(),
            foreground_color: "#FFFFFF".into(),
        };
        let artifacts = Exporter::default().encode(indigo_buffer(), &long).unwrap();
        let svg = String::from_utf8(artifacts.svg.bytes).unwrap();

        assert!(svg.contains(">XY</text>"));
        assert!(!svg.contains('Z'));
        assert!(svg.contains("fill: #4F46E5"));
    }

    #[test]
    fn data_url_round_trip() {
        let png = encode_png(indigo_buffer().as_image()).unwrap();
        let url = to_data_url(ArtifactKind::Raster, &png);

        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), indigo_buffer().into_image());
    }

    #[test]
    fn malformed_data_urls_are_decode_failures() {
        let cases = [
            "image/png;base64,AAAA",
            "data:image/png;base64",
            "data:image/png,AAAA",
            "data:image/gif;base64,AAAA",
            "data:image/png;base64,!!!",
            "data:image/png;base64,AAAA",
        ];
        for url in cases {
            assert!(
                matches!(decode_data_url(url), Err(ExportError::DecodeFailure(_))),
                "{url} should fail"
            );
        }
    }

    #[test]
    fn wrong_size_surface_is_a_decode_failure() {
        let png = encode_png(&RgbaImage::new(16, 16)).unwrap();
        let url = to_data_url(ArtifactKind::Raster, &png);
        assert!(matches!(decode_data_url(&url), Err(ExportError::DecodeFailure(_))));
    }

    #[test]
    fn oversized_ico_is_an_encoding_failure() {
        // ICO entries cannot describe images larger than 256x256
        let result = encode_ico(&RgbaImage::new(300, 300));
        assert!(matches!(
            result,
            Err(ExportError::EncodingFailure { kind: ArtifactKind::Icon, .. })
        ));
    }

    #[test]
    fn export_registers_three_resources() {
        let registry = ResourceRegistry::new();
        let result = Exporter::default().export(indigo_buffer(), &input(), &registry);

        assert!(result.is_success());
        assert_eq!(registry.live_count(), 3);

        let svg = registry.read(result.svg_handle().unwrap()).unwrap();
        assert!(std::str::from_utf8(&svg).unwrap().starts_with("<svg"));

        result.release_all(&registry);
        assert_eq!(registry.live_count(), 0);
    }
}
