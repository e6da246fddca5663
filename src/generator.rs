//! The favicon generation entry point.

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::export::Exporter;
use crate::input::GenerationInput;
use crate::render::{DrawingBackend, GlyphRasterizer, ResvgBackend};
use crate::resource::ResourceRegistry;
use crate::result::GenerationResult;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`GeneratorConfig`].
pub trait Configurable {
    /// Applies a config's settings to this instance.
    fn apply_config(&mut self, config: &GeneratorConfig);

    /// Exports the current settings as a config.
    fn export_config(&self) -> GeneratorConfig;
}

// ============================================================================
// FaviconGenerator
// ============================================================================

/// Runs the rasterize-then-export pipeline for generation requests.
///
/// A generator owns its rasterizer and exporter and shares a
/// [`ResourceRegistry`] with its callers. It keeps no per-request state, so
/// one generator can serve any number of requests, from any thread.
///
/// # Pipeline
///
/// 1. **Rasterize**: draw the clamped text on a 32x32 background square.
/// 2. **Export**: encode PNG, SVG and icon artifacts.
/// 3. **Register**: expose each artifact through a [`ResourceHandle`].
///
/// Any failure collapses the request into an error with no handles.
///
/// # Example
///
/// ```
/// use favicon_renderer::{FaviconGenerator, GenerationInput, GeneratorConfig};
///
/// let generator = FaviconGenerator::new(GeneratorConfig::new().with_system_fonts(false));
/// let result = generator.generate(&GenerationInput::new("F", "#4F46E5", "#FFFFFF"));
///
/// assert!(result.is_success());
/// let svg = generator.registry().read(result.svg_handle().unwrap()).unwrap();
/// assert!(std::str::from_utf8(&svg).unwrap().contains("fill: #4F46E5"));
///
/// result.release_all(generator.registry());
/// ```
///
/// [`ResourceHandle`]: crate::ResourceHandle
pub struct FaviconGenerator {
    config: GeneratorConfig,
    rasterizer: GlyphRasterizer,
    exporter: Exporter,
    registry: ResourceRegistry,
}

impl Default for FaviconGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl FaviconGenerator {
    /// Creates a generator using the resvg backend and a fresh registry.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_registry(config, ResourceRegistry::new())
    }

    /// Creates a generator that registers resources in `registry`.
    pub fn with_registry(config: GeneratorConfig, registry: ResourceRegistry) -> Self {
        Self {
            rasterizer: GlyphRasterizer::from_config(&config),
            exporter: Exporter::from_config(&config),
            config,
            registry,
        }
    }

    /// Creates a generator drawing through a custom backend.
    pub fn with_backend(
        config: GeneratorConfig,
        backend: impl DrawingBackend + 'static,
        registry: ResourceRegistry,
    ) -> Self {
        Self {
            rasterizer: GlyphRasterizer::new(backend),
            exporter: Exporter::from_config(&config),
            config,
            registry,
        }
    }

    /// Returns the registry holding generated resources.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Returns the rasterizer.
    pub fn rasterizer(&self) -> &GlyphRasterizer {
        &self.rasterizer
    }

    /// Returns the exporter.
    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Generates the three favicon artifacts for `input`.
    ///
    /// Text longer than two characters is truncated first. Errors never
    /// escape: they are reported through [`GenerationResult::error`].
    pub fn generate(&self, input: &GenerationInput) -> GenerationResult {
        let input = input.clone().clamped();
        log::debug!("generating favicon for {:?}", input.text);

        let buffer = match self.rasterizer.rasterize(
            &input.text,
            &input.background_color,
            &input.foreground_color,
        ) {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("rasterization failed: {e}");
                return GenerationResult::failed(GenerationError::from(e));
            }
        };

        self.exporter.export(buffer, &input, &self.registry)
    }

    /// Releases `previous` and generates a new result for `input`.
    ///
    /// Use this when regenerating on every input change so earlier results
    /// do not accumulate in the registry.
    pub fn regenerate(
        &self,
        previous: GenerationResult,
        input: &GenerationInput,
    ) -> GenerationResult {
        previous.release_all(&self.registry);
        self.generate(input)
    }
}

impl Configurable for FaviconGenerator {
    /// Applies a config to this generator.
    ///
    /// The font database is only rebuilt when a font setting changed.
    ///
    /// # Example
    ///
    /// ```
    /// use favicon_renderer::{Configurable, FaviconGenerator, GeneratorConfig, IconMode};
    ///
    /// let mut generator = FaviconGenerator::new(GeneratorConfig::new().with_system_fonts(false));
    /// generator.apply_config(
    ///     &GeneratorConfig::new()
    ///         .with_system_fonts(false)
    ///         .with_icon_mode(IconMode::IcoContainer),
    /// );
    ///
    /// assert_eq!(generator.exporter().icon_mode(), IconMode::IcoContainer);
    /// ```
    fn apply_config(&mut self, config: &GeneratorConfig) {
        let fonts_changed = config.load_system_fonts != self.config.load_system_fonts
            || config.font_files != self.config.font_files;
        if fonts_changed {
            self.rasterizer = GlyphRasterizer::new(ResvgBackend::from_config(config));
        }

        self.exporter = Exporter::from_config(config);
        self.config = config.clone();
    }

    /// Exports the generator's current settings.
    fn export_config(&self) -> GeneratorConfig {
        self.config.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IconMode;
    use crate::error::{ErrorKind, FALLBACK_ERROR_MESSAGE, TextRenderError};
    use crate::surface::SizePx;
    use image::{ImageFormat, Rgba, RgbaImage};

    struct NoContext;

    impl DrawingBackend for NoContext {
        fn create_surface(&self, _size: SizePx) -> Option<RgbaImage> {
            None
        }

        fn fill_text(&self, _: &mut RgbaImage, _: &str, _: Rgba<u8>) -> Result<(), TextRenderError> {
            Ok(())
        }
    }

    fn offline_config() -> GeneratorConfig {
        GeneratorConfig::new().with_system_fonts(false)
    }

    fn generator() -> FaviconGenerator {
        FaviconGenerator::new(GeneratorConfig::test_font_only())
    }

    fn png_of(generator: &FaviconGenerator, text: &str, bg: &str, fg: &str) -> Vec<u8> {
        let result = generator.generate(&GenerationInput::new(text, bg, fg));
        let png = generator.registry().read(result.png_handle().unwrap()).unwrap();
        result.release_all(generator.registry());
        png.to_vec()
    }

    fn decode_png(bytes: &[u8]) -> RgbaImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8()
    }

    #[test]
    fn indigo_f_produces_three_urls() {
        let generator = generator();
        let result = generator.generate(&GenerationInput::new("F", "#4F46E5", "#FFFFFF"));

        let urls = result.urls();
        assert!(urls.png_url.is_some());
        assert!(urls.svg_url.is_some());
        assert!(urls.ico_url.is_some());
        assert!(urls.error.is_none());

        let svg = generator.registry().read(result.svg_handle().unwrap()).unwrap();
        let svg = std::str::from_utf8(&svg).unwrap();
        assert!(svg.contains("fill: #4F46E5"));
        assert!(svg.contains("fill: #FFFFFF"));

        result.release_all(generator.registry());
    }

    #[test]
    fn every_text_length_succeeds() {
        let generator = generator();
        for text in ["", "A", "AB", "日本"] {
            let result = generator.generate(&GenerationInput::new(text, "white", "black"));
            assert!(result.is_success(), "{text:?} should succeed");
            assert!(result.error().is_none());
            result.release_all(generator.registry());
        }
        assert_eq!(generator.registry().live_count(), 0);
    }

    #[test]
    fn missing_surface_fails_with_fallback_message() {
        let generator =
            FaviconGenerator::with_backend(offline_config(), NoContext, ResourceRegistry::new());
        let result = generator.generate(&GenerationInput::default());

        assert_eq!(result.error().unwrap().kind, ErrorKind::SurfaceUnavailable);
        assert_eq!(
            result.urls().to_json().unwrap(),
            r#"{"icoUrl":null,"pngUrl":null,"svgUrl":null,"error":"Failed to create image data URL."}"#
        );
        assert_eq!(result.error().unwrap().message, FALLBACK_ERROR_MESSAGE);
        assert_eq!(generator.registry().live_count(), 0);
    }

    #[test]
    fn identical_inputs_give_identical_bytes() {
        let generator = generator();
        let input = GenerationInput::new("Ab", "#112233", "#ffeedd");

        let first = generator.generate(&input);
        let second = generator.generate(&input);

        let registry = generator.registry();
        let bytes = |result: &GenerationResult| {
            let handles = result.handles().unwrap();
            (
                registry.read(&handles.png).unwrap(),
                registry.read(&handles.svg).unwrap(),
                registry.read(&handles.ico).unwrap(),
            )
        };
        let (png_a, svg_a, ico_a) = bytes(&first);
        let (png_b, svg_b, ico_b) = bytes(&second);

        assert_eq!(png_a, png_b);
        assert_eq!(svg_a, svg_b);
        assert_eq!(ico_a, png_a);
        assert_eq!(ico_b, png_b);

        let decoded = decode_png(&png_a);
        assert!(decoded.pixels().any(|p| p.0 != [0x11, 0x22, 0x33, 255]));

        first.release_all(registry);
        second.release_all(registry);
    }

    #[test]
    fn corners_keep_background_color() {
        let generator = generator();
        for text in ["W", "MW"] {
            let decoded = decode_png(&png_of(&generator, text, "#4F46E5", "#FFFFFF"));

            for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
                assert_eq!(decoded.get_pixel(x, y).0, [0x4f, 0x46, 0xe5, 255]);
            }
            assert!(decoded.pixels().any(|p| p[0] > 200));
        }
    }

    #[test]
    fn third_character_never_appears() {
        let generator = generator();
        let truncated = generator.generate(&GenerationInput {
            text: "ABQ".into(),
            background_color: "#000".into(),
            foreground_color: "#fff".into(),
        });
        let exact = generator.generate(&GenerationInput::new("AB", "#000", "#fff"));

        let registry = generator.registry();
        let svg = registry.read(truncated.svg_handle().unwrap()).unwrap();
        let svg = std::str::from_utf8(&svg).unwrap();
        assert!(svg.contains(">AB</text>"));
        assert!(!svg.contains('Q'));

        assert_eq!(
            registry.read(truncated.png_handle().unwrap()).unwrap(),
            registry.read(exact.png_handle().unwrap()).unwrap()
        );
        assert_ne!(
            png_of(&generator, "AB", "#000", "#fff"),
            png_of(&generator, "AC", "#000", "#fff")
        );

        truncated.release_all(registry);
        exact.release_all(registry);
    }

    #[test_log::test]
    fn missing_fonts_still_produce_background_square() {
        let generator = FaviconGenerator::new(offline_config());
        let decoded = decode_png(&png_of(&generator, "F", "#4F46E5", "#FFFFFF"));

        assert!(decoded.pixels().all(|p| p.0 == [0x4f, 0x46, 0xe5, 255]));
        assert_eq!(generator.registry().live_count(), 0);
    }

    #[test]
    fn released_handles_cannot_be_fetched() {
        let generator = generator();
        let result = generator.generate(&GenerationInput::default());
        let urls = result.urls();

        result.release_all(generator.registry());

        for url in [urls.ico_url, urls.png_url, urls.svg_url].into_iter().flatten() {
            assert!(generator.registry().fetch(&url).is_err());
        }
    }

    #[test]
    fn regenerate_releases_previous_result() {
        let generator = generator();
        let mut result = generator.generate(&GenerationInput::new("A", "red", "white"));

        for text in ["B", "C", "D"] {
            result = generator.regenerate(result, &GenerationInput::new(text, "red", "white"));
            assert_eq!(generator.registry().live_count(), 3);
        }

        result.release_all(generator.registry());
        assert_eq!(generator.registry().live_count(), 0);
    }

    #[test]
    fn generator_is_shareable_across_threads() {
        let generator = std::sync::Arc::new(generator());

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let generator = std::sync::Arc::clone(&generator);
                std::thread::spawn(move || {
                    let input = GenerationInput::new(format!("{i}"), "black", "white");
                    let result = generator.generate(&input);
                    assert!(result.is_success());
                    result.release_all(generator.registry());
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(generator.registry().live_count(), 0);
    }

    #[test]
    fn config_round_trips_through_generator() {
        let mut generator = generator();
        let config = GeneratorConfig::test_font_only().with_icon_mode(IconMode::IcoContainer);

        generator.apply_config(&config);

        assert_eq!(generator.export_config(), config);
        let result = generator.generate(&GenerationInput::default());
        let ico = generator.registry().read(result.ico_handle().unwrap()).unwrap();
        assert_eq!(&ico[..4], &[0, 0, 1, 0]);
        result.release_all(generator.registry());
    }
}
