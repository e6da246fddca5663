//! favicon-renderer: text favicons in PNG, SVG and ICO form
//!
//! This crate draws one or two characters on a 32x32 colored square and
//! exports the result as a PNG raster, an SVG document and an icon artifact.
//! Each artifact is exposed through a [`ResourceHandle`] that the caller
//! releases once the bytes have been used.
//!
//! # Example
//!
//! ```
//! use favicon_renderer::{FaviconGenerator, GenerationInput, GeneratorConfig};
//!
//! let generator = FaviconGenerator::new(GeneratorConfig::default());
//! let result = generator.generate(&GenerationInput::new("F", "#4F46E5", "#FFFFFF"));
//!
//! if let Some(error) = result.error() {
//!     eprintln!("generation failed: {}", error.message);
//! }
//!
//! // Hand the URLs to a UI layer
//! let urls = result.urls().to_json().unwrap();
//!
//! // Release the handles once they have been downloaded or displayed
//! result.release_all(generator.registry());
//! ```
//!
//! # Downloads
//!
//! [`ResourceRegistry::save_and_release`] writes a handle's bytes to
//! `favicon.png`, `favicon.svg` or `favicon.ico` and releases it:
//!
//! ```no_run
//! use std::path::Path;
//! use favicon_renderer::{FaviconGenerator, GenerationInput};
//!
//! let generator = FaviconGenerator::default();
//! let result = generator.generate(&GenerationInput::default());
//!
//! if let Ok(handles) = result.into_outcome() {
//!     let registry = generator.registry();
//!     let out = Path::new("public");
//!     registry.save_and_release(handles.ico, out).unwrap();
//!     registry.save_and_release(handles.png, out).unwrap();
//!     registry.save_and_release(handles.svg, out).unwrap();
//! }
//! ```

mod artifact;
mod color;
mod config;
mod error;
mod export;
mod generator;
mod input;
mod render;
mod resource;
mod result;
mod surface;
mod vector;

pub use artifact::{ArtifactKind, EncodedArtifact};
pub use color::{FALLBACK_COLOR, resolve_css_color};
pub use config::{GeneratorConfig, IconMode};
pub use error::{
    ErrorInfo, ErrorKind, ExportError, FALLBACK_ERROR_MESSAGE, GenerationError,
    RasterizationError, ResourceError, TextRenderError,
};
pub use export::{ExportedArtifacts, Exporter, decode_data_url, encode_ico, encode_png, to_data_url};
pub use generator::{Configurable, FaviconGenerator};
pub use input::{GenerationInput, MAX_TEXT_CHARS, clamp_text};
pub use render::{DrawingBackend, GlyphRasterizer, ResvgBackend};
pub use resource::{Resource, ResourceHandle, ResourceRegistry};
pub use result::{ArtifactHandles, GenerationResult, GenerationUrls};
pub use surface::{CANVAS_SIZE, FONT_FAMILY, FONT_SIZE, PixelBuffer, SizePx};
pub use vector::build_svg;
