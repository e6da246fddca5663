//! Serializable generator configuration.
//!
//! A [`GeneratorConfig`] captures every knob of the pipeline in a format that
//! can be serialized to JSON and shared between a frontend and the process
//! that runs the generator.
//!
//! # Example
//!
//! ```
//! use favicon_renderer::{GeneratorConfig, IconMode};
//!
//! let config = GeneratorConfig::new().with_icon_mode(IconMode::IcoContainer);
//!
//! let json = config.to_json().unwrap();
//! let restored = GeneratorConfig::from_json(&json).unwrap();
//! assert_eq!(restored.icon_mode, IconMode::IcoContainer);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// IconMode
// ============================================================================

/// How the icon artifact is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum IconMode {
    /// Reuse the PNG bytes as the icon artifact.
    ///
    /// Browsers accept PNG data served as `favicon.ico`, so this is the
    /// default.
    #[default]
    PngApproximation,

    /// Wrap the PNG in a single-frame ICO container.
    IcoContainer,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for a [`FaviconGenerator`](crate::FaviconGenerator).
///
/// # JSON Format
///
/// ```json
/// {
///   "iconMode": "png-approximation",
///   "reloadThroughDataUrl": true,
///   "loadSystemFonts": true,
///   "fontFiles": ["/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Encoding of the icon artifact.
    #[serde(default)]
    pub icon_mode: IconMode,

    /// Whether the raster and icon paths reload the surface through a
    /// `data:` URL before encoding.
    #[serde(default = "default_true")]
    pub reload_through_data_url: bool,

    /// Whether the font database scans the system font directories.
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,

    /// Additional font files loaded into the font database.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub font_files: Vec<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            icon_mode: IconMode::default(),
            reload_through_data_url: true,
            load_system_fonts: true,
            font_files: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the icon encoding mode.
    pub fn with_icon_mode(mut self, mode: IconMode) -> Self {
        self.icon_mode = mode;
        self
    }

    /// Enables or disables the data URL reload step.
    pub fn with_data_url_reload(mut self, enabled: bool) -> Self {
        self.reload_through_data_url = enabled;
        self
    }

    /// Enables or disables system font discovery.
    pub fn with_system_fonts(mut self, enabled: bool) -> Self {
        self.load_system_fonts = enabled;
        self
    }

    /// Adds a font file to load.
    pub fn with_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Public-domain face bundled for deterministic glyph tests.
#[cfg(test)]
pub(crate) const TEST_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/fonts/Tuffy.ttf");

#[cfg(test)]
impl GeneratorConfig {
    /// Skips system fonts and loads only [`TEST_FONT`].
    pub(crate) fn test_font_only() -> Self {
        Self::new().with_system_fonts(false).with_font_file(TEST_FONT)
    }
}
