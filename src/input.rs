//! Generation request inputs.

use serde::{Deserialize, Serialize};

/// Maximum number of characters drawn on the favicon.
pub const MAX_TEXT_CHARS: usize = 2;

/// The text and colors for one generation request.
///
/// Colors are CSS color strings. They are not validated: the vector output
/// copies them verbatim and the raster output resolves what it can.
///
/// # JSON Format
///
/// ```json
/// {
///   "text": "F",
///   "backgroundColor": "#4F46E5",
///   "foregroundColor": "#FFFFFF"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub text: String,
    pub background_color: String,
    pub foreground_color: String,
}

impl Default for GenerationInput {
    fn default() -> Self {
        Self::new("F", "#4F46E5", "#FFFFFF")
    }
}

impl GenerationInput {
    /// Creates an input, clamping the text to [`MAX_TEXT_CHARS`] characters.
    pub fn new(
        text: impl Into<String>,
        background_color: impl Into<String>,
        foreground_color: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            background_color: background_color.into(),
            foreground_color: foreground_color.into(),
        }
        .clamped()
    }

    /// Returns a copy whose text holds at most [`MAX_TEXT_CHARS`] characters.
    ///
    /// Deserialized inputs skip [`new`](Self::new), so the pipeline clamps
    /// again before use.
    pub fn clamped(mut self) -> Self {
        let keep = clamp_text(&self.text).len();
        self.text.truncate(keep);
        self
    }

    /// Deserializes an input from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the input to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Returns the prefix of `text` holding at most [`MAX_TEXT_CHARS`] characters.
pub fn clamp_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
