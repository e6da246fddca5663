//! The outcome of one generation request.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::error::ErrorInfo;
use crate::resource::{ResourceHandle, ResourceRegistry};

/// The three handles produced by a successful request.
#[derive(Debug)]
pub struct ArtifactHandles {
    pub ico: ResourceHandle,
    pub png: ResourceHandle,
    pub svg: ResourceHandle,
}

impl ArtifactHandles {
    /// Returns the handle for one format.
    pub fn get(&self, kind: ArtifactKind) -> &ResourceHandle {
        match kind {
            ArtifactKind::Icon => &self.ico,
            ArtifactKind::Raster => &self.png,
            ArtifactKind::Vector => &self.svg,
        }
    }

    /// Releases all three handles.
    pub fn release(self, registry: &ResourceRegistry) {
        registry.release(self.ico);
        registry.release(self.png);
        registry.release(self.svg);
    }
}

/// Result of a generation request.
///
/// A request either yields all three handles or an error, never a mix. The
/// handles belong to the caller, who must release them (see
/// [`release_all`](Self::release_all)) before discarding the result.
#[derive(Debug)]
#[must_use = "generation results hold resources that must be released"]
pub struct GenerationResult {
    outcome: Result<ArtifactHandles, ErrorInfo>,
}

impl GenerationResult {
    /// Creates a successful result.
    pub fn succeeded(handles: ArtifactHandles) -> Self {
        Self { outcome: Ok(handles) }
    }

    /// Creates a failed result with no handles.
    pub fn failed(error: impl Into<ErrorInfo>) -> Self {
        Self {
            outcome: Err(error.into()),
        }
    }

    /// Returns true if all three artifacts were produced.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the error, if the request failed.
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.outcome.as_ref().err()
    }

    /// Returns the handles, if the request succeeded.
    pub fn handles(&self) -> Option<&ArtifactHandles> {
        self.outcome.as_ref().ok()
    }

    /// Returns the icon handle, if the request succeeded.
    pub fn ico_handle(&self) -> Option<&ResourceHandle> {
        self.handles().map(|h| &h.ico)
    }

    /// Returns the PNG handle, if the request succeeded.
    pub fn png_handle(&self) -> Option<&ResourceHandle> {
        self.handles().map(|h| &h.png)
    }

    /// Returns the SVG handle, if the request succeeded.
    pub fn svg_handle(&self) -> Option<&ResourceHandle> {
        self.handles().map(|h| &h.svg)
    }

    /// Takes ownership of the handles, or the error.
    pub fn into_outcome(self) -> Result<ArtifactHandles, ErrorInfo> {
        self.outcome
    }

    /// Returns the serializable URL view of this result.
    pub fn urls(&self) -> GenerationUrls {
        match &self.outcome {
            Ok(handles) => GenerationUrls {
                ico_url: Some(handles.ico.url().to_string()),
                png_url: Some(handles.png.url().to_string()),
                svg_url: Some(handles.svg.url().to_string()),
                error: None,
            },
            Err(error) => GenerationUrls {
                ico_url: None,
                png_url: None,
                svg_url: None,
                error: Some(error.message.clone()),
            },
        }
    }

    /// Releases every handle held by this result.
    pub fn release_all(self, registry: &ResourceRegistry) {
        if let Ok(handles) = self.outcome {
            handles.release(registry);
        }
    }
}

/// URL view of a [`GenerationResult`] for handing to a UI layer.
///
/// # JSON Format
///
/// ```json
/// {
///   "icoUrl": "blob:favicon/1b4e28ba-2fa1-11d2-883f-0016d3cca427",
///   "pngUrl": "blob:favicon/6fa459ea-ee8a-3ca4-894e-db77e160355e",
///   "svgUrl": "blob:favicon/886313e1-3b8a-5372-9b90-0c9aee199e5d",
///   "error": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenerationUrls {
    pub ico_url: Option<String>,
    pub png_url: Option<String>,
    pub svg_url: Option<String>,
    pub error: Option<String>,
}

impl GenerationUrls {
    /// Serializes the view to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
