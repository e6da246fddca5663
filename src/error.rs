//! Error types for the generation pipeline.
//!
//! Each stage has its own error enum. [`GenerationError`] unifies them at the
//! point where a request is collapsed into a [`GenerationResult`], and
//! [`ErrorInfo`] is the serializable form handed back to callers.
//!
//! [`GenerationResult`]: crate::GenerationResult

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::ArtifactKind;

/// Message reported to callers when the pipeline could not produce a surface.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to create image data URL.";

/// Errors raised by the glyph rasterizer.
#[derive(Debug, Error)]
pub enum RasterizationError {
    /// The drawing backend could not provide a 2D surface.
    #[error("surface unavailable")]
    SurfaceUnavailable,
}

/// A drawing backend failed to draw text onto a surface.
///
/// Text drawing is best-effort, so the rasterizer logs this and keeps the
/// background instead of failing the request.
#[derive(Debug, Error)]
#[error("text rendering failed: {0}")]
pub struct TextRenderError(pub String);

/// Errors raised while encoding the three export formats.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The data URL reload step did not produce a usable surface.
    #[error("failed to decode rendered surface: {0}")]
    DecodeFailure(String),

    /// One of the format encoders failed.
    #[error("failed to encode {kind} artifact: {source}")]
    EncodingFailure {
        kind: ArtifactKind,
        #[source]
        source: image::ImageError,
    },
}

/// Any failure that aborts a generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Rasterization(#[from] RasterizationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl GenerationError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rasterization(RasterizationError::SurfaceUnavailable) => {
                ErrorKind::SurfaceUnavailable
            }
            Self::Export(ExportError::DecodeFailure(_)) => ErrorKind::DecodeFailure,
            Self::Export(ExportError::EncodingFailure { .. }) => ErrorKind::EncodingFailure,
        }
    }

    /// Returns the message shown to the user for this error.
    ///
    /// A missing surface has no useful detail of its own, so it reports the
    /// generic fallback message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rasterization(RasterizationError::SurfaceUnavailable) => {
                FALLBACK_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Errors raised by the resource registry.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The URL does not refer to a live resource (never created or released).
    #[error("resource {0} is not available")]
    Released(String),

    /// Writing a resource to disk failed.
    #[error("failed to save resource: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// ErrorInfo
// ============================================================================

/// Category of a failed generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    SurfaceUnavailable,
    DecodeFailure,
    EncodingFailure,
}

/// Serializable description of the error that aborted a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&GenerationError> for ErrorInfo {
    fn from(err: &GenerationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

impl From<GenerationError> for ErrorInfo {
    fn from(err: GenerationError) -> Self {
        Self::from(&err)
    }
}
