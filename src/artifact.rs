//! Encoded export artifacts.

use std::fmt;

/// The three export formats produced for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Lossless PNG raster.
    Raster,
    /// SVG markup regenerated from the text inputs.
    Vector,
    /// Icon container for browser tabs.
    Icon,
}

impl ArtifactKind {
    /// Returns the MIME type tag for this artifact.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Raster => "image/png",
            Self::Vector => "image/svg+xml",
            Self::Icon => "image/x-icon",
        }
    }

    /// Returns the filename used when the artifact is downloaded.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Raster => "favicon.png",
            Self::Vector => "favicon.svg",
            Self::Icon => "favicon.ico",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raster => "raster",
            Self::Vector => "vector",
            Self::Icon => "icon",
        };
        f.write_str(name)
    }
}

/// One encoded image, ready to be registered as a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl EncodedArtifact {
    pub fn new(kind: ArtifactKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    /// Returns the MIME type tag of the artifact.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}
