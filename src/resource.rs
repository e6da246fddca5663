//! Caller-owned handles to generated image bytes.
//!
//! Exported artifacts are parked in a [`ResourceRegistry`] and exposed through
//! `blob:` style URLs, the way a browser exposes object URLs. The registry
//! never frees anything on its own: every [`ResourceHandle`] must be given
//! back through [`ResourceRegistry::release`] (or
//! [`save_and_release`](ResourceRegistry::save_and_release)), otherwise its
//! bytes stay alive as long as the registry does.
//!
//! # Example
//!
//! ```
//! use favicon_renderer::{ArtifactKind, EncodedArtifact, ResourceRegistry};
//!
//! let registry = ResourceRegistry::new();
//! let handle = registry.create(EncodedArtifact::new(ArtifactKind::Vector, b"<svg/>".to_vec()));
//! let url = handle.url().to_string();
//!
//! assert_eq!(&*registry.fetch(&url).unwrap().bytes, b"<svg/>");
//!
//! registry.release(handle);
//! assert!(registry.fetch(&url).is_err());
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::artifact::{ArtifactKind, EncodedArtifact};
use crate::error::ResourceError;

const URL_PREFIX: &str = "blob:favicon/";

// ============================================================================
// ResourceHandle
// ============================================================================

/// A temporary reference to bytes held by a [`ResourceRegistry`].
///
/// Handles are deliberately not `Clone`: releasing one consumes it, so each
/// resource is released at most once. Dropping a handle without releasing it
/// leaks the bytes for the lifetime of the registry.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "resource handles must be released"]
pub struct ResourceHandle {
    url: String,
    kind: ArtifactKind,
    len: usize,
}

impl ResourceHandle {
    /// Returns the URL the resource can be fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns which export format the resource holds.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Returns the MIME type of the resource.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    /// Returns the suggested download filename.
    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    /// Returns the size of the resource in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the resource holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The contents of a live resource.
#[derive(Debug, Clone)]
pub struct Resource {
    pub kind: ArtifactKind,
    pub bytes: Arc<[u8]>,
}

impl Resource {
    /// Returns the MIME type of the resource.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

// ============================================================================
// ResourceRegistry
// ============================================================================

/// Shared store of live resources keyed by URL.
///
/// Cloning a registry yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    entries: Arc<Mutex<HashMap<String, Resource>>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Resource>> {
        // Entries are inserted and removed whole, so a poisoned map is still
        // consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores an artifact and returns a handle to it.
    pub fn create(&self, artifact: EncodedArtifact) -> ResourceHandle {
        let url = format!("{URL_PREFIX}{}", Uuid::new_v4());
        let handle = ResourceHandle {
            url: url.clone(),
            kind: artifact.kind,
            len: artifact.bytes.len(),
        };

        let resource = Resource {
            kind: artifact.kind,
            bytes: artifact.bytes.into(),
        };
        self.lock().insert(url, resource);

        log::debug!("created {} resource {} ({} bytes)", handle.kind, handle.url, handle.len);
        handle
    }

    /// Returns the resource behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Released`] if the URL was never created or
    /// has been released.
    pub fn fetch(&self, url: &str) -> Result<Resource, ResourceError> {
        self.lock()
            .get(url)
            .cloned()
            .ok_or_else(|| ResourceError::Released(url.to_string()))
    }

    /// Returns the bytes behind a handle.
    pub fn read(&self, handle: &ResourceHandle) -> Result<Arc<[u8]>, ResourceError> {
        Ok(self.fetch(handle.url())?.bytes)
    }

    /// Releases a handle, freeing its bytes.
    ///
    /// Returns `false` if the resource was already gone, which only happens
    /// when its URL was revoked separately.
    pub fn release(&self, handle: ResourceHandle) -> bool {
        self.revoke_url(&handle.url)
    }

    /// Releases the resource behind a URL.
    ///
    /// This is for callers that only kept the URL string. Returns `false` if
    /// nothing was registered under it.
    pub fn revoke_url(&self, url: &str) -> bool {
        let removed = self.lock().remove(url).is_some();
        if removed {
            log::debug!("released resource {url}");
        } else {
            log::warn!("release of unknown resource {url}");
        }
        removed
    }

    /// Writes a resource to `dir` under its download filename, then releases
    /// it.
    ///
    /// The handle is released even if the write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is no longer live or the file cannot
    /// be written.
    pub fn save_and_release(
        &self,
        handle: ResourceHandle,
        dir: &Path,
    ) -> Result<PathBuf, ResourceError> {
        let path = dir.join(handle.file_name());
        let written = self
            .read(&handle)
            .and_then(|bytes| fs::write(&path, &bytes).map_err(ResourceError::from));
        self.release(handle);

        written?;
        log::info!("saved {}", path.display());
        Ok(path)
    }

    /// Returns the number of resources that have not been released.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }
}

// ============================================================================
// Tests
// ============================================================================
