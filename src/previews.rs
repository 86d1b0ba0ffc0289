//! Explicit ownership of local preview resources.
//!
//! A `Local` gallery entry gets a preview materialized at add time. The
//! staged list owns the handle until the entry leaves the list (explicit
//! removal, session discard, or post-commit reseed) and releases it
//! exactly once at that point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Opaque reference to one materialized preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewHandle(pub String);

impl PreviewHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait PreviewStore {
    /// Materialize a preview for a local file and hand back the owning
    /// handle.
    fn create(&mut self, source: &Path) -> Result<PreviewHandle>;

    /// Release a handle produced by `create`. Called exactly once per
    /// handle; failures are logged, never surfaced.
    fn release(&mut self, handle: &PreviewHandle);
}

/// Previews copied into a cache directory under the client dir; releasing
/// a handle deletes its file.
pub struct FilePreviews {
    dir: PathBuf,
}

impl FilePreviews {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl PreviewStore for FilePreviews {
    fn create(&mut self, source: &Path) -> Result<PreviewHandle> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create previews dir {}", self.dir.display()))?;

        let ext = source
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("img");
        let dest = self
            .dir
            .join(format!("{}.{}", crate::media::random_hex(8)?, ext));
        std::fs::copy(source, &dest)
            .with_context(|| format!("copy {} -> {}", source.display(), dest.display()))?;

        Ok(PreviewHandle(dest.to_string_lossy().into_owned()))
    }

    fn release(&mut self, handle: &PreviewHandle) {
        if let Err(err) = std::fs::remove_file(handle.as_str()) {
            tracing::warn!("failed to remove preview {}: {}", handle.as_str(), err);
        }
    }
}

/// In-memory store that only records create/release calls. Deterministic;
/// tests use it to pin the release-exactly-once contract.
#[derive(Debug, Default)]
pub struct RecordingPreviews {
    next: u64,
    pub created: Vec<PreviewHandle>,
    pub released: Vec<PreviewHandle>,
}

impl RecordingPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles created and not yet released.
    pub fn live(&self) -> Vec<&PreviewHandle> {
        self.created
            .iter()
            .filter(|h| !self.released.contains(h))
            .collect()
    }
}

impl PreviewStore for RecordingPreviews {
    fn create(&mut self, source: &Path) -> Result<PreviewHandle> {
        self.next += 1;
        let handle = PreviewHandle(format!("preview-{}:{}", self.next, source.display()));
        self.created.push(handle.clone());
        Ok(handle)
    }

    fn release(&mut self, handle: &PreviewHandle) {
        self.released.push(handle.clone());
    }
}
