//! The staged gallery: the client-local working copy of the record's image
//! list, edited without any network I/O and reconciled on commit.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::media::{self, FileSpec};
use crate::model::StorageKey;
use crate::previews::{PreviewHandle, PreviewStore};

/// Opaque client-minted identity for one staged slot. Stable across
/// reorders; never sent to the server and never used as a storage key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryId(String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn mint_entry_id() -> Result<EntryId> {
    Ok(EntryId(media::random_hex(16)?))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Durably stored under `key`.
    Remote { key: StorageKey },

    /// Stored under `key` but marked for removal. Keeps its slot so the
    /// order of the surrounding items is undisturbed while editing, and is
    /// excluded from the final key list.
    PendingDelete { key: StorageKey },

    /// Picked locally, not yet uploaded.
    Local {
        file: PathBuf,
        filename: String,
        content_type: String,
    },
}

#[derive(Debug)]
pub struct StagedItem {
    id: EntryId,

    // Present iff created by `add_local` and not released yet. Survives the
    // upload transition so a failed save can be retried without re-picking
    // files; released on reseed, removal, or discard.
    preview: Option<PreviewHandle>,

    kind: EntryKind,
}

impl StagedItem {
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// What an editing surface would render for this slot: the public URL
    /// for stored objects, the preview for local files.
    pub fn display_url(&self, public_base: &str) -> Option<String> {
        match &self.kind {
            EntryKind::Remote { key } | EntryKind::PendingDelete { key } => {
                Some(format!("{}{}", public_base, key.as_str()))
            }
            EntryKind::Local { .. } => self.preview.as_ref().map(|p| p.as_str().to_string()),
        }
    }
}

/// One upload the next commit must perform.
#[derive(Clone, Debug)]
pub struct PendingUpload {
    pub id: EntryId,
    pub file: PathBuf,
    pub spec: FileSpec,
}

#[derive(Debug, Default)]
pub struct StagedGallery {
    items: Vec<StagedItem>,
}

impl StagedGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[StagedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the list with one `Remote` entry per key, in input order,
    /// releasing every preview still owned by the outgoing items. Used on
    /// load and after a successful commit.
    pub fn seed(&mut self, keys: &[StorageKey], previews: &mut dyn PreviewStore) -> Result<()> {
        self.release_all(previews);
        self.items = keys
            .iter()
            .map(|key| {
                Ok(StagedItem {
                    id: mint_entry_id()?,
                    preview: None,
                    kind: EntryKind::Remote { key: key.clone() },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Append one `Local` entry per file, in input order. All files are
    /// checked up front so a rejected file adds nothing and creates no
    /// previews.
    pub fn add_local(
        &mut self,
        files: &[PathBuf],
        previews: &mut dyn PreviewStore,
    ) -> Result<Vec<EntryId>> {
        let mut specs = Vec::with_capacity(files.len());
        for file in files {
            let filename = file
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .with_context(|| format!("invalid file name: {}", file.display()))?;
            let content_type = media::content_type_for(&filename)
                .with_context(|| format!("unsupported image type: {}", filename))?
                .to_string();
            specs.push((filename, content_type));
        }

        let mut added = Vec::with_capacity(files.len());
        for (file, (filename, content_type)) in files.iter().zip(specs) {
            let preview = previews.create(file)?;
            let id = mint_entry_id()?;
            self.items.push(StagedItem {
                id: id.clone(),
                preview: Some(preview),
                kind: EntryKind::Local {
                    file: file.clone(),
                    filename,
                    content_type,
                },
            });
            added.push(id);
        }
        Ok(added)
    }

    /// Move one entry from `from` to `to`, shifting the items in between.
    /// Out-of-range or equal indices are a silent no-op.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to || from >= self.items.len() || to >= self.items.len() {
            return;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
    }

    /// Remove the entry addressed by `id`: a local entry leaves the list
    /// and its preview is released immediately; a remote entry becomes
    /// pending-delete in place; a pending-delete entry and an unknown id
    /// are no-ops.
    pub fn remove(&mut self, id: &EntryId, previews: &mut dyn PreviewStore) {
        let Some(pos) = self.items.iter().position(|item| &item.id == id) else {
            return;
        };
        match &self.items[pos].kind {
            EntryKind::Local { .. } => {
                let item = self.items.remove(pos);
                if let Some(handle) = item.preview {
                    previews.release(&handle);
                }
            }
            EntryKind::Remote { key } => {
                let key = key.clone();
                self.items[pos].kind = EntryKind::PendingDelete { key };
            }
            EntryKind::PendingDelete { .. } => {}
        }
    }

    /// Transition a local entry to remote once its bytes are durably
    /// stored. The slot position and the preview handle are kept.
    pub fn mark_uploaded(&mut self, id: &EntryId, key: StorageKey) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .with_context(|| format!("no staged entry {}", id.as_str()))?;
        match &item.kind {
            EntryKind::Local { .. } => {
                item.kind = EntryKind::Remote { key };
                Ok(())
            }
            EntryKind::Remote { .. } | EntryKind::PendingDelete { .. } => {
                anyhow::bail!("entry {} is not awaiting upload", id.as_str())
            }
        }
    }

    /// First live (non-pending) entry stored under `key`.
    pub fn find_by_key(&self, key: &str) -> Option<EntryId> {
        self.items.iter().find_map(|item| match &item.kind {
            EntryKind::Remote { key: k } if k.as_str() == key => Some(item.id.clone()),
            _ => None,
        })
    }

    /// Entries that need bytes uploaded, in staged order.
    pub fn pending_uploads(&self) -> Vec<PendingUpload> {
        self.items
            .iter()
            .filter_map(|item| match &item.kind {
                EntryKind::Local {
                    file,
                    filename,
                    content_type,
                } => Some(PendingUpload {
                    id: item.id.clone(),
                    file: file.clone(),
                    spec: FileSpec {
                        filename: filename.clone(),
                        content_type: content_type.clone(),
                    },
                }),
                _ => None,
            })
            .collect()
    }

    /// Keys marked for removal, in staged order.
    pub fn pending_delete_keys(&self) -> Vec<StorageKey> {
        self.items
            .iter()
            .filter_map(|item| match &item.kind {
                EntryKind::PendingDelete { key } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    /// The ordered key list a commit persists: every entry in staged order
    /// minus the pending deletes. Errors while a local entry has not been
    /// uploaded yet.
    pub fn final_keys(&self) -> Result<Vec<StorageKey>> {
        let mut out = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match &item.kind {
                EntryKind::Remote { key } => out.push(key.clone()),
                EntryKind::PendingDelete { .. } => {}
                EntryKind::Local { filename, .. } => {
                    anyhow::bail!("local file not uploaded yet: {}", filename)
                }
            }
        }
        Ok(out)
    }

    /// Drop every staged entry, releasing all owned previews. Used when an
    /// edit session ends or is abandoned.
    pub fn discard(&mut self, previews: &mut dyn PreviewStore) {
        self.release_all(previews);
        self.items.clear();
    }

    fn release_all(&mut self, previews: &mut dyn PreviewStore) {
        for item in &mut self.items {
            if let Some(handle) = item.preview.take() {
                previews.release(&handle);
            }
        }
    }
}
