//! The save path: reconcile the staged gallery against object storage and
//! the restaurant record.
//!
//! Step order is fixed: partition, issue upload URLs, upload, request
//! deletes, persist the final key list, reseed. Issuance and upload
//! failures abort before anything is persisted. Deletion failures never
//! abort: an orphaned object costs storage, not correctness, since the
//! record will not reference it. A failed record patch leaves the staged
//! list holding its freshly uploaded entries as remote, so a retried save
//! re-references them without re-uploading.

use anyhow::{Context, Result};

use crate::gallery::StagedGallery;
use crate::model::StorageKey;
use crate::previews::PreviewStore;
use crate::remote::ApiClient;

#[derive(Clone, Debug)]
pub struct CommitSummary {
    /// The ordered key list as persisted.
    pub images: Vec<StorageKey>,
    pub uploaded: usize,
    pub delete_requested: usize,
}

pub fn commit(
    gallery: &mut StagedGallery,
    previews: &mut dyn PreviewStore,
    client: &ApiClient,
) -> Result<CommitSummary> {
    let uploads = gallery.pending_uploads();
    let to_delete = gallery.pending_delete_keys();

    if !uploads.is_empty() {
        let specs: Vec<_> = uploads.iter().map(|u| u.spec.clone()).collect();
        let issued = client.signed_urls(&specs).context("issue upload urls")?;
        if issued.len() != uploads.len() {
            anyhow::bail!(
                "signed url count mismatch (requested {}, got {}); aborting before any upload",
                uploads.len(),
                issued.len()
            );
        }

        for (upload, slot) in uploads.iter().zip(issued.iter()) {
            let bytes = std::fs::read(&upload.file)
                .with_context(|| format!("read {}", upload.file.display()))?;
            client
                .upload_file(&slot.signed_url, &upload.spec.content_type, bytes)
                .with_context(|| format!("upload {}", upload.spec.filename))?;
            gallery.mark_uploaded(&upload.id, StorageKey(slot.key.clone()))?;
        }
    }

    if !to_delete.is_empty()
        && let Err(err) = client.delete_files(&to_delete)
    {
        tracing::warn!("delete request failed, continuing with save: {:#}", err);
    }

    let final_keys = gallery.final_keys()?;
    let record = client
        .patch_images(&final_keys)
        .context("persist image list")?;

    let images = record.images.clone();
    gallery.seed(&record.images, previews)?;

    Ok(CommitSummary {
        images,
        uploaded: uploads.len(),
        delete_requested: to_delete.len(),
    })
}
