//! Upload-URL issuance, direct-to-storage uploads, and batch deletes.

use super::*;

use crate::media::{FileSpec, SignedUrl};

#[derive(Debug, serde::Serialize)]
struct SignedUrlsRequest<'a> {
    files: &'a [FileSpec],
}

impl ApiClient {
    /// Request one signed upload URL per file, same order as the input.
    /// The server rejects empty batches; the orchestrator never sends one.
    pub fn signed_urls(&self, files: &[FileSpec]) -> Result<Vec<SignedUrl>> {
        let resp = with_retries("signed urls request", || {
            self.client
                .post(self.url("/media/signed-urls"))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .json(&SignedUrlsRequest { files })
                .send()
                .context("send")
        })?;

        let resp = self.ensure_ok(resp, "signed urls")?;
        resp.json().context("parse signed urls")
    }

    /// PUT file bytes to an issued URL with the content type declared at
    /// issuance. Never retried: the commit aborts on the first failed
    /// upload rather than persisting a gallery missing a photo.
    pub fn upload_file(&self, signed_url: &str, content_type: &str, bytes: Vec<u8>) -> Result<()> {
        let resp = self
            .client
            .put(signed_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .context("send upload")?;
        self.ensure_ok(resp, "upload file")?;
        Ok(())
    }

    /// Ask the server to delete stored objects. Best-effort on both sides:
    /// the server never reports per-key outcomes and callers treat a
    /// transport failure as non-fatal.
    pub fn delete_files(&self, keys: &[StorageKey]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let joined = keys
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let resp = self
            .client
            .delete(self.url(&format!("/media/files?keys={}", joined)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .context("send delete")?;
        self.ensure_ok(resp, "delete files")?;
        Ok(())
    }
}
