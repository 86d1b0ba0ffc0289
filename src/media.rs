//! Storage-key derivation and upload-URL signatures, shared by the server
//! and the client-side wire types.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::StorageKey;

/// Namespace prefix for every gallery object key.
pub const KEY_PREFIX: &str = "restaurants/images";

/// Default lifetime of an issued upload URL.
pub const SIGNED_URL_TTL_SECS: i64 = 300;

/// One file the client wants an upload URL for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpec {
    pub filename: String,
    pub content_type: String,
}

/// One issued upload slot: a time-limited URL authorizing exactly one
/// write to exactly one key with one declared content type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub signed_url: String,
    pub key: String,
}

/// Derives a unique storage key per filename without reading file bytes.
///
/// Injected rather than called statically so tests can pin key output.
pub trait KeyMinter: Send + Sync {
    fn mint(&self, filename: &str) -> Result<StorageKey>;
}

/// Millisecond timestamp plus a random tag: collision-resistant across
/// concurrent callers with no coordination, and the original extension is
/// preserved for content-type inference downstream.
pub struct MillisEntropyMinter;

impl KeyMinter for MillisEntropyMinter {
    fn mint(&self, filename: &str) -> Result<StorageKey> {
        let ext = file_extension(filename)
            .with_context(|| format!("filename has no usable extension: {}", filename))?;
        let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let tag = random_hex(4)?;
        Ok(StorageKey(format!(
            "{}/{}-{}.{}",
            KEY_PREFIX, millis, tag, ext
        )))
    }
}

/// Extension after the last dot, or `None` when the name has no stem, no
/// extension, or a non-alphanumeric one.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// Content type inferred from a filename or storage-key extension.
pub fn content_type_for(name: &str) -> Option<&'static str> {
    match file_extension(name)?.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Signature binding an upload URL to one key, one content type, and one
/// expiry instant. The store recomputes this from the incoming request, so
/// a mismatched `Content-Type` header fails verification there.
pub fn upload_signature(secret: &[u8; 32], key: &str, content_type: &str, expires: i64) -> String {
    let mut hasher = blake3::Hasher::new_keyed(secret);
    hasher.update(key.as_bytes());
    hasher.update(b"\n");
    hasher.update(content_type.as_bytes());
    hasher.update(b"\n");
    hasher.update(expires.to_string().as_bytes());
    hasher.finalize().to_hex().to_string()
}

pub(crate) fn random_hex(bytes: usize) -> Result<String> {
    let mut buf = vec![0u8; bytes];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(bytes * 2);
    for b in &buf {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}
