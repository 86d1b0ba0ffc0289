use anyhow::{Context, Result};

use crate::model::{RemoteConfig, StorageKey};

mod http_client;
use self::http_client::with_retries;

mod media;
mod record;

/// Blocking HTTP client for the admin server, configured from the local
/// store's remote section.
pub struct ApiClient {
    remote: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(remote: RemoteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("bistro")
            .build()
            .context("build reqwest client")?;
        Ok(Self { remote, client })
    }

    pub fn remote(&self) -> &RemoteConfig {
        &self.remote
    }

    /// Public display URL for a stored object.
    pub fn display_url(&self, key: &StorageKey) -> String {
        format!("{}{}", self.remote.display_base(), key.as_str())
    }
}
