//! Record fetch and patch paths against the metadata endpoints.

use super::*;

use crate::model::{RestaurantRecord, UpdateRestaurant};

impl ApiClient {
    pub fn fetch_record(&self) -> Result<RestaurantRecord> {
        let resp = with_retries("fetch record", || {
            self.client
                .get(self.url(&format!("/restaurants/{}", self.remote.record_id)))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .send()
                .context("send")
        })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("restaurant record not found: {}", self.remote.record_id);
        }
        let resp = self.ensure_ok(resp, "fetch record")?;
        resp.json().context("parse record")
    }

    /// Partial record update. The server applies only the fields present
    /// in the patch and responds with the updated record.
    pub fn patch_record(&self, patch: &UpdateRestaurant) -> Result<RestaurantRecord> {
        let resp = with_retries("update record", || {
            self.client
                .patch(self.url(&format!("/restaurants/{}", self.remote.record_id)))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .json(patch)
                .send()
                .context("send")
        })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("restaurant record not found: {}", self.remote.record_id);
        }
        let resp = self.ensure_ok(resp, "update record")?;
        resp.json().context("parse updated record")
    }

    /// Whole-field replace of the image list, the commit's sole write to
    /// the record.
    pub fn patch_images(&self, keys: &[StorageKey]) -> Result<RestaurantRecord> {
        self.patch_record(&UpdateRestaurant {
            images: Some(keys.to_vec()),
            ..Default::default()
        })
    }
}
