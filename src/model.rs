use serde::{Deserialize, Serialize};

/// Storage-relative identifier of an object in the media store, e.g.
/// `restaurants/images/1754000000000-a1b2c3d4.jpg`. The public display URL
/// is the object store's public base with the key appended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(pub String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub token: String,
    pub record_id: String,

    /// Public base for image display URLs. When unset the server's own
    /// `/storage/` route is used.
    #[serde(default)]
    pub public_base: Option<String>,
}

impl RemoteConfig {
    pub fn display_base(&self) -> String {
        match &self.public_base {
            Some(base) if base.ends_with('/') => base.clone(),
            Some(base) => format!("{}/", base),
            None => format!("{}/storage/", self.base_url),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningDay {
    pub day: String,
    pub open: bool,

    #[serde(default)]
    pub windows: Vec<TimeWindow>,
}

/// The business record. `images` is order-significant: position in the
/// list is display position on the public page.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub images: Vec<StorageKey>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub opening_hours: Vec<OpeningDay>,

    #[serde(default)]
    pub phone_number: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// Partial update: only fields present in the body are applied. `images`
/// replaces the whole stored list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<StorageKey>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Vec<OpeningDay>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurant {
    pub name: String,

    #[serde(default)]
    pub images: Vec<StorageKey>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub opening_hours: Vec<OpeningDay>,

    #[serde(default)]
    pub phone_number: Option<String>,
}
