use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;

use bistro::media::{FileSpec, KeyMinter, MillisEntropyMinter, SignedUrl};
use bistro::model::{CreateRestaurant, RestaurantRecord, UpdateRestaurant};

#[path = "bistro_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "bistro_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "bistro_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "bistro_server/auth.rs"]
mod auth;
use self::auth::*;
#[path = "bistro_server/handlers_system.rs"]
mod handlers_system;
use self::handlers_system::*;
#[path = "bistro_server/handlers_media.rs"]
mod handlers_media;
use self::handlers_media::*;
#[path = "bistro_server/handlers_restaurants.rs"]
mod handlers_restaurants;
use self::handlers_restaurants::*;
#[path = "bistro_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "bistro_server/runtime.rs"]
mod runtime;

struct AppState {
    data_dir: PathBuf,

    /// Base URL baked into issued upload URLs.
    external_base: String,

    admin_token_hash: String,

    /// Per-boot secret keying upload-URL signatures. Rotating it on
    /// restart invalidates outstanding URLs, which the short expiry
    /// window already bounds.
    url_secret: [u8; 32],

    signed_url_ttl_secs: i64,

    minter: Box<dyn KeyMinter>,

    records: RwLock<HashMap<String, RestaurantRecord>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
