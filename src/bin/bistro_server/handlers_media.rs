use super::*;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct SignedUrlsRequest {
    files: Vec<FileSpec>,
}

/// One signed upload URL per requested file, same order as the input.
/// Any single derivation failure fails the whole batch; callers never see
/// a partial list.
pub(crate) async fn create_signed_urls(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignedUrlsRequest>,
) -> Result<Json<Vec<SignedUrl>>, Response> {
    if req.files.is_empty() {
        return Err(bad_request(anyhow::anyhow!("files must not be empty")));
    }
    for spec in &req.files {
        validate_file_spec(spec).map_err(bad_request)?;
    }

    let expires = time::OffsetDateTime::now_utc().unix_timestamp() + state.signed_url_ttl_secs;

    let mut out = Vec::with_capacity(req.files.len());
    for spec in &req.files {
        let key = match state.minter.mint(&spec.filename) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!("signed url issuance failed for {}: {:#}", spec.filename, err);
                return Err(internal_error(anyhow::anyhow!(
                    "failed to generate upload urls"
                )));
            }
        };
        let sig = bistro::media::upload_signature(
            &state.url_secret,
            key.as_str(),
            &spec.content_type,
            expires,
        );
        out.push(SignedUrl {
            signed_url: format!(
                "{}/storage/{}?expires={}&sig={}",
                state.external_base,
                key.as_str(),
                expires,
                sig
            ),
            key: key.as_str().to_string(),
        });
    }

    Ok(Json(out))
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct DeleteFilesQuery {
    #[serde(default)]
    keys: Option<String>,
}

/// Best-effort batch delete. Every key is attempted independently and
/// failures are logged only; the response is 200 for any well-formed
/// request. An orphaned object is a storage-cost concern, not a
/// correctness one, so this never blocks a save.
pub(crate) async fn delete_files(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DeleteFilesQuery>,
) -> StatusCode {
    let keys = q.keys.as_deref().unwrap_or("");

    for key in keys.split(',').filter(|k| !k.is_empty()) {
        if let Err(err) = remove_object(&state, key) {
            tracing::warn!("failed to delete object {}: {:#}", key, err);
        }
    }

    StatusCode::OK
}

fn remove_object(state: &AppState, key: &str) -> Result<()> {
    validate_storage_key(key)?;
    let path = object_path(&state.data_dir, key);
    std::fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct UploadQuery {
    expires: i64,
    sig: String,
}

/// Direct-to-storage upload. The URL is the capability: the signature is
/// recomputed from the path key, the `Content-Type` header, and the expiry,
/// so a content type other than the one declared at issuance fails here.
pub(crate) async fn put_object(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(q): Query<UploadQuery>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<StatusCode, Response> {
    validate_storage_key(&key).map_err(bad_request)?;

    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Err(bad_request(anyhow::anyhow!("missing content-type header")));
    };

    if time::OffsetDateTime::now_utc().unix_timestamp() > q.expires {
        return Err(forbidden("upload url expired"));
    }

    let expected = bistro::media::upload_signature(&state.url_secret, &key, content_type, q.expires);
    if expected != q.sig {
        return Err(forbidden("upload url signature mismatch"));
    }

    let path = object_path(&state.data_dir, &key);
    write_atomic_overwrite(&path, &body).map_err(internal_error)?;
    Ok(StatusCode::CREATED)
}

/// Public object read; this is what display URLs resolve to.
pub(crate) async fn get_object(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, Response> {
    validate_storage_key(&key).map_err(bad_request)?;

    let path = object_path(&state.data_dir, &key);
    if !path.is_file() {
        return Err(not_found());
    }
    let bytes = std::fs::read(&path)
        .with_context(|| format!("read {}", path.display()))
        .map_err(internal_error)?;

    let content_type =
        bistro::media::content_type_for(&key).unwrap_or("application/octet-stream");
    Ok((
        [(header::CONTENT_TYPE, content_type)],
        axum::body::Bytes::from(bytes),
    )
        .into_response())
}
