use super::*;

pub(crate) fn hash_token(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

/// Admin bearer check for every route except health and the storage
/// capability URLs. Tokens are compared by hash.
pub(crate) async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };

    let Ok(value) = value.to_str() else {
        return unauthorized();
    };

    let Some(token) = value.strip_prefix("Bearer ") else {
        return unauthorized();
    };

    if hash_token(token) != state.admin_token_hash {
        return unauthorized();
    }

    next.run(req).await
}
