mod common;

use anyhow::{Context, Result};

#[test]
fn server_route_registration_smoke() -> Result<()> {
    let guard = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    // Public route should be reachable.
    let health = client
        .get(format!("{}/healthz", guard.base_url))
        .send()
        .context("GET /healthz")?;
    assert!(health.status().is_success());

    // Authenticated routes should reject missing auth.
    let unauth = client
        .get(format!("{}/restaurants", guard.base_url))
        .send()
        .context("GET /restaurants without auth")?;
    assert_eq!(unauth.status(), reqwest::StatusCode::UNAUTHORIZED);

    let unauth = client
        .post(format!("{}/media/signed-urls", guard.base_url))
        .json(&serde_json::json!({"files": [{"filename": "a.png", "contentType": "image/png"}]}))
        .send()
        .context("POST /media/signed-urls without auth")?;
    assert_eq!(unauth.status(), reqwest::StatusCode::UNAUTHORIZED);

    let unauth = client
        .delete(format!("{}/media/files?keys=a.png", guard.base_url))
        .send()
        .context("DELETE /media/files without auth")?;
    assert_eq!(unauth.status(), reqwest::StatusCode::UNAUTHORIZED);

    // A wrong token is rejected the same way.
    let wrong = client
        .get(format!("{}/restaurants", guard.base_url))
        .header(reqwest::header::AUTHORIZATION, common::auth_header("nope"))
        .send()
        .context("GET /restaurants with wrong token")?;
    assert_eq!(wrong.status(), reqwest::StatusCode::UNAUTHORIZED);

    // Valid auth reaches the wired routes.
    let repos = client
        .get(format!("{}/restaurants", guard.base_url))
        .header(
            reqwest::header::AUTHORIZATION,
            common::auth_header(&guard.token),
        )
        .send()
        .context("GET /restaurants with auth")?;
    assert!(repos.status().is_success());

    // Unknown routes still 404 through the composed router.
    let missing = client
        .get(format!("{}/definitely-not-a-route", guard.base_url))
        .header(
            reqwest::header::AUTHORIZATION,
            common::auth_header(&guard.token),
        )
        .send()
        .context("GET unknown route")?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    Ok(())
}
