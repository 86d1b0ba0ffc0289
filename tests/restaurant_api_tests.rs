mod common;

use anyhow::{Context, Result};

#[test]
fn record_crud_and_partial_patch() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();
    let auth = common::auth_header(&server.token);

    let id = common::create_record(
        &server,
        serde_json::json!({
            "name": "Chez Nous",
            "description": "Neighborhood bistro",
            "openingHours": [
                {"day": "monday", "open": false, "windows": []},
                {"day": "tuesday", "open": true, "windows": [{"from": "11:30", "to": "14:00"}]}
            ]
        }),
    )?;

    // Fetch round-trips the created fields; images default to empty.
    let record: serde_json::Value = client
        .get(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .send()
        .context("get record")?
        .error_for_status()?
        .json()
        .context("parse record")?;
    assert_eq!(record["name"], "Chez Nous");
    assert_eq!(record["images"], serde_json::json!([]));
    assert_eq!(record["openingHours"][1]["windows"][0]["from"], "11:30");

    // Patch one field; the others survive.
    let patched: serde_json::Value = client
        .patch(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({"address": "12 rue des Fleurs"}))
        .send()
        .context("patch record")?
        .error_for_status()?
        .json()
        .context("parse patched record")?;
    assert_eq!(patched["address"], "12 rue des Fleurs");
    assert_eq!(patched["name"], "Chez Nous");
    assert_eq!(patched["description"], "Neighborhood bistro");

    // Image patch replaces the whole list and preserves order.
    let patched: serde_json::Value = client
        .patch(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({
            "images": ["restaurants/images/2-b.jpg", "restaurants/images/1-a.jpg"]
        }))
        .send()
        .context("patch images")?
        .error_for_status()?
        .json()
        .context("parse patched record")?;
    assert_eq!(
        patched["images"],
        serde_json::json!(["restaurants/images/2-b.jpg", "restaurants/images/1-a.jpg"])
    );

    // Listing includes the record.
    let listed: serde_json::Value = client
        .get(format!("{}/restaurants", server.base_url))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .send()
        .context("list records")?
        .error_for_status()?
        .json()
        .context("parse list")?;
    assert!(listed.as_array().unwrap().iter().any(|r| r["id"] == id.as_str()));

    // Delete, then 404.
    let deleted = client
        .delete(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .send()
        .context("delete record")?;
    assert!(deleted.status().is_success());

    let missing = client
        .get(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .send()
        .context("get deleted record")?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    Ok(())
}

#[test]
fn record_validation_rejects_bad_input() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();
    let auth = common::auth_header(&server.token);

    // Empty name on create.
    let bad = client
        .post(format!("{}/restaurants", server.base_url))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({"name": "  "}))
        .send()
        .context("create with empty name")?;
    assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);

    let id = common::create_record(&server, serde_json::json!({"name": "Chez Nous"}))?;

    // Malformed time window.
    let bad = client
        .patch(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({
            "openingHours": [{"day": "monday", "open": true, "windows": [{"from": "25:00", "to": "26:00"}]}]
        }))
        .send()
        .context("patch bad window")?;
    assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);

    // Traversing storage key in the image list.
    let bad = client
        .patch(format!("{}/restaurants/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({"images": ["../../etc/passwd"]}))
        .send()
        .context("patch bad key")?;
    assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);

    // Unknown record id.
    let missing = client
        .patch(format!("{}/restaurants/nope", server.base_url))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({"name": "X"}))
        .send()
        .context("patch unknown record")?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    Ok(())
}

#[test]
fn records_survive_a_server_restart() -> Result<()> {
    // Same data dir, two server processes: the second must hydrate the
    // record written by the first.
    let data_dir = tempfile::tempdir().context("tempdir")?;
    let client = reqwest::blocking::Client::new();

    let first = spawn_on(&data_dir)?;
    let id = common::create_record(&first, serde_json::json!({"name": "Chez Nous"}))?;
    drop(first);

    let second = spawn_on(&data_dir)?;
    let record: serde_json::Value = client
        .get(format!("{}/restaurants/{}", second.base_url, id))
        .header(
            reqwest::header::AUTHORIZATION,
            common::auth_header(&second.token),
        )
        .send()
        .context("get record after restart")?
        .error_for_status()
        .context("get record after restart status")?
        .json()
        .context("parse record")?;
    assert_eq!(record["name"], "Chez Nous");

    Ok(())
}

fn spawn_on(data_dir: &tempfile::TempDir) -> Result<common::ServerGuard> {
    common::spawn_server_at(data_dir.path())
}
