mod common;

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

fn run_bistro_in(dir: &Path, args: &[&str]) -> Result<String> {
    let out = Command::new(env!("CARGO_BIN_EXE_bistro"))
        .current_dir(dir)
        .args(args)
        .output()
        .with_context(|| format!("run bistro {:?}", args))?;

    if !out.status.success() {
        anyhow::bail!(
            "bistro {:?} failed (status {:?})\nstdout:\n{}\nstderr:\n{}",
            args,
            out.status,
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

#[test]
fn cli_edits_the_gallery_end_to_end() -> Result<()> {
    let server = common::spawn_server()?;
    let record_id = common::create_record(
        &server,
        serde_json::json!({"name": "Chez Nous", "images": ["restaurants/images/0-seed.jpg"]}),
    )?;

    let workspace = tempfile::tempdir().context("workspace tempdir")?;
    let photo = workspace.path().join("terrace.png");
    std::fs::write(&photo, b"png bytes")?;

    run_bistro_in(workspace.path(), &["init"])?;
    run_bistro_in(
        workspace.path(),
        &[
            "login",
            "--url",
            &server.base_url,
            "--token",
            &server.token,
            "--record",
            &record_id,
        ],
    )?;

    // Dry run prints the plan and persists nothing.
    let plan = run_bistro_in(
        workspace.path(),
        &["images", "sync", "--add", "terrace.png", "--dry-run"],
    )?;
    assert!(plan.contains("upload terrace.png"), "plan:\n{}", plan);
    let listed = run_bistro_in(workspace.path(), &["images", "list", "--json"])?;
    let keys: Vec<String> = serde_json::from_str(&listed).context("parse list json")?;
    assert_eq!(keys, vec!["restaurants/images/0-seed.jpg".to_string()]);

    // Real sync: add the photo, move it in front of the seed key.
    let out = run_bistro_in(
        workspace.path(),
        &[
            "images", "sync", "--add", "terrace.png", "--move", "1:0", "--json",
        ],
    )?;
    let summary: serde_json::Value = serde_json::from_str(&out).context("parse sync json")?;
    assert_eq!(summary["uploaded"], 1);

    let images = summary["images"].as_array().context("images array")?;
    assert_eq!(images.len(), 2);
    let minted = images[0].as_str().context("minted key")?;
    assert!(minted.ends_with(".png"), "key {}", minted);
    assert_eq!(images[1], "restaurants/images/0-seed.jpg");

    // Remove the seed key in a second session.
    let out = run_bistro_in(
        workspace.path(),
        &[
            "images",
            "sync",
            "--remove",
            "restaurants/images/0-seed.jpg",
            "--json",
        ],
    )?;
    let summary: serde_json::Value = serde_json::from_str(&out).context("parse sync json")?;
    assert_eq!(summary["deleteRequested"], 1);
    assert_eq!(summary["images"], serde_json::json!([minted]));

    // No stale previews survive the sessions.
    let previews_dir = workspace.path().join(".bistro/previews");
    let leftover = std::fs::read_dir(&previews_dir)
        .context("read previews dir")?
        .count();
    assert_eq!(leftover, 0, "preview cache must be empty between sessions");

    Ok(())
}
