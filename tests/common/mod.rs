use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    pub token: String,
    _own_dir: Option<tempfile::TempDir>,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_with_args(&[])
}

pub fn spawn_server_with_args(extra_args: &[&str]) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let path = data_dir.path().to_path_buf();
    spawn_server_in(&path, extra_args, Some(data_dir))
}

/// Spawn against a caller-owned data dir (restart scenarios).
#[allow(dead_code)]
pub fn spawn_server_at(data_dir: &Path) -> Result<ServerGuard> {
    spawn_server_in(data_dir, &[], None)
}

fn spawn_server_in(
    data_dir: &Path,
    extra_args: &[&str],
    own_dir: Option<tempfile::TempDir>,
) -> Result<ServerGuard> {
    let token = "dev".to_string();
    let addr_file = data_dir.join("addr.txt");
    let _ = std::fs::remove_file(&addr_file);

    let mut args = vec![
        "--addr".to_string(),
        "127.0.0.1:0".to_string(),
        "--addr-file".to_string(),
        addr_file.to_str().unwrap().to_string(),
        "--data-dir".to_string(),
        data_dir.to_str().unwrap().to_string(),
        "--admin-token".to_string(),
        token.clone(),
    ];
    args.extend(extra_args.iter().map(|s| s.to_string()));

    let child = Command::new(env!("CARGO_BIN_EXE_bistro-server"))
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn bistro-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        token,
        _own_dir: own_dir,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

#[allow(dead_code)]
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Create a record and return its id.
#[allow(dead_code)]
pub fn create_record(server: &ServerGuard, body: serde_json::Value) -> Result<String> {
    let client = reqwest::blocking::Client::new();
    let record: serde_json::Value = client
        .post(format!("{}/restaurants", server.base_url))
        .header(reqwest::header::AUTHORIZATION, auth_header(&server.token))
        .json(&body)
        .send()
        .context("create record")?
        .error_for_status()
        .context("create record status")?
        .json()
        .context("parse created record")?;

    record
        .get("id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("created record has no id")
}
