use super::*;

pub(crate) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

pub(crate) fn records_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("restaurants")
}

pub(crate) fn record_path(data_dir: &std::path::Path, id: &str) -> PathBuf {
    records_dir(data_dir).join(format!("{}.json", id))
}

pub(crate) fn object_path(data_dir: &std::path::Path, key: &str) -> PathBuf {
    data_dir.join("objects").join(key)
}

pub(crate) fn persist_record(state: &AppState, record: &RestaurantRecord) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(record).context("serialize record")?;
    write_atomic_overwrite(&record_path(&state.data_dir, &record.id), &bytes)
        .context("write record json")?;
    Ok(())
}

pub(crate) fn remove_record_file(state: &AppState, id: &str) -> Result<()> {
    let path = record_path(&state.data_dir, id);
    std::fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
    Ok(())
}

/// Hydrate records from disk so the dev server survives restarts.
pub(crate) fn load_records_from_disk(
    state: &AppState,
) -> Result<HashMap<String, RestaurantRecord>> {
    let mut out = HashMap::new();
    let dir = records_dir(&state.data_dir);
    if !dir.is_dir() {
        return Ok(out);
    }

    for entry in std::fs::read_dir(&dir).context("read restaurants dir")? {
        let entry = entry.context("read restaurants dir entry")?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let record: RestaurantRecord =
            serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
        out.insert(record.id.clone(), record);
    }

    Ok(out)
}

pub(crate) fn write_atomic_overwrite(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
