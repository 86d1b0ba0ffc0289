use std::path::PathBuf;

use anyhow::{Context, Result};

use bistro::commit::commit;
use bistro::gallery::{EntryKind, StagedGallery};
use bistro::model::{RemoteConfig, UpdateRestaurant};
use bistro::previews::FilePreviews;
use bistro::remote::ApiClient;
use bistro::store::LocalStore;

use crate::{Commands, ImagesCommands};

pub(crate) fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init { force, path } => {
            let root = match path {
                Some(path) => path,
                None => std::env::current_dir().context("resolve current dir")?,
            };
            LocalStore::init(&root, force)?;
            println!("Initialized {}", LocalStore::bistro_dir(&root).display());
        }

        Commands::Login {
            url,
            token,
            record,
            public_base,
        } => {
            let store = open_store()?;
            let mut cfg = store.read_config()?;
            cfg.remote = Some(RemoteConfig {
                base_url: url.trim_end_matches('/').to_string(),
                token,
                record_id: record,
                public_base,
            });
            store.write_config(&cfg)?;
            println!("Remote configured");
        }

        Commands::Remote { json } => {
            let store = open_store()?;
            let cfg = store.read_config()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cfg.remote).context("serialize remote json")?
                );
            } else if let Some(remote) = cfg.remote {
                println!("url: {}", remote.base_url);
                println!("record: {}", remote.record_id);
                println!("public base: {}", remote.display_base());
            } else {
                println!("No remote configured");
            }
        }

        Commands::Show { json } => {
            let client = require_client()?;
            let record = client.fetch_record()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&record).context("serialize record json")?
                );
            } else {
                println!("name: {}", record.name);
                if let Some(description) = &record.description {
                    println!("description: {}", description);
                }
                if let Some(address) = &record.address {
                    println!("address: {}", address);
                }
                if let Some(phone) = &record.phone_number {
                    println!("phone: {}", phone);
                }
                println!("images: {}", record.images.len());
                for day in &record.opening_hours {
                    let windows = day
                        .windows
                        .iter()
                        .map(|w| format!("{}-{}", w.from, w.to))
                        .collect::<Vec<_>>()
                        .join(", ");
                    if day.open {
                        println!("{}: {}", day.day, windows);
                    } else {
                        println!("{}: closed", day.day);
                    }
                }
            }
        }

        Commands::Update {
            name,
            description,
            address,
            phone,
        } => {
            if name.is_none() && description.is_none() && address.is_none() && phone.is_none() {
                anyhow::bail!("nothing to update (pass --name, --description, --address or --phone)");
            }
            let client = require_client()?;
            let record = client.patch_record(&UpdateRestaurant {
                name,
                description,
                address,
                phone_number: phone,
                ..Default::default()
            })?;
            println!("Updated {}", record.name);
        }

        Commands::Images { command } => handle_images_command(command)?,
    }

    Ok(())
}

fn handle_images_command(command: ImagesCommands) -> Result<()> {
    match command {
        ImagesCommands::List { json } => {
            let client = require_client()?;
            let record = client.fetch_record()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&record.images)
                        .context("serialize images json")?
                );
            } else if record.images.is_empty() {
                println!("No images");
            } else {
                for (i, key) in record.images.iter().enumerate() {
                    println!("{:>3}  {}  {}", i, key.as_str(), client.display_url(key));
                }
            }
        }

        ImagesCommands::Sync {
            add,
            remove,
            moves,
            dry_run,
            json,
        } => images_sync(add, remove, moves, dry_run, json)?,
    }

    Ok(())
}

fn images_sync(
    add: Vec<PathBuf>,
    remove: Vec<String>,
    moves: Vec<String>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let store = open_store()?;
    let remote = require_remote(&store)?;
    let client = ApiClient::new(remote)?;

    for file in &add {
        if !file.is_file() {
            anyhow::bail!("not a file: {}", file.display());
        }
    }
    let moves = moves
        .iter()
        .map(|spec| parse_move(spec))
        .collect::<Result<Vec<_>>>()?;

    let mut previews = FilePreviews::new(store.previews_dir());
    let mut gallery = StagedGallery::new();

    let record = client.fetch_record()?;
    gallery.seed(&record.images, &mut previews)?;

    for key in &remove {
        let id = gallery
            .find_by_key(key)
            .with_context(|| format!("no staged image with key {}", key))?;
        gallery.remove(&id, &mut previews);
    }
    gallery.add_local(&add, &mut previews)?;
    for (from, to) in moves {
        gallery.reorder(from, to);
    }

    if dry_run {
        print_plan(&gallery);
        gallery.discard(&mut previews);
        return Ok(());
    }

    // One CLI invocation is one edit session: even on a failed save the
    // session ends here, so its previews are released either way.
    let outcome = commit(&mut gallery, &mut previews, &client);
    gallery.discard(&mut previews);
    let summary = outcome?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "images": summary.images,
                "uploaded": summary.uploaded,
                "deleteRequested": summary.delete_requested,
            }))
            .context("serialize sync summary")?
        );
    } else {
        println!(
            "Saved {} images ({} uploaded, {} delete requests)",
            summary.images.len(),
            summary.uploaded,
            summary.delete_requested
        );
    }

    Ok(())
}

fn print_plan(gallery: &StagedGallery) {
    let uploads = gallery.pending_uploads();
    let deletes = gallery.pending_delete_keys();

    if uploads.is_empty() && deletes.is_empty() {
        println!("Plan: reorder only");
    } else {
        println!("Plan:");
        for upload in &uploads {
            println!("  upload {}", upload.spec.filename);
        }
        for key in &deletes {
            println!("  delete {}", key.as_str());
        }
    }

    println!("Final order:");
    let mut slot = 0usize;
    for item in gallery.items() {
        match item.kind() {
            EntryKind::Remote { key } => {
                println!("{:>3}  {}", slot, key.as_str());
                slot += 1;
            }
            EntryKind::Local { filename, .. } => {
                println!("{:>3}  (new) {}", slot, filename);
                slot += 1;
            }
            EntryKind::PendingDelete { .. } => {}
        }
    }
}

fn parse_move(spec: &str) -> Result<(usize, usize)> {
    let (from, to) = spec
        .split_once(':')
        .with_context(|| format!("expected FROM:TO, got {}", spec))?;
    let from = from
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid FROM index in {}", spec))?;
    let to = to
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid TO index in {}", spec))?;
    Ok((from, to))
}

fn open_store() -> Result<LocalStore> {
    let cwd = std::env::current_dir().context("resolve current dir")?;
    LocalStore::open(&cwd)
}

fn require_remote(store: &LocalStore) -> Result<RemoteConfig> {
    store
        .read_config()?
        .remote
        .context("no remote configured (run `bistro login --url ... --token ... --record ...`)")
}

fn require_client() -> Result<ApiClient> {
    let store = open_store()?;
    let remote = require_remote(&store)?;
    ApiClient::new(remote)
}
