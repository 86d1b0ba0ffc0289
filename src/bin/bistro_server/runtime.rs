use super::*;

#[derive(Parser)]
#[command(name = "bistro-server")]
#[command(about = "Bistro admin API and dev object store", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory (records and stored objects)
    #[arg(long, default_value = "./bistro-data")]
    data_dir: PathBuf,

    /// Admin bearer token
    #[arg(long, default_value = "dev")]
    admin_token: String,

    /// Base URL baked into issued upload URLs (defaults to the bound address)
    #[arg(long)]
    external_url: Option<String>,

    /// Issued upload URL lifetime in seconds
    #[arg(long, default_value_t = bistro::media::SIGNED_URL_TTL_SECS)]
    signed_url_ttl_secs: i64,
}

pub(crate) async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;

    let external_base = args
        .external_url
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| format!("http://{}", local_addr));

    let mut url_secret = [0u8; 32];
    getrandom::getrandom(&mut url_secret).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;

    let state = Arc::new(AppState {
        data_dir: args.data_dir,
        external_base,
        admin_token_hash: hash_token(&args.admin_token),
        url_secret,
        signed_url_ttl_secs: args.signed_url_ttl_secs,
        minter: Box::new(MillisEntropyMinter),
        records: RwLock::new(HashMap::new()),
    });

    let loaded = load_records_from_disk(state.as_ref()).context("load records from disk")?;
    {
        let mut records = state.records.write().await;
        *records = loaded;
    }

    let app = build_router(state);

    tracing::info!("bistro-server listening on {}", local_addr);
    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
