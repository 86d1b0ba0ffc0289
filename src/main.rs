use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli_exec;

#[derive(Parser)]
#[command(name = "bistro")]
#[command(about = "Restaurant record and gallery administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a client directory (.bistro)
    Init {
        /// Re-initialize if .bistro already exists
        #[arg(long)]
        force: bool,
        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Configure the remote server and record
    Login {
        /// Server base URL, e.g. http://127.0.0.1:8080
        #[arg(long)]
        url: String,
        /// Admin bearer token
        #[arg(long)]
        token: String,
        /// Restaurant record id
        #[arg(long)]
        record: String,
        /// Public base for image display URLs (defaults to <url>/storage/)
        #[arg(long)]
        public_base: Option<String>,
    },

    /// Show the configured remote
    Remote {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and display the restaurant record
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Update plain record fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Inspect or edit the image gallery
    Images {
        #[command(subcommand)]
        command: ImagesCommands,
    },
}

#[derive(Subcommand)]
enum ImagesCommands {
    /// List gallery keys in display order
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Stage gallery edits and save them in one session
    ///
    /// Edits are applied against the current record in a fixed order:
    /// removes, then adds, then moves.
    Sync {
        /// Image file to append (repeatable)
        #[arg(long = "add", value_name = "FILE")]
        add: Vec<PathBuf>,
        /// Storage key to remove (repeatable)
        #[arg(long = "remove", value_name = "KEY")]
        remove: Vec<String>,
        /// Move an entry, as FROM:TO indices (repeatable)
        #[arg(long = "move", value_name = "FROM:TO")]
        moves: Vec<String>,
        /// Print the plan without saving
        #[arg(long)]
        dry_run: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    cli_exec::handle_command(cli.command)
}
