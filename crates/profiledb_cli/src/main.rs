//! profiledb server binary.
//!
//! Loads a schema, opens a store and serves the profile endpoint over
//! HTTP until stopped.

use clap::Parser;
use profiledb_schema::SchemaRegistry;
use profiledb_server::http;
use profiledb_server::{Dispatcher, ServerConfig, DEFAULT_PORT};
use profiledb_store::{FileStore, MemoryStore, ProfileStore};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Schema-validated player-profile server.
#[derive(Parser)]
#[command(name = "profiledb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(default_value = "::")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Schema file: a JSON object mapping field names to type tags
    #[arg(long)]
    schema: PathBuf,

    /// Directory for persistent records; in-memory store when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins; the --debug flag only sets the fallback level.
    let fallback = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let schema_bytes = std::fs::read(&cli.schema)?;
    let registry = Arc::new(SchemaRegistry::from_json(&schema_bytes)?);
    tracing::info!(
        schema = %cli.schema.display(),
        fields = registry.len(),
        "schema loaded"
    );

    let store: Arc<dyn ProfileStore> = match &cli.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using file store");
            Arc::new(FileStore::open(dir)?)
        }
        None => {
            tracing::warn!("no --data-dir given; records will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let dispatcher = Arc::new(Dispatcher::with_profile(registry, store));
    let config = ServerConfig::new(SocketAddr::from((cli.host, cli.port)));
    http::serve(&config, dispatcher).await?;
    Ok(())
}
