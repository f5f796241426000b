use std::{env, sync::Arc, time::Duration};

use tally_backends::{BackendClient, HttpEventStore, HttpUserDirectory};
use tally_server::config::loader::load_config;
use tally_server::{AppState, TallyServer, UsageService};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From TALLY_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (tally.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (TALLY_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    tally_server::observability::init_tracing();

    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = config_path.as_deref().unwrap_or("tally.toml"),
        source = %source,
        "Configuration loaded"
    );

    tally_server::observability::apply_logging_level(&cfg.logging.level);
    tally_server::metrics::init_metrics();

    let store = tally_server::create_snapshot_store(&cfg.redis).await;

    let timeout = Duration::from_millis(cfg.backends.request_timeout_ms);
    let directory =
        match HttpUserDirectory::new(&cfg.backends.directory_url, timeout, cfg.backends.page_size)
        {
            Ok(d) => d,
            Err(e) => {
                eprintln!("User directory client error: {e}");
                std::process::exit(2);
            }
        };
    let events = match HttpEventStore::new(&cfg.backends.events_url, timeout) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Event log client error: {e}");
            std::process::exit(2);
        }
    };
    let client = BackendClient::new(Arc::new(directory), Arc::new(events));

    let ttl = time::Duration::seconds(cfg.cache.ttl_secs as i64);
    let usage = Arc::new(UsageService::new(store, client, cfg.cache.key.clone(), ttl));

    let server = match TallyServer::new(&cfg.server, AppState { usage }) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Server setup error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = server.run().await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

fn resolve_config_path() -> (Option<String>, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (Some(path), ConfigSource::CliArgument);
            }
        }
    }
    if let Ok(path) = env::var("TALLY_CONFIG") {
        return (Some(path), ConfigSource::EnvironmentVariable);
    }
    (None, ConfigSource::Default)
}
