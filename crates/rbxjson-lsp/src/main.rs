use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rbxjson_lsp::config::{self, ServerConfig};
use rbxjson_lsp::schema::MemorySchema;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Language server for rbxjson instance documents, speaking LSP over stdio.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Schema file (classes and enums) to complete against.
    #[arg(long, value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `rbxjson_lsp=trace`. Defaults to `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    // Config errors are reported once logging is up.
    let (config, config_error) = match config::load_config() {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (ServerConfig::default(), Some(e)),
    };
    let config = config.with_overrides(cli.schema, cli.log);

    let filter = match config.log_filter.as_deref() {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        warn!("{e}; using defaults");
    }

    let schema = match config.schema_path.as_deref() {
        Some(path) => MemorySchema::load(path).unwrap_or_else(|e| {
            warn!("{e}; completing without a schema");
            MemorySchema::empty()
        }),
        None => {
            warn!("no schema configured; completing without a schema");
            MemorySchema::empty()
        }
    };

    tokio::runtime::Runtime::new()?.block_on(rbxjson_lsp::run(Arc::new(schema)))
}
