//! consulta binary entry point

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use servidor::{ConsultaServer, ServerConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Reference catalogs and clinical discussion server
#[derive(Parser, Debug)]
#[command(name = "consulta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the formulary, bibliography and clinical discussion API", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host to bind
    #[arg(long = "host")]
    host: Option<String>,

    /// Port to bind
    #[arg(long = "port", short = 'p')]
    port: Option<u16>,

    /// Directory with dataset files replacing the embedded ones
    #[arg(long = "data-dir", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory served as static files
    #[arg(long = "static-dir", value_name = "DIR")]
    static_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    verbose: bool,
}

impl Cli {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = Some(dir);
        }
        if let Some(dir) = self.static_dir {
            config.static_dir = Some(dir);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
    }
}

/// RUST_LOG wins over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    init_logging(&config.log_level);

    info!("Consulta {} starting", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);
    info!(
        "  Data: {}",
        config
            .data_dir
            .as_deref()
            .map_or_else(|| "embedded".to_string(), |d| d.display().to_string())
    );
    info!(
        "  Chat backend: {}",
        if config.anthropic_api_key.is_some() { "configured" } else { "not configured" }
    );

    let server = ConsultaServer::new(config)?;
    info!("Server starting on: {}", server.server_url());
    info!("Press Ctrl+C to stop");

    server.start().await?;

    Ok(())
}
