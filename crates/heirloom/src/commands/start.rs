//! Start command - launches the Heirloom server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use heirloom_config::{ConfigSource, HeirloomConfig, LoadedConfig};
use heirloom_server::{Server, ServerConfig};

use super::Context;

/// Arguments for the start command.
///
/// CLI arguments override config file values.
#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Path to config file (overrides default discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Idle time in milliseconds after which a session expires (overrides config)
    #[arg(long)]
    pub idle_timeout_ms: Option<u64>,

    /// Interval in milliseconds between idle session sweeps (overrides config)
    #[arg(long)]
    pub sweep_interval_ms: Option<u64>,
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    let loaded = load(&args)?;

    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }

    if ctx.verbose {
        let sources = loaded.loaded_from();
        if sources.is_empty() {
            println!("No config files found, using defaults + CLI args");
        } else {
            for source in sources {
                println!("Loaded config: {}", source.display());
            }
        }
    }

    let config = build_server_config(&loaded.config, &args)?;

    if config.auth_tokens.is_empty() && !config.trust_user_header {
        eprintln!(
            "warning: no [auth.tokens] configured; every request is anonymous and no session is tracked"
        );
    }

    println!(
        "Heirloom listening on http://{} (idle timeout {} ms, sweep every {} ms)",
        config.bind_address, config.activity.idle_timeout_ms, config.activity.sweep_interval_ms
    );

    let server = Server::new(config)?;
    server
        .run_with_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received Ctrl-C, shutting down");
            }
        })
        .await?;

    Ok(())
}

/// Load the explicit config file, or discover the layered config.
fn load(args: &StartArgs) -> Result<LoadedConfig> {
    let Some(ref path) = args.config else {
        return Ok(heirloom_config::load_config(None)?);
    };

    let config = heirloom_config::load_config_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    Ok(LoadedConfig {
        config,
        sources: vec![ConfigSource {
            path: path.clone(),
            loaded: true,
        }],
        warnings: Vec::new(),
    })
}

/// Merge file configuration with CLI overrides into a server configuration.
fn build_server_config(config: &HeirloomConfig, args: &StartArgs) -> Result<ServerConfig> {
    let server = config.server_or_default();
    let port = args.port.unwrap_or(server.port);
    let bind = args.bind.clone().unwrap_or(server.bind);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let mut session = config.session_or_default();
    if let Some(idle_timeout_ms) = args.idle_timeout_ms {
        session.idle_timeout_ms = idle_timeout_ms;
    }
    if let Some(sweep_interval_ms) = args.sweep_interval_ms {
        session.sweep_interval_ms = sweep_interval_ms;
    }

    let auth = config.auth_or_default();

    Ok(ServerConfig::new()
        .with_bind_address(addr)
        .with_tokens(auth.tokens.into_iter().collect())
        .with_trust_user_header(auth.trust_user_header)
        .with_request_logging(server.request_logging)
        .with_activity(session.to_activity_config()?))
}
