//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration as TOML
    Show,

    /// Show which config files are loaded and their precedence
    Path,

    /// Write a config file with default values
    Init {
        /// Create project-local config (./heirloom.toml) instead of user config
        #[arg(long)]
        local: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { local } => cmd_init(local),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = heirloom_config::load_config(None)?;

    // Fill in absent sections so the output shows effective values.
    let mut effective = loaded.config.clone();
    effective.server = Some(loaded.config.server_or_default());
    effective.session = Some(loaded.config.session_or_default());
    effective.auth = Some(loaded.config.auth_or_default());

    if ctx.json_output {
        let sources: Vec<String> = loaded
            .loaded_from()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let output = serde_json::json!({
            "sources": sources,
            "warnings": loaded.warnings,
            "config": serde_json::to_value(&effective)?,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("# No config files loaded (using defaults)");
    } else {
        for source in &sources {
            println!("# Loaded: {}", source.display());
        }
    }
    for warning in &loaded.warnings {
        println!("# warning: {}", warning);
    }
    println!();
    print!("{}", effective.to_toml()?);

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let loaded = heirloom_config::load_config(None)?;

    if ctx.json_output {
        let sources: Vec<serde_json::Value> = loaded
            .sources
            .iter()
            .map(|s| {
                serde_json::json!({
                    "path": s.path.display().to_string(),
                    "loaded": s.loaded,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    println!("Config file search order (later overrides earlier):\n");

    for source in &loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }

    println!();
    let loaded_count = loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found. Run 'heirloom config init' to create one.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

fn cmd_init(local: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from("heirloom.toml")
    } else {
        heirloom_config::xdg_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
    };

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    let mut config = heirloom_config::HeirloomConfig::new();
    config.server = Some(heirloom_config::ServerConfig::default());
    config.session = Some(heirloom_config::SessionConfig::default());

    heirloom_config::save_config(&config, &path)?;
    println!("Created config file: {}", path.display());

    Ok(())
}
