//! Status command - shows server health and session counters.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;
use crate::client::Client;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also show session activity counters
    #[arg(short, long)]
    pub detailed: bool,
}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    running: bool,
    version: Option<String>,
    server_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracked: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stale: Option<usize>,
}

/// Run the status command.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let client = Client::new(&ctx.server_url)?;

    let health = match client.health().await {
        Ok(health) => health,
        Err(e) => {
            print_not_running(ctx, &e)?;
            return Ok(());
        }
    };

    // Counters are best effort; an older server may not expose them.
    let stats = if args.detailed || ctx.json_output {
        client.session_stats().await.ok()
    } else {
        None
    };

    if ctx.json_output {
        let output = StatusOutput {
            running: true,
            version: Some(health.version),
            server_url: ctx.server_url.clone(),
            tracked: stats.as_ref().map(|s| s.tracked),
            stale: stats.as_ref().map(|s| s.stale),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let green = Style::new().green();
    let dim = Style::new().dim();

    println!();
    println!("{}", style("Heirloom Server Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!(
        "  {} {}",
        dim.apply_to("Status:"),
        green.apply_to(format!("● {}", health.status))
    );
    println!("  {} {}", dim.apply_to("Version:"), health.version);
    println!("  {} {}", dim.apply_to("Server:"), ctx.server_url);

    if args.detailed {
        println!();
        println!("{}", dim.apply_to("─".repeat(40)));
        println!();
        match stats {
            Some(stats) => {
                println!("  {} {}", dim.apply_to("Tracked:"), stats.tracked);
                println!("  {} {}", dim.apply_to("Stale:"), stats.stale);
                println!(
                    "  {} {} ms",
                    dim.apply_to("Idle timeout:"),
                    stats.idle_timeout_ms
                );
                println!(
                    "  {} {} ms",
                    dim.apply_to("Sweep interval:"),
                    stats.sweep_interval_ms
                );
            }
            None => println!("  {} unavailable", dim.apply_to("Sessions:")),
        }
    }

    println!();
    Ok(())
}

fn print_not_running(ctx: &Context, error: &anyhow::Error) -> Result<()> {
    if ctx.json_output {
        let output = StatusOutput {
            running: false,
            version: None,
            server_url: ctx.server_url.clone(),
            tracked: None,
            stale: None,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let red = Style::new().red();
    let dim = Style::new().dim();

    println!();
    println!("{}", style("Heirloom Server Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!(
        "  {} {}",
        dim.apply_to("Status:"),
        red.apply_to("● not running")
    );
    println!("  {} {}", dim.apply_to("Server:"), ctx.server_url);

    if ctx.verbose {
        println!();
        println!("  {} {}", dim.apply_to("Error:"), error);
    }

    println!();
    println!(
        "  {}",
        dim.apply_to("Start the server with: heirloom start")
    );
    println!();
    Ok(())
}
