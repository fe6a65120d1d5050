#![forbid(unsafe_code)]
//! Loads a node configuration and reports the resulting membership view.

use clap::Parser;
use peerchain::config::load_config;
use peerchain::peer::service;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "peer-status", about = "Show the membership view seeded from a config file")]
struct Args {
    /// Path to the node configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Print the view as JSON instead of log lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)?;
    let service = service::instance(&config)?;
    let registry = service.registry();

    let leader = registry.leader();
    if args.json {
        let view = json!({
            "self": {
                "ip": service.local().ip(),
                "public_key": service.local().public_key(),
                "is_leader": service.is_leader(),
            },
            "max_trust": registry.max_trust(),
            "peers": registry.all_peers(),
            "active": registry.ip_list(),
            "leader": leader,
            "max_faulty": registry.quorum_fault_tolerance(),
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    info!(
        "{} peers known, {} active, tolerating {} faulty",
        registry.len(),
        registry.active_peers().len(),
        registry.quorum_fault_tolerance()
    );
    for node in registry.active_peers() {
        info!("  {} {} trust={}", node.public_key, node.ip, node.trust);
    }
    match leader {
        Some(node) => info!(
            "Leader: {} ({}){}",
            node.public_key,
            node.ip,
            if service.is_leader() { " [self]" } else { "" }
        ),
        None => info!("No active peers; no leader"),
    }
    Ok(())
}
