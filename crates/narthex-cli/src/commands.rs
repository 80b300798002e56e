use std::net::SocketAddr;

use anyhow::Context;
use colored::Colorize;
use narthex_server::{NarthexServer, ServerConfig};
use narthex_store::{FsKeyStore, KeyStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::List(args) => cmd_list(args),
    }
}

/// Config file (or defaults) with command-line flags layered on top.
pub fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(root) = &args.root {
        config.store_root = root.clone();
    }
    if let Some(ip) = args.ip {
        config.bind_addr = SocketAddr::new(ip, config.bind_addr.port());
    }
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    if let Some(max_body) = args.max_body {
        config.max_body_size = max_body;
    }
    if args.no_sync {
        config.sync_on_write = false;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    println!(
        "{} narthex on {} (root: {})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.store_root.display()
    );

    let server = NarthexServer::new(config).context("failed to open key store")?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let store = FsKeyStore::open(&args.root)
        .with_context(|| format!("failed to open key store {}", args.root.display()))?;
    let ids = store.list()?;
    if ids.is_empty() {
        println!("No keys registered.");
        return Ok(());
    }
    for id in &ids {
        println!("  {}", id.to_string().yellow());
    }
    println!("{} {} keys registered", "✓".green(), ids.len().to_string().bold());
    Ok(())
}
