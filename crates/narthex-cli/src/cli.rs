use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "narthex",
    about = "Narthex — write-once key registration over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve PUT /register/0x<id> requests
    Serve(ServeArgs),
    /// List registered key identifiers
    List(ListArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Directory holding the key records
    #[arg(short = 'r', long)]
    pub root: Option<PathBuf>,
    /// Address to bind on
    #[arg(short = 'i', long)]
    pub ip: Option<IpAddr>,
    /// Port to bind on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,
    /// TOML configuration file; flags override its values
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Largest accepted request body in bytes
    #[arg(long)]
    pub max_body: Option<usize>,
    /// Skip fsync before answering 201
    #[arg(long)]
    pub no_sync: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Directory holding the key records
    #[arg(short = 'r', long, default_value = ".")]
    pub root: PathBuf,
}
