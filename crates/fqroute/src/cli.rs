//! Clap derive structures for the `fqroute` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fqroute -- declarative domain-based routing for consumer routers
#[derive(Debug, Parser)]
#[command(
    name = "fqroute",
    version,
    about = "Route traffic to selected domains through chosen router interfaces",
    long_about = "Reconciles declared domain groups against the router's \
        FQDN object-groups and dns-proxy routes.\n\n\
        Each run reads the desired groups from a YAML file, fetches the \
        router's actual state, and applies the minimal command batch that \
        converges the two.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Router base URL, e.g. http://192.168.1.1
    #[arg(long, short = 'r', env = "FQROUTE_ROUTER", global = true)]
    pub router: Option<String>,

    /// Router admin login
    #[arg(long, env = "FQROUTE_LOGIN", global = true)]
    pub login: Option<String>,

    /// Router admin password
    #[arg(long, env = "FQROUTE_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Groups declaration file (YAML)
    #[arg(
        long,
        short = 'c',
        env = "FQROUTE_CONFIG",
        default_value = "fqroute.yaml",
        global = true
    )]
    pub config: PathBuf,

    /// Remote-list cache directory (default: platform cache dir)
    #[arg(long, env = "FQROUTE_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FQROUTE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FQROUTE_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile the router to the declared groups
    Apply,

    /// Show the command batch without writing to the router
    #[command(alias = "diff")]
    Plan,

    /// Remove groups (and their routes) from the router
    Delete(DeleteArgs),

    /// Manage the remote-list cache
    Cache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Names of the groups to remove
    #[arg(required = true, value_name = "GROUP")]
    pub groups: Vec<String>,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Delete every cached remote list
    Clear,
}
