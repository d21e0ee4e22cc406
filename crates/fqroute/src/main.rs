mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use fqroute_api::{RciClient, TransportConfig};
use fqroute_core::{Engine, UrlCache};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let cache_dir = cli
        .global
        .cache_dir
        .clone()
        .unwrap_or_else(config::default_cache_dir);
    let url_cache = UrlCache::with_default_ttl(cache_dir);

    match cli.command {
        // Cache maintenance needs no router connection.
        Command::Cache(ref args) => commands::cache_cmd::handle(args, &url_cache, cli.global.quiet),

        ref command => {
            let client = connect(&cli.global).await?;
            let mut engine = Engine::new(&client, url_cache);

            match command {
                Command::Apply => {
                    commands::apply::handle(&mut engine, &cli.global.config, false, cli.global.quiet)
                        .await
                }
                Command::Plan => {
                    commands::apply::handle(&mut engine, &cli.global.config, true, cli.global.quiet)
                        .await
                }
                Command::Delete(args) => {
                    commands::delete::handle(&engine, args, cli.global.quiet).await
                }
                Command::Cache(_) => unreachable!("handled above"),
            }
        }
    }
}

/// Build an authenticated RCI client from the global flags.
async fn connect(global: &cli::GlobalOpts) -> Result<RciClient, CliError> {
    let router = global.router.as_deref().ok_or(CliError::NoRouter)?;
    let (login, password) = match (global.login.as_deref(), global.password.as_deref()) {
        (Some(login), Some(password)) => (login, password),
        _ => return Err(CliError::NoCredentials),
    };

    let transport = TransportConfig {
        danger_accept_invalid_certs: global.insecure,
        timeout: Duration::from_secs(global.timeout),
        cookie_jar: None,
    };
    let client = RciClient::new(router, &transport)?;

    let password = SecretString::from(password.to_owned());
    client.login(login, &password).await?;

    Ok(client)
}
