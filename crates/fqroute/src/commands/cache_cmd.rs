//! `cache` -- local cache maintenance. Needs no router connection.

use fqroute_core::UrlCache;

use crate::cli::{CacheArgs, CacheCommand};
use crate::error::CliError;

pub fn handle(args: &CacheArgs, cache: &UrlCache, quiet: bool) -> Result<(), CliError> {
    match args.command {
        CacheCommand::Clear => {
            cache.clear()?;
            if !quiet {
                println!("Cache cleared: {}", cache.dir().display());
            }
            Ok(())
        }
    }
}
