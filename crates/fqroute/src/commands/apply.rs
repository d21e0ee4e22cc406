//! `apply` and `plan` -- the reconciliation commands.

use std::path::Path;

use fqroute_core::Engine;

use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    engine: &mut Engine<'_>,
    config_path: &Path,
    dry_run: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let specs = config::load_groups(config_path)?;

    if dry_run {
        let report = engine.plan(&specs).await?;
        output::print_plan(&report);
    } else {
        let report = engine.apply(&specs).await?;
        output::print_applied(&report, quiet);
    }
    Ok(())
}
