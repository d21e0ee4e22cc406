//! `delete` -- remove groups and their routes from the router.

use fqroute_core::Engine;

use crate::cli::DeleteArgs;
use crate::error::CliError;
use crate::output;

pub async fn handle(engine: &Engine<'_>, args: &DeleteArgs, quiet: bool) -> Result<(), CliError> {
    let report = engine.delete(&args.groups).await?;
    output::print_applied(&report, quiet);
    Ok(())
}
