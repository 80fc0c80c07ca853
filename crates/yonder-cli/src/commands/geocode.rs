use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use yonder_core::Dispatcher;

use crate::cli::{Cli, GeocodeArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Exit code when at least one provider settled with an error.
const PARTIAL_FAILURE: u8 = 3;

pub async fn run(cli: &Cli, args: &GeocodeArgs) -> Result<ExitCode, CliError> {
    let registry = super::registry_builder(cli, Some(args)).build()?;
    let active = if args.providers.is_empty() {
        registry.ids()
    } else {
        args.providers.clone()
    };

    let mut dispatcher = Dispatcher::new(Arc::new(registry));
    dispatcher.dispatch(&args.address, &active);

    let stdout = io::stdout();
    while let Some(slot) = dispatcher.next_update().await {
        if cli.format == OutputFormat::Ndjson {
            output::write_slot_line(&mut stdout.lock(), &slot)?;
        }
    }

    let results = dispatcher.results();
    output::render_results(
        &mut stdout.lock(),
        &results,
        cli.format,
        cli.pretty,
        args.raw,
    )?;

    let summary = results.summary();
    tracing::debug!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "geocode request settled"
    );

    if summary.failed > 0 {
        return Ok(ExitCode::from(PARTIAL_FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}
