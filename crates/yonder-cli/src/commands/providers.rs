use std::io;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output;

pub fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let registry = super::registry_builder(cli, None).build()?;

    output::render_providers(
        &mut io::stdout().lock(),
        &registry.descriptors(),
        cli.format,
        cli.pretty,
    )?;

    Ok(ExitCode::SUCCESS)
}
