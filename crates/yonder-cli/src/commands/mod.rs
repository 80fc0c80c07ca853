mod geocode;
mod providers;

use std::process::ExitCode;

use yonder_core::{GeocoderConfig, RegistryBuilder};

use crate::cli::{Cli, Command, GeocodeArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Command::Geocode(args) => geocode::run(cli, args).await,
        Command::Providers => providers::run(cli),
    }
}

/// Environment defaults overridden by command-line flags.
fn registry_builder(cli: &Cli, args: Option<&GeocodeArgs>) -> RegistryBuilder {
    let mut config = GeocoderConfig::from_env().with_timeout_ms(cli.timeout_ms);

    if let Some(args) = args {
        if let Some(key) = &args.opencage_key {
            config = config.with_opencage_key(key);
        }
        if let Some(country) = &args.country {
            config = config.with_gisgraphy_country(country);
        }
    }

    RegistryBuilder::new(config)
}
