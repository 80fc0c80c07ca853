//! CLI argument definitions for Yonder.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `geocode` | Look up one address with every active provider |
//! | `providers` | List the configured providers |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `3000` | Per-request timeout in ms |
//! | `-v` | off | Raise log verbosity (repeatable) |
//!
//! # Examples
//!
//! ```bash
//! yonder geocode "1600 Amphitheatre Pkwy, Mountain View"
//! yonder geocode "10 Downing St" --provider nominatim --provider esri --format table
//! yonder geocode "Main St" --format ndjson --country US
//! ```

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use yonder_core::{ProviderId, DEFAULT_TIMEOUT_MS};

/// Compare geocoding results from several providers side by side.
#[derive(Debug, Parser)]
#[command(
    name = "yonder",
    author,
    version,
    about = "Side-by-side geocoding across OpenCage, Nominatim, Esri and Gisgraphy"
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: The full result set once every provider has settled
    /// - ndjson: One line per slot as it settles, then a summary line
    /// - table: Aligned columns for terminal display
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Raise log verbosity on stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Geocode one address with every active provider.
    Geocode(GeocodeArgs),
    /// List the configured providers and their display colors.
    Providers,
}

#[derive(Debug, Clone, Args)]
pub struct GeocodeArgs {
    /// Free-form address, passed to every provider as typed.
    pub address: String,

    /// Provider to query. Repeat to select several; defaults to all.
    #[arg(long = "provider", value_name = "ID", value_parser = parse_provider)]
    pub providers: Vec<ProviderId>,

    /// ISO country code narrowing Gisgraphy lookups.
    #[arg(long)]
    pub country: Option<String>,

    /// OpenCage API key. Falls back to `YONDER_OPENCAGE_API_KEY` / `OPENCAGE_API_KEY`.
    #[arg(long, value_name = "KEY")]
    pub opencage_key: Option<String>,

    /// Print each provider's raw record under its table row.
    #[arg(long, default_value_t = false)]
    pub raw: bool,
}

fn parse_provider(value: &str) -> Result<ProviderId, yonder_core::ValidationError> {
    value.parse()
}
