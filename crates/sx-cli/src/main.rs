//! CLI entry point for the simplnx code generators.
//!
//! # Usage
//!
//! ```bash
//! simplnx-gen [OPTIONS] <COMMAND>
//!
//! # Add FromSIMPLJson conversions for two legacy filters
//! simplnx-gen simpl /path/to/complex --simpl-filters {uuid-1} {uuid-2}
//!
//! # Check what would change without writing
//! simplnx-gen simpl /path/to/complex --simpl-filters {uuid-1} --dry-run
//!
//! # Regenerate every ITK wrapper's header, source, test and docs
//! simplnx-gen itk templates json out/Filters out/test out/docs --all --emit all
//! ```
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | fatal error, nothing further written |
//! | 2 | completed, but some artifacts carry warnings |

#![deny(clippy::all)]
#![warn(missing_docs)]

mod itk;
mod simpl;

use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use sx_core::{Config, EmitterKind};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::itk::{ItkOutcome, ItkRequest};
use crate::simpl::{SimplOutcome, SimplRequest};

/// Exit code for a run that finished with emit warnings.
const EXIT_WARNINGS: u8 = 2;

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Code generators for the complex/simplnx filter framework.
///
/// `simpl` converts legacy SIMPL filters in place; `itk` generates ITK
/// filter wrappers from JSON descriptors.
#[derive(Parser)]
#[command(name = "simplnx-gen", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "SIMPLNX_GEN_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Print the run summary as JSON.
    #[arg(long, global = true)]
    json: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Add FromSIMPLJson conversions to existing complex filters.
    Simpl {
        /// Root of the complex source tree.
        complex_source_dir: Utf8PathBuf,

        /// Legacy filter schema JSON (defaults to the configured path).
        #[arg(long)]
        simpl_json: Option<Utf8PathBuf>,

        /// Legacy filter UUIDs to convert.
        #[arg(long, num_args = 1.., required = true)]
        simpl_filters: Vec<String>,

        /// Validate every edit without writing any file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate ITK filter wrappers.
    Itk {
        /// Directory holding filter.hpp.in and filter.cpp.in.
        template_dir: Utf8PathBuf,

        /// Directory holding the <Name>Filter.json descriptors.
        json_dir: Utf8PathBuf,

        /// Output directory for filter headers and sources.
        filter_output_dir: Utf8PathBuf,

        /// Output directory for unit tests.
        test_output_dir: Utf8PathBuf,

        /// Output directory for documentation pages.
        docs_output_dir: Utf8PathBuf,

        /// Name -> UUID table (defaults to the configured file in the JSON directory).
        #[arg(long)]
        uuid_table: Option<Utf8PathBuf>,

        /// Filters to generate, overriding the configured list.
        #[arg(long, num_args = 1.., conflicts_with = "all")]
        filters: Vec<String>,

        /// Generate every filter in the UUID table.
        #[arg(long)]
        all: bool,

        /// Artifacts to emit (defaults to the configured set).
        #[arg(long, value_enum, num_args = 1..)]
        emit: Vec<EmitSelection>,
    },
}

/// Artifact selection for `--emit`.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmitSelection {
    /// Filter header.
    Header,
    /// Filter source.
    Source,
    /// Catch2 unit test.
    Test,
    /// Markdown documentation page.
    Docs,
    /// Everything.
    All,
}

/// Expands `--emit` values into emitters in run order, without repeats.
fn expand_emitters(selection: &[EmitSelection]) -> Vec<EmitterKind> {
    EmitterKind::ALL
        .into_iter()
        .filter(|kind| {
            selection.iter().any(|s| match s {
                EmitSelection::All => true,
                EmitSelection::Header => *kind == EmitterKind::Header,
                EmitSelection::Source => *kind == EmitterKind::Source,
                EmitSelection::Test => *kind == EmitterKind::Test,
                EmitSelection::Docs => *kind == EmitterKind::Docs,
            })
        })
        .collect()
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise.
fn load_config(path: Option<&Utf8PathBuf>) -> color_eyre::Result<Config> {
    match path {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!(path = %path, "Loaded configuration");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json<T: serde::Serialize>(value: &T) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Prints a summary of a `simpl` run.
fn print_simpl_summary(outcome: &SimplOutcome) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle)?;
    writeln!(handle, "SIMPL Conversion Summary")?;
    writeln!(handle, "========================")?;
    writeln!(handle)?;
    for filter in &outcome.converted {
        writeln!(
            handle,
            "  {} -> {}::{} ({} parameters)",
            filter.name, filter.resolved.plugin, filter.resolved.class_name, filter.parameters
        )?;
    }
    for skipped in &outcome.skipped {
        writeln!(
            handle,
            "  {}::{} already converted, skipped",
            skipped.plugin, skipped.class_name
        )?;
    }
    writeln!(handle)?;
    let verb = if outcome.dry_run { "Would patch" } else { "Patched" };
    writeln!(handle, "{verb} {} files:", outcome.files.len())?;
    for path in &outcome.files {
        writeln!(handle, "  {path}")?;
    }
    Ok(())
}

/// Prints a summary of an `itk` run.
fn print_itk_summary(outcome: &ItkOutcome) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle)?;
    writeln!(handle, "ITK Generation Summary")?;
    writeln!(handle, "======================")?;
    writeln!(handle)?;
    writeln!(handle, "Filters generated: {}", outcome.generated.len())?;
    writeln!(handle, "Files written:     {}", outcome.files.len())?;
    if !outcome.skipped.is_empty() {
        writeln!(handle, "Skipped (no UUID): {}", outcome.skipped.join(", "))?;
    }
    if outcome.has_warnings() {
        writeln!(handle)?;
        writeln!(handle, "Warnings ({}):", outcome.warnings.len())?;
        for warning in &outcome.warnings {
            writeln!(handle, "  {warning}")?;
        }
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

fn run(cli: Cli) -> color_eyre::Result<ExitCode> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Simpl {
            complex_source_dir,
            simpl_json,
            simpl_filters,
            dry_run,
        } => {
            let request = SimplRequest {
                complex_dir: complex_source_dir,
                simpl_json,
                uuids: simpl_filters,
                dry_run,
            };
            let outcome = simpl::run(&config.simpl, &request)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                print_simpl_summary(&outcome)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Itk {
            template_dir,
            json_dir,
            filter_output_dir,
            test_output_dir,
            docs_output_dir,
            uuid_table,
            filters,
            all,
            emit,
        } => {
            let request = ItkRequest {
                template_dir,
                json_dir,
                filter_output_dir,
                test_output_dir,
                docs_output_dir,
                uuid_table,
                filters,
                all,
                emitters: expand_emitters(&emit),
            };
            let outcome = itk::run(&config.itk, &request)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                print_itk_summary(&outcome)?;
            }
            if outcome.has_warnings() {
                Ok(ExitCode::from(EXIT_WARNINGS))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Application entry point.
fn main() -> color_eyre::Result<ExitCode> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to the subcommand; fatal errors exit with status 1
    run(cli)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_expand_emitters() {
        assert_eq!(expand_emitters(&[]), Vec::<EmitterKind>::new());
        assert_eq!(
            expand_emitters(&[EmitSelection::Docs, EmitSelection::Header, EmitSelection::Docs]),
            vec![EmitterKind::Header, EmitterKind::Docs]
        );
        assert_eq!(expand_emitters(&[EmitSelection::All]), EmitterKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_simpl_command() {
        let cli = Cli::try_parse_from([
            "simplnx-gen",
            "simpl",
            "/src/complex",
            "--simpl-filters",
            "{11111111-1111-1111-1111-111111111111}",
            "22222222-2222-2222-2222-222222222222",
            "--dry-run",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simpl { ref simpl_filters, dry_run: true, .. } if simpl_filters.len() == 2
        ));
    }

    #[test]
    fn test_filters_conflict_with_all() {
        let result = Cli::try_parse_from([
            "simplnx-gen", "itk", "t", "j", "f", "u", "d", "--all", "--filters", "MedianImage",
        ]);
        assert!(result.is_err());
    }
}
