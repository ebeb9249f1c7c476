//! # taxes CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taxes_cli::fill::{run_fill, FillArgs};
use taxes_cli::forms::{run_list_form_inputs, run_list_forms, ListInputsArgs};
use taxes_cli::solve::{run_solve, SolveArgs};
use taxes_cli::DEFAULT_YEAR;

/// Solve individual income tax returns from a file of inputs.
#[derive(Parser, Debug)]
#[command(name = "taxes", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Tax year of the forms.
    #[arg(long, global = true, default_value_t = DEFAULT_YEAR)]
    year: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve forms from an input file.
    Solve(SolveArgs),

    /// Emit the PDF fill plan for a solution file.
    #[command(name = "fill-pdfs")]
    FillPdfs(FillArgs),

    /// List the forms of the tax year.
    ListForms,

    /// List the inputs a form reads.
    ListFormInputs(ListInputsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(year = cli.year, "taxes CLI starting");

    let result = match cli.command {
        Commands::Solve(args) => run_solve(&args, cli.year),
        Commands::FillPdfs(args) => run_fill(&args, cli.year),
        Commands::ListForms => run_list_forms(cli.year),
        Commands::ListFormInputs(args) => run_list_form_inputs(&args, cli.year),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
