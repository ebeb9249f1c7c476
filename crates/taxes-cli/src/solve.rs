//! # `taxes solve`
//!
//! Loads the input file, solves the requested forms, and prints the
//! solution (or writes it with `--solution`). A partial solve still
//! produces every field that could be computed, followed by a report of
//! what is missing on stderr.
//!
//! Exit codes: `0` solved, `2` partial, `1` error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use taxes_core::{InputSpec, InputStore, NameKey, Prompter, Solution, Solver};
use tracing::info;

use crate::prompt::TerminalPrompter;

/// Arguments of `taxes solve`.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Sectioned input file.
    pub input: PathBuf,

    /// Form to solve, as `<name>` or `<name>:<instance>`. Repeatable.
    #[arg(long = "form", default_value = "1040")]
    pub forms: Vec<String>,

    /// Ask on the terminal for inputs missing from the file.
    #[arg(long)]
    pub prompt_missing: bool,

    /// Write prompted values back into the input file.
    #[arg(long, requires = "prompt_missing")]
    pub writeback_input: bool,

    /// Write the solution here instead of printing it.
    #[arg(long)]
    pub solution: Option<PathBuf>,

    /// Print the solution as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Resolved configuration of one solve.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Tax year.
    pub year: u16,
    /// Forms to request.
    pub forms: Vec<String>,
    /// Whether to prompt for missing inputs.
    pub prompt_missing: bool,
}

/// What a solve produced.
#[derive(Debug)]
pub struct SolveOutcome {
    /// Whether every requested field was computed.
    pub solved: bool,
    /// Every computed field.
    pub solution: Solution,
    /// Fields that reached an unsupported scenario.
    pub unimplemented: Vec<String>,
    /// Missing inputs and the fields waiting on them.
    pub unmet_inputs: BTreeMap<NameKey, Vec<String>>,
    /// Fields never computed and the fields waiting on them.
    pub unmet_fields: BTreeMap<NameKey, Vec<String>>,
    /// The input store after the solve, including prompted values.
    pub inputs: InputStore,
}

/// Solve with the given options. `prompter` is consulted only when
/// `options.prompt_missing` is set.
pub fn solve_inputs(
    inputs: InputStore,
    options: &SolveOptions,
    prompter: Option<Box<dyn Prompter + '_>>,
) -> Result<SolveOutcome> {
    let library = taxes_forms::library_for_year(options.year)?;
    let mut solver = Solver::new(&library, inputs);
    if options.prompt_missing {
        if let Some(mut prompter) = prompter {
            solver = solver.with_prompter(move |name: &str, input: &InputSpec, waiting: &[String]| {
                prompter.prompt(name, input, waiting)
            });
        }
    }
    for form in &options.forms {
        solver
            .add_form(form)
            .with_context(|| format!("cannot add form {form}"))?;
    }
    let solved = solver.solve()?;
    let solution = solver.solution()?;
    Ok(SolveOutcome {
        solved,
        solution,
        unimplemented: solver.unimplemented_fields().to_vec(),
        unmet_inputs: solver.unmet_input_dependencies(),
        unmet_fields: solver.unmet_field_dependencies(),
        inputs: solver.into_inputs(),
    })
}

/// Execute `taxes solve`.
pub fn run_solve(args: &SolveArgs, year: u16) -> Result<u8> {
    let inputs = InputStore::load(&args.input)
        .with_context(|| format!("failed to read input file: {}", args.input.display()))?;
    let options = SolveOptions {
        year,
        forms: args.forms.clone(),
        prompt_missing: args.prompt_missing,
    };
    let prompter: Option<Box<dyn Prompter>> = if args.prompt_missing {
        Some(Box::new(TerminalPrompter::stdio()))
    } else {
        None
    };
    let outcome = solve_inputs(inputs, &options, prompter)?;

    emit_solution(&outcome.solution, args.solution.as_deref(), args.json)?;
    report(&outcome);

    if args.writeback_input {
        outcome
            .inputs
            .write(&args.input)
            .with_context(|| format!("failed to write input file: {}", args.input.display()))?;
        info!(path = %args.input.display(), "wrote inputs back");
    }

    Ok(if outcome.solved { 0 } else { 2 })
}

fn emit_solution(solution: &Solution, path: Option<&Path>, json: bool) -> Result<()> {
    let rendered = if json {
        serde_json::to_string_pretty(solution).context("failed to serialize solution")? + "\n"
    } else {
        solution.to_text()
    };
    match path {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write solution: {}", path.display()))?;
            info!(path = %path.display(), fields = solution.field_count(), "wrote solution");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Render the partial-solve report.
pub fn render_report(outcome: &SolveOutcome) -> String {
    let mut out = String::new();
    if !outcome.unimplemented.is_empty() {
        out.push_str("Not implemented:\n");
        for field in &outcome.unimplemented {
            out.push_str(&format!("  {field}\n"));
        }
    }
    if !outcome.unmet_inputs.is_empty() {
        out.push_str("Missing inputs:\n");
        for (input, waiting) in &outcome.unmet_inputs {
            out.push_str(&format!("  {input} (needed by {})\n", waiting.join(", ")));
        }
    }
    if !outcome.unmet_fields.is_empty() {
        out.push_str("Fields not computed:\n");
        for (field, waiting) in &outcome.unmet_fields {
            out.push_str(&format!("  {field} (needed by {})\n", waiting.join(", ")));
        }
    }
    out
}

fn report(outcome: &SolveOutcome) {
    if outcome.solved {
        info!(fields = outcome.solution.field_count(), "return solved");
    } else {
        eprint!("{}", render_report(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETURN: &str = "\
[1040]
first_name = Pat
last_name = Doe
ssn = 123-45-6789
filing_status = single
virtual_currency = no
itemize = no
dependents = 0
account_type = checking
account_number = 12345678

[1040_s1]
mortgage_interest_refund = 0
alimony_paid = 0
other_adjustments = 0

[w-2:acme]
box_1 = 100000
box_2 = 16551.90
";

    fn options(prompt_missing: bool) -> SolveOptions {
        SolveOptions {
            year: 2023,
            forms: vec!["1040".into()],
            prompt_missing,
        }
    }

    #[test]
    fn partial_solve_reports_the_missing_input() {
        let inputs = InputStore::from_text(RETURN).unwrap();
        let outcome = solve_inputs(inputs, &options(false), None).unwrap();
        assert!(!outcome.solved);
        assert_eq!(outcome.solution.get("1040", "35a"), Some("2285.90"));
        let report = render_report(&outcome);
        assert!(report.contains("1040.routing_number (needed by 1040.35b)"));
    }

    #[test]
    fn prompted_values_land_in_the_input_store() {
        let inputs = InputStore::from_text(RETURN).unwrap();
        let prompter = |_: &str, _: &InputSpec, _: &[String]| Some("021000021".to_string());
        let prompter: Box<dyn Prompter> = Box::new(prompter);
        let outcome = solve_inputs(inputs, &options(true), Some(prompter)).unwrap();
        assert!(outcome.solved);
        assert_eq!(outcome.solution.get("1040", "35b"), Some("021000021"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("return.ini");
        outcome.inputs.write(&path).unwrap();
        let reloaded = InputStore::load(&path).unwrap();
        assert_eq!(reloaded.raw("1040.routing_number"), Some("021000021"));
        assert_eq!(reloaded.raw("w-2:acme.box_2"), Some("16551.90"));
    }

    #[test]
    fn unknown_forms_are_errors() {
        let mut opts = options(false);
        opts.forms = vec!["1041".into()];
        let err = solve_inputs(InputStore::new(), &opts, None).unwrap_err();
        assert!(format!("{err:#}").contains("unknown form: 1041"));
    }
}
