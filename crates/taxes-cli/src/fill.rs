//! # `taxes fill-pdfs`
//!
//! Reads a solution file and emits the fill plan: the forms that must be
//! filed, in attachment order, and the value of every mapped PDF field.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use taxes_core::Solution;
use taxes_fill::FilledForm;
use tracing::info;

/// Arguments of `taxes fill-pdfs`.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Solution file written by `taxes solve --solution`.
    pub solution: PathBuf,

    /// Write the plan here instead of printing it.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Build the fill plan for a solution of `year`.
pub fn fill_plan(solution: &Solution, year: u16) -> Result<Vec<FilledForm>> {
    let library = taxes_forms::library_for_year(year)?;
    let mappings = taxes_forms::mappings_for_year(year)?;
    Ok(taxes_fill::plan(&library, &mappings, solution)?)
}

/// Execute `taxes fill-pdfs`.
pub fn run_fill(args: &FillArgs, year: u16) -> Result<u8> {
    let solution = Solution::load(&args.solution)
        .with_context(|| format!("failed to read solution: {}", args.solution.display()))?;
    let plan = fill_plan(&solution, year)?;

    match &args.out {
        Some(path) => {
            taxes_fill::write_plan(path, &plan)
                .with_context(|| format!("failed to write fill plan: {}", path.display()))?;
            info!(path = %path.display(), forms = plan.len(), "wrote fill plan");
        }
        None => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxes_fill::FillValue;

    #[test]
    fn only_filed_forms_are_planned() {
        let solution = Solution::from_text(
            "[1040]\nfiling_status = mfj\n1a = 100.00\n\n\
             [1040_s1]\n10 = 0.00\n26 = 0.00\n\n\
             [w-2:acme]\nwages = 100.00\n",
        )
        .unwrap();
        let plan = fill_plan(&solution, 2023).unwrap();
        let forms: Vec<&str> = plan.iter().map(|f| f.form.as_str()).collect();
        assert_eq!(forms, ["1040"]);
        assert_eq!(plan[0].file.as_deref(), Some("f1040.pdf"));
        assert!(plan[0].fields.contains(&taxes_fill::FilledField {
            pdf: "topmostSubform[0].Page1[0].c1_2[0]".into(),
            value: FillValue::Checked(true),
        }));
    }

    #[test]
    fn plan_is_written_to_the_out_path() {
        let dir = tempfile::tempdir().unwrap();
        let solution_path = dir.path().join("solution.ini");
        let out = dir.path().join("plan.json");
        std::fs::write(&solution_path, "[1040]\n1a = 5.00\n").unwrap();

        let args = FillArgs {
            solution: solution_path,
            out: Some(out.clone()),
        };
        assert_eq!(run_fill(&args, 2023).unwrap(), 0);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json[0]["form"], "1040");
        assert_eq!(json[0]["fields"][0]["value"], "5.00");
    }

    #[test]
    fn unsupported_year_is_an_error() {
        assert!(fill_plan(&Solution::new(), 2019).is_err());
    }
}
