//! # taxes-cli: the `taxes` Command
//!
//! ## Subcommands
//!
//! - `taxes solve`: solve requested forms from a sectioned input file.
//! - `taxes fill-pdfs`: turn a solution file into a JSON fill plan.
//! - `taxes list-forms`: list the forms of a tax year.
//! - `taxes list-form-inputs`: list the inputs a form reads.
//!
//! ```bash
//! taxes solve return.ini --form 1040 --prompt-missing --writeback-input
//! taxes solve return.ini --solution solution.ini
//! taxes fill-pdfs solution.ini --out plan.json
//! ```

pub mod fill;
pub mod forms;
pub mod prompt;
pub mod solve;

/// Tax year used when `--year` is not given.
pub const DEFAULT_YEAR: u16 = 2023;
