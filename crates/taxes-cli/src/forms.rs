//! # `taxes list-forms` / `taxes list-form-inputs`

use anyhow::{Context, Result};
use clap::Args;
use taxes_core::{FormLibrary, FormName, Instancing};

/// Arguments of `taxes list-form-inputs`.
#[derive(Args, Debug)]
pub struct ListInputsArgs {
    /// Form name, e.g. `1040` or `8889`.
    pub form: String,
}

fn instancing(instancing: &Instancing) -> String {
    match instancing {
        Instancing::Single => "single".to_string(),
        Instancing::Free => "free".to_string(),
        Instancing::Fixed(tags) => tags.join("|"),
    }
}

/// One line per form: name, instancing, jurisdiction and title.
pub fn render_forms(library: &FormLibrary) -> String {
    let width = library.forms().map(|f| f.name().len()).max().unwrap_or(0);
    let mut out = String::new();
    for spec in library.forms() {
        out.push_str(&format!(
            "{:<width$}  {:<16}  {:<7}  {}\n",
            spec.name(),
            instancing(spec.instancing()),
            spec.jurisdiction().to_string(),
            spec.title(),
        ));
    }
    out
}

/// The inputs of one form with their kind and description.
pub fn render_form_inputs(library: &FormLibrary, form: &str) -> Result<String> {
    let name = FormName::parse(form)?;
    let spec = library
        .get(name.name())
        .ok_or_else(|| taxes_core::TaxError::UnknownForm(name.name().to_string()))?;
    let width = spec.inputs().iter().map(|i| i.name().len()).max().unwrap_or(0);
    let mut out = format!("{} ({})\n", spec.name(), spec.title());
    for input in spec.inputs() {
        out.push_str(&format!(
            "  {:<width$}  {}: {}\n",
            input.name(),
            input.kind(),
            input.description(),
        ));
    }
    Ok(out)
}

/// Execute `taxes list-forms`.
pub fn run_list_forms(year: u16) -> Result<u8> {
    let library = taxes_forms::library_for_year(year)?;
    print!("{}", render_forms(&library));
    Ok(0)
}

/// Execute `taxes list-form-inputs`.
pub fn run_list_form_inputs(args: &ListInputsArgs, year: u16) -> Result<u8> {
    let library = taxes_forms::library_for_year(year)?;
    let rendered = render_form_inputs(&library, &args.form)
        .with_context(|| format!("cannot list inputs of {}", args.form))?;
    print!("{rendered}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_are_listed_in_name_order() {
        let library = taxes_forms::library_for_year(2023).unwrap();
        let rendered = render_forms(&library);
        let names: Vec<&str> = rendered
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(
            names,
            ["1040", "1040_s1", "1040_sb", "1099-g", "1099-int", "8889", "w-2"]
        );
        assert!(rendered.contains("taxpayer|spouse"));
    }

    #[test]
    fn inputs_show_kind_and_description() {
        let library = taxes_forms::library_for_year(2023).unwrap();
        let rendered = render_form_inputs(&library, "w-2").unwrap();
        assert!(rendered.starts_with("w-2 ("));
        assert!(rendered.contains("box_1"));
        assert!(render_form_inputs(&library, "1041").is_err());
    }
}
