//! # taxes-forms: Form Libraries by Tax Year
//!
//! Each supported year is a module that builds a [`FormLibrary`] and the
//! matching PDF [`MappingSet`]. Callers pick a year at runtime:
//!
//! ```
//! let library = taxes_forms::library_for_year(2023).unwrap();
//! assert!(library.get("1040").is_some());
//! assert!(taxes_forms::library_for_year(1999).is_err());
//! ```

pub mod error;
pub mod status;
pub mod y2023;

pub use error::FormsError;
pub use status::FilingStatus;

use taxes_core::FormLibrary;
use taxes_fill::MappingSet;

/// Tax years with a form library.
pub const SUPPORTED_YEARS: &[u16] = &[2023];

fn unsupported(year: u16) -> FormsError {
    FormsError::UnsupportedYear {
        year,
        supported: SUPPORTED_YEARS
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// The form library for `year`.
pub fn library_for_year(year: u16) -> Result<FormLibrary, FormsError> {
    match year {
        2023 => Ok(y2023::library()?),
        _ => Err(unsupported(year)),
    }
}

/// The PDF mappings for `year`.
pub fn mappings_for_year(year: u16) -> Result<MappingSet, FormsError> {
    match year {
        2023 => Ok(y2023::pdf::mappings()),
        _ => Err(unsupported(year)),
    }
}
