//! Form library errors.

use taxes_core::TaxError;
use thiserror::Error;

/// Errors raised while building a form library.
#[derive(Error, Debug)]
pub enum FormsError {
    /// No library exists for the requested tax year.
    #[error("no forms for tax year {year}; supported years: {supported}")]
    UnsupportedYear {
        /// The requested year.
        year: u16,
        /// Comma-separated list of supported years.
        supported: String,
    },

    /// A form definition failed validation.
    #[error(transparent)]
    Core(#[from] TaxError),
}
