//! Fill planning errors.

use taxes_core::TaxError;
use thiserror::Error;

/// Errors raised while turning a solution into a fill plan.
#[derive(Error, Debug)]
pub enum FillError {
    /// The solution could not be decoded against the form library.
    #[error(transparent)]
    Core(#[from] TaxError),

    /// A solved value does not fit the PDF field it maps to.
    #[error("{form}: cannot fill {pdf} from {field} = {value:?}: {reason}")]
    Resolve {
        /// Form-qualified-name.
        form: String,
        /// PDF field name.
        pdf: String,
        /// Field base name.
        field: String,
        /// Encoded value found in the solution.
        value: String,
        /// Why it does not fit.
        reason: String,
    },

    /// The plan could not be serialized.
    #[error("cannot serialize fill plan: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while writing the plan.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
