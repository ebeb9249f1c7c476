//! # taxes-fill: Fill Plans for Solved Returns
//!
//! Turns a [`taxes_core::Solution`] into the list of PDFs a filer submits
//! and the value each PDF field receives. Rendering the PDFs themselves is
//! left to an external filler; this crate emits the plan as JSON.
//!
//! ## Crate Policy
//!
//! - Forms whose `needs_filing` predicate is false are left out.
//! - A mapped field missing from the solution is left blank, never an error.
//! - A present value that cannot be expressed in its PDF field is an error.

pub mod error;
pub mod mapping;
pub mod plan;

pub use error::FillError;
pub use mapping::{FillValue, FormMapping, MappingSet, PdfField};
pub use plan::{plan, write_plan, FilledField, FilledForm};
