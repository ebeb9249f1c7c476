//! # Tax Year 2023 (Federal)
//!
//! | Form | Instancing | Filed |
//! |------|------------|-------|
//! | `1040` | single | always |
//! | `1040_s1` | single | when line 10 or 26 is non-zero |
//! | `1040_sb` | single | when interest exceeds $1,500 |
//! | `8889` | `taxpayer` / `spouse` | always |
//! | `w-2`, `1099-int`, `1099-g` | free | never |

pub mod common;
pub mod f1040;
pub mod f8889;
pub mod pdf;
pub mod schedule1;
pub mod schedule_b;
pub mod statements;
pub mod tax;

use taxes_core::{FormLibrary, TaxResult};
use tracing::debug;

pub use common::YEAR;

/// Every 2023 form.
pub fn library() -> TaxResult<FormLibrary> {
    let mut library = FormLibrary::new(YEAR);
    for form in [
        f1040::form()?,
        schedule1::form()?,
        schedule_b::form()?,
        f8889::form()?,
        statements::w2()?,
        statements::f1099_int()?,
        statements::f1099_g()?,
    ] {
        library.register(form)?;
    }
    debug!(year = YEAR, forms = library.forms().count(), "built form library");
    Ok(library)
}
