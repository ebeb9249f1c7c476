//! # taxes-core: Forms, Fields, and the Lazy Solver
//!
//! A tax return is modelled as a set of forms. Each form declares typed
//! inputs (values the filer supplies) and computed fields (values derived
//! from inputs and other fields). The solver discovers the dependency
//! graph while it evaluates: nothing is declared up front, and forms that
//! are only referenced get instantiated on demand.
//!
//! ## Key Design Principles
//!
//! 1. **Signals, not exceptions.** Field value functions return
//!    [`Eval<T>`]. A missing field, a missing input, or an unsupported
//!    scenario is a [`Signal`] the solver turns into a waiter record; only
//!    [`TaxError`] ends a solve.
//!
//! 2. **Write-once stores.** The value store never overwrites a committed
//!    field, and the input store never overwrites a user-supplied value.
//!    A failed evaluation leaves both untouched.
//!
//! 3. **One comparator.** Every place the solver iterates names uses
//!    [`compare_names`], so two runs over the same input evaluate fields in
//!    the same order and produce byte-identical solutions.
//!
//! 4. **Instances are views.** One [`FormSpec`] serves every instance of a
//!    form; value functions see their instance only through the
//!    form-scoped [`InputView`] and [`ValueView`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `taxes-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Single-threaded: a solve is a sequential loop over owned state.

pub mod error;
pub mod field;
pub mod form;
pub mod input;
pub mod names;
pub mod sections;
pub mod solution;
pub mod solver;
pub mod store;
pub mod tracker;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{not_implemented, Eval, Signal, TaxError, TaxResult};
pub use field::FieldSpec;
pub use form::{FormBuilder, FormInstance, FormLibrary, FormSpec, Instancing, Jurisdiction};
pub use input::{EnumOption, InputKind, InputSpec};
pub use names::{compare_names, sort_names, FormName, NameKey};
pub use sections::SectionTable;
pub use solution::Solution;
pub use solver::{Prompter, Solver};
pub use store::{InputStore, InputView, ValueStore, ValueView};
pub use tracker::DependencyTracker;
pub use value::{Value, ValueKind};
