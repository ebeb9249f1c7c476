//! # Error Types
//!
//! Two families of failure flow through the core:
//!
//! - [`TaxError`]: fatal errors. They escape the solver and end the solve.
//!   Each variant carries enough detail to name the offending form, field,
//!   or input.
//! - [`Signal`]: the expected interruptions of a field evaluation: an
//!   unmet field dependency, a missing input, or a modelled-but-unsupported
//!   scenario. The solver converts these into waiter registrations or
//!   records; they never reach the caller.
//!
//! A field value function returns [`Eval<T>`], so `?` on a view lookup
//! propagates whichever signal the lookup raised.

use thiserror::Error;

/// Fatal error raised by the core.
#[derive(Error, Debug)]
pub enum TaxError {
    /// `add_form` named a form the library does not define.
    #[error("unknown form: {0}")]
    UnknownForm(String),

    /// The instance tag is not accepted by the form's instancing mode.
    #[error("form {form} does not accept instance {instance:?}: {reason}")]
    InvalidInstance {
        /// Form name without instance.
        form: String,
        /// The rejected instance tag (`None` when a tag was required).
        instance: Option<String>,
        /// Why the tag was rejected.
        reason: String,
    },

    /// An input was read that no instantiated form declares.
    #[error("no input specification registered for {0}")]
    MissingInputSpec(String),

    /// An input value is present but lexically invalid for its descriptor.
    #[error("invalid value {raw:?} for input {name}: {reason}")]
    InvalidInput {
        /// Qualified input name.
        name: String,
        /// The raw string that failed to parse.
        raw: String,
        /// Parser explanation.
        reason: String,
    },

    /// A field value function returned a value of the wrong runtime type.
    #[error("field {field} returned {found}, expected {expected}")]
    TypeError {
        /// Qualified field name.
        field: String,
        /// Declared kind.
        expected: String,
        /// Kind of the returned value.
        found: String,
    },

    /// A computation left the range of the decimal type.
    #[error("arithmetic overflow computing {0}")]
    Overflow(String),

    /// Two inputs or two fields resolved to the same qualified name.
    #[error("duplicate name during form instantiation: {0}")]
    DuplicateName(String),

    /// A field referenced a qualified name that no form defines.
    #[error("field {referenced_by} references unknown field {name}")]
    UnknownField {
        /// The qualified name that could not be resolved.
        name: String,
        /// The field whose evaluation made the reference.
        referenced_by: String,
    },

    /// A field transitively waits on itself.
    #[error("cyclic dependency: {}", chain.join(" -> "))]
    CyclicDependency {
        /// The waiting chain, starting and ending with the same field.
        chain: Vec<String>,
    },

    /// A name does not follow the `<form>[:<instance>].<base>` grammar.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Malformed sectioned text.
    #[error("line {line}: {message}")]
    Section {
        /// 1-based line number.
        line: usize,
        /// Parser explanation.
        message: String,
    },

    /// A stored value could not be decoded with its field's codec.
    #[error("cannot decode {raw:?} for {name}: {reason}")]
    Codec {
        /// Qualified field name.
        name: String,
        /// The encoded value.
        raw: String,
        /// Decoder explanation.
        reason: String,
    },

    /// IO error while reading or writing a sectioned file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Interruption of a single field evaluation.
#[derive(Debug)]
pub enum Signal {
    /// The value store has no entry for this qualified field name yet.
    Unmet(String),
    /// The input store has no entry for this qualified input name.
    MissingInput(String),
    /// The field reached a modelled but unsupported scenario.
    NotImplemented(Option<String>),
    /// A fatal error raised while evaluating; ends the solve.
    Fatal(TaxError),
}

impl From<TaxError> for Signal {
    fn from(err: TaxError) -> Self {
        Self::Fatal(err)
    }
}

/// Result of evaluating a field, or of any lookup a field makes.
pub type Eval<T> = Result<T, Signal>;

/// Result alias for fatal-only operations.
pub type TaxResult<T> = Result<T, TaxError>;

/// Signal that the calling field reaches a scenario the form library
/// models but does not compute.
///
/// ```
/// use taxes_core::{not_implemented, Eval};
///
/// fn itemized(itemize: bool) -> Eval<u32> {
///     if itemize {
///         return not_implemented("itemized deductions");
///     }
///     Ok(0)
/// }
/// assert!(itemized(true).is_err());
/// ```
pub fn not_implemented<T>(detail: impl Into<String>) -> Eval<T> {
    Err(Signal::NotImplemented(Some(detail.into())))
}
