//! # Field Descriptors
//!
//! A [`FieldSpec`] is a named, typed computation cell. Its value function
//! reads inputs and other fields through form-scoped views and returns a
//! [`Value`]; [`FieldSpec::evaluate`] canonicalizes empties, checks the
//! runtime type, and rounds fixed-place decimals before the solver
//! commits the result.

use std::fmt;

use crate::error::{Eval, Signal, TaxError, TaxResult};
use crate::names::validate_base_name;
use crate::store::{InputView, ValueView};
use crate::value::{Value, ValueKind};

/// Value function of a field.
pub type FieldFn = dyn Fn(&InputView<'_>, &ValueView<'_>) -> Eval<Value> + Send + Sync;

/// Immutable descriptor of a computed field.
pub struct FieldSpec {
    name: String,
    kind: ValueKind,
    compute: Box<FieldFn>,
}

impl FieldSpec {
    /// Build a field with an explicit kind.
    pub fn new<F>(name: &str, kind: ValueKind, compute: F) -> TaxResult<Self>
    where
        F: Fn(&InputView<'_>, &ValueView<'_>) -> Eval<Value> + Send + Sync + 'static,
    {
        validate_base_name(name)?;
        Ok(Self {
            name: name.to_string(),
            kind,
            compute: Box::new(compute),
        })
    }

    /// Base name, unique within the form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Run the value function and canonicalize its result.
    ///
    /// `qualified` is the field's own qualified name, used for error
    /// reporting. Signals raised by the value function pass through
    /// unchanged; a result of the wrong runtime type is a fatal
    /// `TypeError`.
    pub fn evaluate(
        &self,
        qualified: &str,
        inputs: &InputView<'_>,
        values: &ValueView<'_>,
    ) -> Eval<Value> {
        let raw = (self.compute)(inputs, values)?;
        self.kind.canonicalize(raw).map_err(|found| {
            Signal::Fatal(TaxError::TypeError {
                field: qualified.to_string(),
                expected: self.kind.to_string(),
                found,
            })
        })
    }

    /// Encode a committed value.
    pub fn to_string(&self, value: &Value) -> String {
        self.kind.encode(value)
    }

    /// Decode an encoded value.
    pub fn from_string(&self, qualified: &str, raw: &str) -> TaxResult<Value> {
        self.kind.decode(raw).map_err(|reason| TaxError::Codec {
            name: qualified.to_string(),
            raw: raw.to_string(),
            reason,
        })
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InputStore, ValueStore};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn run(field: &FieldSpec, values: &ValueStore) -> Eval<Value> {
        let inputs = InputStore::new();
        field.evaluate(
            &format!("1040.{}", field.name()),
            &InputView::new("1040", &inputs),
            &ValueView::new("1040", values),
        )
    }

    #[test]
    fn sums_and_rounds_to_places() {
        let field = FieldSpec::new("33", ValueKind::Decimal(2), |_, v| {
            Ok(Value::from(v.decimal("25d")? + v.decimal("32")?))
        })
        .unwrap();
        let mut values = ValueStore::new();
        values.insert("1040.25d", Value::Number(Decimal::from_str("16551.905").unwrap()));
        values.insert("1040.32", Value::Int(0));
        let out = run(&field, &values).unwrap();
        assert_eq!(field.to_string(&out), "16551.90");
    }

    #[test]
    fn unmet_dependency_passes_through() {
        let field =
            FieldSpec::new("11", ValueKind::Decimal(2), |_, v| Ok(v.get("9")?)).unwrap();
        let values = ValueStore::new();
        assert!(matches!(run(&field, &values), Err(Signal::Unmet(n)) if n == "1040.9"));
    }

    #[test]
    fn empty_results_are_canonicalized() {
        let field = FieldSpec::new("35b", ValueKind::Text, |_, _| Ok(Value::Empty)).unwrap();
        assert_eq!(
            run(&field, &ValueStore::new()).unwrap(),
            Value::Text(String::new())
        );

        let field =
            FieldSpec::new("38", ValueKind::Decimal(0), |_, _| Ok(Value::from("  "))).unwrap();
        assert_eq!(field.to_string(&run(&field, &ValueStore::new()).unwrap()), "0");
    }

    #[test]
    fn wrong_runtime_type_is_fatal() {
        let field = FieldSpec::new("1a", ValueKind::Decimal(2), |_, _| Ok(Value::Bool(true))).unwrap();
        match run(&field, &ValueStore::new()) {
            Err(Signal::Fatal(TaxError::TypeError { field, expected, found })) => {
                assert_eq!(field, "1040.1a");
                assert_eq!(expected, "decimal(2)");
                assert_eq!(found, "boolean");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn codec_errors_name_the_field() {
        let field = FieldSpec::new("1a", ValueKind::Integer, |_, _| Ok(Value::Int(0))).unwrap();
        assert!(matches!(
            field.from_string("1040.1a", "abc"),
            Err(TaxError::Codec { name, .. }) if name == "1040.1a"
        ));
    }
}
