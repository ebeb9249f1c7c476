//! # Input Store, Value Store, and Form-Scoped Views
//!
//! - [`InputStore`] holds the user's raw strings keyed by qualified input
//!   name, backed by a [`SectionTable`]. Lookups parse through the
//!   registered [`InputSpec`]; an absent key is [`Signal::MissingInput`].
//! - [`ValueStore`] holds committed field values. An absent key is
//!   [`Signal::Unmet`], which is how the solver discovers graph edges.
//! - [`InputView`] and [`ValueView`] are what value functions see. Bare
//!   keys are prefixed with the owning form-qualified-name; dotted keys
//!   pass through untouched.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::{Eval, Signal, TaxError, TaxResult};
use crate::input::InputSpec;
use crate::names::{compare_names, scoped, split_qualified, FormName, NameKey};
use crate::sections::SectionTable;
use crate::value::Value;

// ---------------------------------------------------------------------------
// InputStore
// ---------------------------------------------------------------------------

/// User-supplied inputs plus the descriptors used to parse them.
#[derive(Debug, Clone, Default)]
pub struct InputStore {
    table: SectionTable,
    specs: HashMap<String, Arc<InputSpec>>,
}

impl InputStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already parsed table.
    pub fn from_table(table: SectionTable) -> Self {
        Self {
            table,
            specs: HashMap::new(),
        }
    }

    /// Parse sectioned text.
    pub fn from_text(text: &str) -> TaxResult<Self> {
        SectionTable::parse(text).map(Self::from_table)
    }

    /// Load a sectioned input file.
    pub fn load(path: &Path) -> TaxResult<Self> {
        SectionTable::load(path).map(Self::from_table)
    }

    /// Write the raw values back to a sectioned file.
    pub fn write(&self, path: &Path) -> TaxResult<()> {
        self.table.write(path)
    }

    /// Render the raw values as sectioned text.
    pub fn to_text(&self) -> String {
        self.table.to_text()
    }

    /// Register descriptors for qualified input names.
    pub fn update_input_spec<I>(&mut self, specs: I)
    where
        I: IntoIterator<Item = (String, Arc<InputSpec>)>,
    {
        self.specs.extend(specs);
    }

    /// The descriptor registered for a qualified name.
    pub fn spec(&self, name: &str) -> Option<&Arc<InputSpec>> {
        self.specs.get(name)
    }

    /// The raw string stored for a qualified name.
    pub fn raw(&self, name: &str) -> Option<&str> {
        let (section, key) = split_qualified(name)?;
        self.table.get(section, key)
    }

    /// Whether a raw value exists for the qualified name.
    pub fn has(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    /// Parse the value stored for a qualified name.
    ///
    /// Fails with a fatal `MissingInputSpec` when no descriptor is
    /// registered, `MissingInput` when no value is stored, and a fatal
    /// `InvalidInput` when the stored string does not parse.
    pub fn parse(&self, name: &str) -> Eval<Value> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| TaxError::MissingInputSpec(name.to_string()))?;
        let raw = self
            .raw(name)
            .ok_or_else(|| Signal::MissingInput(name.to_string()))?;
        spec.parse(raw).map_err(|reason| {
            Signal::Fatal(TaxError::InvalidInput {
                name: name.to_string(),
                raw: raw.to_string(),
                reason,
            })
        })
    }

    /// Whether the stored value parses. An absent value is not valid.
    pub fn valid(&self, name: &str) -> TaxResult<bool> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| TaxError::MissingInputSpec(name.to_string()))?;
        Ok(self.raw(name).is_some_and(|raw| spec.valid(raw)))
    }

    /// Store a raw value. Existing values are never replaced; returns
    /// whether the value was inserted.
    pub fn set(&mut self, name: &str, raw: &str) -> TaxResult<bool> {
        let (section, key) = split_qualified(name).ok_or_else(|| TaxError::InvalidName {
            name: name.to_string(),
            reason: "input names must be qualified".into(),
        })?;
        if self.table.get(section, key).is_some() {
            return Ok(false);
        }
        self.table.set(section, key, raw);
        Ok(true)
    }

    /// Instance tags of `form_name` that appear as sections, in name order.
    pub fn instances(&self, form_name: &str) -> Vec<String> {
        let mut tags: Vec<String> = self
            .table
            .sections()
            .filter_map(|(section, _)| FormName::parse(section).ok())
            .filter(|form| form.name() == form_name)
            .filter_map(|form| form.instance().map(str::to_string))
            .collect();
        tags.sort_by(|a, b| compare_names(a, b));
        tags.dedup();
        tags
    }
}

// ---------------------------------------------------------------------------
// ValueStore
// ---------------------------------------------------------------------------

/// Committed field values keyed by qualified name. Write-once per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: BTreeMap<NameKey, Value>,
}

impl ValueStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a committed value; absent keys are unmet dependencies.
    pub fn get(&self, name: &str) -> Eval<&Value> {
        self.values
            .get(&NameKey::from(name))
            .ok_or_else(|| Signal::Unmet(name.to_string()))
    }

    /// Whether a value is committed for the name.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&NameKey::from(name))
    }

    /// Commit a value. Returns `false` and keeps the existing value if the
    /// key was already committed.
    pub fn insert(&mut self, name: &str, value: Value) -> bool {
        match self.values.entry(NameKey::from(name)) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Iterate committed values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of committed values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn type_error(name: String, expected: &str, found: &Value) -> Signal {
    Signal::Fatal(TaxError::TypeError {
        field: name,
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    })
}

macro_rules! typed_getters {
    () => {
        /// Read a numeric value (integers widen).
        pub fn decimal(&self, key: &str) -> Eval<Decimal> {
            let value = self.get(key)?;
            value
                .as_decimal()
                .ok_or_else(|| type_error(self.qualify(key), "number", &value))
        }

        /// Read an integer value.
        pub fn int(&self, key: &str) -> Eval<i64> {
            let value = self.get(key)?;
            value
                .as_int()
                .ok_or_else(|| type_error(self.qualify(key), "integer", &value))
        }

        /// Read a boolean value.
        pub fn boolean(&self, key: &str) -> Eval<bool> {
            let value = self.get(key)?;
            value
                .as_bool()
                .ok_or_else(|| type_error(self.qualify(key), "boolean", &value))
        }

        /// Read a text value.
        pub fn text(&self, key: &str) -> Eval<String> {
            match self.get(key)? {
                Value::Text(s) => Ok(s),
                other => Err(type_error(self.qualify(key), "text", &other)),
            }
        }

        /// Read an enumeration key; `None` is "no enum value".
        pub fn enum_key(&self, key: &str) -> Eval<Option<String>> {
            match self.get(key)? {
                Value::Enum(k) => Ok(k),
                other => Err(type_error(self.qualify(key), "enum", &other)),
            }
        }

        /// The owning form-qualified-name.
        pub fn form(&self) -> &str {
            self.form
        }

        /// Qualify a key against the owning form.
        pub fn qualify(&self, key: &str) -> String {
            scoped(self.form, key)
        }
    };
}

/// Read-only, form-scoped access to the input store.
#[derive(Debug, Clone, Copy)]
pub struct InputView<'a> {
    form: &'a str,
    store: &'a InputStore,
}

impl<'a> InputView<'a> {
    /// Scope `store` to the form-qualified-name `form`.
    pub fn new(form: &'a str, store: &'a InputStore) -> Self {
        Self { form, store }
    }

    /// Parse an input; bare keys resolve within the owning form.
    pub fn get(&self, key: &str) -> Eval<Value> {
        self.store.parse(&self.qualify(key))
    }

    /// Whether a raw value exists for the key.
    pub fn has(&self, key: &str) -> bool {
        self.store.has(&self.qualify(key))
    }

    /// Instance tags of another form present in the input file.
    pub fn instances(&self, form_name: &str) -> Vec<String> {
        self.store.instances(form_name)
    }

    typed_getters!();
}

/// Read-only, form-scoped access to the value store.
#[derive(Debug, Clone, Copy)]
pub struct ValueView<'a> {
    form: &'a str,
    store: &'a ValueStore,
}

impl<'a> ValueView<'a> {
    /// Scope `store` to the form-qualified-name `form`.
    pub fn new(form: &'a str, store: &'a ValueStore) -> Self {
        Self { form, store }
    }

    /// Read a committed value; bare keys resolve within the owning form.
    pub fn get(&self, key: &str) -> Eval<Value> {
        self.store.get(&self.qualify(key)).cloned()
    }

    /// Whether a value is committed for the key.
    pub fn has(&self, key: &str) -> bool {
        self.store.contains(&self.qualify(key))
    }

    typed_getters!();
}
