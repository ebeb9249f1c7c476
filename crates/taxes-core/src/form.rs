//! # Forms and Form Libraries
//!
//! A [`FormSpec`] groups inputs, required fields (solved whenever the
//! form is instantiated) and optional fields (solved only when another
//! field reads them). Value functions never capture the instance: they
//! see it only through the form-scoped views, so one `FormSpec` serves
//! every instance (`w-2:acme`, `w-2:globex`, ...).
//!
//! A [`FormLibrary`] is the set of forms for one tax year.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{TaxError, TaxResult};
use crate::field::FieldSpec;
use crate::input::InputSpec;
use crate::names::{FormName, NameKey};
use crate::store::ValueView;

// ---------------------------------------------------------------------------
// Jurisdiction
// ---------------------------------------------------------------------------

/// Taxing authority a form is filed with. Federal orders before states.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Jurisdiction {
    /// U.S. federal (IRS).
    Federal,
    /// A U.S. state, by two-letter postal code.
    State(String),
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Federal => f.write_str("federal"),
            Self::State(code) => f.write_str(code),
        }
    }
}

impl FromStr for Jurisdiction {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("federal") {
            return Ok(Self::Federal);
        }
        if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(Self::State(s.to_ascii_uppercase()));
        }
        Err(TaxError::InvalidName {
            name: s.to_string(),
            reason: "expected `federal` or a two-letter state code".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Instancing
// ---------------------------------------------------------------------------

/// How a form accepts instance tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instancing {
    /// Exactly one, untagged instance.
    Single,
    /// Any tag, or none. Used for statements the filer may have several of.
    Free,
    /// A tag is mandatory and must be one of these.
    Fixed(Vec<String>),
}

impl Instancing {
    /// The declared valid instances, when instancing is mandatory.
    pub fn valid_instances(&self) -> Option<&[String]> {
        match self {
            Self::Fixed(tags) => Some(tags),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FormSpec
// ---------------------------------------------------------------------------

/// Predicate deciding whether a solved form must be filed.
pub type FilingFn = dyn Fn(&ValueView<'_>) -> bool + Send + Sync;

/// Immutable description of one form.
pub struct FormSpec {
    name: String,
    title: String,
    year: u16,
    jurisdiction: Jurisdiction,
    sequence: u32,
    instancing: Instancing,
    inputs: Vec<Arc<InputSpec>>,
    required: Vec<FieldSpec>,
    optional: Vec<FieldSpec>,
    needs_filing: Option<Box<FilingFn>>,
}

impl FormSpec {
    /// Start describing a form.
    pub fn builder(name: &str, year: u16) -> FormBuilder {
        FormBuilder {
            name: name.to_string(),
            title: String::new(),
            year,
            jurisdiction: Jurisdiction::Federal,
            sequence: 0,
            instancing: Instancing::Single,
            inputs: Vec::new(),
            required: Vec::new(),
            optional: Vec::new(),
            needs_filing: None,
        }
    }

    /// Form name, without instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tax year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Filing jurisdiction.
    pub fn jurisdiction(&self) -> &Jurisdiction {
        &self.jurisdiction
    }

    /// PDF attachment sequence number. Ordering only; never used to solve.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Instancing mode.
    pub fn instancing(&self) -> &Instancing {
        &self.instancing
    }

    /// Declared inputs.
    pub fn inputs(&self) -> &[Arc<InputSpec>] {
        &self.inputs
    }

    /// Fields solved whenever the form is instantiated.
    pub fn required_fields(&self) -> &[FieldSpec] {
        &self.required
    }

    /// Fields solved only on demand.
    pub fn optional_fields(&self) -> &[FieldSpec] {
        &self.optional
    }

    /// Required then optional fields.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Look up a field by base name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name() == name)
    }

    /// Whether the solved form must be filed. Defaults to `true`.
    pub fn needs_filing(&self, values: &ValueView<'_>) -> bool {
        self.needs_filing.as_ref().map_or(true, |f| f(values))
    }

    /// Check an instance tag against the instancing mode.
    pub fn check_instance(&self, instance: Option<&str>) -> TaxResult<()> {
        let reject = |reason: &str| TaxError::InvalidInstance {
            form: self.name.clone(),
            instance: instance.map(str::to_string),
            reason: reason.to_string(),
        };
        match (&self.instancing, instance) {
            (Instancing::Single, Some(_)) => Err(reject("form is not instanced")),
            (Instancing::Fixed(tags), Some(tag)) if !tags.iter().any(|t| t == tag) => Err(
                reject(&format!("valid instances are {}", tags.join(", "))),
            ),
            (Instancing::Fixed(tags), None) => Err(reject(&format!(
                "an instance is required, one of {}",
                tags.join(", ")
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for FormSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSpec")
            .field("name", &self.name)
            .field("year", &self.year)
            .field("jurisdiction", &self.jurisdiction)
            .field("sequence", &self.sequence)
            .field("instancing", &self.instancing)
            .field("inputs", &self.inputs.len())
            .field("required", &self.required.len())
            .field("optional", &self.optional.len())
            .finish()
    }
}

/// Builder for [`FormSpec`]; `build` enforces name uniqueness.
pub struct FormBuilder {
    name: String,
    title: String,
    year: u16,
    jurisdiction: Jurisdiction,
    sequence: u32,
    instancing: Instancing,
    inputs: Vec<Arc<InputSpec>>,
    required: Vec<FieldSpec>,
    optional: Vec<FieldSpec>,
    needs_filing: Option<Box<FilingFn>>,
}

impl FormBuilder {
    /// Human-readable title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Filing jurisdiction (default federal).
    pub fn jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.jurisdiction = jurisdiction;
        self
    }

    /// PDF attachment sequence number.
    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Instancing mode (default single).
    pub fn instancing(mut self, instancing: Instancing) -> Self {
        self.instancing = instancing;
        self
    }

    /// Add an input.
    pub fn input(mut self, input: InputSpec) -> Self {
        self.inputs.push(Arc::new(input));
        self
    }

    /// Add a required field.
    pub fn required(mut self, field: FieldSpec) -> Self {
        self.required.push(field);
        self
    }

    /// Add an optional field.
    pub fn optional(mut self, field: FieldSpec) -> Self {
        self.optional.push(field);
        self
    }

    /// Set the filing predicate.
    pub fn needs_filing<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValueView<'_>) -> bool + Send + Sync + 'static,
    {
        self.needs_filing = Some(Box::new(f));
        self
    }

    /// Validate and finish.
    pub fn build(self) -> TaxResult<FormSpec> {
        FormName::new(&self.name, None)?;
        if let Instancing::Fixed(tags) = &self.instancing {
            for tag in tags {
                FormName::new(&self.name, Some(tag))?;
            }
        }
        let mut seen = HashSet::new();
        for input in &self.inputs {
            if !seen.insert(input.name()) {
                return Err(TaxError::DuplicateName(format!(
                    "{}.{} (input)",
                    self.name,
                    input.name()
                )));
            }
        }
        let mut seen = HashSet::new();
        for field in self.required.iter().chain(self.optional.iter()) {
            if !seen.insert(field.name()) {
                return Err(TaxError::DuplicateName(format!(
                    "{}.{} (field)",
                    self.name,
                    field.name()
                )));
            }
        }
        Ok(FormSpec {
            name: self.name,
            title: self.title,
            year: self.year,
            jurisdiction: self.jurisdiction,
            sequence: self.sequence,
            instancing: self.instancing,
            inputs: self.inputs,
            required: self.required,
            optional: self.optional,
            needs_filing: self.needs_filing,
        })
    }
}

// ---------------------------------------------------------------------------
// FormInstance
// ---------------------------------------------------------------------------

/// A form instantiated during a solve.
#[derive(Debug, Clone)]
pub struct FormInstance {
    name: FormName,
    qualified: String,
    spec: Arc<FormSpec>,
}

impl FormInstance {
    /// Pair a validated name with its spec.
    pub fn new(name: FormName, spec: Arc<FormSpec>) -> Self {
        let qualified = name.to_string();
        Self {
            name,
            qualified,
            spec,
        }
    }

    /// The form-qualified-name, e.g. `w-2:acme`.
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// The parsed form name.
    pub fn form_name(&self) -> &FormName {
        &self.name
    }

    /// The shared description.
    pub fn spec(&self) -> &Arc<FormSpec> {
        &self.spec
    }

    /// Qualify a base name with this instance.
    pub fn qualify(&self, base: &str) -> String {
        self.name.qualify(base)
    }
}

// ---------------------------------------------------------------------------
// FormLibrary
// ---------------------------------------------------------------------------

/// All forms available for one tax year.
#[derive(Debug, Clone, Default)]
pub struct FormLibrary {
    year: u16,
    forms: BTreeMap<NameKey, Arc<FormSpec>>,
}

impl FormLibrary {
    /// An empty library for `year`.
    pub fn new(year: u16) -> Self {
        Self {
            year,
            forms: BTreeMap::new(),
        }
    }

    /// Tax year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Add a form. Names must be unique.
    pub fn register(&mut self, spec: FormSpec) -> TaxResult<()> {
        let key = NameKey::from(spec.name());
        if self.forms.contains_key(&key) {
            return Err(TaxError::DuplicateName(spec.name().to_string()));
        }
        self.forms.insert(key, Arc::new(spec));
        Ok(())
    }

    /// Look up a form by name (no instance).
    pub fn get(&self, name: &str) -> Option<&Arc<FormSpec>> {
        self.forms.get(&NameKey::from(name))
    }

    /// Iterate forms in name order.
    pub fn forms(&self) -> impl Iterator<Item = &Arc<FormSpec>> {
        self.forms.values()
    }

    /// Resolve `<name>` or `<name>:<instance>` into an instance.
    pub fn instantiate(&self, qualified: &str) -> TaxResult<FormInstance> {
        let name = FormName::parse(qualified)?;
        let spec = self
            .get(name.name())
            .ok_or_else(|| TaxError::UnknownForm(name.name().to_string()))?;
        spec.check_instance(name.instance())?;
        Ok(FormInstance::new(name, Arc::clone(spec)))
    }

    /// The field descriptor behind a qualified field name.
    pub fn field_spec(&self, qualified: &str) -> Option<&FieldSpec> {
        let (form, base) = qualified.split_once('.')?;
        let name = FormName::parse(form).ok()?;
        self.get(name.name())?.field(base)
    }
}
