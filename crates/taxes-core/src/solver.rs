//! # Lazy Fixed-Point Solver
//!
//! The solver never sees a dependency graph up front. It evaluates the
//! required fields of the requested forms; every evaluation either
//! commits a value or raises a [`Signal`] that reveals one edge of the
//! graph:
//!
//! - `Unmet(dep)` enqueues `dep` (instantiating its form if needed) and
//!   parks the caller on the field tracker until `dep` is committed.
//! - `MissingInput(name)` parks the caller on the input tracker until the
//!   prompter supplies `name`.
//! - `NotImplemented` records the field; it is never retried.
//!
//! Parked fields are re-evaluated when their dependency is met. The loop
//! runs until no work, no release event, and no answerable input remains.
//!
//! ## Ordering
//!
//! The work list is a sorted set under the name comparator, so the order
//! in which fields are first attempted is the same on every run. Release
//! events drain in the order the dependencies were met.
//!
//! ## Cycles
//!
//! A parked field waits on exactly one name. The solver keeps the
//! `waiter -> awaited` map and refuses any new edge that would close a
//! loop, reporting the chain as [`TaxError::CyclicDependency`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Signal, TaxError, TaxResult};
use crate::field::FieldSpec;
use crate::form::{FormInstance, FormLibrary, FormSpec};
use crate::input::InputSpec;
use crate::names::{split_qualified, NameKey};
use crate::solution::Solution;
use crate::store::{InputStore, InputView, ValueStore, ValueView};
use crate::tracker::DependencyTracker;

// ---------------------------------------------------------------------------
// Prompter
// ---------------------------------------------------------------------------

/// Source of values for inputs missing from the input store.
///
/// The solver passes the qualified input name, its descriptor and the
/// fields parked on it. Returning `None` refuses the request; the solver
/// then asks for nothing else during the solve.
pub trait Prompter {
    /// Ask for one input.
    fn prompt(&mut self, name: &str, input: &InputSpec, waiting: &[String]) -> Option<String>;
}

impl<F> Prompter for F
where
    F: FnMut(&str, &InputSpec, &[String]) -> Option<String>,
{
    fn prompt(&mut self, name: &str, input: &InputSpec, waiting: &[String]) -> Option<String> {
        self(name, input, waiting)
    }
}

// ---------------------------------------------------------------------------
// Registry entries
// ---------------------------------------------------------------------------

/// A registered field: the owning instance plus its position in the spec.
#[derive(Debug, Clone)]
struct FieldEntry {
    form: String,
    spec: Arc<FormSpec>,
    index: usize,
}

impl FieldEntry {
    fn field(&self) -> Option<&FieldSpec> {
        self.spec.fields().nth(self.index)
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// One solve over a form library and an input store.
pub struct Solver<'a> {
    library: &'a FormLibrary,
    inputs: InputStore,
    values: ValueStore,
    forms: BTreeMap<NameKey, FormInstance>,
    fields: HashMap<String, FieldEntry>,
    input_specs: HashMap<String, Arc<InputSpec>>,
    unattempted: BTreeSet<NameKey>,
    field_deps: DependencyTracker,
    input_deps: DependencyTracker,
    solving: HashSet<String>,
    waiting_on: HashMap<String, String>,
    unimplemented: Vec<String>,
    prompted: HashSet<String>,
    prompter: Option<Box<dyn Prompter + 'a>>,
    refused_input: bool,
    solved: bool,
    done: bool,
}

impl<'a> Solver<'a> {
    /// A solver with no forms requested and no prompter.
    pub fn new(library: &'a FormLibrary, inputs: InputStore) -> Self {
        Self {
            library,
            inputs,
            values: ValueStore::new(),
            forms: BTreeMap::new(),
            fields: HashMap::new(),
            input_specs: HashMap::new(),
            unattempted: BTreeSet::new(),
            field_deps: DependencyTracker::new(),
            input_deps: DependencyTracker::new(),
            solving: HashSet::new(),
            waiting_on: HashMap::new(),
            unimplemented: Vec::new(),
            prompted: HashSet::new(),
            prompter: None,
            refused_input: false,
            solved: false,
            done: false,
        }
    }

    /// Ask `prompter` for inputs the store does not have.
    pub fn with_prompter(mut self, prompter: impl Prompter + 'a) -> Self {
        self.prompter = Some(Box::new(prompter));
        self
    }

    /// Request a form by `<name>` or `<name>:<instance>` and queue its
    /// required fields. Requesting an instantiated form again is a no-op.
    pub fn add_form(&mut self, qualified: &str) -> TaxResult<()> {
        self.instantiate(qualified)
    }

    fn instantiate(&mut self, qualified: &str) -> TaxResult<()> {
        let instance = self.library.instantiate(qualified)?;
        let key = NameKey::from(instance.qualified_name());
        if self.forms.contains_key(&key) {
            return Ok(());
        }
        let spec = Arc::clone(instance.spec());

        let mut new_inputs = Vec::with_capacity(spec.inputs().len());
        for input in spec.inputs() {
            let name = instance.qualify(input.name());
            if self.input_specs.contains_key(&name) {
                return Err(TaxError::DuplicateName(format!("{name} (input)")));
            }
            new_inputs.push((name, Arc::clone(input)));
        }
        let mut new_fields = Vec::new();
        for (index, field) in spec.fields().enumerate() {
            let name = instance.qualify(field.name());
            if self.fields.contains_key(&name) {
                return Err(TaxError::DuplicateName(format!("{name} (field)")));
            }
            new_fields.push((name, index));
        }

        self.input_specs.extend(new_inputs.iter().cloned());
        self.inputs.update_input_spec(new_inputs);
        let form = instance.qualified_name().to_string();
        for (name, index) in new_fields {
            self.fields.insert(
                name,
                FieldEntry {
                    form: form.clone(),
                    spec: Arc::clone(&spec),
                    index,
                },
            );
        }
        for field in spec.required_fields() {
            self.enqueue(instance.qualify(field.name()));
        }

        info!(
            form = %form,
            inputs = spec.inputs().len(),
            fields = spec.fields().count(),
            "instantiated form"
        );
        self.forms.insert(key, instance);
        self.done = false;
        Ok(())
    }

    fn enqueue(&mut self, name: String) {
        if self.solving.insert(name.clone()) {
            self.unattempted.insert(NameKey(name));
        }
    }

    /// Run to the fixed point. Returns whether the solve is complete.
    pub fn solve(&mut self) -> TaxResult<bool> {
        while !self.unattempted.is_empty()
            || self.field_deps.has_met()
            || self.input_deps.has_met()
            || self.can_prompt()
        {
            while let Some(name) = self.unattempted.pop_first() {
                self.evaluate(name.as_str())?;
            }

            let released: Vec<String> = self.field_deps.met_dependents().collect();
            for name in released {
                self.release(&name);
                self.evaluate(&name)?;
            }

            if self.can_prompt() {
                self.prompt_for_inputs()?;
            }

            let released: Vec<String> = self.input_deps.met_dependents().collect();
            for name in released {
                self.release(&name);
                self.evaluate(&name)?;
            }
        }

        self.done = true;
        self.solved = !self.field_deps.has_unmet()
            && !self.input_deps.has_unmet()
            && self.unimplemented.is_empty();
        info!(
            solved = self.solved,
            fields = self.values.len(),
            unimplemented = self.unimplemented.len(),
            "solve finished"
        );
        Ok(self.solved)
    }

    /// Prompting is possible while a prompter exists, nothing was refused,
    /// and some unmet input has not been asked for yet.
    fn can_prompt(&self) -> bool {
        self.prompter.is_some()
            && !self.refused_input
            && self
                .input_deps
                .unmet_names()
                .iter()
                .any(|name| !self.prompted.contains(name))
    }

    fn prompt_for_inputs(&mut self) -> TaxResult<()> {
        let Some(prompter) = self.prompter.as_mut() else {
            return Ok(());
        };
        for name in self.input_deps.unmet_names() {
            if !self.prompted.insert(name.clone()) {
                continue;
            }
            let spec = self
                .input_specs
                .get(&name)
                .cloned()
                .ok_or_else(|| TaxError::MissingInputSpec(name.clone()))?;
            let waiting = self.input_deps.waiters(&name);
            let Some(raw) = prompter.prompt(&name, &spec, &waiting) else {
                warn!(input = %name, "input refused, finishing with a partial solution");
                self.refused_input = true;
                break;
            };
            if let Err(reason) = spec.parse(&raw) {
                return Err(TaxError::InvalidInput { name, raw, reason });
            }
            self.inputs.set(&name, &raw)?;
            self.input_deps.meet(&name);
            debug!(input = %name, "input supplied");
        }
        Ok(())
    }

    fn release(&mut self, name: &str) {
        self.waiting_on.remove(name);
        debug!(field = %name, "released");
    }

    fn evaluate(&mut self, name: &str) -> TaxResult<()> {
        if self.values.contains(name) {
            return Ok(());
        }
        let entry = self
            .fields
            .get(name)
            .cloned()
            .ok_or_else(|| TaxError::UnknownField {
                name: name.to_string(),
                referenced_by: name.to_string(),
            })?;
        let field = entry.field().ok_or_else(|| TaxError::UnknownField {
            name: name.to_string(),
            referenced_by: entry.form.clone(),
        })?;

        let outcome = {
            let inputs = InputView::new(&entry.form, &self.inputs);
            let values = ValueView::new(&entry.form, &self.values);
            field.evaluate(name, &inputs, &values)
        };

        match outcome {
            Ok(value) => {
                debug!(field = %name, value = %field.to_string(&value), "solved");
                self.values.insert(name, value);
                self.field_deps.meet(name);
            }
            Err(Signal::Unmet(dep)) => {
                debug!(field = %name, on = %dep, "waiting on field");
                self.discover(&dep, name)?;
                self.wait_on(&dep, name)?;
                self.field_deps.add_unmet(&dep, name);
            }
            Err(Signal::MissingInput(input)) => {
                debug!(field = %name, on = %input, "waiting on input");
                self.input_deps.add_unmet(&input, name);
            }
            Err(Signal::NotImplemented(detail)) => {
                warn!(
                    field = %name,
                    detail = detail.as_deref().unwrap_or("unsupported scenario"),
                    "field not implemented"
                );
                if !self.unimplemented.iter().any(|f| f == name) {
                    self.unimplemented.push(name.to_string());
                }
            }
            Err(Signal::Fatal(err)) => return Err(err),
        }
        Ok(())
    }

    /// Make sure `dep` will be solved: instantiate its form and queue it.
    fn discover(&mut self, dep: &str, referenced_by: &str) -> TaxResult<()> {
        if self.solving.contains(dep) {
            return Ok(());
        }
        let (form, _) = split_qualified(dep).ok_or_else(|| TaxError::InvalidName {
            name: dep.to_string(),
            reason: format!("referenced by {referenced_by} without a form prefix"),
        })?;
        if !self.forms.contains_key(&NameKey::from(form)) {
            self.instantiate(form)?;
        }
        if !self.fields.contains_key(dep) {
            return Err(TaxError::UnknownField {
                name: dep.to_string(),
                referenced_by: referenced_by.to_string(),
            });
        }
        self.enqueue(dep.to_string());
        Ok(())
    }

    /// Record `waiter -> dep`, refusing edges that close a loop.
    fn wait_on(&mut self, dep: &str, waiter: &str) -> TaxResult<()> {
        let mut chain = vec![waiter.to_string(), dep.to_string()];
        let mut current = dep;
        while current != waiter {
            match self.waiting_on.get(current) {
                Some(next) => {
                    chain.push(next.clone());
                    current = next.as_str();
                }
                None => {
                    self.waiting_on.insert(waiter.to_string(), dep.to_string());
                    return Ok(());
                }
            }
        }
        Err(TaxError::CyclicDependency { chain })
    }

    // -- Results ------------------------------------------------------------

    /// Whether `solve` has run to completion.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the last solve completed with nothing outstanding.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Whether the prompter refused an input.
    pub fn refused_input(&self) -> bool {
        self.refused_input
    }

    /// Fields that reached an unsupported scenario, in discovery order.
    pub fn unimplemented_fields(&self) -> &[String] {
        &self.unimplemented
    }

    /// `input -> waiting fields` for every input still missing.
    pub fn unmet_input_dependencies(&self) -> BTreeMap<NameKey, Vec<String>> {
        self.input_deps.unmet()
    }

    /// `field -> waiting fields` for every field never committed.
    pub fn unmet_field_dependencies(&self) -> BTreeMap<NameKey, Vec<String>> {
        self.field_deps.unmet()
    }

    /// Instantiated forms in name order.
    pub fn forms(&self) -> impl Iterator<Item = &FormInstance> {
        self.forms.values()
    }

    /// Committed values.
    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    /// The input store, including prompted values.
    pub fn inputs(&self) -> &InputStore {
        &self.inputs
    }

    /// Hand back the input store, including prompted values.
    pub fn into_inputs(self) -> InputStore {
        self.inputs
    }

    /// Encode every committed value with its field's codec. Each
    /// instantiated form gets a section, even if nothing was computed.
    pub fn solution(&self) -> TaxResult<Solution> {
        let mut solution = Solution::new();
        for form in self.forms.keys() {
            solution.touch_form(form.as_str());
        }
        for (name, value) in self.values.iter() {
            let field = self
                .fields
                .get(name)
                .and_then(FieldEntry::field)
                .ok_or_else(|| TaxError::UnknownField {
                    name: name.to_string(),
                    referenced_by: "solution".into(),
                })?;
            solution.insert(name, field.to_string(value))?;
        }
        Ok(solution)
    }
}

impl std::fmt::Debug for Solver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("year", &self.library.year())
            .field("forms", &self.forms.len())
            .field("values", &self.values.len())
            .field("unattempted", &self.unattempted.len())
            .field("unimplemented", &self.unimplemented)
            .field("refused_input", &self.refused_input)
            .field("solved", &self.solved)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
