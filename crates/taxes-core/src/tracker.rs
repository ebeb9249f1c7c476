//! # Dependency Tracker
//!
//! A multimap from unmet dependency names to the fields waiting on them,
//! plus a queue of names that have since been met. The solver keeps two:
//! one for field-on-field waits and one for field-on-input waits.
//!
//! Draining is destructive: [`DependencyTracker::met_dependents`] yields
//! every waiter released since the previous drain, removing each as it
//! goes. Waiters are released in the order their dependency was met,
//! and in registration order within one dependency.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::names::NameKey;

/// Waiter registry for one kind of dependency.
#[derive(Debug, Clone, Default)]
pub struct DependencyTracker {
    unmet: HashMap<String, VecDeque<String>>,
    met: VecDeque<String>,
}

impl DependencyTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `waiter` as waiting on `name`.
    pub fn add_unmet(&mut self, name: &str, waiter: &str) {
        self.unmet
            .entry(name.to_string())
            .or_default()
            .push_back(waiter.to_string());
    }

    /// Record that `name` is now available.
    pub fn meet(&mut self, name: &str) {
        self.met.push_back(name.to_string());
    }

    /// Whether release events are pending.
    pub fn has_met(&self) -> bool {
        !self.met.is_empty()
    }

    /// Whether some name still has waiters and has not been met.
    pub fn has_unmet(&self) -> bool {
        self.unmet
            .iter()
            .any(|(name, waiters)| !waiters.is_empty() && !self.is_pending_met(name))
    }

    fn is_pending_met(&self, name: &str) -> bool {
        self.met.iter().any(|m| m == name)
    }

    /// The fields currently waiting on `name`.
    pub fn waiters(&self, name: &str) -> Vec<String> {
        self.unmet
            .get(name)
            .map(|w| w.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names that still have waiters and are not met, in name order.
    pub fn unmet_names(&self) -> Vec<String> {
        self.unmet().into_keys().map(|k| k.0).collect()
    }

    /// Snapshot of `name -> waiters` for every unmet name, in name order.
    pub fn unmet(&self) -> BTreeMap<NameKey, Vec<String>> {
        self.unmet
            .iter()
            .filter(|(name, waiters)| !waiters.is_empty() && !self.is_pending_met(name))
            .map(|(name, waiters)| (NameKey::from(name.as_str()), waiters.iter().cloned().collect()))
            .collect()
    }

    /// Lazily drain released waiters.
    pub fn met_dependents(&mut self) -> MetDependents<'_> {
        MetDependents { tracker: self }
    }
}

/// Destructive iterator over released waiters; see
/// [`DependencyTracker::met_dependents`].
#[derive(Debug)]
pub struct MetDependents<'a> {
    tracker: &'a mut DependencyTracker,
}

impl Iterator for MetDependents<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let head = self.tracker.met.front()?;
            let Some(waiters) = self.tracker.unmet.get_mut(head) else {
                self.tracker.met.pop_front();
                continue;
            };
            match waiters.pop_front() {
                Some(waiter) => {
                    if waiters.is_empty() {
                        self.tracker.unmet.remove(head.as_str());
                        self.tracker.met.pop_front();
                    }
                    return Some(waiter);
                }
                None => {
                    self.tracker.unmet.remove(head.as_str());
                    self.tracker.met.pop_front();
                }
            }
        }
    }
}
