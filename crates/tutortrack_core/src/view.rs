//! Filtered student projection with explicit change subscribers.
//!
//! # Responsibility
//! - Hold the active predicate and a cached snapshot of matching students.
//! - Notify subscribers every time the snapshot is recomputed.
//!
//! # Invariants
//! - The snapshot always equals `source.filter(predicate)` as of the last
//!   `refresh`/`set_predicate` call; it never updates lazily.
//! - Subscribers are notified synchronously, in subscription order.

use crate::model::fields::TutorialClass;
use crate::model::student::Student;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Shareable student filter with a human-readable label.
#[derive(Clone)]
pub struct StudentPredicate {
    label: String,
    test: Arc<dyn Fn(&Student) -> bool + Send + Sync>,
}

impl StudentPredicate {
    pub fn new(
        label: impl Into<String>,
        test: impl Fn(&Student) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Accepts every student.
    pub fn show_all() -> Self {
        Self::new("all", |_| true)
    }

    /// Accepts students whose name contains any keyword as a whole word.
    pub fn name_contains_any(keywords: Vec<String>) -> Self {
        let label = format!("name contains any of [{}]", keywords.join(", "));
        Self::new(label, move |student| {
            keywords.iter().any(|keyword| student.name.contains_word(keyword))
        })
    }

    pub fn in_tutorial(tutorial_class: TutorialClass) -> Self {
        let label = format!("in tutorial {tutorial_class}");
        Self::new(label, move |student| {
            student.tutorial_class.as_ref() == Some(&tutorial_class)
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, student: &Student) -> bool {
        (self.test)(student)
    }
}

impl Debug for StudentPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudentPredicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Default for StudentPredicate {
    fn default() -> Self {
        Self::show_all()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Student])>;

#[derive(Default)]
pub struct FilteredStudentList {
    predicate: StudentPredicate,
    snapshot: Vec<Student>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl FilteredStudentList {
    /// Creates a show-all view over `source`.
    pub fn new(source: &[Student]) -> Self {
        let mut view = Self::default();
        view.recompute(source);
        view
    }

    pub fn students(&self) -> &[Student] {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Zero-based lookup into the visible snapshot.
    pub fn get(&self, index: usize) -> Option<&Student> {
        self.snapshot.get(index)
    }

    pub fn predicate(&self) -> &StudentPredicate {
        &self.predicate
    }

    /// Replaces the predicate and re-evaluates immediately.
    pub fn set_predicate(&mut self, predicate: StudentPredicate, source: &[Student]) {
        self.predicate = predicate;
        self.refresh(source);
    }

    /// Re-evaluates the current predicate against `source` and notifies.
    pub fn refresh(&mut self, source: &[Student]) {
        self.recompute(source);
        for (_, listener) in &mut self.listeners {
            listener(&self.snapshot);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[Student]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn recompute(&mut self, source: &[Student]) {
        self.snapshot = source
            .iter()
            .filter(|student| self.predicate.matches(student))
            .cloned()
            .collect();
    }
}

impl Debug for FilteredStudentList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredStudentList")
            .field("predicate", &self.predicate)
            .field("snapshot", &self.snapshot)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PartialEq for FilteredStudentList {
    /// Views compare by visible content only.
    fn eq(&self, other: &Self) -> bool {
        self.snapshot == other.snapshot
    }
}
