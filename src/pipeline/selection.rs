use std::collections::HashSet;

use crate::models::Patient;

/// The user's current batch choice: a process-lifetime mutable set of
/// record identifiers. All operations are idempotent; there is no
/// persistence — one interactive session, one set.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Adding an already-present id is a no-op.
    pub fn add(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    /// Remove an id. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Replace the selection with every given id.
    pub fn select_all<I, S>(&mut self, all_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = all_ids.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Filter a listing down to the selected records, preserving the
    /// listing's order. This builds the input sequence for a batch run.
    pub fn filter<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.contains(&p.id)).collect()
    }
}
