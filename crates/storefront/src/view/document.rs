//! In-memory document.

use std::collections::BTreeMap;

use super::{Document, MutationRecord};

/// A document made of addressable elements holding HTML fragments.
///
/// Elements present at construction count as initial markup. Elements added
/// afterwards with [`MemoryDocument::insert_element`] are reported through
/// [`Document::take_records`], the way markup injected by other page logic
/// shows up to a mutation observer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    elements: BTreeMap<String, String>,
    records: Vec<MutationRecord>,
}

impl MemoryDocument {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose initial markup contains the given element ids.
    #[must_use]
    pub fn with_elements<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            elements: ids
                .into_iter()
                .map(|id| (id.to_string(), String::new()))
                .collect(),
            records: Vec::new(),
        }
    }

    /// Add an empty element after load. No-op if it already exists.
    pub fn insert_element(&mut self, id: &str) {
        if self.elements.contains_key(id) {
            return;
        }
        self.elements.insert(id.to_string(), String::new());
        self.records.push(MutationRecord::Added(id.to_string()));
    }

    /// Remove an element. No-op if it does not exist.
    pub fn remove_element(&mut self, id: &str) {
        if self.elements.remove(id).is_some() {
            self.records.push(MutationRecord::Removed(id.to_string()));
        }
    }

    /// Current content of an element.
    #[must_use]
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(String::as_str)
    }

    /// All element ids with their content.
    #[must_use]
    pub const fn elements(&self) -> &BTreeMap<String, String> {
        &self.elements
    }
}

impl Document for MemoryDocument {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(content) => {
                html.clone_into(content);
                true
            }
            None => false,
        }
    }

    fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }
}
