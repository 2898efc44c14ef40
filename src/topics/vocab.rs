// Interned vocabulary — every counted term gets a dense integer ID.
//
// Count tables are flat vectors indexed by these IDs, so lookups never hash
// a string twice and nothing depends on hash-map iteration order.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Dense index of a term in the vocabulary.
pub type TermId = usize;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the ID for `term`, assigning the next free one if it's new.
    pub fn intern(&mut self, term: &str) -> TermId {
        if let Some(id) = self.terms.get_index_of(term) {
            return id;
        }
        self.terms.insert_full(term.to_string()).0
    }

    pub fn id(&self, term: &str) -> Option<TermId> {
        self.terms.get_index_of(term)
    }

    /// The term behind an ID. IDs only ever come from this vocabulary.
    pub fn term(&self, id: TermId) -> &str {
        &self.terms[id]
    }

    /// Resolve a whitespace-separated multi-word term to its sub-word IDs.
    /// Returns `None` if any sub-word was never counted.
    pub fn resolve_words(&self, text: &str) -> Option<Vec<TermId>> {
        let ids: Option<Vec<TermId>> = text.split_whitespace().map(|w| self.id(w)).collect();
        ids.filter(|ids| !ids.is_empty())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.terms.iter().enumerate().map(|(id, t)| (id, t.as_str()))
    }
}
