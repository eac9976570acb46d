use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-assigned document id. Negative values are rejected at insertion.
pub type DocumentId = i32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl DocumentStatus {
    /// Ordinal used when printing match results.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// word -> (document id -> term frequency). Append-only.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_document_freqs: BTreeMap<String, BTreeMap<DocumentId, f64>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record every word of one document. Each occurrence adds `1 / words.len()`
    /// to the word's posting, so a document's frequencies sum to 1. An empty
    /// word list leaves the index untouched.
    pub fn add_document(&mut self, document_id: DocumentId, words: &[&str]) {
        if words.is_empty() { return; }
        let inv_word_count = 1.0 / words.len() as f64;
        for word in words {
            *self
                .word_to_document_freqs
                .entry((*word).to_string())
                .or_default()
                .entry(document_id)
                .or_insert(0.0) += inv_word_count;
        }
    }

    pub fn postings(&self, word: &str) -> Option<&BTreeMap<DocumentId, f64>> {
        self.word_to_document_freqs.get(word)
    }

    /// Number of documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings(word).map_or(0, BTreeMap::len)
    }

    pub fn contains(&self, word: &str, document_id: DocumentId) -> bool {
        self.postings(word).is_some_and(|p| p.contains_key(&document_id))
    }

    /// Term frequencies of one document, keyed by word. Scans the vocabulary.
    pub fn word_frequencies(&self, document_id: DocumentId) -> BTreeMap<&str, f64> {
        self.word_to_document_freqs
            .iter()
            .filter_map(|(word, postings)| postings.get(&document_id).map(|tf| (word.as_str(), *tf)))
            .collect()
    }

    pub fn word_count(&self) -> usize { self.word_to_document_freqs.len() }
}

/// Per-document rating and status plus the order documents were added in.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocumentId, DocumentData>,
    document_ids: Vec<DocumentId>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, document_id: DocumentId, data: DocumentData) {
        self.documents.insert(document_id, data);
        self.document_ids.push(document_id);
    }

    pub fn get(&self, document_id: DocumentId) -> Option<&DocumentData> {
        self.documents.get(&document_id)
    }

    pub fn contains(&self, document_id: DocumentId) -> bool {
        self.documents.contains_key(&document_id)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    /// Id of the `index`-th inserted document.
    pub fn id_at(&self, index: usize) -> Option<DocumentId> {
        self.document_ids.get(index).copied()
    }
}

/// Truncating integer mean; 0 for no ratings.
pub fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() { return 0; }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}
