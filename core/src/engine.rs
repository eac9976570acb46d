use crate::error::{Result, SearchError};
use crate::index::{compute_average_rating, DocumentData, DocumentId, DocumentStatus, DocumentStore, InvertedIndex};
use crate::query::{parse_query, Query};
use crate::rank::{sort_by_relevance, RankedDocument, MAX_RESULT_DOCUMENT_COUNT};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Upper bound on the length of every result list.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: MAX_RESULT_DOCUMENT_COUNT }
    }
}

/// In-memory TF-IDF search engine.
///
/// Documents are only ever appended. Indexing takes `&mut self`, every query
/// takes `&self`, so a fully built engine can be shared across threads for
/// reads without locking.
#[derive(Debug)]
pub struct SearchEngine {
    stop_words: StopWords,
    index: InvertedIndex,
    documents: DocumentStore,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, SearchConfig::default())
    }

    pub fn with_config<I, S>(stop_words: I, config: SearchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_parts(StopWords::new(stop_words)?, config))
    }

    /// Build from a space-separated stop-word list.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::from_parts(StopWords::from_text(text)?, SearchConfig::default()))
    }

    fn from_parts(stop_words: StopWords, config: SearchConfig) -> Self {
        Self {
            stop_words,
            index: InvertedIndex::new(),
            documents: DocumentStore::new(),
            config,
        }
    }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn config(&self) -> SearchConfig { self.config }

    /// Index one document. Either the whole document is recorded or, on
    /// error, nothing is.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 || self.documents.contains(document_id) {
            return Err(SearchError::InvalidDocument(document_id));
        }
        let words = self.split_into_words_no_stop(text)?;
        self.index.add_document(document_id, &words);
        let rating = compute_average_rating(ratings);
        self.documents.insert(document_id, DocumentData { rating, status });
        tracing::debug!(document_id, words = words.len(), rating, ?status, "document indexed");
        Ok(())
    }

    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<RankedDocument>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<RankedDocument>> {
        self.find_top_documents_with(raw_query, |_, document_status, _| document_status == status)
    }

    /// Top documents accepted by `predicate(id, status, rating)`.
    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<RankedDocument>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&query, predicate);
        let hits = matched.len();
        sort_by_relevance(&mut matched);
        matched.truncate(self.config.max_results);
        tracing::debug!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            hits,
            returned = matched.len(),
            "query ranked"
        );
        Ok(matched)
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    /// Id of the `index`-th document in insertion order.
    pub fn document_id_at(&self, index: usize) -> Result<DocumentId> {
        self.documents
            .id_at(index)
            .ok_or(SearchError::IndexOutOfRange { index, count: self.document_count() })
    }

    /// Plus words of `raw_query` present in the document, in lexicographic
    /// order, and the document's status. The word list is empty when the
    /// document contains any minus word.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = parse_query(raw_query, &self.stop_words)?;
        let status = self
            .documents
            .get(document_id)
            .map(|data| data.status)
            .ok_or(SearchError::DocumentNotFound(document_id))?;

        if query.minus_words.iter().any(|word| self.index.contains(word, document_id)) {
            return Ok((Vec::new(), status));
        }
        let matched_words = query
            .plus_words
            .iter()
            .filter(|word| self.index.contains(word, document_id))
            .cloned()
            .collect();
        Ok((matched_words, status))
    }

    /// Term frequency of every word of a document; empty for unknown ids.
    pub fn word_frequencies(&self, document_id: DocumentId) -> BTreeMap<&str, f64> {
        self.index.word_frequencies(document_id)
    }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    // Only called for words present in the index, so the divisor is nonzero.
    fn inverse_document_freq(&self, word: &str) -> f64 {
        (self.document_count() as f64 / self.index.document_frequency(word) as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<RankedDocument>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            let idf = self.inverse_document_freq(word);
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(document_id) else { continue };
                if predicate(document_id, data.status, data.rating) {
                    *document_to_relevance.entry(document_id).or_insert(0.0) += term_freq * idf;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            for document_id in postings.keys() {
                document_to_relevance.remove(document_id);
            }
        }

        document_to_relevance
            .into_iter()
            .filter_map(|(document_id, relevance)| {
                self.documents
                    .get(document_id)
                    .map(|data| RankedDocument::new(document_id, relevance, data.rating))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        let mut engine = SearchEngine::from_stop_words_text("in the").unwrap();
        engine.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        engine
    }

    #[test]
    fn stop_words_are_excluded_from_documents() {
        let engine = engine();
        assert!(engine.find_top_documents("in").unwrap().is_empty());
        let found = engine.find_top_documents("cat").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 42);
        assert_eq!(found[0].rating, 2);
    }

    #[test]
    fn failed_insert_leaves_engine_untouched() {
        let mut engine = engine();
        let err = engine
            .add_document(43, "dog in the \u{7}park", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err, SearchError::InvalidWord("\u{7}park".into()));
        assert_eq!(engine.document_count(), 1);
        assert!(engine.word_frequencies(43).is_empty());
        assert!(engine.find_top_documents("dog").unwrap().is_empty());
        engine.add_document(43, "dog", DocumentStatus::Actual, &[]).unwrap();
        assert_eq!(engine.document_count(), 2);
    }

    #[test]
    fn rejects_negative_and_duplicate_ids() {
        let mut engine = engine();
        assert_eq!(
            engine.add_document(-1, "dog", DocumentStatus::Actual, &[]),
            Err(SearchError::InvalidDocument(-1))
        );
        assert_eq!(
            engine.add_document(42, "dog", DocumentStatus::Actual, &[]),
            Err(SearchError::InvalidDocument(42))
        );
        assert_eq!(engine.document_count(), 1);
    }

    #[test]
    fn single_document_word_has_zero_idf() {
        let found = engine().find_top_documents("cat").unwrap();
        assert_eq!(found[0].relevance, 0.0);
    }

    #[test]
    fn max_results_is_configurable() {
        let mut engine =
            SearchEngine::with_config(["x"], SearchConfig { max_results: 2 }).unwrap();
        for id in 0..4 {
            engine.add_document(id, "common", DocumentStatus::Actual, &[id]).unwrap();
        }
        engine.add_document(10, "other", DocumentStatus::Actual, &[]).unwrap();
        let found = engine.find_top_documents("common").unwrap();
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn match_checks_document_after_parsing() {
        let engine = engine();
        assert_eq!(engine.match_document("cat", 7), Err(SearchError::DocumentNotFound(7)));
        assert!(matches!(
            engine.match_document("--cat", 7),
            Err(SearchError::InvalidQuerySyntax(_))
        ));
    }
}
