use crate::index::DocumentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of documents returned per query.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are treated as equal and ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl RankedDocument {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for RankedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {:.6}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Whether `lhs` ranks ahead of `rhs`: higher rating when the relevances are
/// within `RELEVANCE_EPSILON`, higher relevance otherwise.
fn ranks_before(lhs: &RankedDocument, rhs: &RankedDocument) -> bool {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        lhs.rating > rhs.rating
    } else {
        lhs.relevance > rhs.relevance
    }
}

/// Order by descending relevance, near-equal relevances by descending rating.
///
/// The tolerance comparison is not a total order, so a stable relevance sort
/// is followed by an insertion pass with `ranks_before`. Afterwards every
/// adjacent pair satisfies it, and fully tied documents keep their input order.
pub fn sort_by_relevance(documents: &mut [RankedDocument]) {
    documents.sort_by(|lhs, rhs| rhs.relevance.total_cmp(&lhs.relevance));
    for i in 1..documents.len() {
        let mut j = i;
        while j > 0 && ranks_before(&documents[j], &documents[j - 1]) {
            documents.swap(j, j - 1);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(docs: &[RankedDocument]) -> Vec<DocumentId> {
        docs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn sorts_by_descending_relevance() {
        let mut docs = vec![
            RankedDocument::new(1, 0.1, 9),
            RankedDocument::new(2, 0.5, 0),
            RankedDocument::new(3, 0.3, 5),
        ];
        sort_by_relevance(&mut docs);
        assert_eq!(ids(&docs), vec![2, 3, 1]);
    }

    #[test]
    fn near_equal_relevance_falls_back_to_rating() {
        let mut docs = vec![
            RankedDocument::new(1, 0.5, 1),
            RankedDocument::new(2, 0.5 + 4e-7, 0),
            RankedDocument::new(3, 0.5 - 4e-7, 7),
        ];
        sort_by_relevance(&mut docs);
        assert_eq!(ids(&docs), vec![3, 1, 2]);
    }

    #[test]
    fn chained_near_ties_keep_distant_relevances_ordered() {
        let mut docs = vec![
            RankedDocument::new(1, 0.5, 9),
            RankedDocument::new(2, 0.5 + 0.9e-6, 0),
            RankedDocument::new(3, 0.5 + 1.8e-6, 0),
        ];
        sort_by_relevance(&mut docs);
        assert_eq!(ids(&docs), vec![3, 1, 2]);
        for pair in docs.windows(2) {
            assert!(!ranks_before(&pair[1], &pair[0]), "{:?} before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn difference_at_tolerance_is_not_a_tie() {
        let mut docs = vec![
            RankedDocument::new(1, 0.5, 9),
            RankedDocument::new(2, 0.5 + 2e-6, 0),
        ];
        sort_by_relevance(&mut docs);
        assert_eq!(ids(&docs), vec![2, 1]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let mut docs = vec![
            RankedDocument::new(5, 0.2, 1),
            RankedDocument::new(1, 0.2, 1),
        ];
        sort_by_relevance(&mut docs);
        assert_eq!(ids(&docs), vec![5, 1]);
    }

    #[test]
    fn display_matches_console_format() {
        let doc = RankedDocument::new(1, 0.25, -2);
        assert_eq!(doc.to_string(), "{ document_id = 1, relevance = 0.250000, rating = -2 }");
    }
}
