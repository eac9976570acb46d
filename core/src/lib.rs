//! In-memory full-text search with TF-IDF ranking.
//!
//! ```
//! use searchlist_core::{DocumentStatus, SearchEngine};
//!
//! let mut engine = SearchEngine::from_stop_words_text("and with").unwrap();
//! engine.add_document(1, "funny pet and nasty rat", DocumentStatus::Actual, &[1, 2]).unwrap();
//! engine.add_document(2, "funny pet with curly hair", DocumentStatus::Actual, &[1, 2]).unwrap();
//!
//! let top = engine.find_top_documents("curly -rat").unwrap();
//! assert_eq!(top.len(), 1);
//! assert_eq!(top[0].id, 2);
//! ```

pub mod batch;
pub mod engine;
pub mod error;
pub mod index;
pub mod paginate;
pub mod query;
pub mod rank;
pub mod tokenizer;

pub use batch::{process_queries, process_queries_each, process_queries_joined};
pub use engine::{SearchConfig, SearchEngine};
pub use error::{Result, SearchError};
pub use index::{DocumentId, DocumentStatus};
pub use paginate::{paginate, Page, Paginator};
pub use rank::{RankedDocument, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
