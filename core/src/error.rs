use crate::index::DocumentId;
use thiserror::Error;

/// Every way an engine operation can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("stop word {0:?} contains a control character")]
    InvalidStopWord(String),
    /// Negative or already indexed document id.
    #[error("invalid document id {0}")]
    InvalidDocument(DocumentId),
    #[error("word {0:?} contains a control character")]
    InvalidWord(String),
    #[error("query word {0:?} is malformed")]
    InvalidQuerySyntax(String),
    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),
    #[error("index {index} is out of range for {count} documents")]
    IndexOutOfRange { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, SearchError>;
