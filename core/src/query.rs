use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeSet;

/// A query split into required and excluded words, stop words removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWord<'a> {
    pub data: &'a str,
    pub is_minus: bool,
    pub is_stop: bool,
}

/// Classify one raw query token.
pub fn parse_query_word<'a>(text: &'a str, stop_words: &StopWords) -> Result<QueryWord<'a>> {
    if text.is_empty() {
        return Err(SearchError::InvalidQuerySyntax(String::new()));
    }
    match text.strip_prefix('-') {
        Some(word) => {
            if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
                return Err(SearchError::InvalidQuerySyntax(text.to_string()));
            }
            Ok(QueryWord { data: word, is_minus: true, is_stop: stop_words.contains(word) })
        }
        None => {
            if !is_valid_word(text) {
                return Err(SearchError::InvalidWord(text.to_string()));
            }
            Ok(QueryWord { data: text, is_minus: false, is_stop: stop_words.contains(text) })
        }
    }
}

/// Parse a raw query. Fails on the first malformed token.
pub fn parse_query(text: &str, stop_words: &StopWords) -> Result<Query> {
    let mut query = Query::default();
    for raw in split_into_words(text) {
        let word = parse_query_word(raw, stop_words)?;
        if word.is_stop { continue; }
        if word.is_minus {
            query.minus_words.insert(word.data.to_string());
        } else {
            query.plus_words.insert(word.data.to_string());
        }
    }
    Ok(query)
}
