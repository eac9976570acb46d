use crate::engine::SearchEngine;
use crate::error::Result;
use crate::rank::RankedDocument;
use rayon::prelude::*;

/// Run every query against `engine` in parallel, keeping one result per
/// query in input order. A failing query does not affect the others.
pub fn process_queries_each<S>(engine: &SearchEngine, queries: &[S]) -> Vec<Result<Vec<RankedDocument>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| engine.find_top_documents(query.as_ref()))
        .collect()
}

/// Run every query against `engine` in parallel. Output order follows
/// `queries`; the first failing query (in input order) aborts the batch.
pub fn process_queries<S>(engine: &SearchEngine, queries: &[S]) -> Result<Vec<Vec<RankedDocument>>>
where
    S: AsRef<str> + Sync,
{
    process_queries_each(engine, queries).into_iter().collect()
}

/// Like [`process_queries`], flattened into one list in query order. Hits
/// with zero relevance are dropped.
pub fn process_queries_joined<S>(engine: &SearchEngine, queries: &[S]) -> Result<Vec<RankedDocument>>
where
    S: AsRef<str> + Sync,
{
    let per_query = process_queries(engine, queries)?;
    Ok(per_query
        .into_iter()
        .flatten()
        .filter(|document| document.relevance != 0.0)
        .collect())
}
