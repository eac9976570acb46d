use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use searchlist_core::tokenizer::split_into_words;
use searchlist_core::{
    paginate, process_queries_each, DocumentId, DocumentStatus, RankedDocument, SearchConfig, SearchEngine,
    MAX_RESULT_DOCUMENT_COUNT,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocumentId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    results: &'a [RankedDocument],
}

#[derive(Parser)]
#[command(name = "searchlist")]
#[command(about = "Query an in-memory TF-IDF index built from a JSONL corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// JSONL file with one {"id", "text", "status", "ratings"} object per line
    #[arg(long)]
    docs: PathBuf,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Maximum documents returned per query
    #[arg(long, default_value_t = MAX_RESULT_DOCUMENT_COUNT)]
    max_results: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for each query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Split each result list into pages of this size
        #[arg(long)]
        page_size: Option<usize>,
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Run all queries as one parallel batch
        #[arg(long, default_value_t = false)]
        parallel: bool,
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Explain which query words every document matches
    Match {
        #[command(flatten)]
        corpus: CorpusArgs,
        query: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, page_size, json, parallel, queries } => {
            let engine = load_engine(&corpus)?;
            let output = OutputOptions { page_size, json };
            run_search(&engine, &queries, parallel, output, &mut io::stdout().lock())
        }
        Commands::Match { corpus, query } => {
            let engine = load_engine(&corpus)?;
            match_documents(&engine, &query, &mut io::stdout().lock())
        }
    }
}

fn load_engine(corpus: &CorpusArgs) -> Result<SearchEngine> {
    let config = SearchConfig { max_results: corpus.max_results };
    let mut engine = SearchEngine::with_config(split_into_words(&corpus.stop_words), config)?;
    let skipped = index_jsonl(&corpus.docs, &mut engine)?;
    tracing::info!(
        documents = engine.document_count(),
        skipped,
        stop_words = engine.stop_words().len(),
        "corpus loaded"
    );
    Ok(engine)
}

/// Add every document of a JSONL file. Documents the engine rejects are
/// logged and counted; malformed JSON aborts the load.
fn index_jsonl(file: &Path, engine: &mut SearchEngine) -> Result<usize> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut skipped = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed document", file.display(), line_no + 1))?;
        if let Err(err) = engine.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
            tracing::warn!(document_id = doc.id, %err, "document skipped");
            skipped += 1;
        }
    }
    Ok(skipped)
}

#[derive(Debug, Clone, Copy)]
struct OutputOptions {
    page_size: Option<usize>,
    json: bool,
}

/// Answer every query. Failed queries are logged and skipped.
fn run_search<W: Write>(
    engine: &SearchEngine,
    queries: &[String],
    parallel: bool,
    output: OutputOptions,
    out: &mut W,
) -> Result<()> {
    let results = if parallel {
        process_queries_each(engine, queries)
    } else {
        queries.iter().map(|query| engine.find_top_documents(query)).collect()
    };
    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(documents) => print_results(query, &documents, output, out)?,
            Err(err) => tracing::warn!(%query, %err, "query failed"),
        }
    }
    Ok(())
}

fn print_results<W: Write>(
    query: &str,
    documents: &[RankedDocument],
    output: OutputOptions,
    out: &mut W,
) -> Result<()> {
    if output.json {
        serde_json::to_writer(&mut *out, &QueryOutput { query, results: documents })?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "Search results for: {query}")?;
    match output.page_size {
        Some(size) => {
            for page in paginate(documents, size) {
                for document in page.items() {
                    writeln!(out, "{document}")?;
                }
                writeln!(out, "Page break")?;
            }
        }
        None => {
            for document in documents {
                writeln!(out, "{document}")?;
            }
        }
    }
    Ok(())
}

fn match_documents<W: Write>(engine: &SearchEngine, query: &str, out: &mut W) -> Result<()> {
    writeln!(out, "Matching documents for: {query}")?;
    for index in 0..engine.document_count() {
        let document_id = engine.document_id_at(index)?;
        let (words, status) = engine.match_document(query, document_id)?;
        writeln!(out, "{}", format_match(document_id, &words, status))?;
    }
    Ok(())
}

fn format_match(document_id: DocumentId, words: &[String], status: DocumentStatus) -> String {
    let mut out = format!("{{ document_id = {document_id}, status = {}, words =", status.ordinal());
    for word in words {
        out.push(' ');
        out.push_str(word);
    }
    out.push('}');
    out
}
