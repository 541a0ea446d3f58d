//! Enrichment Pipeline: turn raw text-search hits into structural
//! definition records, one engine pass per distinct file, results appended
//! in file-encounter order. All per-file failures are contained here.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::decode;
use crate::engine;
use crate::error::SiftError;
use crate::grammar::{self, QueryCache};
use crate::types::{DefinitionRecord, MatchHit};

/// Enrich `hits` with structural definitions. Each distinct file is
/// processed at most once, in the order files first appear among the hits.
/// When `search_term` is non-empty, only records whose identifier equals it
/// exactly (case-sensitive) survive; an empty term keeps every record.
///
/// Per-file failures degrade to fewer records — an empty result is a valid
/// outcome, not an error.
#[must_use]
pub fn enrich(hits: &[MatchHit], search_term: &str, queries: &QueryCache) -> Vec<DefinitionRecord> {
    let mut processed: HashSet<PathBuf> = HashSet::new();
    let mut out = Vec::new();

    for hit in hits {
        if !processed.insert(hit.file_path.clone()) {
            continue;
        }
        match enrich_file(&hit.file_path, search_term, queries) {
            Ok(mut records) => out.append(&mut records),
            Err(SiftError::UnsupportedFile { path }) => {
                tracing::debug!(path = %path.display(), "skipping unsupported file type");
            }
            Err(e) => {
                tracing::warn!(error = %e, "file contributed no definitions");
            }
        }
    }

    out
}

/// Process one file: decode, resolve grammar, run the engine, filter by the
/// search term. Exposed with a typed error so tests can assert on the
/// failure kind of each stage.
pub fn enrich_file(
    path: &Path,
    search_term: &str,
    queries: &QueryCache,
) -> Result<Vec<DefinitionRecord>, SiftError> {
    let Some(lang) = grammar::resolve(path) else {
        return Err(SiftError::UnsupportedFile {
            path: path.to_path_buf(),
        });
    };

    let content = decode::read_file_text(path)?;

    // Record names are literal substrings of the source, so a file without
    // the term as a byte sequence cannot contribute. memmem (SIMD) is far
    // cheaper than a tree-sitter parse.
    if !search_term.is_empty()
        && memchr::memmem::find(content.as_bytes(), search_term.as_bytes()).is_none()
    {
        return Ok(Vec::new());
    }

    let records = engine::find_definitions(path, &content, lang, queries)?;

    Ok(records
        .into_iter()
        .filter(|r| search_term.is_empty() || r.name == search_term)
        .collect())
}
