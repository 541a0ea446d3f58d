#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,  // line/column numbers as u32 — we target 64-bit
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::missing_errors_doc,        // internal pub(crate) fns don't need error docs
    clippy::missing_panics_doc,        // same
)]

pub mod decode;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod grammar;
pub mod mcp;
pub mod textsearch;
pub mod types;

use std::path::Path;

use error::SiftError;
use grammar::QueryCache;
use textsearch::SearchOptions;
use types::DefinitionRecord;

/// The single public API: text-search `root` for `query`, then enrich every
/// hit with the full structural definition of the identifier.
///
/// Only the search itself can fail (bad pattern, bad glob); per-file parse
/// and decode problems degrade to fewer records.
pub fn run(
    query: &str,
    root: &Path,
    opts: &SearchOptions,
    queries: &QueryCache,
) -> Result<Vec<DefinitionRecord>, SiftError> {
    let hits = textsearch::search(query, root, opts)?;
    Ok(enrich::enrich(&hits, query, queries))
}
