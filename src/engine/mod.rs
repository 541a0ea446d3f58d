//! Definition extraction engine: evaluate the language's structural query
//! over one parsed file and reduce the captures to at most one record per
//! identifier.

pub(crate) mod classify;
pub(crate) mod dedup;

use std::collections::HashSet;
use std::path::Path;

use streaming_iterator::StreamingIterator;

use crate::error::SiftError;
use crate::grammar::{Lang, QueryCache};
use crate::types::DefinitionRecord;
use classify::CaptureRole;

/// Parse `content` with the grammar for `lang`, run the definition query,
/// classify and deduplicate. Any parse, compile, or evaluation failure is a
/// non-fatal `Engine` error — the caller treats it as zero captures.
pub fn find_definitions(
    path: &Path,
    content: &str,
    lang: Lang,
    queries: &QueryCache,
) -> Result<Vec<DefinitionRecord>, SiftError> {
    find_definitions_with(path, content, lang, || queries.get(lang))
}

/// `query` supplies the compiled definition query; any failure it reports
/// is surfaced as an `Engine` error carrying the file path.
fn find_definitions_with(
    path: &Path,
    content: &str,
    lang: Lang,
    query: impl FnOnce() -> Result<std::sync::Arc<tree_sitter::Query>, String>,
) -> Result<Vec<DefinitionRecord>, SiftError> {
    let ts_lang = lang.language();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&ts_lang)
        .map_err(|e| SiftError::Engine {
            path: path.to_path_buf(),
            reason: format!("grammar rejected: {e}"),
        })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| SiftError::Engine {
            path: path.to_path_buf(),
            reason: "parser produced no tree".into(),
        })?;

    let query = query().map_err(|reason| SiftError::Engine {
        path: path.to_path_buf(),
        reason,
    })?;

    let bytes = content.as_bytes();
    let capture_names = query.capture_names();

    // Collect (role, node, pattern) triples — deterministic for identical
    // input. Labels outside the definition taxonomy drop here.
    let mut captures: Vec<(CaptureRole, tree_sitter::Node, usize)> = Vec::new();
    let mut cursor = tree_sitter::QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), bytes);
    while let Some(m) = matches.next() {
        for cap in m.captures {
            if let Some(role) = CaptureRole::parse(capture_names[cap.index as usize]) {
                captures.push((role, cap.node, m.pattern_index));
            }
        }
    }

    // A definition site is usually hit twice: an enclosing `definition.*`
    // capture and a `name.definition.*` capture on its name. Group by node
    // start position; only the preferred capture of each group classifies.
    let positions: Vec<(CaptureRole, dedup::Pos, usize)> = captures
        .iter()
        .map(|(role, node, pattern)| {
            let p = node.start_position();
            (*role, (p.row, p.column), *pattern)
        })
        .collect();
    let chosen = dedup::prefer_by_position(&positions);

    let mut produced_ranges: HashSet<(usize, usize)> = HashSet::new();
    let mut survivors = dedup::LongestBody::new();

    for idx in chosen {
        let (role, node, _) = captures[idx];
        if let Some(record) = classify::classify(role, node, path, content) {
            // A node matching several query patterns produces at most one record
            if produced_ranges.insert(record.byte_range) {
                survivors.insert(record);
            }
        }
    }

    Ok(survivors.into_records())
}
