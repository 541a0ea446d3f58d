//! Text-search front end: regex search over a directory tree, producing the
//! raw `MatchHit`s the enrichment pipeline consumes. Built on the ripgrep
//! crates with an ignore-style parallel walk; output is re-sorted so the
//! parallel walk stays externally deterministic.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use globset::{Glob, GlobSet, GlobSetBuilder};
use grep_matcher::Matcher;
use grep_regex::RegexMatcher;
use grep_searcher::Searcher;
use grep_searcher::sinks::UTF8;
use ignore::WalkBuilder;

use crate::error::SiftError;
use crate::types::MatchHit;

// Directories that are always skipped — build artifacts, dependencies,
// VCS internals, editor state.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    "coverage",
    "tmp",
    "temp",
    "logs",
    ".vscode",
    ".idea",
];

// File patterns that are always skipped — logs, scratch and backup files.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.log", "*.tmp", "*.temp", "*.bak"];

// Oversized files are skipped — neither the searcher nor tree-sitter should
// spend time on minified bundles.
const MAX_SEARCH_FILE_SIZE: u64 = 500_000;

/// Caller-supplied narrowing, merged with the fixed defaults.
#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    /// Include glob matched against the file name or root-relative path.
    pub file_glob: Option<String>,
    /// Extra exclude globs, merged with `DEFAULT_EXCLUDE_PATTERNS`.
    pub exclude_patterns: Vec<String>,
    /// Extra directory names to skip, merged with `DEFAULT_EXCLUDE_DIRS`.
    pub exclude_dirs: Vec<String>,
    /// Treat the pattern as a literal string instead of a regex.
    pub literal: bool,
}

/// Search `root` for lines matching `pattern` (regex, or a literal string
/// when `opts.literal` is set). Returns one hit per matching line, sorted
/// by (path, line, column).
pub fn search(
    pattern: &str,
    root: &Path,
    opts: &SearchOptions,
) -> Result<Vec<MatchHit>, SiftError> {
    let escaped;
    let effective = if opts.literal {
        escaped = regex_syntax::escape(pattern);
        escaped.as_str()
    } else {
        pattern
    };
    let matcher = RegexMatcher::new(effective).map_err(|e| SiftError::InvalidQuery {
        query: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let include = match &opts.file_glob {
        Some(g) => Some(
            Glob::new(g)
                .map_err(|e| SiftError::InvalidQuery {
                    query: g.clone(),
                    reason: e.to_string(),
                })?
                .compile_matcher(),
        ),
        None => None,
    };

    let excludes = build_exclude_set(&opts.exclude_patterns)?;

    let skip_dirs: HashSet<String> = DEFAULT_EXCLUDE_DIRS
        .iter()
        .map(|s| (*s).to_string())
        .chain(opts.exclude_dirs.iter().cloned())
        .collect();

    let hits: Mutex<Vec<MatchHit>> = Mutex::new(Vec::new());
    let root_buf = root.to_path_buf();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .filter_entry(move |entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Some(name) = entry.file_name().to_str() {
                    return !skip_dirs.contains(name);
                }
            }
            true
        })
        .build_parallel();

    walker.run(|| {
        let matcher = &matcher;
        let include = include.as_ref();
        let excludes = &excludes;
        let hits = &hits;
        let root = &root_buf;

        Box::new(move |entry| {
            let Ok(entry) = entry else {
                return ignore::WalkState::Continue;
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return ignore::WalkState::Continue;
            }

            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let rel = path.strip_prefix(root).unwrap_or(path);

            if let Some(inc) = include {
                if !inc.is_match(name) && !inc.is_match(rel) {
                    return ignore::WalkState::Continue;
                }
            }
            if excludes.is_match(name) || excludes.is_match(rel) {
                return ignore::WalkState::Continue;
            }

            if let Ok(meta) = std::fs::metadata(path) {
                if meta.len() > MAX_SEARCH_FILE_SIZE {
                    return ignore::WalkState::Continue;
                }
            }

            let mut file_hits = Vec::new();
            let mut searcher = Searcher::new();

            let _ = searcher.search_path(
                matcher,
                path,
                UTF8(|line_num, line| {
                    let column = match matcher.find(line.as_bytes()) {
                        Ok(Some(m)) => m.start() as u32 + 1,
                        _ => 1,
                    };
                    file_hits.push(MatchHit {
                        file_path: path.to_path_buf(),
                        line: line_num as u32,
                        column,
                        matched_text: line.trim().to_string(),
                    });
                    Ok(true)
                }),
            );

            if !file_hits.is_empty() {
                let mut all = hits
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                all.extend(file_hits);
            }

            ignore::WalkState::Continue
        })
    });

    let mut all = hits
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    all.sort_by(|a, b| {
        (&a.file_path, a.line, a.column).cmp(&(&b.file_path, b.line, b.column))
    });
    Ok(all)
}

fn build_exclude_set(extra: &[String]) -> Result<GlobSet, SiftError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_EXCLUDE_PATTERNS
        .iter()
        .map(|s| (*s).to_string())
        .chain(extra.iter().cloned())
    {
        builder.add(Glob::new(&pattern).map_err(|e| SiftError::InvalidQuery {
            query: pattern.clone(),
            reason: e.to_string(),
        })?);
    }
    builder.build().map_err(|e| SiftError::InvalidQuery {
        query: "<exclude set>".into(),
        reason: e.to_string(),
    })
}
