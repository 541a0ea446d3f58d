//! Grammar Profile Registry: file extension → tree-sitter language + the
//! declarative definition query for that language. Process-wide, immutable.
//! Adding a language means adding a `Lang` arm and a query file — the
//! classifier stays language-agnostic.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;

/// Supported language, carried through the type system so downstream code
/// never re-detects. One entry per grammar profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Java,
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Python,
}

impl Lang {
    /// The tree-sitter grammar for this language.
    #[must_use]
    pub fn language(self) -> tree_sitter::Language {
        match self {
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::JavaScript | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// The definition query source for this language. Declarative data,
    /// embedded at compile time.
    #[must_use]
    pub fn query_source(self) -> &'static str {
        match self {
            Self::Java => include_str!("queries/java.scm"),
            Self::TypeScript | Self::Tsx => include_str!("queries/typescript.scm"),
            Self::JavaScript | Self::Jsx => include_str!("queries/javascript.scm"),
            Self::Python => include_str!("queries/python.scm"),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::Python => "python",
        }
    }
}

/// Resolve a file path to its grammar profile. Lookup is by extension,
/// case-sensitive exact match. `None` means "skip this file" — not an error.
#[must_use]
pub fn resolve(path: &Path) -> Option<Lang> {
    match path.extension()?.to_str()? {
        "java" => Some(Lang::Java),
        "ts" => Some(Lang::TypeScript),
        "tsx" => Some(Lang::Tsx),
        "js" => Some(Lang::JavaScript),
        "jsx" => Some(Lang::Jsx),
        "py" => Some(Lang::Python),
        _ => None,
    }
}

/// Compiled-query cache keyed by language. Queries are immutable after
/// compilation; a lost race just recompiles, so no entry-level locking.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<Lang, Arc<tree_sitter::Query>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled definition query for a language, compiling on first
    /// use. Compilation failure is reported as a reason string; the caller
    /// attaches the file path.
    pub fn get(&self, lang: Lang) -> Result<Arc<tree_sitter::Query>, String> {
        if let Some(q) = self.entries.get(&lang) {
            return Ok(Arc::clone(&q));
        }
        let query = tree_sitter::Query::new(&lang.language(), lang.query_source())
            .map_err(|e| format!("query compile failed for {}: {e}", lang.name()))?;
        let query = Arc::new(query);
        self.entries.insert(lang, Arc::clone(&query));
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn resolves_supported_extensions() {
        let cases = [
            ("Main.java", Lang::Java),
            ("app.ts", Lang::TypeScript),
            ("view.tsx", Lang::Tsx),
            ("index.js", Lang::JavaScript),
            ("widget.jsx", Lang::Jsx),
            ("tool.py", Lang::Python),
        ];
        for (name, lang) in cases {
            assert_eq!(resolve(&PathBuf::from(name)), Some(lang), "{name}");
        }
    }

    #[test]
    fn unsupported_and_missing_extensions_are_none() {
        for name in ["notes.md", "README", "lib.rs", "data.json", "a.PY"] {
            assert_eq!(resolve(&PathBuf::from(name)), None, "{name}");
        }
    }

    #[test]
    fn every_profile_query_compiles() {
        let cache = QueryCache::new();
        for lang in [
            Lang::Java,
            Lang::TypeScript,
            Lang::Tsx,
            Lang::JavaScript,
            Lang::Jsx,
            Lang::Python,
        ] {
            cache.get(lang).unwrap_or_else(|e| panic!("{e}"));
        }
    }
}
