use std::path::PathBuf;

use serde::Serialize;

/// A single raw text-search hit, prior to structural enrichment.
/// Produced by the search front end; read-only input to the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct MatchHit {
    #[serde(rename = "filePath")]
    pub file_path: PathBuf,
    /// 1-based line of the match.
    pub line: u32,
    /// 1-based column of the first match on the line.
    pub column: u32,
    #[serde(rename = "match")]
    pub matched_text: String,
}

/// The semantic category of a defining construct. Closed, language-agnostic
/// set — the union of every per-language kind vocabulary. A capture label
/// whose suffix is not in this set never becomes a record, which is how the
/// definition-vs-call allow-list is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Variable,
    Function,
    Class,
    Method,
    Interface,
    Module,
    Type,
    Enum,
    Field,
    MemberFunction,
    Property,
    Parameter,
    Constructor,
    Annotation,
}

impl DefinitionKind {
    /// Parse a capture-label suffix (e.g. `method`, `member_function`).
    /// Unknown suffixes return `None` — the capture is not a definition.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "variable" => Self::Variable,
            "function" => Self::Function,
            "class" => Self::Class,
            "method" => Self::Method,
            "interface" => Self::Interface,
            "module" => Self::Module,
            "type" => Self::Type,
            "enum" => Self::Enum,
            "field" => Self::Field,
            "member_function" => Self::MemberFunction,
            "property" => Self::Property,
            "parameter" => Self::Parameter,
            "constructor" => Self::Constructor,
            "annotation" => Self::Annotation,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Interface => "interface",
            Self::Module => "module",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Field => "field",
            Self::MemberFunction => "member_function",
            Self::Property => "property",
            Self::Parameter => "parameter",
            Self::Constructor => "constructor",
            Self::Annotation => "annotation",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The enriched output unit: one structural definition, with the exact
/// source span of the whole construct. Never mutated after creation —
/// a superseding record is a new object.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionRecord {
    #[serde(rename = "filePath")]
    pub file_path: PathBuf,
    /// 1-based start line of the defining node.
    pub line: u32,
    /// 1-based start column of the defining node.
    pub column: u32,
    /// The defined identifier. For assignment-style member functions this is
    /// the full dotted path (`obj.sub.handler`), not a single token.
    #[serde(rename = "match")]
    pub name: String,
    #[serde(rename = "definitionType")]
    pub kind: DefinitionKind,
    /// Exact source substring of the full construct, signature and body.
    #[serde(rename = "definitionCode")]
    pub body: String,
    /// Byte range of the defining node within the file.
    #[serde(skip)]
    pub byte_range: (usize, usize),
}
