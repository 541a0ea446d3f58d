use std::path::PathBuf;

/// Every error defsift can produce. Per-file failures (engine, decode,
/// unsupported extension) are contained by the pipeline and never abort an
/// enrichment run; only search front-end failures surface to the caller.
#[derive(Debug)]
pub enum SiftError {
    /// Extension not in the supported grammar set. The file is skipped.
    UnsupportedFile {
        path: PathBuf,
    },
    /// Parse, query-compile, or query-evaluation failure. The file
    /// contributes zero records.
    Engine {
        path: PathBuf,
        reason: String,
    },
    /// The decoding collaborator could not produce text for the file.
    Decode {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The search pattern or glob did not compile.
    InvalidQuery {
        query: String,
        reason: String,
    },
}

impl std::fmt::Display for SiftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFile { path } => {
                write!(f, "unsupported file type: {}", path.display())
            }
            Self::Engine { path, reason } => {
                write!(f, "engine error in {}: {reason}", path.display())
            }
            Self::Decode { path, source } => {
                write!(f, "decode error in {}: {source}", path.display())
            }
            Self::InvalidQuery { query, reason } => {
                write!(f, "invalid query \"{query}\": {reason}")
            }
        }
    }
}

impl std::error::Error for SiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl SiftError {
    /// Process exit code for CLI mode.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Decode { .. } => 2,
            Self::InvalidQuery { .. } | Self::Engine { .. } => 3,
            Self::UnsupportedFile { .. } => 4,
        }
    }
}
