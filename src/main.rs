use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use defsift::grammar::QueryCache;
use defsift::textsearch::SearchOptions;
use defsift::types::DefinitionRecord;

/// defsift — definition-aware code search. Finds where an identifier is
/// actually *defined* and prints the full construct, not the matching line.
#[derive(Parser)]
#[command(name = "defsift", version, about)]
struct Cli {
    /// Identifier to search for.
    query: Option<String>,

    /// Directory to search within.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Include glob (e.g. "*.ts", "src/**/*.py").
    #[arg(long)]
    glob: Option<String>,

    /// Extra file globs to exclude (repeatable). Merged with the defaults.
    #[arg(long = "exclude")]
    exclude_patterns: Vec<String>,

    /// Extra directory names to skip (repeatable). Merged with the defaults.
    #[arg(long = "exclude-dir")]
    exclude_dirs: Vec<String>,

    /// Treat the query as a literal string, not a regex.
    #[arg(short = 'F', long = "fixed-string")]
    fixed_string: bool,

    /// Machine-readable JSON output.
    #[arg(long)]
    json: bool,

    /// Run as MCP server (JSON-RPC on stdio).
    #[arg(long)]
    mcp: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    // Diagnostics go to stderr — stdout is reserved for results / the MCP wire
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "defsift", &mut io::stdout());
        return;
    }

    if cli.mcp {
        if let Err(e) = defsift::mcp::run() {
            eprintln!("mcp error: {e}");
            process::exit(1);
        }
        return;
    }

    let Some(query) = cli.query else {
        eprintln!("usage: defsift <identifier> [--root DIR] [--glob PATTERN] [--json]");
        process::exit(3);
    };

    let opts = SearchOptions {
        file_glob: cli.glob,
        exclude_patterns: cli.exclude_patterns,
        exclude_dirs: cli.exclude_dirs,
        literal: cli.fixed_string,
    };
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let queries = QueryCache::new();

    match defsift::run(&query, &root, &opts, &queries) {
        Ok(records) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&records)
                        .expect("records are always serializable")
                );
            } else {
                println!("{}", format_records(&query, &root, &records));
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

/// Human-readable rendering: a header, then one block per definition.
fn format_records(query: &str, root: &std::path::Path, records: &[DefinitionRecord]) -> String {
    let mut out = format!(
        "# \"{query}\" in {} — {} definition{}",
        root.display(),
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );

    for r in records {
        let _ = write!(
            out,
            "\n\n## {}:{}:{} [{}] {}\n{}",
            r.file_path.display(),
            r.line,
            r.column,
            r.kind,
            r.name,
            r.body
        );
    }

    out
}
