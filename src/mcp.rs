use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grammar::QueryCache;
use crate::textsearch::SearchOptions;

// Sent to the LLM via the MCP `instructions` field during initialization.
const SERVER_INSTRUCTIONS: &str = "\
defsift — definition-aware code search MCP server. One tool: defsift_search.\n\
\n\
defsift_search runs a text search over the repository, then parses every file \
that matched and returns the full structural definition of the searched \
identifier — the whole function/class/method body, not just the matching line. \
Results are exact-identifier matches; a call site alone never produces a result. \
Supported languages: Java, TypeScript, TSX, JavaScript, JSX, Python. Files in \
other languages are skipped silently.\n\
\n\
An empty result means no structural definition was found — fall back to a plain \
text search in that case.";

/// MCP server over stdio: JSON-RPC 2.0, one request per line.
pub fn run() -> io::Result<()> {
    let queries = QueryCache::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, None, -32700, &format!("parse error: {e}"))?;
                continue;
            }
        };

        // Notifications have no id — silently drop them per JSON-RPC spec
        if req.id.is_none() {
            continue;
        }

        let response = handle_request(&req, &queries);
        serde_json::to_writer(&mut stdout, &response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    Ok(())
}

#[derive(Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

fn handle_request(req: &JsonRpcRequest, queries: &QueryCache) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "defsift",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": SERVER_INSTRUCTIONS
            })),
            error: None,
        },

        "tools/list" => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "tools": tool_definitions()
            })),
            error: None,
        },

        "tools/call" => handle_tool_call(req, queries),

        "ping" => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({})),
            error: None,
        },

        _ => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: format!("method not found: {}", req.method),
            }),
        },
    }
}

/// Execute a tool by name with the given arguments. Returns the tool output
/// or an error string surfaced to the host as `isError`.
pub(crate) fn dispatch_tool(tool: &str, args: &Value, queries: &QueryCache) -> Result<String, String> {
    match tool {
        "defsift_search" => tool_search(args, queries),
        _ => Err(format!("unknown tool: {tool}")),
    }
}

fn tool_search(args: &Value, queries: &QueryCache) -> Result<String, String> {
    let query = args
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or("missing required parameter: query")?;
    if query.is_empty() {
        return Err("missing required parameter: query".into());
    }

    let root = resolve_root(args);
    let opts = SearchOptions {
        file_glob: args
            .get("file_pattern")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        exclude_patterns: string_array(args, "exclude_patterns")?,
        exclude_dirs: string_array(args, "exclude_dirs")?,
        literal: args
            .get("literal")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    };

    let hits = crate::textsearch::search(query, &root, &opts).map_err(|e| e.to_string())?;
    let records = crate::enrich::enrich(&hits, query, queries);

    serde_json::to_string_pretty(&records).map_err(|e| e.to_string())
}

fn string_array(args: &Value, key: &str) -> Result<Vec<String>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("{key} must be an array of strings"))
            })
            .collect(),
        Some(_) => Err(format!("{key} must be an array of strings")),
    }
}

/// Canonicalize the root path, falling back to the raw path if
/// canonicalization fails.
fn resolve_root(args: &Value) -> PathBuf {
    let raw: PathBuf = args
        .get("root")
        .and_then(|v| v.as_str())
        .unwrap_or(".")
        .into();
    raw.canonicalize().unwrap_or(raw)
}

fn handle_tool_call(req: &JsonRpcRequest, queries: &QueryCache) -> JsonRpcResponse {
    let params = &req.params;
    let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let args = params.get("arguments").unwrap_or(&Value::Null);

    match dispatch_tool(tool_name, args, queries) {
        Ok(output) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": output
                }]
            })),
            error: None,
        },
        Err(e) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": e
                }],
                "isError": true
            })),
            error: None,
        },
    }
}

fn tool_definitions() -> Vec<Value> {
    vec![serde_json::json!({
        "name": "defsift_search",
        "description": "Search for an identifier and return the full structural definition of every match — the whole function/class/method body located via tree-sitter, not just the matching line. Identifier matching is exact and case-sensitive; call sites alone produce no results. Supports Java, TypeScript, TSX, JavaScript, JSX, Python.",
        "inputSchema": {
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The identifier to search for."
                },
                "root": {
                    "type": "string",
                    "description": "Directory to search within. Default: current directory."
                },
                "file_pattern": {
                    "type": "string",
                    "description": "Include glob, e.g. '*.ts' or 'src/**/*.py'."
                },
                "exclude_patterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Extra file globs to exclude, merged with the defaults (*.log, *.tmp, *.temp, *.bak)."
                },
                "exclude_dirs": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Extra directory names to skip, merged with the defaults (node_modules, dist, build, .git, ...)."
                },
                "literal": {
                    "type": "boolean",
                    "description": "Treat the query as a literal string instead of a regex. Default: false."
                }
            }
        }
    })]
}

fn write_error(w: &mut impl Write, id: Option<Value>, code: i32, msg: &str) -> io::Result<()> {
    let resp = JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: msg.into(),
        }),
    };
    serde_json::to_writer(&mut *w, &resp)?;
    w.write_all(b"\n")?;
    w.flush()
}
