//! End-to-end tests over the fixture projects: text search → structural
//! enrichment, exactly as the CLI and MCP tool drive it. Each test checks
//! what a caller would see — the record list — not intermediate state.

use std::path::{Path, PathBuf};

use defsift::grammar::QueryCache;
use defsift::textsearch::SearchOptions;
use defsift::types::{DefinitionKind, DefinitionRecord, MatchHit};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run(query: &str, scope: &Path) -> Vec<DefinitionRecord> {
    let queries = QueryCache::new();
    defsift::run(query, scope, &SearchOptions::default(), &queries).unwrap()
}

// ---------------------------------------------------------------------------
// Exact-match filtering
// ---------------------------------------------------------------------------

/// app.js contains the definition of `parseConfig` plus two call sites.
/// Enrichment must return exactly one record — the definition, with the
/// full function body, not merely the matched token.
#[test]
fn call_sites_do_not_produce_records() {
    let records = run("parseConfig", &fixture("mini-js"));

    assert_eq!(records.len(), 1, "{records:?}");
    let rec = &records[0];
    assert_eq!(rec.name, "parseConfig");
    assert_eq!(rec.kind, DefinitionKind::Function);
    assert!(rec.file_path.ends_with("app.js"));
    assert_eq!(rec.line, 1);
    assert!(
        rec.body.contains("JSON.parse"),
        "body must be the whole construct: {}",
        rec.body
    );
}

/// `check` is declared in the Schema interface (a signature, not a
/// definition) and defined in StringSchema. Only the class method counts.
#[test]
fn ts_method_definition_with_full_body() {
    let records = run("check", &fixture("mini-ts"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].kind, DefinitionKind::Method);
    assert!(records[0].body.contains("typeof value"));
}

/// "Schema" is a substring of StringSchema and SchemaMap; exact matching
/// must return only the interface itself.
#[test]
fn substring_identifiers_are_excluded() {
    let records = run("Schema", &fixture("mini-ts"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].name, "Schema");
    assert_eq!(records[0].kind, DefinitionKind::Interface);
}

// ---------------------------------------------------------------------------
// Member-function naming
// ---------------------------------------------------------------------------

/// `app.routes.handler = function () {}` defines the full dotted path, not
/// `handler`. Searching the dotted path finds it; searching the last
/// segment alone does not.
#[test]
fn member_function_uses_dotted_path_as_name() {
    let records = run("app.routes.handler", &fixture("mini-js"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].name, "app.routes.handler");
    assert_eq!(records[0].kind, DefinitionKind::MemberFunction);
    assert!(records[0].body.starts_with("app.routes.handler = function"));

    assert!(
        run("handler", &fixture("mini-js")).is_empty(),
        "the bare last segment must not match the dotted identifier"
    );
}

// ---------------------------------------------------------------------------
// Disambiguation
// ---------------------------------------------------------------------------

/// Registry.java defines both the class and its constructor under the same
/// identifier. The longest body — the whole class — survives.
#[test]
fn java_class_beats_constructor_for_same_identifier() {
    let records = run("Registry", &fixture("mini-java"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].kind, DefinitionKind::Class);
    assert!(
        records[0].body.contains("public void register"),
        "class record must span the whole construct"
    );
}

#[test]
fn java_method_resolves_past_return_type() {
    let records = run("register", &fixture("mini-java"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].kind, DefinitionKind::Method);
    assert!(records[0].body.contains("size += 1"));
}

/// tool.py references `process` both as a method definition and as an
/// attribute inside a comprehension. The definition has the longer body
/// and wins the per-identifier narrowing.
#[test]
fn py_definition_outlives_attribute_reference() {
    let records = run("process", &fixture("mini-py"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].kind, DefinitionKind::Function);
    assert!(records[0].body.contains("return item"));
}

#[test]
fn py_lambda_assignment_is_a_function() {
    let records = run("handler", &fixture("mini-py"));

    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].kind, DefinitionKind::Function);
    assert!(records[0].body.contains("lambda event"));
}

// ---------------------------------------------------------------------------
// Skips, empty results, ordering
// ---------------------------------------------------------------------------

/// notes.md mentions `parseConfig` and matches the text search, but has no
/// grammar profile — it contributes zero records and raises no error.
#[test]
fn unsupported_files_are_skipped_silently() {
    let records = run("parseConfig", &fixture("mini-js"));
    assert!(records.iter().all(|r| r.file_path.ends_with("app.js")));
}

/// No hits at all is a valid empty outcome, not an error.
#[test]
fn unknown_identifier_yields_empty_result() {
    assert!(run("no_such_identifier_anywhere", &fixture("mini-js")).is_empty());
}

/// Identical input must produce byte-identical output, including order.
/// The empty pattern hits every line, so every definition in the scope is
/// part of the comparison.
#[test]
fn output_is_stable_across_runs() {
    for scope in ["mini-js", "mini-ts", "mini-java", "mini-py"] {
        let first = run("", &fixture(scope));
        let second = run("", &fixture(scope));
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
            "{scope} output must be deterministic"
        );
    }
}

/// Enriching with an empty search term returns every definition-kind record
/// in the touched files, unfiltered by name.
#[test]
fn empty_search_term_returns_all_definitions() {
    let file = fixture("mini-py").join("tool.py");
    let hits = vec![MatchHit {
        file_path: file,
        line: 1,
        column: 1,
        matched_text: "class Pipeline:".into(),
    }];

    let queries = QueryCache::new();
    let records = defsift::enrich::enrich(&hits, "", &queries);

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"Pipeline"), "{names:?}");
    assert!(names.contains(&"process_all"), "{names:?}");
    assert!(names.contains(&"handler"), "{names:?}");
}
