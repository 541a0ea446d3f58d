//! Capture Classifier: turn a raw query capture into a typed definition
//! record — kind from the label, name by per-kind extraction, body from the
//! node's full byte range.

use std::path::Path;

use crate::types::{DefinitionKind, DefinitionRecord};

/// Node kinds that can carry the defining name of a construct.
const NAME_NODE_KINDS: &[&str] = &["identifier", "property_identifier", "type_identifier"];

/// What a capture label says about its node, decided once when the label is
/// read. `Enclosing` spans the whole construct; `NameOnly` is just the
/// identifier — the fallback for patterns with no enclosing capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptureRole {
    NameOnly(DefinitionKind),
    Enclosing(DefinitionKind),
}

impl CaptureRole {
    /// `name.definition.<kind>` / `definition.<kind>`. Labels with an
    /// unknown kind suffix (calls, lambdas, imports) produce no role.
    pub(crate) fn parse(label: &str) -> Option<Self> {
        if let Some(suffix) = label.strip_prefix("name.definition.") {
            DefinitionKind::parse(suffix).map(Self::NameOnly)
        } else if let Some(suffix) = label.strip_prefix("definition.") {
            DefinitionKind::parse(suffix).map(Self::Enclosing)
        } else {
            None
        }
    }

    pub(crate) fn kind(self) -> DefinitionKind {
        match self {
            Self::NameOnly(k) | Self::Enclosing(k) => k,
        }
    }
}

/// Classify one capture into a definition record. Returns `None` when no
/// defining name can be resolved — expected and frequent, not an error.
pub(crate) fn classify(
    role: CaptureRole,
    node: tree_sitter::Node,
    path: &Path,
    content: &str,
) -> Option<DefinitionRecord> {
    let name = match role {
        CaptureRole::NameOnly(_) => node_text(node, content)?.to_string(),
        CaptureRole::Enclosing(DefinitionKind::MemberFunction) => {
            member_function_name(node, content)?
        }
        CaptureRole::Enclosing(_) => first_name_child(node, content)?,
    };
    if name.is_empty() {
        return None;
    }

    let body = content.get(node.start_byte()..node.end_byte())?.to_string();

    Some(DefinitionRecord {
        file_path: path.to_path_buf(),
        line: node.start_position().row as u32 + 1,
        column: node.start_position().column as u32 + 1,
        name,
        kind: role.kind(),
        body,
        byte_range: (node.start_byte(), node.end_byte()),
    })
}

/// `obj.prop = function () {}` — the defining name is the full dotted
/// left-hand side of the assignment, not a single token.
fn member_function_name(node: tree_sitter::Node, content: &str) -> Option<String> {
    let assign = find_child_of_kind(node, "assignment_expression")?;
    let left = assign.child_by_field_name("left")?;
    if left.kind() != "member_expression" {
        return None;
    }
    node_text(left, content).map(str::to_string)
}

/// First direct named child whose kind can carry a name. First match wins —
/// no priority among the name kinds beyond order of appearance.
fn first_name_child(node: tree_sitter::Node, content: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if NAME_NODE_KINDS.contains(&child.kind()) {
            return node_text(child, content).map(str::to_string);
        }
    }
    None
}

fn find_child_of_kind<'t>(
    node: tree_sitter::Node<'t>,
    kind: &str,
) -> Option<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn node_text<'a>(node: tree_sitter::Node, content: &'a str) -> Option<&'a str> {
    node.utf8_text(content.as_bytes()).ok()
}
