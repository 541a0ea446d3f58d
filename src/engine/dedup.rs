//! Disambiguation & dedup: position-grouped capture preference and
//! longest-body narrowing of same-name records. Generic over plain
//! positions so the rules are testable without live tree-sitter nodes.

use std::collections::HashMap;

use super::classify::CaptureRole;
use crate::types::DefinitionRecord;

/// (row, column) start position of a capture node.
pub(crate) type Pos = (usize, usize);

/// Pick, per start position, the single capture to classify. An `Enclosing`
/// capture beats a `NameOnly` one; within the same role the capture from the
/// earlier query pattern wins. Precedence is set by pattern order in the
/// `.scm` file, never by match arrival order — the cursor yields matches in
/// node order, so arrival order carries no meaning. Returned indices follow
/// the first-encounter order of positions.
pub(crate) fn prefer_by_position(captures: &[(CaptureRole, Pos, usize)]) -> Vec<usize> {
    let mut order: Vec<Pos> = Vec::new();
    let mut chosen: HashMap<Pos, usize> = HashMap::new();

    for (idx, (role, pos, pattern)) in captures.iter().enumerate() {
        match chosen.get(pos) {
            None => {
                order.push(*pos);
                chosen.insert(*pos, idx);
            }
            Some(&held) => {
                let (held_role, _, held_pattern) = captures[held];
                if outranks((*role, *pattern), (held_role, held_pattern)) {
                    chosen.insert(*pos, idx);
                }
            }
        }
    }

    order.into_iter().map(|p| chosen[&p]).collect()
}

/// Enclosing beats NameOnly; within the same role the lower pattern index
/// wins. An equal pattern index keeps the earlier capture.
fn outranks(new: (CaptureRole, usize), held: (CaptureRole, usize)) -> bool {
    match (new.0, held.0) {
        (CaptureRole::Enclosing(_), CaptureRole::NameOnly(_)) => true,
        (CaptureRole::NameOnly(_), CaptureRole::Enclosing(_)) => false,
        _ => new.1 < held.1,
    }
}

/// Accumulator keeping, per identifier, the record with the longest body.
/// A strictly longer body replaces in place so output order stays stable;
/// ties keep the first-seen record.
#[derive(Default)]
pub(crate) struct LongestBody {
    records: Vec<DefinitionRecord>,
    by_name: HashMap<String, usize>,
}

impl LongestBody {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, record: DefinitionRecord) {
        match self.by_name.get(&record.name) {
            Some(&i) => {
                if record.body.len() > self.records[i].body.len() {
                    self.records[i] = record;
                }
            }
            None => {
                self.by_name.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub(crate) fn into_records(self) -> Vec<DefinitionRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DefinitionKind;
    use std::path::PathBuf;

    fn record(name: &str, body: &str) -> DefinitionRecord {
        DefinitionRecord {
            file_path: PathBuf::from("x.js"),
            line: 1,
            column: 1,
            name: name.into(),
            kind: DefinitionKind::Function,
            body: body.into(),
            byte_range: (0, body.len()),
        }
    }

    #[test]
    fn longer_body_replaces_in_place() {
        let mut acc = LongestBody::new();
        acc.insert(record("x", "short"));
        acc.insert(record("y", "other"));
        acc.insert(record("x", &"long body ".repeat(5)));

        let out = acc.into_records();
        assert_eq!(out.len(), 2);
        // Replacement keeps the original slot
        assert_eq!(out[0].name, "x");
        assert_eq!(out[0].body.len(), 50);
        assert_eq!(out[1].name, "y");
    }

    #[test]
    fn equal_length_keeps_first_seen() {
        let mut acc = LongestBody::new();
        acc.insert(record("x", "first"));
        acc.insert(record("x", "later"));
        assert_eq!(acc.into_records()[0].body, "first");
    }

    #[test]
    fn enclosing_preferred_over_name_only_at_same_position() {
        let k = DefinitionKind::Class;
        let captures = [
            (CaptureRole::NameOnly(k), (3, 0), 0),
            (CaptureRole::Enclosing(k), (3, 0), 0),
            (CaptureRole::NameOnly(k), (7, 4), 0),
        ];
        let chosen = prefer_by_position(&captures);
        assert_eq!(chosen, vec![1, 2]);
    }

    #[test]
    fn earlier_pattern_wins_within_a_group() {
        let captures = [
            (CaptureRole::Enclosing(DefinitionKind::Class), (0, 0), 0),
            (CaptureRole::Enclosing(DefinitionKind::Method), (0, 0), 4),
        ];
        assert_eq!(prefer_by_position(&captures), vec![0]);
    }

    #[test]
    fn earlier_pattern_wins_regardless_of_arrival_order() {
        // A lambda assignment matches both the function pattern and the
        // plain-variable pattern on the same node. The variable capture
        // arriving first must still lose to the earlier-declared pattern.
        let captures = [
            (CaptureRole::Enclosing(DefinitionKind::Variable), (9, 0), 7),
            (CaptureRole::Enclosing(DefinitionKind::Function), (9, 0), 3),
            (CaptureRole::NameOnly(DefinitionKind::Variable), (9, 0), 7),
        ];
        assert_eq!(prefer_by_position(&captures), vec![1]);
    }
}
