//! Resolution summary for a dereferenced document.
//!
//! Counts what resolution left behind:
//! 1. References that did not resolve (still `$ref` nodes)
//! 2. Cycle sentinels, with the reference they point back to when known
//! 3. Nodes carrying provenance

use crate::node::SchemaNode;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// What a resolved tree still contains.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    /// Distinct references left unresolved.
    pub unresolved_refs: BTreeSet<String>,
    /// Number of cycle sentinels.
    pub circular_count: usize,
    /// Distinct references named by cycle sentinels.
    pub circular_refs: BTreeSet<String>,
    /// Nodes tagged with whole-node provenance.
    pub inherited_nodes: usize,
    /// Nodes tagged with per-property provenance.
    pub member_inherited_nodes: usize,
}

impl ResolutionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// No unresolved references and no cycles.
    pub fn is_complete(&self) -> bool {
        self.unresolved_refs.is_empty() && self.circular_count == 0
    }

    /// Summarize a resolved JSON document.
    pub fn from_value(value: &Value) -> Self {
        summarize(&SchemaNode::from_value(value))
    }

    fn visit(&mut self, node: &SchemaNode) {
        if let Some(reference) = node.as_reference() {
            self.unresolved_refs.insert(reference.to_string());
        }
        if node.is_circular() {
            self.circular_count += 1;
            if let Some(provenance) = &node.inherited_from {
                self.circular_refs.insert(provenance.reference.clone());
            }
        } else if node.inherited_from.is_some() {
            self.inherited_nodes += 1;
        }
        if node.member_inherited_from.is_some() {
            self.member_inherited_nodes += 1;
        }
        for child in node.children() {
            self.visit(child);
        }
    }
}

/// Summarize a resolved tree.
pub fn summarize(node: &SchemaNode) -> ResolutionSummary {
    let mut summary = ResolutionSummary::new();
    summary.visit(node);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_tree() {
        let summary = ResolutionSummary::from_value(&json!({
            "properties": { "id": { "type": "string" } }
        }));
        assert!(summary.is_complete());
        assert_eq!(summary, ResolutionSummary::default());
    }

    #[test]
    fn test_counts_leftovers() {
        let tag = json!({ "name": "#/definitions/Node", "ref": "#/definitions/Node" });
        let summary = ResolutionSummary::from_value(&json!({
            "properties": {
                "missing": { "$ref": "#/definitions/Missing" },
                "next": { "type": "@circular", "__inheritedFrom": tag },
                "value": {
                    "properties": { "x": { "type": "number", "____inheritedFrom": tag } },
                    "__inheritedFrom": tag
                },
                "anon": { "type": "@circular" }
            }
        }));
        assert!(!summary.is_complete());
        assert_eq!(
            summary.unresolved_refs.iter().collect::<Vec<_>>(),
            vec!["#/definitions/Missing"]
        );
        assert_eq!(summary.circular_count, 2);
        assert_eq!(
            summary.circular_refs.iter().collect::<Vec<_>>(),
            vec!["#/definitions/Node"]
        );
        assert_eq!(summary.inherited_nodes, 1);
        assert_eq!(summary.member_inherited_nodes, 1);
    }
}
