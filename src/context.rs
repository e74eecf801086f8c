//! Per-path resolution state.
//!
//! A [`ResolutionContext`] describes where the walker currently is: which
//! references have been entered on the way down from the root, and what kind
//! of parent the current node sits under. Contexts are cheap to derive and
//! are never shared between sibling branches, so a definition reused by two
//! siblings is not mistaken for a cycle.

use crate::node::{CombinerKind, Shape};
use std::rc::Rc;

/// References entered on the current path, root first.
///
/// Persistent list: extending a path shares the parent's links instead of
/// copying them, and never affects other holders of the parent.
#[derive(Debug, Clone, Default)]
pub struct VisitedPath {
    head: Option<Rc<Link>>,
    len: usize,
}

#[derive(Debug)]
struct Link {
    reference: String,
    parent: Option<Rc<Link>>,
}

impl VisitedPath {
    /// Empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// This path extended by one reference.
    pub fn with(&self, reference: impl Into<String>) -> Self {
        Self {
            head: Some(Rc::new(Link {
                reference: reference.into(),
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Whether `reference` was already entered on this path.
    pub fn contains(&self, reference: &str) -> bool {
        self.iter_rev().any(|r| r == reference)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// References from the most recent back to the root.
    pub fn iter_rev(&self) -> impl Iterator<Item = &str> {
        std::iter::successors(self.head.as_deref(), |link| link.parent.as_deref())
            .map(|link| link.reference.as_str())
    }

    /// References in entry order.
    pub fn to_vec(&self) -> Vec<String> {
        let mut refs: Vec<String> = self.iter_rev().map(str::to_string).collect();
        refs.reverse();
        refs
    }
}

/// Flags and path threaded through every walk and resolve call.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// References entered on the path from the root.
    pub visited: VisitedPath,
    /// The immediate parent is an `allOf`.
    pub all_of_parent: bool,
    /// The immediate parent is any combiner.
    pub combiner_parent: bool,
    /// Never attach provenance.
    pub hide_inherited_from: bool,
    /// Still at the document root (only survives through `allOf` branches).
    pub is_root: bool,
}

impl ResolutionContext {
    /// Context for the top of a document.
    pub fn root(hide_inherited_from: bool) -> Self {
        Self {
            hide_inherited_from,
            is_root: true,
            ..Default::default()
        }
    }

    /// Context for the children of a node with the given shape.
    pub fn for_children(&self, parent: &Shape) -> Self {
        let (all_of_parent, combiner_parent) = match parent {
            Shape::Combiner(CombinerKind::AllOf, _) => (true, true),
            Shape::Combiner(CombinerKind::OneOf | CombinerKind::AnyOf, _) => (false, true),
            _ => (false, false),
        };
        Self {
            visited: self.visited.clone(),
            all_of_parent,
            combiner_parent,
            hide_inherited_from: self.hide_inherited_from,
            is_root: self.is_root && all_of_parent,
        }
    }

    /// Context for the body of `reference`: one reference deeper, parent
    /// flags cleared.
    pub fn descend(&self, reference: &str) -> Self {
        Self {
            visited: self.visited.with(reference),
            hide_inherited_from: self.hide_inherited_from,
            ..Default::default()
        }
    }

    /// Depth of the current path, counted in references.
    pub fn depth(&self) -> usize {
        self.visited.len()
    }
}
