//! SchemaWalker - recursive descent over a schema tree.
//!
//! Dispatches on a node's [`Shape`]: references go to the resolver, containers
//! have each child schema replaced by its walked form, everything else is
//! returned as is.

use crate::cache::ResolutionCache;
use crate::context::ResolutionContext;
use crate::node::{SchemaNode, Shape};
use crate::pointer::is_empty_table;
use serde_json::Value;
use tracing::trace;

/// Walks schema trees against one lookup table, sharing one cache.
///
/// A walker lives for a single top-level resolution. Build a new one for
/// every document so caches never leak between calls.
#[derive(Debug)]
pub struct SchemaWalker<'a> {
    pub(crate) schemas: &'a Value,
    pub(crate) cache: ResolutionCache,
    enabled: bool,
}

impl<'a> SchemaWalker<'a> {
    /// Walker resolving against `schemas`. An empty table turns every walk
    /// into a no-op.
    pub fn new(schemas: &'a Value) -> Self {
        Self {
            schemas,
            cache: ResolutionCache::new(),
            enabled: !is_empty_table(schemas),
        }
    }

    /// Resolve every reference reachable from `node`.
    pub fn walk(&mut self, mut node: SchemaNode, ctx: &ResolutionContext) -> SchemaNode {
        if !self.enabled {
            return node;
        }

        match &node.shape {
            Shape::Reference(reference) => {
                let reference = reference.clone();
                return self.resolve(node, &reference, ctx);
            }
            Shape::Leaf | Shape::Circular | Shape::Literal(_) => return node,
            Shape::Object(_) | Shape::Array(_) | Shape::Combiner(..) | Shape::Container(..) => {}
        }

        let child_ctx = ctx.for_children(&node.shape);
        trace!(
            depth = ctx.depth(),
            all_of = child_ctx.all_of_parent,
            combiner = child_ctx.combiner_parent,
            "walking children"
        );
        for child in node.children_mut() {
            *child = self.walk(std::mem::take(child), &child_ctx);
        }
        node
    }

    /// Cache built up by the walks so far.
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }
}
