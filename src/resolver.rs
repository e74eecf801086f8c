//! RefResolver - resolve one `$ref` and tag where its content came from.
//!
//! Resolution order for a reference:
//! 1. cached result, if any
//! 2. cycle sentinel, if the reference is already on the current path
//! 3. lookup in the table; unresolved references pass through untouched
//! 4. provenance tagging on a fresh copy of the target
//! 5. recursive walk of the copy, one reference deeper
//!
//! Provenance policy:
//! - a non-root reference is tagged as a whole (`__inheritedFrom`);
//! - a target with `properties`/`items` reached directly from a combiner
//!   branch has its members tagged instead of itself;
//! - a target that is itself a combiner has its branches tagged;
//! - under `allOf` no members are tagged: the branches compose one object;
//! - a member that is itself an object gets each of its properties tagged
//!   with the separate `____inheritedFrom` key.

use crate::cache::CacheEntry;
use crate::context::ResolutionContext;
use crate::node::{CombinerKind, InheritedFrom, SchemaNode, Shape};
use crate::pointer::RefPath;
use crate::walker::SchemaWalker;
use tracing::debug;

impl SchemaWalker<'_> {
    /// Resolve `reference`, carried by `target`, in context `ctx`.
    pub(crate) fn resolve(
        &mut self,
        target: SchemaNode,
        reference: &str,
        ctx: &ResolutionContext,
    ) -> SchemaNode {
        if let Some(entry) = self.cache.get(reference) {
            debug!(reference, depth = entry.depth, "reference cache hit");
            return entry.resolved.clone();
        }

        if ctx.visited.contains(reference) {
            debug!(reference, path = ?ctx.visited.to_vec(), "circular reference");
            let mut sentinel = SchemaNode::circular();
            if !ctx.hide_inherited_from {
                sentinel.set_inherited_from(InheritedFrom::new(reference));
            }
            return sentinel;
        }

        let Some(found) = RefPath::parse(reference).lookup(self.schemas) else {
            debug!(reference, "reference target not found");
            self.cache.insert(
                reference,
                CacheEntry {
                    depth: ctx.depth(),
                    resolved: target.clone(),
                    found: false,
                },
            );
            return target;
        };

        // Fresh copy: the same definition may be reached from many sites.
        let mut schema = SchemaNode::from_value(found);
        let provenance = InheritedFrom::new(reference);
        tag_target(&mut schema, &provenance, ctx);

        let mut resolved = self.walk(schema, &ctx.descend(reference));
        if !ctx.is_root && !ctx.hide_inherited_from {
            resolved.set_inherited_from(provenance);
        }

        self.cache.insert(
            reference,
            CacheEntry {
                depth: ctx.depth(),
                resolved: resolved.clone(),
                found: true,
            },
        );
        resolved
    }
}

/// Apply the pre-walk provenance policy to a freshly read target.
fn tag_target(schema: &mut SchemaNode, provenance: &InheritedFrom, ctx: &ResolutionContext) {
    let mut is_all_of = ctx.all_of_parent;
    let distribute = match &schema.shape {
        Shape::Object(_) | Shape::Array(_) => {
            if !ctx.combiner_parent && !ctx.hide_inherited_from {
                schema.set_inherited_from(provenance.clone());
            }
            ctx.combiner_parent
        }
        Shape::Combiner(kind, _) => {
            is_all_of = *kind == CombinerKind::AllOf;
            true
        }
        Shape::Reference(_)
        | Shape::Container(..)
        | Shape::Leaf
        | Shape::Circular
        | Shape::Literal(_) => false,
    };

    if distribute && !is_all_of && !ctx.hide_inherited_from {
        tag_members(schema, provenance);
    }
}

fn tag_members(schema: &mut SchemaNode, provenance: &InheritedFrom) {
    for member in schema.children_mut() {
        match &mut member.shape {
            Shape::Object(properties) => {
                for property in properties.values_mut() {
                    property.set_member_inherited_from(provenance.clone());
                }
            }
            _ => member.set_inherited_from(provenance.clone()),
        }
    }
}
