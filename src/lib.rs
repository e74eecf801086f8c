//! Schema Deref - resolve `$ref` pointers in JSON Schema documents.
//!
//! Produces a self-contained tree from a schema and a lookup table:
//! - every `$ref` is replaced by the schema it points to
//! - `allOf` / `oneOf` / `anyOf` branches are walked
//! - cycles end in a `{ "type": "@circular" }` sentinel
//! - content pulled in from a reference carries `__inheritedFrom`
//!
//! # Architecture
//!
//! ```text
//! dereference(target, schemas)
//! └── SchemaWalker::walk        dispatch on node shape
//!     └── SchemaWalker::resolve  cache -> cycle -> lookup -> tag -> walk
//!         └── ResolutionCache    first resolution per reference
//! ```
//!
//! Nothing here returns an error: references that cannot be found are left in
//! place, and cycles become sentinels.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use schema_deref::dereference;
//!
//! let schemas = json!({ "definitions": { "Name": { "type": "string" } } });
//! let target = json!({
//!     "type": "object",
//!     "properties": { "name": { "$ref": "#/definitions/Name" } }
//! });
//!
//! let resolved = dereference(&target, &schemas, false);
//! assert_eq!(resolved["properties"]["name"]["type"], "string");
//! assert_eq!(
//!     resolved["properties"]["name"]["__inheritedFrom"]["ref"],
//!     "#/definitions/Name"
//! );
//! ```

mod cache;
pub mod config;
mod context;
pub mod document;
mod error;
mod node;
mod pointer;
mod resolver;
mod summary;
mod walker;

// Re-exports
pub use cache::{CacheEntry, ResolutionCache};
pub use config::{ConfigLoader, DereferenceOptions};
pub use context::{ResolutionContext, VisitedPath};
pub use document::OutputFormat;
pub use error::{DerefError, Result};
pub use node::{
    CombinerKind, ContainerKind, Entries, InheritedFrom, Items, SchemaNode, Shape, CIRCULAR_TYPE,
    INHERITED_FROM_KEY, MEMBER_INHERITED_FROM_KEY, REF_KEY,
};
pub use pointer::RefPath;
pub use summary::{summarize, ResolutionSummary};
pub use walker::SchemaWalker;

use serde_json::{Map, Value};
use tracing::debug;

/// Replace every `$ref` in `target` with the schema it points to in
/// `schemas`.
///
/// Neither input is modified. A missing or falsy `target` yields `{}`; an
/// empty `schemas` table returns `target` unchanged. With
/// `hide_inherited_from`, no provenance is attached anywhere.
pub fn dereference(target: &Value, schemas: &Value, hide_inherited_from: bool) -> Value {
    Dereferencer::new(DereferenceOptions::new().with_hide_inherited_from(hide_inherited_from))
        .dereference(target, schemas)
}

/// Configured entry point.
#[derive(Debug, Clone, Default)]
pub struct Dereferencer {
    options: DereferenceOptions,
}

impl Dereferencer {
    pub fn new(options: DereferenceOptions) -> Self {
        Self { options }
    }

    /// Resolve `target` against `schemas`, returning JSON.
    pub fn dereference(&self, target: &Value, schemas: &Value) -> Value {
        self.dereference_node(target, schemas).into_value()
    }

    /// Resolve `target` against `schemas`, returning the typed tree.
    #[tracing::instrument(level = "debug", skip_all, fields(hide_inherited_from = self.options.hide_inherited_from))]
    pub fn dereference_node(&self, target: &Value, schemas: &Value) -> SchemaNode {
        if is_falsy(target) {
            return SchemaNode::from_owned(Value::Object(Map::new()));
        }

        let mut walker = SchemaWalker::new(schemas);
        let resolved = walker.walk(
            SchemaNode::from_value(target),
            &ResolutionContext::root(self.options.hide_inherited_from),
        );
        debug!(
            references = walker.cache().len(),
            unresolved = walker.cache().unresolved().count(),
            "dereference complete"
        );
        resolved
    }

    /// Resolve a document against itself, or against the sub-document named
    /// by the `definitions` option.
    pub fn dereference_document(&self, document: &Value) -> Result<Value> {
        let schemas = self.lookup_table(document)?;
        Ok(self.dereference(document, schemas))
    }

    /// The lookup table inside `document` selected by the options.
    pub fn lookup_table<'d>(&self, document: &'d Value) -> Result<&'d Value> {
        match self.options.definitions.as_deref() {
            None | Some("") => Ok(document),
            Some(pointer) => document
                .pointer(pointer)
                .ok_or_else(|| DerefError::DefinitionsNotFound {
                    pointer: pointer.to_string(),
                }),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
