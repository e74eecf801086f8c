//! SchemaNode - typed view over a JSON-Schema-shaped document.
//!
//! A node is classified into exactly one [`Shape`] when it is read. The shape
//! keyword (`$ref`, `properties`, `items`, a combiner or a map container) is
//! lifted out into the shape; every other keyword is kept verbatim in
//! [`SchemaNode::keywords`] and written back unchanged.
//!
//! Shape priority (first match wins):
//!
//! ```text
//! $ref > properties > items > allOf > oneOf > anyOf
//!      > additionalProperties > patternProperties > dependencies
//!      > {"type": "@circular"} > leaf
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Reference keyword.
pub const REF_KEY: &str = "$ref";

/// Whole-node provenance key.
pub const INHERITED_FROM_KEY: &str = "__inheritedFrom";

/// Provenance key stamped on individual properties of a combiner member.
pub const MEMBER_INHERITED_FROM_KEY: &str = "____inheritedFrom";

/// `type` value of the cycle sentinel.
pub const CIRCULAR_TYPE: &str = "@circular";

const TYPE_KEY: &str = "type";
const PROPERTIES_KEY: &str = "properties";
const ITEMS_KEY: &str = "items";

/// Provenance annotation: which reference a node's content came from.
///
/// Serializes as: `{ "name": "#/definitions/Foo", "ref": "#/definitions/Foo" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InheritedFrom {
    /// Display name of the origin.
    pub name: String,
    /// The reference string that was resolved.
    #[serde(rename = "ref")]
    pub reference: String,
}

impl InheritedFrom {
    /// Provenance for a reference, named after the reference itself.
    pub fn new(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self {
            name: reference.clone(),
            reference,
        }
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name.clone()));
        object.insert("ref".to_string(), Value::String(self.reference.clone()));
        Value::Object(object)
    }
}

impl fmt::Display for InheritedFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inherited from {}", self.name)
    }
}

/// Composition keyword holding a sequence of sub-schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinerKind {
    AllOf,
    OneOf,
    AnyOf,
}

impl CombinerKind {
    /// Combiners in dispatch order.
    pub const ALL: [CombinerKind; 3] = [Self::AllOf, Self::OneOf, Self::AnyOf];

    /// The JSON keyword for this combiner.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::AllOf => "allOf",
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
        }
    }
}

/// Keyword holding child schemas keyed by name or pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    AdditionalProperties,
    PatternProperties,
    Dependencies,
}

impl ContainerKind {
    /// Containers in dispatch order.
    pub const ALL: [ContainerKind; 3] = [
        Self::AdditionalProperties,
        Self::PatternProperties,
        Self::Dependencies,
    ];

    /// The JSON keyword for this container.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::AdditionalProperties => "additionalProperties",
            Self::PatternProperties => "patternProperties",
            Self::Dependencies => "dependencies",
        }
    }
}

/// Array `items`: one schema for every element, or one per position.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    Single(Box<SchemaNode>),
    Tuple(Vec<SchemaNode>),
}

impl Items {
    /// The item schemas as a slice.
    pub fn as_slice(&self) -> &[SchemaNode] {
        match self {
            Self::Single(node) => std::slice::from_ref(node.as_ref()),
            Self::Tuple(nodes) => nodes,
        }
    }

    /// The item schemas as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [SchemaNode] {
        match self {
            Self::Single(node) => std::slice::from_mut(node.as_mut()),
            Self::Tuple(nodes) => nodes,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Single(node) => node.into_value(),
            Self::Tuple(nodes) => Value::Array(nodes.into_iter().map(SchemaNode::into_value).collect()),
        }
    }
}

/// Contents of a map container.
#[derive(Debug, Clone, PartialEq)]
pub enum Entries {
    /// `additionalProperties` holding a schema.
    Single(Box<SchemaNode>),
    /// `patternProperties` / `dependencies` keyed by pattern or property name.
    Map(IndexMap<String, SchemaNode>),
}

impl Entries {
    fn into_value(self) -> Value {
        match self {
            Self::Single(node) => node.into_value(),
            Self::Map(entries) => Value::Object(into_value_map(entries)),
        }
    }
}

/// The single structural role a node plays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// `{ "$ref": "..." }` with optional sibling keywords.
    Reference(String),
    /// `properties`.
    Object(IndexMap<String, SchemaNode>),
    /// `items`.
    Array(Items),
    /// `allOf` / `oneOf` / `anyOf`.
    Combiner(CombinerKind, Vec<SchemaNode>),
    /// `additionalProperties` / `patternProperties` / `dependencies`.
    Container(ContainerKind, Entries),
    /// Object with no child schemas.
    #[default]
    Leaf,
    /// `{ "type": "@circular" }`.
    Circular,
    /// Any non-object JSON value (boolean schema, dependency name list, ...).
    Literal(Value),
}

/// A schema node: its shape plus whatever other keywords it carried.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNode {
    pub shape: Shape,
    /// Keywords not consumed by the shape, in document order.
    pub keywords: Map<String, Value>,
    /// Whole-node provenance (`__inheritedFrom`).
    pub inherited_from: Option<InheritedFrom>,
    /// Per-property provenance from distributed tagging (`____inheritedFrom`).
    pub member_inherited_from: Option<InheritedFrom>,
    /// Position the shape keyword held among `keywords` when read.
    shape_slot: Option<usize>,
}

impl SchemaNode {
    /// Node with the given shape and no other keywords.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Bare `{ "$ref": reference }` node.
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::new(Shape::Reference(reference.into()))
    }

    /// Cycle sentinel.
    pub fn circular() -> Self {
        Self::new(Shape::Circular)
    }

    /// Read a node from a borrowed JSON value.
    pub fn from_value(value: &Value) -> Self {
        Self::from_owned(value.clone())
    }

    /// Read a node from an owned JSON value.
    pub fn from_owned(value: Value) -> Self {
        let object = match value {
            Value::Object(object) => object,
            other => return Self::new(Shape::Literal(other)),
        };

        let shape_key = ShapeKey::detect(&object);
        let mut node = SchemaNode::default();
        let mut shape_value = None;

        for (key, value) in object {
            if shape_key.is_some_and(|k| k.keyword() == key) {
                node.shape_slot = Some(node.keywords.len());
                shape_value = Some(value);
                continue;
            }
            let is_member = key == MEMBER_INHERITED_FROM_KEY;
            if key == INHERITED_FROM_KEY || is_member {
                if let Ok(provenance) = serde_json::from_value::<InheritedFrom>(value.clone()) {
                    if is_member {
                        node.member_inherited_from = Some(provenance);
                    } else {
                        node.inherited_from = Some(provenance);
                    }
                    continue;
                }
            }
            node.keywords.insert(key, value);
        }

        if let (Some(key), Some(value)) = (shape_key, shape_value) {
            node.shape = key.build(value);
        }
        node
    }

    /// Write the node back out as JSON.
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    /// Write the node back out as JSON, consuming it.
    ///
    /// The shape keyword goes back where it was read; provenance keys go last.
    pub fn into_value(self) -> Value {
        let SchemaNode {
            shape,
            keywords,
            inherited_from,
            member_inherited_from,
            shape_slot,
        } = self;

        let entry = match shape {
            Shape::Literal(value) => return value,
            Shape::Reference(reference) => Some((REF_KEY, Value::String(reference))),
            Shape::Object(properties) => Some((
                PROPERTIES_KEY,
                Value::Object(into_value_map(properties)),
            )),
            Shape::Array(items) => Some((ITEMS_KEY, items.into_value())),
            Shape::Combiner(kind, branches) => Some((
                kind.keyword(),
                Value::Array(branches.into_iter().map(SchemaNode::into_value).collect()),
            )),
            Shape::Container(kind, entries) => Some((kind.keyword(), entries.into_value())),
            Shape::Leaf => None,
            Shape::Circular => Some((TYPE_KEY, Value::String(CIRCULAR_TYPE.to_string()))),
        };

        let mut object = match entry {
            Some((key, value)) => insert_at(keywords, shape_slot, key, value),
            None => keywords,
        };
        if let Some(provenance) = inherited_from {
            object.insert(INHERITED_FROM_KEY.to_string(), provenance.to_value());
        }
        if let Some(provenance) = member_inherited_from {
            object.insert(MEMBER_INHERITED_FROM_KEY.to_string(), provenance.to_value());
        }
        Value::Object(object)
    }

    /// The reference string, if this is a reference node.
    pub fn as_reference(&self) -> Option<&str> {
        match &self.shape {
            Shape::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// True for the cycle sentinel.
    pub fn is_circular(&self) -> bool {
        matches!(self.shape, Shape::Circular)
    }

    /// Literals are bare JSON values and cannot carry annotations.
    pub fn can_annotate(&self) -> bool {
        !matches!(self.shape, Shape::Literal(_))
    }

    /// Attach whole-node provenance. No-op on literals.
    pub fn set_inherited_from(&mut self, provenance: InheritedFrom) {
        if self.can_annotate() {
            self.inherited_from = Some(provenance);
        }
    }

    /// Attach per-property provenance. No-op on literals.
    pub fn set_member_inherited_from(&mut self, provenance: InheritedFrom) {
        if self.can_annotate() {
            self.member_inherited_from = Some(provenance);
        }
    }

    /// Direct child schemas, in document order.
    pub fn children(&self) -> Vec<&SchemaNode> {
        match &self.shape {
            Shape::Object(properties) => properties.values().collect(),
            Shape::Array(items) => items.as_slice().iter().collect(),
            Shape::Combiner(_, branches) => branches.iter().collect(),
            Shape::Container(_, Entries::Single(node)) => vec![node.as_ref()],
            Shape::Container(_, Entries::Map(entries)) => entries.values().collect(),
            Shape::Reference(_) | Shape::Leaf | Shape::Circular | Shape::Literal(_) => Vec::new(),
        }
    }

    /// Direct child schemas, mutably, in document order.
    pub fn children_mut(&mut self) -> Vec<&mut SchemaNode> {
        match &mut self.shape {
            Shape::Object(properties) => properties.values_mut().collect(),
            Shape::Array(items) => items.as_mut_slice().iter_mut().collect(),
            Shape::Combiner(_, branches) => branches.iter_mut().collect(),
            Shape::Container(_, Entries::Single(node)) => vec![node.as_mut()],
            Shape::Container(_, Entries::Map(entries)) => entries.values_mut().collect(),
            Shape::Reference(_) | Shape::Leaf | Shape::Circular | Shape::Literal(_) => Vec::new(),
        }
    }
}

/// Insert `key` at position `slot`, or append when there is no slot or it is
/// past the end.
fn insert_at(
    keywords: Map<String, Value>,
    slot: Option<usize>,
    key: &str,
    value: Value,
) -> Map<String, Value> {
    let slot = match slot {
        Some(slot) if slot < keywords.len() && !keywords.contains_key(key) => slot,
        _ => {
            let mut keywords = keywords;
            keywords.insert(key.to_string(), value);
            return keywords;
        }
    };

    let mut object = Map::new();
    let mut value = Some(value);
    for (index, (k, v)) in keywords.into_iter().enumerate() {
        if index == slot {
            if let Some(value) = value.take() {
                object.insert(key.to_string(), value);
            }
        }
        object.insert(k, v);
    }
    object
}

fn into_value_map(entries: IndexMap<String, SchemaNode>) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, node)| (key, node.into_value()))
        .collect()
}

fn from_value_map(entries: Map<String, Value>) -> IndexMap<String, SchemaNode> {
    entries
        .into_iter()
        .map(|(key, value)| (key, SchemaNode::from_owned(value)))
        .collect()
}

/// The keyword that decided a node's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKey {
    Reference,
    Properties,
    Items,
    Combiner(CombinerKind),
    Container(ContainerKind),
    Circular,
}

impl ShapeKey {
    fn detect(object: &Map<String, Value>) -> Option<Self> {
        if matches!(object.get(REF_KEY), Some(Value::String(r)) if !r.is_empty()) {
            return Some(Self::Reference);
        }
        if matches!(object.get(PROPERTIES_KEY), Some(Value::Object(_))) {
            return Some(Self::Properties);
        }
        if matches!(object.get(ITEMS_KEY), Some(Value::Object(_) | Value::Array(_))) {
            return Some(Self::Items);
        }
        if let Some(kind) = CombinerKind::ALL
            .into_iter()
            .find(|kind| matches!(object.get(kind.keyword()), Some(Value::Array(_))))
        {
            return Some(Self::Combiner(kind));
        }
        if let Some(kind) = ContainerKind::ALL
            .into_iter()
            .find(|kind| matches!(object.get(kind.keyword()), Some(Value::Object(_))))
        {
            return Some(Self::Container(kind));
        }
        if matches!(object.get(TYPE_KEY), Some(Value::String(t)) if t == CIRCULAR_TYPE) {
            return Some(Self::Circular);
        }
        None
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Reference => REF_KEY,
            Self::Properties => PROPERTIES_KEY,
            Self::Items => ITEMS_KEY,
            Self::Combiner(kind) => kind.keyword(),
            Self::Container(kind) => kind.keyword(),
            Self::Circular => TYPE_KEY,
        }
    }

    /// `detect` has already checked the value's JSON type.
    fn build(self, value: Value) -> Shape {
        match (self, value) {
            (Self::Reference, Value::String(reference)) => Shape::Reference(reference),
            (Self::Properties, Value::Object(properties)) => {
                Shape::Object(from_value_map(properties))
            }
            (Self::Items, Value::Array(items)) => Shape::Array(Items::Tuple(
                items.into_iter().map(SchemaNode::from_owned).collect(),
            )),
            (Self::Items, items) => Shape::Array(Items::Single(Box::new(SchemaNode::from_owned(items)))),
            (Self::Combiner(kind), Value::Array(branches)) => Shape::Combiner(
                kind,
                branches.into_iter().map(SchemaNode::from_owned).collect(),
            ),
            (Self::Container(ContainerKind::AdditionalProperties), schema) => Shape::Container(
                ContainerKind::AdditionalProperties,
                Entries::Single(Box::new(SchemaNode::from_owned(schema))),
            ),
            (Self::Container(kind), Value::Object(entries)) => {
                Shape::Container(kind, Entries::Map(from_value_map(entries)))
            }
            (Self::Circular, _) => Shape::Circular,
            (_, other) => Shape::Literal(other),
        }
    }
}
