//! Schema document model and the node interface the registry reads.
//!
//! The registry never mutates nodes. It only reads a node's kind, its
//! coordinate and the ordered list of directives attached to it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A parsed schema description: an ordered list of type definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl SchemaDocument {
    pub fn find_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Iterate over every directive-bearing node in declaration order.
    ///
    /// Types come first, each followed by its fields, each followed by its
    /// arguments.
    pub fn nodes(&self) -> Vec<NodeRef<'_>> {
        let mut nodes = Vec::new();
        for ty in &self.types {
            nodes.push(NodeRef::Type(ty));
            for field in &ty.fields {
                nodes.push(NodeRef::Field(ty, field));
                for arg in &field.arguments {
                    nodes.push(NodeRef::Argument(ty, field, arg));
                }
            }
        }
        nodes
    }
}

/// Kind of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Object,
    Interface,
    Union,
    Input,
    Enum,
    Scalar,
}

impl TypeKind {
    /// Abstract kinds need a resolver to pick a concrete type at runtime.
    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Union)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUse>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn find_argument(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUse>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }
}

/// A directive attached to a node, with its parsed argument values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectiveUse {
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
}

impl DirectiveUse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Map::new(),
        }
    }

    /// Add an argument value (builder style).
    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }
}

/// Which kind of declaration a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Type,
    Field,
    Argument,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Type => "type",
            NodeKind::Field => "field",
            NodeKind::Argument => "argument",
        })
    }
}

/// A directive-bearing node in the schema tree.
pub trait SchemaNode {
    fn kind(&self) -> NodeKind;

    /// Human-readable location used in bindings and diagnostics.
    fn coordinate(&self) -> String;

    /// Attached directives, in the order they were declared.
    fn directives(&self) -> &[DirectiveUse];

    fn directive_names(&self) -> Vec<&str> {
        self.directives().iter().map(|d| d.name.as_str()).collect()
    }
}

impl SchemaNode for TypeDefinition {
    fn kind(&self) -> NodeKind {
        NodeKind::Type
    }

    fn coordinate(&self) -> String {
        self.name.clone()
    }

    fn directives(&self) -> &[DirectiveUse] {
        &self.directives
    }
}

impl SchemaNode for FieldDefinition {
    fn kind(&self) -> NodeKind {
        NodeKind::Field
    }

    fn coordinate(&self) -> String {
        self.name.clone()
    }

    fn directives(&self) -> &[DirectiveUse] {
        &self.directives
    }
}

impl SchemaNode for ArgumentDefinition {
    fn kind(&self) -> NodeKind {
        NodeKind::Argument
    }

    fn coordinate(&self) -> String {
        self.name.clone()
    }

    fn directives(&self) -> &[DirectiveUse] {
        &self.directives
    }
}

/// A borrowed node together with its parents, for qualified coordinates
/// such as `User.posts(first:)`.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Type(&'a TypeDefinition),
    Field(&'a TypeDefinition, &'a FieldDefinition),
    Argument(
        &'a TypeDefinition,
        &'a FieldDefinition,
        &'a ArgumentDefinition,
    ),
}

impl SchemaNode for NodeRef<'_> {
    fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Type(_) => NodeKind::Type,
            NodeRef::Field(..) => NodeKind::Field,
            NodeRef::Argument(..) => NodeKind::Argument,
        }
    }

    fn coordinate(&self) -> String {
        match self {
            NodeRef::Type(ty) => ty.name.clone(),
            NodeRef::Field(ty, field) => format!("{}.{}", ty.name, field.name),
            NodeRef::Argument(ty, field, arg) => {
                format!("{}.{}({}:)", ty.name, field.name, arg.name)
            }
        }
    }

    fn directives(&self) -> &[DirectiveUse] {
        match self {
            NodeRef::Type(ty) => &ty.directives,
            NodeRef::Field(_, field) => &field.directives,
            NodeRef::Argument(_, _, arg) => &arg.directives,
        }
    }
}
