//! Directive handler capabilities.
//!
//! Every handler implements [`Directive`]. Roles are opted into by
//! implementing one of the role traits and overriding the matching
//! `as_*` accessor so the registry can discover the role at runtime:
//!
//! ```
//! use directive_registry::{Directive, FieldResolver, ResolveInfo, DirectiveError};
//! use serde_json::Value;
//!
//! #[derive(Default)]
//! struct Always;
//!
//! impl Directive for Always {
//!     fn name(&self) -> &str {
//!         "always"
//!     }
//!
//!     fn as_field_resolver(&self) -> Option<&dyn FieldResolver> {
//!         Some(self)
//!     }
//! }
//!
//! impl FieldResolver for Always {
//!     fn resolve_field(&self, _info: &ResolveInfo<'_>) -> Result<Value, DirectiveError> {
//!         Ok(Value::Bool(true))
//!     }
//! }
//! ```

use std::any::Any;

use serde_json::{Map, Value};

use crate::error::DirectiveError;
use crate::types::{
    json_type_name, ArgumentDefinition, DirectiveUse, FieldDefinition, NodeKind, SchemaNode,
    TypeDefinition,
};

/// A handler instance that has been bound to one node.
///
/// Owned by the caller and scoped to a single resolution call. The registry
/// never keeps one, and callers must not cache it across nodes.
pub type BoundDirective = Box<dyn Directive>;

/// Base capability shared by every directive handler.
pub trait Directive: Any + Send + Sync {
    /// Name the directive is referenced by in schema documents.
    fn name(&self) -> &str;

    /// Arguments that must be present on every use of this directive.
    fn required_arguments(&self) -> &[&'static str] {
        &[]
    }

    /// Produce a fresh instance bound to `binding`.
    ///
    /// Stateless handlers keep the default, which opts out of hydration.
    fn hydrate(&self, _binding: &Binding) -> Option<BoundDirective> {
        None
    }

    fn as_node_manipulator(&self) -> Option<&dyn NodeManipulator> {
        None
    }

    fn as_field_manipulator(&self) -> Option<&dyn FieldManipulator> {
        None
    }

    fn as_arg_manipulator(&self) -> Option<&dyn ArgManipulator> {
        None
    }

    fn as_node_resolver(&self) -> Option<&dyn NodeResolver> {
        None
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolver> {
        None
    }

    fn as_node_middleware(&self) -> Option<&dyn NodeMiddleware> {
        None
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddleware> {
        None
    }

    fn as_arg_middleware(&self) -> Option<&dyn ArgMiddleware> {
        None
    }
}

impl dyn Directive {
    /// Returns true if the concrete handler type is `T`.
    pub fn is<T: Directive>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    pub fn downcast_ref<T: Directive>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

impl std::fmt::Debug for dyn Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// Alters a type definition while the schema is being built.
pub trait NodeManipulator: Directive {
    fn manipulate_type(&self, ty: &mut TypeDefinition) -> Result<(), DirectiveError>;
}

/// Alters a field definition while the schema is being built.
pub trait FieldManipulator: Directive {
    fn manipulate_field(&self, field: &mut FieldDefinition) -> Result<(), DirectiveError>;
}

/// Alters an argument definition while the schema is being built.
pub trait ArgManipulator: Directive {
    fn manipulate_argument(&self, argument: &mut ArgumentDefinition)
        -> Result<(), DirectiveError>;
}

/// Picks the concrete type name for a runtime value of an abstract type.
pub trait NodeResolver: Directive {
    fn resolve_node(&self, value: &Value) -> Result<String, DirectiveError>;
}

/// Produces the value of a field.
pub trait FieldResolver: Directive {
    fn resolve_field(&self, info: &ResolveInfo<'_>) -> Result<Value, DirectiveError>;
}

/// Continuation handed to middleware: runs the rest of the chain.
pub type Next<'n> = &'n dyn Fn(&ResolveInfo<'_>) -> Result<Value, DirectiveError>;

/// Wraps resolution of every field on a type.
pub trait NodeMiddleware: Directive {
    fn handle_node(&self, info: &ResolveInfo<'_>, next: Next<'_>)
        -> Result<Value, DirectiveError>;
}

/// Wraps resolution of a single field.
pub trait FieldMiddleware: Directive {
    fn handle_field(
        &self,
        info: &ResolveInfo<'_>,
        next: Next<'_>,
    ) -> Result<Value, DirectiveError>;
}

/// Transforms an incoming argument value before the field resolves.
pub trait ArgMiddleware: Directive {
    fn handle_argument(&self, value: Value) -> Result<Value, DirectiveError>;
}

/// Execution context for field resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInfo<'a> {
    pub type_name: &'a str,
    pub field_name: &'a str,
    /// The parent value the field is resolved against.
    pub root: &'a Value,
    pub arguments: &'a Map<String, Value>,
}

/// Read-only context a handler is hydrated with: the node it is attached
/// to and the parsed arguments of that particular use.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    kind: NodeKind,
    coordinate: String,
    directive: String,
    arguments: Map<String, Value>,
}

impl Binding {
    pub fn new<N: SchemaNode + ?Sized>(node: &N, usage: &DirectiveUse) -> Self {
        Self {
            kind: node.kind(),
            coordinate: node.coordinate(),
            directive: usage.name.clone(),
            arguments: usage.arguments.clone(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }

    pub fn directive_name(&self) -> &str {
        &self.directive
    }

    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Look up an argument that must be present.
    pub fn required_argument(&self, name: &str) -> Result<&Value, DirectiveError> {
        self.arguments
            .get(name)
            .ok_or_else(|| DirectiveError::MissingArgument {
                directive: self.directive.clone(),
                coordinate: self.coordinate.clone(),
                argument: name.to_string(),
            })
    }

    /// Look up an optional string argument.
    ///
    /// Fails when the argument is present but not a string.
    pub fn string_argument(&self, name: &str) -> Result<Option<&str>, DirectiveError> {
        match self.arguments.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(DirectiveError::InvalidArgument {
                directive: self.directive.clone(),
                coordinate: self.coordinate.clone(),
                argument: name.to_string(),
                expected: "string".to_string(),
                actual: json_type_name(other).to_string(),
            }),
        }
    }

    /// Look up a string argument that must be present.
    pub fn required_string_argument(&self, name: &str) -> Result<&str, DirectiveError> {
        self.required_argument(name)?;
        self.string_argument(name)?
            .ok_or_else(|| DirectiveError::MissingArgument {
                directive: self.directive.clone(),
                coordinate: self.coordinate.clone(),
                argument: name.to_string(),
            })
    }
}
