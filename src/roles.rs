//! Role classification of directive handlers.
//!
//! Each predicate is a pure capability test on the handler's type. Ordering
//! and cardinality live in the registry, not here.

use std::fmt;

use serde::Serialize;

use crate::directive::Directive;
use crate::types::NodeKind;

/// A capacity in which a directive can act on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    NodeManipulator,
    FieldManipulator,
    ArgManipulator,
    NodeResolver,
    FieldResolver,
    NodeMiddleware,
    FieldMiddleware,
    ArgMiddleware,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::NodeManipulator,
        Role::FieldManipulator,
        Role::ArgManipulator,
        Role::NodeResolver,
        Role::FieldResolver,
        Role::NodeMiddleware,
        Role::FieldMiddleware,
        Role::ArgMiddleware,
    ];

    /// The kind of node this role applies to.
    pub fn node_kind(&self) -> NodeKind {
        match self {
            Role::NodeManipulator | Role::NodeResolver | Role::NodeMiddleware => NodeKind::Type,
            Role::FieldManipulator | Role::FieldResolver | Role::FieldMiddleware => {
                NodeKind::Field
            }
            Role::ArgManipulator | Role::ArgMiddleware => NodeKind::Argument,
        }
    }

    pub fn is_fulfilled_by(&self, handler: &dyn Directive) -> bool {
        match self {
            Role::NodeManipulator => is_node_manipulator(handler),
            Role::FieldManipulator => is_field_manipulator(handler),
            Role::ArgManipulator => is_arg_manipulator(handler),
            Role::NodeResolver => is_node_resolver(handler),
            Role::FieldResolver => is_field_resolver(handler),
            Role::NodeMiddleware => is_node_middleware(handler),
            Role::FieldMiddleware => is_field_middleware(handler),
            Role::ArgMiddleware => is_arg_middleware(handler),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::NodeManipulator => "node-manipulator",
            Role::FieldManipulator => "field-manipulator",
            Role::ArgManipulator => "arg-manipulator",
            Role::NodeResolver => "node-resolver",
            Role::FieldResolver => "field-resolver",
            Role::NodeMiddleware => "node-middleware",
            Role::FieldMiddleware => "field-middleware",
            Role::ArgMiddleware => "arg-middleware",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All roles a handler fulfils, in [`Role::ALL`] order.
pub fn roles_of(handler: &dyn Directive) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| role.is_fulfilled_by(handler))
        .collect()
}

/// Roles a handler fulfils on a node of the given kind.
pub fn roles_at(handler: &dyn Directive, kind: NodeKind) -> Vec<Role> {
    roles_of(handler)
        .into_iter()
        .filter(|role| role.node_kind() == kind)
        .collect()
}

pub fn is_node_manipulator(handler: &dyn Directive) -> bool {
    handler.as_node_manipulator().is_some()
}

pub fn is_field_manipulator(handler: &dyn Directive) -> bool {
    handler.as_field_manipulator().is_some()
}

pub fn is_arg_manipulator(handler: &dyn Directive) -> bool {
    handler.as_arg_manipulator().is_some()
}

pub fn is_node_resolver(handler: &dyn Directive) -> bool {
    handler.as_node_resolver().is_some()
}

pub fn is_field_resolver(handler: &dyn Directive) -> bool {
    handler.as_field_resolver().is_some()
}

pub fn is_node_middleware(handler: &dyn Directive) -> bool {
    handler.as_node_middleware().is_some()
}

pub fn is_field_middleware(handler: &dyn Directive) -> bool {
    handler.as_field_middleware().is_some()
}

pub fn is_arg_middleware(handler: &dyn Directive) -> bool {
    handler.as_arg_middleware().is_some()
}
