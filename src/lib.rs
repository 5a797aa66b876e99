//! Directive Registry
//!
//! Discovers schema directive handlers, associates them with the type,
//! field and argument definitions they are attached to, and hands out
//! fresh, node-bound handler instances classified by role.
//!
//! # Example
//!
//! ```
//! use directive_registry::{DirectiveRegistry, DirectiveUse, FieldDefinition, RenameDirective};
//! use serde_json::json;
//!
//! let registry = DirectiveRegistry::with_builtins();
//!
//! let mut field = FieldDefinition::new("fullName", "String");
//! field.directives = vec![
//!     DirectiveUse::new("upper"),
//!     DirectiveUse::new("rename").with_argument("attribute", json!("full_name")),
//! ];
//!
//! // Every directive on the node, bound to it, in declaration order.
//! let bound = registry.directives_of(&field).unwrap();
//! assert_eq!(bound.len(), 2);
//!
//! // At most one resolver per field.
//! let resolver = registry.field_resolver(&field).unwrap().unwrap();
//! assert!(resolver.is::<RenameDirective>());
//! assert_eq!(registry.field_middleware(&field).unwrap().len(), 1);
//! ```
//!
//! # Roles
//!
//! | Role | Applies to | Cardinality |
//! |------|------------|-------------|
//! | Manipulator | type, field, argument | any number |
//! | Resolver | type, field | at most one |
//! | Middleware | type, field, argument | any number |
//!
//! A handler opts into a role by implementing the role trait (for example
//! [`FieldResolver`]) and returning itself from the matching accessor on
//! [`Directive`].

mod binder;
mod builder;
mod catalog;
mod config;
mod directive;
pub mod directives;
mod error;
mod linter;
mod loader;
mod pipeline;
mod registry;
mod roles;
mod types;
mod validator;

pub use binder::bind;
pub use builder::build_schema;
pub use catalog::{
    factory_of, Catalog, DirectiveFactory, Discoverer, PathDiscoverer, TypeResolver, TypeTable,
    NAMESPACE_SEPARATOR,
};
pub use config::{DiscoveryRoot, RegistryConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use directive::{
    ArgManipulator, ArgMiddleware, Binding, BoundDirective, Directive, FieldManipulator,
    FieldMiddleware, FieldResolver, Next, NodeManipulator, NodeMiddleware, NodeResolver,
    ResolveInfo,
};
pub use directives::{builtin_types, register_builtins, RenameDirective};
pub use error::{
    BuildError, ConfigError, DirectiveError, LoadError, PipelineError, RegistryError,
    SchemaError, ValidateError,
};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{
    is_url, load_document, load_document_auto, load_json, load_json_auto, load_json_str,
    parse_document, DocumentSource,
};
pub use pipeline::{resolve_field, resolve_type};
pub use registry::DirectiveRegistry;
pub use roles::{
    is_arg_manipulator, is_arg_middleware, is_field_manipulator, is_field_middleware,
    is_field_resolver, is_node_manipulator, is_node_middleware, is_node_resolver, roles_at,
    roles_of, Role,
};
pub use types::{
    json_type_name, ArgumentDefinition, DirectiveUse, FieldDefinition, NodeKind, NodeRef,
    SchemaDocument, SchemaNode, TypeDefinition, TypeKind,
};
pub use validator::{document_schema, validate_document};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
