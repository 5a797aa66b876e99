//! Field-resolution wiring: runs argument middleware, node and field
//! middleware and the field resolver for one field of one value.

use serde_json::{Map, Value};

use crate::directive::{BoundDirective, FieldMiddleware, NodeMiddleware, ResolveInfo};
use crate::error::{DirectiveError, PipelineError};
use crate::registry::DirectiveRegistry;
use crate::types::{NodeRef, SchemaDocument};

/// One layer of the middleware chain.
#[derive(Clone, Copy)]
enum Layer<'a> {
    Node(&'a dyn NodeMiddleware),
    Field(&'a dyn FieldMiddleware),
}

/// Resolve `type_name.field_name` against `root`.
///
/// Argument values are completed with declared defaults and passed through
/// each argument's middleware. The resolver is the field's resolver
/// directive, or a plain property lookup on `root` when there is none. It is
/// wrapped by the type's node middleware (outermost) and then the field's
/// middleware, each in declaration order.
///
/// # Errors
///
/// Returns `PipelineError` for unknown types or fields, registry failures,
/// and errors raised by directives.
pub fn resolve_field(
    registry: &DirectiveRegistry,
    document: &SchemaDocument,
    type_name: &str,
    field_name: &str,
    root: &Value,
    arguments: Map<String, Value>,
) -> Result<Value, PipelineError> {
    let ty = document
        .find_type(type_name)
        .ok_or_else(|| PipelineError::UnknownType {
            name: type_name.to_string(),
        })?;
    let field = ty
        .find_field(field_name)
        .ok_or_else(|| PipelineError::UnknownField {
            type_name: type_name.to_string(),
            field: field_name.to_string(),
        })?;

    let mut arguments = arguments;
    for argument in &field.arguments {
        let value = match arguments.remove(&argument.name) {
            Some(value) => value,
            None => match &argument.default_value {
                Some(default) => default.clone(),
                None => continue,
            },
        };
        let mut value = value;
        for directive in registry.arg_middleware(&NodeRef::Argument(ty, field, argument))? {
            if let Some(middleware) = directive.as_arg_middleware() {
                value = middleware.handle_argument(value)?;
            }
        }
        arguments.insert(argument.name.clone(), value);
    }

    let node_middleware = registry.node_middleware(&NodeRef::Type(ty))?;
    let field_node = NodeRef::Field(ty, field);
    let field_middleware = registry.field_middleware(&field_node)?;
    let resolver = registry.field_resolver(&field_node)?;

    let layers: Vec<Layer<'_>> = node_middleware
        .iter()
        .filter_map(|d| d.as_node_middleware().map(Layer::Node))
        .chain(
            field_middleware
                .iter()
                .filter_map(|d| d.as_field_middleware().map(Layer::Field)),
        )
        .collect();

    let info = ResolveInfo {
        type_name: &ty.name,
        field_name: &field.name,
        root,
        arguments: &arguments,
    };
    Ok(run_chain(&layers, &info, &|info| {
        default_or_directive(resolver.as_ref(), info)
    })?)
}

fn default_or_directive(
    resolver: Option<&BoundDirective>,
    info: &ResolveInfo<'_>,
) -> Result<Value, DirectiveError> {
    match resolver.and_then(|d| d.as_field_resolver()) {
        Some(resolver) => resolver.resolve_field(info),
        None => Ok(info.root.get(info.field_name).cloned().unwrap_or(Value::Null)),
    }
}

fn run_chain(
    layers: &[Layer<'_>],
    info: &ResolveInfo<'_>,
    resolve: &dyn Fn(&ResolveInfo<'_>) -> Result<Value, DirectiveError>,
) -> Result<Value, DirectiveError> {
    match layers.split_first() {
        None => resolve(info),
        Some((Layer::Node(middleware), rest)) => {
            middleware.handle_node(info, &|info| run_chain(rest, info, resolve))
        }
        Some((Layer::Field(middleware), rest)) => {
            middleware.handle_field(info, &|info| run_chain(rest, info, resolve))
        }
    }
}

/// Name of the concrete type `value` has when returned as `type_name`.
///
/// Concrete types resolve to themselves. Abstract types need a node
/// resolver directive.
pub fn resolve_type(
    registry: &DirectiveRegistry,
    document: &SchemaDocument,
    type_name: &str,
    value: &Value,
) -> Result<String, PipelineError> {
    let ty = document
        .find_type(type_name)
        .ok_or_else(|| PipelineError::UnknownType {
            name: type_name.to_string(),
        })?;

    let resolver = registry.node_resolver(&NodeRef::Type(ty))?;
    match resolver.as_ref().and_then(|d| d.as_node_resolver()) {
        Some(resolver) => Ok(resolver.resolve_node(value)?),
        None if ty.kind.is_abstract() => Err(PipelineError::UnresolvableType {
            name: ty.name.clone(),
        }),
        None => Ok(ty.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{Directive, Next};
    use crate::types::{ArgumentDefinition, DirectiveUse, FieldDefinition, TypeDefinition, TypeKind};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn document() -> SchemaDocument {
        let mut user = TypeDefinition::new("User");
        let mut name = FieldDefinition::new("name", "String");
        name.directives = vec![
            DirectiveUse::new("upper"),
            DirectiveUse::new("rename").with_argument("attribute", json!("full_name")),
        ];
        let mut search = FieldDefinition::new("echo", "String");
        let mut term = ArgumentDefinition::new("term", "String");
        term.directives.push(DirectiveUse::new("trim"));
        let mut limit = ArgumentDefinition::new("limit", "Int");
        limit.default_value = Some(json!(10));
        search.arguments = vec![term, limit];
        user.fields = vec![name, search, FieldDefinition::new("email", "String")];

        let mut result = TypeDefinition::new("SearchResult");
        result.kind = TypeKind::Union;
        result
            .directives
            .push(DirectiveUse::new("discriminator").with_argument("field", json!("kind")));

        let mut node = TypeDefinition::new("Node");
        node.kind = TypeKind::Interface;

        SchemaDocument {
            types: vec![user, result, node],
        }
    }

    #[test]
    fn resolver_wrapped_by_middleware() {
        let registry = DirectiveRegistry::with_builtins();
        let root = json!({ "full_name": "Ada Lovelace" });
        let value =
            resolve_field(&registry, &document(), "User", "name", &root, Map::new()).unwrap();
        assert_eq!(value, json!("ADA LOVELACE"));
    }

    #[test]
    fn default_resolver_reads_property() {
        let registry = DirectiveRegistry::with_builtins();
        let root = json!({ "email": "ada@example.com" });
        let value =
            resolve_field(&registry, &document(), "User", "email", &root, Map::new()).unwrap();
        assert_eq!(value, json!("ada@example.com"));

        let value =
            resolve_field(&registry, &document(), "User", "email", &json!({}), Map::new()).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[derive(Default, Clone)]
    struct Echo;

    impl Directive for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn as_field_resolver(&self) -> Option<&dyn crate::directive::FieldResolver> {
            Some(self)
        }
    }

    impl crate::directive::FieldResolver for Echo {
        fn resolve_field(&self, info: &ResolveInfo<'_>) -> Result<Value, DirectiveError> {
            Ok(Value::Object(info.arguments.clone()))
        }
    }

    #[test]
    fn arguments_get_defaults_and_middleware() {
        let mut registry = DirectiveRegistry::with_builtins();
        registry.register(Echo);
        let mut doc = document();
        doc.types[0].fields[1]
            .directives
            .push(DirectiveUse::new("echo"));

        let mut args = Map::new();
        args.insert("term".into(), json!("  rust  "));
        let value = resolve_field(&registry, &doc, "User", "echo", &json!({}), args).unwrap();
        assert_eq!(value, json!({ "term": "rust", "limit": 10 }));
    }

    #[derive(Default)]
    struct Record {
        log: Arc<Mutex<Vec<String>>>,
        label: &'static str,
    }

    impl Directive for Record {
        fn name(&self) -> &str {
            self.label
        }

        fn as_node_middleware(&self) -> Option<&dyn NodeMiddleware> {
            Some(self)
        }

        fn as_field_middleware(&self) -> Option<&dyn FieldMiddleware> {
            Some(self)
        }
    }

    impl NodeMiddleware for Record {
        fn handle_node(
            &self,
            info: &ResolveInfo<'_>,
            next: Next<'_>,
        ) -> Result<Value, DirectiveError> {
            self.log.lock().unwrap().push(format!("node:{}", self.label));
            next(info)
        }
    }

    impl FieldMiddleware for Record {
        fn handle_field(
            &self,
            info: &ResolveInfo<'_>,
            next: Next<'_>,
        ) -> Result<Value, DirectiveError> {
            self.log.lock().unwrap().push(format!("field:{}", self.label));
            next(info)
        }
    }

    #[test]
    fn node_middleware_runs_outside_field_middleware() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = DirectiveRegistry::new();
        for label in ["outer", "inner"] {
            let log = Arc::clone(&log);
            registry.register_factory(move || {
                Box::new(Record {
                    log: Arc::clone(&log),
                    label,
                })
            });
        }

        let mut ty = TypeDefinition::new("Query");
        ty.directives.push(DirectiveUse::new("outer"));
        let mut field = FieldDefinition::new("ping", "String");
        field.directives = vec![DirectiveUse::new("outer"), DirectiveUse::new("inner")];
        ty.fields.push(field);
        let doc = SchemaDocument { types: vec![ty] };

        let value =
            resolve_field(&registry, &doc, "Query", "ping", &json!({ "ping": "pong" }), Map::new())
                .unwrap();
        assert_eq!(value, json!("pong"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["node:outer", "field:outer", "field:inner"]
        );
    }

    #[test]
    fn unknown_field_errors() {
        let registry = DirectiveRegistry::with_builtins();
        let err = resolve_field(&registry, &document(), "User", "nope", &json!({}), Map::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownField { .. }));
        let err = resolve_field(&registry, &document(), "Nope", "x", &json!({}), Map::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownType { .. }));
    }

    #[test]
    fn resolves_abstract_types_through_node_resolver() {
        let registry = DirectiveRegistry::with_builtins();
        let doc = document();
        assert_eq!(
            resolve_type(&registry, &doc, "SearchResult", &json!({ "kind": "User" })).unwrap(),
            "User"
        );
        assert_eq!(
            resolve_type(&registry, &doc, "User", &json!({})).unwrap(),
            "User"
        );
        assert!(matches!(
            resolve_type(&registry, &doc, "Node", &json!({})),
            Err(PipelineError::UnresolvableType { .. })
        ));
    }
}
