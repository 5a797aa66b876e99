//! Directive registry: the query surface schema builders and execution
//! wiring use to ask which directives apply to a node, and in what role.
//!
//! Every query starts from [`DirectiveRegistry::directives_of`], which binds
//! a fresh handler for each directive attached to the node in declaration
//! order. Role queries are order-preserving filters of that sequence.

use std::path::Path;

use crate::binder::bind;
use crate::catalog::{Catalog, Discoverer, TypeResolver};
use crate::config::RegistryConfig;
use crate::directive::{BoundDirective, Directive};
use crate::directives;
use crate::error::RegistryError;
use crate::roles::{
    is_arg_manipulator, is_arg_middleware, is_field_manipulator, is_field_middleware,
    is_field_resolver, is_node_manipulator, is_node_middleware, is_node_resolver,
};
use crate::types::SchemaNode;

/// Registry of directive handlers.
///
/// Build one at startup and pass it to whatever needs directive resolution.
/// Queries take `&self` and never touch shared state beyond reading the
/// catalog, so they are safe to run concurrently once registration is done.
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    catalog: Catalog,
}

impl DirectiveRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in directive registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        directives::register_builtins(&mut registry);
        registry
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Build a registry from configuration.
    ///
    /// Built-ins are registered first when enabled, then every configured
    /// discovery root is scanned against `types`.
    pub fn from_config<T: TypeResolver + ?Sized>(config: &RegistryConfig, types: &T) -> Self {
        let mut registry = if config.include_builtins {
            Self::with_builtins()
        } else {
            Self::new()
        };
        for root in &config.discovery {
            registry.load(&root.paths, &root.namespace_prefix, &root.namespace_root, types);
        }
        registry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Register a handler under its own name, replacing any previous one.
    ///
    /// Lookups hand out clones of `handler`.
    pub fn register<D: Directive + Clone>(&mut self, handler: D) {
        self.catalog.register(handler);
    }

    pub fn register_factory<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Directive> + Send + Sync + 'static,
    {
        self.catalog.register_factory(factory);
    }

    /// Run a discovery pass over `roots`. See [`Catalog::load`].
    pub fn load<I, P, T>(
        &mut self,
        roots: I,
        namespace_prefix: &str,
        namespace_root: &Path,
        types: &T,
    ) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        T: TypeResolver + ?Sized,
    {
        self.catalog
            .load(roots, namespace_prefix, namespace_root, types)
    }

    pub fn load_from<D, T>(&mut self, discoverer: &D, types: &T) -> usize
    where
        D: Discoverer + ?Sized,
        T: TypeResolver + ?Sized,
    {
        self.catalog.load_from(discoverer, types)
    }

    /// Fresh, unbound instance of the handler named `name`.
    pub fn get(&self, name: &str) -> Result<BoundDirective, RegistryError> {
        self.catalog.get(name)
    }

    /// Bound handlers for every directive on `node`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for the first directive without a
    /// registered handler.
    pub fn directives_of<N: SchemaNode + ?Sized>(
        &self,
        node: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        node.directives()
            .iter()
            .map(|usage| {
                let handler = self.catalog.get(&usage.name)?;
                Ok(bind(handler, node, usage))
            })
            .collect()
    }

    fn filtered<N, P>(&self, node: &N, predicate: P) -> Result<Vec<BoundDirective>, RegistryError>
    where
        N: SchemaNode + ?Sized,
        P: Fn(&dyn Directive) -> bool,
    {
        let mut directives = self.directives_of(node)?;
        directives.retain(|d| predicate(d.as_ref()));
        Ok(directives)
    }

    pub fn node_manipulators<N: SchemaNode + ?Sized>(
        &self,
        node: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        self.filtered(node, is_node_manipulator)
    }

    pub fn field_manipulators<N: SchemaNode + ?Sized>(
        &self,
        field: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        self.filtered(field, is_field_manipulator)
    }

    pub fn arg_manipulators<N: SchemaNode + ?Sized>(
        &self,
        argument: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        self.filtered(argument, is_arg_manipulator)
    }

    pub fn node_middleware<N: SchemaNode + ?Sized>(
        &self,
        node: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        self.filtered(node, is_node_middleware)
    }

    pub fn field_middleware<N: SchemaNode + ?Sized>(
        &self,
        field: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        self.filtered(field, is_field_middleware)
    }

    pub fn arg_middleware<N: SchemaNode + ?Sized>(
        &self,
        argument: &N,
    ) -> Result<Vec<BoundDirective>, RegistryError> {
        self.filtered(argument, is_arg_middleware)
    }

    /// The single node resolver on `node`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ConflictingNodeResolver` when more than one
    /// directive on the node is a node resolver.
    pub fn node_resolver<N: SchemaNode + ?Sized>(
        &self,
        node: &N,
    ) -> Result<Option<BoundDirective>, RegistryError> {
        let mut resolvers = self.filtered(node, is_node_resolver)?;
        if resolvers.len() > 1 {
            return Err(RegistryError::ConflictingNodeResolver {
                node: node.coordinate(),
                directives: resolvers.iter().map(|d| d.name().to_string()).collect(),
            });
        }
        Ok(resolvers.pop())
    }

    /// The single field resolver on `field`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ConflictingFieldResolver`, listing every
    /// directive on the field, when more than one is a field resolver.
    pub fn field_resolver<N: SchemaNode + ?Sized>(
        &self,
        field: &N,
    ) -> Result<Option<BoundDirective>, RegistryError> {
        let mut resolvers = self.filtered(field, is_field_resolver)?;
        if resolvers.len() > 1 {
            return Err(RegistryError::ConflictingFieldResolver {
                field: field.coordinate(),
                directives: field
                    .directive_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }
        Ok(resolvers.pop())
    }

    /// Whether `node` has a node resolver. Conflicts still fail.
    pub fn has_node_resolver<N: SchemaNode + ?Sized>(
        &self,
        node: &N,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .node_resolver(node)?
            .is_some_and(|d| is_node_resolver(d.as_ref())))
    }

    /// Whether `field` has a field resolver. Conflicts still fail.
    pub fn has_field_resolver<N: SchemaNode + ?Sized>(
        &self,
        field: &N,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .field_resolver(field)?
            .is_some_and(|d| is_field_resolver(d.as_ref())))
    }

    /// Whether any directive on `field` is field middleware.
    ///
    /// Handlers are looked up but not bound. Unregistered names still fail
    /// with `RegistryError::NotFound`.
    pub fn has_field_middleware<N: SchemaNode + ?Sized>(
        &self,
        field: &N,
    ) -> Result<bool, RegistryError> {
        let mut found = false;
        for usage in field.directives() {
            let handler = self.catalog.get(&usage.name)?;
            found |= is_field_middleware(handler.as_ref());
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directives::{ConstantDirective, RenameDirective, UpperDirective};
    use crate::types::{DirectiveUse, FieldDefinition, TypeDefinition};
    use serde_json::json;

    fn field_with(directives: &[&str]) -> FieldDefinition {
        let mut field = FieldDefinition::new("name", "String");
        field.directives = directives.iter().map(|n| DirectiveUse::new(*n)).collect();
        field
    }

    #[test]
    fn empty_node_yields_nothing() {
        let registry = DirectiveRegistry::with_builtins();
        let ty = TypeDefinition::new("User");
        assert!(registry.directives_of(&ty).unwrap().is_empty());
        assert!(registry.node_manipulators(&ty).unwrap().is_empty());
        assert!(registry.node_resolver(&ty).unwrap().is_none());
        assert!(!registry.has_node_resolver(&ty).unwrap());
    }

    #[test]
    fn unknown_directive_fails_every_query() {
        let registry = DirectiveRegistry::with_builtins();
        let field = field_with(&["upper", "nope"]);

        for result in [
            registry.directives_of(&field).map(|_| ()),
            registry.field_middleware(&field).map(|_| ()),
            registry.field_resolver(&field).map(|_| ()),
            registry.has_field_middleware(&field).map(|_| ()),
        ] {
            assert!(matches!(result, Err(RegistryError::NotFound { ref name }) if name == "nope"));
        }
    }

    #[test]
    fn field_resolver_ignores_other_roles() {
        let registry = DirectiveRegistry::with_builtins();
        let mut field = field_with(&["upper"]);
        field.directives.push(
            DirectiveUse::new("rename").with_argument("attribute", json!("full_name")),
        );

        let resolver = registry.field_resolver(&field).unwrap().unwrap();
        assert!(resolver.is::<RenameDirective>());
        assert!(registry.has_field_resolver(&field).unwrap());
        assert!(registry.has_field_middleware(&field).unwrap());
    }

    #[test]
    fn two_field_resolvers_conflict() {
        let registry = DirectiveRegistry::with_builtins();
        let field = field_with(&["rename", "upper", "constant"]);

        let err = registry.field_resolver(&field).unwrap_err();
        match err {
            RegistryError::ConflictingFieldResolver { field, directives } => {
                assert_eq!(field, "name");
                assert_eq!(directives, vec!["rename", "upper", "constant"]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert!(registry.has_field_resolver(&field).is_err());
    }

    #[test]
    fn repeated_calls_bind_distinct_instances() {
        let mut registry = DirectiveRegistry::new();
        registry.register(ConstantDirective::default());
        let field = field_with(&["constant"]);

        let first = registry.directives_of(&field).unwrap();
        let second = registry.directives_of(&field).unwrap();
        let a = first[0].as_ref() as *const dyn Directive as *const ();
        let b = second[0].as_ref() as *const dyn Directive as *const ();
        assert_ne!(a, b);

        let a = first[0].downcast_ref::<ConstantDirective>().unwrap();
        let b = second[0].downcast_ref::<ConstantDirective>().unwrap();
        assert_eq!(a.binding(), b.binding());
    }

    #[test]
    fn from_catalog_wraps_existing_catalog() {
        let mut catalog = Catalog::new();
        catalog.register(UpperDirective::default());
        let registry = DirectiveRegistry::from_catalog(catalog);

        assert_eq!(registry.catalog().names(), vec!["upper"]);
        assert_eq!(registry.field_middleware(&field_with(&["upper"])).unwrap().len(), 1);
    }

    #[test]
    fn has_field_middleware_false_without_middleware() {
        let mut registry = DirectiveRegistry::new();
        registry.register(RenameDirective::default());
        registry.register(UpperDirective::default());
        assert!(!registry.has_field_middleware(&field_with(&["rename"])).unwrap());
        assert!(!registry.has_field_middleware(&field_with(&[])).unwrap());
    }
}
