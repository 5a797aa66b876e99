//! Schema build pass - applies manipulator directives to a document.

use crate::error::BuildError;
use crate::registry::DirectiveRegistry;
use crate::types::{NodeRef, SchemaDocument};

/// Apply every manipulator directive in `document` and return the result.
///
/// Types are manipulated first, then each of their fields (including any a
/// type manipulator added), then each field's arguments. Within a node,
/// manipulators run in declaration order. Every type and field is also
/// checked for conflicting resolvers so a broken schema fails here rather
/// than at execution time.
///
/// # Errors
///
/// Returns `BuildError::Registry` for unknown directives or resolver
/// conflicts, and `BuildError::Directive` if a manipulator fails.
pub fn build_schema(
    document: &SchemaDocument,
    registry: &DirectiveRegistry,
) -> Result<SchemaDocument, BuildError> {
    let mut built = document.clone();

    for ty in built.types.iter_mut() {
        let manipulators = registry.node_manipulators(&*ty)?;
        for directive in &manipulators {
            if let Some(manipulator) = directive.as_node_manipulator() {
                manipulator.manipulate_type(ty)?;
            }
        }

        for index in 0..ty.fields.len() {
            let manipulators = registry.field_manipulators(&NodeRef::Field(ty, &ty.fields[index]))?;
            let field = &mut ty.fields[index];
            for directive in &manipulators {
                if let Some(manipulator) = directive.as_field_manipulator() {
                    manipulator.manipulate_field(field)?;
                }
            }

            for arg_index in 0..ty.fields[index].arguments.len() {
                let field = &ty.fields[index];
                let manipulators = registry
                    .arg_manipulators(&NodeRef::Argument(ty, field, &field.arguments[arg_index]))?;
                let argument = &mut ty.fields[index].arguments[arg_index];
                for directive in &manipulators {
                    if let Some(manipulator) = directive.as_arg_manipulator() {
                        manipulator.manipulate_argument(argument)?;
                    }
                }
            }
        }
    }

    for node in built.nodes() {
        match node {
            NodeRef::Type(_) => {
                registry.node_resolver(&node)?;
            }
            NodeRef::Field(..) => {
                registry.field_resolver(&node)?;
            }
            NodeRef::Argument(..) => {}
        }
    }

    tracing::debug!(types = built.types.len(), "schema built");
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directives::DEFAULT_DEPRECATION_REASON;
    use crate::error::RegistryError;
    use crate::types::{ArgumentDefinition, DirectiveUse, FieldDefinition, TypeDefinition};
    use serde_json::json;

    fn user_type() -> TypeDefinition {
        let mut ty = TypeDefinition::new("User");
        ty.directives.push(DirectiveUse::new("node"));

        let mut legacy = FieldDefinition::new("legacyName", "String");
        legacy.directives.push(
            DirectiveUse::new("deprecated").with_argument("reason", json!("Use name")),
        );
        let mut page = ArgumentDefinition::new("page", "Int");
        page.directives.push(DirectiveUse::new("deprecated"));
        legacy.arguments.push(page);
        ty.fields.push(legacy);
        ty
    }

    #[test]
    fn applies_manipulators_at_every_level() {
        let registry = DirectiveRegistry::with_builtins();
        let document = SchemaDocument {
            types: vec![user_type()],
        };

        let built = build_schema(&document, &registry).unwrap();
        let user = built.find_type("User").unwrap();
        assert_eq!(user.interfaces, vec!["Node"]);
        assert_eq!(user.fields[0].name, "id");

        let legacy = user.find_field("legacyName").unwrap();
        assert_eq!(legacy.deprecation_reason.as_deref(), Some("Use name"));
        assert_eq!(
            legacy.arguments[0].deprecation_reason.as_deref(),
            Some(DEFAULT_DEPRECATION_REASON)
        );

        // The input document is left untouched.
        assert!(document.types[0].interfaces.is_empty());
    }

    #[test]
    fn fails_fast_on_resolver_conflict() {
        let registry = DirectiveRegistry::with_builtins();
        let mut ty = TypeDefinition::new("Query");
        let mut field = FieldDefinition::new("greeting", "String");
        field.directives = vec![
            DirectiveUse::new("constant").with_argument("value", json!("hi")),
            DirectiveUse::new("rename").with_argument("attribute", json!("greeting")),
        ];
        ty.fields.push(field);

        let err = build_schema(&SchemaDocument { types: vec![ty] }, &registry).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Registry(RegistryError::ConflictingFieldResolver { ref field, .. })
                if field == "Query.greeting"
        ));
    }

    #[test]
    fn fails_on_unknown_directive() {
        let registry = DirectiveRegistry::with_builtins();
        let mut ty = TypeDefinition::new("Query");
        ty.directives.push(DirectiveUse::new("cache"));

        let err = build_schema(&SchemaDocument { types: vec![ty] }, &registry).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Registry(RegistryError::NotFound { ref name }) if name == "cache"
        ));
    }
}
