//! Built-in directive handlers.
//!
//! | Directive | Arguments | Roles |
//! |-----------|-----------|-------|
//! | `@rename` | `attribute` | field resolver |
//! | `@constant` | `value` | field resolver |
//! | `@deprecated` | `reason` (optional) | field and argument manipulator |
//! | `@node` | | node manipulator |
//! | `@discriminator` | `field` | node resolver |
//! | `@upper`, `@lower` | | field middleware |
//! | `@trim` | | argument middleware |
//! | `@trace` | | node and field middleware |

mod case;
mod constant;
mod deprecated;
mod discriminator;
mod node;
mod rename;
mod trace;
mod trim;

pub use case::{LowerDirective, UpperDirective};
pub use constant::ConstantDirective;
pub use deprecated::{DeprecatedDirective, DEFAULT_DEPRECATION_REASON};
pub use discriminator::DiscriminatorDirective;
pub use node::{NodeDirective, NODE_INTERFACE};
pub use rename::RenameDirective;
pub use trace::TraceDirective;
pub use trim::TrimDirective;

use crate::catalog::{TypeTable, NAMESPACE_SEPARATOR};
use crate::directive::Binding;
use crate::error::DirectiveError;
use crate::registry::DirectiveRegistry;

/// Namespace of built-in handler type identifiers.
pub const BUILTIN_NAMESPACE: &str = "builtin";

fn builtin_id(name: &str) -> String {
    format!("{}{}{}", BUILTIN_NAMESPACE, NAMESPACE_SEPARATOR, name)
}

/// Type table of every built-in handler, keyed `builtin::<name>`.
pub fn builtin_types() -> TypeTable {
    let mut types = TypeTable::new();
    types
        .insert::<RenameDirective>(builtin_id("rename"))
        .insert::<ConstantDirective>(builtin_id("constant"))
        .insert::<DeprecatedDirective>(builtin_id("deprecated"))
        .insert::<NodeDirective>(builtin_id("node"))
        .insert::<DiscriminatorDirective>(builtin_id("discriminator"))
        .insert::<UpperDirective>(builtin_id("upper"))
        .insert::<LowerDirective>(builtin_id("lower"))
        .insert::<TrimDirective>(builtin_id("trim"))
        .insert::<TraceDirective>(builtin_id("trace"));
    types
}

/// Register every built-in handler.
pub fn register_builtins(registry: &mut DirectiveRegistry) {
    let types = builtin_types();
    let ids: Vec<String> = types.type_ids().into_iter().map(String::from).collect();
    registry.load_from(&ids, &types);
}

/// The binding of a hydrated handler, or `Unbound` for a representative.
fn bound<'a>(binding: &'a Option<Binding>, directive: &str) -> Result<&'a Binding, DirectiveError> {
    binding.as_ref().ok_or_else(|| DirectiveError::Unbound {
        directive: directive.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_ids() {
        let types = builtin_types();
        assert_eq!(types.len(), 9);
        assert!(types.contains("builtin::rename"));
        assert!(types.contains("builtin::trace"));
    }

    #[test]
    fn register_builtins_registers_by_directive_name() {
        let mut registry = DirectiveRegistry::new();
        register_builtins(&mut registry);
        assert_eq!(
            registry.catalog().names(),
            vec![
                "constant",
                "deprecated",
                "discriminator",
                "lower",
                "node",
                "rename",
                "trace",
                "trim",
                "upper"
            ]
        );
    }
}
