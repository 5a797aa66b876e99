//! Binding of handler instances to schema nodes.

use crate::directive::{Binding, BoundDirective};
use crate::types::{DirectiveUse, SchemaNode};

/// Bind `handler` to one use of a directive on `node`.
///
/// Handlers that support hydration yield a new instance carrying the
/// binding; stateless handlers are returned unchanged.
pub fn bind<N: SchemaNode + ?Sized>(
    handler: BoundDirective,
    node: &N,
    usage: &DirectiveUse,
) -> BoundDirective {
    let binding = Binding::new(node, usage);
    match handler.hydrate(&binding) {
        Some(bound) => bound,
        None => handler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directive;
    use crate::directives::RenameDirective;
    use crate::types::{FieldDefinition, NodeKind};
    use serde_json::json;

    #[derive(Default)]
    struct Stateless {
        _marker: u8,
    }

    impl Directive for Stateless {
        fn name(&self) -> &str {
            "stateless"
        }
    }

    #[test]
    fn hydrating_handler_gets_new_bound_instance() {
        let field = FieldDefinition::new("fullName", "String");
        let usage = DirectiveUse::new("rename").with_argument("attribute", json!("full_name"));
        let handler: BoundDirective = Box::new(RenameDirective::default());
        let before = handler.as_ref() as *const dyn Directive as *const ();

        let bound = bind(handler, &field, &usage);
        let after = bound.as_ref() as *const dyn Directive as *const ();
        assert_ne!(before, after);

        let rename = bound.downcast_ref::<RenameDirective>().unwrap();
        let binding = rename.binding().unwrap();
        assert_eq!(binding.kind(), NodeKind::Field);
        assert_eq!(binding.coordinate(), "fullName");
        assert_eq!(binding.argument("attribute"), Some(&json!("full_name")));
    }

    #[test]
    fn stateless_handler_is_returned_unchanged() {
        let field = FieldDefinition::new("id", "ID!");
        let usage = DirectiveUse::new("stateless");
        let handler: BoundDirective = Box::new(Stateless::default());
        let before = handler.as_ref() as *const dyn Directive as *const ();

        let bound = bind(handler, &field, &usage);
        let after = bound.as_ref() as *const dyn Directive as *const ();
        assert_eq!(before, after);
    }
}
