use serde_json::Value;

use crate::directive::{
    Binding, BoundDirective, Directive, FieldMiddleware, Next, NodeMiddleware, ResolveInfo,
};
use crate::error::DirectiveError;

/// Logs field resolution through `tracing`.
///
/// On a type it wraps every field of that type; on a field only that field.
#[derive(Debug, Default, Clone)]
pub struct TraceDirective {
    binding: Option<Binding>,
}

impl TraceDirective {
    fn traced(&self, info: &ResolveInfo<'_>, next: Next<'_>) -> Result<Value, DirectiveError> {
        let attached_to = self.binding.as_ref().map(Binding::coordinate).unwrap_or("?");
        let span = tracing::info_span!(
            "resolve",
            directive = attached_to,
            type_name = info.type_name,
            field = info.field_name
        );
        let _entered = span.enter();

        let result = next(info);
        match &result {
            Ok(_) => tracing::info!("field resolved"),
            Err(error) => tracing::warn!(%error, "field resolution failed"),
        }
        result
    }
}

impl Directive for TraceDirective {
    fn name(&self) -> &str {
        "trace"
    }

    fn hydrate(&self, binding: &Binding) -> Option<BoundDirective> {
        Some(Box::new(Self {
            binding: Some(binding.clone()),
        }))
    }

    fn as_node_middleware(&self) -> Option<&dyn NodeMiddleware> {
        Some(self)
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddleware> {
        Some(self)
    }
}

impl NodeMiddleware for TraceDirective {
    fn handle_node(
        &self,
        info: &ResolveInfo<'_>,
        next: Next<'_>,
    ) -> Result<Value, DirectiveError> {
        self.traced(info, next)
    }
}

impl FieldMiddleware for TraceDirective {
    fn handle_field(
        &self,
        info: &ResolveInfo<'_>,
        next: Next<'_>,
    ) -> Result<Value, DirectiveError> {
        self.traced(info, next)
    }
}
