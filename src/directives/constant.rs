use serde_json::Value;

use super::bound;
use crate::directive::{Binding, BoundDirective, Directive, FieldResolver, ResolveInfo};
use crate::error::DirectiveError;

/// Resolves a field to a fixed value.
#[derive(Debug, Default, Clone)]
pub struct ConstantDirective {
    binding: Option<Binding>,
}

impl ConstantDirective {
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

impl Directive for ConstantDirective {
    fn name(&self) -> &str {
        "constant"
    }

    fn required_arguments(&self) -> &[&'static str] {
        &["value"]
    }

    fn hydrate(&self, binding: &Binding) -> Option<BoundDirective> {
        Some(Box::new(Self {
            binding: Some(binding.clone()),
        }))
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolver> {
        Some(self)
    }
}

impl FieldResolver for ConstantDirective {
    fn resolve_field(&self, _info: &ResolveInfo<'_>) -> Result<Value, DirectiveError> {
        bound(&self.binding, self.name())?
            .required_argument("value")
            .cloned()
    }
}
