use serde_json::Value;

use super::bound;
use crate::directive::{Binding, BoundDirective, Directive, FieldResolver, ResolveInfo};
use crate::error::DirectiveError;

/// Resolves a field from a differently named property of the parent value.
#[derive(Debug, Default, Clone)]
pub struct RenameDirective {
    binding: Option<Binding>,
}

impl RenameDirective {
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

impl Directive for RenameDirective {
    fn name(&self) -> &str {
        "rename"
    }

    fn required_arguments(&self) -> &[&'static str] {
        &["attribute"]
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

impl FieldResolver for RenameDirective {
    fn resolve_field(&self, info: &ResolveInfo<'_>) -> Result<Value, DirectiveError> {
        let attribute = bound(&self.binding, self.name())?.required_string_argument("attribute")?;
        Ok(info.root.get(attribute).cloned().unwrap_or(Value::Null))
    }
}
