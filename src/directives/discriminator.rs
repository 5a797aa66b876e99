use serde_json::Value;

use super::bound;
use crate::directive::{Binding, BoundDirective, Directive, NodeResolver};
use crate::error::DirectiveError;
use crate::types::json_type_name;

/// Picks the concrete type of a union or interface value from one of its properties.
#[derive(Debug, Default, Clone)]
pub struct DiscriminatorDirective {
    binding: Option<Binding>,
}

impl Directive for DiscriminatorDirective {
    fn name(&self) -> &str {
        "discriminator"
    }

    fn required_arguments(&self) -> &[&'static str] {
        &["field"]
    }

    fn hydrate(&self, binding: &Binding) -> Option<BoundDirective> {
        Some(Box::new(Self {
            binding: Some(binding.clone()),
        }))
    }

    fn as_node_resolver(&self) -> Option<&dyn NodeResolver> {
        Some(self)
    }
}

impl NodeResolver for DiscriminatorDirective {
    fn resolve_node(&self, value: &Value) -> Result<String, DirectiveError> {
        let field = bound(&self.binding, self.name())?.required_string_argument("field")?;
        match value.get(field) {
            Some(Value::String(type_name)) => Ok(type_name.clone()),
            Some(other) => Err(DirectiveError::Failed {
                directive: self.name().to_string(),
                message: format!(
                    "property \"{}\" must be a string, got {}",
                    field,
                    json_type_name(other)
                ),
            }),
            None => Err(DirectiveError::Failed {
                directive: self.name().to_string(),
                message: format!("value has no \"{}\" property", field),
            }),
        }
    }
}
