use super::bound;
use crate::directive::{ArgManipulator, Binding, BoundDirective, Directive, FieldManipulator};
use crate::error::DirectiveError;
use crate::types::{ArgumentDefinition, FieldDefinition};

pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Marks a field or argument as deprecated.
#[derive(Debug, Default, Clone)]
pub struct DeprecatedDirective {
    binding: Option<Binding>,
}

impl DeprecatedDirective {
    fn reason(&self) -> Result<String, DirectiveError> {
        let reason = bound(&self.binding, self.name())?.string_argument("reason")?;
        Ok(reason.unwrap_or(DEFAULT_DEPRECATION_REASON).to_string())
    }
}

impl Directive for DeprecatedDirective {
    fn name(&self) -> &str {
        "deprecated"
    }

    fn hydrate(&self, binding: &Binding) -> Option<BoundDirective> {
        Some(Box::new(Self {
            binding: Some(binding.clone()),
        }))
    }

    fn as_field_manipulator(&self) -> Option<&dyn FieldManipulator> {
        Some(self)
    }

    fn as_arg_manipulator(&self) -> Option<&dyn ArgManipulator> {
        Some(self)
    }
}

impl FieldManipulator for DeprecatedDirective {
    fn manipulate_field(&self, field: &mut FieldDefinition) -> Result<(), DirectiveError> {
        field.deprecation_reason = Some(self.reason()?);
        Ok(())
    }
}

impl ArgManipulator for DeprecatedDirective {
    fn manipulate_argument(
        &self,
        argument: &mut ArgumentDefinition,
    ) -> Result<(), DirectiveError> {
        argument.deprecation_reason = Some(self.reason()?);
        Ok(())
    }
}
