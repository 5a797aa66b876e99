use serde_json::Value;

use crate::directive::{Directive, FieldMiddleware, Next, ResolveInfo};
use crate::error::DirectiveError;

/// Apply `convert` to every string in `value`, descending into arrays.
fn map_strings(value: Value, convert: fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(convert(&s)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| map_strings(item, convert))
                .collect(),
        ),
        other => other,
    }
}

/// Uppercases the resolved value of a field.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpperDirective;

impl Directive for UpperDirective {
    fn name(&self) -> &str {
        "upper"
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddleware> {
        Some(self)
    }
}

impl FieldMiddleware for UpperDirective {
    fn handle_field(
        &self,
        info: &ResolveInfo<'_>,
        next: Next<'_>,
    ) -> Result<Value, DirectiveError> {
        Ok(map_strings(next(info)?, str::to_uppercase))
    }
}

/// Lowercases the resolved value of a field.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowerDirective;

impl Directive for LowerDirective {
    fn name(&self) -> &str {
        "lower"
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddleware> {
        Some(self)
    }
}

impl FieldMiddleware for LowerDirective {
    fn handle_field(
        &self,
        info: &ResolveInfo<'_>,
        next: Next<'_>,
    ) -> Result<Value, DirectiveError> {
        Ok(map_strings(next(info)?, str::to_lowercase))
    }
}
