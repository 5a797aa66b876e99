use serde_json::Value;

use crate::directive::{ArgMiddleware, Directive};
use crate::error::DirectiveError;

/// Strips surrounding whitespace from string argument values.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrimDirective;

impl Directive for TrimDirective {
    fn name(&self) -> &str {
        "trim"
    }

    fn as_arg_middleware(&self) -> Option<&dyn ArgMiddleware> {
        Some(self)
    }
}

impl ArgMiddleware for TrimDirective {
    fn handle_argument(&self, value: Value) -> Result<Value, DirectiveError> {
        Ok(trim_value(value))
    }
}

fn trim_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(trim_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, trim_value(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_nested_strings() {
        let value = TrimDirective
            .handle_argument(json!({ "q": "  rust ", "tags": [" a", "b "], "n": 1 }))
            .unwrap();
        assert_eq!(value, json!({ "q": "rust", "tags": ["a", "b"], "n": 1 }));
    }
}
