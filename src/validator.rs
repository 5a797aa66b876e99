//! Structural validation of schema documents.

use serde_json::{json, Value};

use crate::error::{SchemaError, ValidateError};

/// JSON Schema every schema document must satisfy.
pub fn document_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["types"],
        "properties": {
            "types": {
                "type": "array",
                "items": { "$ref": "#/$defs/type" }
            }
        },
        "$defs": {
            "directive": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "arguments": { "type": "object" }
                }
            },
            "directives": {
                "type": "array",
                "items": { "$ref": "#/$defs/directive" }
            },
            "argument": {
                "type": "object",
                "required": ["name", "type"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "type": { "type": "string", "minLength": 1 },
                    "description": { "type": "string" },
                    "deprecationReason": { "type": "string" },
                    "directives": { "$ref": "#/$defs/directives" }
                }
            },
            "field": {
                "type": "object",
                "required": ["name", "type"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "type": { "type": "string", "minLength": 1 },
                    "description": { "type": "string" },
                    "deprecationReason": { "type": "string" },
                    "arguments": {
                        "type": "array",
                        "items": { "$ref": "#/$defs/argument" }
                    },
                    "directives": { "$ref": "#/$defs/directives" }
                }
            },
            "type": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "kind": {
                        "enum": ["object", "interface", "union", "input", "enum", "scalar"]
                    },
                    "description": { "type": "string" },
                    "interfaces": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "fields": {
                        "type": "array",
                        "items": { "$ref": "#/$defs/field" }
                    },
                    "directives": { "$ref": "#/$defs/directives" }
                }
            }
        }
    })
}

/// Validate raw JSON against the document schema.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation found.
pub fn validate_document(document: &Value) -> Result<(), ValidateError> {
    let validator =
        jsonschema::validator_for(&document_schema()).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(document)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
