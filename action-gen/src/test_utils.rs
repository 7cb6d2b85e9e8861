//! Shared test fixtures for building OpenAPI documents.

use serde_json::{Value, json};

use crate::schema::{ComponentSchema, OpenApiSchema};

/// Decodes a single component schema.
pub fn component(value: Value) -> ComponentSchema {
    serde_json::from_value(value).expect("component fixture should decode")
}

/// Builds a schema with the given `paths` object and no components.
pub fn schema_from(paths: Value) -> OpenApiSchema {
    schema_with(paths, json!({}))
}

/// Builds a schema with the given `paths` and `components.schemas` objects.
pub fn schema_with(paths: Value, schemas: Value) -> OpenApiSchema {
    serde_json::from_value(json!({
        "info": { "version": "4.1.0 (4.1)" },
        "paths": paths,
        "components": { "schemas": schemas }
    }))
    .expect("schema fixture should decode")
}

/// A path item holding a collection GET with one query parameter.
pub fn list_get(operation_id: &str) -> Value {
    json!({
        "get": {
            "operationId": operation_id,
            "description": "List objects",
            "parameters": [
                { "name": "limit", "in": "query", "schema": { "type": "integer" } }
            ]
        }
    })
}
