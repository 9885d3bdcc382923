//! Post-serialization cleanup of empty content schemas.
//!
//! A message without fields serializes as `{}`, which readers render as
//! "any value". Request and response `application/json` schemas that end up
//! empty are rewritten to carry an explicit empty `properties` mapping.
//! Named component schemas stay as they are.

use serde_yaml_ng::{Mapping, Value};

use crate::error::Result;

/// Parse serialized document bytes, rewrite empty content schemas, and
/// re-encode in the same format.
pub(crate) fn normalize_empty_schemas(serialized: &[u8], json: bool) -> Result<Vec<u8>> {
    let mut doc: Value = serde_yaml_ng::from_slice(serialized)?;
    patch_content_schemas(&mut doc);

    if json {
        Ok(serde_json::to_vec(&doc)?)
    } else {
        Ok(serde_yaml_ng::to_string(&doc)?.into_bytes())
    }
}

/// Visit every operation's `requestBody` and response entries under `paths`.
fn patch_content_schemas(doc: &mut Value) {
    let Some(paths) = doc
        .as_mapping_mut()
        .and_then(|m| m.get_mut("paths"))
        .and_then(Value::as_mapping_mut)
    else {
        return;
    };

    for (_, path_item) in paths.iter_mut() {
        let Some(path_map) = path_item.as_mapping_mut() else {
            continue;
        };
        for (_, operation) in path_map.iter_mut() {
            let Some(op_map) = operation.as_mapping_mut() else {
                continue;
            };

            if let Some(request_body) = op_map.get_mut("requestBody") {
                patch_media_schema(request_body);
            }
            let Some(responses) = op_map.get_mut("responses").and_then(Value::as_mapping_mut)
            else {
                continue;
            };
            for (_, response) in responses.iter_mut() {
                patch_media_schema(response);
            }
        }
    }
}

/// `<node>.content.application/json.schema`: insert `properties: {}` when
/// the schema serialized as an empty mapping.
fn patch_media_schema(node: &mut Value) {
    let Some(schema) = node
        .as_mapping_mut()
        .and_then(|m| m.get_mut("content"))
        .and_then(Value::as_mapping_mut)
        .and_then(|m| m.get_mut("application/json"))
        .and_then(Value::as_mapping_mut)
        .and_then(|m| m.get_mut("schema"))
        .and_then(Value::as_mapping_mut)
    else {
        return;
    };

    if schema.is_empty() {
        schema.insert(
            Value::String("properties".to_string()),
            Value::Mapping(Mapping::new()),
        );
    }
}
