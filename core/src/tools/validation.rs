use serde_json::Value;

use crate::tools::context::ToolCallError;
use crate::tools::spec::{JsonSchema, ToolSpec};

/// Bind caller arguments against a tool's declared object schema.
///
/// A missing required key, an unknown key, or a shallow type mismatch all
/// reject the invocation before the handler runs.
pub fn bind_arguments(spec: &ToolSpec, arguments: &Value) -> Result<(), ToolCallError> {
  let JsonSchema::Object {
    properties,
    required,
  } = &spec.input_schema
  else {
    return Ok(());
  };

  let Some(map) = arguments.as_object() else {
    return Err(invalid(spec, "arguments must be an object"));
  };

  let required = required.as_deref().unwrap_or_default();
  for key in required {
    if !map.contains_key(key) {
      return Err(invalid(spec, &format!("missing required argument `{key}`")));
    }
  }

  for (key, value) in map {
    let Some(schema) = properties.get(key) else {
      return Err(invalid(spec, &format!("unknown argument `{key}`")));
    };
    // null stands for an omitted optional argument
    if value.is_null() && !required.contains(key) {
      continue;
    }
    if !type_matches(schema, value) {
      return Err(invalid(
        spec,
        &format!("argument `{key}` has the wrong type"),
      ));
    }
  }

  Ok(())
}

fn type_matches(schema: &JsonSchema, value: &Value) -> bool {
  match schema {
    JsonSchema::String { .. } => value.is_string(),
    JsonSchema::Number { .. } => value.is_number(),
    JsonSchema::Boolean { .. } => value.is_boolean(),
    JsonSchema::Array { .. } => value.is_array(),
    JsonSchema::Object { .. } => value.is_object(),
  }
}

fn invalid(spec: &ToolSpec, detail: &str) -> ToolCallError {
  ToolCallError::InvalidArguments(format!("invalid arguments for {}: {detail}", spec.name))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::tools::spec;

  #[test]
  fn valid_arguments_bind() {
    let result = bind_arguments(&spec::add_tool(), &json!({ "a": 1.5, "b": 2 }));
    assert!(result.is_ok());
  }

  #[test]
  fn missing_required_argument_is_rejected() {
    let result = bind_arguments(&spec::add_tool(), &json!({ "a": 1.5 }));
    assert!(matches!(result, Err(ToolCallError::InvalidArguments(_))));
  }

  #[test]
  fn unknown_argument_is_rejected() {
    let result = bind_arguments(&spec::add_tool(), &json!({ "a": 1, "b": 2, "c": 3 }));
    assert!(matches!(result, Err(ToolCallError::InvalidArguments(_))));
  }

  #[test]
  fn wrong_type_is_rejected() {
    let result = bind_arguments(&spec::analyze_sentiment_tool(), &json!({ "text": 42 }));
    assert!(matches!(result, Err(ToolCallError::InvalidArguments(_))));
  }

  #[test]
  fn optional_argument_may_be_omitted_or_null() {
    let spec = spec::fetch_posts_tool();
    assert!(bind_arguments(&spec, &json!({})).is_ok());
    assert!(bind_arguments(&spec, &json!({ "limit": null })).is_ok());
  }

  #[test]
  fn non_object_arguments_are_rejected() {
    let result = bind_arguments(&spec::add_tool(), &json!([1, 2]));
    assert!(matches!(result, Err(ToolCallError::InvalidArguments(_))));
  }
}
