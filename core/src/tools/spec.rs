use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// JSON schema representation for tool argument contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonSchema {
  String {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Number {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Boolean {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Array {
    items: Box<JsonSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Object {
    properties: BTreeMap<String, JsonSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<Vec<String>>,
  },
}

impl JsonSchema {
  pub fn to_value(&self) -> serde_json::Value {
    serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
  }
}

/// Descriptive metadata for one registered tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
  pub name: String,
  pub description: String,
  pub category: String,
  pub input_schema: JsonSchema,
}

impl ToolSpec {
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    category: impl Into<String>,
    input_schema: JsonSchema,
  ) -> Self {
    Self {
      name: name.into(),
      description: description.into(),
      category: category.into(),
      input_schema,
    }
  }
}

fn obj(properties: BTreeMap<String, JsonSchema>, required: &[&str]) -> JsonSchema {
  JsonSchema::Object {
    properties,
    required: if required.is_empty() {
      None
    } else {
      Some(required.iter().map(|s| s.to_string()).collect())
    },
  }
}

fn str_field(desc: &str) -> JsonSchema {
  JsonSchema::String {
    description: Some(desc.to_string()),
  }
}

fn num_field(desc: &str) -> JsonSchema {
  JsonSchema::Number {
    description: Some(desc.to_string()),
  }
}

fn binary_math_schema() -> JsonSchema {
  let mut props = BTreeMap::new();
  props.insert("a".to_string(), num_field("First operand"));
  props.insert("b".to_string(), num_field("Second operand"));
  obj(props, &["a", "b"])
}

pub fn add_tool() -> ToolSpec {
  ToolSpec::new("add", "Add two numbers", "math", binary_math_schema())
}

pub fn subtract_tool() -> ToolSpec {
  ToolSpec::new(
    "subtract",
    "Subtract the second number from the first",
    "math",
    binary_math_schema(),
  )
}

pub fn multiply_tool() -> ToolSpec {
  ToolSpec::new("multiply", "Multiply two numbers", "math", binary_math_schema())
}

pub fn divide_tool() -> ToolSpec {
  ToolSpec::new(
    "divide",
    "Divide the first number by the second",
    "math",
    binary_math_schema(),
  )
}

pub fn analyze_sentiment_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("text".to_string(), str_field("Text to classify"));
  ToolSpec::new(
    "analyze_sentiment",
    "Classify the sentiment of a text via the caller's model",
    "analysis",
    obj(props, &["text"]),
  )
}

pub fn fetch_posts_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("limit".to_string(), num_field("Maximum posts to return"));
  ToolSpec::new(
    "fetch_posts",
    "Fetch mock feed posts annotated with sentiment",
    "data",
    obj(props, &[]),
  )
}
