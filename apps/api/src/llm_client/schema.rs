//! Response schema definitions for schema-constrained (structured output) calls.
//!
//! `ResponseSchema` serializes to the OpenAPI subset accepted by Gemini's
//! `generationConfig.responseSchema`. The same definition validates the JSON
//! that comes back, so a reply is checked against the shape we asked for
//! before any caller deserializes it.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Boolean,
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    /// Declaration order of `properties`; Gemini emits fields in this order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A mismatch between a JSON value and the schema it was expected to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ResponseSchema {
    fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: BTreeMap::new(),
            property_ordering: Vec::new(),
            items: None,
            required: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    /// Not used by the analysis schema yet.
    #[allow(dead_code)]
    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Adds a property. Properties are required unless added with `optional_property`.
    pub fn property(mut self, name: &str, schema: ResponseSchema) -> Self {
        self.required.push(name.to_string());
        self.optional_property(name, schema)
    }

    pub fn optional_property(mut self, name: &str, schema: ResponseSchema) -> Self {
        self.property_ordering.push(name.to_string());
        self.properties.insert(name.to_string(), schema);
        self
    }

    /// Checks `value` against this schema, returning the first violation found.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at("$", value)
    }

    fn validate_at(&self, path: &str, value: &Value) -> Result<(), SchemaViolation> {
        let type_matches = match self.schema_type {
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
            SchemaType::String => value.is_string(),
            SchemaType::Integer => value.is_i64() || value.is_u64(),
            SchemaType::Boolean => value.is_boolean(),
        };
        if !type_matches {
            return Err(SchemaViolation {
                path: path.to_string(),
                message: format!("expected {}, found {}", self.schema_type, json_kind(value)),
            });
        }

        if let Some(fields) = value.as_object() {
            for name in &self.required {
                if !fields.contains_key(name) {
                    return Err(SchemaViolation {
                        path: path.to_string(),
                        message: format!("missing required field `{name}`"),
                    });
                }
            }
            for name in &self.property_ordering {
                if let (Some(schema), Some(field)) = (self.properties.get(name), fields.get(name)) {
                    schema.validate_at(&format!("{path}.{name}"), field)?;
                }
            }
        }

        if let (Some(items), Some(elements)) = (&self.items, value.as_array()) {
            for (index, element) in elements.iter().enumerate() {
                items.validate_at(&format!("{path}[{index}]"), element)?;
            }
        }

        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> ResponseSchema {
        ResponseSchema::object()
            .property("name", ResponseSchema::string().describe("Full name"))
            .property("age", ResponseSchema::integer())
            .property("tags", ResponseSchema::array(ResponseSchema::string()))
            .optional_property("active", ResponseSchema::boolean())
    }

    #[test]
    fn test_serializes_to_gemini_schema_shape() {
        let value = serde_json::to_value(person_schema()).unwrap();
        assert_eq!(value["type"], "OBJECT");
        assert_eq!(value["properties"]["name"]["type"], "STRING");
        assert_eq!(value["properties"]["name"]["description"], "Full name");
        assert_eq!(value["properties"]["tags"]["items"]["type"], "STRING");
        assert_eq!(value["required"], json!(["name", "age", "tags"]));
        assert_eq!(
            value["propertyOrdering"],
            json!(["name", "age", "tags", "active"])
        );
        // Leaf schemas carry no empty collections
        assert!(value["properties"]["age"].get("required").is_none());
        assert!(value["properties"]["age"].get("items").is_none());
    }

    #[test]
    fn test_accepts_conforming_value() {
        let value = json!({"name": "Ada", "age": 36, "tags": ["math"], "active": true});
        assert!(person_schema().validate(&value).is_ok());

        let without_optional = json!({"name": "Ada", "age": 36, "tags": []});
        assert!(person_schema().validate(&without_optional).is_ok());
    }

    #[test]
    fn test_reports_missing_required_field() {
        let value = json!({"name": "Ada", "tags": []});
        let violation = person_schema().validate(&value).unwrap_err();
        assert_eq!(violation.path, "$");
        assert!(violation.message.contains("`age`"));
    }

    #[test]
    fn test_reports_nested_type_mismatch_with_path() {
        let value = json!({"name": "Ada", "age": 36, "tags": ["math", 7]});
        let violation = person_schema().validate(&value).unwrap_err();
        assert_eq!(violation.path, "$.tags[1]");
        assert_eq!(violation.message, "expected string, found integer");
    }

    #[test]
    fn test_fractional_number_is_not_an_integer() {
        let value = json!({"name": "Ada", "age": 36.5, "tags": []});
        let violation = person_schema().validate(&value).unwrap_err();
        assert_eq!(violation.to_string(), "$.age: expected integer, found number");
    }

    #[test]
    fn test_top_level_must_be_object() {
        let violation = person_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(violation.message, "expected object, found array");
    }
}
