use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{MediaType, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Request Body Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    pub description: Option<String>,
    pub content: IndexMap<String, MediaType>,
    pub required: Option<bool>,
    pub extra: Map<String, Value>,
}

impl RequestBody {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl SpecObject for RequestBody {
    const KIND: &'static str = "RequestBody";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            description: fields.string("description"),
            content: fields.map_of("content")?,
            required: fields.bool("required"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("description", self.description.as_ref())
            .map_of("content", &self.content)
            .bool("required", self.required)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_json_body() {
        let raw = json!({
            "description": "Pet to add",
            "required": true,
            "content": {
                "application/json": {"schema": {"$ref": "#/components/schemas/NewPet"}},
                "application/xml": {"schema": {"type": "object"}}
            }
        });
        let body = RequestBody::from_raw(&raw).unwrap();
        assert!(body.is_required());
        let types: Vec<&str> = body.content.keys().map(String::as_str).collect();
        assert_eq!(types, vec!["application/json", "application/xml"]);
        assert_eq!(body.to_raw(), raw);
    }

    #[test]
    fn omitted_required_is_not_invented() {
        let raw = json!({"content": {"text/plain": {}}});
        let body = RequestBody::from_raw(&raw).unwrap();
        assert!(!body.is_required());
        assert_eq!(body.to_raw(), raw);
    }
}
