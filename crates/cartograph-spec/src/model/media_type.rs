use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Example, Header, RefOr, Schema, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Media Type Object, the value side of a `content` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaType {
    pub schema: Option<RefOr<Schema>>,
    pub example: Option<Value>,
    pub examples: IndexMap<String, RefOr<Example>>,
    pub encoding: IndexMap<String, Encoding>,
    pub extra: Map<String, Value>,
}

impl SpecObject for MediaType {
    const KIND: &'static str = "MediaType";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            schema: fields.ref_or("schema")?,
            example: fields.value("example"),
            examples: fields.ref_or_map("examples")?,
            encoding: fields.map_of("encoding")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .ref_or("schema", self.schema.as_ref())
            .value("example", self.example.as_ref())
            .ref_or_map("examples", &self.examples)
            .map_of("encoding", &self.encoding)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// An Encoding Object, applied to a single property of a multipart or
/// form-encoded body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    pub content_type: Option<String>,
    pub headers: IndexMap<String, RefOr<Header>>,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub allow_reserved: Option<bool>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Encoding {
    const KIND: &'static str = "Encoding";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            content_type: fields.string("contentType"),
            headers: fields.ref_or_map("headers")?,
            style: fields.string("style"),
            explode: fields.bool("explode"),
            allow_reserved: fields.bool("allowReserved"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("contentType", self.content_type.as_ref())
            .ref_or_map("headers", &self.headers)
            .string("style", self.style.as_ref())
            .bool("explode", self.explode)
            .bool("allowReserved", self.allow_reserved)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn schema_slot_is_typed() {
        let raw = json!({
            "schema": {"$ref": "#/components/schemas/Pet"},
            "example": {"name": "Rex"}
        });
        let media = MediaType::from_raw(&raw).unwrap();
        assert!(media.schema.as_ref().is_some_and(RefOr::is_ref));
        assert_eq!(media.example, Some(json!({"name": "Rex"})));
        assert_eq!(media.to_raw(), raw);
    }

    #[test]
    fn multipart_encoding_round_trip() {
        let raw = json!({
            "schema": {
                "type": "object",
                "properties": {"avatar": {"type": "string", "format": "binary"}}
            },
            "encoding": {
                "avatar": {
                    "contentType": "image/png",
                    "headers": {"X-Rate-Limit": {"$ref": "#/components/headers/RateLimit"}},
                    "explode": false,
                    "allowReserved": true
                }
            }
        });
        let media = MediaType::from_raw(&raw).unwrap();
        let encoding = &media.encoding["avatar"];
        assert_eq!(encoding.content_type.as_deref(), Some("image/png"));
        assert!(encoding.headers["X-Rate-Limit"].is_ref());
        assert_eq!(media.to_raw(), raw);
    }
}
