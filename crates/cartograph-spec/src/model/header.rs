use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Example, RefOr, Schema, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Header Object. Same shape as a Parameter without `name` and `in`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub description: Option<String>,
    pub required: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub example: Option<Value>,
    pub examples: IndexMap<String, RefOr<Example>>,
    pub extra: Map<String, Value>,
}

impl Header {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl SpecObject for Header {
    const KIND: &'static str = "Header";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            description: fields.string("description"),
            required: fields.bool("required"),
            schema: fields.ref_or("schema")?,
            style: fields.string("style"),
            explode: fields.bool("explode"),
            example: fields.value("example"),
            examples: fields.ref_or_map("examples")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("description", self.description.as_ref())
            .bool("required", self.required)
            .ref_or("schema", self.schema.as_ref())
            .string("style", self.style.as_ref())
            .bool("explode", self.explode)
            .value("example", self.example.as_ref())
            .ref_or_map("examples", &self.examples)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
