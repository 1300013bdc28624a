use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Example, RefOr, Schema, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Parameter Object.
///
/// `name` and `in` are optional here even though OpenAPI requires them;
/// Swagger 2.0 body parameters and half-written documents still load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    pub name: Option<String>,
    /// The `in` field: `query`, `header`, `path`, `cookie` (or `body`/`formData`).
    pub location: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub example: Option<Value>,
    pub examples: IndexMap<String, RefOr<Example>>,
    pub extra: Map<String, Value>,
}

impl Parameter {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

impl SpecObject for Parameter {
    const KIND: &'static str = "Parameter";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            name: fields.string("name"),
            location: fields.string("in"),
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
            .string("name", self.name.as_ref())
            .string("in", self.location.as_ref())
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
