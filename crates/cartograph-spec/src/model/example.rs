use serde_json::{Map, Value};

use super::SpecObject;
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// An Example Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub external_value: Option<String>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Example {
    const KIND: &'static str = "Example";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            summary: fields.string("summary"),
            description: fields.string("description"),
            value: fields.value("value"),
            external_value: fields.string("externalValue"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("summary", self.summary.as_ref())
            .string("description", self.description.as_ref())
            .value("value", self.value.as_ref())
            .string("externalValue", self.external_value.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
