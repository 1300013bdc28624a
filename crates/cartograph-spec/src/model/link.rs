use serde_json::{Map, Value};

use super::{Server, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Link Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub operation_ref: Option<String>,
    pub operation_id: Option<String>,
    /// Parameter name to value or runtime expression.
    pub parameters: Map<String, Value>,
    pub request_body: Option<Value>,
    pub description: Option<String>,
    pub server: Option<Server>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Link {
    const KIND: &'static str = "Link";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            operation_ref: fields.string("operationRef"),
            operation_id: fields.string("operationId"),
            parameters: fields
                .custom("parameters", "a mapping", |v| v.as_object().cloned())
                .unwrap_or_default(),
            request_body: fields.value("requestBody"),
            description: fields.string("description"),
            server: fields.object("server")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("operationRef", self.operation_ref.as_ref())
            .string("operationId", self.operation_id.as_ref())
            .raw_map("parameters", &self.parameters)
            .value("requestBody", self.request_body.as_ref())
            .string("description", self.description.as_ref())
            .object("server", self.server.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
