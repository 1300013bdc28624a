use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Callback, Parameter, RefOr, RequestBody, Response, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// An Operation Object, together with where it lives.
///
/// `method` (uppercase) and `path` are not part of the object itself; they
/// come from the enclosing Path Item. Webhook operations use
/// `webhook:<name>` as their path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub method: String,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub parameters: Vec<RefOr<Parameter>>,
    pub request_body: Option<RefOr<RequestBody>>,
    pub responses: IndexMap<String, RefOr<Response>>,
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    pub deprecated: Option<bool>,
    pub extra: Map<String, Value>,
}

impl Operation {
    /// Parse the operation found under `method` of the path item at `path`.
    pub fn from_raw_at(method: &str, path: &str, raw: &Value) -> Result<Self, ModelError> {
        let mut operation = Self::from_raw(raw)?;
        operation.method = method.to_uppercase();
        operation.path = path.to_string();
        Ok(operation)
    }

    pub fn tag_names(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }
}

impl SpecObject for Operation {
    const KIND: &'static str = "Operation";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            method: String::new(),
            path: String::new(),
            operation_id: fields.string("operationId"),
            summary: fields.string("summary"),
            description: fields.string("description"),
            tags: fields.strings("tags"),
            parameters: fields.ref_or_list("parameters")?,
            request_body: fields.ref_or("requestBody")?,
            responses: fields.ref_or_map("responses")?,
            callbacks: fields.ref_or_map("callbacks")?,
            deprecated: fields.bool("deprecated"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("operationId", self.operation_id.as_ref())
            .string("summary", self.summary.as_ref())
            .string("description", self.description.as_ref())
            .strings("tags", self.tags.as_deref())
            .ref_or_list("parameters", &self.parameters)
            .ref_or("requestBody", self.request_body.as_ref())
            .ref_or_map("responses", &self.responses)
            .ref_or_map("callbacks", &self.callbacks)
            .bool("deprecated", self.deprecated)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Operation: {} {}", self.method, self.path)?;
        if let Some(id) = &self.operation_id {
            write!(f, ", id={}", id)?;
        }
        if let Some(summary) = &self.summary {
            write!(f, ", '{}'", summary)?;
        }
        if !self.tag_names().is_empty() {
            write!(f, ", tags=[{}]", self.tag_names().join(", "))?;
        }
        write!(f, ">")
    }
}
