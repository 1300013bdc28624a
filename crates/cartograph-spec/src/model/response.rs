use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Header, Link, MediaType, RefOr, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Response Object.
///
/// Swagger 2.0 keys (`schema`, and `examples` keyed by mime type) are not
/// modelled and stay in [`Response::extra`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub description: Option<String>,
    pub content: IndexMap<String, MediaType>,
    pub headers: IndexMap<String, RefOr<Header>>,
    pub links: IndexMap<String, RefOr<Link>>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Response {
    const KIND: &'static str = "Response";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            description: fields.string("description"),
            content: fields.map_of("content")?,
            headers: fields.ref_or_map("headers")?,
            links: fields.ref_or_map("links")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("description", self.description.as_ref())
            .map_of("content", &self.content)
            .ref_or_map("headers", &self.headers)
            .ref_or_map("links", &self.links)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
