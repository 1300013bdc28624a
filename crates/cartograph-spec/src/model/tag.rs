use std::fmt;

use serde_json::{Map, Value};

use super::SpecObject;
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};
use crate::reference::preview;

/// A Tag Object. `name` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocumentation>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Tag {
    const KIND: &'static str = "Tag";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            name: fields.required_string("name")?,
            description: fields.string("description"),
            external_docs: fields.object("externalDocs")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("name", Some(&self.name))
            .string("description", self.description.as_ref())
            .object("externalDocs", self.external_docs.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Tag: name='{}'", self.name)?;
        if let Some(description) = &self.description {
            write!(f, ", desc='{}'", preview(description, 30))?;
        }
        write!(f, ">")
    }
}

/// An External Documentation Object. `url` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDocumentation {
    pub url: String,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

impl SpecObject for ExternalDocumentation {
    const KIND: &'static str = "ExternalDocumentation";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            url: fields.required_string("url")?,
            description: fields.string("description"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("url", Some(&self.url))
            .string("description", self.description.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
