use std::fmt;

use serde_json::{Map, Value};

use super::SpecObject;
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};
use crate::reference::preview;

/// The Info Object. `title` and `version` are required.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Info {
    const KIND: &'static str = "Info";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            title: fields.required_string("title")?,
            version: fields.required_string("version")?,
            summary: fields.string("summary"),
            description: fields.string("description"),
            terms_of_service: fields.string("termsOfService"),
            contact: fields.object("contact")?,
            license: fields.object("license")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("title", Some(&self.title))
            .string("version", Some(&self.version))
            .string("summary", self.summary.as_ref())
            .string("description", self.description.as_ref())
            .string("termsOfService", self.terms_of_service.as_ref())
            .object("contact", self.contact.as_ref())
            .object("license", self.license.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Info: '{}' v{}", self.title, self.version)?;
        if let Some(description) = &self.description {
            write!(f, ", desc='{}'", preview(description, 50))?;
        }
        write!(f, ">")
    }
}

/// A Contact Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub extra: Map<String, Value>,
}

impl SpecObject for Contact {
    const KIND: &'static str = "Contact";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            name: fields.string("name"),
            url: fields.string("url"),
            email: fields.string("email"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("name", self.name.as_ref())
            .string("url", self.url.as_ref())
            .string("email", self.email.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A License Object. `name` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct License {
    pub name: String,
    pub url: Option<String>,
    /// SPDX expression (OAS 3.1).
    pub identifier: Option<String>,
    pub extra: Map<String, Value>,
}

impl SpecObject for License {
    const KIND: &'static str = "License";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            name: fields.required_string("name")?,
            url: fields.string("url"),
            identifier: fields.string("identifier"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("name", Some(&self.name))
            .string("url", self.url.as_ref())
            .string("identifier", self.identifier.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
