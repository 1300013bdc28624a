use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::SpecObject;
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Server Object. `url` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
    pub variables: IndexMap<String, ServerVariable>,
    pub extra: Map<String, Value>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            variables: IndexMap::new(),
            extra: Map::new(),
        }
    }

    /// The URL with every `{variable}` replaced by its default.
    pub fn default_url(&self) -> String {
        self.variables
            .iter()
            .fold(self.url.clone(), |url, (name, variable)| {
                url.replace(&format!("{{{}}}", name), &variable.default)
            })
    }
}

impl SpecObject for Server {
    const KIND: &'static str = "Server";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            url: fields.required_string("url")?,
            description: fields.string("description"),
            variables: fields.map_of("variables")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("url", Some(&self.url))
            .string("description", self.description.as_ref())
            .map_of("variables", &self.variables)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Server: url={}", self.url)?;
        if let Some(description) = &self.description {
            write!(f, ", '{}'", description)?;
        }
        if !self.variables.is_empty() {
            write!(f, ", {} variables", self.variables.len())?;
        }
        write!(f, ">")
    }
}

/// A Server Variable Object. `default` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerVariable {
    pub default: String,
    pub allowed: Option<Vec<String>>,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

impl SpecObject for ServerVariable {
    const KIND: &'static str = "ServerVariable";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            allowed: fields.strings("enum"),
            default: fields.required_string("default")?,
            description: fields.string("description"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .strings("enum", self.allowed.as_deref())
            .string("default", Some(&self.default))
            .string("description", self.description.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
