use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{RefOr, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// The `type` keyword: a single name, or a list of names (OAS 3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Single(String),
    Union(Vec<String>),
}

impl SchemaType {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(SchemaType::Single(name.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(SchemaType::Union),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            SchemaType::Single(name) => Value::String(name.clone()),
            SchemaType::Union(names) => {
                Value::Array(names.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Whether `name` is the type, or one of the union members.
    pub fn includes(&self, name: &str) -> bool {
        match self {
            SchemaType::Single(single) => single == name,
            SchemaType::Union(names) => names.iter().any(|n| n == name),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Single(name) => f.write_str(name),
            SchemaType::Union(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// A JSON Schema / OpenAPI Schema Object.
///
/// Only the structural keywords are modelled. Everything else (`format`,
/// `enum`, `nullable`, `default`, vendor extensions) is kept in
/// [`Schema::extra`]. Subschemas are [`RefOr`] slots, so a recursive schema is
/// simply a tree that ends in a `$ref`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub title: Option<String>,
    pub schema_type: Option<SchemaType>,
    pub description: Option<String>,
    pub properties: IndexMap<String, RefOr<Schema>>,
    pub required: Option<Vec<String>>,
    pub items: Option<Box<RefOr<Schema>>>,
    pub all_of: Option<Vec<RefOr<Schema>>>,
    pub one_of: Option<Vec<RefOr<Schema>>>,
    pub any_of: Option<Vec<RefOr<Schema>>>,
    pub not: Option<Box<RefOr<Schema>>>,
    pub extra: Map<String, Value>,
}

impl Schema {
    /// Names listed in `required`, empty when the keyword is absent.
    pub fn required_properties(&self) -> &[String] {
        self.required.as_deref().unwrap_or_default()
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.schema_type.as_ref().is_some_and(|t| t.includes(name))
    }
}

impl SpecObject for Schema {
    const KIND: &'static str = "Schema";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        let title = fields.string("title");
        let schema_type = fields.custom("type", "a string or list of strings", SchemaType::from_value);
        let description = fields.string("description");
        let properties = fields.ref_or_map("properties")?;
        let required = fields.strings("required");
        let items = fields.ref_or("items")?.map(Box::new);
        let all_of = fields.list_with("allOf", RefOr::from_raw)?;
        let one_of = fields.list_with("oneOf", RefOr::from_raw)?;
        let any_of = fields.list_with("anyOf", RefOr::from_raw)?;
        let not = fields.ref_or("not")?.map(Box::new);

        Ok(Self {
            title,
            schema_type,
            description,
            properties,
            required,
            items,
            all_of,
            one_of,
            any_of,
            not,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("title", self.title.as_ref())
            .value("type", self.schema_type.as_ref().map(SchemaType::to_value).as_ref())
            .string("description", self.description.as_ref())
            .ref_or_map("properties", &self.properties)
            .strings("required", self.required.as_deref())
            .ref_or("items", self.items.as_deref())
            .list_with("allOf", self.all_of.as_deref(), RefOr::to_raw)
            .list_with("oneOf", self.one_of.as_deref(), RefOr::to_raw)
            .list_with("anyOf", self.any_of.as_deref(), RefOr::to_raw)
            .ref_or("not", self.not.as_deref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(format!("'{}'", title));
        }
        if let Some(schema_type) = &self.schema_type {
            parts.push(format!("type={}", schema_type));
        }
        if !self.properties.is_empty() {
            parts.push(format!("{} properties", self.properties.len()));
        }
        if !self.required_properties().is_empty() {
            parts.push(format!("required=[{}]", self.required_properties().join(", ")));
        }
        if let Some(items) = &self.items {
            let item_type = match &**items {
                RefOr::Ref(reference) => reference.ref_location.clone(),
                RefOr::Item(schema) => schema
                    .schema_type
                    .as_ref()
                    .map_or_else(|| "object".to_string(), ToString::to_string),
            };
            parts.push(format!("items={}", item_type));
        }

        if parts.is_empty() {
            write!(f, "<Schema: empty schema>")
        } else {
            write!(f, "<Schema: {}>", parts.join(", "))
        }
    }
}
