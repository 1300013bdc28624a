use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Operation, Parameter, RefOr, SpecObject};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// The HTTP methods a Path Item can hold, lowercase as they appear as keys.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A Path Item Object.
///
/// `operations` is keyed by lowercase method and keeps document order.
/// Path-level `parameters` stay on the path item; use
/// [`PathItem::merged_parameters`] to see what applies to one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operations: IndexMap<String, Operation>,
    pub parameters: Vec<RefOr<Parameter>>,
    pub extra: Map<String, Value>,
}

impl PathItem {
    /// Parse the path item stored under `path`.
    pub fn from_raw_at(path: &str, raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;

        let methods: Vec<&'static str> = raw
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys())
            .filter_map(|key| HTTP_METHODS.iter().copied().find(|method| *method == key.as_str()))
            .collect();

        let mut operations = IndexMap::with_capacity(methods.len());
        for method in methods {
            let operation =
                fields.object_with(method, |value| Operation::from_raw_at(method, path, value))?;
            if let Some(operation) = operation {
                operations.insert(method.to_string(), operation);
            }
        }

        Ok(Self {
            path: path.to_string(),
            summary: fields.string("summary"),
            description: fields.string("description"),
            operations,
            parameters: fields.ref_or_list("parameters")?,
            extra: fields.finish(),
        })
    }

    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations.get(&method.to_lowercase())
    }

    /// Path-level parameters followed by the operation's own.
    ///
    /// Returns `None` when the path item has no such method.
    pub fn merged_parameters(&self, method: &str) -> Option<Vec<&RefOr<Parameter>>> {
        let operation = self.operation(method)?;
        Some(
            self.parameters
                .iter()
                .chain(operation.parameters.iter())
                .collect(),
        )
    }
}

impl SpecObject for PathItem {
    const KIND: &'static str = "PathItem";

    /// Parses with an empty path; prefer [`PathItem::from_raw_at`].
    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        Self::from_raw_at("", raw)
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("summary", self.summary.as_ref())
            .string("description", self.description.as_ref())
            .inline_map(&self.operations, Operation::to_raw)
            .ref_or_list("parameters", &self.parameters)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for PathItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<String> = self.operations.keys().map(|m| m.to_uppercase()).collect();
        write!(f, "<PathItem: {} [{}]>", self.path, methods.join(", "))
    }
}
