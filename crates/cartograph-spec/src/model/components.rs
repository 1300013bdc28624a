use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{
    Callback, Example, Header, Link, Parameter, RefOr, RequestBody, Response, Schema,
    SecurityScheme, SpecObject,
};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// The Components Object: named, reusable definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    pub schemas: IndexMap<String, RefOr<Schema>>,
    pub responses: IndexMap<String, RefOr<Response>>,
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    pub examples: IndexMap<String, RefOr<Example>>,
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    pub headers: IndexMap<String, RefOr<Header>>,
    pub security_schemes: IndexMap<String, RefOr<SecurityScheme>>,
    pub links: IndexMap<String, RefOr<Link>>,
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    pub extra: Map<String, Value>,
}

impl Components {
    /// Build components from a Swagger 2.0 root: `definitions` become schemas.
    pub fn from_swagger2(root: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new("Swagger", root)?;
        Ok(Self {
            schemas: fields.ref_or_map("definitions")?,
            ..Self::default()
        })
    }

    /// An inline schema by name; `None` if absent or still a `$ref`.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name).and_then(RefOr::as_item)
    }

    /// Number of entries per component kind, under their document names.
    pub fn counts(&self) -> [(&'static str, usize); 9] {
        [
            ("schemas", self.schemas.len()),
            ("responses", self.responses.len()),
            ("parameters", self.parameters.len()),
            ("examples", self.examples.len()),
            ("requestBodies", self.request_bodies.len()),
            ("headers", self.headers.len()),
            ("securitySchemes", self.security_schemes.len()),
            ("links", self.links.len()),
            ("callbacks", self.callbacks.len()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.counts().iter().all(|(_, count)| *count == 0)
    }
}

impl SpecObject for Components {
    const KIND: &'static str = "Components";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            schemas: fields.ref_or_map("schemas")?,
            responses: fields.ref_or_map("responses")?,
            parameters: fields.ref_or_map("parameters")?,
            examples: fields.ref_or_map("examples")?,
            request_bodies: fields.ref_or_map("requestBodies")?,
            headers: fields.ref_or_map("headers")?,
            security_schemes: fields.ref_or_map("securitySchemes")?,
            links: fields.ref_or_map("links")?,
            callbacks: fields.ref_or_map("callbacks")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .ref_or_map("schemas", &self.schemas)
            .ref_or_map("responses", &self.responses)
            .ref_or_map("parameters", &self.parameters)
            .ref_or_map("examples", &self.examples)
            .ref_or_map("requestBodies", &self.request_bodies)
            .ref_or_map("headers", &self.headers)
            .ref_or_map("securitySchemes", &self.security_schemes)
            .ref_or_map("links", &self.links)
            .ref_or_map("callbacks", &self.callbacks)
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts()
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();

        if parts.is_empty() {
            return write!(f, "<Components: empty>");
        }
        write!(f, "<Components: {}", parts[..parts.len().min(3)].join(", "))?;
        if parts.len() > 3 {
            write!(f, " (+{} more types)", parts.len() - 3)?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn components_raw() -> Value {
        json!({
            "schemas": {
                "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
                "Pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}},
                "Alias": {"$ref": "#/components/schemas/Pet"}
            },
            "responses": {"NotFound": {"description": "Not found"}},
            "parameters": {"Limit": {"name": "limit", "in": "query"}},
            "examples": {"Rex": {"value": {"name": "Rex"}}},
            "requestBodies": {"NewPet": {"content": {"application/json": {}}}},
            "headers": {"RateLimit": {"schema": {"type": "integer"}}},
            "securitySchemes": {"bearer": {"type": "http", "scheme": "bearer"}},
            "links": {"Self": {"operationId": "getPet"}},
            "callbacks": {"Hook": {"{$request.body#/url}": {"post": {}}}},
            "pathItems": {"Shared": {"get": {}}}
        })
    }

    #[test]
    fn parse_every_kind() {
        let components = Components::from_raw(&components_raw()).unwrap();
        assert_eq!(components.schemas.len(), 3);
        assert!(components.schema("Pet").is_some());
        assert!(components.schema("Alias").is_none());
        assert!(components.schema("Missing").is_none());
        assert!(components.counts().iter().all(|(_, count)| *count >= 1));
        assert!(components.extra.contains_key("pathItems"));
        assert_eq!(components.to_raw(), components_raw());
    }

    #[test]
    fn swagger2_definitions_become_schemas() {
        let root = json!({
            "swagger": "2.0",
            "definitions": {"Pet": {"type": "object"}, "Error": {"type": "object"}}
        });
        let components = Components::from_swagger2(&root).unwrap();
        let names: Vec<&str> = components.schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Pet", "Error"]);
    }

    #[test]
    fn display() {
        let components = Components::from_raw(&components_raw()).unwrap();
        assert_eq!(
            components.to_string(),
            "<Components: 3 schemas, 1 responses, 1 parameters (+6 more types)>"
        );
        assert_eq!(Components::default().to_string(), "<Components: empty>");
    }
}
