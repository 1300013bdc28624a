use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Components, ExternalDocumentation, Info, Operation, Paths, Server, SpecObject, Tag, Webhooks};
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

const DEFAULT_VERSION: &str = "3.0.0";

/// A lenient `major.minor.patch` version.
///
/// Components that are missing or not numeric read as 0, so `"3.1"` is
/// 3.1.0 and `"2.0-beta"` is 2.0.0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    pub raw: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('.').map(|part| part.parse::<u32>().unwrap_or(0));
        Self {
            raw: raw.to_string(),
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }

    /// Read the version of a document root: `openapi`, then `swagger`,
    /// then the 3.0.0 default.
    pub fn of_document(root: &Value) -> Self {
        let declared = ["openapi", "swagger"].iter().find_map(|key| match root.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self::parse(declared.as_deref().unwrap_or(DEFAULT_VERSION))
    }

    pub fn is_swagger2(&self) -> bool {
        self.major == 2
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A whole OpenAPI (3.x) or Swagger (2.0) document.
///
/// `raw` is the parsed document tree itself; the typed sections are views
/// built from it. The resolver walks `raw`, so both always describe the same
/// bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiSpec {
    pub raw: Value,
    pub version: Version,
    pub openapi: Option<String>,
    pub swagger: Option<String>,
    pub info: Option<Info>,
    pub json_schema_dialect: Option<String>,
    pub servers: Vec<Server>,
    pub paths: Paths,
    pub webhooks: Webhooks,
    pub components: Components,
    pub security: Option<Value>,
    pub tags: Vec<Tag>,
    pub external_docs: Option<ExternalDocumentation>,
    pub extra: Map<String, Value>,
}

impl OpenApiSpec {
    /// Build the typed model and take ownership of the tree it came from.
    pub fn from_value(raw: Value) -> Result<Self, ModelError> {
        let version = Version::of_document(&raw);
        let mut fields = Fields::new(Self::KIND, &raw)?;

        let openapi = fields.string("openapi");
        let swagger = fields.string("swagger");
        let info = fields.object("info")?;
        let json_schema_dialect = fields.string("jsonSchemaDialect");
        let servers = fields.list_of("servers")?;
        let paths = fields.object("paths")?.unwrap_or_default();
        let webhooks = fields.object("webhooks")?.unwrap_or_default();
        let components = if version.is_swagger2() {
            Components::from_swagger2(&raw)?
        } else {
            fields.object("components")?.unwrap_or_default()
        };
        let security = fields.value("security");
        let tags = fields.list_of("tags")?;
        let external_docs = fields.object("externalDocs")?;
        let extra = fields.finish();

        Ok(Self {
            raw,
            version,
            openapi,
            swagger,
            info,
            json_schema_dialect,
            servers,
            paths,
            webhooks,
            components,
            security,
            tags,
            external_docs,
            extra,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.info.as_ref().map(|info| info.title.as_str())
    }

    /// Every operation: all of Paths, then all of Webhooks, in document order.
    ///
    /// Each call starts a fresh walk.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> + Clone + '_ {
        self.paths.operations().chain(self.webhooks.operations())
    }

    pub fn operation_by_id(&self, operation_id: &str) -> Option<&Operation> {
        self.operations()
            .find(|op| op.operation_id.as_deref() == Some(operation_id))
    }

    fn has_section(&self, key: &str) -> bool {
        self.raw.get(key).is_some_and(Value::is_object)
    }
}

impl SpecObject for OpenApiSpec {
    const KIND: &'static str = "OpenAPI";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        Self::from_value(raw.clone())
    }

    /// Rebuild the document from the typed sections. Swagger 2.0 schemas are
    /// emitted from `definitions` (kept verbatim), never as `components`.
    fn to_raw(&self) -> Value {
        let paths = (self.has_section("paths") || !self.paths.is_empty()).then_some(&self.paths);
        let webhooks =
            (self.has_section("webhooks") || !self.webhooks.is_empty()).then_some(&self.webhooks);
        let components = (!self.version.is_swagger2()
            && (self.has_section("components") || !self.components.is_empty()))
        .then_some(&self.components);
        let servers = (!self.servers.is_empty()).then_some(self.servers.as_slice());
        let tags = (!self.tags.is_empty()).then_some(self.tags.as_slice());

        RawBuilder::new()
            .string("openapi", self.openapi.as_ref())
            .string("swagger", self.swagger.as_ref())
            .object("info", self.info.as_ref())
            .string("jsonSchemaDialect", self.json_schema_dialect.as_ref())
            .list_with("servers", servers, Server::to_raw)
            .object("paths", paths)
            .object("webhooks", webhooks)
            .object("components", components)
            .value("security", self.security.as_ref())
            .list_with("tags", tags, Tag::to_raw)
            .object("externalDocs", self.external_docs.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for OpenApiSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<OpenAPISpec: '{}' v{}, {} paths, {} schemas>",
            self.title().unwrap_or("Untitled"),
            self.version,
            self.paths.len(),
            self.components.schemas.len()
        )
    }
}
