use cartograph_spec::{
    Callback, Example, Header, Link, Parameter, PathItem, RequestBody, Response, Schema,
    SecurityScheme, SpecObject,
};
use serde_json::Value;

/// The target of a reference.
///
/// Targets under `components/<kind>/...` and `paths/...` come back typed;
/// anything else (and any target that is itself a `$ref` node when chains are
/// not followed) comes back as the raw subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Schema(Schema),
    Response(Response),
    Parameter(Parameter),
    Example(Example),
    RequestBody(RequestBody),
    Header(Header),
    SecurityScheme(SecurityScheme),
    Link(Link),
    Callback(Callback),
    PathItem(PathItem),
    Raw(Value),
}

impl Resolved {
    /// Name of the typed object, or `"raw"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Resolved::Schema(_) => Schema::KIND,
            Resolved::Response(_) => Response::KIND,
            Resolved::Parameter(_) => Parameter::KIND,
            Resolved::Example(_) => Example::KIND,
            Resolved::RequestBody(_) => RequestBody::KIND,
            Resolved::Header(_) => Header::KIND,
            Resolved::SecurityScheme(_) => SecurityScheme::KIND,
            Resolved::Link(_) => Link::KIND,
            Resolved::Callback(_) => Callback::KIND,
            Resolved::PathItem(_) => PathItem::KIND,
            Resolved::Raw(_) => "raw",
        }
    }

    pub fn is_typed(&self) -> bool {
        !matches!(self, Resolved::Raw(_))
    }

    /// The untyped form of the target.
    pub fn to_raw(&self) -> Value {
        match self {
            Resolved::Schema(schema) => schema.to_raw(),
            Resolved::Response(response) => response.to_raw(),
            Resolved::Parameter(parameter) => parameter.to_raw(),
            Resolved::Example(example) => example.to_raw(),
            Resolved::RequestBody(body) => body.to_raw(),
            Resolved::Header(header) => header.to_raw(),
            Resolved::SecurityScheme(scheme) => scheme.to_raw(),
            Resolved::Link(link) => link.to_raw(),
            Resolved::Callback(callback) => callback.to_raw(),
            Resolved::PathItem(item) => item.to_raw(),
            Resolved::Raw(value) => value.clone(),
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Resolved::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn as_path_item(&self) -> Option<&PathItem> {
        match self {
            Resolved::PathItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Resolved::Raw(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_schema(self) -> Option<Schema> {
        match self {
            Resolved::Schema(schema) => Some(schema),
            _ => None,
        }
    }
}
