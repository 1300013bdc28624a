//! Typed OpenAPI objects.
//!
//! Every type implements [`SpecObject`]: it is built from an untyped subtree
//! with `from_raw` and turned back into one with `to_raw`. Keys a type does
//! not recognize are kept in its additional fields and emitted again on the
//! way out, so vendor extensions survive a round trip.
//!
//! Positions where OpenAPI allows a Reference Object hold a [`RefOr`]. A
//! [`RefOr::Ref`] is an unresolved placeholder until the resolver replaces it.

mod callback;
mod components;
mod example;
mod header;
mod info;
mod link;
mod media_type;
mod openapi;
mod operation;
mod parameter;
mod path_item;
mod paths;
mod request_body;
mod response;
mod schema;
mod security_scheme;
mod server;
mod tag;

pub use callback::Callback;
pub use components::Components;
pub use example::Example;
pub use header::Header;
pub use info::{Contact, Info, License};
pub use link::Link;
pub use media_type::{Encoding, MediaType};
pub use openapi::{OpenApiSpec, Version};
pub use operation::Operation;
pub use parameter::Parameter;
pub use path_item::{PathItem, HTTP_METHODS};
pub use paths::{Paths, Webhooks};
pub use request_body::RequestBody;
pub use response::Response;
pub use schema::{Schema, SchemaType};
pub use security_scheme::{OAuthFlow, OAuthFlows, SecurityScheme};
pub use server::{Server, ServerVariable};
pub use tag::{ExternalDocumentation, Tag};

use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::reference::Reference;

/// A typed object that round-trips through the untyped document tree.
pub trait SpecObject: Sized {
    /// Object name used in diagnostics, e.g. `"Schema"`.
    const KIND: &'static str;

    /// Build the object from its subtree.
    fn from_raw(raw: &Value) -> Result<Self, ModelError>;

    /// Produce the untyped subtree for this object.
    fn to_raw(&self) -> Value;

    /// Fields the model does not recognize, kept verbatim.
    fn additional_fields(&self) -> &Map<String, Value>;

    /// The `x-*` subset of the additional fields.
    fn extensions(&self) -> Map<String, Value> {
        self.additional_fields()
            .iter()
            .filter(|(key, _)| key.starts_with("x-"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Either a Reference Object or an inline object.
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T: SpecObject> RefOr<T> {
    /// Parse a slot: a node with `$ref` becomes [`RefOr::Ref`], anything else
    /// is handed to `T::from_raw`.
    pub fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        if Reference::is_reference(raw) {
            Reference::from_raw(raw).map(RefOr::Ref)
        } else {
            T::from_raw(raw).map(RefOr::Item)
        }
    }

    /// Placeholders short-circuit to their `{"$ref": ...}` form.
    pub fn to_raw(&self) -> Value {
        match self {
            RefOr::Ref(reference) => reference.to_raw(),
            RefOr::Item(item) => item.to_raw(),
        }
    }
}

impl<T> RefOr<T> {
    pub fn is_ref(&self) -> bool {
        matches!(self, RefOr::Ref(_))
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(reference) => Some(reference),
            RefOr::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }
}

impl<T> From<T> for RefOr<T> {
    fn from(item: T) -> Self {
        RefOr::Item(item)
    }
}
