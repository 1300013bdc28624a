//! OpenAPI 3.x and Swagger 2.0 document model.
//!
//! Loads YAML/JSON documents into a typed model that keeps every field it
//! does not understand, and parses `$ref` strings into [`Reference`]s. The
//! parsed tree stays available as [`OpenApiSpec::raw`] for reference
//! resolution.

pub mod error;
pub mod fields;
pub mod loader;
pub mod model;
pub mod reference;

pub use error::{LoadError, ModelError};
pub use fields::{extension, has_extension};
pub use loader::{
    load, load_from_file, load_from_json, load_from_url, load_from_value, load_from_yaml,
    load_with, LoadOptions, Source,
};
pub use model::*;
pub use reference::{Reference, REF_KEY};
