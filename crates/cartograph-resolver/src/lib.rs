//! Local `$ref` resolution for OpenAPI documents.
//!
//! Walks JSON Pointer fragments (`#/components/schemas/Pet`) against a loaded
//! [`OpenApiSpec`](cartograph_spec::OpenApiSpec), follows reference chains,
//! types targets by where they sit in the document and detects reference
//! cycles. External documents are never fetched.

pub mod error;
pub mod nested;
pub mod resolved;
pub mod resolver;

pub use error::ResolveError;
pub use nested::ResolveNested;
pub use resolved::Resolved;
pub use resolver::Resolver;
