use thiserror::Error;

/// Errors produced while building typed objects from a document tree (E2001–E2004).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// E2001: A mandatory field is absent.
    #[error("E2001: {object} is missing required field '{field}'")]
    RequiredField {
        object: &'static str,
        field: &'static str,
    },

    /// E2002: A mandatory field is present but has the wrong JSON type.
    #[error("E2002: {object}.{field} must be {expected}")]
    InvalidField {
        object: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// E2003: A reference object without a string `$ref`.
    #[error("E2003: invalid reference: {0}")]
    InvalidReference(String),

    /// E2004: The subtree for an object is not a mapping.
    #[error("E2004: {object} must be a mapping")]
    NotAnObject { object: &'static str },
}

impl ModelError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::RequiredField { .. } => "E2001",
            ModelError::InvalidField { .. } => "E2002",
            ModelError::InvalidReference(_) => "E2003",
            ModelError::NotAnObject { .. } => "E2004",
        }
    }
}

/// Errors produced while loading a document (E2101–E2105).
///
/// Model failures keep their own code (E2001–E2004).
#[derive(Debug, Error)]
pub enum LoadError {
    /// E2101: I/O error reading the document.
    #[error("E2101: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// E2102: Document is not valid JSON.
    #[error("E2102: JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// E2103: Document is not valid YAML.
    #[error("E2103: YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// E2104: Fetching the document over HTTP failed.
    #[error("E2104: HTTP error fetching {url}: {message}")]
    Http { url: String, message: String },

    /// E2105: Document root is not a mapping.
    #[error("E2105: document root must be a mapping")]
    RootNotObject,

    /// The tree parsed but a typed object could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl LoadError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Io(_) => "E2101",
            LoadError::Json(_) => "E2102",
            LoadError::Yaml(_) => "E2103",
            LoadError::Http { .. } => "E2104",
            LoadError::RootNotObject => "E2105",
            LoadError::Model(e) => e.code(),
        }
    }
}
