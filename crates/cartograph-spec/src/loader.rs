//! Turning bytes into an [`OpenApiSpec`].
//!
//! Every entry point ends in [`load_from_value`]: the parsed tree is checked
//! to be a mapping and then moved into the spec as `raw`, so the typed model
//! and the tree the resolver walks are one and the same.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;

use crate::error::LoadError;
use crate::model::OpenApiSpec;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// An already-parsed tree.
    Value(Value),
    /// JSON text.
    Json(String),
    /// YAML text.
    Yaml(String),
    /// A file; the format comes from the extension.
    File(PathBuf),
    /// An `http(s)` URL; the format comes from `Content-Type`.
    Url(String),
}

impl Source {
    /// Treat `input` as a URL if it has an `http://` or `https://` scheme,
    /// otherwise as a file path.
    pub fn detect(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Source::Url(input.to_string())
        } else {
            Source::File(PathBuf::from(input))
        }
    }
}

/// Options for fetching documents over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("cartograph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl LoadOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    /// Try JSON, then YAML.
    Unknown,
}

/// Load a document with default [`LoadOptions`].
pub fn load(source: &Source) -> Result<OpenApiSpec, LoadError> {
    load_with(source, &LoadOptions::default())
}

pub fn load_with(source: &Source, options: &LoadOptions) -> Result<OpenApiSpec, LoadError> {
    match source {
        Source::Value(value) => load_from_value(value.clone()),
        Source::Json(text) => load_from_json(text),
        Source::Yaml(text) => load_from_yaml(text),
        Source::File(path) => load_from_file(path),
        Source::Url(url) => load_from_url(url, options),
    }
}

/// Build a spec from a parsed tree. The root must be a mapping.
pub fn load_from_value(root: Value) -> Result<OpenApiSpec, LoadError> {
    if !root.is_object() {
        return Err(LoadError::RootNotObject);
    }
    let spec = OpenApiSpec::from_value(root)?;
    tracing::info!(
        version = %spec.version,
        title = spec.title().unwrap_or("Untitled"),
        paths = spec.paths.len(),
        schemas = spec.components.schemas.len(),
        "Spec loaded"
    );
    Ok(spec)
}

pub fn load_from_json(text: &str) -> Result<OpenApiSpec, LoadError> {
    load_from_value(parse_text(text, Format::Json)?)
}

pub fn load_from_yaml(text: &str) -> Result<OpenApiSpec, LoadError> {
    load_from_value(parse_text(text, Format::Yaml)?)
}

/// Load a file: `.yaml`/`.yml` as YAML, `.json` as JSON, anything else JSON
/// first and YAML second.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<OpenApiSpec, LoadError> {
    let path = path.as_ref();
    let format = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => Format::Yaml,
        Some("json") => Format::Json,
        _ => Format::Unknown,
    };

    tracing::debug!(path = %path.display(), ?format, "Reading spec file");
    let text = std::fs::read_to_string(path)?;
    load_from_value(parse_text(&text, format)?)
}

/// Fetch a document over HTTP. A `Content-Type` mentioning `yaml` or `yml`
/// selects YAML; anything else tries JSON first and YAML second.
pub fn load_from_url(url: &str, options: &LoadOptions) -> Result<OpenApiSpec, LoadError> {
    let http_error = |e: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .build()
        .map_err(http_error)?;

    tracing::debug!(url = %url, timeout_secs = options.timeout.as_secs(), "Fetching spec");
    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(http_error)?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let format = if content_type.contains("yaml") || content_type.contains("yml") {
        Format::Yaml
    } else {
        Format::Unknown
    };

    let text = response.text().map_err(http_error)?;
    load_from_value(parse_text(&text, format)?)
}

fn parse_text(text: &str, format: Format) -> Result<Value, LoadError> {
    match format {
        Format::Json => Ok(serde_json::from_str(text)?),
        Format::Yaml => parse_yaml(text),
        Format::Unknown => match serde_json::from_str(text) {
            Ok(value) => Ok(value),
            Err(json_err) => {
                tracing::debug!(error = %json_err, "Not JSON, trying YAML");
                parse_yaml(text)
            }
        },
    }
}

/// YAML goes through `serde_yaml::Value` so that merge keys (`<<`) are
/// applied and non-string keys (`200:`) become strings.
fn parse_yaml(text: &str) -> Result<Value, LoadError> {
    let mut document: serde_yaml::Value = serde_yaml::from_str(text)?;
    document.apply_merge()?;
    serde_json::to_value(document).map_err(|e| {
        LoadError::Yaml(serde::de::Error::custom(format!(
            "unsupported mapping key: {}",
            e
        )))
    })
}
