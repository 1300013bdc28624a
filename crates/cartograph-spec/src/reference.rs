//! `$ref` pointers.
//!
//! A [`Reference`] wraps the raw `$ref` string and exposes the pieces the
//! resolver needs: whether it is local (`#/...`) or external
//! (`models.yaml#/Pet`, `https://example.com/pet.json`), the document part,
//! and the JSON Pointer (RFC 6901) split into unescaped segments.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ModelError;

/// The key that marks a mapping as a reference object.
pub const REF_KEY: &str = "$ref";

/// A Reference Object: a `$ref` plus optional OAS 3.1 overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The raw reference string, e.g. `#/components/schemas/User`.
    pub ref_location: String,
    /// OAS 3.1 `summary` override.
    pub summary: Option<String>,
    /// OAS 3.1 `description` override.
    pub description: Option<String>,
    /// Any other sibling keys, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Reference {
    /// Wrap a reference string. Never fails; classification happens lazily.
    pub fn new(ref_location: impl Into<String>) -> Self {
        Self {
            ref_location: ref_location.into(),
            summary: None,
            description: None,
            extra: Map::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True iff `node` is a mapping containing a `$ref` key.
    pub fn is_reference(node: &Value) -> bool {
        node.as_object()
            .is_some_and(|obj| obj.contains_key(REF_KEY))
    }

    /// Build a reference from a `{"$ref": ...}` node.
    ///
    /// The `$ref` key must be present and hold a non-empty string.
    pub fn from_raw(node: &Value) -> Result<Self, ModelError> {
        let obj = node
            .as_object()
            .ok_or_else(|| ModelError::InvalidReference("reference must be a mapping".into()))?;

        let ref_location = match obj.get(REF_KEY) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(ModelError::InvalidReference("'$ref' is empty".into()))
            }
            Some(other) => {
                return Err(ModelError::InvalidReference(format!(
                    "'$ref' must be a string, got {}",
                    other
                )))
            }
            None => return Err(ModelError::InvalidReference("missing '$ref'".into())),
        };

        let mut reference = Reference::new(ref_location);
        for (key, value) in obj {
            match (key.as_str(), value) {
                (REF_KEY, _) => {}
                ("summary", Value::String(s)) => reference.summary = Some(s.clone()),
                ("description", Value::String(s)) => reference.description = Some(s.clone()),
                _ => {
                    reference.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(reference)
    }

    /// Serialize back to a `{"$ref": ...}` node.
    pub fn to_raw(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(REF_KEY.into(), Value::String(self.ref_location.clone()));
        if let Some(summary) = &self.summary {
            obj.insert("summary".into(), Value::String(summary.clone()));
        }
        if let Some(description) = &self.description {
            obj.insert("description".into(), Value::String(description.clone()));
        }
        for (key, value) in &self.extra {
            obj.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(obj)
    }

    /// Local references start with `#`.
    pub fn is_local(&self) -> bool {
        self.ref_location.starts_with('#')
    }

    pub fn is_external(&self) -> bool {
        !self.is_local()
    }

    /// The document part of an external reference (before `#`).
    ///
    /// Empty for local references.
    pub fn document(&self) -> &str {
        if self.is_local() {
            return "";
        }
        match self.ref_location.split_once('#') {
            Some((document, _)) => document,
            None => &self.ref_location,
        }
    }

    /// The JSON Pointer part (after the first `#`), empty if there is no `#`.
    pub fn pointer(&self) -> &str {
        self.ref_location
            .split_once('#')
            .map(|(_, pointer)| pointer)
            .unwrap_or("")
    }

    /// The pointer split into unescaped segments.
    ///
    /// Empty segments are dropped, so `#`, `#/` and a fragment-less external
    /// reference all yield an empty list (a reference to the document root).
    pub fn pointer_parts(&self) -> Vec<String> {
        self.pointer()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(unescape_segment)
            .collect()
    }
}

impl From<&str> for Reference {
    fn from(ref_location: &str) -> Self {
        Reference::new(ref_location)
    }
}

impl From<String> for Reference {
    fn from(ref_location: String) -> Self {
        Reference::new(ref_location)
    }
}

impl From<&Reference> for Reference {
    fn from(reference: &Reference) -> Self {
        reference.clone()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Reference: ref='{}'", self.ref_location)?;
        if let Some(summary) = &self.summary {
            write!(f, ", summary='{}'", preview(summary, 50))?;
        }
        if let Some(description) = &self.description {
            write!(f, ", description='{}'", preview(description, 50))?;
        }
        write!(f, ">")
    }
}

/// Undo RFC 6901 escaping: `~1` becomes `/`, then `~0` becomes `~`.
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Apply RFC 6901 escaping to a single segment.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Render unescaped segments as a pointer string, e.g. `/components/schemas`.
pub fn pointer_from_parts<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|part| format!("/{}", escape_segment(part.as_ref())))
        .collect()
}

pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
