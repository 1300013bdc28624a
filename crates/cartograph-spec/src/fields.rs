//! Field extraction and emission shared by every model type.
//!
//! [`Fields`] reads recognized keys out of a mapping and remembers which ones
//! it consumed; whatever is left becomes the object's additional fields, so
//! nothing in the source tree is dropped. A recognized key whose value has an
//! unexpected shape is left unconsumed and therefore lands in the additional
//! fields verbatim. Entries of a named map that are not mappings (a boolean
//! schema, a scalar `x-*` key among responses) are kept per field and merged
//! back by [`RawBuilder::finish`].

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::model::{RefOr, SpecObject};

pub(crate) struct Fields<'a> {
    object: &'static str,
    map: &'a Map<String, Value>,
    consumed: Vec<&'static str>,
    remnants: Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(object: &'static str, raw: &'a Value) -> Result<Self, ModelError> {
        let map = raw.as_object().ok_or(ModelError::NotAnObject { object })?;
        Ok(Self {
            object,
            map,
            consumed: Vec::new(),
            remnants: Map::new(),
        })
    }

    fn get(&self, key: &'static str) -> Option<&'a Value> {
        self.map.get(key)
    }

    fn consume(&mut self, key: &'static str) {
        self.consumed.push(key);
    }

    fn mismatch(&self, key: &'static str, expected: &'static str) {
        tracing::warn!(
            object = self.object,
            field = key,
            expected,
            "Field has unexpected shape, keeping it as an additional field"
        );
    }

    /// Any JSON value, taken verbatim.
    pub(crate) fn value(&mut self, key: &'static str) -> Option<Value> {
        let value = self.get(key)?.clone();
        self.consume(key);
        Some(value)
    }

    pub(crate) fn string(&mut self, key: &'static str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => {
                self.consume(key);
                Some(s.clone())
            }
            _ => {
                self.mismatch(key, "a string");
                None
            }
        }
    }

    pub(crate) fn required_string(&mut self, key: &'static str) -> Result<String, ModelError> {
        match self.get(key) {
            Some(Value::String(s)) => {
                self.consume(key);
                Ok(s.clone())
            }
            Some(_) => Err(ModelError::InvalidField {
                object: self.object,
                field: key,
                expected: "a string",
            }),
            None => Err(ModelError::RequiredField {
                object: self.object,
                field: key,
            }),
        }
    }

    pub(crate) fn bool(&mut self, key: &'static str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => {
                self.consume(key);
                Some(*b)
            }
            _ => {
                self.mismatch(key, "a boolean");
                None
            }
        }
    }

    /// A list made only of strings.
    pub(crate) fn strings(&mut self, key: &'static str) -> Option<Vec<String>> {
        let items = self.get(key)?.as_array();
        let strings: Option<Vec<String>> = items.and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect()
        });
        match strings {
            Some(strings) => {
                self.consume(key);
                Some(strings)
            }
            None => {
                self.mismatch(key, "a list of strings");
                None
            }
        }
    }

    /// A mapping of string to string (e.g. OAuth scopes).
    pub(crate) fn string_map(&mut self, key: &'static str) -> Option<IndexMap<String, String>> {
        let entries = self.get(key)?.as_object();
        let map: Option<IndexMap<String, String>> = entries.and_then(|entries| {
            entries
                .iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        });
        match map {
            Some(map) => {
                self.consume(key);
                Some(map)
            }
            None => {
                self.mismatch(key, "a mapping of strings");
                None
            }
        }
    }

    /// A field with a shape of its own; `parse` returning `None` leaves the key
    /// unconsumed.
    pub(crate) fn custom<T>(
        &mut self,
        key: &'static str,
        expected: &'static str,
        parse: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        match parse(self.get(key)?) {
            Some(parsed) => {
                self.consume(key);
                Some(parsed)
            }
            None => {
                self.mismatch(key, expected);
                None
            }
        }
    }

    /// A nested typed object.
    pub(crate) fn object<T: SpecObject>(&mut self, key: &'static str) -> Result<Option<T>, ModelError> {
        self.object_with(key, T::from_raw)
    }

    /// A nested mapping parsed with `parse`.
    pub(crate) fn object_with<T>(
        &mut self,
        key: &'static str,
        parse: impl FnOnce(&Value) -> Result<T, ModelError>,
    ) -> Result<Option<T>, ModelError> {
        match self.get(key) {
            Some(value) if value.is_object() => {
                let parsed = parse(value)?;
                self.consume(key);
                Ok(Some(parsed))
            }
            Some(_) => {
                self.mismatch(key, "a mapping");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// A nested object that may also be a `$ref`.
    pub(crate) fn ref_or<T: SpecObject>(
        &mut self,
        key: &'static str,
    ) -> Result<Option<RefOr<T>>, ModelError> {
        self.object_with(key, RefOr::from_raw)
    }

    /// A mapping of name to sub-object, each parsed with `parse`.
    ///
    /// Entries whose value is not a mapping are not parsed; they are kept as a
    /// partial mapping under `key` in the additional fields.
    pub(crate) fn map_with<T>(
        &mut self,
        key: &'static str,
        mut parse: impl FnMut(&str, &Value) -> Result<T, ModelError>,
    ) -> Result<IndexMap<String, T>, ModelError> {
        let entries = match self.get(key) {
            Some(Value::Object(entries)) => entries,
            Some(_) => {
                self.mismatch(key, "a mapping");
                return Ok(IndexMap::new());
            }
            None => return Ok(IndexMap::new()),
        };
        // An empty mapping stays verbatim so that it is written back.
        if entries.is_empty() {
            return Ok(IndexMap::new());
        }

        let mut parsed = IndexMap::with_capacity(entries.len());
        let mut kept = Map::new();
        for (name, value) in entries {
            if !value.is_object() {
                tracing::warn!(
                    object = self.object,
                    field = key,
                    entry = %name,
                    "Keeping non-mapping entry untyped"
                );
                kept.insert(name.clone(), value.clone());
                continue;
            }
            parsed.insert(name.clone(), parse(name, value)?);
        }
        if !kept.is_empty() {
            self.remnants.insert(key.to_string(), Value::Object(kept));
        }
        self.consume(key);
        Ok(parsed)
    }

    pub(crate) fn map_of<T: SpecObject>(
        &mut self,
        key: &'static str,
    ) -> Result<IndexMap<String, T>, ModelError> {
        self.map_with(key, |_, value| T::from_raw(value))
    }

    pub(crate) fn ref_or_map<T: SpecObject>(
        &mut self,
        key: &'static str,
    ) -> Result<IndexMap<String, RefOr<T>>, ModelError> {
        self.map_with(key, |_, value| RefOr::from_raw(value))
    }

    /// A list of sub-objects, each parsed with `parse`.
    ///
    /// Items that are not mappings are skipped (schema composition). Returns
    /// `None` when the key is absent or does not hold a list.
    pub(crate) fn list_with<T>(
        &mut self,
        key: &'static str,
        parse: impl FnMut(&Value) -> Result<T, ModelError>,
    ) -> Result<Option<Vec<T>>, ModelError> {
        self.parse_list(key, parse, true)
    }

    fn parse_list<T>(
        &mut self,
        key: &'static str,
        mut parse: impl FnMut(&Value) -> Result<T, ModelError>,
        skip_items: bool,
    ) -> Result<Option<Vec<T>>, ModelError> {
        let items = match self.get(key) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.mismatch(key, "a list");
                return Ok(None);
            }
            None => return Ok(None),
        };

        if !skip_items && items.is_empty() {
            return Ok(None);
        }
        if !skip_items && !items.iter().all(Value::is_object) {
            self.mismatch(key, "a list of mappings");
            return Ok(None);
        }

        let mut parsed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if !item.is_object() {
                tracing::warn!(
                    object = self.object,
                    field = key,
                    index,
                    "Skipping non-mapping list item"
                );
                continue;
            }
            parsed.push(parse(item)?);
        }
        self.consume(key);
        Ok(Some(parsed))
    }

    /// A list of typed objects. A list holding anything other than mappings is
    /// left unconsumed as a whole.
    pub(crate) fn list_of<T: SpecObject>(&mut self, key: &'static str) -> Result<Vec<T>, ModelError> {
        Ok(self.parse_list(key, T::from_raw, false)?.unwrap_or_default())
    }

    pub(crate) fn ref_or_list<T: SpecObject>(
        &mut self,
        key: &'static str,
    ) -> Result<Vec<RefOr<T>>, ModelError> {
        Ok(self.parse_list(key, RefOr::from_raw, false)?.unwrap_or_default())
    }

    /// Everything that was not consumed, plus the untyped entries of consumed
    /// maps, in document order.
    pub(crate) fn finish(mut self) -> Map<String, Value> {
        let mut extra = Map::new();
        for (key, value) in self.map {
            if !self.consumed.contains(&key.as_str()) {
                extra.insert(key.clone(), value.clone());
            } else if let Some(remnant) = self.remnants.remove(key) {
                extra.insert(key.clone(), remnant);
            }
        }
        extra
    }
}

/// Builds the untyped form of a model object.
///
/// Absent options and empty collections are omitted. Additional fields are
/// appended last and never overwrite a recognized key; untyped map entries
/// are merged into the mapping emitted for the same key.
#[derive(Default)]
pub(crate) struct RawBuilder {
    map: Map<String, Value>,
}

impl RawBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn value(mut self, key: &str, value: Option<&Value>) -> Self {
        if let Some(value) = value {
            self.map.insert(key.to_string(), value.clone());
        }
        self
    }

    pub(crate) fn string(mut self, key: &str, value: Option<&String>) -> Self {
        if let Some(value) = value {
            self.map.insert(key.to_string(), Value::String(value.clone()));
        }
        self
    }

    pub(crate) fn bool(mut self, key: &str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.map.insert(key.to_string(), Value::Bool(value));
        }
        self
    }

    pub(crate) fn strings(mut self, key: &str, values: Option<&[String]>) -> Self {
        if let Some(values) = values {
            let items = values.iter().cloned().map(Value::String).collect();
            self.map.insert(key.to_string(), Value::Array(items));
        }
        self
    }

    pub(crate) fn string_map(mut self, key: &str, values: Option<&IndexMap<String, String>>) -> Self {
        if let Some(values) = values {
            let entries = values
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            self.map.insert(key.to_string(), Value::Object(entries));
        }
        self
    }

    /// An untyped mapping, omitted when empty.
    pub(crate) fn raw_map(mut self, key: &str, entries: &Map<String, Value>) -> Self {
        if !entries.is_empty() {
            self.map.insert(key.to_string(), Value::Object(entries.clone()));
        }
        self
    }

    pub(crate) fn object<T: SpecObject>(mut self, key: &str, value: Option<&T>) -> Self {
        if let Some(value) = value {
            self.map.insert(key.to_string(), value.to_raw());
        }
        self
    }

    pub(crate) fn ref_or<T: SpecObject>(mut self, key: &str, value: Option<&RefOr<T>>) -> Self {
        if let Some(value) = value {
            self.map.insert(key.to_string(), value.to_raw());
        }
        self
    }

    pub(crate) fn map_with<T>(
        mut self,
        key: &str,
        entries: &IndexMap<String, T>,
        emit: impl Fn(&T) -> Value,
    ) -> Self {
        if !entries.is_empty() {
            let map = entries
                .iter()
                .map(|(name, entry)| (name.clone(), emit(entry)))
                .collect();
            self.map.insert(key.to_string(), Value::Object(map));
        }
        self
    }

    /// Insert each entry as a key of this mapping (path item methods).
    pub(crate) fn inline_map<T>(mut self, entries: &IndexMap<String, T>, emit: impl Fn(&T) -> Value) -> Self {
        for (name, entry) in entries {
            self.map.insert(name.clone(), emit(entry));
        }
        self
    }

    pub(crate) fn map_of<T: SpecObject>(self, key: &str, entries: &IndexMap<String, T>) -> Self {
        self.map_with(key, entries, T::to_raw)
    }

    pub(crate) fn ref_or_map<T: SpecObject>(
        self,
        key: &str,
        entries: &IndexMap<String, RefOr<T>>,
    ) -> Self {
        self.map_with(key, entries, RefOr::to_raw)
    }

    pub(crate) fn list_with<T>(
        mut self,
        key: &str,
        items: Option<&[T]>,
        emit: impl Fn(&T) -> Value,
    ) -> Self {
        if let Some(items) = items {
            let items = items.iter().map(emit).collect();
            self.map.insert(key.to_string(), Value::Array(items));
        }
        self
    }

    pub(crate) fn list_of<T: SpecObject>(self, key: &str, items: &[T]) -> Self {
        let items = (!items.is_empty()).then_some(items);
        self.list_with(key, items, T::to_raw)
    }

    pub(crate) fn ref_or_list<T: SpecObject>(self, key: &str, items: &[RefOr<T>]) -> Self {
        let items = (!items.is_empty()).then_some(items);
        self.list_with(key, items, RefOr::to_raw)
    }

    /// Append additional fields, then produce the mapping. A mapping that was
    /// also emitted from typed entries gets the missing entries merged in.
    pub(crate) fn finish(mut self, extra: &Map<String, Value>) -> Value {
        for (key, value) in extra {
            if let (Some(Value::Object(emitted)), Value::Object(remnant)) =
                (self.map.get_mut(key), value)
            {
                for (name, entry) in remnant {
                    emitted.entry(name.clone()).or_insert_with(|| entry.clone());
                }
            } else if !self.map.contains_key(key) {
                self.map.insert(key.clone(), value.clone());
            }
        }
        Value::Object(self.map)
    }
}

/// Look up a vendor extension, with or without its `x-` prefix.
pub fn extension<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if name.starts_with("x-") {
        fields.get(name)
    } else {
        fields.get(&format!("x-{}", name))
    }
}

/// Whether a vendor extension is present, with or without its `x-` prefix.
pub fn has_extension(fields: &Map<String, Value>, name: &str) -> bool {
    extension(fields, name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finish_returns_unconsumed_keys_in_order() {
        let raw = json!({"name": "a", "x-one": 1, "in": "query", "x-two": 2});
        let mut fields = Fields::new("Parameter", &raw).unwrap();
        assert_eq!(fields.string("name").as_deref(), Some("a"));
        let extra = fields.finish();
        let keys: Vec<&str> = extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x-one", "in", "x-two"]);
    }

    #[test]
    fn mismatched_optional_field_stays_as_extra() {
        let raw = json!({"description": 42});
        let mut fields = Fields::new("Example", &raw).unwrap();
        assert!(fields.string("description").is_none());
        assert_eq!(fields.finish().get("description"), Some(&json!(42)));
    }

    #[test]
    fn non_mapping_map_entries_are_kept_per_field() {
        let raw = json!({
            "responses": {"200": {"description": "ok"}, "x-note": "kept", "default": 4},
            "x-top": 1
        });
        let mut fields = Fields::new("Operation", &raw).unwrap();
        let responses = fields.map_with("responses", |_, value| Ok(value.clone())).unwrap();
        assert_eq!(responses.keys().collect::<Vec<_>>(), ["200"]);

        let extra = fields.finish();
        assert_eq!(extra.get("responses"), Some(&json!({"x-note": "kept", "default": 4})));
        assert_eq!(extra.get("x-top"), Some(&json!(1)));

        let rebuilt = RawBuilder::new()
            .map_with("responses", &responses, Value::clone)
            .finish(&extra);
        assert_eq!(rebuilt, raw);
    }

    #[test]
    fn empty_maps_and_lists_are_written_back() {
        let raw = json!({"parameters": [], "responses": {}});
        let mut fields = Fields::new("Operation", &raw).unwrap();
        let parameters: Vec<RefOr<crate::model::Parameter>> =
            fields.ref_or_list("parameters").unwrap();
        let responses = fields.map_with("responses", |_, value| Ok(value.clone())).unwrap();
        assert!(parameters.is_empty() && responses.is_empty());

        let extra = fields.finish();
        let rebuilt = RawBuilder::new()
            .ref_or_list("parameters", &parameters)
            .map_with("responses", &responses, Value::clone)
            .finish(&extra);
        assert_eq!(rebuilt, raw);
    }

    #[test]
    fn typed_lists_with_stray_items_stay_verbatim() {
        let raw = json!({"servers": [{"url": "https://a"}, "https://b"]});
        let mut fields = Fields::new("OpenAPI", &raw).unwrap();
        let servers: Vec<crate::model::Server> = fields.list_of("servers").unwrap();
        assert!(servers.is_empty());
        assert_eq!(fields.finish().get("servers"), raw.get("servers"));
    }

    #[test]
    fn required_string_distinguishes_missing_and_mistyped() {
        let raw = json!({"title": 3});
        let mut fields = Fields::new("Info", &raw).unwrap();
        assert_eq!(
            fields.required_string("title"),
            Err(ModelError::InvalidField {
                object: "Info",
                field: "title",
                expected: "a string"
            })
        );
        assert_eq!(
            fields.required_string("version"),
            Err(ModelError::RequiredField {
                object: "Info",
                field: "version"
            })
        );
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        assert!(matches!(
            Fields::new("Tag", &json!([1, 2])),
            Err(ModelError::NotAnObject { object: "Tag" })
        ));
    }

    #[test]
    fn extension_lookup_accepts_both_spellings() {
        let fields = json!({"x-custom": "value", "other": "data"});
        let fields = fields.as_object().unwrap();
        assert_eq!(extension(fields, "custom"), Some(&json!("value")));
        assert_eq!(extension(fields, "x-custom"), Some(&json!("value")));
        assert!(has_extension(fields, "custom"));
        assert!(!has_extension(fields, "missing"));
        assert!(!has_extension(fields, "other"));
    }
}
