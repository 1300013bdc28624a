use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Operation, PathItem, SpecObject};
use crate::error::ModelError;

/// Parse a mapping of key to Path Item. `x-*` keys and entries that are not
/// mappings are kept as additional fields.
fn parse_items(
    object: &'static str,
    raw: &Value,
    path_for: impl Fn(&str) -> String,
) -> Result<(IndexMap<String, PathItem>, Map<String, Value>), ModelError> {
    let map = raw.as_object().ok_or(ModelError::NotAnObject { object })?;
    let mut items = IndexMap::new();
    let mut extra = Map::new();

    for (key, value) in map {
        if key.starts_with("x-") || !value.is_object() {
            if !key.starts_with("x-") {
                tracing::warn!(object, entry = %key, "Skipping non-mapping path item");
            }
            extra.insert(key.clone(), value.clone());
            continue;
        }
        items.insert(key.clone(), PathItem::from_raw_at(&path_for(key), value)?);
    }
    Ok((items, extra))
}

fn items_to_raw(items: &IndexMap<String, PathItem>, extra: &Map<String, Value>) -> Value {
    let mut map: Map<String, Value> = items
        .iter()
        .map(|(key, item)| (key.clone(), item.to_raw()))
        .collect();
    for (key, value) in extra {
        map.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(map)
}

fn preview_keys(items: &IndexMap<String, PathItem>) -> String {
    let mut preview = items.keys().take(3).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > 3 {
        preview.push_str(&format!(", ... (+{} more)", items.len() - 3));
    }
    preview
}

/// The Paths Object: URL template to Path Item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    pub items: IndexMap<String, PathItem>,
    pub extra: Map<String, Value>,
}

impl Paths {
    pub fn get(&self, path: &str) -> Option<&PathItem> {
        self.items.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.items.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every operation, path by path, in document order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> + Clone + '_ {
        self.items.values().flat_map(|item| item.operations.values())
    }
}

impl SpecObject for Paths {
    const KIND: &'static str = "Paths";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let (items, extra) = parse_items(Self::KIND, raw, str::to_string)?;
        Ok(Self { items, extra })
    }

    fn to_raw(&self) -> Value {
        items_to_raw(&self.items, &self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Paths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Paths: {} paths, {} operations [{}]>",
            self.items.len(),
            self.operations().count(),
            preview_keys(&self.items)
        )
    }
}

/// Webhooks (OAS 3.1): webhook name to Path Item.
///
/// Each Path Item, and each of its operations, uses `webhook:<name>` as its
/// path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Webhooks {
    pub items: IndexMap<String, PathItem>,
    pub extra: Map<String, Value>,
}

impl Webhooks {
    pub fn get(&self, name: &str) -> Option<&PathItem> {
        self.items.get(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> + Clone + '_ {
        self.items.values().flat_map(|item| item.operations.values())
    }
}

impl SpecObject for Webhooks {
    const KIND: &'static str = "Webhooks";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let (items, extra) = parse_items(Self::KIND, raw, |name| format!("webhook:{}", name))?;
        Ok(Self { items, extra })
    }

    fn to_raw(&self) -> Value {
        items_to_raw(&self.items, &self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl fmt::Display for Webhooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return write!(f, "<Webhooks: empty>");
        }
        write!(
            f,
            "<Webhooks: {} webhooks [{}]>",
            self.items.len(),
            preview_keys(&self.items)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paths_raw() -> Value {
        json!({
            "/pets": {
                "get": {"operationId": "listPets"},
                "post": {"operationId": "createPet"}
            },
            "/pets/{id}": {"get": {"operationId": "getPet"}},
            "/health": {"head": {}},
            "/metrics": {"get": {}},
            "x-internal-paths": ["/debug"]
        })
    }

    #[test]
    fn operations_walk_paths_in_order() {
        let paths = Paths::from_raw(&paths_raw()).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.contains("/pets/{id}"));

        let ids: Vec<Option<&str>> = paths.operations().map(|op| op.operation_id.as_deref()).collect();
        assert_eq!(
            ids,
            vec![Some("listPets"), Some("createPet"), Some("getPet"), None, None]
        );
        // restartable
        assert_eq!(paths.operations().count(), 5);
    }

    #[test]
    fn extensions_and_scalars_are_kept_aside() {
        let raw = json!({"/a": {"get": {}}, "/broken": "nope", "x-meta": 1});
        let paths = Paths::from_raw(&raw).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths.extra.len(), 2);
        assert_eq!(paths.to_raw(), raw);
    }

    #[test]
    fn display_previews_three_paths() {
        let paths = Paths::from_raw(&paths_raw()).unwrap();
        assert_eq!(
            paths.to_string(),
            "<Paths: 4 paths, 5 operations [/pets, /pets/{id}, /health, ... (+1 more)]>"
        );
    }

    #[test]
    fn webhook_operations_use_prefixed_path() {
        let raw = json!({
            "newPet": {"post": {"operationId": "onNewPet"}},
            "petDeleted": {"post": {}}
        });
        let webhooks = Webhooks::from_raw(&raw).unwrap();
        let op = webhooks.operations().next().unwrap();
        assert_eq!(op.path, "webhook:newPet");
        assert_eq!(op.method, "POST");
        assert_eq!(webhooks.get("petDeleted").map(|i| i.path.as_str()), Some("webhook:petDeleted"));
        assert_eq!(webhooks.to_string(), "<Webhooks: 2 webhooks [newPet, petDeleted]>");
        assert_eq!(Webhooks::default().to_string(), "<Webhooks: empty>");
        assert_eq!(webhooks.to_raw(), raw);
    }
}
