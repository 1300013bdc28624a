use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{PathItem, RefOr, SpecObject};
use crate::error::ModelError;
use crate::reference::Reference;

/// A Callback Object: runtime expression to Path Item.
///
/// Every key except `x-*` extensions is an expression. Each Path Item takes
/// its expression as its path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Callback {
    pub expressions: IndexMap<String, RefOr<PathItem>>,
    pub extra: Map<String, Value>,
}

impl Callback {
    pub fn get(&self, expression: &str) -> Option<&RefOr<PathItem>> {
        self.expressions.get(expression)
    }
}

impl SpecObject for Callback {
    const KIND: &'static str = "Callback";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let map = raw.as_object().ok_or(ModelError::NotAnObject { object: Self::KIND })?;
        let mut callback = Callback::default();

        for (expression, value) in map {
            if expression.starts_with("x-") || !value.is_object() {
                callback.extra.insert(expression.clone(), value.clone());
                continue;
            }
            let slot = if Reference::is_reference(value) {
                RefOr::Ref(Reference::from_raw(value)?)
            } else {
                RefOr::Item(PathItem::from_raw_at(expression, value)?)
            };
            callback.expressions.insert(expression.clone(), slot);
        }
        Ok(callback)
    }

    fn to_raw(&self) -> Value {
        let mut map: Map<String, Value> = self
            .expressions
            .iter()
            .map(|(expression, item)| (expression.clone(), item.to_raw()))
            .collect();
        for (key, value) in &self.extra {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(map)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
