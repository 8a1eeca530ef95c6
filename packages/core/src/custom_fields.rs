//! Custom field flatten/nest.
//!
//! V2 returns custom fields nested under `custom_fields`, keyed by a
//! 40-character hex hash. Reads flatten the bundle into top-level
//! attributes; writes move hash-keyed attributes back under
//! `custom_fields`, resolving option labels to option ids on the way.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::field_cache::{FieldCache, FieldDefinition, FieldSource, FieldType};
use crate::kind::ResourceKind;
use crate::Value;

pub const CUSTOM_FIELDS_KEY: &str = "custom_fields";

/// Whether `key` is a custom field hash: exactly 40 lowercase hex digits.
pub fn is_custom_field_key(key: &str) -> bool {
    key.len() == 40
        && key
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Flatten a custom field bundle into top-level attributes.
///
/// `{K: {value: 5, currency: "EUR"}}` becomes `{K: 5, K_currency: "EUR"}`.
/// A map entry without `value` only contributes its subfields; a scalar
/// entry is copied through.
pub fn flatten(bundle: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    for (key, entry) in bundle {
        match entry {
            Value::Map(subfields) => {
                for (name, value) in subfields {
                    if name == "value" {
                        flat.insert(key.clone(), value.clone());
                    } else {
                        flat.insert(format!("{}_{}", key, name), value.clone());
                    }
                }
            }
            other => {
                flat.insert(key.clone(), other.clone());
            }
        }
    }
    flat
}

/// Write-path transformer for one resource kind.
pub struct CustomFieldWriter<'a> {
    cache: &'a FieldCache,
    source: &'a dyn FieldSource,
}

impl<'a> CustomFieldWriter<'a> {
    pub fn new(cache: &'a FieldCache, source: &'a dyn FieldSource) -> Self {
        Self { cache, source }
    }

    /// Move custom fields of a flat update under `custom_fields`.
    ///
    /// Standard fields stay at the top level untouched. Custom fields with
    /// a null or empty value are dropped. When field definitions cannot be
    /// loaded the values are sent as given.
    pub fn nest(&self, kind: ResourceKind, updates: Map<String, Json>) -> Map<String, Json> {
        let (custom, mut payload): (Map<String, Json>, Map<String, Json>) = updates
            .into_iter()
            .partition(|(key, _)| is_custom_field_key(key));

        if custom.is_empty() {
            return payload;
        }

        let definitions = match self.cache.definitions(kind, self.source) {
            Ok(definitions) => Some(definitions),
            Err(e) => {
                log::warn!("sending {} custom fields unformatted: {}", kind, e);
                None
            }
        };

        let mut nested = Map::new();
        for (key, value) in custom {
            if is_blank(&value) {
                log::debug!("dropping blank custom field {}", key);
                continue;
            }
            let definition = definitions.as_ref().and_then(|d| d.get(&key));
            let formatted = match definition {
                Some(definition) => format_value(definition, value),
                None => value,
            };
            nested.insert(key, formatted);
        }

        if !nested.is_empty() {
            payload.insert(CUSTOM_FIELDS_KEY.to_string(), Json::Object(nested));
        }
        payload
    }
}

fn is_blank(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::String(s) => s.is_empty(),
        _ => false,
    }
}

fn format_value(definition: &FieldDefinition, value: Json) -> Json {
    match definition.field_type {
        FieldType::Set => {
            let items = match value {
                Json::Array(items) => items,
                scalar => vec![scalar],
            };
            Json::Array(
                items
                    .into_iter()
                    .map(|item| resolve_label(definition, item))
                    .collect(),
            )
        }
        FieldType::Enum => resolve_label(definition, value),
        _ => value,
    }
}

fn resolve_label(definition: &FieldDefinition, value: Json) -> Json {
    if let Json::String(label) = &value {
        if let Some(id) = definition.option_id(label) {
            return Json::from(id);
        }
    }
    value
}
