//! Builds records from decoded API payloads.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::custom_fields::{self, CUSTOM_FIELDS_KEY};
use crate::field_cache::FieldCache;
use crate::kind::ResourceKind;
use crate::record::{Record, RecordSource};
use crate::{Error, Identifier, Value};

/// Turns raw payloads into [`Record`]s shaped the way V1 call sites expect.
///
/// Construction order:
///
/// 1. Unwrap a `data` envelope, merging `additional_data` and V1
///    `related_objects` without overwriting
/// 2. Flatten `custom_fields` into top-level attributes (standard fields win
///    on collision; the bundle itself is kept)
/// 3. Run the kind's `derive_fields` hook
/// 4. Wrap bare-integer foreign keys in [`Identifier`]s, including
///    reference-typed custom fields when their definitions are cached
/// 5. Copy current field names to absent legacy aliases
///
/// Never fetches anything.
#[derive(Clone, Default)]
pub struct RecordAdapter {
    source: Option<Arc<dyn RecordSource>>,
    fields: Option<Arc<FieldCache>>,
}

impl RecordAdapter {
    pub fn new(source: Option<Arc<dyn RecordSource>>) -> Self {
        Self {
            source,
            fields: None,
        }
    }

    /// Use cached field definitions to recognize reference-typed custom fields.
    pub fn with_field_cache(mut self, fields: Arc<FieldCache>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Adapt a single-record payload, with or without a `data` envelope.
    pub fn adapt(&self, kind: ResourceKind, payload: serde_json::Value) -> Result<Record, Error> {
        let serde_json::Value::Object(mut payload) = payload else {
            return Err(Error::invalid_payload(format!(
                "expected a {} object",
                kind
            )));
        };

        let attributes = match payload.remove("data") {
            None => into_map(serde_json::Value::Object(payload)),
            Some(data @ serde_json::Value::Object(_)) => {
                let mut attributes = into_map(data);
                if let Some(additional) = payload.remove("additional_data") {
                    merge_absent(&mut attributes, into_map(additional));
                }
                if let Some(related) = payload.remove("related_objects") {
                    merge_absent(&mut attributes, related_objects(related));
                }
                attributes
            }
            Some(other) => {
                return Err(Error::invalid_payload(format!(
                    "{} data is not an object: {}",
                    kind, other
                )))
            }
        };

        Ok(self.build(kind, attributes))
    }

    /// Adapt every element of a list payload's `data` array.
    ///
    /// A missing or null `data` yields an empty list.
    pub fn adapt_list(
        &self,
        kind: ResourceKind,
        payload: &serde_json::Value,
    ) -> Result<Vec<Record>, Error> {
        match payload.get("data") {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| self.adapt(kind, item.clone()))
                .collect(),
            Some(other) => Err(Error::invalid_payload(format!(
                "{} list data is not an array: {}",
                kind, other
            ))),
        }
    }

    /// Build a record from attributes that are already unwrapped.
    pub fn build(&self, kind: ResourceKind, mut attributes: BTreeMap<String, Value>) -> Record {
        let strategy = kind.strategy();

        if let Some(Value::Map(bundle)) = attributes.get(CUSTOM_FIELDS_KEY) {
            let flat = custom_fields::flatten(bundle);
            for (key, value) in flat {
                if attributes.contains_key(&key) {
                    log::debug!("{} custom field {} shadowed by standard field", kind, key);
                    continue;
                }
                attributes.insert(key, value);
            }
        }

        strategy.derive_fields(&mut attributes);

        for foreign_key in strategy.foreign_keys() {
            self.wrap(&mut attributes, foreign_key.field, foreign_key.target);
        }
        if let Some(definitions) = self.fields.as_ref().and_then(|f| f.cached(kind)) {
            for definition in definitions.values() {
                if let Some(target) = definition.field_type.reference_target() {
                    self.wrap(&mut attributes, &definition.key, target);
                }
            }
        }

        for alias in strategy.aliases() {
            if attributes.contains_key(alias.legacy) {
                continue;
            }
            if let Some(value) = attributes.get(alias.current).cloned() {
                attributes.insert(alias.legacy.to_string(), value);
            }
        }

        Record::new(kind, attributes, self.source.clone())
    }

    fn wrap(&self, attributes: &mut BTreeMap<String, Value>, field: &str, target: ResourceKind) {
        if let Some(value) = attributes.get_mut(field) {
            if let Value::Integer(id) = *value {
                *value = Value::Ref(Identifier::new(id, target, self.source.clone()));
            }
        }
    }
}

fn into_map(json: serde_json::Value) -> BTreeMap<String, Value> {
    match Value::from_json(json) {
        Value::Map(map) => map,
        _ => BTreeMap::new(),
    }
}

fn merge_absent(attributes: &mut BTreeMap<String, Value>, extra: BTreeMap<String, Value>) {
    for (key, value) in extra {
        attributes.entry(key).or_insert(value);
    }
}

/// `{"organization": {"2": {...}}}` becomes `{"organization": {...}}` for
/// every known kind, keeping the first object of each.
fn related_objects(related: serde_json::Value) -> BTreeMap<String, Value> {
    let serde_json::Value::Object(related) = related else {
        return BTreeMap::new();
    };

    related
        .into_iter()
        .filter(|(name, _)| ResourceKind::from_name(name).is_some())
        .filter_map(|(name, by_id)| match by_id {
            serde_json::Value::Object(by_id) => by_id
                .into_iter()
                .next()
                .map(|(_, object)| (name, Value::from_json(object))),
            _ => None,
        })
        .collect()
}
