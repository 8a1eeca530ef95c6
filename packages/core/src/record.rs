//! Adapted records and their lazy relations.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapter::RecordAdapter;
use crate::kind::ResourceKind;
use crate::{Error, Value};

/// Fetches single records by kind and id.
///
/// Implemented by the client on top of the transport; identifiers and
/// relation accessors call it on first access.
pub trait RecordSource: Send + Sync {
    fn find(&self, kind: ResourceKind, id: i64) -> Result<Record, Error>;
}

static NULL: Value = Value::Null;

type RelationMemo = BTreeMap<&'static str, Option<Arc<Record>>>;

/// A resource record: an ordered attribute store plus lazily resolved
/// relations.
///
/// Relation results are memoized per instance. Cloning a record copies its
/// attributes but starts with an empty memo.
pub struct Record {
    kind: ResourceKind,
    attributes: BTreeMap<String, Value>,
    source: Option<Arc<dyn RecordSource>>,
    relations: Mutex<RelationMemo>,
}

impl Record {
    pub fn new(
        kind: ResourceKind,
        attributes: BTreeMap<String, Value>,
        source: Option<Arc<dyn RecordSource>>,
    ) -> Self {
        Self {
            kind,
            attributes,
            source,
            relations: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn source(&self) -> Option<&Arc<dyn RecordSource>> {
        self.source.as_ref()
    }

    pub fn id(&self) -> Option<i64> {
        self.get_i64("id")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Set an attribute, forgetting any relation resolved through it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        self.forget_relations_through(&key);
        self.attributes.insert(key, value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.forget_relations_through(key);
        self.attributes.remove(key)
    }

    /// Merge attributes of `other` into this record, overwriting.
    pub fn merge(&mut self, other: BTreeMap<String, Value>) {
        for (key, value) in other {
            self.set(key, value);
        }
    }

    fn forget_relations_through(&mut self, key: &str) {
        let memo = self
            .relations
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for relation in self.kind.strategy().relations() {
            if relation.foreign_key == key {
                memo.remove(relation.name);
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Resolve a declared relation.
    ///
    /// The first call inspects the foreign key: an embedded map is adapted
    /// in place, an identifier is loaded through its shared slot, a bare id
    /// is fetched. The outcome is memoized, so later calls return the same
    /// `Arc` (or `None`) without fetching. Undeclared names return `None`.
    pub fn relation(&self, name: &str) -> Option<Arc<Record>> {
        let Some(relation) = self
            .kind
            .strategy()
            .relations()
            .iter()
            .find(|relation| relation.name == name)
        else {
            log::debug!("{} has no relation named {}", self.kind, name);
            return None;
        };

        let mut memo = self.relations.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(resolved) = memo.get(relation.name) {
            return resolved.clone();
        }

        let resolved = self.resolve(relation.foreign_key, relation.target);
        memo.insert(relation.name, resolved.clone());
        resolved
    }

    /// Whether a relation has already been resolved on this instance.
    pub fn is_relation_loaded(&self, name: &str) -> bool {
        self.relations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn resolve(&self, foreign_key: &str, target: ResourceKind) -> Option<Arc<Record>> {
        match self.get(foreign_key)? {
            Value::Null => None,
            Value::Map(embedded) => {
                let adapter = RecordAdapter::new(self.source.clone());
                Some(Arc::new(adapter.build(target, embedded.clone())))
            }
            Value::Ref(identifier) => identifier.record(),
            Value::Integer(id) => self.fetch(target, *id),
            other => {
                log::debug!("{}.{} is not a reference: {:?}", self.kind, foreign_key, other);
                None
            }
        }
    }

    fn fetch(&self, target: ResourceKind, id: i64) -> Option<Arc<Record>> {
        let source = self.source.as_ref()?;
        match source.find(target, id) {
            Ok(record) => Some(Arc::new(record)),
            Err(e) => {
                log::warn!("{} {} unavailable: {}", target, id, e);
                None
            }
        }
    }
}

impl Clone for Record {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.attributes.clone(), self.source.clone())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("kind", &self.kind)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.attributes == other.attributes
    }
}

/// Missing keys index to `Value::Null`.
impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.attributes.get(key).unwrap_or(&NULL)
    }
}
