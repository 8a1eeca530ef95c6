//! In-memory record and field sources for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::adapter::RecordAdapter;
use crate::field_cache::{FieldDefinition, FieldSource};
use crate::kind::ResourceKind;
use crate::record::{Record, RecordSource};
use crate::Error;

#[derive(Default)]
pub struct StubSource {
    records: HashMap<(ResourceKind, i64), serde_json::Value>,
    fields: HashMap<ResourceKind, Vec<FieldDefinition>>,
    fail_fields: bool,
    find_calls: AtomicUsize,
    field_calls: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, kind: ResourceKind, id: i64, json: serde_json::Value) -> Self {
        self.records.insert((kind, id), json);
        self
    }

    pub fn with_fields(mut self, kind: ResourceKind, definitions: Vec<FieldDefinition>) -> Self {
        self.fields.insert(kind, definitions);
        self
    }

    pub fn failing_fields(mut self) -> Self {
        self.fail_fields = true;
        self
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.load(Ordering::SeqCst)
    }
}

impl RecordSource for StubSource {
    fn find(&self, kind: ResourceKind, id: i64) -> Result<Record, Error> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let json = self.records.get(&(kind, id)).cloned().ok_or(Error::Fetch {
            kind,
            id,
            message: "HTTP 404".to_string(),
        })?;
        RecordAdapter::new(None).adapt(kind, json)
    }
}

impl FieldSource for StubSource {
    fn field_definitions_for(&self, kind: ResourceKind) -> Result<Vec<FieldDefinition>, Error> {
        self.field_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fields {
            return Err(Error::FieldDefinitions {
                kind,
                message: "HTTP 500".to_string(),
            });
        }
        Ok(self.fields.get(&kind).cloned().unwrap_or_default())
    }
}
