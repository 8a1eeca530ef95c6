//! Field definitions and the per-kind definition cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::kind::ResourceKind;
use crate::Error;

/// How a field's values are typed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    /// Single choice among options.
    Enum,
    /// Multiple choice among options.
    Set,
    Monetary,
    /// Reference to an organization.
    Org,
    /// Reference to a person.
    Person,
    /// Reference to a user.
    User,
    Other(String),
}

impl FieldType {
    /// Kind of record a reference-typed field points to.
    pub fn reference_target(&self) -> Option<ResourceKind> {
        match self {
            FieldType::Org => Some(ResourceKind::Organization),
            FieldType::Person => Some(ResourceKind::Person),
            FieldType::User => Some(ResourceKind::User),
            _ => None,
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "varchar" | "varchar_auto" | "varchar_options" | "text" => FieldType::Text,
            "enum" => FieldType::Enum,
            "set" => FieldType::Set,
            "monetary" => FieldType::Monetary,
            "org" => FieldType::Org,
            "people" | "person" => FieldType::Person,
            "user" => FieldType::User,
            _ => FieldType::Other(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => "text".to_string(),
            FieldType::Enum => "enum".to_string(),
            FieldType::Set => "set".to_string(),
            FieldType::Monetary => "monetary".to_string(),
            FieldType::Org => "org".to_string(),
            FieldType::Person => "people".to_string(),
            FieldType::User => "user".to_string(),
            FieldType::Other(raw) => raw,
        }
    }
}

/// One choice of an `enum` or `set` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: i64,
    pub label: String,
}

/// Schema entry for one field of a resource kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Stable identifier; a 40-character hex hash for custom fields.
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            name: None,
            field_type,
            options: None,
        }
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Id of the option whose label is exactly `label`.
    pub fn option_id(&self, label: &str) -> Option<i64> {
        self.options
            .as_ref()?
            .iter()
            .find(|option| option.label == label)
            .map(|option| option.id)
    }
}

/// Bulk provider of field definitions.
pub trait FieldSource: Send + Sync {
    fn field_definitions_for(&self, kind: ResourceKind) -> Result<Vec<FieldDefinition>, Error>;
}

pub type FieldDefinitions = Arc<HashMap<String, FieldDefinition>>;

/// Field definitions per resource kind, fetched once per kind.
///
/// A kind counts as loaded after one fetch, even when it has no custom
/// fields. A failed fetch is cached as an empty set of definitions and only
/// [`clear`](Self::clear) or [`clear_kind`](Self::clear_kind) bring the
/// kind back to unloaded.
#[derive(Default)]
pub struct FieldCache {
    kinds: Mutex<HashMap<ResourceKind, FieldDefinitions>>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// All definitions for `kind`, fetching them on first use.
    ///
    /// The lock is held across the fetch so concurrent callers do not fetch
    /// the same kind twice. The call whose fetch fails gets the error; later
    /// calls get the empty set recorded in its place.
    pub fn definitions(
        &self,
        kind: ResourceKind,
        source: &dyn FieldSource,
    ) -> Result<FieldDefinitions, Error> {
        let mut kinds = self.kinds.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(definitions) = kinds.get(&kind) {
            return Ok(definitions.clone());
        }

        log::debug!("loading field definitions for {}", kind);
        let fetched = match source.field_definitions_for(kind) {
            Ok(fetched) => fetched,
            Err(e) => {
                log::warn!("no field definitions for {} until cleared: {}", kind, e);
                kinds.insert(kind, FieldDefinitions::default());
                return Err(e);
            }
        };
        let definitions: FieldDefinitions = Arc::new(
            fetched
                .into_iter()
                .map(|definition| (definition.key.clone(), definition))
                .collect(),
        );
        log::debug!("cached {} field definitions for {}", definitions.len(), kind);

        kinds.insert(kind, definitions.clone());
        Ok(definitions)
    }

    /// The definition for one key, fetching the kind's definitions on first use.
    pub fn definition(
        &self,
        kind: ResourceKind,
        key: &str,
        source: &dyn FieldSource,
    ) -> Result<Option<FieldDefinition>, Error> {
        Ok(self.definitions(kind, source)?.get(key).cloned())
    }

    /// Definitions for `kind` if already loaded. Never fetches.
    pub fn cached(&self, kind: ResourceKind) -> Option<FieldDefinitions> {
        self.kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        self.cached(kind).is_some()
    }

    pub fn clear(&self) {
        self.kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn clear_kind(&self, kind: ResourceKind) {
        self.kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
    }
}
