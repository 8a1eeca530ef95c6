//! Dual-mode identifiers.
//!
//! V1 payloads embedded related objects (`"org_id": {"value": 2, "name": ...}`),
//! V2 payloads only carry the id (`"org_id": 2`). An [`Identifier`] is the
//! bridge: it compares, orders, prints and does arithmetic as the bare id,
//! and loads the referenced record the first time a property beyond the id
//! is asked for.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Sub};
use std::sync::{Arc, OnceLock};

use crate::kind::ResourceKind;
use crate::record::{Record, RecordSource};
use crate::{Error, Value};

/// A foreign-key id that doubles as a lazy handle on the record it names.
///
/// Clones share the load slot: aliasing `owner_id` to `user_id` yields two
/// values that fetch the owner at most once between them.
///
/// # Example
///
/// ```rust
/// use pipedrive_core::{Identifier, ResourceKind};
///
/// let org_id = Identifier::detached(2, ResourceKind::Organization);
/// assert_eq!(org_id, 2);
/// assert_eq!(&org_id + 1, 3);
/// assert_eq!(org_id.get("value").and_then(|v| v.as_i64()), Some(2));
/// // No source attached, so anything beyond the id is absent.
/// assert!(org_id.get("name").is_none());
/// ```
#[derive(Clone)]
pub struct Identifier {
    id: i64,
    target: ResourceKind,
    slot: Arc<LoadSlot>,
}

struct LoadSlot {
    source: Option<Arc<dyn RecordSource>>,
    /// Unset until the first load attempt; `Some(None)` records a failure.
    loaded: OnceLock<Option<Arc<Record>>>,
}

/// Integer operations an identifier answers without loading.
const INTEGER_CAPABILITIES: &[&str] = &["to_i", "to_s", "abs", "zero?", "succ", "pred"];

impl Identifier {
    pub fn new(id: i64, target: ResourceKind, source: Option<Arc<dyn RecordSource>>) -> Self {
        Self {
            id,
            target,
            slot: Arc::new(LoadSlot {
                source,
                loaded: OnceLock::new(),
            }),
        }
    }

    /// An identifier with no way to load its record.
    pub fn detached(id: i64, target: ResourceKind) -> Self {
        Self::new(id, target, None)
    }

    pub fn as_integer(&self) -> i64 {
        self.id
    }

    pub fn as_string(&self) -> String {
        self.id.to_string()
    }

    pub fn target(&self) -> ResourceKind {
        self.target
    }

    /// Whether a load has been attempted, successful or not.
    pub fn is_loaded(&self) -> bool {
        self.slot.loaded.get().is_some()
    }

    /// The referenced record, loading it on first call.
    ///
    /// A failed load is remembered: later calls return `None` without
    /// touching the source again.
    pub fn record(&self) -> Option<Arc<Record>> {
        self.slot.loaded.get_or_init(|| self.load()).clone()
    }

    fn load(&self) -> Option<Arc<Record>> {
        let Some(source) = &self.slot.source else {
            log::debug!("{} {} has no record source", self.target, self.id);
            return None;
        };

        log::debug!("loading {} {}", self.target, self.id);
        match source.find(self.target, self.id) {
            Ok(record) => Some(Arc::new(record)),
            Err(e) => {
                log::warn!("{} {} unavailable: {}", self.target, self.id, e);
                None
            }
        }
    }

    /// V1-style indexed access.
    ///
    /// `"id"` and `"value"` answer with the id itself. Any other key loads
    /// the record and returns its attribute, or `None` when the load failed
    /// or the attribute is missing.
    pub fn get(&self, key: &str) -> Option<Value> {
        if key == "id" || key == "value" {
            return Some(Value::Integer(self.id));
        }
        self.record()?.get(key).cloned()
    }

    /// Chained [`get`](Self::get) through nested maps and identifiers.
    pub fn dig(&self, path: &[&str]) -> Option<Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.get(first)?;
        for key in rest {
            current = match current {
                Value::Map(map) => map.get(*key)?.clone(),
                Value::Ref(identifier) => identifier.get(key)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Named operation lookup.
    ///
    /// Integer operations are answered from the id; anything else falls
    /// through to the loaded record's attribute of that name.
    pub fn attribute(&self, name: &str) -> Result<Value, Error> {
        if INTEGER_CAPABILITIES.contains(&name) {
            let checked = |result: Option<i64>| {
                result.map(Value::Integer).ok_or_else(|| Error::Overflow {
                    name: name.to_string(),
                    id: self.id,
                    target: self.target,
                })
            };
            return match name {
                "to_s" => Ok(Value::String(self.as_string())),
                "abs" => checked(self.id.checked_abs()),
                "zero?" => Ok(Value::Bool(self.id == 0)),
                "succ" => checked(self.id.checked_add(1)),
                "pred" => checked(self.id.checked_sub(1)),
                _ => Ok(Value::Integer(self.id)),
            };
        }

        self.record()
            .and_then(|record| record.get(name).cloned())
            .ok_or_else(|| Error::Unsupported {
                name: name.to_string(),
                id: self.id,
                target: self.target,
            })
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq<i64> for Identifier {
    fn eq(&self, other: &i64) -> bool {
        self.id == *other
    }
}

impl PartialEq<Identifier> for i64 {
    fn eq(&self, other: &Identifier) -> bool {
        *self == other.id
    }
}

/// Matches an embedded V1 object by its `id` entry.
impl PartialEq<BTreeMap<String, Value>> for Identifier {
    fn eq(&self, other: &BTreeMap<String, Value>) -> bool {
        other
            .get("id")
            .and_then(Value::as_i64)
            .is_some_and(|id| id == self.id)
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd<i64> for Identifier {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.id.cmp(other))
    }
}

impl PartialOrd<Identifier> for i64 {
    fn partial_cmp(&self, other: &Identifier) -> Option<Ordering> {
        Some(self.cmp(&other.id))
    }
}

impl From<&Identifier> for i64 {
    fn from(identifier: &Identifier) -> Self {
        identifier.id
    }
}

// Operators wrap at the `i64` bounds; `attribute` reports overflow instead.
macro_rules! id_arithmetic {
    ($trait:ident, $method:ident, $wrapping:ident) => {
        impl $trait<i64> for &Identifier {
            type Output = i64;
            fn $method(self, rhs: i64) -> i64 {
                self.id.$wrapping(rhs)
            }
        }

        impl $trait<i64> for Identifier {
            type Output = i64;
            fn $method(self, rhs: i64) -> i64 {
                self.id.$wrapping(rhs)
            }
        }

        impl $trait<&Identifier> for i64 {
            type Output = i64;
            fn $method(self, rhs: &Identifier) -> i64 {
                self.$wrapping(rhs.id)
            }
        }
    };
}

id_arithmetic!(Add, add, wrapping_add);
id_arithmetic!(Sub, sub, wrapping_sub);
id_arithmetic!(Mul, mul, wrapping_mul);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubSource;
    use serde_json::json;

    fn org_source() -> Arc<StubSource> {
        Arc::new(StubSource::new().with_record(
            ResourceKind::Organization,
            2,
            json!({"id": 2, "name": "Office San Francisco", "address": {"value": "66 Mint St"}}),
        ))
    }

    fn org_id(source: &Arc<StubSource>) -> Identifier {
        Identifier::new(2, ResourceKind::Organization, Some(source.clone()))
    }

    #[test]
    fn id_keys_never_fetch() {
        let source = org_source();
        let identifier = org_id(&source);

        assert_eq!(identifier.get("value"), Some(Value::Integer(2)));
        assert_eq!(identifier.get("id"), Some(Value::Integer(2)));
        assert_eq!(source.find_calls(), 0);
        assert!(!identifier.is_loaded());
    }

    #[test]
    fn other_keys_fetch_exactly_once() {
        let source = org_source();
        let identifier = org_id(&source);

        assert_eq!(
            identifier.get("name"),
            Some(Value::from("Office San Francisco"))
        );
        assert_eq!(
            identifier.get("name"),
            Some(Value::from("Office San Francisco"))
        );
        assert_eq!(identifier.get("missing"), None);
        assert_eq!(source.find_calls(), 1);
    }

    #[test]
    fn integer_view_is_stable_across_loading() {
        let source = org_source();
        let identifier = org_id(&source);

        assert_eq!(identifier.as_integer(), 2);
        assert_eq!(identifier, 2);
        identifier.get("name");
        assert_eq!(identifier.as_integer(), 2);
        assert_eq!(identifier, 2);
        assert_eq!(identifier.as_string(), "2");
    }

    #[test]
    fn failed_load_is_cached_as_absent() {
        let source = Arc::new(StubSource::new());
        let identifier = Identifier::new(5, ResourceKind::Person, Some(source.clone()));

        assert_eq!(identifier.get("name"), None);
        assert_eq!(identifier.get("email"), None);
        assert!(identifier.record().is_none());
        assert_eq!(source.find_calls(), 1);
        assert_eq!(identifier, 5);
    }

    #[test]
    fn clones_share_the_load() {
        let source = org_source();
        let identifier = org_id(&source);
        let alias = identifier.clone();

        identifier.get("name");
        assert!(alias.is_loaded());
        alias.get("name");
        assert_eq!(source.find_calls(), 1);
    }

    #[test]
    fn comparison_and_arithmetic_use_the_id() {
        let identifier = Identifier::detached(2, ResourceKind::Organization);

        assert!(identifier > 1);
        assert!(identifier < 3);
        assert!(identifier >= 2);
        assert!(identifier <= 2);
        assert!(identifier != 3);
        assert_eq!(&identifier + 1, 3);
        assert_eq!(&identifier - 1, 1);
        assert_eq!(&identifier * 2, 4);
        assert_eq!(5 + &identifier, 7);
        assert_eq!(identifier.to_string(), "2");
        assert_eq!(i64::from(&identifier), 2);
    }

    #[test]
    fn equality_with_embedded_objects() {
        let identifier = Identifier::detached(2, ResourceKind::Organization);
        let mut embedded = BTreeMap::new();
        embedded.insert("id".to_string(), Value::Integer(2));
        assert!(identifier == embedded);

        embedded.insert("id".to_string(), Value::Integer(3));
        assert!(identifier != embedded);
        assert!(identifier != BTreeMap::<String, Value>::new());
    }

    #[test]
    fn identifiers_hash_by_id() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Identifier::detached(2, ResourceKind::Organization));
        assert!(set.contains(&Identifier::detached(2, ResourceKind::Organization)));
    }

    #[test]
    fn dig_walks_into_loaded_maps() {
        let source = org_source();
        let identifier = org_id(&source);

        assert_eq!(
            identifier.dig(&["name"]),
            Some(Value::from("Office San Francisco"))
        );
        assert_eq!(
            identifier.dig(&["address", "value"]),
            Some(Value::from("66 Mint St"))
        );
        assert_eq!(identifier.dig(&["name", "nested"]), None);
        assert_eq!(identifier.dig(&[]), None);
    }

    #[test]
    fn attribute_prefers_integer_capabilities() {
        let source = org_source();
        let identifier = org_id(&source);

        assert_eq!(identifier.attribute("to_i").unwrap(), Value::Integer(2));
        assert_eq!(identifier.attribute("succ").unwrap(), Value::Integer(3));
        assert_eq!(identifier.attribute("zero?").unwrap(), Value::Bool(false));
        assert_eq!(source.find_calls(), 0);

        assert_eq!(
            identifier.attribute("name").unwrap(),
            Value::from("Office San Francisco")
        );
        assert!(matches!(
            identifier.attribute("frobnicate"),
            Err(Error::Unsupported { id: 2, .. })
        ));
    }

    #[test]
    fn integer_operations_at_the_bounds_do_not_panic() {
        let max = Identifier::detached(i64::MAX, ResourceKind::Deal);
        let min = Identifier::detached(i64::MIN, ResourceKind::Deal);

        assert!(matches!(
            max.attribute("succ"),
            Err(Error::Overflow { id: i64::MAX, .. })
        ));
        assert!(matches!(min.attribute("pred"), Err(Error::Overflow { .. })));
        assert!(matches!(min.attribute("abs"), Err(Error::Overflow { .. })));
        assert_eq!(max.attribute("pred").unwrap(), Value::Integer(i64::MAX - 1));

        assert_eq!(&max + 1, i64::MIN);
        assert_eq!(&min - 1, i64::MAX);
        assert_eq!(&max * 2, -2);
        assert_eq!(1 + &max, i64::MIN);
    }

    #[test]
    fn detached_identifier_never_loads() {
        let identifier = Identifier::detached(1, ResourceKind::User);
        assert!(identifier.record().is_none());
        assert!(identifier.is_loaded());
        assert!(identifier.attribute("name").is_err());
    }
}
