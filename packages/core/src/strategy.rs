//! Per-kind customization.
//!
//! Each resource kind declares which fields are foreign keys, which legacy
//! names alias newer fields, which relation accessors it offers, and how it
//! re-derives or rewrites fields. Every hook has a no-op default.

use std::collections::BTreeMap;

use crate::kind::ResourceKind;
use crate::Value;

/// A field holding the id of a record of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub field: &'static str,
    pub target: ResourceKind,
}

/// A legacy field name that mirrors a newer one when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub current: &'static str,
    pub legacy: &'static str,
}

/// A named, memoized accessor resolving a foreign key to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    pub foreign_key: &'static str,
    pub target: ResourceKind,
}

const fn fk(field: &'static str, target: ResourceKind) -> ForeignKey {
    ForeignKey { field, target }
}

const fn alias(current: &'static str, legacy: &'static str) -> Alias {
    Alias { current, legacy }
}

const fn relation(name: &'static str, foreign_key: &'static str, target: ResourceKind) -> Relation {
    Relation {
        name,
        foreign_key,
        target,
    }
}

pub trait ResourceStrategy: Send + Sync {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        &[]
    }

    fn aliases(&self) -> &'static [Alias] {
        &[]
    }

    fn relations(&self) -> &'static [Relation] {
        &[]
    }

    /// Re-derive fields after custom fields are flattened and before
    /// foreign keys are wrapped. May overwrite what the payload carried.
    fn derive_fields(&self, _attributes: &mut BTreeMap<String, Value>) {}

    /// Rewrite outgoing create/update options before they are encoded.
    fn transform_write(&self, _options: &mut serde_json::Map<String, serde_json::Value>) {}
}

/// Renames a legacy `user_id` to V2's `owner_id` on the way out.
fn rename_user_to_owner(options: &mut serde_json::Map<String, serde_json::Value>) {
    if options.contains_key("owner_id") {
        return;
    }
    if let Some(user_id) = options.remove("user_id") {
        options.insert("owner_id".to_string(), user_id);
    }
}

pub struct DefaultStrategy;

impl ResourceStrategy for DefaultStrategy {}

pub struct DealStrategy;

impl ResourceStrategy for DealStrategy {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        const KEYS: &[ForeignKey] = &[
            fk("org_id", ResourceKind::Organization),
            fk("person_id", ResourceKind::Person),
            fk("owner_id", ResourceKind::User),
            fk("stage_id", ResourceKind::Stage),
            fk("pipeline_id", ResourceKind::Pipeline),
        ];
        KEYS
    }

    fn aliases(&self) -> &'static [Alias] {
        const ALIASES: &[Alias] = &[alias("owner_id", "user_id"), alias("is_deleted", "deleted")];
        ALIASES
    }

    fn relations(&self) -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            relation("organization", "org_id", ResourceKind::Organization),
            relation("person", "person_id", ResourceKind::Person),
            relation("user", "user_id", ResourceKind::User),
            relation("owner", "owner_id", ResourceKind::User),
            relation("stage", "stage_id", ResourceKind::Stage),
            relation("pipeline", "pipeline_id", ResourceKind::Pipeline),
        ];
        RELATIONS
    }

    fn transform_write(&self, options: &mut serde_json::Map<String, serde_json::Value>) {
        rename_user_to_owner(options);
    }
}

pub struct PersonStrategy;

impl ResourceStrategy for PersonStrategy {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        const KEYS: &[ForeignKey] = &[
            fk("org_id", ResourceKind::Organization),
            fk("owner_id", ResourceKind::User),
        ];
        KEYS
    }

    fn aliases(&self) -> &'static [Alias] {
        const ALIASES: &[Alias] = &[alias("owner_id", "user_id")];
        ALIASES
    }

    fn relations(&self) -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            relation("organization", "org_id", ResourceKind::Organization),
            relation("owner", "owner_id", ResourceKind::User),
            relation("user", "owner_id", ResourceKind::User),
        ];
        RELATIONS
    }

    fn transform_write(&self, options: &mut serde_json::Map<String, serde_json::Value>) {
        rename_user_to_owner(options);
    }
}

pub struct OrganizationStrategy;

impl ResourceStrategy for OrganizationStrategy {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        const KEYS: &[ForeignKey] = &[fk("owner_id", ResourceKind::User)];
        KEYS
    }

    fn aliases(&self) -> &'static [Alias] {
        const ALIASES: &[Alias] = &[alias("owner_id", "user_id")];
        ALIASES
    }

    fn relations(&self) -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            relation("owner", "owner_id", ResourceKind::User),
            relation("user", "owner_id", ResourceKind::User),
        ];
        RELATIONS
    }

    /// V2 nests the address; V1 exposed `address` as the formatted string
    /// and every component as `address_<component>`.
    fn derive_fields(&self, attributes: &mut BTreeMap<String, Value>) {
        let Some(Value::Map(address)) = attributes.get("address").cloned() else {
            return;
        };

        for (component, value) in &address {
            if component == "value" {
                continue;
            }
            attributes.insert(format!("address_{}", component), value.clone());
        }
        attributes.insert(
            "address".to_string(),
            address.get("value").cloned().unwrap_or_default(),
        );
        attributes.insert("address_data".to_string(), Value::Map(address));
    }

    fn transform_write(&self, options: &mut serde_json::Map<String, serde_json::Value>) {
        rename_user_to_owner(options);
    }
}

pub struct ProductStrategy;

impl ResourceStrategy for ProductStrategy {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        const KEYS: &[ForeignKey] = &[fk("owner_id", ResourceKind::User)];
        KEYS
    }

    fn aliases(&self) -> &'static [Alias] {
        const ALIASES: &[Alias] = &[
            alias("owner_id", "user_id"),
            alias("is_linkable", "selectable"),
        ];
        ALIASES
    }

    fn relations(&self) -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            relation("owner", "owner_id", ResourceKind::User),
            relation("user", "owner_id", ResourceKind::User),
        ];
        RELATIONS
    }

    fn derive_fields(&self, attributes: &mut BTreeMap<String, Value>) {
        if attributes.contains_key("active_flag") {
            return;
        }
        if let Some(deleted) = attributes.get("is_deleted").and_then(Value::as_bool) {
            attributes.insert("active_flag".to_string(), Value::Bool(!deleted));
        }
    }

    fn transform_write(&self, options: &mut serde_json::Map<String, serde_json::Value>) {
        rename_user_to_owner(options);
    }
}

pub struct ActivityStrategy;

impl ResourceStrategy for ActivityStrategy {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        const KEYS: &[ForeignKey] = &[
            fk("org_id", ResourceKind::Organization),
            fk("person_id", ResourceKind::Person),
            fk("deal_id", ResourceKind::Deal),
            fk("owner_id", ResourceKind::User),
        ];
        KEYS
    }

    fn aliases(&self) -> &'static [Alias] {
        const ALIASES: &[Alias] = &[alias("owner_id", "user_id")];
        ALIASES
    }

    fn relations(&self) -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            relation("organization", "org_id", ResourceKind::Organization),
            relation("person", "person_id", ResourceKind::Person),
            relation("deal", "deal_id", ResourceKind::Deal),
            relation("user", "user_id", ResourceKind::User),
        ];
        RELATIONS
    }

    fn transform_write(&self, options: &mut serde_json::Map<String, serde_json::Value>) {
        rename_user_to_owner(options);
    }
}

pub struct StageStrategy;

impl ResourceStrategy for StageStrategy {
    fn foreign_keys(&self) -> &'static [ForeignKey] {
        const KEYS: &[ForeignKey] = &[fk("pipeline_id", ResourceKind::Pipeline)];
        KEYS
    }

    fn relations(&self) -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[relation(
            "pipeline",
            "pipeline_id",
            ResourceKind::Pipeline,
        )];
        RELATIONS
    }
}
