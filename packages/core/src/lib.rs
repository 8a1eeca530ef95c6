//! Pipedrive record adaptation core
//!
//! Presents V2 API payloads in the shape V1 call sites were written against:
//! - `Record`: ordered attribute store with memoized lazy relations
//! - `Identifier`: foreign-key id that loads its record on demand
//! - `custom_fields`: flatten on read, nest and resolve option labels on write
//! - `FieldCache`: per-kind field definitions, fetched once
//! - `RecordAdapter`: payload to record construction
//!
//! Nothing here talks to the network. Records and field definitions are
//! fetched through the [`RecordSource`] and [`FieldSource`] traits.
//!
//! # Example
//!
//! ```rust
//! use pipedrive_core::{RecordAdapter, ResourceKind};
//! use serde_json::json;
//!
//! let deal = RecordAdapter::default()
//!     .adapt(ResourceKind::Deal, json!({"id": 1, "org_id": 2, "owner_id": 5}))?;
//!
//! assert_eq!(deal["org_id"], 2);
//! assert_eq!(deal["user_id"], 5);
//! # Ok::<(), pipedrive_core::Error>(())
//! ```

mod adapter;
pub mod custom_fields;
mod error;
mod field_cache;
mod identifier;
mod kind;
mod record;
pub mod strategy;
mod value;

#[cfg(test)]
mod testing;

pub use adapter::RecordAdapter;
pub use custom_fields::{is_custom_field_key, CustomFieldWriter};
pub use error::Error;
pub use field_cache::{
    FieldCache, FieldDefinition, FieldDefinitions, FieldOption, FieldSource, FieldType,
};
pub use identifier::Identifier;
pub use kind::{ApiVersion, ResourceKind};
pub use record::{Record, RecordSource};
pub use strategy::ResourceStrategy;
pub use value::Value;
