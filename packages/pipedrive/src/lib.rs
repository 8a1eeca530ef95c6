//! # pipedrive
//!
//! Pipedrive client that talks to the V2 API where Pipedrive offers it and
//! hands back records in the V1 shape existing callers were written against.
//!
//! - custom fields arrive flattened to top-level 40-hex keys and are nested
//!   (with option labels resolved to ids) on the way out
//! - foreign keys like `org_id` compare as integers but load the related
//!   record on first attribute access
//! - renamed V2 attributes keep their V1 names (`user_id`, `active_flag`, ...)
//!
//! ```ignore
//! use pipedrive::{Client, Config, Deal, Resource};
//!
//! let client = Client::new(Config::from_env()?)?;
//! let deal = Deal::find(&client, 42)?;
//!
//! assert_eq!(deal["org_id"], 7);
//! println!("{:?}", deal.org_name());
//! ```

mod client;
pub mod config;
mod error;
pub mod resources;

pub use client::{Client, Query};
pub use config::Config;
pub use error::Error;
pub use resources::{
    format_money, Activity, Deal, Followable, Organization, Person, Pipeline, Product, Resource,
    Searchable, Stage, User,
};

pub use pipedrive_core::{
    ApiVersion, FieldCache, FieldDefinition, FieldOption, FieldType, Identifier, Record,
    RecordAdapter, ResourceKind, Value,
};
