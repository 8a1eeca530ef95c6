//! Typed views over records.
//!
//! Each view wraps a [`Record`] of one kind and dereferences to it, so
//! attribute access, indexing and `relation()` work unchanged. Views add
//! named relation accessors and the V1 convenience methods of their kind.

use std::sync::Arc;

use pipedrive_core::{Record, ResourceKind};
use pipedrive_http::Method;
use serde_json::Value as Json;

use crate::client::{Client, Query};
use crate::Error;

macro_rules! resource {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(pipedrive_core::Record);

        impl $crate::resources::Resource for $name {
            const KIND: pipedrive_core::ResourceKind = pipedrive_core::ResourceKind::$kind;

            fn into_record(self) -> pipedrive_core::Record {
                self.0
            }
        }

        impl From<pipedrive_core::Record> for $name {
            fn from(record: pipedrive_core::Record) -> Self {
                Self(record)
            }
        }

        impl std::ops::Deref for $name {
            type Target = pipedrive_core::Record;

            fn deref(&self) -> &pipedrive_core::Record {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut pipedrive_core::Record {
                &mut self.0
            }
        }
    };
}

mod activity;
mod deal;
mod organization;
mod person;
mod product;
mod stage;

pub use activity::Activity;
pub use deal::{format_money, Deal};
pub use organization::Organization;
pub use person::Person;
pub use product::Product;
pub use stage::Stage;

/// CRUD for a typed view.
pub trait Resource: From<Record> + std::ops::Deref<Target = Record> + std::ops::DerefMut {
    const KIND: ResourceKind;

    fn into_record(self) -> Record;

    fn find(client: &Client, id: i64) -> Result<Self, Error> {
        client.find(Self::KIND, id).map(Self::from)
    }

    fn all(client: &Client, query: &Query) -> Result<Vec<Self>, Error> {
        Ok(wrap_all(client.all(Self::KIND, query)?))
    }

    fn all_pages(client: &Client, query: &Query) -> Result<Vec<Self>, Error> {
        Ok(wrap_all(client.all_pages(Self::KIND, query)?))
    }

    fn create(client: &Client, options: Json) -> Result<Self, Error> {
        client.create(Self::KIND, options).map(Self::from)
    }

    fn update(&mut self, client: &Client, options: Json) -> Result<(), Error> {
        client.update(self, options)
    }

    fn destroy(&self, client: &Client) -> Result<(), Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        client.destroy(Self::KIND, id)
    }
}

/// Exact-name lookup through the kind's search endpoint.
pub trait Searchable: Resource {
    fn search(client: &Client, query: &Query) -> Result<Json, Error> {
        client.search(Self::KIND, query)
    }

    fn find_by_name(client: &Client, name: &str, query: &Query) -> Result<Option<Self>, Error> {
        Ok(client
            .find_by_name(Self::KIND, name, query)?
            .map(Self::from))
    }

    fn find_or_create_by_name(client: &Client, name: &str, options: Json) -> Result<Self, Error> {
        client
            .find_or_create_by_name(Self::KIND, name, &[], options)
            .map(Self::from)
    }
}

/// Users following a record.
pub trait Followable: Resource {
    fn followers(&self, client: &Client) -> Result<Vec<User>, Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        Ok(wrap_all(client.list_nested(
            Self::KIND,
            id,
            "followers",
            ResourceKind::User,
            &[],
        )?))
    }

    fn add_follower(&self, client: &Client, options: Json) -> Result<Json, Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        client.write_nested(Method::POST, Self::KIND, id, "followers", options)
    }
}

pub(crate) fn wrap_all<R: From<Record>>(records: Vec<Record>) -> Vec<R> {
    records.into_iter().map(R::from).collect()
}

/// Typed view over the record behind a relation.
///
/// The record itself is memoized on `record`, so asking again never issues a
/// second request. Identifiers inside the view share their load state with
/// the memoized record.
pub(crate) fn related<R: Resource>(record: &Record, relation: &str) -> Option<R> {
    record
        .relation(relation)
        .map(|related| R::from(Record::clone(&related)))
}

/// Name of the record behind a relation.
pub(crate) fn related_name(record: &Record, relation: &str) -> Option<String> {
    record
        .relation(relation)
        .and_then(|related: Arc<Record>| related.get_str("name").map(str::to_string))
}

resource! {
    /// A sales pipeline.
    Pipeline => Pipeline
}

resource! {
    /// An account user. Served by the V1 API.
    User => User
}
