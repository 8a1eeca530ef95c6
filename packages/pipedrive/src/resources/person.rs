use pipedrive_core::ResourceKind;
use pipedrive_http::Method;
use serde_json::Value as Json;

use super::{related, Deal, Followable, Organization, Resource, Searchable, User};
use crate::client::Client;
use crate::Error;

resource! {
    /// A contact person. Served by the V2 API.
    Person => Person
}

impl Person {
    pub fn organization(&self) -> Option<Organization> {
        related(self, "organization")
    }

    pub fn owner(&self) -> Option<User> {
        related(self, "owner")
    }

    pub fn user(&self) -> Option<User> {
        related(self, "user")
    }

    /// The person itself. V1 deal participants nested the person under
    /// `person`, so call sites wrote `participant.person()`.
    pub fn person(&self) -> &Self {
        self
    }

    pub fn deals(&self, client: &Client) -> Result<Vec<Deal>, Error> {
        let id = self.id().ok_or(Error::MissingId)?.to_string();
        Deal::all(client, &[("person_id", id.as_str())])
    }

    /// Merge another person into this one; returns the merged person data.
    pub fn merge_with(&self, client: &Client, options: Json) -> Result<Json, Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        let method = match ResourceKind::Person.api_version() {
            pipedrive_core::ApiVersion::V2 => Method::PATCH,
            pipedrive_core::ApiVersion::V1 => Method::PUT,
        };
        client.write_nested(method, ResourceKind::Person, id, "merge", options)
    }

    /// Exact-name lookup restricted to one organization, creating the
    /// person there when absent.
    pub fn find_or_create_in_organization(
        client: &Client,
        name: &str,
        org_id: i64,
        options: Json,
    ) -> Result<Self, Error> {
        let org = org_id.to_string();
        let mut options = match options {
            Json::Object(map) => map,
            Json::Null => serde_json::Map::new(),
            other => {
                return Err(Error::InvalidOptions {
                    message: format!("expected an object, got {}", other),
                })
            }
        };
        options.insert("org_id".to_string(), Json::from(org_id));

        client
            .find_or_create_by_name(
                ResourceKind::Person,
                name,
                &[("organization_id", org.as_str())],
                Json::Object(options),
            )
            .map(Self::from)
    }
}

impl Searchable for Person {}

impl Followable for Person {}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedrive_core::RecordAdapter;
    use serde_json::json;

    #[test]
    fn person_returns_itself() {
        let person = Person::from(
            RecordAdapter::default()
                .adapt(ResourceKind::Person, json!({"id": 2739, "name": "Vincent Test"}))
                .unwrap(),
        );

        assert!(std::ptr::eq(person.person(), &person));
        assert_eq!(person.person()["name"], "Vincent Test");
    }

    #[test]
    fn owner_id_is_aliased_and_wrapped() {
        let person = Person::from(
            RecordAdapter::default()
                .adapt(ResourceKind::Person, json!({"id": 1, "owner_id": 7, "org_id": 2}))
                .unwrap(),
        );

        assert_eq!(person["user_id"], 7);
        assert!(person["org_id"].as_identifier().is_some());
    }
}
