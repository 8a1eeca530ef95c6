use super::{related, Deal, Followable, Person, Resource, Searchable, User};
use crate::client::Client;
use crate::Error;

resource! {
    /// An organization. Served by the V2 API.
    ///
    /// The nested V2 address is exposed V1-style: `address` holds the
    /// formatted string, `address_<component>` each component and
    /// `address_data` the original map.
    Organization => Organization
}

impl Organization {
    pub fn owner(&self) -> Option<User> {
        related(self, "owner")
    }

    /// Same record as [`owner`](Self::owner).
    pub fn user(&self) -> Option<User> {
        related(self, "user")
    }

    pub fn address(&self) -> Option<&str> {
        self.get_str("address")
    }

    pub fn persons(&self, client: &Client) -> Result<Vec<Person>, Error> {
        let id = self.id().ok_or(Error::MissingId)?.to_string();
        Person::all(client, &[("org_id", id.as_str())])
    }

    pub fn deals(&self, client: &Client) -> Result<Vec<Deal>, Error> {
        let id = self.id().ok_or(Error::MissingId)?.to_string();
        Deal::all(client, &[("org_id", id.as_str())])
    }
}

impl Searchable for Organization {}

impl Followable for Organization {}
