use pipedrive_core::ResourceKind;
use pipedrive_http::Method;
use serde_json::{json, Value as Json};

use super::{
    related, related_name, wrap_all, Activity, Followable, Organization, Person, Pipeline, Product,
    Resource, Stage, User,
};
use crate::client::Client;
use crate::Error;

resource! {
    /// A deal. Served by the V2 API.
    Deal => Deal
}

impl Deal {
    pub fn organization(&self) -> Option<Organization> {
        related(self, "organization")
    }

    pub fn person(&self) -> Option<Person> {
        related(self, "person")
    }

    /// The owner, through the legacy `user_id`.
    pub fn user(&self) -> Option<User> {
        related(self, "user")
    }

    pub fn owner(&self) -> Option<User> {
        related(self, "owner")
    }

    pub fn stage(&self) -> Option<Stage> {
        related(self, "stage")
    }

    pub fn pipeline(&self) -> Option<Pipeline> {
        related(self, "pipeline")
    }

    pub fn owner_name(&self) -> Option<String> {
        related_name(self, "user")
    }

    pub fn org_name(&self) -> Option<String> {
        related_name(self, "organization")
    }

    pub fn person_name(&self) -> Option<String> {
        related_name(self, "person")
    }

    pub fn deleted(&self) -> Option<bool> {
        self.get_bool("deleted")
    }

    /// Value weighted by win probability.
    ///
    /// Won deals count fully and lost deals count zero. Open deals need both
    /// a value and a probability.
    pub fn weighted_value(&self) -> Option<f64> {
        let value = self.get_f64("value")?;
        match self.get_str("status") {
            Some("won") => Some(value),
            Some("lost") => Some(0.0),
            _ => Some(value * self.get_f64("probability")? / 100.0),
        }
    }

    /// Value with currency symbol and thousands separators, e.g. `US$5,000`.
    pub fn formatted_value(&self) -> Option<String> {
        let value = self.get_f64("value")?;
        Some(format_money(value, self.get_str("currency").unwrap_or("")))
    }

    /// Activities attached to this deal.
    pub fn activities(&self, client: &Client) -> Result<Vec<Activity>, Error> {
        let id = self.id().ok_or(Error::MissingId)?.to_string();
        Activity::all(client, &[("deal_id", id.as_str())])
    }

    /// Persons participating in this deal.
    pub fn participants(&self, client: &Client) -> Result<Vec<Person>, Error> {
        let id = self.id().ok_or(Error::MissingId)?.to_string();
        Person::all(client, &[("deal_id", id.as_str())])
    }

    pub fn products(&self, client: &Client) -> Result<Vec<Product>, Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        Ok(wrap_all(client.list_nested(
            ResourceKind::Deal,
            id,
            "products",
            ResourceKind::Product,
            &[],
        )?))
    }

    /// Attach a product; returns the created attachment.
    pub fn add_product(&self, client: &Client, options: Json) -> Result<Json, Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        client.write_nested(Method::POST, ResourceKind::Deal, id, "products", options)
    }

    pub fn remove_product(&self, client: &Client, attachment_id: i64) -> Result<(), Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        client.delete_nested(
            ResourceKind::Deal,
            id,
            &format!("products/{}", attachment_id),
        )
    }

    pub fn add_participant(&self, client: &Client, person_id: i64) -> Result<Json, Error> {
        let id = self.id().ok_or(Error::MissingId)?;
        client.write_nested(
            Method::POST,
            ResourceKind::Deal,
            id,
            "participants",
            json!({"person_id": person_id}),
        )
    }
}

impl Followable for Deal {}

/// Format an amount the way Pipedrive displays it: currency symbol (or
/// code), thousands separators, cents only when non-zero.
pub fn format_money(value: f64, currency: &str) -> String {
    let prefix = match currency {
        "USD" => "US$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        "" => String::new(),
        code => format!("{} ", code),
    };
    let sign = if value < 0.0 { "-" } else { "" };

    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, fraction) = (cents / 100, cents % 100);
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction == 0 {
        format!("{}{}{}", sign, prefix, grouped)
    } else {
        format!("{}{}{}.{:02}", sign, prefix, grouped, fraction)
    }
}
