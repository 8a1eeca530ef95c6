use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{related, Deal, Organization, Person, User};

resource! {
    /// A calendar activity. Served by the V2 API.
    Activity => Activity
}

impl Activity {
    pub fn organization(&self) -> Option<Organization> {
        related(self, "organization")
    }

    pub fn person(&self) -> Option<Person> {
        related(self, "person")
    }

    pub fn deal(&self) -> Option<Deal> {
        related(self, "deal")
    }

    pub fn user(&self) -> Option<User> {
        related(self, "user")
    }

    /// `due_date` combined with `due_time`; midnight when no time is set.
    pub fn date(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.get_str("due_date")?, "%Y-%m-%d").ok()?;
        let time = match self.get_str("due_time") {
            None | Some("") => NaiveTime::MIN,
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                .ok()?,
        };
        Some(date.and_time(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedrive_core::{RecordAdapter, ResourceKind};
    use serde_json::json;

    fn activity(json: serde_json::Value) -> Activity {
        Activity::from(
            RecordAdapter::default()
                .adapt(ResourceKind::Activity, json)
                .unwrap(),
        )
    }

    #[test]
    fn date_combines_due_date_and_time() {
        let a = activity(json!({"due_date": "2017-10-04", "due_time": "11:00"}));
        assert_eq!(
            a.date().map(|d| d.format("%Y/%m/%d %H:%M").to_string()),
            Some("2017/10/04 11:00".to_string())
        );

        let a = activity(json!({"due_date": "2017-05-21", "due_time": "12:30:00"}));
        assert_eq!(
            a.date().map(|d| d.format("%H:%M").to_string()),
            Some("12:30".to_string())
        );

        let a = activity(json!({"due_date": "2017-05-21", "due_time": ""}));
        assert_eq!(
            a.date().map(|d| d.format("%H:%M").to_string()),
            Some("00:00".to_string())
        );
    }

    #[test]
    fn date_requires_a_due_date() {
        assert!(activity(json!({"due_time": "11:00"})).date().is_none());
        assert!(activity(json!({"due_date": "soon"})).date().is_none());
    }

    #[test]
    fn foreign_keys_are_wrapped() {
        let a = activity(json!({"id": 455, "org_id": 2, "deal_id": 3, "owner_id": 5}));

        assert!(a["org_id"].as_identifier().is_some());
        assert!(a["deal_id"].as_identifier().is_some());
        assert_eq!(a["user_id"], 5);
    }
}
