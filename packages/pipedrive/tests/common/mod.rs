//! Canned Pipedrive payloads shared by the integration tests.

#![allow(dead_code)]

use pipedrive::{Client, Config};
use pipedrive_http::MockExecutor;
use serde_json::{json, Value};

pub const BASE: &str = "https://api.pipedrive.com";
pub const TOKEN: &str = "some-token";

/// Text field.
pub const NOTE: &str = "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2";
/// Monetary field.
pub const BUDGET: &str = "b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3";
/// Single-option field: Yes = 128, No = 129.
pub const APPROVED: &str = "c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4";
/// Multi-option field: Red = 41, Green = 42.
pub const COLORS: &str = "d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5";
/// Another text field.
pub const COMMENT: &str = "e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6";
/// User reference field.
pub const MANAGER: &str = "f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1";

pub fn v2(path: &str) -> String {
    format!("{}/api/v2{}", BASE, path)
}

pub fn v1(path: &str) -> String {
    format!("{}/v1{}", BASE, path)
}

pub fn client(executor: &MockExecutor) -> Client {
    Client::with_executor(Config::new(TOKEN), executor.clone()).unwrap()
}

pub fn deal_fields() -> Value {
    json!([
        {"id": 1, "key": "title", "name": "Title", "field_type": "varchar"},
        {"id": 12, "key": NOTE, "name": "Note", "field_type": "varchar"},
        {"id": 13, "key": BUDGET, "name": "Budget", "field_type": "monetary"},
        {
            "id": 14,
            "key": APPROVED,
            "name": "Approved",
            "field_type": "enum",
            "options": [{"id": 128, "label": "Yes"}, {"id": 129, "label": "No"}]
        },
        {
            "id": 15,
            "key": COLORS,
            "name": "Colors",
            "field_type": "set",
            "options": [{"id": 41, "label": "Red"}, {"id": 42, "label": "Green"}]
        },
        {"id": 16, "key": COMMENT, "name": "Comment", "field_type": "text"},
        {"id": 17, "key": MANAGER, "name": "Manager", "field_type": "user"}
    ])
}

pub fn deal() -> Value {
    json!({
        "id": 123,
        "title": "Big Sale",
        "value": 5000,
        "currency": "USD",
        "status": "open",
        "probability": 40,
        "org_id": 2,
        "person_id": 2739,
        "owner_id": 1746472,
        "stage_id": 1,
        "pipeline_id": 1,
        "is_deleted": false,
        "custom_fields": {
            NOTE: {"value": "Custom Value"},
            BUDGET: {"value": 2500, "currency": "EUR"},
            APPROVED: 128,
            MANAGER: 1746472
        }
    })
}

pub fn updated_deal() -> Value {
    json!({
        "id": 123,
        "title": "Updated Deal",
        "org_id": 2,
        "owner_id": 1746472,
        "custom_fields": {
            NOTE: {"value": "Updated Custom Value"},
            APPROVED: 129
        }
    })
}

pub fn organization() -> Value {
    json!({
        "id": 2,
        "name": "Office San Francisco",
        "owner_id": 1746472,
        "address": {
            "value": "460 Bush St, San Francisco, CA 94108, USA",
            "locality": "San Francisco",
            "country": "United States",
            "postal_code": "94108"
        }
    })
}

pub fn person() -> Value {
    json!({
        "id": 2739,
        "name": "Vincent Test",
        "org_id": 2,
        "owner_id": 1746472,
        "emails": [{"value": "vincent@example.com", "primary": true}]
    })
}

pub fn user() -> Value {
    json!({
        "id": 1746472,
        "name": "Vincent Jaouen",
        "email": "vincent.jaouen@example.com",
        "active_flag": true
    })
}

pub fn activity() -> Value {
    json!({
        "id": 455,
        "subject": "Call back",
        "type": "call",
        "due_date": "2017-10-04",
        "due_time": "11:00",
        "deal_id": 123,
        "org_id": 2,
        "person_id": 2739,
        "owner_id": 1746472
    })
}

/// An executor answering the lookups a deal's relations need.
pub fn account() -> MockExecutor {
    MockExecutor::new()
        .with_response(v1("/dealFields"), MockExecutor::data_response(deal_fields()))
        .with_response(v2("/deals/123"), MockExecutor::data_response(deal()))
        .with_response(v2("/organizations/2"), MockExecutor::data_response(organization()))
        .with_response(v2("/persons/2739"), MockExecutor::data_response(person()))
        .with_response(v2("/activities/455"), MockExecutor::data_response(activity()))
        .with_response(v1("/users/1746472"), MockExecutor::data_response(user()))
}
