//! Blocking Pipedrive client.
//!
//! Maps record operations onto the transport:
//! - V2 kinds live under `/api/v2` and authenticate with the `x-api-token` header
//! - V1 kinds live under `/v1` and authenticate with the `api_token` query parameter
//! - V2 writes send JSON with custom fields nested; V1 writes send form bodies
//!
//! Every payload coming back goes through [`RecordAdapter`], so callers get
//! records with flattened custom fields, lazy foreign keys and legacy
//! aliases.

use std::sync::{Arc, Weak};

use pipedrive_core::custom_fields::{is_custom_field_key, CUSTOM_FIELDS_KEY};
use pipedrive_core::{
    ApiVersion, CustomFieldWriter, Error as CoreError, FieldCache, FieldDefinition,
    FieldDefinitions, FieldSource, Record, RecordAdapter, RecordSource, ResourceKind,
};
use pipedrive_http::{Body, HttpExecutor, HttpRequest, HttpResponse, Method, ReqwestExecutor};
use serde_json::{json, Map, Value as Json};
use url::Url;

use crate::config::Config;
use crate::Error;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const FIELD_PAGE_LIMIT: &str = "500";

/// Query parameters as name/value pairs. Later pairs win over earlier ones.
pub type Query<'a> = [(&'a str, &'a str)];

/// Handle on one Pipedrive account.
///
/// Cheap to clone; clones share the transport and the field definition
/// cache. Records handed out keep the client alive for lazy loads.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    base_url: Url,
    executor: Box<dyn HttpExecutor>,
    fields: Arc<FieldCache>,
    this: Weak<Inner>,
}

impl Client {
    /// Create a client backed by reqwest.
    pub fn new(config: Config) -> Result<Self, Error> {
        let executor = ReqwestExecutor::new(config.timeout()).map_err(Error::Transport)?;
        Self::with_executor(config, executor)
    }

    /// Create a client on top of any executor, e.g. a mock in tests.
    pub fn with_executor(
        config: Config,
        executor: impl HttpExecutor + 'static,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url)?;
        let inner = Arc::new_cyclic(|this| Inner {
            config,
            base_url,
            executor: Box::new(executor),
            fields: Arc::new(FieldCache::new()),
            this: this.clone(),
        });
        Ok(Self { inner })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn field_cache(&self) -> &Arc<FieldCache> {
        &self.inner.fields
    }

    /// Field definitions for `kind`, fetched on first use.
    pub fn field_definitions(&self, kind: ResourceKind) -> Result<FieldDefinitions, Error> {
        Ok(self.inner.fields.definitions(kind, self.inner.as_ref())?)
    }

    /// Forget all cached field definitions.
    pub fn clear_field_cache(&self) {
        self.inner.fields.clear();
    }

    pub fn clear_field_cache_for(&self, kind: ResourceKind) {
        self.inner.fields.clear_kind(kind);
    }

    /// The adapter used for payloads from this account.
    pub fn adapter(&self) -> RecordAdapter {
        self.inner.adapter()
    }

    pub fn find(&self, kind: ResourceKind, id: i64) -> Result<Record, Error> {
        self.inner.find(kind, id)
    }

    /// First page of `kind`.
    pub fn all(&self, kind: ResourceKind, query: &Query) -> Result<Vec<Record>, Error> {
        self.inner.list(kind.api_version(), kind.path(), query, kind, false)
    }

    /// Every page of `kind`, following the pagination metadata.
    pub fn all_pages(&self, kind: ResourceKind, query: &Query) -> Result<Vec<Record>, Error> {
        self.inner.list(kind.api_version(), kind.path(), query, kind, true)
    }

    /// Create a record from legacy flat options.
    ///
    /// The returned record holds the options that were sent, overlaid with
    /// what the API returned.
    pub fn create(&self, kind: ResourceKind, options: Json) -> Result<Record, Error> {
        self.inner.create(kind, options)
    }

    /// Update a record in place from legacy flat options.
    pub fn update(&self, record: &mut Record, options: Json) -> Result<(), Error> {
        self.inner.update(record, options)
    }

    pub fn destroy(&self, kind: ResourceKind, id: i64) -> Result<(), Error> {
        let path = format!("{}/{}", kind.path(), id);
        let request = self.inner.request(Method::DELETE, kind.api_version(), &path)?;
        self.inner.send(request, json!(id))?;
        Ok(())
    }

    /// Raw `data` of the kind's search endpoint.
    pub fn search(&self, kind: ResourceKind, query: &Query) -> Result<Json, Error> {
        let path = format!("{}/search", kind.path());
        let request = self
            .inner
            .request(Method::GET, kind.api_version(), &path)?;
        let response = self.inner.send(with_query(request, query), query_params(query))?;
        Ok(response.data().clone())
    }

    /// The record whose name matches `name` exactly, if any.
    pub fn find_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
        query: &Query,
    ) -> Result<Option<Record>, Error> {
        let mut params = vec![("term", name), ("fields", "name"), ("exact_match", "true")];
        params.extend(query.iter().copied());

        let data = self.search(kind, &params)?;
        let id = data
            .get("items")
            .and_then(|items| items.get(0))
            .and_then(|item| item.get("item"))
            .and_then(|item| item.get("id"))
            .and_then(Json::as_i64);

        match id {
            Some(id) => self.find(kind, id).map(Some),
            None => Ok(None),
        }
    }

    /// Find by exact name, creating the record with `options` when absent.
    pub fn find_or_create_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
        query: &Query,
        options: Json,
    ) -> Result<Record, Error> {
        if let Some(found) = self.find_by_name(kind, name, query)? {
            return Ok(found);
        }
        let mut options = options_map(options)?;
        options.insert("name".to_string(), Json::from(name));
        self.create(kind, Json::Object(options))
    }

    /// Records of `target` listed below one record, e.g. `/deals/1/followers`.
    pub fn list_nested(
        &self,
        kind: ResourceKind,
        id: i64,
        segment: &str,
        target: ResourceKind,
        query: &Query,
    ) -> Result<Vec<Record>, Error> {
        let path = format!("{}/{}/{}", kind.path(), id, segment);
        self.inner
            .list(kind.api_version(), &path, query, target, false)
    }

    /// Write below one record, e.g. `POST /deals/1/products`. Returns `data`.
    pub fn write_nested(
        &self,
        method: Method,
        kind: ResourceKind,
        id: i64,
        segment: &str,
        options: Json,
    ) -> Result<Json, Error> {
        let version = kind.api_version();
        let options = options_map(options)?;
        let params = Json::Object(options.clone());
        let body = match version {
            ApiVersion::V2 => Body::Json(Json::Object(options)),
            ApiVersion::V1 => Body::Form(form_pairs(&options)),
        };

        let path = format!("{}/{}/{}", kind.path(), id, segment);
        let request = with_body(self.inner.request(method, version, &path)?, body);
        let response = self.inner.send(request, params)?;
        Ok(response.data().clone())
    }

    pub fn delete_nested(&self, kind: ResourceKind, id: i64, segment: &str) -> Result<(), Error> {
        let path = format!("{}/{}/{}", kind.path(), id, segment);
        let request = self
            .inner
            .request(Method::DELETE, kind.api_version(), &path)?;
        self.inner.send(request, json!(id))?;
        Ok(())
    }
}

impl Inner {
    fn source(&self) -> Option<Arc<dyn RecordSource>> {
        self.this
            .upgrade()
            .map(|inner| inner as Arc<dyn RecordSource>)
    }

    fn adapter(&self) -> RecordAdapter {
        RecordAdapter::new(self.source()).with_field_cache(self.fields.clone())
    }

    fn url(&self, version: ApiVersion, path: &str) -> Result<String, Error> {
        let url = self
            .base_url
            .join(&format!("{}{}", version.prefix(), path))?;
        Ok(url.to_string())
    }

    /// A request with the shared headers and the version's authentication.
    fn request(&self, method: Method, version: ApiVersion, path: &str) -> Result<HttpRequest, Error> {
        let request = HttpRequest::new(method, self.url(version, path)?)
            .with_header("User-Agent", self.config.user_agent.as_str())
            .with_header("Accept", "application/json")
            .with_header("Content-Type", FORM_CONTENT_TYPE);

        Ok(match version {
            ApiVersion::V2 => request.with_header("x-api-token", self.config.api_token.as_str()),
            ApiVersion::V1 => request.with_query("api_token", self.config.api_token.as_str()),
        })
    }

    fn send(&self, request: HttpRequest, params: Json) -> Result<HttpResponse, Error> {
        let response = self
            .executor
            .execute(&request)
            .map_err(Error::Transport)?;
        log::debug!("{} {} -> {}", request.method, request.path, response.status);

        if response.is_success() {
            return Ok(response);
        }
        Err(Error::BadResponse {
            method: request.method,
            url: request.path,
            status: response.status,
            body: response.body,
            params,
        })
    }

    /// Load the kind's field definitions before adapting a payload that
    /// carries custom fields, so reference-typed ones get wrapped.
    fn prime_fields(&self, kind: ResourceKind, body: &Json) {
        if kind.fields_path().is_none() || self.fields.is_loaded(kind) {
            return;
        }
        let has_custom_fields = |record: &Json| {
            record
                .get(CUSTOM_FIELDS_KEY)
                .and_then(Json::as_object)
                .is_some_and(|bundle| !bundle.is_empty())
        };
        let wanted = match body.get("data") {
            Some(Json::Array(items)) => items.iter().any(has_custom_fields),
            Some(record) => has_custom_fields(record),
            None => has_custom_fields(body),
        };
        if !wanted {
            return;
        }
        if let Err(e) = self.fields.definitions(kind, self) {
            log::warn!("{} reference custom fields stay unwrapped: {}", kind, e);
        }
    }

    fn find(&self, kind: ResourceKind, id: i64) -> Result<Record, Error> {
        let path = format!("{}/{}", kind.path(), id);
        let request = self.request(Method::GET, kind.api_version(), &path)?;
        let response = self.send(request, json!(id))?;

        self.prime_fields(kind, &response.body);
        Ok(self.adapter().adapt(kind, response.body)?)
    }

    /// GET every page of a list endpoint (or only the first).
    fn pages(
        &self,
        version: ApiVersion,
        path: &str,
        query: &Query,
        follow: bool,
    ) -> Result<Vec<Json>, Error> {
        let mut bodies = Vec::new();
        let mut page: Option<(&'static str, String)> = None;

        loop {
            let mut request = with_query(self.request(Method::GET, version, path)?, query);
            if let Some((name, value)) = page.take() {
                request = request.with_query(name, value);
            }
            let response = self.send(request, query_params(query))?;

            let next = if follow { next_page(&response.body) } else { None };
            bodies.push(response.body);
            match next {
                Some(next) => page = Some(next),
                None => break,
            }
        }

        Ok(bodies)
    }

    fn list(
        &self,
        version: ApiVersion,
        path: &str,
        query: &Query,
        target: ResourceKind,
        follow: bool,
    ) -> Result<Vec<Record>, Error> {
        let adapter = self.adapter();
        let mut records = Vec::new();
        for body in self.pages(version, path, query, follow)? {
            self.prime_fields(target, &body);
            records.extend(adapter.adapt_list(target, &body)?);
        }
        Ok(records)
    }

    /// Encode legacy flat options for a write to `kind`.
    fn encode_write(&self, kind: ResourceKind, mut options: Map<String, Json>) -> Body {
        kind.strategy().transform_write(&mut options);
        match kind.api_version() {
            ApiVersion::V2 => {
                let writer = CustomFieldWriter::new(&self.fields, self);
                Body::Json(Json::Object(writer.nest(kind, options)))
            }
            ApiVersion::V1 => Body::Form(form_pairs(&options)),
        }
    }

    fn create(&self, kind: ResourceKind, options: Json) -> Result<Record, Error> {
        let options = options_map(options)?;
        let params = Json::Object(options.clone());

        let body = self.encode_write(kind, options.clone());
        let request = with_body(self.request(Method::POST, kind.api_version(), kind.path())?, body);
        let response = self.send(request, params)?;

        let url = self.url(kind.api_version(), kind.path())?;
        let Json::Object(data) = response.data().clone() else {
            return Err(Error::UnexpectedResponse {
                url,
                message: "no record in create response".to_string(),
            });
        };

        // Sent custom fields are dropped: the response carries them resolved.
        // Sent legacy names are dropped too, aliasing derives them again.
        let strategy = kind.strategy();
        let mut sent = options;
        strategy.transform_write(&mut sent);
        for alias in strategy.aliases() {
            if sent.contains_key(alias.current) || data.contains_key(alias.current) {
                sent.remove(alias.legacy);
            }
        }
        let mut merged: Map<String, Json> = sent
            .into_iter()
            .filter(|(key, _)| !is_custom_field_key(key))
            .collect();
        merged.extend(data);

        let merged = Json::Object(merged);
        self.prime_fields(kind, &merged);
        Ok(self.adapter().adapt(kind, merged)?)
    }

    fn update(&self, record: &mut Record, options: Json) -> Result<(), Error> {
        let kind = record.kind();
        let id = record.id().ok_or(Error::MissingId)?;
        let version = kind.api_version();
        let method = match version {
            ApiVersion::V2 => Method::PATCH,
            ApiVersion::V1 => Method::PUT,
        };

        let options = options_map(options)?;
        let params = Json::Object(options.clone());
        let body = self.encode_write(kind, options);

        let path = format!("{}/{}", kind.path(), id);
        let request = with_body(self.request(method, version, &path)?, body);
        let response = self.send(request, params)?;

        self.prime_fields(kind, &response.body);
        let updated = self.adapter().adapt(kind, response.body)?;
        record.merge(updated.attributes().clone());
        Ok(())
    }

    fn load_field_definitions(&self, kind: ResourceKind) -> Result<Vec<FieldDefinition>, Error> {
        let Some(path) = kind.fields_path() else {
            return Err(CoreError::NoFieldDefinitions { kind }.into());
        };

        let query = [("limit", FIELD_PAGE_LIMIT)];
        let mut definitions = Vec::new();
        for body in self.pages(ApiVersion::V1, path, &query, true)? {
            let Some(items) = body.get("data").and_then(Json::as_array) else {
                continue;
            };
            for item in items {
                match serde_json::from_value::<FieldDefinition>(item.clone()) {
                    Ok(definition) => definitions.push(definition),
                    Err(e) => log::warn!("skipping malformed {} field: {}", kind, e),
                }
            }
        }
        Ok(definitions)
    }
}

impl RecordSource for Inner {
    fn find(&self, kind: ResourceKind, id: i64) -> Result<Record, CoreError> {
        Inner::find(self, kind, id).map_err(|e| CoreError::Fetch {
            kind,
            id,
            message: e.to_string(),
        })
    }
}

impl FieldSource for Inner {
    fn field_definitions_for(&self, kind: ResourceKind) -> Result<Vec<FieldDefinition>, CoreError> {
        self.load_field_definitions(kind).map_err(|e| match e {
            Error::Core(core) => core,
            other => CoreError::FieldDefinitions {
                kind,
                message: other.to_string(),
            },
        })
    }
}

fn with_query(request: HttpRequest, query: &Query) -> HttpRequest {
    query
        .iter()
        .fold(request, |request, (name, value)| request.with_query(*name, *value))
}

fn with_body(request: HttpRequest, body: Body) -> HttpRequest {
    let content_type = body.content_type();
    let request = match body {
        Body::Json(json) => request.with_json_body(json),
        Body::Form(pairs) => request.with_form_body(pairs),
    };
    request.with_header("Content-Type", content_type)
}

fn query_params(query: &Query) -> Json {
    Json::Object(
        query
            .iter()
            .map(|(name, value)| (name.to_string(), Json::from(*value)))
            .collect(),
    )
}

fn options_map(options: Json) -> Result<Map<String, Json>, Error> {
    match options {
        Json::Object(map) => Ok(map),
        Json::Null => Ok(Map::new()),
        other => Err(Error::InvalidOptions {
            message: format!("expected an object, got {}", other),
        }),
    }
}

/// The query parameter selecting the next page, if there is one.
///
/// V2 lists return `additional_data.next_cursor`; V1 lists return
/// `additional_data.pagination.{more_items_in_collection, next_start}`.
fn next_page(body: &Json) -> Option<(&'static str, String)> {
    let additional = body.get("additional_data")?;
    if let Some(cursor) = additional.get("next_cursor").and_then(Json::as_str) {
        return Some(("cursor", cursor.to_string()));
    }

    let pagination = additional.get("pagination")?;
    if pagination.get("more_items_in_collection").and_then(Json::as_bool) != Some(true) {
        return None;
    }
    pagination
        .get("next_start")
        .and_then(Json::as_i64)
        .map(|start| ("start", start.to_string()))
}

/// Form pairs for a V1 body. Arrays become `key[]`, maps `key[sub]`.
fn form_pairs(options: &Map<String, Json>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in options {
        push_form_value(&mut pairs, key.clone(), value);
    }
    pairs
}

fn push_form_value(pairs: &mut Vec<(String, String)>, key: String, value: &Json) {
    match value {
        Json::Null => pairs.push((key, String::new())),
        Json::String(s) => pairs.push((key, s.clone())),
        Json::Array(items) => {
            for item in items {
                push_form_value(pairs, format!("{}[]", key), item);
            }
        }
        Json::Object(map) => {
            for (sub, item) in map {
                push_form_value(pairs, format!("{}[{}]", key, sub), item);
            }
        }
        other => pairs.push((key, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedrive_http::MockExecutor;

    const BASE: &str = "https://api.pipedrive.com";

    fn client(executor: &MockExecutor) -> Client {
        Client::with_executor(Config::new("some-token"), executor.clone()).unwrap()
    }

    #[test]
    fn v2_requests_authenticate_with_header() {
        let executor = MockExecutor::new().with_response(
            format!("{}/api/v2/deals/1", BASE),
            MockExecutor::data_response(json!({"id": 1})),
        );

        client(&executor).find(ResourceKind::Deal, 1).unwrap();

        let request = &executor.recorded_requests()[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.header("x-api-token"), Some("some-token"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert!(!request.query.contains_key("api_token"));
    }

    #[test]
    fn v1_requests_authenticate_with_query() {
        let executor = MockExecutor::new().with_response(
            format!("{}/v1/users/5", BASE),
            MockExecutor::data_response(json!({"id": 5, "name": "Owner"})),
        );

        let user = client(&executor).find(ResourceKind::User, 5).unwrap();

        assert_eq!(user.get_str("name"), Some("Owner"));
        let request = &executor.recorded_requests()[0];
        assert_eq!(request.query.get("api_token").map(String::as_str), Some("some-token"));
        assert_eq!(request.header("x-api-token"), None);
    }

    #[test]
    fn bad_status_carries_response_and_params() {
        let executor = MockExecutor::new();

        let err = client(&executor).find(ResourceKind::Deal, 404).unwrap_err();

        match err {
            Error::BadResponse {
                method,
                status,
                params,
                body,
                ..
            } => {
                assert_eq!(method, Method::GET);
                assert_eq!(status, 404);
                assert_eq!(params, json!(404));
                assert_eq!(body["success"], json!(false));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transport_failure_is_reported() {
        let executor = MockExecutor::new().fail_with("connection refused");

        let err = client(&executor).find(ResourceKind::Deal, 1).unwrap_err();
        assert!(matches!(err, Error::Transport(message) if message == "connection refused"));
    }

    #[test]
    fn v2_create_sends_nested_json() {
        let key = "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2";
        let executor = MockExecutor::new()
            .with_response(
                format!("{}/v1/dealFields", BASE),
                MockExecutor::data_response(json!([{
                    "key": key,
                    "field_type": "enum",
                    "options": [{"id": 128, "label": "Yes"}],
                }])),
            )
            .with_method_response(
                Method::POST,
                format!("{}/api/v2/deals", BASE),
                MockExecutor::data_response(json!({
                    "id": 9,
                    "owner_id": 5,
                    "custom_fields": {key: 128},
                })),
            );

        let deal = client(&executor)
            .create(ResourceKind::Deal, json!({"title": "New", "user_id": 5, key: "Yes"}))
            .unwrap();

        let post = executor
            .recorded_requests()
            .into_iter()
            .find(|r| r.method == Method::POST)
            .unwrap();
        assert_eq!(post.header("content-type"), Some("application/json"));
        assert_eq!(
            post.body.as_ref().and_then(Body::as_json),
            Some(&json!({"title": "New", "owner_id": 5, "custom_fields": {key: 128}}))
        );

        assert_eq!(deal["title"], "New");
        assert_eq!(deal["id"], 9);
        assert_eq!(deal[key], 128);
        assert_eq!(deal["user_id"], 5);
        assert!(deal["user_id"].as_identifier().is_some());
    }

    #[test]
    fn v1_update_sends_form_and_merges_response() {
        let executor = MockExecutor::new()
            .with_response(
                format!("{}/v1/users/5", BASE),
                MockExecutor::data_response(json!({"id": 5, "name": "Old", "email": "o@x"})),
            )
            .with_method_response(
                Method::PUT,
                format!("{}/v1/users/5", BASE),
                MockExecutor::data_response(json!({"id": 5, "name": "New"})),
            );
        let client = client(&executor);

        let mut user = client.find(ResourceKind::User, 5).unwrap();
        client
            .update(&mut user, json!({"name": "New", "role_ids": [1, 2]}))
            .unwrap();

        assert_eq!(user["name"], "New");
        assert_eq!(user["email"], "o@x");

        let put = executor
            .recorded_requests()
            .into_iter()
            .find(|r| r.method == Method::PUT)
            .unwrap();
        assert_eq!(
            put.body,
            Some(Body::Form(vec![
                ("name".to_string(), "New".to_string()),
                ("role_ids[]".to_string(), "1".to_string()),
                ("role_ids[]".to_string(), "2".to_string()),
            ]))
        );
    }

    #[test]
    fn update_without_id_is_rejected() {
        let executor = MockExecutor::new();
        let client = client(&executor);
        let mut record = client.adapter().adapt(ResourceKind::Deal, json!({})).unwrap();

        assert!(matches!(
            client.update(&mut record, json!({"title": "x"})),
            Err(Error::MissingId)
        ));
        assert!(executor.recorded_requests().is_empty());
    }

    #[test]
    fn non_object_options_are_rejected() {
        let executor = MockExecutor::new();

        let err = client(&executor)
            .create(ResourceKind::Deal, json!(["title"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }));
    }

    #[test]
    fn field_definitions_are_fetched_from_v1_once() {
        let executor = MockExecutor::new().with_response(
            format!("{}/v1/personFields", BASE),
            MockExecutor::data_response(json!([
                {"key": "name", "field_type": "varchar"},
                {"key": "broken"},
            ])),
        );
        let client = client(&executor);

        let definitions = client.field_definitions(ResourceKind::Person).unwrap();
        client.field_definitions(ResourceKind::Person).unwrap();

        assert_eq!(definitions.len(), 1);
        assert_eq!(
            executor.request_count(&format!("{}/v1/personFields", BASE)),
            1
        );
        assert!(client.field_cache().is_loaded(ResourceKind::Person));

        client.clear_field_cache();
        assert!(!client.field_cache().is_loaded(ResourceKind::Person));
    }

    #[test]
    fn kinds_without_field_endpoint_report_it() {
        let executor = MockExecutor::new();

        let err = client(&executor)
            .field_definitions(ResourceKind::Stage)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Core(CoreError::NoFieldDefinitions {
                kind: ResourceKind::Stage
            })
        ));
    }

    #[test]
    fn pagination_markers() {
        assert_eq!(
            next_page(&json!({"additional_data": {"next_cursor": "abc"}})),
            Some(("cursor", "abc".to_string()))
        );
        assert_eq!(
            next_page(&json!({"additional_data": {"pagination": {
                "more_items_in_collection": true, "next_start": 100
            }}})),
            Some(("start", "100".to_string()))
        );
        assert_eq!(
            next_page(&json!({"additional_data": {"pagination": {
                "more_items_in_collection": false, "next_start": 100
            }}})),
            None
        );
        assert_eq!(next_page(&json!({"additional_data": {"next_cursor": null}})), None);
        assert_eq!(next_page(&json!({"data": []})), None);
    }

    #[test]
    fn form_encoding() {
        let options = json!({"a": "x", "b": 2, "c": null, "d": {"e": true}})
            .as_object()
            .cloned()
            .unwrap();

        assert_eq!(
            form_pairs(&options),
            vec![
                ("a".to_string(), "x".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), String::new()),
                ("d[e]".to_string(), "true".to_string()),
            ]
        );
    }
}
