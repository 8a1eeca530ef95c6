use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::PATCH => http::Method::PATCH,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

/// Request body encoding.
///
/// V1 endpoints take form-encoded bodies, V2 endpoints take JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "encoding", content = "content", rename_all = "lowercase")]
pub enum Body {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

impl Body {
    /// The `Content-Type` header value matching this encoding.
    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => "application/json",
            Body::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    /// The JSON payload, if this is a JSON body.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Form(_) => None,
        }
    }

    /// Look up a form field by name, if this is a form body.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match self {
            Body::Form(pairs) => pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            Body::Json(_) => None,
        }
    }
}

/// A full HTTP request specification.
///
/// `path` holds the absolute URL; the client composes it from the base URL,
/// the API version prefix and the resource path.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpRequest {
    #[serde(default)]
    pub method: Method,

    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn with_form_body(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(Body::Form(pairs));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Header lookup ignoring ASCII case, as HTTP header names are.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP response from a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,

    pub headers: HashMap<String, String>,

    /// Response body as JSON value.
    /// Will be null if body was empty or not valid JSON
    pub body: serde_json::Value,

    /// Raw body as string (useful when body isn't JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

impl HttpResponse {
    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// The `data` section of a Pipedrive envelope, or null.
    pub fn data(&self) -> &serde_json::Value {
        self.body.get("data").unwrap_or(&serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_content_types() {
        assert_eq!(Body::Json(json!({})).content_type(), "application/json");
        assert_eq!(
            Body::Form(vec![]).content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn form_value_lookup() {
        let body = Body::Form(vec![
            ("title".to_string(), "Big deal".to_string()),
            ("value".to_string(), "100".to_string()),
        ]);
        assert_eq!(body.form_value("value"), Some("100"));
        assert_eq!(body.form_value("missing"), None);
        assert!(body.as_json().is_none());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest::get("https://example.com").with_header("X-Api-Token", "t");
        assert_eq!(request.header("x-api-token"), Some("t"));
        assert_eq!(request.header("accept"), None);
    }

    #[test]
    fn response_status_classes() {
        let mut response = HttpResponse {
            status: 201,
            status_text: "Created".to_string(),
            headers: HashMap::new(),
            body: json!({"data": {"id": 1}}),
            body_text: None,
        };
        assert!(response.is_success());
        assert_eq!(response.data(), &json!({"id": 1}));

        response.status = 404;
        assert!(response.is_client_error());
        response.status = 503;
        assert!(response.is_server_error());
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::PATCH.to_string(), "PATCH");
        assert_eq!(http::Method::from(Method::DELETE), http::Method::DELETE);
    }
}
