//! Typed HTTP client for the users REST API.
//!
//! Two layers with deliberately different failure policies:
//!
//! - [`RestClient::execute`] / [`RestClient::request`] never error on HTTP
//!   status — every reachable response comes back as a
//!   [`ResponseEnvelope`] with `ok` classified purely on the 2xx range, so
//!   callers can assert on status directly. Only transport failures
//!   (unreachable host, request construction) return `Err`.
//! - The convenience calls ([`RestClient::get_users`] and friends) fail
//!   loudly: a non-2xx envelope becomes a [`VitrinaError::Api`] carrying
//!   the status and status text.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::{VitrinaError, VitrinaResult};

/// Header carrying the API-key credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP methods supported by the request primitive.
///
/// The current flows only issue GET and POST; PUT and DELETE are carried
/// by the primitive for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A JSON value, serialized and sent as-is
    Json(Value),
    /// Raw text, sent verbatim — lets callers exercise the server's
    /// handling of malformed bodies
    Raw(String),
}

/// One API call, built per request; stateless value.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Endpoint path, appended to the client's base URL
    pub endpoint: String,
    /// Optional body
    pub payload: Option<Payload>,
}

impl ApiRequest {
    /// A bodyless request.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_json(mut self, value: Value) -> Self {
        self.payload = Some(Payload::Json(value));
        self
    }

    /// Attach a raw text body.
    #[must_use]
    pub fn with_raw(mut self, body: impl Into<String>) -> Self {
        self.payload = Some(Payload::Raw(body.into()));
        self
    }
}

/// Parsed response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON document (successful responses)
    Json(Value),
    /// Raw text (failures, or bodies that are not JSON)
    Text(String),
}

/// Normalized result of one API call.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status code
    pub status: u16,
    /// Canonical status text
    pub status_text: String,
    /// Whether the status is in the 2xx range
    pub ok: bool,
    /// Response headers, lowercase names
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: Body,
}

impl ResponseEnvelope {
    /// Classify raw response parts into an envelope. `ok` is decided
    /// purely by the status range; a 2xx body that fails to parse as JSON
    /// degrades to text rather than erroring.
    #[must_use]
    pub fn from_parts(
        status: u16,
        status_text: impl Into<String>,
        headers: HashMap<String, String>,
        body_text: String,
    ) -> Self {
        let ok = (200..300).contains(&status);
        let body = if ok {
            serde_json::from_str(&body_text).map_or_else(|_| Body::Text(body_text), Body::Json)
        } else {
            Body::Text(body_text)
        };
        Self {
            status,
            status_text: status_text.into(),
            ok,
            headers,
            body,
        }
    }

    /// Convert a non-2xx envelope into the loud API error used by the
    /// convenience layer.
    pub fn ensure_ok(&self, endpoint: &str) -> VitrinaResult<()> {
        if self.ok {
            Ok(())
        } else {
            Err(VitrinaError::Api {
                status: self.status,
                status_text: self.status_text.clone(),
                endpoint: endpoint.to_string(),
            })
        }
    }

    /// Deserialize the body into a typed payload.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> VitrinaResult<T> {
        match &self.body {
            Body::Json(value) => Ok(serde_json::from_value(value.clone())?),
            Body::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

/// One user record as served by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Numeric identifier
    pub id: u32,
    /// Email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar URL
    pub avatar: String,
}

/// Support metadata attached to read responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportRecord {
    /// Support URL
    pub url: String,
    /// Support blurb
    pub text: String,
}

/// One page of the user collection.
///
/// The server echoes the global `total` / `total_pages` regardless of the
/// requested page; a page past the end simply carries empty `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    /// Page number served
    pub page: u32,
    /// Page size served
    pub per_page: u32,
    /// Global record count
    pub total: u32,
    /// Global page count
    pub total_pages: u32,
    /// Records on this page; at most `per_page` entries
    pub data: Vec<UserRecord>,
    /// Support metadata
    pub support: SupportRecord,
}

/// Response for a single-user read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleUserResponse {
    /// The user record
    pub data: UserRecord,
    /// Support metadata
    pub support: SupportRecord,
}

/// Payload for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Name
    pub name: String,
    /// Job title
    pub job: String,
}

/// A created user, echoing the request plus server-assigned fields.
///
/// `id` and `created_at` are opaque to this client: they are forwarded,
/// never validated, beyond the optional timestamp parse helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    /// Echoed name
    #[serde(default)]
    pub name: String,
    /// Echoed job title
    #[serde(default)]
    pub job: String,
    /// Server-assigned identifier
    pub id: String,
    /// Server-assigned creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl CreatedUser {
    /// Parse the server-assigned creation timestamp.
    pub fn created_at_time(&self) -> VitrinaResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| VitrinaError::Api {
                status: 0,
                status_text: format!("unparseable createdAt '{}': {e}", self.created_at),
                endpoint: "/users".to_string(),
            })
    }
}

/// Build the `/users` query string from the parameters that are present.
/// Absent parameters are omitted entirely — never sent as empty markers.
fn pagination_query(page: Option<u32>, per_page: Option<u32>) -> String {
    let mut params = Vec::new();
    if let Some(page) = page {
        params.push(format!("page={page}"));
    }
    if let Some(per_page) = per_page {
        params.push(format!("per_page={per_page}"));
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

/// Typed client for the users API.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl RestClient {
    /// Create a client for the given base URL and API-key credential.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(base_url, api_key, http)
    }

    /// Create a client with a custom reqwest client (timeouts, proxies).
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request and normalize the response.
    ///
    /// # Errors
    ///
    /// Only transport failures error; any reachable response, whatever its
    /// status, comes back as an envelope.
    pub async fn execute(&self, request: &ApiRequest) -> VitrinaResult<ResponseEnvelope> {
        let url = format!("{}{}", self.base_url, request.endpoint);
        tracing::debug!(method = ?request.method, %url, "api request");

        let mut builder = self
            .http
            .request(request.method.as_reqwest(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key);
        match &request.payload {
            Some(Payload::Json(value)) => builder = builder.json(value),
            Some(Payload::Raw(body)) => builder = builder.body(body.clone()),
            None => {}
        }

        let response = builder.send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body_text = response.text().await?;

        Ok(ResponseEnvelope::from_parts(
            status.as_u16(),
            status_text,
            headers,
            body_text,
        ))
    }

    /// Issue a call described by its parts. Same policy as [`Self::execute`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<Payload>,
    ) -> VitrinaResult<ResponseEnvelope> {
        let mut request = ApiRequest::new(method, endpoint);
        request.payload = payload;
        self.execute(&request).await
    }

    /// Fetch a page of users.
    ///
    /// A page index past the last valid page is not an error: the server
    /// answers 200 with empty `data` and unchanged totals.
    pub async fn get_users(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> VitrinaResult<UserPage> {
        let endpoint = format!("/users{}", pagination_query(page, per_page));
        let envelope = self.request(Method::Get, &endpoint, None).await?;
        envelope.ensure_ok(&endpoint)?;
        envelope.decode()
    }

    /// Fetch a single user by identifier.
    pub async fn get_user_by_id(&self, id: u32) -> VitrinaResult<SingleUserResponse> {
        let endpoint = format!("/users/{id}");
        let envelope = self.request(Method::Get, &endpoint, None).await?;
        envelope.ensure_ok(&endpoint)?;
        envelope.decode()
    }

    /// Create a user. The server assigns `id` and `createdAt`; creation is
    /// not deduplicated, so identical payloads yield distinct records.
    pub async fn create_user(&self, user: &CreateUserRequest) -> VitrinaResult<CreatedUser> {
        let endpoint = "/users";
        let envelope = self
            .request(
                Method::Post,
                endpoint,
                Some(Payload::Json(serde_json::to_value(user)?)),
            )
            .await?;
        envelope.ensure_ok(endpoint)?;
        envelope.decode()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod query_tests {
        use super::*;

        #[test]
        fn test_both_params_present() {
            assert_eq!(pagination_query(Some(2), Some(3)), "?page=2&per_page=3");
        }

        #[test]
        fn test_only_page() {
            assert_eq!(pagination_query(Some(999), None), "?page=999");
        }

        #[test]
        fn test_only_per_page() {
            assert_eq!(pagination_query(None, Some(6)), "?per_page=6");
        }

        #[test]
        fn test_absent_params_send_nothing() {
            assert_eq!(pagination_query(None, None), "");
        }
    }

    mod envelope_tests {
        use super::*;

        #[test]
        fn test_2xx_parses_json_body() {
            let envelope = ResponseEnvelope::from_parts(
                200,
                "OK",
                HashMap::new(),
                r#"{"page": 1}"#.to_string(),
            );
            assert!(envelope.ok);
            assert!(matches!(envelope.body, Body::Json(_)));
        }

        #[test]
        fn test_non_2xx_keeps_raw_text() {
            let envelope = ResponseEnvelope::from_parts(
                404,
                "Not Found",
                HashMap::new(),
                r#"{"error": "not found"}"#.to_string(),
            );
            assert!(!envelope.ok);
            assert_eq!(
                envelope.body,
                Body::Text(r#"{"error": "not found"}"#.to_string())
            );
        }

        #[test]
        fn test_201_is_ok() {
            let envelope =
                ResponseEnvelope::from_parts(201, "Created", HashMap::new(), "{}".to_string());
            assert!(envelope.ok);
        }

        #[test]
        fn test_2xx_non_json_degrades_to_text() {
            let envelope =
                ResponseEnvelope::from_parts(204, "No Content", HashMap::new(), String::new());
            assert!(envelope.ok);
            assert_eq!(envelope.body, Body::Text(String::new()));
        }

        #[test]
        fn test_ensure_ok_maps_to_api_error() {
            let envelope = ResponseEnvelope::from_parts(
                400,
                "Bad Request",
                HashMap::new(),
                String::new(),
            );
            let err = envelope.ensure_ok("/users").unwrap_err();
            match err {
                VitrinaError::Api {
                    status,
                    status_text,
                    endpoint,
                } => {
                    assert_eq!(status, 400);
                    assert_eq!(status_text, "Bad Request");
                    assert_eq!(endpoint, "/users");
                }
                other => panic!("expected Api, got {other:?}"),
            }
        }

        #[test]
        fn test_ensure_ok_passes_2xx() {
            let envelope =
                ResponseEnvelope::from_parts(200, "OK", HashMap::new(), "{}".to_string());
            assert!(envelope.ensure_ok("/users").is_ok());
        }
    }

    mod payload_tests {
        use super::*;

        #[test]
        fn test_user_page_deserialization() {
            let json = r#"{
                "page": 2, "per_page": 6, "total": 12, "total_pages": 2,
                "data": [
                    {"id": 7, "email": "michael.lawson@reqres.in",
                     "first_name": "Michael", "last_name": "Lawson",
                     "avatar": "https://reqres.in/img/faces/7-image.jpg"}
                ],
                "support": {"url": "https://reqres.in/#support-heading",
                            "text": "To keep ReqRes free, contributions are appreciated!"}
            }"#;
            let page: UserPage = serde_json::from_str(json).unwrap();
            assert_eq!(page.page, 2);
            assert_eq!(page.total_pages, 2);
            assert!(page.data.len() <= page.per_page as usize);
            assert_eq!(page.data[0].first_name, "Michael");
            assert!(page.support.url.contains("support"));
        }

        #[test]
        fn test_page_past_the_end_keeps_totals() {
            let json = r#"{
                "page": 999, "per_page": 6, "total": 12, "total_pages": 2,
                "data": [],
                "support": {"url": "https://reqres.in/#support-heading", "text": "t"}
            }"#;
            let page: UserPage = serde_json::from_str(json).unwrap();
            assert_eq!(page.page, 999);
            assert!(page.data.is_empty());
            assert_eq!(page.total, 12);
            assert_eq!(page.total_pages, 2);
        }

        #[test]
        fn test_created_user_round_trip() {
            let json = r#"{"name": "Miro Barkovic", "job": "QA Engineer",
                           "id": "712", "createdAt": "2026-08-06T10:15:30.123Z"}"#;
            let created: CreatedUser = serde_json::from_str(json).unwrap();
            assert_eq!(created.id, "712");
            assert!(!created.id.is_empty());
            let time = created.created_at_time().unwrap();
            assert_eq!(time.timestamp(), 1_786_011_330);
        }

        #[test]
        fn test_created_user_tolerates_missing_echo() {
            let json = r#"{"id": "1", "createdAt": "2026-08-06T10:15:30.123Z"}"#;
            let created: CreatedUser = serde_json::from_str(json).unwrap();
            assert_eq!(created.name, "");
            assert_eq!(created.job, "");
        }

        #[test]
        fn test_created_at_garbage_is_an_error() {
            let created = CreatedUser {
                name: String::new(),
                job: String::new(),
                id: "1".to_string(),
                created_at: "yesterday".to_string(),
            };
            assert!(created.created_at_time().is_err());
        }

        #[test]
        fn test_create_request_serialization() {
            let request = CreateUserRequest {
                name: "Jana Smithova".to_string(),
                job: "Software Developer".to_string(),
            };
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("\"name\":\"Jana Smithova\""));
            assert!(json.contains("\"job\":\"Software Developer\""));
        }

        #[test]
        fn test_single_user_deserialization() {
            let json = r#"{
                "data": {"id": 2, "email": "janet.weaver@reqres.in",
                         "first_name": "Janet", "last_name": "Weaver",
                         "avatar": "https://reqres.in/img/faces/2-image.jpg"},
                "support": {"url": "https://reqres.in/#support-heading", "text": "t"}
            }"#;
            let single: SingleUserResponse = serde_json::from_str(json).unwrap();
            assert_eq!(single.data.id, 2);
            assert_eq!(single.data.email, "janet.weaver@reqres.in");
        }
    }

    mod client_tests {
        use super::*;

        #[test]
        fn test_new_strips_trailing_slash() {
            let client = RestClient::new("https://api.example.com/", "k");
            assert_eq!(client.base_url(), "https://api.example.com");
        }

        #[test]
        fn test_request_descriptor_builders() {
            let request = ApiRequest::new(Method::Post, "/users")
                .with_raw(r#"{"name": "Test", "job":}"#);
            assert_eq!(request.method, Method::Post);
            assert!(matches!(request.payload, Some(Payload::Raw(_))));

            let request =
                ApiRequest::new(Method::Get, "/users").with_json(serde_json::json!({"a": 1}));
            assert!(matches!(request.payload, Some(Payload::Json(_))));
        }
    }
}
