/// Thin HTTP client for the DigitalOcean REST API.
///
/// Handlers in `services` build a path and an optional JSON body, call one
/// verb here, and pass the resulting `Value` through to the caller. The
/// client itself only adds bearer auth, the `/v2` prefix, pagination query
/// parameters, and uniform decoding of the DigitalOcean error envelope.

use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Default API endpoint. Overridable for tests.
pub const DEFAULT_API_BASE: &str = "https://api.digitalocean.com";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors raised by `DoClient` calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with a non-success status. The message is the
    /// `message` field of the error envelope when the body decodes, the
    /// raw body (or status text) otherwise.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// The request never produced an API response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API returned a success status with a body that is not JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Pagination options for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn first(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }
}

/// Error envelope returned by the DigitalOcean API
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

/// Bearer-authenticated client for `https://api.digitalocean.com/v2`
#[derive(Clone)]
pub struct DoClient {
    http: Client,
    base: String,
    token: String,
}

impl DoClient {
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_base(token, DEFAULT_API_BASE)
    }

    pub fn with_base(token: &str, base: &str) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            // Tokens pasted from shell configs occasionally keep their quotes
            token: token.trim().trim_matches('\'').to_string(),
        })
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn get_paged(&self, path: &str, page: Page) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None, Some(page)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body), None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Some(body), None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None, None).await
    }

    pub async fn delete_with_body(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, Some(body), None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        page: Option<Page>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/v2/{}", self.base, path.trim_start_matches('/'));

        let mut request = self.http.request(method, &url).bearer_auth(&self.token);
        if let Some(page) = page {
            request = request.query(&[("page", page.page), ("per_page", page.per_page)]);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&text, status),
            });
        }

        if text.is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Unwrap a named envelope key (`{"droplet": {...}}` -> `{...}`), falling
/// back to the whole body when the key is absent so unknown payloads still
/// round-trip.
pub fn section(mut body: Value, key: &str) -> Value {
    if let Value::Object(map) = &mut body {
        if let Some(inner) = map.remove(key) {
            return inner;
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_unwraps_envelope_key() {
        let body = json!({"droplet": {"id": 123}});
        assert_eq!(section(body, "droplet"), json!({"id": 123}));
    }

    #[test]
    fn section_falls_back_to_whole_body() {
        let body = json!({"unexpected": true});
        assert_eq!(section(body.clone(), "droplet"), body);
        assert_eq!(section(json!([1, 2]), "droplet"), json!([1, 2]));
    }

    #[test]
    fn error_message_prefers_envelope() {
        let msg = error_message(
            r#"{"id":"not_found","message":"droplet not found"}"#,
            StatusCode::NOT_FOUND,
        );
        assert_eq!(msg, "droplet not found");
    }

    #[test]
    fn error_message_falls_back_to_body_then_status() {
        assert_eq!(
            error_message("plain text", StatusCode::BAD_GATEWAY),
            "plain text"
        );
        assert_eq!(error_message("", StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn client_cleans_token() {
        let client = DoClient::new(" 'dop_v1_abc' ").unwrap();
        assert_eq!(client.token, "dop_v1_abc");
    }
}
