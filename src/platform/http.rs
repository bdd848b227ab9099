//! Shared HTTP client for the platform REST API
//!
//! One `ApiClient` is constructed per process and shared by the identity and
//! document clients. Timeouts are the client defaults below; individual
//! operations are not separately cancellable.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from platform API calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether the platform reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Whether the platform rejected the caller's credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 400 | 401 | 403, .. })
    }
}

/// Truncate an error body for logging without splitting a UTF-8 character
fn truncate_body(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Bearer-authenticated JSON client for the platform API
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str, api_token: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("slidecloud/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Platform API request");
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
    }

    /// Execute a request and map non-success statuses to `ApiError::Status`
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::Parse(format!(
                "JSON parse error: {} - Body: {}",
                e,
                truncate_body(&text, 500)
            ))
        })
    }

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Self::parse_json(response).await
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        Self::parse_json(response).await
    }

    /// PUT a JSON body, discarding the response body
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.execute(self.request(Method::PUT, path).json(body))
            .await?;
        Ok(())
    }

    /// PATCH a JSON body, discarding the response body
    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.execute(self.request(Method::PATCH, path).json(body))
            .await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("https://api.slidecloud.dev/", "tok");
        assert_eq!(client.base_url(), "https://api.slidecloud.dev");
    }

    #[test]
    fn test_status_classification() {
        let not_found = ApiError::Status {
            status: 404,
            message: String::new(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unauthorized());

        let denied = ApiError::Status {
            status: 401,
            message: String::new(),
        };
        assert!(denied.is_unauthorized());
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // Byte 500 of this body falls inside a two-byte character
        let body = format!("a{}", "é".repeat(600));
        let truncated = truncate_body(&body, 500);
        assert!(truncated.len() <= 500);
        assert!(body.starts_with(truncated));

        // Short and exact-length bodies pass through whole
        assert_eq!(truncate_body("short", 500), "short");
        let ascii = "x".repeat(500);
        assert_eq!(truncate_body(&ascii, 500), ascii);
    }
}
