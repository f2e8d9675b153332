// GitHub API HTTP client.
// Handles authentication, rate limit tracking, and response classification.

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{DeckError, Result};

use super::types::{ApiErrorBody, RateLimit};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with authentication and rate limit tracking.
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    rate_limit: RateLimit,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| DeckError::Other(e.to_string()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("repodeck-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(DeckError::Api)?;

        Ok(Self {
            client,
            rate_limit: RateLimit::default(),
        })
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&mut self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.get(&url)).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.get(&url).query(params)).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<B: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.post(&url).json(body)).await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch_json<B: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.patch(&url).json(body)).await
    }

    /// Make a PUT request with a JSON body.
    pub async fn put_json<B: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.put(&url).json(body)).await
    }

    /// Make a DELETE request.
    pub async fn delete(&mut self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.delete(&url)).await
    }

    /// Make a DELETE request with a JSON body (contents API).
    pub async fn delete_json<B: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.send(self.client.delete(&url).json(body)).await
    }

    /// Send a request, track rate limit headers, and classify the response.
    async fn send(&mut self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(DeckError::Api)?;
        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        if let Some(limit) = response
            .headers()
            .get("x-ratelimit-limit")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        {
            self.rate_limit.limit = limit;
        }

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        {
            self.rate_limit.remaining = remaining;
        }

        if let Some(reset) = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        {
            self.rate_limit.reset = reset;
        }
    }

    /// Check response status and convert failures into errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK
            | StatusCode::CREATED
            | StatusCode::ACCEPTED
            | StatusCode::NO_CONTENT => Ok(response),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(DeckError::NotFound(url))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(classify_failure(status, &body, &self.rate_limit))
            }
        }
    }
}

/// Map a non-success status and its body to an error. The body is parsed
/// best-effort; when it is not the structured GitHub error shape, the
/// message falls back to the HTTP status line.
fn classify_failure(status: StatusCode, body: &str, rate_limit: &RateLimit) -> DeckError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();

    match status {
        StatusCode::UNAUTHORIZED => DeckError::Unauthorized,
        StatusCode::FORBIDDEN => {
            if rate_limit.remaining == 0 && rate_limit.limit > 0 {
                let reset_at = chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                DeckError::RateLimited { reset_at }
            } else {
                DeckError::Unauthorized
            }
        }
        StatusCode::UNPROCESSABLE_ENTITY
            if parsed
                .as_ref()
                .is_some_and(ApiErrorBody::has_existing_name_error) =>
        {
            DeckError::NameExists
        }
        status => {
            let message = parsed
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            DeckError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_limit() -> RateLimit {
        RateLimit::default()
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, "", &no_limit());
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_classify_forbidden_as_auth_failure() {
        // 403 without an exhausted rate budget is indistinguishable from a
        // bad or under-scoped token.
        let limit = RateLimit {
            limit: 5000,
            remaining: 4000,
            reset: 0,
        };
        let err = classify_failure(StatusCode::FORBIDDEN, "", &limit);
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_classify_forbidden_rate_limited() {
        let limit = RateLimit {
            limit: 5000,
            remaining: 0,
            reset: 1700000000,
        };
        let err = classify_failure(StatusCode::FORBIDDEN, "", &limit);
        assert!(matches!(err, DeckError::RateLimited { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_duplicate_name() {
        let body = r#"{
            "message": "Repository creation failed.",
            "errors": [{"resource": "Repository", "field": "name",
                        "message": "name already exists on this account"}]
        }"#;
        let err = classify_failure(StatusCode::UNPROCESSABLE_ENTITY, body, &no_limit());
        assert!(matches!(err, DeckError::NameExists));
    }

    #[test]
    fn test_classify_other_validation_error() {
        let body = r#"{"message": "Validation Failed", "errors": []}"#;
        let err = classify_failure(StatusCode::UNPROCESSABLE_ENTITY, body, &no_limit());
        match err {
            DeckError::Status { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Validation Failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_unparseable_body_falls_back_to_status_line() {
        let err = classify_failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>oops</html>",
            &no_limit(),
        );
        match err {
            DeckError::Status { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_server_error_retryable() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "", &no_limit());
        assert!(err.is_retryable());
    }
}
