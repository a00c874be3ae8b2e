//! Classification of unsuccessful HTTP responses.

use reqwest::{Response, StatusCode};

/// A request that reached the server but came back with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpStatusError {
    /// Rate limit exceeded (HTTP 403 with an exhausted rate limit, or 429)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Any other 4xx
    ClientError(String),
    /// 5xx
    ServerError(String),
}

impl std::fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatusError::RateLimitExceeded(msg) => {
                write!(
                    f,
                    "Rate limit exceeded: {}. Try again later or set GITHUB_TOKEN environment variable.",
                    msg
                )
            }
            HttpStatusError::AuthenticationFailed(msg) => {
                write!(
                    f,
                    "Authentication failed: {}. Check your GITHUB_TOKEN.",
                    msg
                )
            }
            HttpStatusError::NotFound(msg) => {
                write!(f, "Not found: {}", msg)
            }
            HttpStatusError::Forbidden(msg) => {
                write!(f, "Access forbidden: {}. You may need authentication.", msg)
            }
            HttpStatusError::ClientError(msg) => {
                write!(f, "Request error: {}", msg)
            }
            HttpStatusError::ServerError(msg) => {
                write!(f, "Server error: {}", msg)
            }
        }
    }
}

impl std::error::Error for HttpStatusError {}

/// Header GitHub sets to the number of requests left in the current window.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Maps an unsuccessful status to an [`HttpStatusError`].
/// Returns `None` for statuses that are not 4xx or 5xx.
pub fn classify_status(
    status: StatusCode,
    url: &str,
    rate_limit_exhausted: bool,
) -> Option<HttpStatusError> {
    let classified = match status {
        StatusCode::UNAUTHORIZED => HttpStatusError::AuthenticationFailed(format!(
            "Invalid or missing authentication token for {}",
            url
        )),
        StatusCode::FORBIDDEN if rate_limit_exhausted => {
            HttpStatusError::RateLimitExceeded("GitHub API rate limit exceeded".to_string())
        }
        StatusCode::FORBIDDEN => {
            HttpStatusError::Forbidden(format!("Access to {} is forbidden", url))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            HttpStatusError::RateLimitExceeded("Too many requests".to_string())
        }
        StatusCode::NOT_FOUND => HttpStatusError::NotFound(url.to_string()),
        s if s.is_client_error() => {
            HttpStatusError::ClientError(format!("HTTP {} from {}", s.as_u16(), url))
        }
        s if s.is_server_error() => {
            HttpStatusError::ServerError(format!("HTTP {} from {}", s.as_u16(), url))
        }
        _ => return None,
    };

    Some(classified)
}

/// Passes a successful response through, or turns an error status into a
/// classified [`HttpStatusError`]. The rate limit headers are read before the
/// response is consumed.
pub fn check_status(response: Response) -> anyhow::Result<Response> {
    let rate_limit_exhausted = response
        .headers()
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    match classify_status(
        response.status(),
        response.url().as_str(),
        rate_limit_exhausted,
    ) {
        Some(classified) => Err(classified.into()),
        None => Ok(response),
    }
}
