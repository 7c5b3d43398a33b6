//! Network abstraction for the remote allocator.
//!
//! The allocator only needs one operation: a bounded HTTP `GET` that returns
//! a status and a text body. Keeping it behind [`HttpClient`] lets tests
//! swap in a mock and count requests, and keeps the status policy in the
//! allocator rather than in the transport.
//!
//! # Contract
//!
//! - Return `Ok` for *every* HTTP response, whatever the status code.
//! - Return [`TransportError::Timeout`] when a connect/send/receive deadline
//!   expires, [`TransportError::Connection`] for everything else that
//!   prevented a response (DNS, TLS, refused connection, ...).
//! - Never retry. One call, one round trip.

use url::Url;

/// An outbound HTTP `GET`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// Full URL including query string.
    pub url: Url,
    /// Request headers (name, value).
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a request with no headers.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a query parameter. Key-only parameters yield `Some("")`.
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// An HTTP response as seen by the allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200 OK` with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any HTTP response.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// A connect, send or receive deadline expired.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Connection, TLS or protocol failure.
    #[error("transport failure: {0}")]
    Connection(String),
}

/// Blocking HTTP client used by the remote allocator.
pub trait HttpClient: Send + Sync {
    /// Perform a single `GET`.
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).get(request)
    }
}
