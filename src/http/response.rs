//! Response snapshots.
//!
//! A [`Response`] is both what the network fetcher yields and what a cache
//! bucket stores. Bodies are [`Bytes`], so cloning a stored snapshot to
//! serve it is a reference-count bump, not a copy.

use bytes::Bytes;

use super::{Headers, StatusCode};

/// An HTTP response: status, headers, body.
///
/// # Examples
///
/// ```
/// use precache::http::{Response, StatusCode};
///
/// let resp = Response::new(StatusCode::OK)
///     .header("Content-Type", "application/json")
///     .body(r#"{"name":"nukelab"}"#.as_bytes().to_vec());
///
/// assert!(resp.is_success());
/// assert_eq!(resp.headers().get("content-type"), Some("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces all headers at once. Used when rebuilding a response from
    /// parsed wire data.
    #[must_use]
    pub fn headers_from(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Shorthand for `status().is_success()`.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_byte_identical() {
        let resp = Response::new(StatusCode::OK)
            .header("ETag", "\"v1\"")
            .body(Bytes::from_static(b"<svg/>"));
        let snapshot = resp.clone();
        assert_eq!(snapshot, resp);
        assert_eq!(snapshot.body_bytes(), resp.body_bytes());
    }

    #[test]
    fn success_follows_status() {
        assert!(Response::new(StatusCode::NO_CONTENT).is_success());
        assert!(!Response::new(StatusCode::NOT_FOUND).is_success());
    }
}
