//! Intercepted requests and their cache identity.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use super::{Headers, Method};

/// A request intercepted by the worker, or issued by it during install.
///
/// URLs are origin-relative (`/hub/static/logo.svg?v=2`); the worker only
/// ever handles traffic for the origin it is installed under.
///
/// # Examples
///
/// ```
/// use precache::http::{Method, Request};
///
/// let req = Request::get("/logo.svg?v=2#frag");
/// assert_eq!(req.method(), &Method::Get);
/// assert_eq!(req.path(), "/logo.svg");
/// assert_eq!(req.query_string(), Some("v=2"));
/// assert_eq!(req.cache_key().to_string(), "GET /logo.svg?v=2");
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Creates a request with the given method and origin-relative URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a GET request, the form every pre-cache fetch takes.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The URL exactly as supplied, fragment included.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The path component, without query string or fragment.
    pub fn path(&self) -> &str {
        let end = self.url.find(['?', '#']).unwrap_or(self.url.len());
        &self.url[..end]
    }

    /// The query string without the leading `?`, if any.
    pub fn query_string(&self) -> Option<&str> {
        let after_q = &self.url[self.url.find('?')? + 1..];
        let end = after_q.find('#').unwrap_or(after_q.len());
        Some(&after_q[..end])
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// The exact-match identity this request has in a cache bucket.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::of(self)
    }
}

impl FromStr for Request {
    type Err = std::convert::Infallible;

    /// Parses a bare URL into a GET request, so manifest paths convert
    /// directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::get(s))
    }
}

/// The lookup key for a request in a cache bucket.
///
/// Matching is exact on method plus normalized URL: the fragment is
/// stripped (it never travels on the wire), the query string is kept, and
/// request headers are ignored. No Vary handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: String,
    url: String,
}

impl CacheKey {
    /// Derives the key for a request.
    pub fn of(request: &Request) -> Self {
        let url = request.url();
        let end = url.find('#').unwrap_or(url.len());
        Self {
            method: request.method().as_str().to_owned(),
            url: url[..end].to_owned(),
        }
    }

    /// The key a manifest path gets when pre-cached (always GET).
    pub fn for_path(path: &str) -> Self {
        Self::of(&Request::get(path))
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_query_split() {
        let req = Request::get("/search?q=rust&page=2");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query_string(), Some("q=rust&page=2"));

        let bare = Request::get("/");
        assert_eq!(bare.path(), "/");
        assert_eq!(bare.query_string(), None);
    }

    #[test]
    fn fragment_stripped_from_key_but_not_query() {
        let req = Request::get("/page?tab=1#section");
        let key = req.cache_key();
        assert_eq!(key.url(), "/page?tab=1");
        assert_eq!(req.query_string(), Some("tab=1"));
    }

    #[test]
    fn query_string_distinguishes_keys() {
        let a = Request::get("/logo.png").cache_key();
        let b = Request::get("/logo.png?v=2").cache_key();
        assert_ne!(a, b);
    }

    #[test]
    fn method_distinguishes_keys() {
        let get = Request::get("/api").cache_key();
        let head = Request::new(Method::Head, "/api").cache_key();
        assert_ne!(get, head);
    }

    #[test]
    fn headers_do_not_affect_key() {
        let plain = Request::get("/").cache_key();
        let decorated = Request::get("/")
            .header("Accept", "text/html")
            .cache_key();
        assert_eq!(plain, decorated);
    }

    #[test]
    fn bare_url_parses_to_get() {
        let req: Request = "/logo.png".parse().unwrap();
        assert_eq!(req.method(), &Method::Get);
        assert_eq!(req.url(), "/logo.png");
    }

    #[test]
    fn manifest_path_key_matches_request_key() {
        assert_eq!(
            CacheKey::for_path("/manifest.json"),
            Request::get("/manifest.json").cache_key()
        );
    }
}
