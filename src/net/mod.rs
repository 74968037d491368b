//! Outbound network fetching.
//!
//! [`NetworkFetcher`] is the capability the worker uses both to populate
//! the cache at install time and to fall back to the network on a cache
//! miss. [`TcpFetcher`] is the shipped implementation: a same-origin
//! HTTP/1.1 client over a plain TCP stream.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::http::{Headers, Request, Response};

/// Errors produced while fetching over the network.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed HTTP response: {0}")]
    Parse(#[from] httparse::Error),

    #[error("connection closed before a complete response arrived")]
    Incomplete,

    #[error("response exceeds maximum buffered size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },
}

/// Capability interface for performing a live network fetch.
#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    /// Fetches `request` from the network and returns whatever the origin
    /// produced — success or error status alike. Only transport-level
    /// problems become an `Err`.
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Maximum size of a complete HTTP response we will buffer (8 MiB).
const MAX_RESPONSE_SIZE: usize = 8 * 1024 * 1024;

/// Initial read buffer capacity per fetch.
const INITIAL_BUF_SIZE: usize = 4096;

/// Maximum number of response headers we support.
const MAX_HEADERS: usize = 64;

/// HTTP/1.1 fetcher over [`TcpStream`].
///
/// Bound to a single authority (the origin the worker serves), matching
/// the origin-relative URLs in [`Request`]. Each fetch opens a fresh
/// connection and sends `Connection: close`, so end-of-body is signalled
/// by EOF even when the origin omits `Content-Length`.
///
/// # Examples
///
/// ```rust,no_run
/// use precache::net::{NetworkFetcher, TcpFetcher};
/// use precache::http::Request;
///
/// # async fn demo() -> Result<(), precache::net::FetchError> {
/// let fetcher = TcpFetcher::new("127.0.0.1:8000");
/// let response = fetcher.fetch(&Request::get("/manifest.json")).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
pub struct TcpFetcher {
    authority: String,
    host: String,
}

impl TcpFetcher {
    /// Creates a fetcher for the given `host:port` authority. The `Host`
    /// header defaults to the authority itself.
    pub fn new(authority: impl Into<String>) -> Self {
        let authority = authority.into();
        Self {
            host: authority.clone(),
            authority,
        }
    }

    /// Overrides the `Host` header, for origins behind a fronting proxy.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    fn serialize_head(&self, request: &Request) -> String {
        // The fragment never travels on the wire.
        let target = request.cache_key().url().to_owned();
        let mut head = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n",
            request.method(),
            target,
            self.host
        );
        for (name, value) in request.headers().iter() {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        if !request.body_bytes().is_empty() {
            head.push_str(&format!("Content-Length: {}\r\n", request.body_bytes().len()));
        }
        head.push_str("\r\n");
        head
    }
}

#[async_trait]
impl NetworkFetcher for TcpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        debug!(authority = %self.authority, url = %request.url(), "network fetch");

        let mut stream = TcpStream::connect(&self.authority).await?;
        stream.write_all(self.serialize_head(request).as_bytes()).await?;
        if !request.body_bytes().is_empty() {
            stream.write_all(request.body_bytes()).await?;
        }
        stream.flush().await?;

        // Connection: close — read until the origin hangs up.
        let mut buf = BytesMut::with_capacity(INITIAL_BUF_SIZE);
        loop {
            let bytes_read = stream.read_buf(&mut buf).await?;
            if bytes_read == 0 {
                break;
            }
            if buf.len() > MAX_RESPONSE_SIZE {
                return Err(FetchError::TooLarge {
                    max_bytes: MAX_RESPONSE_SIZE,
                });
            }
        }

        parse_response(&buf)
    }
}

/// Parses a complete HTTP/1.1 response from a byte buffer.
fn parse_response(buf: &[u8]) -> Result<Response, FetchError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut raw = httparse::Response::new(&mut headers);

    let body_offset = match raw.parse(buf)? {
        httparse::Status::Complete(offset) => offset,
        httparse::Status::Partial => return Err(FetchError::Incomplete),
    };

    let status = raw.code.ok_or(FetchError::Incomplete)?;

    let header_map: Headers = raw
        .headers
        .iter()
        .filter_map(|h| {
            std::str::from_utf8(h.value)
                .ok()
                .map(|v| (h.name.to_owned(), v.to_owned()))
        })
        .collect();

    let mut body = &buf[body_offset..];
    if let Some(len) = header_map.get("content-length").and_then(|v| v.parse().ok()) {
        if body.len() < len {
            return Err(FetchError::Incomplete);
        }
        body = &body[..len];
    }

    Ok(Response::new(status.into())
        .headers_from(header_map)
        .body(Bytes::copy_from_slice(body)))
}
