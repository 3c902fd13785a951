//! HTTP request and response types described as plain data.
//!
//! # Design
//! The client builds an `HttpRequest` without touching the network, hands it
//! to a `Transport`, and decodes the `HttpResponse` it gets back. Keeping the
//! request as data makes header and URL construction testable without a
//! server.
//!
//! Responses are fully read by the transport, so the body is owned by the
//! `HttpResponse` and released when it is dropped, on success and on error.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full URL: base URL concatenated with the endpoint, query included.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON-encoded body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully read HTTP response.
///
/// The body is kept as raw bytes: whether it is UTF-8 or JSON at all is a
/// decoding concern, not a transport one.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}
