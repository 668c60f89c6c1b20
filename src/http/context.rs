//! The per-request context handed to handlers and middleware after route
//! matching.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use bytes::Bytes;

// Layer 3: Internal module imports
use crate::util::RequestId;

/// An inbound HTTP request, matched against a route and carrying its
/// captured `:param` segments plus a resolved request id.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: String,
    path: String,
    params: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl RequestContext {
    /// Construct a context for a matched request.
    pub fn new(
        request_id: RequestId,
        method: impl Into<String>,
        path: impl Into<String>,
        params: HashMap<String, String>,
        headers: HashMap<String, String>,
        body: Bytes,
    ) -> Self {
        Self {
            request_id,
            method: method.into(),
            path: path.into(),
            params,
            headers,
            body,
        }
    }

    /// Request id echoed on `X-Request-ID`: extracted from the inbound
    /// header if present, otherwise freshly generated.
    pub fn request_id(&self) -> RequestId {
        self.request_id.clone()
    }

    /// The request's HTTP method, uppercased.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request's path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// A captured `:name` path segment, if the matched route declared one.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All captured path parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// A request header, case-sensitive on the stored key.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// All request headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The raw request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the body as JSON into `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Rebuild this context with `params` substituted in, once the router
    /// has matched a route and captured its path parameters.
    pub(crate) fn with_params(self, params: HashMap<String, String>) -> Self {
        Self { params, ..self }
    }
}
