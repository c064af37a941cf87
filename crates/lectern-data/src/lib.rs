//! HTTP client utilities for Lectern.
//!
//! Provides a small builder API over a pluggable [`Transport`], with base-URL
//! joining, default headers and a shared bearer token.
//!
//! # Example
//!
//! ```rust,ignore
//! use lectern_data::FetchClient;
//!
//! let client = FetchClient::new()?.with_base_url("http://localhost:8000");
//!
//! let books: Vec<Book> = client
//!     .get("books/")
//!     .query("search_term", "rust")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//!
//! client.set_bearer(token);
//! let created: OrderCreated = client
//!     .post("orders/")
//!     .json(&[1, 2, 3])?
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

pub use error::{FetchError, UNEXPECTED_ERROR};
pub use request::{Body, Method, Part, RequestBuilder};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport, DEFAULT_TIMEOUT};

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// HTTP client for making outbound requests.
///
/// Clones share the transport and the bearer token, so setting the token on
/// one handle authorizes every later request made through any of them.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    bearer: Arc<RwLock<Option<String>>>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("authorized", &self.has_bearer())
            .finish()
    }
}

impl FetchClient {
    /// Create a client over `reqwest` with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client over `reqwest` with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self::with_transport(ReqwestTransport::new(timeout)?))
    }

    /// Create a client over any transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            bearer: Arc::new(RwLock::new(None)),
            transport: Arc::new(transport),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Authorize every subsequent request with `token`.
    pub fn set_bearer(&self, token: impl Into<String>) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = Some(token.into());
        }
    }

    /// Stop sending an `Authorization` header.
    pub fn clear_bearer(&self) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = None;
        }
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.read().map(|b| b.is_some()).unwrap_or(false)
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !is_absolute(&url) => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }
        if let Ok(bearer) = self.bearer.read() {
            if let Some(token) = bearer.as_deref() {
                builder = builder.bearer_auth(token);
            }
        }

        ClientRequestBuilder {
            builder,
            transport: Arc::clone(&self.transport),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Append several query parameters.
    pub fn query_all(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.builder = self.builder.query_all(pairs);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Set a multipart form body.
    pub fn multipart(mut self, parts: Vec<Part>) -> Self {
        self.builder = self.builder.multipart(parts);
        self
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// The request as built so far.
    pub fn build(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        self.transport.send(self.builder).await
    }

    /// Send, fail on non-2xx, and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }

    /// Send and fail on non-2xx, ignoring the body.
    pub async fn send_ok(self) -> Result<Response, FetchError> {
        self.send().await?.error_for_status()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Part, Response, Transport};
}
