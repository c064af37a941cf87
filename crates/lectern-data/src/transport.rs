//! Request transports.

use crate::request::{Body, Method, RequestBuilder};
use crate::{FetchError, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can execute a built request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

/// Transport over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_form(parts: Vec<crate::request::Part>) -> Result<reqwest::multipart::Form, FetchError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let mut p = reqwest::multipart::Part::bytes(part.data);
        if let Some(file_name) = part.file_name {
            p = p.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            p = p
                .mime_str(&content_type)
                .map_err(|e| FetchError::RequestError(e.to_string()))?;
        }
        form = form.part(part.name, p);
    }
    Ok(form)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            headers,
            query,
            body,
        } = request;

        tracing::debug!(method = method.as_str(), url = %url, "sending request");

        let mut builder = self.client.request(to_reqwest(method), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder = match body {
            Body::Empty => builder,
            Body::Bytes(bytes) => builder.body(bytes),
            Body::Multipart(parts) => builder.multipart(to_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, bytes = body.len(), url = %url, "response received");
        Ok(Response::new(status, headers, body))
    }
}
