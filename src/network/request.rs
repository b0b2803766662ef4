//! HTTP request types

use std::collections::HashMap;
use url::Url;

/// HTTP methods the viewer issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Create a new request
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Create a POST request
    pub fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Get the URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Get headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get the body, if any
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
