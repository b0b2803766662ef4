//! HTTP response types

use url::Url;

/// A fetched resource
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    /// Address after redirects
    final_url: Option<Url>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Response {
    /// Create a new response
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            final_url: None,
            content_type: None,
            body: body.into(),
        }
    }

    /// Record the address the body was actually served from
    pub fn with_final_url(mut self, url: Url) -> Self {
        self.final_url = Some(url);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Get the status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response was successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn final_url(&self) -> Option<&Url> {
        self.final_url.as_ref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the response body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(Response::new(200, "ok").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(301, "").is_success());
        assert!(!Response::new(404, "").is_success());
    }

    #[test]
    fn test_builders() {
        let url = Url::parse("https://x.test/final").unwrap();
        let response = Response::new(200, b"<p>x</p>".to_vec())
            .with_final_url(url.clone())
            .with_content_type("text/html");
        assert_eq!(response.final_url(), Some(&url));
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.into_body(), b"<p>x</p>");
    }
}
