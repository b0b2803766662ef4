//! HTTP client implementation

use super::{Fetcher, Method, Request, Response};
use crate::config::ViewerConfig;
use crate::utils::{NetworkError, Result};
use std::time::Duration;
use url::Url;

/// Blocking HTTP(S) and `file://` fetcher with a bounded retry loop
pub struct HttpClient {
    client: reqwest::blocking::Client,
    attempts: u32,
}

impl HttpClient {
    /// Create a client from the viewer configuration
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| NetworkError::Transport {
                url: String::new(),
                message: format!("failed to create client: {e}"),
            })?;
        Ok(Self {
            client,
            attempts: config.fetch_retries.max(1),
        })
    }

    /// One network round trip, no retry
    fn send_once(&self, request: &Request) -> std::result::Result<Response, NetworkError> {
        let url = request.url();
        let mut builder = match request.method() {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };
        for (key, value) in request.headers() {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body_bytes() {
            builder = builder.body(body.to_vec());
        }

        let transport = |e: reqwest::Error| NetworkError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = builder.send().map_err(transport)?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(NetworkError::Http {
                status,
                url: url.to_string(),
            });
        }
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(transport)?;

        let mut result = Response::new(status, body.to_vec()).with_final_url(final_url);
        if let Some(content_type) = content_type {
            result = result.with_content_type(content_type);
        }
        Ok(result)
    }
}

impl Fetcher for HttpClient {
    fn fetch(&self, request: &Request) -> Result<Response> {
        let url = request.url();
        match url.scheme() {
            "http" | "https" => Ok(with_retries(self.attempts, url, || self.send_once(request))?),
            "file" => Ok(read_local_file(url)?),
            other => Err(NetworkError::UnsupportedScheme(other.to_string()).into()),
        }
    }
}

/// Run `op` up to `attempts` times, stopping early on success or on an
/// error that retrying cannot fix
pub fn with_retries<T>(
    attempts: u32,
    url: &Url,
    mut op: impl FnMut() -> std::result::Result<T, NetworkError>,
) -> std::result::Result<T, NetworkError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if !is_retryable(&err) => return Err(err),
            Err(err) if attempt >= attempts => {
                return Err(NetworkError::RetriesExhausted {
                    url: url.to_string(),
                    attempts,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                log::warn!("Fetch attempt {attempt}/{attempts} for {url} failed: {err}");
                attempt += 1;
            }
        }
    }
}

/// Client errors (4xx) will not change on a second try
fn is_retryable(err: &NetworkError) -> bool {
    match err {
        NetworkError::Http { status, .. } => !(400..500).contains(status),
        NetworkError::Transport { .. } => true,
        _ => false,
    }
}

fn read_local_file(url: &Url) -> std::result::Result<Response, NetworkError> {
    let path = url.to_file_path().map_err(|()| NetworkError::InvalidUrl {
        url: url.to_string(),
        reason: "not a local path".to_string(),
    })?;
    let body = std::fs::read(&path).map_err(|e| NetworkError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(Response::new(200, body).with_final_url(url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn url() -> Url {
        Url::parse("https://x.test/").unwrap()
    }

    fn transport() -> NetworkError {
        NetworkError::Transport {
            url: "https://x.test/".into(),
            message: "connection reset".into(),
        }
    }

    #[test]
    fn test_retry_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result = with_retries(3, &url(), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 { Err(transport()) } else { Ok("body") }
        });
        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_budget_is_bounded() {
        let calls = Cell::new(0);
        let result: std::result::Result<(), _> = with_retries(3, &url(), || {
            calls.set(calls.get() + 1);
            Err(transport())
        });
        assert_eq!(calls.get(), 3);
        assert!(matches!(
            result,
            Err(NetworkError::RetriesExhausted { attempts: 3, .. })
        ));
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: std::result::Result<(), _> = with_retries(5, &url(), || {
            calls.set(calls.get() + 1);
            Err(NetworkError::Http {
                status: 404,
                url: "https://x.test/".into(),
            })
        });
        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(NetworkError::Http { status: 404, .. })));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let calls = Cell::new(0);
        let _ = with_retries(0, &url(), || {
            calls.set(calls.get() + 1);
            Ok::<_, NetworkError>(())
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_fetch_local_file() {
        let path = std::env::temp_dir().join(format!("wisp-client-{}.html", std::process::id()));
        std::fs::write(&path, "<p>local</p>").unwrap();
        let client = HttpClient::new(&ViewerConfig::default()).unwrap();
        let url = Url::from_file_path(&path).unwrap();
        let response = client.fetch(&Request::get(url)).unwrap();
        assert_eq!(response.body(), b"<p>local</p>");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unsupported_scheme() {
        let client = HttpClient::new(&ViewerConfig::default()).unwrap();
        let url = Url::parse("gopher://x.test/").unwrap();
        let err = client.fetch(&Request::get(url)).unwrap_err();
        assert!(matches!(
            err,
            crate::WispError::Network(NetworkError::UnsupportedScheme(_))
        ));
    }

    #[test]
    #[ignore] // Integration test - requires network
    fn test_fetch_example_com() {
        let client = HttpClient::new(&ViewerConfig::default()).unwrap();
        let url = Url::parse("https://example.com").unwrap();
        let response = client.fetch(&Request::get(url)).unwrap();
        assert!(response.is_success());
    }
}
