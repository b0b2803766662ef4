//! Error types for the Wisp viewer

use thiserror::Error;

/// Main error type for Wisp operations
#[derive(Debug, Error)]
pub enum WispError {
    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    /// Rendering/parsing errors
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration could not be read or decoded
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Network-specific errors
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The address could not be parsed or resolved against the current page
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Scheme other than http, https or file
    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),
    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },
    /// Transport-level failure (DNS, TLS, connection, local file read)
    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },
    /// Every attempt of the bounded retry loop failed
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<NetworkError>,
    },
}

/// Rendering-specific errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// HTML parsing error
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    /// Image bytes could not be decoded
    #[error("image decode error: {0}")]
    ImageDecode(String),
}

/// Convenience Result type for Wisp operations
pub type Result<T> = std::result::Result<T, WispError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_exhausted_reports_cause() {
        let err: WispError = NetworkError::RetriesExhausted {
            url: "https://x.test/".to_string(),
            attempts: 3,
            last: Box::new(NetworkError::Http {
                status: 503,
                url: "https://x.test/".to_string(),
            }),
        }
        .into();
        let message = err.to_string();
        assert!(message.contains("after 3 attempts"));
        assert!(message.contains("HTTP 503"));
    }

    #[test]
    fn test_render_error_conversion() {
        let err: WispError = RenderError::HtmlParse("unexpected eof".into()).into();
        assert!(matches!(err, WispError::Render(RenderError::HtmlParse(_))));
    }
}
