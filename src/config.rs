//! Viewer configuration
//!
//! Every field has a default so a config file only needs to name the
//! values it overrides.

use crate::renderer::LayoutConfig;
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level settings for a viewing session and its shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Page opened when no address is given
    pub home_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Attempts per fetch before the failure is surfaced
    pub fetch_retries: u32,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Horizontal page margin in pixels
    pub margin: f32,
    /// Vertical gap inserted by a separator
    pub separator_gap: f32,
    /// Vertical gap below an image
    pub image_gap: f32,
    /// Width of a form field, in characters
    pub field_width_chars: usize,
    /// Draw a horizontal rule at each separator
    pub separator_rule: bool,
    /// Monospace font size in points
    pub font_size: f32,
    pub window_width: u32,
    pub window_height: u32,
    /// Pixels scrolled per arrow key press
    pub scroll_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            home_url: "https://example.com".to_string(),
            user_agent: format!("{}/{}", crate::NAME.to_lowercase(), crate::VERSION),
            fetch_retries: 3,
            request_timeout_secs: 30,
            margin: 10.0,
            separator_gap: 8.0,
            image_gap: 8.0,
            field_width_chars: 40,
            separator_rule: false,
            font_size: 14.0,
            window_width: 1024,
            window_height: 768,
            scroll_step: 40.0,
        }
    }
}

impl ViewerConfig {
    /// Decode a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and decode a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Layout parameters derived from this configuration
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            margin: self.margin,
            separator_gap: self.separator_gap,
            image_gap: self.image_gap,
            field_width_chars: self.field_width_chars,
            separator_rule: self.separator_rule,
            ..LayoutConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.fetch_retries, 3);
        assert_eq!(config.user_agent, format!("wisp/{}", crate::VERSION));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{"fetch_retries": 5, "margin": 4.0}"#).unwrap();
        assert_eq!(config.fetch_retries, 5);
        assert_eq!(config.margin, 4.0);
        assert_eq!(config.home_url, "https://example.com");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ViewerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::WispError::Config(_)));
    }

    #[test]
    fn test_layout_config_follows_viewer_config() {
        let config = ViewerConfig {
            separator_gap: 20.0,
            ..ViewerConfig::default()
        };
        assert_eq!(config.layout().separator_gap, 20.0);
    }
}
