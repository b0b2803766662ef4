//! # Wisp - Minimal Web Page Viewer
//!
//! Fetches an HTML page, reduces its element tree to a flat list of
//! rendering instructions, and lays that list out as wrapped monospace
//! text with inline images, clickable links and single-line form fields.
//!
//! ## Architecture
//!
//! - **engine**: browsing session, history, form submission, input events
//! - **renderer**: HTML parsing, simplification, word wrap and layout
//! - **network**: blocking HTTP/file fetching with bounded retry
//! - **ui**: eframe/egui window
//! - **config**: JSON-loadable viewer settings
//! - **utils**: shared error types

pub mod config;
pub mod engine;
pub mod network;
pub mod renderer;
pub mod ui;
pub mod utils;

// Re-export main types for convenience
pub use config::ViewerConfig;
pub use engine::{NavState, Session};
pub use utils::error::{Result, WispError};

/// Viewer version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Wisp";
