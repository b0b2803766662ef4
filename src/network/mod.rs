//! Network collaborator for the viewer
//!
//! Fetching is blocking and happens inside a page load; a failed fetch is
//! retried a fixed number of times before it is reported.

mod client;
mod request;
mod response;
pub mod address;

pub use client::{HttpClient, with_retries};
pub use request::{Method, Request};
pub use response::Response;

use crate::utils::Result;

/// Anything that can turn a request into response bytes
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// Fetch a resource, retrying as the implementation sees fit
    fn fetch(&self, request: &Request) -> Result<Response>;
}
