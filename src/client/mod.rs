//! Paginated fetch-loop client
//!
//! Drains every page of a bounding-box query and hands each batch to a
//! consumer callback. A shared [`GenerationToken`] lets a newer loop
//! (for example after the user pans the map) supersede an in-flight
//! one so stale pages are never applied.

pub mod compat;
pub mod fetch;
pub mod http;

use thiserror::Error;

pub use fetch::{FetchLoop, FetchOutcome, GenerationToken, PageEnvelope, PageSource};
pub use http::HttpPoleClient;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not normalize response: {0}")]
    Decode(String),
}
