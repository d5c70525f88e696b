//! Remote contact collections.
//!
//! This module provides:
//! - `ContactSource` trait for abstracting where pages of contacts come from
//! - `HttpContactSource` implementation backed by the JSON contacts API
//! - Types naming the collection a fetch targets and the ways it can fail
//!
//! The UI never talks to the network directly; tests drive it with
//! scripted sources instead of a live server.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::contact::Contact;

/// Which collection a fetch targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Country(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all contacts"),
            Scope::Country(name) => write!(f, "{name} contacts"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for paginated contact sources
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Fetch one page of the given scope. Pages are 1-based.
    async fn fetch_page(&self, scope: &Scope, page: u32) -> Result<Vec<Contact>, FetchError>;
}
