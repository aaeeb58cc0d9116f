//! Data source for the paper index document.
//!
//! The index is a JSON object `{ "subjects": [...] }` published next to the
//! papers. [`IndexClient`] fetches it over HTTP with cache bypass;
//! [`LocalIndex`] reads it from a site checkout on disk.
//!
//! # Example
//!
//! ```no_run
//! use pastpapers_core::http::HttpClient;
//! use pastpapers_core::source::{IndexClient, IndexSource};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = Url::parse("http://localhost:8000/")?;
//! let client = IndexClient::for_site(HttpClient::new()?, &base, "public/data/index.json")?;
//! let subjects = client.load().await?;
//! println!("{} subjects", subjects.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{IndexClient, LocalIndex, decode_index};
pub use error::LoadError;

use async_trait::async_trait;

use crate::catalog::SubjectRecord;

/// Default location of the index document relative to the site root.
pub const DEFAULT_INDEX_PATH: &str = "public/data/index.json";

/// Something the subject list can be loaded from.
///
/// Uses `async_trait` so application state can hold `&dyn IndexSource`.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Loads every subject from the index document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the document cannot be fetched or decoded.
    async fn load(&self) -> Result<Vec<SubjectRecord>, LoadError>;
}
