//! Spreadsheet-backed content collections.
//!
//! Each sheet on the remote backend holds one record type. A
//! [`CollectionClient`] gives typed CRUD access to one sheet, and
//! [`Collections`] wires one client per registered sheet.
//!
//! # Example
//!
//! ```no_run
//! use sitedata_core::{Collections, SiteConfig, build_http_client};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SiteConfig::from_env()?;
//! let collections = Collections::new(&build_http_client()?, &config);
//!
//! let mut posts = collections.blog.get_all().await;
//! posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
//! # Ok(())
//! # }
//! ```

mod cells;
mod client;
mod error;
pub mod protocol;
mod record;
mod registry;
pub mod types;

pub use client::{BACKEND_TIMEOUT, CollectionClient};
pub use error::{SheetsError, SheetsErrorKind};
pub use protocol::Action;
pub use record::{Record, RecordData, Sheet};
pub use registry::Collections;
