//! Site Data Core Library
//!
//! This library is the data layer of the marketing site: typed content
//! collections stored in a remote spreadsheet backend, plus signed access to
//! files kept on the media host.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Process configuration, loaded once at startup
//! - [`http`] - Shared HTTP client construction policy
//! - [`sheets`] - Remote collection client, record types, and registry
//! - [`media`] - Request signing, media URL parsing, and the download proxy

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod http;
pub mod media;
pub mod sheets;

// Re-export commonly used types
pub use config::{ConfigError, MediaConfig, SheetsConfig, SiteConfig};
pub use http::{HttpClientError, build_http_client};
pub use media::{
    DeliveryType, MediaAsset, MediaDownload, MediaError, MediaProxy, MediaSigner, ResourceKind,
    UploadSignature, parse_media_url, sign_parameters,
};
pub use sheets::{
    BACKEND_TIMEOUT, CollectionClient, Collections, Record, RecordData, Sheet, SheetsError,
};
