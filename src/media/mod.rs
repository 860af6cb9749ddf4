//! Signed access to files on the media host.
//!
//! # Overview
//!
//! - [`sign_parameters`] - Canonical SHA-1 request signature
//! - [`parse_media_url`] - Recover resource identifiers from a stored URL
//! - [`MediaSigner`] - Upload signatures and signed download API URLs
//! - [`MediaProxy`] - Fetch a stored file, re-signing on 401
//!
//! # Example
//!
//! ```no_run
//! use sitedata_core::media::{MediaProxy, MediaSigner};
//! use sitedata_core::{SiteConfig, build_http_client};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SiteConfig::from_env()?;
//! let proxy = MediaProxy::new(build_http_client()?, config.media.map(MediaSigner::new));
//!
//! let download = proxy
//!     .fetch("https://res.cloudinary.com/demo/raw/upload/v1/brochures/guide.pdf", "Course Guide")
//!     .await?;
//! let mut file = tokio::fs::File::create(&download.filename).await?;
//! download.write_to(&mut file).await?;
//! # Ok(())
//! # }
//! ```

mod asset_url;
mod error;
mod filename;
mod proxy;
mod signer;

pub use asset_url::{DeliveryType, MediaAsset, ResourceKind, parse_media_url};
pub use error::MediaError;
pub use filename::{DOWNLOAD_EXTENSION, content_disposition, download_filename, sanitize_display_name};
pub use proxy::{MEDIA_RESPONSE_TIMEOUT, MediaDownload, MediaProxy};
pub use signer::{
    MediaSigner, UPLOAD_ACCESS_MODE, UPLOAD_DELIVERY_TYPE, UploadSignature, canonical_string,
    sign_parameters,
};
