//! Request signing for the media host.
//!
//! The host recomputes every signature server-side, so the canonical string
//! must match its algorithm exactly: drop empty parameters, sort by name,
//! join as `name=value` with `&`, append the secret with no separator, then
//! SHA-1 and lowercase hex. A mismatch is not reported as a parse error; the
//! request is simply rejected as unauthorized.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sha1::{Digest, Sha1};
use tracing::{debug, instrument};
use url::Url;

use super::asset_url::{MediaAsset, ResourceKind, parse_media_url};
use super::error::MediaError;
use crate::config::MediaConfig;

/// Access mode requested for browser uploads.
pub const UPLOAD_ACCESS_MODE: &str = "public";

/// Delivery type requested for browser uploads.
pub const UPLOAD_DELIVERY_TYPE: &str = "upload";

/// Computes the media host signature for a parameter set.
///
/// Parameters with empty values are excluded. When a name appears more than
/// once the last value wins.
///
/// # Examples
///
/// ```
/// use sitedata_core::media::sign_parameters;
///
/// let a = sign_parameters([("timestamp", "1315060510"), ("public_id", "sample")], "secret");
/// let b = sign_parameters([("public_id", "sample"), ("timestamp", "1315060510")], "secret");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 40);
/// ```
#[must_use]
pub fn sign_parameters<'a, I>(params: I, secret: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    hex::encode(Sha1::digest(canonical_string(params, secret).as_bytes()))
}

/// Builds the exact byte string that gets hashed.
#[must_use]
pub fn canonical_string<'a, I>(params: I, secret: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sorted: BTreeMap<&str, &str> = params
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    let mut canonical = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    canonical.push_str(secret);
    canonical
}

/// Everything a browser needs to upload straight to the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSignature {
    pub cloud_name: String,
    pub api_key: String,
    pub timestamp: u64,
    pub signature: String,
    pub folder: String,
    pub access_mode: &'static str,
    #[serde(rename = "type")]
    pub delivery_type: &'static str,
    pub upload_url: String,
}

/// Signs uploads and downloads with the configured media credentials.
#[derive(Debug, Clone)]
pub struct MediaSigner {
    config: Arc<MediaConfig>,
}

impl MediaSigner {
    /// Creates a signer for the given credentials.
    #[must_use]
    pub fn new(config: Arc<MediaConfig>) -> Self {
        Self { config }
    }

    /// The credentials this signer uses.
    #[must_use]
    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Signs a browser upload into `folder`, timestamped now.
    #[must_use]
    pub fn upload_signature(&self, folder: &str, resource_kind: ResourceKind) -> UploadSignature {
        self.upload_signature_at(folder, resource_kind, unix_timestamp())
    }

    /// Signs a browser upload into `folder` with an explicit timestamp.
    #[must_use]
    pub fn upload_signature_at(
        &self,
        folder: &str,
        resource_kind: ResourceKind,
        timestamp: u64,
    ) -> UploadSignature {
        let timestamp_str = timestamp.to_string();
        let signature = sign_parameters(
            [
                ("access_mode", UPLOAD_ACCESS_MODE),
                ("folder", folder),
                ("timestamp", timestamp_str.as_str()),
                ("type", UPLOAD_DELIVERY_TYPE),
            ],
            &self.config.api_secret,
        );
        UploadSignature {
            cloud_name: self.config.cloud_name.clone(),
            api_key: self.config.api_key.clone(),
            timestamp,
            signature,
            folder: folder.to_string(),
            access_mode: UPLOAD_ACCESS_MODE,
            delivery_type: UPLOAD_DELIVERY_TYPE,
            upload_url: self.endpoint(resource_kind, "upload").to_string(),
        }
    }

    /// Builds a signed download API URL for `asset`, timestamped now.
    #[must_use]
    pub fn download_url(&self, asset: &MediaAsset) -> Url {
        self.download_url_at(asset, unix_timestamp())
    }

    /// Builds a signed download API URL for `asset` with an explicit timestamp.
    ///
    /// The format is signed and sent only for non-raw resources.
    #[must_use]
    pub fn download_url_at(&self, asset: &MediaAsset, timestamp: u64) -> Url {
        let timestamp = timestamp.to_string();
        let format = match asset.resource_kind {
            ResourceKind::Raw => "",
            ResourceKind::Image | ResourceKind::Video => asset.format.as_deref().unwrap_or(""),
        };
        let params = [
            ("public_id", asset.public_id.as_str()),
            ("timestamp", timestamp.as_str()),
            ("type", asset.delivery_type.as_str()),
            ("format", format),
        ];
        let signature = sign_parameters(params, &self.config.api_secret);

        let mut url = self.endpoint(asset.resource_kind, "download");
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params.iter().filter(|(_, value)| !value.is_empty()) {
                pairs.append_pair(name, value);
            }
            pairs
                .append_pair("api_key", &self.config.api_key)
                .append_pair("signature", &signature);
        }
        url
    }

    /// Parses a stored media URL and builds a signed download URL for it.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::UnrecognizedUrl`] when `stored_url` is not a
    /// media host resource URL.
    #[instrument(skip(self))]
    pub fn generate_api_download_url(&self, stored_url: &str) -> Result<Url, MediaError> {
        let asset =
            parse_media_url(stored_url).ok_or_else(|| MediaError::unrecognized_url(stored_url))?;
        let url = self.download_url(&asset);
        debug!(public_id = %asset.public_id, kind = %asset.resource_kind, "built signed download URL");
        Ok(url)
    }

    /// `<api_base>/<cloud>/<kind>/<operation>`
    fn endpoint(&self, resource_kind: ResourceKind, operation: &str) -> Url {
        let mut url = self.config.api_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.config.cloud_name)
                .push(resource_kind.as_str())
                .push(operation);
        }
        url
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::media::DeliveryType;

    fn signer() -> MediaSigner {
        MediaSigner::new(Arc::new(MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "abcd".to_string(),
            api_base_url: Url::parse("https://api.cloudinary.com/v1_1").unwrap(),
        }))
    }

    fn query(url: &Url) -> BTreeMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_canonical_string_sorts_and_appends_secret() {
        let canonical = canonical_string(
            [("timestamp", "1315060510"), ("public_id", "sample_image"), ("eager", "")],
            "abcd",
        );
        assert_eq!(canonical, "public_id=sample_image&timestamp=1315060510abcd");
    }

    #[test]
    fn test_sign_parameters_known_vector() {
        // sha1("public_id=sample_image&timestamp=1315060510abcd")
        let signature =
            sign_parameters([("public_id", "sample_image"), ("timestamp", "1315060510")], "abcd");
        assert_eq!(signature, "b4ad47fb4e25c7bf5f92a20089f9db59bc302313");
    }

    #[test]
    fn test_sign_parameters_is_order_independent() {
        let a = sign_parameters([("a", "1"), ("b", "2"), ("c", "3")], "s");
        let b = sign_parameters([("c", "3"), ("a", "1"), ("b", "2")], "s");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_parameters_ignores_empty_values() {
        let with_empty = sign_parameters([("folder", ""), ("timestamp", "1")], "s");
        let without = sign_parameters([("timestamp", "1")], "s");
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_sign_parameters_is_lowercase_hex() {
        let signature = sign_parameters([("x", "y")], "z");
        assert_eq!(signature.len(), 40);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_upload_signature_signs_upload_parameters() {
        let upload = signer().upload_signature_at("brochures", ResourceKind::Raw, 1_700_000_000);
        let expected = sign_parameters(
            [
                ("type", "upload"),
                ("timestamp", "1700000000"),
                ("folder", "brochures"),
                ("access_mode", "public"),
            ],
            "abcd",
        );
        assert_eq!(upload.signature, expected);
        assert_eq!(upload.upload_url, "https://api.cloudinary.com/v1_1/demo/raw/upload");
        assert_eq!(upload.api_key, "1234");
    }

    #[test]
    fn test_upload_signature_serializes_type_field() {
        let upload = signer().upload_signature_at("f", ResourceKind::Image, 1);
        let value = serde_json::to_value(&upload).unwrap();
        assert_eq!(value["type"], "upload");
        assert_eq!(value["access_mode"], "public");
    }

    #[test]
    fn test_download_url_for_raw_omits_format() {
        let asset = MediaAsset {
            resource_kind: ResourceKind::Raw,
            delivery_type: DeliveryType::Upload,
            version: Some("1".to_string()),
            public_id: "brochures/guide.pdf".to_string(),
            format: Some("pdf".to_string()),
        };
        let url = signer().download_url_at(&asset, 42);
        assert_eq!(url.path(), "/v1_1/demo/raw/download");
        let params = query(&url);
        assert!(!params.contains_key("format"));
        assert_eq!(params["public_id"], "brochures/guide.pdf");
        assert_eq!(params["type"], "upload");
        assert_eq!(params["timestamp"], "42");
        assert_eq!(params["api_key"], "1234");
        assert_eq!(
            params["signature"],
            sign_parameters(
                [("public_id", "brochures/guide.pdf"), ("timestamp", "42"), ("type", "upload")],
                "abcd"
            )
        );
    }

    #[test]
    fn test_download_url_for_image_signs_format() {
        let asset = MediaAsset {
            resource_kind: ResourceKind::Image,
            delivery_type: DeliveryType::Authenticated,
            version: None,
            public_id: "gallery/hero".to_string(),
            format: Some("jpg".to_string()),
        };
        let params = query(&signer().download_url_at(&asset, 7));
        assert_eq!(params["format"], "jpg");
        assert_eq!(
            params["signature"],
            sign_parameters(
                [
                    ("format", "jpg"),
                    ("public_id", "gallery/hero"),
                    ("timestamp", "7"),
                    ("type", "authenticated"),
                ],
                "abcd"
            )
        );
    }

    #[test]
    fn test_parsed_url_round_trips_into_signature() {
        let stored = "https://res.cloudinary.com/demo/raw/upload/v1700000000/brochures/guide.pdf";
        let asset = parse_media_url(stored).unwrap();
        let params = query(&signer().download_url_at(&asset, 99));
        let recomputed = sign_parameters(
            params
                .iter()
                .filter(|(k, _)| k.as_str() != "api_key" && k.as_str() != "signature")
                .map(|(k, v)| (k.as_str(), v.as_str())),
            "abcd",
        );
        assert_eq!(params["signature"], recomputed);
    }

    #[test]
    fn test_generate_api_download_url_rejects_foreign_url() {
        let err = signer()
            .generate_api_download_url("https://example.com/file.pdf")
            .unwrap_err();
        assert!(matches!(err, MediaError::UnrecognizedUrl { .. }));
    }
}
