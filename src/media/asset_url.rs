//! Decomposition of stored media host URLs.
//!
//! The content sheets only keep the final delivery URL of each file. To sign a
//! fresh request for the same file the structured identifiers have to be
//! recovered from that URL, which follows the layout
//! `.../<resource_kind>/<delivery_type>/[v<version>/]<public_id>[.<format>]`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

/// Matches a version segment such as `v1712345678`.
#[allow(clippy::expect_used)]
static VERSION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(\d+)$").expect("version regex is valid") // Static pattern, safe to panic
});

/// Payload category of a media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Video,
    /// Arbitrary files (PDFs, documents). Raw identifiers keep their extension.
    Raw,
}

impl ResourceKind {
    /// Returns the path segment for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Raw => "raw",
        }
    }

    /// Maps a path segment to a kind. Unknown segments count as images.
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "video" => Self::Video,
            "raw" => Self::Raw,
            _ => Self::Image,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access-control mode of a media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryType {
    Upload,
    Authenticated,
    Private,
}

impl DeliveryType {
    /// Returns the path segment for this delivery type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Authenticated => "authenticated",
            Self::Private => "private",
        }
    }

    /// Maps a path segment to a delivery type.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "upload" => Some(Self::Upload),
            "authenticated" => Some(Self::Authenticated),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured identifiers of one media resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub resource_kind: ResourceKind,
    pub delivery_type: DeliveryType,
    /// Version digits without the `v` prefix.
    pub version: Option<String>,
    /// Folder-qualified identifier, URL-decoded.
    pub public_id: String,
    /// File extension for image and video resources.
    pub format: Option<String>,
}

/// Recovers the structured identifiers from a media host URL.
///
/// Returns `None` for anything that does not look like a media resource URL:
/// stored URLs are free-form data, so foreign or malformed input is expected.
///
/// # Examples
///
/// ```
/// use sitedata_core::media::{parse_media_url, DeliveryType, ResourceKind};
///
/// let asset = parse_media_url(
///     "https://res.cloudinary.com/demo/image/upload/v123/folder/name.jpg",
/// )
/// .unwrap();
/// assert_eq!(asset.resource_kind, ResourceKind::Image);
/// assert_eq!(asset.delivery_type, DeliveryType::Upload);
/// assert_eq!(asset.version.as_deref(), Some("123"));
/// assert_eq!(asset.public_id, "folder/name");
/// assert_eq!(asset.format.as_deref(), Some("jpg"));
/// ```
#[tracing::instrument(level = "trace", skip(url))]
#[must_use]
pub fn parse_media_url(url: &str) -> Option<MediaAsset> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();

    let Some(type_index) = segments
        .iter()
        .position(|segment| DeliveryType::from_segment(segment).is_some())
    else {
        debug!(url, "no delivery type segment in media URL");
        return None;
    };
    let delivery_type = DeliveryType::from_segment(segments[type_index])?;
    let resource_kind = type_index
        .checked_sub(1)
        .map_or(ResourceKind::Image, |i| ResourceKind::from_segment(segments[i]));

    let mut remainder: &[&str] = &segments[type_index + 1..];
    let mut version = None;
    if let Some(first) = remainder.first()
        && let Some(captures) = VERSION_SEGMENT.captures(first)
    {
        version = Some(captures[1].to_string());
        remainder = &remainder[1..];
    }

    let (last, folders) = remainder.split_last()?;
    if last.is_empty() {
        return None;
    }

    let (public_id, format) = if resource_kind == ResourceKind::Raw {
        (decode(&remainder.join("/"))?, None)
    } else {
        match last.rfind('.') {
            Some(dot) if dot > 0 && dot + 1 < last.len() => {
                let mut parts: Vec<&str> = folders.to_vec();
                parts.push(&last[..dot]);
                (decode(&parts.join("/"))?, Some(decode(&last[dot + 1..])?))
            }
            _ => (decode(&remainder.join("/"))?, None),
        }
    };

    trace!(%resource_kind, %delivery_type, ?version, %public_id, ?format, "parsed media URL");
    Some(MediaAsset {
        resource_kind,
        delivery_type,
        version,
        public_id,
        format,
    })
}

fn decode(value: &str) -> Option<String> {
    urlencoding::decode(value).ok().map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versioned_image_url() {
        let asset =
            parse_media_url("https://res.cloudinary.com/demo/image/upload/v123/folder/name.jpg")
                .unwrap();
        assert_eq!(
            asset,
            MediaAsset {
                resource_kind: ResourceKind::Image,
                delivery_type: DeliveryType::Upload,
                version: Some("123".to_string()),
                public_id: "folder/name".to_string(),
                format: Some("jpg".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_raw_url_keeps_extension_in_public_id() {
        let asset =
            parse_media_url("https://res.cloudinary.com/demo/raw/upload/folder/doc.pdf").unwrap();
        assert_eq!(asset.resource_kind, ResourceKind::Raw);
        assert_eq!(asset.delivery_type, DeliveryType::Upload);
        assert_eq!(asset.version, None);
        assert_eq!(asset.format, None);
        assert_eq!(asset.public_id, "folder/doc.pdf");
    }

    #[test]
    fn test_parse_raw_url_decodes_identifier() {
        let asset = parse_media_url(
            "https://res.cloudinary.com/demo/raw/authenticated/v9/brochures/Open%20Day%202024.pdf",
        )
        .unwrap();
        assert_eq!(asset.delivery_type, DeliveryType::Authenticated);
        assert_eq!(asset.version.as_deref(), Some("9"));
        assert_eq!(asset.public_id, "brochures/Open Day 2024.pdf");
    }

    #[test]
    fn test_parse_private_video() {
        let asset =
            parse_media_url("https://res.cloudinary.com/demo/video/private/v55/clip.mp4").unwrap();
        assert_eq!(asset.resource_kind, ResourceKind::Video);
        assert_eq!(asset.delivery_type, DeliveryType::Private);
        assert_eq!(asset.public_id, "clip");
        assert_eq!(asset.format.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_parse_unknown_kind_defaults_to_image() {
        let asset = parse_media_url("https://cdn.example.com/files/upload/logo.png").unwrap();
        assert_eq!(asset.resource_kind, ResourceKind::Image);
        assert_eq!(asset.public_id, "logo");
    }

    #[test]
    fn test_parse_image_without_extension() {
        let asset = parse_media_url("https://res.cloudinary.com/demo/image/upload/v1/avatar").unwrap();
        assert_eq!(asset.public_id, "avatar");
        assert_eq!(asset.format, None);
    }

    #[test]
    fn test_parse_version_like_folder_is_only_consumed_first() {
        let asset =
            parse_media_url("https://res.cloudinary.com/demo/image/upload/v2/v3/pic.png").unwrap();
        assert_eq!(asset.version.as_deref(), Some("2"));
        assert_eq!(asset.public_id, "v3/pic");
    }

    #[test]
    fn test_parse_without_delivery_type_returns_none() {
        assert!(parse_media_url("https://example.com/images/photo.jpg").is_none());
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert!(parse_media_url("not a url").is_none());
        assert!(parse_media_url("").is_none());
    }

    #[test]
    fn test_parse_missing_identifier_returns_none() {
        assert!(parse_media_url("https://res.cloudinary.com/demo/image/upload/v123").is_none());
        assert!(parse_media_url("https://res.cloudinary.com/demo/image/upload/").is_none());
    }
}
