//! Streaming proxy for files stored on the media host.
//!
//! The host can refuse unsigned fetches of `upload`-type resources even though
//! they are nominally public. The proxy therefore tries the stored URL first
//! and, on 401 only, retries once against a freshly signed download API URL.

use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::asset_url::parse_media_url;
use super::error::MediaError;
use super::filename::{content_disposition, download_filename};
use super::signer::MediaSigner;

/// Time allowed for the media host to start answering. The body itself is
/// streamed without a deadline.
pub const MEDIA_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches media files, falling back to signed URLs when required.
#[derive(Debug, Clone)]
pub struct MediaProxy {
    http: Client,
    signer: Option<MediaSigner>,
    response_timeout: Duration,
}

/// A successful upstream response, ready to be streamed to the caller.
#[derive(Debug)]
pub struct MediaDownload {
    /// Upstream `Content-Type`, if any.
    pub content_type: Option<String>,
    /// Upstream body length, if known.
    pub content_length: Option<u64>,
    /// Sanitized filename offered to the caller.
    pub filename: String,
    /// `attachment; filename="<name>.pdf"`
    pub content_disposition: String,
    /// Whether the signed fallback URL served the file.
    pub signed_fallback: bool,
    url: String,
    response: reqwest::Response,
}

impl MediaProxy {
    /// Creates a proxy. Without a signer, 401 responses are terminal.
    #[must_use]
    pub fn new(http: Client, signer: Option<MediaSigner>) -> Self {
        Self {
            http,
            signer,
            response_timeout: MEDIA_RESPONSE_TIMEOUT,
        }
    }

    /// Overrides how long to wait for upstream response headers.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Fetches the file behind `stored_url`, named after `display_name`.
    ///
    /// # Errors
    ///
    /// - [`MediaError::InvalidUrl`] if `stored_url` does not parse
    /// - [`MediaError::Status`] with the upstream status when the final
    ///   attempt is not successful (including a 401 that cannot be re-signed)
    /// - [`MediaError::Network`] / [`MediaError::Timeout`] on transport failure
    #[instrument(skip(self), fields(url = %stored_url))]
    pub async fn fetch(
        &self,
        stored_url: &str,
        display_name: &str,
    ) -> Result<MediaDownload, MediaError> {
        let direct = Url::parse(stored_url).map_err(|_| MediaError::invalid_url(stored_url))?;

        let mut response = self.send(direct).await?;
        let mut url = stored_url.to_string();
        let mut signed_fallback = false;

        if response.status() == StatusCode::UNAUTHORIZED {
            match self.signed_url_for(stored_url) {
                Some(signed) => {
                    info!("direct fetch unauthorized; retrying with signed download URL");
                    url = signed.to_string();
                    response = self.send(signed).await?;
                    signed_fallback = true;
                }
                None => {
                    warn!("direct fetch unauthorized and URL cannot be re-signed");
                }
            }
        }

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), signed_fallback, "media fetch failed");
            return Err(MediaError::status(stored_url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let content_length = response.content_length();
        debug!(?content_type, ?content_length, signed_fallback, "media fetch succeeded");

        Ok(MediaDownload {
            content_type,
            content_length,
            filename: download_filename(display_name),
            content_disposition: content_disposition(display_name),
            signed_fallback,
            url,
            response,
        })
    }

    fn signed_url_for(&self, stored_url: &str) -> Option<Url> {
        let signer = self.signer.as_ref()?;
        let asset = parse_media_url(stored_url)?;
        Some(signer.download_url(&asset))
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, MediaError> {
        let display = url.to_string();
        match tokio::time::timeout(self.response_timeout, self.http.get(url).send()).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(error)) => Err(MediaError::transport(display, error)),
            Err(_) => Err(MediaError::Timeout { url: display }),
        }
    }
}

impl MediaDownload {
    /// Headers to forward to the caller along with the body.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = self
            .content_type
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(CONTENT_TYPE, value);
        }
        if let Some(length) = self.content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }
        if let Ok(value) = HeaderValue::from_str(&self.content_disposition) {
            headers.insert(CONTENT_DISPOSITION, value);
        }
        headers
    }

    /// Consumes the download as a stream of body chunks.
    pub fn bytes_stream(self) -> impl Stream<Item = Result<Bytes, MediaError>> {
        let url = self.url;
        self.response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| MediaError::transport(url.clone(), e)))
    }

    /// Streams the body into `writer`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] if reading the upstream body or writing fails.
    pub async fn write_to<W>(self, writer: &mut W) -> Result<u64, MediaError>
    where
        W: AsyncWrite + Unpin,
    {
        let url = self.url.clone();
        let mut stream = Box::pin(self.bytes_stream());
        let mut bytes_written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| MediaError::io(url.clone(), e))?;
            bytes_written += chunk.len() as u64;
        }

        writer.flush().await.map_err(|e| MediaError::io(url, e))?;
        Ok(bytes_written)
    }
}
