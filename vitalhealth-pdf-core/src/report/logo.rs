//! Logo acquisition: inline base64 first, then a URL, otherwise no logo.
//!
//! Failures never reach the caller. Each fallback is logged and the report
//! is rendered without a logo.

use crate::graphics::Image;
use crate::report::model::LogoSource;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::future::Future;
use tracing::{debug, warn};

/// Retrieves raw image bytes for a logo URL.
///
/// Implementations report every failure (network, status, timeout) as `None`.
pub trait LogoFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Option<Vec<u8>>> + Send;
}

/// Never fetches anything. Used for offline rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFetcher;

impl LogoFetcher for NoopFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Option<Vec<u8>>> + Send {
        debug!(url, "Remote logo fetching disabled");
        std::future::ready(None)
    }
}

/// Largest logo body accepted from a URL.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

#[cfg(feature = "remote-logo")]
pub use http::HttpLogoFetcher;

#[cfg(feature = "remote-logo")]
mod http {
    use super::{LogoFetcher, MAX_LOGO_BYTES};
    use std::future::Future;
    use std::time::Duration;
    use tracing::{debug, warn};

    /// Fetches logos over HTTP(S) with a fixed request timeout.
    ///
    /// Bodies larger than the byte limit are dropped unread past the limit.
    #[derive(Debug, Clone)]
    pub struct HttpLogoFetcher {
        client: reqwest::Client,
        max_bytes: usize,
    }

    impl HttpLogoFetcher {
        pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            Ok(Self {
                client,
                max_bytes: MAX_LOGO_BYTES,
            })
        }

        pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
            self.max_bytes = max_bytes;
            self
        }
    }

    impl LogoFetcher for HttpLogoFetcher {
        fn fetch(&self, url: &str) -> impl Future<Output = Option<Vec<u8>>> + Send {
            let request = self.client.get(url);
            let url = url.to_string();
            let max_bytes = self.max_bytes;

            async move {
                let response = match request.send().await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(%url, error = %e, "Logo request failed");
                        return None;
                    }
                };

                let status = response.status();
                if !status.is_success() {
                    warn!(%url, %status, "Logo request returned an error status");
                    return None;
                }

                if let Some(length) = response.content_length() {
                    if length > max_bytes as u64 {
                        warn!(%url, length, max_bytes, "Logo is too large");
                        return None;
                    }
                }

                let mut response = response;
                let mut body = Vec::new();
                loop {
                    match response.chunk().await {
                        Ok(Some(chunk)) => {
                            if body.len() + chunk.len() > max_bytes {
                                warn!(%url, max_bytes, "Logo body exceeds the size limit");
                                return None;
                            }
                            body.extend_from_slice(&chunk);
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!(%url, error = %e, "Failed to read logo body");
                            return None;
                        }
                    }
                }

                debug!(%url, size = body.len(), "Fetched logo");
                Some(body)
            }
        }
    }

}

/// Outcome of logo resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Logo {
    Embedded(Image),
    Absent,
}

impl Logo {
    /// Tries the inline base64 data, then the URL. Never fails.
    pub async fn resolve<F: LogoFetcher>(source: &LogoSource, fetcher: &F) -> Logo {
        if let Some(encoded) = &source.base64 {
            match decode_inline(encoded) {
                Ok(image) => return Logo::Embedded(image),
                Err(reason) => warn!(%reason, "Inline logo unusable, trying URL"),
            }
        }

        if let Some(url) = &source.url {
            match fetcher.fetch(url).await {
                Some(bytes) => match Image::from_bytes(bytes) {
                    Ok(image) => return Logo::Embedded(image),
                    Err(e) => warn!(%url, error = %e, "Fetched logo is not a usable image"),
                },
                None => debug!(%url, "No logo bytes from URL"),
            }
        }

        Logo::Absent
    }

    /// Resolution without network access: only inline data is considered.
    pub fn from_inline(source: &LogoSource) -> Logo {
        source
            .base64
            .as_deref()
            .and_then(|encoded| decode_inline(encoded).ok())
            .map_or(Logo::Absent, Logo::Embedded)
    }

    pub fn image(&self) -> Option<&Image> {
        match self {
            Logo::Embedded(image) => Some(image),
            Logo::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Logo::Absent)
    }
}

fn decode_inline(encoded: &str) -> Result<Image, String> {
    let bytes = decode_base64(encoded).map_err(|e| e.to_string())?;
    Image::from_bytes(bytes).map_err(|e| e.to_string())
}

/// Standard-alphabet base64. Whitespace anywhere and a leading
/// `data:<mime>;base64,` prefix are tolerated.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let trimmed = encoded.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => trimmed,
    };
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x3C, 0x00, 0xB4, 0x03, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xD9,
    ];

    struct CountingFetcher {
        body: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    impl LogoFetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> impl Future<Output = Option<Vec<u8>>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(self.body.clone())
        }
    }

    fn source(base64: Option<&str>, url: Option<&str>) -> LogoSource {
        LogoSource {
            base64: base64.map(String::from),
            url: url.map(String::from),
        }
    }

    #[test]
    fn test_decode_base64_variants() {
        let plain = STANDARD.encode(JPEG);
        assert_eq!(decode_base64(&plain).unwrap(), JPEG);

        let with_prefix = format!("data:image/jpeg;base64,{plain}");
        assert_eq!(decode_base64(&with_prefix).unwrap(), JPEG);

        let (head, tail) = plain.split_at(10);
        let wrapped = format!("  {head}\n{tail}\n");
        assert_eq!(decode_base64(&wrapped).unwrap(), JPEG);

        assert!(decode_base64("not base64!").is_err());
    }

    #[tokio::test]
    async fn test_inline_logo_wins_without_fetch() {
        let fetcher = CountingFetcher {
            body: Some(JPEG.to_vec()),
            calls: AtomicUsize::new(0),
        };
        let encoded = STANDARD.encode(JPEG);
        let logo = Logo::resolve(&source(Some(&encoded), Some("http://logo")), &fetcher).await;

        assert_eq!(logo.image().map(Image::width), Some(180));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_base64_falls_back_to_url() {
        let fetcher = CountingFetcher {
            body: Some(JPEG.to_vec()),
            calls: AtomicUsize::new(0),
        };
        let logo = Logo::resolve(&source(Some("%%%"), Some("http://logo")), &fetcher).await;

        assert!(!logo.is_absent());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undecodable_bytes_fall_back_to_url() {
        let fetcher = CountingFetcher {
            body: Some(JPEG.to_vec()),
            calls: AtomicUsize::new(0),
        };
        let garbage = STANDARD.encode(b"definitely not an image");
        let logo = Logo::resolve(&source(Some(&garbage), Some("http://logo")), &fetcher).await;
        assert!(matches!(logo, Logo::Embedded(_)));
    }

    #[tokio::test]
    async fn test_everything_failing_is_absent() {
        let fetcher = CountingFetcher {
            body: None,
            calls: AtomicUsize::new(0),
        };
        let logo = Logo::resolve(&source(Some("%%%"), Some("http://logo")), &fetcher).await;
        assert_eq!(logo, Logo::Absent);

        let fetcher = CountingFetcher {
            body: Some(b"<html>404</html>".to_vec()),
            calls: AtomicUsize::new(0),
        };
        let logo = Logo::resolve(&source(None, Some("http://logo")), &fetcher).await;
        assert!(logo.is_absent());
    }

    #[tokio::test]
    async fn test_no_source_is_absent() {
        let logo = Logo::resolve(&LogoSource::default(), &NoopFetcher).await;
        assert!(logo.is_absent());
        assert!(logo.image().is_none());
    }

    #[test]
    fn test_from_inline_ignores_url() {
        let encoded = STANDARD.encode(JPEG);
        assert!(!Logo::from_inline(&source(Some(&encoded), None)).is_absent());
        assert!(Logo::from_inline(&source(None, Some("http://logo"))).is_absent());
    }
}
