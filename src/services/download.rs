//! Subtitle byte download with gzip auto-handling.
//!
//! Catalogs serve raw bytes, frequently gzipped. Compression is detected by
//! the URL suffix or the `1F 8B` magic bytes; either way the decoder only
//! ever sees plain subtitle bytes. Oversized payloads are rejected before
//! and after decompression.

use crate::Result;
use crate::error::DualSubError;
use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::Read;
use std::time::Duration;

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Downloads subtitle payloads within a timeout and size cap.
#[derive(Debug, Clone)]
pub struct SubtitleFetcher {
    client: Client,
    max_bytes: usize,
}

impl SubtitleFetcher {
    /// Create a fetcher with a per-download timeout and byte cap.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DualSubError::download(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, max_bytes })
    }

    /// Fetch a subtitle, transparently decompressing gzip payloads.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("downloading subtitle: {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DualSubError::download(format!("{url}: {e}")))?;
        if !response.status().is_success() {
            return Err(DualSubError::download(format!(
                "{url}: status {}",
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_bytes {
                return Err(DualSubError::download(format!(
                    "{url}: {length} bytes exceeds the {} byte limit",
                    self.max_bytes
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DualSubError::download(format!("{url}: {e}")))?;
        if bytes.len() > self.max_bytes {
            return Err(DualSubError::download(format!(
                "{url}: payload exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        if is_gzip(url, &bytes) {
            self.gunzip(&bytes)
        } else {
            Ok(bytes.to_vec())
        }
    }

    fn gunzip(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data).take(self.max_bytes as u64 + 1);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| DualSubError::download(format!("gzip decompression failed: {e}")))?;
        if out.len() > self.max_bytes {
            return Err(DualSubError::download(format!(
                "decompressed payload exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        Ok(out)
    }
}

/// Gzip is signalled by a `.gz` path suffix or by the magic bytes.
fn is_gzip(url: &str, bytes: &[u8]) -> bool {
    let path_is_gz = url::Url::parse(url)
        .map(|u| u.path().ends_with(".gz"))
        .unwrap_or_else(|_| url.ends_with(".gz"));
    path_is_gz || bytes.starts_with(&GZIP_MAGIC)
}
