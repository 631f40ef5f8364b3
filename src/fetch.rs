//! Reading raw input bytes from a local file or an HTTP(S) URL.

use flate2::read::GzDecoder;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{MatchStatsError, Result};

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetches `url` with a blocking client.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let fetch_error = |e: reqwest::Error| MatchStatsError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(fetch_error)?;
    Ok(resp.bytes().map_err(fetch_error)?.to_vec())
}

/// Loads `source` from disk or over HTTP, gunzipping names ending in `.gz`.
///
/// # Errors
///
/// A missing local file is reported as [`MatchStatsError::MissingInput`].
#[tracing::instrument(fields(source = %source))]
pub fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_url(source) {
        fetch_bytes(source)?
    } else {
        std::fs::read(source).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MatchStatsError::MissingInput {
                path: Path::new(source).to_path_buf(),
            },
            _ => MatchStatsError::Io(e),
        })?
    };
    debug!(bytes = bytes.len(), "Source read");

    if source.ends_with(".gz") {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes.as_slice()).read_to_end(&mut decoded)?;
        debug!(bytes = decoded.len(), "Source decompressed");
        return Ok(decoded);
    }

    Ok(bytes)
}
