//! Blocking HTTP GET helpers used for remote catalogs and remote tracks.

use std::io::Read;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

fn call(url: &str) -> Result<ureq::Response, FetchError> {
    tracing::debug!(%url, "GET");
    ureq::get(url).call().map_err(|e| FetchError::Request {
        url: url.to_string(),
        source: Box::new(e),
    })
}

/// Fetch a text body (the catalog).
pub fn get_string(url: &str) -> Result<String, FetchError> {
    call(url)?.into_string().map_err(|e| FetchError::Body {
        url: url.to_string(),
        source: e,
    })
}

/// Fetch a whole binary body into memory (a remote track).
pub fn get_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let mut reader = call(url)?.into_reader();
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: e,
        })?;
    tracing::debug!(%url, bytes = bytes.len(), "fetched");
    Ok(bytes)
}
