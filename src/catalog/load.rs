use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::fetch::{self, FetchError};

use super::model::{Catalog, CatalogOrigin, Track, http_base, is_http};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog must be a JSON array of track records")]
    NotAnArray,
}

/// Load the catalog from a local path or an `http(s)` URL.
pub fn load(source: &str) -> Result<Catalog, CatalogError> {
    if is_http(source) {
        let text = fetch::get_string(source)?;
        return parse(&text, CatalogOrigin::Http(http_base(source)));
    }

    let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse(&text, CatalogOrigin::Dir(dir))
}

/// Parse a JSON array of track records. Entries that are not objects with
/// string `title`, `artist`, `genre` and `url` fields are skipped.
pub fn parse(text: &str, origin: CatalogOrigin) -> Result<Catalog, CatalogError> {
    let Value::Array(entries) = serde_json::from_str::<Value>(text)? else {
        return Err(CatalogError::NotAnArray);
    };

    let total = entries.len();
    let mut tracks = Vec::with_capacity(total);
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Track>(entry) {
            Ok(track) => tracks.push(track),
            Err(e) => tracing::warn!(entry = i, error = %e, "skipping malformed catalog entry"),
        }
    }

    tracing::info!(loaded = tracks.len(), skipped = total - tracks.len(), "catalog parsed");
    Ok(Catalog::new(tracks, origin))
}

/// Load the catalog, logging failures and falling back to an empty one.
pub fn load_or_empty(source: &str) -> Catalog {
    match load(source) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(%source, error = %e, "catalog unavailable, playlist stays empty");
            Catalog::default()
        }
    }
}
