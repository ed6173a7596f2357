use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One playable item from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub url: String,
}

/// Where a track's audio can be read from once its `url` is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackSource {
    File(PathBuf),
    Http(String),
}

/// Where the catalog itself came from; relative track urls resolve against it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Directory containing the catalog file.
    Dir(PathBuf),
    /// Base URL ending in `/`.
    Http(String),
    #[default]
    Unknown,
}

/// Ordered, read-only list of tracks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
    origin: CatalogOrigin,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>, origin: CatalogOrigin) -> Self {
        Self { tracks, origin }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    /// Resolve the audio source of the track at `index`.
    pub fn source_for(&self, index: usize) -> Option<TrackSource> {
        self.tracks
            .get(index)
            .map(|t| resolve_url(&t.url, &self.origin))
    }
}

pub(crate) fn is_http(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve a track `url` the way a page resolves an `<audio src>`: absolute
/// URLs and paths stand alone, anything else is relative to the catalog.
pub fn resolve_url(url: &str, origin: &CatalogOrigin) -> TrackSource {
    if is_http(url) {
        return TrackSource::Http(url.to_string());
    }
    if let Some(rest) = url.strip_prefix("file://") {
        return TrackSource::File(PathBuf::from(rest));
    }

    let path = Path::new(url);
    if path.is_absolute() {
        return TrackSource::File(path.to_path_buf());
    }

    match origin {
        CatalogOrigin::Dir(dir) => TrackSource::File(dir.join(path)),
        CatalogOrigin::Http(base) => {
            TrackSource::Http(format!("{base}{}", url.trim_start_matches("./")))
        }
        CatalogOrigin::Unknown => TrackSource::File(path.to_path_buf()),
    }
}

/// Everything up to and including the last `/` of the URL path.
pub(crate) fn http_base(url: &str) -> String {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].rfind('/') {
        Some(p) => url[..after_scheme + p + 1].to_string(),
        None => format!("{url}/"),
    }
}
