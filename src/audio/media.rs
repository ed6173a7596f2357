//! Opening track sources and turning them into `rodio` sinks.
//!
//! Local files are decoded straight from disk. Remote tracks are fetched
//! fully into memory first so they can be decoded, seeked and replayed like
//! a file.

use std::fs::File;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

use crate::catalog::TrackSource;
use crate::fetch::{self, FetchError};

use super::tap::{AnalysisTap, TappedSource};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// A track source that is ready to be decoded, possibly several times.
pub(super) enum Media {
    File(PathBuf),
    Memory { url: String, bytes: Arc<[u8]> },
}

impl Media {
    pub(super) fn open(source: &TrackSource) -> Result<Self, AudioError> {
        match source {
            TrackSource::File(path) => {
                File::open(path).map_err(|e| AudioError::Open {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(Media::File(path.clone()))
            }
            TrackSource::Http(url) => Ok(Media::Memory {
                url: url.clone(),
                bytes: fetch::get_bytes(url)?.into(),
            }),
        }
    }

    pub(super) fn describe(&self) -> String {
        match self {
            Media::File(path) => path.display().to_string(),
            Media::Memory { url, .. } => url.clone(),
        }
    }

    /// Read the duration from the container headers.
    pub(super) fn probe_duration(&self) -> Option<Duration> {
        let properties_duration = match self {
            Media::File(path) => lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration()),
            Media::Memory { bytes, .. } => Probe::new(Cursor::new(&bytes[..]))
                .guess_file_type()
                .ok()
                .and_then(|probe| probe.read().ok())
                .map(|tagged| tagged.properties().duration()),
        };
        properties_duration.filter(|d| !d.is_zero())
    }
}

/// Create a paused, tapped `Sink` for `media` starting at `start_at`.
///
/// Also returns the decoder's own idea of the total duration.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    media: &Media,
    tap: &AnalysisTap,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let decode_err = |e: rodio::decoder::DecoderError| AudioError::Decode {
        what: media.describe(),
        source: e,
    };

    match media {
        Media::File(path) => {
            let file = File::open(path).map_err(|e| AudioError::Open {
                path: path.clone(),
                source: e,
            })?;
            let decoder = Decoder::try_from(file).map_err(decode_err)?;
            let total = decoder.total_duration();
            Ok((tapped_sink(stream, decoder, tap, start_at, volume), total))
        }
        Media::Memory { bytes, .. } => {
            let decoder = Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(decode_err)?;
            let total = decoder.total_duration();
            Ok((tapped_sink(stream, decoder, tap, start_at, volume), total))
        }
    }
}

fn tapped_sink<S>(
    stream: &OutputStream,
    source: S,
    tap: &AnalysisTap,
    start_at: Duration,
    volume: f32,
) -> Sink
where
    S: Source<Item = f32> + Send + 'static,
{
    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    // `skip_duration` doubles as the seeking fallback; Duration::ZERO is fine.
    sink.append(TappedSource::new(source.skip_duration(start_at), tap.clone()));
    sink.pause();
    sink
}
