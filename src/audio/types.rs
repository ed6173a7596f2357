//! Messages exchanged with the audio thread.

use std::time::Duration;

use crate::catalog::TrackSource;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source and start it from the beginning.
    Load { generation: u64, source: TrackSource },
    /// Resume; restarts the source when it already played to the end.
    Resume,
    Pause,
    /// Jump to an absolute position.
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// An engine notification, tagged with the load it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEvent {
    pub generation: u64,
    pub kind: AudioEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEventKind {
    /// The source is open; its duration when it could be determined.
    LoadedMetadata(Option<Duration>),
    /// Periodic playback position while playing.
    TimeUpdate(Duration),
    /// The source played to its natural end.
    Ended,
    /// The source could not be opened or decoded.
    Error(String),
}
