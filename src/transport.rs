//! Transport controller: the play/pause/next/prev/seek/volume state machine.
//!
//! Every operation only mutates `Transport` and returns the command the audio
//! engine has to carry out, so the whole controller runs without a device.

use thiserror::Error;

/// The playback state of the transport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Work the audio engine must do after a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportCmd {
    /// Load the catalog track and start it from the beginning. `generation`
    /// tags the engine events that belong to this load.
    Load { catalog_index: usize, generation: u64 },
    Resume,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("no track at row {0} of the current view")]
    TrackNotFound(usize),
}

#[derive(Clone, Debug)]
pub struct Transport {
    state: PlaybackState,
    /// Row of the loaded track in the current view, if it is visible.
    current: Option<usize>,
    /// Catalog index of the loaded track.
    loaded: Option<usize>,
    generation: u64,
    volume: f32,
    position: f64,
    duration: Option<f64>,
    drag: Option<f64>,
    /// The engine dropped the loaded track after a failure; resuming has to
    /// load it again.
    reload: bool,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Transport {
    pub fn new(volume: f32) -> Self {
        Self {
            state: PlaybackState::Stopped,
            current: None,
            loaded: None,
            generation: 0,
            volume: if volume.is_finite() {
                volume.clamp(0.0, 1.0)
            } else {
                1.0
            },
            position: 0.0,
            duration: None,
            drag: None,
            reload: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn loaded(&self) -> Option<usize> {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The value the seek control shows: the drag while one is active,
    /// otherwise the engine-reported position.
    pub fn seek_display(&self) -> f64 {
        self.drag.unwrap_or(self.position)
    }

    /// Start the track at `row` of `view`.
    pub fn play(&mut self, view: &[usize], row: usize) -> Result<TransportCmd, TransportError> {
        let &catalog_index = view.get(row).ok_or(TransportError::TrackNotFound(row))?;

        self.generation += 1;
        self.current = Some(row);
        self.loaded = Some(catalog_index);
        self.state = PlaybackState::Playing;
        self.position = 0.0;
        self.duration = None;
        self.drag = None;
        self.reload = false;

        Ok(TransportCmd::Load {
            catalog_index,
            generation: self.generation,
        })
    }

    /// Flip between playing and paused. Needs a loaded track and a
    /// non-empty view.
    pub fn toggle(&mut self, view_len: usize) -> Option<TransportCmd> {
        if self.loaded.is_none() || view_len == 0 {
            return None;
        }
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                Some(TransportCmd::Pause)
            }
            PlaybackState::Paused | PlaybackState::Stopped if self.reload => {
                let catalog_index = self.loaded?;
                self.generation += 1;
                self.state = PlaybackState::Playing;
                self.position = 0.0;
                self.duration = None;
                self.reload = false;
                Some(TransportCmd::Load {
                    catalog_index,
                    generation: self.generation,
                })
            }
            PlaybackState::Paused | PlaybackState::Stopped => {
                self.state = PlaybackState::Playing;
                Some(TransportCmd::Resume)
            }
        }
    }

    /// Play the following row, wrapping to the first.
    pub fn next(&mut self, view: &[usize]) -> Option<TransportCmd> {
        let n = view.len();
        if n == 0 {
            return None;
        }
        let row = self.current.map_or(0, |c| (c + 1) % n);
        self.play(view, row).ok()
    }

    /// Play the preceding row, wrapping to the last.
    pub fn prev(&mut self, view: &[usize]) -> Option<TransportCmd> {
        let n = view.len();
        if n == 0 {
            return None;
        }
        let row = self.current.map_or(n - 1, |c| (c + n - 1) % n);
        self.play(view, row).ok()
    }

    /// The track finished on its own. Playback stops there; the next track
    /// is not started.
    pub fn ended(&mut self) {
        if self.loaded.is_some() {
            self.state = PlaybackState::Paused;
            if let Some(d) = self.duration {
                self.position = d;
            }
        }
    }

    /// The engine could not play the loaded track. The next toggle loads
    /// it again instead of resuming.
    pub fn failed(&mut self) {
        if self.loaded.is_some() {
            self.state = PlaybackState::Paused;
            self.drag = None;
            self.reload = true;
        }
    }

    pub fn metadata_loaded(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
    }

    /// Periodic position report. Never touches an active drag.
    pub fn time_update(&mut self, position: f64) {
        if self.loaded.is_some() {
            self.position = position.max(0.0);
        }
    }

    /// Jump to `target` seconds. Requires a known duration.
    pub fn seek(&mut self, target: f64) -> Option<TransportCmd> {
        let duration = self.duration?;
        if self.loaded.is_none() {
            return None;
        }
        let target = target.clamp(0.0, duration);
        self.position = target;
        Some(TransportCmd::Seek(target))
    }

    pub fn seek_by(&mut self, delta: f64) -> Option<TransportCmd> {
        self.seek(self.position + delta)
    }

    /// Set the output volume, clamped to `0.0..=1.0`. Non-finite input
    /// keeps the current volume.
    pub fn set_volume(&mut self, volume: f32) -> TransportCmd {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
        TransportCmd::SetVolume(self.volume)
    }

    /// Begin dragging the seek control. Ignored until the duration is known.
    pub fn drag_start(&mut self, value: f64) -> bool {
        let Some(duration) = self.duration else {
            return false;
        };
        if self.loaded.is_none() {
            return false;
        }
        self.drag = Some(value.clamp(0.0, duration));
        true
    }

    pub fn drag_move(&mut self, value: f64) {
        if let (Some(drag), Some(duration)) = (self.drag.as_mut(), self.duration) {
            *drag = value.clamp(0.0, duration);
        }
    }

    /// Release the seek control and apply exactly the dragged value.
    pub fn drag_end(&mut self) -> Option<TransportCmd> {
        let value = self.drag.take()?;
        self.seek(value)
    }

    /// Re-anchor `current` after the view was recomputed: follow the loaded
    /// track to its new row, or drop the row when it was filtered out.
    pub fn view_changed(&mut self, view: &[usize]) {
        self.current = self
            .loaded
            .and_then(|loaded| view.iter().position(|&i| i == loaded));
    }
}
