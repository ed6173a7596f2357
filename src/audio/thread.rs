use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::media::{AudioError, Media, create_sink_at};
use super::tap::AnalysisTap;
use super::types::{AudioCmd, AudioEvent, AudioEventKind};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    tap: AnalysisTap,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let err = AudioError::Device(e.to_string());
                tracing::error!(error = %err, "audio thread exiting");
                let _ = events.send(AudioEvent {
                    generation: 0,
                    kind: AudioEventKind::Error(err.to_string()),
                });
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let tick = Duration::from_millis(audio_settings.time_update_ms.max(10));
        let mut engine = Engine::new(stream, events, tap, audio_settings.initial_volume, tick);

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            engine.poll();
        }
        tracing::debug!("audio thread stopped");
    })
}

/// State owned by the audio thread: the output stream, the one sink and the
/// media it plays.
struct Engine {
    stream: OutputStream,
    events: Sender<AudioEvent>,
    tap: AnalysisTap,
    tick: Duration,

    media: Option<Media>,
    sink: Option<Sink>,
    generation: u64,
    volume: f32,
    paused: bool,
    finished: bool,
    /// Start of the current sink within the track when it was built by
    /// skipping rather than seeking.
    offset: Duration,
    last_update: Instant,
}

impl Engine {
    fn new(
        stream: OutputStream,
        events: Sender<AudioEvent>,
        tap: AnalysisTap,
        volume: f32,
        tick: Duration,
    ) -> Self {
        Self {
            stream,
            events,
            tap,
            tick,
            media: None,
            sink: None,
            generation: 0,
            volume: volume.clamp(0.0, 1.0),
            paused: true,
            finished: false,
            offset: Duration::ZERO,
            last_update: Instant::now(),
        }
    }

    fn emit(&self, kind: AudioEventKind) {
        let _ = self.events.send(AudioEvent {
            generation: self.generation,
            kind,
        });
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { generation, source } => {
                self.stop_sink();
                self.generation = generation;
                self.media = None;

                let media = match Media::open(&source) {
                    Ok(media) => media,
                    Err(e) => return self.fail(e),
                };
                match self.start_at(&media, Duration::ZERO, true) {
                    Ok(decoder_total) => {
                        let duration = media.probe_duration().or(decoder_total);
                        tracing::info!(source = %media.describe(), ?duration, "playing");
                        self.media = Some(media);
                        self.emit(AudioEventKind::LoadedMetadata(duration));
                        self.emit(AudioEventKind::TimeUpdate(Duration::ZERO));
                    }
                    Err(e) => self.fail(e),
                }
            }
            AudioCmd::Resume => {
                if self.media.is_none() {
                    self.emit(AudioEventKind::Error("nothing loaded to resume".to_string()));
                } else if self.finished {
                    self.restart_at(Duration::ZERO, true);
                } else if let Some(sink) = self.sink.as_ref() {
                    sink.play();
                    self.paused = false;
                }
            }
            AudioCmd::Pause => {
                if let Some(sink) = self.sink.as_ref() {
                    sink.pause();
                    let pos = self.offset + sink.get_pos();
                    self.paused = true;
                    self.tap.clear();
                    self.emit(AudioEventKind::TimeUpdate(pos));
                }
            }
            AudioCmd::Seek(pos) => {
                let seeked = !self.finished
                    && self
                        .sink
                        .as_ref()
                        .is_some_and(|sink| sink.try_seek(pos).is_ok());
                if seeked {
                    self.offset = Duration::ZERO;
                } else {
                    // Rebuild the sink and skip into the source instead.
                    let play = !self.paused;
                    self.restart_at(pos, play);
                }
                self.emit(AudioEventKind::TimeUpdate(pos));
            }
            AudioCmd::SetVolume(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                if let Some(sink) = self.sink.as_ref() {
                    sink.set_volume(self.volume);
                }
            }
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    /// Report progress and detect the natural end of the source.
    fn poll(&mut self) {
        if self.paused || self.finished {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            self.finished = true;
            self.paused = true;
            self.tap.clear();
            tracing::debug!(generation = self.generation, "track ended");
            self.emit(AudioEventKind::Ended);
        } else if self.last_update.elapsed() >= self.tick {
            self.last_update = Instant::now();
            self.emit(AudioEventKind::TimeUpdate(self.offset + sink.get_pos()));
        }
    }

    fn start_at(
        &mut self,
        media: &Media,
        pos: Duration,
        play: bool,
    ) -> Result<Option<Duration>, AudioError> {
        self.stop_sink();
        let (sink, total) = create_sink_at(&self.stream, media, &self.tap, pos, self.volume)?;
        if play {
            sink.play();
        }
        self.sink = Some(sink);
        self.paused = !play;
        self.finished = false;
        self.offset = pos;
        self.last_update = Instant::now();
        Ok(total)
    }

    fn restart_at(&mut self, pos: Duration, play: bool) {
        let Some(media) = self.media.take() else {
            return;
        };
        let result = self.start_at(&media, pos, play);
        self.media = Some(media);
        if let Err(e) = result {
            self.fail(e);
        } else if play {
            self.emit(AudioEventKind::TimeUpdate(pos));
        }
    }

    fn stop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.tap.clear();
    }

    fn fail(&mut self, err: AudioError) {
        tracing::warn!(generation = self.generation, error = %err, "cannot play track");
        self.stop_sink();
        self.paused = true;
        self.finished = false;
        self.emit(AudioEventKind::Error(err.to_string()));
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(sink) = self.sink.as_ref() {
            if !self.paused {
                fade_out_sink(sink, self.volume, fade_out_ms);
            }
            sink.stop();
        }
        self.sink = None;
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
