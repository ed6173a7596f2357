//! Read-only analysis tap over the samples the sink is playing.
//!
//! The tap starts suspended and collects nothing until it is resumed by the
//! first user gesture; after that it keeps a bounded window of mono samples
//! that the visualizer reads every frame.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;

struct Shared {
    samples: Mutex<VecDeque<f32>>,
    active: AtomicBool,
    capacity: usize,
}

#[derive(Clone)]
pub struct AnalysisTap {
    shared: Arc<Shared>,
}

impl AnalysisTap {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            shared: Arc::new(Shared {
                samples: Mutex::new(VecDeque::with_capacity(capacity)),
                active: AtomicBool::new(false),
                capacity,
            }),
        }
    }

    /// Start collecting. Returns `true` only for the call that resumed it.
    pub fn resume(&self) -> bool {
        !self.shared.active.swap(true, Ordering::AcqRel)
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Drop collected samples (pause, end of track, new load).
    pub fn clear(&self) {
        if let Ok(mut buf) = self.shared.samples.lock() {
            buf.clear();
        }
    }

    fn push(&self, sample: f32) {
        if !self.is_active() {
            return;
        }
        // Never block the mixer thread on the UI's reader.
        if let Ok(mut buf) = self.shared.samples.try_lock() {
            if buf.len() >= self.shared.capacity {
                buf.pop_front();
            }
            buf.push_back(sample);
        }
    }

    /// Copy the collected window into `out`. A suspended tap reads as silence.
    pub fn snapshot_into(&self, out: &mut Vec<f32>) {
        out.clear();
        if !self.is_active() {
            return;
        }
        if let Ok(buf) = self.shared.samples.lock() {
            out.extend(buf.iter().copied());
        }
    }
}

/// Source wrapper that mixes each frame down to mono into the tap and passes
/// the samples through untouched.
pub struct TappedSource<S> {
    inner: S,
    tap: AnalysisTap,
    frame_sum: f32,
    frame_pos: u16,
}

impl<S> TappedSource<S>
where
    S: Source<Item = f32>,
{
    pub fn new(inner: S, tap: AnalysisTap) -> Self {
        Self {
            inner,
            tap,
            frame_sum: 0.0,
            frame_pos: 0,
        }
    }
}

impl<S> Iterator for TappedSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;

        let channels = self.inner.channels().max(1);
        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos >= channels {
            self.tap.push(self.frame_sum / f32::from(channels));
            self.frame_sum = 0.0;
            self.frame_pos = 0;
        }

        Some(sample)
    }
}

impl<S> Source for TappedSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        self.inner.try_seek(pos)
    }
}
