use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Byte-scaled frequency analysis over the most recent samples, with the
/// semantics of a Web Audio `AnalyserNode`: Blackman window, magnitudes
/// normalised by the FFT size, exponential smoothing across frames, then a
/// linear map of `[min_db, max_db]` onto `0..=255`.
pub struct Analyser {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl Analyser {
    pub fn new(fft_size: usize, smoothing: f32, min_db: f32, max_db: f32) -> Self {
        let fft_size = fft_size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        let window = blackman(fft_size);
        Self {
            fft,
            fft_size,
            window,
            smoothing: smoothing.clamp(0.0, 1.0),
            min_db,
            max_db,
            smoothed: vec![0.0; fft_size / 2],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins produced per frame (half the FFT size).
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Analyse the tail of `samples` (mono) and write one byte per bin into
    /// `out`. Missing samples count as silence.
    pub fn byte_frequency_data(&mut self, samples: &[f32], out: &mut [u8]) {
        let n = self.fft_size;
        let tail = &samples[samples.len().saturating_sub(n)..];
        let pad = n - tail.len();

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { tail[i - pad] };
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 255.0 / (self.max_db - self.min_db);
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() / n as f32;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;

            if let Some(byte) = out.get_mut(k) {
                *byte = if *smoothed > 0.0 {
                    let db = 20.0 * smoothed.log10();
                    (scale * (db - self.min_db)).clamp(0.0, 255.0) as u8
                } else {
                    0
                };
            }
        }
    }
}

fn blackman(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}
