use std::time::Duration;

use rodio::Source;
use rodio::buffer::SamplesBuffer;

use super::tap::{AnalysisTap, TappedSource};

fn stereo(frames: &[(f32, f32)]) -> SamplesBuffer {
    let samples: Vec<f32> = frames.iter().flat_map(|&(l, r)| [l, r]).collect();
    SamplesBuffer::new(2, 44_100, samples)
}

#[test]
fn suspended_tap_collects_nothing() {
    let tap = AnalysisTap::new(16);
    let passed: Vec<f32> = TappedSource::new(stereo(&[(0.5, 0.5)]), tap.clone()).collect();
    assert_eq!(passed, vec![0.5, 0.5]);

    let mut out = Vec::new();
    tap.snapshot_into(&mut out);
    assert!(out.is_empty());
}

#[test]
fn resume_is_one_shot() {
    let tap = AnalysisTap::new(16);
    assert!(!tap.is_active());
    assert!(tap.resume());
    assert!(!tap.resume());
    assert!(tap.is_active());
}

#[test]
fn tapped_source_mixes_frames_to_mono_and_passes_samples_through() {
    let tap = AnalysisTap::new(16);
    tap.resume();

    let source = TappedSource::new(stereo(&[(1.0, 0.0), (0.5, 0.5), (-1.0, -0.5)]), tap.clone());
    assert_eq!(source.channels(), 2);
    assert_eq!(source.sample_rate(), 44_100);
    let passed: Vec<f32> = source.collect();
    assert_eq!(passed, vec![1.0, 0.0, 0.5, 0.5, -1.0, -0.5]);

    let mut out = Vec::new();
    tap.snapshot_into(&mut out);
    assert_eq!(out, vec![0.5, 0.5, -0.75]);
}

#[test]
fn tap_keeps_only_the_most_recent_window() {
    let tap = AnalysisTap::new(2);
    tap.resume();
    let _: Vec<f32> =
        TappedSource::new(stereo(&[(0.1, 0.1), (0.2, 0.2), (0.3, 0.3)]), tap.clone()).collect();

    let mut out = Vec::new();
    tap.snapshot_into(&mut out);
    assert_eq!(out.len(), 2);
    assert!((out[0] - 0.2).abs() < 1e-6);
    assert!((out[1] - 0.3).abs() < 1e-6);

    tap.clear();
    tap.snapshot_into(&mut out);
    assert!(out.is_empty());
}

#[test]
fn tapped_source_reports_inner_duration() {
    let tap = AnalysisTap::new(4);
    let source = TappedSource::new(SamplesBuffer::new(1, 10, vec![0.0; 20]), tap);
    assert_eq!(source.total_duration(), Some(Duration::from_secs(2)));
}
