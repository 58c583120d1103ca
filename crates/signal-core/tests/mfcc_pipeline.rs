//! End-to-end MFCC pipeline tests over synthesized WAVE input

use std::f64::consts::PI;
use std::fs;

use signal_core::io::{write_index_to, TimeColumn, WriteOptions};
use signal_core::mfcc::{mfcc_file, MfccConfig};
use signal_core::samples::SampleIndex;
use signal_core::window::WindowFunction;

/// Builds an in-memory 16-bit PCM WAVE file (18-byte fmt chunk)
fn encode_pcm16(channels: u16, samples_per_second: u32, frames: &[Vec<i16>]) -> Vec<u8> {
    let block_align = 2 * channels;
    let data_len = (frames.len() as u32) * block_align as u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(4 + 26 + 8 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&18u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&samples_per_second.to_le_bytes());
    out.extend_from_slice(&(samples_per_second * block_align as u32).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(&[0u8, 0u8]);
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for frame in frames {
        for value in frame {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
    out
}

/// A speech-like test signal mixing three formant frequencies
fn speech_signal(length: usize, sample_rate: u32) -> Vec<Vec<i16>> {
    let formants = [500.0, 1500.0, 2500.0];
    let gains = [0.5, 0.3, 0.2];
    (0..length)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let sample: f64 = formants
                .iter()
                .zip(gains.iter())
                .map(|(f, g)| (2.0 * PI * f * t).sin() * g)
                .sum();
            vec![(sample * 8000.0) as i16]
        })
        .collect()
}

fn wave_fixture(name: &str, length: usize) -> String {
    let path = std::env::temp_dir().join(name);
    let bytes = encode_pcm16(1, 8000, &speech_signal(length, 8000));
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_pipeline_produces_one_mfcc_list_per_frame() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("signal_core=debug")
        .try_init();

    let path = wave_fixture("signal_core_pipeline_a.wav", 1024);
    let config = MfccConfig {
        frame_width: 256,
        superposing_samples: 128,
        total_filters: 13,
        purge_zero_power: false,
        ..MfccConfig::default()
    };

    let mut file_index = SampleIndex::new(None);
    let features = mfcc_file(&path, &config, &mut file_index).unwrap();

    // 1024 samples, stride 128 -> 8 frames
    assert_eq!(features.len(), 8);
    for id in features.iter_ids() {
        let list = &features.entry(id).unwrap().list;
        // The in-place FCT of the 13 coefficients zero-pads to 16
        assert_eq!(list.len(), 16);
        let energy: f64 = (1..=list.len())
            .map(|p| list.get(p).unwrap().re.abs())
            .sum();
        assert!(energy > 0.0, "MFCC frame carries no information");
    }

    // The file entry remains behind in the caller's index
    assert_eq!(file_index.len(), 1);
    assert_eq!(file_index.current_entry().unwrap().list.len(), 1024);
}

#[test]
fn test_pipeline_is_deterministic() {
    let path = wave_fixture("signal_core_pipeline_b.wav", 512);
    let config = MfccConfig {
        frame_width: 128,
        superposing_samples: 64,
        total_filters: 8,
        window: WindowFunction::Hanning,
        ..MfccConfig::default()
    };

    let mut index_a = SampleIndex::new(None);
    let features_a = mfcc_file(&path, &config, &mut index_a).unwrap();
    let mut index_b = SampleIndex::new(None);
    let features_b = mfcc_file(&path, &config, &mut index_b).unwrap();

    assert_eq!(features_a.len(), features_b.len());
    let ids_a: Vec<_> = features_a.iter_ids().collect();
    let ids_b: Vec<_> = features_b.iter_ids().collect();
    for (&a, &b) in ids_a.iter().zip(ids_b.iter()) {
        let la = &features_a.entry(a).unwrap().list;
        let lb = &features_b.entry(b).unwrap().list;
        assert_eq!(la.len(), lb.len());
        for pos in 1..=la.len() {
            let va = la.get(pos).unwrap();
            let vb = lb.get(pos).unwrap();
            assert!((va.re - vb.re).abs() < 1e-12);
        }
    }
}

#[test]
fn test_pipeline_output_through_writer() {
    let path = wave_fixture("signal_core_pipeline_c.wav", 512);
    let config = MfccConfig {
        frame_width: 256,
        superposing_samples: 0,
        total_filters: 8,
        ..MfccConfig::default()
    };

    let mut file_index = SampleIndex::new(None);
    let features = mfcc_file(&path, &config, &mut file_index).unwrap();

    let options = WriteOptions {
        time: TimeColumn::Normalized,
        ..WriteOptions::default()
    };
    let mut out = Vec::new();
    write_index_to(&features, None, &mut out, &options).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains(&format!("Index ID       : {}", features.id())));
    assert!(text.contains("Number of lists: 2"));
    assert!(text.contains(", MFCC"));
}

#[test]
fn test_missing_file_reports_io_error() {
    let mut file_index = SampleIndex::new(None);
    let err = mfcc_file(
        "/nonexistent/signal_core.wav",
        &MfccConfig::default(),
        &mut file_index,
    );
    assert!(err.is_err());
}
