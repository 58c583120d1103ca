//! File-level decode/write round trips and the derivative operator over
//! feature-shaped indices

use std::fs;

use signal_core::complex::Complex;
use signal_core::deriv::index_derivative;
use signal_core::io::{read_samples_file, write_index, FileLayout, TimeColumn, WriteOptions};
use signal_core::samples::{SampleIndex, SampleKind};

fn temp_path(name: &str) -> String {
    std::env::temp_dir().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_raw_file_read() {
    let path = temp_path("signal_core_io_samples.raw");
    fs::write(&path, "0.5\n-1.25\n\n3e-2\n").unwrap();

    let mut index = SampleIndex::new(None);
    index
        .add_entry("raw signal", &path, None, SampleKind::Real, 0.0, 1.0, 0, true)
        .unwrap();
    let info = read_samples_file(&mut index, 1).unwrap();

    // Raw text carries no WAVE description
    assert!(info.is_none());
    let list = &index.current_entry().unwrap().list;
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(1).unwrap().re, 0.5);
    assert_eq!(list.get(2).unwrap().re, -1.25);
    assert_eq!(list.get(3).unwrap().re, 0.03);
}

#[test]
fn test_written_lists_read_back_as_raw() {
    let mut index = SampleIndex::new(None);
    index
        .add_entry(
            "tone",
            temp_path("signal_core_io_tone.raw"),
            None,
            SampleKind::Real,
            0.0,
            1.0,
            0,
            true,
        )
        .unwrap();
    for v in [1.5, -2.5, 0.125] {
        index.current_entry_mut().unwrap().list.push(Complex::new(v, 0.0));
    }

    // One file per list, values only
    let options = WriteOptions {
        write_index: false,
        files: FileLayout::OnePerList,
        time: TimeColumn::None,
        ..WriteOptions::default()
    };
    write_index(&index, None, None, &options).unwrap();

    let mut reread = SampleIndex::new(None);
    reread
        .add_entry(
            "tone copy",
            temp_path("signal_core_io_tone.raw"),
            None,
            SampleKind::Real,
            0.0,
            1.0,
            0,
            true,
        )
        .unwrap();
    read_samples_file(&mut reread, 1).unwrap();

    let list = &reread.current_entry().unwrap().list;
    assert_eq!(list.len(), 3);
    assert!((list.get(1).unwrap().re - 1.5).abs() < 1e-12);
    assert!((list.get(2).unwrap().re + 2.5).abs() < 1e-12);
    assert!((list.get(3).unwrap().re - 0.125).abs() < 1e-12);
}

#[test]
fn test_header_file_with_per_list_payloads() {
    let header = temp_path("signal_core_io_header.txt");
    let payload = temp_path("signal_core_io_payload.raw");

    let mut index = SampleIndex::new(None);
    index
        .add_entry("entry", &payload, None, SampleKind::Real, 0.0, 0.25, 0, true)
        .unwrap();
    index.current_entry_mut().unwrap().list.push(Complex::new(7.0, 0.0));

    let options = WriteOptions {
        files: FileLayout::OnePerList,
        ..WriteOptions::default()
    };
    write_index(&index, None, Some(std::path::Path::new(&header)), &options).unwrap();

    let header_text = fs::read_to_string(&header).unwrap();
    assert!(header_text.contains(&format!("Index ID       : {}", index.id())));
    assert!(header_text.contains("Samples    : 1"));
    // Payload routed to the entry file, not the header file
    assert!(!header_text.contains("7E0"));
    let payload_text = fs::read_to_string(&payload).unwrap();
    assert_eq!(payload_text.trim(), "7E0");
}

#[test]
fn test_derivative_over_feature_index() {
    // Three frames of 4 slots each: 2 coefficients + 2 delta slots
    let mut index = SampleIndex::new(None);
    for (n, scale) in [1.0, 2.0, 4.0].iter().enumerate() {
        index
            .add_entry(
                format!("mfcc {n}"),
                format!("mfcc.{n}"),
                None,
                SampleKind::Real,
                0.0,
                1.0,
                n as u64,
                true,
            )
            .unwrap();
        let list = &mut index.current_entry_mut().unwrap().list;
        list.push(Complex::new(10.0 * scale, 0.0));
        list.push(Complex::new(-3.0 * scale, 0.0));
        list.push(Complex::new(0.0, 0.0));
        list.push(Complex::new(0.0, 0.0));
    }

    index_derivative(&mut index).unwrap();

    // Middle frame: regression over (1, 2, 4) scaled coefficients
    let id = index.entry_at(2).unwrap();
    let list = &index.entry(id).unwrap().list;
    assert!((list.get(3).unwrap().re - 15.0).abs() < 1e-9);
    assert!((list.get(4).unwrap().re + 4.5).abs() < 1e-9);
    // Coefficients themselves stay in place
    assert_eq!(list.get(1).unwrap().re, 20.0);
    assert_eq!(list.get(2).unwrap().re, -6.0);
}
