//! Cross-validation of the radix-2 engine against rustfft

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::{num_complex::Complex64, FftPlanner};

use signal_core::complex::Complex;
use signal_core::fft::{fft_exec, FftContext, FftDirection, FftDomain};
use signal_core::samples::{SampleIndex, SampleKind};

fn complex_index(values: &[Complex]) -> SampleIndex {
    let mut index = SampleIndex::new(None);
    index
        .add_entry("x", "x.raw", None, SampleKind::Complex, 0.0, 1.0, 0, true)
        .unwrap();
    let list = &mut index.current_entry_mut().unwrap().list;
    for &z in values {
        list.push(z);
    }
    index
}

fn run_case(n: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<Complex> = (0..n)
        .map(|_| Complex::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
        .collect();

    // Reference spectrum
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut reference: Vec<Complex64> =
        values.iter().map(|z| Complex64::new(z.re, z.im)).collect();
    fft.process(&mut reference);

    // Engine under test
    let mut ctx = FftContext::new();
    let mut index = complex_index(&values);
    fft_exec(&mut ctx, &mut index, FftDirection::Direct, FftDomain::Complex).unwrap();

    let list = &index.current_entry().unwrap().list;
    assert_eq!(list.len(), n);
    for (pos, want) in reference.iter().enumerate() {
        let got = list.get(pos + 1).unwrap();
        let scale = want.norm().max(1.0);
        assert!(
            (got.re - want.re).abs() / scale < 1e-9,
            "re mismatch at bin {pos}: {} vs {}",
            got.re,
            want.re
        );
        assert!(
            (got.im - want.im).abs() / scale < 1e-9,
            "im mismatch at bin {pos}: {} vs {}",
            got.im,
            want.im
        );
    }
}

#[test]
fn test_matches_rustfft_across_sizes() {
    for (seed, n) in [(1u64, 2usize), (2, 4), (3, 8), (4, 64), (5, 256), (6, 1024)] {
        run_case(n, seed);
    }
}

#[test]
fn test_inverse_matches_rustfft() {
    let n = 128;
    let mut rng = StdRng::seed_from_u64(99);
    let values: Vec<Complex> = (0..n)
        .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);
    let mut reference: Vec<Complex64> =
        values.iter().map(|z| Complex64::new(z.re, z.im)).collect();
    ifft.process(&mut reference);
    // rustfft leaves the inverse unscaled; the engine rescales by 1/N
    for z in reference.iter_mut() {
        *z /= n as f64;
    }

    let mut ctx = FftContext::new();
    let mut index = complex_index(&values);
    fft_exec(&mut ctx, &mut index, FftDirection::Inverse, FftDomain::Complex).unwrap();

    let list = &index.current_entry().unwrap().list;
    for (pos, want) in reference.iter().enumerate() {
        let got = list.get(pos + 1).unwrap();
        assert!((got.re - want.re).abs() < 1e-9);
        assert!((got.im - want.im).abs() < 1e-9);
    }
}
