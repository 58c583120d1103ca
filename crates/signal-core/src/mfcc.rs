//! MFCC feature extraction
//!
//! Mel-frequency cepstral coefficients over the framed power spectrum of
//! a speech signal: mel/Hz conversions, a cached triangular mel filter
//! bank, the per-frame coefficient accumulation and the full file
//! pipeline (read, window, FFT, power spectrum, filter bank, log, FCT).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::{Complex, CpxFunction, CpxMode, Real};
use crate::error::{Result, SignalError};
use crate::fft::{
    exec_index, FftContext, FftDirection, FftDomain, FftTransform,
};
use crate::io::{read_samples_file, write_index, WriteOptions};
use crate::samples::{EntryId, SampleIndex, SampleKind};
use crate::window::{triangular_value, window_signal, WindowFunction, WindowShape};

/// `C1 = 1000 / ln(1 + 1000/700)`
const MEL_C1: Real = 1127.010480334157438654463368029022;

/// Mel frequency associated to the given frequency in Hz
pub fn hz_to_mel(f_hz: Real) -> Real {
    MEL_C1 * (1.0 + f_hz / 700.0).ln()
}

/// Frequency in Hz associated to the given mel-scale frequency
pub fn mel_to_hz(f_mel: Real) -> Real {
    700.0 * ((f_mel / MEL_C1).exp() - 1.0)
}

/// Triangular mel filter bank with cached Hz-domain endpoints
///
/// The endpoints of filters `1..=total_filters + 1` are precomputed from
/// the equally spaced mel series `k * delta_mel`; the table is rebuilt
/// only when `delta_mel` or the filter count changes.
#[derive(Debug, Clone)]
pub struct MelBank {
    delta_mel: Real,
    total_filters: usize,
    endpoints: Vec<Real>,
}

impl MelBank {
    pub fn new(delta_mel: Real, total_filters: usize) -> Result<Self> {
        if delta_mel < f64::EPSILON {
            return Err(SignalError::domain(
                "mel_bank",
                "non-positive mel frequency interval requested",
            ));
        }
        let endpoints = (1..=total_filters + 1)
            .map(|k| mel_to_hz(k as Real * delta_mel))
            .collect();
        Ok(MelBank {
            delta_mel,
            total_filters,
            endpoints,
        })
    }

    /// Reconfigures the bank, rebuilding the endpoint table only when
    /// the parameters actually changed
    pub fn configure(&mut self, delta_mel: Real, total_filters: usize) -> Result<()> {
        if (delta_mel - self.delta_mel).abs() > f64::EPSILON
            || total_filters != self.total_filters
        {
            *self = MelBank::new(delta_mel, total_filters)?;
        }
        Ok(())
    }

    pub fn total_filters(&self) -> usize {
        self.total_filters
    }

    pub fn delta_mel(&self) -> Real {
        self.delta_mel
    }

    /// `(low, mid, high)` Hz frequencies of the given filter (1-based)
    ///
    /// Filter `k` spans the endpoints `k - 1`, `k` and `k + 1`, with
    /// endpoint zero pinned at 0 Hz.
    pub fn filter_edges(&self, filter: usize) -> Result<(Real, Real, Real)> {
        if filter < 1 || filter > self.total_filters {
            return Err(SignalError::domain(
                "mel_bank",
                format!(
                    "requested filter ({filter}) is beyond the number of filters ({})",
                    self.total_filters
                ),
            ));
        }
        let low = if filter <= 1 {
            0.0
        } else {
            self.endpoints[filter - 2]
        };
        Ok((low, self.endpoints[filter - 1], self.endpoints[filter]))
    }

    /// Triangular filter value at a continuous frequency
    pub fn filter_value(&self, filter: usize, freq: Real) -> Result<Real> {
        let (low, mid, high) = self.filter_edges(filter)?;
        Ok(triangular_value(freq, mid, low, high, 1.0))
    }
}

/// Computes the MFCCs of one power-spectrum entry and appends the
/// resulting list to `out_index`
///
/// The output list is complex-kind (so the cosine transform can run in
/// place on it later) with the same time scale as the input frame.
pub fn mfcc_list(
    bank: &MelBank,
    in_index: &SampleIndex,
    entry_id: EntryId,
    out_index: &mut SampleIndex,
) -> Result<usize> {
    let entry = in_index.entry(entry_id)?;
    let in_list = &entry.list;
    let inc_time = in_list.inc_time();
    if inc_time < f64::EPSILON {
        return Err(SignalError::domain(
            "mfcc_list",
            "input frame has no frequency scale",
        ));
    }

    let pos = out_index.add_entry(
        format!("{}, MFCC", entry.name),
        format!("{}.mfcc", entry.file),
        Some(entry_id),
        SampleKind::Complex,
        in_list.ini_time(),
        inc_time,
        in_list.ini_norm_time(),
        true,
    )?;
    out_index.current_entry_mut()?.list.resize(bank.total_filters());

    let is_complex = in_list.kind() == SampleKind::Complex;

    for filter in 1..=bank.total_filters() {
        let (low, _mid, high) = bank.filter_edges(filter)?;

        // Discretized sample range of the filter support
        let low_sample = (low / inc_time) as usize + 1;
        let hi_sample = (high / inc_time) as usize;

        let mut acc = Complex::new(0.0, 0.0);
        for cur_sample in low_sample..=hi_sample {
            // Zero padding beyond the frame
            let value = if cur_sample <= in_list.len() {
                in_list.get(cur_sample)?
            } else {
                Complex::new(0.0, 0.0)
            };
            let filter_value = bank.filter_value(filter, cur_sample as Real * inc_time)?;
            acc.re += value.re * filter_value;
            if is_complex {
                acc.im += value.im * filter_value;
            }
        }
        out_index
            .current_entry_mut()?
            .list
            .set(filter, acc)?;
    }
    Ok(pos)
}

/// Computes MFCC lists for every entry of the input index
///
/// Returns a new index, parented on the input, with one MFCC list per
/// input list.
pub fn mfcc_index(bank: &MelBank, in_index: &SampleIndex) -> Result<SampleIndex> {
    let mut out_index = SampleIndex::new(Some(in_index));
    for id in in_index.iter_ids() {
        mfcc_list(bank, in_index, id, &mut out_index)?;
    }
    Ok(out_index)
}

/// Parameters of the MFCC extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfccConfig {
    /// Pre-emphasis filter coefficient; `None` skips the filter
    pub preemphasis: Option<Real>,
    /// Samples per frame
    pub frame_width: usize,
    /// Samples shared by two consecutive frames
    pub superposing_samples: usize,
    /// Windowing function applied to every frame
    pub window: WindowFunction,
    /// Discard frames with no measurable power
    pub purge_zero_power: bool,
    /// Basis of the cepstral logarithm
    pub log_basis: Real,
    /// Mel frequency interval between filters
    pub delta_mel: Real,
    /// Number of filters in the bank
    pub total_filters: usize,
}

impl Default for MfccConfig {
    fn default() -> Self {
        MfccConfig {
            preemphasis: Some(0.95),
            frame_width: 256,
            superposing_samples: 128,
            window: WindowFunction::Hamming,
            purge_zero_power: true,
            log_basis: 10.0,
            delta_mel: 100.0,
            total_filters: 20,
        }
    }
}

/// Runs the whole MFCC pipeline for one input file
///
/// file -> read -> pre-emphasis/windowing -> in-place real FFT ->
/// power spectrum -> mel filter bank -> log -> in-place FCT. The file
/// entry is appended to `file_index`; the returned index holds one MFCC
/// list per (non-purged) frame. The intermediate frames index is
/// destroyed before returning.
pub fn mfcc_file(
    in_file_name: &str,
    config: &MfccConfig,
    file_index: &mut SampleIndex,
) -> Result<SampleIndex> {
    debug!(file = in_file_name, ?config, "extracting MFCC features");

    let file_pos = file_index.add_entry(
        "Input file index entry",
        in_file_name,
        None,
        SampleKind::Real,
        0.0,
        0.0,
        0,
        true,
    )?;
    read_samples_file(file_index, file_pos)?;

    let shape = WindowShape::new(config.window);
    let mut frames_index = window_signal(
        file_index,
        config.preemphasis,
        config.frame_width,
        config.superposing_samples,
        SampleKind::Complex,
        CpxMode::Real,
        &shape,
        config.purge_zero_power,
    )?;

    let mut ctx = FftContext::new();
    exec_index(
        &mut ctx,
        &mut frames_index,
        FftTransform::Fft,
        FftDirection::Direct,
        FftDomain::Real,
    )?;

    // Power density spectrum
    frames_index.apply_function(CpxFunction::SqrModulus, CpxMode::Complex, &[])?;

    let bank = MelBank::new(config.delta_mel, config.total_filters)?;
    let mut out_index = mfcc_index(&bank, &frames_index)?;

    // Cepstral log
    out_index.apply_function(CpxFunction::RealLog, CpxMode::Complex, &[config.log_basis])?;

    frames_index.destroy(true)?;

    exec_index(
        &mut ctx,
        &mut out_index,
        FftTransform::Fct,
        FftDirection::Direct,
        FftDomain::Real,
    )?;

    Ok(out_index)
}

/// Extracts MFCCs for a file and writes them through the index writer
///
/// When `out_file_name` is `None` the output goes to stdout.
pub fn mfcc_file_write(
    in_file_name: &str,
    config: &MfccConfig,
    options: &WriteOptions,
    out_file_name: Option<&Path>,
) -> Result<()> {
    let mut file_index = SampleIndex::new(None);
    let mfcc = mfcc_file(in_file_name, config, &mut file_index)?;
    write_index(&mfcc, None, out_file_name, options)?;
    file_index.destroy(true)?;
    Ok(())
}
