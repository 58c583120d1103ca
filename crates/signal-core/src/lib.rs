//! # Signal-Core: Speech Feature Extraction Pipeline
//!
//! A composable, index-oriented signal pipeline producing Mel-Frequency
//! Cepstral Coefficients (MFCC) from RIFF/WAVE or raw text signal
//! files:
//!
//! ```text
//! file -> sample list -> pre-emphasis -> framing/windowing -> FFT
//!      -> power spectrum -> mel filter bank -> log -> FCT -> MFCC
//! ```
//!
//! ## Design
//!
//! - **Sample lists** ([`samples::SampleList`]) carry real or complex
//!   samples plus a time scale and cached statistics; **indices**
//!   ([`samples::SampleIndex`]) are doubly-linked catalogues of named
//!   lists that every stage reads from and appends to.
//! - **Transforms** run through an explicit [`fft::FftContext`] that
//!   owns the bit-reversal and twiddle lookup tables for the duration of
//!   a pipeline run.
//! - **Errors** are surfaced through [`error::SignalError`]; no
//!   operation recovers silently and containers never half-mutate.
//!
//! ## Example
//!
//! ```no_run
//! use signal_core::mfcc::{mfcc_file, MfccConfig};
//! use signal_core::samples::SampleIndex;
//!
//! let mut file_index = SampleIndex::new(None);
//! let config = MfccConfig::default();
//! let features = mfcc_file("speech.wav", &config, &mut file_index)?;
//! for id in features.iter_ids() {
//!     let mfcc = &features.entry(id)?.list;
//!     println!("frame with {} coefficients", mfcc.len());
//! }
//! # Ok::<(), signal_core::error::SignalError>(())
//! ```

pub mod complex;
pub mod deriv;
pub mod error;
pub mod fft;
pub mod io;
pub mod mfcc;
pub mod preemph;
pub mod samples;
pub mod stats;
pub mod window;

pub use complex::{Complex, CpxFunction, CpxMode, Real};
pub use error::{Result, SignalError};
pub use samples::{SampleIndex, SampleKind, SampleList};
pub use stats::IncStats;
