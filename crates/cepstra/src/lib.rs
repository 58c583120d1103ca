//! # Cepstra
//!
//! Speech-feature extraction and vector-quantization learning.
//!
//! This umbrella crate re-exports the two halves of the toolkit:
//!
//! - [`signal`] (`cepstra-signal-core`) - the signal pipeline from
//!   RIFF/WAVE or raw text files through pre-emphasis, framing and
//!   windowing, the radix-2 FFT, the mel filter bank and the cosine
//!   transform to MFCC feature vectors.
//! - [`lvq`] (`cepstra-lvq-core`) - the Learning Vector Quantization
//!   learner training two-layer codebook networks under the LVQ-1,
//!   LVQ-2.1 and LVQ-3 rules.
//!
//! The typical flow extracts MFCC frames with
//! [`signal::mfcc::mfcc_file`], collects them into an
//! [`lvq::TrainingSet`] with class labels, and trains a
//! [`lvq::Lvq`] learner over them.

pub use lvq_core as lvq;
pub use signal_core as signal;

/// Commonly used types from both halves of the toolkit
pub mod prelude {
    pub use lvq_core::{
        ClassTable, Element, LRateFunction, Lvq, LvqAlgorithm, LvqConfig, LvqError, Network,
        TrainingSet, TransitionMap, Vector, VectorMetric, WeightInit,
    };
    pub use signal_core::mfcc::{mfcc_file, mfcc_file_write, MelBank, MfccConfig};
    pub use signal_core::{
        Complex, CpxFunction, CpxMode, IncStats, SampleIndex, SampleKind, SampleList, SignalError,
    };
}
