//! # LVQ-Core: Learning Vector Quantization
//!
//! A two-layer competitive network (input plus codebook layer)
//! trainable under the LVQ-1, LVQ-2.1 and LVQ-3 variants, with a window
//! test separating valid from invalid codebook pairs and a time-decaying
//! learning rate.
//!
//! The learner consumes labelled feature vectors (typically MFCC frames
//! from `cepstra-signal-core`, but any source works) collected into a
//! [`tset::TrainingSet`].
//!
//! ## Example
//!
//! ```
//! use lvq_core::lrate::LRateFunction;
//! use lvq_core::lvq::{Lvq, LvqAlgorithm, LvqConfig};
//! use lvq_core::network::WeightInit;
//! use lvq_core::trmap::TransitionMap;
//! use lvq_core::tset::TrainingSet;
//! use lvq_core::vector::{Vector, VectorMetric};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut lvq = Lvq::new(LvqConfig {
//!     algorithm: LvqAlgorithm::Lvq1,
//!     lrate: LRateFunction::LinearDecay { initial: 0.3, final_time: 50.0 },
//!     metric: VectorMetric::Euclidean,
//!     output_classes: 2,
//!     units_per_class: 1,
//!     window_width: 0.3,
//!     epsilon: 0.1,
//! })?;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! lvq.create_network("demo", 2, WeightInit::Constant { value: 0.0 }, &mut rng)?;
//!
//! let mut set = TrainingSet::new(2)?;
//! set.add_element(Vector::from_slice(&[0.0, 0.0]), 1.0)?;
//! set.add_element(Vector::from_slice(&[1.0, 1.0]), 2.0)?;
//! lvq.init_weights(&set)?;
//!
//! let mut map = TransitionMap::new(2)?;
//! let report = lvq.train_set(&set, 0, 50, true, None, Some(&mut map))?;
//! assert!(report.error_rate <= 1.0);
//! # Ok::<(), lvq_core::error::LvqError>(())
//! ```

pub mod error;
pub mod lrate;
pub mod lvq;
pub mod network;
pub mod trmap;
pub mod tset;
pub mod vector;

pub use error::{LvqError, Result};
pub use lrate::LRateFunction;
pub use lvq::{Lvq, LvqAlgorithm, LvqConfig};
pub use network::{Network, WeightInit};
pub use trmap::TransitionMap;
pub use tset::{ClassTable, Element, TrainingSet};
pub use vector::{Vector, VectorMetric};
