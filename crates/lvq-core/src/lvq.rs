//! LVQ training and classification
//!
//! A Learning Vector Quantization extension over the two-layer
//! competitive network: codebook initialization from a training set,
//! metric-based two-winner propagation, the LVQ-1 / LVQ-2.1 / LVQ-3
//! weight adaption rules with the window test, and the epoch-driven
//! training-set sweep.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{LvqError, Result};
use crate::lrate::LRateFunction;
use crate::network::{Network, WeightInit};
use crate::trmap::TransitionMap;
use crate::tset::{ClassTable, Element, TrainingSet};
use crate::vector::{euclidean_distance, Vector, VectorMetric};

/// LVQ training algorithm variants
///
/// OLVQ-1 is declared for completeness; no update rule is defined for
/// its per-unit adaptive learning rates, so training with it is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LvqAlgorithm {
    Lvq1,
    Lvq21,
    Lvq3,
    Olvq1,
}

impl LvqAlgorithm {
    /// Does the algorithm correct the second winner?
    fn uses_second_winner(&self) -> bool {
        matches!(self, LvqAlgorithm::Lvq21 | LvqAlgorithm::Lvq3)
    }
}

impl fmt::Display for LvqAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LvqAlgorithm::Lvq1 => "LVQ-1",
            LvqAlgorithm::Lvq21 => "LVQ-2.1",
            LvqAlgorithm::Lvq3 => "LVQ-3",
            LvqAlgorithm::Olvq1 => "OLVQ-1",
        };
        f.write_str(name)
    }
}

impl FromStr for LvqAlgorithm {
    type Err = LvqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LVQ-1" => Ok(LvqAlgorithm::Lvq1),
            "LVQ-2.1" => Ok(LvqAlgorithm::Lvq21),
            "LVQ-3" => Ok(LvqAlgorithm::Lvq3),
            "OLVQ-1" => Ok(LvqAlgorithm::Olvq1),
            other => Err(LvqError::UnknownAlgorithm {
                details: format!("'{other}'"),
            }),
        }
    }
}

/// Configuration of an LVQ learner
#[derive(Debug, Clone)]
pub struct LvqConfig {
    pub algorithm: LvqAlgorithm,
    pub lrate: LRateFunction,
    pub metric: VectorMetric,
    /// Number of output classes (K)
    pub output_classes: usize,
    /// Codebook vectors per class (m)
    pub units_per_class: usize,
    /// Window width for LVQ-2.1 / LVQ-3, in `(0, 1)`
    pub window_width: f64,
    /// Relative rate for simultaneous correct updates in LVQ-3,
    /// in `(0, 1)`
    pub epsilon: f64,
}

/// Result of propagating one element
#[derive(Debug, Clone, Copy)]
pub struct Propagation {
    /// Index of the best output unit
    pub winner1: usize,
    /// Index of the runner-up, when the layer has more than one unit
    pub winner2: Option<usize>,
    /// Squared Euclidean distance between the input and the winner's
    /// codebook vector
    pub mse: f64,
}

/// Result of training one element
#[derive(Debug, Clone, Copy)]
pub struct TrainOutcome {
    pub winner_class: usize,
    pub matched: bool,
    pub mse: f64,
}

/// Aggregate result of a set sweep
#[derive(Debug, Clone, Copy)]
pub struct SweepReport {
    /// Fraction of elements whose winner class missed the desired class
    pub error_rate: f64,
    /// Sum of the per-element MSE over the sweep
    pub mse: f64,
}

/// Optional ASCII progress output for training sweeps
#[derive(Debug, Clone, Copy)]
pub struct ProgressBar {
    pub width: usize,
    pub character: char,
}

impl ProgressBar {
    fn render(&self, first_epoch: u64, max_epochs: u64, current: u64) {
        if max_epochs <= first_epoch {
            return;
        }
        let span = (max_epochs - first_epoch) as usize;
        let done = (current.saturating_sub(first_epoch) as usize * self.width) / span.max(1);
        let done = done.min(self.width);
        let bar: String = std::iter::repeat(self.character).take(done).collect();
        eprint!("\r[{bar:<width$}] epoch {current}/{max_epochs}", width = self.width);
        if current >= max_epochs {
            eprintln!();
        }
    }
}

/// A Learning Vector Quantization learner
///
/// Extends a two-layer network with the LVQ attributes: training
/// algorithm, learning-rate function, activation metric, class
/// geometry, window width and epsilon.
#[derive(Debug, Clone)]
pub struct Lvq {
    config: LvqConfig,
    network: Option<Network>,
    class_table: Option<ClassTable>,
    /// Current training time (epoch counter)
    epoch: u64,
}

impl Lvq {
    /// Validates the configuration and creates the learner
    ///
    /// `units_per_class` must be at least one; the window width must be
    /// in `(0, 1)` for the window-based algorithms and epsilon in
    /// `(0, 1)` for LVQ-3.
    pub fn new(config: LvqConfig) -> Result<Self> {
        config.lrate.validate()?;

        if config.units_per_class == 0 {
            return Err(LvqError::domain(
                "lvq_create",
                "LVQ must have at least one unit per class",
            ));
        }
        if config.output_classes == 0 {
            return Err(LvqError::domain(
                "lvq_create",
                "LVQ must have at least one output class",
            ));
        }
        if config.algorithm.uses_second_winner()
            && (config.window_width < f64::EPSILON || config.window_width > 1.0 - f64::EPSILON)
        {
            return Err(LvqError::domain(
                "lvq_create",
                "window width must be in range 0.0 .. 1.0",
            ));
        }
        if config.algorithm == LvqAlgorithm::Lvq3
            && (config.epsilon < f64::EPSILON || config.epsilon > 1.0 - f64::EPSILON)
        {
            return Err(LvqError::domain(
                "lvq_create",
                "epsilon must be in range 0.0 .. 1.0",
            ));
        }

        debug!(algorithm = %config.algorithm, classes = config.output_classes,
               units_per_class = config.units_per_class, "creating LVQ learner");
        Ok(Lvq {
            config,
            network: None,
            class_table: None,
            epoch: 0,
        })
    }

    pub fn config(&self) -> &LvqConfig {
        &self.config
    }

    /// Current training time
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Builds the attached network: `input_dim` pass-through inputs and
    /// `K * m` fully connected output units
    pub fn create_network<R: Rng + ?Sized>(
        &mut self,
        name: impl Into<String>,
        input_dim: usize,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<()> {
        let outputs = self.config.output_classes * self.config.units_per_class;
        self.network = Some(Network::new(name, input_dim, outputs, init, rng)?);
        Ok(())
    }

    /// Attaches an output class table; its rows must match `K`
    pub fn attach_class_table(&mut self, table: ClassTable) -> Result<()> {
        if table.len() != self.config.output_classes {
            return Err(LvqError::domain(
                "lvq_attach_class_table",
                format!(
                    "incompatible number of classes between network ({}) and class table ({})",
                    self.config.output_classes,
                    table.len()
                ),
            ));
        }
        self.class_table = Some(table);
        Ok(())
    }

    pub fn class_table(&self) -> Option<&ClassTable> {
        self.class_table.as_ref()
    }

    /// Borrows the attached network
    pub fn network(&self) -> Result<&Network> {
        self.network.as_ref().ok_or_else(|| LvqError::NotInitialized {
            details: "LVQ extension not attached to a neural network".into(),
        })
    }

    /// Mutably borrows the attached network for direct codebook access
    pub fn network_mut(&mut self) -> Result<&mut Network> {
        self.network.as_mut().ok_or_else(|| LvqError::NotInitialized {
            details: "LVQ extension not attached to a neural network".into(),
        })
    }

    /// Class owning an output unit: `(index - 1) / m + 1`
    pub fn class_of_unit(&self, unit_index: usize) -> usize {
        (unit_index - 1) / self.config.units_per_class + 1
    }

    /// Initializes the codebook vectors from a training set
    ///
    /// Each output unit takes the next training element of its class (in
    /// insertion order), z-scored by the set's input statistics. A class
    /// with no representative in the set fails the initialization.
    pub fn init_weights(&mut self, set: &TrainingSet) -> Result<()> {
        let stats = set.input_statistics()?;
        let units = self.network()?.num_units();
        let units_per_class = self.config.units_per_class;

        let mut cursor = 0usize;
        let mut installs: Vec<(usize, Vector)> = Vec::with_capacity(units);
        for unit_index in 1..=units {
            let class = self.class_of_unit(unit_index);
            if (unit_index - 1) % units_per_class == 0 {
                cursor = 0;
            }

            let mut found = None;
            while let Some(element) = set.element(cursor) {
                cursor += 1;
                if (element.output - class as f64).abs() < f64::EPSILON {
                    found = Some(element);
                    break;
                }
            }
            let element = found.ok_or_else(|| {
                LvqError::domain(
                    "init_weights",
                    format!("no training element represents class {class}"),
                )
            })?;

            let centered = element.input.subtract(&stats.average)?;
            let scaled = centered.multiply(&stats.invstddev)?;
            installs.push((unit_index, scaled));
        }

        for (unit_index, weights) in installs {
            self.network_mut()?.set_weight_vector(unit_index, &weights)?;
        }
        Ok(())
    }

    /// Loads an element, activates the network and runs the competition
    pub fn propagate_element(&mut self, element: &Element) -> Result<Propagation> {
        let metric = self.config.metric;
        let network = self.network_mut()?;
        network.load_input(&element.input)?;
        network.activate(metric)?;
        let (winner1, winner2) = network.two_winners(metric)?;

        let distance = euclidean_distance(&element.input, network.weight_vector(winner1)?)?;
        Ok(Propagation {
            winner1,
            winner2,
            mse: distance * distance,
        })
    }

    /// Window test for LVQ-2.1 / LVQ-3
    ///
    /// The winner pair is inside the window iff
    /// `min(d1/d2, d2/d1) > (1 - w) / (1 + w)`. The test is trivially
    /// false when the second winner is undefined or either distance
    /// vanishes.
    pub fn window_test(
        &self,
        input: &Vector,
        winner1: usize,
        winner2: Option<usize>,
    ) -> Result<bool> {
        let w = self.config.window_width;
        if w < f64::EPSILON || w > 1.0 - f64::EPSILON {
            return Err(LvqError::domain(
                "lvq_window",
                format!("invalid value for w: {w}"),
            ));
        }
        let Some(winner2) = winner2 else {
            return Ok(false);
        };

        let network = self.network()?;
        let d1 = euclidean_distance(input, network.weight_vector(winner1)?)?;
        let d2 = euclidean_distance(input, network.weight_vector(winner2)?)?;
        if d1 <= f64::EPSILON || d2 <= f64::EPSILON {
            return Ok(false);
        }
        let min_ratio = (d1 / d2).min(d2 / d1);
        Ok(min_ratio > (1.0 - w) / (1.0 + w))
    }

    /// New codebook vector for one winner: `w + rate * (x - w)` with the
    /// rate sign selected by the classification correctness
    fn corrected_weights(
        &self,
        unit_index: usize,
        input: &Vector,
        etha: f64,
        matched: bool,
    ) -> Result<Vector> {
        let weights = self.network()?.weight_vector(unit_index)?;
        let rate = if matched { etha } else { -etha };
        let error = input.subtract(weights)?;
        weights.sum(&error.scalar_multiply(rate))
    }

    /// Updates the winners' codebook vectors according to the algorithm
    ///
    /// All new vectors are computed before any is installed, so a
    /// failure leaves the network untouched.
    fn adapt(
        &mut self,
        winner1: usize,
        winner2: Option<usize>,
        input: &Vector,
        etha: f64,
        right1: bool,
        right2: bool,
    ) -> Result<()> {
        let algorithm = self.config.algorithm;
        if algorithm.uses_second_winner() && winner2.is_none() {
            return Err(LvqError::NotInitialized {
                details: format!("{algorithm} requires a second winner"),
            });
        }

        let mut updates: Vec<(usize, Vector)> = Vec::with_capacity(2);
        match algorithm {
            LvqAlgorithm::Lvq1 => {
                updates.push((winner1, self.corrected_weights(winner1, input, etha, right1)?));
            }

            LvqAlgorithm::Lvq21 => {
                updates.push((winner1, self.corrected_weights(winner1, input, etha, right1)?));
                if right1 != right2 && self.window_test(input, winner1, winner2)? {
                    let w2 = winner2.unwrap();
                    updates.push((w2, self.corrected_weights(w2, input, etha, right2)?));
                }
            }

            LvqAlgorithm::Lvq3 => {
                let w2 = winner2.unwrap();
                if right1 && right2 {
                    // Both correct: both pulled toward the input at the
                    // reduced rate
                    let rate = etha * self.config.epsilon;
                    updates.push((winner1, self.corrected_weights(winner1, input, rate, true)?));
                    updates.push((w2, self.corrected_weights(w2, input, rate, true)?));
                } else {
                    updates.push((winner1, self.corrected_weights(winner1, input, etha, right1)?));
                    if right1 != right2 && self.window_test(input, winner1, winner2)? {
                        updates.push((w2, self.corrected_weights(w2, input, etha, right2)?));
                    }
                }
            }

            LvqAlgorithm::Olvq1 => {
                return Err(LvqError::UnknownAlgorithm {
                    details: "OLVQ-1 per-unit adaptive rates are unspecified".into(),
                });
            }
        }

        for (unit_index, weights) in updates {
            self.network_mut()?.set_weight_vector(unit_index, &weights)?;
        }
        Ok(())
    }

    /// Trains the network on one element at the given learning rate
    pub fn train_element(
        &mut self,
        element: &Element,
        desired_class: usize,
        etha: f64,
    ) -> Result<TrainOutcome> {
        let propagation = self.propagate_element(element)?;

        let winner1_class = self.class_of_unit(propagation.winner1);
        let right1 = winner1_class == desired_class;
        let right2 = propagation
            .winner2
            .map(|w| self.class_of_unit(w) == desired_class)
            .unwrap_or(false);

        self.adapt(
            propagation.winner1,
            propagation.winner2,
            &element.input,
            etha,
            right1,
            right2,
        )?;

        Ok(TrainOutcome {
            winner_class: winner1_class,
            matched: right1,
            mse: propagation.mse,
        })
    }

    /// One training pass over the whole set, in insertion order
    ///
    /// The epoch counter is reset to `first_epoch` when `reset_time` is
    /// set; a sweep beyond `max_epochs` is refused. The learning rate is
    /// evaluated once per sweep at the current epoch.
    #[allow(clippy::too_many_arguments)]
    pub fn train_set(
        &mut self,
        training_set: &TrainingSet,
        first_epoch: u64,
        max_epochs: u64,
        reset_time: bool,
        progress: Option<ProgressBar>,
        mut classification_map: Option<&mut TransitionMap>,
    ) -> Result<SweepReport> {
        if training_set.is_empty() {
            return Err(LvqError::domain("train_set", "empty training set"));
        }
        if reset_time {
            self.epoch = first_epoch;
        }
        if self.epoch >= max_epochs {
            return Err(LvqError::Exhausted {
                details: format!("maximum epochs ({max_epochs}) reached"),
            });
        }

        let etha = self.config.lrate.value(self.epoch as f64);
        trace!(epoch = self.epoch, etha, "training sweep");

        if let Some(map) = classification_map.as_deref_mut() {
            map.reset();
        }
        if let Some(bar) = progress {
            bar.render(first_epoch, max_epochs, self.epoch + 1);
        }

        let mut mistakes = 0usize;
        let mut mse_total = 0.0;
        for element in training_set.iter() {
            let desired_class = element.class();
            let outcome = self.train_element(element, desired_class, etha)?;

            if let Some(map) = classification_map.as_deref_mut() {
                map.transition(desired_class, outcome.winner_class)?;
            }
            if !outcome.matched {
                mistakes += 1;
            }
            mse_total += outcome.mse;
        }

        self.epoch += 1;
        Ok(SweepReport {
            error_rate: mistakes as f64 / training_set.len() as f64,
            mse: mse_total,
        })
    }

    /// Classification sweep without adaption
    ///
    /// Propagates every element, filling the classification map and
    /// reporting the error rate and accumulated MSE.
    pub fn propagate_set(
        &mut self,
        set: &TrainingSet,
        classification_map: &mut TransitionMap,
    ) -> Result<SweepReport> {
        if set.is_empty() {
            return Err(LvqError::domain("propagate_set", "empty training set"));
        }
        classification_map.reset();

        let mut mistakes = 0usize;
        let mut mse_total = 0.0;
        for element in set.iter() {
            let propagation = self.propagate_element(element)?;
            let winner_class = self.class_of_unit(propagation.winner1);
            let desired_class = element.class();

            classification_map.transition(desired_class, winner_class)?;
            if winner_class != desired_class {
                mistakes += 1;
            }
            mse_total += propagation.mse;
        }

        Ok(SweepReport {
            error_rate: mistakes as f64 / set.len() as f64,
            mse: mse_total,
        })
    }

    /// Writes a description of the learner and its network
    pub fn info(&self, include_units: bool, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Algorithm  : {}", self.config.algorithm)?;
        writeln!(out, "Metric     : {:?}", self.config.metric)?;
        writeln!(out, "Classes    : {}", self.config.output_classes)?;
        writeln!(out, "Units/class: {}", self.config.units_per_class)?;
        writeln!(out, "Epoch      : {}", self.epoch)?;
        if let Some(table) = &self.class_table {
            for class in 1..=table.len() {
                writeln!(
                    out,
                    "Class {class:>5}: {}",
                    table.name(class).unwrap_or("?")
                )?;
            }
        }
        if let Some(network) = &self.network {
            network.info(include_units, out)?;
        }
        Ok(())
    }
}
