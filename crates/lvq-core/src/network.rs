//! Two-layer competitive network
//!
//! An input layer of pass-through units fully connected to an output
//! layer of linear units. The connection weights feeding one output
//! unit form its codebook (reference) vector; activation evaluates the
//! selected metric between the loaded input and each codebook vector.

use std::io::{self, Write};

use rand::Rng;
use tracing::debug;

use signal_core::stats::{gaussian, uniform_real};

use crate::error::{LvqError, Result};
use crate::vector::{vector_metric, Vector, VectorMetric};

/// Connection weight initializer classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightInit {
    /// Every weight set to the same value
    Constant { value: f64 },
    /// Uniform over `[low, high)`
    Uniform { low: f64, high: f64 },
    /// Gaussian with the given average and standard deviation
    Gaussian { average: f64, stddev: f64 },
}

/// One output-layer unit and its codebook vector
#[derive(Debug, Clone)]
pub struct Unit {
    index: usize,
    weights: Vector,
    output: f64,
}

impl Unit {
    /// 1-based index of the unit within the output layer
    pub fn index(&self) -> usize {
        self.index
    }

    /// Last computed activation
    pub fn output(&self) -> f64 {
        self.output
    }

    /// The unit's codebook vector
    pub fn weights(&self) -> &Vector {
        &self.weights
    }
}

/// Two-layer network: pass-through inputs, linear competitive outputs
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    input_outputs: Vector,
    units: Vec<Unit>,
}

impl Network {
    /// Creates a network with `input_dim` pass-through input units and
    /// `output_units` fully connected output units
    pub fn new<R: Rng + ?Sized>(
        name: impl Into<String>,
        input_dim: usize,
        output_units: usize,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        if input_dim == 0 {
            return Err(LvqError::domain(
                "network_create",
                "input layer needs at least one unit",
            ));
        }
        if output_units == 0 {
            return Err(LvqError::domain(
                "network_create",
                "output layer needs at least one unit",
            ));
        }

        let name = name.into();
        debug!(%name, input_dim, output_units, "creating two-layer network");

        let mut units = Vec::with_capacity(output_units);
        for index in 1..=output_units {
            let mut weights = Vector::new(input_dim);
            for component in 1..=input_dim {
                let value = match init {
                    WeightInit::Constant { value } => value,
                    WeightInit::Uniform { low, high } => {
                        uniform_real(rng, low, high).map_err(LvqError::Stats)?
                    }
                    WeightInit::Gaussian { average, stddev } => gaussian(rng, average, stddev),
                };
                weights.set(component, value)?;
            }
            units.push(Unit {
                index,
                weights,
                output: 0.0,
            });
        }

        Ok(Network {
            name,
            input_outputs: Vector::new(input_dim),
            units,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of input-layer units
    pub fn input_dim(&self) -> usize {
        self.input_outputs.dimension()
    }

    /// Number of output-layer units
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// Borrows a unit by its 1-based index
    pub fn unit(&self, index: usize) -> Result<&Unit> {
        self.units
            .get(index.wrapping_sub(1))
            .ok_or_else(|| LvqError::NotInitialized {
                details: format!("no output unit with index {index}"),
            })
    }

    /// The codebook vector of a unit
    pub fn weight_vector(&self, index: usize) -> Result<&Vector> {
        Ok(self.unit(index)?.weights())
    }

    /// Replaces the codebook vector of a unit
    pub fn set_weight_vector(&mut self, index: usize, weights: &Vector) -> Result<()> {
        if weights.dimension() != self.input_dim() {
            return Err(LvqError::DimensionMismatch {
                expected: self.input_dim(),
                actual: weights.dimension(),
            });
        }
        let unit = self
            .units
            .get_mut(index.wrapping_sub(1))
            .ok_or_else(|| LvqError::NotInitialized {
                details: format!("no output unit with index {index}"),
            })?;
        unit.weights.copy_from(weights)?;
        Ok(())
    }

    /// Loads an input vector into the pass-through layer
    pub fn load_input(&mut self, input: &Vector) -> Result<()> {
        if input.dimension() != self.input_dim() {
            return Err(LvqError::DimensionMismatch {
                expected: self.input_dim(),
                actual: input.dimension(),
            });
        }
        self.input_outputs.copy_from(input)
    }

    /// The outputs of the input layer (the loaded vector, pass-through)
    pub fn input_outputs(&self) -> &Vector {
        &self.input_outputs
    }

    /// Activates every output unit with the given metric against the
    /// loaded input
    pub fn activate(&mut self, metric: VectorMetric) -> Result<()> {
        for unit in self.units.iter_mut() {
            unit.output = vector_metric(&self.input_outputs, &unit.weights, None, metric)?;
        }
        Ok(())
    }

    /// Scans the output layer for the two best units under the metric's
    /// ordering
    ///
    /// Euclidean activation favours the smallest value, inner product
    /// the largest. The runner-up is `None` for a single-unit layer.
    pub fn two_winners(&self, metric: VectorMetric) -> Result<(usize, Option<usize>)> {
        if self.units.is_empty() {
            return Err(LvqError::NotInitialized {
                details: "output layer has no units".into(),
            });
        }
        let better = |a: f64, b: f64| match metric {
            VectorMetric::Euclidean => a < b,
            VectorMetric::InnerProduct => a > b,
        };

        let mut winner1 = 1usize;
        let mut winner2: Option<usize> = None;
        for unit in self.units.iter().skip(1) {
            if better(unit.output, self.units[winner1 - 1].output) {
                winner2 = Some(winner1);
                winner1 = unit.index;
            } else if winner2.is_none()
                || better(unit.output, self.units[winner2.unwrap() - 1].output)
            {
                winner2 = Some(unit.index);
            }
        }
        Ok((winner1, winner2))
    }

    /// Writes a summary of the network layers and optionally each unit
    pub fn info(&self, include_units: bool, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Network    : {}", self.name)?;
        writeln!(out, "Layers     : 2")?;
        writeln!(out, "Input units: {} (pass-through)", self.input_dim())?;
        writeln!(out, "Output units: {} (linear)", self.num_units())?;
        if include_units {
            for unit in &self.units {
                write!(out, "  unit {:>4}: output {:E}, weights [", unit.index, unit.output)?;
                for component in 1..=unit.weights.dimension() {
                    if component > 1 {
                        write!(out, ", ")?;
                    }
                    write!(out, "{:E}", unit.weights.get(component).unwrap_or(0.0))?;
                }
                writeln!(out, "]")?;
            }
        }
        Ok(())
    }
}
