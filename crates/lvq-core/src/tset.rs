//! Training sets and class tables
//!
//! Labelled feature vectors in insertion order, with the per-component
//! input statistics the weight initialization needs, and a table naming
//! the output classes.

use tracing::debug;

use crate::error::{LvqError, Result};
use crate::vector::Vector;

/// One labelled training element
#[derive(Debug, Clone)]
pub struct Element {
    /// Input feature vector
    pub input: Vector,
    /// Scalar desired output; the integer part is the 1-based class
    pub output: f64,
}

impl Element {
    /// The 1-based desired class of this element
    pub fn class(&self) -> usize {
        self.output as usize
    }
}

/// Per-component statistics of a set's input vectors
#[derive(Debug, Clone)]
pub struct SetStatistics {
    /// Component-wise mean of the inputs
    pub average: Vector,
    /// Component-wise inverse standard deviation
    ///
    /// Components with vanishing deviation map to one, leaving them
    /// unscaled by the z-scoring.
    pub invstddev: Vector,
}

/// An ordered set of labelled feature vectors
#[derive(Debug, Clone)]
pub struct TrainingSet {
    dimension: usize,
    elements: Vec<Element>,
}

impl TrainingSet {
    /// Creates an empty set for vectors of the given dimension
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(LvqError::domain(
                "training_set",
                "element dimension must be at least one",
            ));
        }
        Ok(TrainingSet {
            dimension,
            elements: Vec::new(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends an element, preserving insertion order
    pub fn add_element(&mut self, input: Vector, output: f64) -> Result<()> {
        if input.dimension() != self.dimension {
            return Err(LvqError::DimensionMismatch {
                expected: self.dimension,
                actual: input.dimension(),
            });
        }
        if output < 1.0 {
            return Err(LvqError::domain(
                "training_set",
                format!("desired output {output} does not name a 1-based class"),
            ));
        }
        self.elements.push(Element { input, output });
        Ok(())
    }

    /// Elements in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Element by 0-based insertion position
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Computes the per-component input statistics of the set
    pub fn input_statistics(&self) -> Result<SetStatistics> {
        if self.is_empty() {
            return Err(LvqError::domain("input_statistics", "empty training set"));
        }
        let n = self.len() as f64;
        let mut average = Vector::new(self.dimension);
        let mut invstddev = Vector::new(self.dimension);

        for component in 1..=self.dimension {
            let mut sum = 0.0;
            let mut sum_sqr = 0.0;
            for element in &self.elements {
                let v = element.input.get(component)?;
                sum += v;
                sum_sqr += v * v;
            }
            let mean = sum / n;
            let variance = (sum_sqr / n - mean * mean).max(0.0);
            let stddev = variance.sqrt();
            average.set(component, mean)?;
            invstddev.set(component, if stddev > f64::EPSILON { 1.0 / stddev } else { 1.0 })?;
        }

        debug!(
            elements = self.len(),
            dimension = self.dimension,
            "computed training-set input statistics"
        );
        Ok(SetStatistics { average, invstddev })
    }
}

/// Names of the output classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    names: Vec<String>,
}

impl ClassTable {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(LvqError::domain("class_table", "empty class table"));
        }
        Ok(ClassTable { names })
    }

    /// Number of classes named
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of a 1-based class
    pub fn name(&self, class: usize) -> Result<&str> {
        self.names
            .get(class.wrapping_sub(1))
            .map(String::as_str)
            .ok_or_else(|| {
                LvqError::domain(
                    "class_table",
                    format!("class {class} outside 1..={}", self.names.len()),
                )
            })
    }
}
