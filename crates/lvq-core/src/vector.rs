//! Dense real vectors and metrics
//!
//! Fixed-dimension vectors with per-component and elementwise
//! operations, joint L2 normalization and the activation metrics used
//! by the competitive layer. The metrics and the normalization are
//! driven by the incremental-statistics accumulator, added one
//! component pair at a time.

use signal_core::IncStats;

use crate::error::{LvqError, Result};

/// Metrics available for unit activation and competition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorMetric {
    /// `sqrt(sum (v1_i - v2_i)^2)`; smaller is a better match
    Euclidean,
    /// `sum v1_i * v2_i`; larger is a better match
    InnerProduct,
}

/// A fixed-dimension dense real vector, 1-based in the public contract
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    components: Vec<f64>,
}

impl Vector {
    /// Creates a zeroed vector of the given dimension
    pub fn new(dimension: usize) -> Self {
        Vector {
            components: vec![0.0; dimension],
        }
    }

    /// Creates a vector from existing components
    pub fn from_slice(values: &[f64]) -> Self {
        Vector {
            components: values.to_vec(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    fn check_component(&self, component: usize) -> Result<usize> {
        if component == 0 || component > self.components.len() {
            return Err(LvqError::domain(
                "vector",
                format!(
                    "component {} out of range 1..={}",
                    component,
                    self.components.len()
                ),
            ));
        }
        Ok(component - 1)
    }

    fn check_same_dimension(&self, other: &Vector) -> Result<()> {
        if self.dimension() != other.dimension() {
            return Err(LvqError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(())
    }

    /// Value of a 1-based component
    pub fn get(&self, component: usize) -> Result<f64> {
        let i = self.check_component(component)?;
        Ok(self.components[i])
    }

    /// Sets a 1-based component
    pub fn set(&mut self, component: usize, value: f64) -> Result<()> {
        let i = self.check_component(component)?;
        self.components[i] = value;
        Ok(())
    }

    /// Adds a value to one component
    pub fn sum_value(&mut self, component: usize, value: f64) -> Result<()> {
        let i = self.check_component(component)?;
        self.components[i] += value;
        Ok(())
    }

    /// Subtracts a value from one component
    pub fn subt_value(&mut self, component: usize, value: f64) -> Result<()> {
        let i = self.check_component(component)?;
        self.components[i] -= value;
        Ok(())
    }

    /// Multiplies one component by a value
    pub fn mult_value(&mut self, component: usize, value: f64) -> Result<()> {
        let i = self.check_component(component)?;
        self.components[i] *= value;
        Ok(())
    }

    /// Divides one component by a value
    pub fn div_value(&mut self, component: usize, value: f64) -> Result<()> {
        if value.abs() < f64::EPSILON {
            return Err(LvqError::domain("vector_div_value", "division by zero"));
        }
        let i = self.check_component(component)?;
        self.components[i] /= value;
        Ok(())
    }

    /// Copies the components of another vector of the same dimension
    pub fn copy_from(&mut self, source: &Vector) -> Result<()> {
        self.check_same_dimension(source)?;
        self.components.copy_from_slice(&source.components);
        Ok(())
    }

    /// Elementwise sum into a new vector
    pub fn sum(&self, other: &Vector) -> Result<Vector> {
        self.check_same_dimension(other)?;
        Ok(Vector {
            components: self
                .components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    /// Elementwise difference into a new vector
    pub fn subtract(&self, other: &Vector) -> Result<Vector> {
        self.check_same_dimension(other)?;
        Ok(Vector {
            components: self
                .components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    /// Elementwise product into a new vector
    pub fn multiply(&self, other: &Vector) -> Result<Vector> {
        self.check_same_dimension(other)?;
        Ok(Vector {
            components: self
                .components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a * b)
                .collect(),
        })
    }

    /// Elementwise division into a new vector
    pub fn divide(&self, other: &Vector) -> Result<Vector> {
        self.check_same_dimension(other)?;
        if other.components.iter().any(|b| b.abs() < f64::EPSILON) {
            return Err(LvqError::domain("vector_divide", "division by zero"));
        }
        Ok(Vector {
            components: self
                .components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a / b)
                .collect(),
        })
    }

    /// Scalar multiple into a new vector
    pub fn scalar_multiply(&self, k: f64) -> Vector {
        Vector {
            components: self.components.iter().map(|a| a * k).collect(),
        }
    }

    /// Component-wise square root into a new vector
    pub fn sqrt(&self) -> Result<Vector> {
        if self.components.iter().any(|a| *a < 0.0) {
            return Err(LvqError::domain(
                "vector_sqrt",
                "negative component has no real square root",
            ));
        }
        Ok(Vector {
            components: self.components.iter().map(|a| a.sqrt()).collect(),
        })
    }
}

/// Normalizes up to two vectors to unit L2 norm in one statistics pass
///
/// The norms are accumulated jointly (vector 1 on the x axis, vector 2
/// on the y axis); a vanishing norm leaves its vector untouched.
/// Dimension-one vectors normalize to the unit component.
pub fn normalize_pair(vector1: Option<&mut Vector>, vector2: Option<&mut Vector>) -> Result<()> {
    if vector1.is_none() && vector2.is_none() {
        return Err(LvqError::domain("vector_normalize", "no vector to normalize"));
    }

    let dim1 = vector1.as_ref().map_or(0, |v| v.dimension());
    let dim2 = vector2.as_ref().map_or(0, |v| v.dimension());
    let dim = dim1.max(dim2);
    if dim < 1 {
        return Ok(());
    }
    if dim == 1 {
        if let Some(v) = vector1 {
            v.set(1, 1.0)?;
        }
        if let Some(v) = vector2 {
            v.set(1, 1.0)?;
        }
        return Ok(());
    }

    let mut stats = IncStats::new();
    for component in 1..=dim {
        let x = match &vector1 {
            Some(v) if v.dimension() >= component => v.get(component)?,
            _ => 0.0,
        };
        let y = match &vector2 {
            Some(v) if v.dimension() >= component => v.get(component)?,
            _ => 0.0,
        };
        stats.add(x, y);
    }
    let norm1 = stats.sum_sqr_x().sqrt();
    let norm2 = stats.sum_sqr_y().sqrt();

    if let Some(v) = vector1 {
        if norm1 > f64::EPSILON {
            for component in 1..=v.dimension() {
                v.div_value(component, norm1)?;
            }
        }
    }
    if let Some(v) = vector2 {
        if norm2 > f64::EPSILON {
            for component in 1..=v.dimension() {
                v.div_value(component, norm2)?;
            }
        }
    }
    Ok(())
}

/// Normalizes one vector to unit L2 norm
pub fn normalize(vector: &mut Vector) -> Result<()> {
    normalize_pair(Some(vector), None)
}

/// Computes a metric between two vectors
///
/// An optional ponderation vector scales both inputs component by
/// component before accumulation. Dimension mismatches fail.
pub fn vector_metric(
    v1: &Vector,
    v2: &Vector,
    ponderation: Option<&Vector>,
    metric: VectorMetric,
) -> Result<f64> {
    if v1.dimension() != v2.dimension() {
        return Err(LvqError::DimensionMismatch {
            expected: v1.dimension(),
            actual: v2.dimension(),
        });
    }
    if let Some(pond) = ponderation {
        if pond.dimension() != v1.dimension() {
            return Err(LvqError::DimensionMismatch {
                expected: v1.dimension(),
                actual: pond.dimension(),
            });
        }
    }

    let mut stats = IncStats::new();
    for component in 1..=v1.dimension() {
        let a = v1.get(component)?;
        let b = v2.get(component)?;
        match ponderation {
            Some(pond) => {
                let p = pond.get(component)?;
                stats.add(p * a, p * b);
            }
            None => stats.add(a, b),
        }
    }

    Ok(match metric {
        VectorMetric::Euclidean => stats.sum_sqr_diff_xy().sqrt(),
        VectorMetric::InnerProduct => stats.sum_xy(),
    })
}

/// Euclidean distance between two vectors
pub fn euclidean_distance(v1: &Vector, v2: &Vector) -> Result<f64> {
    vector_metric(v1, v2, None, VectorMetric::Euclidean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_access() {
        let mut v = Vector::new(3);
        v.set(1, 1.5).unwrap();
        v.sum_value(1, 0.5).unwrap();
        v.mult_value(1, 2.0).unwrap();
        assert_eq!(v.get(1).unwrap(), 4.0);

        assert!(v.get(0).is_err());
        assert!(v.get(4).is_err());
        assert!(v.div_value(1, 0.0).is_err());
    }

    #[test]
    fn test_elementwise_operations() {
        let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0, 5.0, 6.0]);

        assert_eq!(a.sum(&b).unwrap().as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(b.subtract(&a).unwrap().as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!(a.multiply(&b).unwrap().as_slice(), &[4.0, 10.0, 18.0]);
        assert_eq!(b.divide(&a).unwrap().as_slice(), &[4.0, 2.5, 2.0]);
        assert_eq!(a.scalar_multiply(-2.0).as_slice(), &[-2.0, -4.0, -6.0]);

        let short = Vector::new(2);
        assert!(a.sum(&short).is_err());
    }

    #[test]
    fn test_sqrt_rejects_negative() {
        let v = Vector::from_slice(&[4.0, 9.0]);
        assert_eq!(v.sqrt().unwrap().as_slice(), &[2.0, 3.0]);
        assert!(Vector::from_slice(&[-1.0]).sqrt().is_err());
    }

    #[test]
    fn test_normalize() {
        let mut v = Vector::from_slice(&[3.0, 4.0]);
        normalize(&mut v).unwrap();
        assert!((v.get(1).unwrap() - 0.6).abs() < 1e-12);
        assert!((v.get(2).unwrap() - 0.8).abs() < 1e-12);

        // A zero vector is left untouched
        let mut z = Vector::new(3);
        normalize(&mut z).unwrap();
        assert_eq!(z.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_pair_is_joint() {
        let mut a = Vector::from_slice(&[1.0, 1.0]);
        let mut b = Vector::from_slice(&[0.0, 5.0]);
        normalize_pair(Some(&mut a), Some(&mut b)).unwrap();
        let inv_sqrt2 = 1.0 / 2.0f64.sqrt();
        assert!((a.get(1).unwrap() - inv_sqrt2).abs() < 1e-12);
        assert!((b.get(2).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_metric() {
        let a = Vector::from_slice(&[0.0, 0.0]);
        let b = Vector::from_slice(&[3.0, 4.0]);
        let d = vector_metric(&a, &b, None, VectorMetric::Euclidean).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_inner_product_metric() {
        let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
        let p = vector_metric(&a, &b, None, VectorMetric::InnerProduct).unwrap();
        assert!((p - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_ponderated_metric() {
        let a = Vector::from_slice(&[1.0, 1.0]);
        let b = Vector::from_slice(&[2.0, 3.0]);
        let w = Vector::from_slice(&[2.0, 0.0]);
        // Ponderation scales both inputs: diff = (2*1 - 2*2, 0 - 0)
        let d = vector_metric(&a, &b, Some(&w), VectorMetric::Euclidean).unwrap();
        assert!((d - 2.0).abs() < 1e-12);

        let bad = Vector::new(3);
        assert!(vector_metric(&a, &b, Some(&bad), VectorMetric::Euclidean).is_err());
    }
}
