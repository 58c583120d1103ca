//! Sample lists
//!
//! A [`SampleList`] is a homogeneous ordered sequence of real or complex
//! values with a time scale and cached statistics. The storage kind is
//! fixed at construction; switching kind requires an explicit conversion
//! that reshapes the storage. Positions are 1-based in the public
//! contract, matching the rest of the pipeline.

use crate::complex::{Complex, CpxFunction, CpxMode, Real};
use crate::error::{Result, SignalError};
use crate::stats::IncStats;

/// Storage kind of a sample list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Dense real buffer
    Real,
    /// Dense complex buffer
    Complex,
}

/// Cached list statistics, one complex pair per quantity
///
/// For real lists the imaginary component of every pair is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListStats {
    pub sum: Complex,
    pub avg: Complex,
    pub var: Complex,
    pub std: Complex,
    pub max: Complex,
    pub min: Complex,
}

/// Variant storage for the two sample kinds
#[derive(Debug, Clone)]
enum Samples {
    Real(Vec<Real>),
    Complex(Vec<Complex>),
}

/// An ordered sequence of samples with a time scale
///
/// The time scale is `(t0, dt, n0)`: the time of the first sample, the
/// interval between consecutive samples and the normalized-time origin.
/// Statistics are cached after [`SampleList::calculate_statistics`] and
/// invalidated by any mutation of the sample data.
#[derive(Debug, Clone)]
pub struct SampleList {
    samples: Samples,
    ini_time: Real,
    inc_time: Real,
    ini_norm_time: u64,
    stats: Option<ListStats>,
}

impl SampleList {
    /// Creates an empty list of the given kind and time scale
    pub fn new(kind: SampleKind, ini_time: Real, inc_time: Real, ini_norm_time: u64) -> Self {
        let samples = match kind {
            SampleKind::Real => Samples::Real(Vec::new()),
            SampleKind::Complex => Samples::Complex(Vec::new()),
        };
        SampleList {
            samples,
            ini_time,
            inc_time,
            ini_norm_time,
            stats: None,
        }
    }

    /// Storage kind of this list
    pub fn kind(&self) -> SampleKind {
        match self.samples {
            Samples::Real(_) => SampleKind::Real,
            Samples::Complex(_) => SampleKind::Complex,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        match &self.samples {
            Samples::Real(v) => v.len(),
            Samples::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time of the first sample
    pub fn ini_time(&self) -> Real {
        self.ini_time
    }

    /// Interval between consecutive samples
    pub fn inc_time(&self) -> Real {
        self.inc_time
    }

    /// Normalized-time origin
    pub fn ini_norm_time(&self) -> u64 {
        self.ini_norm_time
    }

    pub fn set_time_scale(&mut self, ini_time: Real, inc_time: Real, ini_norm_time: u64) {
        self.ini_time = ini_time;
        self.inc_time = inc_time;
        self.ini_norm_time = ini_norm_time;
    }

    /// Resizes the list to `n` samples
    ///
    /// Growth zero-fills the tail; `n = 0` releases the storage.
    /// Any resize invalidates the cached statistics.
    pub fn resize(&mut self, n: usize) {
        match &mut self.samples {
            Samples::Real(v) => {
                v.resize(n, 0.0);
                if n == 0 {
                    v.shrink_to_fit();
                }
            }
            Samples::Complex(v) => {
                v.resize(n, Complex::new(0.0, 0.0));
                if n == 0 {
                    v.shrink_to_fit();
                }
            }
        }
        self.stats = None;
    }

    fn check_pos(&self, pos: usize) -> Result<usize> {
        if pos == 0 || pos > self.len() {
            return Err(SignalError::domain(
                "sample_list",
                format!("position {} out of range 1..={}", pos, self.len()),
            ));
        }
        Ok(pos - 1)
    }

    /// Value at the 1-based position
    ///
    /// Real lists are returned as complex values with zero imaginary
    /// component.
    pub fn get(&self, pos: usize) -> Result<Complex> {
        let i = self.check_pos(pos)?;
        Ok(match &self.samples {
            Samples::Real(v) => Complex::new(v[i], 0.0),
            Samples::Complex(v) => v[i],
        })
    }

    /// Stores a value at the 1-based position
    ///
    /// Real lists keep only the real component.
    pub fn set(&mut self, pos: usize, value: Complex) -> Result<()> {
        let i = self.check_pos(pos)?;
        match &mut self.samples {
            Samples::Real(v) => v[i] = value.re,
            Samples::Complex(v) => v[i] = value,
        }
        self.stats = None;
        Ok(())
    }

    /// Appends a value at the end of the list
    pub fn push(&mut self, value: Complex) {
        match &mut self.samples {
            Samples::Real(v) => v.push(value.re),
            Samples::Complex(v) => v.push(value),
        }
        self.stats = None;
    }

    /// Cached statistics, if currently valid
    pub fn stats(&self) -> Option<&ListStats> {
        self.stats.as_ref()
    }

    /// Recomputes and caches the list statistics
    pub fn calculate_statistics(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(SignalError::domain(
                "calculate_statistics",
                "empty sample list",
            ));
        }
        let mut acc = IncStats::new();
        for pos in 1..=self.len() {
            let z = self.get(pos)?;
            acc.add(z.re, z.im);
        }
        self.stats = Some(ListStats {
            sum: Complex::new(acc.sum_x(), acc.sum_y()),
            avg: Complex::new(acc.average_x(), acc.average_y()),
            var: Complex::new(acc.variance_x(), acc.variance_y()),
            std: Complex::new(acc.stddev_x(), acc.stddev_y()),
            max: Complex::new(acc.max_x(), acc.max_y()),
            min: Complex::new(acc.min_x(), acc.min_y()),
        });
        Ok(())
    }

    /// Converts a complex list into a real list, dropping imaginary parts
    ///
    /// A real list is returned unchanged.
    pub fn convert_to_real(&mut self) {
        if let Samples::Complex(v) = &self.samples {
            let reals = v.iter().map(|z| z.re).collect();
            self.samples = Samples::Real(reals);
            self.stats = None;
        }
    }

    /// Converts a real list into a complex list with zero imaginary parts
    pub fn convert_to_complex(&mut self) {
        if let Samples::Real(v) = &self.samples {
            let cpx = v.iter().map(|&r| Complex::new(r, 0.0)).collect();
            self.samples = Samples::Complex(cpx);
            self.stats = None;
        }
    }

    /// Applies a catalogue function to every element in place
    ///
    /// The operation and parameters are fixed at entry. All results are
    /// computed before any element is written back, so a failing element
    /// leaves the list untouched.
    pub fn apply_function(
        &mut self,
        function: CpxFunction,
        mode: CpxMode,
        params: &[Real],
    ) -> Result<()> {
        let mut results = Vec::with_capacity(self.len());
        for pos in 1..=self.len() {
            let z = self.get(pos)?;
            results.push(function.apply(mode, &[z], params)?);
        }
        for (i, z) in results.into_iter().enumerate() {
            self.set(i + 1, z)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based_access() {
        let mut list = SampleList::new(SampleKind::Real, 0.0, 0.5, 0);
        list.resize(3);
        list.set(1, Complex::new(1.0, 0.0)).unwrap();
        list.set(3, Complex::new(3.0, 0.0)).unwrap();

        assert_eq!(list.get(1).unwrap().re, 1.0);
        assert_eq!(list.get(2).unwrap().re, 0.0);
        assert_eq!(list.get(3).unwrap().re, 3.0);

        assert!(list.get(0).is_err());
        assert!(list.get(4).is_err());
        assert!(list.set(4, Complex::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_real_list_drops_imaginary() {
        let mut list = SampleList::new(SampleKind::Real, 0.0, 1.0, 0);
        list.push(Complex::new(2.0, 9.0));
        assert_eq!(list.get(1).unwrap(), Complex::new(2.0, 0.0));
    }

    #[test]
    fn test_resize_zero_frees() {
        let mut list = SampleList::new(SampleKind::Complex, 0.0, 1.0, 0);
        list.resize(8);
        assert_eq!(list.len(), 8);
        list.resize(0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_statistics_cache_invalidation() {
        let mut list = SampleList::new(SampleKind::Real, 0.0, 1.0, 0);
        for v in [1.0, 2.0, 3.0, 4.0] {
            list.push(Complex::new(v, 0.0));
        }
        list.calculate_statistics().unwrap();
        let stats = list.stats().unwrap();
        assert!((stats.sum.re - 10.0).abs() < 1e-12);
        assert!((stats.avg.re - 2.5).abs() < 1e-12);
        assert_eq!(stats.max.re, 4.0);
        assert_eq!(stats.min.re, 1.0);

        // Any mutation drops the cache
        list.set(1, Complex::new(5.0, 0.0)).unwrap();
        assert!(list.stats().is_none());
    }

    #[test]
    fn test_conversion_reshapes_storage() {
        let mut list = SampleList::new(SampleKind::Complex, 0.0, 1.0, 0);
        list.push(Complex::new(1.0, 2.0));
        list.convert_to_real();
        assert_eq!(list.kind(), SampleKind::Real);
        assert_eq!(list.get(1).unwrap(), Complex::new(1.0, 0.0));

        list.convert_to_complex();
        assert_eq!(list.kind(), SampleKind::Complex);
        assert_eq!(list.get(1).unwrap(), Complex::new(1.0, 0.0));
    }

    #[test]
    fn test_apply_function_all_or_nothing() {
        let mut list = SampleList::new(SampleKind::Complex, 0.0, 1.0, 0);
        list.push(Complex::new(4.0, 0.0));
        list.push(Complex::new(-4.0, 0.0));

        // RealLog fails on the negative element; the first element must
        // stay untouched
        let err = list.apply_function(CpxFunction::RealLog, CpxMode::Real, &[2.0]);
        assert!(err.is_err());
        assert_eq!(list.get(1).unwrap().re, 4.0);

        list.apply_function(CpxFunction::SqrModulus, CpxMode::Complex, &[])
            .unwrap();
        assert_eq!(list.get(1).unwrap().re, 16.0);
        assert_eq!(list.get(2).unwrap().re, 16.0);
    }
}
