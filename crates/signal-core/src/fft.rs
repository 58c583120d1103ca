//! Radix-2 FFT and fast cosine transform
//!
//! An iterative in-place Cooley-Tukey decimation-in-time FFT over the
//! sample lists of an index, plus a DCT-II implemented through the even
//! symmetric extension of the input and a real-valued post scaling.
//!
//! The bit-reversal and twiddle-factor lookup tables are owned by an
//! [`FftContext`] created by the caller and released when the context is
//! dropped. The twiddle table is built once for the largest observed
//! size and reused for smaller transforms by transposed indexing.

use std::f64::consts::PI;

use tracing::debug;

use crate::complex::{Complex, Real};
use crate::error::{Result, SignalError};
use crate::samples::{SampleIndex, SampleKind};

/// Transform selection for the index walkers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftTransform {
    /// Fast discrete Fourier transform
    Fft,
    /// Fast discrete cosine transform
    Fct,
}

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDirection {
    Direct,
    Inverse,
}

/// Input domain of the transform
///
/// A real-domain transform keeps only the first half of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDomain {
    Real,
    Complex,
}

/// Smallest power of `basis` that is greater than or equal to `x`
///
/// Returns `(power, exponent)`.
pub fn sup_power(basis: usize, x: usize) -> Result<(usize, usize)> {
    if basis < 2 {
        return Err(SignalError::domain(
            "sup_power",
            format!("{basis} is an invalid basis"),
        ));
    }
    if x < 1 {
        return Err(SignalError::domain(
            "sup_power",
            format!("{x} is an invalid sample count"),
        ));
    }
    let mut power = 1usize;
    let mut exponent = 0usize;
    while power < x {
        power = power.checked_mul(basis).ok_or_else(|| SignalError::Exhausted {
            details: format!("power of {basis} overflows above {x}"),
        })?;
        exponent += 1;
    }
    Ok((power, exponent))
}

/// Lookup tables shared by the transforms of one pipeline run
#[derive(Debug, Default)]
pub struct FftContext {
    /// Exponent the bit-reversal table was built for
    rev_exponent: usize,
    rev_table: Vec<usize>,
    /// Size the twiddle table was built for (largest observed)
    twiddle_n: usize,
    twiddles: Vec<Complex>,
}

impl FftContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `exponent`-bit-reversed value of `index`
    ///
    /// The table is built by incrementing an `exponent`-bit counter in
    /// reverse carry order and is rebuilt when the exponent changes.
    pub fn bit_reversed(&mut self, index: usize, exponent: usize) -> Result<usize> {
        let points = 1usize << exponent;
        if index >= points {
            return Err(SignalError::domain(
                "bit_reversed",
                format!("index {index} cannot be {exponent}-bit reversed"),
            ));
        }
        if exponent != self.rev_exponent || self.rev_table.is_empty() {
            debug!(exponent, "building bit-reversal table");
            let mut table = vec![0usize; points];
            let mut rev = 0usize;
            for slot in table.iter_mut().skip(1) {
                // Reverse-carry increment of the previous value
                let mut mask = points >> 1;
                while rev & mask != 0 {
                    rev &= !mask;
                    mask >>= 1;
                }
                rev |= mask;
                *slot = rev;
            }
            self.rev_table = table;
            self.rev_exponent = exponent;
        }
        Ok(self.rev_table[index])
    }

    /// Twiddle factor `W(k, n) = cos(2 pi k / n) - j sin(2 pi k / n)`
    ///
    /// The table grows to the largest observed `n`; smaller sizes reuse
    /// it through the transposed index `k * (n_internal / n)`.
    pub fn twiddle(&mut self, k: usize, n: usize) -> Result<Complex> {
        if n < 1 {
            return Err(SignalError::domain(
                "twiddle",
                format!("{n} is not a valid transform size"),
            ));
        }
        if n > self.twiddle_n {
            debug!(n, "building twiddle-factor table");
            let mut table = Vec::with_capacity(n);
            for i in 0..n {
                let angle = 2.0 * PI * i as Real / n as Real;
                table.push(Complex::new(angle.cos(), -angle.sin()));
            }
            self.twiddles = table;
            self.twiddle_n = n;
        }
        if self.twiddle_n % n != 0 {
            return Err(SignalError::domain(
                "twiddle",
                format!("size {n} does not divide the internal table size {}", self.twiddle_n),
            ));
        }
        let transposed = (k * (self.twiddle_n / n)) % self.twiddle_n;
        Ok(self.twiddles[transposed])
    }
}

/// Runs the radix-2 butterflies over a bit-reversed buffer
fn butterflies(
    ctx: &mut FftContext,
    buf: &mut [Complex],
    exponent: usize,
    direction: FftDirection,
) -> Result<()> {
    let mut points = 2usize;
    for _pass in 0..exponent {
        let bflies = points / 2;
        let mut top_block_start = 0usize;
        while top_block_start < buf.len() {
            let bot_block_start = top_block_start + bflies;
            for cur_bfly in 0..bflies {
                let mut w = ctx.twiddle(cur_bfly, points)?;
                if direction == FftDirection::Inverse {
                    w = Complex::new(w.re, -w.im);
                }
                let top = buf[top_block_start + cur_bfly];
                let bot = buf[bot_block_start + cur_bfly] * w;
                buf[top_block_start + cur_bfly] = top + bot;
                buf[bot_block_start + cur_bfly] = top - bot;
            }
            top_block_start += points;
        }
        points *= 2;
    }
    Ok(())
}

/// Full transform of a value slice: zero-pad, bit-reverse, butterflies,
/// domain truncation and inverse rescale
fn transform_values(
    ctx: &mut FftContext,
    values: &[Complex],
    direction: FftDirection,
    domain: FftDomain,
) -> Result<Vec<Complex>> {
    let (n, exponent) = sup_power(2, values.len().max(1))?;

    let mut buf = vec![Complex::new(0.0, 0.0); n];
    for (i, slot) in buf.iter_mut().enumerate() {
        let rev = ctx.bit_reversed(i, exponent)?;
        if rev < values.len() {
            *slot = values[rev];
        }
    }

    butterflies(ctx, &mut buf, exponent, direction)?;

    if domain == FftDomain::Real {
        buf.truncate(n / 2);
    }
    if direction == FftDirection::Inverse {
        let scale = 1.0 / n as Real;
        for z in buf.iter_mut() {
            *z = Complex::new(z.re * scale, z.im * scale);
        }
    }
    Ok(buf)
}

fn name_extensions(direction: FftDirection) -> (&'static str, &'static str) {
    match direction {
        FftDirection::Direct => (", DFT", ".dft"),
        FftDirection::Inverse => (", IDFT", ".idft"),
    }
}

/// Frequency increment of the transformed list
fn frequency_increment(inc_time: Real, n: usize) -> Real {
    if inc_time > f64::EPSILON {
        1.0 / (inc_time * n as Real)
    } else {
        0.0
    }
}

/// Gathers the values of the current list of an index
fn gather_current(index: &SampleIndex) -> Result<Vec<Complex>> {
    let list = &index.current_entry()?.list;
    let mut values = Vec::with_capacity(list.len());
    for pos in 1..=list.len() {
        values.push(list.get(pos)?);
    }
    Ok(values)
}

/// In-place FFT of the current list of the index
///
/// The transform replaces the list contents; the entry name and file
/// receive the transform suffix and the time scale becomes the frequency
/// scale. In-place computation of a real-kind list is rejected, since it
/// has no storage for the imaginary components.
pub fn fft_exec(
    ctx: &mut FftContext,
    index: &mut SampleIndex,
    direction: FftDirection,
    domain: FftDomain,
) -> Result<()> {
    if index.current_entry()?.list.kind() == SampleKind::Real {
        return Err(SignalError::domain(
            "fft_exec",
            "in-place calculation of a real valued list requested",
        ));
    }
    let values = gather_current(index)?;
    let (n, _) = sup_power(2, values.len().max(1))?;
    let spectrum = transform_values(ctx, &values, direction, domain)?;

    let (name_ext, file_ext) = name_extensions(direction);
    let entry = index.current_entry_mut()?;
    entry.name.push_str(name_ext);
    entry.file.push_str(file_ext);

    let inc_freq = frequency_increment(entry.list.inc_time(), n);
    let ini_time = entry.list.ini_time();
    let norm = entry.list.ini_norm_time();
    entry.list.set_time_scale(ini_time, inc_freq, norm);

    entry.list.resize(spectrum.len());
    for (i, z) in spectrum.into_iter().enumerate() {
        entry.list.set(i + 1, z)?;
    }
    Ok(())
}

/// Off-place FFT of the current list of `index` into a new entry of
/// `out_index`, returning the new entry's position
pub fn fft_exec_into(
    ctx: &mut FftContext,
    index: &SampleIndex,
    out_index: &mut SampleIndex,
    direction: FftDirection,
    domain: FftDomain,
) -> Result<usize> {
    let values = gather_current(index)?;
    let (n, _) = sup_power(2, values.len().max(1))?;
    let spectrum = transform_values(ctx, &values, direction, domain)?;

    let source = index.current_entry()?;
    let (name_ext, file_ext) = name_extensions(direction);
    let inc_freq = frequency_increment(source.list.inc_time(), n);

    let pos = out_index.add_entry(
        format!("{}{}", source.name, name_ext),
        format!("{}{}", source.file, file_ext),
        None,
        SampleKind::Complex,
        source.list.ini_time(),
        inc_freq,
        source.list.ini_norm_time(),
        true,
    )?;

    let list = &mut out_index.current_entry_mut()?.list;
    list.resize(spectrum.len());
    for (i, z) in spectrum.into_iter().enumerate() {
        list.set(i + 1, z)?;
    }
    Ok(pos)
}

/// DCT-II coefficient `alpha_k / (2 cos((pi / n) * (k / 2)))`
///
/// `alpha_0 = sqrt(1/n)`, otherwise `sqrt(2/n)`; `k` is 0-based.
fn dct_coefficient(n: usize, k: usize) -> Result<Real> {
    if n == 0 {
        return Err(SignalError::domain(
            "dct_coefficient",
            "empty transform requested",
        ));
    }
    if k > n - 1 {
        return Err(SignalError::domain(
            "dct_coefficient",
            format!("invalid sample index {k} for size {n}"),
        ));
    }
    let alpha = if k == 0 {
        (1.0 / n as Real).sqrt()
    } else {
        (2.0 / n as Real).sqrt()
    };
    Ok(alpha / (2.0 * ((PI / n as Real) * (k as Real / 2.0)).cos()))
}

/// Even-symmetric DCT-II extension: `x[2N - k + 1] = x[k]`
fn dct_extend(values: &[Complex]) -> Vec<Complex> {
    let n = values.len();
    let mut extended = Vec::with_capacity(2 * n);
    extended.extend_from_slice(values);
    extended.extend(values.iter().rev().copied());
    extended
}

/// Forward DCT-II of a value slice through the real FFT
fn dct_values(ctx: &mut FftContext, values: &[Complex]) -> Result<Vec<Real>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let extended = dct_extend(values);
    let spectrum = transform_values(ctx, &extended, FftDirection::Direct, FftDomain::Real)?;
    let n = spectrum.len();
    let mut out = Vec::with_capacity(n);
    for (k, z) in spectrum.iter().enumerate() {
        out.push(z.re * dct_coefficient(n, k)?);
    }
    Ok(out)
}

/// Inverse of the orthonormal DCT-II (a DCT-III synthesis)
fn idct_values(values: &[Complex]) -> Vec<Real> {
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    for j in 0..n {
        let mut acc = 0.0;
        for (k, z) in values.iter().enumerate() {
            let alpha = if k == 0 {
                (1.0 / n as Real).sqrt()
            } else {
                (2.0 / n as Real).sqrt()
            };
            acc += alpha * z.re * ((PI / n as Real) * k as Real * (j as Real + 0.5)).cos();
        }
        out.push(acc);
    }
    out
}

/// In-place fast cosine transform of the current list of the index
///
/// The direct transform extends the list to its 2N-point even-symmetric
/// image, runs the forward real FFT and applies the DCT-II post scaling;
/// the result is a real-kind list. The inverse direction synthesizes the
/// original samples back from the coefficients.
pub fn fct_exec(
    ctx: &mut FftContext,
    index: &mut SampleIndex,
    direction: FftDirection,
) -> Result<()> {
    let values = gather_current(index)?;
    let coeffs = match direction {
        FftDirection::Direct => dct_values(ctx, &values)?,
        FftDirection::Inverse => idct_values(&values),
    };

    let entry = index.current_entry_mut()?;
    entry.list.convert_to_real();
    entry.list.resize(coeffs.len());
    for (i, c) in coeffs.into_iter().enumerate() {
        entry.list.set(i + 1, Complex::new(c, 0.0))?;
    }
    Ok(())
}

/// Off-place fast cosine transform into a new entry of `out_index`
pub fn fct_exec_into(
    ctx: &mut FftContext,
    index: &SampleIndex,
    out_index: &mut SampleIndex,
    direction: FftDirection,
) -> Result<usize> {
    let values = gather_current(index)?;
    let coeffs = match direction {
        FftDirection::Direct => dct_values(ctx, &values)?,
        FftDirection::Inverse => idct_values(&values),
    };

    let source = index.current_entry()?;
    let (name_ext, file_ext) = name_extensions(direction);
    let pos = out_index.add_entry(
        format!("{}{}", source.name, name_ext),
        format!("{}{}", source.file, file_ext),
        None,
        SampleKind::Real,
        source.list.ini_time(),
        source.list.inc_time(),
        source.list.ini_norm_time(),
        true,
    )?;

    let list = &mut out_index.current_entry_mut()?.list;
    list.resize(coeffs.len());
    for (i, c) in coeffs.into_iter().enumerate() {
        list.set(i + 1, Complex::new(c, 0.0))?;
    }
    Ok(pos)
}

/// Applies the selected transform to every list of the index in place
pub fn exec_index(
    ctx: &mut FftContext,
    index: &mut SampleIndex,
    transform: FftTransform,
    direction: FftDirection,
    domain: FftDomain,
) -> Result<()> {
    let ids: Vec<_> = index.iter_ids().collect();
    for id in ids {
        index.set_current(id)?;
        match transform {
            FftTransform::Fft => fft_exec(ctx, index, direction, domain)?,
            FftTransform::Fct => fct_exec(ctx, index, direction)?,
        }
    }
    Ok(())
}

/// Applies the selected transform to every list of the index, producing
/// a new index whose parent is the input index
pub fn exec_index_into(
    ctx: &mut FftContext,
    index: &mut SampleIndex,
    transform: FftTransform,
    direction: FftDirection,
    domain: FftDomain,
) -> Result<SampleIndex> {
    let mut out_index = SampleIndex::new(Some(index));
    let ids: Vec<_> = index.iter_ids().collect();
    for id in ids {
        index.set_current(id)?;
        match transform {
            FftTransform::Fft => {
                fft_exec_into(ctx, index, &mut out_index, direction, domain)?;
            }
            FftTransform::Fct => {
                fct_exec_into(ctx, index, &mut out_index, direction)?;
            }
        }
    }
    Ok(out_index)
}
