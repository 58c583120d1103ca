//! Windowing functions and frame extraction
//!
//! Frames are cut from a source list with a configurable width and
//! overlap, multiplied by a windowing function evaluated around the
//! frame centre (`i' = i - W/2`), and appended as entries of a child
//! index. Frames whose samples are all below the zero-power threshold
//! can be purged on the fly.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::complex::{Complex, CpxMode, Real};
use crate::error::{Result, SignalError};
use crate::preemph::list_preemphasis;
use crate::samples::{SampleIndex, SampleKind};

/// The supported windowing functions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WindowFunction {
    /// Constant one
    Rectangular,
    /// Triangular ramp over the frame width
    Bartlett,
    /// Generic triangle `(low, 0) -> (center, peak) -> (high, 0)`
    Triangular {
        low: Real,
        center: Real,
        high: Real,
        central_value: Real,
    },
    /// Kaiser-Bessel window with shape parameter `b`
    Kaiser { b: Real },
    /// Raised cosine with `a = 0.54`
    Hamming,
    /// Raised cosine with `a = 0.50`
    Hanning,
    /// Three-term Blackman window
    Blackman,
}

/// Zero-order modified Bessel function of the first kind
///
/// Series truncated at the `x^10` term.
fn bessel_i0(x: Real) -> Real {
    1.0 + x.powi(2) / 4.0
        + x.powi(4) / 64.0
        + x.powi(6) / 2304.0
        + x.powi(8) / 147_456.0
        + x.powi(10) / 14_745_600.0
}

/// General form of the Hamming and Hanning windows:
/// `w[i] = a + (1 - a) * cos(2 pi i / N)`
fn raised_cosine(a: Real, i: i64, width: usize) -> Result<Real> {
    if a < f64::EPSILON || a > 1.0 - f64::EPSILON {
        return Err(SignalError::domain(
            "raised_cosine",
            format!("value for a ({a}) is out of range"),
        ));
    }
    if width < 1 {
        return Err(SignalError::domain(
            "raised_cosine",
            "window width must be positive",
        ));
    }
    Ok(a + (1.0 - a) * ((2.0 * PI * i as Real) / width as Real).cos())
}

/// Generic triangular ramp, shared with the mel filter bank
pub(crate) fn triangular_value(
    i: Real,
    central_i: Real,
    low_i: Real,
    high_i: Real,
    central_value: Real,
) -> Real {
    if i - low_i <= f64::EPSILON || high_i - i <= f64::EPSILON {
        0.0
    } else if central_i - i > f64::EPSILON {
        central_value * ((i - low_i) / (central_i - low_i))
    } else if i - central_i > f64::EPSILON {
        central_value * ((high_i - i) / (high_i - central_i))
    } else {
        central_value
    }
}

/// A windowing function with its precomputed state
///
/// For the Kaiser-Bessel window the denominator `I0(b)` is computed once
/// at construction and reused for every sample.
#[derive(Debug, Clone)]
pub struct WindowShape {
    function: WindowFunction,
    kaiser_i0_b: Real,
}

impl WindowShape {
    pub fn new(function: WindowFunction) -> Self {
        let kaiser_i0_b = match function {
            WindowFunction::Kaiser { b } => bessel_i0(b),
            _ => 0.0,
        };
        WindowShape {
            function,
            kaiser_i0_b,
        }
    }

    pub fn function(&self) -> WindowFunction {
        self.function
    }

    /// Window value at the centred position `i` for a frame of `width`
    pub fn value(&self, i: i64, width: usize) -> Result<Real> {
        match self.function {
            WindowFunction::Rectangular => Ok(1.0),

            WindowFunction::Bartlett => {
                let ramp = (2.0 / width as Real) * i as Real;
                Ok(if i <= 0 { 1.0 + ramp } else { 1.0 - ramp })
            }

            WindowFunction::Triangular {
                low,
                center,
                high,
                central_value,
            } => Ok(triangular_value(i as Real, center, low, high, central_value)),

            WindowFunction::Kaiser { b } => {
                let num_arg = if (2 * i).unsigned_abs() >= (width as u64).saturating_sub(1) {
                    0.0
                } else {
                    let x = (2.0 * i as Real) / (width as Real - 1.0);
                    b * (1.0 - x * x).sqrt()
                };
                Ok(bessel_i0(num_arg) / self.kaiser_i0_b)
            }

            WindowFunction::Hamming => raised_cosine(0.54, i, width),
            WindowFunction::Hanning => raised_cosine(0.50, i, width),

            WindowFunction::Blackman => {
                let n = width as Real;
                Ok(0.42
                    + 0.5 * ((2.0 * PI * i as Real) / n).cos()
                    + 0.08 * ((4.0 * PI * i as Real) / n).cos())
            }
        }
    }

    /// Windowed value of a sample at a 1-based frame position
    ///
    /// Positions outside `1..=width` yield zero. In complex mode the
    /// imaginary component is windowed as well; in real mode it is
    /// dropped.
    pub fn windowed_value(
        &self,
        in_value: Complex,
        pos: usize,
        width: usize,
        mode: CpxMode,
    ) -> Result<Complex> {
        if pos < 1 || pos > width {
            return Ok(Complex::new(0.0, 0.0));
        }
        // Centre the position around the middle of the frame
        let centred = pos as i64 - (width / 2) as i64;
        let w = self.value(centred, width)?;
        let im = if mode == CpxMode::Complex {
            w * in_value.im
        } else {
            0.0
        };
        Ok(Complex::new(w * in_value.re, im))
    }
}

/// Checks the zero-power condition on the current entry of an index
///
/// A frame is zero-power iff all four cached extrema are inside the
/// epsilon band around zero.
fn is_zero_power(index: &mut SampleIndex) -> Result<bool> {
    let entry = index.current_entry_mut()?;
    entry.list.calculate_statistics()?;
    let stats = entry.list.stats().ok_or_else(|| SignalError::NotInitialized {
        details: "frame statistics missing after calculation".into(),
    })?;
    Ok(stats.max.re < f64::EPSILON
        && stats.min.re > -f64::EPSILON
        && stats.max.im < f64::EPSILON
        && stats.min.im > -f64::EPSILON)
}

/// Cuts one windowed frame from the current entry of `index` and appends
/// it to `out_index`
///
/// Frame `frame_number` (0-based) reads source positions
/// `frame_number * stride + 1 ..= frame_number * stride + width`, wrapping
/// circularly past the end of the signal once; positions beyond a full
/// wrap read as zero.
#[allow(clippy::too_many_arguments)]
pub fn window_frame(
    index: &SampleIndex,
    frame_number: u64,
    width: usize,
    stride: usize,
    frame_kind: SampleKind,
    windowing_mode: CpxMode,
    window: &WindowShape,
    out_index: &mut SampleIndex,
) -> Result<()> {
    let source = index.current_entry()?;
    let samples = source.list.len();
    if width > samples {
        return Err(SignalError::domain(
            "window_frame",
            format!("frame width ({width}) is larger than the number of samples ({samples})"),
        ));
    }

    let inc_time = source.list.inc_time();
    let frame_name = format!("frame [{},{}]", source.name, frame_number);
    let frame_file = format!("{}.{}", source.file, frame_number);

    out_index.add_entry(
        frame_name,
        frame_file,
        index.current(),
        frame_kind,
        frame_number as Real * inc_time * stride as Real,
        inc_time,
        frame_number,
        true,
    )?;

    let mut values = Vec::with_capacity(width);
    let first = frame_number as usize * stride + 1;
    for (frame_pos, read_pos) in (first..first + width).enumerate() {
        // Single circular wrap; zero past a full wrap
        let value = if read_pos <= samples {
            source.list.get(read_pos)?
        } else if read_pos - samples <= samples {
            source.list.get(read_pos - samples)?
        } else {
            Complex::new(0.0, 0.0)
        };
        values.push(window.windowed_value(value, frame_pos + 1, width, windowing_mode)?);
    }

    let frame = &mut out_index.current_entry_mut()?.list;
    frame.resize(width);
    for (i, value) in values.into_iter().enumerate() {
        frame.set(i + 1, value)?;
    }
    Ok(())
}

/// Splits the current list of `index` into windowed frames
///
/// Optionally applies pre-emphasis to the source signal first. Returns a
/// new index whose parent is the source index, holding
/// `ceil(samples / (width - superposing))` frames (minus any purged
/// zero-power frames).
#[allow(clippy::too_many_arguments)]
pub fn window_signal(
    index: &mut SampleIndex,
    preemphasis: Option<Real>,
    width: usize,
    superposing: usize,
    frame_kind: SampleKind,
    windowing_mode: CpxMode,
    window: &WindowShape,
    purge_zero_power: bool,
) -> Result<SampleIndex> {
    let samples = index.current_entry()?.list.len();
    if width > samples {
        return Err(SignalError::domain(
            "window_signal",
            format!("frame width ({width}) is larger than the number of samples ({samples})"),
        ));
    }
    if superposing >= width {
        return Err(SignalError::domain(
            "window_signal",
            "number of superposing samples must be less than the frame width",
        ));
    }

    let stride = width - superposing;
    let mut frames = samples / stride;
    if samples % stride > 0 {
        frames += 1;
    }
    debug!(samples, width, superposing, frames, "windowing signal");

    let mut out_index = SampleIndex::new(Some(index));

    if let Some(alpha) = preemphasis {
        list_preemphasis(&mut index.current_entry_mut()?.list, alpha)?;
    }

    for frame_number in 0..frames {
        window_frame(
            index,
            frame_number as u64,
            width,
            stride,
            frame_kind,
            windowing_mode,
            window,
            &mut out_index,
        )?;

        if purge_zero_power && is_zero_power(&mut out_index)? {
            trace!(frame_number, "purging zero-power frame");
            out_index.destroy_entry()?;
        }
    }

    Ok(out_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;

    fn source_index(values: &[f64]) -> SampleIndex {
        let mut index = SampleIndex::new(None);
        index
            .add_entry("signal", "signal.raw", None, SampleKind::Real, 0.0, 1.0, 0, true)
            .unwrap();
        let list = &mut index.current_entry_mut().unwrap().list;
        for &v in values {
            list.push(Complex::new(v, 0.0));
        }
        index
    }

    #[test]
    fn test_hamming_midpoint_and_edge() {
        // W = 8: value 1.0 at i = W/2 (centred i' = 0), ~0.08 at i = 0
        let shape = WindowShape::new(WindowFunction::Hamming);
        let mid = shape.value(0, 8).unwrap();
        assert!((mid - 1.0).abs() < 1e-12);

        let edge = shape.value(-4, 8).unwrap();
        assert!((edge - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_raised_cosine_symmetry() {
        for function in [
            WindowFunction::Hamming,
            WindowFunction::Hanning,
            WindowFunction::Blackman,
        ] {
            let shape = WindowShape::new(function);
            for i in 1..=8i64 {
                let a = shape.value(i, 16).unwrap();
                let b = shape.value(-i, 16).unwrap();
                assert!((a - b).abs() < 1e-12, "{function:?} not symmetric at {i}");
            }
        }
    }

    #[test]
    fn test_bartlett_peak_and_slope() {
        let shape = WindowShape::new(WindowFunction::Bartlett);
        assert!((shape.value(0, 8).unwrap() - 1.0).abs() < 1e-12);
        assert!((shape.value(-4, 8).unwrap() - 0.0).abs() < 1e-12);
        assert!((shape.value(2, 8).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kaiser_normalized_peak() {
        let shape = WindowShape::new(WindowFunction::Kaiser { b: 6.0 });
        // At the centre the numerator argument approaches b, so the
        // window approaches one
        let centre = shape.value(0, 65).unwrap();
        assert!(centre > 0.99 && centre <= 1.0 + 1e-12);
        // At the edge the numerator argument is zero
        let edge = shape.value(32, 65).unwrap();
        assert!((edge - 1.0 / bessel_i0(6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_framing_count_and_content() {
        // 8 samples, width 4, overlap 2 -> stride 2, ceil(8/2) = 4 frames
        let mut index = source_index(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let window = WindowShape::new(WindowFunction::Rectangular);
        let frames = window_signal(
            &mut index,
            None,
            4,
            2,
            SampleKind::Complex,
            CpxMode::Real,
            &window,
            false,
        )
        .unwrap();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames.parent_id(), Some(index.id()));

        // Frame 0 covers samples 1..=4
        let id = frames.entry_at(1).unwrap();
        let first = &frames.entry(id).unwrap().list;
        for (i, want) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            assert_eq!(first.get(i + 1).unwrap().re, *want);
        }

        // Frame 3 starts at sample 7 and wraps to samples 1..=2
        let id = frames.entry_at(4).unwrap();
        let last = &frames.entry(id).unwrap().list;
        for (i, want) in [7.0, 8.0, 1.0, 2.0].iter().enumerate() {
            assert_eq!(last.get(i + 1).unwrap().re, *want);
        }
    }

    #[test]
    fn test_framing_rejects_bad_geometry() {
        let mut index = source_index(&[1.0, 2.0]);
        let window = WindowShape::new(WindowFunction::Rectangular);
        assert!(window_signal(
            &mut index,
            None,
            4,
            0,
            SampleKind::Real,
            CpxMode::Real,
            &window,
            false
        )
        .is_err());

        let mut index = source_index(&[1.0, 2.0, 3.0, 4.0]);
        assert!(window_signal(
            &mut index,
            None,
            4,
            4,
            SampleKind::Real,
            CpxMode::Real,
            &window,
            false
        )
        .is_err());
    }

    #[test]
    fn test_zero_power_purge() {
        // Second frame (samples 5..=8) is all zero and should be purged
        let mut index = source_index(&[1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0]);
        let window = WindowShape::new(WindowFunction::Rectangular);
        let frames = window_signal(
            &mut index,
            None,
            4,
            0,
            SampleKind::Real,
            CpxMode::Real,
            &window,
            true,
        )
        .unwrap();
        assert_eq!(frames.len(), 1);
    }
}
