//! Raw text signal decoder
//!
//! Line-oriented fallback format: every non-empty line carries one
//! sample, split on the delimiter set `" ,;()ijIJ[]{}"` (plus tabs). The
//! first token is the real part; when the destination list is complex,
//! the second token is the imaginary part. Blank lines are tolerated.

use crate::complex::{Complex, Real};
use crate::error::{Result, SignalError};
use crate::samples::{SampleKind, SampleList};

const DELIMITERS: &[char] = &[
    ' ', '\t', ',', ';', '(', ')', 'i', 'j', 'I', 'J', '[', ']', '{', '}',
];

fn parse_token(line_no: usize, token: &str) -> Result<Real> {
    token.parse::<Real>().map_err(|_| {
        SignalError::domain(
            "raw_decode",
            format!("line {line_no}: cannot parse value '{token}'"),
        )
    })
}

/// Decodes raw text samples into the given list
pub fn decode(text: &str, list: &mut SampleList) -> Result<()> {
    let complex_target = list.kind() == SampleKind::Complex;

    for (i, line) in text.lines().enumerate() {
        let mut tokens = line.split(DELIMITERS).filter(|t| !t.is_empty());
        let Some(first) = tokens.next() else {
            continue;
        };
        let re = parse_token(i + 1, first)?;
        let im = if complex_target {
            match tokens.next() {
                Some(second) => parse_token(i + 1, second)?,
                None => 0.0,
            }
        } else {
            0.0
        };
        list.push(Complex::new(re, im));
    }
    Ok(())
}
