// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpers around `num::Complex<f64>`, which does all of the actual
//! arithmetic.  Division is the textbook multiply-by-the-conjugate,
//! divide-by-the-squared-norm, so dividing by zero quietly hands back
//! NaN or infinite components.  The Newton iteration relies on that:
//! a NaN point is never close to any root.

use error::ParseRootError;
use num::Complex;
use std::fmt;

/// Anything at or below this magnitude is hidden by `Pretty`.
const NEGLIGIBLE: f64 = 1e-5;

/// Calculate the distance between two complex numbers on a Cartesian
/// plane.
#[inline]
pub fn distance(i: Complex<f64>, j: Complex<f64>) -> f64 {
    (i - j).norm()
}

/// Component-wise comparison within `tolerance`.  Two computations of
/// the same value rarely agree to the last bit once the order of the
/// operations differs.
pub fn approx_eq(i: Complex<f64>, j: Complex<f64>, tolerance: f64) -> bool {
    (i.re - j.re).abs() <= tolerance && (i.im - j.im).abs() <= tolerance
}

/// Display adapter for a complex number: at most three decimals,
/// negligible parts left out, `0` when nothing is left.
pub struct Pretty(pub Complex<f64>);

fn decimal(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

impl fmt::Display for Pretty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Complex { re, im } = self.0;
        let show_re = re.abs() > NEGLIGIBLE;
        let show_im = im.abs() > NEGLIGIBLE;
        if show_re {
            write!(f, "{}", decimal(re))?;
        }
        if show_im {
            let sign = if im >= 0.0 { "+" } else { "" };
            write!(f, "{}{}i", sign, decimal(im))?;
        }
        if !show_re && !show_im {
            write!(f, "0")?;
        }
        Ok(())
    }
}

/// Reads one part of a root literal.  A leading `i` marks the
/// imaginary part, and a bare `i` means one.
fn parse_part(token: &str, literal: &str) -> Result<(bool, f64), ParseRootError> {
    let malformed = || ParseRootError::Malformed {
        literal: literal.to_string(),
    };
    let (negative, unsigned) = match token.chars().next() {
        Some('-') => (true, &token[1..]),
        _ => (false, token),
    };
    let sign = if negative { -1.0 } else { 1.0 };
    if unsigned.starts_with('i') {
        let digits = &unsigned[1..];
        if digits.is_empty() {
            return Ok((true, sign));
        }
        if digits.starts_with('-') || digits.starts_with('+') {
            return Err(malformed());
        }
        return digits
            .parse::<f64>()
            .map(|v| (true, sign * v))
            .map_err(|_| malformed());
    }
    token
        .parse::<f64>()
        .map(|v| (false, v))
        .map_err(|_| malformed())
}

/// Parse a root as typed by a user: `1`, `-2.5`, `i`, `i3`, `-i3`,
/// `1 + i2` or `1 - i2`.  The three-token forms need the spaces
/// around the operator.
pub fn parse_root(literal: &str) -> Result<Complex<f64>, ParseRootError> {
    let tokens: Vec<&str> = literal.split_whitespace().collect();
    let malformed = || ParseRootError::Malformed {
        literal: literal.to_string(),
    };
    match tokens.len() {
        0 => Err(ParseRootError::Empty),
        1 => match parse_part(tokens[0], literal)? {
            (true, im) => Ok(Complex::new(0.0, im)),
            (false, re) => Ok(Complex::new(re, 0.0)),
        },
        3 => {
            let re = match parse_part(tokens[0], literal)? {
                (false, re) => re,
                (true, _) => return Err(malformed()),
            };
            let im = match parse_part(tokens[2], literal)? {
                (true, im) if !tokens[2].starts_with('-') => im,
                _ => return Err(malformed()),
            };
            match tokens[1] {
                "+" => Ok(Complex::new(re, im)),
                "-" => Ok(Complex::new(re, -im)),
                _ => Err(malformed()),
            }
        }
        _ => Err(malformed()),
    }
}
