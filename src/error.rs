// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types.  Numerical trouble inside the Newton iteration is
//! never an error; these only describe requests that cannot be
//! rendered at all, bands that a job service failed to run, and root
//! literals that could not be read.

use std::ops::Range;

/// Reasons a render request (or the producer behind it) is refused
/// before any band is submitted.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// A producer needs at least one root to expand into a polynomial.
    #[fail(display = "A polynomial needs at least one root")]
    NoRoots,

    /// More roots than a pixel index can number.
    #[fail(display = "{} roots are more than the {} a pixel index can name", count, limit)]
    TooManyRoots {
        /// How many roots were given.
        count: usize,
        /// The most that are accepted.
        limit: usize,
    },

    /// The integral plane has no pixels.
    #[fail(display = "Image of {}x{} pixels has nothing to render", width, height)]
    EmptyImage {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The lower bound of an axis lies above its upper bound.
    #[fail(display = "The {} axis runs from {} down to {}", axis, min, max)]
    InvertedWindow {
        /// "real" or "imaginary".
        axis: &'static str,
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// One of the window corners is NaN or infinite.
    #[fail(display = "The complex window must have finite corners")]
    NonFiniteWindow,

    /// The solver configuration cannot drive a render.
    #[fail(display = "Invalid solver configuration: {}", reason)]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },
}

/// A band that the job service reported as failed, instead of
/// returning its indices.
#[derive(Debug, Fail, Clone, PartialEq)]
#[fail(display = "Band {:?} failed: {}", rows, cause)]
pub struct TaskFailure {
    /// The rows the failed band owned.
    pub rows: Range<usize>,
    /// Whatever the job service said went wrong.
    pub cause: String,
}

impl TaskFailure {
    /// Record a failure of the band covering `rows`.
    pub fn new<S: Into<String>>(rows: Range<usize>, cause: S) -> Self {
        TaskFailure {
            rows,
            cause: cause.into(),
        }
    }
}

/// A root literal that could not be turned into a complex number.
#[derive(Debug, Fail, PartialEq)]
pub enum ParseRootError {
    /// Nothing but whitespace.
    #[fail(display = "Empty string is not a legal complex number")]
    Empty,

    /// Anything not of the form `a`, `ib`, `a + ib` or `a - ib`.
    #[fail(display = "Not a valid complex number: {:?}", literal)]
    Malformed {
        /// The literal as given.
        literal: String,
    },
}
