// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The unit of work and what comes back from it.  A `BandTask`
//! carries everything needed to render its rows, so it can be handed
//! to any thread, or encoded and shipped to another process, without
//! reaching back into the request that made it.

use config::SolverConfig;
use error::TaskFailure;
use planes::{PlaneMapper, Window};
use polynomial::{Polynomial, RootedPolynomial};
use std::ops::Range;

/// One band of rows of one render request.
#[derive(Clone, Debug, PartialEq)]
pub struct BandTask {
    window: Window,
    width: usize,
    height: usize,
    rows: Range<usize>,
    config: SolverConfig,
    polynomial: Polynomial,
    derivative: Polynomial,
    rooted: RootedPolynomial,
}

impl BandTask {
    /// Bundle up a band.  `rows` must lie within `0..height`.
    pub fn new(
        window: Window,
        width: usize,
        height: usize,
        rows: Range<usize>,
        config: SolverConfig,
        polynomial: Polynomial,
        derivative: Polynomial,
        rooted: RootedPolynomial,
    ) -> Self {
        debug_assert!(rows.start <= rows.end && rows.end <= height);
        BandTask {
            window,
            width,
            height,
            rows,
            config,
            polynomial,
            derivative,
            rooted,
        }
    }

    /// The complex window of the whole image.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Width of the whole image, which is also the width of the band.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the whole image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The rows this band owns, top row first.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Iteration cap, epsilon, threshold.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The polynomial being solved, in coefficient form.
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    /// Its first derivative.
    pub fn derivative(&self) -> &Polynomial {
        &self.derivative
    }

    /// The roots converged points are classified against.
    pub fn rooted(&self) -> &RootedPolynomial {
        &self.rooted
    }

    /// The mapping from this band's pixels into the window.
    pub fn plane(&self) -> PlaneMapper {
        PlaneMapper::new(self.width, self.height, self.window)
    }

    /// Number of pixels in the band.
    pub fn len(&self) -> usize {
        self.width * (self.rows.end - self.rows.start)
    }

    /// A band with no rows, or of an image with no columns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The root indices of one band, row by row: 0 where nothing
/// converged, `k` where the point converged to root `k - 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct BandResult {
    /// The rows covered.
    pub rows: Range<usize>,
    /// `width` indices per row.
    pub indices: Vec<u16>,
}

/// What the job service hands back for each submitted band.
pub type TaskOutcome = Result<BandResult, TaskFailure>;
