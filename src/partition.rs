// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cutting a render request into bands of rows.

use config::SolverConfig;
use planes::Window;
use polynomial::{Polynomial, RootedPolynomial};
use std::ops::Range;
use task::BandTask;

/// The row ranges of a `height`-row image cut every `band_height`
/// rows from the top.  The last band ends at `height`, however many
/// rows are left for it.  A zero band height yields no bands.
pub fn bands(height: usize, band_height: usize) -> Vec<Range<usize>> {
    if band_height == 0 {
        return vec![];
    }
    (0..height)
        .step_by(band_height)
        .map(|start| start..(start + band_height).min(height))
        .collect()
}

/// One task per band, each carrying its own copy of the polynomials.
pub fn partition(
    window: Window,
    width: usize,
    height: usize,
    config: &SolverConfig,
    polynomial: &Polynomial,
    derivative: &Polynomial,
    rooted: &RootedPolynomial,
) -> Vec<BandTask> {
    let tasks: Vec<BandTask> = bands(height, config.band_height)
        .into_iter()
        .map(|rows| {
            BandTask::new(
                window,
                width,
                height,
                rows,
                *config,
                polynomial.clone(),
                derivative.clone(),
                rooted.clone(),
            )
        })
        .collect();
    debug!(
        "Partitioned {}x{} image into {} bands of up to {} rows",
        width,
        height,
        tasks.len(),
        config.band_height
    );
    tasks
}
