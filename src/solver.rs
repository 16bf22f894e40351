// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The band solver.  Every pixel of a band is mapped into the complex
//! window and used as the starting point of a Newton–Raphson
//! iteration on the task's polynomial; the point it settles on is
//! then credited to the nearest root, if any root is near enough.
//!
//! Nothing here can fail.  A zero derivative turns the iterate into
//! NaN, which stops the iteration and is close to no root; a point
//! that never settles runs out of iterations and is most likely far
//! from every root as well.  Either way the pixel gets index 0.

use complex::distance;
use itertools::iproduct;
use num::Complex;
use planes::Pixel;
use polynomial::Polynomial;
use task::{BandResult, BandTask};

/// The most roots a polynomial may have: pixel indices are `u16`,
/// with 0 taken for "no root".
pub const MAX_ROOTS: usize = ::std::u16::MAX as usize;

/// Run Newton–Raphson from `start` until two successive points are
/// within `epsilon` of each other or `limit` steps have been taken,
/// and return the last point.  At least one step is always taken.
pub fn converge(
    polynomial: &Polynomial,
    derivative: &Polynomial,
    start: Complex<f64>,
    limit: usize,
    epsilon: f64,
) -> Complex<f64> {
    let mut current = start;
    let mut iterations = 0;
    loop {
        let next = current - polynomial.apply(current) / derivative.apply(current);
        let step = distance(next, current);
        current = next;
        iterations += 1;
        // A NaN step fails this comparison and ends the loop.
        if !(step > epsilon) || iterations >= limit {
            return current;
        }
    }
}

/// The index stored for a pixel starting at `start`: 0 when the
/// iteration ends near no root, otherwise one more than the root's
/// position in the task's root list.  Root lists longer than
/// `MAX_ROOTS` are refused before any band is built.
pub fn root_index(task: &BandTask, start: Complex<f64>) -> u16 {
    let config = task.config();
    let end = converge(
        task.polynomial(),
        task.derivative(),
        start,
        config.iteration_limit,
        config.convergence_epsilon,
    );
    match task
        .rooted()
        .index_of_closest_root_for(end, config.root_threshold)
    {
        Some(index) => (index + 1) as u16,
        None => 0,
    }
}

/// Render one band.  The result is laid out row by row, starting at
/// the band's first row, and depends only on the task.
pub fn solve_band(task: &BandTask) -> BandResult {
    let plane = task.plane();
    let indices = iproduct!(task.rows(), 0..task.width())
        .map(|(row, column)| root_index(task, plane.pixel_to_point(&Pixel(column, row))))
        .collect();
    BandResult {
        rows: task.rows(),
        indices,
    }
}
