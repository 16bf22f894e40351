// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs of the Newton solver and of the partitioner.

use error::RenderError;

/// Once handed to a producer, these do not change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Hard cap on Newton steps per pixel.  At least one step is taken.
    pub iteration_limit: usize,
    /// Iteration stops once two successive points are this close.
    pub convergence_epsilon: f64,
    /// How close the final point must be to a root for that root to
    /// be credited.
    pub root_threshold: f64,
    /// Rows per band.  The last band takes whatever is left over.
    pub band_height: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            iteration_limit: 1024,
            convergence_epsilon: 0.001,
            root_threshold: 0.002,
            band_height: 64,
        }
    }
}

impl SolverConfig {
    /// Replace the iteration cap.
    pub fn with_iteration_limit(mut self, iteration_limit: usize) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }

    /// Replace the convergence epsilon.
    pub fn with_convergence_epsilon(mut self, convergence_epsilon: f64) -> Self {
        self.convergence_epsilon = convergence_epsilon;
        self
    }

    /// Replace the nearest-root threshold.
    pub fn with_root_threshold(mut self, root_threshold: f64) -> Self {
        self.root_threshold = root_threshold;
        self
    }

    /// Replace the band height.
    pub fn with_band_height(mut self, band_height: usize) -> Self {
        self.band_height = band_height;
        self
    }

    /// Refuse settings that cannot drive a render: a zero band height
    /// would never finish partitioning, and a threshold or epsilon
    /// that is not a positive number makes every pixel meaningless.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |reason: &str| {
            Err(RenderError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.iteration_limit == 0 {
            return invalid("iteration limit must be at least 1");
        }
        if self.band_height == 0 {
            return invalid("band height must be at least 1");
        }
        if !(self.convergence_epsilon > 0.0) || !self.convergence_epsilon.is_finite() {
            return invalid("convergence epsilon must be a positive number");
        }
        if !(self.root_threshold > 0.0) || !self.root_threshold.is_finite() {
            return invalid("root threshold must be a positive number");
        }
        Ok(())
    }
}
