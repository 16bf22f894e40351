#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Newton fractal renderer
//!
//! Pick a handful of points on the complex plane and multiply out the
//! polynomial that has exactly those roots.  Now take any other point
//! and run Newton's method on the polynomial from there: it will
//! usually slide into one of the roots, and which one depends on
//! where you started in a wonderfully unstable way.  Coloring every
//! pixel by the root its point ends up in gives the Newton fractal.
//! Points that never settle, or that land on a flat spot of the
//! polynomial, get no root at all.
//!
//! The image is cut into bands of rows.  Each band is a
//! self-contained task that any job service can run, here or
//! elsewhere, in any order; the results are stitched back together
//! by row, and a band that fails simply leaves its rows blank.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate serde;
extern crate serde_json;

#[cfg(test)]
extern crate rand;

pub mod aggregator;
pub mod complex;
pub mod config;
pub mod error;
pub mod executor;
pub mod partition;
pub mod planes;
pub mod polynomial;
pub mod producer;
pub mod solver;
pub mod task;
pub mod wire;

pub use aggregator::Aggregator;
pub use complex::{parse_root, Pretty};
pub use config::SolverConfig;
pub use error::{ParseRootError, RenderError, TaskFailure};
pub use executor::{JobService, SerialExecutor, ThreadedExecutor};
pub use planes::Window;
pub use polynomial::{Polynomial, RootedPolynomial};
pub use producer::{FractalProducer, Rendering};
pub use solver::{solve_band, MAX_ROOTS};
pub use task::{BandResult, BandTask, TaskOutcome};
